//! List nodes and their fallible allocation.
//!
//! Nodes live on the heap behind raw `NonNull` links from the moment they are
//! allocated until they are freed, so relinking never moves or retags them and
//! the queue's tail pointer stays valid.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use super::QueueError;

/// Link to the next node. The chain that holds a link owns the node behind it.
pub(crate) type Link = Option<NonNull<Node>>;

/// A single list element: one owned value and the link to its successor.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) value: String,
    pub(crate) next: Link,
}

impl Node {
    /// Allocate a detached node holding a private copy of `value`.
    ///
    /// The copy is reserved before the node itself, so a failed node allocation
    /// only has to drop the already-copied string. The caller owns the returned
    /// node and must release it with [`Node::free`].
    pub(crate) fn try_new(value: &str) -> Result<NonNull<Node>, QueueError> {
        let mut owned = String::new();
        owned
            .try_reserve_exact(value.len())
            .map_err(|_| QueueError::AllocationFailure)?;
        owned.push_str(value);

        try_alloc(Node {
            value: owned,
            next: None,
        })
    }

    /// Release a node and hand back its value. The node's `next` link is ignored.
    ///
    /// # Safety
    ///
    /// `node` must come from [`Node::try_new`], must not have been freed already,
    /// and must no longer be reachable from any chain.
    pub(crate) unsafe fn free(node: NonNull<Node>) -> String {
        Box::from_raw(node.as_ptr()).value
    }
}

/// `Box::into_raw(Box::new(node))` without the abort on allocation failure.
fn try_alloc(node: Node) -> Result<NonNull<Node>, QueueError> {
    let layout = Layout::new::<Node>();

    // SAFETY: `Node` is not zero-sized, so `layout` has a non-zero size.
    let raw = unsafe { alloc::alloc(layout) }.cast::<Node>();
    let ptr = NonNull::new(raw).ok_or(QueueError::AllocationFailure)?;

    // SAFETY: `ptr` was just allocated by the global allocator with the layout of
    // `Node`, so it is valid for a write, and `Box::from_raw` in `Node::free` may
    // later reclaim it.
    unsafe { ptr.as_ptr().write(node) };
    Ok(ptr)
}
