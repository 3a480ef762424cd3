//! Singly-linked queue of owned strings.
//!
//! The queue owns its node chain through raw links starting at `head`; `tail`
//! aliases the last node of that chain so appends stay O(1). Nodes are allocated
//! once and never move, so relinking leaves both pointers valid.
//!
//! Invariants (checked by [`Queue::is_consistent`]):
//! - `len == 0` iff `head` is `None` iff `tail` is `None`
//! - walking `next` from `head` visits exactly `len` nodes and stops at `tail`

use std::fmt;
use std::marker::PhantomData;

use super::buffer::copy_truncated;
use super::node::{Link, Node};
use super::sort::merge_sort;
use super::QueueError;

/// A FIFO of strings with head/tail insertion, head removal, reverse and sort.
pub struct Queue {
    head: Link,
    tail: Link,
    len: usize,
    _owns: PhantomData<Box<Node>>,
}

// SAFETY: the queue exclusively owns every node reachable from `head`, and `tail`
// only ever points into that chain, so moving the queue to another thread moves
// all of them along with it.
unsafe impl Send for Queue {}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Queue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            _owns: PhantomData,
        }
    }

    /// Number of values in the queue.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value that the next [`remove_head`](Self::remove_head) would return.
    pub fn head(&self) -> Option<&str> {
        // SAFETY: `head` is a live node owned by this queue; the shared borrow of
        // `self` keeps it alive and unmodified for the returned lifetime.
        self.head.map(|node| unsafe { &(*node.as_ptr()).value }.as_str())
    }

    /// Most recently appended value.
    pub fn tail(&self) -> Option<&str> {
        // SAFETY: as for `head`; `tail` is the last node of the owned chain.
        self.tail.map(|node| unsafe { &(*node.as_ptr()).value }.as_str())
    }

    /// Insert a copy of `value` in front of the current head.
    ///
    /// On error the queue is left exactly as it was.
    pub fn insert_head(&mut self, value: &str) -> Result<(), QueueError> {
        let node = Node::try_new(value)?;

        // SAFETY: `node` was just allocated and is not yet shared with anything.
        unsafe { (*node.as_ptr()).next = self.head };
        if self.tail.is_none() {
            self.tail = Some(node);
        }
        self.head = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Append a copy of `value` after the current tail.
    ///
    /// On error the queue is left exactly as it was.
    pub fn insert_tail(&mut self, value: &str) -> Result<(), QueueError> {
        let node = Node::try_new(value)?;

        match self.tail {
            None => self.head = Some(node),
            // SAFETY: a non-empty queue's `tail` is the live last node of the chain
            // this queue owns, and `&mut self` gives exclusive access to it.
            Some(tail) => unsafe { (*tail.as_ptr()).next = Some(node) },
        }
        self.tail = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Detach the head node and return its value.
    pub fn pop_head(&mut self) -> Result<String, QueueError> {
        let node = self.head.ok_or(QueueError::EmptyQueue)?;

        // SAFETY: `node` is the live head owned by this queue. It is unlinked
        // before being freed, and `tail` is cleared if it pointed at it.
        unsafe {
            self.head = (*node.as_ptr()).next;
            if self.head.is_none() {
                self.tail = None;
            }
            self.len -= 1;
            Ok(Node::free(node))
        }
    }

    /// Remove the head value, copying it into `buf` as a NUL-terminated string.
    ///
    /// At most `buf.len() - 1` bytes are copied; the value is discarded when `buf`
    /// is `None` or empty. Returns the number of value bytes written. On
    /// [`QueueError::EmptyQueue`] the buffer is not touched.
    pub fn remove_head(&mut self, buf: Option<&mut [u8]>) -> Result<usize, QueueError> {
        let value = self.pop_head()?;
        Ok(match buf {
            Some(buf) => copy_truncated(buf, value.as_bytes()),
            None => 0,
        })
    }

    /// Reverse the queue in place by flipping every link.
    pub fn reverse(&mut self) {
        if self.len < 2 {
            return;
        }

        let mut current = self.head;
        let mut reversed: Link = None;

        while let Some(node) = current {
            // SAFETY: every node reached from `head` is live and owned by this
            // queue; `&mut self` gives exclusive access to the chain.
            unsafe {
                current = (*node.as_ptr()).next;
                (*node.as_ptr()).next = reversed;
            }
            reversed = Some(node);
        }

        self.tail = self.head;
        self.head = reversed;
    }

    /// Sort the values in ascending byte-wise order by relinking nodes.
    pub fn sort(&mut self) {
        if self.len < 2 {
            return;
        }

        // SAFETY: `head` starts the chain of exactly `len` nodes this queue owns,
        // and `&mut self` keeps anything else from touching it during the sort.
        self.head = unsafe { merge_sort(self.head, self.len) };
        self.tail = self.find_last();
    }

    /// Free every node, leaving an empty queue.
    pub fn clear(&mut self) {
        let mut current = self.head.take();
        self.tail = None;
        self.len = 0;

        while let Some(node) = current {
            // SAFETY: the chain was detached from the queue above, so each node is
            // read for its successor and then freed exactly once.
            unsafe {
                current = (*node.as_ptr()).next;
                Node::free(node);
            }
        }
    }

    /// Check the structural invariants of the chain.
    pub fn is_consistent(&self) -> bool {
        let mut visited = 0usize;
        let mut last: Link = None;
        let mut link = self.head;

        while let Some(node) = link {
            visited += 1;
            if visited > self.len {
                return false;
            }
            last = Some(node);
            // SAFETY: at most `len` nodes are visited, all owned by this queue.
            link = unsafe { (*node.as_ptr()).next };
        }

        visited == self.len && last == self.tail
    }

    /// Values from head to tail.
    pub(crate) fn values(&self) -> Values<'_> {
        Values {
            link: self.head,
            _queue: PhantomData,
        }
    }

    fn find_last(&self) -> Link {
        let mut last = self.head?;
        for _ in 1..self.len {
            // SAFETY: the chain holds `len` live nodes owned by this queue.
            last = unsafe { (*last.as_ptr()).next }?;
        }
        Some(last)
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values()).finish()
    }
}

/// Borrowing walk over the queue's values, used for display.
pub(crate) struct Values<'a> {
    link: Link,
    _queue: PhantomData<&'a Queue>,
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.link?;
        // SAFETY: the iterator borrows the queue for `'a`, so every node in the
        // chain stays alive and unmodified while its value is handed out.
        let node: &'a Node = unsafe { &*node.as_ptr() };
        self.link = node.next;
        Some(node.value.as_str())
    }
}
