//! Operations for callers whose queue may be absent.
//!
//! Each function takes an `Option` in place of a queue. Mutating operations on
//! `None` fail with [`QueueError::NullQueue`]; `size`, `reverse` and `sort` treat
//! it as an empty queue.

use super::{Queue, QueueError};

/// Create an empty queue handle.
pub fn new() -> Option<Queue> {
    Some(Queue::new())
}

/// Release a queue and every value it still holds. `None` is a no-op.
pub fn destroy(queue: Option<Queue>) {
    if let Some(mut queue) = queue {
        tracing::trace!(len = queue.len(), "destroying queue");
        queue.clear();
    }
}

pub fn insert_head(queue: Option<&mut Queue>, value: &str) -> Result<(), QueueError> {
    queue.ok_or(QueueError::NullQueue)?.insert_head(value)
}

pub fn insert_tail(queue: Option<&mut Queue>, value: &str) -> Result<(), QueueError> {
    queue.ok_or(QueueError::NullQueue)?.insert_tail(value)
}

/// Remove the head value into `buf`; see [`Queue::remove_head`].
pub fn remove_head(queue: Option<&mut Queue>, buf: Option<&mut [u8]>) -> Result<usize, QueueError> {
    queue.ok_or(QueueError::NullQueue)?.remove_head(buf)
}

pub fn size(queue: Option<&Queue>) -> usize {
    queue.map_or(0, Queue::len)
}

pub fn reverse(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.reverse();
    }
}

pub fn sort(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.sort();
    }
}
