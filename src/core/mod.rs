//! Core module - the linked string queue.
//!
//! This module contains the data structure itself:
//! - Nodes and their fallible allocation
//! - The queue with head/tail insertion, head removal, reverse and sort
//! - Bounded copy into caller buffers
//! - The handle layer for callers that may hold no queue at all

pub mod buffer;
pub mod handle;
mod node;
pub mod queue;
mod sort;

use thiserror::Error;

pub use queue::Queue;

/// Why a queue operation did not apply. A failed operation never mutates the queue.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue is absent")]
    NullQueue,

    #[error("could not allocate a queue element")]
    AllocationFailure,

    #[error("queue is empty")]
    EmptyQueue,
}
