//! Handle-indexed min-priority queue.
//!
//! # Overview
//!
//! Elements carry their own priority and a *handle*: the slot they currently
//! occupy in the queue's backing sequence. The queue rewrites the handle of
//! every element it moves, so `decrease_priority` and `contains` find an
//! element in O(1) without searching the heap.
//!
//! Handles are `None` before insertion, after extraction, and after `clear`.
//!
//! ```rust
//! use wayfind_core::queue::{BinaryHeapMinPriorityQueue, QueueEntry};
//!
//! let far = QueueEntry::new("far", 9.0);
//! let near = QueueEntry::new("near", 4.0);
//!
//! let mut queue = BinaryHeapMinPriorityQueue::new();
//! queue.insert(&far)?;
//! queue.insert(&near)?;
//! queue.decrease_priority(&&far, 1.0)?;
//!
//! assert_eq!(queue.extract_minimum()?.value(), &"far");
//! # Ok::<(), wayfind_core::queue::QueueError>(())
//! ```

pub mod binary_heap;

use std::cell::Cell;
use std::rc::Rc;

pub use binary_heap::BinaryHeapMinPriorityQueue;

use crate::error::{ErrorCode, ErrorKind};

/// Errors from priority queue operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueueError {
    /// The element already occupies a slot in this queue.
    #[error("element is already in the queue")]
    AlreadyQueued,

    /// The element's priority is NaN and cannot be ordered.
    #[error("priority is not a number")]
    InvalidPriority,

    /// The operation needs at least one element.
    #[error("priority queue is empty")]
    Empty,

    /// The element does not occupy a slot in this queue.
    #[error("element is not in the queue")]
    NotQueued,

    /// `decrease_priority` was asked to keep or raise a priority.
    #[error("new priority {requested} is not lower than current priority {current}")]
    PriorityNotDecreased { current: f64, requested: f64 },
}

impl QueueError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadyQueued => ErrorCode::ElementAlreadyQueued,
            Self::InvalidPriority => ErrorCode::InvalidPriority,
            Self::Empty => ErrorCode::QueueEmpty,
            Self::NotQueued => ErrorCode::ElementNotQueued,
            Self::PriorityNotDecreased { .. } => ErrorCode::PriorityNotDecreased,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.code().kind()
    }
}

/// An entity that can sit in a [`BinaryHeapMinPriorityQueue`].
///
/// Setters take `&self` so the queue can hold shared references to elements
/// that the caller still reads. Implementors keep both fields in `Cell`s.
///
/// Only the queue may call `set_handle` while the element is queued.
pub trait PriorityQueueElement {
    fn priority(&self) -> f64;

    fn set_priority(&self, priority: f64);

    /// Current slot in the queue, or `None` when not queued.
    fn handle(&self) -> Option<usize>;

    fn set_handle(&self, handle: Option<usize>);

    /// Whether `self` and `other` are the same element, not merely equal.
    ///
    /// The queue uses this to confirm that the slot a handle names really
    /// holds the element asking. Owned elements compare by address.
    fn is_same(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl<T: PriorityQueueElement + ?Sized> PriorityQueueElement for &T {
    fn priority(&self) -> f64 {
        (**self).priority()
    }

    fn set_priority(&self, priority: f64) {
        (**self).set_priority(priority);
    }

    fn handle(&self) -> Option<usize> {
        (**self).handle()
    }

    fn set_handle(&self, handle: Option<usize>) {
        (**self).set_handle(handle);
    }

    fn is_same(&self, other: &Self) -> bool {
        std::ptr::eq(*self, *other)
    }
}

impl<T: PriorityQueueElement + ?Sized> PriorityQueueElement for Rc<T> {
    fn priority(&self) -> f64 {
        (**self).priority()
    }

    fn set_priority(&self, priority: f64) {
        (**self).set_priority(priority);
    }

    fn handle(&self) -> Option<usize> {
        (**self).handle()
    }

    fn set_handle(&self, handle: Option<usize>) {
        (**self).set_handle(handle);
    }

    fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

/// A value paired with a priority and a handle.
///
/// The general-purpose element type for callers that have no element type of
/// their own. A clone is a new, unqueued entry.
#[derive(Debug, PartialEq)]
pub struct QueueEntry<T> {
    value: T,
    priority: Cell<f64>,
    handle: Cell<Option<usize>>,
}

impl<T> QueueEntry<T> {
    #[must_use]
    pub const fn new(value: T, priority: f64) -> Self {
        Self {
            value,
            priority: Cell::new(priority),
            handle: Cell::new(None),
        }
    }

    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Clone> Clone for QueueEntry<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone(), self.priority.get())
    }
}

impl<T> PriorityQueueElement for QueueEntry<T> {
    fn priority(&self) -> f64 {
        self.priority.get()
    }

    fn set_priority(&self, priority: f64) {
        self.priority.set(priority);
    }

    fn handle(&self) -> Option<usize> {
        self.handle.get()
    }

    fn set_handle(&self, handle: Option<usize>) {
        self.handle.set(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_is_not_queued() {
        let entry = QueueEntry::new('x', 2.0);
        assert_eq!(entry.handle(), None);
        assert_eq!(entry.priority(), 2.0);
    }

    #[test]
    fn shared_forms_write_through() {
        let entry = Rc::new(QueueEntry::new(1_u8, 5.0));
        let alias = Rc::clone(&entry);
        alias.set_priority(3.0);
        alias.set_handle(Some(4));

        let by_ref = &*entry;
        assert_eq!(by_ref.priority(), 3.0);
        assert_eq!(PriorityQueueElement::handle(&by_ref), Some(4));
    }

    #[test]
    fn clone_is_not_queued() {
        let entry = QueueEntry::new("b", 7.0);
        entry.set_handle(Some(1));

        let copy = entry.clone();
        assert_eq!(copy.handle(), None);
        assert_eq!(copy.priority(), 7.0);
        assert_eq!(copy.value(), &"b");
    }

    #[test]
    fn identity_is_not_equality() {
        let a = QueueEntry::new(1_u8, 1.0);
        let twin = QueueEntry::new(1_u8, 1.0);
        assert_eq!(a, twin);
        assert!(PriorityQueueElement::is_same(&&a, &&a));
        assert!(!PriorityQueueElement::is_same(&&a, &&twin));

        let shared = Rc::new(QueueEntry::new(2_u8, 2.0));
        let alias = Rc::clone(&shared);
        let other = Rc::new(QueueEntry::new(2_u8, 2.0));
        assert!(shared.is_same(&alias));
        assert!(!shared.is_same(&other));
    }

    #[test]
    fn error_codes_map_to_kinds() {
        assert_eq!(QueueError::Empty.kind(), ErrorKind::Empty);
        assert_eq!(QueueError::NotQueued.kind(), ErrorKind::NotFound);
        assert_eq!(QueueError::AlreadyQueued.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            QueueError::PriorityNotDecreased {
                current: 1.0,
                requested: 1.0
            }
            .kind(),
            ErrorKind::InvalidArgument
        );
    }
}
