//! Binary min-heap with element handles.
//!
//! Slot `i` has children `2i + 1` and `2i + 2` and parent `(i - 1) / 2`.
//! Every parent's priority is `<=` both children's.

use std::cmp::Ordering;
use std::slice;

use tracing::trace;

use super::{PriorityQueueElement, QueueError};

/// A min-priority queue over elements that track their own slot.
///
/// `E` is usually a shared reference (`&T`) or an `Rc<T>` so the caller can
/// keep reading an element's priority while it is queued. A handle only counts
/// as membership when the slot it names holds that very element
/// ([`PriorityQueueElement::is_same`]), never a value-equal copy.
#[derive(Debug)]
pub struct BinaryHeapMinPriorityQueue<E> {
    heap: Vec<E>,
}

impl<E> Default for BinaryHeapMinPriorityQueue<E> {
    fn default() -> Self {
        Self { heap: Vec::new() }
    }
}

impl<E> BinaryHeapMinPriorityQueue<E>
where
    E: PriorityQueueElement,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether `element` currently occupies a slot. O(1).
    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        element
            .handle()
            .and_then(|slot| self.heap.get(slot))
            .is_some_and(|occupant| occupant.is_same(element))
    }

    /// Elements in backing-slot order. `iter().next()` is the minimum.
    pub fn iter(&self) -> slice::Iter<'_, E> {
        self.heap.iter()
    }

    /// Add `element` and sift it up to its place. O(log n).
    ///
    /// # Errors
    ///
    /// - [`QueueError::AlreadyQueued`] if the element is already in this queue.
    /// - [`QueueError::InvalidPriority`] if its priority is NaN.
    pub fn insert(&mut self, element: E) -> Result<(), QueueError> {
        if self.contains(&element) {
            return Err(QueueError::AlreadyQueued);
        }
        if element.priority().is_nan() {
            return Err(QueueError::InvalidPriority);
        }

        let slot = self.heap.len();
        element.set_handle(Some(slot));
        self.heap.push(element);
        self.sift_up(slot);
        Ok(())
    }

    /// The element with the lowest priority. O(1).
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] if the queue has no elements.
    pub fn minimum(&self) -> Result<&E, QueueError> {
        self.heap.first().ok_or(QueueError::Empty)
    }

    /// Remove and return the element with the lowest priority. O(log n).
    ///
    /// The root's slot becomes a hole that is moved down by promoting the
    /// smaller child (the left one on ties) until it reaches a leaf. If that
    /// leaf is not the last slot, the last element fills it and sifts up, so
    /// the slot that disappears is always the last one.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] if the queue has no elements.
    pub fn extract_minimum(&mut self) -> Result<E, QueueError> {
        let Some(last) = self.heap.len().checked_sub(1) else {
            return Err(QueueError::Empty);
        };

        let mut hole = 0;
        loop {
            let left = 2 * hole + 1;
            if left > last {
                break;
            }
            let right = left + 1;
            let child = if right <= last && self.heap[right].priority() < self.heap[left].priority() {
                right
            } else {
                left
            };
            self.heap.swap(hole, child);
            self.heap[hole].set_handle(Some(hole));
            hole = child;
        }

        if hole != last {
            self.heap.swap(hole, last);
            self.heap[hole].set_handle(Some(hole));
        }
        let Some(minimum) = self.heap.pop() else {
            return Err(QueueError::Empty);
        };
        minimum.set_handle(None);

        if hole < self.heap.len() {
            self.sift_up(hole);
        }
        Ok(minimum)
    }

    /// Lower the priority of a queued element and sift it up. O(log n).
    ///
    /// The heap is untouched when this fails.
    ///
    /// # Errors
    ///
    /// - [`QueueError::NotQueued`] if the element is not in this queue.
    /// - [`QueueError::PriorityNotDecreased`] unless `priority` is strictly
    ///   less than the current priority (NaN never is).
    pub fn decrease_priority(&mut self, element: &E, priority: f64) -> Result<(), QueueError> {
        let Some(slot) = element.handle().filter(|_| self.contains(element)) else {
            return Err(QueueError::NotQueued);
        };
        let current = element.priority();
        if priority.partial_cmp(&current) != Some(Ordering::Less) {
            return Err(QueueError::PriorityNotDecreased {
                current,
                requested: priority,
            });
        }

        element.set_priority(priority);
        self.sift_up(slot);
        Ok(())
    }

    /// Remove every element, leaving each one's handle `None`.
    pub fn clear(&mut self) {
        for element in self.heap.drain(..) {
            element.set_handle(None);
        }
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[parent].priority() <= self.heap[slot].priority() {
                break;
            }
            self.heap.swap(parent, slot);
            self.heap[parent].set_handle(Some(parent));
            self.heap[slot].set_handle(Some(slot));
            slot = parent;
        }
        trace!(slot, len = self.heap.len(), "sift up settled");
    }
}

impl<'a, E> IntoIterator for &'a BinaryHeapMinPriorityQueue<E>
where
    E: PriorityQueueElement,
{
    type Item = &'a E;
    type IntoIter = slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::queue::QueueEntry;

    fn entries(priorities: &[f64]) -> Vec<QueueEntry<usize>> {
        priorities
            .iter()
            .enumerate()
            .map(|(i, p)| QueueEntry::new(i, *p))
            .collect()
    }

    fn assert_invariants<E: PriorityQueueElement>(queue: &BinaryHeapMinPriorityQueue<E>) {
        for (slot, element) in queue.iter().enumerate() {
            assert_eq!(element.handle(), Some(slot), "handle out of sync at slot {slot}");
            if slot > 0 {
                let parent = &queue.heap[(slot - 1) / 2];
                assert!(parent.priority() <= element.priority(), "heap order broken at slot {slot}");
            }
        }
    }

    #[test]
    fn empty_queue_has_no_minimum() {
        let mut queue: BinaryHeapMinPriorityQueue<&QueueEntry<usize>> = BinaryHeapMinPriorityQueue::new();
        assert_eq!(queue.minimum(), Err(QueueError::Empty));
        assert_eq!(queue.extract_minimum(), Err(QueueError::Empty));
        assert_eq!(QueueError::Empty.kind(), ErrorKind::Empty);
    }

    #[test]
    fn extracts_in_priority_order() {
        let items = entries(&[5.0, 3.0, 8.0, 1.0, 9.0, 2.0, 7.0]);
        let mut queue = BinaryHeapMinPriorityQueue::with_capacity(items.len());
        for item in &items {
            queue.insert(item).expect("not yet queued");
            assert_invariants(&queue);
        }

        let mut order = Vec::new();
        while let Ok(item) = queue.extract_minimum() {
            assert_eq!(item.handle(), None);
            assert_invariants(&queue);
            order.push(item.priority());
        }
        assert_eq!(order, vec![1.0, 2.0, 3.0, 5.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn hole_reaching_a_non_final_leaf_keeps_the_tree_complete() {
        // Root's smaller child lies on the left, so the hole ends at a leaf
        // that is not the last slot.
        let items = entries(&[0.0, 1.0, 5.0, 2.0, 3.0, 6.0, 7.0]);
        let mut queue = BinaryHeapMinPriorityQueue::new();
        for item in &items {
            queue.insert(item).expect("not yet queued");
        }

        let first = queue.extract_minimum().expect("non-empty");
        assert_eq!(first.value(), &0);
        assert_eq!(queue.len(), 6);
        assert_invariants(&queue);
        assert!(queue.iter().all(|e| queue.contains(e)));
    }

    #[test]
    fn minimum_does_not_mutate() {
        let items = entries(&[4.0, 2.0]);
        let mut queue = BinaryHeapMinPriorityQueue::new();
        queue.insert(&items[0]).expect("not yet queued");
        queue.insert(&items[1]).expect("not yet queued");

        assert_eq!(queue.minimum().map(|e| *e.value()), Ok(1));
        assert_eq!(queue.minimum().map(|e| *e.value()), Ok(1));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn decrease_priority_moves_element_up() {
        let items = entries(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut queue = BinaryHeapMinPriorityQueue::new();
        for item in &items {
            queue.insert(item).expect("not yet queued");
        }

        queue.decrease_priority(&&items[4], 0.5).expect("queued and lower");
        assert_invariants(&queue);
        assert_eq!(queue.minimum().map(|e| *e.value()), Ok(4));
        assert_eq!(items[4].priority(), 0.5);
    }

    #[test]
    fn decrease_priority_rejects_equal_or_higher() {
        let items = entries(&[1.0, 2.0]);
        let mut queue = BinaryHeapMinPriorityQueue::new();
        queue.insert(&items[0]).expect("not yet queued");
        queue.insert(&items[1]).expect("not yet queued");

        for requested in [2.0, 3.0, f64::NAN] {
            let err = queue
                .decrease_priority(&&items[1], requested)
                .expect_err("not a decrease");
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            assert_eq!(items[1].priority(), 2.0);
            assert_eq!(items[1].handle(), Some(1));
        }
    }

    #[test]
    fn decrease_priority_requires_membership() {
        let items = entries(&[1.0, 2.0]);
        let mut queue = BinaryHeapMinPriorityQueue::new();
        queue.insert(&items[0]).expect("not yet queued");

        assert_eq!(queue.decrease_priority(&&items[1], 0.0), Err(QueueError::NotQueued));

        let extracted = queue.extract_minimum().expect("non-empty");
        assert_eq!(queue.decrease_priority(&extracted, 0.0), Err(QueueError::NotQueued));
    }

    #[test]
    fn insert_rejects_duplicates_and_nan() {
        let item = QueueEntry::new("a", 1.0);
        let bad = QueueEntry::new("b", f64::NAN);
        let mut queue = BinaryHeapMinPriorityQueue::new();

        queue.insert(&item).expect("not yet queued");
        assert_eq!(queue.insert(&item), Err(QueueError::AlreadyQueued));
        assert_eq!(queue.insert(&bad), Err(QueueError::InvalidPriority));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn stale_handle_from_another_queue_is_not_membership() {
        let a = QueueEntry::new("a", 1.0);
        let b = QueueEntry::new("b", 2.0);
        let mut first = BinaryHeapMinPriorityQueue::new();
        let mut second = BinaryHeapMinPriorityQueue::new();

        first.insert(&a).expect("not yet queued");
        second.insert(&b).expect("not yet queued");

        // Both handles are Some(0) but each queue only holds its own entry.
        assert!(first.contains(&&a));
        assert!(!first.contains(&&b));
    }

    #[test]
    fn copy_of_a_queued_entry_is_not_a_member() {
        let items = entries(&[3.0, 7.0, 9.0]);
        let mut queue = BinaryHeapMinPriorityQueue::new();
        for item in &items {
            queue.insert(item).expect("not yet queued");
        }

        // A look-alike that even carries the queued entry's handle.
        let copy = QueueEntry::new(1_usize, 7.0);
        copy.set_handle(items[1].handle());
        assert_eq!(copy, items[1]);

        assert!(!queue.contains(&&copy));
        assert_eq!(queue.decrease_priority(&&copy, 1.0), Err(QueueError::NotQueued));
        assert_eq!(items[1].priority(), 7.0);
        assert_eq!(copy.priority(), 7.0);

        let cloned = items[1].clone();
        assert!(!queue.contains(&&cloned));
        assert_eq!(queue.insert(&cloned), Ok(()));
        assert_invariants(&queue);
    }

    #[test]
    fn decrease_through_the_wrong_queue_leaves_both_intact() {
        let s = QueueEntry::new("s", 2.0);
        let x1 = QueueEntry::new("x", 5.0);
        let x2 = QueueEntry::new("x", 5.0);
        let pad = QueueEntry::new("pad", 1.0);
        let mut first = BinaryHeapMinPriorityQueue::new();
        let mut second = BinaryHeapMinPriorityQueue::new();
        first.insert(&x1).expect("not yet queued");
        first.insert(&pad).expect("not yet queued");
        second.insert(&s).expect("not yet queued");
        second.insert(&x2).expect("not yet queued");

        // x2's handle names slot 1, which exists in `first` too.
        assert_eq!(x2.handle(), Some(1));
        assert_eq!(first.decrease_priority(&&x2, 0.0), Err(QueueError::NotQueued));
        assert_eq!(x2.priority(), 5.0);
        assert_invariants(&first);
        assert_invariants(&second);
        assert_eq!(second.minimum().map(|e| *e.value()), Ok("s"));
    }

    #[test]
    fn clear_releases_handles() {
        let items = entries(&[3.0, 1.0, 2.0]);
        let mut queue = BinaryHeapMinPriorityQueue::new();
        for item in &items {
            queue.insert(item).expect("not yet queued");
        }

        queue.clear();
        assert!(queue.is_empty());
        assert!(items.iter().all(|item| item.handle().is_none()));
        assert_eq!(queue.minimum(), Err(QueueError::Empty));

        queue.insert(&items[0]).expect("cleared entries can be re-inserted");
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn reinserted_element_gets_a_fresh_handle() {
        let items = entries(&[1.0, 2.0, 3.0]);
        let mut queue = BinaryHeapMinPriorityQueue::new();
        for item in &items {
            queue.insert(item).expect("not yet queued");
        }

        let min = queue.extract_minimum().expect("non-empty");
        min.set_priority(10.0);
        queue.insert(min).expect("extracted entries can be re-inserted");
        assert_eq!(items[0].handle(), Some(queue.len() - 1));
        assert_invariants(&queue);
    }

    #[test]
    fn rc_elements() {
        use std::rc::Rc;

        let shared: Vec<Rc<QueueEntry<char>>> = ['x', 'y', 'z']
            .into_iter()
            .zip([3.0, 1.0, 2.0])
            .map(|(c, p)| Rc::new(QueueEntry::new(c, p)))
            .collect();

        let mut queue = BinaryHeapMinPriorityQueue::new();
        for entry in &shared {
            queue.insert(Rc::clone(entry)).expect("not yet queued");
        }
        queue.decrease_priority(&shared[0], 0.0).expect("queued and lower");

        let drained: Vec<char> = std::iter::from_fn(|| queue.extract_minimum().ok())
            .map(|e| *e.value())
            .collect();
        assert_eq!(drained, vec!['x', 'y', 'z']);
    }
}
