//! Random insert / extract / decrease sequences against the handle heap.
//!
//! After every operation each queued entry's handle must point at its own
//! slot and every parent must be no larger than its children.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wayfind_core::queue::{BinaryHeapMinPriorityQueue, PriorityQueueElement, QueueEntry};

const POOL: usize = 32;

#[derive(Debug, Arbitrary)]
enum HeapOp {
    Insert { slot: u8, priority: u16 },
    ExtractMinimum,
    Decrease { slot: u8, by: u16 },
    Clear,
}

fuzz_target!(|ops: Vec<HeapOp>| {
    if ops.len() > 2000 {
        return;
    }

    let pool: Vec<QueueEntry<usize>> = (0..POOL).map(|i| QueueEntry::new(i, 0.0)).collect();
    let mut queue: BinaryHeapMinPriorityQueue<&QueueEntry<usize>> = BinaryHeapMinPriorityQueue::new();
    let mut last_extracted: Option<f64> = None;

    for op in &ops {
        match *op {
            HeapOp::Insert { slot, priority } => {
                let entry = &pool[usize::from(slot) % POOL];
                if !queue.contains(&entry) {
                    entry.set_priority(f64::from(priority));
                    queue.insert(entry).expect("entry was not queued");
                    last_extracted = None;
                }
            }
            HeapOp::ExtractMinimum => match queue.extract_minimum() {
                Ok(entry) => {
                    assert!(entry.handle().is_none());
                    if let Some(previous) = last_extracted {
                        assert!(entry.priority() >= previous, "extraction went backwards");
                    }
                    last_extracted = Some(entry.priority());
                }
                Err(_) => assert!(queue.is_empty()),
            },
            HeapOp::Decrease { slot, by } => {
                let entry = &pool[usize::from(slot) % POOL];
                let target = entry.priority() - f64::from(by) - 1.0;
                let result = queue.decrease_priority(&entry, target);
                assert_eq!(result.is_ok(), queue.contains(&entry));
                last_extracted = None;
            }
            HeapOp::Clear => {
                queue.clear();
                assert!(pool.iter().all(|entry| entry.handle().is_none()));
            }
        }

        let heap: Vec<_> = queue.iter().collect();
        for (index, entry) in heap.iter().enumerate() {
            assert_eq!(entry.handle(), Some(index), "handle out of sync");
            if index > 0 {
                assert!(heap[(index - 1) / 2].priority() <= entry.priority(), "heap order broken");
            }
        }
    }
});
