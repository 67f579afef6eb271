//! A max heap that keeps at most `k` items.

use std::collections::BinaryHeap;

use rayon::prelude::*;

/// A max heap that keeps at most `k` items: the `k` smallest ever pushed.
///
/// This is how k-NN keeps its nearest neighbors while scanning the training
/// set. Push `(distance, index)` pairs to break distance ties by index.
pub struct SizedHeap<T: PartialOrd> {
    /// The heap of items.
    heap: BinaryHeap<HeapItem<T>>,
    /// The maximum size of the heap.
    k: usize,
}

impl<T: PartialOrd> SizedHeap<T> {
    /// Creates an empty `SizedHeap` that keeps at most `k` items.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(k),
            k,
        }
    }

    /// Pushes an item onto the heap, maintaining the max size.
    ///
    /// When the heap is full, the item replaces the current maximum only if
    /// it is strictly smaller.
    pub fn push(&mut self, item: T) {
        if self.heap.len() < self.k {
            self.heap.push(HeapItem(item));
        } else if let Some(top) = self.heap.peek() {
            if item < top.0 {
                self.heap.pop();
                self.heap.push(HeapItem(item));
            }
        }
    }

    /// Pushes several items onto the heap, maintaining the max size.
    pub fn extend<I: Iterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.push(item);
        }
    }

    /// Consumes the `SizedHeap` and returns the items in ascending order.
    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.heap.into_sorted_vec().into_iter().map(|HeapItem(x)| x).collect()
    }
}

impl<T: PartialOrd + Send + Sync> SizedHeap<T> {
    /// Parallel version of [`SizedHeap::extend`](crate::SizedHeap::extend).
    ///
    /// The items are collected in parallel and pushed in iteration order.
    pub fn par_extend<I: IndexedParallelIterator<Item = T>>(&mut self, items: I) {
        for item in items.collect::<Vec<_>>() {
            self.push(item);
        }
    }
}

/// A wrapper struct for implementing `Ord` on the items of a `SizedHeap`.
struct HeapItem<T: PartialOrd>(T);

impl<T: PartialOrd> PartialEq for HeapItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: PartialOrd> Eq for HeapItem<T> {}

impl<T: PartialOrd> PartialOrd for HeapItem<T> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: PartialOrd> Ord for HeapItem<T> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(core::cmp::Ordering::Less)
    }
}
