use std::cmp::Ordering;

use crate::item::{render_lines, Item, Polarity, SortKey, SortOrder};

/// Array-backed binary heap over items, keyed by price. The min/max
/// polarity is fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct PriceHeap {
    items: Vec<Item>,
    polarity: Polarity,
}

impl PriceHeap {
    pub fn new(polarity: Polarity) -> Self {
        Self {
            items: Vec::new(),
            polarity,
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn peek(&self) -> Option<&Item> {
        self.items.first()
    }

    pub fn add(&mut self, item: Item) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    pub fn remove_top(&mut self) -> Option<Item> {
        if self.items.is_empty() {
            return None;
        }

        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let top = self.items.pop();

        if !self.items.is_empty() {
            self.sift_down(0);
        }

        top
    }

    /// Heap-array order, not sorted.
    pub fn display(&self) -> String {
        render_lines(&self.items)
    }

    /// Items under the given key and direction: a scratch copy is heapified
    /// under that comparator and drained; the heap itself is untouched.
    pub fn sorted_by(&self, key: SortKey, order: SortOrder) -> Vec<Item> {
        let mut scratch = self.items.clone();
        let first = |a: &Item, b: &Item| order.apply(a.compare_by(key, b)) == Ordering::Less;

        let mut index = scratch.len() / 2;
        while index > 0 {
            index -= 1;
            Self::sift_down_by(&mut scratch, index, &first);
        }

        let mut sorted = Vec::with_capacity(scratch.len());
        while !scratch.is_empty() {
            let last = scratch.len() - 1;
            scratch.swap(0, last);
            if let Some(item) = scratch.pop() {
                sorted.push(item);
            }
            if !scratch.is_empty() {
                Self::sift_down_by(&mut scratch, 0, &first);
            }
        }

        sorted
    }

    pub fn display_by(&self, key: SortKey, order: SortOrder) -> String {
        render_lines(&self.sorted_by(key, order))
    }

    // true when `a` belongs closer to the root than `b`
    fn heap_before(polarity: Polarity, a: &Item, b: &Item) -> bool {
        match polarity {
            Polarity::Min => a.price < b.price,
            Polarity::Max => a.price > b.price,
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if Self::heap_before(self.polarity, &self.items[index], &self.items[parent]) {
                self.items.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, index: usize) {
        let polarity = self.polarity;
        Self::sift_down_by(&mut self.items, index, &|a, b| {
            Self::heap_before(polarity, a, b)
        });
    }

    // comparisons are strict, so price ties never swap; on a tie between
    // the two children the left one keeps precedence
    fn sift_down_by<F>(items: &mut [Item], mut index: usize, first: &F)
    where
        F: Fn(&Item, &Item) -> bool,
    {
        let len = items.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut top = index;

            if left < len && first(&items[left], &items[top]) {
                top = left;
            }
            if right < len && first(&items[right], &items[top]) {
                top = right;
            }

            if top == index {
                break;
            }

            items.swap(index, top);
            index = top;
        }
    }
}
