use rust_decimal::Decimal;

use crate::side::Side;

/// Direction-aware min-heap over distinct price points.
///
/// Every price is stored internally multiplied by `-side.value()`, so the
/// same binary-heap code serves both sides: Buy negates prices (so the
/// largest original price sorts as the smallest internal value, landing at
/// the root), Sell stores prices unchanged (the smallest original price is
/// already the smallest internal value). The root (`heap[0]`) is always the
/// side's best price.
///
/// `std::collections::BinaryHeap` doesn't expose arbitrary removal or a
/// partial-selection `top(n)` without consuming itself, so this is a
/// hand-rolled array-backed binary heap (sift-up/sift-down over `Vec`),
/// directly translating `orderbook/core.py::PriceHeap`'s use of `heapq`.
#[derive(Debug, Clone)]
pub struct PriceHeap {
    side: Side,
    heap: Vec<Decimal>,
    worst_internal: Option<Decimal>,
}

impl PriceHeap {
    pub fn new(side: Side) -> Self {
        PriceHeap {
            side,
            heap: Vec::new(),
            worst_internal: None,
        }
    }

    fn multiplier(&self) -> Decimal {
        Decimal::from(-self.side.value() as i64)
    }

    fn to_internal(&self, price: Decimal) -> Decimal {
        price * self.multiplier()
    }

    fn from_internal(&self, internal: Decimal) -> Decimal {
        internal * self.multiplier()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Best price on this side; empty sentinel is `Decimal::MAX` for Sell,
    /// `Decimal::ZERO` for Buy (`Decimal` has no infinity, so `MAX` stands
    /// in for `+∞`).
    pub fn best_price(&self) -> Decimal {
        match self.heap.first() {
            Some(&internal) => self.from_internal(internal),
            None => match self.side {
                Side::Sell => Decimal::MAX,
                Side::Buy => Decimal::ZERO,
            },
        }
    }

    /// Worst (furthest-from-best) price seen; empty sentinel is the
    /// opposite of `best_price`'s.
    pub fn worst_price(&self) -> Decimal {
        match self.worst_internal {
            Some(internal) => self.from_internal(internal),
            None => match self.side {
                Side::Sell => Decimal::ZERO,
                Side::Buy => Decimal::MAX,
            },
        }
    }

    pub fn push(&mut self, price: Decimal) {
        let internal = self.to_internal(price);
        match self.worst_internal {
            Some(worst) if internal <= worst => {}
            _ => self.worst_internal = Some(internal),
        }
        self.heap.push(internal);
        self.sift_up(self.heap.len() - 1);
    }

    pub fn pop(&mut self) -> Option<Decimal> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let internal = self.heap.pop().unwrap();
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(self.from_internal(internal))
    }

    /// Removes `price` from the heap if present. Silently ignores a missing
    /// price (logs at `warn`) — cancel-by-price on an already-emptied level
    /// must be idempotent, not an error.
    pub fn remove(&mut self, price: Decimal) {
        let internal = self.to_internal(price);
        match self.heap.iter().position(|&p| p == internal) {
            Some(idx) => {
                self.heap.remove(idx);
                self.heapify();
            }
            None => {
                tracing::warn!(%price, "PriceHeap::remove: price not present, ignoring");
            }
        }
    }

    /// The `n` best prices, best-first. O(n) via partial selection rather
    /// than a full sort.
    pub fn top(&self, n: usize) -> Vec<Decimal> {
        let n = n.min(self.heap.len());
        if n == 0 {
            return Vec::new();
        }
        let mut copy = self.heap.clone();
        if n < copy.len() {
            copy.select_nth_unstable(n - 1);
            copy.truncate(n);
        }
        copy.sort_unstable();
        copy.into_iter().map(|internal| self.from_internal(internal)).collect()
    }

    pub fn get(&self, idx: usize) -> Option<Decimal> {
        self.heap.get(idx).map(|&internal| self.from_internal(internal))
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.heap[idx] < self.heap[parent] {
                self.heap.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut smallest = idx;
            if left < len && self.heap[left] < self.heap[smallest] {
                smallest = left;
            }
            if right < len && self.heap[right] < self.heap[smallest] {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.heap.swap(idx, smallest);
            idx = smallest;
        }
    }

    fn heapify(&mut self) {
        if self.heap.len() < 2 {
            return;
        }
        for idx in (0..self.heap.len() / 2).rev() {
            self.sift_down(idx);
        }
    }
}
