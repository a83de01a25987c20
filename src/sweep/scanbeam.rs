//! The queues of coordinates that drive the sweep.

use std::collections::BTreeSet;

/// The `y` coordinates where the sweep needs to stop.
///
/// The sweep goes from large `y` to small `y`, so this pops the largest one first.
#[derive(Clone, Debug, Default)]
pub(super) struct Scanbeam {
    ys: BTreeSet<i64>,
}

impl Scanbeam {
    pub fn insert(&mut self, y: i64) {
        self.ys.insert(y);
    }

    pub fn pop(&mut self) -> Option<i64> {
        self.ys.pop_last()
    }
}

/// The `x` coordinates of the local maxima within the current scanbeam,
/// sorted and without duplicates.
///
/// Only used when strictly simple output is requested: horizontal output
/// edges get an extra vertex wherever a maximum touches them.
#[derive(Clone, Debug, Default)]
pub(super) struct Maxima {
    xs: Vec<i64>,
}

impl Maxima {
    pub fn insert(&mut self, x: i64) {
        if let Err(pos) = self.xs.binary_search(&x) {
            self.xs.insert(pos, x);
        }
    }

    pub fn clear(&mut self) {
        self.xs.clear();
    }

    pub fn get(&self, idx: usize) -> Option<i64> {
        self.xs.get(idx).copied()
    }

    /// The position of the first maximum strictly between `start` and `end`,
    /// walking from `start` towards `end`.
    ///
    /// When walking right, the returned position should be stepped
    /// forwards; when walking left, it should be stepped backwards.
    pub fn first_between(&self, start: i64, end: i64) -> Option<usize> {
        if start < end {
            let idx = self.xs.partition_point(|&x| x <= start);
            (idx < self.xs.len() && self.xs[idx] < end).then_some(idx)
        } else {
            let idx = self.xs.partition_point(|&x| x < start).checked_sub(1)?;
            (self.xs[idx] > end).then_some(idx)
        }
    }
}
