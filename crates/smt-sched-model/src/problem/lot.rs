// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use smt_sched_core::prelude::MinuteDelta;

/// How a quantity is divided into batches at one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotStrategy {
    /// One batch of the full quantity.
    NoSplit,
    /// Repeated batches of the given size; the tail batch may be merged
    /// into its predecessor depending on the config.
    FixedQuantity(u32),
    /// The given number of near-equal batches.
    FixedBatches(u32),
    /// Near-equal batches of roughly the given percentage each, i.e.
    /// `ceil(100 / p)` batches.
    Percentage(u32),
    /// Batch size chosen automatically from the quantity.
    Auto,
}

/// Lot-split configuration for one (product, stage) pair or for a whole
/// product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LotConfig {
    pub strategy: LotStrategy,
    /// Quantities below this are never split.
    pub min_qty_to_split: u32,
    /// Smallest batch the shop floor will accept.
    pub min_batch_size: u32,
    /// Idle minutes required between consecutive batches at the same
    /// stage.
    pub min_gap: MinuteDelta,
    /// Whether a trailing batch smaller than `min_batch_size` is kept as
    /// its own batch or merged into the previous one.
    pub allow_small_last_batch: bool,
}

impl LotConfig {
    #[inline]
    pub fn new(strategy: LotStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_min_qty_to_split(mut self, qty: u32) -> Self {
        self.min_qty_to_split = qty;
        self
    }

    #[inline]
    pub fn with_min_batch_size(mut self, size: u32) -> Self {
        self.min_batch_size = size;
        self
    }

    #[inline]
    pub fn with_min_gap(mut self, gap: MinuteDelta) -> Self {
        self.min_gap = gap;
        self
    }

    #[inline]
    pub fn with_allow_small_last_batch(mut self, allow: bool) -> Self {
        self.allow_small_last_batch = allow;
        self
    }

    /// `true` if this config can produce more than one batch.
    #[inline]
    pub fn splits(&self) -> bool {
        !matches!(self.strategy, LotStrategy::NoSplit)
    }
}

impl Default for LotConfig {
    #[inline]
    fn default() -> Self {
        Self {
            strategy: LotStrategy::NoSplit,
            min_qty_to_split: 1,
            min_batch_size: 1,
            min_gap: MinuteDelta::new(0),
            allow_small_last_batch: true,
        }
    }
}
