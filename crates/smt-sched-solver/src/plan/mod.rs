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

pub mod priority;

use smt_sched_model::prelude::{LotConfig, LotStrategy, Product, ProductId, Routing, StageId};

/// Upper bound the auto strategy places on a single batch.
const AUTO_MAX_BATCH: u32 = 500;

/// An indivisible scheduling atom.
///
/// Either a whole-product batch traversing the full routing, or a
/// (product, stage, batch) triple under stage-level splitting. The two
/// modes are mutually exclusive per product within one solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkUnit {
    ProductBatch {
        product: ProductId,
        batch: u32,
        total: u32,
        qty: u32,
    },
    StageBatch {
        product: ProductId,
        stage: StageId,
        batch: u32,
        total: u32,
        qty: u32,
    },
}

impl WorkUnit {
    #[inline]
    pub fn product(&self) -> &ProductId {
        match self {
            WorkUnit::ProductBatch { product, .. } => product,
            WorkUnit::StageBatch { product, .. } => product,
        }
    }

    /// The stage this unit is pinned to; `None` for product-level
    /// batches, which traverse every stage of their routing.
    #[inline]
    pub fn stage(&self) -> Option<StageId> {
        match self {
            WorkUnit::ProductBatch { .. } => None,
            WorkUnit::StageBatch { stage, .. } => Some(*stage),
        }
    }

    /// 1-based batch number within its (product) or (product, stage)
    /// group.
    #[inline]
    pub fn batch(&self) -> u32 {
        match self {
            WorkUnit::ProductBatch { batch, .. } => *batch,
            WorkUnit::StageBatch { batch, .. } => *batch,
        }
    }

    #[inline]
    pub fn total_batches(&self) -> u32 {
        match self {
            WorkUnit::ProductBatch { total, .. } => *total,
            WorkUnit::StageBatch { total, .. } => *total,
        }
    }

    #[inline]
    pub fn qty(&self) -> u32 {
        match self {
            WorkUnit::ProductBatch { qty, .. } => *qty,
            WorkUnit::StageBatch { qty, .. } => *qty,
        }
    }
}

/// The batch sizes one lot config produces for `required` units.
///
/// The returned sizes are non-empty (for `required > 0`) and always sum
/// to `required`. Splitting is suppressed entirely below
/// `min_qty_to_split`.
pub fn plan_batch_sizes(required: u32, config: &LotConfig) -> Vec<u32> {
    if required == 0 {
        return Vec::new();
    }
    if !config.splits() || required < config.min_qty_to_split {
        return vec![required];
    }

    match config.strategy {
        LotStrategy::NoSplit => vec![required],
        LotStrategy::FixedQuantity(size) => fixed_quantity(required, size, config),
        LotStrategy::FixedBatches(count) => near_equal(required, count),
        LotStrategy::Percentage(percent) => {
            let percent = percent.clamp(1, 100);
            near_equal(required, (100 + percent - 1) / percent)
        }
        LotStrategy::Auto => {
            let size = (required / 4)
                .max(config.min_batch_size.max(1))
                .min(AUTO_MAX_BATCH);
            fixed_quantity(required, size, config)
        }
    }
}

/// Repeated batches of `size`; a short tail is merged into its
/// predecessor when small last batches are not allowed.
fn fixed_quantity(required: u32, size: u32, config: &LotConfig) -> Vec<u32> {
    if size == 0 || size >= required {
        return vec![required];
    }
    let mut sizes = Vec::with_capacity((required / size + 1) as usize);
    let mut remaining = required;
    while remaining > size {
        sizes.push(size);
        remaining -= size;
    }
    if remaining > 0 {
        if remaining < config.min_batch_size && !config.allow_small_last_batch && !sizes.is_empty()
        {
            let last = sizes.len() - 1;
            sizes[last] += remaining;
        } else {
            sizes.push(remaining);
        }
    }
    sizes
}

/// `count` near-equal batches; the remainder is spread one extra unit per
/// early batch.
fn near_equal(required: u32, count: u32) -> Vec<u32> {
    let count = count.clamp(1, required);
    let base = required / count;
    let extra = required % count;
    (0..count)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}

/// Materializes the work units of one product.
///
/// Stage-level mode (any per-stage split configured and lot splitting
/// enabled) yields one unit per (stage, batch); otherwise product-level
/// batches common to all stages are produced from the product-level
/// config.
pub fn plan_product_units(
    product: &Product,
    routing: &Routing,
    lot_splitting_enabled: bool,
) -> Vec<WorkUnit> {
    let required = product.required_qty();
    if required == 0 {
        return Vec::new();
    }

    let stage_mode = lot_splitting_enabled && product.has_stage_level_splitting();
    if stage_mode {
        let mut units = Vec::new();
        for step in routing.steps() {
            let default = LotConfig::default();
            let config = product.stage_lot_config(step.stage()).unwrap_or(&default);
            let sizes = plan_batch_sizes(required, config);
            let total = sizes.len() as u32;
            for (i, qty) in sizes.into_iter().enumerate() {
                units.push(WorkUnit::StageBatch {
                    product: product.id().clone(),
                    stage: step.stage(),
                    batch: i as u32 + 1,
                    total,
                    qty,
                });
            }
        }
        return units;
    }

    let sizes = match (lot_splitting_enabled, product.product_lot_config()) {
        (true, Some(config)) => plan_batch_sizes(required, config),
        _ => vec![required],
    };
    let total = sizes.len() as u32;
    sizes
        .into_iter()
        .enumerate()
        .map(|(i, qty)| WorkUnit::ProductBatch {
            product: product.id().clone(),
            batch: i as u32 + 1,
            total,
            qty,
        })
        .collect()
}
