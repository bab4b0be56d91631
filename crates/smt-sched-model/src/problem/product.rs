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

use crate::common::{ProductId, StageId};
use crate::problem::err::DueNotAfterReleaseError;
use crate::problem::lot::LotConfig;
use crate::problem::stage::Stage;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Priority tier of an order. Lower rank sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriorityClass {
    Critical,
    High,
    Standard,
    Low,
}

impl PriorityClass {
    #[inline]
    pub fn rank(&self) -> u8 {
        match self {
            PriorityClass::Critical => 0,
            PriorityClass::High => 1,
            PriorityClass::Standard => 2,
            PriorityClass::Low => 3,
        }
    }
}

impl Default for PriorityClass {
    #[inline]
    fn default() -> Self {
        PriorityClass::Standard
    }
}

impl std::fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PriorityClass::Critical => "Critical",
            PriorityClass::High => "High",
            PriorityClass::Standard => "Standard",
            PriorityClass::Low => "Low",
        };
        write!(f, "{}", s)
    }
}

/// An order position to schedule.
///
/// The quantity that actually needs production is
/// `max(0, order_qty - stock_qty)`; the constructor enforces
/// `due > release`.
#[derive(Debug, Clone)]
pub struct Product {
    id: ProductId,
    name: String,
    order_qty: u32,
    stock_qty: u32,
    feeder_slots: u32,
    release: NaiveDateTime,
    due: NaiveDateTime,
    priority: PriorityClass,
    stage_lot_configs: HashMap<StageId, LotConfig>,
    product_lot_config: Option<LotConfig>,
    stage_names: HashMap<StageId, String>,
    name_pattern: Option<String>,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        order_qty: u32,
        release: NaiveDateTime,
        due: NaiveDateTime,
    ) -> Result<Self, DueNotAfterReleaseError> {
        if due <= release {
            return Err(DueNotAfterReleaseError::new(id, release, due));
        }
        Ok(Self {
            id,
            name: name.into(),
            order_qty,
            stock_qty: 0,
            feeder_slots: 0,
            release,
            due,
            priority: PriorityClass::default(),
            stage_lot_configs: HashMap::new(),
            product_lot_config: None,
            stage_names: HashMap::new(),
            name_pattern: None,
        })
    }

    #[inline]
    pub fn with_stock_qty(mut self, qty: u32) -> Self {
        self.stock_qty = qty;
        self
    }

    #[inline]
    pub fn with_feeder_slots(mut self, slots: u32) -> Self {
        self.feeder_slots = slots;
        self
    }

    #[inline]
    pub fn with_priority(mut self, priority: PriorityClass) -> Self {
        self.priority = priority;
        self
    }

    /// Lot-split config applying to one stage only. Any stage-level config
    /// switches the whole product into stage-level splitting mode.
    #[inline]
    pub fn with_stage_lot_config(mut self, stage: StageId, config: LotConfig) -> Self {
        self.stage_lot_configs.insert(stage, config);
        self
    }

    /// Lot-split config applying to the product across all stages.
    #[inline]
    pub fn with_product_lot_config(mut self, config: LotConfig) -> Self {
        self.product_lot_config = Some(config);
        self
    }

    #[inline]
    pub fn with_stage_name(mut self, stage: StageId, name: impl Into<String>) -> Self {
        self.stage_names.insert(stage, name.into());
        self
    }

    /// Display-name pattern with `{name}` and `{stage}` placeholders,
    /// e.g. `"{name}-{stage}"`.
    #[inline]
    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    #[inline]
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn order_qty(&self) -> u32 {
        self.order_qty
    }

    #[inline]
    pub fn stock_qty(&self) -> u32 {
        self.stock_qty
    }

    #[inline]
    pub fn feeder_slots(&self) -> u32 {
        self.feeder_slots
    }

    /// Units that must actually be produced.
    #[inline]
    pub fn required_qty(&self) -> u32 {
        self.order_qty.saturating_sub(self.stock_qty)
    }

    #[inline]
    pub fn release(&self) -> NaiveDateTime {
        self.release
    }

    #[inline]
    pub fn due(&self) -> NaiveDateTime {
        self.due
    }

    #[inline]
    pub fn priority(&self) -> PriorityClass {
        self.priority
    }

    #[inline]
    pub fn stage_lot_config(&self, stage: StageId) -> Option<&LotConfig> {
        self.stage_lot_configs.get(&stage)
    }

    #[inline]
    pub fn iter_stage_lot_configs(&self) -> impl Iterator<Item = (StageId, &LotConfig)> {
        self.stage_lot_configs.iter().map(|(s, c)| (*s, c))
    }

    #[inline]
    pub fn product_lot_config(&self) -> Option<&LotConfig> {
        self.product_lot_config.as_ref()
    }

    /// `true` if any stage-level split config is present; stage-level and
    /// product-level splitting are mutually exclusive per product, and
    /// stage-level wins.
    #[inline]
    pub fn has_stage_level_splitting(&self) -> bool {
        self.stage_lot_configs.values().any(|c| c.splits())
    }

    /// The name shown for this product at `stage`.
    ///
    /// Resolution: explicit per-stage name, then the name pattern, then
    /// the product name. With `naming_enabled = false` the product name is
    /// always used.
    pub fn display_name_at(&self, stage: &Stage, naming_enabled: bool) -> String {
        if !naming_enabled {
            return self.name.clone();
        }
        if let Some(explicit) = self.stage_names.get(&stage.id()) {
            return explicit.clone();
        }
        if let Some(pattern) = &self.name_pattern {
            return pattern
                .replace("{name}", &self.name)
                .replace("{stage}", &stage.order().to_string());
        }
        self.name.clone()
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Product {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[inline]
    fn dt(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn product(order: u32, stock: u32) -> Product {
        Product::new(ProductId::from("PCB-A"), "Board A", order, dt(2, 8), dt(9, 17))
            .unwrap()
            .with_stock_qty(stock)
    }

    #[test]
    fn test_required_qty_rule() {
        assert_eq!(product(500, 0).required_qty(), 500);
        assert_eq!(product(500, 120).required_qty(), 380);
        // Stock exceeding the order clamps to zero, no underflow.
        assert_eq!(product(100, 150).required_qty(), 0);
    }

    #[test]
    fn test_due_must_follow_release() {
        let err = Product::new(ProductId::from("X"), "x", 1, dt(9, 17), dt(2, 8)).unwrap_err();
        assert!(err.to_string().contains("due"));
        assert!(Product::new(ProductId::from("X"), "x", 1, dt(2, 8), dt(2, 9)).is_ok());
    }

    #[test]
    fn test_priority_ranks() {
        assert!(PriorityClass::Critical.rank() < PriorityClass::High.rank());
        assert!(PriorityClass::High.rank() < PriorityClass::Standard.rank());
        assert!(PriorityClass::Standard.rank() < PriorityClass::Low.rank());
        assert_eq!(PriorityClass::default(), PriorityClass::Standard);
    }

    #[test]
    fn test_stage_level_splitting_detection() {
        use crate::problem::lot::{LotConfig, LotStrategy};

        let plain = product(100, 0);
        assert!(!plain.has_stage_level_splitting());

        let with_nosplit_entry = product(100, 0)
            .with_stage_lot_config(StageId::new(1), LotConfig::new(LotStrategy::NoSplit));
        assert!(!with_nosplit_entry.has_stage_level_splitting());

        let split = product(100, 0).with_stage_lot_config(
            StageId::new(1),
            LotConfig::new(LotStrategy::FixedBatches(4)),
        );
        assert!(split.has_stage_level_splitting());
    }

    #[test]
    fn test_display_name_resolution() {
        let stage = Stage::new(StageId::new(2), "Pick & Place", 20);

        let plain = product(1, 0);
        assert_eq!(plain.display_name_at(&stage, true), "Board A");

        let patterned = product(1, 0).with_name_pattern("{name}-{stage}");
        assert_eq!(patterned.display_name_at(&stage, true), "Board A-20");
        // Naming disabled falls back to the product name.
        assert_eq!(patterned.display_name_at(&stage, false), "Board A");

        let explicit = product(1, 0)
            .with_name_pattern("{name}-{stage}")
            .with_stage_name(StageId::new(2), "Board A placement");
        assert_eq!(explicit.display_name_at(&stage, true), "Board A placement");
    }
}
