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

use crate::common::{LineId, ProductId, StageId};
use crate::problem::err::{EmptyRoutingError, NonIncreasingSequenceError, RoutingError};
use crate::problem::line::Line;
use crate::problem::stage::StageCatalog;
use smt_sched_core::prelude::MinuteDelta;
use std::collections::{BTreeSet, HashMap};

/// One step of a routing: a stage visit with its local parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStep {
    stage: StageId,
    sequence: u32,
    /// When present, only these lines may run the step.
    allowed_lines: Option<BTreeSet<LineId>>,
    multiplier: f64,
    fixed_minutes: f64,
}

impl RouteStep {
    #[inline]
    pub fn new(stage: StageId, sequence: u32) -> Self {
        Self {
            stage,
            sequence,
            allowed_lines: None,
            multiplier: 1.0,
            fixed_minutes: 0.0,
        }
    }

    #[inline]
    pub fn with_allowed_lines<I>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = LineId>,
    {
        self.allowed_lines = Some(lines.into_iter().collect());
        self
    }

    #[inline]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    #[inline]
    pub fn with_fixed_minutes(mut self, minutes: f64) -> Self {
        self.fixed_minutes = minutes;
        self
    }

    #[inline]
    pub fn stage(&self) -> StageId {
        self.stage
    }

    #[inline]
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    #[inline]
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    #[inline]
    pub fn fixed_minutes(&self) -> f64 {
        self.fixed_minutes
    }

    /// The explicit allowed-line filter, `None` when every line is
    /// admitted.
    #[inline]
    pub fn allowed_lines_iter(&self) -> Option<impl Iterator<Item = &LineId>> {
        self.allowed_lines.as_ref().map(|set| set.iter())
    }

    /// `true` if the step's allowed-line filter admits `line`.
    #[inline]
    pub fn admits(&self, line: &LineId) -> bool {
        match &self.allowed_lines {
            Some(set) => set.contains(line),
            None => true,
        }
    }
}

/// The ordered stage sequence of one product, with its lead-time
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Routing {
    steps: Vec<RouteStep>,
    /// Minutes per unit before complexity and step multipliers.
    base_leadtime: f64,
    complexity: f64,
    /// Per-stage replacement of `base_leadtime`.
    leadtime_overrides: HashMap<StageId, f64>,
}

impl Routing {
    /// Creates a routing. Steps must be non-empty with strictly increasing
    /// sequence numbers.
    pub fn new(
        product: &ProductId,
        steps: Vec<RouteStep>,
        base_leadtime: f64,
        complexity: f64,
    ) -> Result<Self, RoutingError> {
        if steps.is_empty() {
            return Err(EmptyRoutingError::new(product.clone()).into());
        }
        for pair in steps.windows(2) {
            if pair[1].sequence() <= pair[0].sequence() {
                return Err(NonIncreasingSequenceError::new(
                    product.clone(),
                    pair[0].sequence(),
                    pair[1].sequence(),
                )
                .into());
            }
        }
        Ok(Self {
            steps,
            base_leadtime,
            complexity,
            leadtime_overrides: HashMap::new(),
        })
    }

    #[inline]
    pub fn with_leadtime_override(mut self, stage: StageId, minutes_per_unit: f64) -> Self {
        self.leadtime_overrides.insert(stage, minutes_per_unit);
        self
    }

    #[inline]
    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    #[inline]
    pub fn step_for(&self, stage: StageId) -> Option<&RouteStep> {
        self.steps.iter().find(|s| s.stage() == stage)
    }

    #[inline]
    pub fn base_leadtime(&self) -> f64 {
        self.base_leadtime
    }

    #[inline]
    pub fn complexity(&self) -> f64 {
        self.complexity
    }

    /// Effective per-unit lead time at `stage`, in minutes:
    /// `(override | base) * complexity * multiplier + fixed_minutes`.
    ///
    /// `None` when the routing does not visit `stage`.
    pub fn effective_leadtime(&self, stage: StageId) -> Option<f64> {
        let step = self.step_for(stage)?;
        let base = self
            .leadtime_overrides
            .get(&stage)
            .copied()
            .unwrap_or(self.base_leadtime);
        Some(base * self.complexity * step.multiplier() + step.fixed_minutes())
    }

    /// Processing minutes for `quantity` units at `stage` on `line`:
    /// `ceil(effective_leadtime * quantity / efficiency)`.
    ///
    /// `None` when the stage is not routed, the line does not support it,
    /// or the step's allowed-line filter excludes the line — the line is
    /// not a candidate.
    pub fn processing_time(
        &self,
        stage: StageId,
        quantity: u32,
        line: &Line,
    ) -> Option<MinuteDelta> {
        let step = self.step_for(stage)?;
        if !step.admits(line.id()) {
            return None;
        }
        let efficiency = line.efficiency_at(stage)?;
        let leadtime = self.effective_leadtime(stage)?;
        let minutes = (leadtime * f64::from(quantity) / efficiency).ceil();
        Some(MinuteDelta::new(minutes as i64))
    }
}

/// All routings of a solve call, keyed by product.
///
/// This is an explicit, owned catalog: products without a configured
/// routing get a synthesized default traversing every stage in declared
/// order with a uniform base lead time. Nothing here is process-global.
#[derive(Debug, Clone)]
pub struct RoutingCatalog {
    routings: HashMap<ProductId, Routing>,
    default_base_leadtime: f64,
}

impl RoutingCatalog {
    #[inline]
    pub fn new(default_base_leadtime: f64) -> Self {
        Self {
            routings: HashMap::new(),
            default_base_leadtime,
        }
    }

    #[inline]
    pub fn insert(&mut self, product: ProductId, routing: Routing) -> Option<Routing> {
        self.routings.insert(product, routing)
    }

    #[inline]
    pub fn configured(&self, product: &ProductId) -> Option<&Routing> {
        self.routings.get(product)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&ProductId, &Routing)> {
        self.routings.iter()
    }

    #[inline]
    pub fn default_base_leadtime(&self) -> f64 {
        self.default_base_leadtime
    }

    /// The routing used for `product`: the configured one when custom
    /// routing is enabled and present, otherwise the synthesized default
    /// over all stages.
    pub fn resolve(
        &self,
        product: &ProductId,
        stages: &StageCatalog,
        custom_enabled: bool,
    ) -> Routing {
        if custom_enabled {
            if let Some(routing) = self.configured(product) {
                return routing.clone();
            }
        }
        self.default_routing(product, stages)
    }

    /// Synthesized routing visiting every stage in declared order.
    pub fn default_routing(&self, product: &ProductId, stages: &StageCatalog) -> Routing {
        let steps = stages
            .iter_ordered()
            .enumerate()
            .map(|(i, stage)| RouteStep::new(stage.id(), (i as u32 + 1) * 10))
            .collect();
        Routing::new(product, steps, self.default_base_leadtime, 1.0)
            .expect("default routing over a non-empty stage catalog is well-formed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::stage::Stage;

    #[inline]
    fn sid(n: u32) -> StageId {
        StageId::new(n)
    }
    #[inline]
    fn pid(s: &str) -> ProductId {
        ProductId::from(s)
    }
    #[inline]
    fn lid(s: &str) -> LineId {
        LineId::from(s)
    }

    fn line_with(stage: u32, efficiency: f64) -> Line {
        Line::new(lid("SMT-1"), "one")
            .with_capability(sid(stage), efficiency)
            .unwrap()
    }

    #[test]
    fn test_sequence_must_strictly_increase() {
        let steps = vec![RouteStep::new(sid(1), 10), RouteStep::new(sid(2), 10)];
        let err = Routing::new(&pid("P"), steps, 1.0, 1.0).unwrap_err();
        assert!(matches!(err, RoutingError::NonIncreasingSequence(_)));

        let err = Routing::new(&pid("P"), vec![], 1.0, 1.0).unwrap_err();
        assert!(matches!(err, RoutingError::Empty(_)));
    }

    #[test]
    fn test_effective_leadtime_formula() {
        let steps = vec![
            RouteStep::new(sid(1), 10).with_multiplier(2.0).with_fixed_minutes(5.0),
            RouteStep::new(sid(2), 20),
        ];
        let routing = Routing::new(&pid("P"), steps, 0.5, 1.2)
            .unwrap()
            .with_leadtime_override(sid(2), 1.0);

        // base * complexity * multiplier + fixed = 0.5 * 1.2 * 2.0 + 5.0
        assert_eq!(routing.effective_leadtime(sid(1)), Some(6.2));
        // Override replaces the base lead time: 1.0 * 1.2 * 1.0 + 0.0
        assert!((routing.effective_leadtime(sid(2)).unwrap() - 1.2).abs() < 1e-9);
        assert_eq!(routing.effective_leadtime(sid(3)), None);
    }

    #[test]
    fn test_processing_time_rounds_up() {
        let routing = Routing::new(
            &pid("P"),
            vec![RouteStep::new(sid(1), 10)],
            0.5,
            1.0,
        )
        .unwrap();

        // 0.5 min/unit * 100 / 1.0 = 50
        let line = line_with(1, 1.0);
        assert_eq!(
            routing.processing_time(sid(1), 100, &line),
            Some(MinuteDelta::new(50))
        );

        // 0.5 * 100 / 1.5 = 33.33.. -> 34
        let fast = line_with(1, 1.5);
        assert_eq!(
            routing.processing_time(sid(1), 100, &fast),
            Some(MinuteDelta::new(34))
        );
    }

    #[test]
    fn test_processing_time_candidate_filtering() {
        let routing = Routing::new(
            &pid("P"),
            vec![RouteStep::new(sid(1), 10).with_allowed_lines([lid("SMT-2")])],
            1.0,
            1.0,
        )
        .unwrap();

        // Supported stage, but the allowed-line filter excludes SMT-1.
        let line = line_with(1, 1.0);
        assert_eq!(routing.processing_time(sid(1), 10, &line), None);

        // Unsupported stage is never a candidate either.
        let routing_open = Routing::new(
            &pid("P"),
            vec![RouteStep::new(sid(2), 10)],
            1.0,
            1.0,
        )
        .unwrap();
        assert_eq!(routing_open.processing_time(sid(2), 10, &line), None);
    }

    #[test]
    fn test_catalog_resolution() {
        let stages: StageCatalog = [
            Stage::new(sid(1), "Solder Paste", 10),
            Stage::new(sid(2), "Reflow", 20),
        ]
        .into_iter()
        .collect();

        let mut catalog = RoutingCatalog::new(1.0);
        let custom = Routing::new(&pid("P"), vec![RouteStep::new(sid(2), 10)], 2.0, 1.0).unwrap();
        catalog.insert(pid("P"), custom);

        // Custom routing enabled and configured: single-stage routing.
        let resolved = catalog.resolve(&pid("P"), &stages, true);
        assert_eq!(resolved.steps().len(), 1);
        assert_eq!(resolved.steps()[0].stage(), sid(2));

        // Custom routing disabled: fall back to the all-stage default.
        let default = catalog.resolve(&pid("P"), &stages, false);
        assert_eq!(default.steps().len(), 2);
        assert_eq!(default.steps()[0].stage(), sid(1));

        // Unconfigured product: default as well.
        let other = catalog.resolve(&pid("Q"), &stages, true);
        assert_eq!(other.steps().len(), 2);
    }
}
