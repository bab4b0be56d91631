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

use crate::common::{LineId, StageId};
use crate::problem::err::EfficiencyOutOfRangeError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The allowed efficiency band of a stage capability.
pub const EFFICIENCY_MIN: f64 = 0.1;
pub const EFFICIENCY_MAX: f64 = 1.5;

/// A line's ability to run one stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    efficiency: f64,
    enabled: bool,
}

impl Capability {
    /// Creates an enabled capability; `efficiency` must lie in
    /// `[0.1, 1.5]`.
    #[inline]
    pub fn new(efficiency: f64) -> Result<Self, EfficiencyOutOfRangeError> {
        if !(EFFICIENCY_MIN..=EFFICIENCY_MAX).contains(&efficiency) {
            return Err(EfficiencyOutOfRangeError::new(efficiency));
        }
        Ok(Self {
            efficiency,
            enabled: true,
        })
    }

    #[inline]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    #[inline]
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// A physical assembly path.
///
/// A line *supports* a stage iff an enabled capability entry exists for
/// it. Inactive lines are excluded from scheduling entirely.
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    name: String,
    active: bool,
    max_feeder_slots: u32,
    capabilities: HashMap<StageId, Capability>,
}

impl Line {
    #[inline]
    pub fn new(id: LineId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            max_feeder_slots: 0,
            capabilities: HashMap::new(),
        }
    }

    #[inline]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    #[inline]
    pub fn with_max_feeder_slots(mut self, slots: u32) -> Self {
        self.max_feeder_slots = slots;
        self
    }

    /// Adds an enabled capability for `stage`.
    #[inline]
    pub fn with_capability(
        mut self,
        stage: StageId,
        efficiency: f64,
    ) -> Result<Self, EfficiencyOutOfRangeError> {
        let cap = Capability::new(efficiency)?;
        self.capabilities.insert(stage, cap);
        Ok(self)
    }

    #[inline]
    pub fn with_capability_entry(mut self, stage: StageId, cap: Capability) -> Self {
        self.capabilities.insert(stage, cap);
        self
    }

    #[inline]
    pub fn id(&self) -> &LineId {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn max_feeder_slots(&self) -> u32 {
        self.max_feeder_slots
    }

    #[inline]
    pub fn supports(&self, stage: StageId) -> bool {
        self.capabilities
            .get(&stage)
            .is_some_and(|c| c.is_enabled())
    }

    /// Efficiency at `stage`, `None` when the stage is unsupported.
    #[inline]
    pub fn efficiency_at(&self, stage: StageId) -> Option<f64> {
        self.capabilities
            .get(&stage)
            .filter(|c| c.is_enabled())
            .map(|c| c.efficiency())
    }

    #[inline]
    pub fn iter_capabilities(&self) -> impl Iterator<Item = (StageId, &Capability)> {
        self.capabilities.iter().map(|(s, c)| (*s, c))
    }
}

/// The fleet of production lines, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct LineFleet {
    lines: Vec<Line>,
}

impl LineFleet {
    #[inline]
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Inserts a line, replacing any line with the same id.
    pub fn insert(&mut self, line: Line) -> Option<Line> {
        match self.lines.iter().position(|l| l.id() == line.id()) {
            Some(pos) => Some(std::mem::replace(&mut self.lines[pos], line)),
            None => {
                self.lines.push(line);
                None
            }
        }
    }

    #[inline]
    pub fn get(&self, id: &LineId) -> Option<&Line> {
        self.lines.iter().find(|l| l.id() == id)
    }

    #[inline]
    pub fn contains_id(&self, id: &LineId) -> bool {
        self.get(id).is_some()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// Lines that participate in scheduling.
    #[inline]
    pub fn iter_active(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter(|l| l.is_active())
    }

    #[inline]
    pub fn iter_active_supporting(&self, stage: StageId) -> impl Iterator<Item = &Line> {
        self.iter_active().filter(move |l| l.supports(stage))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The largest feeder capacity among active lines.
    #[inline]
    pub fn max_feeder_slots(&self) -> u32 {
        self.iter_active()
            .map(|l| l.max_feeder_slots())
            .max()
            .unwrap_or(0)
    }
}

impl FromIterator<Line> for LineFleet {
    fn from_iter<I: IntoIterator<Item = Line>>(iter: I) -> Self {
        let mut fleet = Self::new();
        for line in iter {
            fleet.insert(line);
        }
        fleet
    }
}
