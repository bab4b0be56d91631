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
use smt_sched_core::prelude::MinuteDelta;
use std::collections::HashMap;

/// Idle minutes required to move material between two stages (e.g.
/// cooling after reflow).
///
/// Same-stage transfer is always zero, regardless of entries; unknown
/// pairs fall back to the default.
#[derive(Debug, Clone)]
pub struct StageTransferMatrix {
    minutes: HashMap<(StageId, StageId), MinuteDelta>,
    default: MinuteDelta,
}

impl StageTransferMatrix {
    #[inline]
    pub fn new(default: MinuteDelta) -> Self {
        Self {
            minutes: HashMap::new(),
            default,
        }
    }

    /// A matrix that is zero everywhere.
    #[inline]
    pub fn zero() -> Self {
        Self::new(MinuteDelta::new(0))
    }

    #[inline]
    pub fn set(&mut self, from: StageId, to: StageId, minutes: MinuteDelta) {
        self.minutes.insert((from, to), minutes);
    }

    #[inline]
    pub fn between(&self, from: StageId, to: StageId) -> MinuteDelta {
        if from == to {
            return MinuteDelta::new(0);
        }
        self.minutes.get(&(from, to)).copied().unwrap_or(self.default)
    }

    #[inline]
    pub fn default_minutes(&self) -> MinuteDelta {
        self.default
    }
}

impl Default for StageTransferMatrix {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

/// Setup minutes to move an in-progress product to another physical line
/// between stages. Same-line transfer is always zero.
#[derive(Debug, Clone)]
pub struct LineTransferMatrix {
    minutes: HashMap<(LineId, LineId), MinuteDelta>,
    default: MinuteDelta,
}

impl LineTransferMatrix {
    #[inline]
    pub fn new(default: MinuteDelta) -> Self {
        Self {
            minutes: HashMap::new(),
            default,
        }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(MinuteDelta::new(0))
    }

    #[inline]
    pub fn set(&mut self, from: LineId, to: LineId, minutes: MinuteDelta) {
        self.minutes.insert((from, to), minutes);
    }

    #[inline]
    pub fn between(&self, from: &LineId, to: &LineId) -> MinuteDelta {
        if from == to {
            return MinuteDelta::new(0);
        }
        self.minutes
            .get(&(from.clone(), to.clone()))
            .copied()
            .unwrap_or(self.default)
    }

    #[inline]
    pub fn default_minutes(&self) -> MinuteDelta {
        self.default
    }
}

impl Default for LineTransferMatrix {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn md(v: i64) -> MinuteDelta {
        MinuteDelta::new(v)
    }
    #[inline]
    fn sid(n: u32) -> StageId {
        StageId::new(n)
    }
    #[inline]
    fn lid(s: &str) -> LineId {
        LineId::from(s)
    }

    #[test]
    fn test_stage_matrix_lookup() {
        let mut m = StageTransferMatrix::new(md(10));
        m.set(sid(3), sid(4), md(45)); // cooling after reflow

        assert_eq!(m.between(sid(3), sid(4)), md(45));
        // Unknown pair falls back to the default.
        assert_eq!(m.between(sid(1), sid(2)), md(10));
        // Same stage is zero even though the default is not.
        assert_eq!(m.between(sid(2), sid(2)), md(0));
    }

    #[test]
    fn test_line_matrix_lookup() {
        let mut m = LineTransferMatrix::new(md(20));
        m.set(lid("SMT-1"), lid("SMT-2"), md(35));

        assert_eq!(m.between(&lid("SMT-1"), &lid("SMT-2")), md(35));
        // Directional: the reverse pair is unset.
        assert_eq!(m.between(&lid("SMT-2"), &lid("SMT-1")), md(20));
        assert_eq!(m.between(&lid("SMT-1"), &lid("SMT-1")), md(0));
    }

    #[test]
    fn test_zero_matrices() {
        assert_eq!(StageTransferMatrix::zero().between(sid(1), sid(2)), md(0));
        assert_eq!(
            LineTransferMatrix::zero().between(&lid("A"), &lid("B")),
            md(0)
        );
    }
}
