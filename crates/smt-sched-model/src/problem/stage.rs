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

use crate::common::StageId;
use crate::problem::err::{DuplicateStageError, DuplicateStageOrderError, StageCatalogError};
use serde::{Deserialize, Serialize};

/// A production step of the SMT process (e.g. Solder Paste, Pick & Place,
/// Reflow, AOI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    id: StageId,
    name: String,
    order: u32,
}

impl Stage {
    #[inline]
    pub fn new(id: StageId, name: impl Into<String>, order: u32) -> Self {
        Self {
            id,
            name: name.into(),
            order,
        }
    }

    #[inline]
    pub fn id(&self) -> StageId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn order(&self) -> u32 {
        self.order
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stage({}, {}, order {})", self.id, self.name, self.order)
    }
}

/// The full ordered set of stages.
///
/// Ids are unique and presentation orders are strictly monotone across the
/// set; both are enforced on insert. Iteration always follows the declared
/// order.
#[derive(Debug, Clone, Default)]
pub struct StageCatalog {
    // Kept sorted by `order`.
    stages: Vec<Stage>,
}

impl StageCatalog {
    #[inline]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn insert(&mut self, stage: Stage) -> Result<(), StageCatalogError> {
        if self.stages.iter().any(|s| s.id() == stage.id()) {
            return Err(DuplicateStageError::new(stage.id()).into());
        }
        if self.stages.iter().any(|s| s.order() == stage.order()) {
            return Err(DuplicateStageOrderError::new(stage.id(), stage.order()).into());
        }
        let pos = self
            .stages
            .partition_point(|s| s.order() < stage.order());
        self.stages.insert(pos, stage);
        Ok(())
    }

    #[inline]
    pub fn get(&self, id: StageId) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id() == id)
    }

    #[inline]
    pub fn contains_id(&self, id: StageId) -> bool {
        self.get(id).is_some()
    }

    /// Stages in declared presentation order.
    #[inline]
    pub fn iter_ordered(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl FromIterator<Stage> for StageCatalog {
    /// Builds a catalog from stages, panicking on duplicate ids or orders.
    /// Use [`StageCatalog::insert`] for fallible construction.
    fn from_iter<I: IntoIterator<Item = Stage>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for stage in iter {
            catalog
                .insert(stage)
                .expect("duplicate stage id or order in FromIterator");
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn sid(n: u32) -> StageId {
        StageId::new(n)
    }

    fn smt_stages() -> StageCatalog {
        [
            Stage::new(sid(1), "Solder Paste", 10),
            Stage::new(sid(2), "Pick & Place", 20),
            Stage::new(sid(3), "Reflow", 30),
            Stage::new(sid(4), "AOI", 40),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_iteration_follows_declared_order() {
        let mut catalog = StageCatalog::new();
        // Insert out of order; iteration must still be by `order`.
        catalog.insert(Stage::new(sid(3), "Reflow", 30)).unwrap();
        catalog
            .insert(Stage::new(sid(1), "Solder Paste", 10))
            .unwrap();
        catalog
            .insert(Stage::new(sid(2), "Pick & Place", 20))
            .unwrap();

        let ids: Vec<_> = catalog.iter_ordered().map(|s| s.id()).collect();
        assert_eq!(ids, vec![sid(1), sid(2), sid(3)]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut catalog = smt_stages();
        let err = catalog
            .insert(Stage::new(sid(1), "Duplicate", 99))
            .unwrap_err();
        assert!(matches!(err, StageCatalogError::DuplicateId(_)));
    }

    #[test]
    fn test_duplicate_order_rejected() {
        let mut catalog = smt_stages();
        let err = catalog
            .insert(Stage::new(sid(9), "Clash", 20))
            .unwrap_err();
        assert!(matches!(err, StageCatalogError::DuplicateOrder(_)));
    }

    #[test]
    fn test_lookup() {
        let catalog = smt_stages();
        assert_eq!(catalog.get(sid(3)).map(|s| s.name()), Some("Reflow"));
        assert!(catalog.contains_id(sid(4)));
        assert!(!catalog.contains_id(sid(5)));
        assert_eq!(catalog.len(), 4);
    }
}
