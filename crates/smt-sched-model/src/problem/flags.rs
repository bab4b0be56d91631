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

use serde::{Deserialize, Serialize};

/// Feature switches of one solve call.
///
/// Defaults enable every scheduling feature and keep deadlines soft
/// (misses are reported, not forbidden).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub enable_lot_splitting: bool,
    pub enable_custom_routing: bool,
    pub enable_stage_transfer_time: bool,
    pub enable_line_transfer_time: bool,
    pub enable_priority_scheduling: bool,
    pub use_hard_deadline_constraint: bool,
    pub enable_stage_naming: bool,
}

impl Default for FeatureFlags {
    #[inline]
    fn default() -> Self {
        Self {
            enable_lot_splitting: true,
            enable_custom_routing: true,
            enable_stage_transfer_time: true,
            enable_line_transfer_time: true,
            enable_priority_scheduling: true,
            use_hard_deadline_constraint: false,
            enable_stage_naming: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_keep_deadlines_soft() {
        let flags = FeatureFlags::default();
        assert!(flags.enable_lot_splitting);
        assert!(flags.enable_custom_routing);
        assert!(flags.enable_priority_scheduling);
        assert!(!flags.use_hard_deadline_constraint);
    }
}
