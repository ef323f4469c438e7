//! Runtime configuration assembled from CLI flags.
//!
//! All components receive a [`SweepConfig`] at construction instead of
//! consulting global state, so behavior is fully determined by the caller.

use crate::ui::OutputMode;

/// Budget for the virtual-environment directory walk.
///
/// The walk starts at the home directory and a few well-known roots. Without
/// a cap it can crawl an entire disk (or hang on a network mount), so both
/// depth and total entries per root are bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkBudget {
    /// Maximum directory depth below each walk root.
    pub max_depth: usize,
    /// Maximum entries visited per walk root.
    pub max_entries: usize,
}

impl Default for WalkBudget {
    fn default() -> Self {
        Self {
            max_depth: 6,
            max_entries: 50_000,
        }
    }
}

/// Configuration for one airsweep invocation.
#[derive(Debug, Clone, Default)]
pub struct SweepConfig {
    /// Output verbosity.
    pub output: OutputMode,
    /// Skip confirmation prompts (assume "yes").
    pub assume_yes: bool,
    /// Traversal budget for the virtual-environment walk.
    pub walk_budget: WalkBudget,
}

impl SweepConfig {
    /// Create a config with the given output mode and defaults elsewhere.
    pub fn with_output(output: OutputMode) -> Self {
        Self {
            output,
            ..Default::default()
        }
    }
}
