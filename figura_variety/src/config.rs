// Data-driven generator configuration.
//
// `GeneratorConfig` collects the knobs that bound a generation run: the
// result cap, the memory ceiling of the class sieve, and the thresholds of
// the rhythmic pruning tests. It loads from JSON; fields missing from the file
// keep their defaults, so a config can name only what it changes.
//
// See also: `variety.rs`, which copies a config into every `Variety`, and
// `rhythm.rs` for how `RhythmParams` is applied.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::VarietyError;

/// Thresholds for rhythmic class pruning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhythmParams {
    /// Orders above this must also activate a third, quarter or sixth
    /// subdivision point to count as separable.
    pub separability_min_order: usize,
    /// The simplicity test applies only to levels above this...
    pub simplicity_min_level: usize,
    /// ...and orders above this.
    pub simplicity_min_order: usize,
}

impl Default for RhythmParams {
    fn default() -> Self {
        RhythmParams {
            separability_min_order: 16,
            simplicity_min_level: 3,
            simplicity_min_order: 16,
        }
    }
}

/// Bounds and tuning for a generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Maximum number of structures a run may return.
    pub cap: usize,
    /// Largest candidate range the class sieve will mark, in numbers. Systems
    /// with more structures than this are only scanned up to the ceiling:
    /// every class returned is still canonical, but classes whose smallest
    /// member lies above the ceiling are missed.
    pub sieve_ceiling: u64,
    pub rhythm: RhythmParams,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            cap: 10_000,
            // 2 MiB of marks.
            sieve_ceiling: 1 << 24,
            rhythm: RhythmParams::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(json: &str) -> Result<Self, VarietyError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, VarietyError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
