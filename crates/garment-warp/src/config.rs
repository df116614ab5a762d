//! Engine configuration tree.
//!
//! Every struct is `Default + serde` with `#[serde(default)]`, so a JSON file
//! only needs to name the fields it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::contour::ContourConfig;
use crate::target::TargetParams;
use crate::warp::CompositeConfig;

/// How source and destination polygons are put into correspondence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrespondenceConfig {
    /// Rotate (and if needed reverse) the source outline so its first point
    /// sits nearest the destination's first point before triangulation.
    pub align_start_points: bool,
}

impl Default for CorrespondenceConfig {
    fn default() -> Self {
        Self {
            align_start_points: true,
        }
    }
}

/// Complete garment warp configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpConfig {
    /// Destination polygon construction.
    pub target: TargetParams,
    /// Source outline extraction.
    pub contour: ContourConfig,
    pub correspondence: CorrespondenceConfig,
    /// Per-triangle warping and compositing.
    pub composite: CompositeConfig,
}

impl WarpConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a (possibly partial) configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&data)?)
    }
}
