//! Pipeline configuration.
//!
//! The original content script hard-coded every tunable as a constant
//! evaluated once at injection. The engine keeps those values in one
//! explicit structure instead, with [`Default`] reproducing the original
//! constants; nothing re-reads the configuration after injection.

use creamtint_color::Rgba;
use serde::Deserialize;

/// The fixed cream tone near-white backgrounds are rewritten to (#FFF3D6).
pub const DEFAULT_CREAM: Rgba = Rgba::opaque(255.0, 243.0, 214.0);

/// Minimum Rec. 601 luma for a background to count as near-white.
/// Larger is stricter (only whiter surfaces qualify).
pub const DEFAULT_LUMA_THRESHOLD: f64 = 235.0;

/// Backgrounds more transparent than this are never repainted.
pub const DEFAULT_ALPHA_MIN: f64 = 0.15;

/// Upper bound on elements processed per scan slice (load control).
pub const DEFAULT_NODES_PER_TICK: usize = 600;

/// Tunables for one injection of the pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TintConfig {
    /// Replacement background color for qualifying elements.
    pub cream: Rgba,
    /// Minimum luma for the near-white classification.
    pub luma_threshold: f64,
    /// Alpha floor below which a background is treated as invisible.
    pub alpha_min: f64,
    /// Scan slice size; the scanner yields to the frame scheduler between
    /// slices.
    pub nodes_per_tick: usize,
    /// Whether to drain the subtree change source after the initial scan.
    pub observe_mutations: bool,
}

impl Default for TintConfig {
    fn default() -> Self {
        Self {
            cream: DEFAULT_CREAM,
            luma_threshold: DEFAULT_LUMA_THRESHOLD,
            alpha_min: DEFAULT_ALPHA_MIN,
            nodes_per_tick: DEFAULT_NODES_PER_TICK,
            observe_mutations: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_fixed_constants() {
        let config = TintConfig::default();
        assert_eq!(config.cream.to_string(), "rgb(255, 243, 214)");
        assert!((config.luma_threshold - 235.0).abs() < f64::EPSILON);
        assert!((config.alpha_min - 0.15).abs() < f64::EPSILON);
        assert_eq!(config.nodes_per_tick, 600);
        assert!(config.observe_mutations);
    }

    #[test]
    fn deserializes_with_partial_overrides() {
        let config: TintConfig =
            serde_json::from_str(r#"{"luma_threshold": 200.0, "observe_mutations": false}"#)
                .unwrap();
        assert!((config.luma_threshold - 200.0).abs() < f64::EPSILON);
        assert!(!config.observe_mutations);
        assert_eq!(config.nodes_per_tick, 600);
    }
}
