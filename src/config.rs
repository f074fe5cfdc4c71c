use crate::constants::*;
use serde::{Deserialize, Serialize};

/// Tunable engine settings. Every field falls back to its default when
/// missing from a serialized document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Energy charged per unit actually placed.
    #[serde(default = "default_energy_per_unit")]
    pub energy_per_unit: f64,
    /// Amount of the resource debited per unit.
    #[serde(default = "default_unit_quantity")]
    pub unit_quantity: u64,
    /// Cap applied to every contiguous (flood-fill) request.
    #[serde(default = "default_max_contiguous")]
    pub max_contiguous: usize,
    /// Chebyshev distance from the batch inside which undo is honored.
    #[serde(default = "default_undo_radius")]
    pub undo_radius: i32,
    /// Recolors bought by one unit of dye.
    #[serde(default = "default_dye_ratio")]
    pub dye_ratio: u32,
}

fn default_energy_per_unit() -> f64 {
    DEFAULT_ENERGY_PER_UNIT
}

fn default_unit_quantity() -> u64 {
    1
}

fn default_max_contiguous() -> usize {
    DEFAULT_MAX_CONTIGUOUS
}

fn default_undo_radius() -> i32 {
    DEFAULT_UNDO_RADIUS
}

fn default_dye_ratio() -> u32 {
    DEFAULT_DYE_RATIO
}

impl Default for PlacementConfig {
    fn default() -> Self {
        PlacementConfig {
            energy_per_unit: default_energy_per_unit(),
            unit_quantity: default_unit_quantity(),
            max_contiguous: default_max_contiguous(),
            undo_radius: default_undo_radius(),
            dye_ratio: default_dye_ratio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: PlacementConfig =
            serde_json::from_str(r#"{ "energy_per_unit": 2.5, "dye_ratio": 4 }"#).unwrap();
        assert_eq!(config.energy_per_unit, 2.5);
        assert_eq!(config.dye_ratio, 4);
        assert_eq!(config.unit_quantity, 1);
        assert_eq!(config.undo_radius, DEFAULT_UNDO_RADIUS);
        assert_eq!(config.max_contiguous, DEFAULT_MAX_CONTIGUOUS);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config: PlacementConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PlacementConfig::default());
    }
}
