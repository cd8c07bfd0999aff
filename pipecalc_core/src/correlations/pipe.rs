//! Pipe geometry, mean velocity and velocity-band classification.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Standard nominal bores (mm) used for the velocity table, ascending.
pub const STANDARD_DIAMETERS_MM: [f64; 20] = [
    20.0, 25.0, 32.0, 40.0, 50.0, 65.0, 80.0, 100.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0,
    500.0, 600.0, 700.0, 800.0, 900.0, 1000.0,
];

/// Recommended gas velocity range (m/s), inclusive
pub const GAS_BAND: (f64, f64) = (10.0, 15.0);

/// Recommended liquid velocity range (m/s), inclusive
pub const LIQUID_BAND: (f64, f64) = (0.8, 1.5);

/// Cross-sectional area of a circular bore, `A = πD²/4`
#[inline]
pub fn circular_area(diameter: f64) -> f64 {
    PI * diameter.powi(2) / 4.0
}

/// Annulus area between outer and inner diameters, `A = π(Do² − Di²)/4`
#[inline]
pub fn annulus_area(outer_diameter: f64, inner_diameter: f64) -> f64 {
    PI / 4.0 * (outer_diameter.powi(2) - inner_diameter.powi(2))
}

/// Mean velocity `v = Q/A` for volumetric flow `flow_m3_s` through a bore
#[inline]
pub fn mean_velocity(flow_m3_s: f64, diameter: f64) -> f64 {
    flow_m3_s / circular_area(diameter)
}

/// Qualitative velocity band against design guideline ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    /// Within the gas guideline range
    Gas,
    /// Within the liquid guideline range
    Liquid,
    /// Outside both ranges
    Neutral,
}

impl Band {
    /// Classify a velocity in m/s. The ranges do not overlap.
    pub fn classify(velocity: f64) -> Self {
        if (GAS_BAND.0..=GAS_BAND.1).contains(&velocity) {
            Band::Gas
        } else if (LIQUID_BAND.0..=LIQUID_BAND.1).contains(&velocity) {
            Band::Liquid
        } else {
            Band::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Gas => "gas",
            Band::Liquid => "liquid",
            Band::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
