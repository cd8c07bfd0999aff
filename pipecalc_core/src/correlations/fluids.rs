//! Fluid property correlations.
//!
//! Closed-form empirical density and dynamic viscosity as functions of
//! temperature (and pressure, for air). Each fluid has its own formula;
//! nothing is shared between them.
//!
//! ## References
//!
//! - Water density: Tanaka et al. style rational fit, valid roughly 0–100 °C
//! - Water viscosity: Vogel-type fit `A·10^(B/(T−C))`
//! - Air: ideal gas (R = 287.05 J/(kg·K)) with Sutherland's law
//! - Diesel: linear thermal expansion from 15 °C, exponential viscosity decay

use serde::{Deserialize, Serialize};

use crate::units::CELSIUS_TO_KELVIN;

/// Specific gas constant for dry air, J/(kg·K)
pub const AIR_GAS_CONSTANT: f64 = 287.05;

/// Sutherland reference viscosity for air at 273.15 K, Pa·s
const AIR_REFERENCE_VISCOSITY: f64 = 1.716e-5;

/// Sutherland constant for air, K
const AIR_SUTHERLAND: f64 = 110.4;

/// Fluids with a built-in property correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fluid {
    #[default]
    Water,
    Air,
    Diesel,
}

impl Fluid {
    pub const ALL: [Fluid; 3] = [Fluid::Water, Fluid::Air, Fluid::Diesel];

    /// Key used in input forms (`"water"`, `"air"`, `"diesel"`)
    pub fn key(&self) -> &'static str {
        match self {
            Fluid::Water => "water",
            Fluid::Air => "air",
            Fluid::Diesel => "diesel",
        }
    }

    /// Resolve a fluid key. Unrecognized keys fall back to water.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "air" => Fluid::Air,
            "diesel" => Fluid::Diesel,
            _ => Fluid::Water,
        }
    }
}

impl std::fmt::Display for Fluid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Density and dynamic viscosity at a given state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluidProperties {
    /// Density (kg/m³)
    pub density: f64,
    /// Dynamic viscosity (Pa·s)
    pub viscosity: f64,
}

/// Properties of `fluid` at `temperature_c` (°C) and `pressure_kpa` (kPa).
///
/// Pressure only affects air.
///
/// # Example
/// ```rust
/// use pipecalc_core::correlations::{fluid_properties, Fluid};
///
/// let water = fluid_properties(Fluid::Water, 20.0, 101.3);
/// assert!((water.density - 998.2).abs() < 0.1);
/// assert!((water.viscosity - 1.0e-3).abs() < 1.0e-5);
/// ```
pub fn fluid_properties(fluid: Fluid, temperature_c: f64, pressure_kpa: f64) -> FluidProperties {
    match fluid {
        Fluid::Water => water_properties(temperature_c),
        Fluid::Air => air_properties(temperature_c, pressure_kpa),
        Fluid::Diesel => diesel_properties(temperature_c),
    }
}

fn water_properties(t: f64) -> FluidProperties {
    let density =
        1000.0 * (1.0 - ((t + 288.9414) * (t - 3.9863).powi(2)) / (508_929.2 * (t + 68.12963)));
    let viscosity = 2.414e-5 * 10f64.powf(247.8 / (t + 133.15));
    FluidProperties { density, viscosity }
}

fn air_properties(t: f64, pressure_kpa: f64) -> FluidProperties {
    let kelvin = t + CELSIUS_TO_KELVIN;
    let density = (pressure_kpa * 1000.0) / (AIR_GAS_CONSTANT * kelvin);
    let viscosity = AIR_REFERENCE_VISCOSITY
        * (kelvin / CELSIUS_TO_KELVIN).powf(1.5)
        * (CELSIUS_TO_KELVIN + AIR_SUTHERLAND)
        / (kelvin + AIR_SUTHERLAND);
    FluidProperties { density, viscosity }
}

fn diesel_properties(t: f64) -> FluidProperties {
    let density = 830.0 * (1.0 - 0.0008 * (t - 15.0));
    let viscosity = 3.5e-3 * 0.9f64.powf((t - 20.0) / 10.0);
    FluidProperties { density, viscosity }
}
