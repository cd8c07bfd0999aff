//! # Unit Tags
//!
//! Fixed unit labels attached to inputs and outputs. Pipecalc does not
//! convert between units: every formula works in one agreed set, and these
//! tags exist so renderers and reports can print the right symbol.
//!
//! ## Working Units
//!
//! - Flow: cubic metres per hour (m³/h) at the input boundary, m³/s inside formulas
//! - Length: metres for hydraulics, millimetres for wall thickness and pipe sizes
//! - Pressure: kPa for fluid state, MPa for vessel design, Pa for pressure drop
//! - Temperature: degrees Celsius
//!
//! ## Example
//!
//! ```rust
//! use pipecalc_core::units::Unit;
//!
//! assert_eq!(Unit::MetersPerSecond.symbol(), "m/s");
//! assert_eq!(Unit::Dimensionless.symbol(), "");
//! ```

use serde::{Deserialize, Serialize};

/// Fixed unit tag.
///
/// Serializes as its display symbol so JSON output stays readable
/// (`"m/s"`, `"MPa"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "mm")]
    Millimeters,

    // ------------------------------------------------------------------
    // Flow
    // ------------------------------------------------------------------
    #[serde(rename = "m³/h")]
    CubicMetersPerHour,
    #[serde(rename = "m/s")]
    MetersPerSecond,

    // ------------------------------------------------------------------
    // Pressure and stress
    // ------------------------------------------------------------------
    #[serde(rename = "Pa")]
    Pascal,
    #[serde(rename = "kPa")]
    Kilopascal,
    #[serde(rename = "MPa")]
    Megapascal,

    // ------------------------------------------------------------------
    // Fluid properties
    // ------------------------------------------------------------------
    #[serde(rename = "°C")]
    Celsius,
    #[serde(rename = "kg/m³")]
    KgPerCubicMeter,
    #[serde(rename = "Pa·s")]
    PascalSecond,

    // ------------------------------------------------------------------
    // Mass and energy
    // ------------------------------------------------------------------
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "kg/m")]
    KgPerMeter,
    #[serde(rename = "MJ/m³")]
    MegajoulePerCubicMeter,
    #[serde(rename = "kWh/m³")]
    KilowattHourPerCubicMeter,
    #[serde(rename = "MJ/kg")]
    MegajoulePerKg,

    // ------------------------------------------------------------------
    // Ratios and counts
    // ------------------------------------------------------------------
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "pcs")]
    Pieces,
    #[serde(rename = "")]
    Dimensionless,
}

impl Unit {
    /// Display symbol used in result `units` maps and input labels
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Meters => "m",
            Unit::Millimeters => "mm",
            Unit::CubicMetersPerHour => "m³/h",
            Unit::MetersPerSecond => "m/s",
            Unit::Pascal => "Pa",
            Unit::Kilopascal => "kPa",
            Unit::Megapascal => "MPa",
            Unit::Celsius => "°C",
            Unit::KgPerCubicMeter => "kg/m³",
            Unit::PascalSecond => "Pa·s",
            Unit::Kilograms => "kg",
            Unit::KgPerMeter => "kg/m",
            Unit::MegajoulePerCubicMeter => "MJ/m³",
            Unit::KilowattHourPerCubicMeter => "kWh/m³",
            Unit::MegajoulePerKg => "MJ/kg",
            Unit::Percent => "%",
            Unit::Pieces => "pcs",
            Unit::Dimensionless => "",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ============================================================================
// Conversion constants
// ============================================================================

/// Seconds per hour, for m³/h → m³/s
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Millimetres per metre
pub const MM_PER_M: f64 = 1000.0;

/// Megajoules per kilowatt-hour
pub const MJ_PER_KWH: f64 = 3.6;

/// Offset between degrees Celsius and kelvin
pub const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Standard gravity (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Convert a volumetric flow in m³/h to m³/s
#[inline]
pub fn per_hour_to_per_second(flow_m3_h: f64) -> f64 {
    flow_m3_h / SECONDS_PER_HOUR
}
