//! Darcy friction factor and Reynolds number.
//!
//! Below [`LAMINAR_LIMIT`] the Hagen–Poiseuille result `f = 64/Re` is used.
//! Above it the Colebrook–White equation is replaced by the explicit
//! Swamee–Jain approximation, evaluated once with no iteration.

use serde::{Deserialize, Serialize};

/// Reynolds number below which flow is treated as laminar
pub const LAMINAR_LIMIT: f64 = 2300.0;

/// Flow regime selected by Reynolds number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowRegime {
    Laminar,
    Turbulent,
}

impl FlowRegime {
    pub fn from_reynolds(reynolds: f64) -> Self {
        if reynolds < LAMINAR_LIMIT {
            FlowRegime::Laminar
        } else {
            FlowRegime::Turbulent
        }
    }
}

/// Reynolds number `Re = ρ·v·D/μ`
#[inline]
pub fn reynolds_number(density: f64, velocity: f64, diameter: f64, viscosity: f64) -> f64 {
    density * velocity * diameter / viscosity
}

/// Laminar friction factor `f = 64/Re`
#[inline]
pub fn laminar_friction_factor(reynolds: f64) -> f64 {
    64.0 / reynolds
}

/// Swamee–Jain explicit friction factor
///
/// ```text
/// f = [ -2·log10( ε_r/3.7 + 5.74/Re^0.9 ) ]^-2
/// ```
///
/// `relative_roughness` is ε/D.
#[inline]
pub fn turbulent_friction_factor(reynolds: f64, relative_roughness: f64) -> f64 {
    (-2.0 * (relative_roughness / 3.7 + 5.74 / reynolds.powf(0.9)).log10()).powi(-2)
}

/// Darcy friction factor, choosing the formula by regime.
///
/// # Example
/// ```rust
/// use pipecalc_core::correlations::friction_factor;
///
/// assert_eq!(friction_factor(1000.0, 0.0001), 0.064);
/// let turbulent = friction_factor(1.0e5, 0.0001);
/// assert!(turbulent > 0.015 && turbulent < 0.025);
/// ```
pub fn friction_factor(reynolds: f64, relative_roughness: f64) -> f64 {
    match FlowRegime::from_reynolds(reynolds) {
        FlowRegime::Laminar => laminar_friction_factor(reynolds),
        FlowRegime::Turbulent => turbulent_friction_factor(reynolds, relative_roughness),
    }
}

/// Darcy–Weisbach pressure drop `Δp = f·(L/D)·ρv²/2` in Pa
#[inline]
pub fn darcy_pressure_drop(
    friction_factor: f64,
    length: f64,
    diameter: f64,
    density: f64,
    velocity: f64,
) -> f64 {
    friction_factor * (length / diameter) * 0.5 * density * velocity.powi(2)
}
