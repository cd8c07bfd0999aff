//! Fuel-gas mixture properties.
//!
//! Volume fractions are normalized before use, so inputs may be given in
//! percent or in any other consistent scale. Missing components count as
//! zero.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Molar volume of an ideal gas at normal conditions (0 °C, 101.325 kPa), m³/kmol
pub const NORMAL_MOLAR_VOLUME: f64 = 22.414;

/// Gas components with tabulated properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GasComponent {
    CH4,
    C2H6,
    C3H8,
    N2,
    CO2,
}

impl GasComponent {
    pub const ALL: [GasComponent; 5] = [
        GasComponent::CH4,
        GasComponent::C2H6,
        GasComponent::C3H8,
        GasComponent::N2,
        GasComponent::CO2,
    ];

    /// Field id / chemical formula
    pub fn formula(&self) -> &'static str {
        match self {
            GasComponent::CH4 => "CH4",
            GasComponent::C2H6 => "C2H6",
            GasComponent::C3H8 => "C3H8",
            GasComponent::N2 => "N2",
            GasComponent::CO2 => "CO2",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GasComponent::CH4 => "Methane",
            GasComponent::C2H6 => "Ethane",
            GasComponent::C3H8 => "Propane",
            GasComponent::N2 => "Nitrogen",
            GasComponent::CO2 => "Carbon dioxide",
        }
    }

    /// Volumetric heating value at normal conditions (MJ/m³)
    pub fn heating_value(&self) -> f64 {
        match self {
            GasComponent::CH4 => 35.8,
            GasComponent::C2H6 => 65.0,
            GasComponent::C3H8 => 93.0,
            GasComponent::N2 | GasComponent::CO2 => 0.0,
        }
    }

    /// Molar mass (kg/kmol)
    pub fn molar_mass(&self) -> f64 {
        match self {
            GasComponent::CH4 => 16.043,
            GasComponent::C2H6 => 30.07,
            GasComponent::C3H8 => 44.097,
            GasComponent::N2 => 28.014,
            GasComponent::CO2 => 44.01,
        }
    }
}

/// Normalized composition: `(component, fraction)` pairs summing to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    fractions: Vec<(GasComponent, f64)>,
}

impl Composition {
    /// Normalize raw amounts so they sum to 1.
    ///
    /// Amounts are scaled by the largest one before summing, so any finite
    /// composition normalizes without overflow. Negative or non-finite
    /// amounts and an all-zero composition are rejected as invalid input.
    pub fn normalize(raw: &[(GasComponent, f64)]) -> CalcResult<Self> {
        for &(component, amount) in raw {
            if !amount.is_finite() {
                return Err(CalcError::invalid_input(
                    component.formula(),
                    amount.to_string(),
                    "Component fraction must be a finite number",
                ));
            }
            if amount < 0.0 {
                return Err(CalcError::invalid_input(
                    component.formula(),
                    amount.to_string(),
                    "Component fraction cannot be negative",
                ));
            }
        }
        let largest = raw.iter().map(|&(_, amount)| amount).fold(0.0, f64::max);
        if largest <= 0.0 {
            return Err(CalcError::invalid_input(
                "composition",
                largest.to_string(),
                "Provide at least one component",
            ));
        }
        let total: f64 = raw.iter().map(|&(_, amount)| amount / largest).sum();
        let fractions = raw
            .iter()
            .map(|&(component, amount)| (component, amount / largest / total))
            .collect();
        Ok(Self { fractions })
    }

    pub fn iter(&self) -> impl Iterator<Item = (GasComponent, f64)> + '_ {
        self.fractions.iter().copied()
    }

    /// Fraction-weighted volumetric heating value (MJ/m³)
    pub fn volumetric_heating_value(&self) -> f64 {
        self.iter().map(|(c, x)| x * c.heating_value()).sum()
    }

    /// Fraction-weighted molar mass (kg/kmol)
    pub fn molar_mass(&self) -> f64 {
        self.iter().map(|(c, x)| x * c.molar_mass()).sum()
    }

    /// Density at normal conditions via the ideal-gas molar volume (kg/m³)
    pub fn normal_density(&self) -> f64 {
        self.molar_mass() / NORMAL_MOLAR_VOLUME
    }
}
