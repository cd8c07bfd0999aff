//! # Gas Calorific Value
//!
//! Volumetric heating value, normal density and mass heating value of a
//! fuel-gas mixture given as component percentages.
//!
//! Percentages are normalized before use, so a composition summing to 98 %
//! is scaled up rather than rejected. Only an all-zero composition is
//! refused.
//!
//! ## JSON Example
//!
//! ```json
//! { "CH4": 95, "C2H6": 3, "C3H8": 1, "N2": 1, "CO2": 0 }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Calculation, TestCase};
use crate::correlations::{Composition, GasComponent};
use crate::errors::CalcResult;
use crate::inputs::Inputs;
use crate::result::ResultSet;
use crate::schema::{CalculationConfig, Fields, InputSpec, OutputSpec};
use crate::units::{Unit, MJ_PER_KWH};

pub const ID: &str = "gas_calorific_value";

/// Raw component amounts in percent (any consistent scale works)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorificInput {
    pub components: BTreeMap<GasComponent, f64>,
}

impl CalorificInput {
    fn from_fields(fields: &Fields) -> CalcResult<Self> {
        let components = GasComponent::ALL
            .iter()
            .map(|&c| (c, fields.optional_number(c.formula()).unwrap_or(0.0)))
            .collect();
        Ok(Self { components })
    }

    /// Normalize the composition; fails for negative amounts or a zero total.
    pub fn composition(&self) -> CalcResult<Composition> {
        let raw: Vec<(GasComponent, f64)> = self.components.iter().map(|(&c, &x)| (c, x)).collect();
        Composition::normalize(&raw)
    }

    pub fn validate(&self) -> CalcResult<()> {
        self.composition().map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorificResult {
    /// Volumetric heating value (MJ/m³)
    pub hv_m3: f64,
    /// Volumetric heating value (kWh/m³)
    pub hv_kwh: f64,
    /// Density at normal conditions (kg/m³)
    pub density: f64,
    /// Mass heating value (MJ/kg)
    pub hv_mass: f64,
}

impl CalorificResult {
    pub fn to_result_set(&self) -> CalcResult<ResultSet> {
        ResultSet::builder()
            .scalar("hv_m3", self.hv_m3, Unit::MegajoulePerCubicMeter)
            .scalar("hv_kwh", self.hv_kwh, Unit::KilowattHourPerCubicMeter)
            .scalar("density", self.density, Unit::KgPerCubicMeter)
            .scalar("hv_mass", self.hv_mass, Unit::MegajoulePerKg)
            .build()
    }
}

pub fn calculate(input: &CalorificInput) -> CalcResult<CalorificResult> {
    let composition = input.composition()?;

    let hv_m3 = composition.volumetric_heating_value();
    let density = composition.normal_density();

    Ok(CalorificResult {
        hv_m3,
        hv_kwh: hv_m3 / MJ_PER_KWH,
        density,
        hv_mass: hv_m3 / density,
    })
}

#[derive(Debug)]
pub struct GasCalorificValue {
    config: CalculationConfig,
}

impl GasCalorificValue {
    pub fn new() -> Self {
        let inputs = GasComponent::ALL
            .iter()
            .map(|c| {
                InputSpec::numeric(c.formula(), c.display_name(), Unit::Percent)
                    .default_value(0.0)
                    .min(0.0)
            })
            .collect();
        let config = CalculationConfig {
            id: ID.to_string(),
            name: "Gas Calorific Value".to_string(),
            description: "Heating value and normal density of a fuel-gas mixture".to_string(),
            category: "thermal_calculations".to_string(),
            version: "1.0.0".to_string(),
            inputs,
            outputs: vec![
                OutputSpec::new("hv_m3", "Heating value", Unit::MegajoulePerCubicMeter, 2),
                OutputSpec::new("hv_kwh", "Heating value", Unit::KilowattHourPerCubicMeter, 2),
                OutputSpec::new("density", "Normal density", Unit::KgPerCubicMeter, 3),
                OutputSpec::new("hv_mass", "Mass heating value", Unit::MegajoulePerKg, 2),
            ],
        };
        Self { config }
    }
}

impl Default for GasCalorificValue {
    fn default() -> Self {
        Self::new()
    }
}

fn mixture(ch4: f64, c2h6: f64, c3h8: f64, n2: f64, co2: f64) -> Inputs {
    Inputs::new()
        .with("CH4", ch4)
        .with("C2H6", c2h6)
        .with("C3H8", c3h8)
        .with("N2", n2)
        .with("CO2", co2)
}

fn near_methane_reference(r: &ResultSet) -> bool {
    r.scalar("hv_m3").is_some_and(|hv| (hv - 35.8).abs() < 0.2)
}

impl Calculation for GasCalorificValue {
    type Input = CalorificInput;

    fn config(&self) -> &CalculationConfig {
        &self.config
    }

    fn parse(&self, fields: &Fields) -> CalcResult<CalorificInput> {
        let input = CalorificInput::from_fields(fields)?;
        input.validate()?;
        Ok(input)
    }

    fn compute(&self, input: &CalorificInput) -> CalcResult<ResultSet> {
        calculate(input)?.to_result_set()
    }

    fn smoke_case(&self) -> TestCase {
        TestCase::new("smoke test", mixture(100.0, 0.0, 0.0, 0.0, 0.0), near_methane_reference)
    }

    fn test_cases(&self) -> Vec<TestCase> {
        vec![
            TestCase::new(
                "Pure methane close to reference",
                mixture(100.0, 0.0, 0.0, 0.0, 0.0),
                |r| r.is_success() && near_methane_reference(r),
            ),
            TestCase::new("Mixture yields density", mixture(95.0, 3.0, 1.0, 1.0, 0.0), |r| {
                r.is_success() && r.scalar("density").is_some_and(|d| d > 0.0)
            }),
            TestCase::rejects("Rejects empty composition", mixture(0.0, 0.0, 0.0, 0.0, 0.0)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{CalculationModule, Module};

    fn module() -> Module<GasCalorificValue> {
        Module::new(GasCalorificValue::new())
    }

    #[test]
    fn test_pure_methane() {
        let result = module().calculate(&mixture(100.0, 0.0, 0.0, 0.0, 0.0)).unwrap();
        assert!(result.is_success());
        assert!((result.scalar("hv_m3").unwrap() - 35.8).abs() < 1e-9);
        assert!((result.scalar("hv_kwh").unwrap() - 35.8 / 3.6).abs() < 1e-9);
        // 16.043 / 22.414
        assert!((result.scalar("density").unwrap() - 0.71576).abs() < 1e-4);
        assert_eq!(result.unit("hv_mass"), Some("MJ/kg"));
    }

    #[test]
    fn test_mixture() {
        let result = module().calculate(&mixture(95.0, 3.0, 1.0, 1.0, 0.0)).unwrap();
        // 0.95·35.8 + 0.03·65 + 0.01·93 = 36.89
        assert!((result.scalar("hv_m3").unwrap() - 36.89).abs() < 1e-9);
        let density = result.scalar("density").unwrap();
        let hv_mass = result.scalar("hv_mass").unwrap();
        assert!((hv_mass - 36.89 / density).abs() < 1e-9);
    }

    #[test]
    fn test_scale_does_not_matter() {
        let percent = calculate(&typed(&[(GasComponent::CH4, 90.0), (GasComponent::N2, 10.0)])).unwrap();
        let fraction = calculate(&typed(&[(GasComponent::CH4, 0.9), (GasComponent::N2, 0.1)])).unwrap();
        assert!((percent.hv_m3 - fraction.hv_m3).abs() < 1e-9);
        assert!((percent.density - fraction.density).abs() < 1e-12);
    }

    #[test]
    fn test_very_large_amounts() {
        let result = module().calculate(&mixture(1e308, 1e308, 0.0, 0.0, 0.0)).unwrap();
        assert!(result.is_success());
        // Equal parts methane and ethane: (35.8 + 65) / 2
        assert!((result.scalar("hv_m3").unwrap() - 50.4).abs() < 1e-9);
        assert!(result.scalar("hv_mass").unwrap().is_finite());
    }

    #[test]
    fn test_missing_components_count_as_zero() {
        let result = module().calculate(&Inputs::new().with("CH4", 50.0)).unwrap();
        assert!((result.scalar("hv_m3").unwrap() - 35.8).abs() < 1e-9);
    }

    #[test]
    fn test_empty_and_negative_rejected() {
        let empty = module().calculate(&mixture(0.0, 0.0, 0.0, 0.0, 0.0)).unwrap();
        assert!(empty.is_failure());
        assert!(module().calculate(&Inputs::new()).unwrap().is_failure());

        let negative = module().calculate(&mixture(100.0, -5.0, 0.0, 0.0, 0.0)).unwrap();
        assert!(negative.is_failure());
        assert!(negative.error.unwrap().contains("C2H6"));
    }

    #[test]
    fn test_inert_only_has_zero_heating_value() {
        let result = module().calculate(&mixture(0.0, 0.0, 0.0, 80.0, 20.0)).unwrap();
        assert!(result.is_success());
        assert_eq!(result.scalar("hv_m3"), Some(0.0));
        assert_eq!(result.scalar("hv_mass"), Some(0.0));
    }

    fn typed(amounts: &[(GasComponent, f64)]) -> CalorificInput {
        CalorificInput {
            components: amounts.iter().copied().collect(),
        }
    }
}
