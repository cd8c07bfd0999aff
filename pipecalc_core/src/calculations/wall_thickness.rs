//! # Wall Thickness Under Internal Pressure
//!
//! Required shell thickness of a cylindrical vessel or pipe under internal
//! design pressure, with the allowable stress taken from the temperature
//! table of the selected plate grade.
//!
//! ## Method
//!
//! ```text
//! [σ] = interpolate(grade table, T)
//! t   = P·D / ([σ]·φ − P)
//! t_c = t + c
//! D_o = D + 2·t_c
//! [P] = [σ]·φ·t / (D + t)          (equals P by construction)
//! margin = c / t · 100 %
//! ```
//!
//! The calculated thickness is the pressure thickness; corrosion allowance
//! is added afterwards. The back-computed allowable pressure inverts the
//! same relation and serves as a consistency check.

use serde::{Deserialize, Serialize};

use super::{Calculation, TestCase};
use crate::errors::{CalcError, CalcResult};
use crate::inputs::Inputs;
use crate::materials::{allowable_stress, VesselMaterial};
use crate::result::ResultSet;
use crate::schema::{CalculationConfig, Fields, InputSpec, OutputSpec};
use crate::units::Unit;

pub const ID: &str = "wall_thickness_internal_pressure";

/// Upper limit on the weld (joint) coefficient
pub const MAX_WELD_COEFFICIENT: f64 = 1.05;

/// Input parameters for a pressure-thickness calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "diameter_mm": 1000.0,
///   "pressure_mpa": 1.0,
///   "material": "Carbon Steel",
///   "grade": "SA-516 Gr.60",
///   "temperature_c": 20.0,
///   "corrosion_allowance_mm": 3.0,
///   "weld_coefficient": 1.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallThicknessInput {
    /// Inside diameter (mm)
    pub diameter_mm: f64,
    /// Internal design pressure (MPa)
    pub pressure_mpa: f64,
    pub material: VesselMaterial,
    pub grade: String,
    /// Design temperature (°C)
    pub temperature_c: f64,
    /// Corrosion allowance (mm)
    pub corrosion_allowance_mm: f64,
    /// Weld (joint) coefficient φ
    pub weld_coefficient: f64,
}

impl WallThicknessInput {
    fn from_fields(fields: &Fields) -> CalcResult<Self> {
        Ok(Self {
            diameter_mm: fields.number("diameter")?,
            pressure_mpa: fields.number("pressure")?,
            material: VesselMaterial::from_name(fields.text("material")?)?,
            grade: fields.text("grade")?.to_string(),
            temperature_c: fields.number("temperature")?,
            corrosion_allowance_mm: fields.number("corrosionAllowance")?,
            weld_coefficient: fields.number("weldCoefficient")?,
        })
    }

    /// Validate input parameters, including the material/grade lookup and
    /// the solvability of the thickness relation.
    pub fn validate(&self) -> CalcResult<()> {
        check_load(self.diameter_mm, self.pressure_mpa)?;
        if self.weld_coefficient <= 0.0 || self.weld_coefficient > MAX_WELD_COEFFICIENT {
            return Err(CalcError::invalid_input(
                "weldCoefficient",
                self.weld_coefficient.to_string(),
                format!("Weld coefficient must be within (0, {}]", MAX_WELD_COEFFICIENT),
            ));
        }
        if self.corrosion_allowance_mm < 0.0 {
            return Err(CalcError::invalid_input(
                "corrosionAllowance",
                self.corrosion_allowance_mm.to_string(),
                "Corrosion allowance cannot be negative",
            ));
        }
        let stress = self.allowable_stress()?;
        if stress * self.weld_coefficient <= self.pressure_mpa {
            return Err(CalcError::invalid_input(
                "pressure",
                self.pressure_mpa.to_string(),
                format!(
                    "Pressure must be below the weld-reduced allowable stress ({:.1} MPa)",
                    stress * self.weld_coefficient
                ),
            ));
        }
        Ok(())
    }

    /// Allowable stress (MPa) for the selected grade at design temperature
    pub fn allowable_stress(&self) -> CalcResult<f64> {
        allowable_stress(self.material, &self.grade, self.temperature_c)
    }
}

/// Diameter and pressure must both be positive.
fn check_load(diameter_mm: f64, pressure_mpa: f64) -> CalcResult<()> {
    if diameter_mm <= 0.0 {
        return Err(CalcError::invalid_input(
            "diameter",
            diameter_mm.to_string(),
            "Diameter must be positive",
        ));
    }
    if pressure_mpa <= 0.0 {
        return Err(CalcError::invalid_input(
            "pressure",
            pressure_mpa.to_string(),
            "Pressure must be positive",
        ));
    }
    Ok(())
}

/// Results from a wall thickness calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallThicknessResult {
    /// Allowable stress at design temperature (MPa)
    pub allowable_stress_mpa: f64,
    /// Pressure thickness without allowances (mm)
    pub thickness_mm: f64,
    /// Thickness including corrosion allowance (mm)
    pub total_thickness_mm: f64,
    /// Outside diameter with total thickness (mm)
    pub outer_diameter_mm: f64,
    /// Allowable pressure back-computed from the pressure thickness (MPa)
    pub allowable_pressure_mpa: f64,
    /// Corrosion allowance as a share of the pressure thickness (%)
    pub safety_margin_pct: f64,
}

impl WallThicknessResult {
    pub fn to_result_set(&self) -> CalcResult<ResultSet> {
        ResultSet::builder()
            .scalar("allowableStress", self.allowable_stress_mpa, Unit::Megapascal)
            .scalar("thickness", self.thickness_mm, Unit::Millimeters)
            .scalar("totalThickness", self.total_thickness_mm, Unit::Millimeters)
            .scalar("outerDiameter", self.outer_diameter_mm, Unit::Millimeters)
            .scalar("allowablePressure", self.allowable_pressure_mpa, Unit::Megapascal)
            .scalar("safetyMargin", self.safety_margin_pct, Unit::Percent)
            .build()
    }
}

/// Calculate the required wall thickness.
pub fn calculate(input: &WallThicknessInput) -> CalcResult<WallThicknessResult> {
    input.validate()?;

    let stress = input.allowable_stress()?;
    let phi = input.weld_coefficient;
    let p = input.pressure_mpa;
    let d = input.diameter_mm;
    let c = input.corrosion_allowance_mm;

    let thickness_mm = p * d / (stress * phi - p);
    let total_thickness_mm = thickness_mm + c;

    Ok(WallThicknessResult {
        allowable_stress_mpa: stress,
        thickness_mm,
        total_thickness_mm,
        outer_diameter_mm: d + 2.0 * total_thickness_mm,
        allowable_pressure_mpa: stress * phi * thickness_mm / (d + thickness_mm),
        safety_margin_pct: c / thickness_mm * 100.0,
    })
}

/// Catalog entry for the wall thickness calculation.
#[derive(Debug)]
pub struct WallThickness {
    config: CalculationConfig,
}

impl WallThickness {
    pub fn new() -> Self {
        let materials: Vec<&str> = VesselMaterial::ALL.iter().map(|m| m.display_name()).collect();
        let grades: Vec<&str> = VesselMaterial::ALL
            .iter()
            .flat_map(|m| m.grades().iter().copied())
            .collect();
        let config = CalculationConfig {
            id: ID.to_string(),
            name: "Wall Thickness (Internal Pressure)".to_string(),
            description: "Shell thickness from allowable stress, weld coefficient and corrosion allowance"
                .to_string(),
            category: "stress_calculations".to_string(),
            version: "1.0.0".to_string(),
            inputs: vec![
                InputSpec::numeric("diameter", "Inside diameter", Unit::Millimeters).required(),
                InputSpec::numeric("pressure", "Design pressure", Unit::Megapascal).required(),
                // Checked after diameter and pressure; a missing value is
                // reported by `parse`
                InputSpec::select("material", "Material", &materials),
                InputSpec::select("grade", "Grade", &grades),
                InputSpec::numeric("temperature", "Design temperature", Unit::Celsius)
                    .default_value(20.0),
                InputSpec::numeric("corrosionAllowance", "Corrosion allowance", Unit::Millimeters)
                    .default_value(0.0)
                    .min(0.0),
                InputSpec::numeric("weldCoefficient", "Weld coefficient", Unit::Dimensionless)
                    .default_value(1.0)
                    .min(0.0)
                    .max(MAX_WELD_COEFFICIENT),
            ],
            outputs: vec![
                OutputSpec::new("allowableStress", "Allowable stress", Unit::Megapascal, 1),
                OutputSpec::new("thickness", "Calculated thickness", Unit::Millimeters, 2),
                OutputSpec::new("totalThickness", "Total thickness", Unit::Millimeters, 2),
                OutputSpec::new("outerDiameter", "Outside diameter", Unit::Millimeters, 1),
                OutputSpec::new("allowablePressure", "Allowable pressure", Unit::Megapascal, 3),
                OutputSpec::new("safetyMargin", "Corrosion margin", Unit::Percent, 1),
            ],
        };
        Self { config }
    }
}

impl Default for WallThickness {
    fn default() -> Self {
        Self::new()
    }
}

fn standard_case() -> Inputs {
    Inputs::new()
        .with("diameter", 1000.0)
        .with("pressure", 1.0)
        .with("material", "Carbon Steel")
        .with("grade", "SA-516 Gr.60")
        .with("temperature", 20.0)
        .with("corrosionAllowance", 3.0)
        .with("weldCoefficient", 1.0)
}

fn near_reference_thickness(r: &ResultSet) -> bool {
    r.scalar("thickness").is_some_and(|t| (t - 8.5).abs() < 0.3)
}

impl Calculation for WallThickness {
    type Input = WallThicknessInput;

    fn config(&self) -> &CalculationConfig {
        &self.config
    }

    fn parse(&self, fields: &Fields) -> CalcResult<WallThicknessInput> {
        check_load(fields.number("diameter")?, fields.number("pressure")?)?;
        let input = WallThicknessInput::from_fields(fields)?;
        input.validate()?;
        Ok(input)
    }

    fn compute(&self, input: &WallThicknessInput) -> CalcResult<ResultSet> {
        calculate(input)?.to_result_set()
    }

    fn smoke_case(&self) -> TestCase {
        TestCase::new("smoke test", standard_case(), near_reference_thickness)
    }

    fn test_cases(&self) -> Vec<TestCase> {
        vec![
            TestCase::new("Standard case", standard_case(), |r| {
                r.is_success() && near_reference_thickness(r)
            }),
            TestCase::rejects(
                "Invalid pressure rejected",
                standard_case().with("pressure", -1.0),
            ),
            TestCase::rejects(
                "Negative pressure without material rejected",
                Inputs::new()
                    .with("diameter", 1000.0)
                    .with("pressure", -1.0)
                    .with("weldCoefficient", 1.0),
            ),
            TestCase::rejects(
                "Unknown grade rejected",
                standard_case().with("grade", "SA-240 TP304"),
            ),
            TestCase::rejects(
                "Weld coefficient above limit rejected",
                standard_case().with("weldCoefficient", 1.2),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{CalculationModule, Module};

    fn module() -> Module<WallThickness> {
        Module::new(WallThickness::new())
    }

    fn typed_input(pressure_mpa: f64) -> WallThicknessInput {
        WallThicknessInput {
            diameter_mm: 1000.0,
            pressure_mpa,
            material: VesselMaterial::CarbonSteel,
            grade: "SA-516 Gr.60".to_string(),
            temperature_c: 20.0,
            corrosion_allowance_mm: 3.0,
            weld_coefficient: 1.0,
        }
    }

    #[test]
    fn test_standard_case() {
        let result = module().calculate(&standard_case()).unwrap();
        assert!(result.is_success());
        // t = 1·1000 / (117·1 − 1) = 8.62 mm
        let t = result.scalar("thickness").unwrap();
        assert!((t - 8.5).abs() < 0.3);
        assert!((t - 1000.0 / 116.0).abs() < 1e-9);
        assert_eq!(result.scalar("allowableStress"), Some(117.0));
        assert!((result.scalar("totalThickness").unwrap() - (t + 3.0)).abs() < 1e-12);
        assert_eq!(result.unit("thickness"), Some("mm"));
    }

    #[test]
    fn test_back_computed_pressure_matches_design() {
        let result = calculate(&typed_input(2.5)).unwrap();
        assert!((result.allowable_pressure_mpa - 2.5).abs() < 1e-9);
        assert!((result.outer_diameter_mm - (1000.0 + 2.0 * result.total_thickness_mm)).abs() < 1e-9);
    }

    #[test]
    fn test_safety_margin() {
        let result = calculate(&typed_input(1.0)).unwrap();
        let expected = 3.0 / result.thickness_mm * 100.0;
        assert!((result.safety_margin_pct - expected).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_pressure() {
        let inputs = standard_case().with("pressure", -1.0);
        let result = module().calculate(&inputs).unwrap();
        assert!(result.is_failure());
        assert!(result.error.unwrap().contains("Pressure must be positive"));

        let zero = standard_case().with("pressure", 0.0);
        assert!(module().calculate(&zero).unwrap().is_failure());
    }

    #[test]
    fn test_negative_pressure_reported_before_material() {
        let inputs = Inputs::new()
            .with("diameter", 1000.0)
            .with("pressure", -1.0)
            .with("weldCoefficient", 1.0);
        let result = module().calculate(&inputs).unwrap();
        assert!(result.is_failure());
        assert!(result.error.unwrap().contains("Pressure must be positive"));
    }

    #[test]
    fn test_missing_material_after_valid_load() {
        let inputs = Inputs::new().with("diameter", 1000.0).with("pressure", 1.0);
        let outcome = module().validate(&inputs);
        assert!(!outcome.valid);
        assert!(outcome.message.unwrap().contains("material"));
    }

    #[test]
    fn test_weld_coefficient_range() {
        for phi in [0.0, -0.5, 1.06] {
            let inputs = standard_case().with("weldCoefficient", phi);
            assert!(module().calculate(&inputs).unwrap().is_failure(), "φ = {phi}");
        }
        let edge = standard_case().with("weldCoefficient", 1.05);
        assert!(module().calculate(&edge).unwrap().is_success());
    }

    #[test]
    fn test_unknown_material_is_validation_error() {
        let inputs = standard_case().with("material", "Titanium");
        let outcome = module().validate(&inputs);
        assert!(!outcome.valid);

        let mismatched = standard_case().with("grade", "SA-240 TP316");
        let result = module().calculate(&mismatched).unwrap();
        assert!(result.is_failure());
        assert!(result.error.unwrap().contains("Material not found"));
    }

    #[test]
    fn test_pressure_beyond_capacity_rejected() {
        let inputs = standard_case().with("pressure", 117.0);
        assert!(module().calculate(&inputs).unwrap().is_failure());
    }

    #[test]
    fn test_higher_temperature_needs_more_wall() {
        let cold = calculate(&typed_input(1.0)).unwrap();
        let mut hot_input = typed_input(1.0);
        hot_input.temperature_c = 350.0;
        let hot = calculate(&hot_input).unwrap();
        assert_eq!(hot.allowable_stress_mpa, 71.0);
        assert!(hot.thickness_mm > cold.thickness_mm);
    }

    #[test]
    fn test_stainless_grade() {
        let inputs = standard_case()
            .with("material", "Stainless Steel")
            .with("grade", "SA-240 TP304")
            .with("temperature", 100.0);
        let result = module().calculate(&inputs).unwrap();
        assert_eq!(result.scalar("allowableStress"), Some(114.0));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn thickness_non_decreasing_in_pressure(
            p in 0.01_f64..50.0,
            dp in 0.0_f64..50.0,
            temperature in -29.0_f64..400.0,
            phi in 0.7_f64..1.0,
        ) {
            let base = WallThicknessInput {
                diameter_mm: 800.0,
                pressure_mpa: p,
                material: VesselMaterial::CarbonSteel,
                grade: "SA-516 Gr.60".to_string(),
                temperature_c: temperature,
                corrosion_allowance_mm: 1.5,
                weld_coefficient: phi,
            };
            let higher = WallThicknessInput { pressure_mpa: p + dp, ..base.clone() };
            if let (Ok(a), Ok(b)) = (calculate(&base), calculate(&higher)) {
                prop_assert!(b.thickness_mm >= a.thickness_mm);
                prop_assert!(b.total_thickness_mm >= a.total_thickness_mm);
            }
        }
    }
}
