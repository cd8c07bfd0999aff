//! # Pipe Mass
//!
//! Mass take-off for straight pipe from outside diameter, wall thickness
//! and material density.
//!
//! ```text
//! Di  = Do − 2s
//! A   = π/4 · (Do² − Di²)
//! m/L = A · ρ
//! m   = m/L · L · n
//! ```

use serde::{Deserialize, Serialize};

use super::{Calculation, TestCase};
use crate::correlations::annulus_area;
use crate::errors::{CalcError, CalcResult};
use crate::inputs::Inputs;
use crate::materials::PipeMaterial;
use crate::result::ResultSet;
use crate::schema::{CalculationConfig, Fields, InputSpec, OutputSpec};
use crate::units::{Unit, MM_PER_M};

pub const ID: &str = "pipe_mass";

/// Largest outside diameter accepted (mm)
pub const MAX_OUTER_DIAMETER_MM: f64 = 3000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeMassInput {
    /// Outside diameter (mm)
    pub outer_diameter_mm: f64,
    /// Wall thickness (mm)
    pub wall_thickness_mm: f64,
    /// Length of one piece (m)
    pub length_m: f64,
    /// Number of pieces
    pub quantity: f64,
    pub material: PipeMaterial,
}

impl PipeMassInput {
    fn from_fields(fields: &Fields) -> CalcResult<Self> {
        Ok(Self {
            outer_diameter_mm: fields.number("outerDiameter")?,
            wall_thickness_mm: fields.number("wallThickness")?,
            length_m: fields.number("length")?,
            quantity: fields.number("quantity")?,
            material: PipeMaterial::from_name(fields.text("material")?)?,
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.outer_diameter_mm <= 0.0 || self.outer_diameter_mm > MAX_OUTER_DIAMETER_MM {
            return Err(CalcError::invalid_input(
                "outerDiameter",
                self.outer_diameter_mm.to_string(),
                format!("Outer diameter must be between 0 and {} mm", MAX_OUTER_DIAMETER_MM),
            ));
        }
        if self.wall_thickness_mm <= 0.0 || self.wall_thickness_mm >= self.outer_diameter_mm / 2.0 {
            return Err(CalcError::invalid_input(
                "wallThickness",
                self.wall_thickness_mm.to_string(),
                "Wall thickness must be positive and less than half of the outer diameter",
            ));
        }
        if self.length_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "length",
                self.length_m.to_string(),
                "Length must be positive",
            ));
        }
        if self.quantity <= 0.0 {
            return Err(CalcError::invalid_input(
                "quantity",
                self.quantity.to_string(),
                "Quantity must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeMassResult {
    /// Inside diameter (mm)
    pub inner_diameter_mm: f64,
    /// Linear mass (kg/m)
    pub mass_per_meter_kg: f64,
    /// Mass of all pieces (kg)
    pub total_mass_kg: f64,
    /// Combined length of all pieces (m)
    pub total_length_m: f64,
}

impl PipeMassResult {
    pub fn to_result_set(&self) -> CalcResult<ResultSet> {
        ResultSet::builder()
            .scalar("innerDiameter", self.inner_diameter_mm, Unit::Millimeters)
            .scalar("massPerMeter", self.mass_per_meter_kg, Unit::KgPerMeter)
            .scalar("totalMass", self.total_mass_kg, Unit::Kilograms)
            .scalar("totalLength", self.total_length_m, Unit::Meters)
            .build()
    }
}

pub fn calculate(input: &PipeMassInput) -> CalcResult<PipeMassResult> {
    input.validate()?;

    let inner_diameter_mm = input.outer_diameter_mm - 2.0 * input.wall_thickness_mm;
    let area_m2 = annulus_area(input.outer_diameter_mm / MM_PER_M, inner_diameter_mm / MM_PER_M);
    let mass_per_meter_kg = area_m2 * input.material.density();
    let total_length_m = input.length_m * input.quantity;

    Ok(PipeMassResult {
        inner_diameter_mm,
        mass_per_meter_kg,
        total_mass_kg: mass_per_meter_kg * total_length_m,
        total_length_m,
    })
}

#[derive(Debug)]
pub struct PipeMass {
    config: CalculationConfig,
}

impl PipeMass {
    pub fn new() -> Self {
        let materials: Vec<&str> = PipeMaterial::ALL.iter().map(|m| m.display_name()).collect();
        let config = CalculationConfig {
            id: ID.to_string(),
            name: "Pipe Mass".to_string(),
            description: "Linear and total mass of straight pipe".to_string(),
            category: "technological_calculations".to_string(),
            version: "1.0.0".to_string(),
            inputs: vec![
                InputSpec::numeric("outerDiameter", "Outside diameter", Unit::Millimeters).required(),
                InputSpec::numeric("wallThickness", "Wall thickness", Unit::Millimeters).required(),
                InputSpec::numeric("length", "Piece length", Unit::Meters).required(),
                InputSpec::numeric("quantity", "Quantity", Unit::Pieces).required(),
                InputSpec::select("material", "Material", &materials).required(),
            ],
            outputs: vec![
                OutputSpec::new("innerDiameter", "Inside diameter", Unit::Millimeters, 3),
                OutputSpec::new("massPerMeter", "Mass per metre", Unit::KgPerMeter, 3),
                OutputSpec::new("totalMass", "Total mass", Unit::Kilograms, 3),
                OutputSpec::new("totalLength", "Total length", Unit::Meters, 3),
            ],
        };
        Self { config }
    }
}

impl Default for PipeMass {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_order() -> Inputs {
    Inputs::new()
        .with("outerDiameter", 273.0)
        .with("wallThickness", 10.0)
        .with("length", 6.0)
        .with("quantity", 100.0)
        .with("material", "Carbon Steel")
}

impl Calculation for PipeMass {
    type Input = PipeMassInput;

    fn config(&self) -> &CalculationConfig {
        &self.config
    }

    fn parse(&self, fields: &Fields) -> CalcResult<PipeMassInput> {
        let input = PipeMassInput::from_fields(fields)?;
        input.validate()?;
        Ok(input)
    }

    fn compute(&self, input: &PipeMassInput) -> CalcResult<ResultSet> {
        calculate(input)?.to_result_set()
    }

    fn smoke_case(&self) -> TestCase {
        TestCase::new("smoke test", sample_order(), |r| {
            r.scalar("massPerMeter").is_some_and(|m| (m - 64.86).abs() < 0.1)
        })
    }

    fn test_cases(&self) -> Vec<TestCase> {
        vec![
            TestCase::new("Total mass scales with pieces", sample_order(), |r| {
                match (r.scalar("massPerMeter"), r.scalar("totalMass")) {
                    (Some(per_m), Some(total)) => (total - per_m * 600.0).abs() < 1e-6,
                    _ => false,
                }
            }),
            TestCase::rejects(
                "Wall thicker than radius rejected",
                sample_order().with("wallThickness", 140.0),
            ),
            TestCase::rejects("Unknown material rejected", sample_order().with("material", "Wood")),
        ]
    }
}
