//! # Liquid Height over a Perforated Distributor
//!
//! Head of liquid needed to push a flow through a set of equal round holes.
//!
//! ```text
//! A = n · πd²/4
//! v = Q / A
//! h = (v/μ)² / 2g
//! ```

use serde::{Deserialize, Serialize};

use super::{Calculation, TestCase};
use crate::correlations::circular_area;
use crate::errors::{CalcError, CalcResult};
use crate::inputs::Inputs;
use crate::result::ResultSet;
use crate::schema::{CalculationConfig, Fields, InputSpec, OutputSpec};
use crate::units::{per_hour_to_per_second, Unit, MM_PER_M, STANDARD_GRAVITY};

pub const ID: &str = "liquid_height";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquidHeightInput {
    /// Flow rate (m³/h)
    pub flow_rate_m3_h: f64,
    /// Hole diameter (mm)
    pub hole_diameter_mm: f64,
    pub hole_count: u32,
    /// Discharge coefficient μ
    pub discharge_coefficient: f64,
}

impl LiquidHeightInput {
    fn from_fields(fields: &Fields) -> CalcResult<Self> {
        let count = fields.number("holeCount")?;
        if count < 1.0 || count.fract() != 0.0 || count > f64::from(u32::MAX) {
            return Err(CalcError::invalid_input(
                "holeCount",
                count.to_string(),
                "Number of holes must be a positive whole number",
            ));
        }
        Ok(Self {
            flow_rate_m3_h: fields.number("flowRate")?,
            hole_diameter_mm: fields.number("holeDiameter")?,
            hole_count: count as u32,
            discharge_coefficient: fields.number("dischargeCoefficient")?,
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.flow_rate_m3_h <= 0.0 {
            return Err(CalcError::invalid_input(
                "flowRate",
                self.flow_rate_m3_h.to_string(),
                "Flow rate must be positive",
            ));
        }
        if self.hole_diameter_mm <= 0.0 {
            return Err(CalcError::invalid_input(
                "holeDiameter",
                self.hole_diameter_mm.to_string(),
                "Hole diameter must be positive",
            ));
        }
        if self.hole_count == 0 {
            return Err(CalcError::invalid_input(
                "holeCount",
                "0",
                "Number of holes must be a positive whole number",
            ));
        }
        if self.discharge_coefficient <= 0.0 || self.discharge_coefficient > 1.0 {
            return Err(CalcError::invalid_input(
                "dischargeCoefficient",
                self.discharge_coefficient.to_string(),
                "Discharge coefficient must be within (0, 1]",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidHeightResult {
    /// Velocity through the holes (m/s)
    pub velocity_m_s: f64,
    /// Required liquid head (m)
    pub liquid_height_m: f64,
}

impl LiquidHeightResult {
    pub fn to_result_set(&self) -> CalcResult<ResultSet> {
        ResultSet::builder()
            .scalar("velocity", self.velocity_m_s, Unit::MetersPerSecond)
            .scalar("liquidHeight", self.liquid_height_m, Unit::Meters)
            .scalar("liquidHeightMm", self.liquid_height_m * MM_PER_M, Unit::Millimeters)
            .build()
    }
}

pub fn calculate(input: &LiquidHeightInput) -> CalcResult<LiquidHeightResult> {
    input.validate()?;

    let total_area = circular_area(input.hole_diameter_mm / MM_PER_M) * f64::from(input.hole_count);
    let velocity_m_s = per_hour_to_per_second(input.flow_rate_m3_h) / total_area;
    let liquid_height_m = (velocity_m_s / input.discharge_coefficient).powi(2) / (2.0 * STANDARD_GRAVITY);

    Ok(LiquidHeightResult {
        velocity_m_s,
        liquid_height_m,
    })
}

#[derive(Debug)]
pub struct LiquidHeight {
    config: CalculationConfig,
}

impl LiquidHeight {
    pub fn new() -> Self {
        let config = CalculationConfig {
            id: ID.to_string(),
            name: "Liquid Height".to_string(),
            description: "Liquid head over a perforated distributor plate".to_string(),
            category: "hydraulic_calculations".to_string(),
            version: "1.0.0".to_string(),
            inputs: vec![
                InputSpec::numeric("flowRate", "Flow rate", Unit::CubicMetersPerHour).required(),
                InputSpec::numeric("holeDiameter", "Hole diameter", Unit::Millimeters).required(),
                InputSpec::numeric("holeCount", "Number of holes", Unit::Pieces).required(),
                InputSpec::numeric("dischargeCoefficient", "Discharge coefficient", Unit::Dimensionless)
                    .default_value(0.62)
                    .max(1.0),
            ],
            outputs: vec![
                OutputSpec::new("velocity", "Hole velocity", Unit::MetersPerSecond, 4),
                OutputSpec::new("liquidHeight", "Liquid height", Unit::Meters, 4),
                OutputSpec::new("liquidHeightMm", "Liquid height", Unit::Millimeters, 2),
            ],
        };
        Self { config }
    }
}

impl Default for LiquidHeight {
    fn default() -> Self {
        Self::new()
    }
}

fn distributor() -> Inputs {
    Inputs::new()
        .with("flowRate", 50.0)
        .with("holeDiameter", 10.0)
        .with("holeCount", 20)
        .with("dischargeCoefficient", 0.62)
}

impl Calculation for LiquidHeight {
    type Input = LiquidHeightInput;

    fn config(&self) -> &CalculationConfig {
        &self.config
    }

    fn parse(&self, fields: &Fields) -> CalcResult<LiquidHeightInput> {
        let input = LiquidHeightInput::from_fields(fields)?;
        input.validate()?;
        Ok(input)
    }

    fn compute(&self, input: &LiquidHeightInput) -> CalcResult<ResultSet> {
        calculate(input)?.to_result_set()
    }

    fn smoke_case(&self) -> TestCase {
        TestCase::new("smoke test", distributor(), |r| {
            r.scalar("liquidHeight").is_some_and(|h| (h - 10.37).abs() < 0.05)
        })
    }

    fn test_cases(&self) -> Vec<TestCase> {
        vec![
            TestCase::new("Head in mm matches metres", distributor(), |r| {
                match (r.scalar("liquidHeight"), r.scalar("liquidHeightMm")) {
                    (Some(m), Some(mm)) => (m * 1000.0 - mm).abs() < 1e-9,
                    _ => false,
                }
            }),
            TestCase::rejects("Rejects zero holes", distributor().with("holeCount", 0)),
            TestCase::rejects(
                "Rejects coefficient above one",
                distributor().with("dischargeCoefficient", 1.2),
            ),
        ]
    }
}
