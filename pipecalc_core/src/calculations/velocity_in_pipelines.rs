//! # Velocity in Pipelines
//!
//! Mean velocity of one volumetric flow across the standard bore series,
//! with each row classified against the gas and liquid guideline ranges.
//!
//! ## Example
//!
//! ```rust
//! use pipecalc_core::calculations::velocity_in_pipelines::{calculate, VelocityInput};
//! use pipecalc_core::correlations::Band;
//!
//! let result = calculate(&VelocityInput { flow_rate_m3_h: 100.0 }).unwrap();
//! assert_eq!(result.rows.len(), 20);
//! assert_eq!(result.rows[9].band, Band::Liquid); // 200 mm, 0.88 m/s
//! ```

use serde::{Deserialize, Serialize};

use super::{Calculation, TestCase};
use crate::correlations::{mean_velocity, Band, STANDARD_DIAMETERS_MM};
use crate::errors::{CalcError, CalcResult};
use crate::inputs::Inputs;
use crate::result::{ResultSet, VelocityRow};
use crate::schema::{CalculationConfig, Fields, InputSpec, OutputSpec};
use crate::units::{per_hour_to_per_second, Unit, MM_PER_M};

pub const ID: &str = "velocity_in_pipelines";

/// Input for the velocity table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityInput {
    /// Volumetric flow rate (m³/h)
    pub flow_rate_m3_h: f64,
}

impl VelocityInput {
    fn from_fields(fields: &Fields) -> CalcResult<Self> {
        Ok(Self {
            flow_rate_m3_h: fields.number("flowRate")?,
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
        Ok(())
    }
}

/// One row per standard bore, in ascending bore order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityResult {
    pub rows: Vec<VelocityRow>,
}

impl VelocityResult {
    pub fn to_result_set(&self) -> CalcResult<ResultSet> {
        ResultSet::builder()
            .table("table", self.rows.clone(), Unit::MetersPerSecond)
            .build()
    }
}

/// Build the velocity table for `input`.
pub fn calculate(input: &VelocityInput) -> CalcResult<VelocityResult> {
    input.validate()?;

    let flow_m3_s = per_hour_to_per_second(input.flow_rate_m3_h);
    let rows = STANDARD_DIAMETERS_MM
        .iter()
        .map(|&diameter| {
            let velocity = mean_velocity(flow_m3_s, diameter / MM_PER_M);
            VelocityRow {
                diameter,
                velocity,
                band: Band::classify(velocity),
            }
        })
        .collect();

    Ok(VelocityResult { rows })
}

#[derive(Debug)]
pub struct VelocityInPipelines {
    config: CalculationConfig,
}

impl VelocityInPipelines {
    pub fn new() -> Self {
        let config = CalculationConfig {
            id: ID.to_string(),
            name: "Velocity in Pipelines".to_string(),
            description: "Velocity across standard bores with gas/liquid guideline bands".to_string(),
            category: "technological_calculations".to_string(),
            version: "1.0.0".to_string(),
            inputs: vec![
                InputSpec::numeric("flowRate", "Flow rate", Unit::CubicMetersPerHour).required(),
            ],
            outputs: vec![OutputSpec::new("table", "Velocity by bore", Unit::MetersPerSecond, 2)],
        };
        Self { config }
    }
}

impl Default for VelocityInPipelines {
    fn default() -> Self {
        Self::new()
    }
}

fn reference_flow() -> Inputs {
    Inputs::new().with("flowRate", 100.0)
}

impl Calculation for VelocityInPipelines {
    type Input = VelocityInput;

    fn config(&self) -> &CalculationConfig {
        &self.config
    }

    fn parse(&self, fields: &Fields) -> CalcResult<VelocityInput> {
        let input = VelocityInput::from_fields(fields)?;
        input.validate()?;
        Ok(input)
    }

    fn compute(&self, input: &VelocityInput) -> CalcResult<ResultSet> {
        calculate(input)?.to_result_set()
    }

    fn smoke_case(&self) -> TestCase {
        TestCase::new("smoke test", reference_flow(), |r| {
            r.table("table")
                .is_some_and(|rows| rows.len() == STANDARD_DIAMETERS_MM.len())
        })
    }

    fn test_cases(&self) -> Vec<TestCase> {
        vec![
            TestCase::new("Returns table", reference_flow(), |r| {
                r.is_success() && r.table("table").is_some_and(|rows| !rows.is_empty())
            }),
            TestCase::new("Bands assigned", reference_flow(), |r| {
                r.table("table").is_some_and(|rows| {
                    rows.iter().any(|row| matches!(row.band, Band::Gas | Band::Liquid))
                })
            }),
            TestCase::rejects("Rejects zero flow", Inputs::new().with("flowRate", 0.0)),
        ]
    }
}
