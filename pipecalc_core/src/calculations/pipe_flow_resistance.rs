//! # Pipe Flow Resistance
//!
//! Frictional pressure drop of a fluid flowing through a straight circular
//! pipe, by Darcy–Weisbach.
//!
//! ## Method
//!
//! 1. Mean velocity `v = Q / (πD²/4)` with Q converted from m³/h to m³/s
//! 2. Density ρ and viscosity μ from the fluid correlation at T (and p, for air)
//! 3. `Re = ρvD/μ`
//! 4. Friction factor: `64/Re` below Re = 2300, Swamee–Jain above
//! 5. `Δp = f·(L/D)·ρv²/2`
//!
//! ## Assumptions
//!
//! - Fully developed, incompressible, isothermal flow
//! - `roughness` is the relative roughness ε/D
//!
//! ## Example
//!
//! ```rust
//! use pipecalc_core::calculations::pipe_flow_resistance::{calculate, PipeFlowInput};
//! use pipecalc_core::correlations::Fluid;
//!
//! let input = PipeFlowInput {
//!     flow_rate_m3_h: 100.0,
//!     diameter_m: 0.1,
//!     length_m: 100.0,
//!     fluid: Fluid::Water,
//!     temperature_c: 20.0,
//!     pressure_kpa: 101.3,
//!     relative_roughness: 0.0001,
//! };
//! let result = calculate(&input).unwrap();
//! assert!(result.pressure_drop_pa > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use super::{Calculation, TestCase};
use crate::correlations::{
    darcy_pressure_drop, fluid_properties, friction_factor, mean_velocity, reynolds_number,
    FlowRegime, Fluid,
};
use crate::errors::{CalcError, CalcResult};
use crate::inputs::Inputs;
use crate::result::ResultSet;
use crate::schema::{CalculationConfig, Fields, InputSpec, OutputSpec};
use crate::units::{per_hour_to_per_second, Unit};

pub const ID: &str = "pipe_flow_resistance";

/// Input parameters for a straight-pipe pressure drop.
///
/// ## JSON Example
///
/// ```json
/// {
///   "flow_rate_m3_h": 100.0,
///   "diameter_m": 0.1,
///   "length_m": 100.0,
///   "fluid": "water",
///   "temperature_c": 20.0,
///   "pressure_kpa": 101.3,
///   "relative_roughness": 0.0001
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeFlowInput {
    /// Volumetric flow rate (m³/h)
    pub flow_rate_m3_h: f64,
    /// Internal diameter (m)
    pub diameter_m: f64,
    /// Pipe length (m)
    pub length_m: f64,
    pub fluid: Fluid,
    /// Fluid temperature (°C)
    pub temperature_c: f64,
    /// Absolute pressure (kPa), used for gas density
    pub pressure_kpa: f64,
    /// Relative roughness ε/D
    pub relative_roughness: f64,
}

impl PipeFlowInput {
    fn from_fields(fields: &Fields) -> CalcResult<Self> {
        Ok(Self {
            flow_rate_m3_h: fields.number("flowRate")?,
            diameter_m: fields.number("diameter")?,
            length_m: fields.number("length")?,
            fluid: Fluid::from_key(fields.text("fluid")?),
            temperature_c: fields.number("temperature")?,
            pressure_kpa: fields.number("pressure")?,
            relative_roughness: fields.number("roughness")?,
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("flowRate", self.flow_rate_m3_h, "Flow rate must be positive"),
            ("diameter", self.diameter_m, "Diameter must be positive"),
            ("length", self.length_m, "Length must be positive"),
            ("pressure", self.pressure_kpa, "Pressure must be positive"),
        ];
        for (field, value, reason) in positive {
            if value <= 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), reason));
            }
        }
        if self.relative_roughness < 0.0 {
            return Err(CalcError::invalid_input(
                "roughness",
                self.relative_roughness.to_string(),
                "Roughness cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Results from a pipe flow calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeFlowResult {
    /// Density (kg/m³)
    pub density: f64,
    /// Dynamic viscosity (Pa·s)
    pub viscosity: f64,
    /// Mean velocity (m/s)
    pub velocity: f64,
    pub reynolds: f64,
    pub regime: FlowRegime,
    /// Darcy friction factor
    pub friction_factor: f64,
    /// Frictional pressure drop (Pa)
    pub pressure_drop_pa: f64,
}

impl PipeFlowResult {
    pub fn to_result_set(&self) -> CalcResult<ResultSet> {
        ResultSet::builder()
            .scalar("density", self.density, Unit::KgPerCubicMeter)
            .scalar("viscosity", self.viscosity, Unit::PascalSecond)
            .scalar("velocity", self.velocity, Unit::MetersPerSecond)
            .scalar("reynolds", self.reynolds, Unit::Dimensionless)
            .scalar("frictionFactor", self.friction_factor, Unit::Dimensionless)
            .scalar("pressureDrop", self.pressure_drop_pa, Unit::Pascal)
            .build()
    }
}

/// Calculate the pressure drop.
pub fn calculate(input: &PipeFlowInput) -> CalcResult<PipeFlowResult> {
    input.validate()?;

    let velocity = mean_velocity(per_hour_to_per_second(input.flow_rate_m3_h), input.diameter_m);
    let props = fluid_properties(input.fluid, input.temperature_c, input.pressure_kpa);
    let reynolds = reynolds_number(props.density, velocity, input.diameter_m, props.viscosity);
    let f = friction_factor(reynolds, input.relative_roughness);
    let pressure_drop_pa =
        darcy_pressure_drop(f, input.length_m, input.diameter_m, props.density, velocity);

    Ok(PipeFlowResult {
        density: props.density,
        viscosity: props.viscosity,
        velocity,
        reynolds,
        regime: FlowRegime::from_reynolds(reynolds),
        friction_factor: f,
        pressure_drop_pa,
    })
}

/// Catalog entry for the pipe flow resistance calculation.
#[derive(Debug)]
pub struct PipeFlowResistance {
    config: CalculationConfig,
}

impl PipeFlowResistance {
    pub fn new() -> Self {
        let fluids: Vec<&str> = Fluid::ALL.iter().map(Fluid::key).collect();
        let config = CalculationConfig {
            id: ID.to_string(),
            name: "Pipe Flow Resistance".to_string(),
            description: "Darcy–Weisbach pressure drop with laminar/turbulent friction factor"
                .to_string(),
            category: "hydraulic_calculations".to_string(),
            version: "1.0.0".to_string(),
            inputs: vec![
                InputSpec::numeric("flowRate", "Flow rate", Unit::CubicMetersPerHour).required(),
                InputSpec::numeric("diameter", "Internal diameter", Unit::Meters).required(),
                InputSpec::numeric("length", "Pipe length", Unit::Meters).required(),
                InputSpec::select("fluid", "Fluid", &fluids)
                    .default_value("water")
                    .accept_unlisted(),
                InputSpec::numeric("temperature", "Temperature", Unit::Celsius)
                    .default_value(20.0)
                    .min(-50.0)
                    .max(300.0),
                InputSpec::numeric("pressure", "Absolute pressure", Unit::Kilopascal)
                    .default_value(101.325),
                InputSpec::numeric("roughness", "Relative roughness ε/D", Unit::Dimensionless)
                    .default_value(0.0001)
                    .min(0.0)
                    .max(0.05),
            ],
            outputs: vec![
                OutputSpec::new("density", "Density", Unit::KgPerCubicMeter, 2),
                OutputSpec::new("viscosity", "Dynamic viscosity", Unit::PascalSecond, 6),
                OutputSpec::new("velocity", "Velocity", Unit::MetersPerSecond, 3),
                OutputSpec::new("reynolds", "Reynolds number", Unit::Dimensionless, 0),
                OutputSpec::new("frictionFactor", "Friction factor", Unit::Dimensionless, 5),
                OutputSpec::new("pressureDrop", "Pressure drop", Unit::Pascal, 1),
            ],
        };
        Self { config }
    }
}

impl Default for PipeFlowResistance {
    fn default() -> Self {
        Self::new()
    }
}

fn water_case(flow_rate: f64, diameter: f64, length: f64) -> Inputs {
    Inputs::new()
        .with("flowRate", flow_rate)
        .with("diameter", diameter)
        .with("length", length)
        .with("fluid", "water")
        .with("temperature", 20.0)
        .with("pressure", 101.3)
        .with("roughness", 0.0001)
}

impl Calculation for PipeFlowResistance {
    type Input = PipeFlowInput;

    fn config(&self) -> &CalculationConfig {
        &self.config
    }

    fn parse(&self, fields: &Fields) -> CalcResult<PipeFlowInput> {
        let input = PipeFlowInput::from_fields(fields)?;
        input.validate()?;
        Ok(input)
    }

    fn compute(&self, input: &PipeFlowInput) -> CalcResult<ResultSet> {
        calculate(input)?.to_result_set()
    }

    fn smoke_case(&self) -> TestCase {
        TestCase::new("smoke test", water_case(100.0, 0.1, 100.0), |r| {
            r.scalar("pressureDrop").is_some_and(|dp| dp > 0.0)
        })
    }

    fn test_cases(&self) -> Vec<TestCase> {
        vec![
            TestCase::new("Water run returns success", water_case(100.0, 0.1, 100.0), |r| {
                r.is_success() && r.scalar("pressureDrop").is_some_and(|dp| dp > 0.0)
            }),
            TestCase::new("Low flow returns friction factor", water_case(1.0, 0.05, 10.0), |r| {
                r.is_success() && r.scalar("frictionFactor").is_some_and(|f| f > 0.0)
            }),
            TestCase::new("Laminar branch uses 64/Re", water_case(0.1, 0.05, 10.0), |r| {
                match (r.scalar("reynolds"), r.scalar("frictionFactor")) {
                    (Some(re), Some(f)) => re < 2300.0 && (f - 64.0 / re).abs() < 1e-12,
                    _ => false,
                }
            }),
            TestCase::new(
                "Unknown fluid falls back to water",
                water_case(1.0, 0.05, 10.0).with("fluid", "mercury"),
                |r| r.is_success() && r.scalar("density").is_some_and(|rho| (rho - 998.2).abs() < 0.5),
            ),
            TestCase::rejects("Rejects zero flow", water_case(0.0, 0.1, 10.0)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{CalculationModule, Module};

    fn module() -> Module<PipeFlowResistance> {
        Module::new(PipeFlowResistance::new())
    }

    #[test]
    fn test_reference_water_run() {
        let result = module().calculate(&water_case(100.0, 0.1, 100.0)).unwrap();
        assert!(result.is_success());
        // v = (100/3600) / (π·0.1²/4) = 3.537 m/s
        assert!((result.scalar("velocity").unwrap() - 3.537).abs() < 0.001);
        assert!(result.scalar("reynolds").unwrap() > 2300.0);
        assert!(result.scalar("pressureDrop").unwrap() > 0.0);
        assert_eq!(result.unit("pressureDrop"), Some("Pa"));
        assert_eq!(result.unit("reynolds"), Some(""));
    }

    #[test]
    fn test_low_flow_case() {
        let result = module().calculate(&water_case(1.0, 0.05, 10.0)).unwrap();
        assert!(result.is_success());
        assert!(result.scalar("frictionFactor").unwrap() > 0.0);
    }

    #[test]
    fn test_laminar_path() {
        let input = PipeFlowInput {
            flow_rate_m3_h: 0.1,
            diameter_m: 0.05,
            length_m: 10.0,
            fluid: Fluid::Water,
            temperature_c: 20.0,
            pressure_kpa: 101.3,
            relative_roughness: 0.0001,
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.regime, FlowRegime::Laminar);
        assert!((result.friction_factor - 64.0 / result.reynolds).abs() < 1e-12);
    }

    #[test]
    fn test_rejection_laws() {
        for (field, value) in [
            ("flowRate", 0.0),
            ("flowRate", -1.0),
            ("diameter", 0.0),
            ("diameter", -0.1),
            ("length", 0.0),
            ("pressure", 0.0),
            ("pressure", -101.3),
        ] {
            let mut inputs = water_case(100.0, 0.1, 100.0);
            inputs.set(field, value);
            let result = module().calculate(&inputs).unwrap();
            assert!(result.is_failure(), "{field} = {value} accepted");
            assert!(result.error.is_some());
            assert!(result.results.is_none());
        }
    }

    #[test]
    fn test_missing_required_field() {
        let inputs = Inputs::new().with("flowRate", 100.0).with("diameter", 0.1);
        let outcome = module().validate(&inputs);
        assert!(!outcome.valid);
        assert!(outcome.message.unwrap().contains("length"));
    }

    #[test]
    fn test_defaults_fill_optional_fields() {
        let inputs = Inputs::new()
            .with("flowRate", 100.0)
            .with("diameter", 0.1)
            .with("length", 100.0);
        let result = module().calculate(&inputs).unwrap();
        assert!(result.is_success());
        assert!((result.scalar("density").unwrap() - 998.2).abs() < 0.1);
    }

    #[test]
    fn test_air_is_lighter_than_water() {
        let mut inputs = water_case(100.0, 0.1, 100.0);
        inputs.set("fluid", "air");
        let air = module().calculate(&inputs).unwrap();
        let water = module().calculate(&water_case(100.0, 0.1, 100.0)).unwrap();
        assert!(air.scalar("density").unwrap() < 2.0);
        assert!(air.scalar("pressureDrop").unwrap() < water.scalar("pressureDrop").unwrap());
    }

    #[test]
    fn test_unknown_fluid_computes_as_water() {
        let mut inputs = water_case(1.0, 0.05, 10.0);
        inputs.set("fluid", "mercury");
        let unknown = module().calculate(&inputs).unwrap();
        let water = module().calculate(&water_case(1.0, 0.05, 10.0)).unwrap();
        assert!(unknown.is_success());
        assert_eq!(unknown.scalar("density"), water.scalar("density"));
        assert_eq!(unknown.scalar("pressureDrop"), water.scalar("pressureDrop"));
    }

    #[test]
    fn test_longer_pipe_more_drop() {
        let short = module().calculate(&water_case(50.0, 0.1, 10.0)).unwrap();
        let long = module().calculate(&water_case(50.0, 0.1, 20.0)).unwrap();
        let ratio = long.scalar("pressureDrop").unwrap() / short.scalar("pressureDrop").unwrap();
        assert!((ratio - 2.0).abs() < 1e-9);
    }
}
