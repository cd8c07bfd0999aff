//! # Calculation Modules
//!
//! Every calculation follows the same pattern:
//!
//! - `*Input` - Typed input record, built from resolved form fields, with `validate()`
//! - `*Result` - Typed results (JSON-serializable), convertible to a [`ResultSet`]
//! - `calculate(input) -> CalcResult<*Result>` - Pure calculation function
//! - a unit struct implementing [`Calculation`], which the registry wraps in
//!   [`Module`] to expose the uniform [`CalculationModule`] contract
//!
//! ## Contract
//!
//! - `validate` resolves raw inputs against the module's [`InputSpec`](crate::schema::InputSpec)
//!   set, builds the typed record and runs its physical checks; first violation wins
//! - `calculate` performs the same validation first and returns `{success: false}`
//!   on a domain violation without computing anything
//! - `smoke_test` runs one fixed input and checks one numeric property
//! - `run_tests` runs the module's named assertions
//!
//! Anything other than a domain violation (a broken table, a non-finite
//! output) comes back as `Err` and is the caller's to handle.
//!
//! ## Available Calculations
//!
//! - [`pipe_flow_resistance`] - Darcy–Weisbach pressure drop in a straight pipe
//! - [`wall_thickness`] - Shell thickness under internal pressure
//! - [`velocity_in_pipelines`] - Velocity table over standard bores with band classification
//! - [`gas_calorific_value`] - Heating value and density of a fuel-gas mixture
//! - [`pipe_mass`] - Mass take-off for straight pipe
//! - [`liquid_height`] - Liquid head over a perforated distributor

pub mod gas_calorific_value;
pub mod liquid_height;
pub mod pipe_flow_resistance;
pub mod pipe_mass;
pub mod velocity_in_pipelines;
pub mod wall_thickness;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CalcResult;
use crate::inputs::Inputs;
use crate::result::{ResultSet, ValidationOutcome};
use crate::schema::{CalculationConfig, Fields};

// Re-export commonly used types
pub use gas_calorific_value::{CalorificInput, CalorificResult, GasCalorificValue};
pub use liquid_height::{LiquidHeight, LiquidHeightInput, LiquidHeightResult};
pub use pipe_flow_resistance::{PipeFlowInput, PipeFlowResistance, PipeFlowResult};
pub use pipe_mass::{PipeMass, PipeMassInput, PipeMassResult};
pub use velocity_in_pipelines::{VelocityInPipelines, VelocityInput, VelocityResult};
pub use wall_thickness::{WallThickness, WallThicknessInput, WallThicknessResult};

/// Uniform contract consumed by renderers, the registry and the harness.
pub trait CalculationModule: Send + Sync {
    /// Calculation identifier (e.g. `"pipe_flow_resistance"`)
    fn id(&self) -> &str;

    /// Form and output description
    fn config(&self) -> &CalculationConfig;

    /// Check inputs without computing anything
    fn validate(&self, inputs: &Inputs) -> ValidationOutcome;

    /// Validate, then compute
    fn calculate(&self, inputs: &Inputs) -> CalcResult<ResultSet>;

    /// Fixed-input reference check
    fn smoke_test(&self) -> bool;

    /// Named assertions over fixed inputs
    fn run_tests(&self) -> CalcResult<Vec<TestCaseResult>>;
}

/// Typed side of a calculation. Wrap in [`Module`] to get a
/// [`CalculationModule`].
pub trait Calculation: Send + Sync + 'static {
    type Input;

    fn config(&self) -> &CalculationConfig;

    /// Build the typed record from resolved fields and run physical checks
    fn parse(&self, fields: &Fields) -> CalcResult<Self::Input>;

    /// Compute results from a validated record
    fn compute(&self, input: &Self::Input) -> CalcResult<ResultSet>;

    fn smoke_case(&self) -> TestCase;

    fn test_cases(&self) -> Vec<TestCase>;
}

/// A named assertion: run `inputs` through `calculate` and apply `check`.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: &'static str,
    pub inputs: Inputs,
    pub check: fn(&ResultSet) -> bool,
}

impl TestCase {
    pub fn new(name: &'static str, inputs: Inputs, check: fn(&ResultSet) -> bool) -> Self {
        Self {
            name,
            inputs,
            check,
        }
    }

    /// Case that passes when the calculation is rejected
    pub fn rejects(name: &'static str, inputs: Inputs) -> Self {
        Self::new(name, inputs, ResultSet::is_failure)
    }
}

/// Outcome of one named assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseResult {
    pub name: String,
    pub pass: bool,
}

/// Adapter from a typed [`Calculation`] to the uniform contract.
#[derive(Debug, Default)]
pub struct Module<C>(C);

impl<C: Calculation> Module<C> {
    pub fn new(calculation: C) -> Self {
        Self(calculation)
    }

    pub fn inner(&self) -> &C {
        &self.0
    }

    fn checked_input(&self, inputs: &Inputs) -> CalcResult<C::Input> {
        let fields = self.0.config().resolve(inputs)?;
        self.0.parse(&fields)
    }

    fn run_case(&self, case: &TestCase) -> CalcResult<bool> {
        let result = self.calculate(&case.inputs)?;
        Ok((case.check)(&result))
    }
}

impl<C: Calculation> CalculationModule for Module<C> {
    fn id(&self) -> &str {
        &self.0.config().id
    }

    fn config(&self) -> &CalculationConfig {
        self.0.config()
    }

    fn validate(&self, inputs: &Inputs) -> ValidationOutcome {
        ValidationOutcome::from(&self.checked_input(inputs))
    }

    fn calculate(&self, inputs: &Inputs) -> CalcResult<ResultSet> {
        let input = match self.checked_input(inputs) {
            Ok(input) => input,
            Err(err) if err.is_validation() => {
                debug!(calculation = self.id(), error = %err, "inputs rejected");
                return Ok(ResultSet::failure(err.to_string()));
            }
            Err(err) => return Err(err),
        };
        self.0.compute(&input)
    }

    fn smoke_test(&self) -> bool {
        self.run_case(&self.0.smoke_case()).unwrap_or(false)
    }

    fn run_tests(&self) -> CalcResult<Vec<TestCaseResult>> {
        self.0
            .test_cases()
            .iter()
            .map(|case| {
                Ok(TestCaseResult {
                    name: case.name.to_string(),
                    pass: self.run_case(case)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_module_passes_its_own_suite() {
        let modules: Vec<Box<dyn CalculationModule>> = vec![
            Box::new(Module::new(PipeFlowResistance::new())),
            Box::new(Module::new(WallThickness::new())),
            Box::new(Module::new(VelocityInPipelines::new())),
            Box::new(Module::new(GasCalorificValue::new())),
            Box::new(Module::new(PipeMass::new())),
            Box::new(Module::new(LiquidHeight::new())),
        ];
        for module in modules {
            assert!(module.smoke_test(), "{} smoke test", module.id());
            for result in module.run_tests().unwrap() {
                assert!(result.pass, "{}: {}", module.id(), result.name);
            }
        }
    }

    #[test]
    fn test_validate_matches_calculate() {
        let module = Module::new(VelocityInPipelines::new());
        let bad = Inputs::new().with("flowRate", -3.0);
        let outcome = module.validate(&bad);
        let result = module.calculate(&bad).unwrap();
        assert!(!outcome.valid);
        assert!(result.is_failure());
        assert_eq!(outcome.message, result.error);
    }

    #[test]
    fn test_config_ids_match() {
        let module = Module::new(GasCalorificValue::new());
        assert_eq!(module.id(), gas_calorific_value::ID);
        assert_eq!(module.config().category, "thermal_calculations");
    }
}
