//! # Result Types
//!
//! [`ResultSet`] is the single output shape every module returns, and
//! [`ValidationOutcome`] the shape of `validate`. Both serialize to the
//! JSON a renderer consumes.
//!
//! The success/failure invariant is enforced by construction:
//!
//! - [`ResultSet::failure`] carries an error message and nothing else
//! - [`ResultSetBuilder::build`] refuses to produce an empty success
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "success": true,
//!   "results": { "velocity": 3.54, "pressureDrop": 12850.2 },
//!   "units": { "velocity": "m/s", "pressureDrop": "Pa" }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::correlations::Band;
use crate::errors::{CalcError, CalcResult};
use crate::units::Unit;

/// Outcome of `validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationOutcome {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

impl<T> From<&CalcResult<T>> for ValidationOutcome {
    fn from(result: &CalcResult<T>) -> Self {
        match result {
            Ok(_) => ValidationOutcome::ok(),
            Err(err) => ValidationOutcome::invalid(err.to_string()),
        }
    }
}

/// One row of the diameter/velocity table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityRow {
    /// Nominal bore (mm)
    pub diameter: f64,
    /// Mean velocity (m/s)
    pub velocity: f64,
    pub band: Band,
}

/// A single output value: a scalar or a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputValue {
    Scalar(f64),
    Table(Vec<VelocityRow>),
}

/// Result of `calculate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<BTreeMap<String, OutputValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultSet {
    /// Failed calculation with a human-readable reason
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            results: None,
            units: None,
            error: Some(error.into()),
        }
    }

    pub fn builder() -> ResultSetBuilder {
        ResultSetBuilder::default()
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// Scalar output by id
    pub fn scalar(&self, id: &str) -> Option<f64> {
        match self.results.as_ref()?.get(id)? {
            OutputValue::Scalar(v) => Some(*v),
            OutputValue::Table(_) => None,
        }
    }

    /// Table output by id
    pub fn table(&self, id: &str) -> Option<&[VelocityRow]> {
        match self.results.as_ref()?.get(id)? {
            OutputValue::Table(rows) => Some(rows),
            OutputValue::Scalar(_) => None,
        }
    }

    /// Unit symbol for an output id
    pub fn unit(&self, id: &str) -> Option<&str> {
        self.units.as_ref()?.get(id).map(String::as_str)
    }
}

/// Accumulates outputs for a successful [`ResultSet`].
#[derive(Debug, Default)]
pub struct ResultSetBuilder {
    results: BTreeMap<String, OutputValue>,
    units: BTreeMap<String, String>,
}

impl ResultSetBuilder {
    pub fn scalar(mut self, id: &str, value: f64, unit: Unit) -> Self {
        self.results.insert(id.to_string(), OutputValue::Scalar(value));
        self.units.insert(id.to_string(), unit.symbol().to_string());
        self
    }

    pub fn table(mut self, id: &str, rows: Vec<VelocityRow>, unit: Unit) -> Self {
        self.results.insert(id.to_string(), OutputValue::Table(rows));
        self.units.insert(id.to_string(), unit.symbol().to_string());
        self
    }

    /// Finish a successful result set.
    ///
    /// Fails if no outputs were added or a scalar is not finite, since a
    /// module should have rejected such inputs during validation.
    pub fn build(self) -> CalcResult<ResultSet> {
        if self.results.is_empty() {
            return Err(CalcError::internal("successful result set has no outputs"));
        }
        if let Some((id, _)) = self
            .results
            .iter()
            .find(|(_, v)| matches!(v, OutputValue::Scalar(x) if !x.is_finite()))
        {
            return Err(CalcError::internal(format!("output '{}' is not finite", id)));
        }
        Ok(ResultSet {
            success: true,
            results: Some(self.results),
            units: Some(self.units),
            error: None,
        })
    }
}
