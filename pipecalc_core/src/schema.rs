//! # Input Schema
//!
//! Declarative description of a module's inputs and outputs, plus the
//! schema-driven resolver that turns [`Inputs`] into checked [`Fields`].
//!
//! The resolver applies the generic rules only:
//!
//! - required fields must be present (and numeric fields must parse)
//! - optional fields take their declared default when unset
//! - numeric values must sit inside `[min, max]` when bounds are declared
//! - select values must be one of the declared options, unless the field
//!   accepts unlisted values
//!
//! Physical checks (positivity, coefficient ranges, table membership) are
//! left to each module's typed input record. The first violation wins.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "id": "weldCoefficient",
//!   "label": "Weld coefficient",
//!   "type": "numeric",
//!   "required": false,
//!   "default": 1.0,
//!   "min": 0.0,
//!   "max": 1.05,
//!   "unit": ""
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::inputs::{InputValue, Inputs};
use crate::units::Unit;

/// Input field kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Numeric,
    Select,
}

/// Declaration of one input field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<InputValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Select only: values outside `options` pass through unchanged
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub accepts_unlisted: bool,
}

impl InputSpec {
    /// Optional numeric field with no bounds
    pub fn numeric(id: &str, label: &str, unit: Unit) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: FieldKind::Numeric,
            required: false,
            default: None,
            min: None,
            max: None,
            unit: Some(unit),
            options: Vec::new(),
            accepts_unlisted: false,
        }
    }

    /// Optional select field over `options`
    pub fn select(id: &str, label: &str, options: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: FieldKind::Select,
            required: false,
            default: None,
            min: None,
            max: None,
            unit: None,
            options: options.iter().map(|o| o.to_string()).collect(),
            accepts_unlisted: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Let the module interpret values outside the declared options.
    pub fn accept_unlisted(mut self) -> Self {
        self.accepts_unlisted = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<InputValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    fn check_bounds(&self, value: f64) -> CalcResult<()> {
        if let Some(min) = self.min {
            if value < min {
                return Err(CalcError::invalid_input(
                    &self.id,
                    value.to_string(),
                    format!("{} must be at least {}", self.label, min),
                ));
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(CalcError::invalid_input(
                    &self.id,
                    value.to_string(),
                    format!("{} must be at most {}", self.label, max),
                ));
            }
        }
        Ok(())
    }
}

/// Declaration of one output, for renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub id: String,
    pub label: String,
    pub unit: Unit,
    /// Decimal places to show
    pub precision: u8,
}

impl OutputSpec {
    pub fn new(id: &str, label: &str, unit: Unit, precision: u8) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            unit,
            precision,
        }
    }
}

/// Everything a renderer needs to draw a module's form and result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub version: String,
    pub inputs: Vec<InputSpec>,
    pub outputs: Vec<OutputSpec>,
}

impl CalculationConfig {
    pub fn input(&self, id: &str) -> Option<&InputSpec> {
        self.inputs.iter().find(|spec| spec.id == id)
    }

    /// Resolve raw inputs against this configuration's input specs.
    pub fn resolve(&self, inputs: &Inputs) -> CalcResult<Fields> {
        resolve(&self.inputs, inputs)
    }
}

/// Inputs after schema resolution: defaults applied, types checked.
///
/// Optional fields without a default that the caller left unset stay
/// absent; accessors report them as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    numbers: BTreeMap<String, f64>,
    texts: BTreeMap<String, String>,
}

impl Fields {
    /// Numeric field value, required to be present.
    pub fn number(&self, id: &str) -> CalcResult<f64> {
        self.numbers
            .get(id)
            .copied()
            .ok_or_else(|| CalcError::missing_field(id))
    }

    pub fn optional_number(&self, id: &str) -> Option<f64> {
        self.numbers.get(id).copied()
    }

    /// Select field value, required to be present.
    pub fn text(&self, id: &str) -> CalcResult<&str> {
        self.texts
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| CalcError::missing_field(id))
    }
}

/// Resolve `inputs` against `specs`, returning the first violation.
pub fn resolve(specs: &[InputSpec], inputs: &Inputs) -> CalcResult<Fields> {
    let mut fields = Fields::default();

    for spec in specs {
        let raw = match inputs.get(&spec.id) {
            Some(value) => Some(value),
            None if spec.required => return Err(CalcError::missing_field(&spec.id)),
            None => spec.default.as_ref(),
        };
        let Some(raw) = raw else { continue };

        match spec.kind {
            FieldKind::Numeric => {
                let value = match raw.as_number() {
                    Some(value) => value,
                    None if spec.required => return Err(CalcError::missing_field(&spec.id)),
                    // Unparseable optional input counts as unset
                    None => match spec.default.as_ref().and_then(InputValue::as_number) {
                        Some(default) => default,
                        None => continue,
                    },
                };
                spec.check_bounds(value)?;
                fields.numbers.insert(spec.id.clone(), value);
            }
            FieldKind::Select => {
                let value = raw.as_text();
                let value = value.trim();
                if value.is_empty() {
                    if spec.required {
                        return Err(CalcError::missing_field(&spec.id));
                    }
                    continue;
                }
                let matched = spec
                    .options
                    .iter()
                    .find(|option| option.eq_ignore_ascii_case(value));
                match matched {
                    Some(option) => {
                        fields.texts.insert(spec.id.clone(), option.clone());
                    }
                    None if spec.options.is_empty() || spec.accepts_unlisted => {
                        fields.texts.insert(spec.id.clone(), value.to_string());
                    }
                    None => {
                        return Err(CalcError::invalid_input(
                            &spec.id,
                            value,
                            format!("{} must be one of: {}", spec.label, spec.options.join(", ")),
                        ))
                    }
                }
            }
        }
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<InputSpec> {
        vec![
            InputSpec::numeric("flowRate", "Flow rate", Unit::CubicMetersPerHour).required(),
            InputSpec::numeric("temperature", "Temperature", Unit::Celsius).default_value(20.0),
            InputSpec::numeric("coefficient", "Coefficient", Unit::Dimensionless)
                .default_value(1.0)
                .min(0.0)
                .max(1.05),
            InputSpec::numeric("note", "Optional note", Unit::Dimensionless),
            InputSpec::select("fluid", "Fluid", &["water", "air"]).default_value("water"),
        ]
    }

    #[test]
    fn test_missing_required() {
        let err = resolve(&specs(), &Inputs::new()).unwrap_err();
        assert_eq!(err, CalcError::missing_field("flowRate"));
    }

    #[test]
    fn test_non_numeric_required_is_unset() {
        let err = resolve(&specs(), &Inputs::new().with("flowRate", "lots")).unwrap_err();
        assert_eq!(err, CalcError::missing_field("flowRate"));
    }

    #[test]
    fn test_defaults_applied() {
        let fields = resolve(&specs(), &Inputs::new().with("flowRate", 5.0)).unwrap();
        assert_eq!(fields.number("temperature").unwrap(), 20.0);
        assert_eq!(fields.number("coefficient").unwrap(), 1.0);
        assert_eq!(fields.text("fluid").unwrap(), "water");
        assert_eq!(fields.optional_number("note"), None);
    }

    #[test]
    fn test_garbage_optional_falls_back_to_default() {
        let inputs = Inputs::new().with("flowRate", 5.0).with("temperature", "warm");
        let fields = resolve(&specs(), &inputs).unwrap();
        assert_eq!(fields.number("temperature").unwrap(), 20.0);
    }

    #[test]
    fn test_bounds() {
        let inputs = Inputs::new().with("flowRate", 5.0).with("coefficient", 1.2);
        let err = resolve(&specs(), &inputs).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "coefficient"));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let inputs = Inputs::new().with("flowRate", 5.0).with("fluid", "mercury");
        let err = resolve(&specs(), &inputs).unwrap_err();
        assert!(err.to_string().contains("must be one of: water, air"));
    }

    #[test]
    fn test_unlisted_option_passes_when_accepted() {
        let specs = vec![InputSpec::select("fluid", "Fluid", &["water", "air"])
            .default_value("water")
            .accept_unlisted()];
        let fields = resolve(&specs, &Inputs::new().with("fluid", "mercury")).unwrap();
        assert_eq!(fields.text("fluid").unwrap(), "mercury");

        let fields = resolve(&specs, &Inputs::new().with("fluid", "Air")).unwrap();
        assert_eq!(fields.text("fluid").unwrap(), "air");
    }

    #[test]
    fn test_option_matching_normalizes_case() {
        let inputs = Inputs::new().with("flowRate", 5.0).with("fluid", "AIR");
        let fields = resolve(&specs(), &inputs).unwrap();
        assert_eq!(fields.text("fluid").unwrap(), "air");
    }

    #[test]
    fn test_input_spec_json_shape() {
        let spec = InputSpec::select("fluid", "Fluid", &["water"]).required();
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "select");
        assert_eq!(json["required"], true);
        assert!(json.get("min").is_none());
        assert_eq!(json["options"][0], "water");
        assert!(json.get("accepts_unlisted").is_none());
    }
}
