//! # Raw Inputs
//!
//! The map of field id → value a caller hands to a module. Values are
//! either numbers or text, exactly as they arrive from a form or a JSON
//! request. Numeric coercion is explicit and fails closed: text that does
//! not parse as a finite number reads as *unset*, never as zero.
//!
//! ## Example
//!
//! ```rust
//! use pipecalc_core::inputs::Inputs;
//!
//! let inputs = Inputs::new()
//!     .with("flowRate", 100.0)
//!     .with("diameter", "0.1")
//!     .with("length", "ten")
//!     .with("fluid", "water");
//!
//! assert_eq!(inputs.number("flowRate"), Some(100.0));
//! assert_eq!(inputs.number("diameter"), Some(0.1));
//! assert_eq!(inputs.number("length"), None);
//! assert_eq!(inputs.text("fluid"), Some("water"));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single raw field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Number(f64),
    Text(String),
}

impl InputValue {
    /// Numeric reading of this value, if it has one.
    ///
    /// Blank text, non-numeric text, NaN and infinities all read as `None`.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            InputValue::Number(n) => *n,
            InputValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Text reading of this value. Numbers are formatted.
    pub fn as_text(&self) -> String {
        match self {
            InputValue::Number(n) => n.to_string(),
            InputValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for InputValue {
    fn from(n: f64) -> Self {
        InputValue::Number(n)
    }
}

impl From<i32> for InputValue {
    fn from(n: i32) -> Self {
        InputValue::Number(f64::from(n))
    }
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        InputValue::Text(s.to_string())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        InputValue::Text(s)
    }
}

impl std::fmt::Display for InputValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputValue::Number(n) => write!(f, "{}", n),
            InputValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Raw input map keyed by field id.
///
/// Serializes as a plain JSON object, so a request body such as
/// `{"flowRate": 100, "fluid": "water"}` deserializes directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inputs(BTreeMap<String, InputValue>);

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, id: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.set(id, value);
        self
    }

    pub fn set(&mut self, id: impl Into<String>, value: impl Into<InputValue>) {
        self.0.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&InputValue> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Numeric value of a field; `None` when absent or not a finite number
    pub fn number(&self, id: &str) -> Option<f64> {
        self.get(id).and_then(InputValue::as_number)
    }

    /// Text value of a field; `None` when absent or not text
    pub fn text(&self, id: &str) -> Option<&str> {
        match self.get(id) {
            Some(InputValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse a `key=value` pair as typed on a command line.
    ///
    /// Values that parse as numbers become [`InputValue::Number`]; anything
    /// else stays text.
    pub fn parse_assignment(pair: &str) -> Option<(String, InputValue)> {
        let (key, value) = pair.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        let value = value.trim();
        let parsed = match value.parse::<f64>() {
            Ok(n) if n.is_finite() => InputValue::Number(n),
            _ => InputValue::Text(value.to_string()),
        };
        Some((key.to_string(), parsed))
    }
}

impl<K: Into<String>, V: Into<InputValue>> FromIterator<(K, V)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fails_closed_on_bad_numbers() {
        let inputs = Inputs::new()
            .with("a", "")
            .with("b", "abc")
            .with("c", "NaN")
            .with("d", f64::INFINITY)
            .with("e", " 12.5 ");
        assert_eq!(inputs.number("a"), None);
        assert_eq!(inputs.number("b"), None);
        assert_eq!(inputs.number("c"), None);
        assert_eq!(inputs.number("d"), None);
        assert_eq!(inputs.number("e"), Some(12.5));
        assert_eq!(inputs.number("missing"), None);
    }

    #[test]
    fn test_json_shape() {
        let inputs: Inputs =
            serde_json::from_str(r#"{"flowRate": 100, "fluid": "air", "pressure": "101.3"}"#).unwrap();
        assert_eq!(inputs.number("flowRate"), Some(100.0));
        assert_eq!(inputs.text("fluid"), Some("air"));
        assert_eq!(inputs.number("pressure"), Some(101.3));
        assert_eq!(inputs.len(), 3);
    }

    #[test]
    fn test_parse_assignment() {
        let (k, v) = Inputs::parse_assignment("flowRate=100").unwrap();
        assert_eq!(k, "flowRate");
        assert_eq!(v, InputValue::Number(100.0));

        let (k, v) = Inputs::parse_assignment("material = Carbon Steel").unwrap();
        assert_eq!(k, "material");
        assert_eq!(v, InputValue::Text("Carbon Steel".to_string()));

        assert!(Inputs::parse_assignment("novalue").is_none());
        assert!(Inputs::parse_assignment("=5").is_none());
    }

    #[test]
    fn test_from_iterator() {
        let inputs: Inputs = [("CH4", 95.0), ("N2", 5.0)].into_iter().collect();
        assert_eq!(inputs.number("N2"), Some(5.0));
    }
}
