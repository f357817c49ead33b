use serde::{Deserialize, Serialize};

/// Scalar bound to a dialogue variable.
///
/// Authored integers that fit `i64` keep their exact form in `Int`; every other
/// number is an `f64`. Both tags read as numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DlValue {
    Bool(bool),
    Int(i64),
    Number(f64),
    String(String),
}

impl PartialEq for DlValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Number(left), Self::Number(right)) => left == right,
            (Self::Int(int), float @ Self::Number(_))
            | (float @ Self::Number(_), Self::Int(int)) => float.as_int() == Some(*int),
            (Self::String(left), Self::String(right)) => left == right,
            _ => false,
        }
    }
}

impl DlValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Integral numbers only; fractional or out-of-range numbers yield `None`.
    pub fn as_int(&self) -> Option<i64> {
        let value = match self {
            Self::Int(value) => return Some(*value),
            Self::Number(value) => *value,
            _ => return None,
        };
        // i64::MAX as f64 rounds up to 2^63, which is already out of range.
        if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
            return None;
        }
        Some(value as i64)
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::Number(_) => "number",
            Self::String(_) => "string",
        }
    }
}

impl From<bool> for DlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for DlValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for DlValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DlValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
