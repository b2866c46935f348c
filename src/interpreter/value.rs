//! Runtime value types for the Logo interpreter.

use std::fmt;

use serde::Serialize;

use crate::diagnostics::LogoError;

/// Tolerance used when comparing numbers for equality
pub const EPSILON: f64 = 0.0001;

/// Runtime value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Number (all arithmetic is double precision)
    Number(f64),
    /// Ordered list of values, arbitrarily nested
    List(Vec<Value>),
}

impl Value {
    /// Logo truth values
    pub fn bool(b: bool) -> Self {
        Value::Number(if b { 1.0 } else { 0.0 })
    }

    pub fn empty_list() -> Self {
        Value::List(Vec::new())
    }

    /// Name of the variant, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::List(_) => "list",
        }
    }

    /// The number inside, or a TypeMismatch naming `operation`
    pub fn as_number(&self, operation: &str) -> Result<f64, LogoError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::List(_) => Err(LogoError::type_mismatch(operation, "a number", self.to_string())),
        }
    }

    /// The list inside, or a TypeMismatch naming `operation`
    pub fn as_list(&self, operation: &str) -> Result<&[Value], LogoError> {
        match self {
            Value::List(items) => Ok(items),
            Value::Number(_) => Err(LogoError::type_mismatch(operation, "a list", self.to_string())),
        }
    }

    pub fn into_list(self, operation: &str) -> Result<Vec<Value>, LogoError> {
        match self {
            Value::List(items) => Ok(items),
            Value::Number(_) => Err(LogoError::type_mismatch(operation, "a list", self.to_string())),
        }
    }

    /// Non-zero numbers are true. Lists have no truth value.
    pub fn is_truthy(&self, operation: &str) -> Result<bool, LogoError> {
        self.as_number(operation).map(|n| n != 0.0)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Structural equality: numbers within [`EPSILON`], lists element-wise
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => (a - b).abs() < EPSILON,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        }
        _ => false,
    }
}

/// Format a number the way Logo prints it: integers without a fraction
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Also covers -0
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
