//! Statement parameter values and positional binding.
//!
//! Parameters are opaque scalar values bound positionally, in input order,
//! to the placeholders in the SQL text. Escaping is the driver's job via
//! parameter binding; values are never interpolated into the SQL string.

use serde::{Deserialize, Serialize};
use sqlx::any::{Any, AnyArguments};
use sqlx::query::Query;

/// A parameter value for parameterized statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlParam {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (stored as i64 for maximum range)
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    Text(String),
}

impl SqlParam {
    /// Check if this parameter is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the type name of this parameter for debugging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

impl From<bool> for SqlParam {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// Build a fixed-size parameter list from plain Rust values.
///
/// # Example
///
/// ```ignore
/// let params = params!["alice", 42];
/// ```
#[macro_export]
macro_rules! params {
    () => {
        {
            let empty: [$crate::params::SqlParam; 0] = [];
            empty
        }
    };
    ($($value:expr),+ $(,)?) => {
        [$($crate::params::SqlParam::from($value)),+]
    };
}

/// Bind one parameter to an `Any` query.
pub(crate) fn bind_param<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    param: &'q SqlParam,
) -> Query<'q, Any, AnyArguments<'q>> {
    match param {
        SqlParam::Null => query.bind(None::<String>),
        SqlParam::Bool(v) => query.bind(*v),
        SqlParam::Int(v) => query.bind(*v),
        SqlParam::Float(v) => query.bind(*v),
        SqlParam::Text(v) => query.bind(v.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_types() {
        assert!(SqlParam::Null.is_null());
        assert!(!SqlParam::Bool(true).is_null());
        assert_eq!(SqlParam::Int(42).type_name(), "int");
        assert_eq!(SqlParam::Text("hello".to_string()).type_name(), "text");
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(SqlParam::from(5i32), SqlParam::Int(5));
        assert_eq!(SqlParam::from(5i64), SqlParam::Int(5));
        assert_eq!(SqlParam::from(true), SqlParam::Bool(true));
        assert_eq!(SqlParam::from(1.5), SqlParam::Float(1.5));
        assert_eq!(SqlParam::from("x"), SqlParam::Text("x".to_string()));
        assert_eq!(SqlParam::from(None::<i64>), SqlParam::Null);
        assert_eq!(SqlParam::from(Some(7i64)), SqlParam::Int(7));
    }

    #[test]
    fn test_params_macro_preserves_order() {
        let params = params!["x", 5, true];
        assert_eq!(params.len(), 3);
        assert_eq!(params[0], SqlParam::Text("x".to_string()));
        assert_eq!(params[1], SqlParam::Int(5));
        assert_eq!(params[2], SqlParam::Bool(true));
    }

    #[test]
    fn test_params_macro_empty() {
        let params = params![];
        assert!(params.is_empty());
    }
}
