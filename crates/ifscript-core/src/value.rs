//! The tagged runtime value (spec.md §3 "Value").

use std::fmt;

use crate::decimal::Decimal;

/// A value held by a script variable or produced by the expression evaluator.
///
/// `String` only ever appears as an intermediate (e.g. the evaluator's
/// canonical return form before the caller parses it back into a `Boolean`
/// or `Decimal`); variables themselves never hold a `String`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Boolean(bool),
    Decimal(Decimal),
    String(String),
    /// Sentinel for an identifier with no binding. Coerces to `false` in a
    /// boolean context (spec.md §4.1 `includeUnknowns`/`unknownDefault`).
    Unknown,
}

impl Value {
    /// Boolean-context coercion used by the evaluator and by `if <expr>`.
    ///
    /// Returns `None` when the value cannot be interpreted as a boolean
    /// (e.g. a `Decimal`) — the caller turns that into a fatal "non-boolean
    /// condition result" per spec.md §4.4.7.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Unknown => Some(false),
            Value::String(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            Value::Decimal(_) => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }
}

impl fmt::Display for Value {
    /// The evaluator's "canonical string representation" (spec.md §4.1):
    /// the caller decides whether to parse it back as boolean or decimal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Unknown => write!(f, "false"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_is_falsy() {
        assert_eq!(Value::Unknown.as_bool(), Some(false));
    }

    #[test]
    fn decimal_has_no_boolean_reading() {
        assert_eq!(Value::Decimal(Decimal::ZERO).as_bool(), None);
    }

    #[test]
    fn display_round_trips_through_string() {
        let v = Value::Decimal("2.5".parse().unwrap());
        assert_eq!(v.to_string(), "2.5");
    }
}
