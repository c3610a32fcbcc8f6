//! Core data model shared by the fork-script parser, evaluator and interpreter.
//!
//! - [`value`] — the tagged runtime value (`Boolean` / `Decimal` / `String` / `Unknown`)
//! - [`decimal`] — the 128-bit fixed-point decimal backing `Value::Decimal`
//! - [`store`] — the ordered variable store
//! - [`colors`] — hex color parsing for the options header
//! - [`names`] — fork/identifier name normalization
//! - [`error`] — the two error kinds the rest of the workspace raises

pub mod colors;
pub mod decimal;
pub mod error;
pub mod names;
pub mod store;
pub mod value;

pub use colors::Color;
pub use decimal::Decimal;
pub use error::{InterpretError, ParseError};
pub use store::VariableStore;
pub use value::Value;
