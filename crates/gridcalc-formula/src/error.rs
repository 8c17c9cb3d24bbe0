//! Error types surfaced by the formula evaluator.

use std::fmt;
use thiserror::Error;

/// Raised by [`crate::Formula::parse`] when the expression is syntactically
/// invalid. This is a hard parse failure, not a [`FormulaErrorKind`] value —
/// it never reaches a cell's cached value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid formula: {0}")]
pub struct FormulaException(pub String);

impl FormulaException {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        FormulaException(message.into())
    }
}

/// A typed evaluation-time error, carried as data inside `Value::FormulaError`
/// rather than propagated as an exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaErrorKind {
    /// A referenced position is outside the sheet's valid range.
    Ref,
    /// A referenced cell's text couldn't be interpreted as a number.
    Value,
    /// The arithmetic itself is undefined (e.g. division by zero).
    Arithmetic,
}

impl fmt::Display for FormulaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            FormulaErrorKind::Ref => "#REF!",
            FormulaErrorKind::Value => "#VALUE!",
            FormulaErrorKind::Arithmetic => "#ARITHM!",
        };
        write!(f, "{tag}")
    }
}
