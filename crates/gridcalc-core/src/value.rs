//! The tagged union a cell read resolves to.

use std::fmt;

use gridcalc_formula::FormulaErrorKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    FormulaError(FormulaErrorKind),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::FormulaError(kind) => write!(f, "{kind}"),
        }
    }
}

/// Platform-default real-number formatting: exact, undecorated digits for
/// integral values, default `f64` rendering otherwise.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}
