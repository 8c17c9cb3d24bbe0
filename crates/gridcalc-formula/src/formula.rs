//! The evaluator object the core crate treats as an opaque collaborator:
//! parse once, then repeatedly ask for its canonical text, its referenced
//! positions, or a numeric value against a lookup.

use crate::ast::Expr;
use crate::deps;
use crate::error::{FormulaErrorKind, FormulaException};
use crate::eval::{self, Lookup};
use crate::parser;
use crate::position::Position;
use crate::printer;

#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    expr: Expr,
    canonical: String,
    referenced: Vec<Position>,
}

impl Formula {
    /// Parse `expression` (the formula text with its leading `=` already
    /// stripped). Fails with `FormulaException` on syntax errors only.
    pub fn parse(expression: &str) -> Result<Formula, FormulaException> {
        let expr = parser::parse(expression)?;
        let canonical = printer::print(&expr);
        let referenced = deps::referenced_cells(&expr);
        Ok(Formula {
            expr,
            canonical,
            referenced,
        })
    }

    /// Deterministic, parenthesization-minimized textual form.
    pub fn canonical_expression(&self) -> &str {
        &self.canonical
    }

    /// Deduplicated, row-major-sorted list of positions this formula reads.
    pub fn referenced_cells(&self) -> &[Position] {
        &self.referenced
    }

    /// Pure evaluation against `lookup`; never panics, never parses.
    pub fn evaluate(&self, lookup: &mut dyn Lookup) -> Result<f64, FormulaErrorKind> {
        eval::evaluate(&self.expr, lookup)
    }
}
