//! A single addressable cell: its content plus the non-owning graph edges
//! that connect it to the cells it reads from and the cells that read it.
//!
//! `Cell` deliberately carries no logic that reaches outside itself — it
//! cannot resolve a `Position` to a neighboring `Cell`. Wiring edges, running
//! cycle detection and cascading cache invalidation all live on `Sheet`,
//! which alone owns the grid those positions index into.

use std::collections::HashSet;

use gridcalc_formula::{Formula, Position};

use crate::value::Value;

#[derive(Debug, Clone)]
pub(crate) enum CellContent {
    Empty,
    Text { raw: String, value: String },
    Formula(Formula),
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) content: CellContent,
    pub(crate) referenced_cells: Vec<Position>,
    pub(crate) downstream: HashSet<Position>,
    pub(crate) upstream: HashSet<Position>,
    pub(crate) cache: Option<Value>,
}

impl Cell {
    pub(crate) fn new_empty() -> Cell {
        Cell {
            content: CellContent::Empty,
            referenced_cells: Vec::new(),
            downstream: HashSet::new(),
            upstream: HashSet::new(),
            cache: None,
        }
    }

    /// The text that would reproduce this cell's content through `Set`:
    /// the raw input for literal text, `=<canonical expression>` for a
    /// formula, empty for an empty cell.
    pub fn get_text(&self) -> String {
        match &self.content {
            CellContent::Empty => String::new(),
            CellContent::Text { raw, .. } => raw.clone(),
            CellContent::Formula(formula) => format!("={}", formula.canonical_expression()),
        }
    }

    /// Positions this cell's formula reads, in row-major order, deduplicated.
    /// Empty for non-formula cells.
    pub fn get_referenced_cells(&self) -> &[Position] {
        &self.referenced_cells
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }

    pub fn is_formula(&self) -> bool {
        matches!(self.content, CellContent::Formula(_))
    }
}
