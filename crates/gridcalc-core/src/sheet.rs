//! The sheet: sparse-by-row cell storage plus the transactional `Set`/`Clear`
//! operations that keep the dependency graph and value cache consistent.

use std::collections::HashSet;
use std::io::{self, Write};

use gridcalc_formula::{Formula, Position};

use crate::cell::{Cell, CellContent};
use crate::cycle;
use crate::error::{CoreError, Result};
use crate::value::Value;

/// Snapshot of the fields `Set` mutates before cycle detection can reject
/// the candidate formula, so a rejected `Set` leaves the cell exactly as it
/// was.
#[derive(Default)]
struct Backup {
    downstream: HashSet<Position>,
    cache: Option<Value>,
    referenced_cells: Vec<Position>,
}

#[derive(Debug, Default)]
pub struct Sheet {
    storage: Vec<Vec<Option<Cell>>>,
}

impl Sheet {
    pub fn new() -> Sheet {
        Sheet {
            storage: Vec::new(),
        }
    }

    /// Sets `pos`'s content from `text`:
    /// - empty string -> equivalent to `clear_cell`
    /// - leading `=` followed by at least one character -> parsed as a formula
    /// - anything else -> literal text (a single leading `'` is stripped from
    ///   the displayed *value* only; `get_text` still returns the raw input)
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        if !pos.is_valid() {
            return Err(CoreError::InvalidPosition);
        }
        if text.is_empty() {
            self.clear_cell_unchecked(pos);
            return Ok(());
        }
        self.ensure_cell(pos);
        if let Some(body) = text.strip_prefix('=') {
            if !body.is_empty() {
                return self.set_formula(pos, body);
            }
        }
        self.set_text(pos, text);
        Ok(())
    }

    /// Resets `pos` to empty, removing the cell entirely if nothing depends
    /// on it (every stored cell must be non-empty or have non-empty upstream).
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        if !pos.is_valid() {
            return Err(CoreError::InvalidPosition);
        }
        self.clear_cell_unchecked(pos);
        Ok(())
    }

    pub fn get_cell(&self, pos: Position) -> Result<Option<&Cell>> {
        if !pos.is_valid() {
            return Err(CoreError::InvalidPosition);
        }
        Ok(self.cell_at(pos))
    }

    /// Resolves `pos` to its value, evaluating and caching a formula result
    /// on demand.
    pub fn get_value(&mut self, pos: Position) -> Result<Value> {
        if !pos.is_valid() {
            return Err(CoreError::InvalidPosition);
        }
        Ok(self.value_at(pos))
    }

    /// The smallest `(rows, cols)` bounding box covering every non-empty
    /// cell.
    pub fn printable_size(&self) -> (usize, usize) {
        let mut rows = 0;
        let mut cols = 0;
        for (r, row) in self.storage.iter().enumerate() {
            for (c, slot) in row.iter().enumerate() {
                if slot.as_ref().is_some_and(|cell| !cell.is_empty()) {
                    rows = rows.max(r + 1);
                    cols = cols.max(c + 1);
                }
            }
        }
        (rows, cols)
    }

    /// Tab-separated values over the printable range, evaluating formulas as
    /// needed.
    pub fn print_values<W: Write>(&mut self, sink: &mut W) -> io::Result<()> {
        let (rows, cols) = self.printable_size();
        for row in 0..rows {
            for col in 0..cols {
                if col > 0 {
                    write!(sink, "\t")?;
                }
                if self.cell_at(Position::new(row, col)).is_some() {
                    let value = self
                        .get_value(Position::new(row, col))
                        .expect("position within printable size is always valid");
                    write!(sink, "{value}")?;
                }
            }
            writeln!(sink)?;
        }
        Ok(())
    }

    /// Tab-separated raw text over the printable range. Never touches
    /// the value cache.
    pub fn print_texts<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        let (rows, cols) = self.printable_size();
        for row in 0..rows {
            for col in 0..cols {
                if col > 0 {
                    write!(sink, "\t")?;
                }
                if let Some(cell) = self.cell_at(Position::new(row, col)) {
                    write!(sink, "{}", cell.get_text())?;
                }
            }
            writeln!(sink)?;
        }
        Ok(())
    }

    pub(crate) fn cell_at(&self, pos: Position) -> Option<&Cell> {
        self.storage.get(pos.row)?.get(pos.col)?.as_ref()
    }

    fn cell_at_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.storage.get_mut(pos.row)?.get_mut(pos.col)?.as_mut()
    }

    fn ensure_cell(&mut self, pos: Position) -> &mut Cell {
        if self.storage.len() <= pos.row {
            self.storage.resize_with(pos.row + 1, Vec::new);
        }
        let row = &mut self.storage[pos.row];
        if row.len() <= pos.col {
            row.resize_with(pos.col + 1, || None);
        }
        row[pos.col].get_or_insert_with(Cell::new_empty)
    }

    fn clear_cell_unchecked(&mut self, pos: Position) {
        let Some(cell) = self.cell_at(pos) else {
            return;
        };
        if cell.upstream.is_empty() {
            self.destroy_cell(pos);
        } else {
            self.clear_content(pos);
        }
    }

    fn clear_content(&mut self, pos: Position) {
        let old_downstream = self.downstream_of(pos);
        self.unwire_downstream(pos, &old_downstream);
        if let Some(cell) = self.cell_at_mut(pos) {
            cell.content = CellContent::Empty;
            cell.referenced_cells.clear();
            cell.downstream.clear();
            cell.cache = None;
        }
        self.invalidate_upstream(pos);
    }

    fn destroy_cell(&mut self, pos: Position) {
        let old_downstream = self.downstream_of(pos);
        self.unwire_downstream(pos, &old_downstream);
        if let Some(slot) = self.storage.get_mut(pos.row).and_then(|r| r.get_mut(pos.col)) {
            *slot = None;
        }
    }

    fn set_text(&mut self, pos: Position, text: &str) {
        let old_downstream = self.downstream_of(pos);
        self.unwire_downstream(pos, &old_downstream);
        let value = text.strip_prefix('\'').unwrap_or(text).to_string();
        if let Some(cell) = self.cell_at_mut(pos) {
            cell.content = CellContent::Text {
                raw: text.to_string(),
                value,
            };
            cell.referenced_cells.clear();
            cell.downstream.clear();
            cell.cache = None;
        }
        self.invalidate_upstream(pos);
    }

    fn set_formula(&mut self, pos: Position, body: &str) -> Result<()> {
        let backup = self
            .cell_at(pos)
            .map(|cell| Backup {
                downstream: cell.downstream.clone(),
                cache: cell.cache.clone(),
                referenced_cells: cell.referenced_cells.clone(),
            })
            .unwrap_or_default();

        let formula = Formula::parse(body)?;
        let referenced_cells = formula.referenced_cells().to_vec();

        // Out-of-range references (e.g. a column past MAX_COLS) stay in
        // `referenced_cells` so GetReferencedCells reports exactly what the
        // formula reads, but they never get a Cell or a downstream edge —
        // there's nowhere in the grid to put them. Evaluation still resolves
        // them correctly: `resolve_numeric` rejects an invalid position as a
        // Ref error regardless of whether an edge exists for it.
        let mut new_downstream = HashSet::new();
        for &p in &referenced_cells {
            if !p.is_valid() {
                continue;
            }
            self.ensure_cell(p);
            new_downstream.insert(p);
        }

        if let Some(cell) = self.cell_at_mut(pos) {
            cell.downstream = new_downstream.clone();
        }

        if cycle::creates_cycle(self, pos) {
            if let Some(cell) = self.cell_at_mut(pos) {
                cell.downstream = backup.downstream;
                cell.cache = backup.cache;
                cell.referenced_cells = backup.referenced_cells;
            }
            return Err(CoreError::CircularDependency);
        }

        self.unwire_downstream(pos, &backup.downstream);
        for &child in &new_downstream {
            if let Some(cell) = self.cell_at_mut(child) {
                cell.upstream.insert(pos);
            }
        }

        if let Some(cell) = self.cell_at_mut(pos) {
            cell.content = CellContent::Formula(formula);
            cell.referenced_cells = referenced_cells;
            cell.downstream = new_downstream;
            cell.cache = None;
        }
        self.invalidate_upstream(pos);
        Ok(())
    }

    fn downstream_of(&self, pos: Position) -> HashSet<Position> {
        self.cell_at(pos).map(|c| c.downstream.clone()).unwrap_or_default()
    }

    fn unwire_downstream(&mut self, pos: Position, downstream: &HashSet<Position>) {
        for &child in downstream {
            if let Some(cell) = self.cell_at_mut(child) {
                cell.upstream.remove(&pos);
            }
        }
    }

    /// Clears the cache of every cell that (transitively) reads `pos`.
    /// `pos`'s own cache is cleared by the caller before this runs.
    fn invalidate_upstream(&mut self, pos: Position) {
        let mut stack = vec![pos];
        let mut visited = HashSet::new();
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let upstream: Vec<Position> = self
                .cell_at(current)
                .map(|c| c.upstream.iter().copied().collect())
                .unwrap_or_default();
            for up in upstream {
                if let Some(cell) = self.cell_at_mut(up) {
                    cell.cache = None;
                }
                stack.push(up);
            }
        }
    }

    /// Resolves `pos` assuming it is a valid position; absent cells read as
    /// empty text without being materialized in storage.
    fn value_at(&mut self, pos: Position) -> Value {
        let pending_formula = {
            let Some(cell) = self.cell_at(pos) else {
                return Value::Text(String::new());
            };
            match &cell.content {
                CellContent::Empty => return Value::Text(String::new()),
                CellContent::Text { value, .. } => return Value::Text(value.clone()),
                CellContent::Formula(formula) => {
                    if let Some(cached) = &cell.cache {
                        return cached.clone();
                    }
                    formula.clone()
                }
            }
        };

        let result = pending_formula.evaluate(&mut |p: Position| self.resolve_numeric(p));
        let value = match result {
            Ok(n) => Value::Number(n),
            Err(kind) => Value::FormulaError(kind),
        };
        if let Some(cell) = self.cell_at_mut(pos) {
            cell.cache = Some(value.clone());
        }
        value
    }

    /// The `Lookup` implementation a formula's evaluation reads through:
    /// invalid position -> `Ref`, absent/empty/empty-text -> `0`, text ->
    /// whole-string parse or `Value`, numeric cell -> itself, formula-error
    /// cell -> that error.
    fn resolve_numeric(&mut self, pos: Position) -> std::result::Result<f64, gridcalc_formula::FormulaErrorKind> {
        if !pos.is_valid() {
            return Err(gridcalc_formula::FormulaErrorKind::Ref);
        }
        match self.value_at(pos) {
            Value::Number(n) => Ok(n),
            Value::FormulaError(kind) => Err(kind),
            Value::Text(s) => {
                if s.is_empty() {
                    Ok(0.0)
                } else {
                    s.parse::<f64>().map_err(|_| gridcalc_formula::FormulaErrorKind::Value)
                }
            }
        }
    }
}
