//! Numeric evaluation of a parsed formula against a cell-lookup callback.

use crate::ast::{BinaryOp, Expr, RangeFunction};
use crate::error::FormulaErrorKind;
use crate::position::Position;

/// Resolves a cell position to its numeric contribution to a formula.
/// Implemented by the core crate's `Sheet`/`Cell` lookup, which already
/// applies the absent-cell-is-zero and text-parses-as-number rules before
/// this evaluator ever sees a value.
pub trait Lookup {
    fn lookup(&mut self, pos: Position) -> Result<f64, FormulaErrorKind>;
}

impl<F> Lookup for F
where
    F: FnMut(Position) -> Result<f64, FormulaErrorKind>,
{
    fn lookup(&mut self, pos: Position) -> Result<f64, FormulaErrorKind> {
        self(pos)
    }
}

pub fn evaluate(expr: &Expr, lookup: &mut dyn Lookup) -> Result<f64, FormulaErrorKind> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Cell(pos) => lookup.lookup(*pos),
        Expr::Neg(inner) => Ok(-evaluate(inner, lookup)?),
        Expr::Binary(op, lhs, rhs) => {
            let l = evaluate(lhs, lookup)?;
            let r = evaluate(rhs, lookup)?;
            apply_binary(*op, l, r)
        }
        Expr::Call(func, start, end) => evaluate_range(*func, *start, *end, lookup),
    }
}

fn apply_binary(op: BinaryOp, l: f64, r: f64) -> Result<f64, FormulaErrorKind> {
    match op {
        BinaryOp::Add => Ok(l + r),
        BinaryOp::Sub => Ok(l - r),
        BinaryOp::Mul => Ok(l * r),
        BinaryOp::Div => {
            if r == 0.0 {
                Err(FormulaErrorKind::Arithmetic)
            } else {
                Ok(l / r)
            }
        }
        BinaryOp::Pow => Ok(l.powf(r)),
    }
}

fn evaluate_range(
    func: RangeFunction,
    start: Position,
    end: Position,
    lookup: &mut dyn Lookup,
) -> Result<f64, FormulaErrorKind> {
    let min_row = start.row.min(end.row);
    let max_row = start.row.max(end.row);
    let min_col = start.col.min(end.col);
    let max_col = start.col.max(end.col);

    let mut sum = 0.0;
    let mut count = 0u64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for row in min_row..=max_row {
        for col in min_col..=max_col {
            let v = lookup.lookup(Position::new(row, col))?;
            sum += v;
            count += 1;
            min = min.min(v);
            max = max.max(v);
        }
    }

    Ok(match func {
        RangeFunction::Sum => sum,
        RangeFunction::Average => sum / count as f64,
        RangeFunction::Min => min,
        RangeFunction::Max => max,
        RangeFunction::Count => count as f64,
    })
}
