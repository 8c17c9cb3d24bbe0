//! Dependency extraction: walk a parsed formula's AST and collect every cell
//! position it reads, deduplicated and in stable (row-major) order so that
//! re-parsing the same formula always yields the same list.

use std::collections::BTreeSet;

use crate::ast::Expr;
use crate::position::Position;

pub fn referenced_cells(expr: &Expr) -> Vec<Position> {
    let mut seen = BTreeSet::new();
    collect(expr, &mut seen);
    seen.into_iter().collect()
}

fn collect(expr: &Expr, seen: &mut BTreeSet<Position>) {
    match expr {
        Expr::Number(_) => {}
        Expr::Cell(pos) => {
            seen.insert(*pos);
        }
        Expr::Neg(inner) => collect(inner, seen),
        Expr::Binary(_, lhs, rhs) => {
            collect(lhs, seen);
            collect(rhs, seen);
        }
        Expr::Call(_, start, end) => {
            let min_row = start.row.min(end.row);
            let max_row = start.row.max(end.row);
            let min_col = start.col.min(end.col);
            let max_col = start.col.max(end.col);
            for row in min_row..=max_row {
                for col in min_col..=max_col {
                    seen.insert(Position::new(row, col));
                }
            }
        }
    }
}
