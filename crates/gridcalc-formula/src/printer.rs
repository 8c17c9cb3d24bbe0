//! Canonical, parenthesization-minimized rendering of a parsed formula.

use std::fmt::Write;

use crate::ast::Expr;

pub fn print(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr, 0);
    out
}

/// Writes `expr` into `out`, adding parens only when `expr`'s own top-level
/// operator binds looser than `parent_precedence` requires.
fn write_expr(out: &mut String, expr: &Expr, parent_precedence: u8) {
    match expr {
        Expr::Number(n) => {
            write_number(out, *n);
        }
        Expr::Cell(pos) => {
            let _ = write!(out, "{pos}");
        }
        Expr::Neg(inner) => {
            out.push('-');
            // Unary minus binds tighter than any binary operator's left side
            // but we still need parens around a binary subexpression.
            write_expr(out, inner, UNARY_PRECEDENCE);
        }
        Expr::Binary(op, lhs, rhs) => {
            let prec = op.precedence();
            let needs_parens = prec < parent_precedence;
            if needs_parens {
                out.push('(');
            }
            let lhs_min = if op.is_right_associative() { prec + 1 } else { prec };
            let rhs_min = if op.is_right_associative() { prec } else { prec + 1 };
            write_expr(out, lhs, lhs_min);
            out.push_str(op.symbol());
            write_expr(out, rhs, rhs_min);
            if needs_parens {
                out.push(')');
            }
        }
        Expr::Call(func, start, end) => {
            let _ = write!(out, "{}({}:{})", func.name(), start, end);
        }
    }
}

const UNARY_PRECEDENCE: u8 = 4;

fn write_number(out: &mut String, n: f64) {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        let _ = write!(out, "{}", n as i64);
    } else {
        let _ = write!(out, "{n}");
    }
}
