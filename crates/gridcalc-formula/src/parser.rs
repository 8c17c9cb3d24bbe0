//! Recursive-descent parser turning formula text into an [`Expr`] tree.

use std::iter::Peekable;
use std::vec::IntoIter;

use crate::ast::{BinaryOp, Expr, RangeFunction};
use crate::error::FormulaException;
use crate::lexer::{Token, tokenize};
use crate::position::Position;

pub fn parse(input: &str) -> Result<Expr, FormulaException> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(FormulaException::new("empty formula"));
    }
    let mut parser = Parser {
        tokens: tokens.into_iter().peekable(),
    };
    let expr = parser.parse_expr(0)?;
    if let Some(tok) = parser.tokens.next() {
        return Err(FormulaException::new(format!(
            "unexpected trailing token {tok:?}"
        )));
    }
    Ok(expr)
}

struct Parser {
    tokens: Peekable<IntoIter<Token>>,
}

impl Parser {
    /// Precedence-climbing parse of binary expressions.
    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, FormulaException> {
        let mut lhs = self.parse_unary()?;

        loop {
            let Some(op) = self.peek_binary_op() else {
                break;
            };
            if op.precedence() < min_precedence {
                break;
            }
            self.tokens.next();
            let next_min = if op.is_right_associative() {
                op.precedence()
            } else {
                op.precedence() + 1
            };
            let rhs = self.parse_expr(next_min)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }

        Ok(lhs)
    }

    fn peek_binary_op(&mut self) -> Option<BinaryOp> {
        match self.tokens.peek()? {
            Token::Plus => Some(BinaryOp::Add),
            Token::Minus => Some(BinaryOp::Sub),
            Token::Star => Some(BinaryOp::Mul),
            Token::Slash => Some(BinaryOp::Div),
            Token::Caret => Some(BinaryOp::Pow),
            _ => None,
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, FormulaException> {
        match self.tokens.peek() {
            Some(Token::Minus) => {
                self.tokens.next();
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            Some(Token::Plus) => {
                self.tokens.next();
                self.parse_unary()
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, FormulaException> {
        match self.tokens.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LParen) => {
                let inner = self.parse_expr(0)?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => self.parse_ident(name),
            Some(other) => Err(FormulaException::new(format!(
                "unexpected token {other:?}"
            ))),
            None => Err(FormulaException::new("unexpected end of formula")),
        }
    }

    fn parse_ident(&mut self, name: String) -> Result<Expr, FormulaException> {
        if matches!(self.tokens.peek(), Some(Token::LParen)) {
            let func = RangeFunction::from_name(&name)
                .ok_or_else(|| FormulaException::new(format!("unknown function '{name}'")))?;
            self.tokens.next();
            let start = self.parse_cell_ref()?;
            self.expect(Token::Colon)?;
            let end = self.parse_cell_ref()?;
            self.expect(Token::RParen)?;
            return Ok(Expr::Call(func, start, end));
        }

        let pos = Position::parse_a1(&name)
            .ok_or_else(|| FormulaException::new(format!("invalid cell reference '{name}'")))?;
        Ok(Expr::Cell(pos))
    }

    fn parse_cell_ref(&mut self) -> Result<Position, FormulaException> {
        match self.tokens.next() {
            Some(Token::Ident(name)) => Position::parse_a1(&name)
                .ok_or_else(|| FormulaException::new(format!("invalid cell reference '{name}'"))),
            other => Err(FormulaException::new(format!(
                "expected cell reference, found {other:?}"
            ))),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), FormulaException> {
        match self.tokens.next() {
            Some(tok) if tok == expected => Ok(()),
            other => Err(FormulaException::new(format!(
                "expected {expected:?}, found {other:?}"
            ))),
        }
    }
}
