//! Error types for the sheet engine.

use thiserror::Error;

use gridcalc_formula::FormulaException;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("position is outside the addressable sheet")]
    InvalidPosition,

    #[error("setting this cell would create a circular dependency")]
    CircularDependency,

    #[error("{0}")]
    Formula(#[from] FormulaException),
}

pub type Result<T> = std::result::Result<T, CoreError>;
