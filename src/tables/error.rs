//! Reference table error types

use thiserror::Error;

use super::TableKey;

/// Errors raised while building or loading reference tables
#[derive(Error, Debug)]
pub enum TableError {
    /// A table must contain at least one breakpoint
    #[error("Reference table has no breakpoints")]
    Empty,

    /// Breakpoint with a non-finite or negative CV, or a zero subject count
    #[error("Invalid breakpoint: CV {cv}% -> {n} subjects")]
    InvalidBreakpoint { cv: f64, n: u32 },

    /// Two breakpoints share the same CV
    #[error("Duplicate breakpoint at CV {cv}%")]
    DuplicateBreakpoint { cv: f64 },

    /// Table name not recognised when loading
    #[error("Unknown reference table '{0}'")]
    UnknownTable(String),

    /// Store has no table for the requested key
    #[error("Reference table '{0}' is not loaded")]
    MissingTable(TableKey),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
