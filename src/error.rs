//! Error handling for TipManager
//!
//! Defines the pipeline error taxonomy and establishes a unified Result type
//! using anyhow for context chaining and error propagation.

use thiserror::Error;

/// Core error types for the tips pipeline
#[derive(Error, Debug)]
pub enum TipsError {
    /// Required column missing, sheet absent or file unreadable
    #[error("schema error: {0}")]
    Schema(String),

    /// Filter parameters out of range (win-rate bounds, date bounds, colours)
    #[error("validation error: {0}")]
    Validation(String),

    /// Filters matched no rows; reported as a warning, not a failure
    #[error("Nenhum dado disponível após o filtro.")]
    EmptyResult,

    #[error("workbook error: {0}")]
    Workbook(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// How a caller should surface a halted pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Warning,
    Error,
}

impl TipsError {
    /// Classify any error coming out of the pipeline.
    ///
    /// Errors that are not a `TipsError` (e.g. config parse failures) are hard errors.
    pub fn classify(err: &anyhow::Error) -> FailureKind {
        match err.downcast_ref::<TipsError>() {
            Some(TipsError::EmptyResult) => FailureKind::Warning,
            _ => FailureKind::Error,
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for TipsError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        TipsError::Workbook(err.to_string())
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = anyhow::Result<T>;
