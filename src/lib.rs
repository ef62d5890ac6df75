//! TipManager - betting-tips report analyser
//!
//! Loads the "Tips Enviadas" sheet of a TipManager export, filters it,
//! groups profit and ROI by several dimensions and renders a styled
//! eight-sheet Excel workbook plus a headline summary.

pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod filters;
pub mod importers;
pub mod matchup;
pub mod pipeline;
pub mod reports;
pub mod utils;

pub use error::{FailureKind, Result, TipsError};
pub use export::{ColorHints, Rgb};
pub use filters::{FilterParams, Selection};
pub use pipeline::{run_pipeline, Pipeline, PipelineOutput};
