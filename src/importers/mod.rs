// Import module - TipManager spreadsheet reader

pub mod columns;
pub mod options;
pub mod tips_excel;

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing::info;

pub use columns::{ColumnIndex, TIPS_SHEET};
pub use options::{TipOptions, ALL};
pub use tips_excel::{parse_tips_workbook, CellValue, TipRow, TipSheet};

/// Read a tips spreadsheet fully into memory.
///
/// The pipeline works on bytes so the same buffer can be hashed for the
/// report cache and parsed without touching the disk again.
pub fn read_source<P: AsRef<Path>>(file_path: P) -> Result<Vec<u8>> {
    let path = file_path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| anyhow!("File has no extension"))?
        .to_lowercase();

    if !matches!(extension.as_str(), "xlsx" | "xlsm" | "xls" | "ods") {
        return Err(anyhow!(
            "Unsupported file format: {}. Supported formats: .xlsx, .xlsm, .xls, .ods",
            extension
        ));
    }

    info!("Reading tips file: {:?}", path);
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Read and parse a tips spreadsheet from disk
pub fn load_tips_file<P: AsRef<Path>>(file_path: P) -> Result<TipSheet> {
    let bytes = read_source(file_path)?;
    parse_tips_workbook(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unknown_extension() {
        let err = read_source("tips.csv").unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[test]
    fn test_rejects_missing_extension() {
        let err = read_source("tips").unwrap_err();
        assert!(err.to_string().contains("no extension"));
    }
}
