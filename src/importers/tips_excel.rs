//! TipManager "Tips Enviadas" sheet importer
//!
//! Reads the whole sheet into memory and coerces the columns the pipeline
//! relies on:
//! - `Winrate 1` / `Winrate 2`: numeric, anything else becomes missing
//! - `Lucro/Prej.`: numeric, missing or malformed counts as zero
//! - column J: settlement date, anything that is not a date becomes missing
//!
//! Every other column is kept verbatim so the filtered rows can be written
//! back out unchanged.

use anyhow::Context;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::io::Cursor;
use std::str::FromStr;
use tracing::{debug, info};

use super::columns::{ColumnIndex, TIPS_SHEET};
use crate::error::{Result, TipsError};
use crate::utils::{decimal_from_f64, excel_serial_to_datetime};

/// A source cell, detached from calamine
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
            Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
                .map(CellValue::DateTime)
                .unwrap_or(CellValue::Empty),
            Data::DateTimeIso(s) => parse_datetime_text(s)
                .map(CellValue::DateTime)
                .unwrap_or_else(|| CellValue::Text(s.clone())),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Value used as a grouping key or competitor name. Empty cells have none.
    pub fn as_key(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) if s.is_empty() => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::DateTime(dt) => Some(dt.to_string()),
        }
    }

    /// Numeric coercion: numbers pass, numeric text is parsed, the rest is missing.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(n) => decimal_from_f64(*n),
            CellValue::Text(s) => Decimal::from_str(s.trim())
                .or_else(|_| Decimal::from_scientific(s.trim()))
                .ok(),
            _ => None,
        }
    }

    /// Date coercion: native dates and date-like text, time of day dropped.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::DateTime(dt) => Some(dt.date()),
            CellValue::Text(s) => parse_datetime_text(s).map(|dt| dt.date()),
            _ => None,
        }
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One wagering event from the sheet
#[derive(Debug, Clone, PartialEq)]
pub struct TipRow {
    /// Source cells in source column order
    pub cells: Vec<CellValue>,
    pub tournament: Option<String>,
    pub tip: Option<String>,
    pub player_a: Option<String>,
    pub player_b: Option<String>,
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    pub championship: Option<String>,
    pub winrate_1: Option<Decimal>,
    pub winrate_2: Option<Decimal>,
    /// Missing or malformed profit is zero
    pub profit: Decimal,
    pub date: Option<NaiveDate>,
    pub result: Option<String>,
}

impl TipRow {
    /// Build a typed row from raw cells using resolved column positions
    pub fn from_cells(cells: Vec<CellValue>, columns: &ColumnIndex) -> Self {
        let cell = |idx: usize| cells.get(idx).unwrap_or(&EMPTY_CELL);

        let tip = match cell(columns.tip) {
            CellValue::Text(s) => Some(s.clone()),
            _ => None,
        };
        let result = columns.result.and_then(|idx| match cell(idx) {
            CellValue::Text(s) => Some(s.clone()),
            _ => None,
        });

        let profit = cell(columns.profit).as_decimal().unwrap_or(Decimal::ZERO);

        Self {
            tournament: cell(columns.tournament).as_key(),
            tip,
            player_a: cell(columns.player_a).as_key(),
            player_b: cell(columns.player_b).as_key(),
            team_a: cell(columns.team_a).as_key(),
            team_b: cell(columns.team_b).as_key(),
            championship: cell(columns.championship).as_key(),
            winrate_1: cell(columns.winrate_1).as_decimal(),
            winrate_2: cell(columns.winrate_2).as_decimal(),
            profit,
            date: cell(columns.date).as_date(),
            result,
            cells,
        }
    }
}

/// The loaded "Tips Enviadas" sheet
#[derive(Debug, Clone, PartialEq)]
pub struct TipSheet {
    /// Source header labels; blank headers become `Unnamed: <index>`
    pub headers: Vec<String>,
    pub columns: ColumnIndex,
    pub rows: Vec<TipRow>,
}

/// Parse the tips sheet from an in-memory spreadsheet (xlsx, xls or ods)
pub fn parse_tips_workbook(bytes: &[u8]) -> Result<TipSheet> {
    info!("Parsing TipManager workbook ({} bytes)", bytes.len());

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| TipsError::Schema(format!("failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range(TIPS_SHEET)
        .map_err(|e| TipsError::Schema(format!("sheet '{}' not readable: {}", TIPS_SHEET, e)))?;

    // calamine ranges start at the first used cell; realign to column A.
    let col_offset = range.start().map(|(_, c)| c as usize).unwrap_or(0);

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| TipsError::Schema(format!("sheet '{}' is empty", TIPS_SHEET)))?;

    let headers = read_headers(header_row, col_offset);
    let columns = ColumnIndex::resolve(&headers).context("invalid tips sheet layout")?;

    let mut tips = Vec::new();
    let mut blank = 0;

    for row in rows {
        let mut cells = vec![CellValue::Empty; col_offset];
        cells.extend(row.iter().map(CellValue::from_data));
        cells.resize(headers.len(), CellValue::Empty);

        if cells.iter().all(CellValue::is_empty) {
            blank += 1;
            continue;
        }

        tips.push(TipRow::from_cells(cells, &columns));
    }

    if blank > 0 {
        debug!("Skipped {} blank rows", blank);
    }

    let missing_dates = tips.iter().filter(|t| t.date.is_none()).count();
    if missing_dates > 0 {
        debug!("{} rows have no usable settlement date", missing_dates);
    }

    info!("Parsed {} tips with {} columns", tips.len(), headers.len());

    Ok(TipSheet {
        headers,
        columns,
        rows: tips,
    })
}

fn read_headers(row: &[Data], col_offset: usize) -> Vec<String> {
    let labels = std::iter::repeat(None)
        .take(col_offset)
        .chain(row.iter().map(|cell| CellValue::from_data(cell).as_key()));

    labels
        .enumerate()
        .map(|(idx, label)| label.unwrap_or_else(|| format!("Unnamed: {}", idx)))
        .collect()
}

/// Parse date-like text: ISO dates/timestamps and Brazilian DD/MM/YYYY
fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}
