//! Sheet contents ready for writing, plus the per-column styling rules.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use super::styles::{
    CellStyle, Tone, DATETIME_NUM_FORMAT, DATE_NUM_FORMAT, PROFIT_NUM_FORMAT, ROI_NUM_FORMAT,
    TIME_NUM_FORMAT,
};
use crate::importers::columns::{COL_DATE, COL_MATCHUP, COL_PROFIT, COL_RESULT, COL_TOURNAMENT};
use crate::importers::{CellValue, ColumnIndex};
use crate::matchup::NormalizedTip;
use crate::reports::{AggregateTable, GroupValue, HEADER_PROFIT, HEADER_ROI};
use crate::utils::{datetime_to_excel_serial, decimal_from_f64, round_half_up};

/// Text length credited to date cells when sizing columns
const DATE_WIDTH: usize = 19;
const OUTCOME_POSITIVE: &str = "Green";
const OUTCOME_NEGATIVE: &str = "Red";

/// A value to be written to one output cell
#[derive(Debug, Clone, PartialEq)]
pub enum OutCell {
    Empty,
    Text(String),
    Number(Decimal),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl OutCell {
    fn from_source(cell: &CellValue) -> Self {
        match cell {
            CellValue::Empty => OutCell::Empty,
            CellValue::Text(s) => OutCell::Text(s.clone()),
            CellValue::Number(n) => OutCell::Float(*n),
            CellValue::Bool(b) => OutCell::Bool(*b),
            CellValue::DateTime(dt) => OutCell::DateTime(*dt),
        }
    }

    fn numeric(&self) -> Option<Decimal> {
        match self {
            OutCell::Number(d) => Some(*d),
            OutCell::Float(f) => decimal_from_f64(*f),
            _ => None,
        }
    }

    /// Characters this value contributes to its column width.
    /// Empty, zero and false values contribute nothing.
    pub fn display_width(&self) -> Option<usize> {
        match self {
            OutCell::Empty => None,
            OutCell::Text(s) if s.is_empty() => None,
            OutCell::Text(s) => Some(s.chars().count()),
            OutCell::Number(d) if d.is_zero() => None,
            OutCell::Number(d) => Some(d.normalize().to_string().len()),
            OutCell::Float(f) if *f == 0.0 => None,
            OutCell::Float(f) => Some(f.to_string().len()),
            OutCell::Bool(false) => None,
            OutCell::Bool(true) => Some("True".len()),
            OutCell::Date(_) | OutCell::DateTime(_) => Some(DATE_WIDTH),
        }
    }
}

/// Headers and rows of one output sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<OutCell>>,
    /// Colour the `Resultado` column by Green/Red substrings
    pub outcome_column: bool,
}

impl SheetData {
    /// Styling is applied only with at least one data row and two columns.
    pub fn is_styled(&self) -> bool {
        !self.rows.is_empty() && self.headers.len() > 1
    }

    /// Table object name: sheet name with spaces replaced by underscores
    pub fn table_name(&self) -> String {
        format!("Table_{}", self.name.replace(' ', "_"))
    }

    /// Longest displayed value (header included) plus two
    pub fn column_widths(&self) -> Vec<usize> {
        (0..self.headers.len())
            .map(|col| {
                let header = self.headers[col].chars().count();
                let longest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col).and_then(OutCell::display_width))
                    .fold(header, usize::max);
                longest + 2
            })
            .collect()
    }
}

/// The filtered rows as written to the first sheet.
///
/// Source columns keep their order; coerced columns carry their coerced
/// values. `Data` and `Confronto Normalizado` are overwritten when the
/// source already has such a column, otherwise appended.
pub fn raw_sheet(
    name: &str,
    source_headers: &[String],
    columns: &ColumnIndex,
    tips: &[NormalizedTip],
) -> SheetData {
    let mut headers = source_headers.to_vec();
    let mut position = |label: &str| match headers.iter().position(|h| h == label) {
        Some(idx) => idx,
        None => {
            headers.push(label.to_string());
            headers.len() - 1
        }
    };
    let date_col = position(COL_DATE);
    let matchup_col = position(COL_MATCHUP);
    let width = headers.len();

    let rows = tips
        .iter()
        .map(|tip| {
            let mut cells: Vec<OutCell> = tip.row.cells.iter().map(OutCell::from_source).collect();
            cells.resize(width, OutCell::Empty);

            cells[columns.winrate_1] = tip.row.winrate_1.map_or(OutCell::Empty, OutCell::Number);
            cells[columns.winrate_2] = tip.row.winrate_2.map_or(OutCell::Empty, OutCell::Number);
            cells[columns.profit] = OutCell::Number(tip.row.profit);
            cells[date_col] = tip.row.date.map_or(OutCell::Empty, OutCell::Date);
            cells[matchup_col] = if tip.matchup.is_empty() {
                OutCell::Empty
            } else {
                OutCell::Text(tip.matchup.clone())
            };
            cells
        })
        .collect();

    SheetData {
        name: name.to_string(),
        headers,
        rows,
        outcome_column: true,
    }
}

/// One grouped table as a sheet
pub fn aggregate_sheet(table: &AggregateTable) -> SheetData {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let key = match row.key {
                GroupValue::Number(n) => OutCell::Number(n),
                GroupValue::Text(ref s) if s.is_empty() => OutCell::Empty,
                GroupValue::Text(ref s) => OutCell::Text(s.clone()),
            };
            vec![
                OutCell::Text(row.tournament.clone()),
                key,
                OutCell::Number(Decimal::from(row.count)),
                OutCell::Number(row.profit_sum),
                OutCell::Number(row.roi),
            ]
        })
        .collect();

    SheetData {
        name: table.sheet_name.to_string(),
        headers: table.headers().iter().map(|h| h.to_string()).collect(),
        rows,
        outcome_column: false,
    }
}

/// How a column's data cells are styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Tournament,
    Profit,
    Roi,
    Outcome,
    Plain,
}

/// Column roles for one sheet, resolved once from the header labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    roles: Vec<ColumnRole>,
}

impl SheetLayout {
    pub fn for_sheet(sheet: &SheetData) -> Self {
        let roles = sheet
            .headers
            .iter()
            .map(|h| match h.as_str() {
                COL_TOURNAMENT => ColumnRole::Tournament,
                COL_PROFIT | HEADER_PROFIT => ColumnRole::Profit,
                HEADER_ROI => ColumnRole::Roi,
                COL_RESULT if sheet.outcome_column => ColumnRole::Outcome,
                _ => ColumnRole::Plain,
            })
            .collect();
        Self { roles }
    }

    /// No column roles: only dates get a number format
    pub fn plain() -> Self {
        Self { roles: Vec::new() }
    }

    pub fn role(&self, col: usize) -> ColumnRole {
        self.roles.get(col).copied().unwrap_or(ColumnRole::Plain)
    }

    /// Style of a data cell. Sign colouring looks at the unrounded value.
    pub fn style_for(&self, col: usize, cell: &OutCell) -> CellStyle {
        let mut style = CellStyle {
            num_format: date_format(cell),
            ..CellStyle::default()
        };

        match self.role(col) {
            ColumnRole::Tournament => style.bold = !matches!(cell, OutCell::Empty),
            ColumnRole::Profit => {
                if let Some(value) = cell.numeric() {
                    style.num_format = Some(PROFIT_NUM_FORMAT);
                    style.tone = sign_tone(value);
                }
            }
            ColumnRole::Roi => {
                if let Some(value) = cell.numeric() {
                    style.num_format = Some(ROI_NUM_FORMAT);
                    style.tone = sign_tone(value);
                }
            }
            ColumnRole::Outcome => {
                if let OutCell::Text(text) = cell {
                    if text.contains(OUTCOME_POSITIVE) {
                        style.tone = Some(Tone::Positive);
                    } else if text.contains(OUTCOME_NEGATIVE) {
                        style.tone = Some(Tone::Negative);
                    }
                }
            }
            ColumnRole::Plain => {}
        }

        style
    }

    /// Value written for a data cell: profit values are rounded to 2 decimals
    pub fn value_for(&self, col: usize, cell: &OutCell) -> OutCell {
        match (self.role(col), cell.numeric()) {
            (ColumnRole::Profit, Some(value)) => OutCell::Number(round_half_up(value, 2)),
            _ => cell.clone(),
        }
    }
}

/// Zero gets no tone
fn sign_tone(value: Decimal) -> Option<Tone> {
    if value > Decimal::ZERO {
        Some(Tone::Positive)
    } else if value < Decimal::ZERO {
        Some(Tone::Negative)
    } else {
        None
    }
}

fn date_format(cell: &OutCell) -> Option<&'static str> {
    match cell {
        OutCell::Date(_) => Some(DATE_NUM_FORMAT),
        OutCell::DateTime(dt) => match datetime_to_excel_serial(*dt) {
            Some(serial) if serial < 1.0 => Some(TIME_NUM_FORMAT),
            _ => Some(DATETIME_NUM_FORMAT),
        },
        _ => None,
    }
}
