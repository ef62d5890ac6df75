// Export module - renders the analysis workbook with rust_xlsxwriter

pub mod sheet;
pub mod styles;

use chrono::Datelike;
use rust_xlsxwriter::{
    DocProperties, ExcelDateTime, Format, Table, TableColumn, TableStyle, Workbook, Worksheet,
};
use tracing::{debug, info};

use crate::error::{Result, TipsError};
use crate::importers::{TipSheet, TIPS_SHEET};
use crate::matchup::NormalizedTip;
use crate::reports::ReportSet;
use crate::utils::{datetime_to_excel_serial, decimal_to_f64};

pub use sheet::{aggregate_sheet, raw_sheet, ColumnRole, OutCell, SheetData, SheetLayout};
pub use styles::{CellStyle, ColorHints, FormatCache, Rgb, StylePalette, Tone};

const EXCEL_MIN_YEAR: i32 = 1900;
const EXCEL_MAX_YEAR: i32 = 9999;

/// MIME type of the produced workbook
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// The eight output sheets in workbook order
pub fn workbook_sheets(source: &TipSheet, tips: &[NormalizedTip], reports: &ReportSet) -> Vec<SheetData> {
    std::iter::once(raw_sheet(TIPS_SHEET, &source.headers, &source.columns, tips))
        .chain(reports.tables().into_iter().map(aggregate_sheet))
        .collect()
}

/// Render the filtered tips and grouped tables to xlsx bytes
pub fn render_report(
    source: &TipSheet,
    tips: &[NormalizedTip],
    reports: &ReportSet,
    hints: &ColorHints,
) -> Result<Vec<u8>> {
    let sheets = workbook_sheets(source, tips, reports);
    let bytes = render_workbook(&sheets, &StylePalette::from_hints(hints))?;
    Ok(bytes)
}

/// Write the given sheets to an in-memory xlsx.
///
/// The document creation time is pinned, so identical input yields
/// identical bytes.
pub fn render_workbook(sheets: &[SheetData], palette: &StylePalette) -> std::result::Result<Vec<u8>, TipsError> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let header_format = palette.header_format();
    let mut formats = FormatCache::new(*palette);

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        if sheet.is_styled() {
            write_styled(worksheet, sheet, &header_format, &mut formats)?;
        } else {
            write_plain(worksheet, sheet, &mut formats)?;
        }
        debug!("Wrote sheet '{}' ({} rows)", sheet.name, sheet.rows.len());
    }

    let bytes = workbook.save_to_buffer()?;
    info!("Rendered workbook with {} sheets ({} bytes)", sheets.len(), bytes.len());
    Ok(bytes)
}

fn write_styled(
    worksheet: &mut Worksheet,
    sheet: &SheetData,
    header_format: &Format,
    formats: &mut FormatCache,
) -> std::result::Result<(), TipsError> {
    let layout = SheetLayout::for_sheet(sheet);

    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, header_format)?;
    }

    for (idx, cells) in sheet.rows.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, cell) in cells.iter().enumerate() {
            let style = layout.style_for(col, cell);
            let value = layout.value_for(col, cell);
            write_cell(worksheet, row, col as u16, &value, &style, formats)?;
        }
    }

    for (col, width) in sheet.column_widths().into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    let columns: Vec<TableColumn> = sheet
        .headers
        .iter()
        .map(|h| TableColumn::new().set_header(h).set_header_format(header_format))
        .collect();
    let table = Table::new()
        .set_name(sheet.table_name())
        .set_style(TableStyle::Light1)
        .set_banded_rows(true)
        .set_columns(&columns);

    let last_row = sheet.rows.len() as u32;
    let last_col = (sheet.headers.len() - 1) as u16;
    worksheet.add_table(0, 0, last_row, last_col, &table)?;

    Ok(())
}

fn write_plain(
    worksheet: &mut Worksheet,
    sheet: &SheetData,
    formats: &mut FormatCache,
) -> std::result::Result<(), TipsError> {
    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }

    // Dates still need a number format to display as dates.
    let layout = SheetLayout::plain();
    for (idx, cells) in sheet.rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let style = layout.style_for(col, cell);
            write_cell(worksheet, (idx + 1) as u32, col as u16, cell, &style, formats)?;
        }
    }

    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &OutCell,
    style: &CellStyle,
    formats: &mut FormatCache,
) -> std::result::Result<(), TipsError> {
    let format = formats.get(style);

    match cell {
        OutCell::Empty => {}
        OutCell::Text(s) => {
            worksheet.write_string_with_format(row, col, s, format)?;
        }
        OutCell::Number(d) => {
            worksheet.write_number_with_format(row, col, decimal_to_f64(*d), format)?;
        }
        OutCell::Float(f) => {
            worksheet.write_number_with_format(row, col, *f, format)?;
        }
        OutCell::Bool(b) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        OutCell::Date(d) if (EXCEL_MIN_YEAR..=EXCEL_MAX_YEAR).contains(&d.year()) => {
            let date = ExcelDateTime::from_ymd(d.year() as u16, d.month() as u8, d.day() as u8)?;
            worksheet.write_datetime_with_format(row, col, &date, format)?;
        }
        // Excel cannot store it as a date; keep it readable.
        OutCell::Date(d) => {
            worksheet.write_string(row, col, d.format("%Y-%m-%d").to_string())?;
        }
        // Source timestamps go back as their serial, so time-only cells survive.
        OutCell::DateTime(dt) => match datetime_to_excel_serial(*dt) {
            Some(serial) => {
                worksheet.write_number_with_format(row, col, serial, format)?;
            }
            None => {
                worksheet.write_string(row, col, dt.format("%Y-%m-%d %H:%M:%S").to_string())?;
            }
        },
    }

    Ok(())
}
