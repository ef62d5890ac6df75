//! Utility functions for decimal rounding and display formatting
//!
//! The report uses dot-decimal fixed notation ("10.00", "-3.20%") for every
//! textual number, independent of locale.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Round to `dp` decimal places, halves away from zero (7.555 -> 7.56).
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Fixed two-decimal text: "10.00", "-3.20".
///
/// # Examples
/// ```
/// use tipmanager::utils::format_fixed2;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_fixed2(dec!(10)), "10.00");
/// assert_eq!(format_fixed2(dec!(-3.2)), "-3.20");
/// ```
pub fn format_fixed2(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value, 2))
}

/// Fixed two-decimal percentage text: "12.50%".
pub fn format_percent2(value: Decimal) -> String {
    format!("{}%", format_fixed2(value))
}

/// Convert a spreadsheet float to Decimal through its shortest decimal string,
/// so 0.6 stays 0.6 instead of 0.59999999999999997779...
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
}

/// Decimal to f64 for the workbook writer.
pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Largest serial Excel accepts: 9999-12-31 23:59:59.999
pub const MAX_EXCEL_SERIAL: f64 = 2_958_465.999_999;

fn excel_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)
}

/// Excel serial day number (1900 date system) to a timestamp
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    let millis = (serial * MILLIS_PER_DAY).round() as i64;
    excel_epoch()?.checked_add_signed(chrono::Duration::try_milliseconds(millis)?)
}

/// Timestamp back to its Excel serial, `None` outside what Excel can store.
///
/// Time-only values (serial below 1) land on 1899-12-30 and convert back
/// to their fraction of a day.
pub fn datetime_to_excel_serial(dt: NaiveDateTime) -> Option<f64> {
    let millis = (dt - excel_epoch()?).num_milliseconds();
    let serial = millis as f64 / MILLIS_PER_DAY;
    (0.0..=MAX_EXCEL_SERIAL).contains(&serial).then_some(serial)
}
