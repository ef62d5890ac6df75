//! Filter choices offered to the user for a loaded sheet.

use chrono::NaiveDate;
use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Serialize;

use super::tips_excel::TipSheet;

/// Wildcard accepted by the tournament and tip filters
pub const ALL: &str = "Todos";

/// Fallback start date when no row has a usable date
pub fn fallback_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TipOptions {
    /// "Todos" followed by tournaments in order of first appearance
    pub tournaments: Vec<String>,
    /// "Todos" followed by upper-cased tips in order of first appearance
    pub tips: Vec<String>,
    pub earliest_date: NaiveDate,
    pub default_winrate_min: Decimal,
}

impl TipOptions {
    pub fn discover(sheet: &TipSheet) -> Self {
        let tournaments = std::iter::once(ALL.to_string())
            .chain(
                sheet
                    .rows
                    .iter()
                    .filter_map(|r| r.tournament.clone())
                    .unique(),
            )
            .collect();

        let tips = std::iter::once(ALL.to_string())
            .chain(
                sheet
                    .rows
                    .iter()
                    .filter_map(|r| r.tip.as_ref().map(|t| t.to_uppercase()))
                    .unique(),
            )
            .collect();

        let earliest_date = sheet
            .rows
            .iter()
            .filter_map(|r| r.date)
            .min()
            .unwrap_or_else(fallback_start_date);

        // Slider starts at the integer part of the smallest win-rate, never below zero.
        let default_winrate_min = sheet
            .rows
            .iter()
            .filter_map(|r| r.winrate_1)
            .min()
            .map(|w| w.max(Decimal::ZERO).trunc())
            .unwrap_or(Decimal::ZERO);

        Self {
            tournaments,
            tips,
            earliest_date,
            default_winrate_min,
        }
    }
}
