//! Filter engine: narrows the loaded tips by tournament, tip, win-rate and
//! settlement date.
//!
//! All predicates are conjunctive. Only `Winrate 1` is range-filtered;
//! `Winrate 2` passes through untouched. Rows without a usable `Winrate 1`
//! or settlement date never match, because a missing value compares false
//! against both bounds.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use crate::error::{Result, TipsError};
use crate::importers::{TipOptions, TipRow, ALL};

/// Exact-match filter with a wildcard
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Selection {
    All,
    Only(String),
}

impl Selection {
    /// "Todos" is the wildcard; anything else is matched literally.
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            Selection::All
        } else {
            Selection::Only(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "{}", ALL),
            Selection::Only(v) => write!(f, "{}", v),
        }
    }
}

/// User-chosen filter parameters for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FilterParams {
    pub tournament: Selection,
    /// Compared case-insensitively
    pub tip: Selection,
    pub winrate_min: Decimal,
    pub winrate_max: Decimal,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
}

impl FilterParams {
    /// Starting parameters: everything selected, win-rate from the
    /// discovered minimum to 1, dates from the earliest tip to today.
    pub fn defaults_for(options: &TipOptions, today: NaiveDate) -> Self {
        Self {
            tournament: Selection::All,
            tip: Selection::All,
            winrate_min: options.default_winrate_min,
            winrate_max: Decimal::ONE,
            date_start: options.earliest_date,
            date_end: today,
        }
    }

    /// Check `0 <= min <= max <= 1` and `start <= end`
    pub fn validate(&self) -> std::result::Result<(), TipsError> {
        if !(Decimal::ZERO <= self.winrate_min
            && self.winrate_min <= self.winrate_max
            && self.winrate_max <= Decimal::ONE)
        {
            return Err(TipsError::Validation(format!(
                "win-rates must be between 0 and 1 with minimum <= maximum (got {} to {})",
                self.winrate_min, self.winrate_max
            )));
        }

        if self.date_start > self.date_end {
            return Err(TipsError::Validation(format!(
                "start date {} is after end date {}",
                self.date_start, self.date_end
            )));
        }

        Ok(())
    }

    /// True when the row satisfies every active predicate
    pub fn matches(&self, row: &TipRow) -> bool {
        if let Selection::Only(ref tournament) = self.tournament {
            if row.tournament.as_deref() != Some(tournament.as_str()) {
                return false;
            }
        }

        if let Selection::Only(ref tip) = self.tip {
            let wanted = tip.to_uppercase();
            match row.tip {
                Some(ref t) if t.to_uppercase() == wanted => {}
                _ => return false,
            }
        }

        let winrate_ok = row
            .winrate_1
            .is_some_and(|w| self.winrate_min <= w && w <= self.winrate_max);

        let date_ok = row
            .date
            .is_some_and(|d| self.date_start <= d && d <= self.date_end);

        winrate_ok && date_ok
    }
}

/// Validate the parameters and return the matching rows.
///
/// An empty result is reported as `TipsError::EmptyResult`; downstream
/// stages never see an empty set.
pub fn apply_filters(rows: &[TipRow], params: &FilterParams) -> Result<Vec<TipRow>> {
    params.validate()?;

    debug!(
        "Filtering {} rows: tournament={}, tip={}, winrate=[{}, {}], dates=[{}, {}]",
        rows.len(),
        params.tournament,
        params.tip,
        params.winrate_min,
        params.winrate_max,
        params.date_start,
        params.date_end
    );

    let filtered: Vec<TipRow> = rows.iter().filter(|r| params.matches(r)).cloned().collect();

    if filtered.is_empty() {
        return Err(TipsError::EmptyResult.into());
    }

    info!("{} of {} rows match the filters", filtered.len(), rows.len());
    Ok(filtered)
}
