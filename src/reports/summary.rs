//! Headline numbers for a run: total entries, total profit, average ROI,
//! plus a per-tournament breakdown when no tournament filter is active.
//!
//! Unlike the per-sheet `ROI (%)` columns (raw per-entry ratio), the summary
//! scales ROI by 100 and renders it as text with a percent sign.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::add_profit;
use crate::error::TipsError;
use crate::filters::Selection;
use crate::importers::TipRow;
use crate::utils::{format_fixed2, format_percent2, round_half_up};

/// One line of the "Análise por Torneio" table, already formatted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentSummaryRow {
    #[serde(rename = "Torneio")]
    pub tournament: String,
    #[serde(rename = "Total_Entradas")]
    pub total_entries: usize,
    #[serde(rename = "Lucro_Total")]
    pub total_profit: String,
    #[serde(rename = "ROI (%)")]
    pub roi_pct: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_entries: usize,
    pub total_profit: Decimal,
    /// total_profit / total_entries x 100, two decimals
    pub average_roi_pct: Decimal,
    /// Only present when the tournament filter is "Todos"
    pub by_tournament: Option<Vec<TournamentSummaryRow>>,
}

impl Summary {
    pub fn build<'a, I>(rows: I, tournament_filter: &Selection) -> Result<Self, TipsError>
    where
        I: IntoIterator<Item = &'a TipRow>,
    {
        let mut total_entries = 0usize;
        let mut total_profit = Decimal::ZERO;
        let mut groups: BTreeMap<&'a str, (usize, Decimal)> = BTreeMap::new();

        for row in rows {
            total_entries += 1;
            total_profit = add_profit(total_profit, row.profit)?;

            if let Some(ref tournament) = row.tournament {
                let entry = groups.entry(tournament.as_str()).or_insert((0, Decimal::ZERO));
                entry.0 += 1;
                entry.1 = add_profit(entry.1, row.profit)?;
            }
        }

        let by_tournament = if tournament_filter.is_all() {
            let rows = groups
                .into_iter()
                .map(|(tournament, (count, profit))| {
                    Ok(TournamentSummaryRow {
                        tournament: tournament.to_string(),
                        total_entries: count,
                        total_profit: format_fixed2(profit),
                        roi_pct: format_percent2(percent_per_entry(profit, count)?),
                    })
                })
                .collect::<Result<Vec<_>, TipsError>>()?;
            Some(rows)
        } else {
            None
        };

        Ok(Self {
            total_entries,
            total_profit,
            average_roi_pct: percent_per_entry(total_profit, total_entries)?,
            by_tournament,
        })
    }

    pub fn profit_is_positive(&self) -> bool {
        self.total_profit >= Decimal::ZERO
    }

    pub fn roi_is_positive(&self) -> bool {
        self.average_roi_pct >= Decimal::ZERO
    }
}

/// Indicator shown next to a headline figure
pub fn indicator(positive: bool) -> &'static str {
    if positive {
        "✅"
    } else {
        "❌"
    }
}

fn percent_per_entry(profit: Decimal, count: usize) -> Result<Decimal, TipsError> {
    if count == 0 {
        return Ok(Decimal::ZERO);
    }
    let per_entry = profit / Decimal::from(count);
    per_entry
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|pct| round_half_up(pct, 2))
        .ok_or_else(|| {
            TipsError::Validation(format!("ROI percentage of {} per entry overflows", per_entry))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(tournament: Option<&str>, profit: Decimal) -> TipRow {
        TipRow {
            cells: Vec::new(),
            tournament: tournament.map(String::from),
            tip: None,
            player_a: None,
            player_b: None,
            team_a: None,
            team_b: None,
            championship: None,
            winrate_1: None,
            winrate_2: None,
            profit,
            date: None,
            result: None,
        }
    }

    #[test]
    fn test_summary_totals() {
        let rows = vec![
            row(Some("B"), dec!(10)),
            row(Some("A"), dec!(-5)),
            row(Some("B"), dec!(2.5)),
        ];
        let summary = Summary::build(&rows, &Selection::All).unwrap();
        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.total_profit, dec!(7.5));
        assert_eq!(summary.average_roi_pct, dec!(250));
        assert!(summary.profit_is_positive());
        assert!(summary.roi_is_positive());
    }

    #[test]
    fn test_by_tournament_formatting() {
        let rows = vec![
            row(Some("B"), dec!(10)),
            row(Some("A"), dec!(-5)),
            row(Some("B"), dec!(2.5)),
        ];
        let summary = Summary::build(&rows, &Selection::All).unwrap();
        let table = summary.by_tournament.unwrap();
        assert_eq!(
            table,
            vec![
                TournamentSummaryRow {
                    tournament: "A".into(),
                    total_entries: 1,
                    total_profit: "-5.00".into(),
                    roi_pct: "-500.00%".into(),
                },
                TournamentSummaryRow {
                    tournament: "B".into(),
                    total_entries: 2,
                    total_profit: "12.50".into(),
                    roi_pct: "625.00%".into(),
                },
            ]
        );
    }

    #[test]
    fn test_by_tournament_only_for_wildcard() {
        let rows = vec![row(Some("A"), dec!(1))];
        let summary = Summary::build(&rows, &Selection::Only("A".into())).unwrap();
        assert!(summary.by_tournament.is_none());
    }

    #[test]
    fn test_negative_indicator() {
        let rows = vec![row(Some("A"), dec!(-1))];
        let summary = Summary::build(&rows, &Selection::All).unwrap();
        assert!(!summary.profit_is_positive());
        assert_eq!(indicator(summary.roi_is_positive()), "❌");
    }

    #[test]
    fn test_empty_summary_is_zero() {
        let summary = Summary::build(std::iter::empty(), &Selection::All).unwrap();
        assert_eq!(summary.average_roi_pct, Decimal::ZERO);
        assert_eq!(summary.by_tournament, Some(Vec::new()));
    }

    #[test]
    fn test_overflowing_profit_is_an_error() {
        let rows = vec![row(Some("A"), Decimal::MAX), row(Some("A"), Decimal::MAX)];
        let err = Summary::build(&rows, &Selection::All).unwrap_err();
        assert!(matches!(err, TipsError::Validation(_)));
    }

    #[test]
    fn test_overflowing_percentage_is_an_error() {
        let huge = Decimal::from_i128_with_scale(10i128.pow(27), 0);
        let err = Summary::build(&[row(Some("A"), huge)], &Selection::All).unwrap_err();
        assert!(matches!(err, TipsError::Validation(_)));
    }
}
