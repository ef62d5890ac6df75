// Reports module - grouped profit/ROI tables and the run summary

pub mod summary;

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::TipsError;
use crate::importers::columns::{
    COL_CHAMPIONSHIP, COL_MATCHUP, COL_TOURNAMENT, COL_WINRATE_1, COL_WINRATE_2,
};
use crate::matchup::NormalizedTip;
use crate::utils::round_half_up;

pub use summary::{Summary, TournamentSummaryRow};

pub const SHEET_CHAMPIONSHIP: &str = "Campeonato";
pub const SHEET_MATCHUP: &str = "Confronto";
pub const SHEET_WINRATE_1: &str = "Winrate 1";
pub const SHEET_WINRATE_2: &str = "Winrate 2";
pub const SHEET_PLAYER: &str = "Jogador";
pub const SHEET_TEAM: &str = "ROI por Time";
pub const SHEET_TEAM_MATCHUP: &str = "Confronto Times";

pub const HEADER_COUNT: &str = "Quantidade_Entradas";
pub const HEADER_PROFIT: &str = "Lucro_Prej";
pub const HEADER_ROI: &str = "ROI (%)";

const DIM_PLAYER: &str = "Jogador";
const DIM_TEAM: &str = "Time";

/// Second grouping dimension of an aggregate row
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupValue {
    /// Win-rate buckets, grouped by exact value
    Number(Decimal),
    Text(String),
}

/// One grouped summary record keyed by (tournament, dimension)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub tournament: String,
    pub key: GroupValue,
    pub count: usize,
    pub profit_sum: Decimal,
    /// Average profit per entry, rounded to 2 decimals
    pub roi: Decimal,
}

/// A grouped table destined for one sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateTable {
    pub sheet_name: &'static str,
    /// Header of the grouping column next to `Torneio`
    pub dimension: &'static str,
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    /// Column headers in output order
    pub fn headers(&self) -> [&'static str; 5] {
        [
            COL_TOURNAMENT,
            self.dimension,
            HEADER_COUNT,
            HEADER_PROFIT,
            HEADER_ROI,
        ]
    }

    pub fn total_count(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }

    pub fn total_profit(&self) -> Decimal {
        self.rows.iter().map(|r| r.profit_sum).sum()
    }
}

/// Per-entry average profit, `None` for an empty group.
pub fn roi(profit_sum: Decimal, count: usize) -> Option<Decimal> {
    if count == 0 {
        return None;
    }
    Some(round_half_up(profit_sum / Decimal::from(count), 2))
}

/// Add a profit to a running total, failing instead of overflowing
pub fn add_profit(total: Decimal, profit: Decimal) -> Result<Decimal, TipsError> {
    total.checked_add(profit).ok_or_else(|| {
        TipsError::Validation(format!(
            "profit total overflows when adding {} to {}",
            profit, total
        ))
    })
}

/// Group `(tournament, key, profit)` records. Records missing either key are dropped.
fn aggregate<I>(
    sheet_name: &'static str,
    dimension: &'static str,
    records: I,
) -> Result<AggregateTable, TipsError>
where
    I: IntoIterator<Item = (Option<String>, Option<GroupValue>, Decimal)>,
{
    let mut groups: BTreeMap<(String, GroupValue), (usize, Decimal)> = BTreeMap::new();

    for (tournament, key, profit) in records {
        let (Some(tournament), Some(key)) = (tournament, key) else {
            continue;
        };
        let entry = groups.entry((tournament, key)).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 = add_profit(entry.1, profit)?;
    }

    let rows = groups
        .into_iter()
        .filter_map(|((tournament, key), (count, profit_sum))| {
            roi(profit_sum, count).map(|roi| AggregateRow {
                tournament,
                key,
                count,
                profit_sum,
                roi,
            })
        })
        .collect::<Vec<_>>();

    debug!("{}: {} groups", sheet_name, rows.len());

    Ok(AggregateTable {
        sheet_name,
        dimension,
        rows,
    })
}

fn text(value: &Option<String>) -> Option<GroupValue> {
    value.clone().map(GroupValue::Text)
}

/// The seven grouped tables written after the raw rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSet {
    pub by_championship: AggregateTable,
    pub by_matchup: AggregateTable,
    pub by_winrate_1: AggregateTable,
    pub by_winrate_2: AggregateTable,
    pub by_player: AggregateTable,
    pub by_team: AggregateTable,
    pub by_team_matchup: AggregateTable,
}

impl ReportSet {
    pub fn build(tips: &[NormalizedTip]) -> Result<Self, TipsError> {
        let matchup_records = || {
            tips.iter().map(|t| {
                (
                    t.row.tournament.clone(),
                    Some(GroupValue::Text(t.matchup.clone())),
                    t.row.profit,
                )
            })
        };

        let by_matchup = aggregate(SHEET_MATCHUP, COL_MATCHUP, matchup_records())?;

        let by_championship = aggregate(
            SHEET_CHAMPIONSHIP,
            COL_CHAMPIONSHIP,
            tips.iter()
                .map(|t| (t.row.tournament.clone(), text(&t.row.championship), t.row.profit)),
        )?;

        let by_winrate_1 = aggregate(
            SHEET_WINRATE_1,
            COL_WINRATE_1,
            tips.iter().map(|t| {
                (
                    t.row.tournament.clone(),
                    t.row.winrate_1.map(GroupValue::Number),
                    t.row.profit,
                )
            }),
        )?;

        let by_winrate_2 = aggregate(
            SHEET_WINRATE_2,
            COL_WINRATE_2,
            tips.iter().map(|t| {
                (
                    t.row.tournament.clone(),
                    t.row.winrate_2.map(GroupValue::Number),
                    t.row.profit,
                )
            }),
        )?;

        // Each tip contributes one record per competitor role.
        let by_player = aggregate(
            SHEET_PLAYER,
            DIM_PLAYER,
            tips.iter().flat_map(|t| {
                [&t.row.player_a, &t.row.player_b]
                    .map(|name| (t.row.tournament.clone(), text(name), t.row.profit))
            }),
        )?;

        let by_team = aggregate(
            SHEET_TEAM,
            DIM_TEAM,
            tips.iter().flat_map(|t| {
                [&t.row.team_a, &t.row.team_b]
                    .map(|name| (t.row.tournament.clone(), text(name), t.row.profit))
            }),
        )?;

        // Team matchups reuse the player-pair label; see DESIGN.md.
        let by_team_matchup = aggregate(SHEET_TEAM_MATCHUP, COL_MATCHUP, matchup_records())?;

        Ok(Self {
            by_championship,
            by_matchup,
            by_winrate_1,
            by_winrate_2,
            by_player,
            by_team,
            by_team_matchup,
        })
    }

    /// Tables in workbook sheet order
    pub fn tables(&self) -> [&AggregateTable; 7] {
        [
            &self.by_championship,
            &self.by_matchup,
            &self.by_winrate_1,
            &self.by_winrate_2,
            &self.by_player,
            &self.by_team,
            &self.by_team_matchup,
        ]
    }
}
