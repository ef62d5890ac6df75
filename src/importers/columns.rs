//! Header labels of the TipManager "Tips Enviadas" sheet and the resolved
//! positions of the columns the pipeline reads.

use crate::error::TipsError;

/// Sheet holding one row per submitted tip
pub const TIPS_SHEET: &str = "Tips Enviadas";

pub const COL_TOURNAMENT: &str = "Torneio";
pub const COL_TIP: &str = "Tip";
pub const COL_PLAYER_A: &str = "Jogador A";
pub const COL_PLAYER_B: &str = "Jogador B";
pub const COL_TEAM_A: &str = "Time A";
pub const COL_TEAM_B: &str = "Time B";
pub const COL_WINRATE_1: &str = "Winrate 1";
pub const COL_WINRATE_2: &str = "Winrate 2";
pub const COL_PROFIT: &str = "Lucro/Prej.";
pub const COL_CHAMPIONSHIP: &str = "Campeonato";
pub const COL_RESULT: &str = "Resultado";

/// Derived columns appended to the filtered raw sheet
pub const COL_DATE: &str = "Data";
pub const COL_MATCHUP: &str = "Confronto Normalizado";

/// Settlement date lives in column J regardless of its header
pub const DATE_COLUMN_INDEX: usize = 9;

const REQUIRED: [&str; 10] = [
    COL_TOURNAMENT,
    COL_TIP,
    COL_PLAYER_A,
    COL_PLAYER_B,
    COL_TEAM_A,
    COL_TEAM_B,
    COL_WINRATE_1,
    COL_WINRATE_2,
    COL_PROFIT,
    COL_CHAMPIONSHIP,
];

/// Positions of every column the pipeline needs, resolved once per sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    pub tournament: usize,
    pub tip: usize,
    pub player_a: usize,
    pub player_b: usize,
    pub team_a: usize,
    pub team_b: usize,
    pub winrate_1: usize,
    pub winrate_2: usize,
    pub profit: usize,
    pub championship: usize,
    pub date: usize,
    pub result: Option<usize>,
}

impl ColumnIndex {
    /// Resolve required columns by exact header label.
    ///
    /// Every missing label is reported at once so the user can fix the sheet in one go.
    pub fn resolve(headers: &[String]) -> Result<Self, TipsError> {
        let find = |label: &str| headers.iter().position(|h| h == label);

        let missing: Vec<&str> = REQUIRED
            .iter()
            .copied()
            .filter(|label| find(label).is_none())
            .collect();

        if !missing.is_empty() {
            let list = missing
                .iter()
                .map(|m| format!("'{}'", m))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(TipsError::Schema(format!(
                "required column(s) {} not found in sheet '{}'",
                list, TIPS_SHEET
            )));
        }

        // Ten labelled columns are present, so column J (index 9) always exists.
        let pos = |label: &str| find(label).unwrap_or_default();

        Ok(Self {
            tournament: pos(COL_TOURNAMENT),
            tip: pos(COL_TIP),
            player_a: pos(COL_PLAYER_A),
            player_b: pos(COL_PLAYER_B),
            team_a: pos(COL_TEAM_A),
            team_b: pos(COL_TEAM_B),
            winrate_1: pos(COL_WINRATE_1),
            winrate_2: pos(COL_WINRATE_2),
            profit: pos(COL_PROFIT),
            championship: pos(COL_CHAMPIONSHIP),
            date: DATE_COLUMN_INDEX,
            result: find(COL_RESULT),
        })
    }
}
