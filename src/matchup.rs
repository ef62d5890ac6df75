//! Order-independent matchup labels.
//!
//! "X vs Y" and "Y vs X" collapse to the same label by sorting the two
//! competitor names lexicographically.

use crate::importers::TipRow;

const SEPARATOR: &str = " vs ";

/// A filtered tip with its canonical matchup label attached
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTip {
    pub row: TipRow,
    /// Empty when either competitor name is missing
    pub matchup: String,
}

/// `min(a, b) + " vs " + max(a, b)`, or "" when a name is missing.
pub fn canonical_matchup(a: Option<&str>, b: Option<&str>) -> String {
    match (a, b) {
        (Some(a), Some(b)) => {
            let (first, second) = if a <= b { (a, b) } else { (b, a) };
            format!("{}{}{}", first, SEPARATOR, second)
        }
        _ => String::new(),
    }
}

/// Attach the individual-competitor (`Jogador A`/`Jogador B`) matchup to each row.
pub fn normalize_matchups(rows: Vec<TipRow>) -> Vec<NormalizedTip> {
    rows.into_iter()
        .map(|row| {
            let matchup = canonical_matchup(row.player_a.as_deref(), row.player_b.as_deref());
            NormalizedTip { row, matchup }
        })
        .collect()
}
