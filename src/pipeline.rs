//! Orchestration: load -> validate -> filter -> normalize -> aggregate ->
//! summarize -> render.

use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::cache::{cache_key, ReportCache};
use crate::error::Result;
use crate::export::{render_report, ColorHints};
use crate::filters::{apply_filters, FilterParams};
use crate::importers::{parse_tips_workbook, TipSheet};
use crate::matchup::{normalize_matchups, NormalizedTip};
use crate::reports::{ReportSet, Summary};

/// Suggested name of the downloaded workbook
pub const DEFAULT_FILE_NAME: &str = "Analise_TipManager.xlsx";

pub use crate::export::XLSX_MIME;

/// Everything produced by one successful run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// Filtered rows with their normalized matchup
    #[serde(skip)]
    pub tips: Vec<NormalizedTip>,
    pub reports: ReportSet,
    pub summary: Summary,
    /// The eight-sheet xlsx
    #[serde(skip)]
    pub workbook: Vec<u8>,
}

/// Run the whole pipeline on an uploaded file
pub fn run_pipeline(bytes: &[u8], params: &FilterParams, hints: &ColorHints) -> Result<PipelineOutput> {
    let sheet = parse_tips_workbook(bytes)?;
    run_on_sheet(&sheet, params, hints)
}

/// Run every stage after loading on an already parsed sheet
pub fn run_on_sheet(sheet: &TipSheet, params: &FilterParams, hints: &ColorHints) -> Result<PipelineOutput> {
    let filtered = apply_filters(&sheet.rows, params)?;
    let tips = normalize_matchups(filtered);
    let reports = ReportSet::build(&tips)?;
    let summary = Summary::build(tips.iter().map(|t| &t.row), &params.tournament)?;
    let workbook = render_report(sheet, &tips, &reports, hints)?;

    info!(
        "Pipeline finished: {} entries, total profit {}",
        summary.total_entries, summary.total_profit
    );

    Ok(PipelineOutput {
        tips,
        reports,
        summary,
        workbook,
    })
}

/// Pipeline with memoized results
pub struct Pipeline {
    cache: ReportCache,
}

impl Pipeline {
    pub fn new(cache: ReportCache) -> Self {
        Self { cache }
    }

    /// Same as [`run_pipeline`], but identical input returns the stored result.
    pub fn run(
        &mut self,
        bytes: &[u8],
        params: &FilterParams,
        hints: &ColorHints,
    ) -> Result<Arc<PipelineOutput>> {
        let key = cache_key(bytes, params, hints)?;
        self.cache
            .get_or_try_insert(key, || run_pipeline(bytes, params, hints))
    }

    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ReportCache::default())
    }
}
