//! Output formatting module for CLI display
//!
//! Keeps presentation separate from the pipeline: every function here
//! takes finished library values and returns a printable string.

use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use tipmanager::export::ColorHints;
use tipmanager::filters::FilterParams;
use tipmanager::importers::TipOptions;
use tipmanager::reports::summary::indicator;
use tipmanager::reports::Summary;
use tipmanager::utils::{format_fixed2, format_percent2};

fn signed(text: String, positive: bool) -> String {
    if positive {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Summary metrics and the per-tournament table
pub fn format_summary_table(summary: &Summary) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{} Resumo Geral\n\n", "📊".cyan().bold()));
    output.push_str(&format!(
        "{:<22} {}\n",
        "Total de Entradas:".bold(),
        summary.total_entries
    ));
    output.push_str(&format!(
        "{:<22} {} {}\n",
        "Lucro Total:".bold(),
        signed(format_fixed2(summary.total_profit), summary.profit_is_positive()),
        indicator(summary.profit_is_positive())
    ));
    output.push_str(&format!(
        "{:<22} {} {}\n",
        "ROI Médio:".bold(),
        signed(format_percent2(summary.average_roi_pct), summary.roi_is_positive()),
        indicator(summary.roi_is_positive())
    ));

    if let Some(ref rows) = summary.by_tournament {
        #[derive(Tabled)]
        struct TournamentRow {
            #[tabled(rename = "Torneio")]
            tournament: String,
            #[tabled(rename = "Total_Entradas")]
            entries: usize,
            #[tabled(rename = "Lucro_Total")]
            profit: String,
            #[tabled(rename = "ROI (%)")]
            roi: String,
        }

        let table_rows: Vec<TournamentRow> = rows
            .iter()
            .map(|r| TournamentRow {
                tournament: r.tournament.clone(),
                entries: r.total_entries,
                profit: r.total_profit.clone(),
                roi: r.roi_pct.clone(),
            })
            .collect();

        let table = Table::new(table_rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .to_string();

        output.push_str(&format!("\n{} Análise por Torneio\n", "🏆".cyan().bold()));
        output.push_str(&table);
        output.push('\n');
    }

    output
}

#[derive(Serialize)]
struct JsonReport<'a> {
    params: &'a FilterParams,
    colors: &'a ColorHints,
    summary: &'a Summary,
    output: Option<String>,
}

/// Summary plus the parameters that produced it
pub fn format_summary_json(
    summary: &Summary,
    params: &FilterParams,
    colors: &ColorHints,
    output: Option<&Path>,
) -> String {
    let report = JsonReport {
        params,
        colors,
        summary,
        output: output.map(|p| p.display().to_string()),
    };
    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Filter choices discovered in the sheet
pub fn format_options_table(options: &TipOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{} Torneios\n", "🏆".cyan().bold()));
    for t in &options.tournaments {
        output.push_str(&format!("  {}\n", t));
    }

    output.push_str(&format!("\n{} Tips\n", "🎯".cyan().bold()));
    for t in &options.tips {
        output.push_str(&format!("  {}\n", t));
    }

    output.push_str(&format!(
        "\n{:<22} {}\n{:<22} {}\n",
        "Data inicial:".bold(),
        options.earliest_date,
        "Winrate mínimo:".bold(),
        options.default_winrate_min
    ));

    output
}

pub fn format_options_json(options: &TipOptions) -> String {
    serde_json::to_string_pretty(options)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Current session parameters
pub fn format_params(params: &FilterParams, colors: &ColorHints) -> String {
    let color = |c: Option<tipmanager::Rgb>| c.map_or_else(|| "padrão".to_string(), |c| c.to_string());
    format!(
        "  {:<12} {}\n  {:<12} {}\n  {:<12} {} - {}\n  {:<12} {} - {}\n  {:<12} {} / {}\n",
        "Torneio:",
        params.tournament,
        "Tip:",
        params.tip,
        "Winrate 1:",
        params.winrate_min,
        params.winrate_max,
        "Datas:",
        params.date_start,
        params.date_end,
        "Cores:",
        color(colors.positive),
        color(colors.negative)
    )
}

/// Printed when the filters leave nothing to analyse
pub fn format_empty_result(message: &str) -> String {
    format!("{} {}\n", "⚠".yellow().bold(), message)
}

pub fn format_workbook_written(path: &Path, bytes: usize) -> String {
    format!(
        "\n{} Planilha salva em {} ({} bytes)\n",
        "✓".green().bold(),
        path.display(),
        bytes
    )
}
