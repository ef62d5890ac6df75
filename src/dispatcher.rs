//! Command dispatcher: routes clap commands and interactive session
//! commands to their handlers.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use tipmanager::cache::ReportCache;
use tipmanager::config::Config;
use tipmanager::filters::FilterParams;
use tipmanager::importers::{parse_tips_workbook, read_source, TipOptions};
use tipmanager::pipeline::{run_on_sheet, Pipeline};
use tipmanager::{ColorHints, FailureKind, TipsError};

use crate::cli::formatters::{
    format_empty_result, format_options_json, format_options_table, format_params,
    format_summary_json, format_summary_table, format_workbook_written,
};
use crate::cli::help::render_session_help;
use crate::cli::runner::{to_color_hints, to_filter_params};
use crate::cli::{Cli, Commands};
use crate::commands::SessionCommand;
use crate::ui::progress::Spinner;

const SPINNER_MESSAGE: &str = "Processando dados...";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Route a parsed command line to its handler
pub fn dispatch(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Report {
            file,
            filters,
            output,
            positive_color,
            negative_color,
            dry_run,
        } => {
            let hints = to_color_hints(positive_color.as_deref(), negative_color.as_deref(), &config)?;
            let bytes = read_source(file)?;
            let sheet = parse_tips_workbook(&bytes)?;
            let options = TipOptions::discover(&sheet);
            let params = to_filter_params(filters, &options, today());

            let result = {
                let _spinner = Spinner::start(SPINNER_MESSAGE, !cli.json);
                run_on_sheet(&sheet, &params, &hints)
            };
            let report = result?;

            let path = output
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.output.file_name));
            let written = if *dry_run {
                None
            } else {
                write_workbook(&path, &report.workbook)?;
                Some(path.as_path())
            };

            if cli.json {
                println!("{}", format_summary_json(&report.summary, &params, &hints, written));
            } else {
                print!("{}", format_summary_table(&report.summary));
                match written {
                    Some(path) => print!("{}", format_workbook_written(path, report.workbook.len())),
                    None => println!("\n{} Dry run - no workbook written", "ℹ".blue().bold()),
                }
            }
            Ok(())
        }

        Commands::Options { file } => {
            let sheet = parse_tips_workbook(&read_source(file)?)?;
            let options = TipOptions::discover(&sheet);
            if cli.json {
                println!("{}", format_options_json(&options));
            } else {
                print!("{}", format_options_table(&options));
            }
            Ok(())
        }

        Commands::Interactive { file } => crate::ui::launch_session(file, &config, cli.json),
    }
}

fn write_workbook(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, bytes)
        .map_err(TipsError::Io)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Print a failed command and choose the exit code.
///
/// An empty filter result is a warning and still exits successfully.
pub fn report_failure(err: &anyhow::Error, json: bool) -> ExitCode {
    match TipsError::classify(err) {
        FailureKind::Warning => {
            if json {
                println!("{}", serde_json::json!({ "warning": err.to_string() }));
            } else {
                print!("{}", format_empty_result(&err.to_string()));
            }
            ExitCode::SUCCESS
        }
        FailureKind::Error => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

/// State of an interactive session on one tips file
pub struct Session {
    file: PathBuf,
    bytes: Vec<u8>,
    options: TipOptions,
    defaults: FilterParams,
    params: FilterParams,
    default_hints: ColorHints,
    hints: ColorHints,
    pipeline: Pipeline,
    output_name: String,
}

impl Session {
    pub fn open(file: &Path, config: &Config) -> Result<Self> {
        let bytes = read_source(file)?;
        let sheet = parse_tips_workbook(&bytes)?;
        let options = TipOptions::discover(&sheet);
        let defaults = FilterParams::defaults_for(&options, today());
        let hints = config.color_hints()?;

        info!("Session opened on {} ({} tips)", file.display(), sheet.rows.len());

        Ok(Self {
            file: file.to_path_buf(),
            bytes,
            options,
            params: defaults.clone(),
            defaults,
            default_hints: hints,
            hints,
            pipeline: Pipeline::new(ReportCache::new(config.cache.capacity)?),
            output_name: config.output.file_name.clone(),
        })
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn options(&self) -> &TipOptions {
        &self.options
    }

    /// Apply a parameter change only if the result is valid
    fn update_params(&mut self, change: impl FnOnce(&mut FilterParams)) -> Result<()> {
        let mut params = self.params.clone();
        change(&mut params);
        params.validate()?;
        self.params = params;
        Ok(())
    }
}

/// Run one session command against the session state
pub fn dispatch_session(session: &mut Session, command: SessionCommand, json: bool) -> Result<()> {
    match command {
        SessionCommand::Show => {
            print!("{}", format_params(&session.params, &session.hints));
            let cache = session.pipeline.cache();
            println!("  {:<12} {}/{}", "Cache:", cache.len(), cache.capacity());
        }
        SessionCommand::Tournament(selection) => {
            session.params.tournament = selection;
        }
        SessionCommand::Tip(selection) => {
            session.params.tip = selection;
        }
        SessionCommand::Winrate { min, max } => session.update_params(|p| {
            p.winrate_min = min;
            p.winrate_max = max;
        })?,
        SessionCommand::Dates { from, to } => session.update_params(|p| {
            p.date_start = from;
            p.date_end = to;
        })?,
        SessionCommand::Colors { positive, negative } => {
            session.hints = ColorHints { positive, negative };
        }
        SessionCommand::Run => {
            let output = {
                let _spinner = Spinner::start(SPINNER_MESSAGE, !json);
                session
                    .pipeline
                    .run(&session.bytes, &session.params, &session.hints)?
            };
            if json {
                println!(
                    "{}",
                    format_summary_json(&output.summary, &session.params, &session.hints, None)
                );
            } else {
                print!("{}", format_summary_table(&output.summary));
            }
        }
        SessionCommand::Export { path } => {
            // Served from the cache when the parameters match the last run.
            let output = session
                .pipeline
                .run(&session.bytes, &session.params, &session.hints)?;
            let path = PathBuf::from(path.unwrap_or_else(|| session.output_name.clone()));
            write_workbook(&path, &output.workbook)?;
            print!("{}", format_workbook_written(&path, output.workbook.len()));
        }
        SessionCommand::Options => {
            if json {
                println!("{}", format_options_json(&session.options));
            } else {
                print!("{}", format_options_table(&session.options));
            }
        }
        SessionCommand::Reset => {
            session.params = session.defaults.clone();
            session.hints = session.default_hints;
            print!("{}", format_params(&session.params, &session.hints));
        }
        SessionCommand::Help => {
            render_session_help(std::io::stdout())?;
        }
        SessionCommand::Exit => {}
    }
    Ok(())
}
