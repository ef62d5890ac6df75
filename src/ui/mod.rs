//! Interactive session: readline prompt with history, completion and a
//! progress spinner around pipeline runs.

pub mod progress;
pub mod readline;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use std::path::Path;

use tipmanager::config::Config;
use tipmanager::importers::TipOptions;

use crate::commands::{parse_command, SessionCommand};
use crate::dispatcher::{dispatch_session, report_failure, Session};

const COMMANDS: &[&str] = &[
    "show",
    "tournament",
    "tip",
    "winrate",
    "dates",
    "colors",
    "run",
    "export",
    "options",
    "reset",
    "help",
    "exit",
];

/// Completion patterns: every command, plus tournament and tip values
fn completion_patterns(options: &TipOptions) -> Vec<Vec<String>> {
    let commands = COMMANDS.iter().map(|c| vec![c.to_string()]);
    let tournaments = options
        .tournaments
        .iter()
        .map(|t| vec!["tournament".to_string(), t.clone()]);
    let tips = options
        .tips
        .iter()
        .map(|t| vec!["tip".to_string(), t.clone()]);
    commands.chain(tournaments).chain(tips).collect()
}

/// Launch the interactive session on a tips file.
pub fn launch_session(file: &Path, config: &Config, json: bool) -> Result<()> {
    let mut session = Session::open(file, config)?;

    println!("{}", "TipManager - Interactive Mode".bold());
    println!(
        "{} tips file, {} tournaments. Type {} for help, {} to exit\n",
        session.file().display(),
        session.options().tournaments.len().saturating_sub(1),
        "help".cyan(),
        "exit".cyan()
    );

    let mut rl = readline::Readline::new(completion_patterns(session.options()), None)?;

    loop {
        match rl.readline("tipmanager> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Ok(SessionCommand::Exit) => {
                        println!("Até logo!");
                        break;
                    }
                    Ok(cmd) => {
                        if let Err(e) = dispatch_session(&mut session, cmd, json) {
                            report_failure(&e, json);
                        }
                    }
                    Err(e) => {
                        eprintln!("{} {}", "Parse error:".yellow().bold(), e.message);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                println!("Até logo!");
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".red().bold(), err);
                break;
            }
        }
    }

    Ok(())
}
