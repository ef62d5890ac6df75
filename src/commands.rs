//! Interactive session command grammar
//!
//! A small hand-written parser for the lines typed at the `tipmanager>`
//! prompt. A leading slash is accepted (`/run` and `run` are the same) and
//! command keywords are case-insensitive; arguments keep their case.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use tipmanager::filters::Selection;
use tipmanager::Rgb;

/// Parsed command from the session prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Print the current parameters: `show`
    Show,
    /// `tournament <name|Todos>`
    Tournament(Selection),
    /// `tip <name|Todos>`
    Tip(Selection),
    /// `winrate <min> <max>`
    Winrate { min: Decimal, max: Decimal },
    /// `dates <from> <to>`
    Dates { from: NaiveDate, to: NaiveDate },
    /// `colors <pos|-> <neg|->`, `-` restores the default fill
    Colors {
        positive: Option<Rgb>,
        negative: Option<Rgb>,
    },
    /// Run the pipeline and print the summary: `run`
    Run,
    /// Write the last workbook: `export [path]`
    Export { path: Option<String> },
    /// List tournaments and tips: `options`
    Options,
    /// Restore default parameters: `reset`
    Reset,
    Help,
    Exit,
}

/// Error type for command parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandParseError {
    pub message: String,
}

impl CommandParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandParseError {}

/// Parse YYYY-MM-DD or DD/MM/YYYY
pub fn parse_date(s: &str) -> Result<NaiveDate, CommandParseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .map_err(|_| CommandParseError::new(format!("Invalid date '{}'. Use YYYY-MM-DD", s)))
}

fn parse_fraction(s: &str) -> Result<Decimal, CommandParseError> {
    Decimal::from_str(s)
        .map_err(|_| CommandParseError::new(format!("Invalid win-rate '{}'. Use a number like 0.55", s)))
}

fn parse_color(s: &str) -> Result<Option<Rgb>, CommandParseError> {
    if s == "-" {
        return Ok(None);
    }
    s.parse::<Rgb>()
        .map(Some)
        .map_err(|e| CommandParseError::new(e.to_string()))
}

/// Parse a line typed at the session prompt
pub fn parse_command(input: &str) -> Result<SessionCommand, CommandParseError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(CommandParseError::new("Empty command. Type `help` for commands."));
    }

    let input = input.strip_prefix('/').unwrap_or(input);
    let (cmd, rest) = match input.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (input, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    match cmd.to_lowercase().as_str() {
        "show" => Ok(SessionCommand::Show),
        // Names may contain spaces ("Liga Pro"), so take the whole remainder.
        "tournament" | "torneio" => {
            if rest.is_empty() {
                return Err(CommandParseError::new(
                    "tournament requires a name. Usage: tournament <name|Todos>",
                ));
            }
            Ok(SessionCommand::Tournament(Selection::parse(rest)))
        }
        "tip" => {
            if rest.is_empty() {
                return Err(CommandParseError::new("tip requires a value. Usage: tip <name|Todos>"));
            }
            Ok(SessionCommand::Tip(Selection::parse(rest)))
        }
        "winrate" => match args.as_slice() {
            [min, max] => Ok(SessionCommand::Winrate {
                min: parse_fraction(min)?,
                max: parse_fraction(max)?,
            }),
            _ => Err(CommandParseError::new("Usage: winrate <min> <max>")),
        },
        "dates" => match args.as_slice() {
            [from, to] => Ok(SessionCommand::Dates {
                from: parse_date(from)?,
                to: parse_date(to)?,
            }),
            _ => Err(CommandParseError::new("Usage: dates <from> <to>")),
        },
        "colors" | "colours" => match args.as_slice() {
            [positive, negative] => Ok(SessionCommand::Colors {
                positive: parse_color(positive)?,
                negative: parse_color(negative)?,
            }),
            _ => Err(CommandParseError::new("Usage: colors <#RRGGBB|-> <#RRGGBB|->")),
        },
        "run" => Ok(SessionCommand::Run),
        "export" => Ok(SessionCommand::Export {
            path: (!rest.is_empty()).then(|| rest.to_string()),
        }),
        "options" => Ok(SessionCommand::Options),
        "reset" => Ok(SessionCommand::Reset),
        "help" | "h" | "?" => Ok(SessionCommand::Help),
        "exit" | "quit" | "q" => Ok(SessionCommand::Exit),
        _ => Err(CommandParseError::new(format!(
            "Unknown command: {}. Type `help` for commands.",
            cmd
        ))),
    }
}
