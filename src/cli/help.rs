use colored::Colorize;
use std::io::{self, Write};

/// Help text for the interactive session
pub fn render_session_help<W: Write>(mut out: W) -> io::Result<()> {
    writeln!(out, "{}", "TipManager - Interactive Mode".bold())?;
    writeln!(out)?;

    writeln!(out, "{}", "Filters:".bold())?;
    writeln!(out, "  {:28} - Filter by tournament", "tournament <name|Todos>")?;
    writeln!(out, "  {:28} - Filter by tip (case-insensitive)", "tip <name|Todos>")?;
    writeln!(out, "  {:28} - Winrate 1 range, fractions in [0, 1]", "winrate <min> <max>")?;
    writeln!(out, "  {:28} - Settlement date range (YYYY-MM-DD)", "dates <from> <to>")?;
    writeln!(
        out,
        "  {:28} - Positive/negative fill colours, '-' for default",
        "colors <#RRGGBB|-> <#RRGGBB|->"
    )?;
    writeln!(out, "  {:28} - Restore default filters", "reset")?;

    writeln!(out)?;
    writeln!(out, "{}", "Results:".bold())?;
    writeln!(out, "  {:28} - Show current filters", "show")?;
    writeln!(out, "  {:28} - List tournaments and tips in the file", "options")?;
    writeln!(out, "  {:28} - Run the analysis and show the summary", "run")?;
    writeln!(out, "  {:28} - Save the workbook of the last run", "export [path]")?;

    writeln!(out)?;
    writeln!(out, "  {:28} - Show this help", "help")?;
    writeln!(out, "  {:28} - Leave the session", "exit")?;

    Ok(())
}
