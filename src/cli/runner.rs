use anyhow::Result;
use chrono::NaiveDate;

use tipmanager::config::Config;
use tipmanager::filters::{FilterParams, Selection};
use tipmanager::importers::TipOptions;
use tipmanager::{ColorHints, Rgb};

use crate::cli::FilterArgs;

/// Turn the report flags into pipeline parameters.
///
/// Flags that were not given fall back to the defaults discovered in the
/// loaded sheet: lowest win-rate to 1, earliest date to `today`.
pub fn to_filter_params(args: &FilterArgs, options: &TipOptions, today: NaiveDate) -> FilterParams {
    let defaults = FilterParams::defaults_for(options, today);
    FilterParams {
        tournament: Selection::parse(&args.tournament),
        tip: Selection::parse(&args.tip),
        winrate_min: args.winrate_min.unwrap_or(defaults.winrate_min),
        winrate_max: args.winrate_max.unwrap_or(defaults.winrate_max),
        date_start: args.from.unwrap_or(defaults.date_start),
        date_end: args.to.unwrap_or(defaults.date_end),
    }
}

/// Colour flags win over `[colors]` in the config file
pub fn to_color_hints(
    positive: Option<&str>,
    negative: Option<&str>,
    config: &Config,
) -> Result<ColorHints> {
    let configured = config.color_hints()?;
    let positive = match positive {
        Some(hex) => Some(hex.parse::<Rgb>()?),
        None => configured.positive,
    };
    let negative = match negative {
        Some(hex) => Some(hex.parse::<Rgb>()?),
        None => configured.negative,
    };
    Ok(ColorHints { positive, negative })
}
