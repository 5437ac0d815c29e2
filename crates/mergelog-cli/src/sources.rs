use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use mergelog_core::{RangeFilter, SourceSpec};
use mergelog_types::{Stamp, STAMP_LAYOUT};
use tracing::debug;

use crate::palette::Palette;

/// A positional `[alias:]path` argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceArg {
    pub alias: String,
    pub path: PathBuf,
}

impl SourceArg {
    /// Split `alias:path`. Without an alias (or with an empty one) the last
    /// `/` component of the path is used.
    pub fn parse(arg: &str) -> Self {
        let (alias, path) = match arg.split_once(':') {
            Some((alias, path)) if !alias.is_empty() => (alias.to_string(), path),
            Some((_, path)) => (file_name(path), path),
            None => (file_name(arg), arg),
        };
        Self {
            alias,
            path: PathBuf::from(path),
        }
    }
}

fn file_name(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

/// Build the time window shared by all sources.
///
/// With `--stop`, the window is `[stop - duration, stop]`; a duration longer
/// than the stop's distance from the epoch is clamped so the window starts
/// no earlier than the epoch. Without `--stop`, a duration counts back from
/// `now` and the window is open-ended.
pub fn resolve_range(
    duration: Option<u64>,
    stop: Option<&str>,
    now: Stamp,
) -> anyhow::Result<RangeFilter> {
    let Some(stop) = stop else {
        return Ok(match duration {
            Some(secs) => RangeFilter::new(now.saturating_sub(Duration::from_secs(secs)), Stamp::MAX),
            None => RangeFilter::unbounded(),
        });
    };

    let stop_stamp = Stamp::parse(stop)
        .with_context(|| format!("unable to parse '{stop}' as timestamp ({STAMP_LAYOUT})"))?;
    Ok(match duration {
        Some(secs) => {
            let max_secs = u64::try_from(stop_stamp.epoch_seconds()).unwrap_or(0);
            RangeFilter::window(stop_stamp, Duration::from_secs(secs.min(max_secs)))
        }
        None => RangeFilter::new(Stamp::MIN, stop_stamp),
    })
}

/// Open every source file. Any unopenable file aborts the run.
pub fn open_sources(
    args: &[SourceArg],
    range: RangeFilter,
    palette: &Palette,
) -> anyhow::Result<Vec<SourceSpec>> {
    args.iter()
        .enumerate()
        .map(|(index, arg)| -> anyhow::Result<SourceSpec> {
            let file = File::open(&arg.path)
                .with_context(|| format!("error opening file {}", arg.path.display()))?;
            debug!(alias = %arg.alias, path = %arg.path.display(), "opened source");
            Ok(SourceSpec::new(arg.alias.clone(), BufReader::new(file))
                .with_range(range)
                .with_display_token(palette.token(index)))
        })
        .collect()
}

/// Width in characters of the longest alias, used to align rendered output.
pub fn alias_width(args: &[SourceArg]) -> usize {
    args.iter().map(|arg| arg.alias.chars().count()).max().unwrap_or(0)
}
