use std::io::Write;

use colored::Colorize;
use mergelog_core::{EntrySink, MergeError};
use mergelog_types::LogEntry;
use serde::Serialize;

use crate::palette::Palette;

/// Writes each body line as `<pad>[<alias>] <line>`, with the bracketed
/// aliases right-aligned to the longest one.
pub struct TextRenderer<W: Write> {
    out: W,
    palette: Palette,
    alias_width: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, palette: Palette, alias_width: usize) -> Self {
        Self {
            out,
            palette,
            alias_width,
        }
    }

    pub fn finish(mut self) -> std::io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> EntrySink for TextRenderer<W> {
    fn emit(&mut self, entry: LogEntry) -> Result<(), MergeError> {
        let tag = format!("[{}]", entry.source_alias);
        let width = self.alias_width + 2;
        let color = self.palette.color(entry.display_token);
        for line in entry.lines() {
            let text = format!("{tag:>width$} {line}");
            match color {
                Some(color) => writeln!(self.out, "{}", text.color(color))?,
                None => writeln!(self.out, "{text}")?,
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    source: &'a str,
    timestamp: i64,
    stamp: String,
    lines: Vec<&'a str>,
}

/// Writes one JSON object per entry.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn finish(mut self) -> std::io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> EntrySink for JsonRenderer<W> {
    fn emit(&mut self, entry: LogEntry) -> Result<(), MergeError> {
        let line = JsonLine {
            source: &entry.source_alias,
            timestamp: entry.timestamp.as_nanos(),
            stamp: entry.timestamp.to_string(),
            lines: entry.lines().collect(),
        };
        serde_json::to_writer(&mut self.out, &line).map_err(|e| MergeError::Sink(e.to_string()))?;
        writeln!(self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ColorScheme;
    use crate::sources::{alias_width, SourceArg};
    use mergelog_types::{DisplayToken, Stamp};

    fn entry(alias: &str, body: &str) -> LogEntry {
        LogEntry::new(alias, Stamp::from_nanos(1_000_000), body, DisplayToken(0))
    }

    #[test]
    fn text_pads_aliases_to_common_width() {
        let mut r = TextRenderer::new(Vec::new(), Palette::for_scheme(ColorScheme::Off), 5);
        r.emit(entry("db", "first\n  trace")).unwrap();
        r.emit(entry("proxy", "second")).unwrap();
        let out = String::from_utf8(r.finish().unwrap()).unwrap();
        assert_eq!(out, "   [db] first\n   [db]   trace\n[proxy] second\n");
    }

    #[test]
    fn non_ascii_aliases_line_up() {
        let args = [SourceArg::parse("caf\u{e9}:a.log"), SourceArg::parse("db:b.log")];
        let mut r = TextRenderer::new(
            Vec::new(),
            Palette::for_scheme(ColorScheme::Off),
            alias_width(&args),
        );
        r.emit(entry("caf\u{e9}", "x")).unwrap();
        r.emit(entry("db", "y")).unwrap();
        let out = String::from_utf8(r.finish().unwrap()).unwrap();
        assert_eq!(out, "[caf\u{e9}] x\n  [db] y\n");
    }

    #[test]
    fn json_lines() {
        let mut r = JsonRenderer::new(Vec::new());
        r.emit(entry("db", "a\nb")).unwrap();
        let out = String::from_utf8(r.finish().unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["source"], "db");
        assert_eq!(value["timestamp"], 1_000_000);
        assert_eq!(value["stamp"], "1970/01/01 00:00:00.001 UTC");
        assert_eq!(value["lines"], serde_json::json!(["a", "b"]));
    }
}
