use std::io::{self, BufRead};

use crate::config::Chunking;

/// Splits one input stream into chunks.
///
/// The reader only knows about line boundaries. Whether a line opens a new
/// chunk is decided by the `is_boundary` predicate handed in by the caller
/// (normally [`EntryParser::is_entry_start`](crate::EntryParser::is_entry_start)).
///
/// In [`Chunking::Grouped`] mode a chunk is one line plus every immediately
/// following line that is not a boundary, so a stack trace travels with its
/// header. The first chunk of a stream that opens with non-boundary lines
/// starts at the very first line. In [`Chunking::Line`] mode each line is a
/// chunk.
///
/// Line terminators (`\n`, `\r\n`) are stripped and invalid UTF-8 is
/// replaced lossily; newlines inside a chunk are kept.
pub struct SourceReader<R> {
    input: R,
    chunking: Chunking,
    is_boundary: fn(&str) -> bool,
    /// Boundary line read ahead while closing the previous chunk.
    pending: Option<String>,
    exhausted: bool,
    lines_read: u64,
}

impl<R: BufRead> SourceReader<R> {
    pub fn new(input: R, chunking: Chunking, is_boundary: fn(&str) -> bool) -> Self {
        Self {
            input,
            chunking,
            is_boundary,
            pending: None,
            exhausted: false,
            lines_read: 0,
        }
    }

    /// Next chunk, or `None` once the stream is exhausted.
    pub fn next_chunk(&mut self) -> io::Result<Option<String>> {
        let mut chunk = match self.pending.take() {
            Some(line) => line,
            None => match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            },
        };

        if self.chunking == Chunking::Line {
            return Ok(Some(chunk));
        }

        while let Some(line) = self.read_line()? {
            if (self.is_boundary)(&line) {
                self.pending = Some(line);
                break;
            }
            chunk.push('\n');
            chunk.push_str(&line);
        }
        Ok(Some(chunk))
    }

    /// Number of physical lines consumed so far, including a read-ahead line.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            self.exhausted = true;
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        self.lines_read += 1;
        Ok(Some(match String::from_utf8(buf) {
            Ok(line) => line,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }))
    }
}

impl<R> std::fmt::Debug for SourceReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceReader")
            .field("chunking", &self.chunking)
            .field("lines_read", &self.lines_read)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn starts_with_bracket(line: &str) -> bool {
        line.starts_with('[')
    }

    fn chunks(text: &[u8], chunking: Chunking) -> Vec<String> {
        let mut reader = SourceReader::new(Cursor::new(text.to_vec()), chunking, starts_with_bracket);
        let mut out = Vec::new();
        while let Some(chunk) = reader.next_chunk().unwrap() {
            out.push(chunk);
        }
        // Exhaustion is sticky.
        assert!(reader.next_chunk().unwrap().is_none());
        out
    }

    #[test]
    fn grouped_joins_continuations() {
        let text = b"[a] one\n  trace 1\n  trace 2\n[b] two\n[c] three\n";
        assert_eq!(
            chunks(text, Chunking::Grouped),
            vec!["[a] one\n  trace 1\n  trace 2", "[b] two", "[c] three"]
        );
    }

    #[test]
    fn grouped_leading_text_forms_first_chunk() {
        let text = b"orphan 1\norphan 2\n[a] one\n";
        assert_eq!(
            chunks(text, Chunking::Grouped),
            vec!["orphan 1\norphan 2", "[a] one"]
        );
    }

    #[test]
    fn line_mode_splits_every_line() {
        let text = b"[a] one\n  trace\n[b] two";
        assert_eq!(
            chunks(text, Chunking::Line),
            vec!["[a] one", "  trace", "[b] two"]
        );
    }

    #[test]
    fn strips_crlf_and_handles_missing_final_newline() {
        let text = b"[a] one\r\n  more\r\n[b] two";
        assert_eq!(
            chunks(text, Chunking::Grouped),
            vec!["[a] one\n  more", "[b] two"]
        );
    }

    #[test]
    fn blank_lines_are_continuations() {
        let text = b"[a] one\n\n[b] two\n";
        assert_eq!(chunks(text, Chunking::Grouped), vec!["[a] one\n", "[b] two"]);
    }

    #[test]
    fn empty_input_has_no_chunks() {
        assert!(chunks(b"", Chunking::Grouped).is_empty());
        assert!(chunks(b"", Chunking::Line).is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let out = chunks(b"[a] caf\xff\n", Chunking::Grouped);
        assert_eq!(out, vec!["[a] caf\u{FFFD}"]);
    }

    #[test]
    fn counts_lines() {
        let mut reader = SourceReader::new(
            Cursor::new(b"[a]\nx\n[b]\n".to_vec()),
            Chunking::Grouped,
            starts_with_bracket,
        );
        reader.next_chunk().unwrap();
        // "[b]" was read ahead to close the first chunk.
        assert_eq!(reader.lines_read(), 3);
    }
}
