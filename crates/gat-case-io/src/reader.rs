//! Legacy text line reader and block writer.
//!
//! A block is a run of record lines ended by a terminator line: `0` after
//! comment stripping (usually `0 / END OF <NAME> DATA`), or `Q`, which also
//! ends the whole document. Field-name hint lines (`@!...`), blank lines and
//! standalone `BEGIN <NAME> DATA` markers never reach the record stream.

use std::io::{BufRead, Write};

use gat_case_core::CaseResult;
use tracing::trace;

use crate::tokenizer::{
    detect_dialect, field_hint_names, normalize_whitespace, strip_comment, Dialect,
    FIELD_HINT_MARKER,
};

/// Raw records of one block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    /// Comment-stripped, whitespace-normalized record lines, quotes preserved.
    pub records: Vec<String>,
    /// Dialect detected from the first record line.
    pub dialect: Dialect,
    /// Field names of each `@!` hint line the block carried, in order.
    /// Multi-line records carry one hint per line.
    pub field_hints: Vec<Vec<String>>,
    /// False when the input ended before a terminator was found.
    pub terminated: bool,
}

enum LineKind {
    Blank,
    Hint(Vec<String>),
    BeginMarker,
    EndOfBlock,
    EndOfDocument,
    Record(String),
}

fn classify(line: &str) -> LineKind {
    if let Some(rest) = line.trim_start().strip_prefix(FIELD_HINT_MARKER) {
        return LineKind::Hint(field_hint_names(rest));
    }
    let record = normalize_whitespace(strip_comment(line));
    if record.is_empty() {
        LineKind::Blank
    } else if record == "0" {
        LineKind::EndOfBlock
    } else if record.eq_ignore_ascii_case("Q") {
        LineKind::EndOfDocument
    } else if is_begin_marker(&record) {
        LineKind::BeginMarker
    } else {
        LineKind::Record(record)
    }
}

fn is_begin_marker(record: &str) -> bool {
    let upper = record.to_ascii_uppercase();
    upper.starts_with("BEGIN ") && upper.ends_with(" DATA")
}

/// Reads blocks of record lines from a buffered source.
pub struct LegacyTextReader<B> {
    inner: B,
    line_number: usize,
    q_found: bool,
    eof: bool,
}

impl<B: BufRead> LegacyTextReader<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            line_number: 0,
            q_found: false,
            eof: false,
        }
    }

    /// Number of physical lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Whether the end-of-document `Q` line has been consumed.
    pub fn is_q_found(&self) -> bool {
        self.q_found
    }

    /// Whether the underlying input is exhausted.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Whether no further block can be read.
    pub fn is_finished(&self) -> bool {
        self.q_found || self.eof
    }

    /// Next physical line without its line ending, `None` at end of input.
    pub fn read_raw_line(&mut self) -> CaseResult<Option<String>> {
        if self.eof {
            return Ok(None);
        }
        let mut buf = String::new();
        if self.inner.read_line(&mut buf)? == 0 {
            self.eof = true;
            return Ok(None);
        }
        self.line_number += 1;
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }

    /// Next record line, skipping blank lines, hints and begin markers.
    ///
    /// Returns `None` on a terminator or at end of input. Used for head
    /// records, which carry no terminator of their own.
    pub fn read_record_line(&mut self) -> CaseResult<Option<String>> {
        if self.q_found {
            return Ok(None);
        }
        while let Some(line) = self.read_raw_line()? {
            match classify(&line) {
                LineKind::Record(record) => return Ok(Some(record)),
                LineKind::EndOfDocument => {
                    self.q_found = true;
                    return Ok(None);
                }
                LineKind::EndOfBlock => return Ok(None),
                LineKind::Blank | LineKind::Hint(_) | LineKind::BeginMarker => {}
            }
        }
        Ok(None)
    }

    /// Read the records of the current block, consuming its terminator.
    ///
    /// After `Q` every call returns an empty, terminated block without
    /// touching the input.
    pub fn read_records(&mut self) -> CaseResult<Block> {
        let mut block = Block::default();
        if self.q_found {
            block.terminated = true;
            return Ok(block);
        }
        while let Some(line) = self.read_raw_line()? {
            match classify(&line) {
                LineKind::Blank => {}
                LineKind::Hint(names) => {
                    trace!(line = self.line_number, "field name hint");
                    block.field_hints.push(names);
                }
                LineKind::BeginMarker => {
                    trace!(line = self.line_number, "begin marker skipped");
                }
                LineKind::EndOfBlock => {
                    trace!(line = self.line_number, "end of block");
                    block.terminated = true;
                    break;
                }
                LineKind::EndOfDocument => {
                    trace!(line = self.line_number, "end of document");
                    self.q_found = true;
                    block.terminated = true;
                    break;
                }
                LineKind::Record(record) => {
                    if block.records.is_empty() {
                        block.dialect = detect_dialect(&record);
                    }
                    block.records.push(record);
                }
            }
        }
        Ok(block)
    }

    /// Consume a block without binding it. Returns the number of records skipped.
    pub fn skip_block(&mut self) -> CaseResult<usize> {
        Ok(self.read_records()?.records.len())
    }

    /// Read a block as text for passthrough, consuming its terminator.
    ///
    /// Hint lines are kept as written. When `nested` is non-zero every
    /// top-level record opens that many sub-blocks, each closed by its own
    /// `0` line, and those end lines are kept too.
    pub fn read_raw_block(&mut self, nested: usize) -> CaseResult<RawLines> {
        let mut raw = RawLines::default();
        if self.q_found {
            raw.terminated = true;
            return Ok(raw);
        }
        let mut open = 0;
        while let Some(line) = self.read_raw_line()? {
            match classify(&line) {
                LineKind::Blank | LineKind::BeginMarker => {}
                LineKind::Hint(_) => raw.lines.push(line.trim().to_string()),
                LineKind::EndOfBlock if open > 0 => {
                    open -= 1;
                    raw.lines.push(line.trim().to_string());
                }
                LineKind::EndOfBlock => {
                    raw.terminated = true;
                    break;
                }
                LineKind::EndOfDocument => {
                    self.q_found = true;
                    raw.terminated = open == 0;
                    break;
                }
                LineKind::Record(record) => {
                    if open == 0 {
                        open = nested;
                        raw.records += 1;
                    }
                    raw.lines.push(record);
                }
            }
        }
        Ok(raw)
    }
}

/// Lines of a block read for passthrough.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawLines {
    pub lines: Vec<String>,
    /// Top-level records; nested sub-block lines are not counted.
    pub records: usize,
    pub terminated: bool,
}

/// Writes blocks of record lines.
///
/// The end line of a block is held back so the next block's start can be
/// merged into it (`0 / END OF BUS DATA, BEGIN LOAD DATA`).
pub struct LegacyTextWriter<W: Write> {
    inner: W,
    write_begin_markers: bool,
    pending_end: Option<String>,
}

impl<W: Write> LegacyTextWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            write_begin_markers: false,
            pending_end: None,
        }
    }

    /// Write a standalone `BEGIN <NAME> DATA` line for blocks that do not
    /// follow an end line.
    pub fn with_begin_markers(mut self, enabled: bool) -> Self {
        self.write_begin_markers = enabled;
        self
    }

    pub fn begin_block(&mut self, name: &str) -> CaseResult<()> {
        match self.pending_end.take() {
            Some(end) => writeln!(self.inner, "{}, BEGIN {} DATA", end, name)?,
            None if self.write_begin_markers => writeln!(self.inner, "BEGIN {} DATA", name)?,
            None => {}
        }
        Ok(())
    }

    pub fn write_line(&mut self, line: &str) -> CaseResult<()> {
        self.flush_pending()?;
        writeln!(self.inner, "{}", line)?;
        Ok(())
    }

    /// Close a block; `None` writes a bare `0`.
    pub fn end_block(&mut self, name: Option<&str>) -> CaseResult<()> {
        self.flush_pending()?;
        self.pending_end = Some(match name {
            Some(name) => format!("0 / END OF {} DATA", name),
            None => "0".to_string(),
        });
        Ok(())
    }

    /// Write any pending end line and flush the underlying writer.
    pub fn flush(&mut self) -> CaseResult<()> {
        self.flush_pending()?;
        self.inner.flush()?;
        Ok(())
    }

    /// Close the document with `Q` and flush.
    pub fn finish(&mut self) -> CaseResult<()> {
        self.flush_pending()?;
        writeln!(self.inner, "Q")?;
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn flush_pending(&mut self) -> CaseResult<()> {
        if let Some(end) = self.pending_end.take() {
            writeln!(self.inner, "{}", end)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Delimiter;
    use std::io::Cursor;

    fn reader(text: &str) -> LegacyTextReader<Cursor<Vec<u8>>> {
        LegacyTextReader::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn block_stops_at_terminator_and_leaves_next_block() {
        let mut r = reader(
            "1,'A',138.0\n\n2,'B',138.0\n3,'C',69.0\n0 / END OF BUS DATA, BEGIN LOAD DATA\n1,'1',1\n0 / END OF LOAD DATA\nQ\n",
        );
        let buses = r.read_records().unwrap();
        assert_eq!(buses.records.len(), 3);
        assert!(buses.terminated);
        assert_eq!(buses.dialect.delimiter, Delimiter::Comma);

        let loads = r.read_records().unwrap();
        assert_eq!(loads.records, vec!["1,'1',1"]);

        let rest = r.read_records().unwrap();
        assert!(rest.records.is_empty());
        assert!(r.is_q_found());
        assert!(r.read_records().unwrap().terminated);
    }

    #[test]
    fn hint_lines_and_begin_markers_are_not_records() {
        let mut r = reader("BEGIN ZONE DATA\n@! I, 'ZONAME'\n1 'ZONE1'\n0\n");
        let block = r.read_records().unwrap();
        assert_eq!(block.records, vec!["1 'ZONE1'"]);
        assert_eq!(block.field_hints, vec![vec!["i".to_string(), "zoname".to_string()]]);
        assert_eq!(block.dialect.delimiter, Delimiter::Whitespace);
    }

    #[test]
    fn padded_quoted_hint_names_are_trimmed() {
        let mut r = reader("@!IBUS,'NAME        ', BASKV, IDE\n1,'BUS1        ', 138.0, 3\n0\n");
        let block = r.read_records().unwrap();
        assert_eq!(block.field_hints, vec![vec!["ibus", "name", "baskv", "ide"]]);
    }

    #[test]
    fn every_hint_line_of_a_block_is_kept() {
        let mut r = reader("@!I,J,K\n@!R1-2,X1-2\n1,2,0\n0.0,0.1\n0\n");
        let block = r.read_records().unwrap();
        assert_eq!(block.field_hints.len(), 2);
        assert_eq!(block.field_hints[1], vec!["r1-2", "x1-2"]);
    }

    #[test]
    fn raw_block_keeps_nested_sub_blocks() {
        let mut r = reader(concat!(
            "@! IS, 'NAME'\n",
            "1, 'SUB A'\n",
            "@! NI, 'NAME'\n",
            "1, 'NODE 1'\n",
            "0 / END OF SUBSTATION NODE DATA, BEGIN SUBSTATION SWITCHING DEVICE DATA\n",
            "0 / END OF SUBSTATION SWITCHING DEVICE DATA, BEGIN SUBSTATION EQUIPMENT TERMINAL DATA\n",
            "0 / END OF SUBSTATION EQUIPMENT TERMINAL DATA\n",
            "0 / END OF SUBSTATION DATA\n",
            "Q\n",
        ));
        let raw = r.read_raw_block(3).unwrap();
        assert!(raw.terminated);
        assert_eq!(raw.records, 1);
        assert_eq!(raw.lines.len(), 7);
        assert_eq!(raw.lines[0], "@! IS, 'NAME'");
        assert_eq!(raw.lines[6], "0 / END OF SUBSTATION EQUIPMENT TERMINAL DATA");
        assert!(!r.is_q_found());
        assert!(r.read_raw_block(0).unwrap().lines.is_empty());
        assert!(r.is_q_found());
    }

    #[test]
    fn missing_terminator_is_flagged() {
        let mut r = reader("1, 2\n3, 4\n");
        let block = r.read_records().unwrap();
        assert_eq!(block.records.len(), 2);
        assert!(!block.terminated);
        assert!(r.is_eof());
    }

    #[test]
    fn skip_block_consumes_through_terminator() {
        let mut r = reader("GENERAL, THRSHZ=0.0001\n0 / END OF SYSTEM-WIDE DATA\n1,2\n0\n");
        assert_eq!(r.skip_block().unwrap(), 1);
        assert_eq!(r.read_records().unwrap().records, vec!["1,2"]);
        assert_eq!(r.line_number(), 4);
    }

    #[test]
    fn raw_lines_keep_their_text() {
        let mut r = reader("0, 100.0 / head\r\n  TITLE / ONE  \n");
        assert_eq!(r.read_record_line().unwrap().as_deref(), Some("0, 100.0"));
        assert_eq!(r.read_raw_line().unwrap().as_deref(), Some("  TITLE / ONE  "));
        assert_eq!(r.read_raw_line().unwrap(), None);
    }

    #[test]
    fn writer_merges_end_and_begin_lines() {
        let mut w = LegacyTextWriter::new(Vec::new());
        w.begin_block("BUS").unwrap();
        w.write_line("1, 'A'").unwrap();
        w.end_block(Some("BUS")).unwrap();
        w.begin_block("LOAD").unwrap();
        w.end_block(Some("LOAD")).unwrap();
        w.finish().unwrap();
        let text = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(
            text,
            "1, 'A'\n0 / END OF BUS DATA, BEGIN LOAD DATA\n0 / END OF LOAD DATA\nQ\n"
        );
    }

    #[test]
    fn writer_emits_standalone_begin_when_enabled() {
        let mut w = LegacyTextWriter::new(Vec::new()).with_begin_markers(true);
        w.begin_block("ZONE").unwrap();
        w.write_line("1 'Z'").unwrap();
        w.end_block(None).unwrap();
        w.flush().unwrap();
        let text = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(text, "BEGIN ZONE DATA\n1 'Z'\n0\n");
    }
}
