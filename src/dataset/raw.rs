//! Raw corpus loader.
//!
//! The raw corpus holds one message per line, `<label><ASCII whitespace>+<text>`:
//!
//! ```text
//! ham	Ok lar... Joking wif u oni...
//! spam	Free entry in 2 a wkly comp to win FA Cup final tkts
//! ```
//!
//! A line that does not split into a non-empty declared label and a
//! non-empty text is skipped with a warning. It never fails the load.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use log::{info, warn};
use regex::Regex;

use crate::dataset::dataset::Dataset;
use crate::dataset::document::{Document, Label};
use crate::error::Result;

static LABEL_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\s)+").expect("Label separator pattern should be valid"));

/// Outcome of parsing a raw corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawLoadReport {
    /// Lines turned into documents.
    pub loaded: usize,
    /// Lines skipped as malformed.
    pub skipped: usize,
}

/// Load a raw corpus file into a dataset.
///
/// Fails only if the file cannot be opened or read; no partial dataset is
/// ever returned.
pub fn load_raw<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let (dataset, report) = parse_raw(BufReader::new(file))?;

    info!(
        "Loaded raw dataset {}: {} documents, {} lines skipped",
        path.display(),
        report.loaded,
        report.skipped
    );

    Ok(dataset)
}

/// Parse raw corpus lines from any buffered reader.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD; the line is
/// still parsed.
pub fn parse_raw<R: BufRead>(mut reader: R) -> Result<(Dataset, RawLoadReport)> {
    let mut dataset = Dataset::new();
    let mut report = RawLoadReport::default();

    let mut buf = Vec::new();
    let mut line_num = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_num += 1;

        let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        let line = String::from_utf8_lossy(bytes);
        if matches!(line, Cow::Owned(_)) {
            warn!("Replaced invalid UTF-8 at line {line_num}");
        }

        match parse_line(&line) {
            Some(document) => {
                dataset.push(document);
                report.loaded += 1;
            }
            None => {
                warn!("Skipping invalid row at line {line_num}");
                report.skipped += 1;
            }
        }
    }

    Ok((dataset, report))
}

/// Split a line at the first whitespace run into label and text.
fn parse_line(line: &str) -> Option<Document> {
    let mut parts = LABEL_SEPARATOR.splitn(line, 2);
    let label = parts.next()?;
    let text = parts.next()?;

    if label.is_empty() || text.is_empty() {
        return None;
    }

    let label = label.parse::<Label>().ok()?;
    Some(Document::new(label, text))
}
