//! ARFF (Attribute-Relation File Format) serializer.
//!
//! The ARFF file is the cached, self-describing form of a [`Dataset`]:
//!
//! ```text
//! @relation 'SMS spam'
//!
//! @attribute label {spam,ham}
//! @attribute text string
//!
//! @data
//! spam,'you won the lottery'
//! ham,'see you at lunch'
//! ```
//!
//! Round-trip law: `load_arff(save_arff(d)) == d` for every dataset `d`.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use log::{debug, info, warn};

use crate::dataset::dataset::Dataset;
use crate::dataset::document::{Document, Label};
use crate::dataset::raw::load_raw;
use crate::dataset::schema::{Attribute, AttributeKind, Schema};
use crate::error::{ErrorKind, Result, SmsBayesError};
use crate::storage::atomic::write_atomic_with;

/// Save a dataset as an ARFF file, creating parent directories as needed.
///
/// The file is replaced atomically, so an interrupted save never leaves a
/// truncated cache behind.
pub fn save_arff<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let path = path.as_ref();
    write_atomic_with(path, |writer| write_arff(dataset, writer))?;

    info!(
        "Saved ARFF dataset {}: {} documents",
        path.display(),
        dataset.len()
    );
    Ok(())
}

/// Load a dataset from an ARFF file.
///
/// A missing file is an I/O error; a malformed file or a header that does
/// not match [`Schema::sms`] is a format error.
pub fn load_arff<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let dataset = parse_arff(BufReader::new(file))?;

    info!(
        "Loaded ARFF dataset {}: {} documents",
        path.display(),
        dataset.len()
    );
    Ok(dataset)
}

/// Load the ARFF cache if usable, otherwise the raw corpus (refreshing the cache).
///
/// A cache that fails to parse is logged and replaced. Failure to write the
/// cache is logged but does not fail the load.
pub fn load_cached_or_raw<P: AsRef<Path>, Q: AsRef<Path>>(
    raw_path: P,
    arff_path: Q,
) -> Result<Dataset> {
    let arff_path = arff_path.as_ref();

    if arff_path.exists() {
        match load_arff(arff_path) {
            Ok(dataset) => return Ok(dataset),
            Err(e) if e.kind() == ErrorKind::Format => {
                warn!(
                    "Ignoring unreadable ARFF cache {}: {e}",
                    arff_path.display()
                );
            }
            Err(e) => return Err(e),
        }
    }

    let dataset = load_raw(raw_path)?;
    if let Err(e) = save_arff(&dataset, arff_path) {
        warn!("Problem writing ARFF cache {}: {e}", arff_path.display());
    }
    Ok(dataset)
}

/// Write a dataset in ARFF syntax.
pub fn write_arff<W: Write>(dataset: &Dataset, writer: &mut W) -> Result<()> {
    writeln!(writer, "@relation {}", quote_if_needed(dataset.relation()))?;
    writeln!(writer)?;

    for attribute in dataset.schema().attributes() {
        let kind = match &attribute.kind {
            AttributeKind::Nominal(values) => {
                let values: Vec<String> = values.iter().map(|v| quote_if_needed(v)).collect();
                format!("{{{}}}", values.join(","))
            }
            AttributeKind::String => "string".to_string(),
        };
        writeln!(
            writer,
            "@attribute {} {}",
            quote_if_needed(&attribute.name),
            kind
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "@data")?;

    for document in dataset {
        writeln!(
            writer,
            "{},{}",
            quote_if_needed(document.label.as_str()),
            quote(&document.text)
        )?;
    }

    Ok(())
}

/// Parse ARFF content from a buffered reader.
pub fn parse_arff<R: BufRead>(reader: R) -> Result<Dataset> {
    let schema = Schema::sms();
    let mut relation: Option<String> = None;
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut in_data = false;
    let mut documents = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_num = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }

        if in_data {
            documents.push(parse_row(trimmed, line_num)?);
            continue;
        }

        let mut scanner = Scanner::new(trimmed, line_num);
        let keyword = scanner.read_value()?.to_ascii_lowercase();
        match keyword.as_str() {
            "@relation" => {
                relation = Some(scanner.read_value()?);
                scanner.expect_end()?;
            }
            "@attribute" => {
                if relation.is_none() {
                    return Err(scanner.error("@attribute before @relation"));
                }
                attributes.push(scanner.read_attribute()?);
            }
            "@data" => {
                scanner.expect_end()?;
                if relation.is_none() {
                    return Err(scanner.error("@data before @relation"));
                }
                schema.check_declared(&attributes)?;
                in_data = true;
            }
            other => {
                return Err(scanner.error(format!("Unexpected header entry '{other}'")));
            }
        }
    }

    if !in_data {
        return Err(SmsBayesError::format("Missing @data section"));
    }

    let mut dataset = Dataset::with_relation(relation.unwrap_or_default());
    for document in documents {
        dataset.push(document);
    }
    debug!("Parsed ARFF relation '{}'", dataset.relation());
    Ok(dataset)
}

/// Parse one `label,text` data row.
fn parse_row(line: &str, line_num: usize) -> Result<Document> {
    if line.starts_with('{') {
        return Err(SmsBayesError::format(format!(
            "Line {line_num}: sparse rows are not supported"
        )));
    }

    let mut scanner = Scanner::new(line, line_num);
    let mut values = Vec::with_capacity(2);
    loop {
        let (value, quoted) = scanner.read_value_quoted()?;
        if !quoted && value == "?" {
            return Err(scanner.error("Missing values are not supported"));
        }
        values.push(value);

        scanner.skip_whitespace();
        match scanner.next_char() {
            None => break,
            Some(',') => continue,
            Some(c) => return Err(scanner.error(format!("Expected ',' but found '{c}'"))),
        }
    }

    let [label, text]: [String; 2] = values.try_into().map_err(|values: Vec<String>| {
        SmsBayesError::format(format!(
            "Line {line_num}: expected 2 values, found {}",
            values.len()
        ))
    })?;

    let label = label.parse::<Label>().map_err(|_| {
        SmsBayesError::format(format!("Line {line_num}: unknown label '{label}'"))
    })?;

    Ok(Document::new(label, text))
}

/// Quote a string value, escaping special characters.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '"' => quoted.push_str("\\\""),
            '%' => quoted.push_str("\\%"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Quote a name or nominal value only when it would not survive unquoted.
fn quote_if_needed(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value == "?"
        || value.chars().any(|c| {
            c.is_whitespace() || matches!(c, ',' | '\'' | '"' | '{' | '}' | '%' | '\\')
        });

    if needs_quotes {
        quote(value)
    } else {
        value.to_string()
    }
}

/// Cursor over one ARFF line.
struct Scanner<'a> {
    line: &'a str,
    pos: usize,
    line_num: usize,
}

impl<'a> Scanner<'a> {
    fn new(line: &'a str, line_num: usize) -> Self {
        Scanner {
            line,
            pos: 0,
            line_num,
        }
    }

    fn error<S: AsRef<str>>(&self, msg: S) -> SmsBayesError {
        SmsBayesError::format(format!("Line {}: {}", self.line_num, msg.as_ref()))
    }

    fn peek(&self) -> Option<char> {
        self.line[self.pos..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn expect_end(&mut self) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.error(format!(
                "Unexpected trailing content '{}'",
                &self.line[self.pos..]
            ))),
        }
    }

    fn read_value(&mut self) -> Result<String> {
        self.read_value_quoted().map(|(value, _)| value)
    }

    /// Read a quoted or bare value; the flag tells whether it was quoted.
    fn read_value_quoted(&mut self) -> Result<(String, bool)> {
        self.skip_whitespace();
        match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.pos += 1;
                self.read_quoted(quote).map(|value| (value, true))
            }
            Some(_) => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c.is_whitespace() || matches!(c, ',' | '{' | '}') {
                        break;
                    }
                    self.pos += c.len_utf8();
                }
                if start == self.pos {
                    return Err(self.error("Expected a value"));
                }
                Ok((self.line[start..self.pos].to_string(), false))
            }
            None => Err(self.error("Unexpected end of line")),
        }
    }

    fn read_quoted(&mut self, quote: char) -> Result<String> {
        let mut value = String::new();
        loop {
            match self.next_char() {
                None => return Err(self.error("Unterminated quoted value")),
                Some('\\') => match self.next_char() {
                    Some('n') => value.push('\n'),
                    Some('r') => value.push('\r'),
                    Some('t') => value.push('\t'),
                    Some(c) => value.push(c),
                    None => return Err(self.error("Dangling escape at end of line")),
                },
                Some(c) if c == quote => return Ok(value),
                Some(c) => value.push(c),
            }
        }
    }

    fn read_attribute(&mut self) -> Result<Attribute> {
        let name = self.read_value()?;
        self.skip_whitespace();

        let attribute = if self.peek() == Some('{') {
            self.pos += 1;
            let mut values = Vec::new();
            loop {
                self.skip_whitespace();
                if values.is_empty() && self.peek() == Some('}') {
                    self.pos += 1;
                    break;
                }
                values.push(self.read_value()?);
                self.skip_whitespace();
                match self.next_char() {
                    Some(',') => continue,
                    Some('}') => break,
                    _ => return Err(self.error("Malformed nominal value list")),
                }
            }
            Attribute::nominal(name, values)
        } else {
            let kind = self.read_value()?;
            if !kind.eq_ignore_ascii_case("string") {
                return Err(self.error(format!(
                    "Schema mismatch: unsupported type '{kind}' for attribute '{name}'"
                )));
            }
            Attribute::string(name)
        };

        self.expect_end()?;
        Ok(attribute)
    }
}
