use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use super::codec::codec_for_path;
use super::column::ColumnId;
use super::error::{Result, TableError};
use super::table::MetadataTable;

/// Settings for [`MetadataTable::read`]. The separator falls back to the
/// table's own separator when unset.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    separator: Option<char>,
    has_header: bool,
    comment_prefixes: Vec<char>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self {
            separator: None,
            has_header: true,
            comment_prefixes: vec!['#'],
        }
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_comment_prefixes(mut self, prefixes: impl IntoIterator<Item = char>) -> Self {
        self.comment_prefixes = prefixes.into_iter().collect();
        self
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }

    fn is_comment(&self, line: &str) -> bool {
        line.chars()
            .next()
            .is_some_and(|first| self.comment_prefixes.contains(&first))
    }
}

fn trim_terminators(line: &str) -> &str {
    line.trim_end_matches(|c: char| c == '\r' || c == '\n')
}

/// Reads one raw line into `buf` and decodes it. `None` at end of input.
fn next_line<'a, R: BufRead>(
    reader: &mut R,
    buf: &'a mut Vec<u8>,
    line: usize,
) -> Result<Option<&'a str>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    match std::str::from_utf8(buf) {
        Ok(text) => Ok(Some(text)),
        Err(e) => {
            let offset = e.valid_up_to();
            tracing::error!(target: "metatable", "line {} is not valid UTF-8 at byte {}", line, offset);
            Err(TableError::Encoding { line, offset })
        }
    }
}

impl MetadataTable {
    /// Replaces the table with the contents of `path`, gunzipping it when
    /// the name ends in `.gz`. The table is left empty on any failure.
    pub fn read(&mut self, path: impl AsRef<Path>, options: &ReadOptions) -> Result<()> {
        let path = path.as_ref();
        self.clear();

        if !path.is_file() {
            tracing::error!(target: "metatable", "no file found at '{}'", path.display());
            return Err(TableError::FileNotFound(path.to_path_buf()));
        }

        let codec = codec_for_path(path);
        let reader = codec.open(path)?;
        self.read_from(reader, options).map_err(|e| {
            tracing::error!(target: "metatable", "failed to read '{}': {}", path.display(), e);
            e
        })?;

        tracing::debug!(
            target: "metatable",
            "read {} rows, {} columns from '{}' ({})",
            self.rows,
            self.order.len(),
            path.display(),
            codec.name()
        );
        Ok(())
    }

    /// Replaces the table with the records of an already opened stream.
    pub fn read_from<R: BufRead>(&mut self, reader: R, options: &ReadOptions) -> Result<()> {
        self.clear();
        let result = self.parse_records(reader, options);
        if result.is_err() {
            self.clear();
        }
        result
    }

    fn parse_records<R: BufRead>(&mut self, mut reader: R, options: &ReadOptions) -> Result<()> {
        let separator = options.separator.unwrap_or(self.separator);
        let mut buf = Vec::new();

        if options.has_header {
            let Some(first) = next_line(&mut reader, &mut buf, 0)? else {
                return Ok(());
            };
            self.adopt_header(trim_terminators(first), separator)?;
        }

        let mut line_number = 0;
        loop {
            line_number += 1;
            let Some(line) = next_line(&mut reader, &mut buf, line_number)? else {
                break;
            };
            if options.is_comment(line) {
                continue;
            }
            let line = trim_terminators(line);
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(separator).collect();
            if options.has_header {
                self.append_named(&fields, line_number)?;
            } else {
                self.append_positional(&fields);
            }
            self.rows += 1;
        }

        if !options.has_header {
            self.finish_positional();
        }
        Ok(())
    }

    fn adopt_header(&mut self, line: &str, separator: char) -> Result<()> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for name in line.split(separator) {
            if !seen.insert(name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        if !duplicates.is_empty() {
            tracing::error!(target: "metatable", "duplicate column names in header: {:?}", duplicates);
            return Err(TableError::Schema(format!(
                "duplicate column names in header: {}",
                duplicates.join(", ")
            )));
        }

        for name in line.split(separator) {
            let id = ColumnId::from(name);
            self.columns.insert(id.clone(), Vec::new());
            self.order.push(id);
        }
        Ok(())
    }

    fn append_named(&mut self, fields: &[&str], line_number: usize) -> Result<()> {
        if fields.len() != self.order.len() {
            tracing::error!(
                target: "metatable",
                "line {} has {} fields, header has {}",
                line_number,
                fields.len(),
                self.order.len()
            );
            return Err(TableError::Format {
                line: line_number,
                expected: self.order.len(),
                found: fields.len(),
            });
        }
        for (id, field) in self.order.iter().zip(fields) {
            if let Some(column) = self.columns.get_mut(id) {
                column.push(field.to_string());
            }
        }
        Ok(())
    }

    // Columns first seen on a later row are backfilled so cells stay aligned
    // with their row.
    fn append_positional(&mut self, fields: &[&str]) {
        let rows = self.rows;
        for (index, field) in fields.iter().enumerate() {
            let column = self
                .columns
                .entry(ColumnId::Index(index))
                .or_insert_with(|| vec![String::new(); rows]);
            column.push(field.to_string());
        }
    }

    fn finish_positional(&mut self) {
        let rows = self.rows;
        for column in self.columns.values_mut() {
            column.resize(rows, String::new());
        }
        let mut order: Vec<ColumnId> = self.columns.keys().cloned().collect();
        order.sort();
        self.order = order;
    }
}
