use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use super::codec::codec_for_level;
use super::column::ColumnId;
use super::error::{Result, TableError};
use super::table::MetadataTable;

pub const MAX_COMPRESSION_LEVEL: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Include,
    Exclude,
}

/// Selects rows by the value of a key column.
#[derive(Debug, Clone)]
pub struct RowFilter {
    key: ColumnId,
    values: HashSet<String>,
    mode: FilterMode,
}

impl RowFilter {
    pub fn new<I, S>(key: impl Into<ColumnId>, values: I, mode: FilterMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
            mode,
        }
    }

    /// Keeps only rows whose key is listed. An empty list keeps nothing.
    pub fn include<I, S>(key: impl Into<ColumnId>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(key, values, FilterMode::Include)
    }

    /// Drops rows whose key is listed. An empty list keeps everything.
    pub fn exclude<I, S>(key: impl Into<ColumnId>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(key, values, FilterMode::Exclude)
    }

    pub fn key(&self) -> &ColumnId {
        &self.key
    }

    fn keeps(&self, value: &str) -> bool {
        let listed = self.values.contains(value);
        match self.mode {
            FilterMode::Include => listed,
            FilterMode::Exclude => !listed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WriteOptions {
    separator: Option<char>,
    header: bool,
    compression_level: u32,
    filter: Option<RowFilter>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self {
            separator: None,
            header: true,
            compression_level: 0,
            filter: None,
        }
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// 0 writes plain text, 1-9 gzip.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    pub fn with_filter(mut self, filter: RowFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl MetadataTable {
    /// Writes the table to `path`, truncating any existing file.
    pub fn write(&self, path: impl AsRef<Path>, options: &WriteOptions) -> Result<()> {
        let path = path.as_ref();
        if options.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(TableError::Precondition(format!(
                "compression level {} is outside 0..={}",
                options.compression_level, MAX_COMPRESSION_LEVEL
            )));
        }
        self.check_filter(options)?;

        let codec = codec_for_level(options.compression_level);
        let mut writer = codec.create(path)?;
        let written = self.write_to(&mut writer, options);
        let finished = writer.finish();
        let written = written?;
        finished?;

        tracing::debug!(
            target: "metatable",
            "wrote {} of {} rows to '{}' ({})",
            written,
            self.rows,
            path.display(),
            codec.name()
        );
        Ok(())
    }

    /// Writes the records to an open stream and returns the number of data
    /// rows written. Comment lines are never produced.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W, options: &WriteOptions) -> Result<usize> {
        self.check_filter(options)?;
        let separator = options.separator.unwrap_or(self.separator).to_string();

        if options.header {
            let header: Vec<String> = self.order.iter().map(ToString::to_string).collect();
            writeln!(writer, "{}", header.join(separator.as_str()))?;
        }

        let key_values = match &options.filter {
            Some(filter) => Some((filter, self.values(filter.key())?)),
            None => None,
        };

        let columns: Vec<&[String]> = self
            .order
            .iter()
            .map(|id| self.columns.get(id).map_or(&[][..], Vec::as_slice))
            .collect();

        let mut written = 0;
        for row in 0..self.rows {
            if let Some((filter, keys)) = &key_values {
                let key = keys.get(row).map_or("", String::as_str);
                if !filter.keeps(key) {
                    continue;
                }
            }

            let cells: Vec<&str> = columns
                .iter()
                .map(|values| values.get(row).map_or("", String::as_str))
                .collect();
            writeln!(writer, "{}", cells.join(separator.as_str()))?;
            written += 1;
        }
        Ok(written)
    }

    fn check_filter(&self, options: &WriteOptions) -> Result<()> {
        if let Some(filter) = &options.filter {
            if !self.has_column(filter.key()) {
                tracing::error!(target: "metatable", "filter column '{}' not available", filter.key());
                return Err(TableError::ColumnNotFound(filter.key().clone()));
            }
        }
        Ok(())
    }
}
