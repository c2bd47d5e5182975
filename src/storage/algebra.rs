//! Whole-table operations: merging, row subsets, key/value projections and
//! column renames.

use std::collections::{HashMap, HashSet};

use super::column::ColumnId;
use super::error::{Result, TableError};
use super::table::MetadataTable;

impl MetadataTable {
    /// Appends the rows of `other`.
    ///
    /// In strict mode both tables must have the same column set. Otherwise
    /// columns only present in `other` are added and left blank for the
    /// existing rows. A table without columns always merges non-strictly.
    pub fn concatenate(&mut self, other: &MetadataTable, strict: bool) -> Result<()> {
        if let (Some(ours), Some(theirs)) = (self.order.first(), other.order.first()) {
            if !ours.same_scheme(theirs) {
                tracing::error!(target: "metatable", "cannot merge named and positional columns");
                return Err(TableError::Schema(
                    "cannot merge named and positional columns".to_string(),
                ));
            }
        }

        let strict = strict && !self.order.is_empty();
        if strict {
            let theirs_known = self.validate_column_names(&other.order);
            let ours_known = other.validate_column_names(&self.order);
            if !theirs_known || !ours_known {
                tracing::error!(target: "metatable", "column names are not identical");
                return Err(TableError::Schema("column names are not identical".to_string()));
            }
            for id in &self.order {
                let incoming = other.values(id)?;
                if let Some(column) = self.columns.get_mut(id) {
                    column.extend_from_slice(incoming);
                }
            }
        } else {
            for id in &other.order {
                let incoming = other.values(id)?;
                match self.columns.get_mut(id) {
                    Some(column) => column.extend_from_slice(incoming),
                    None => {
                        let mut column = self.empty_column("");
                        column.extend_from_slice(incoming);
                        self.columns.insert(id.clone(), column);
                        self.order.push(id.clone());
                    }
                }
            }
        }

        self.rows += other.rows;
        let rows = self.rows;
        for column in self.columns.values_mut() {
            if column.len() < rows {
                column.resize(rows, String::new());
            }
        }
        Ok(())
    }

    /// Keeps the rows whose `key` cell is one of `values`, in their
    /// original order.
    pub fn reduce_rows_to_subset<I, S>(&mut self, values: I, key: &ColumnId) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let wanted: HashSet<String> = values.into_iter().map(Into::into).collect();
        let keep: Vec<bool> = self
            .values(key)
            .map_err(|e| {
                tracing::error!(target: "metatable", "key column '{}' not available", key);
                e
            })?
            .iter()
            .map(|value| wanted.contains(value))
            .collect();

        for column in self.columns.values_mut() {
            *column = std::mem::take(column)
                .into_iter()
                .zip(&keep)
                .filter_map(|(value, &kept)| kept.then_some(value))
                .collect();
        }
        self.rows = keep.iter().filter(|&&kept| kept).count();
        Ok(())
    }

    /// Maps each `key` cell to the `value` cell of the same row. Later rows
    /// win on duplicate keys.
    pub fn map(&self, key: &ColumnId, value: &ColumnId) -> Result<HashMap<String, String>> {
        let keys = self.known_values(key)?;
        let values = self.known_values(value)?;

        let mut map = HashMap::new();
        if self.columns.len() < 2 {
            return Ok(map);
        }
        for (k, v) in keys.iter().zip(values) {
            if let Some(previous) = map.insert(k.clone(), v.clone()) {
                tracing::warn!(
                    target: "metatable",
                    "duplicate key '{}' in column '{}', replacing '{}' with '{}'",
                    k,
                    key,
                    previous,
                    v
                );
            }
        }
        Ok(map)
    }

    pub fn rename_column(&mut self, old: &ColumnId, new: ColumnId) -> Result<()> {
        let Some(position) = self.order.iter().position(|id| id == old) else {
            tracing::error!(target: "metatable", "column '{}' not available", old);
            return Err(TableError::ColumnNotFound(old.clone()));
        };
        if *old == new {
            return Ok(());
        }
        if self.has_column(&new) {
            tracing::error!(target: "metatable", "column '{}' already exists", new);
            return Err(TableError::Schema(format!("column '{}' already exists", new)));
        }
        if self.order.len() > 1 {
            self.check_scheme(&new)?;
        }

        let values = self.columns.remove(old).unwrap_or_default();
        self.columns.insert(new.clone(), values);
        self.order[position] = new;
        Ok(())
    }

    /// First row whose `column` cell equals `value`.
    pub fn row_index_of(&self, value: &str, column: &ColumnId) -> Result<Option<usize>> {
        let values = self.known_values(column)?;
        Ok(values.iter().position(|v| v == value))
    }

    /// Looks up `key_value` in `key_column` and returns the `value_column`
    /// cell of the first matching row.
    pub fn cell_value(
        &self,
        key_column: &ColumnId,
        key_value: &str,
        value_column: &ColumnId,
    ) -> Result<Option<String>> {
        let values = self.known_values(value_column)?;
        Ok(self
            .row_index_of(key_value, key_column)?
            .and_then(|row| values.get(row).cloned()))
    }

    fn known_values(&self, id: &ColumnId) -> Result<&[String]> {
        self.values(id).map_err(|e| {
            tracing::error!(target: "metatable", "column '{}' not available", id);
            e
        })
    }
}
