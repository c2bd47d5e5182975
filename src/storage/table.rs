use std::collections::{HashMap, HashSet};

use super::column::ColumnId;
use super::error::{Result, TableError};

pub const DEFAULT_SEPARATOR: char = '\t';

/// A row handed to [`MetadataTable::insert_row`]: either values in column
/// order, or values keyed by column.
#[derive(Debug, Clone, PartialEq)]
pub enum RowData {
    Values(Vec<String>),
    Keyed(HashMap<ColumnId, String>),
}

impl From<Vec<String>> for RowData {
    fn from(values: Vec<String>) -> Self {
        RowData::Values(values)
    }
}

impl From<Vec<&str>> for RowData {
    fn from(values: Vec<&str>) -> Self {
        RowData::Values(values.into_iter().map(str::to_string).collect())
    }
}

impl From<HashMap<ColumnId, String>> for RowData {
    fn from(values: HashMap<ColumnId, String>) -> Self {
        RowData::Keyed(values)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    Positional,
    Keyed,
}

/// Column-oriented table of text cells.
///
/// `order` fixes column order and membership, `columns` holds one value
/// vector per column. Every vector has exactly `rows` entries between calls.
#[derive(Debug, Clone)]
pub struct MetadataTable {
    pub(super) separator: char,
    pub(super) order: Vec<ColumnId>,
    pub(super) columns: HashMap<ColumnId, Vec<String>>,
    pub(super) rows: usize,
}

impl Default for MetadataTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::with_separator(DEFAULT_SEPARATOR)
    }

    pub fn with_separator(separator: char) -> Self {
        Self {
            separator,
            order: Vec::new(),
            columns: HashMap::new(),
            rows: 0,
        }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.columns.clear();
        self.rows = 0;
    }

    pub fn column_names(&self) -> Vec<ColumnId> {
        self.order.clone()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.order.len()
    }

    pub fn has_column(&self, id: &ColumnId) -> bool {
        self.columns.contains_key(id)
    }

    /// Returns a copy of the column's values.
    pub fn column(&self, id: &ColumnId) -> Result<Vec<String>> {
        self.values(id).map(<[String]>::to_vec)
    }

    pub(super) fn values(&self, id: &ColumnId) -> Result<&[String]> {
        self.columns
            .get(id)
            .map(Vec::as_slice)
            .ok_or_else(|| TableError::ColumnNotFound(id.clone()))
    }

    /// A column of `default` values sized to the current row count.
    pub fn empty_column(&self, default: &str) -> Vec<String> {
        vec![default.to_string(); self.rows]
    }

    /// A row template with `default` in every column.
    pub fn empty_row(&self, default: &str, shape: RowShape) -> RowData {
        match shape {
            RowShape::Positional => RowData::Values(vec![default.to_string(); self.order.len()]),
            RowShape::Keyed => RowData::Keyed(
                self.order
                    .iter()
                    .map(|id| (id.clone(), default.to_string()))
                    .collect(),
            ),
        }
    }

    /// Checks that every name is a column of this table. Unknown names are
    /// logged one by one.
    pub fn validate_column_names<'a, I>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = &'a ColumnId>,
    {
        let mut valid = true;
        for name in names {
            if !self.has_column(name) {
                tracing::warn!(target: "metatable", "unknown column '{}'", name);
                valid = false;
            }
        }
        valid
    }

    pub(super) fn check_scheme(&self, id: &ColumnId) -> Result<()> {
        match self.order.first() {
            Some(first) if !first.same_scheme(id) => Err(TableError::Precondition(format!(
                "column '{}' mixes positional and named identifiers",
                id
            ))),
            _ => Ok(()),
        }
    }

    fn next_index(&self) -> ColumnId {
        let next = self
            .order
            .iter()
            .filter_map(ColumnId::as_index)
            .max()
            .map_or(0, |max| max + 1);
        ColumnId::Index(next)
    }

    /// Adds or replaces a column. Without an id the next free positional
    /// index is used. Replacing keeps the column's position.
    ///
    /// The first column of an empty table sets the row count; any other
    /// column must match it.
    pub fn insert_column(&mut self, values: Vec<String>, id: Option<ColumnId>) -> Result<ColumnId> {
        let id = id.unwrap_or_else(|| self.next_index());
        self.check_scheme(&id)?;

        if self.order.is_empty() && self.rows == 0 {
            self.rows = values.len();
        } else if values.len() != self.rows {
            return Err(TableError::LengthMismatch {
                expected: self.rows,
                found: values.len(),
            });
        }

        if !self.columns.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.columns.insert(id.clone(), values);
        Ok(id)
    }

    pub fn insert_empty_column(&mut self, id: Option<ColumnId>, default: &str) -> Result<ColumnId> {
        let values = self.empty_column(default);
        self.insert_column(values, id)
    }

    /// Appends one row. Validation happens before any column is touched.
    pub fn insert_row(&mut self, row: impl Into<RowData>) -> Result<()> {
        match row.into() {
            RowData::Values(values) => {
                if values.len() != self.order.len() {
                    return Err(TableError::Precondition(format!(
                        "row has {} values but the table has {} columns",
                        values.len(),
                        self.order.len()
                    )));
                }
                for (id, value) in self.order.iter().zip(values) {
                    if let Some(column) = self.columns.get_mut(id) {
                        column.push(value);
                    }
                }
            }
            RowData::Keyed(mut values) => {
                let missing: Vec<String> = self
                    .order
                    .iter()
                    .filter(|id| !values.contains_key(id))
                    .map(ToString::to_string)
                    .collect();
                let extra: Vec<String> = values
                    .keys()
                    .filter(|id| !self.columns.contains_key(id))
                    .map(ToString::to_string)
                    .collect();
                if !missing.is_empty() || !extra.is_empty() {
                    tracing::error!(
                        target: "metatable",
                        "bad row keys, missing: {:?}, unknown: {:?}",
                        missing,
                        extra
                    );
                    return Err(TableError::Schema(format!(
                        "row keys do not match columns (missing: [{}], unknown: [{}])",
                        missing.join(", "),
                        extra.join(", ")
                    )));
                }
                for id in &self.order {
                    if let (Some(value), Some(column)) = (values.remove(id), self.columns.get_mut(id)) {
                        column.push(value);
                    }
                }
            }
        }
        self.rows += 1;
        Ok(())
    }

    /// Drops every column whose cells are all blank after trimming.
    /// Returns the removed identifiers in column order.
    pub fn remove_empty_columns(&mut self) -> Vec<ColumnId> {
        let removed: Vec<ColumnId> = self
            .order
            .iter()
            .filter(|id| {
                self.columns.get(id).is_some_and(|values| {
                    !values.is_empty() && values.iter().all(|v| v.trim().is_empty())
                })
            })
            .cloned()
            .collect();

        let blank: HashSet<&ColumnId> = removed.iter().collect();
        self.order.retain(|id| !blank.contains(id));
        self.columns.retain(|id, _| !blank.contains(id));
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample_table() -> MetadataTable {
        let mut table = MetadataTable::new();
        table
            .insert_column(strings(&["1", "2", "3"]), Some("id".into()))
            .unwrap();
        table
            .insert_column(strings(&["a", "b", "c"]), Some("name".into()))
            .unwrap();
        table
    }

    #[test]
    fn test_first_column_sets_row_count() {
        let table = sample_table();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column_names(), vec![ColumnId::from("id"), ColumnId::from("name")]);
    }

    #[test]
    fn test_insert_column_length_mismatch() {
        let mut table = sample_table();
        let err = table
            .insert_column(strings(&["x"]), Some("short".into()))
            .unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { expected: 3, found: 1 }));
        assert!(!table.has_column(&"short".into()));
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut table = sample_table();
        table
            .insert_column(strings(&["9", "8", "7"]), Some("id".into()))
            .unwrap();
        assert_eq!(table.column_names()[0], ColumnId::from("id"));
        assert_eq!(table.column(&"id".into()).unwrap(), strings(&["9", "8", "7"]));
    }

    #[test]
    fn test_positional_ids_are_assigned() {
        let mut table = MetadataTable::new();
        let first = table.insert_column(strings(&["a"]), None).unwrap();
        let second = table.insert_column(strings(&["b"]), None).unwrap();
        assert_eq!(first, ColumnId::Index(0));
        assert_eq!(second, ColumnId::Index(1));
    }

    #[test]
    fn test_mixed_schemes_rejected() {
        let mut table = sample_table();
        let err = table.insert_empty_column(None, "").unwrap_err();
        assert!(matches!(err, TableError::Precondition(_)));
    }

    #[test]
    fn test_column_copy_is_detached() {
        let table = sample_table();
        let mut names = table.column_names();
        names.clear();
        let mut values = table.column(&"id".into()).unwrap();
        values.push("4".to_string());
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column(&"id".into()).unwrap().len(), 3);
    }

    #[test]
    fn test_missing_column() {
        let table = sample_table();
        let err = table.column(&"nope".into()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_insert_positional_row() {
        let mut table = sample_table();
        table.insert_row(vec!["4", "d"]).unwrap();
        assert_eq!(table.row_count(), 4);
        for id in table.column_names() {
            let values = table.column(&id).unwrap();
            assert_eq!(values.len(), 4);
        }
        assert_eq!(table.column(&"name".into()).unwrap().last().unwrap(), "d");
    }

    #[test]
    fn test_insert_keyed_row() {
        let mut table = sample_table();
        let mut row = match table.empty_row("", RowShape::Keyed) {
            RowData::Keyed(row) => row,
            RowData::Values(_) => unreachable!(),
        };
        row.insert("id".into(), "4".to_string());
        table.insert_row(row).unwrap();
        assert_eq!(table.column(&"id".into()).unwrap().last().unwrap(), "4");
        assert_eq!(table.column(&"name".into()).unwrap().last().unwrap(), "");
    }

    #[test]
    fn test_keyed_row_missing_key_is_atomic() {
        let mut table = sample_table();
        let mut row = HashMap::new();
        row.insert(ColumnId::from("id"), "4".to_string());
        let err = table.insert_row(row).unwrap_err();
        assert!(matches!(err, TableError::Schema(_)));
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column(&"id".into()).unwrap().len(), 3);
    }

    #[test]
    fn test_positional_row_wrong_width() {
        let mut table = sample_table();
        let err = table.insert_row(vec!["4"]).unwrap_err();
        assert!(matches!(err, TableError::Precondition(_)));
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_empty_row_positional() {
        let table = sample_table();
        assert_eq!(
            table.empty_row("-", RowShape::Positional),
            RowData::Values(strings(&["-", "-"]))
        );
        assert_eq!(table.empty_column("x"), strings(&["x", "x", "x"]));
    }

    #[test]
    fn test_validate_column_names() {
        let table = sample_table();
        assert!(table.validate_column_names(&[ColumnId::from("id")]));
        assert!(!table.validate_column_names(&[ColumnId::from("id"), ColumnId::from("x")]));
    }

    #[test]
    fn test_remove_empty_columns() {
        let mut table = sample_table();
        table
            .insert_column(strings(&["", " ", "\t"]), Some("blank".into()))
            .unwrap();
        table
            .insert_column(strings(&["", "x", ""]), Some("sparse".into()))
            .unwrap();
        let removed = table.remove_empty_columns();
        assert_eq!(removed, vec![ColumnId::from("blank")]);
        assert!(!table.has_column(&"blank".into()));
        assert!(table.has_column(&"sparse".into()));
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn test_removed_columns_follow_table_order() {
        let mut table = sample_table();
        table
            .insert_column(strings(&["", "", ""]), Some("zeta".into()))
            .unwrap();
        table
            .insert_column(strings(&["x", "", ""]), Some("kept".into()))
            .unwrap();
        table
            .insert_column(strings(&[" ", "", ""]), Some("alpha".into()))
            .unwrap();

        let removed = table.remove_empty_columns();
        assert_eq!(removed, vec![ColumnId::from("zeta"), ColumnId::from("alpha")]);
        assert_eq!(
            table.column_names(),
            vec![ColumnId::from("id"), ColumnId::from("name"), ColumnId::from("kept")]
        );
    }

    #[test]
    fn test_insert_empty_column_backfills() {
        let mut table = sample_table();
        let id = table.insert_empty_column(Some("group".into()), "NA").unwrap();

        assert_eq!(id, ColumnId::from("group"));
        assert_eq!(table.column(&id).unwrap(), strings(&["NA", "NA", "NA"]));
        assert_eq!(table.column_names().last(), Some(&id));
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_clear() {
        let mut table = sample_table();
        table.clear();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.separator(), '\t');
    }
}
