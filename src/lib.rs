pub mod cli;
pub mod storage;

pub use storage::{
    ColumnId, FilterMode, MetadataTable, ReadOptions, Result, RowData, RowFilter, RowShape,
    TableError, WriteOptions,
};
