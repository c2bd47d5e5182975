pub mod algebra;
pub mod codec;
pub mod column;
pub mod error;
pub mod reader;
pub mod table;
pub mod writer;

pub use codec::{codec_for_level, codec_for_path, GzipCodec, PlainCodec, StreamCodec};
pub use column::ColumnId;
pub use error::{Result, TableError};
pub use reader::ReadOptions;
pub use table::{MetadataTable, RowData, RowShape};
pub use writer::{FilterMode, RowFilter, WriteOptions};
