use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::storage::{ColumnId, ReadOptions, WriteOptions};

#[derive(Parser, Debug)]
#[command(name = "metatable")]
#[command(author, version, about = "Inspect, filter and merge tab/comma separated metadata tables")]
pub struct Cli {
    #[command(flatten)]
    pub format: FormatArgs,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct FormatArgs {
    /// Field separator
    #[arg(short, long, default_value = "\t", global = true)]
    pub separator: char,

    /// Files have no header line; columns are addressed by position
    #[arg(long, global = true)]
    pub no_header: bool,

    /// Characters that mark a comment line
    #[arg(long, default_value = "#", global = true)]
    pub comment: String,
}

impl FormatArgs {
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions::new()
            .with_separator(self.separator)
            .with_header(!self.no_header)
            .with_comment_prefixes(self.comment.chars())
    }

    pub fn write_options(&self, level: u32) -> WriteOptions {
        WriteOptions::new()
            .with_separator(self.separator)
            .with_header(!self.no_header)
            .with_compression_level(level)
    }

    pub fn column(&self, text: &str) -> ColumnId {
        ColumnId::parse(text, self.no_header)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the columns and row count of a table
    Info { path: PathBuf },

    /// Keep (or drop) rows by the value of a key column
    Filter {
        input: PathBuf,
        output: PathBuf,
        /// Key column
        #[arg(short, long)]
        key: String,
        /// Comma separated key values
        #[arg(long, value_delimiter = ',')]
        values: Vec<String>,
        /// Drop the listed rows instead of keeping them
        #[arg(long)]
        exclude: bool,
        /// Gzip level for the output, 0 for plain text
        #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=9))]
        level: u32,
    },

    /// Append the rows of several tables
    Concat {
        output: PathBuf,
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Require identical column sets
        #[arg(long)]
        strict: bool,
        /// Gzip level for the output, 0 for plain text
        #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=9))]
        level: u32,
    },

    /// Rename one column
    Rename {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },

    /// Drop columns whose cells are all blank
    Prune { input: PathBuf, output: PathBuf },

    /// Print the key to value mapping of two columns
    Lookup {
        path: PathBuf,
        #[arg(short, long)]
        key: String,
        #[arg(long)]
        value: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
