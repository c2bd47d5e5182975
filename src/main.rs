use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use metatable::cli::{Cli, Command, FormatArgs};
use metatable::storage::{MetadataTable, RowFilter};

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let format = &cli.format;

    match &cli.command {
        Command::Info { path } => {
            let table = load(path, format)?;
            let names: Vec<String> = table.column_names().iter().map(ToString::to_string).collect();
            println!("columns ({}): {}", table.column_count(), names.join(", "));
            println!("rows: {}", table.row_count());
        }
        Command::Filter {
            input,
            output,
            key,
            values,
            exclude,
            level,
        } => {
            let table = load(input, format)?;
            let key = format.column(key);
            let filter = if *exclude {
                RowFilter::exclude(key, values.iter().cloned())
            } else {
                RowFilter::include(key, values.iter().cloned())
            };
            table.write(output, &format.write_options(*level).with_filter(filter))?;
        }
        Command::Concat {
            output,
            inputs,
            strict,
            level,
        } => {
            let mut merged = MetadataTable::with_separator(format.separator);
            for input in inputs {
                let table = load(input, format)?;
                merged.concatenate(&table, *strict)?;
            }
            merged.write(output, &format.write_options(*level))?;
        }
        Command::Rename {
            input,
            output,
            from,
            to,
        } => {
            let mut table = load(input, format)?;
            table.rename_column(&format.column(from), format.column(to))?;
            table.write(output, &format.write_options(0))?;
        }
        Command::Prune { input, output } => {
            let mut table = load(input, format)?;
            for id in table.remove_empty_columns() {
                tracing::info!("dropped blank column '{}'", id);
            }
            table.write(output, &format.write_options(0))?;
        }
        Command::Lookup { path, key, value } => {
            let table = load(path, format)?;
            let map = table.map(&format.column(key), &format.column(value))?;
            let mut pairs: Vec<(String, String)> = map.into_iter().collect();
            pairs.sort();
            for (k, v) in pairs {
                println!("{}{}{}", k, format.separator, v);
            }
        }
    }

    Ok(())
}

fn load(path: &std::path::Path, format: &FormatArgs) -> metatable::Result<MetadataTable> {
    let mut table = MetadataTable::with_separator(format.separator);
    table.read(path, &format.read_options())?;
    Ok(table)
}
