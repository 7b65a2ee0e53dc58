//! IPv4 Radix - command line entrypoint.
//!
//! Loads a prefix database into a radix tree and answers lookups against it,
//! or replays a paired test file to check every expected result.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ipv4_radix_lib::config::{self, ConfigLoader, RadixConfig};
use ipv4_radix_lib::data_structures::{RadixIntTree, RadixSetTree};
use ipv4_radix_lib::error::{
    report_error, set_error_reporter, ErrorContext, RadixError, RadixResult, TracingErrorReporter,
};
use ipv4_radix_lib::loader::{self, LineFormat, PrefixLoader};
use serde::Serialize;
use tracing::info;

/// Command line arguments.
#[derive(Parser, Debug)]
#[clap(name = "ipv4_radix", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Options shared by commands that load a database.
#[derive(clap::Args, Debug)]
struct DatabaseArgs {
    /// Prefix database (defaults to loader.database from the configuration)
    #[clap(short, long, value_parser)]
    db: Option<PathBuf>,

    /// Parse values as nginx geo entries (hex, trailing ';')
    #[clap(long)]
    nginx: bool,

    /// Treat the database as a plain prefix list
    #[clap(long)]
    membership: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Look up addresses in a prefix database
    Lookup {
        #[clap(flatten)]
        database: DatabaseArgs,

        /// Print results as JSON lines
        #[clap(long)]
        json: bool,

        /// Addresses to classify
        #[clap(required = true)]
        addresses: Vec<String>,
    },

    /// Replay a paired test file against a prefix database
    Verify {
        #[clap(flatten)]
        database: DatabaseArgs,

        /// Test file of `address<TAB>expected` lines
        #[clap(short, long, value_parser)]
        expect: PathBuf,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// A loaded database of either variant.
enum Database {
    Values(RadixIntTree),
    Members(RadixSetTree),
}

#[derive(Serialize)]
struct LookupLine<'a, T> {
    address: &'a str,
    result: T,
}

/// Initialize the logging system.
fn init_logging(log: &config::LogConfig) -> RadixResult<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_line_number(log.source_location)
        .with_file(log.source_location)
        .with_thread_names(true);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| RadixError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

fn load_config(path: Option<&PathBuf>) -> RadixResult<RadixConfig> {
    Ok(ConfigLoader::new(path, config::ENV_PREFIX).load()?)
}

fn load_database(args: &DatabaseArgs, config: &RadixConfig) -> RadixResult<Database> {
    let path = args
        .db
        .clone()
        .or_else(|| config.loader.database.clone())
        .ok_or_else(|| RadixError::Custom("no prefix database given (use --db)".to_string()))?;

    let format = if args.nginx {
        LineFormat::Nginx
    } else {
        config.loader.format
    };
    let prefix_loader = PrefixLoader::new()
        .with_format(format)
        .with_duplicate_policy(config.tree.duplicate_policy)
        .with_min_capacity(config.tree.initial_capacity);

    if args.membership || config.loader.membership {
        Ok(Database::Members(prefix_loader.load_set_tree(&path)?))
    } else {
        Ok(Database::Values(prefix_loader.load_int_tree(&path)?))
    }
}

fn print_result<T: Serialize + std::fmt::Display>(address: &str, result: T, json: bool) -> RadixResult<()> {
    if json {
        println!("{}", serde_json::to_string(&LookupLine { address, result })?);
    } else {
        println!("{address}\t{result}");
    }
    Ok(())
}

fn run(args: Args, config: RadixConfig) -> RadixResult<()> {
    match args.command {
        Command::Lookup {
            database,
            json,
            addresses,
        } => {
            let database = load_database(&database, &config)?;
            for address in &addresses {
                match &database {
                    Database::Values(tree) => print_result(address, tree.select_ip(address)?, json)?,
                    Database::Members(tree) => print_result(address, tree.contains_ip(address)?, json)?,
                }
            }
            Ok(())
        }
        Command::Verify { database, expect } => {
            let workers = config.lookup.worker_threads;
            let (checked, failed) = match load_database(&database, &config)? {
                Database::Values(tree) => {
                    let report = loader::verify_int_tree(&tree, &expect, workers)?;
                    for m in &report.mismatches {
                        println!("{}", serde_json::to_string(m)?);
                    }
                    (report.checked, report.mismatches.len())
                }
                Database::Members(tree) => {
                    let report = loader::verify_set_tree(&tree, &expect, workers)?;
                    for m in &report.mismatches {
                        println!("{}", serde_json::to_string(m)?);
                    }
                    (report.checked, report.mismatches.len())
                }
            };

            info!(checked, failed, workers, "Verification finished");
            if failed > 0 {
                return Err(RadixError::Custom(format!(
                    "{failed} of {checked} lookups did not match"
                )));
            }
            Ok(())
        }
        Command::Validate => {
            info!("Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { output } => {
            info!("Generating default configuration");
            let default_config = RadixConfig::default();

            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = toml::to_string_pretty(&default_config)
                .map_err(|e| RadixError::Custom(format!("Failed to serialize config: {e}")))?;
            std::fs::write(&output, toml)?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
    }
}

fn main() {
    let args = Args::parse();

    let config = match load_config(args.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            process::exit(2);
        }
    };

    if let Err(e) = init_logging(&config.log) {
        eprintln!("{e}");
        process::exit(2);
    }
    set_error_reporter(Arc::new(TracingErrorReporter));

    let command = format!("{:?}", args.command);
    if let Err(e) = run(args, config) {
        report_error(ErrorContext::new(e, "cli").with_details(command));
        process::exit(1);
    }
}
