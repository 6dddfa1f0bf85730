//! RecordView CLI
//!
//! Command-line tools for reading RecordView stores.
//!
//! # Commands
//!
//! - `info` - Display record counts per store
//! - `scan` - Run a node or relationship store scan and print the updates
//! - `lookup` - Read one property of a node or relationship
//! - `verify` - Check labels, property chains and values of every entity

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// RecordView command-line store tools.
#[derive(Parser)]
#[command(name = "recordview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display record counts per store
    Info {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Scan a store and print entity updates
    Scan {
        /// Entities to scan
        #[arg(value_enum)]
        entity: commands::scan::ScanEntity,

        /// Label or relationship type ids to match (all if omitted)
        #[arg(short, long, value_delimiter = ',')]
        labels: Vec<u32>,

        /// Property keys to include (all if omitted)
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<u32>,

        /// Drive labelled node scans from an in-memory label index
        #[arg(long)]
        label_index: bool,

        /// Stop after this many updates
        #[arg(long)]
        limit: Option<u64>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Read one property of an entity
    Lookup {
        /// Node id
        #[arg(long, conflicts_with = "relationship", required_unless_present = "relationship")]
        node: Option<u64>,

        /// Relationship id
        #[arg(long)]
        relationship: Option<u64>,

        /// Property key id
        #[arg(short, long)]
        key: u32,
    },

    /// Verify labels, property chains and values of every entity
    Verify {
        /// Stop listing errors after this many
        #[arg(long, default_value = "100")]
        max_errors: usize,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info { format } => {
            let path = cli.path.ok_or("Store path required for info")?;
            commands::info::run(&path, &format)?;
        }
        Commands::Scan {
            entity,
            labels,
            keys,
            label_index,
            limit,
            format,
        } => {
            let path = cli.path.ok_or("Store path required for scan")?;
            let options = commands::scan::ScanOptions {
                entity,
                tokens: labels,
                keys,
                label_index,
                limit,
                format,
            };
            commands::scan::run(&path, &options)?;
        }
        Commands::Lookup {
            node,
            relationship,
            key,
        } => {
            let path = cli.path.ok_or("Store path required for lookup")?;
            let target = match (node, relationship) {
                (Some(id), _) => commands::lookup::Target::Node(id),
                (None, Some(id)) => commands::lookup::Target::Relationship(id),
                (None, None) => return Err("Either --node or --relationship is required".into()),
            };
            commands::lookup::run(&path, target, key)?;
        }
        Commands::Verify { max_errors } => {
            let path = cli.path.ok_or("Store path required for verify")?;
            commands::verify::run(&path, max_errors)?;
        }
        Commands::Version => {
            println!("RecordView CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
