//! CLI for inspecting IBM i job logs and journal entry data.
//!
//! # Examples
//!
//! ```bash
//! # Summarize a spooled job log
//! ibmi-tools joblog QPJOBLOG.txt
//!
//! # Only severity 40 messages, as JSON
//! ibmi-tools joblog QPJOBLOG.txt --severity 40 --json
//!
//! # Decode a before and after image of a row
//! ibmi-tools joesd --schema customer.json --data before.bin --compare after.bin \
//!     --library APPLIB --object CUSTOMER
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "ibmi-tools")]
#[command(version, about = "IBM i job log and journal entry tools", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a spooled job log and list its messages
    Joblog {
        /// Job log stream file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Locale pattern configuration (TOML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Print the job log as JSON
        #[arg(long)]
        json: bool,

        /// Only messages with this id
        #[arg(long)]
        id: Option<String>,

        /// Only messages of this type
        #[arg(long = "type", value_name = "TYPE")]
        message_type: Option<String>,

        /// Only messages with this severity
        #[arg(long)]
        severity: Option<u32>,
    },

    /// Decode journal entry specific data with a table schema
    Joesd {
        /// Table schema (JSON)
        #[arg(long, value_name = "FILE")]
        schema: PathBuf,

        /// Entry specific data
        #[arg(long, value_name = "FILE")]
        data: PathBuf,

        /// Library of the journaled object
        #[arg(long)]
        library: String,

        /// Name of the journaled object
        #[arg(long)]
        object: String,

        /// Offset of the row image, overriding the schema
        #[arg(long)]
        offset: Option<usize>,

        /// CCSID of character columns
        #[arg(long, default_value = "37")]
        ccsid: u16,

        /// Second row image to compare against
        #[arg(long, value_name = "FILE")]
        compare: Option<PathBuf>,

        /// Print the decoded records as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else {
        "ibmi_tools=info,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Joblog {
            input,
            config,
            json,
            id,
            message_type,
            severity,
        } => {
            let filter = ibmi_joblog::MessageFilter {
                id,
                message_type,
                severity,
            };
            commands::joblog::run(input, config, filter, json)
        }
        Commands::Joesd {
            schema,
            data,
            library,
            object,
            offset,
            ccsid,
            compare,
            json,
        } => commands::joesd::run(commands::joesd::JoesdArgs {
            schema,
            data,
            library,
            object,
            offset,
            ccsid,
            compare,
            json,
        }),
    }
}
