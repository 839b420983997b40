use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use pooled_sql::SqlValue;
use pooled_sql::executor::{BatchFlush, DEFAULT_BATCH_CHUNK};

use crate::params::parse_param;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run SQL through a pooled-sql connection pool")]
pub(crate) struct Args {
    /// Pool properties file (driverClassName, url, maxTotal, ...).
    #[arg(long, short = 'c')]
    pub(crate) config: PathBuf,
    /// Rows fetched per round trip for queries.
    #[arg(long)]
    pub(crate) fetch_size: Option<usize>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Run a query and print the rows as JSON.
    Query {
        sql: String,
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<SqlValue>,
    },
    /// Run one update; prints whether exactly one row changed.
    Update {
        sql: String,
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<SqlValue>,
    },
    /// Run every `;`-terminated statement in a file as one batch.
    ///
    /// Semicolons inside quotes and comments are ignored. Trigger bodies are not supported.
    Exec { file: PathBuf },
    /// Bind each line of a delimited file to SQL and run it as a batch.
    Import {
        sql: String,
        file: PathBuf,
        #[arg(long, default_value_t = ',')]
        delimiter: char,
        #[command(flatten)]
        flush: FlushArgs,
    },
}

#[derive(ClapArgs, Debug, Clone, Copy)]
#[group(multiple = false)]
pub(crate) struct FlushArgs {
    /// Entries per flush.
    #[arg(long)]
    pub(crate) chunk: Option<usize>,
    /// Queue every entry and flush once.
    #[arg(long)]
    pub(crate) flush_at_end: bool,
}

impl FlushArgs {
    pub(crate) fn policy(self) -> BatchFlush {
        if self.flush_at_end {
            BatchFlush::AtEnd
        } else {
            BatchFlush::Chunked {
                size: self.chunk.unwrap_or(DEFAULT_BATCH_CHUNK).max(1),
            }
        }
    }
}
