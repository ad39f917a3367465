use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cube", version)]
#[command(about = "Card metadata lookups and deck/collection file conversion", long_about = None)]
pub struct Cli {
    /// Configuration file, layered above cube.toml and below CUBE_* variables
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the lookup stores (overrides configuration)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// More logging; repeat for more (RUST_LOG takes precedence)
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Less logging; repeat to silence errors too
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the full record of each card as a spreadsheet row
    Card {
        #[arg(required = true, value_name = "ID")]
        ids: Vec<u64>,
    },
    /// Print the name of each card
    Name {
        #[arg(required = true, value_name = "ID")]
        ids: Vec<u64>,
    },
    /// Print the color identity of each card
    Colors {
        #[arg(required = true, value_name = "ID")]
        ids: Vec<u64>,
    },
    /// Print the identifiers of every printing of each card
    Printings {
        #[arg(required = true, value_name = "ID")]
        ids: Vec<u64>,
    },
    /// Read or write .dec deck files
    Deck {
        #[command(subcommand)]
        action: FileAction,
    },
    /// Read or write .coll2 collection files
    Collection {
        #[command(subcommand)]
        action: FileAction,
    },
    /// Convert between .dec and .coll2 files, by extension
    Convert {
        input: PathBuf,
        output: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum FileAction {
    /// Print every identifier in the file, one per line
    Import { file: PathBuf },
    /// Write the given identifiers to a file
    Export {
        output: PathBuf,
        #[arg(value_name = "ID")]
        ids: Vec<u64>,
    },
}

impl Cli {
    /// Filter directive implied by `-v`/`-q`.
    pub fn level(&self) -> &'static str {
        match (self.verbose, self.quiet) {
            (0, 0) => "warn",
            (1, _) => "info",
            (2, _) => "debug",
            (v, _) if v > 2 => "trace",
            (_, 1) => "error",
            _ => "off",
        }
    }

    /// Install the stderr subscriber. `RUST_LOG` wins over the flags.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level()));
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }
}
