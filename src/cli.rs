/// CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::docker::TailSpec;

// Build timestamp injected at compile time
pub const VERSION_WITH_BUILD: &str = concat!(env!("CARGO_PKG_VERSION"), " (built: ", env!("BUILD_TIMESTAMP"), ")");

#[derive(Parser, Debug)]
#[command(name = "docktui")]
#[command(author, version = VERSION_WITH_BUILD, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to <config dir>/docktui/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List containers
    #[command(alias = "ps")]
    List {
        /// Only show running containers
        #[arg(short, long)]
        running: bool,

        /// Case-insensitive filter on names and image
        #[arg(short, long, value_name = "TEXT")]
        name: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Start a container
    Start {
        /// Container ID or name
        id: Option<String>,
    },

    /// Stop a container (10 second grace period)
    Stop {
        /// Container ID or name
        id: Option<String>,
    },

    /// Print container logs
    Logs {
        /// Container ID or name
        id: Option<String>,

        /// Number of trailing lines, or "all"
        #[arg(short = 'n', long, value_name = "N|all")]
        tail: Option<TailSpec>,
    },

    /// Print the raw inspect document as JSON
    Inspect {
        /// Container ID or name
        id: Option<String>,
    },

    /// List images
    Images,

    /// Launch the interactive dashboard
    Ui,
}
