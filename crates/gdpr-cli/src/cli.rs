use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gdpr")]
#[command(about = "GDPR data-request processing against fixture datasets", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Produce a Right to Access export for a root entity
    Access {
        /// Root entity as type:id (e.g. user:7)
        root: String,

        /// JSON dataset standing in for the CMS entity storage
        #[arg(long)]
        data: PathBuf,

        /// Directory of per-entity-type policy TOML files
        /// (defaults to the config directory)
        #[arg(long)]
        policies: Option<PathBuf>,
    },

    /// Execute a Right to be Forgotten request for a root entity
    Forget {
        /// Root entity as type:id (e.g. user:7)
        root: String,

        /// JSON dataset standing in for the CMS entity storage
        #[arg(long)]
        data: PathBuf,

        /// Directory of per-entity-type policy TOML files
        /// (defaults to the config directory)
        #[arg(long)]
        policies: Option<PathBuf>,
    },

    /// List registered sanitizers
    Sanitizers,
}
