mod cli;
mod commands;
mod fixture;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Commands::Access {
            root,
            data,
            policies,
        } => commands::access::handle(&root, &data, policies),
        cli::Commands::Forget {
            root,
            data,
            policies,
        } => commands::forget::handle(&root, &data, policies),
        cli::Commands::Sanitizers => {
            for (id, label) in gdpr_sanitizers::SanitizerRegistry::with_defaults().list() {
                println!("{id}\t{label}");
            }
            Ok(())
        }
    }
}
