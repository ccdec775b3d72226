//! Command line entry points

pub mod serve;

use clap::{Parser, Subcommand};

/// Inventory back office - catalog API with a cached request pipeline
#[derive(Parser)]
#[command(name = "inventory-backoffice")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve(serve::ServeArgs),
}
