//! Mindsay back-office CLI library

pub mod console;
pub mod migrate;
pub mod resources;
pub mod session;

// Re-export CLI types for testing
pub use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mindsay")]
#[command(about = "Mindsay back-office CLI")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub session: session::SessionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Keep one image template per name and repoint templates to it
    DedupImageTemplates(migrate::DedupArgs),
    /// Fail if two image templates share a name
    CheckImageTemplates(migrate::CheckArgs),
    /// Replace an entity type by another in every intent, then retrain
    ReplaceEntityType(migrate::ReplaceArgs),
    /// Print back-office records as JSON
    Get(resources::GetArgs),
}
