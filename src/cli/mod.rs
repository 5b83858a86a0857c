//! CLI module for the Cancer Classification API
//!
//! - `serve`: run the HTTP API
//! - `inspect`: load the model registry and print its health and metrics

pub mod inspect;
pub mod serve;

use clap::{Parser, Subcommand};

/// Cancer Classification API - stacked ensemble malignancy prediction
#[derive(Parser)]
#[command(name = "cancer-classifier")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Load the model registry and print its health and stored metrics
    Inspect(inspect::InspectArgs),
}
