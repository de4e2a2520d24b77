//! Packwise CLI — the main entry point.
//!
//! Commands:
//! - `serve`    — Start the HTTP gateway
//! - `generate` — Run the pipeline once and print the packing list
//! - `ingest`   — Embed the knowledge file and load it into the vector store
//! - `doctor`   — Diagnose configuration and connectivity

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "packwise",
    about = "Packwise — retrieval-augmented travel packing lists",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate a packing list for one trip and print it as JSON
    Generate {
        /// Destination city or region
        destination: String,

        /// Trip length in days
        #[arg(short = 'd', long, default_value_t = 7)]
        days: u32,

        /// Travel type: business, vacation, or backpacking
        #[arg(short = 't', long, default_value = "vacation")]
        travel_type: String,

        /// Season: spring, summer, fall, or winter
        #[arg(short = 's', long, default_value = "summer")]
        season: String,

        /// Departure date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Embed the packing knowledge file and upsert it into the vector store
    Ingest {
        /// Override the knowledge file path
        #[arg(short, long)]
        file: Option<std::path::PathBuf>,
    },

    /// Diagnose configuration and connectivity
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Generate {
            destination,
            days,
            travel_type,
            season,
            date,
        } => commands::generate::run(destination, days, &travel_type, &season, date).await?,
        Commands::Ingest { file } => commands::ingest::run(file).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
