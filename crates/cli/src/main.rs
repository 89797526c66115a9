//! Parley CLI — the main entry point.
//!
//! Commands:
//! - `init`     — Write a default config file
//! - `chat`     — Interactive tutoring session
//! - `ask`      — Send a single message
//! - `history`  — Print the saved chat log
//! - `clear`    — Reset the saved chat log
//! - `tools`    — List the learning tools
//! - `doctor`   — Diagnose system health

use clap::{Parser, Subcommand};

mod commands;
mod runtime;

#[derive(Parser)]
#[command(
    name = "parley",
    about = "Parley — a voice-enabled English tutor",
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
    /// Write a default configuration file
    Init,

    /// Chat with the tutor
    Chat {
        /// Turn spoken replies on for this session
        #[arg(long)]
        speak: bool,

        /// Disable conversation memory for this session
        #[arg(long)]
        no_memory: bool,
    },

    /// Send a single message and print the reply
    Ask {
        /// The message to send
        #[arg(short, long)]
        message: String,
    },

    /// Print the saved chat history
    History {
        /// Print raw JSON instead of formatted lines
        #[arg(long)]
        json: bool,
    },

    /// Clear the saved chat history
    Clear,

    /// List the available learning tools
    Tools,

    /// Diagnose system health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Chat { speak, no_memory } => commands::chat::run(speak, no_memory).await?,
        Commands::Ask { message } => commands::chat::ask(message).await?,
        Commands::History { json } => commands::history::run(json).await?,
        Commands::Clear => commands::history::clear().await?,
        Commands::Tools => commands::tools::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
