mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tourstop_core::TourConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tourstop")]
#[command(about = "Browse the University Swings campus tour, save calendar invites and request a stop")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tour stops, optionally filtered
    Events {
        /// Match university or city (case-insensitive)
        #[arg(short, long)]
        query: Option<String>,

        /// Two-letter state code, e.g. IN
        #[arg(short, long)]
        state: Option<String>,

        /// Month number 1-12
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Print the rendered cards as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a calendar invite (.ics) for a tour stop
    Invite {
        /// Event id as shown by `tourstop events`
        id: u32,

        /// Directory to write to (defaults to downloads_dir from config)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Request a tour stop at your university
    Request {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        university: Option<String>,

        /// "City, ST"
        #[arg(long)]
        city_state: Option<String>,

        /// Preferred date window
        #[arg(long)]
        window: Option<String>,

        #[arg(long)]
        message: Option<String>,

        /// Print the mail link instead of opening the mail client
        #[arg(long)]
        no_open: bool,
    },
    /// Show requests stored on this device
    Requests {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = TourConfig::load()?;

    match cli.command {
        Commands::Events {
            query,
            state,
            month,
            json,
        } => {
            let catalog = tourstop_core::load_catalog(&config)?;
            commands::events::run(&catalog, &config, query, state, month, json)
        }
        Commands::Invite { id, out } => {
            let catalog = tourstop_core::load_catalog(&config)?;
            let dir = out.unwrap_or_else(|| config.downloads_path());
            commands::invite::run(&catalog, &config, id, &dir)
        }
        Commands::Request {
            name,
            email,
            university,
            city_state,
            window,
            message,
            no_open,
        } => {
            let catalog = tourstop_core::load_catalog(&config)?;
            let args = commands::request::RequestArgs {
                name,
                email,
                university,
                city_state,
                window,
                message,
            };
            commands::request::run(&catalog, &config, args, !no_open)
        }
        Commands::Requests { json } => commands::requests::run(&config, json),
    }
}
