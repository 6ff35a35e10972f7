mod analyse_cmd;
mod config;
mod parse_cmd;
mod prompt_cmd;
mod serve_cmd;
mod terminal_output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fitment")]
#[command(about = "Check whether a photographed car part fits your vehicle")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $FITMENT_CONFIG or ~/.fitment/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind to
        #[arg(long)]
        bind: Option<String>,
    },
    /// Analyse one photo against the configured backend
    Analyse {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        year: String,
        #[arg(long)]
        make: String,
        #[arg(long)]
        model: String,
        /// What the part is, plus anything else the model should know
        #[arg(long)]
        notes: String,
        #[arg(long)]
        product_url: Option<String>,
        /// Print the full JSON outcome instead of text
        #[arg(long)]
        json: bool,
    },
    /// Parse a saved model reply offline (stdin when no file is given)
    Parse {
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Print the system prompt for the configured labels
    Prompt,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref()).await?;

    let quiet = !matches!(cli.command, Commands::Serve { .. });
    config::init_logging(&config, quiet);

    let result = match cli.command {
        Commands::Serve { port, bind } => serve_cmd::run(config, port, bind).await,
        Commands::Analyse {
            image,
            year,
            make,
            model,
            notes,
            product_url,
            json,
        } => {
            let details = fitment_core::VehicleDetails {
                year,
                make,
                model,
                product_url,
                notes,
            };
            analyse_cmd::run(&config, &image, details, json).await
        }
        Commands::Parse { file, json } => parse_cmd::run(&config, file.as_deref(), json).await,
        Commands::Prompt => prompt_cmd::run(&config),
    };

    if let Err(e) = &result {
        terminal_output::note_error(&format!("{e:#}"));
        std::process::exit(1);
    }
    Ok(())
}
