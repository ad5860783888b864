use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use cityvibe::config::VibeConfig;
use cityvibe::http::ApiClient;
use cityvibe::playback::{PreviewDeck, SpoolOutput};
use cityvibe::{CityVibe, ColorExtractor, PlaceCandidate, VibeReport, logging, web};

#[derive(Parser, Debug)]
#[command(name = "cityvibe")]
#[command(about = "Weather, food, music and country facts for any place")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "CITYVIBE_CONFIG")]
    config: Option<PathBuf>,

    /// Force debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web service
    Serve {
        /// Overrides `server.port`
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print autocomplete suggestions for a query
    Suggest { query: String },
    /// Fetch every panel for a place
    Vibe {
        #[arg(long)]
        city: String,
        /// Country or region, defaults to the city
        #[arg(long)]
        region: Option<String>,
        /// Print the joined report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sample the ambient color of an image
    Ambient { url: String },
    /// Spool a track preview and wait for it to finish
    Play { url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = VibeConfig::load_from_path(cli.config).context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            let app = Arc::new(CityVibe::from_config(config)?);
            web::run(app, port).await?;
        }
        Command::Suggest { query } => {
            let app = CityVibe::from_config(config)?;
            let result = app.feed.suggest(&query).await?;
            if result.suggestions.is_empty() {
                println!("No places match '{query}'");
            }
            for place in result.suggestions {
                println!(
                    "{}  [{} / {}]",
                    place.display_name, place.primary_token, place.context_token
                );
            }
        }
        Command::Vibe { city, region, json } => {
            let app = CityVibe::from_config(config)?;
            let region = region.unwrap_or_else(|| city.clone());
            let place = PlaceCandidate::new(format!("{city}, {region}"), city, region);
            let report = app.aggregator.lookup(&place).join().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Command::Ambient { url } => {
            let extractor = ColorExtractor::new(ApiClient::new(&config.http)?);
            let color = extractor.extract_ambient(&url).await?;
            println!("rgb({}, {}, {})", color.r, color.g, color.b);
            println!("{}", color.overlay(config.ambient.opacity).css());
        }
        Command::Play { url } => {
            let http = ApiClient::new(&config.http)?;
            let deck = PreviewDeck::new(Arc::new(SpoolOutput::from_config(&config, http)));
            let id = deck.play(&url);
            info!("Started {}", id);
            while deck.is_playing(id) {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            println!("{id} finished, spool directory {}", config.music.spool_dir);
        }
    }

    Ok(())
}

fn print_report(report: &VibeReport) {
    println!("{}", report.place.display_name);
    for panel in &report.panels {
        println!("\n== {} ({}) ==", panel.kind.label(), panel.token);
        match (&panel.html, &panel.error) {
            (Some(html), _) => println!("{html}"),
            (None, Some(error)) => println!("{}", error.message),
            (None, None) => {}
        }
    }
    if let Some(background) = &report.background {
        println!("\nBackground: {}", background.css());
    }
}
