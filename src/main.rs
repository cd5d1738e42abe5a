use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;

use surfcast::api::AppState;
use surfcast::{
    GeoPoint, GoogleMapsClient, RecommendationService, SkillProfile, StormGlassClient, SurfConfig,
    SurfError, http, logging, web,
};

#[derive(Debug, Parser)]
#[command(
    name = "surfcast",
    about = "Rank nearby surf beaches by forecast conditions for your skill level",
    version
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "path")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recommend beaches near a place
    Recommend {
        /// Place name or address to search around
        #[arg(short, long)]
        location: String,

        /// Surfing ability: beginner, intermediate or advanced
        #[arg(short, long)]
        skill: Option<String>,

        /// Print the recommendation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show current marine conditions at a point
    Conditions {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
    /// Serve the recommendation API over HTTP
    Serve {
        /// Port to listen on, overrides the configured one
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<SurfError>() {
                Some(surf_error) => {
                    error!("{}", surf_error);
                    eprintln!("❌ {}", surf_error.user_message());
                }
                None => eprintln!("❌ {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = SurfConfig::load_from_path(cli.config)?;
    logging::init_tracing(&config.logging, cli.verbose)?;
    config.require_api_keys()?;

    let service = build_service(&config)?;

    match cli.command {
        Command::Recommend {
            location,
            skill,
            json,
        } => {
            let skill = skill
                .as_deref()
                .map_or_else(|| config.ranking.default_skill(), SkillProfile::from_label);
            let recommendation = service.recommend(&location, skill).await?;

            if json {
                let output = serde_json::to_string_pretty(&recommendation)
                    .with_context(|| "Failed to serialize recommendation")?;
                println!("{output}");
            } else {
                print!("{recommendation}");
            }
        }
        Command::Conditions { lat, lng } => {
            let point = GeoPoint::new(lat, lng);
            match service.current_conditions(&point).await? {
                Some(conditions) => {
                    println!("Current conditions at {}", point.format_coordinates());
                    print!("{conditions}");
                }
                None => println!("No current reading at {}", point.format_coordinates()),
            }
        }
        Command::Serve { port } => {
            let state = AppState {
                service: Arc::new(service),
                default_skill: config.ranking.default_skill(),
            };
            web::run(port.unwrap_or(config.server.port), state).await?;
        }
    }

    Ok(())
}

fn build_service(config: &SurfConfig) -> Result<RecommendationService> {
    let client = http::build_client(config.marine.timeout(), config.marine.max_retries)?;

    let marine = Arc::new(StormGlassClient::new(client.clone(), &config.marine));
    let maps = Arc::new(GoogleMapsClient::new(client, &config.places));

    Ok(RecommendationService::new(
        maps.clone(),
        maps,
        marine,
        config,
    ))
}
