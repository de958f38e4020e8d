use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use study_planner::api::state::AppState;
use study_planner::config::AppConfig;
use study_planner::fetch::{
    validate_playlist_url, FetchError, PlaylistClient, YouTubeClient, YouTubeConfig,
};
use study_planner::models::Video;
use study_planner::scheduler::{build_day_count_based, build_time_based};
use study_planner::storage::{ScheduleStore, StorageConfig};

#[derive(Parser)]
#[command(name = "study-planner")]
#[command(about = "Turn YouTube playlists into daily study schedules")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Build a schedule for a playlist and print it
    Plan {
        /// YouTube playlist URL
        url: String,

        /// Daily study time in minutes
        #[arg(long, conflicts_with = "days")]
        daily_minutes: Option<u32>,

        /// Number of days to finish in
        #[arg(long)]
        days: Option<u32>,

        /// Skip the first N videos (already watched)
        #[arg(long, default_value = "0")]
        skip: usize,

        /// Continue day numbering after this day
        #[arg(long, default_value = "0")]
        last_day: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting study-planner v{}", env!("CARGO_PKG_VERSION"));

    let config_path = PathBuf::from(&cli.config);
    let mut config = if config_path.exists() {
        AppConfig::from_file(&config_path)?
    } else {
        AppConfig::default()
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(dir);
    }

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let store = ScheduleStore::new(StorageConfig::new(config.data_dir.clone()));
            let youtube = youtube_client(&config)?;

            let state = AppState {
                store: Arc::new(store),
                playlists: Arc::new(youtube),
            };
            let app = study_planner::api::build_router(state);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Plan {
            url,
            daily_minutes,
            days,
            skip,
            last_day,
        } => {
            let url = validate_playlist_url(&url)?;
            let youtube = youtube_client(&config)?;

            let videos = youtube.resolve(&url).await?;
            let remaining: Vec<Video> = videos.into_iter().skip(skip).collect();
            tracing::info!(count = remaining.len(), "videos to schedule");

            let schedule = match (daily_minutes, days) {
                (Some(minutes), None) => build_time_based(&remaining, minutes, last_day)?,
                (None, Some(num_days)) => build_day_count_based(&remaining, num_days, last_day)?,
                _ => {
                    eprintln!("Specify exactly one of --daily-minutes or --days");
                    return Ok(());
                }
            };

            for day in &schedule.days {
                println!("\n=== {} ===", day.label);
                for video in &day.videos {
                    println!("  [{}] {}", video.duration, video.title);
                    if let Some(link) = &video.link {
                        println!("        {}", link);
                    }
                }
            }

            println!("\n=== Summary ===");
            println!("Videos: {}", schedule.summary.total_videos);
            println!("Days:   {}", schedule.summary.total_days);
            if let Some(hours) = schedule.average_daily_hours {
                println!("Avg:    {} hours/day", hours);
            }
        }
    }

    Ok(())
}

/// Build the YouTube client from configuration, reading the API key from
/// the environment.
fn youtube_client(config: &AppConfig) -> Result<YouTubeClient, FetchError> {
    let api_key = std::env::var(&config.youtube.api_key_env)
        .map_err(|_| FetchError::MissingApiKey(config.youtube.api_key_env.clone()))?;

    YouTubeClient::new(YouTubeConfig {
        api_key,
        base_url: config.youtube.base_url.clone(),
        timeout: Duration::from_secs(config.youtube.timeout_seconds),
    })
}
