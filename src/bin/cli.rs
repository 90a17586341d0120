//! mutube CLI
//!
//! Local execution entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use mutube::{
    board::{BoardSource, HttpBoard},
    error::{AppError, Result},
    models::Config,
    pipeline::Mutuber,
    platform::{VideoPlatform, YouTubeClient},
    services::CatalogTracker,
    utils::http,
};
use tokio_util::sync::CancellationToken;

/// mutube - board threads to dated playlists
#[derive(Parser, Debug)]
#[command(
    name = "mutube",
    version,
    about = "Collects video links from board threads into tagged playlists"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "mutube.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Also watch this thread number regardless of its subject
    #[arg(long = "watch", value_name = "THREAD")]
    watch: Vec<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve, scrape and publish until interrupted
    Run,

    /// Run a single cycle and print its report
    Once,

    /// Poll the board once and print the links found
    Scrape,

    /// Print the playlist tag for today or a given date
    Tag {
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Cancel `token` on Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupt received, finishing up...");
            token.cancel();
        }
    });
}

fn board_source(config: &Config) -> Result<Arc<dyn BoardSource>> {
    let client = http::create_client(&config.http)?;
    Ok(Arc::new(HttpBoard::new(
        client,
        &config.board.api_base,
        &config.board.name,
    )))
}

fn video_platform(config: &Config) -> Result<Arc<dyn VideoPlatform>> {
    let client = http::create_client(&config.http)?;
    let token = config.platform.access_token()?;
    Ok(Arc::new(YouTubeClient::new(
        client,
        &config.platform.api_base,
        token,
    )))
}

fn mutuber(config: &Config, watch: &[u64], cancel: CancellationToken) -> Result<Mutuber> {
    let mut bot = Mutuber::from_config(config, board_source(config)?, video_platform(config)?)?
        .with_cancel(cancel);
    for &thread_no in watch {
        bot.tracker_mut().watch(thread_no);
    }
    Ok(bot)
}

/// Load the configuration a command needs.
///
/// Only `tag` falls back to defaults; everything else must read the file
/// it was pointed at.
fn load_config(path: &Path, command: &Command) -> Result<Config> {
    match command {
        Command::Tag { .. } => Ok(Config::load_or_default(path)),
        _ => Config::load(path).inspect_err(|e| {
            log::error!("Cannot load config from {}: {}", path.display(), e);
        }),
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli.config, &cli.command)?;
    log::debug!("Loaded configuration from {}", cli.config.display());

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    match cli.command {
        Command::Run => {
            config.validate()?;
            log::info!(
                "Watching /{}/ into {} playlists",
                config.board.name,
                config.playlist.prefix
            );
            let mut bot = mutuber(&config, &cli.watch, cancel)?;
            bot.run_forever().await?;
        }

        Command::Once => {
            config.validate()?;
            let mut bot = mutuber(&config, &cli.watch, cancel)?;
            let report = bot.run_once().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Scrape => {
            config.validate()?;
            let mut tracker =
                CatalogTracker::from_config(board_source(&config)?, &config.board, &config.timing)?
                    .with_cancel(cancel);
            for &thread_no in &cli.watch {
                tracker.watch(thread_no);
            }
            tracker.poll().await?;
            for link in tracker.links() {
                println!("{link}");
            }
        }

        Command::Tag { date } => {
            let format = config.tag_format()?;
            let time = match date {
                Some(date) => NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .map_err(|e| AppError::validation(format!("bad date {date:?}: {e}")))?
                    .and_time(NaiveTime::MIN),
                None => Local::now().naive_local(),
            };
            println!("{}", format.encode(time)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            match config.platform.access_token() {
                Ok(_) => log::info!("✓ Access token present"),
                Err(e) => log::warn!("{}", e),
            }
        }
    }

    Ok(())
}
