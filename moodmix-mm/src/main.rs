//! moodmix-mm (Mood Matcher) - song recommendations for a self-reported mood
//!
//! Subcommands:
//! - `serve`: load the catalog and serve the HTTP API (default port 5740)
//! - `import`: load songs from a JSON file into the catalog database
//! - `recommend`: print recommendations for a mood or feature vector
//! - `moods`: list mood presets

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use moodmix_common::config::{
    CompiledDefaults, RootFolderInitializer, RootFolderResolver, TomlConfig,
};
use moodmix_common::db::{init_database, load_default_result_count};
use moodmix_common::FeatureVector;
use moodmix_mm::catalog::{import_json, Catalog};
use moodmix_mm::matcher::{self, RankedResult};
use moodmix_mm::{build_router, AppState, Mood, MODULE_NAME};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "moodmix-mm", version, about = "Mood-based song recommendations")]
struct Cli {
    /// Root folder holding moodmix.db (overrides MOODMIX_ROOT_FOLDER and config file)
    #[arg(long, global = true)]
    root_folder: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port (default from config file, else 5740)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Import songs from a JSON array file
    Import {
        file: PathBuf,

        /// Delete existing songs first
        #[arg(long)]
        replace: bool,
    },

    /// Print recommendations
    Recommend {
        #[command(flatten)]
        query: QueryArgs,

        /// Number of songs (default from settings)
        #[arg(short, long, allow_negative_numbers = true)]
        k: Option<i64>,
    },

    /// List mood presets
    Moods,
}

/// Exactly one query source
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct QueryArgs {
    /// Six comma-separated values: danceability,energy,speechiness,acousticness,valence,tempo
    #[arg(long)]
    features: Option<String>,

    /// Mood preset name (see `moods`)
    #[arg(long)]
    mood: Option<String>,
}

impl QueryArgs {
    fn resolve(&self) -> Result<FeatureVector> {
        if let Some(name) = &self.mood {
            return Ok(name.parse::<Mood>()?.features());
        }
        let text = self.features.as_deref().unwrap_or_default();
        Ok(text.parse::<FeatureVector>().map_err(matcher::MatchError::from)?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Loaded before tracing exists; problems are logged once it does
    let (toml_config, config_problem) = TomlConfig::or_defaults(TomlConfig::try_load());

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| toml_config.logging.level.clone());
    init_tracing(&log_level)?;

    info!(
        "Starting moodmix Mood Matcher ({}) v{}",
        MODULE_NAME,
        env!("CARGO_PKG_VERSION")
    );
    if let Some(e) = config_problem {
        warn!("Ignoring config file: {} (using compiled defaults)", e);
    }

    if let Command::Moods = cli.command {
        print_moods();
        return Ok(());
    }

    let resolver = RootFolderResolver::new(MODULE_NAME)
        .with_cli_arg(cli.root_folder.clone())
        .with_toml_config(toml_config.clone());
    let initializer = RootFolderInitializer::new(resolver.resolve());
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());
    let pool = init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    match cli.command {
        Command::Serve { host, port } => {
            let port = port
                .or(toml_config.port)
                .unwrap_or(CompiledDefaults::for_current_platform().port);
            serve(&pool, &host, port).await
        }
        Command::Import { file, replace } => {
            let summary = import_json(&pool, &file, replace)
                .await
                .with_context(|| format!("Import of {} failed", file.display()))?;
            if summary.removed > 0 {
                info!("Removed {} existing songs", summary.removed);
            }
            println!(
                "Imported {} songs ({} in catalog)",
                summary.imported, summary.total
            );
            Ok(())
        }
        Command::Recommend { query, k } => recommend(&pool, &query, k).await,
        Command::Moods => Ok(()),
    }
}

/// `RUST_LOG` wins; otherwise the configured level. Logs go to stderr so
/// CLI tables on stdout stay clean.
fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level '{}'", level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn serve(pool: &SqlitePool, host: &str, port: u16) -> Result<()> {
    let catalog = Catalog::load(pool).await?;
    if catalog.is_empty() {
        warn!("Catalog is empty; recommendations will fail until songs are imported");
    }
    let default_result_count = load_default_result_count(pool).await?;
    info!("Default result count: {}", default_result_count);

    let state = AppState::new(catalog, default_result_count);
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("{} listening on http://{}", MODULE_NAME, addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn recommend(pool: &SqlitePool, query: &QueryArgs, k: Option<i64>) -> Result<()> {
    let k = match k {
        Some(k) => matcher::result_count(k)?,
        None => load_default_result_count(pool).await?,
    };

    let query = query.resolve()?;

    let catalog = Catalog::load(pool).await?;
    let results = matcher::recommend(catalog.entries(), &query, k)?;

    println!("Query: {}", query);
    print_results(&results);
    Ok(())
}

fn print_results(results: &[RankedResult<'_>]) {
    println!("{:>4}  {:<36}  {:<24}  {:>8}  {}", "#", "Title", "Artist", "Distance", "Link");
    for (index, result) in results.iter().enumerate() {
        println!(
            "{:>4}  {:<36}  {:<24}  {:>8.3}  {}",
            index + 1,
            truncate(&result.entry.title, 36),
            truncate(&result.entry.artist, 24),
            result.distance,
            result.entry.link
        );
    }
}

fn print_moods() {
    println!("{:<10}  {}", "Mood", "Features (danceability, energy, speechiness, acousticness, valence, tempo)");
    for mood in Mood::ALL {
        println!("{:<10}  {}", mood, mood.features());
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}
