use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use discern_core::EditionKind;
use discern_resolve::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "discern", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Search the catalog for an album
    ///
    /// The artist is normalized first ("Led Zep" becomes "led zeppelin").
    /// When no result scores above 80%, alternative spellings of the artist
    /// are tried ("Simon & Garfunkel", "Simon and Garfunkel", ...) with half
    /// the result limit each, and their results are merged.
    ///
    /// Scoring weighs title similarity at 60% and artist similarity at 40%.
    /// Deluxe/remastered editions and live recordings are penalized unless
    /// the query asked for them, or --prefer-standard / --allow-live is set.
    ///
    /// Results are cached for the lifetime of the process.
    Search {
        /// Artist name as typed
        artist: String,
        /// Album title
        title: String,
        /// Maximum catalog results for the first query
        #[arg(long)]
        limit: Option<usize>,
        /// Drop results below this confidence (0.0 - 1.0)
        #[arg(long)]
        min_confidence: Option<f64>,
        /// Do not penalize deluxe, remastered or live editions
        #[arg(long)]
        prefer_standard: bool,
        /// Do not penalize live recordings
        #[arg(long)]
        allow_live: bool,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// List an artist's releases, classified and grouped by edition
    ///
    /// Each release is labelled Album, Single, EP, Compilation, Live or
    /// Uncategorized. Editions of the same release (remasters, deluxe
    /// versions) are grouped under the best-scoring one.
    Discography {
        /// Artist name
        artist: String,
        /// Keep only these editions (standard, deluxe, remaster); repeatable
        #[arg(long = "edition", value_name = "KIND")]
        editions: Vec<EditionKind>,
        /// Print groups as JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify catalog records from a JSON file, offline
    Classify {
        /// Path to a JSON array of catalog records
        path: PathBuf,
        /// Known studio album title; repeatable
        #[arg(long = "whitelist", value_name = "TITLE")]
        whitelist: Vec<String>,
        /// Print classifications as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build an album identity record for a query
    ///
    /// With --title and --artist the identity is built offline from the
    /// given resolution. Without them the catalog is searched and the best
    /// match is used.
    Identity {
        /// Free-text query, e.g. "Radiohead - OK Computer"
        query: String,
        /// Resolved album title
        #[arg(long, requires = "artist")]
        title: Option<String>,
        /// Resolved artist name
        #[arg(long, requires = "title")]
        artist: Option<String>,
        /// Apple Music id of the resolved album
        #[arg(long)]
        apple_id: Option<String>,
        /// Spotify id of the resolved album
        #[arg(long)]
        spotify_id: Option<String>,
        /// Apple Music id the query expects
        #[arg(long)]
        query_apple_id: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print one setting, or the whole config file
    Get {
        /// Setting name
        key: Option<String>,
    },
    /// Change a setting in the config file
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file if it does not exist
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    if let Err(e) = twyg::setup(config.logging.clone()) {
        eprintln!("Could not set up logging: {e:?}");
    }
    log::debug!("Loaded configuration from {}", discern_resolve::config::config_file_path().display());

    match cli.command {
        Commands::Search {
            artist,
            title,
            limit,
            min_confidence,
            prefer_standard,
            allow_live,
            json,
        } => {
            let args = commands::search::SearchArgs {
                limit,
                min_confidence,
                prefer_standard,
                allow_live,
                json,
            };
            commands::run_search(&config, &artist, &title, args).await?;
        }
        Commands::Discography {
            artist,
            editions,
            json,
        } => {
            commands::run_discography(&config, &artist, editions, json).await?;
        }
        Commands::Classify {
            path,
            whitelist,
            json,
        } => {
            commands::run_classify(&path, whitelist, json).await?;
        }
        Commands::Identity {
            query,
            title,
            artist,
            apple_id,
            spotify_id,
            query_apple_id,
        } => {
            let args = commands::identity::IdentityArgs {
                query,
                title,
                artist,
                apple_id,
                spotify_id,
                query_apple_id,
            };
            commands::run_identity(&config, args).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Get { key } => commands::config::get_config(&config, key)?,
            ConfigAction::Set { key, value } => commands::config::set_config(&key, &value)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
