use clap::{ArgAction, Parser, Subcommand};
use watch_state_models::MediaType;
use watchroom_config::{Config, PathManager};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "watchroom")]
#[command(about = "Watchroom - track what you watch and play it without the junk")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to the log file instead of stderr
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    log_to_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the watchlist
    List,

    /// Save a title to the watchlist
    Add {
        /// Catalog id of the title
        #[arg(long)]
        id: u64,

        /// movie or tv
        #[arg(long = "type", value_name = "TYPE")]
        media_type: MediaType,

        /// Title to record; looked up in the catalog when omitted
        #[arg(long)]
        title: Option<String>,
    },

    /// Remove a title from the watchlist
    Remove {
        #[arg(long)]
        id: u64,

        /// movie or tv
        #[arg(long = "type", value_name = "TYPE")]
        media_type: MediaType,
    },

    /// Show the continue-watching shelf
    Watching,

    /// Record playback progress for a title
    Resume {
        #[arg(long)]
        id: u64,

        /// movie or tv
        #[arg(long = "type", value_name = "TYPE")]
        media_type: MediaType,

        /// Percent watched, 0-100
        #[arg(long)]
        progress: u8,

        /// Title to record; taken from the shelf or the catalog when omitted
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        season: Option<u32>,

        #[arg(long)]
        episode: Option<u32>,
    },

    /// Search the catalog
    Search {
        query: String,
    },

    /// Show trending titles
    Trending {
        /// movie or tv
        #[arg(long = "type", value_name = "TYPE", default_value = "movie")]
        media_type: MediaType,

        /// Use the daily trending window instead of weekly
        #[arg(long, action = ArgAction::SetTrue)]
        day: bool,
    },

    /// Load a title in the guarded playback surface
    Play {
        #[arg(long)]
        id: u64,

        /// movie or tv
        #[arg(long = "type", value_name = "TYPE")]
        media_type: MediaType,

        #[arg(long)]
        season: Option<u32>,

        #[arg(long)]
        episode: Option<u32>,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show,

    /// Store the catalog API key
    SetKey {
        key: String,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let paths = PathManager::default();
    paths
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("{:#}", e))?;

    let log_file = cli.log_to_file.then(|| paths.log_file());
    logging::init_logging(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{:#}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let config = Config::load_or_default(&paths.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("{:#}", e))?;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("{:#}", e))?;

    match cli.command {
        Commands::List => commands::library::run_list(&paths, &output).await,
        Commands::Add {
            id,
            media_type,
            title,
        } => commands::library::run_add(&paths, &config, &output, id, media_type, title).await,
        Commands::Remove { id, media_type } => {
            commands::library::run_remove(&paths, &output, id, media_type).await
        }
        Commands::Watching => commands::library::run_watching(&paths, &output).await,
        Commands::Resume {
            id,
            media_type,
            progress,
            title,
            season,
            episode,
        } => {
            commands::library::run_resume(
                &paths, &config, &output, id, media_type, progress, title, season, episode,
            )
            .await
        }
        Commands::Search { query } => commands::catalog::run_search(&config, &output, &query).await,
        Commands::Trending { media_type, day } => {
            commands::catalog::run_trending(&config, &output, media_type, day).await
        }
        Commands::Play {
            id,
            media_type,
            season,
            episode,
        } => commands::play::run_play(&paths, &config, &output, id, media_type, season, episode).await,
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show => commands::config::run_show(&config, &output),
            ConfigCommands::SetKey { key } => commands::config::run_set_key(&paths, &output, key),
        },
    }
}
