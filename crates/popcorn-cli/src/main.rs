use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, config, search, show, watched};
use popcorn_config::PathManager;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "usepopcorn")]
#[command(about = "usePopcorn - Find movies, rate them, and keep track of what you've watched")]
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

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog by title
    Search {
        /// Title to search for (at least 3 characters)
        query: String,
    },
    /// Show details for one movie
    #[command(long_about = "Load the details for a movie by IMDb ID. With --rate the movie is added to your watched list with that rating.")]
    Show {
        /// IMDb ID, e.g. tt0133093
        id: String,

        /// Rate the movie (1-10) and add it to the watched list
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        rate: Option<u8>,
    },
    /// Inspect or edit the watched list
    Watched {
        #[command(subcommand)]
        cmd: Option<WatchedCommands>,
    },
    /// Interactive search, rate and add
    #[command(long_about = "Interactive browser: search, pick a result, read the details, rate it and add it to your watched list. Press Esc in the detail view to close it and Enter to start a new search.")]
    Browse {
        /// Initial search query
        query: Option<String>,
    },
    /// View or change configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum WatchedCommands {
    /// List watched movies with the summary
    List,
    /// Show averages only
    Summary,
    /// Remove a movie from the list
    Remove {
        /// IMDb ID of the entry to remove
        id: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Print the config, data and log locations
    Path,
    /// Store the OMDb API key in the credentials file
    SetApiKey {
        /// API key (prompted for when omitted)
        key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // The browser owns the terminal, so its logs go to a file
    let log_file = match cli.command {
        Commands::Browse { .. } => Some(PathManager::default().log_file()),
        _ => None,
    };
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Search { query } => search::run_search(query, &output).await,
        Commands::Show { id, rate } => show::run_show(id, rate, &output).await,
        Commands::Watched { cmd } => match cmd.unwrap_or(WatchedCommands::List) {
            WatchedCommands::List => watched::run_list(&output),
            WatchedCommands::Summary => watched::run_summary(&output),
            WatchedCommands::Remove { id } => watched::run_remove(id, &output),
        },
        Commands::Browse { query } => browse::run_browse(query, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output),
    }
}
