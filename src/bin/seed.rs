//! Resets the database and fills it from the built-in fixture or a
//! MovieLens export.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use movie_swipe_api::{
    config::Config,
    db::Store,
    seed::{self, BcryptHasher, ImportSources},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Wipe the movie database and populate it")]
struct Cli {
    /// Database URL (overrides DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the demo user and the fixture catalog
    Fixture,

    /// Import a MovieLens CSV export
    Movielens {
        /// Directory holding movies.csv, links.csv and ratings.csv
        #[arg(long, conflicts_with_all = ["movies", "links", "ratings"])]
        dir: Option<PathBuf>,

        /// Path to movies.csv
        #[arg(long, requires_all = ["links", "ratings"])]
        movies: Option<PathBuf>,

        /// Path to links.csv
        #[arg(long, requires_all = ["movies", "ratings"])]
        links: Option<PathBuf>,

        /// Path to ratings.csv
        #[arg(long, requires_all = ["movies", "links"])]
        ratings: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let store = Store::connect(&config.database_url).await?;
    store.initialize_schema().await?;
    let hasher = BcryptHasher::new(config.bcrypt_cost);

    let result = run(&store, &config, &hasher, cli.command).await;
    store.close().await;
    result
}

async fn run(
    store: &Store,
    config: &Config,
    hasher: &BcryptHasher,
    command: Commands,
) -> anyhow::Result<()> {
    match command {
        Commands::Fixture => {
            let summary = seed::seed_fixture(store, hasher).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Movielens {
            dir,
            movies,
            links,
            ratings,
        } => {
            let sources = match (dir, movies, links, ratings) {
                (Some(dir), _, _, _) => ImportSources::open_dir(&dir)?,
                (None, Some(movies), Some(links), Some(ratings)) => {
                    ImportSources::open(&movies, &links, &ratings)?
                }
                _ => anyhow::bail!("pass either --dir or all of --movies, --links and --ratings"),
            };
            let summary =
                seed::seed_from_import(store, sources, hasher, &config.import_password).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
