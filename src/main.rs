use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use roadbook::app::{App, ERROR_MARKUP};
use roadbook::config::loader::{read_config, ConfigError};
use roadbook::config::validation::validate_config;
use roadbook::config::{AppConfig, SourceKind};
use roadbook::data::Category;
use roadbook::http::HttpServer;
use roadbook::lifecycle::terminate_signal;
use roadbook::observability::logging;
use roadbook::routing::{Dispatch, HashLocation};

#[derive(Parser)]
#[command(name = "roadbook")]
#[command(about = "Motorhome travel knowledge library: render views, search and serve the dataset", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory dataset paths are resolved against
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    /// Fetch datasets over HTTP from this base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a fragment (e.g. `guide/guide-010-005?lang=he`) and print the markup
    Render { fragment: String },
    /// Search locations plus any preloaded categories
    Search {
        query: String,
        /// Extra categories to load before searching
        #[arg(long, value_delimiter = ',')]
        preload: Vec<Category>,
    },
    /// Print item counts
    Stats,
    /// Serve views and the JSON API over HTTP
    Serve,
}

fn resolve_config(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(root) = &cli.data_root {
        config.data.root = root.to_string_lossy().into_owned();
    }
    if let Some(base_url) = &cli.base_url {
        config.data.base_url = base_url.clone();
        config.data.source = SourceKind::Http;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    logging::init(&config.observability);

    tracing::debug!(source = ?config.data.source, root = %config.data.root, "Configuration loaded");

    match cli.command {
        Commands::Render { fragment } => {
            let app = App::builder()
                .config(config)
                .location(HashLocation::new(&fragment))
                .build()?;
            let outcome = app.start().await;
            let html = app.container().html();
            println!("{html}");
            if outcome == Dispatch::Ignored || html == ERROR_MARKUP {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Search { query, preload } => {
            let min_chars = config.search.min_query_chars;
            let app = App::builder().config(config).build()?;
            let loader = app.loader();

            let mut categories = vec![Category::Locations];
            categories.extend(preload);
            loader.preload(&categories).await?;

            let results = if query.trim().chars().count() < min_chars {
                Vec::new()
            } else {
                loader.search(query.trim()).await?
            };
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Stats => {
            let app = App::builder().config(config).build()?;
            let stats = app.loader().stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Serve => {
            let bind_address = config.server.bind_address.clone();
            let app = App::builder().config(config).build()?;
            if let Err(error) = app.loader().preload(&[Category::Locations]).await {
                tracing::warn!(error = %error, "Failed to preload locations");
            }

            let listener = TcpListener::bind(&bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");

            HttpServer::new(&app).run(listener, terminate_signal()).await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(ExitCode::SUCCESS)
}
