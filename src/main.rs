mod cli;

use flixbridge::{
    config::{self, Config},
    pipeline::{EpisodeQuery, MovieQuery, Resolver},
    server,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn resolver(config: &Config) -> Result<Resolver> {
    let resolver = Resolver::from_config(config).context("Failed to build HTTP client")?;
    if !resolver.tmdb().is_available() {
        tracing::warn!("No TMDB API key set; pass --tmdb-api-key or set TMDB_API_KEY");
    }
    Ok(resolver)
}

fn load(config_path: Option<&Path>, api_key: Option<String>) -> Result<Config> {
    let mut config = config::load_config_or_default(config_path)?;
    if let Some(key) = api_key {
        config.tmdb.api_key = key;
    }
    Ok(config)
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    mut config: Config,
) -> Result<()> {
    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting flixbridge");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "flixbridge=trace,tower_http=debug".to_string()
        } else {
            "flixbridge=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let config = load(cli.config.as_deref(), cli.tmdb_api_key)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, config))
        }
        Commands::Movie { tmdb_id } => {
            let config = load(cli.config.as_deref(), cli.tmdb_api_key)?;
            let query = MovieQuery {
                tmdb_id: Some(tmdb_id),
            };
            let rt = tokio::runtime::Runtime::new()?;
            let resolver = resolver(&config)?;
            let payload = rt.block_on(resolver.resolve_movie(&query))?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
        Commands::Tv {
            tmdb_id,
            season,
            episode,
        } => {
            let config = load(cli.config.as_deref(), cli.tmdb_api_key)?;
            let query = EpisodeQuery {
                tmdb_id: Some(tmdb_id),
                s: Some(season),
                e: Some(episode),
            };
            let rt = tokio::runtime::Runtime::new()?;
            let resolver = resolver(&config)?;
            let payload = rt.block_on(resolver.resolve_episode(&query))?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("flixbridge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            print_summary(&Config::default());
        }
    }

    Ok(())
}

fn print_summary(config: &Config) {
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  TMDB: {}", config.tmdb.base_url);
    println!(
        "  TMDB API key: {}",
        if config.tmdb.api_key.is_empty() {
            "not set"
        } else {
            "set"
        }
    );
    println!(
        "  Streams: {} (server {})",
        config.streams.base_url, config.streams.server
    );
    println!("  Skip times: {}", config.skiptimes.base_url);
    println!(
        "  Retry: {} attempts, {} ms delay{}",
        config.retry.attempts,
        config.retry.delay_ms,
        if config.retry.delay_on_status {
            ", also after bad status"
        } else {
            ""
        }
    );
    println!(
        "  Allowed domains: {}",
        if config.server.allowed_domains.is_empty() {
            "any".to_string()
        } else {
            config.server.allowed_domains.join(", ")
        }
    );
}
