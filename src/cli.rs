use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flixbridge")]
#[command(author, version, about = "Resolve TMDB IDs to streaming sources")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TMDB API key (overrides the config file)
    #[arg(long, global = true, env = "TMDB_API_KEY", hide_env_values = true)]
    pub tmdb_api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Start {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Resolve a movie once and print the playback JSON
    Movie {
        /// TMDB movie ID
        tmdb_id: String,
    },

    /// Resolve a TV episode once and print the playback JSON
    Tv {
        /// TMDB show ID
        tmdb_id: String,

        /// Season number
        season: String,

        /// Episode number
        episode: String,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
