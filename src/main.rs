//! PokeTrack API server
//!
//! Serves card search, mock price history and the watchlist over HTTP.

use clap::builder::RangedU64ValueParser;
use clap::Parser;
use poketrack::config::{default_db_path, ServerConfig, DEFAULT_MAX_DAYS, DEFAULT_PORT};
use poketrack::price_history::MAX_DAYS;
use poketrack::{init_schema, watchlist, Catalog};
use rusqlite::Connection;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// PokeTrack API server - card search, price history and watchlist
#[derive(Parser, Debug)]
#[command(name = "poketrack")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value_t = default_db_path().to_string_lossy().to_string())]
    database: String,

    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Allowed CORS origin (repeat for several; defaults to the Vite dev server)
    #[arg(long = "allowed-origin")]
    allowed_origins: Vec<String>,

    /// JSON file with the card catalog (defaults to the built-in cards)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Maximum number of days a price history request may ask for
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_DAYS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_DAYS as u64)
    )]
    max_days: usize,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            allowed_origins: if self.allowed_origins.is_empty() {
                defaults.allowed_origins
            } else {
                self.allowed_origins.clone()
            },
            max_days: self.max_days,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let db_path = PathBuf::from(&args.database);

    log::info!("Starting poketrack...");
    log::info!("Database path: {}", db_path.display());

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create database directory: {}", e);
                std::process::exit(1);
            }
            log::info!("Created directory: {}", parent.display());
        }
    }

    let conn = match Connection::open(&db_path) {
        Ok(conn) => conn,
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_schema(&conn) {
        log::error!("Failed to initialize database schema: {}", e);
        std::process::exit(1);
    }

    match watchlist::count(&conn) {
        Ok(n) => log::info!("Watchlist contains {} card(s)", n),
        Err(e) => log::warn!("Failed to count watchlist entries: {}", e),
    }

    let catalog = match &args.catalog {
        Some(path) => match Catalog::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Failed to load catalog {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Catalog::builtin(),
    };
    log::info!("Card catalog: {} cards", catalog.len());

    let config = args.server_config();
    let db = Arc::new(Mutex::new(conn));

    if let Err(e) = poketrack::web::serve(db, Arc::new(catalog), &config).await {
        log::error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
