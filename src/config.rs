//! Server configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Origins of the Vite dev server the frontend runs on
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:5174"];

pub const DEFAULT_PORT: u16 = 8000;

/// Upper bound for the `days` query parameter of price history requests
pub const DEFAULT_MAX_DAYS: usize = 365;

/// Settings consumed by the web server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub allowed_origins: Vec<String>,
    pub max_days: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
            max_days: DEFAULT_MAX_DAYS,
        }
    }
}

/// Returns the default database path: ~/.local/share/poketrack/poketrack.db
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("poketrack")
        .join("poketrack.db")
}
