//! PokeTrack - Card Search, Price History & Watchlist
//!
//! Backend for the PokeTrack UI: searches a fixed card catalog, generates
//! mock price histories, and keeps a watchlist of card names in SQLite.

pub mod catalog;
pub mod config;
pub mod error;
pub mod price_history;
pub mod watchlist;
pub mod web;

pub use catalog::{Card, Catalog};
pub use config::ServerConfig;
pub use error::{Error, PokeTrackError, Result};
pub use price_history::{PriceHistory, PricePoint};
pub use watchlist::{init_schema, WatchlistEntry};
