//! Card catalog
//!
//! A fixed list of known cards, built once at startup and shared read-only
//! with the request handlers.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A card known to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub set: String,
    pub rarity: String,
}

impl Card {
    pub fn new(name: &str, set: &str, rarity: &str) -> Self {
        Self {
            name: name.to_string(),
            set: set.to_string(),
            rarity: rarity.to_string(),
        }
    }
}

/// Immutable card catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    cards: Vec<Card>,
}

impl Catalog {
    /// The built-in catalog shipped with the server
    pub fn builtin() -> Self {
        Self::from_cards(vec![
            Card::new("Pikachu", "Base Set", "Common"),
            Card::new("Charizard", "Base Set", "Rare"),
            Card::new("Gengar", "Fossil", "Rare"),
        ])
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Load a catalog from a JSON file containing an array of cards
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let cards: Vec<Card> = serde_json::from_str(&contents)?;
        log::info!("Loaded {} cards from {}", cards.len(), path.display());
        Ok(Self::from_cards(cards))
    }

    /// Case-insensitive substring search by card name
    ///
    /// The query is trimmed first; an empty query matches nothing.
    /// Results keep catalog order.
    pub fn search(&self, query: &str) -> Vec<Card> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }

        self.cards
            .iter()
            .filter(|card| card.name.to_lowercase().contains(&q))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
