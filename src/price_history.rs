//! Mock price history generator
//!
//! Produces a deterministic synthetic price series for a card name: a base
//! price derived from the name, a weekly wave and a slight upward drift.

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

/// Default number of days in a generated history
pub const DEFAULT_DAYS: usize = 14;

/// Longest history `generate` will produce; larger requests are truncated
pub const MAX_DAYS: usize = 36_500;

/// Currency all generated prices are quoted in
pub const CURRENCY: &str = "USD";

/// One (date, price) sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Generated price history for a card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceHistory {
    pub card_name: String,
    pub currency: String,
    pub points: Vec<PricePoint>,
    pub latest_price: f64,
    pub percent_change_7d: f64,
}

/// Round to 2 decimal places (half away from zero)
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Base price for a name: 10 + (sum of lowercase code points mod 40), in [10, 49]
fn base_price(name: &str) -> f64 {
    let sum: u64 = name.to_lowercase().chars().map(|c| c as u64).sum();
    (10 + sum % 40) as f64
}

/// Generate the history ending at today's local date
pub fn generate_today(card_name: &str, days: usize) -> PriceHistory {
    generate(card_name, days, Local::now().date_naive())
}

/// Generate a price history of `days` points ending at `today`
///
/// A blank name yields an empty history. `card_name` is echoed back as given.
/// `days` is capped at [`MAX_DAYS`]; dates before the earliest representable
/// calendar date are skipped.
pub fn generate(card_name: &str, days: usize, today: NaiveDate) -> PriceHistory {
    let name = card_name.trim();
    if name.is_empty() {
        return PriceHistory {
            card_name: card_name.to_string(),
            currency: CURRENCY.to_string(),
            points: Vec::new(),
            latest_price: 0.0,
            percent_change_7d: 0.0,
        };
    }

    let base = base_price(name);
    let days = days.min(MAX_DAYS);
    let points: Vec<PricePoint> = (0..days)
        .filter_map(|i| {
            let date = today.checked_sub_days(Days::new((days - 1 - i) as u64))?;
            let wave = ((i % 7) as f64 - 3.0) * 0.35;
            let drift = i as f64 * 0.08;
            Some(PricePoint {
                date,
                price: round2(base + wave + drift),
            })
        })
        .collect();

    let latest = points.last().map(|p| p.price).unwrap_or(0.0);

    // Compare against the point seven days before the latest one
    let pct = match points.len().checked_sub(8).map(|idx| points[idx].price) {
        Some(old) if old != 0.0 => (latest - old) / old * 100.0,
        _ => 0.0,
    };

    PriceHistory {
        card_name: card_name.to_string(),
        currency: CURRENCY.to_string(),
        points,
        latest_price: round2(latest),
        percent_change_7d: round2(pct),
    }
}
