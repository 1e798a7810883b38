use crate::pair::PairKey;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A ticker snapshot for one pair.
///
/// Some venues return only `time` and `last`; the remaining fields default
/// to zero in that case rather than being modeled as optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub time: DateTime<Utc>,
    /// Latest traded price.
    pub last: Decimal,
    /// Best bid.
    #[serde(default)]
    pub buy: Decimal,
    /// Best ask.
    #[serde(default)]
    pub sell: Decimal,
    #[serde(default)]
    pub high: Decimal,
    #[serde(default)]
    pub low: Decimal,
    /// Trailing 24h volume.
    #[serde(default)]
    pub volume: Decimal,
}

/// Collapses a ticker snapshot into the last-trade price per pair, the form
/// the price discovery resolver consumes.
pub fn ticks_to_prices(ticks: &HashMap<PairKey, Tick>) -> HashMap<PairKey, Decimal> {
    ticks
        .iter()
        .map(|(key, tick)| (key.clone(), tick.last))
        .collect()
}
