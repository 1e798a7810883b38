use crate::error::DepthError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One resting offer in the book: `quantity` units of the base asset at
/// `price` quote units each. Both fields must be non-negative; a level with
/// zero quantity carries no liquidity and is skipped by traversal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub price: Decimal,
    pub quantity: Decimal,
}

impl Level {
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        Self { price, quantity }
    }
}

/// Which side of the book a ladder represents. The side fixes the canonical
/// traversal order: asks ascending (cheapest offer first), bids descending
/// (highest bid first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    Ask,
    Bid,
}

impl fmt::Display for BookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookSide::Ask => f.write_str("ask"),
            BookSide::Bid => f.write_str("bid"),
        }
    }
}

/// One side of an order book: an ordered sequence of price levels.
///
/// Raw venue feeds may deliver levels in any order; [`Ladder::sort`] restores
/// the side's canonical direction. The simulator sorts a working copy on
/// entry, so callers are not required to sort first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ladder {
    side: BookSide,
    levels: Vec<Level>,
}

impl Ladder {
    pub fn new(side: BookSide, levels: Vec<Level>) -> Self {
        Self { side, levels }
    }

    pub fn empty(side: BookSide) -> Self {
        Self {
            side,
            levels: Vec::new(),
        }
    }

    pub fn side(&self) -> BookSide {
        self.side
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn push(&mut self, level: Level) {
        self.levels.push(level);
    }

    /// Reorders the levels into the side's canonical direction. Stable with
    /// respect to equal prices.
    pub fn sort(&mut self) {
        match self.side {
            BookSide::Ask => self.levels.sort_by(|a, b| a.price.cmp(&b.price)),
            BookSide::Bid => self.levels.sort_by(|a, b| b.price.cmp(&a.price)),
        }
    }

    /// The first level's price. Meaningful as the best price only once the
    /// ladder is in canonical order.
    pub fn best_price(&self) -> Option<Decimal> {
        self.levels.first().map(|level| level.price)
    }

    /// Rejects malformed levels before any traversal touches them.
    pub fn validate(&self) -> Result<(), DepthError> {
        for level in &self.levels {
            if level.price.is_sign_negative() {
                return Err(DepthError::NegativePrice {
                    side: self.side,
                    price: level.price,
                });
            }
            if level.quantity.is_sign_negative() {
                return Err(DepthError::NegativeQuantity {
                    side: self.side,
                    quantity: level.quantity,
                });
            }
        }
        Ok(())
    }
}

/// A point-in-time order book snapshot for one pair on one venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDepth", into = "RawDepth")]
pub struct Depth {
    pub time: DateTime<Utc>,
    pub asks: Ladder,
    pub bids: Ladder,
}

impl Depth {
    pub fn new(time: DateTime<Utc>, asks: Vec<Level>, bids: Vec<Level>) -> Self {
        Self {
            time,
            asks: Ladder::new(BookSide::Ask, asks),
            bids: Ladder::new(BookSide::Bid, bids),
        }
    }

    /// Sorts both sides into canonical order.
    pub fn sort(&mut self) {
        self.asks.sort();
        self.bids.sort();
    }

    pub fn validate(&self) -> Result<(), DepthError> {
        self.asks.validate()?;
        self.bids.validate()
    }
}

/// Wire shape of a depth snapshot: two plain level arrays. The ladder sides
/// are implied by the field names and restored on deserialization.
#[derive(Serialize, Deserialize)]
struct RawDepth {
    time: DateTime<Utc>,
    asks: Vec<Level>,
    bids: Vec<Level>,
}

impl From<RawDepth> for Depth {
    fn from(raw: RawDepth) -> Self {
        Depth::new(raw.time, raw.asks, raw.bids)
    }
}

impl From<Depth> for RawDepth {
    fn from(depth: Depth) -> Self {
        RawDepth {
            time: depth.time,
            asks: depth.asks.levels,
            bids: depth.bids.levels,
        }
    }
}
