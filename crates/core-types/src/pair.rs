use crate::assets;
use crate::enums::Market;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Delimiters venues are known to put between the two legs of a pair.
/// Tried in order when parsing a pair of unknown origin.
const COMMON_DELIMITERS: [&str; 9] = ["/", "-", "_", "|", "+", ":", "#", ",", "."];

/// Separator between the pair and its market qualifier in a [`PairKey`]
/// string, e.g. `BTC/USDT.spot`.
const PAIR_KEY_DELIMITER: char = '.';

/// How a venue renders a trading pair.
///
/// Most venues list base before quote (`iso_order = true`); a few, Bittrex
/// style, reverse the legs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairStyle {
    pub delimiter: String,
    pub iso_order: bool,
    pub upper_case: bool,
}

impl Default for PairStyle {
    fn default() -> Self {
        Self {
            delimiter: "/".to_string(),
            iso_order: true,
            upper_case: true,
        }
    }
}

/// A trading pair in canonical form: base (unit) currency first, quote
/// (pricing) currency second. `BTC/USDT = 5000` means one BTC costs 5000 USDT.
///
/// Both legs are stored uppercase and are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pair {
    base: String,
    quote: String,
}

impl Pair {
    pub fn new(base: &str, quote: &str) -> Result<Self, CoreError> {
        let base = base.trim().to_ascii_uppercase();
        let quote = quote.trim().to_ascii_uppercase();
        if base.is_empty() || quote.is_empty() {
            return Err(CoreError::InvalidPair(format!("{base}/{quote}")));
        }
        Ok(Self { base, quote })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Parses a pair string as a specific venue formats it.
    ///
    /// When the style names a delimiter, the string must split into exactly
    /// two legs on it. Delimiter-free symbols like `LTCBTC` are resolved
    /// against the known quote-asset tables, matched in fixed priority order
    /// at either end of the string.
    pub fn parse_with(s: &str, style: &PairStyle) -> Result<Self, CoreError> {
        let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if cleaned.is_empty() {
            return Err(CoreError::InvalidPair(s.to_string()));
        }
        let cleaned = cleaned.to_ascii_uppercase();

        let legs = if style.delimiter.is_empty() {
            split_on_known_quote(&cleaned)
        } else {
            split_on_delimiter(&cleaned, &style.delimiter)
                .or_else(|| split_on_known_quote(&cleaned))
        };

        let (first, second) = legs.ok_or_else(|| CoreError::InvalidPair(s.to_string()))?;
        if style.iso_order {
            Pair::new(&first, &second)
        } else {
            Pair::new(&second, &first)
        }
    }

    /// Renders the pair the way a specific venue expects it.
    pub fn format_with(&self, style: &PairStyle) -> String {
        let (first, second) = if style.iso_order {
            (self.base.as_str(), self.quote.as_str())
        } else {
            (self.quote.as_str(), self.base.as_str())
        };
        let joined = format!("{}{}{}", first, style.delimiter, second);
        if style.upper_case {
            joined.to_ascii_uppercase()
        } else {
            joined.to_ascii_lowercase()
        }
    }

    /// Attaches a market qualifier, producing the key used by price snapshots.
    pub fn with_market(&self, market: Market) -> PairKey {
        PairKey {
            pair: self.clone(),
            market,
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for Pair {
    type Err = CoreError;

    /// Parses a pair of unknown origin: tries every common delimiter, then
    /// falls back to quote-asset recognition for delimiter-free symbols.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let cleaned = cleaned.to_ascii_uppercase();
        for delimiter in COMMON_DELIMITERS {
            if let Some((first, second)) = split_on_delimiter(&cleaned, delimiter) {
                return Pair::new(&first, &second);
            }
        }
        if let Some((first, second)) = split_on_known_quote(&cleaned) {
            return Pair::new(&first, &second);
        }
        Err(CoreError::InvalidPair(s.to_string()))
    }
}

impl TryFrom<String> for Pair {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Pair> for String {
    fn from(pair: Pair) -> Self {
        pair.to_string()
    }
}

fn split_on_delimiter(s: &str, delimiter: &str) -> Option<(String, String)> {
    let (first, second) = s.split_once(delimiter)?;
    if first.is_empty() || second.is_empty() || second.contains(delimiter) {
        return None;
    }
    Some((first.to_string(), second.to_string()))
}

/// Splits a delimiter-free symbol by recognizing a known quote asset at the
/// head or the tail, in the fixed candidate priority order. The leftover leg
/// must itself look like a symbol, so `BTC/` cannot resolve as `BTC` + `/`.
fn split_on_known_quote(s: &str) -> Option<(String, String)> {
    let is_symbol = |leg: &str| !leg.is_empty() && leg.chars().all(|c| c.is_ascii_alphanumeric());
    for candidate in assets::quote_leg_candidates() {
        if let Some(rest) = s.strip_prefix(candidate) {
            if is_symbol(rest) {
                return Some((candidate.to_string(), rest.to_string()));
            }
        }
        if let Some(rest) = s.strip_suffix(candidate) {
            if is_symbol(rest) {
                return Some((rest.to_string(), candidate.to_string()));
            }
        }
    }
    None
}

/// A pair qualified by the market segment it trades in: the key type of
/// known-price snapshots. Serialized as `BASE/QUOTE.market` so it can be a
/// JSON map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PairKey {
    pub pair: Pair,
    pub market: Market,
}

impl PairKey {
    pub fn new(pair: Pair, market: Market) -> Self {
        Self { pair, market }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pair, PAIR_KEY_DELIMITER, self.market)
    }
}

impl FromStr for PairKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pair_part, market_part) = s
            .rsplit_once(PAIR_KEY_DELIMITER)
            .ok_or_else(|| CoreError::InvalidPair(s.to_string()))?;
        Ok(Self {
            pair: pair_part.parse()?,
            market: market_part.parse()?,
        })
    }
}

impl TryFrom<String> for PairKey {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PairKey> for String {
    fn from(key: PairKey) -> Self {
        key.to_string()
    }
}
