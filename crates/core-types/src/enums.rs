use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The market segment a quote or balance belongs to.
///
/// Spot and margin share the same pair universe; futures and perpetual swaps
/// are listed separately by every venue we support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Spot,
    Margin,
    Future,
    Perp,
}

impl Market {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Spot => "spot",
            Market::Margin => "margin",
            Market::Future => "future",
            Market::Perp => "perp",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spot" => Ok(Market::Spot),
            "margin" => Ok(Market::Margin),
            "future" => Ok(Market::Future),
            "perp" => Ok(Market::Perp),
            other => Err(CoreError::UnknownMarket(other.to_string())),
        }
    }
}

/// A supported trading venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Binance,
    Coinbase,
    Bitfinex,
    Bitstamp,
    Kraken,
    Bittrex,
    Gemini,
}

impl Venue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Venue::Binance => "binance",
            Venue::Coinbase => "coinbase",
            Venue::Bitfinex => "bitfinex",
            Venue::Bitstamp => "bitstamp",
            Venue::Kraken => "kraken",
            Venue::Bittrex => "bittrex",
            Venue::Gemini => "gemini",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Venue {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binance" => Ok(Venue::Binance),
            "coinbase" => Ok(Venue::Coinbase),
            "bitfinex" => Ok(Venue::Bitfinex),
            "bitstamp" => Ok(Venue::Bitstamp),
            "kraken" => Ok(Venue::Kraken),
            "bittrex" => Ok(Venue::Bittrex),
            "gemini" => Ok(Venue::Gemini),
            other => Err(CoreError::UnknownVenue(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_round_trips_through_str() {
        for market in [Market::Spot, Market::Margin, Market::Future, Market::Perp] {
            assert_eq!(market.to_string().parse::<Market>().unwrap(), market);
        }
    }

    #[test]
    fn market_parse_is_case_insensitive() {
        assert_eq!("SPOT".parse::<Market>().unwrap(), Market::Spot);
        assert_eq!("Margin".parse::<Market>().unwrap(), Market::Margin);
    }

    #[test]
    fn unknown_market_is_rejected() {
        assert!("options".parse::<Market>().is_err());
    }

    #[test]
    fn venue_parse_is_case_insensitive() {
        assert_eq!("Binance".parse::<Venue>().unwrap(), Venue::Binance);
        assert_eq!("KRAKEN".parse::<Venue>().unwrap(), Venue::Kraken);
        assert!("nyse".parse::<Venue>().is_err());
    }
}
