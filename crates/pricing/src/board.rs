use crate::error::PricingError;
use core_types::{MAJOR_QUOTE_ASSETS, Market, Pair, PairKey, Tick, USD_STABLECOINS, is_usd_equivalent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Quote currencies accepted as a dollar leg, in lookup priority order:
/// the stablecoin pegs first, the dollar itself last. Direct and bridged
/// resolution both walk this list in order, so path selection is
/// deterministic for any snapshot.
fn usd_quote_candidates() -> impl Iterator<Item = &'static str> {
    USD_STABLECOINS
        .iter()
        .copied()
        .chain(std::iter::once("USD"))
}

/// A snapshot of the latest observed prices, keyed by pair and market.
///
/// The board is owned by the caller and immutable for the duration of a
/// resolution call; it performs no upstream refresh of its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceBoard {
    prices: HashMap<PairKey, Decimal>,
}

impl PriceBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_prices(prices: HashMap<PairKey, Decimal>) -> Self {
        Self { prices }
    }

    /// Builds a board from a ticker snapshot, taking each pair's last trade
    /// price.
    pub fn from_ticks(ticks: &HashMap<PairKey, Tick>) -> Self {
        Self {
            prices: core_types::ticks_to_prices(ticks),
        }
    }

    pub fn insert(&mut self, key: PairKey, price: Decimal) {
        self.prices.insert(key, price);
    }

    pub fn get(&self, key: &PairKey) -> Option<Decimal> {
        self.prices.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Resolves an asset's price in US dollars using at most two hops.
    ///
    /// 1. The dollar and its recognized stablecoin pegs are worth `1`.
    /// 2. Direct: the first `asset/candidate` quote found, candidates in
    ///    [`usd_quote_candidates`] order.
    /// 3. Bridged: for each bridge in [`MAJOR_QUOTE_ASSETS`] order, the
    ///    first `asset/bridge` quote combined with the first
    ///    `bridge/candidate` quote, multiplied through.
    ///
    /// Anything unreachable in two hops is an error; a missing price is
    /// never reported as zero.
    pub fn resolve_usd(&self, asset: &str, market: Market) -> Result<Decimal, PricingError> {
        let asset = asset.trim().to_ascii_uppercase();
        if is_usd_equivalent(&asset) {
            return Ok(Decimal::ONE);
        }

        for candidate in usd_quote_candidates() {
            if let Some(price) = self.lookup(&asset, candidate, market) {
                tracing::debug!(%asset, quote = candidate, %price, "resolved via direct quote");
                return Ok(price);
            }
        }

        for bridge in MAJOR_QUOTE_ASSETS {
            let Some(asset_bridge) = self.lookup(&asset, bridge, market) else {
                continue;
            };
            for candidate in usd_quote_candidates() {
                if let Some(bridge_usd) = self.lookup(bridge, candidate, market) {
                    let price = asset_bridge * bridge_usd;
                    tracing::debug!(
                        %asset,
                        %bridge,
                        quote = candidate,
                        %price,
                        "resolved via bridged quote"
                    );
                    return Ok(price);
                }
            }
        }

        Err(PricingError::NoPricePath { asset })
    }

    fn lookup(&self, base: &str, quote: &str, market: Market) -> Option<Decimal> {
        let pair = Pair::new(base, quote).ok()?;
        self.get(&pair.with_market(market))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn key(base: &str, quote: &str, market: Market) -> PairKey {
        Pair::new(base, quote).unwrap().with_market(market)
    }

    #[test]
    fn dollar_and_pegs_resolve_to_one() {
        let board = PriceBoard::new();
        assert_eq!(board.resolve_usd("USD", Market::Spot).unwrap(), dec!(1));
        assert_eq!(board.resolve_usd("USDT", Market::Spot).unwrap(), dec!(1));
        assert_eq!(board.resolve_usd("usdc", Market::Margin).unwrap(), dec!(1));
    }

    #[test]
    fn direct_peg_quote_resolves() {
        let mut board = PriceBoard::new();
        board.insert(key("BTC", "USDT", Market::Spot), dec!(5000));
        assert_eq!(board.resolve_usd("BTC", Market::Spot).unwrap(), dec!(5000));
    }

    #[test]
    fn direct_candidates_are_tried_in_priority_order() {
        let mut board = PriceBoard::new();
        board.insert(key("BTC", "USDC", Market::Spot), dec!(4999));
        board.insert(key("BTC", "USDT", Market::Spot), dec!(5000));
        // USDT precedes USDC in the candidate table.
        assert_eq!(board.resolve_usd("BTC", Market::Spot).unwrap(), dec!(5000));
    }

    #[test]
    fn bridged_quote_multiplies_through() {
        let mut board = PriceBoard::new();
        board.insert(key("LTC", "BTC", Market::Spot), dec!(0.01));
        board.insert(key("BTC", "USDT", Market::Spot), dec!(5000));
        assert_eq!(board.resolve_usd("LTC", Market::Spot).unwrap(), dec!(50));
    }

    #[test]
    fn bridges_are_tried_in_priority_order() {
        let mut board = PriceBoard::new();
        board.insert(key("ALT", "BTC", Market::Spot), dec!(2));
        board.insert(key("BTC", "USDT", Market::Spot), dec!(10));
        board.insert(key("ALT", "ETH", Market::Spot), dec!(3));
        board.insert(key("ETH", "USDT", Market::Spot), dec!(5));
        // BTC precedes ETH in the bridge table, so the BTC path wins.
        assert_eq!(board.resolve_usd("ALT", Market::Spot).unwrap(), dec!(20));
    }

    #[test]
    fn market_segments_do_not_mix() {
        let mut board = PriceBoard::new();
        board.insert(key("BTC", "USDT", Market::Margin), dec!(5000));
        assert!(board.resolve_usd("BTC", Market::Spot).is_err());
    }

    #[test]
    fn unresolvable_asset_names_itself() {
        let board = PriceBoard::new();
        let err = board.resolve_usd("XMR", Market::Spot).unwrap_err();
        assert_eq!(
            err,
            PricingError::NoPricePath {
                asset: "XMR".to_string()
            }
        );
        assert!(err.to_string().contains("XMR"));
    }

    #[test]
    fn board_builds_from_ticks() {
        let mut ticks = HashMap::new();
        ticks.insert(
            key("BTC", "USDT", Market::Spot),
            Tick {
                time: Utc::now(),
                last: dec!(5000),
                buy: dec!(4999),
                sell: dec!(5001),
                high: Decimal::ZERO,
                low: Decimal::ZERO,
                volume: Decimal::ZERO,
            },
        );
        let board = PriceBoard::from_ticks(&ticks);
        assert_eq!(board.resolve_usd("BTC", Market::Spot).unwrap(), dec!(5000));
    }
}
