use crate::error::PortfolioError;
use core_types::Market;
use pricing::PriceBoard;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One asset's amounts within a single ledger.
///
/// `total = free + locked`; `net` additionally subtracts margin debt.
/// `borrowed` and `interest` are only ever non-zero in the margin ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(default)]
    pub free: Decimal,
    #[serde(default)]
    pub locked: Decimal,
    #[serde(default)]
    pub borrowed: Decimal,
    #[serde(default)]
    pub interest: Decimal,
}

impl Balance {
    /// The amount usable for new orders or transfers.
    pub fn available(&self) -> Decimal {
        self.free
    }

    pub fn total(&self) -> Decimal {
        self.free + self.locked
    }

    pub fn net(&self) -> Decimal {
        self.free + self.locked - self.borrowed - self.interest
    }

    pub fn to_repay(&self) -> Decimal {
        self.borrowed + self.interest
    }

    pub fn is_zero(&self) -> bool {
        self.free.is_zero()
            && self.locked.is_zero()
            && self.borrowed.is_zero()
            && self.interest.is_zero()
    }

    /// Adds another balance into this one, field by field.
    pub fn merge(&mut self, other: &Balance) {
        self.free += other.free;
        self.locked += other.locked;
        self.borrowed += other.borrowed;
        self.interest += other.interest;
    }
}

/// The state of one trading account: per-asset balances in the spot and
/// margin ledgers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub spot: HashMap<String, Balance>,
    #[serde(default)]
    pub margin: HashMap<String, Balance>,
}

impl Account {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_spot(&mut self, asset: &str, free: Decimal, locked: Decimal) {
        self.spot.insert(
            asset.to_ascii_uppercase(),
            Balance {
                free,
                locked,
                ..Balance::default()
            },
        );
    }

    pub fn set_margin(&mut self, asset: &str, free: Decimal, locked: Decimal, borrowed: Decimal) {
        self.margin.insert(
            asset.to_ascii_uppercase(),
            Balance {
                free,
                locked,
                borrowed,
                ..Balance::default()
            },
        );
    }

    pub fn asset_in_spot(&self, asset: &str) -> Balance {
        self.spot
            .get(&asset.to_ascii_uppercase())
            .cloned()
            .unwrap_or_default()
    }

    pub fn asset_in_margin(&self, asset: &str) -> Balance {
        self.margin
            .get(&asset.to_ascii_uppercase())
            .cloned()
            .unwrap_or_default()
    }

    /// The asset's combined balance across both ledgers.
    pub fn asset_in_total(&self, asset: &str) -> Balance {
        let mut combined = self.asset_in_spot(asset);
        combined.merge(&self.asset_in_margin(asset));
        combined
    }

    /// Moves free funds from the spot ledger to the margin ledger.
    pub fn transfer_to_margin(&mut self, asset: &str, amount: Decimal) -> Result<(), PortfolioError> {
        let asset = asset.to_ascii_uppercase();
        let available = self.asset_in_spot(&asset).available();
        if available < amount {
            return Err(PortfolioError::InsufficientFunds {
                asset,
                requested: amount,
                available,
            });
        }
        self.spot.entry(asset.clone()).or_default().free -= amount;
        self.margin.entry(asset).or_default().free += amount;
        Ok(())
    }

    /// Moves free funds from the margin ledger back to the spot ledger.
    pub fn transfer_to_spot(&mut self, asset: &str, amount: Decimal) -> Result<(), PortfolioError> {
        let asset = asset.to_ascii_uppercase();
        let available = self.asset_in_margin(&asset).available();
        if available < amount {
            return Err(PortfolioError::InsufficientFunds {
                asset,
                requested: amount,
                available,
            });
        }
        self.margin.entry(asset.clone()).or_default().free -= amount;
        self.spot.entry(asset).or_default().free += amount;
        Ok(())
    }

    /// Merges another account's balances into this one.
    pub fn join(&mut self, other: &Account) {
        for (asset, balance) in &other.spot {
            self.spot.entry(asset.clone()).or_default().merge(balance);
        }
        for (asset, balance) in &other.margin {
            self.margin.entry(asset.clone()).or_default().merge(balance);
        }
    }

    /// Values the whole account in US dollars against a price snapshot.
    ///
    /// Every held asset must resolve; a missing price path fails the whole
    /// valuation instead of contributing a silent zero to the total.
    pub fn total_in_usd(&self, board: &PriceBoard) -> Result<Balance, PortfolioError> {
        let mut total = Balance::default();

        for (asset, balance) in &self.spot {
            let price = board.resolve_usd(asset, Market::Spot)?;
            total.free += balance.free * price;
            total.locked += balance.locked * price;
        }

        for (asset, balance) in &self.margin {
            let price = board.resolve_usd(asset, Market::Margin)?;
            total.free += balance.free * price;
            total.locked += balance.locked * price;
            total.borrowed += balance.borrowed * price;
            total.interest += balance.interest * price;
        }

        tracing::debug!(net = %total.net(), "account valued in USD");
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Pair;
    use pricing::PricingError;
    use rust_decimal_macros::dec;

    fn board() -> PriceBoard {
        let mut board = PriceBoard::new();
        board.insert(
            Pair::new("BTC", "USDT").unwrap().with_market(Market::Spot),
            dec!(5000),
        );
        board.insert(
            Pair::new("BTC", "USDT").unwrap().with_market(Market::Margin),
            dec!(5000),
        );
        board
    }

    #[test]
    fn balance_arithmetic() {
        let balance = Balance {
            free: dec!(3),
            locked: dec!(2),
            borrowed: dec!(1),
            interest: dec!(0.5),
        };
        assert_eq!(balance.total(), dec!(5));
        assert_eq!(balance.net(), dec!(3.5));
        assert_eq!(balance.to_repay(), dec!(1.5));
        assert_eq!(balance.available(), dec!(3));
        assert!(!balance.is_zero());
        assert!(Balance::default().is_zero());
    }

    #[test]
    fn asset_in_total_combines_ledgers() {
        let mut account = Account::new();
        account.set_spot("BTC", dec!(1), dec!(0.5));
        account.set_margin("BTC", dec!(2), dec!(0), dec!(1));

        let combined = account.asset_in_total("BTC");
        assert_eq!(combined.free, dec!(3));
        assert_eq!(combined.locked, dec!(0.5));
        assert_eq!(combined.borrowed, dec!(1));
    }

    #[test]
    fn transfers_move_free_funds_between_ledgers() {
        let mut account = Account::new();
        account.set_spot("USDT", dec!(100), dec!(0));

        account.transfer_to_margin("USDT", dec!(40)).unwrap();
        assert_eq!(account.asset_in_spot("USDT").free, dec!(60));
        assert_eq!(account.asset_in_margin("USDT").free, dec!(40));

        account.transfer_to_spot("USDT", dec!(10)).unwrap();
        assert_eq!(account.asset_in_spot("USDT").free, dec!(70));
        assert_eq!(account.asset_in_margin("USDT").free, dec!(30));
    }

    #[test]
    fn overdrawn_transfer_is_rejected() {
        let mut account = Account::new();
        account.set_spot("USDT", dec!(5), dec!(100));

        // Locked funds are not transferable.
        let err = account.transfer_to_margin("USDT", dec!(10)).unwrap_err();
        assert!(matches!(
            err,
            PortfolioError::InsufficientFunds { .. }
        ));
        assert_eq!(account.asset_in_spot("USDT").free, dec!(5));
    }

    #[test]
    fn join_accumulates_balances() {
        let mut a = Account::new();
        a.set_spot("BTC", dec!(1), dec!(0));
        let mut b = Account::new();
        b.set_spot("BTC", dec!(2), dec!(1));
        b.set_margin("ETH", dec!(4), dec!(0), dec!(3));

        a.join(&b);
        assert_eq!(a.asset_in_spot("BTC").free, dec!(3));
        assert_eq!(a.asset_in_spot("BTC").locked, dec!(1));
        assert_eq!(a.asset_in_margin("ETH").borrowed, dec!(3));
    }

    #[test]
    fn total_in_usd_values_both_ledgers() {
        let mut account = Account::new();
        account.set_spot("BTC", dec!(2), dec!(1));
        account.set_spot("USDT", dec!(500), dec!(0));
        account.set_margin("BTC", dec!(1), dec!(0), dec!(0.5));

        let total = account.total_in_usd(&board()).unwrap();
        assert_eq!(total.free, dec!(2) * dec!(5000) + dec!(500) + dec!(5000));
        assert_eq!(total.locked, dec!(5000));
        assert_eq!(total.borrowed, dec!(2500));
    }

    #[test]
    fn missing_price_path_fails_the_valuation() {
        let mut account = Account::new();
        account.set_spot("XMR", dec!(1), dec!(0));

        let err = account.total_in_usd(&board()).unwrap_err();
        assert_eq!(
            err,
            PortfolioError::Pricing(PricingError::NoPricePath {
                asset: "XMR".to_string()
            })
        );
    }
}
