use pricing::PricingError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    #[error("Available amount of {asset} ({available}) is less than the requested {requested}")]
    InsufficientFunds {
        asset: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error(transparent)]
    Pricing(#[from] PricingError),
}
