use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("No price path of at most two hops from {asset} to USD")]
    NoPricePath { asset: String },
}
