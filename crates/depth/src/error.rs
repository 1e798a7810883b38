use crate::ladder::BookSide;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DepthError {
    #[error("Negative price {price} in {side} ladder")]
    NegativePrice { side: BookSide, price: Decimal },

    #[error("Negative quantity {quantity} in {side} ladder")]
    NegativeQuantity { side: BookSide, quantity: Decimal },

    #[error("Requested amount must not be negative, got {0}")]
    NegativeRequest(Decimal),

    #[error("Invalid execution limits: {0}")]
    InvalidLimits(String),
}
