use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid trading pair: {0}")]
    InvalidPair(String),

    #[error("Unknown market segment: {0}")]
    UnknownMarket(String),

    #[error("Unknown venue: {0}")]
    UnknownVenue(String),
}
