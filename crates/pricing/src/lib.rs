//! # Fathom Pricing Crate
//!
//! This crate answers one question: what is an asset worth in US dollars,
//! given only the pair prices a set of venues currently quotes? When no
//! direct dollar quote exists, it triangulates through one bridge asset,
//! never more.
//!
//! ## Architectural Principles
//!
//! - **Pure Resolution:** A [`PriceBoard`] is a snapshot supplied by the
//!   caller; resolution is a pure lookup over it with no I/O and no caching.
//! - **Deterministic Paths:** Candidate quote currencies and bridge assets
//!   are fixed priority arrays, never hash-map iteration, so the same
//!   snapshot always resolves to the same price.
//! - **No Silent Zeroes:** An unresolvable asset is an error naming the
//!   asset. Defaulting to zero would silently corrupt any valuation total
//!   built on top of it.
//!
//! ## Public API
//!
//! - `PriceBoard`: the known-price snapshot and its `resolve_usd` operation.
//! - `PricingError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod board;
pub mod error;

// Re-export the key components to provide a clean, public-facing API.
pub use board::PriceBoard;
pub use error::PricingError;
