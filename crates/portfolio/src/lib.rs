//! # Fathom Portfolio Crate
//!
//! This crate manages the state of a trading account across the spot and
//! margin ledgers and values the whole account in US dollars through the
//! pricing resolver.
//!
//! ## Architectural Principles
//!
//! - **State vs. Valuation Decoupling:** `Account` is a plain state
//!   container mutated only by explicit operations (set, transfer, join).
//!   Valuation is a read-only pass over it against a caller-supplied
//!   `PriceBoard`.
//! - **No Fabricated Totals:** If any held asset has no price path, the
//!   valuation fails as a whole rather than counting that asset as zero.
//!
//! ## Public API
//!
//! - `Balance`: one asset's sub-account amounts.
//! - `Account`: the per-asset spot and margin ledgers.
//! - `PortfolioError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod account;
pub mod error;

// Re-export the key components to provide a clean, public-facing API.
pub use account::{Account, Balance};
pub use error::PortfolioError;
