//! # Fathom Core Types
//!
//! This crate defines the shared vocabulary of the Fathom system: assets,
//! trading pairs, market segments, venues, and ticker snapshots. Everything
//! downstream (`depth`, `pricing`, `portfolio`) speaks in these types.
//!
//! ## Architectural Principles
//!
//! - **Layer 0:** This crate has no knowledge of any other Fathom crate.
//! - **Closed Enumerations:** Markets and venues are compile-time enums, not
//!   runtime registries. The supported set is fixed per build, which keeps
//!   parsing total and serialization unambiguous.
//! - **Decimal Everywhere:** All prices and quantities are `rust_decimal`
//!   values; no floating point enters the data model.

// Declare all the modules that constitute this crate.
pub mod assets;
pub mod enums;
pub mod error;
pub mod pair;
pub mod tick;

// Re-export the core types to provide a clean public API.
pub use assets::{MAJOR_QUOTE_ASSETS, USD_STABLECOINS, is_usd_equivalent};
pub use enums::{Market, Venue};
pub use error::CoreError;
pub use pair::{Pair, PairKey, PairStyle};
pub use tick::{Tick, ticks_to_prices};
