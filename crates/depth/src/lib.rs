//! # Fathom Depth Crate
//!
//! This crate models one venue's order book snapshot as a pair of price
//! ladders and simulates how a market order of a given size would execute
//! against them: how much fills, at what total cost, and how far down the
//! book the order has to reach.
//!
//! ## Architectural Principles
//!
//! - **Pure Simulation:** Nothing here talks to an exchange. A `Depth` value
//!   is a snapshot supplied by the caller; every simulation is a pure
//!   function over it and may run concurrently without locking.
//! - **Conservative Fills:** Every rounding step truncates toward zero, so a
//!   simulated fill is never larger than what the book supports. The report
//!   is a floor, not an estimate.
//! - **One Traversal:** The basic and tolerance/lot-aware entry points are
//!   thin wrappers over a single parameterized ladder sweep, so the two can
//!   never drift apart.
//!
//! ## Public API
//!
//! - `Depth`, `Ladder`, `Level`: the order book snapshot model.
//! - `Depth::market_buy` / `market_sell` (+ `_with` variants): the simulator.
//! - `Fill`, `Reach`: the simulation report.
//! - `Limits`: tolerance, precision, and lot-step constraints.
//! - `DepthError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod ladder;
pub mod simulator;

// Re-export the key components to provide a clean, public-facing API.
pub use error::DepthError;
pub use ladder::{BookSide, Depth, Ladder, Level};
pub use simulator::{Fill, Limits, Reach};
