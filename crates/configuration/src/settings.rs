use crate::error::ConfigError;
use core_types::{Market, PairStyle, Venue};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub simulation: SimulationDefaults,
    #[serde(default)]
    pub venues: Vec<VenueProfile>,
}

/// Execution-limit defaults applied when a simulation request does not
/// override them. All optional: an absent value means the corresponding
/// constraint is simply not applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulationDefaults {
    /// Maximum fractional price deviation from the best level (e.g. "0.1" for 10%).
    pub tolerance: Option<Decimal>,
    /// Decimal places a per-trade amount is truncated to.
    pub quantity_precision: Option<u32>,
    /// Minimum tradable increment; amounts are floored to a multiple of it.
    pub lot_step: Option<Decimal>,
}

/// Per-venue conventions: how the venue formats pairs, what it charges, and
/// which market segments it actually runs.
#[derive(Debug, Clone, Deserialize)]
pub struct VenueProfile {
    pub venue: Venue,
    #[serde(default)]
    pub pair_style: PairStyle,
    #[serde(default)]
    pub maker_fee: Decimal,
    #[serde(default)]
    pub taker_fee: Decimal,
    /// How many levels per side to request when fetching depth.
    #[serde(default = "default_depth_limit")]
    pub depth_limit: usize,
    #[serde(default)]
    pub markets: Vec<Market>,
}

fn default_depth_limit() -> usize {
    100
}

impl VenueProfile {
    pub fn market_enabled(&self, market: Market) -> bool {
        self.markets.contains(&market)
    }
}

impl Settings {
    /// Checks that every parameter is logical before anything consumes it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(tolerance) = self.simulation.tolerance {
            if tolerance.is_sign_negative() {
                return Err(ConfigError::ValidationError(
                    "simulation.tolerance must not be negative".to_string(),
                ));
            }
        }
        if let Some(lot_step) = self.simulation.lot_step {
            if lot_step <= dec!(0) {
                return Err(ConfigError::ValidationError(
                    "simulation.lot_step must be greater than 0".to_string(),
                ));
            }
        }

        for profile in &self.venues {
            for fee in [profile.maker_fee, profile.taker_fee] {
                if fee < dec!(0) || fee >= dec!(1) {
                    return Err(ConfigError::ValidationError(format!(
                        "fees for {} must be within [0, 1), got {}",
                        profile.venue, fee
                    )));
                }
            }
            if profile.depth_limit == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "depth_limit for {} must be greater than 0",
                    profile.venue
                )));
            }
        }

        let mut seen = Vec::new();
        for profile in &self.venues {
            if seen.contains(&profile.venue) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate venue profile: {}",
                    profile.venue
                )));
            }
            seen.push(profile.venue);
        }

        Ok(())
    }

    /// The profile configured for a venue, if any.
    pub fn venue(&self, venue: Venue) -> Option<&VenueProfile> {
        self.venues.iter().find(|profile| profile.venue == venue)
    }
}
