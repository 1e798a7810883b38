//! Market order execution simulation.
//!
//! A simulation walks one ladder from best to worst price and accumulates
//! exact decimal fill quantities. The buy direction spends a quote-currency
//! budget against the asks; the sell direction disposes a base-asset
//! quantity into the bids. Both directions share [`sweep`], so tolerance,
//! precision, and lot handling cannot diverge between them.

use crate::error::DepthError;
use crate::ladder::{BookSide, Depth, Ladder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Optional constraints on a simulation.
///
/// `tolerance` is the maximum fractional price deviation from the best level
/// the traversal may reach into (`0.1` = 10%). `precision` truncates each
/// per-level fill to a number of decimal places; `lot` floors it to a
/// multiple of the venue's minimum trade increment. All rounding is toward
/// zero: the simulated fill never exceeds what the venue would accept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub tolerance: Option<Decimal>,
    pub precision: Option<u32>,
    pub lot: Option<Decimal>,
}

impl Limits {
    /// No tolerance bound, no rounding: the basic simulation variants.
    pub const NONE: Limits = Limits {
        tolerance: None,
        precision: None,
        lot: None,
    };

    fn validate(&self) -> Result<(), DepthError> {
        if let Some(tolerance) = self.tolerance {
            if tolerance.is_sign_negative() {
                return Err(DepthError::InvalidLimits(format!(
                    "tolerance must not be negative, got {tolerance}"
                )));
            }
        }
        if let Some(lot) = self.lot {
            if lot <= Decimal::ZERO {
                return Err(DepthError::InvalidLimits(format!(
                    "lot step must be positive, got {lot}"
                )));
            }
        }
        Ok(())
    }
}

/// How far down the book a simulated order reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reach {
    /// Price of the worst level actually consumed.
    Level(Decimal),
    /// The requested size exceeds the ladder's total visible depth: the
    /// traversal ran out of levels with demand left over.
    Pierced,
}

impl Reach {
    pub fn is_pierced(&self) -> bool {
        matches!(self, Reach::Pierced)
    }

    pub fn price(&self) -> Option<Decimal> {
        match self {
            Reach::Level(price) => Some(*price),
            Reach::Pierced => None,
        }
    }
}

/// The outcome of a simulated market order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    /// Total base-asset quantity the simulation determines would fill.
    pub base_filled: Decimal,
    /// Total quote-currency value of that fill.
    pub quote_filled: Decimal,
    /// Price of the best level consulted: the theoretical no-slippage price.
    pub best_price: Decimal,
    /// Price of the worst level consumed, or [`Reach::Pierced`].
    pub reach: Reach,
}

impl Depth {
    /// Simulates spending `quote_budget` against the asks at market.
    pub fn market_buy(&self, quote_budget: Decimal) -> Result<Fill, DepthError> {
        self.market_buy_with(quote_budget, &Limits::NONE)
    }

    /// Simulates a market buy under tolerance and rounding constraints.
    pub fn market_buy_with(
        &self,
        quote_budget: Decimal,
        limits: &Limits,
    ) -> Result<Fill, DepthError> {
        sweep(&self.asks, quote_budget, limits)
    }

    /// Simulates selling `base_quantity` into the bids at market.
    pub fn market_sell(&self, base_quantity: Decimal) -> Result<Fill, DepthError> {
        self.market_sell_with(base_quantity, &Limits::NONE)
    }

    /// Simulates a market sell under tolerance and rounding constraints.
    pub fn market_sell_with(
        &self,
        base_quantity: Decimal,
        limits: &Limits,
    ) -> Result<Fill, DepthError> {
        sweep(&self.bids, base_quantity, limits)
    }
}

/// Walks one ladder from best to worst, consuming against `request`.
///
/// For an ask ladder `request` is a quote-currency budget; for a bid ladder
/// it is a base-asset quantity. The ladder is sorted defensively on a
/// working copy, so the caller's level order does not matter.
fn sweep(ladder: &Ladder, request: Decimal, limits: &Limits) -> Result<Fill, DepthError> {
    ladder.validate()?;
    limits.validate()?;
    if request.is_sign_negative() {
        return Err(DepthError::NegativeRequest(request));
    }

    let mut ladder = ladder.clone();
    ladder.sort();
    let side = ladder.side();

    let mut base_filled = Decimal::ZERO;
    let mut quote_filled = Decimal::ZERO;
    let mut best_price: Option<Decimal> = None;
    let mut last_consumed: Option<Decimal> = None;
    let mut remaining = request;
    // Set when traversal stops for a reason other than running out of
    // levels; only a plain ladder exhaustion with demand left is a pierce.
    let mut stopped_short = false;

    for level in ladder.levels().iter().filter(|l| !l.quantity.is_zero()) {
        if remaining <= Decimal::ZERO {
            stopped_short = true;
            break;
        }

        let best = *best_price.get_or_insert(level.price);
        if let Some(tolerance) = limits.tolerance {
            if exceeds_tolerance(side, level.price, best, tolerance) {
                tracing::debug!(
                    %side,
                    price = %level.price,
                    best = %best,
                    %tolerance,
                    "tolerance bound reached, stopping sweep"
                );
                stopped_short = true;
                break;
            }
        }

        let available = match side {
            // Base quantity purchasable with the remaining quote budget at
            // this level's price. A free level costs nothing, so the whole
            // level is affordable.
            BookSide::Ask => {
                if level.price.is_zero() {
                    level.quantity
                } else {
                    level.quantity.min(remaining / level.price)
                }
            }
            BookSide::Bid => level.quantity.min(remaining),
        };
        let take = truncate_amount(available, limits);
        if take.is_zero() {
            // The remaining demand rounds below the lot/precision floor;
            // nothing more is takeable at this or any worse price.
            stopped_short = true;
            break;
        }

        // Decimal division rounds at the 28th digit, so `take * price` can
        // overshoot the remaining budget by one ulp. Cap the cost so the
        // fill never overspends.
        let value = match side {
            BookSide::Ask => (take * level.price).min(remaining),
            BookSide::Bid => take * level.price,
        };
        base_filled += take;
        quote_filled += value;
        remaining -= match side {
            BookSide::Ask => value,
            BookSide::Bid => take,
        };
        last_consumed = Some(level.price);

        if take < level.quantity {
            // Liquidity is left at this level, so the demand itself is
            // exhausted (up to rounding). Worse levels cannot fill more.
            stopped_short = true;
            break;
        }
    }

    let pierced = remaining > Decimal::ZERO && !stopped_short;
    if pierced {
        tracing::debug!(%side, %request, unfilled = %remaining, "ladder depth pierced");
    }

    let best_price = best_price
        .or_else(|| ladder.levels().iter().find(|l| !l.quantity.is_zero()).map(|l| l.price))
        .unwrap_or(Decimal::ZERO);
    let reach = if pierced {
        Reach::Pierced
    } else {
        Reach::Level(last_consumed.unwrap_or(best_price))
    };

    Ok(Fill {
        base_filled,
        quote_filled,
        best_price,
        reach,
    })
}

fn exceeds_tolerance(side: BookSide, price: Decimal, best: Decimal, tolerance: Decimal) -> bool {
    match side {
        BookSide::Ask => price > best * (Decimal::ONE + tolerance),
        BookSide::Bid => price < best * (Decimal::ONE - tolerance),
    }
}

/// Truncates a fill amount to the configured precision, then floors it to a
/// lot-step multiple. Both steps round toward zero.
fn truncate_amount(amount: Decimal, limits: &Limits) -> Decimal {
    let mut out = amount;
    if let Some(precision) = limits.precision {
        out = out.trunc_with_scale(precision);
    }
    if let Some(lot) = limits.lot {
        out = (out / lot).floor() * lot;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ladder::Level;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    /// The canonical three-level book: asks 11/12/13, bids 10/9/8, one unit
    /// each, delivered out of order the way a raw feed would.
    fn test_depth() -> Depth {
        Depth::new(
            Utc::now(),
            vec![
                Level::new(dec!(13), dec!(1)),
                Level::new(dec!(12), dec!(1)),
                Level::new(dec!(11), dec!(1)),
            ],
            vec![
                Level::new(dec!(10), dec!(1)),
                Level::new(dec!(8), dec!(1)),
                Level::new(dec!(9), dec!(1)),
            ],
        )
    }

    fn assert_fill(fill: &Fill, base: Decimal, quote: Decimal, best: Decimal, reach: Reach) {
        assert_eq!(fill.base_filled, base, "base_filled");
        assert_eq!(fill.quote_filled, quote, "quote_filled");
        assert_eq!(fill.best_price, best, "best_price");
        assert_eq!(fill.reach, reach, "reach");
    }

    #[test]
    fn market_buy_walks_the_asks() {
        let depth = test_depth();

        let fill = depth.market_buy(dec!(11)).unwrap();
        assert_fill(&fill, dec!(1), dec!(11), dec!(11), Reach::Level(dec!(11)));

        // A level that exactly exhausts the budget is consumed and included.
        let fill = depth.market_buy(dec!(23)).unwrap();
        assert_fill(&fill, dec!(2), dec!(23), dec!(11), Reach::Level(dec!(12)));

        let fill = depth.market_buy(dec!(36)).unwrap();
        assert_fill(&fill, dec!(3), dec!(36), dec!(11), Reach::Level(dec!(13)));
    }

    #[test]
    fn market_buy_pierces_when_budget_exceeds_depth() {
        let depth = test_depth();
        let fill = depth.market_buy(dec!(37)).unwrap();
        assert_fill(&fill, dec!(3), dec!(36), dec!(11), Reach::Pierced);
    }

    #[test]
    fn market_sell_walks_the_bids() {
        let depth = test_depth();

        let fill = depth.market_sell(dec!(1)).unwrap();
        assert_fill(&fill, dec!(1), dec!(10), dec!(10), Reach::Level(dec!(10)));

        let fill = depth.market_sell(dec!(2)).unwrap();
        assert_fill(&fill, dec!(2), dec!(19), dec!(10), Reach::Level(dec!(9)));

        // The final exactly-matching level is fully consumed, mirroring the
        // buy side.
        let fill = depth.market_sell(dec!(3)).unwrap();
        assert_fill(&fill, dec!(3), dec!(27), dec!(10), Reach::Level(dec!(8)));
    }

    #[test]
    fn market_sell_pierces_when_quantity_exceeds_depth() {
        let depth = test_depth();
        let fill = depth.market_sell(dec!(4)).unwrap();
        assert_fill(&fill, dec!(3), dec!(27), dec!(10), Reach::Pierced);
    }

    #[test]
    fn buy_tolerance_stops_before_disqualified_level() {
        let depth = test_depth();
        let limits = Limits {
            tolerance: Some(dec!(0.1)),
            precision: Some(8),
            lot: Some(dec!(1)),
        };

        let fill = depth.market_buy_with(dec!(11), &limits).unwrap();
        assert_fill(&fill, dec!(1), dec!(11), dec!(11), Reach::Level(dec!(11)));

        let fill = depth.market_buy_with(dec!(23), &limits).unwrap();
        assert_fill(&fill, dec!(2), dec!(23), dec!(11), Reach::Level(dec!(12)));

        // 13 > 11 * 1.1 = 12.1: the sweep stops without consuming it and
        // without reporting a pierce.
        let fill = depth.market_buy_with(dec!(36), &limits).unwrap();
        assert_fill(&fill, dec!(2), dec!(23), dec!(11), Reach::Level(dec!(12)));

        let fill = depth.market_buy_with(dec!(37), &limits).unwrap();
        assert_fill(&fill, dec!(2), dec!(23), dec!(11), Reach::Level(dec!(12)));
    }

    #[test]
    fn sell_tolerance_stops_before_disqualified_level() {
        let depth = test_depth();
        let limits = Limits {
            tolerance: Some(dec!(0.1)),
            ..Limits::NONE
        };

        let fill = depth.market_sell_with(dec!(1), &limits).unwrap();
        assert_fill(&fill, dec!(1), dec!(10), dec!(10), Reach::Level(dec!(10)));

        // 9 sits exactly on the bound 10 * 0.9 and is admitted; 8 is not.
        for quantity in [dec!(2), dec!(3), dec!(4)] {
            let fill = depth.market_sell_with(quantity, &limits).unwrap();
            assert_fill(&fill, dec!(2), dec!(19), dec!(10), Reach::Level(dec!(9)));
        }
    }

    #[test]
    fn empty_ladder_pierces_immediately() {
        let depth = Depth::new(Utc::now(), vec![], vec![]);
        let fill = depth.market_buy(dec!(100)).unwrap();
        assert_fill(&fill, dec!(0), dec!(0), dec!(0), Reach::Pierced);

        let fill = depth.market_sell(dec!(5)).unwrap();
        assert_fill(&fill, dec!(0), dec!(0), dec!(0), Reach::Pierced);
    }

    #[test]
    fn zero_request_consumes_nothing() {
        let depth = test_depth();
        let fill = depth.market_buy(dec!(0)).unwrap();
        assert_fill(&fill, dec!(0), dec!(0), dec!(11), Reach::Level(dec!(11)));

        let fill = depth.market_sell(dec!(0)).unwrap();
        assert_fill(&fill, dec!(0), dec!(0), dec!(10), Reach::Level(dec!(10)));
    }

    #[test]
    fn zero_quantity_levels_are_ignored() {
        let depth = Depth::new(
            Utc::now(),
            vec![
                Level::new(dec!(10), dec!(0)),
                Level::new(dec!(11), dec!(1)),
            ],
            vec![],
        );
        let fill = depth.market_buy(dec!(11)).unwrap();
        assert_fill(&fill, dec!(1), dec!(11), dec!(11), Reach::Level(dec!(11)));
    }

    #[test]
    fn lot_rounding_keeps_cost_within_budget() {
        // Two deep levels at the same price; an integer lot forces the
        // second take to round down, leaving unspendable dust. That is a
        // bounded fill, not a pierce.
        let depth = Depth::new(
            Utc::now(),
            vec![
                Level::new(dec!(0.001436), dec!(6502773)),
                Level::new(dec!(0.001436), dec!(6502773)),
            ],
            vec![],
        );
        let budget = dec!(10000);
        let limits = Limits {
            tolerance: Some(dec!(0.1)),
            precision: Some(8),
            lot: Some(dec!(1)),
        };

        let fill = depth.market_buy_with(budget, &limits).unwrap();
        assert_eq!(fill.base_filled, dec!(6963788));
        assert_eq!(fill.quote_filled, dec!(9999.999568));
        assert_eq!(fill.reach, Reach::Level(dec!(0.001436)));
        assert!(fill.quote_filled <= budget);
    }

    #[test]
    fn fractional_lot_rounding_is_conservative() {
        let depth = Depth::new(
            Utc::now(),
            vec![Level::new(dec!(6273.03627303), dec!(10000000000000))],
            vec![Level::new(dec!(6273.02372697), dec!(10000000000000))],
        );
        let budget = dec!(5141.738087358218348510561174);
        let limits = Limits {
            tolerance: Some(dec!(0.01)),
            precision: Some(8),
            lot: Some(dec!(0.000001)),
        };

        let fill = depth.market_buy_with(budget, &limits).unwrap();
        assert!(fill.quote_filled <= budget);
        assert!(fill.base_filled > Decimal::ZERO);
        // The fill is a whole number of lots.
        assert_eq!(
            fill.base_filled,
            (fill.base_filled / dec!(0.000001)).trunc() * dec!(0.000001)
        );
        // Nothing worse than the single level was touched.
        assert_eq!(fill.reach, Reach::Level(dec!(6273.03627303)));
    }

    #[test]
    fn larger_requests_never_fill_less() {
        let depth = test_depth();
        let mut previous = Decimal::ZERO;
        for budget in [dec!(5), dec!(11), dec!(17), dec!(23), dec!(30), dec!(36)] {
            let fill = depth.market_buy(budget).unwrap();
            assert!(fill.quote_filled <= budget);
            assert!(fill.quote_filled >= previous);
            previous = fill.quote_filled;
        }
    }

    #[test]
    fn negative_inputs_are_rejected() {
        let depth = test_depth();
        assert!(matches!(
            depth.market_buy(dec!(-1)),
            Err(DepthError::NegativeRequest(_))
        ));

        let bad = Depth::new(Utc::now(), vec![Level::new(dec!(-1), dec!(1))], vec![]);
        assert!(bad.market_buy(dec!(10)).is_err());

        let limits = Limits {
            tolerance: Some(dec!(-0.1)),
            ..Limits::NONE
        };
        assert!(matches!(
            depth.market_buy_with(dec!(10), &limits),
            Err(DepthError::InvalidLimits(_))
        ));

        let limits = Limits {
            lot: Some(dec!(0)),
            ..Limits::NONE
        };
        assert!(matches!(
            depth.market_buy_with(dec!(10), &limits),
            Err(DepthError::InvalidLimits(_))
        ));
    }
}
