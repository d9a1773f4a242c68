//! Fare calculation with a per-connection discount schedule.
//!
//! The first leg is billed at the full per-kilometre rate and every following
//! leg at a rate reduced by the connecting discount. Once the rate reaches zero
//! billing stops: that leg and every later leg are free. Flooring the rate at
//! zero and continuing would give the same totals, so only one rule exists.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::constants::{CONNECTING_DISCOUNT, PRICE_PER_KM, RATE_EPSILON};

/// Fare schedule configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareConfig {
    /// Price per kilometre of the first leg.
    pub price_per_km: f64,
    /// Amount the per-kilometre price drops for each connecting leg.
    pub connecting_discount: f64,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            price_per_km: PRICE_PER_KM,
            connecting_discount: CONNECTING_DISCOUNT,
        }
    }
}

impl FareConfig {
    /// Validate the fare schedule.
    pub fn validate(&self) -> Result<()> {
        if !self.price_per_km.is_finite() || self.price_per_km < 0.0 {
            return Err(Error::malformed(format!(
                "price per km must be a non-negative number, got {}",
                self.price_per_km
            )));
        }
        if !self.connecting_discount.is_finite() || self.connecting_discount < 0.0 {
            return Err(Error::malformed(format!(
                "connecting discount must be a non-negative number, got {}",
                self.connecting_discount
            )));
        }
        Ok(())
    }

    /// Per-kilometre rate for the zero-based `leg`, or `None` once the
    /// discount has exhausted the fare.
    pub fn leg_rate(&self, leg: usize) -> Option<f64> {
        let rate = self.price_per_km - leg as f64 * self.connecting_discount;
        (rate > RATE_EPSILON).then_some(rate)
    }
}

/// Price each leg of a route given the leg distances in order.
///
/// Legs past the point where the rate is exhausted cost nothing.
pub fn calculate_leg_fares(leg_distances: &[f64], config: &FareConfig) -> Result<Vec<f64>> {
    config.validate()?;

    let mut billing = true;
    Ok(leg_distances
        .iter()
        .enumerate()
        .map(|(leg, distance)| {
            if !billing {
                return 0.0;
            }
            match config.leg_rate(leg) {
                Some(rate) => rate * distance,
                None => {
                    billing = false;
                    0.0
                }
            }
        })
        .collect())
}

/// Total fare for a route given the leg distances in order.
///
/// # Examples
/// ```
/// use airmap_lib::flight::{calculate_route_cost, FareConfig};
///
/// let cost = calculate_route_cost(&[4231.0, 2453.0], &FareConfig::default()).unwrap();
/// assert!((cost - 2216.75).abs() < 1e-6);
/// ```
pub fn calculate_route_cost(leg_distances: &[f64], config: &FareConfig) -> Result<f64> {
    Ok(calculate_leg_fares(leg_distances, config)?.iter().sum())
}
