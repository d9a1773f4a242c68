//! Route economics: fares, flight times, and layovers.
//!
//! This module is organized into focused submodules:
//!
//! - [`pricing`] - Fare schedule with a per-connection discount
//! - [`timing`] - Kinematic leg times and degree-dependent layovers
//! - [`constants`] - Default values shared by both
//!
//! # Example
//!
//! ```
//! use airmap_lib::flight::{calculate_route_cost, FlightConfig};
//!
//! let config = FlightConfig::default();
//! let cost = calculate_route_cost(&[4231.0, 2453.0], &config.fare).unwrap();
//! let hours = config.profile.leg_hours(4231.0)
//!     + config.layover.layover_hours(2)
//!     + config.profile.leg_hours(2453.0);
//! assert!((cost - 2216.75).abs() < 1e-6);
//! assert!((hours - 11.81).abs() < 0.005);
//! ```

pub mod constants;
pub mod pricing;
pub mod timing;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use constants::{
    ACCELERATION_DISTANCE_KM, BASE_LAYOVER_HOURS, CONNECTING_DISCOUNT, CRUISE_SPEED_KMH,
    LAYOVER_REDUCTION_HOURS, PRICE_PER_KM,
};
pub use pricing::{calculate_leg_fares, calculate_route_cost, FareConfig};
pub use timing::{FlightProfile, LayoverPolicy};

/// Complete route-economics configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlightConfig {
    pub fare: FareConfig,
    pub profile: FlightProfile,
    pub layover: LayoverPolicy,
}

impl FlightConfig {
    /// Validate every part of the configuration.
    pub fn validate(&self) -> Result<()> {
        self.fare.validate()?;
        self.profile.validate()?;
        self.layover.validate()
    }
}
