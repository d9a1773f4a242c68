//! Flight economics constants used across pricing and timing calculations.

/// Fare charged per kilometre on the first leg of a route.
pub const PRICE_PER_KM: f64 = 0.35;

/// Reduction of the per-kilometre fare applied to each connecting leg.
pub const CONNECTING_DISCOUNT: f64 = 0.05;

/// Cruise speed in km/h.
pub const CRUISE_SPEED_KMH: f64 = 750.0;

/// Distance covered while accelerating to (or decelerating from) cruise speed.
pub const ACCELERATION_DISTANCE_KM: f64 = 200.0;

/// Layover at a connecting city with a single outbound flight, in hours.
pub const BASE_LAYOVER_HOURS: f64 = 2.0;

/// Layover saved for every outbound flight beyond the first (10 minutes).
pub const LAYOVER_REDUCTION_HOURS: f64 = 1.0 / 6.0;

/// Rates at or below this value count as exhausted.
pub const RATE_EPSILON: f64 = 1e-9;
