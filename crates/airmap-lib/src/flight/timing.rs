//! Flight-time model: kinematic legs plus degree-dependent layovers.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::constants::{
    ACCELERATION_DISTANCE_KM, BASE_LAYOVER_HOURS, CRUISE_SPEED_KMH, LAYOVER_REDUCTION_HOURS,
};

/// Kinematic profile of the aircraft flying every leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightProfile {
    /// Cruise speed in km/h.
    pub cruise_speed_kmh: f64,
    /// Distance needed to reach cruise speed from standstill, in km.
    pub acceleration_distance_km: f64,
}

impl Default for FlightProfile {
    fn default() -> Self {
        Self {
            cruise_speed_kmh: CRUISE_SPEED_KMH,
            acceleration_distance_km: ACCELERATION_DISTANCE_KM,
        }
    }
}

impl FlightProfile {
    /// Validate the profile; both values must be finite and positive.
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("cruise speed", self.cruise_speed_kmh),
            ("acceleration distance", self.acceleration_distance_km),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::malformed(format!(
                    "{label} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Hours spent reaching cruise speed under constant acceleration.
    pub fn acceleration_time_hours(&self) -> f64 {
        2.0 * self.acceleration_distance_km / self.cruise_speed_kmh
    }

    /// Constant acceleration in km/h².
    pub fn acceleration(&self) -> f64 {
        self.cruise_speed_kmh / self.acceleration_time_hours()
    }

    /// Airborne time for a single leg, in hours.
    ///
    /// Legs longer than twice the acceleration distance accelerate, cruise,
    /// and decelerate. Shorter legs accelerate over the first half and
    /// decelerate over the second without reaching cruise speed.
    pub fn leg_hours(&self, distance_km: f64) -> f64 {
        let ramp = 2.0 * self.acceleration_distance_km;
        if distance_km > ramp {
            2.0 * self.acceleration_time_hours() + (distance_km - ramp) / self.cruise_speed_kmh
        } else {
            2.0 * (distance_km / self.acceleration()).sqrt()
        }
    }
}

/// Layover charged at a connecting city, shrinking as it gains outbound
/// flights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoverPolicy {
    /// Layover for a city with a single outbound flight, in hours.
    pub base_hours: f64,
    /// Hours saved per outbound flight beyond the first.
    pub reduction_per_connection_hours: f64,
}

impl Default for LayoverPolicy {
    fn default() -> Self {
        Self {
            base_hours: BASE_LAYOVER_HOURS,
            reduction_per_connection_hours: LAYOVER_REDUCTION_HOURS,
        }
    }
}

impl LayoverPolicy {
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("base layover", self.base_hours),
            ("layover reduction", self.reduction_per_connection_hours),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::malformed(format!(
                    "{label} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Layover in hours for a city with `out_degree` outbound flights, never
    /// negative.
    pub fn layover_hours(&self, out_degree: usize) -> f64 {
        let extra_connections = out_degree.saturating_sub(1) as f64;
        (self.base_hours - extra_connections * self.reduction_per_connection_hours).max(0.0)
    }
}
