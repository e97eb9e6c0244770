use super::earth::GravityField;
use super::rocket::Rocket;
use serde::{Deserialize, Serialize};

/// Hard cap on integrator steps per flight, whatever the time budget and step.
pub const MAX_FLIGHT_STEPS: usize = 10_000_000;

/// Absolute limits of one simulated flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightLimits {
    /// Step of the integrator (s).
    pub step_seconds: f64,
    pub max_flight_time_seconds: f64,
    /// Stop once the travelled distance exceeds this (km).
    pub max_distance: Option<f64>,
    /// Stop once the altitude exceeds this (km).
    pub max_altitude: Option<f64>,
}

impl Default for FlightLimits {
    fn default() -> Self {
        Self {
            step_seconds: 1.0,
            max_flight_time_seconds: 7200.0,
            max_distance: None,
            max_altitude: None,
        }
    }
}

impl FlightLimits {
    pub fn max_steps(&self) -> usize {
        if self.step_seconds <= 0.0 {
            return 0;
        }
        let steps = (self.max_flight_time_seconds / self.step_seconds).ceil();
        if steps.is_nan() || steps >= MAX_FLIGHT_STEPS as f64 {
            return MAX_FLIGHT_STEPS;
        }
        steps as usize
    }
}

/// Why the step loop ended. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Landed,
    DistanceExceeded,
    AltitudeExceeded,
    TimeBudgetExhausted,
}

/// Step `rocket` forward until it lands, breaks a limit or runs out of time.
pub fn simulate_flight<G: GravityField + ?Sized>(
    rocket: &mut Rocket<'_, G>,
    limits: &FlightLimits,
) -> StopReason {
    for _ in 0..limits.max_steps() {
        rocket.update(limits.step_seconds);

        if let Some(max_distance) = limits.max_distance {
            if rocket.travelled_distance.norm() > max_distance {
                return StopReason::DistanceExceeded;
            }
        }

        if let Some(max_altitude) = limits.max_altitude {
            if rocket.altitude > max_altitude {
                return StopReason::AltitudeExceeded;
            }
        }

        if rocket.has_landed {
            return StopReason::Landed;
        }
    }

    StopReason::TimeBudgetExhausted
}
