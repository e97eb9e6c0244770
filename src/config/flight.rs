use super::traits::{ensure_positive, ConfigSection};
use crate::error::TrajectoryError;
use crate::types::GeoCoordinates;
use serde::{Deserialize, Serialize};

/// One week; longer budgets are never useful for a single flight.
pub const MAX_FLIGHT_TIME_SECONDS: f64 = 7.0 * 24.0 * 3600.0;

/// Early-exit limits for every simulated flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConstraints {
    /// Travelled-distance cap as a multiple of the start→target straight line.
    pub max_distance_factor: f64,
    pub max_flight_time_seconds: f64,
    pub max_altitude: Option<f64>, // km
}

impl Default for FlightConstraints {
    fn default() -> Self {
        Self {
            max_distance_factor: 6.0,
            max_flight_time_seconds: 60.0 * 120.0,
            max_altitude: Some(6000.0),
        }
    }
}

impl ConfigSection for FlightConstraints {
    fn section_name() -> &'static str {
        "flight"
    }

    fn validate(&self) -> Result<(), TrajectoryError> {
        let section = Self::section_name();
        ensure_positive(section, "max_distance_factor", self.max_distance_factor)?;
        ensure_positive(section, "max_flight_time_seconds", self.max_flight_time_seconds)?;
        if self.max_flight_time_seconds > MAX_FLIGHT_TIME_SECONDS {
            return Err(TrajectoryError::Configuration(format!(
                "flight.max_flight_time_seconds must not exceed {} s",
                MAX_FLIGHT_TIME_SECONDS
            )));
        }
        if let Some(max_altitude) = self.max_altitude {
            ensure_positive(section, "max_altitude", max_altitude)?;
        }
        Ok(())
    }
}

/// How the fitness is formed and how finely flights are simulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Add flight time to the miss distance.
    pub minimize_flight_time: bool,
    /// km of miss distance one second of flight is worth. Mixes units on purpose.
    pub flight_time_weight: f64,
    /// Use the larger population.
    pub increase_accuracy: bool,
    /// Integrator step (s). Results are sensitive to it.
    pub step_seconds: f64,
    /// Score against where the target will be after the flight, given earth rotation.
    pub compensate_earth_rotation: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            minimize_flight_time: false,
            flight_time_weight: 1.0,
            increase_accuracy: false,
            step_seconds: 1.0,
            compensate_earth_rotation: false,
        }
    }
}

impl ConfigSection for SolverOptions {
    fn section_name() -> &'static str {
        "solver"
    }

    fn validate(&self) -> Result<(), TrajectoryError> {
        ensure_positive(Self::section_name(), "step_seconds", self.step_seconds)?;
        if !self.flight_time_weight.is_finite() || self.flight_time_weight < 0.0 {
            return Err(TrajectoryError::Configuration(
                "solver.flight_time_weight must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Launch and target sites in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub start: GeoCoordinates,
    pub target: GeoCoordinates,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            start: GeoCoordinates::new(0.0, 0.0),
            target: GeoCoordinates::new(0.0, 180.0),
        }
    }
}

impl ConfigSection for ScenarioConfig {
    fn section_name() -> &'static str {
        "scenario"
    }

    fn validate(&self) -> Result<(), TrajectoryError> {
        for (name, geo) in [("start", self.start), ("target", self.target)] {
            if !(-90.0..=90.0).contains(&geo.latitude) || !geo.longitude.is_finite() {
                return Err(TrajectoryError::Configuration(format!(
                    "scenario.{} latitude must be within [-90, 90], got {}",
                    name, geo.latitude
                )));
            }
        }
        Ok(())
    }
}
