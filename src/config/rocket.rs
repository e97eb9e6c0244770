use super::traits::{ensure_positive, ConfigSection};
use crate::engines::simulation::DEFAULT_PAYLOAD_MASS_KG;
use crate::error::TrajectoryError;
use crate::types::GeneBounds;
use serde::{Deserialize, Serialize};

/// Search bounds of the six free rocket parameters.
///
/// The turn rate is authored in degrees per second and converted to radians
/// when the gene bounds are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RocketConstraints {
    pub start_incline_after_distance: GeneBounds, // km
    pub thrust_incline_max_duration: GeneBounds,  // s
    pub thrust_incline_velocity_deg: GeneBounds,  // deg/s
    pub fuel_mass: GeneBounds,                    // kg
    pub exhaust_velocity: GeneBounds,             // km/s
    pub mass_flow_rate: GeneBounds,               // kg/s
    pub payload_mass: f64,                        // kg, not optimized
}

impl Default for RocketConstraints {
    fn default() -> Self {
        Self {
            start_incline_after_distance: GeneBounds::new(1.0, 4.0),
            thrust_incline_max_duration: GeneBounds::new(10.0, 40.0 * 60.0),
            thrust_incline_velocity_deg: GeneBounds::new(0.0, 20.0),
            fuel_mass: GeneBounds::new(300.0, 70_000.0),
            exhaust_velocity: GeneBounds::new(1.0, 3.0),
            mass_flow_rate: GeneBounds::new(1.0, 100.0),
            payload_mass: DEFAULT_PAYLOAD_MASS_KG,
        }
    }
}

impl RocketConstraints {
    /// Turn rate bounds in rad/s.
    pub fn thrust_incline_velocity(&self) -> GeneBounds {
        GeneBounds::new(
            self.thrust_incline_velocity_deg.min.to_radians(),
            self.thrust_incline_velocity_deg.max.to_radians(),
        )
    }

    fn named_bounds(&self) -> [(&'static str, GeneBounds); 6] {
        [
            ("start_incline_after_distance", self.start_incline_after_distance),
            ("thrust_incline_max_duration", self.thrust_incline_max_duration),
            ("thrust_incline_velocity_deg", self.thrust_incline_velocity_deg),
            ("fuel_mass", self.fuel_mass),
            ("exhaust_velocity", self.exhaust_velocity),
            ("mass_flow_rate", self.mass_flow_rate),
        ]
    }
}

impl ConfigSection for RocketConstraints {
    fn section_name() -> &'static str {
        "rocket"
    }

    fn validate(&self) -> Result<(), TrajectoryError> {
        for (name, bounds) in self.named_bounds() {
            if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds.min > bounds.max {
                return Err(TrajectoryError::Configuration(format!(
                    "rocket.{} has invalid bounds [{}, {}]",
                    name, bounds.min, bounds.max
                )));
            }
            if bounds.min < 0.0 {
                return Err(TrajectoryError::Configuration(format!(
                    "rocket.{} must not be negative",
                    name
                )));
            }
        }
        ensure_positive(Self::section_name(), "payload_mass", self.payload_mass)?;
        ensure_positive(Self::section_name(), "mass_flow_rate.max", self.mass_flow_rate.max)?;
        Ok(())
    }
}
