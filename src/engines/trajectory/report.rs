use crate::engines::simulation::{GravityField, Rocket, StopReason};
use crate::types::{GeoCoordinates, Vec3};
use crate::utils::format::format_seconds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary of one simulated flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightReport {
    pub stop_reason: StopReason,
    pub flight_time: f64,          // s
    pub fuel_combustion_time: f64, // s
    /// Length of the travelled-distance accumulator (km).
    pub travelled_distance: f64,
    pub max_altitude: f64, // km
    pub initial_fuel_mass: f64,
    pub remaining_fuel_mass: f64,
    pub payload_mass: f64,
    pub thrust_incline_duration: f64,
    pub thrust_incline_angle: f64, // rad
    pub final_position: Vec3,
    pub final_geo: GeoCoordinates,
    /// Where the target was scored, after optional rotation compensation.
    pub aim_point: Vec3,
    pub miss_distance: f64, // km
    pub has_landed: bool,
}

impl FlightReport {
    pub fn from_rocket<G: GravityField + ?Sized>(
        rocket: &Rocket<'_, G>,
        stop_reason: StopReason,
        aim_point: Vec3,
        final_geo: GeoCoordinates,
    ) -> Self {
        let params = rocket.params();

        Self {
            stop_reason,
            flight_time: rocket.flight_time,
            fuel_combustion_time: params.fuel_combustion_time(),
            travelled_distance: rocket.travelled_distance.norm(),
            max_altitude: rocket.max_altitude,
            initial_fuel_mass: params.fuel_mass,
            remaining_fuel_mass: rocket.remaining_fuel_mass(),
            payload_mass: params.payload_mass,
            thrust_incline_duration: rocket.current_thrust_incline_duration,
            thrust_incline_angle: rocket.thrust_incline_angle,
            final_position: rocket.position,
            final_geo,
            aim_point,
            miss_distance: (rocket.position - aim_point).norm(),
            has_landed: rocket.has_landed,
        }
    }

    pub fn burned_fuel_mass(&self) -> f64 {
        self.initial_fuel_mass - self.remaining_fuel_mass
    }
}

impl fmt::Display for FlightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stop reason:        {:?}", self.stop_reason)?;
        writeln!(f, "Flight time:        {}", format_seconds(self.flight_time))?;
        writeln!(f, "Burn time:          {}", format_seconds(self.fuel_combustion_time))?;
        writeln!(f, "Travelled distance: {:.2} km", self.travelled_distance)?;
        writeln!(f, "Max altitude:       {:.2} km", self.max_altitude)?;
        writeln!(
            f,
            "Fuel:               {:.2} kg burned, {:.2} kg left",
            self.burned_fuel_mass(),
            self.remaining_fuel_mass
        )?;
        writeln!(
            f,
            "Turn:               {:.2} deg over {}",
            self.thrust_incline_angle.to_degrees(),
            format_seconds(self.thrust_incline_duration)
        )?;
        writeln!(
            f,
            "Impact:             lat {:.3}, lon {:.3}",
            self.final_geo.latitude, self.final_geo.longitude
        )?;
        write!(f, "Miss distance:      {:.3} km", self.miss_distance)
    }
}
