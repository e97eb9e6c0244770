//! Point-mass rocket with a staged thrust law and a gravity turn.
//!
//! Integration is semi-implicit Euler: velocity is advanced with the
//! acceleration evaluated at the start of the step, position with the new
//! velocity. Trajectories therefore depend on the step size. The thrust
//! impulse of each step is the exact Tsiolkovsky Δv between the masses at the
//! start and the end of the step, so the total impulse does not depend on the
//! step; the gravity turn and the landing check are evaluated per step and do.

use super::earth::GravityField;
use crate::types::Vec3;
use nalgebra::{Unit, UnitQuaternion};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAYLOAD_MASS_KG: f64 = 1000.0;
/// Distance the rocket must have covered before touching the surface counts as landing (km).
pub const LANDING_DISTANCE_THRESHOLD_KM: f64 = 10.0;

const DIRECTION_EPSILON: f64 = 1e-9;

/// Physical parameters of one flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocketParams {
    /// Altitude above which the gravity turn starts (km).
    pub start_incline_after_distance: f64,
    /// Longest time the turn keeps rotating (s).
    pub thrust_incline_max_duration: f64,
    /// Angular rate of the turn (rad/s).
    pub thrust_incline_velocity: f64,
    pub fuel_mass: f64,        // kg
    pub exhaust_velocity: f64, // km/s
    pub mass_flow_rate: f64,   // kg/s
    pub payload_mass: f64,     // kg
}

impl Default for RocketParams {
    fn default() -> Self {
        Self {
            start_incline_after_distance: 8.0,
            thrust_incline_max_duration: 160.0,
            thrust_incline_velocity: 0.5_f64.to_radians(),
            fuel_mass: 30_000.0,
            exhaust_velocity: 4.0,
            mass_flow_rate: 50.0,
            payload_mass: DEFAULT_PAYLOAD_MASS_KG,
        }
    }
}

impl RocketParams {
    pub fn initial_total_mass(&self) -> f64 {
        self.payload_mass + self.fuel_mass
    }

    /// Seconds until the fuel is exhausted.
    pub fn fuel_combustion_time(&self) -> f64 {
        if self.mass_flow_rate <= 0.0 {
            return 0.0;
        }
        self.fuel_mass / self.mass_flow_rate
    }

    /// Total mass after `elapsed` seconds, never below the payload.
    pub fn mass_at(&self, elapsed: f64) -> f64 {
        let burned = (self.mass_flow_rate * elapsed.max(0.0)).min(self.fuel_mass);
        self.initial_total_mass() - burned
    }

    /// Ideal Δv of the full burn (km/s).
    pub fn delta_v(&self) -> f64 {
        if self.payload_mass <= 0.0 {
            return f64::INFINITY;
        }
        self.exhaust_velocity * (self.initial_total_mass() / self.payload_mass).ln()
    }
}

/// Mutable flight state advanced by [`Rocket::update`].
///
/// Borrowing the gravity field keeps a rocket cheap to create, one per
/// fitness evaluation.
pub struct Rocket<'a, G: GravityField + ?Sized> {
    earth: &'a G,
    params: RocketParams,
    pub initial_position: Vec3,
    /// Unit vector of the straight line towards the target.
    pub target_direction: Vec3,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Thrust acceleration applied during the last step (km/s²).
    pub thrust: Vec3,
    pub gravity: Vec3,
    pub altitude: f64,
    pub max_altitude: f64,
    pub flight_time: f64,
    pub current_total_mass: f64,
    pub current_thrust_incline_duration: f64,
    pub thrust_incline_angle: f64,
    /// Per-axis sum of absolute displacements (km).
    pub travelled_distance: Vec3,
    pub has_landed: bool,
}

impl<'a, G: GravityField + ?Sized> Rocket<'a, G> {
    pub fn new(
        earth: &'a G,
        initial_position: Vec3,
        target_direction: Vec3,
        params: RocketParams,
    ) -> Self {
        let target_direction = target_direction
            .try_normalize(DIRECTION_EPSILON)
            .unwrap_or_else(Vec3::zeros);
        let altitude = earth.altitude_of(&initial_position);

        Self {
            earth,
            params,
            initial_position,
            target_direction,
            position: initial_position,
            velocity: Vec3::zeros(),
            thrust: Vec3::zeros(),
            gravity: earth.gravity_at(&initial_position),
            altitude,
            max_altitude: altitude,
            flight_time: 0.0,
            current_total_mass: params.initial_total_mass(),
            current_thrust_incline_duration: 0.0,
            thrust_incline_angle: 0.0,
            travelled_distance: Vec3::zeros(),
            has_landed: false,
        }
    }

    pub fn params(&self) -> &RocketParams {
        &self.params
    }

    pub fn fuel_combustion_time(&self) -> f64 {
        self.params.fuel_combustion_time()
    }

    pub fn remaining_fuel_mass(&self) -> f64 {
        self.current_total_mass - self.params.payload_mass
    }

    pub fn displacement(&self) -> Vec3 {
        self.position - self.initial_position
    }

    /// Advance the flight by `tick` seconds.
    pub fn update(&mut self, tick: f64) {
        if self.has_landed || tick <= 0.0 {
            return;
        }

        self.altitude = self.earth.altitude_of(&self.position);
        self.gravity = self.earth.gravity_at(&self.position);
        self.max_altitude = self.max_altitude.max(self.altitude);

        self.set_thrust(tick);

        if self.travelled_distance.norm() > LANDING_DISTANCE_THRESHOLD_KM && self.altitude <= 0.0 {
            self.velocity = Vec3::zeros();
            self.thrust = Vec3::zeros();
            self.has_landed = true;
            return;
        }

        self.velocity += (self.gravity + self.thrust) * tick;
        let step = self.velocity * tick;
        self.position += step;
        self.travelled_distance += step.abs();

        // The pad holds the rocket until thrust beats gravity
        if self.earth.altitude_of(&self.position) < 0.0
            && self.travelled_distance.norm() <= LANDING_DISTANCE_THRESHOLD_KM
        {
            self.position = self.initial_position;
            self.velocity = Vec3::zeros();
        }

        self.flight_time += tick;
        self.current_total_mass = self.params.mass_at(self.flight_time);
    }

    fn set_thrust(&mut self, tick: f64) {
        let burnout = self.params.fuel_combustion_time();
        if self.flight_time >= burnout || self.params.exhaust_velocity <= 0.0 {
            self.thrust = Vec3::zeros();
            return;
        }

        let mass_start = self.params.mass_at(self.flight_time);
        let mass_end = self.params.mass_at((self.flight_time + tick).min(burnout));
        let magnitude = if mass_end > 0.0 {
            self.params.exhaust_velocity * (mass_start / mass_end).ln() / tick
        } else {
            0.0
        };

        let up = match (-self.gravity).try_normalize(DIRECTION_EPSILON) {
            Some(up) => up,
            None => {
                self.thrust = Vec3::zeros();
                return;
            }
        };

        if self.altitude > self.params.start_incline_after_distance
            && self.current_thrust_incline_duration <= self.params.thrust_incline_max_duration
        {
            self.current_thrust_incline_duration += tick;
        }

        let heading = self.horizontal_heading(&up);
        let max_angle = up.angle(&heading);
        self.thrust_incline_angle = (self.params.thrust_incline_velocity
            * self.current_thrust_incline_duration)
            .min(max_angle);

        let direction = match Unit::try_new(up.cross(&heading), DIRECTION_EPSILON) {
            Some(axis) => UnitQuaternion::from_axis_angle(&axis, self.thrust_incline_angle) * up,
            None => up,
        };

        self.thrust = direction * magnitude;
    }

    /// Target direction projected onto the local horizontal plane.
    ///
    /// When the target lies straight above or below (the antipode), every
    /// heading is equally good; fall back to local east so the turn stays
    /// deterministic.
    fn horizontal_heading(&self, up: &Vec3) -> Vec3 {
        let projected = self.target_direction - up * self.target_direction.dot(up);
        if let Some(heading) = projected.try_normalize(DIRECTION_EPSILON) {
            return heading;
        }

        Vec3::y()
            .cross(up)
            .try_normalize(DIRECTION_EPSILON)
            .or_else(|| Vec3::x().cross(up).try_normalize(DIRECTION_EPSILON))
            .unwrap_or_else(Vec3::zeros)
    }
}
