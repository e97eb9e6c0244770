use crate::types::{GeoCoordinates, Vec3};
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Mean radius used for the surface sphere (km).
pub const EARTH_RADIUS_KM: f64 = 6378.0;
/// Gravitational constant (m³ kg⁻¹ s⁻²). SI, not km.
pub const GRAVITATIONAL_CONSTANT: f64 = 6.6743e-11;
/// Earth mass (kg).
pub const EARTH_MASS_KG: f64 = 5.972e24;
/// Sidereal rotation rate (rad/s) about the polar (+Y) axis.
pub const EARTH_ROTATION_SPEED: f64 = 7.292_115_9e-5;

/// Read-only view of a central body, as the integrator needs it.
pub trait GravityField: Send + Sync {
    /// Gravitational acceleration at `position`, km/s², pointing at the body centre.
    fn gravity_at(&self, position: &Vec3) -> Vec3;

    /// Height above the surface in km; negative below it.
    fn altitude_of(&self, position: &Vec3) -> f64;
}

/// Spherical, uniform-density Earth.
///
/// Positions are in km in a frame whose +Y axis is the rotation axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Earth {
    pub center: Vec3,
    pub radius: f64,
    pub mass: f64,
    pub rotation_speed: f64,
    /// Accumulated rotation in radians, wrapped to `[0, 2π)`.
    pub rotation_angle: f64,
}

impl Default for Earth {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            radius: EARTH_RADIUS_KM,
            mass: EARTH_MASS_KG,
            rotation_speed: EARTH_ROTATION_SPEED,
            rotation_angle: 0.0,
        }
    }
}

impl Earth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the body's rotation by `dt` seconds.
    pub fn rotate(&mut self, dt: f64) {
        self.rotation_angle = (self.rotation_angle + self.rotation_speed * dt).rem_euclid(TAU);
    }

    /// Rotation the body performs over `seconds`.
    pub fn rotation_over(&self, seconds: f64) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.rotation_speed * seconds)
    }

    /// Where a surface-fixed `point` ends up after `seconds` of rotation.
    pub fn rotate_point(&self, point: &Vec3, seconds: f64) -> Vec3 {
        self.center + self.rotation_over(seconds) * (point - self.center)
    }

    /// Surface point for latitude/longitude in degrees.
    pub fn geo_to_position(&self, geo: GeoCoordinates) -> Vec3 {
        let phi = (90.0 - geo.latitude).to_radians();
        let theta = (geo.longitude + 180.0).to_radians();

        self.center
            + Vec3::new(
                self.radius * phi.sin() * theta.cos(),
                self.radius * phi.cos(),
                self.radius * phi.sin() * theta.sin(),
            )
    }

    /// Inverse of [`Earth::geo_to_position`]; longitude is wrapped to `[-180, 180)`.
    pub fn position_to_geo(&self, position: &Vec3) -> GeoCoordinates {
        let relative = position - self.center;
        let distance = relative.norm();
        if distance == 0.0 {
            return GeoCoordinates::new(0.0, 0.0);
        }

        let latitude = 90.0 - (relative.y / distance).clamp(-1.0, 1.0).acos().to_degrees();
        let longitude = relative.z.atan2(relative.x).to_degrees() - 180.0;

        GeoCoordinates::new(latitude, (longitude + 180.0).rem_euclid(360.0) - 180.0)
    }
}

impl GravityField for Earth {
    fn gravity_at(&self, position: &Vec3) -> Vec3 {
        let to_center = self.center - position;
        let distance_km = to_center.norm();
        if distance_km == 0.0 {
            return Vec3::zeros();
        }

        let distance_m = distance_km * 1000.0;
        let magnitude_m_s2 = GRAVITATIONAL_CONSTANT * self.mass / (distance_m * distance_m);

        // m/s² -> km/s²
        to_center / distance_km * (magnitude_m_s2 * 0.001)
    }

    fn altitude_of(&self, position: &Vec3) -> f64 {
        (position - self.center).norm() - self.radius
    }
}
