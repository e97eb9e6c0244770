use crate::error::TrajectoryError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), TrajectoryError>;
}

pub(crate) fn ensure_fraction(section: &str, name: &str, value: f64) -> Result<(), TrajectoryError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(TrajectoryError::Configuration(format!(
            "{}.{} must be between 0 and 1, got {}",
            section, name, value
        )));
    }
    Ok(())
}

pub(crate) fn ensure_positive(section: &str, name: &str, value: f64) -> Result<(), TrajectoryError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(TrajectoryError::Configuration(format!(
            "{}.{} must be positive, got {}",
            section, name, value
        )));
    }
    Ok(())
}
