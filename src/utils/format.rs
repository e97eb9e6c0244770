const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;

/// Render a duration in the largest unit that keeps the value at least 1,
/// e.g. `90.0` -> `"1.50 min"`.
pub fn format_seconds(seconds: f64) -> String {
    let magnitude = seconds.abs();

    if magnitude < MINUTE {
        format!("{:.2} seconds", seconds)
    } else if magnitude < HOUR {
        format!("{:.2} min", seconds / MINUTE)
    } else if magnitude < DAY {
        format!("{:.2} hr", seconds / HOUR)
    } else {
        format!("{:.2} day", seconds / DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_largest_unit() {
        assert_eq!(format_seconds(12.5), "12.50 seconds");
        assert_eq!(format_seconds(90.0), "1.50 min");
        assert_eq!(format_seconds(5400.0), "1.50 hr");
        assert_eq!(format_seconds(172_800.0), "2.00 day");
    }

    #[test]
    fn zero_is_seconds() {
        assert_eq!(format_seconds(0.0), "0.00 seconds");
    }
}
