use crate::heartbeat::level::{LevelReading, Thresholds};

/// Normalized intensity never drops below this while Critical.
pub const CRITICAL_INTENSITY_FLOOR: f64 = 0.9;

pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Position within the current level's band, 1.0 at the band floor
/// (closest edge) and 0.0 at its ceiling.
pub fn normalized_intensity(distance: f64, reading: LevelReading, thresholds: &Thresholds) -> f64 {
    let Some((floor, ceiling)) = thresholds.band(reading.level) else {
        return 0.0;
    };

    let span = ceiling - floor;
    let normalized = if span > 0.0 {
        clamp01(1.0 - (distance - floor) / span)
    } else {
        1.0
    };

    if reading.critical {
        normalized.max(CRITICAL_INTENSITY_FLOOR)
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heartbeat::level::classify;
    use approx::assert_abs_diff_eq;

    fn at(distance: f64) -> f64 {
        let t = Thresholds::default();
        normalized_intensity(distance, classify(distance, &t), &t)
    }

    #[test]
    fn test_band_interpolation() {
        // Far band spans 30..50
        assert_abs_diff_eq!(at(50.0), 0.0);
        assert_abs_diff_eq!(at(40.0), 0.5);
        // Mid band spans 10..30
        assert_abs_diff_eq!(at(25.0), 0.25);
        // Near band spans 0..10
        assert_abs_diff_eq!(at(3.0), 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_critical_floor() {
        assert_abs_diff_eq!(at(0.5), 0.95, epsilon = 1e-12);
        assert!(at(0.4) >= CRITICAL_INTENSITY_FLOOR);

        let t = Thresholds {
            critical: 5.0,
            ..Thresholds::default()
        };
        let reading = classify(4.0, &t);
        assert!(reading.critical);
        assert_abs_diff_eq!(normalized_intensity(4.0, reading, &t), 0.9);
    }

    #[test]
    fn test_none_is_zero() {
        assert_eq!(at(60.0), 0.0);
        assert_eq!(at(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(1.5), 1.0);
        assert_eq!(clamp01(f64::NAN), 0.0);
    }
}
