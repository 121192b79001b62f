use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::heartbeat::clamp01;

/// Monotonic non-decreasing mapping from `[0, 1]` into `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseCurve {
    Linear { from: f64, to: f64 },
    /// Cubic with flat tangents at both ends.
    EaseInOut { from: f64, to: f64 },
    /// Piecewise linear through `(x, y)` points sorted by `x`.
    Keyframes { points: Vec<(f64, f64)> },
}

impl ResponseCurve {
    pub const fn linear() -> Self {
        Self::Linear { from: 0.0, to: 1.0 }
    }

    pub const fn ease_in_out(from: f64, to: f64) -> Self {
        Self::EaseInOut { from, to }
    }

    /// Input outside `[0, 1]` is clamped first.
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = clamp01(t);
        match self {
            Self::Linear { from, to } => lerp(*from, *to, t),
            Self::EaseInOut { from, to } => lerp(*from, *to, t * t * (3.0 - 2.0 * t)),
            Self::Keyframes { points } => evaluate_keyframes(points, t),
        }
    }

    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::InvalidCurve(format!("{name}: {reason}")));
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);

        match self {
            Self::Linear { from, to } | Self::EaseInOut { from, to } => {
                if !in_unit(*from) || !in_unit(*to) {
                    return invalid(format!("endpoints must lie in [0, 1], got {from} -> {to}"));
                }
                if from > to {
                    return invalid(format!("curve must not decrease, got {from} -> {to}"));
                }
            }
            Self::Keyframes { points } => {
                if points.is_empty() {
                    return invalid("at least one keyframe is required".into());
                }
                if let Some((x, y)) = points.iter().find(|(x, y)| !in_unit(*x) || !in_unit(*y)) {
                    return invalid(format!("keyframe ({x}, {y}) lies outside the unit square"));
                }
                for pair in points.windows(2) {
                    let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
                    if x1 <= x0 {
                        return invalid(format!("keyframe x values must increase, got {x0} then {x1}"));
                    }
                    if y1 < y0 {
                        return invalid(format!("curve must not decrease, got {y0} then {y1}"));
                    }
                }
            }
        }
        Ok(())
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn evaluate_keyframes(points: &[(f64, f64)], t: f64) -> f64 {
    let (Some(&(first_x, first_y)), Some(&(last_x, last_y))) = (points.first(), points.last()) else {
        return t;
    };
    if t <= first_x {
        return first_y;
    }
    if t >= last_x {
        return last_y;
    }

    points
        .windows(2)
        .find(|pair| t <= pair[1].0)
        .map(|pair| {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            lerp(y0, y1, (t - x0) / (x1 - x0))
        })
        .unwrap_or(last_y)
}
