use serde::{Deserialize, Serialize};

/// Discrete vibration strength handed to the haptics collaborator.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum HapticStrength {
    #[default]
    None,
    Medium,
    Strong,
}

impl HapticStrength {
    /// `> 0.7` is Strong, `> 0.3` Medium, anything else None.
    pub fn from_strength(strength: f64) -> Self {
        if strength > 0.7 {
            Self::Strong
        } else if strength > 0.3 {
            Self::Medium
        } else {
            Self::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discretization() {
        assert_eq!(HapticStrength::from_strength(1.0), HapticStrength::Strong);
        assert_eq!(HapticStrength::from_strength(0.71), HapticStrength::Strong);
        assert_eq!(HapticStrength::from_strength(0.7), HapticStrength::Medium);
        assert_eq!(HapticStrength::from_strength(0.31), HapticStrength::Medium);
        assert_eq!(HapticStrength::from_strength(0.3), HapticStrength::None);
        assert_eq!(HapticStrength::from_strength(f64::NAN), HapticStrength::None);
    }
}
