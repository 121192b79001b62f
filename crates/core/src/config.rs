//! Session configuration, loaded from JSON and validated once up front.
//!
//! Every section has defaults, so `{}` is a complete configuration.

use pursuit_ranging::{PlayerId, SessionId, SimulationConfig};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feedback::FeedbackConfig;
use crate::heartbeat::{CadenceConfig, Thresholds};
use crate::proximity::RegistryConfig;
use crate::validation::ValidationConfig;

pub const DEFAULT_REGION_UUID: &str = "550e8400-e29b-41d4-a716-446655440000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid level thresholds: {0}")]
    InvalidThresholds(String),
    #[error("Invalid cadence: {0}")]
    InvalidCadence(String),
    #[error("Invalid response curve: {0}")]
    InvalidCurve(String),
    #[error("Invalid region UUID {uuid:?}: {source}")]
    InvalidUuid {
        uuid: String,
        #[source]
        source: uuid::Error,
    },
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("Malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn ensure_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a value in [0, 1], got {value}"),
        })
    }
}

pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a non-negative number, got {value}"),
        })
    }
}

/// Advertise/scan identity shared by every device in a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub region_uuid: String,
    pub session_id: SessionId,
    /// The one identifier that plays the Hunter.
    pub hunter_id: PlayerId,
    /// Used when the persisted PlayerID is missing or malformed.
    pub default_player_id: PlayerId,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            region_uuid: DEFAULT_REGION_UUID.into(),
            session_id: SessionId::new(1),
            hunter_id: PlayerId::new(1000),
            default_player_id: PlayerId::new(1001),
        }
    }
}

impl IdentityConfig {
    pub fn region(&self) -> Result<Uuid, ConfigError> {
        Uuid::parse_str(&self.region_uuid).map_err(|source| ConfigError::InvalidUuid {
            uuid: self.region_uuid.clone(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.region()?;
        if self.default_player_id == self.hunter_id {
            return Err(ConfigError::InvalidValue {
                field: "identity.default_player_id",
                reason: "the fallback player must not be the Hunter".into(),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    pub identity: IdentityConfig,
    pub registry: RegistryConfig,
    pub levels: Thresholds,
    pub cadence: CadenceConfig,
    pub feedback: FeedbackConfig,
    pub validation: ValidationConfig,
    pub simulation: SimulationConfig,
}

impl HeartbeatConfig {
    /// Parse and validate.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.identity.validate()?;
        self.registry.validate()?;
        self.levels.validate()?;
        self.cadence.audio.validate("cadence.audio")?;
        self.cadence.ui.validate("cadence.ui")?;
        self.feedback.validate()?;
        self.validation.validate()?;
        self.validate_simulation()
    }

    fn validate_simulation(&self) -> Result<(), ConfigError> {
        let simulation = &self.simulation;
        if simulation.period.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "simulation.period",
                reason: "period must be non-zero".into(),
            });
        }
        ensure_non_negative("simulation.min_distance", simulation.min_distance)?;
        ensure_non_negative("simulation.max_distance", simulation.max_distance)?;
        if simulation.min_distance > simulation.max_distance {
            return Err(ConfigError::InvalidValue {
                field: "simulation.max_distance",
                reason: format!(
                    "range {}..{} is empty",
                    simulation.min_distance, simulation.max_distance
                ),
            });
        }
        Ok(())
    }
}
