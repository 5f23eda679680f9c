//! Engine configuration.

use serde::{Deserialize, Serialize};

use reptrack_core::Result;

use crate::counter::Thresholds;

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Angle thresholds for the repetition state machine
    pub thresholds: ThresholdConfig,

    /// Session manager limits
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Down/flexed threshold (degrees)
    pub down_angle: f64,

    /// Up/extended threshold (degrees)
    pub up_angle: f64,

    /// Classification gating threshold (degrees)
    pub classify_angle: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum concurrent tracking sessions
    pub max_sessions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig {
                down_angle: 110.0,
                up_angle: 150.0,
                classify_angle: 110.0,
            },
            session: SessionConfig { max_sessions: 64 },
        }
    }
}

impl EngineConfig {
    /// Load configuration from file, with `REPTRACK_*` environment
    /// overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("REPTRACK"))
            .build()
            .map_err(|e| reptrack_core::Error::Config(e.to_string()))?;

        let cfg: Self = settings
            .try_deserialize()
            .map_err(|e| reptrack_core::Error::Config(e.to_string()))?;
        cfg.thresholds()?;
        Ok(cfg)
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("REPTRACK"))
            .build()
            .map_err(|e| reptrack_core::Error::Config(e.to_string()))?;

        let cfg: Self = settings
            .try_deserialize()
            .map_err(|e| reptrack_core::Error::Config(e.to_string()))?;
        cfg.thresholds()?;
        Ok(cfg)
    }

    /// Validated thresholds for the state machine
    pub fn thresholds(&self) -> Result<Thresholds> {
        let thresholds = Thresholds {
            down: self.thresholds.down_angle,
            up: self.thresholds.up_angle,
            classify: self.thresholds.classify_angle,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }
}
