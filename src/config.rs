//! Engine configuration loaded from TOML.
//!
//! ```toml
//! [scale]
//! mean_scale = 500.0
//! std_scale = 100.0
//!
//! [estimator]
//! max_iter = 100
//! tol = 1e-8
//! ```
//!
//! Every field is optional and falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriError};
use crate::estimation::EstimatorConfig;
use crate::scoring::ScoreScale;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scale: ScoreScale,
    pub estimator: EstimatorConfig,
}

impl EngineConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(input)?;
        config.check()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&input)?;
        tracing::debug!(path = %path.display(), ?config, "loaded engine configuration");
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        let est = &self.estimator;
        if !(self.scale.mean_scale.is_finite() && self.scale.std_scale.is_finite()) {
            return Err(TriError::Config("scale constants must be finite".into()));
        }
        if est.max_iter == 0 {
            return Err(TriError::Config("estimator.max_iter must be at least 1".into()));
        }
        if !(est.tol > 0.0 && est.max_step > 0.0) {
            return Err(TriError::Config(
                "estimator.tol and estimator.max_step must be positive".into(),
            ));
        }
        Ok(())
    }
}
