use crate::error::{Error, Result};
use meadow_core::Rng;
use serde::{Deserialize, Serialize};

/// Rendering quality. `Fast` skips the soft-shade blur filters on leaves and petals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Fast,
    Smooth,
}

impl Quality {
    pub fn is_fast(self) -> bool {
        self == Quality::Fast
    }
}

/// Picture settings. Every field has a default, so `{}` is a valid JSON config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeadowConfig {
    pub width: f64,
    pub height: f64,
    /// Fixed seed for reproducible output; drawn from process entropy when absent.
    pub seed: Option<u64>,
    pub smooth: bool,
    pub grass_blades: u32,
}

impl Default for MeadowConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            seed: None,
            smooth: false,
            grass_blades: 180,
        }
    }
}

impl MeadowConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: MeadowConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("width", self.width), ("height", self.height)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be a positive number, got {v}"),
                });
            }
        }
        Ok(())
    }

    pub fn quality(&self) -> Quality {
        if self.smooth {
            Quality::Smooth
        } else {
            Quality::Fast
        }
    }

    pub fn rng(&self) -> Rng {
        match self.seed {
            Some(seed) => Rng::new(seed),
            None => Rng::from_entropy(),
        }
    }
}
