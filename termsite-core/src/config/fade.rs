//! Fade engine configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

use crate::fade::DEFAULT_STICKY_OFFSET_PX;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeSettings {
    /// Fallback for `--card-sticky-top` when the host cannot supply it
    /// Env: TS_STICKY_OFFSET
    /// Default: 88
    pub sticky_offset_px: u32,
}

impl Default for FadeSettings {
    fn default() -> Self {
        Self { sticky_offset_px: DEFAULT_STICKY_OFFSET_PX }
    }
}

impl FadeSettings {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        self.apply_env_with(|key| env::var(key).ok());
    }

    /// Apply overrides read through `lookup` instead of the process environment
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(offset) = lookup("TS_STICKY_OFFSET") {
            if let Ok(px) = offset.trim().parse() {
                self.sticky_offset_px = px;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sticky_offset_px == 0 {
            bail!("Invalid fade.sticky_offset_px: must be greater than 0");
        }
        Ok(())
    }

    pub fn sticky_offset(&self) -> f64 {
        f64::from(self.sticky_offset_px)
    }
}
