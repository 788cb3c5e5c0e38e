//! Layer Settings
//!
//! [`GfxSettings`] sizes the fixed resource pools. Pools never grow, so the
//! sizes are an upper bound on the number of live objects of each kind.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use slate::settings::GfxSettings;
//!
//! // Defaults for every pool
//! let settings = GfxSettings::default();
//!
//! // Room for more buffers, everything else default
//! let settings = GfxSettings {
//!     buffer_pool_size: 1024,
//!     ..Default::default()
//! };
//! ```
//!
//! Settings can also be loaded from any serde format; missing or zero fields
//! fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::errors::{GfxError, Result};
use crate::handle::{MAX_POOL_SIZE, ResourceKind};

pub const DEFAULT_BUFFER_POOL_SIZE: usize = 128;
pub const DEFAULT_IMAGE_POOL_SIZE: usize = 128;
pub const DEFAULT_SHADER_POOL_SIZE: usize = 32;
pub const DEFAULT_PIPELINE_POOL_SIZE: usize = 64;
pub const DEFAULT_PASS_POOL_SIZE: usize = 16;
pub const DEFAULT_CONTEXT_POOL_SIZE: usize = 16;

/// Pool capacities, one per object kind. `0` selects the default size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GfxSettings {
    pub buffer_pool_size: usize,
    pub image_pool_size: usize,
    pub shader_pool_size: usize,
    pub pipeline_pool_size: usize,
    pub pass_pool_size: usize,
    pub context_pool_size: usize,
}

impl Default for GfxSettings {
    fn default() -> Self {
        Self {
            buffer_pool_size: DEFAULT_BUFFER_POOL_SIZE,
            image_pool_size: DEFAULT_IMAGE_POOL_SIZE,
            shader_pool_size: DEFAULT_SHADER_POOL_SIZE,
            pipeline_pool_size: DEFAULT_PIPELINE_POOL_SIZE,
            pass_pool_size: DEFAULT_PASS_POOL_SIZE,
            context_pool_size: DEFAULT_CONTEXT_POOL_SIZE,
        }
    }
}

impl GfxSettings {
    /// Replaces zero sizes with the defaults.
    #[must_use]
    pub fn with_defaults(&self) -> Self {
        let defaults = Self::default();
        let pick = |value: usize, default: usize| if value == 0 { default } else { value };
        Self {
            buffer_pool_size: pick(self.buffer_pool_size, defaults.buffer_pool_size),
            image_pool_size: pick(self.image_pool_size, defaults.image_pool_size),
            shader_pool_size: pick(self.shader_pool_size, defaults.shader_pool_size),
            pipeline_pool_size: pick(self.pipeline_pool_size, defaults.pipeline_pool_size),
            pass_pool_size: pick(self.pass_pool_size, defaults.pass_pool_size),
            context_pool_size: pick(self.context_pool_size, defaults.context_pool_size),
        }
    }

    #[must_use]
    pub fn pool_size(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Buffer => self.buffer_pool_size,
            ResourceKind::Image => self.image_pool_size,
            ResourceKind::Shader => self.shader_pool_size,
            ResourceKind::Pipeline => self.pipeline_pool_size,
            ResourceKind::Pass => self.pass_pool_size,
            ResourceKind::Context => self.context_pool_size,
        }
    }

    /// Checks that every (resolved) size fits a pool.
    pub fn validate(&self) -> Result<()> {
        for kind in ResourceKind::RESOURCES.into_iter().chain([ResourceKind::Context]) {
            let size = self.pool_size(kind);
            if size == 0 || size >= MAX_POOL_SIZE {
                return Err(GfxError::InvalidPoolSize {
                    kind,
                    size,
                    max: MAX_POOL_SIZE,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sizes_fall_back_to_defaults() {
        let settings = GfxSettings {
            buffer_pool_size: 0,
            shader_pool_size: 7,
            ..Default::default()
        }
        .with_defaults();
        assert_eq!(settings.buffer_pool_size, DEFAULT_BUFFER_POOL_SIZE);
        assert_eq!(settings.shader_pool_size, 7);
    }

    #[test]
    fn oversized_pool_is_rejected() {
        let settings = GfxSettings {
            pass_pool_size: MAX_POOL_SIZE,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(GfxError::InvalidPoolSize {
                kind: ResourceKind::Pass,
                ..
            })
        ));
    }
}
