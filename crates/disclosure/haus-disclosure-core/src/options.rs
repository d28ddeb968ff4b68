//! Animation options and open-set policy.

use haus_carousel_core::Easing;
use serde::{Deserialize, Serialize};

/// Default height transition length, ms.
pub const DEFAULT_DURATION_MS: f64 = 300.0;

/// Timing of a height transition.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            easing: Easing::EaseInOut,
        }
    }
}

/// How many details may be open at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    Multiple,
    /// Opening one details closes the others.
    Single,
}
