//! Manual-only entries: `Off` and `Static`
//!
//! Both are driven by explicit commands, never by automatic animation.

use super::Effect;
use crate::arbiter::EffectConfig;
use crate::color::{ChannelQuad, apply_brightness};

/// Constant dark output
#[derive(Debug, Clone, Default)]
pub struct OffEffect;

impl Effect for OffEffect {
    fn compute(&mut self, _tick: u32, _config: &EffectConfig) -> ChannelQuad {
        ChannelQuad::ZERO
    }
}

/// Base color scaled by brightness. Idempotent.
#[derive(Debug, Clone, Default)]
pub struct StaticColorEffect;

impl Effect for StaticColorEffect {
    fn compute(&mut self, _tick: u32, config: &EffectConfig) -> ChannelQuad {
        apply_brightness(config.base_color, config.brightness, config.max_duty)
    }
}
