//! Smooth hue rotation (default ambient effect)

use super::Effect;
use crate::arbiter::EffectConfig;
use crate::color::{ChannelQuad, apply_brightness, hsv_to_rgb};

/// Fully saturated hue wheel advancing a little every tick.
#[derive(Debug, Clone)]
pub struct SmoothFadeEffect {
    /// Hue accumulator in `[0, 1)`
    hue: f32,
    /// Hue advance per tick at full speed
    rate: f32,
}

impl SmoothFadeEffect {
    pub const fn new(rate: f32) -> Self {
        Self { hue: 0.0, rate }
    }

    pub const fn hue(&self) -> f32 {
        self.hue
    }
}

impl Effect for SmoothFadeEffect {
    fn compute(&mut self, _tick: u32, config: &EffectConfig) -> ChannelQuad {
        self.hue += f32::from(config.speed) / 255.0 * self.rate;
        if self.hue >= 1.0 {
            self.hue -= libm::floorf(self.hue);
        }

        let color = ChannelQuad::from_rgb(hsv_to_rgb(self.hue, 1.0, 1.0), config.max_duty);
        apply_brightness(color, config.brightness, config.max_duty)
    }

    fn reset(&mut self) {
        self.hue = 0.0;
    }
}
