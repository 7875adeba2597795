//! Fine-grained hue rotation for high-resolution drivers

use super::Effect;
use crate::arbiter::EffectConfig;
use crate::color::{ChannelQuad, apply_brightness, hsv_to_duty};

/// Hue advance per tick at full speed, twenty times finer than `SmoothFade`
const HUE_STEP: f32 = 0.0001;

/// Like `SmoothFade`, but the color is computed directly in driver
/// resolution so every duty step of a 12-bit driver is used.
#[derive(Debug, Clone, Default)]
pub struct PrecisionFadeEffect {
    hue: f32,
}

impl PrecisionFadeEffect {
    pub const fn new() -> Self {
        Self { hue: 0.0 }
    }

    pub const fn hue(&self) -> f32 {
        self.hue
    }
}

impl Effect for PrecisionFadeEffect {
    fn compute(&mut self, _tick: u32, config: &EffectConfig) -> ChannelQuad {
        self.hue += f32::from(config.speed) / 255.0 * HUE_STEP;
        if self.hue >= 1.0 {
            self.hue -= libm::floorf(self.hue);
        }

        let color = hsv_to_duty(self.hue, 1.0, 1.0, config.max_duty);
        apply_brightness(color, config.brightness, config.max_duty)
    }

    fn reset(&mut self) {
        self.hue = 0.0;
    }
}
