//! Sine breathing on the base color

use super::Effect;
use crate::arbiter::EffectConfig;
use crate::color::{ChannelQuad, apply_brightness};

/// Angular step per tick at full speed
const BREATH_RATE: f64 = 0.02;

/// Brightness envelope `(sin(tick * speed_factor) + 1) / 2` over the base color.
///
/// The phase is derived from the tick counter alone, so there is no scratch
/// state. At speed 0 the envelope stays at half brightness.
#[derive(Debug, Clone, Default)]
pub struct BreathingEffect;

impl BreathingEffect {
    /// Envelope value in `[0, 1]` for a tick and speed
    pub fn envelope(tick: u32, speed: u8) -> f32 {
        let speed_factor = f64::from(speed) / 255.0 * BREATH_RATE;
        let phase = f64::from(tick) * speed_factor;
        ((libm::sin(phase) + 1.0) / 2.0) as f32
    }
}

impl Effect for BreathingEffect {
    fn compute(&mut self, tick: u32, config: &EffectConfig) -> ChannelQuad {
        let envelope = Self::envelope(tick, config.speed);
        let brightness = f32::from(config.brightness.min(config.max_duty)) * envelope;
        apply_brightness(config.base_color, brightness as u16, config.max_duty)
    }
}
