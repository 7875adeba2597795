//! Triangle-wave pulse for hysteretic drivers

use core::f32::consts::{PI, TAU};

use super::Effect;
use crate::arbiter::EffectConfig;
use crate::color::ChannelQuad;

/// Phase advance per tick at full speed
const PHASE_RATE: f32 = 0.05;

#[derive(Debug, Clone, Default)]
pub struct PulseWaveEffect {
    /// Phase in `[0, 2π)`
    phase: f32,
}

impl PulseWaveEffect {
    pub const fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Triangle wave `0 -> 1 -> 0` over one period
    pub fn triangle(phase: f32) -> f32 {
        if phase < PI {
            phase / PI
        } else {
            2.0 - phase / PI
        }
    }
}

impl Effect for PulseWaveEffect {
    fn compute(&mut self, _tick: u32, config: &EffectConfig) -> ChannelQuad {
        self.phase += f32::from(config.speed) / 255.0 * PHASE_RATE;
        if self.phase >= TAU {
            self.phase -= TAU;
        }

        let max_duty = config.max_duty;
        if max_duty == 0 {
            return ChannelQuad::ZERO;
        }
        let intensity = Self::triangle(self.phase).clamp(0.0, 1.0);
        let level = (f32::from(config.brightness.min(max_duty)) * intensity) as u16;

        // Base color follows the pulse, warm white carries it at full level
        let scale = |value: u16| {
            (u32::from(value.min(max_duty)) * u32::from(level) / u32::from(max_duty)) as u16
        };
        let base = config.base_color;
        ChannelQuad::new(scale(base.r), scale(base.g), scale(base.b), level)
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }
}
