//! Warm candle flame

use super::{Effect, EffectRng};
use crate::arbiter::EffectConfig;
use crate::color::ChannelQuad;

pub const FLAME_MIN: f32 = 0.3;
pub const FLAME_MAX: f32 = 1.0;
/// Largest change of the flame intensity per tick
const FLAME_STEP: f32 = 0.1;

// Warm palette relative to red
const GREEN_RATIO: f32 = 0.4;
const WHITE_RATIO: f32 = 0.8;

/// Bounded random walk on the flame intensity, mapped to red, some green and
/// warm white. Blue stays dark.
#[derive(Debug, Clone)]
pub struct CandleFlickerEffect {
    flame: f32,
    seed: u64,
    rng: EffectRng,
}

impl CandleFlickerEffect {
    pub const fn new(seed: u64) -> Self {
        Self {
            flame: FLAME_MAX,
            seed,
            rng: EffectRng::new(seed),
        }
    }

    pub const fn flame(&self) -> f32 {
        self.flame
    }
}

impl Effect for CandleFlickerEffect {
    fn compute(&mut self, _tick: u32, config: &EffectConfig) -> ChannelQuad {
        self.flame += (self.rng.next_unit() - 0.5) * FLAME_STEP;
        self.flame = self.flame.clamp(FLAME_MIN, FLAME_MAX);

        let intensity = 0.7 + 0.3 * self.flame;
        let red = f32::from(config.brightness.min(config.max_duty)) * intensity;

        ChannelQuad {
            r: red as u16,
            g: (red * GREEN_RATIO) as u16,
            b: 0,
            w: (red * WHITE_RATIO) as u16,
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.seed);
    }
}
