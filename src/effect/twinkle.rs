//! Low-brightness random hues with occasional flicker spikes

use super::{Effect, EffectRng};
use crate::arbiter::EffectConfig;
use crate::color::{ChannelQuad, Rgb, apply_brightness, hsv_to_rgb};

const SATURATION: f32 = 0.8;
/// Flicker spikes are only considered on these tick boundaries
const FLICKER_EVERY: u32 = 50;
/// One in this many boundaries spikes
const FLICKER_ODDS: u32 = 10;

/// Picks a new hue every `256 - speed` ticks and holds it at a quarter of the
/// configured brightness, spiking to half now and then.
#[derive(Debug, Clone)]
pub struct TwinklePulseEffect {
    color: Rgb,
    seed: u64,
    rng: EffectRng,
}

impl TwinklePulseEffect {
    pub const fn new(seed: u64) -> Self {
        Self {
            color: Rgb { r: 0, g: 0, b: 0 },
            seed,
            rng: EffectRng::new(seed),
        }
    }

    /// Ticks between hue picks; 256 at speed 0, never zero
    pub const fn pick_period(speed: u8) -> u32 {
        256 - speed as u32
    }

    /// Hue currently held
    pub const fn color(&self) -> Rgb {
        self.color
    }
}

impl Effect for TwinklePulseEffect {
    fn compute(&mut self, tick: u32, config: &EffectConfig) -> ChannelQuad {
        if tick % Self::pick_period(config.speed) == 0 {
            self.color = hsv_to_rgb(self.rng.next_unit(), SATURATION, 1.0);
        }

        let brightness = config.brightness.min(config.max_duty);
        let mut level = brightness / 4;
        if tick % FLICKER_EVERY == 0 && self.rng.below(FLICKER_ODDS) == 0 {
            level = brightness / 2;
        }

        let color = ChannelQuad::from_rgb(self.color, config.max_duty);
        apply_brightness(color, level, config.max_duty)
    }

    fn reset(&mut self) {
        *self = Self::new(self.seed);
    }
}
