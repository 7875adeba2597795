//! Random cool-white lightning strikes

use super::{Effect, EffectRng};
use crate::arbiter::EffectConfig;
use crate::color::ChannelQuad;

/// Idle ticks before strikes are possible at speed 0
const MAX_IDLE_TICKS: u32 = 500;
/// Once armed, one in this many ticks strikes
const STRIKE_ODDS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightningPhase {
    Idle,
    Flashing,
}

/// Two-phase strike generator.
///
/// While idle it waits `500 - 2 * speed` ticks, then strikes with a 1% chance
/// per tick. A strike plays a fixed sequence: bright flash, dim, second flash,
/// back to idle.
#[derive(Debug, Clone)]
pub struct LightningFlashEffect {
    phase: LightningPhase,
    timer: u32,
    seed: u64,
    rng: EffectRng,
}

impl LightningFlashEffect {
    pub const fn new(seed: u64) -> Self {
        Self {
            phase: LightningPhase::Idle,
            timer: 0,
            seed,
            rng: EffectRng::new(seed),
        }
    }

    pub const fn phase(&self) -> LightningPhase {
        self.phase
    }

    /// Idle ticks required before a strike may happen
    pub const fn idle_ticks(speed: u8) -> u32 {
        MAX_IDLE_TICKS.saturating_sub(speed as u32 * 2)
    }

    fn idle(&mut self, speed: u8) -> ChannelQuad {
        if self.timer > Self::idle_ticks(speed) && self.rng.below(STRIKE_ODDS) == 0 {
            self.phase = LightningPhase::Flashing;
            self.timer = 0;
        }
        ChannelQuad::ZERO
    }

    fn flash(&mut self, brightness: u16) -> ChannelQuad {
        let level = u32::from(brightness);
        // `compute` advances the timer first, so a strike starts at 1
        match self.timer {
            1..=2 => ChannelQuad::new(brightness / 2, 0, 0, brightness),
            3..=5 => ChannelQuad::new(0, 0, 0, brightness / 4),
            6..=7 => ChannelQuad::new(0, 0, 0, (level * 3 / 4) as u16),
            _ => {
                self.phase = LightningPhase::Idle;
                self.timer = 0;
                ChannelQuad::ZERO
            }
        }
    }
}

impl Effect for LightningFlashEffect {
    fn compute(&mut self, _tick: u32, config: &EffectConfig) -> ChannelQuad {
        self.timer = self.timer.saturating_add(1);

        match self.phase {
            LightningPhase::Idle => self.idle(config.speed),
            LightningPhase::Flashing => self.flash(config.brightness.min(config.max_duty)),
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.seed);
    }
}
