//! Eased state-to-state transitions through the four primaries

use super::Effect;
use crate::arbiter::EffectConfig;
use crate::color::{Channel, ChannelQuad};

/// Channels visited in order, each at full brightness
const TARGETS: [Channel; 4] = Channel::ALL;

/// Ticks per transition. Speed 255 takes 100 ticks, speed 0 takes 2650.
pub const fn transition_ticks(speed: u8) -> u32 {
    (255 - speed as u32) * 10 + 100
}

/// Smoothstep ease on `[0, 1]`
fn ease(progress: f32) -> f32 {
    progress * progress * (3.0 - 2.0 * progress)
}

fn lerp(from: u16, to: u16, amount: f32) -> u16 {
    let from = f32::from(from);
    let value = from + (f32::from(to) - from) * amount;
    libm::roundf(value).max(0.0) as u16
}

/// Cross-fades red, green, blue, warm white in turn.
///
/// Each transition starts from whatever was shown when the previous one
/// ended, so a speed change mid-way never jumps.
#[derive(Debug, Clone, Default)]
pub struct SoftTransitionEffect {
    target: u8,
    started_at: u32,
    source: ChannelQuad,
    current: ChannelQuad,
}

impl SoftTransitionEffect {
    pub const fn new() -> Self {
        Self {
            target: 0,
            started_at: 0,
            source: ChannelQuad::ZERO,
            current: ChannelQuad::ZERO,
        }
    }

    /// Channel currently being faded in
    pub const fn target(&self) -> Channel {
        TARGETS[self.target as usize]
    }
}

impl Effect for SoftTransitionEffect {
    fn compute(&mut self, tick: u32, config: &EffectConfig) -> ChannelQuad {
        let duration = transition_ticks(config.speed);
        if tick.wrapping_sub(self.started_at) >= duration {
            self.target = (self.target + 1) % TARGETS.len() as u8;
            self.started_at = tick;
            self.source = self.current;
        }

        let elapsed = tick.wrapping_sub(self.started_at);
        let progress = ease((elapsed as f32 / duration as f32).min(1.0));

        let mut goal = ChannelQuad::ZERO;
        goal.set(self.target(), config.brightness.min(config.max_duty));

        self.current = ChannelQuad {
            r: lerp(self.source.r, goal.r, progress),
            g: lerp(self.source.g, goal.g, progress),
            b: lerp(self.source.b, goal.b, progress),
            w: lerp(self.source.w, goal.w, progress),
        }
        .clamped(config.max_duty);
        self.current
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
