//! Fast red/green/blue strobe

use super::Effect;
use crate::arbiter::EffectConfig;
use crate::color::{Channel, ChannelQuad};

const STROBE_CHANNELS: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

/// Toggles on and off every `(255 - speed) / divisor + 1` ticks and moves to
/// the next primary after each full on/off period.
#[derive(Debug, Clone)]
pub struct FastStrobeEffect {
    on: bool,
    last_toggle: u32,
    divisor: u32,
}

impl FastStrobeEffect {
    pub const fn new(divisor: u32) -> Self {
        Self {
            on: false,
            last_toggle: 0,
            // a zero divisor would stall the strobe
            divisor: if divisor == 0 { 1 } else { divisor },
        }
    }

    /// Ticks between on/off toggles, at least 1
    pub const fn interval(&self, speed: u8) -> u32 {
        (255 - speed as u32) / self.divisor + 1
    }

    pub const fn is_on(&self) -> bool {
        self.on
    }
}

impl Effect for FastStrobeEffect {
    fn compute(&mut self, tick: u32, config: &EffectConfig) -> ChannelQuad {
        let interval = self.interval(config.speed);
        if tick.wrapping_sub(self.last_toggle) >= interval {
            self.on = !self.on;
            self.last_toggle = tick;
        }

        let mut quad = ChannelQuad::ZERO;
        if self.on {
            let channel = STROBE_CHANNELS[((tick / (interval * 2)) % 3) as usize];
            quad.set(channel, config.brightness.min(config.max_duty));
        }
        quad
    }

    fn reset(&mut self) {
        self.on = false;
        self.last_toggle = 0;
    }
}
