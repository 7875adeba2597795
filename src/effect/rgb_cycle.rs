//! Hard switching between seven fixed colors

use super::Effect;
use crate::arbiter::EffectConfig;
use crate::color::ChannelQuad;

/// Red, green, blue, yellow, magenta, cyan, white as (r, g, b) on/off masks
const CYCLE: [(bool, bool, bool); 7] = [
    (true, false, false),
    (false, true, false),
    (false, false, true),
    (true, true, false),
    (true, false, true),
    (false, true, true),
    (true, true, true),
];

/// Ticks to hold each color. Speed 255 holds for 50 ticks, speed 0 for 560.
pub const fn hold_ticks(speed: u8) -> u32 {
    (255 - speed as u32) * 2 + 50
}

/// Steps through [`CYCLE`] without interpolation.
#[derive(Debug, Clone, Default)]
pub struct RgbCycleEffect {
    state: u8,
    last_change: u32,
}

impl RgbCycleEffect {
    pub const fn new() -> Self {
        Self {
            state: 0,
            last_change: 0,
        }
    }

    /// Index of the color currently shown
    pub const fn state(&self) -> u8 {
        self.state
    }
}

impl Effect for RgbCycleEffect {
    fn compute(&mut self, tick: u32, config: &EffectConfig) -> ChannelQuad {
        if tick.wrapping_sub(self.last_change) >= hold_ticks(config.speed) {
            self.state = (self.state + 1) % CYCLE.len() as u8;
            self.last_change = tick;
        }

        let level = config.brightness.min(config.max_duty);
        let (r, g, b) = CYCLE[usize::from(self.state)];
        let on = |enabled: bool| if enabled { level } else { 0 };
        ChannelQuad::new(on(r), on(g), on(b), 0)
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
