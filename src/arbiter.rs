//! Mode arbiter
//!
//! Owns the single shared lighting configuration. The control transport
//! writes it from its callback context and the animation scheduler reads it
//! every tick, so all access goes through a critical section.
//!
//! Arbitration policy: manual writes win immediately. Automatic animation
//! only runs while the effect system is enabled, manual mode is off, and the
//! current effect is not one of the manual-only entries (`Static`, `Off`).

use core::cell::RefCell;

use critical_section::Mutex;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{Channel, ChannelQuad, to_driver};
use crate::effect::EffectId;
use crate::error::InvalidEffect;

/// The lighting configuration shared between control and animation.
///
/// Brightness and colors are in driver resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectConfig {
    pub current_effect: EffectId,
    /// `0..=max_duty`
    pub brightness: u16,
    /// Qualitative animation rate, interpreted per effect
    pub speed: u8,
    pub base_color: ChannelQuad,
    /// Master switch for the effect system
    pub enabled: bool,
    /// Driver resolution ceiling
    pub max_duty: u16,
}

/// Startup values, given on the 0-255 wire scale
#[derive(Debug, Clone, Copy)]
pub struct ArbiterDefaults {
    pub effect: EffectId,
    pub brightness: u8,
    pub speed: u8,
    /// Red, green, blue, warm white
    pub color: [u8; 4],
    pub enabled: bool,
}

impl ArbiterDefaults {
    /// Smooth fade at full brightness, speed 50, red base color
    pub const fn new() -> Self {
        Self {
            effect: EffectId::SmoothFade,
            brightness: 255,
            speed: 50,
            color: [255, 0, 0, 0],
            enabled: true,
        }
    }
}

impl Default for ArbiterDefaults {
    fn default() -> Self {
        Self::new()
    }
}

/// Full arbiter state as seen by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbiterState {
    pub config: EffectConfig,
    /// Automatic animation is paused, output follows explicit commands only
    pub manual_mode: bool,
    pub link_connected: bool,
    /// Incremented on every effect switch-in, including re-selecting the
    /// current effect. Consumers reset effect scratch state when it changes.
    pub epoch: u32,
}

impl ArbiterState {
    /// Whether the scheduler should run the automatic frame generator
    pub const fn should_animate(&self) -> bool {
        self.config.enabled && !self.manual_mode && !self.config.current_effect.is_manual_only()
    }

    fn switch_effect(&mut self, id: EffectId) {
        self.config.current_effect = id;
        self.epoch = self.epoch.wrapping_add(1);
    }
}

/// Lock-protected owner of [`EffectConfig`] and the manual-mode flag.
///
/// Can live in a `static` and be shared by reference between the control
/// callback context and the scheduler task.
pub struct ModeArbiter {
    inner: Mutex<RefCell<ArbiterState>>,
}

impl ModeArbiter {
    /// Create an arbiter with [`ArbiterDefaults::new`]
    pub const fn new(max_duty: u16) -> Self {
        Self::with_defaults(max_duty, ArbiterDefaults::new())
    }

    /// Create an arbiter, converting the wire-scale defaults to `max_duty`
    pub const fn with_defaults(max_duty: u16, defaults: ArbiterDefaults) -> Self {
        let [r, g, b, w] = defaults.color;
        let config = EffectConfig {
            current_effect: defaults.effect,
            brightness: to_driver(defaults.brightness, max_duty),
            speed: defaults.speed,
            base_color: ChannelQuad::new(
                to_driver(r, max_duty),
                to_driver(g, max_duty),
                to_driver(b, max_duty),
                to_driver(w, max_duty),
            ),
            enabled: defaults.enabled,
            max_duty,
        };
        Self {
            inner: Mutex::new(RefCell::new(ArbiterState {
                config,
                manual_mode: defaults.effect.is_manual_only(),
                link_connected: false,
                epoch: 0,
            })),
        }
    }

    fn update<R>(&self, f: impl FnOnce(&mut ArbiterState) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow(cs).borrow_mut()))
    }

    fn read<R>(&self, f: impl FnOnce(&ArbiterState) -> R) -> R {
        critical_section::with(|cs| f(&self.inner.borrow(cs).borrow()))
    }

    /// Set one base color channel from a wire value.
    ///
    /// Forces manual mode and the `Static` effect, so the next tick outputs
    /// the new value.
    pub fn set_channel(&self, channel: Channel, value: u8) {
        self.update(|state| {
            let duty = to_driver(value, state.config.max_duty);
            state.config.base_color.set(channel, duty);
            state.manual_mode = true;
            state.switch_effect(EffectId::Static);

            #[cfg(feature = "esp32-log")]
            println!(
                "[ModeArbiter.set_channel] {:?} = {} (driver: {})",
                channel, value, duty
            );
        });
    }

    /// Set all four base channels in driver resolution. Mode and effect are
    /// left untouched.
    pub fn set_color(&self, color: ChannelQuad) {
        self.update(|state| {
            let clamped = color.clamped(state.config.max_duty);
            #[cfg(feature = "esp32-log")]
            if clamped != color {
                println!("[ModeArbiter.set_color] clamped {:?} to {:?}", color, clamped);
            }
            state.config.base_color = clamped;
        });
    }

    /// Select an effect and reset its scratch state.
    ///
    /// Manual mode follows the selection: on for `Static`/`Off`, off otherwise.
    pub fn set_effect(&self, id: EffectId) {
        self.update(|state| {
            state.switch_effect(id);
            state.manual_mode = id.is_manual_only();

            #[cfg(feature = "esp32-log")]
            println!(
                "[ModeArbiter.set_effect] effect = {} (manual: {})",
                id.as_str(),
                state.manual_mode
            );
        });
    }

    /// Select an effect by wire id. Unknown ids leave the state untouched.
    pub fn set_effect_raw(&self, raw: u8) -> Result<EffectId, InvalidEffect> {
        let id = EffectId::try_from(raw).inspect_err(|_err| {
            #[cfg(feature = "esp32-log")]
            println!("[ModeArbiter.set_effect_raw] rejected {}", _err);
        })?;
        self.set_effect(id);
        Ok(id)
    }

    /// Set brightness in driver resolution, clamped to `max_duty`
    pub fn set_brightness(&self, brightness: u16) {
        self.update(|state| {
            let clamped = brightness.min(state.config.max_duty);
            #[cfg(feature = "esp32-log")]
            if clamped != brightness {
                println!(
                    "[ModeArbiter.set_brightness] clamped {} to {}",
                    brightness, clamped
                );
            }
            state.config.brightness = clamped;
        });
    }

    pub fn set_speed(&self, speed: u8) {
        self.update(|state| state.config.speed = speed);
    }

    /// Enable or disable the whole effect system
    pub fn set_enabled(&self, enabled: bool) {
        self.update(|state| state.config.enabled = enabled);
    }

    pub fn enable_manual_mode(&self) {
        self.update(|state| state.manual_mode = true);
        #[cfg(feature = "esp32-log")]
        println!("[ModeArbiter] manual mode enabled, effects paused");
    }

    pub fn disable_manual_mode(&self) {
        self.update(|state| state.manual_mode = false);
        #[cfg(feature = "esp32-log")]
        println!("[ModeArbiter] manual mode disabled, effects resumed");
    }

    /// Control link state changed.
    ///
    /// Connecting pauses automatic animation. Disconnecting always resumes
    /// the default ambient `SmoothFade`, whatever was selected before.
    pub fn on_link_connected(&self, connected: bool) {
        self.update(|state| {
            state.link_connected = connected;
            if connected {
                state.manual_mode = true;
            } else {
                state.manual_mode = false;
                state.switch_effect(EffectId::SmoothFade);
            }
        });

        #[cfg(feature = "esp32-log")]
        if connected {
            println!("[ModeArbiter] link connected, switching to manual mode");
        } else {
            println!("[ModeArbiter] link disconnected, starting smooth fade");
        }
    }

    /// Read-only copy of the shared configuration
    pub fn snapshot(&self) -> EffectConfig {
        self.read(|state| state.config)
    }

    /// Read-only copy of everything the scheduler needs
    pub fn state(&self) -> ArbiterState {
        self.read(|state| *state)
    }

    pub fn current_effect(&self) -> EffectId {
        self.read(|state| state.config.current_effect)
    }

    pub fn manual_mode(&self) -> bool {
        self.read(|state| state.manual_mode)
    }

    pub fn link_connected(&self) -> bool {
        self.read(|state| state.link_connected)
    }

    pub fn max_duty(&self) -> u16 {
        self.read(|state| state.config.max_duty)
    }
}
