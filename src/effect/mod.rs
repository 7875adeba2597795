//! Effect catalog with compile-time known effect variants
//!
//! All effects are stored in an enum to avoid heap allocations.
//! Each effect implements the `Effect` trait and owns its scratch state, so
//! building a fresh slot is the same as resetting the effect.
//!
//! The last two ids depend on the driver family selected at build time.

mod breathing;
mod candle;
mod fast_strobe;
mod lightning;
mod precision_fade;
mod pulse_wave;
mod rgb_cycle;
mod rng;
mod smooth_fade;
mod soft_transition;
mod static_color;
mod twinkle;

pub use breathing::BreathingEffect;
pub use candle::{CandleFlickerEffect, FLAME_MAX, FLAME_MIN};
pub use fast_strobe::FastStrobeEffect;
pub use lightning::{LightningFlashEffect, LightningPhase};
pub use precision_fade::PrecisionFadeEffect;
pub use pulse_wave::PulseWaveEffect;
pub use rgb_cycle::{RgbCycleEffect, hold_ticks};
pub use rng::EffectRng;
pub use smooth_fade::SmoothFadeEffect;
pub use soft_transition::{SoftTransitionEffect, transition_ticks};
pub use static_color::{OffEffect, StaticColorEffect};
pub use twinkle::TwinklePulseEffect;

use crate::arbiter::EffectConfig;
use crate::color::ChannelQuad;
use crate::error::InvalidEffect;
use crate::hardware::HardwareProfile;

const EFFECT_NAME_OFF: &str = "off";
const EFFECT_NAME_STATIC: &str = "static";
const EFFECT_NAME_SMOOTH_FADE: &str = "smooth_fade";
const EFFECT_NAME_RGB_CYCLE: &str = "rgb_cycle";
const EFFECT_NAME_BREATHING: &str = "breathing";
const EFFECT_NAME_TWINKLE_PULSE: &str = "twinkle_pulse";
const EFFECT_NAME_LIGHTNING_FLASH: &str = "lightning_flash";
const EFFECT_NAME_CANDLE_FLICKER: &str = "candle_flicker";
#[cfg(feature = "al8860")]
const EFFECT_NAME_PULSE_WAVE: &str = "pulse_wave";
#[cfg(feature = "al8860")]
const EFFECT_NAME_SOFT_TRANSITION: &str = "soft_transition";
#[cfg(not(feature = "al8860"))]
const EFFECT_NAME_PRECISION_FADE: &str = "precision_fade";
#[cfg(not(feature = "al8860"))]
const EFFECT_NAME_FAST_STROBE: &str = "fast_strobe";

const EFFECT_ID_OFF: u8 = 0;
const EFFECT_ID_STATIC: u8 = 1;
const EFFECT_ID_SMOOTH_FADE: u8 = 2;
const EFFECT_ID_RGB_CYCLE: u8 = 3;
const EFFECT_ID_BREATHING: u8 = 4;
const EFFECT_ID_TWINKLE_PULSE: u8 = 5;
const EFFECT_ID_LIGHTNING_FLASH: u8 = 6;
const EFFECT_ID_CANDLE_FLICKER: u8 = 7;
// Variant-specific pair shares the same two wire ids
const EFFECT_ID_VARIANT_A: u8 = 8;
const EFFECT_ID_VARIANT_B: u8 = 9;

/// Number of effects in this build
pub const EFFECT_COUNT: usize = 10;

pub trait Effect {
    /// Compute the frame for one tick.
    ///
    /// `tick` counts scheduler ticks since this effect was switched in.
    /// Must not block.
    fn compute(&mut self, tick: u32, config: &EffectConfig) -> ChannelQuad;

    /// Reset scratch state
    fn reset(&mut self) {}
}

/// Known effect ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectId {
    Off = EFFECT_ID_OFF,
    Static = EFFECT_ID_STATIC,
    SmoothFade = EFFECT_ID_SMOOTH_FADE,
    RgbCycle = EFFECT_ID_RGB_CYCLE,
    Breathing = EFFECT_ID_BREATHING,
    TwinklePulse = EFFECT_ID_TWINKLE_PULSE,
    LightningFlash = EFFECT_ID_LIGHTNING_FLASH,
    CandleFlicker = EFFECT_ID_CANDLE_FLICKER,
    #[cfg(feature = "al8860")]
    PulseWave = EFFECT_ID_VARIANT_A,
    #[cfg(feature = "al8860")]
    SoftTransition = EFFECT_ID_VARIANT_B,
    #[cfg(not(feature = "al8860"))]
    PrecisionFade = EFFECT_ID_VARIANT_A,
    #[cfg(not(feature = "al8860"))]
    FastStrobe = EFFECT_ID_VARIANT_B,
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot {
    Off(OffEffect),
    Static(StaticColorEffect),
    SmoothFade(SmoothFadeEffect),
    RgbCycle(RgbCycleEffect),
    Breathing(BreathingEffect),
    TwinklePulse(TwinklePulseEffect),
    LightningFlash(LightningFlashEffect),
    CandleFlicker(CandleFlickerEffect),
    #[cfg(feature = "al8860")]
    PulseWave(PulseWaveEffect),
    #[cfg(feature = "al8860")]
    SoftTransition(SoftTransitionEffect),
    #[cfg(not(feature = "al8860"))]
    PrecisionFade(PrecisionFadeEffect),
    #[cfg(not(feature = "al8860"))]
    FastStrobe(FastStrobeEffect),
}

impl Default for EffectSlot {
    fn default() -> Self {
        Self::SmoothFade(SmoothFadeEffect::new(HardwareProfile::SMOOTH_FADE_RATE))
    }
}

impl EffectId {
    /// Catalog for this build, in wire order
    #[cfg(feature = "al8860")]
    pub const ALL: [EffectId; EFFECT_COUNT] = [
        Self::Off,
        Self::Static,
        Self::SmoothFade,
        Self::RgbCycle,
        Self::Breathing,
        Self::TwinklePulse,
        Self::LightningFlash,
        Self::CandleFlicker,
        Self::PulseWave,
        Self::SoftTransition,
    ];

    /// Catalog for this build, in wire order
    #[cfg(not(feature = "al8860"))]
    pub const ALL: [EffectId; EFFECT_COUNT] = [
        Self::Off,
        Self::Static,
        Self::SmoothFade,
        Self::RgbCycle,
        Self::Breathing,
        Self::TwinklePulse,
        Self::LightningFlash,
        Self::CandleFlicker,
        Self::PrecisionFade,
        Self::FastStrobe,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_OFF => Self::Off,
            EFFECT_ID_STATIC => Self::Static,
            EFFECT_ID_SMOOTH_FADE => Self::SmoothFade,
            EFFECT_ID_RGB_CYCLE => Self::RgbCycle,
            EFFECT_ID_BREATHING => Self::Breathing,
            EFFECT_ID_TWINKLE_PULSE => Self::TwinklePulse,
            EFFECT_ID_LIGHTNING_FLASH => Self::LightningFlash,
            EFFECT_ID_CANDLE_FLICKER => Self::CandleFlicker,
            #[cfg(feature = "al8860")]
            EFFECT_ID_VARIANT_A => Self::PulseWave,
            #[cfg(feature = "al8860")]
            EFFECT_ID_VARIANT_B => Self::SoftTransition,
            #[cfg(not(feature = "al8860"))]
            EFFECT_ID_VARIANT_A => Self::PrecisionFade,
            #[cfg(not(feature = "al8860"))]
            EFFECT_ID_VARIANT_B => Self::FastStrobe,
            _ => return None,
        })
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// `Static` and `Off` are only ever entered by explicit commands
    pub const fn is_manual_only(self) -> bool {
        matches!(self, Self::Static | Self::Off)
    }

    /// Build a slot with fresh scratch state.
    ///
    /// `seed` feeds the effects that use randomness.
    pub fn to_slot(self, seed: u64) -> EffectSlot {
        match self {
            Self::Off => EffectSlot::Off(OffEffect),
            Self::Static => EffectSlot::Static(StaticColorEffect),
            Self::SmoothFade => EffectSlot::SmoothFade(SmoothFadeEffect::new(
                HardwareProfile::SMOOTH_FADE_RATE,
            )),
            Self::RgbCycle => EffectSlot::RgbCycle(RgbCycleEffect::new()),
            Self::Breathing => EffectSlot::Breathing(BreathingEffect),
            Self::TwinklePulse => EffectSlot::TwinklePulse(TwinklePulseEffect::new(seed)),
            Self::LightningFlash => {
                EffectSlot::LightningFlash(LightningFlashEffect::new(seed))
            }
            Self::CandleFlicker => EffectSlot::CandleFlicker(CandleFlickerEffect::new(seed)),
            #[cfg(feature = "al8860")]
            Self::PulseWave => EffectSlot::PulseWave(PulseWaveEffect::new()),
            #[cfg(feature = "al8860")]
            Self::SoftTransition => EffectSlot::SoftTransition(SoftTransitionEffect::new()),
            #[cfg(not(feature = "al8860"))]
            Self::PrecisionFade => EffectSlot::PrecisionFade(PrecisionFadeEffect::new()),
            #[cfg(not(feature = "al8860"))]
            Self::FastStrobe => EffectSlot::FastStrobe(FastStrobeEffect::new(
                HardwareProfile::FAST_EFFECT_DIVISOR,
            )),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => EFFECT_NAME_OFF,
            Self::Static => EFFECT_NAME_STATIC,
            Self::SmoothFade => EFFECT_NAME_SMOOTH_FADE,
            Self::RgbCycle => EFFECT_NAME_RGB_CYCLE,
            Self::Breathing => EFFECT_NAME_BREATHING,
            Self::TwinklePulse => EFFECT_NAME_TWINKLE_PULSE,
            Self::LightningFlash => EFFECT_NAME_LIGHTNING_FLASH,
            Self::CandleFlicker => EFFECT_NAME_CANDLE_FLICKER,
            #[cfg(feature = "al8860")]
            Self::PulseWave => EFFECT_NAME_PULSE_WAVE,
            #[cfg(feature = "al8860")]
            Self::SoftTransition => EFFECT_NAME_SOFT_TRANSITION,
            #[cfg(not(feature = "al8860"))]
            Self::PrecisionFade => EFFECT_NAME_PRECISION_FADE,
            #[cfg(not(feature = "al8860"))]
            Self::FastStrobe => EFFECT_NAME_FAST_STROBE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }
}

impl TryFrom<u8> for EffectId {
    type Error = InvalidEffect;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_raw(value).ok_or(InvalidEffect(value))
    }
}

impl EffectSlot {
    /// Compute the current effect's frame
    pub fn compute(&mut self, tick: u32, config: &EffectConfig) -> ChannelQuad {
        let quad = match self {
            Self::Off(effect) => effect.compute(tick, config),
            Self::Static(effect) => effect.compute(tick, config),
            Self::SmoothFade(effect) => effect.compute(tick, config),
            Self::RgbCycle(effect) => effect.compute(tick, config),
            Self::Breathing(effect) => effect.compute(tick, config),
            Self::TwinklePulse(effect) => effect.compute(tick, config),
            Self::LightningFlash(effect) => effect.compute(tick, config),
            Self::CandleFlicker(effect) => effect.compute(tick, config),
            #[cfg(feature = "al8860")]
            Self::PulseWave(effect) => effect.compute(tick, config),
            #[cfg(feature = "al8860")]
            Self::SoftTransition(effect) => effect.compute(tick, config),
            #[cfg(not(feature = "al8860"))]
            Self::PrecisionFade(effect) => effect.compute(tick, config),
            #[cfg(not(feature = "al8860"))]
            Self::FastStrobe(effect) => effect.compute(tick, config),
        };
        quad.clamped(config.max_duty)
    }

    /// Reset the effect state
    pub fn reset(&mut self) {
        match self {
            Self::Off(effect) => Effect::reset(effect),
            Self::Static(effect) => Effect::reset(effect),
            Self::SmoothFade(effect) => Effect::reset(effect),
            Self::RgbCycle(effect) => Effect::reset(effect),
            Self::Breathing(effect) => Effect::reset(effect),
            Self::TwinklePulse(effect) => Effect::reset(effect),
            Self::LightningFlash(effect) => Effect::reset(effect),
            Self::CandleFlicker(effect) => Effect::reset(effect),
            #[cfg(feature = "al8860")]
            Self::PulseWave(effect) => Effect::reset(effect),
            #[cfg(feature = "al8860")]
            Self::SoftTransition(effect) => Effect::reset(effect),
            #[cfg(not(feature = "al8860"))]
            Self::PrecisionFade(effect) => Effect::reset(effect),
            #[cfg(not(feature = "al8860"))]
            Self::FastStrobe(effect) => Effect::reset(effect),
        }
    }

    /// Get the effect ID for external observation
    pub fn id(&self) -> EffectId {
        match self {
            Self::Off(_) => EffectId::Off,
            Self::Static(_) => EffectId::Static,
            Self::SmoothFade(_) => EffectId::SmoothFade,
            Self::RgbCycle(_) => EffectId::RgbCycle,
            Self::Breathing(_) => EffectId::Breathing,
            Self::TwinklePulse(_) => EffectId::TwinklePulse,
            Self::LightningFlash(_) => EffectId::LightningFlash,
            Self::CandleFlicker(_) => EffectId::CandleFlicker,
            #[cfg(feature = "al8860")]
            Self::PulseWave(_) => EffectId::PulseWave,
            #[cfg(feature = "al8860")]
            Self::SoftTransition(_) => EffectId::SoftTransition,
            #[cfg(not(feature = "al8860"))]
            Self::PrecisionFade(_) => EffectId::PrecisionFade,
            #[cfg(not(feature = "al8860"))]
            Self::FastStrobe(_) => EffectId::FastStrobe,
        }
    }
}
