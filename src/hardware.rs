//! Compile-time hardware profile
//!
//! The driver family is chosen with Cargo features. `al8860` builds the
//! 8-bit hysteretic driver profile; otherwise the 12-bit `lm3414` profile
//! is used. Building with neither feature is rejected at compile time.
//! Both families share every algorithm and only differ in the constants
//! below and in the two variant-specific effects.

use embassy_time::Duration;

/// Constants describing the LED driver this firmware is built for.
#[derive(Debug, Clone, Copy)]
pub struct HardwareProfile;

#[cfg(feature = "al8860")]
impl HardwareProfile {
    /// Driver chip name reported over the control interface
    pub const CHIP_NAME: &'static str = "AL8860";
    /// Native duty-cycle ceiling (8-bit)
    pub const MAX_DUTY: u16 = 255;
    /// PWM carrier frequency
    pub const PWM_FREQUENCY_HZ: u32 = 1_000;
    /// Scheduler period
    pub const FRAME_PERIOD: Duration = Duration::from_millis(50);
    /// Hue advance per tick at full speed for `SmoothFade`
    pub const SMOOTH_FADE_RATE: f32 = 0.001;
    /// Interval divisor for the fast effects
    pub const FAST_EFFECT_DIVISOR: u32 = 8;
}

#[cfg(not(feature = "al8860"))]
impl HardwareProfile {
    /// Driver chip name reported over the control interface
    pub const CHIP_NAME: &'static str = "LM3414";
    /// Native duty-cycle ceiling (12-bit)
    pub const MAX_DUTY: u16 = 4095;
    /// PWM carrier frequency
    pub const PWM_FREQUENCY_HZ: u32 = 5_000;
    /// Scheduler period
    pub const FRAME_PERIOD: Duration = Duration::from_millis(20);
    /// Hue advance per tick at full speed for `SmoothFade`
    pub const SMOOTH_FADE_RATE: f32 = 0.002;
    /// Interval divisor for the fast effects
    pub const FAST_EFFECT_DIVISOR: u32 = 4;
}

/// Number of bits needed to represent `max_duty`
pub const fn resolution_bits(max_duty: u16) -> u32 {
    u16::BITS - max_duty.leading_zeros()
}
