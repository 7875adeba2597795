#![no_std]

#[cfg(not(any(feature = "lm3414", feature = "al8860")))]
compile_error!("select a driver family: enable the `lm3414` or `al8860` feature");

pub mod arbiter;
pub mod color;
pub mod control;
pub mod effect;
pub mod error;
pub mod hardware;
pub mod scheduler;

pub use arbiter::{ArbiterDefaults, ArbiterState, EffectConfig, ModeArbiter};
pub use control::{Characteristic, ControlEvent, ControlInterface, WirePayload};
pub use effect::{EffectId, EffectSlot};
pub use error::{ControlError, InvalidEffect, OutputError, OutputErrorKind, TickError};
pub use hardware::HardwareProfile;
pub use scheduler::{AnimationScheduler, FrameResult, SchedulerState, TickOutcome};

pub use color::{Channel, ChannelQuad, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract PWM output trait
///
/// Implement this trait to support different hardware platforms.
/// The scheduler is generic over this trait.
pub trait PwmOutput {
    /// Set the duty cycle of one channel, `0..=max_duty`
    fn set_channel_duty(&mut self, channel: Channel, duty: u16) -> Result<(), OutputError>;

    /// Native duty-cycle ceiling of the peripheral
    fn max_duty(&self) -> u16;

    /// Write all four channels, stopping at the first failure
    fn write_quad(&mut self, quad: ChannelQuad) -> Result<(), OutputError> {
        for channel in Channel::ALL {
            self.set_channel_duty(channel, quad.get(channel))?;
        }
        Ok(())
    }
}

impl<T: PwmOutput + ?Sized> PwmOutput for &mut T {
    fn set_channel_duty(&mut self, channel: Channel, duty: u16) -> Result<(), OutputError> {
        (**self).set_channel_duty(channel, duty)
    }

    fn max_duty(&self) -> u16 {
        (**self).max_duty()
    }

    fn write_quad(&mut self, quad: ChannelQuad) -> Result<(), OutputError> {
        (**self).write_quad(quad)
    }
}
