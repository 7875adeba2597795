use thiserror::Error;

use crate::color::Channel;

/// Requested effect id is not part of the catalog built for this hardware.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid effect id {0}")]
pub struct InvalidEffect(pub u8);

/// Reason reported by a [`PwmOutput`](crate::PwmOutput) implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputErrorKind {
    /// Peripheral rejected the duty value
    DutyRejected,
    /// Peripheral did not latch the new duty
    UpdateFailed,
    /// Peripheral is not available
    Unavailable,
}

/// Hardware write failure on one output channel
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("failed to write duty to {channel:?} channel ({kind:?})")]
pub struct OutputError {
    pub channel: Channel,
    pub kind: OutputErrorKind,
}

/// Errors reported back to the control transport
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    #[error(transparent)]
    InvalidEffect(#[from] InvalidEffect),
    /// Every writable characteristic takes exactly one byte
    #[error("expected 1 byte, got {0}")]
    InvalidLength(usize),
    #[error("characteristic is read-only")]
    WriteNotPermitted,
    #[error("unknown characteristic 0x{0:04X}")]
    UnknownCharacteristic(u16),
}

/// Non-fatal scheduler tick failure. The tick is skipped and retried on the next period.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickError {
    #[error(transparent)]
    Output(#[from] OutputError),
}
