//! Control interface adapter
//!
//! Maps the wireless control service onto [`ModeArbiter`] operations. The
//! transport (GATT server, serial console, test harness) hands over raw
//! characteristic writes and reads; everything here is transport-agnostic.
//!
//! All writable characteristics take a single byte on the 0-255 wire scale.
//! Reads are answered from the arbiter, never from a transport-side cache.

use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::arbiter::ModeArbiter;
use crate::color::{Channel, from_driver, to_driver};
use crate::error::ControlError;
use crate::hardware::HardwareProfile;

/// 16-bit UUID of the lighting service
pub const SERVICE_UUID: u16 = 0x00FF;

const UUID_RED: u16 = 0xFF01;
const UUID_GREEN: u16 = 0xFF02;
const UUID_BLUE: u16 = 0xFF03;
const UUID_WARM_WHITE: u16 = 0xFF04;
const UUID_EFFECT: u16 = 0xFF05;
const UUID_BRIGHTNESS: u16 = 0xFF06;
const UUID_SPEED: u16 = 0xFF07;
const UUID_CHIP_INFO: u16 = 0xFF08;

/// Maximum size of a characteristic value
pub const WIRE_PAYLOAD_CAPACITY: usize = 16;

/// Value returned by a characteristic read
pub type WirePayload = Vec<u8, WIRE_PAYLOAD_CAPACITY>;

/// Characteristics exposed by the lighting service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Characteristic {
    Red,
    Green,
    Blue,
    WarmWhite,
    Effect,
    Brightness,
    Speed,
    /// Read-only driver chip name
    ChipInfo,
}

impl Characteristic {
    pub const ALL: [Characteristic; 8] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::WarmWhite,
        Self::Effect,
        Self::Brightness,
        Self::Speed,
        Self::ChipInfo,
    ];

    pub const fn uuid(self) -> u16 {
        match self {
            Self::Red => UUID_RED,
            Self::Green => UUID_GREEN,
            Self::Blue => UUID_BLUE,
            Self::WarmWhite => UUID_WARM_WHITE,
            Self::Effect => UUID_EFFECT,
            Self::Brightness => UUID_BRIGHTNESS,
            Self::Speed => UUID_SPEED,
            Self::ChipInfo => UUID_CHIP_INFO,
        }
    }

    pub const fn from_uuid(uuid: u16) -> Option<Self> {
        Some(match uuid {
            UUID_RED => Self::Red,
            UUID_GREEN => Self::Green,
            UUID_BLUE => Self::Blue,
            UUID_WARM_WHITE => Self::WarmWhite,
            UUID_EFFECT => Self::Effect,
            UUID_BRIGHTNESS => Self::Brightness,
            UUID_SPEED => Self::Speed,
            UUID_CHIP_INFO => Self::ChipInfo,
            _ => return None,
        })
    }

    /// Output channel behind a color characteristic
    pub const fn channel(self) -> Option<Channel> {
        match self {
            Self::Red => Some(Channel::Red),
            Self::Green => Some(Channel::Green),
            Self::Blue => Some(Channel::Blue),
            Self::WarmWhite => Some(Channel::WarmWhite),
            _ => None,
        }
    }

    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::ChipInfo)
    }
}

/// Decoded control event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    SetChannel(Channel, u8),
    /// Raw wire id, validated against this build's catalog on dispatch
    SetEffect(u8),
    /// Wire scale, converted to driver resolution on dispatch
    SetBrightness(u8),
    SetSpeed(u8),
    LinkConnected,
    LinkDisconnected,
}

impl ControlEvent {
    /// Decode a characteristic write. Payloads must be exactly one byte.
    pub fn decode(characteristic: Characteristic, data: &[u8]) -> Result<Self, ControlError> {
        if !characteristic.is_writable() {
            return Err(ControlError::WriteNotPermitted);
        }
        let &[value] = data else {
            return Err(ControlError::InvalidLength(data.len()));
        };

        Ok(match characteristic {
            Characteristic::Effect => Self::SetEffect(value),
            Characteristic::Brightness => Self::SetBrightness(value),
            Characteristic::Speed => Self::SetSpeed(value),
            other => match other.channel() {
                Some(channel) => Self::SetChannel(channel, value),
                None => return Err(ControlError::WriteNotPermitted),
            },
        })
    }
}

/// Transport-facing side of the arbiter
#[derive(Clone, Copy)]
pub struct ControlInterface<'a> {
    arbiter: &'a ModeArbiter,
}

impl<'a> ControlInterface<'a> {
    pub const fn new(arbiter: &'a ModeArbiter) -> Self {
        Self { arbiter }
    }

    /// Service UUID the transport registers the characteristics under
    pub const fn service_uuid(&self) -> u16 {
        SERVICE_UUID
    }

    /// Apply a decoded event to the arbiter.
    ///
    /// An invalid effect id is rejected and leaves the state untouched.
    pub fn handle(&self, event: ControlEvent) -> Result<(), ControlError> {
        #[cfg(feature = "esp32-log")]
        println!("[ControlInterface.handle] {:?}", event);

        match event {
            ControlEvent::SetChannel(channel, value) => self.arbiter.set_channel(channel, value),
            ControlEvent::SetEffect(raw) => {
                self.arbiter.set_effect_raw(raw)?;
            }
            ControlEvent::SetBrightness(value) => {
                let max_duty = self.arbiter.max_duty();
                self.arbiter.set_brightness(to_driver(value, max_duty));
            }
            ControlEvent::SetSpeed(speed) => self.arbiter.set_speed(speed),
            ControlEvent::LinkConnected => self.arbiter.on_link_connected(true),
            ControlEvent::LinkDisconnected => self.arbiter.on_link_connected(false),
        }
        Ok(())
    }

    /// Handle a characteristic write
    pub fn write(&self, characteristic: Characteristic, data: &[u8]) -> Result<(), ControlError> {
        let event = ControlEvent::decode(characteristic, data).inspect_err(|_err| {
            #[cfg(feature = "esp32-log")]
            println!(
                "[ControlInterface.write] rejected {:?} write: {}",
                characteristic, _err
            );
        })?;
        self.handle(event)
    }

    /// Handle a write addressed by UUID
    pub fn write_uuid(&self, uuid: u16, data: &[u8]) -> Result<(), ControlError> {
        let characteristic =
            Characteristic::from_uuid(uuid).ok_or(ControlError::UnknownCharacteristic(uuid))?;
        self.write(characteristic, data)
    }

    /// Current value of a characteristic
    pub fn read(&self, characteristic: Characteristic) -> WirePayload {
        let config = self.arbiter.snapshot();
        let max_duty = config.max_duty;

        match characteristic {
            Characteristic::Effect => payload(&[config.current_effect.as_raw()]),
            Characteristic::Brightness => payload(&[from_driver(config.brightness, max_duty)]),
            Characteristic::Speed => payload(&[config.speed]),
            Characteristic::ChipInfo => payload(HardwareProfile::CHIP_NAME.as_bytes()),
            other => match other.channel() {
                Some(channel) => payload(&[from_driver(config.base_color.get(channel), max_duty)]),
                None => WirePayload::new(),
            },
        }
    }

    /// Read a characteristic addressed by UUID
    pub fn read_uuid(&self, uuid: u16) -> Result<WirePayload, ControlError> {
        Characteristic::from_uuid(uuid)
            .map(|characteristic| self.read(characteristic))
            .ok_or(ControlError::UnknownCharacteristic(uuid))
    }
}

fn payload(bytes: &[u8]) -> WirePayload {
    bytes.iter().copied().take(WIRE_PAYLOAD_CAPACITY).collect()
}
