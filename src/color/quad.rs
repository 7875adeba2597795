use super::{Rgb, to_driver};

/// One of the four fixture output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
    WarmWhite = 3,
}

impl Channel {
    /// All channels in output order
    pub const ALL: [Channel; 4] = [
        Channel::Red,
        Channel::Green,
        Channel::Blue,
        Channel::WarmWhite,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Four channel intensities in driver resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelQuad {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub w: u16,
}

impl ChannelQuad {
    /// All channels off
    pub const ZERO: ChannelQuad = ChannelQuad::new(0, 0, 0, 0);

    pub const fn new(r: u16, g: u16, b: u16, w: u16) -> Self {
        Self { r, g, b, w }
    }

    /// Build a quad from an 8-bit RGB triple, scaled to driver resolution.
    /// The white channel is left dark.
    pub fn from_rgb(rgb: Rgb, max_duty: u16) -> Self {
        Self {
            r: to_driver(rgb.r, max_duty),
            g: to_driver(rgb.g, max_duty),
            b: to_driver(rgb.b, max_duty),
            w: 0,
        }
    }

    /// Get the value of a single channel
    pub const fn get(&self, channel: Channel) -> u16 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
            Channel::WarmWhite => self.w,
        }
    }

    /// Set the value of a single channel
    pub fn set(&mut self, channel: Channel, value: u16) {
        match channel {
            Channel::Red => self.r = value,
            Channel::Green => self.g = value,
            Channel::Blue => self.b = value,
            Channel::WarmWhite => self.w = value,
        }
    }

    /// Clamp every channel to `max_duty`
    #[must_use]
    pub fn clamped(self, max_duty: u16) -> Self {
        Self {
            r: self.r.min(max_duty),
            g: self.g.min(max_duty),
            b: self.b.min(max_duty),
            w: self.w.min(max_duty),
        }
    }

    /// Largest channel value
    pub fn peak(&self) -> u16 {
        self.r.max(self.g).max(self.b).max(self.w)
    }

    pub const fn is_zero(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0 && self.w == 0
    }
}
