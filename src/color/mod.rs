//! Color and intensity model
//!
//! Values cross two scales: the 0-255 wire scale used by the control link and
//! the driver's native duty-cycle scale (`0..=max_duty`). Everything stored in
//! the shared configuration is in driver scale.

mod hsv;
mod quad;
mod scale;

use smart_leds::RGB8;

pub use hsv::{hsv_to_duty, hsv_to_rgb};
pub use quad::{Channel, ChannelQuad};
pub use scale::{apply_brightness, from_driver, to_driver};

/// 8-bit RGB triple
pub type Rgb = RGB8;
