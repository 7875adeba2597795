use super::ChannelQuad;

/// Rescale a 0-255 wire value to driver resolution.
///
/// Truncates, so `to_driver(255, m) == m` and `to_driver(0, m) == 0`.
#[inline]
pub const fn to_driver(value: u8, max_duty: u16) -> u16 {
    (value as u32 * max_duty as u32 / 255) as u16
}

/// Rescale a driver duty value back to the 0-255 wire scale.
///
/// Values above `max_duty` are clamped first. A zero ceiling reports zero.
#[inline]
pub const fn from_driver(duty: u16, max_duty: u16) -> u8 {
    if max_duty == 0 {
        return 0;
    }
    let duty = if duty > max_duty { max_duty } else { duty };
    (duty as u32 * 255 / max_duty as u32) as u8
}

/// Scale every channel by `brightness / max_duty`.
///
/// Works in driver resolution so 12-bit hardware keeps its extra precision.
pub fn apply_brightness(quad: ChannelQuad, brightness: u16, max_duty: u16) -> ChannelQuad {
    if max_duty == 0 {
        return ChannelQuad::ZERO;
    }
    let max = u32::from(max_duty);
    let brightness = u32::from(brightness.min(max_duty));
    let scale = |value: u16| (u32::from(value.min(max_duty)) * brightness / max) as u16;

    ChannelQuad {
        r: scale(quad.r),
        g: scale(quad.g),
        b: scale(quad.b),
        w: scale(quad.w),
    }
}
