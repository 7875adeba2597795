use super::{ChannelQuad, Rgb};

/// Normalize hue into `[0, 1)`, mapping non-finite input to 0
fn wrap_hue(hue: f32) -> f32 {
    if !hue.is_finite() {
        return 0.0;
    }
    let wrapped = hue - libm::floorf(hue);
    // floorf can leave exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Six-sector HSV conversion. Returns channel fractions in `[0, 1]`.
fn hsv_components(hue: f32, saturation: f32, value: f32) -> (f32, f32, f32) {
    let h = wrap_hue(hue) * 6.0;
    let s = unit(saturation);
    let v = unit(value);

    let sector = libm::floorf(h);
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    match (sector as u8) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

fn to_scale(fraction: f32, max: u16) -> u16 {
    let scaled = libm::roundf(fraction * f32::from(max));
    scaled.clamp(0.0, f32::from(max)) as u16
}

/// Convert HSV to an 8-bit RGB triple.
///
/// `hue` wraps around at 1.0, `saturation` and `value` are clamped to `[0, 1]`.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb {
    let (r, g, b) = hsv_components(hue, saturation, value);
    Rgb {
        r: to_scale(r, 255) as u8,
        g: to_scale(g, 255) as u8,
        b: to_scale(b, 255) as u8,
    }
}

/// Convert HSV straight into driver resolution without the 8-bit detour.
///
/// Used by effects that need every step of a 12-bit driver.
pub fn hsv_to_duty(hue: f32, saturation: f32, value: f32, max_duty: u16) -> ChannelQuad {
    let (r, g, b) = hsv_components(hue, saturation, value);
    ChannelQuad {
        r: to_scale(r, max_duty),
        g: to_scale(g, max_duty),
        b: to_scale(b, max_duty),
        w: 0,
    }
}
