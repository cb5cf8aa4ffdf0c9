//! ARGB8888 color constants and helpers.
//!
//! Colors are packed as `0xAARRGGBB`, the layout the canvas buffer and the
//! window texture share.

pub const BACKGROUND: u32 = 0xFF0A0A0A;
pub const GRID: u32 = 0xFF1E1E1E;
pub const TEXT: u32 = 0xFFC8C8C8;
pub const VERTEX: u32 = 0xFFF0F0F0;
pub const EDGE: u32 = 0xFF000000;
/// Translucent grey face fill.
pub const FACE_FILL: u32 = 0x32646464;
pub const FACE_OUTLINE: u32 = 0xFF000000;
pub const ERROR: u32 = 0xFF640000;

/// Packs 8-bit channels into an ARGB color.
#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Splits an ARGB color into `(a, r, g, b)` channels.
#[inline]
pub const fn channels(color: u32) -> (u8, u8, u8, u8) {
    (
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    )
}

#[inline]
pub const fn alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

/// Source-over blend of `src` onto an opaque `dst`.
///
/// The result is always opaque.
pub fn blend_over(dst: u32, src: u32) -> u32 {
    let (sa, sr, sg, sb) = channels(src);
    match sa {
        0 => dst | 0xFF00_0000,
        255 => src,
        _ => {
            let (_, dr, dg, db) = channels(dst);
            let a = sa as u32;
            let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
            argb(255, mix(sr, dr), mix(sg, dg), mix(sb, db))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_unpack_round_trip() {
        let color = argb(0x12, 0x34, 0x56, 0x78);
        assert_eq!(color, 0x12345678);
        assert_eq!(channels(color), (0x12, 0x34, 0x56, 0x78));
        assert_eq!(alpha(FACE_FILL), 50);
    }

    #[test]
    fn blending_respects_alpha_extremes() {
        assert_eq!(blend_over(BACKGROUND, VERTEX), VERTEX);
        assert_eq!(blend_over(BACKGROUND, 0x00FF_FFFF), BACKGROUND);
    }

    #[test]
    fn half_alpha_averages_channels() {
        let out = blend_over(argb(255, 0, 0, 0), argb(128, 255, 255, 255));
        let (a, r, g, b) = channels(out);
        assert_eq!(a, 255);
        assert_eq!((r, g, b), (128, 128, 128));
    }
}
