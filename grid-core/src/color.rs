//! RGB and HSL colors used for per-cell material tinting.
//!
//! Channels are stored as `f32` in `[0, 1]`. Hue is expressed as a fraction
//! of a full turn, so `0.0` and `1.0` are both red.

use crate::types::lerp;

/// A color with red, green and blue channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// A color decomposed into hue, saturation and lightness, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    /// Converts to 8-bit channels, rounding and clamping.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Decomposes this color into hue, saturation and lightness.
    ///
    /// Achromatic colors (all channels equal) report a hue and saturation
    /// of `0`.
    pub fn to_hsl(self) -> Hsl {
        let Rgb { r, g, b } = self;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (min + max) / 2.0;

        if min == max {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let delta = max - min;
        let s = if l <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        let h = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        Hsl { h: h / 6.0, s, l }
    }

    /// Rebuilds an RGB color from HSL.
    ///
    /// Hue wraps around into `[0, 1)`; saturation and lightness are clamped.
    pub fn from_hsl(hsl: Hsl) -> Self {
        let h = hsl.h.rem_euclid(1.0);
        let s = hsl.s.clamp(0.0, 1.0);
        let l = hsl.l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::new(l, l, l);
        }

        let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let q = 2.0 * l - p;

        Self::new(
            hue_to_channel(q, p, h + 1.0 / 3.0),
            hue_to_channel(q, p, h),
            hue_to_channel(q, p, h - 1.0 / 3.0),
        )
    }
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * 6.0 * (2.0 / 3.0 - t);
    }
    p
}

impl Hsl {
    /// Interpolates each channel independently.
    ///
    /// Hue is interpolated linearly, not along the shortest arc.
    pub fn lerp(self, other: Hsl, t: f32) -> Hsl {
        Hsl {
            h: lerp(self.h, other.h, t),
            s: lerp(self.s, other.s, t),
            l: lerp(self.l, other.l, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgb_close(a: Rgb, b: Rgb) {
        let eps = 1e-5;
        assert!(
            (a.r - b.r).abs() < eps && (a.g - b.g).abs() < eps && (a.b - b.b).abs() < eps,
            "colors differ: {:?} vs {:?}",
            a,
            b
        );
    }

    #[test]
    fn from_hex_splits_channels() {
        let c = Rgb::from_hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn primaries_have_expected_hues() {
        assert_eq!(Rgb::new(1.0, 0.0, 0.0).to_hsl(), Hsl { h: 0.0, s: 1.0, l: 0.5 });

        let green = Rgb::new(0.0, 1.0, 0.0).to_hsl();
        assert!((green.h - 1.0 / 3.0).abs() < 1e-6);

        let blue = Rgb::new(0.0, 0.0, 1.0).to_hsl();
        assert!((blue.h - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn gray_is_achromatic() {
        let hsl = Rgb::new(0.25, 0.25, 0.25).to_hsl();
        assert_eq!(hsl.h, 0.0);
        assert_eq!(hsl.s, 0.0);
        assert_eq!(hsl.l, 0.25);
        assert_rgb_close(Rgb::from_hsl(hsl), Rgb::new(0.25, 0.25, 0.25));
    }

    #[test]
    fn hsl_conversion_recovers_original_color() {
        for hex in [0xff4d2e, 0x2e6bff, 0x12ab34, 0xc0ffee, 0x7f007f] {
            let c = Rgb::from_hex(hex);
            assert_rgb_close(Rgb::from_hsl(c.to_hsl()), c);
        }
    }

    #[test]
    fn hue_wraps_when_rebuilding() {
        let a = Rgb::from_hsl(Hsl { h: 1.25, s: 0.6, l: 0.4 });
        let b = Rgb::from_hsl(Hsl { h: 0.25, s: 0.6, l: 0.4 });
        assert_rgb_close(a, b);
    }

    #[test]
    fn lerp_hits_both_endpoints_exactly() {
        let a = Hsl { h: 0.02, s: 0.9, l: 0.3 };
        let b = Hsl { h: 0.61, s: 0.4, l: 0.7 };
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);

        let mid = a.lerp(b, 0.5);
        assert!((mid.h - 0.315).abs() < 1e-6);
        assert!((mid.s - 0.65).abs() < 1e-6);
        assert!((mid.l - 0.5).abs() < 1e-6);
    }
}
