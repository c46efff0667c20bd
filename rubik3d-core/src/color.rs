//! Sticker colours, shading and 256-colour quantization
use serde::{Deserialize, Serialize};
use std::fmt;

/// An 8-bit-per-channel RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `factor`, clamped to `[0.1, 1.5]`.
    /// Channels saturate at 255.
    pub fn apply_brightness(self, factor: f32) -> Self {
        let factor = factor.clamp(0.1, 1.5);
        let scale = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Quantize to an xterm 256-colour index.
    ///
    /// Pure greys use the 24-step ramp (232..=255), everything else the
    /// 6x6x6 colour cube (16..=231).
    pub fn to_256_color(self) -> u8 {
        let Rgb { r, g, b } = self;

        if r == g && g == b {
            return match r {
                0..=7 => 232,
                248..=255 => 255,
                v => 232 + ((v - 8) as f32 / 247.0 * 23.0) as u8,
            };
        }

        let level = |c: u8| (c as f32 / 255.0 * 5.0) as u8;
        16 + 36 * level(r) + 6 * level(g) + level(b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(rgb: Rgb) -> Self {
        [rgb.r, rgb.g, rgb.b]
    }
}

/// The six sticker colours of a standard cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickerColor {
    Red,
    Orange,
    Blue,
    Green,
    White,
    Yellow,
}

impl StickerColor {
    pub const ALL: [StickerColor; 6] = [
        StickerColor::Red,
        StickerColor::Orange,
        StickerColor::Blue,
        StickerColor::Green,
        StickerColor::White,
        StickerColor::Yellow,
    ];

    /// Character used to fill this colour's facelets
    pub fn glyph(self) -> char {
        match self {
            StickerColor::Red => 'R',
            StickerColor::Orange => 'O',
            StickerColor::Blue => 'B',
            StickerColor::Green => 'G',
            StickerColor::White => 'W',
            StickerColor::Yellow => 'Y',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StickerColor::Red => "Red",
            StickerColor::Orange => "Orange",
            StickerColor::Blue => "Blue",
            StickerColor::Green => "Green",
            StickerColor::White => "White",
            StickerColor::Yellow => "Yellow",
        }
    }
}

impl fmt::Display for StickerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Base RGB value for each sticker colour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub red: Rgb,
    pub orange: Rgb,
    pub blue: Rgb,
    pub green: Rgb,
    pub white: Rgb,
    pub yellow: Rgb,
}

impl Palette {
    pub fn rgb(&self, color: StickerColor) -> Rgb {
        match color {
            StickerColor::Red => self.red,
            StickerColor::Orange => self.orange,
            StickerColor::Blue => self.blue,
            StickerColor::Green => self.green,
            StickerColor::White => self.white,
            StickerColor::Yellow => self.yellow,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            red: Rgb::new(220, 60, 60),
            orange: Rgb::new(220, 120, 0),
            blue: Rgb::new(60, 100, 220),
            green: Rgb::new(60, 220, 100),
            white: Rgb::new(255, 255, 255),
            yellow: Rgb::new(220, 220, 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_brightness_is_clamped() {
        let c = Rgb::new(100, 200, 50);
        assert_eq!(c.apply_brightness(10.0), c.apply_brightness(1.5));
        assert_eq!(c.apply_brightness(0.0), c.apply_brightness(0.1));
        assert_eq!(c.apply_brightness(1.5), Rgb::new(150, 255, 75));
        assert_eq!(c.apply_brightness(1.0), c);
    }

    #[test]
    fn test_grey_ramp_edges() {
        assert_eq!(Rgb::new(0, 0, 0).to_256_color(), 232);
        assert_eq!(Rgb::new(7, 7, 7).to_256_color(), 232);
        assert_eq!(Rgb::new(8, 8, 8).to_256_color(), 232);
        assert_eq!(Rgb::new(128, 128, 128).to_256_color(), 243);
        assert_eq!(Rgb::new(248, 248, 248).to_256_color(), 255);
        assert_eq!(Rgb::new(255, 255, 255).to_256_color(), 255);
    }

    #[test]
    fn test_colour_cube() {
        assert_eq!(Rgb::new(255, 0, 0).to_256_color(), 196);
        assert_eq!(Rgb::new(0, 255, 0).to_256_color(), 46);
        assert_eq!(Rgb::new(0, 0, 255).to_256_color(), 21);
        assert_eq!(Rgb::new(220, 60, 60).to_256_color(), 16 + 36 * 4 + 6 + 1);
    }

    #[test]
    fn test_default_palette_is_distinct() {
        let palette = Palette::default();
        for (i, a) in StickerColor::ALL.iter().enumerate() {
            for b in &StickerColor::ALL[i + 1..] {
                assert_ne!(palette.rgb(*a), palette.rgb(*b));
                assert_ne!(a.glyph(), b.glyph());
            }
        }
    }

    proptest! {
        #[test]
        fn proptest_greys_stay_on_ramp(v: u8) {
            let index = Rgb::new(v, v, v).to_256_color();
            prop_assert!((232..=255).contains(&index));
        }

        #[test]
        fn proptest_quantization_is_deterministic(r: u8, g: u8, b: u8) {
            let c = Rgb::new(r, g, b);
            prop_assert_eq!(c.to_256_color(), c.to_256_color());
            if !(r == g && g == b) {
                prop_assert!((16..=231).contains(&c.to_256_color()));
            }
        }
    }
}
