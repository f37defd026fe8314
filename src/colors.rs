//! Linear RGBA colors and conversion to packed ARGB8888 pixels.

use std::ops::{Add, Mul};

/// An RGBA color with components nominally in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub const fn gray(v: f32) -> Self {
        Self::rgb(v, v, v)
    }

    /// Opaque color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parses `#RGB`, `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    pub fn hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        let digit = |i: usize, len: usize| -> Option<f32> {
            let part = s.get(i..i + len)?;
            let v = u8::from_str_radix(part, 16).ok()?;
            // Single hex digits expand to 0xVV
            let v = if len == 1 { v * 17 } else { v };
            Some(v as f32 / 255.0)
        };

        match s.len() {
            3 => Some(Self::rgb(digit(0, 1)?, digit(1, 1)?, digit(2, 1)?)),
            6 => Some(Self::rgb(digit(0, 2)?, digit(2, 2)?, digit(4, 2)?)),
            8 => Some(Self::rgba(
                digit(0, 2)?,
                digit(2, 2)?,
                digit(4, 2)?,
                digit(6, 2)?,
            )),
            _ => None,
        }
    }

    /// Returns the same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn min(self, other: Self) -> Self {
        Self::rgba(
            self.r.min(other.r),
            self.g.min(other.g),
            self.b.min(other.b),
            self.a.min(other.a),
        )
    }

    pub fn clamp(self) -> Self {
        Self::rgba(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    /// Pack to ARGB8888 (0xAARRGGBB).
    pub fn to_argb(self) -> u32 {
        let [r, g, b, a] = self.to_rgba8();
        ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
    }

    /// Unpack from ARGB8888 (0xAARRGGBB).
    pub fn from_argb(argb: u32) -> Self {
        let channel = |shift: u32| ((argb >> shift) & 0xFF) as f32 / 255.0;
        Self::rgba(channel(16), channel(8), channel(0), channel(24))
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let c = self.clamp();
        let byte = |v: f32| (v * 255.0).round() as u8;
        [byte(c.r), byte(c.g), byte(c.b), byte(c.a)]
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Self::Output {
        Color::rgba(
            self.r + rhs.r,
            self.g + rhs.g,
            self.b + rhs.b,
            self.a + rhs.a,
        )
    }
}

/// Component-wise modulation.
impl Mul for Color {
    type Output = Color;

    fn mul(self, rhs: Color) -> Self::Output {
        Color::rgba(
            self.r * rhs.r,
            self.g * rhs.g,
            self.b * rhs.b,
            self.a * rhs.a,
        )
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, rhs: f32) -> Self::Output {
        Color::rgba(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}

/// Convert RGBA8 bytes to packed ARGB8888.
#[inline]
pub fn rgba8_to_argb([r, g, b, a]: [u8; 4]) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Convert packed ARGB8888 to RGBA8 bytes.
#[inline]
pub fn argb_to_rgba8(argb: u32) -> [u8; 4] {
    [
        (argb >> 16) as u8,
        (argb >> 8) as u8,
        argb as u8,
        (argb >> 24) as u8,
    ]
}
