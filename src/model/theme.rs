//! Shell colour palette per badge state.

use super::status::BadgeKind;

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Packed `0xAABBGGRR`, the layout DWM accent policies expect.
    pub const fn to_abgr(self) -> u32 {
        (self.a as u32) << 24 | (self.b as u32) << 16 | (self.g as u32) << 8 | self.r as u32
    }

    /// Packed `0x00BBGGRR` (GDI `COLORREF`), alpha dropped.
    pub const fn to_colorref(self) -> u32 {
        (self.b as u32) << 16 | (self.g as u32) << 8 | self.r as u32
    }

    /// Linear interpolation towards `other`; `t` is clamped to `0.0..=1.0`.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Blend over an opaque backdrop using this colour's alpha.
    pub fn over(self, backdrop: Rgba) -> Rgba {
        let a = self.a as u32;
        let mix = |fg: u8, bg: u8| ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
        Rgba::rgb(
            mix(self.r, backdrop.r),
            mix(self.g, backdrop.g),
            mix(self.b, backdrop.b),
        )
    }
}

/// Colours used to paint the shell for one badge state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Window background fill.
    pub background: Rgba,
    /// Title gradient start and end.
    pub accent: (Rgba, Rgba),
    /// Badge dot colour.
    pub badge: Rgba,
}

pub const TEXT_PRIMARY: Rgba = Rgba::rgb(230, 236, 242);
pub const TEXT_MUTED: Rgba = Rgba::rgba(200, 210, 220, 210);
pub const CLOSE_GLYPH: Rgba = Rgba::rgb(0x66, 0x77, 0x88);

const TEAL: (Rgba, Rgba) = (Rgba::rgb(34, 211, 238), Rgba::rgb(45, 212, 191));

impl Palette {
    pub fn for_badge(badge: BadgeKind) -> Self {
        match badge {
            BadgeKind::Running | BadgeKind::PointSet => Self {
                background: Rgba::rgba(15, 20, 35, 190),
                accent: (Rgba::rgb(168, 85, 247), Rgba::rgb(34, 211, 238)),
                badge: Rgba::rgb(34, 211, 238),
            },
            BadgeKind::Frozen => Self {
                background: Rgba::rgba(10, 25, 40, 190),
                accent: (Rgba::rgb(96, 165, 250), Rgba::rgb(196, 235, 255)),
                badge: Rgba::rgb(96, 165, 250),
            },
            BadgeKind::Stopped => Self {
                background: Rgba::rgba(10, 21, 32, 180),
                accent: TEAL,
                badge: Rgba::rgb(248, 113, 113),
            },
            BadgeKind::Ready => Self {
                background: Rgba::rgba(10, 21, 32, 180),
                accent: TEAL,
                badge: Rgba::rgb(150, 150, 160),
            },
        }
    }
}
