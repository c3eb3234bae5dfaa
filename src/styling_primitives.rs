/*
 * Platform-agnostic styling values: colors, the optional dialog font and the
 * dialog-wide color scheme. The Win32 layer converts these into COLORREFs,
 * HFONTs and brushes; everything here stays portable so the control model can
 * carry colors without touching native types.
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 0xFF,
        g: 0xFF,
        b: 0xFF,
    };
    // Classic hyperlink blue.
    pub const LINK_BLUE: Color = Color { r: 0, g: 0, b: 0xFF };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scales every channel by `percent` (0-100). Used for the pressed look of colored buttons.
    pub fn darkened(self, percent: u32) -> Self {
        let scale = |c: u8| (c as u32 * percent.min(100) / 100) as u8;
        Color {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/*
 * Describes the custom dialog font. `point_size` is expressed in typographic
 * points; the Win32 layer converts it to device units with the screen DPI
 * (see `logical_font_height`).
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescription {
    pub name: String,
    pub point_size: i32,
    pub weight: FontWeight,
}

impl FontDescription {
    pub fn new(name: impl Into<String>, point_size: i32) -> Self {
        Self {
            name: name.into(),
            point_size,
            weight: FontWeight::Normal,
        }
    }
}

/*
 * Converts a point size into the negative "character height" form expected
 * by CreateFontW, rounding like MulDiv(points, dpi, 72).
 */
pub fn logical_font_height(point_size: i32, dpi: i32) -> i32 {
    let scaled = (point_size as i64 * dpi as i64 * 2 + 72) / (72 * 2);
    -(scaled as i32)
}

/// Optional text/background override for the dialog surface and its static/button children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogColors {
    pub text: Color,
    pub background: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_font_height_matches_muldiv_rounding() {
        // 9pt at 96 DPI is exactly 12px.
        assert_eq!(logical_font_height(9, 96), -12);
        // 10pt at 96 DPI is 13.33px and rounds down.
        assert_eq!(logical_font_height(10, 96), -13);
        // 11pt at 120 DPI is 18.33px.
        assert_eq!(logical_font_height(11, 120), -18);
    }

    #[test]
    fn darkened_scales_channels() {
        let c = Color::new(100, 200, 50).darkened(80);
        assert_eq!(c, Color::new(80, 160, 40));
    }
}
