/*
 * Translates styling primitives into Win32 values: COLORREFs for colors and
 * HFONTs for the dialog font. The surface owns the created GDI objects and
 * releases them with the window.
 */

use crate::error::{PlatformError, Result as PlatformResult};
use crate::styling_primitives::{Color, FontDescription, FontWeight, logical_font_height};

use windows::Win32::{
    Foundation::{COLORREF, GetLastError, HWND, LPARAM, WPARAM},
    Graphics::Gdi::{
        CLIP_DEFAULT_PRECIS, CreateFontW, DEFAULT_CHARSET, DEFAULT_GUI_FONT, DEFAULT_QUALITY,
        FF_DONTCARE, FW_BOLD, FW_NORMAL, GetDC, GetDeviceCaps, GetStockObject, HFONT, LOGPIXELSY,
        OUT_DEFAULT_PRECIS, ReleaseDC,
    },
    UI::WindowsAndMessaging::{SendMessageW, WM_SETFONT},
};
use windows::core::HSTRING;

// Used when the screen DC cannot be queried.
const FALLBACK_DPI: i32 = 96;

/*
 * Creates a Win32 COLORREF from the platform-agnostic `Color` struct.
 * Win32 expects colors in BGR format, so this function handles the conversion.
 */
pub(crate) fn color_to_colorref(color: &Color) -> COLORREF {
    COLORREF((color.r as u32) | ((color.g as u32) << 8) | ((color.b as u32) << 16))
}

/*
 * Converts a Win32 COLORREF (BGR) back to platform-agnostic Color (RGB).
 * Used for retrieving system colors and converting them to our Color type.
 */
pub(crate) fn colorref_to_color(cr: COLORREF) -> Color {
    Color {
        r: (cr.0 & 0xFF) as u8,
        g: ((cr.0 >> 8) & 0xFF) as u8,
        b: ((cr.0 >> 16) & 0xFF) as u8,
    }
}

fn screen_dpi() -> i32 {
    let hdc_screen = unsafe { GetDC(None) };
    if hdc_screen.is_invalid() {
        return FALLBACK_DPI;
    }
    let dpi = unsafe { GetDeviceCaps(Some(hdc_screen), LOGPIXELSY) };
    unsafe { ReleaseDC(None, hdc_screen) };
    if dpi > 0 { dpi } else { FALLBACK_DPI }
}

/// Creates the custom dialog font. The caller owns the returned handle.
pub(crate) fn create_font(description: &FontDescription) -> PlatformResult<HFONT> {
    let height = logical_font_height(description.point_size, screen_dpi());
    let weight = match description.weight {
        FontWeight::Normal => FW_NORMAL.0 as i32,
        FontWeight::Bold => FW_BOLD.0 as i32,
    };
    let h_font = unsafe {
        CreateFontW(
            height,
            0,
            0,
            0,
            weight,
            0,
            0,
            0,
            DEFAULT_CHARSET,
            OUT_DEFAULT_PRECIS,
            CLIP_DEFAULT_PRECIS,
            DEFAULT_QUALITY,
            FF_DONTCARE.0 as u32,
            &HSTRING::from(description.name.as_str()),
        )
    };
    if h_font.is_invalid() {
        let error = unsafe { GetLastError() };
        log::error!(
            "Styling: Failed to create font '{}' {}pt: {error:?}",
            description.name,
            description.point_size
        );
        return Err(PlatformError::OperationFailed(format!(
            "CreateFontW failed for '{}': {error:?}",
            description.name
        )));
    }
    log::debug!(
        "Styling: Created font '{}' {}pt (height {height}) as {h_font:?}",
        description.name,
        description.point_size
    );
    Ok(h_font)
}

/// The stock GUI font used when no custom font is configured. Never deleted.
pub(crate) fn default_gui_font() -> HFONT {
    HFONT(unsafe { GetStockObject(DEFAULT_GUI_FONT) }.0)
}

pub(crate) fn apply_font(hwnd: HWND, font: HFONT) {
    unsafe {
        SendMessageW(
            hwnd,
            WM_SETFONT,
            Some(WPARAM(font.0 as usize)),
            Some(LPARAM(1)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorref_is_bgr() {
        let colorref = color_to_colorref(&Color::new(0x12, 0x34, 0x56));
        assert_eq!(colorref.0, 0x0056_3412);
    }

    #[test]
    fn colorref_converts_back_to_the_same_color() {
        let color = Color::new(10, 200, 30);
        assert_eq!(colorref_to_color(color_to_colorref(&color)), color);
    }
}
