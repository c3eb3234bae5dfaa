/*
 * Encapsulates Win32-specific operations for button controls: standard
 * push buttons, and owner-drawn buttons painted from a fixed color pair or
 * from a bitmap loaded when the dialog opens. Clicks arrive as BN_CLICKED
 * and are decoded by the window procedure.
 */

use crate::controls::ChildHost;
use crate::controls::styling_handler::{color_to_colorref, colorref_to_color};
use crate::error::Result as PlatformResult;
use crate::styling_primitives::Color;
use crate::types::{ControlId, Frame, NativeHandle};
use crate::window_common::ChildWindowSpec;

use std::ffi::c_void;
use std::path::Path;
use windows::Win32::{
    Foundation::{COLORREF, HWND, RECT},
    Graphics::Gdi::{
        BF_RECT, BITMAP, COLOR_BTNFACE, COLOR_BTNTEXT,
        COLOR_GRAYTEXT, CreateCompatibleDC, CreateSolidBrush, DT_CENTER, DT_SINGLELINE,
        DT_VCENTER, DeleteDC, DeleteObject, DrawEdge, DrawFocusRect, DrawTextW, EDGE_RAISED,
        EDGE_SUNKEN, FillRect, GetObjectW, GetSysColor, HBITMAP, HGDIOBJ, InflateRect,
        OffsetRect, SRCCOPY, SelectObject, SetBkMode, SetStretchBltMode, SetTextColor,
        StretchBlt, HALFTONE, TRANSPARENT,
    },
    UI::Controls::{DRAWITEMSTRUCT, ODS_DISABLED, ODS_FOCUS, ODS_SELECTED},
    UI::WindowsAndMessaging::{
        BS_PUSHBUTTON, IMAGE_BITMAP, LR_LOADFROMFILE, LoadImageW, WINDOW_EX_STYLE, WINDOW_STYLE,
        WS_CHILD, WS_TABSTOP, WS_VISIBLE,
    },
};
use windows::core::{HSTRING, PCWSTR};

const WC_BUTTON: PCWSTR = windows::core::w!("BUTTON");
const BS_OWNERDRAW: u32 = 0x000B;

// Percentage of the base color used while the button is held down.
const PRESSED_BRIGHTNESS: u32 = 80;
// Gap between the button edge and a painted bitmap.
const PICTURE_INSET: i32 = 3;

pub(crate) fn create_button(
    host: &ChildHost,
    control_id: ControlId,
    frame: Frame,
    text: &str,
    owner_drawn: bool,
    extra_style: u32,
) -> PlatformResult<HWND> {
    let hwnd_button = host.create(&ChildWindowSpec {
        class: WC_BUTTON,
        text,
        style: compute_button_style(owner_drawn, extra_style),
        ex_style: WINDOW_EX_STYLE(0),
        frame,
        id: control_id,
    })?;
    log::debug!(
        "ButtonHandler: Created button '{text}' (ID {}, owner drawn {owner_drawn}) as {hwnd_button:?}",
        control_id.raw()
    );
    Ok(hwnd_button)
}

/*
 * Loads a picture button's bitmap from disk. A missing or unreadable file is
 * not fatal: the button is still created and paints its text instead.
 */
pub(crate) fn load_button_bitmap(path: &Path) -> Option<HBITMAP> {
    let wide_path = HSTRING::from(path.as_os_str());
    match unsafe { LoadImageW(None, &wide_path, IMAGE_BITMAP, 0, 0, LR_LOADFROMFILE) } {
        Ok(handle) if !handle.is_invalid() => {
            log::debug!("ButtonHandler: Loaded bitmap '{}'", path.display());
            Some(HBITMAP(handle.0))
        }
        Ok(_) => {
            log::warn!("ButtonHandler: LoadImageW returned no bitmap for '{}'", path.display());
            None
        }
        Err(err) => {
            log::warn!(
                "ButtonHandler: Could not load bitmap '{}': {err:?}",
                path.display()
            );
            None
        }
    }
}

fn compute_button_style(owner_drawn: bool, extra_style: u32) -> WINDOW_STYLE {
    let kind = if owner_drawn {
        BS_OWNERDRAW
    } else {
        BS_PUSHBUTTON as u32
    };
    WS_CHILD | WS_VISIBLE | WS_TABSTOP | WINDOW_STYLE(kind | extra_style)
}

/*
 * Final background and text colors for a colored button in the given state.
 * Disabled keeps the background with gray text; pressed darkens the
 * background.
 */
fn resolve_button_colors(
    background: Color,
    text: Color,
    gray_text: Color,
    disabled: bool,
    pressed: bool,
) -> (Color, Color) {
    if disabled {
        (background, gray_text)
    } else if pressed {
        (background.darkened(PRESSED_BRIGHTNESS), text)
    } else {
        (background, text)
    }
}

fn item_state(dis: &DRAWITEMSTRUCT) -> (bool, bool, bool) {
    let disabled = (dis.itemState.0 & ODS_DISABLED.0) != 0;
    let pressed = (dis.itemState.0 & ODS_SELECTED.0) != 0;
    let focused = (dis.itemState.0 & ODS_FOCUS.0) != 0;
    (disabled, pressed, focused)
}

/*
 * Handles WM_DRAWITEM for a colored button: fills the background, draws the
 * centered caption, the raised or sunken edge and the focus rectangle.
 */
pub(crate) fn draw_colored_button(
    dis: &DRAWITEMSTRUCT,
    text: &str,
    background: Color,
    text_color: Color,
) {
    let (disabled, pressed, focused) = item_state(dis);
    unsafe {
        let gray_text = colorref_to_color(COLORREF(GetSysColor(COLOR_GRAYTEXT)));
        let (bg_color, fg_color) =
            resolve_button_colors(background, text_color, gray_text, disabled, pressed);

        let brush = CreateSolidBrush(color_to_colorref(&bg_color));
        FillRect(dis.hDC, &dis.rcItem, brush);
        let _ = DeleteObject(brush.into());

        draw_caption(dis, text, fg_color, pressed);
        draw_frame(dis, pressed, focused);
    }
}

/*
 * Handles WM_DRAWITEM for a picture button: the bitmap is stretched into the
 * button face (shifted by a pixel while pressed). Without a bitmap the
 * caption is drawn on the system face color.
 */
pub(crate) fn draw_picture_button(dis: &DRAWITEMSTRUCT, text: &str, bitmap: Option<NativeHandle>) {
    let (disabled, pressed, focused) = item_state(dis);
    unsafe {
        let face = colorref_to_color(COLORREF(GetSysColor(COLOR_BTNFACE)));
        let brush = CreateSolidBrush(color_to_colorref(&face));
        FillRect(dis.hDC, &dis.rcItem, brush);
        let _ = DeleteObject(brush.into());

        let painted = bitmap
            .map(|handle| HBITMAP(handle.0 as *mut c_void))
            .is_some_and(|hbitmap| blit_bitmap(dis, hbitmap, pressed));
        if !painted {
            let text_color = if disabled {
                colorref_to_color(COLORREF(GetSysColor(COLOR_GRAYTEXT)))
            } else {
                colorref_to_color(COLORREF(GetSysColor(COLOR_BTNTEXT)))
            };
            draw_caption(dis, text, text_color, pressed);
        }
        draw_frame(dis, pressed, focused);
    }
}

unsafe fn blit_bitmap(dis: &DRAWITEMSTRUCT, hbitmap: HBITMAP, pressed: bool) -> bool {
    unsafe {
        let mut info = BITMAP::default();
        let copied = GetObjectW(
            HGDIOBJ(hbitmap.0),
            std::mem::size_of::<BITMAP>() as i32,
            Some(&mut info as *mut BITMAP as *mut c_void),
        );
        if copied == 0 {
            log::warn!("ButtonHandler: GetObjectW failed for bitmap {hbitmap:?}");
            return false;
        }

        let mut target = dis.rcItem;
        let _ = InflateRect(&mut target, -PICTURE_INSET, -PICTURE_INSET);
        if pressed {
            let _ = OffsetRect(&mut target, 1, 1);
        }

        let hdc_mem = CreateCompatibleDC(Some(dis.hDC));
        let old_bitmap = SelectObject(hdc_mem, HGDIOBJ(hbitmap.0));
        SetStretchBltMode(dis.hDC, HALFTONE);
        let result = StretchBlt(
            dis.hDC,
            target.left,
            target.top,
            target.right - target.left,
            target.bottom - target.top,
            Some(hdc_mem),
            0,
            0,
            info.bmWidth,
            info.bmHeight,
            SRCCOPY,
        );
        SelectObject(hdc_mem, old_bitmap);
        let _ = DeleteDC(hdc_mem);
        result.as_bool()
    }
}

unsafe fn draw_caption(dis: &DRAWITEMSTRUCT, text: &str, color: Color, pressed: bool) {
    unsafe {
        SetTextColor(dis.hDC, color_to_colorref(&color));
        SetBkMode(dis.hDC, TRANSPARENT);
        let mut text_buf: Vec<u16> = text.encode_utf16().collect();
        let mut rect: RECT = dis.rcItem;
        if pressed {
            let _ = OffsetRect(&mut rect, 1, 1);
        }
        DrawTextW(
            dis.hDC,
            &mut text_buf,
            &mut rect,
            DT_CENTER | DT_VCENTER | DT_SINGLELINE,
        );
    }
}

unsafe fn draw_frame(dis: &DRAWITEMSTRUCT, pressed: bool, focused: bool) {
    unsafe {
        let mut edge_rect = dis.rcItem;
        let edge = if pressed { EDGE_SUNKEN } else { EDGE_RAISED };
        let _ = DrawEdge(dis.hDC, &mut edge_rect, edge, BF_RECT);

        // Draw focus rectangle (inset by 3px; scale by DPI in future)
        if focused {
            let mut focus_rect = dis.rcItem;
            let _ = InflateRect(&mut focus_rect, -3, -3);
            let _ = DrawFocusRect(dis.hDC, &focus_rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Color = Color::new(100, 200, 50);
    const GRAY: Color = Color::new(128, 128, 128);

    #[test]
    fn owner_drawn_buttons_use_bs_ownerdraw() {
        assert_eq!(compute_button_style(true, 0).0 & 0xF, BS_OWNERDRAW);
        assert_eq!(compute_button_style(false, 0).0 & 0xF, BS_PUSHBUTTON as u32);
    }

    #[test]
    fn pressed_buttons_darken_their_background() {
        let (bg, fg) = resolve_button_colors(BASE, Color::WHITE, GRAY, false, true);
        assert_eq!(bg, Color::new(80, 160, 40));
        assert_eq!(fg, Color::WHITE);
    }

    #[test]
    fn disabled_buttons_keep_background_with_gray_text() {
        let (bg, fg) = resolve_button_colors(BASE, Color::WHITE, GRAY, true, true);
        assert_eq!(bg, BASE);
        assert_eq!(fg, GRAY);
    }

    #[test]
    fn idle_buttons_use_their_colors_unchanged() {
        assert_eq!(
            resolve_button_colors(BASE, Color::BLACK, GRAY, false, false),
            (BASE, Color::BLACK)
        );
    }
}
