/*
 * Encapsulates Win32-specific operations for the cosmetic text controls:
 * static labels, group boxes and hyperlinks. Hyperlinks are notifying
 * owner-drawn statics painted here in link blue with an underlined copy of
 * the control's font; the hand cursor is set by the window procedure.
 */

use crate::controls::ChildHost;
use crate::controls::styling_handler::color_to_colorref;
use crate::error::Result as PlatformResult;
use crate::styling_primitives::Color;
use crate::types::{ControlId, Frame};
use crate::window_common::ChildWindowSpec;

use std::ffi::c_void;
use windows::Win32::{
    Foundation::HWND,
    Graphics::Gdi::{
        COLOR_BTNFACE, CreateFontIndirectW, DEFAULT_GUI_FONT, DT_LEFT, DT_NOPREFIX, DT_SINGLELINE,
        DT_VCENTER, DeleteObject, DrawTextW, FillRect, GetObjectW, GetStockObject,
        GetSysColorBrush, HBRUSH, HFONT, HGDIOBJ, LOGFONTW, SelectObject, SetBkMode,
        SetTextColor, TRANSPARENT,
    },
    UI::Controls::DRAWITEMSTRUCT,
    UI::WindowsAndMessaging::{
        SendMessageW, WINDOW_EX_STYLE, WINDOW_STYLE, WM_GETFONT, WS_CHILD, WS_VISIBLE,
    },
};
use windows::core::PCWSTR;

const WC_STATIC: PCWSTR = windows::core::w!("STATIC");
const WC_BUTTON: PCWSTR = windows::core::w!("BUTTON");

const SS_LEFT: u32 = 0x0000;
const SS_OWNERDRAW: u32 = 0x000D;
const SS_NOTIFY: u32 = 0x0100;
const BS_GROUPBOX: u32 = 0x0007;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LabelKind {
    Text,
    Group,
    Hyperlink,
}

pub(crate) fn create_label(
    host: &ChildHost,
    control_id: ControlId,
    frame: Frame,
    kind: LabelKind,
    text: &str,
    extra_style: u32,
) -> PlatformResult<HWND> {
    let (class, style) = compute_label_class_and_style(kind, extra_style);
    let hwnd = host.create(&ChildWindowSpec {
        class,
        text,
        style,
        ex_style: WINDOW_EX_STYLE(0),
        frame,
        id: control_id,
    })?;
    log::debug!(
        "LabelHandler: Created {kind:?} '{text}' (ID {}) as {hwnd:?}",
        control_id.raw()
    );
    Ok(hwnd)
}

fn compute_label_class_and_style(kind: LabelKind, extra_style: u32) -> (PCWSTR, WINDOW_STYLE) {
    let base = WS_CHILD | WS_VISIBLE;
    match kind {
        LabelKind::Text => (WC_STATIC, base | WINDOW_STYLE(SS_LEFT | extra_style)),
        LabelKind::Group => (WC_BUTTON, base | WINDOW_STYLE(BS_GROUPBOX | extra_style)),
        LabelKind::Hyperlink => (
            WC_STATIC,
            base | WINDOW_STYLE(SS_OWNERDRAW | SS_NOTIFY | extra_style),
        ),
    }
}

/*
 * Handles WM_DRAWITEM for a hyperlink static. `background` is the dialog
 * brush when custom colors are set; otherwise the system face color.
 */
pub(crate) fn draw_hyperlink(dis: &DRAWITEMSTRUCT, text: &str, background: Option<HBRUSH>) {
    unsafe {
        let brush = background.unwrap_or_else(|| GetSysColorBrush(COLOR_BTNFACE));
        FillRect(dis.hDC, &dis.rcItem, brush);

        let control_font = HFONT(SendMessageW(dis.hwndItem, WM_GETFONT, None, None).0 as *mut c_void);
        let underlined = create_underlined_font(control_font);
        let old_font = underlined.map(|font| SelectObject(dis.hDC, HGDIOBJ(font.0)));

        SetTextColor(dis.hDC, color_to_colorref(&Color::LINK_BLUE));
        SetBkMode(dis.hDC, TRANSPARENT);
        let mut text_buf: Vec<u16> = text.encode_utf16().collect();
        let mut rect = dis.rcItem;
        DrawTextW(
            dis.hDC,
            &mut text_buf,
            &mut rect,
            DT_LEFT | DT_VCENTER | DT_SINGLELINE | DT_NOPREFIX,
        );

        // Restore original font to avoid leaking GDI selection state
        if let Some(prev_font) = old_font {
            SelectObject(dis.hDC, prev_font);
        }
        if let Some(font) = underlined {
            let _ = DeleteObject(HGDIOBJ(font.0));
        }
    }
}

/// Copy of `font` (or the stock GUI font) with underlining on. The caller deletes it.
fn create_underlined_font(font: HFONT) -> Option<HFONT> {
    unsafe {
        let source = if font.is_invalid() {
            GetStockObject(DEFAULT_GUI_FONT)
        } else {
            HGDIOBJ(font.0)
        };
        let mut logfont = LOGFONTW::default();
        let copied = GetObjectW(
            source,
            std::mem::size_of::<LOGFONTW>() as i32,
            Some(&mut logfont as *mut LOGFONTW as *mut c_void),
        );
        if copied == 0 {
            log::warn!("LabelHandler: GetObjectW failed for hyperlink font {font:?}");
            return None;
        }
        logfont.lfUnderline = 1;
        let underlined = CreateFontIndirectW(&logfont);
        (!underlined.is_invalid()).then_some(underlined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyperlinks_are_notifying_owner_drawn_statics() {
        let (_, style) = compute_label_class_and_style(LabelKind::Hyperlink, 0);
        assert_eq!(style.0 & 0x1F, SS_OWNERDRAW);
        assert_eq!(style.0 & SS_NOTIFY, SS_NOTIFY);
    }

    #[test]
    fn groups_are_group_box_buttons() {
        let (_, style) = compute_label_class_and_style(LabelKind::Group, 0);
        assert_eq!(style.0 & 0xF, BS_GROUPBOX);
    }

    #[test]
    fn plain_labels_do_not_notify() {
        let (_, style) = compute_label_class_and_style(LabelKind::Text, 0);
        assert_eq!(style.0 & SS_NOTIFY, 0);
    }
}
