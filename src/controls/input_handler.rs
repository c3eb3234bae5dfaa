/*
 * Encapsulates Win32-specific operations for EDIT controls. Text is read and
 * written through the generic window-text helpers; only creation differs
 * between single-line and multi-line edits.
 */

use crate::controls::ChildHost;
use crate::error::Result as PlatformResult;
use crate::types::{ControlId, Frame};
use crate::window_common::ChildWindowSpec;

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    GWL_STYLE, GetWindowLongPtrW, WINDOW_STYLE, WS_CHILD, WS_EX_CLIENTEDGE, WS_TABSTOP,
    WS_VISIBLE, WS_VSCROLL,
};
use windows::core::PCWSTR;

const WC_EDIT: PCWSTR = windows::core::w!("EDIT");

const ES_MULTILINE: u32 = 0x0004;
const ES_AUTOVSCROLL: u32 = 0x0040;
const ES_AUTOHSCROLL: u32 = 0x0080;
const ES_WANTRETURN: u32 = 0x1000;

pub(crate) fn create_edit(
    host: &ChildHost,
    control_id: ControlId,
    frame: Frame,
    text: &str,
    multiline: bool,
    extra_style: u32,
) -> PlatformResult<HWND> {
    let hwnd_edit = host.create(&ChildWindowSpec {
        class: WC_EDIT,
        text,
        style: compute_edit_style(multiline, extra_style),
        ex_style: WS_EX_CLIENTEDGE,
        frame,
        id: control_id,
    })?;
    log::debug!(
        "InputHandler: Created edit (ID {}, multiline {multiline}) as {hwnd_edit:?}",
        control_id.raw()
    );
    Ok(hwnd_edit)
}

/// Whether Enter in this edit should commit its value rather than insert a line.
pub(crate) fn is_single_line_edit(hwnd: HWND) -> bool {
    let style = unsafe { GetWindowLongPtrW(hwnd, GWL_STYLE) } as u32;
    style & ES_MULTILINE == 0
}

fn compute_edit_style(multiline: bool, extra_style: u32) -> WINDOW_STYLE {
    let mut style = WS_CHILD | WS_VISIBLE | WS_TABSTOP | WINDOW_STYLE(extra_style);
    if multiline {
        style |= WS_VSCROLL | WINDOW_STYLE(ES_MULTILINE | ES_AUTOVSCROLL | ES_WANTRETURN);
    } else {
        style |= WINDOW_STYLE(ES_AUTOHSCROLL);
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_edit_scrolls_horizontally() {
        let style = compute_edit_style(false, 0);
        assert_eq!(style.0 & ES_AUTOHSCROLL, ES_AUTOHSCROLL);
        assert_eq!(style.0 & ES_MULTILINE, 0);
    }

    #[test]
    fn multiline_edit_accepts_return_and_scrolls_vertically() {
        let style = compute_edit_style(true, 0);
        assert_eq!(style.0 & ES_MULTILINE, ES_MULTILINE);
        assert_eq!(style.0 & ES_WANTRETURN, ES_WANTRETURN);
        assert!(style.0 & WS_VSCROLL.0 != 0);
    }
}
