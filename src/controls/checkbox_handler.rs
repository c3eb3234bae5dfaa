/*
 * Encapsulates Win32-specific operations for CheckBox controls: creation of
 * BS_AUTOCHECKBOX buttons and checked-state reads and writes. The state
 * helpers work for any button that carries a check mark, so radio buttons
 * use them too.
 */

use crate::controls::ChildHost;
use crate::error::Result as PlatformResult;
use crate::types::{ControlId, Frame};
use crate::window_common::ChildWindowSpec;

use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::Controls::BST_CHECKED;
use windows::Win32::UI::WindowsAndMessaging::{
    BM_GETCHECK, BM_SETCHECK, BS_AUTOCHECKBOX, SendMessageW, WINDOW_EX_STYLE, WINDOW_STYLE,
    WS_CHILD, WS_TABSTOP, WS_VISIBLE,
};
use windows::core::PCWSTR;

const WC_BUTTON: PCWSTR = windows::core::w!("BUTTON");

/// Creates a native CheckBox (BS_AUTOCHECKBOX) with its initial state.
pub(crate) fn create_checkbox(
    host: &ChildHost,
    control_id: ControlId,
    frame: Frame,
    label: &str,
    checked: bool,
    extra_style: u32,
) -> PlatformResult<HWND> {
    let hwnd_checkbox = host.create(&ChildWindowSpec {
        class: WC_BUTTON,
        text: label,
        style: compute_checkbox_style(extra_style),
        ex_style: WINDOW_EX_STYLE(0),
        frame,
        id: control_id,
    })?;
    set_checked(hwnd_checkbox, checked);
    log::debug!(
        "CheckBoxHandler: Created CheckBox '{label}' (ID {}) as {hwnd_checkbox:?}",
        control_id.raw()
    );
    Ok(hwnd_checkbox)
}

pub(crate) fn set_checked(hwnd: HWND, checked: bool) {
    unsafe {
        let _ = SendMessageW(
            hwnd,
            BM_SETCHECK,
            Some(WPARAM(win32_check_state(checked))),
            Some(LPARAM(0)),
        );
    }
}

/// Reads the current check state via BM_GETCHECK.
/// Returns `true` if the button is checked (BST_CHECKED), `false` otherwise.
pub(crate) fn read_checkbox_state(hwnd: HWND) -> bool {
    let result = unsafe { SendMessageW(hwnd, BM_GETCHECK, None, None) };
    result.0 as u32 == BST_CHECKED.0
}

/*
 * Pure helper for computing CheckBox style flags.
 * BS_AUTOCHECKBOX handles toggling automatically; WS_TABSTOP makes it keyboard-accessible.
 */
fn compute_checkbox_style(extra_style: u32) -> WINDOW_STYLE {
    WS_CHILD | WS_VISIBLE | WS_TABSTOP | WINDOW_STYLE(BS_AUTOCHECKBOX as u32 | extra_style)
}

fn win32_check_state(checked: bool) -> usize {
    if checked { 1 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkbox_style_includes_autocheckbox() {
        let style = compute_checkbox_style(0);
        assert!(
            style.0 & (BS_AUTOCHECKBOX as u32) != 0,
            "style must include BS_AUTOCHECKBOX"
        );
    }

    #[test]
    fn checkbox_style_includes_tabstop() {
        let style = compute_checkbox_style(0);
        assert!(style.0 & WS_TABSTOP.0 != 0, "style must include WS_TABSTOP");
    }

    #[test]
    fn extra_style_bits_are_added() {
        // BS_LEFTTEXT
        let style = compute_checkbox_style(0x20);
        assert_eq!(style.0 & 0x20, 0x20);
        assert!(style.0 & (BS_AUTOCHECKBOX as u32) != 0);
    }

    #[test]
    fn checked_state_maps_to_expected_win32_constant() {
        assert_eq!(win32_check_state(true), 1);
        assert_eq!(win32_check_state(false), 0);
    }
}
