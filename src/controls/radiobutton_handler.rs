/*
 * Encapsulates Win32-specific operations for RadioButton controls.
 * The first button of each radio group carries WS_GROUP so dialog keyboard
 * navigation treats the group as one stop; exclusivity across the group is
 * maintained by the dialog itself, which clears siblings on every selection.
 */

use crate::controls::{ChildHost, checkbox_handler};
use crate::error::Result as PlatformResult;
use crate::types::{ControlId, Frame};
use crate::window_common::ChildWindowSpec;

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    BS_AUTORADIOBUTTON, WINDOW_EX_STYLE, WINDOW_STYLE, WS_CHILD, WS_GROUP, WS_TABSTOP, WS_VISIBLE,
};
use windows::core::PCWSTR;

const WC_BUTTON: PCWSTR = windows::core::w!("BUTTON");

#[allow(clippy::too_many_arguments)]
pub(crate) fn create_radiobutton(
    host: &ChildHost,
    control_id: ControlId,
    frame: Frame,
    label: &str,
    group_start: bool,
    selected: bool,
    extra_style: u32,
) -> PlatformResult<HWND> {
    let hwnd_radio = host.create(&ChildWindowSpec {
        class: WC_BUTTON,
        text: label,
        style: compute_radiobutton_style(group_start, extra_style),
        ex_style: WINDOW_EX_STYLE(0),
        frame,
        id: control_id,
    })?;
    checkbox_handler::set_checked(hwnd_radio, selected);
    log::debug!(
        "RadioButtonHandler: Created RadioButton '{label}' (ID {}, group start {group_start}) as {hwnd_radio:?}",
        control_id.raw()
    );
    Ok(hwnd_radio)
}

/*
 * Pure helper for computing RadioButton style flags.
 * Group start buttons get WS_GROUP | WS_TABSTOP for mutual exclusion.
 */
fn compute_radiobutton_style(group_start: bool, extra_style: u32) -> WINDOW_STYLE {
    let mut style =
        WS_CHILD | WS_VISIBLE | WINDOW_STYLE(BS_AUTORADIOBUTTON as u32 | extra_style);
    if group_start {
        style |= WS_GROUP | WS_TABSTOP;
    }
    style
}
