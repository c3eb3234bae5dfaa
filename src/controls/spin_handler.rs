/*
 * Encapsulates Win32-specific operations for spin controls: a bordered
 * static "buddy" showing the value and an up-down arrow control
 * (msctls_updown32) attached to its right edge. The dialog vetoes the
 * up-down's own moves (UDN_DELTAPOS) and writes position and buddy text
 * itself, so the buddy is not an auto-updating integer buddy.
 */

use crate::controls::ChildHost;
use crate::error::Result as PlatformResult;
use crate::types::{ControlId, Frame};
use crate::window_common::ChildWindowSpec;

use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::WindowsAndMessaging::{
        SendMessageW, WINDOW_EX_STYLE, WINDOW_STYLE, WS_BORDER, WS_CHILD, WS_TABSTOP, WS_VISIBLE,
    },
};
use windows::core::PCWSTR;

const WC_UPDOWN: PCWSTR = windows::core::w!("msctls_updown32");
const WC_STATIC: PCWSTR = windows::core::w!("STATIC");

// Up-down styles
const UDS_ARROWKEYS: u32 = 0x0020;
const UDS_NOTHOUSANDS: u32 = 0x0080;

// Up-down messages
const UDM_SETBUDDY: u32 = 0x0469;
const UDM_SETRANGE32: u32 = 0x046F;
const UDM_SETPOS32: u32 = 0x0471;

const SS_RIGHT: u32 = 0x0002;
const SS_CENTERIMAGE: u32 = 0x0200;

const ARROWS_WIDTH: i32 = 16;

/// Native objects of one spin control.
pub(crate) struct SpinWindows {
    pub(crate) updown: HWND,
    pub(crate) buddy: HWND,
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn create_spin(
    host: &ChildHost,
    control_id: ControlId,
    frame: Frame,
    min: i32,
    max: i32,
    value: i32,
    extra_style: u32,
) -> PlatformResult<SpinWindows> {
    let (buddy_frame, arrows_frame) = split_spin_frame(frame);
    let buddy = host.create(&ChildWindowSpec {
        class: WC_STATIC,
        text: &value.to_string(),
        style: WS_CHILD | WS_VISIBLE | WS_BORDER | WINDOW_STYLE(SS_RIGHT | SS_CENTERIMAGE),
        ex_style: WINDOW_EX_STYLE(0),
        frame: buddy_frame,
        id: ControlId::STATIC,
    })?;
    let updown = host.create(&ChildWindowSpec {
        class: WC_UPDOWN,
        text: "",
        style: compute_updown_style(extra_style),
        ex_style: WINDOW_EX_STYLE(0),
        frame: arrows_frame,
        id: control_id,
    })?;

    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    unsafe {
        SendMessageW(updown, UDM_SETBUDDY, Some(WPARAM(buddy.0 as usize)), Some(LPARAM(0)));
        SendMessageW(
            updown,
            UDM_SETRANGE32,
            Some(WPARAM(lo as isize as usize)),
            Some(LPARAM(hi as isize)),
        );
    }
    set_position(updown, value.clamp(lo, hi));

    log::debug!(
        "SpinHandler: Created spin (ID {}) range [{lo}, {hi}] value {value} as {updown:?}",
        control_id.raw()
    );
    Ok(SpinWindows { updown, buddy })
}

pub(crate) fn set_position(hwnd: HWND, position: i32) {
    unsafe {
        SendMessageW(hwnd, UDM_SETPOS32, Some(WPARAM(0)), Some(LPARAM(position as isize)));
    }
}

fn compute_updown_style(extra_style: u32) -> WINDOW_STYLE {
    WS_CHILD | WS_VISIBLE | WS_TABSTOP | WINDOW_STYLE(UDS_ARROWKEYS | UDS_NOTHOUSANDS | extra_style)
}

/// Buddy on the left, arrows in a fixed-width strip on the right.
fn split_spin_frame(frame: Frame) -> (Frame, Frame) {
    let arrows_width = ARROWS_WIDTH.min(frame.width);
    let buddy = Frame {
        width: frame.width - arrows_width,
        ..frame
    };
    let arrows = Frame {
        x: frame.x + buddy.width,
        width: arrows_width,
        ..frame
    };
    (buddy, arrows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_take_a_fixed_strip_on_the_right() {
        let (buddy, arrows) = split_spin_frame(Frame::new(10, 10, 60, 22));
        assert_eq!(buddy, Frame::new(10, 10, 44, 22));
        assert_eq!(arrows, Frame::new(54, 10, 16, 22));
    }

    #[test]
    fn tiny_frames_are_all_arrows() {
        let (buddy, arrows) = split_spin_frame(Frame::new(0, 0, 10, 22));
        assert_eq!(buddy.width, 0);
        assert_eq!(arrows.width, 10);
    }

    #[test]
    fn updown_style_handles_arrow_keys() {
        let style = compute_updown_style(0);
        assert_eq!(style.0 & UDS_ARROWKEYS, UDS_ARROWKEYS);
    }
}
