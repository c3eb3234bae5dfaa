/*
 * Encapsulates Win32-specific operations for the two list-style controls:
 * dropdown-list ComboBoxes and notifying ListBoxes. Both hold a list of
 * strings and one optional selection; they differ only in window class,
 * style bits and message numbers, which `ChoiceMessages` captures.
 */

use crate::controls::ChildHost;
use crate::error::Result as PlatformResult;
use crate::surface::ChoiceStyle;
use crate::types::{ControlId, Frame};
use crate::window_common::ChildWindowSpec;

use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::WindowsAndMessaging::{
        SendMessageW, WINDOW_EX_STYLE, WINDOW_STYLE, WS_BORDER, WS_CHILD, WS_EX_CLIENTEDGE,
        WS_TABSTOP, WS_VISIBLE, WS_VSCROLL,
    },
};
use windows::core::{HSTRING, PCWSTR};

const WC_COMBOBOX: PCWSTR = windows::core::w!("COMBOBOX");
const WC_LISTBOX: PCWSTR = windows::core::w!("LISTBOX");

// ComboBox styles
const CBS_DROPDOWNLIST: u32 = 0x0003;
const CBS_HASSTRINGS: u32 = 0x0200;

// ListBox styles
const LBS_NOTIFY: u32 = 0x0001;
const LBS_HASSTRINGS: u32 = 0x0040;
const LBS_NOINTEGRALHEIGHT: u32 = 0x0100;

// ComboBox messages
const CB_RESETCONTENT: u32 = 0x014B;
const CB_ADDSTRING: u32 = 0x0143;
const CB_SETCURSEL: u32 = 0x014E;
const CB_GETCURSEL: u32 = 0x0147;

// ListBox messages
const LB_ADDSTRING: u32 = 0x0180;
const LB_RESETCONTENT: u32 = 0x0184;
const LB_SETCURSEL: u32 = 0x0186;
const LB_GETCURSEL: u32 = 0x0188;

// CB_ERR and LB_ERR share the value.
const CHOICE_ERR: isize = -1;

// Rows shown by an open dropdown before it scrolls.
const MAX_DROPDOWN_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChoiceMessages {
    reset: u32,
    add: u32,
    set_selection: u32,
    get_selection: u32,
}

fn messages_for(style: ChoiceStyle) -> ChoiceMessages {
    match style {
        ChoiceStyle::Combo => ChoiceMessages {
            reset: CB_RESETCONTENT,
            add: CB_ADDSTRING,
            set_selection: CB_SETCURSEL,
            get_selection: CB_GETCURSEL,
        },
        ChoiceStyle::List => ChoiceMessages {
            reset: LB_RESETCONTENT,
            add: LB_ADDSTRING,
            set_selection: LB_SETCURSEL,
            get_selection: LB_GETCURSEL,
        },
    }
}

/*
 * Creates a native ComboBox (dropdown list style) or ListBox, fills it with
 * `items` and applies the initial selection.
 */
#[allow(clippy::too_many_arguments)]
pub(crate) fn create_choice_control(
    host: &ChildHost,
    control_id: ControlId,
    frame: Frame,
    style: ChoiceStyle,
    items: &[String],
    selected_index: Option<usize>,
    extra_style: u32,
) -> PlatformResult<HWND> {
    let (class, ex_style, native_frame) = match style {
        ChoiceStyle::Combo => (
            WC_COMBOBOX,
            WINDOW_EX_STYLE(0),
            Frame {
                height: dropdown_height(frame.height, items.len()),
                ..frame
            },
        ),
        ChoiceStyle::List => (WC_LISTBOX, WS_EX_CLIENTEDGE, frame),
    };
    let hwnd = host.create(&ChildWindowSpec {
        class,
        text: "",
        style: compute_choice_style(style, extra_style),
        ex_style,
        frame: native_frame,
        id: control_id,
    })?;
    set_items(hwnd, style, items);
    set_selection(hwnd, style, selected_index);
    log::debug!(
        "ComboBoxHandler: Created {style:?} (ID {}) with {} items as {hwnd:?}",
        control_id.raw(),
        items.len()
    );
    Ok(hwnd)
}

/*
 * Replaces the items of the control. Clears existing items and adds new
 * ones; no implicit selection is made.
 */
pub(crate) fn set_items(hwnd: HWND, style: ChoiceStyle, items: &[String]) {
    let messages = messages_for(style);
    unsafe {
        SendMessageW(hwnd, messages.reset, Some(WPARAM(0)), Some(LPARAM(0)));
    }
    for item in items {
        let h_item = HSTRING::from(item.as_str());
        unsafe {
            SendMessageW(
                hwnd,
                messages.add,
                Some(WPARAM(0)),
                Some(LPARAM(h_item.as_ptr() as isize)),
            );
        }
    }
    log::trace!("ComboBoxHandler: Set {} items on {hwnd:?}", items.len());
}

/*
 * Sets the selected index.
 * None means clear selection (set to -1).
 */
pub(crate) fn set_selection(hwnd: HWND, style: ChoiceStyle, selected_index: Option<usize>) {
    let messages = messages_for(style);
    let wparam = selected_index.map(|i| i as isize).unwrap_or(-1);
    let result = unsafe {
        SendMessageW(
            hwnd,
            messages.set_selection,
            Some(WPARAM(wparam as usize)),
            Some(LPARAM(0)),
        )
    };
    if result.0 == CHOICE_ERR && selected_index.is_some() {
        log::warn!(
            "ComboBoxHandler: Selecting index {selected_index:?} on {hwnd:?} returned an error"
        );
    }
}

pub(crate) fn read_selection(hwnd: HWND, style: ChoiceStyle) -> Option<usize> {
    let messages = messages_for(style);
    let result =
        unsafe { SendMessageW(hwnd, messages.get_selection, Some(WPARAM(0)), Some(LPARAM(0))) };
    selection_from_raw_index(result.0)
}

fn selection_from_raw_index(raw: isize) -> Option<usize> {
    if raw <= CHOICE_ERR {
        None
    } else {
        Some(raw as usize)
    }
}

fn compute_choice_style(style: ChoiceStyle, extra_style: u32) -> WINDOW_STYLE {
    let base = WS_CHILD | WS_VISIBLE | WS_TABSTOP | WS_VSCROLL;
    match style {
        ChoiceStyle::Combo => base | WINDOW_STYLE(CBS_DROPDOWNLIST | CBS_HASSTRINGS | extra_style),
        ChoiceStyle::List => {
            base | WS_BORDER
                | WINDOW_STYLE(LBS_NOTIFY | LBS_HASSTRINGS | LBS_NOINTEGRALHEIGHT | extra_style)
        }
    }
}

/*
 * A dropdown combo's window height includes its open list. The frame gives
 * the closed height; the list gets one row of that height per item, capped.
 */
fn dropdown_height(closed_height: i32, item_count: usize) -> i32 {
    let rows = item_count.clamp(1, MAX_DROPDOWN_ROWS) as i32;
    closed_height * (rows + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_from_raw_index_maps_negative_to_none() {
        assert_eq!(selection_from_raw_index(CHOICE_ERR), None);
    }

    #[test]
    fn selection_from_raw_index_maps_positive_to_some() {
        assert_eq!(selection_from_raw_index(5), Some(5));
        assert_eq!(selection_from_raw_index(0), Some(0));
    }

    #[test]
    fn list_and_combo_use_their_own_messages() {
        assert_eq!(messages_for(ChoiceStyle::Combo).get_selection, CB_GETCURSEL);
        assert_eq!(messages_for(ChoiceStyle::List).get_selection, LB_GETCURSEL);
        assert_eq!(messages_for(ChoiceStyle::List).add, LB_ADDSTRING);
    }

    #[test]
    fn list_style_notifies_and_combo_style_drops_down() {
        let list = compute_choice_style(ChoiceStyle::List, 0);
        assert_eq!(list.0 & LBS_NOTIFY, LBS_NOTIFY);
        let combo = compute_choice_style(ChoiceStyle::Combo, 0);
        assert_eq!(combo.0 & CBS_DROPDOWNLIST, CBS_DROPDOWNLIST);
    }

    #[test]
    fn dropdown_height_grows_with_items_up_to_a_cap() {
        assert_eq!(dropdown_height(20, 0), 40);
        assert_eq!(dropdown_height(20, 3), 80);
        assert_eq!(dropdown_height(20, 50), 220);
    }
}
