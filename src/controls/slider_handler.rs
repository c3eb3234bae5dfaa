/*
 * Encapsulates Win32-specific operations for sliders: a horizontal trackbar
 * (msctls_trackbar32) plus an optional static value label to its right.
 * Positions are in native units; `crate::slider` converts model values.
 */

use crate::controls::ChildHost;
use crate::error::Result as PlatformResult;
use crate::slider::{self, SliderScale};
use crate::types::{ControlId, Frame};
use crate::window_common::ChildWindowSpec;

use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::WindowsAndMessaging::{
        SendMessageW, WINDOW_EX_STYLE, WINDOW_STYLE, WS_CHILD, WS_TABSTOP, WS_VISIBLE,
    },
};
use windows::core::PCWSTR;

const WC_TRACKBAR: PCWSTR = windows::core::w!("msctls_trackbar32");
const WC_STATIC: PCWSTR = windows::core::w!("STATIC");

// Trackbar styles
const TBS_AUTOTICKS: u32 = 0x0001;
const TBS_NOTICKS: u32 = 0x0010;

// Trackbar messages
const TBM_GETPOS: u32 = 0x0400;
const TBM_SETPOS: u32 = 0x0405;
const TBM_SETRANGEMIN: u32 = 0x0407;
const TBM_SETRANGEMAX: u32 = 0x0408;
const TBM_SETTICFREQ: u32 = 0x0414;

const SS_LEFT: u32 = 0x0000;
const SS_CENTERIMAGE: u32 = 0x0200;

const VALUE_LABEL_WIDTH: i32 = 48;
const VALUE_LABEL_GAP: i32 = 4;

/// Native objects of one slider.
pub(crate) struct SliderWindows {
    pub(crate) trackbar: HWND,
    pub(crate) value_label: Option<HWND>,
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn create_slider(
    host: &ChildHost,
    control_id: ControlId,
    frame: Frame,
    min: f32,
    max: f32,
    value: f32,
    tick: f32,
    show_value: bool,
    extra_style: u32,
) -> PlatformResult<SliderWindows> {
    let scale = SliderScale::for_range(min, max);
    let (trackbar_frame, label_frame) = split_slider_frame(frame, show_value);
    let ticks = tick_frequency(tick, scale);

    let trackbar = host.create(&ChildWindowSpec {
        class: WC_TRACKBAR,
        text: "",
        style: compute_trackbar_style(ticks.is_some(), extra_style),
        ex_style: WINDOW_EX_STYLE(0),
        frame: trackbar_frame,
        id: control_id,
    })?;

    let (lo, hi) = native_range(min, max, scale);
    unsafe {
        SendMessageW(trackbar, TBM_SETRANGEMIN, Some(WPARAM(0)), Some(LPARAM(lo as isize)));
        SendMessageW(trackbar, TBM_SETRANGEMAX, Some(WPARAM(1)), Some(LPARAM(hi as isize)));
        if let Some(frequency) = ticks {
            SendMessageW(trackbar, TBM_SETTICFREQ, Some(WPARAM(frequency as usize)), Some(LPARAM(0)));
        }
    }
    set_position(trackbar, scale.to_native(value));

    let value_label = match label_frame {
        Some(label_frame) => Some(host.create(&ChildWindowSpec {
            class: WC_STATIC,
            text: &slider::format_value(value, min, max),
            style: WS_CHILD | WS_VISIBLE | WINDOW_STYLE(SS_LEFT | SS_CENTERIMAGE),
            ex_style: WINDOW_EX_STYLE(0),
            frame: label_frame,
            id: ControlId::STATIC,
        })?),
        None => None,
    };

    log::debug!(
        "SliderHandler: Created slider (ID {}) range [{lo}, {hi}] ticks {ticks:?} as {trackbar:?}",
        control_id.raw()
    );
    Ok(SliderWindows {
        trackbar,
        value_label,
    })
}

pub(crate) fn set_position(hwnd: HWND, position: i32) {
    unsafe {
        SendMessageW(hwnd, TBM_SETPOS, Some(WPARAM(1)), Some(LPARAM(position as isize)));
    }
}

pub(crate) fn read_position(hwnd: HWND) -> i32 {
    let result = unsafe { SendMessageW(hwnd, TBM_GETPOS, Some(WPARAM(0)), Some(LPARAM(0))) };
    result.0 as i32
}

fn native_range(min: f32, max: f32, scale: SliderScale) -> (i32, i32) {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    (scale.to_native(lo), scale.to_native(hi))
}

/// Tick spacing in native units, or `None` when ticks are off.
fn tick_frequency(tick: f32, scale: SliderScale) -> Option<i32> {
    (tick > 0.0).then(|| scale.to_native(tick).max(1))
}

fn compute_trackbar_style(ticks: bool, extra_style: u32) -> WINDOW_STYLE {
    let tick_style = if ticks { TBS_AUTOTICKS } else { TBS_NOTICKS };
    WS_CHILD | WS_VISIBLE | WS_TABSTOP | WINDOW_STYLE(tick_style | extra_style)
}

/*
 * With a value label the frame is shared: the label takes a fixed width on
 * the right (at most a third of the frame) and the trackbar the rest.
 */
fn split_slider_frame(frame: Frame, show_value: bool) -> (Frame, Option<Frame>) {
    if !show_value {
        return (frame, None);
    }
    let label_width = VALUE_LABEL_WIDTH.min(frame.width / 3);
    let trackbar_width = (frame.width - label_width - VALUE_LABEL_GAP).max(0);
    let trackbar = Frame {
        width: trackbar_width,
        ..frame
    };
    let label = Frame {
        x: frame.x + trackbar_width + VALUE_LABEL_GAP,
        width: label_width,
        ..frame
    };
    (trackbar, Some(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_used_whole_without_value_label() {
        let frame = Frame::new(10, 20, 200, 24);
        assert_eq!(split_slider_frame(frame, false), (frame, None));
    }

    #[test]
    fn value_label_sits_right_of_the_trackbar() {
        // Arrange
        let frame = Frame::new(10, 20, 200, 24);

        // Act
        let (trackbar, label) = split_slider_frame(frame, true);

        // Assert
        assert_eq!(trackbar, Frame::new(10, 20, 148, 24));
        assert_eq!(label, Some(Frame::new(162, 20, 48, 24)));
    }

    #[test]
    fn narrow_sliders_give_the_label_a_third() {
        let (trackbar, label) = split_slider_frame(Frame::new(0, 0, 90, 20), true);
        assert_eq!(label.map(|l| l.width), Some(30));
        assert_eq!(trackbar.width, 56);
    }

    #[test]
    fn native_range_follows_the_scale_and_orders_bounds() {
        let small = SliderScale::for_range(0.0, 1.0);
        assert_eq!(native_range(0.0, 1.0, small), (0, 100));
        assert_eq!(native_range(1.0, 0.0, small), (0, 100));
        let wide = SliderScale::for_range(0.0, 5000.0);
        assert_eq!(native_range(0.0, 5000.0, wide), (0, 5000));
    }

    #[test]
    fn tick_frequency_is_converted_to_native_units() {
        let scale = SliderScale::for_range(0.0, 1.0);
        assert_eq!(tick_frequency(0.1, scale), Some(10));
        assert_eq!(tick_frequency(0.0, scale), None);
        assert_eq!(tick_frequency(0.001, scale), Some(1));
    }

    #[test]
    fn trackbar_style_reflects_ticks() {
        assert_eq!(compute_trackbar_style(true, 0).0 & TBS_AUTOTICKS, TBS_AUTOTICKS);
        assert_eq!(compute_trackbar_style(false, 0).0 & TBS_NOTICKS, TBS_NOTICKS);
    }
}
