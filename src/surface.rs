/*
 * The seam between the portable dialog logic and a native windowing backend.
 *
 * `Dialog` owns one `ControlSurface` and talks to native objects exclusively
 * through it: creating the window and controls during `open`, pushing values
 * during refresh and setters, and reading values back while dispatching
 * notifications. The Win32 implementation lives in `surface_windows`; tests
 * use an in-memory double.
 */
use crate::config::DialogConfig;
use crate::control::Control;
use crate::dialog::NotificationRouter;
use crate::error::Result as PlatformResult;
use crate::styling_primitives::Color;
use crate::types::{ControlId, NativeHandle};

/// Which list-style native control a selection call addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceStyle {
    Combo,
    List,
}

/// Native objects produced for one control record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedControl {
    pub handle: NativeHandle,
    pub companion: Option<NativeHandle>,
    pub bitmap: Option<NativeHandle>,
}

impl CreatedControl {
    pub fn single(handle: NativeHandle) -> Self {
        Self {
            handle,
            companion: None,
            bitmap: None,
        }
    }
}

/// What an owner-drawn control should look like, resolved from the control record.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnerDrawSpec {
    Hyperlink {
        text: String,
    },
    ColoredButton {
        text: String,
        background: Color,
        text_color: Color,
    },
    PictureButton {
        text: String,
        bitmap: Option<NativeHandle>,
    },
}

pub trait ControlSurface {
    /*
     * Creates the top-level dialog window described by `config`. The router
     * must be kept by the window so native notifications can reach the dialog.
     */
    fn create_dialog_window(
        &mut self,
        config: &DialogConfig,
        router: NotificationRouter,
    ) -> PlatformResult<NativeHandle>;

    /// Creates the native control(s) for `control`, applying the dialog font.
    fn create_control(
        &mut self,
        window: NativeHandle,
        id: ControlId,
        control: &Control,
    ) -> PlatformResult<CreatedControl>;

    fn show_window(&mut self, window: NativeHandle);
    fn destroy_window(&mut self, window: NativeHandle);
    fn is_window(&self, window: NativeHandle) -> bool;

    fn set_enabled(&mut self, target: NativeHandle, enabled: bool);
    /// Removes visual styles from a control (classic rendering).
    fn disable_theme(&mut self, target: NativeHandle);

    fn set_checked(&mut self, target: NativeHandle, checked: bool);
    fn is_checked(&self, target: NativeHandle) -> bool;

    fn set_text(&mut self, target: NativeHandle, text: &str);
    fn text(&self, target: NativeHandle) -> String;

    fn set_items(&mut self, target: NativeHandle, style: ChoiceStyle, items: &[String]);
    fn set_selection(&mut self, target: NativeHandle, style: ChoiceStyle, index: Option<usize>);
    fn selection(&self, target: NativeHandle, style: ChoiceStyle) -> Option<usize>;

    fn set_slider_position(&mut self, target: NativeHandle, position: i32);
    fn slider_position(&self, target: NativeHandle) -> i32;

    fn set_spin_position(&mut self, target: NativeHandle, position: i32);

    /// Asks the control to repaint (owner-drawn controls after a state change).
    fn redraw(&mut self, target: NativeHandle);

    /// Opens a hyperlink action (URL or document) with the shell.
    fn open_link(&mut self, action: &str);

    /// Yes/no question, modal to `owner` when given. Returns true for yes.
    fn confirm(&mut self, owner: Option<NativeHandle>, caption: &str, message: &str) -> bool;

    /// Error report, modal to `owner` when given.
    fn report_error(&mut self, owner: Option<NativeHandle>, caption: &str, message: &str);
}
