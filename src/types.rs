/*
 * Platform-agnostic types shared between the control model, the dispatch logic
 * and the native surface: identifiers, geometry, decoded notifications and the
 * host callback contract.
 */

/// Title used for the event emitted when the dialog window goes away.
pub const EVENT_WM_DESTROY: &str = "WM_DESTROY";
/// Title used when a key is pressed while the dialog is active.
pub const EVENT_WM_KEYDOWN: &str = "WM_KEYDOWN";
/// Title used when a key is released while the dialog is active.
pub const EVENT_WM_KEYUP: &str = "WM_KEYUP";

/*
 * Numeric identifier of a materialized control. Assigned sequentially from
 * `ControlId::FIRST` every time the dialog is opened and used to match native
 * notifications back to a control record.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(i32);

impl ControlId {
    pub const FIRST: ControlId = ControlId(1000);
    // Children that never notify (spin buddies) use the conventional IDC_STATIC.
    pub const STATIC: ControlId = ControlId(-1);

    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    pub(crate) fn for_position(position: usize) -> Self {
        Self(Self::FIRST.0 + position as i32)
    }

    pub(crate) fn position(self) -> Option<usize> {
        let offset = self.0 - Self::FIRST.0;
        (offset >= 0).then_some(offset as usize)
    }
}

/*
 * Opaque native object handle (an HWND or GDI handle on Windows). The control
 * model stores handles only in this form so it stays portable and testable.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub usize);

/// Absolute pixel placement of a control or of the dialog window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Frame {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// When slider changes are reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SliderMode {
    /// Every position change is reported while the thumb moves.
    #[default]
    Continuous,
    /// Only the final position is reported, when the scroll ends.
    OnRelease,
}

/// Trackbar scroll request codes, as carried by WM_HSCROLL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollCode {
    LineLeft,
    LineRight,
    PageLeft,
    PageRight,
    ThumbPosition,
    ThumbTrack,
    Left,
    Right,
    EndScroll,
    Other(u32),
}

impl ScrollCode {
    pub fn from_raw(code: u32) -> Self {
        match code {
            0 => ScrollCode::LineLeft,
            1 => ScrollCode::LineRight,
            2 => ScrollCode::PageLeft,
            3 => ScrollCode::PageRight,
            4 => ScrollCode::ThumbPosition,
            5 => ScrollCode::ThumbTrack,
            6 => ScrollCode::Left,
            7 => ScrollCode::Right,
            8 => ScrollCode::EndScroll,
            other => ScrollCode::Other(other),
        }
    }
}

/*
 * A native notification decoded into portable form. The Win32 window
 * procedure produces these; platform doubles construct them directly.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Clicked { id: ControlId },
    SelectionChanged { id: ControlId },
    TextChanged { id: ControlId },
    EditCommitted { id: ControlId },
    Scrolled { id: ControlId, code: ScrollCode },
    SpinDelta { id: ControlId, position: i32, delta: i32 },
    CloseRequested,
    Destroyed,
    Key { pressed: bool, virtual_key: u32 },
}

/// What the window procedure should do after a notification was routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The notification was consumed; the native default must not run (e.g. spin deltas).
    Handled,
    /// The notification was observed; the native default processing should still run.
    Observed,
    /// Not addressed to a known control, or the dialog is gone.
    Ignored,
    /// Caused by the dialog's own programmatic update and deliberately dropped.
    Suppressed,
}

/// One host notification: `(title, text, value)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlEvent {
    pub title: String,
    pub text: String,
    pub value: i32,
}

impl ControlEvent {
    pub fn new(title: impl Into<String>, text: impl Into<String>, value: i32) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            value,
        }
    }
}

/*
 * Capability the host implements to receive control changes. Any closure with
 * the matching shape is accepted as well.
 */
pub trait DialogEventHandler {
    fn handle_control_event(&mut self, title: &str, text: &str, value: i32);
}

impl<F> DialogEventHandler for F
where
    F: FnMut(&str, &str, i32),
{
    fn handle_control_event(&mut self, title: &str, text: &str, value: i32) {
        self(title, text, value)
    }
}
