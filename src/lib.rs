/*
 * Provides the public entry point for the DialogDuct crate: native Win32
 * dialog boxes whose controls are declared by title, mirrored in a portable
 * control model, and kept in sync with the native windows in both directions.
 * Control state can be saved to and loaded from INI profiles, and restored to
 * the values it had when the dialog was first or most recently opened.
 *
 * Everything except the Win32 surface is portable: the control model,
 * dispatch, state transfer and persistence run against the `ControlSurface`
 * trait, so non-Windows builds compile and test the logic with an in-memory
 * surface. On Windows `Dialog::new` wires in the native implementation.
 */
pub(crate) mod accessors;
pub(crate) mod builder;
pub mod config;
pub mod control;
#[cfg(target_os = "windows")]
pub(crate) mod controls;
pub mod dialog;
pub(crate) mod dispatch;
pub mod error;
pub(crate) mod persistence;
pub mod profile;
pub(crate) mod registry;
pub(crate) mod slider;
pub(crate) mod state_transfer;
pub mod styling_primitives;
pub mod surface;
#[cfg(target_os = "windows")]
pub(crate) mod surface_windows;
#[cfg(test)]
pub(crate) mod test_support;
pub mod types;
#[cfg(target_os = "windows")]
pub(crate) mod window_common;

pub use config::DialogConfig;
pub use control::{ButtonAppearance, Choice, Control, ControlKind, ControlPayload, NativeBinding};
pub use dialog::{Dialog, NotificationRouter};
pub use error::{PlatformError, Result as PlatformResult};
pub use profile::{IniDocument, PROFILE_EXTENSION};
pub use styling_primitives::{Color, DialogColors, FontDescription, FontWeight};
pub use surface::{ChoiceStyle, ControlSurface, CreatedControl, OwnerDrawSpec};
pub use types::{
    ControlEvent, ControlId, DialogEventHandler, EVENT_WM_DESTROY, EVENT_WM_KEYDOWN,
    EVENT_WM_KEYUP, Frame, NativeHandle, Notification, RouteOutcome, ScrollCode, SliderMode,
};
