/*
 * Win32 handlers for the individual control kinds. Each handler owns the
 * window class, style bits and messages of its kind; `Win32Surface` calls
 * them when materializing and updating controls, and the window procedure
 * calls the drawing entry points for owner-drawn controls.
 */
pub(crate) mod button_handler;
pub(crate) mod checkbox_handler;
pub(crate) mod combobox_handler;
pub(crate) mod input_handler;
pub(crate) mod label_handler;
pub(crate) mod paint_router;
pub(crate) mod radiobutton_handler;
pub(crate) mod slider_handler;
pub(crate) mod spin_handler;
pub(crate) mod styling_handler;

use crate::error::Result as PlatformResult;
use crate::window_common::{self, ChildWindowSpec};

use windows::Win32::Foundation::{HINSTANCE, HWND};
use windows::Win32::Graphics::Gdi::HFONT;

/// Parent window, module and font shared by every child created during one `open`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChildHost {
    pub(crate) parent: HWND,
    pub(crate) h_instance: HINSTANCE,
    pub(crate) font: HFONT,
}

impl ChildHost {
    pub(crate) fn create(&self, spec: &ChildWindowSpec<'_>) -> PlatformResult<HWND> {
        let hwnd = window_common::create_child_window(self.parent, self.h_instance, spec)?;
        styling_handler::apply_font(hwnd, self.font);
        Ok(hwnd)
    }
}
