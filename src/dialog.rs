/*
 * The public `Dialog` handle: owns the control registry, the dialog
 * configuration and the native surface, materializes the window on `open`,
 * and delivers control events to the host.
 *
 * All state lives behind `RefCell`s inside a shared `DialogInner`. Native
 * notifications reach it through a `NotificationRouter` (a weak reference kept
 * by the window), so there are no process-wide statics. A notification that
 * arrives while the dialog itself is busy calling into the surface is a
 * side-effect of a programmatic update (SetWindowText raising EN_CHANGE, for
 * instance) and is suppressed. Host callbacks are queued and run only after
 * every internal borrow has been released, which lets a callback call back
 * into the dialog.
 */
use crate::config::DialogConfig;
use crate::control::{ControlKind, ControlPayload};
use crate::dispatch;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::registry::ControlRegistry;
use crate::state_transfer;
use crate::styling_primitives::{Color, DialogColors, FontDescription};
use crate::surface::{ControlSurface, OwnerDrawSpec};
use crate::types::{
    ControlEvent, ControlId, DialogEventHandler, EVENT_WM_DESTROY, Frame, NativeHandle,
    Notification, RouteOutcome, SliderMode,
};

use std::cell::{Cell, RefCell, RefMut};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::{Rc, Weak};

const ERROR_CAPTION: &str = "Dialog error";

pub(crate) struct DialogState {
    pub(crate) config: DialogConfig,
    pub(crate) registry: ControlRegistry,
    pub(crate) window: Option<NativeHandle>,
}

pub(crate) struct DialogInner {
    state: RefCell<DialogState>,
    surface: RefCell<Box<dyn ControlSurface>>,
    handler: RefCell<Option<Box<dyn DialogEventHandler>>>,
    pending_events: RefCell<VecDeque<ControlEvent>>,
    delivering: Cell<bool>,
}

/*
 * RAII marker for an active delivery loop. Nested emits only enqueue while
 * it is alive; dropping it (even while unwinding) re-arms delivery.
 */
struct DeliveryGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> DeliveryGuard<'a> {
    fn new(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

impl DialogInner {
    pub(crate) fn route(&self, notification: Notification) -> RouteOutcome {
        let (outcome, events) = {
            let Ok(mut state) = self.state.try_borrow_mut() else {
                log::trace!("Dialog: {notification:?} raised during a state update; suppressed.");
                return RouteOutcome::Suppressed;
            };
            let Ok(mut surface) = self.surface.try_borrow_mut() else {
                log::trace!("Dialog: {notification:?} raised by a native call; suppressed.");
                return RouteOutcome::Suppressed;
            };
            let mut events = Vec::new();
            let outcome =
                dispatch::dispatch(&mut state, surface.as_mut(), notification, &mut events);
            (outcome, events)
        };
        self.emit(events);
        outcome
    }

    fn emit(&self, events: Vec<ControlEvent>) {
        if events.is_empty() {
            return;
        }
        self.pending_events.borrow_mut().extend(events);
        if self.delivering.get() {
            return;
        }
        let _guard = DeliveryGuard::new(&self.delivering);
        loop {
            let next = self.pending_events.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            let handler = self.handler.borrow_mut().take();
            match handler {
                Some(mut handler) => {
                    log::trace!(
                        "Dialog: delivering ('{}', '{}', {})",
                        event.title,
                        event.text,
                        event.value
                    );
                    handler.handle_control_event(&event.title, &event.text, event.value);
                    let mut slot = self.handler.borrow_mut();
                    // Keep a handler installed by the callback itself.
                    if slot.is_none() {
                        *slot = Some(handler);
                    }
                }
                None => {
                    log::trace!(
                        "Dialog: no event handler registered; dropping event for '{}'",
                        event.title
                    );
                }
            }
        }
    }

    fn lock(
        &self,
    ) -> PlatformResult<(RefMut<'_, DialogState>, RefMut<'_, Box<dyn ControlSurface>>)> {
        let state = self.state.try_borrow_mut().map_err(|_| {
            PlatformError::OperationFailed("dialog state is busy (re-entrant call)".into())
        })?;
        let surface = self.surface.try_borrow_mut().map_err(|_| {
            PlatformError::OperationFailed("dialog surface is busy (re-entrant call)".into())
        })?;
        Ok((state, surface))
    }
}

impl Drop for DialogInner {
    fn drop(&mut self) {
        let window = self.state.get_mut().window.take();
        if let Some(window) = window {
            log::debug!("Dialog: dropped while open; destroying window {window:?}");
            self.surface.get_mut().destroy_window(window);
        }
    }
}

/*
 * Handle stored by the native window so notifications can reach the dialog.
 * Holds only a weak reference: once the last `Dialog` is gone every route is
 * ignored.
 */
#[derive(Clone)]
pub struct NotificationRouter {
    inner: Weak<DialogInner>,
}

impl NotificationRouter {
    pub fn route(&self, notification: Notification) -> RouteOutcome {
        match self.inner.upgrade() {
            Some(inner) => inner.route(notification),
            None => RouteOutcome::Ignored,
        }
    }

    /// Describes how an owner-drawn control must be painted, or `None` for default drawing.
    pub fn owner_draw_spec(&self, id: ControlId) -> Option<OwnerDrawSpec> {
        let inner = self.inner.upgrade()?;
        let state = inner.state.try_borrow().ok()?;
        let position = state.registry.position_of_id(id)?;
        let control = state.registry.get(position)?;
        state_transfer::owner_draw_spec(control)
    }

    pub fn is_hyperlink(&self, id: ControlId) -> bool {
        self.control_kind(id) == Some(ControlKind::Hyperlink)
    }

    pub fn control_kind(&self, id: ControlId) -> Option<ControlKind> {
        let inner = self.inner.upgrade()?;
        let state = inner.state.try_borrow().ok()?;
        let position = state.registry.position_of_id(id)?;
        state.registry.get(position).map(|c| c.kind())
    }

    pub fn colors(&self) -> Option<DialogColors> {
        let inner = self.inner.upgrade()?;
        let state = inner.state.try_borrow().ok()?;
        state.config.colors
    }
}

#[derive(Clone)]
pub struct Dialog {
    pub(crate) inner: Rc<DialogInner>,
}

impl Dialog {
    /// Creates a dialog driven by the given native surface.
    pub fn with_surface(surface: Box<dyn ControlSurface>) -> Self {
        Self {
            inner: Rc::new(DialogInner {
                state: RefCell::new(DialogState {
                    config: DialogConfig::default(),
                    registry: ControlRegistry::new(),
                    window: None,
                }),
                surface: RefCell::new(surface),
                handler: RefCell::new(None),
                pending_events: RefCell::new(VecDeque::new()),
                delivering: Cell::new(false),
            }),
        }
    }

    /// Creates a dialog backed by native Win32 windows.
    #[cfg(target_os = "windows")]
    pub fn new() -> PlatformResult<Self> {
        let surface = crate::surface_windows::Win32Surface::new()?;
        Ok(Self::with_surface(Box::new(surface)))
    }

    pub fn set_event_handler(&self, handler: impl DialogEventHandler + 'static) {
        *self.inner.handler.borrow_mut() = Some(Box::new(handler));
    }

    pub fn router(&self) -> NotificationRouter {
        NotificationRouter {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub(crate) fn emit(&self, events: Vec<ControlEvent>) {
        self.inner.emit(events);
    }

    pub(crate) fn lock(
        &self,
    ) -> PlatformResult<(RefMut<'_, DialogState>, RefMut<'_, Box<dyn ControlSurface>>)> {
        self.inner.lock()
    }

    pub(crate) fn with_state_mut<R>(
        &self,
        f: impl FnOnce(&mut DialogState) -> R,
    ) -> PlatformResult<R> {
        let mut state = self.inner.state.try_borrow_mut().map_err(|_| {
            PlatformError::OperationFailed("dialog state is busy (re-entrant call)".into())
        })?;
        Ok(f(&mut state))
    }

    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&DialogState) -> R) -> Option<R> {
        let state = self.inner.state.try_borrow().ok()?;
        Some(f(&state))
    }

    // Configuration

    pub fn set_position(&self, frame: Frame) -> PlatformResult<()> {
        self.with_state_mut(|state| state.config.frame = frame)
    }

    pub fn set_font(&self, font: FontDescription) -> PlatformResult<()> {
        self.with_state_mut(|state| state.config.font = Some(font))
    }

    pub fn set_slider_mode(&self, mode: SliderMode) -> PlatformResult<()> {
        self.with_state_mut(|state| state.config.slider_mode = mode)
    }

    /// Turns visual styles on or off for every control created by the next `open`.
    pub fn set_theme_enabled(&self, enabled: bool) -> PlatformResult<()> {
        self.with_state_mut(|state| state.config.theme_enabled = enabled)
    }

    pub fn set_colors(&self, text: Color, background: Color) -> PlatformResult<()> {
        self.with_state_mut(|state| state.config.colors = Some(DialogColors { text, background }))
    }

    pub fn set_icon(&self, icon_path: impl Into<PathBuf>) -> PlatformResult<()> {
        let icon_path = icon_path.into();
        self.with_state_mut(|state| state.config.icon_path = Some(icon_path))
    }

    /// Folder that relative profile names are resolved against.
    pub fn set_data_folder(&self, folder: impl Into<PathBuf>) -> PlatformResult<()> {
        let folder = folder.into();
        self.with_state_mut(|state| state.config.data_folder = Some(folder))
    }

    pub fn set_section(&self, title: &str, section: &str) -> PlatformResult<()> {
        self.with_state_mut(|state| match state.registry.find_mut(title) {
            Some(control) => {
                control.section = Some(section.to_string());
                Ok(())
            }
            None => Err(not_found(title)),
        })?
    }

    /// Marks a control to be created without visual styles. Applies at the next `open`.
    pub fn set_control_theme(&self, title: &str, themed: bool) -> PlatformResult<()> {
        self.with_state_mut(|state| match state.registry.find_mut(title) {
            Some(control) => {
                control.themed = themed;
                Ok(())
            }
            None => Err(not_found(title)),
        })?
    }

    /// ORs extra native style bits into a control's creation style. Applies at the next `open`.
    pub fn set_control_style(&self, title: &str, style: u32) -> PlatformResult<()> {
        self.with_state_mut(|state| match state.registry.find_mut(title) {
            Some(control) => {
                control.extra_style |= style;
                Ok(())
            }
            None => Err(not_found(title)),
        })?
    }

    // Lifecycle

    pub fn is_open(&self) -> bool {
        self.window_handle().is_some()
    }

    pub fn window_handle(&self) -> Option<NativeHandle> {
        self.with_state(|state| state.window).flatten()
    }

    /*
     * Materializes the dialog. Returns the existing window when it is still
     * alive; otherwise creates the window and one native control per record
     * (IDs from 1000 in insertion order), captures snapshots and shows it.
     */
    pub fn open(&self, title: &str) -> PlatformResult<NativeHandle> {
        let router = self.router();
        let (mut state, mut surface) = self.lock()?;
        let state = &mut *state;

        if let Some(window) = state.window {
            if surface.is_window(window) {
                log::debug!("Dialog: open('{title}') while already open; returning {window:?}");
                return Ok(window);
            }
            log::debug!("Dialog: window {window:?} vanished; re-materializing");
            state.window = None;
            state.registry.clear_native();
        }

        state.config.title = title.to_string();

        let window = match surface.create_dialog_window(&state.config, router) {
            Ok(window) => window,
            Err(err) => {
                log::error!("Dialog: failed to create window '{title}': {err}");
                let message = format!("Window creation failed: {err}");
                surface.report_error(None, ERROR_CAPTION, &message);
                return Err(err);
            }
        };
        log::debug!(
            "Dialog: created window {window:?} for '{title}' with {} controls",
            state.registry.current().len()
        );

        let theme_enabled = state.config.theme_enabled;
        for position in 0..state.registry.current().len() {
            let id = ControlId::for_position(position);
            let Some(control) = state.registry.get_mut(position) else {
                continue;
            };
            match surface.create_control(window, id, control) {
                Ok(created) => {
                    control.native.id = Some(id);
                    control.native.handle = Some(created.handle);
                    control.native.companion = created.companion;
                    control.native.bitmap = created.bitmap;
                    if !control.enabled {
                        surface.set_enabled(created.handle, false);
                    }
                    if !theme_enabled || !control.themed {
                        surface.disable_theme(created.handle);
                    }
                }
                Err(err) => {
                    log::error!(
                        "Dialog: creating control '{}' (ID {}) failed: {err}",
                        control.title,
                        id.raw()
                    );
                    let message = format!("Could not create control '{}': {err}", control.title);
                    surface.destroy_window(window);
                    state.registry.clear_native();
                    // The window is gone; the report has no owner.
                    surface.report_error(None, ERROR_CAPTION, &message);
                    return Err(err);
                }
            }
        }

        // Only a successful open moves the snapshots.
        state.registry.capture_on_open();
        surface.show_window(window);
        state.window = Some(window);
        Ok(window)
    }

    /// Destroys the window (if open) and notifies the host with `WM_DESTROY`.
    pub fn close(&self) -> PlatformResult<()> {
        let closed = {
            let (mut state, mut surface) = self.lock()?;
            match state.window.take() {
                Some(window) => {
                    log::debug!("Dialog: closing window {window:?}");
                    surface.destroy_window(window);
                    state.registry.clear_native();
                    true
                }
                None => false,
            }
        };
        if closed {
            self.emit(vec![ControlEvent::new(EVENT_WM_DESTROY, "", 0)]);
        }
        Ok(())
    }

    /// Enables or disables a control, immediately when the dialog is open.
    pub fn enable_control(&self, title: &str, enabled: bool) -> PlatformResult<()> {
        let (mut state, mut surface) = self.lock()?;
        let control = state
            .registry
            .find_mut(title)
            .ok_or_else(|| not_found(title))?;
        control.enabled = enabled;
        if let Some(handle) = control.native.handle {
            surface.set_enabled(handle, enabled);
        }
        Ok(())
    }

    /// Snapshot of a control's payload by title.
    pub fn control_payload(&self, title: &str) -> Option<ControlPayload> {
        self.with_state(|state| state.registry.find(title).map(|c| c.payload.clone()))
            .flatten()
    }

    pub fn control_titles(&self) -> Vec<String> {
        self.with_state(|state| {
            state
                .registry
                .current()
                .iter()
                .map(|c| c.title.clone())
                .collect()
        })
        .unwrap_or_default()
    }
}

pub(crate) fn not_found(title: &str) -> PlatformError {
    log::warn!("Dialog: no control titled '{title}'");
    PlatformError::ControlNotFound(title.to_string())
}
