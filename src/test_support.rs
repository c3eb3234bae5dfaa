/*
 * Test doubles: an in-memory `ControlSurface` that records native calls and
 * lets tests play the role of the user, and a recorder for host events.
 */
use crate::config::DialogConfig;
use crate::control::{Control, ControlKind, ControlPayload};
use crate::dialog::{Dialog, NotificationRouter};
use crate::error::{PlatformError, Result as PlatformResult};
use crate::slider::SliderScale;
use crate::surface::{ChoiceStyle, ControlSurface, CreatedControl};
use crate::types::{ControlEvent, ControlId, NativeHandle, Notification, RouteOutcome};

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct NativeControl {
    id: Option<ControlId>,
    kind: Option<ControlKind>,
    checked: bool,
    text: String,
    items: Vec<String>,
    selection: Option<usize>,
    position: i32,
    enabled: bool,
    companion: Option<NativeHandle>,
}

struct Recording {
    next_handle: usize,
    router: Option<NotificationRouter>,
    alive: HashSet<NativeHandle>,
    windows_created: usize,
    window_titles: Vec<String>,
    destroyed: Vec<NativeHandle>,
    controls: HashMap<NativeHandle, NativeControl>,
    by_id: HashMap<ControlId, NativeHandle>,
    created_ids: Vec<ControlId>,
    unthemed: Vec<NativeHandle>,
    fail_titles: Vec<String>,
    errors: Vec<(String, String)>,
    confirmations: Vec<String>,
    confirm_answer: bool,
    prompt_owners: Vec<Option<NativeHandle>>,
    links: Vec<String>,
    calls: usize,
    echo_outcomes: Vec<RouteOutcome>,
}

impl Recording {
    fn allocate(&mut self) -> NativeHandle {
        self.next_handle += 1;
        NativeHandle(self.next_handle)
    }

    fn by_id(&self, id: ControlId) -> Option<&NativeControl> {
        self.by_id.get(&id).and_then(|h| self.controls.get(h))
    }

    fn by_id_mut(&mut self, id: ControlId) -> Option<&mut NativeControl> {
        let handle = *self.by_id.get(&id)?;
        self.controls.get_mut(&handle)
    }
}

/*
 * Like the real window, the double reports some programmatic changes back
 * through the router (edit text changes, window destruction) so tests can
 * check that the dialog suppresses its own feedback.
 */
#[derive(Clone)]
pub(crate) struct RecordingSurface {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingSurface {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Recording {
                next_handle: 0,
                router: None,
                alive: HashSet::new(),
                windows_created: 0,
                window_titles: Vec::new(),
                destroyed: Vec::new(),
                controls: HashMap::new(),
                by_id: HashMap::new(),
                created_ids: Vec::new(),
                unthemed: Vec::new(),
                fail_titles: Vec::new(),
                errors: Vec::new(),
                confirmations: Vec::new(),
                confirm_answer: true,
                prompt_owners: Vec::new(),
                links: Vec::new(),
                calls: 0,
                echo_outcomes: Vec::new(),
            })),
        }
    }

    /// Delivers a notification as the window procedure would.
    pub(crate) fn simulate(&self, notification: Notification) -> RouteOutcome {
        let router = self.inner.borrow().router.clone();
        match router {
            Some(router) => router.route(notification),
            None => RouteOutcome::Ignored,
        }
    }

    fn echo(&self, notification: Notification) {
        let router = self.inner.borrow().router.clone();
        if let Some(router) = router {
            let outcome = router.route(notification);
            self.inner.borrow_mut().echo_outcomes.push(outcome);
        }
    }

    fn touch(&self) {
        self.inner.borrow_mut().calls += 1;
    }

    pub(crate) fn call_count(&self) -> usize {
        self.inner.borrow().calls
    }

    pub(crate) fn created_ids(&self) -> Vec<ControlId> {
        self.inner.borrow().created_ids.clone()
    }

    pub(crate) fn window_count(&self) -> usize {
        self.inner.borrow().windows_created
    }

    pub(crate) fn window_titles(&self) -> Vec<String> {
        self.inner.borrow().window_titles.clone()
    }

    pub(crate) fn destroyed_windows(&self) -> Vec<NativeHandle> {
        self.inner.borrow().destroyed.clone()
    }

    /// Makes the window vanish without the dialog noticing.
    pub(crate) fn forget_window(&self, window: NativeHandle) {
        self.inner.borrow_mut().alive.remove(&window);
    }

    pub(crate) fn fail_control_creation_for(&self, title: &str) {
        self.inner.borrow_mut().fail_titles.push(title.to_string());
    }

    pub(crate) fn error_reports(&self) -> Vec<(String, String)> {
        self.inner.borrow().errors.clone()
    }

    pub(crate) fn answer_confirmations(&self, answer: bool) {
        self.inner.borrow_mut().confirm_answer = answer;
    }

    pub(crate) fn confirmations(&self) -> Vec<String> {
        self.inner.borrow().confirmations.clone()
    }

    /// Owner window of every question and error report, in order.
    pub(crate) fn prompt_owners(&self) -> Vec<Option<NativeHandle>> {
        self.inner.borrow().prompt_owners.clone()
    }

    pub(crate) fn opened_links(&self) -> Vec<String> {
        self.inner.borrow().links.clone()
    }

    pub(crate) fn echo_outcomes(&self) -> Vec<RouteOutcome> {
        self.inner.borrow().echo_outcomes.clone()
    }

    pub(crate) fn enabled_state(&self, handle: NativeHandle) -> Option<bool> {
        self.inner.borrow().controls.get(&handle).map(|c| c.enabled)
    }

    pub(crate) fn unthemed(&self) -> Vec<NativeHandle> {
        self.inner.borrow().unthemed.clone()
    }

    pub(crate) fn set_native_checked(&self, id: ControlId, checked: bool) {
        if let Some(control) = self.inner.borrow_mut().by_id_mut(id) {
            control.checked = checked;
        }
    }

    pub(crate) fn native_checked(&self, id: ControlId) -> Option<bool> {
        self.inner.borrow().by_id(id).map(|c| c.checked)
    }

    pub(crate) fn set_native_selection(&self, id: ControlId, selection: Option<usize>) {
        if let Some(control) = self.inner.borrow_mut().by_id_mut(id) {
            control.selection = selection;
        }
    }

    pub(crate) fn native_selection(&self, id: ControlId) -> Option<Option<usize>> {
        self.inner.borrow().by_id(id).map(|c| c.selection)
    }

    pub(crate) fn native_items(&self, id: ControlId) -> Option<Vec<String>> {
        self.inner.borrow().by_id(id).map(|c| c.items.clone())
    }

    /// Types into a native control without raising a notification.
    pub(crate) fn set_native_text(&self, id: ControlId, text: &str) {
        if let Some(control) = self.inner.borrow_mut().by_id_mut(id) {
            control.text = text.to_string();
        }
    }

    pub(crate) fn native_text(&self, id: ControlId) -> Option<String> {
        self.inner.borrow().by_id(id).map(|c| c.text.clone())
    }

    pub(crate) fn set_native_slider_position(&self, id: ControlId, position: i32) {
        if let Some(control) = self.inner.borrow_mut().by_id_mut(id) {
            control.position = position;
        }
    }

    pub(crate) fn native_slider_position(&self, id: ControlId) -> Option<i32> {
        self.inner.borrow().by_id(id).map(|c| c.position)
    }

    pub(crate) fn native_spin_position(&self, id: ControlId) -> Option<i32> {
        self.native_slider_position(id)
    }

    /// Text of a control's value label or spin buddy.
    pub(crate) fn companion_text(&self, id: ControlId) -> Option<String> {
        let inner = self.inner.borrow();
        let companion = inner.by_id(id)?.companion?;
        inner.controls.get(&companion).map(|c| c.text.clone())
    }
}

fn initial_native_state(control: &Control) -> NativeControl {
    let mut native = NativeControl {
        kind: Some(control.kind()),
        enabled: true,
        ..NativeControl::default()
    };
    match control.payload() {
        ControlPayload::CheckBox { label, checked } => {
            native.text = label.clone();
            native.checked = *checked;
        }
        ControlPayload::RadioButton {
            label, selected, ..
        } => {
            native.text = label.clone();
            native.checked = *selected;
        }
        ControlPayload::Slider {
            min, max, value, ..
        } => native.position = SliderScale::for_range(*min, *max).to_native(*value),
        ControlPayload::Edit { text, .. }
        | ControlPayload::Button { text, .. }
        | ControlPayload::Group { text }
        | ControlPayload::Static { text }
        | ControlPayload::Hyperlink { text, .. } => native.text = text.clone(),
        ControlPayload::ComboBox(choice) | ControlPayload::ListBox(choice) => {
            native.items = choice.items.clone();
            native.selection = choice.index;
        }
        ControlPayload::Spin { value, .. } => native.position = *value,
    }
    native
}

impl ControlSurface for RecordingSurface {
    fn create_dialog_window(
        &mut self,
        config: &DialogConfig,
        router: NotificationRouter,
    ) -> PlatformResult<NativeHandle> {
        self.touch();
        let mut inner = self.inner.borrow_mut();
        let window = inner.allocate();
        inner.router = Some(router);
        inner.alive.insert(window);
        inner.windows_created += 1;
        inner.window_titles.push(config.title.clone());
        Ok(window)
    }

    fn create_control(
        &mut self,
        _window: NativeHandle,
        id: ControlId,
        control: &Control,
    ) -> PlatformResult<CreatedControl> {
        self.touch();
        let mut inner = self.inner.borrow_mut();
        if inner.fail_titles.iter().any(|t| t == control.title()) {
            return Err(PlatformError::OperationFailed(format!(
                "refusing to create '{}'",
                control.title()
            )));
        }
        let handle = inner.allocate();
        let mut native = initial_native_state(control);
        native.id = Some(id);
        let companion = match control.payload() {
            ControlPayload::Slider {
                show_value: true, ..
            }
            | ControlPayload::Spin { .. } => {
                let companion = inner.allocate();
                inner.controls.insert(companion, NativeControl::default());
                Some(companion)
            }
            _ => None,
        };
        native.companion = companion;
        inner.controls.insert(handle, native);
        inner.by_id.insert(id, handle);
        inner.created_ids.push(id);
        Ok(CreatedControl {
            handle,
            companion,
            bitmap: None,
        })
    }

    fn show_window(&mut self, _window: NativeHandle) {
        self.touch();
    }

    fn destroy_window(&mut self, window: NativeHandle) {
        self.touch();
        {
            let mut inner = self.inner.borrow_mut();
            inner.alive.remove(&window);
            inner.destroyed.push(window);
        }
        self.echo(Notification::Destroyed);
    }

    fn is_window(&self, window: NativeHandle) -> bool {
        self.inner.borrow().alive.contains(&window)
    }

    fn set_enabled(&mut self, target: NativeHandle, enabled: bool) {
        self.touch();
        if let Some(control) = self.inner.borrow_mut().controls.get_mut(&target) {
            control.enabled = enabled;
        }
    }

    fn disable_theme(&mut self, target: NativeHandle) {
        self.touch();
        self.inner.borrow_mut().unthemed.push(target);
    }

    fn set_checked(&mut self, target: NativeHandle, checked: bool) {
        self.touch();
        if let Some(control) = self.inner.borrow_mut().controls.get_mut(&target) {
            control.checked = checked;
        }
    }

    fn is_checked(&self, target: NativeHandle) -> bool {
        self.inner
            .borrow()
            .controls
            .get(&target)
            .is_some_and(|c| c.checked)
    }

    fn set_text(&mut self, target: NativeHandle, text: &str) {
        self.touch();
        let echo = {
            let mut inner = self.inner.borrow_mut();
            match inner.controls.get_mut(&target) {
                Some(control) => {
                    control.text = text.to_string();
                    match (control.kind, control.id) {
                        (Some(ControlKind::Edit), Some(id)) => Some(id),
                        _ => None,
                    }
                }
                None => None,
            }
        };
        if let Some(id) = echo {
            self.echo(Notification::TextChanged { id });
        }
    }

    fn text(&self, target: NativeHandle) -> String {
        self.inner
            .borrow()
            .controls
            .get(&target)
            .map(|c| c.text.clone())
            .unwrap_or_default()
    }

    fn set_items(&mut self, target: NativeHandle, _style: ChoiceStyle, items: &[String]) {
        self.touch();
        if let Some(control) = self.inner.borrow_mut().controls.get_mut(&target) {
            control.items = items.to_vec();
            control.selection = None;
        }
    }

    fn set_selection(&mut self, target: NativeHandle, _style: ChoiceStyle, index: Option<usize>) {
        self.touch();
        if let Some(control) = self.inner.borrow_mut().controls.get_mut(&target) {
            control.selection = index;
        }
    }

    fn selection(&self, target: NativeHandle, _style: ChoiceStyle) -> Option<usize> {
        self.inner.borrow().controls.get(&target)?.selection
    }

    fn set_slider_position(&mut self, target: NativeHandle, position: i32) {
        self.touch();
        if let Some(control) = self.inner.borrow_mut().controls.get_mut(&target) {
            control.position = position;
        }
    }

    fn slider_position(&self, target: NativeHandle) -> i32 {
        self.inner
            .borrow()
            .controls
            .get(&target)
            .map(|c| c.position)
            .unwrap_or_default()
    }

    fn set_spin_position(&mut self, target: NativeHandle, position: i32) {
        self.set_slider_position(target, position);
    }

    fn redraw(&mut self, _target: NativeHandle) {
        self.touch();
    }

    fn open_link(&mut self, action: &str) {
        self.touch();
        self.inner.borrow_mut().links.push(action.to_string());
    }

    fn confirm(&mut self, owner: Option<NativeHandle>, _caption: &str, message: &str) -> bool {
        self.touch();
        let mut inner = self.inner.borrow_mut();
        inner.prompt_owners.push(owner);
        inner.confirmations.push(message.to_string());
        inner.confirm_answer
    }

    fn report_error(&mut self, owner: Option<NativeHandle>, caption: &str, message: &str) {
        self.touch();
        let mut inner = self.inner.borrow_mut();
        inner.prompt_owners.push(owner);
        inner
            .errors
            .push((caption.to_string(), message.to_string()));
    }
}

/// Collects every event the dialog delivers to its host.
#[derive(Clone, Default)]
pub(crate) struct EventLog {
    events: Rc<RefCell<Vec<ControlEvent>>>,
}

impl EventLog {
    pub(crate) fn attach(dialog: &Dialog) -> Self {
        let log = Self::default();
        let sink = Rc::clone(&log.events);
        dialog.set_event_handler(move |title: &str, text: &str, value: i32| {
            sink.borrow_mut().push(ControlEvent::new(title, text, value));
        });
        log
    }

    pub(crate) fn take(&self) -> Vec<ControlEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub(crate) fn titles(&self) -> Vec<String> {
        self.events.borrow().iter().map(|e| e.title.clone()).collect()
    }
}

static SCRATCH_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A fresh, empty directory under the system temp folder.
pub(crate) fn scratch_dir(name: &str) -> PathBuf {
    let n = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir()
        .join("dialogduct-tests")
        .join(format!("{}-{name}-{n}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
