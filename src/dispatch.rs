/*
 * Applies a decoded native notification to the control model.
 *
 * Runs with the dialog state and the surface both borrowed, so it reads native
 * values back, stores them in the matching control record, writes corrections
 * to the native side and collects the host events to deliver afterwards. It
 * never calls the host directly.
 */
use crate::control::{Control, ControlPayload};
use crate::dialog::DialogState;
use crate::slider::{self, SliderScale};
use crate::surface::{ChoiceStyle, ControlSurface};
use crate::types::{
    ControlEvent, ControlId, EVENT_WM_DESTROY, EVENT_WM_KEYDOWN, EVENT_WM_KEYUP, NativeHandle,
    Notification, RouteOutcome, ScrollCode, SliderMode,
};

pub(crate) fn dispatch(
    state: &mut DialogState,
    surface: &mut dyn ControlSurface,
    notification: Notification,
    events: &mut Vec<ControlEvent>,
) -> RouteOutcome {
    log::trace!("Dispatch: {notification:?}");
    match notification {
        Notification::Clicked { id } => on_clicked(state, surface, id, events),
        Notification::SelectionChanged { id } => on_selection_changed(state, surface, id, events),
        Notification::TextChanged { id } => on_edit_text(state, surface, id, 0, events),
        Notification::EditCommitted { id } => on_edit_text(state, surface, id, 1, events),
        Notification::Scrolled { id, code } => on_scrolled(state, surface, id, code, events),
        Notification::SpinDelta {
            id,
            position,
            delta,
        } => on_spin_delta(state, surface, id, position, delta, events),
        Notification::CloseRequested => on_window_gone(state, surface, true, events),
        Notification::Destroyed => on_window_gone(state, surface, false, events),
        Notification::Key {
            pressed,
            virtual_key,
        } => {
            if state.window.is_none() {
                return RouteOutcome::Ignored;
            }
            let title = if pressed {
                EVENT_WM_KEYDOWN
            } else {
                EVENT_WM_KEYUP
            };
            events.push(ControlEvent::new(title, "", virtual_key as i32));
            RouteOutcome::Observed
        }
    }
}

/// Resolves a notification ID to the bound control and its native handle.
fn bound_control(state: &mut DialogState, id: ControlId) -> Option<(usize, NativeHandle)> {
    let Some(position) = state.registry.position_of_id(id) else {
        log::trace!("Dispatch: ID {} is not bound to a control", id.raw());
        return None;
    };
    let handle = state.registry.get(position)?.native.handle?;
    Some((position, handle))
}

fn on_clicked(
    state: &mut DialogState,
    surface: &mut dyn ControlSurface,
    id: ControlId,
    events: &mut Vec<ControlEvent>,
) -> RouteOutcome {
    let Some((position, handle)) = bound_control(state, id) else {
        return RouteOutcome::Ignored;
    };
    let Some(control) = state.registry.get_mut(position) else {
        return RouteOutcome::Ignored;
    };
    match &mut control.payload {
        ControlPayload::CheckBox { checked, .. } => {
            *checked = surface.is_checked(handle);
            events.push(control.current_event());
            RouteOutcome::Observed
        }
        ControlPayload::RadioButton { group, .. } => {
            let group = *group;
            select_radio(state, surface, position, group, Some(events));
            RouteOutcome::Observed
        }
        ControlPayload::Button { .. } => {
            events.push(control.current_event());
            RouteOutcome::Observed
        }
        ControlPayload::Hyperlink { action, .. } => {
            if is_launchable(action) {
                surface.open_link(action);
            } else {
                log::debug!("Dispatch: hyperlink '{}' action is not a URL", control.title);
            }
            events.push(control.current_event());
            RouteOutcome::Observed
        }
        _ => RouteOutcome::Ignored,
    }
}

/*
 * Makes `position` the selected member of radio `group`, clearing the others
 * in the model and on the native side. When `events` is given, one event is
 * queued for each member whose value actually changed.
 */
pub(crate) fn select_radio(
    state: &mut DialogState,
    surface: &mut dyn ControlSurface,
    position: usize,
    group: u32,
    mut events: Option<&mut Vec<ControlEvent>>,
) {
    for member in state.registry.radio_group_members(group) {
        let Some(control) = state.registry.get_mut(member) else {
            continue;
        };
        let select = member == position;
        let changed = match &mut control.payload {
            ControlPayload::RadioButton { selected, .. } => {
                let changed = *selected != select;
                *selected = select;
                changed
            }
            _ => false,
        };
        if let Some(handle) = control.native.handle
            && (changed || select)
        {
            surface.set_checked(handle, select);
        }
        if changed && let Some(events) = events.as_deref_mut() {
            events.push(control.current_event());
        }
    }
}

fn on_selection_changed(
    state: &mut DialogState,
    surface: &mut dyn ControlSurface,
    id: ControlId,
    events: &mut Vec<ControlEvent>,
) -> RouteOutcome {
    let Some((position, handle)) = bound_control(state, id) else {
        return RouteOutcome::Ignored;
    };
    let Some(control) = state.registry.get_mut(position) else {
        return RouteOutcome::Ignored;
    };
    let (choice, style) = match &mut control.payload {
        ControlPayload::ComboBox(choice) => (choice, ChoiceStyle::Combo),
        ControlPayload::ListBox(choice) => (choice, ChoiceStyle::List),
        _ => return RouteOutcome::Ignored,
    };
    choice.index = surface
        .selection(handle, style)
        .filter(|&index| index < choice.items.len());
    events.push(control.current_event());
    RouteOutcome::Observed
}

fn on_edit_text(
    state: &mut DialogState,
    surface: &mut dyn ControlSurface,
    id: ControlId,
    value: i32,
    events: &mut Vec<ControlEvent>,
) -> RouteOutcome {
    let Some((position, handle)) = bound_control(state, id) else {
        return RouteOutcome::Ignored;
    };
    let Some(control) = state.registry.get_mut(position) else {
        return RouteOutcome::Ignored;
    };
    let ControlPayload::Edit { text, .. } = &mut control.payload else {
        return RouteOutcome::Ignored;
    };
    *text = surface.text(handle);
    events.push(ControlEvent::new(control.title.clone(), text.clone(), value));
    RouteOutcome::Observed
}

fn on_scrolled(
    state: &mut DialogState,
    surface: &mut dyn ControlSurface,
    id: ControlId,
    code: ScrollCode,
    events: &mut Vec<ControlEvent>,
) -> RouteOutcome {
    let Some((position, handle)) = bound_control(state, id) else {
        return RouteOutcome::Ignored;
    };
    let mode = state.config.slider_mode;
    let Some(control) = state.registry.get_mut(position) else {
        return RouteOutcome::Ignored;
    };
    let Control {
        payload, native, ..
    } = control;
    let ControlPayload::Slider {
        min,
        max,
        value,
        show_value,
        ..
    } = payload
    else {
        return RouteOutcome::Ignored;
    };
    let (min, max, show_value) = (*min, *max, *show_value);
    let scale = SliderScale::for_range(min, max);

    let mut native_position = surface.slider_position(handle);
    if matches!(code, ScrollCode::LineLeft | ScrollCode::LineRight) {
        // The trackbar moved by one native unit; apply the keyboard step instead.
        let step = slider::keyboard_step(min, max);
        let from = scale.to_native(*value);
        let target = if code == ScrollCode::LineLeft {
            from - step
        } else {
            from + step
        };
        let (lo, hi) = (
            scale.to_native(min.min(max)),
            scale.to_native(min.max(max)),
        );
        native_position = target.clamp(lo, hi);
        surface.set_slider_position(handle, native_position);
    }

    let new_value = slider::clamp_value(scale.from_native(native_position), min, max);
    let changed = new_value != *value;
    *value = new_value;

    if show_value && let Some(label) = native.companion {
        surface.set_text(label, &slider::format_value(new_value, min, max));
    }

    let notify = match mode {
        SliderMode::Continuous => changed,
        SliderMode::OnRelease => code == ScrollCode::EndScroll,
    };
    if notify {
        events.push(control.current_event());
    }
    RouteOutcome::Observed
}

fn on_spin_delta(
    state: &mut DialogState,
    surface: &mut dyn ControlSurface,
    id: ControlId,
    position: i32,
    delta: i32,
    events: &mut Vec<ControlEvent>,
) -> RouteOutcome {
    let Some((index, handle)) = bound_control(state, id) else {
        return RouteOutcome::Ignored;
    };
    let Some(control) = state.registry.get_mut(index) else {
        return RouteOutcome::Ignored;
    };
    let ControlPayload::Spin { min, max, value } = &mut control.payload else {
        return RouteOutcome::Ignored;
    };
    let (lo, hi) = if *min <= *max { (*min, *max) } else { (*max, *min) };
    let next = position.saturating_add(delta).clamp(lo, hi);
    *value = next;
    surface.set_spin_position(handle, next);
    if let Some(buddy) = control.native.companion {
        surface.set_text(buddy, &next.to_string());
    }
    events.push(control.current_event());
    // The up-down control would move on its own; we already did.
    RouteOutcome::Handled
}

fn on_window_gone(
    state: &mut DialogState,
    surface: &mut dyn ControlSurface,
    destroy: bool,
    events: &mut Vec<ControlEvent>,
) -> RouteOutcome {
    let Some(window) = state.window.take() else {
        return RouteOutcome::Ignored;
    };
    log::debug!("Dispatch: window {window:?} is closing");
    if destroy {
        surface.destroy_window(window);
    }
    state.registry.clear_native();
    events.push(ControlEvent::new(EVENT_WM_DESTROY, "", 0));
    if destroy {
        RouteOutcome::Handled
    } else {
        RouteOutcome::Observed
    }
}

/// Whether a hyperlink action should be handed to the shell.
pub(crate) fn is_launchable(action: &str) -> bool {
    let lower = action.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("www.") || lower.starts_with("mailto:")
}
