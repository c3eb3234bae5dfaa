/*
 * Typed getters and setters addressed by control title. Getters return `None`
 * when no control of the expected kind carries the title. Setters update the
 * model and, while the dialog is open, the live control; a miss logs a
 * warning and returns `ControlNotFound` without touching any state.
 */
use crate::control::{Choice, ControlKind, ControlPayload};
use crate::dialog::{Dialog, DialogState, not_found};
use crate::dispatch;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::slider;
use crate::state_transfer;
use crate::surface::{ChoiceStyle, ControlSurface};

impl Dialog {
    fn read_payload<T>(
        &self,
        title: &str,
        read: impl FnOnce(&ControlPayload) -> Option<T>,
    ) -> Option<T> {
        self.with_state(|state| state.registry.find(title).and_then(|c| read(&c.payload)))
            .flatten()
    }

    /*
     * Runs `write` on the payload of `title` and refreshes the live control.
     * Fails without writing when the control is not of the `expected` kind.
     */
    fn write_payload(
        &self,
        title: &str,
        expected: ControlKind,
        write: impl FnOnce(&mut ControlPayload),
    ) -> PlatformResult<()> {
        let (mut state, mut surface) = self.lock()?;
        let control = state
            .registry
            .find_mut(title)
            .ok_or_else(|| not_found(title))?;
        if control.kind() != expected {
            log::warn!(
                "Dialog: '{title}' is a {:?}, not a {expected:?}",
                control.kind()
            );
            return Err(PlatformError::OperationFailed(format!(
                "control '{title}' is not a {expected:?}"
            )));
        }
        write(&mut control.payload);
        state_transfer::refresh_control(control, surface.as_mut());
        Ok(())
    }

    pub fn get_checkbox(&self, title: &str) -> Option<bool> {
        self.read_payload(title, |payload| match payload {
            ControlPayload::CheckBox { checked, .. } => Some(*checked),
            _ => None,
        })
    }

    pub fn set_checkbox(&self, title: &str, checked: bool) -> PlatformResult<()> {
        self.write_payload(title, ControlKind::CheckBox, |payload| {
            if let ControlPayload::CheckBox { checked: current, .. } = payload {
                *current = checked;
            }
        })
    }

    pub fn get_radio(&self, title: &str) -> Option<bool> {
        self.read_payload(title, |payload| match payload {
            ControlPayload::RadioButton { selected, .. } => Some(*selected),
            _ => None,
        })
    }

    /*
     * Selecting a radio button clears the rest of its group. Passing false
     * only clears this button, which may leave the group without a selection.
     */
    pub fn set_radio(&self, title: &str, selected: bool) -> PlatformResult<()> {
        let (mut state, mut surface) = self.lock()?;
        let position = state
            .registry
            .position_of(title)
            .ok_or_else(|| not_found(title))?;
        let group = match state.registry.get(position).map(|c| &c.payload) {
            Some(ControlPayload::RadioButton { group, .. }) => *group,
            _ => {
                log::warn!("Dialog: '{title}' is not a radio button");
                return Err(PlatformError::OperationFailed(format!(
                    "control '{title}' is not a RadioButton"
                )));
            }
        };
        if selected {
            dispatch::select_radio(&mut state, surface.as_mut(), position, group, None);
        } else if let Some(control) = state.registry.get_mut(position) {
            if let ControlPayload::RadioButton { selected, .. } = &mut control.payload {
                *selected = false;
            }
            state_transfer::refresh_control(control, surface.as_mut());
        }
        Ok(())
    }

    pub fn get_slider(&self, title: &str) -> Option<f32> {
        self.read_payload(title, |payload| match payload {
            ControlPayload::Slider { value, .. } => Some(*value),
            _ => None,
        })
    }

    /// Sets a slider value, clamped to its range.
    pub fn set_slider(&self, title: &str, value: f32) -> PlatformResult<()> {
        self.write_payload(title, ControlKind::Slider, |payload| {
            if let ControlPayload::Slider {
                min,
                max,
                value: current,
                ..
            } = payload
            {
                *current = slider::clamp_value(value, *min, *max);
            }
        })
    }

    pub fn get_edit(&self, title: &str) -> Option<String> {
        self.read_payload(title, |payload| match payload {
            ControlPayload::Edit { text, .. } => Some(text.clone()),
            _ => None,
        })
    }

    pub fn set_edit(&self, title: &str, text: &str) -> PlatformResult<()> {
        self.write_payload(title, ControlKind::Edit, |payload| {
            if let ControlPayload::Edit { text: current, .. } = payload {
                *current = text.to_string();
            }
        })
    }

    /// Selected index of a combo box; the inner `None` means no selection.
    pub fn get_combo(&self, title: &str) -> Option<Option<usize>> {
        self.read_payload(title, |payload| match payload {
            ControlPayload::ComboBox(choice) => Some(choice.index),
            _ => None,
        })
    }

    pub fn set_combo(&self, title: &str, index: Option<usize>) -> PlatformResult<()> {
        self.write_payload(title, ControlKind::ComboBox, |payload| {
            if let ControlPayload::ComboBox(choice) = payload {
                select_index(choice, index);
            }
        })
    }

    /// Selected index of a list box; the inner `None` means no selection.
    pub fn get_list(&self, title: &str) -> Option<Option<usize>> {
        self.read_payload(title, |payload| match payload {
            ControlPayload::ListBox(choice) => Some(choice.index),
            _ => None,
        })
    }

    pub fn set_list(&self, title: &str, index: Option<usize>) -> PlatformResult<()> {
        self.write_payload(title, ControlKind::ListBox, |payload| {
            if let ControlPayload::ListBox(choice) = payload {
                select_index(choice, index);
            }
        })
    }

    pub fn get_spin(&self, title: &str) -> Option<i32> {
        self.read_payload(title, |payload| match payload {
            ControlPayload::Spin { value, .. } => Some(*value),
            _ => None,
        })
    }

    /// Sets a spin value, clamped to its range.
    pub fn set_spin(&self, title: &str, value: i32) -> PlatformResult<()> {
        self.write_payload(title, ControlKind::Spin, |payload| {
            if let ControlPayload::Spin {
                min,
                max,
                value: current,
            } = payload
            {
                let (lo, hi) = if *min <= *max { (*min, *max) } else { (*max, *min) };
                *current = value.clamp(lo, hi);
            }
        })
    }

    /// Items of a combo or list box.
    pub fn get_items(&self, title: &str) -> Option<Vec<String>> {
        self.read_payload(title, |payload| match payload {
            ControlPayload::ComboBox(choice) | ControlPayload::ListBox(choice) => {
                Some(choice.items.clone())
            }
            _ => None,
        })
    }

    /*
     * Replaces the items of a combo or list box. The selection is kept when it
     * is still in range and cleared otherwise.
     */
    pub fn set_items(&self, title: &str, items: &[&str]) -> PlatformResult<()> {
        let (mut state, mut surface) = self.lock()?;
        let control = state
            .registry
            .find_mut(title)
            .ok_or_else(|| not_found(title))?;
        let handle = control.native.handle;
        let (choice, style) = match &mut control.payload {
            ControlPayload::ComboBox(choice) => (choice, ChoiceStyle::Combo),
            ControlPayload::ListBox(choice) => (choice, ChoiceStyle::List),
            _ => {
                log::warn!("Dialog: '{title}' has no item list");
                return Err(PlatformError::OperationFailed(format!(
                    "control '{title}' is not a combo or list box"
                )));
            }
        };
        choice.items = items.iter().map(|s| s.to_string()).collect();
        choice.index = choice.index.filter(|&i| i < choice.items.len());
        if let Some(handle) = handle {
            surface.set_items(handle, style, &choice.items);
            surface.set_selection(handle, style, choice.index);
        }
        Ok(())
    }

    /*
     * Changes the visible text of any control: the label of check and radio
     * buttons, the text of buttons, labels, groups, links and edits.
     * Sliders, spins and choice boxes have no text of their own.
     */
    pub fn set_text(&self, title: &str, text: &str) -> PlatformResult<()> {
        let (mut state, mut surface) = self.lock()?;
        set_control_text(&mut state, surface.as_mut(), title, text)
    }
}

fn set_control_text(
    state: &mut DialogState,
    surface: &mut dyn ControlSurface,
    title: &str,
    text: &str,
) -> PlatformResult<()> {
    let control = state
        .registry
        .find_mut(title)
        .ok_or_else(|| not_found(title))?;
    let slot = match &mut control.payload {
        ControlPayload::CheckBox { label, .. } | ControlPayload::RadioButton { label, .. } => label,
        ControlPayload::Edit { text, .. }
        | ControlPayload::Button { text, .. }
        | ControlPayload::Group { text }
        | ControlPayload::Static { text }
        | ControlPayload::Hyperlink { text, .. } => text,
        other => {
            log::warn!("Dialog: '{title}' ({:?}) has no text", other.kind());
            return Err(PlatformError::OperationFailed(format!(
                "control '{title}' has no text"
            )));
        }
    };
    *slot = text.to_string();
    if let Some(handle) = control.native.handle {
        surface.set_text(handle, text);
        if control.kind() == ControlKind::Hyperlink {
            surface.redraw(handle);
        }
    }
    Ok(())
}

fn select_index(choice: &mut Choice, index: Option<usize>) {
    choice.index = match index {
        Some(i) if i < choice.items.len() => Some(i),
        Some(i) => {
            log::warn!("Dialog: index {i} out of range for {} items", choice.items.len());
            choice.index
        }
        None => None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{EventLog, RecordingSurface};
    use crate::types::{ControlId, Frame, RouteOutcome};

    fn all_kinds_dialog() -> (Dialog, RecordingSurface) {
        let surface = RecordingSurface::new();
        let dialog = Dialog::with_surface(Box::new(surface.clone()));
        dialog.add_checkbox("Show", Frame::default(), "Show", true).unwrap();
        dialog.add_radio_group().unwrap();
        dialog.add_radio_button("Low", Frame::default(), "Low", true).unwrap();
        dialog.add_radio_button("High", Frame::default(), "High", false).unwrap();
        dialog
            .add_slider("Alpha", Frame::default(), 0.0, 1.0, 0.5, true, 0.1)
            .unwrap();
        dialog.add_edit("Name", Frame::default(), "", false).unwrap();
        dialog
            .add_combo("Mode", Frame::default(), &["A", "B", "C"], None)
            .unwrap();
        dialog.add_list("Pick", Frame::default(), &["X", "Y"], Some(0)).unwrap();
        dialog.add_spin("Count", Frame::default(), 0, 10, 5).unwrap();
        (dialog, surface)
    }

    #[test]
    fn every_getter_returns_what_its_setter_stored() {
        // Arrange
        let (dialog, _surface) = all_kinds_dialog();

        // Act
        dialog.set_checkbox("Show", false).unwrap();
        dialog.set_radio("High", true).unwrap();
        dialog.set_slider("Alpha", 0.25).unwrap();
        dialog.set_edit("Name", "Ada").unwrap();
        dialog.set_combo("Mode", Some(2)).unwrap();
        dialog.set_list("Pick", Some(1)).unwrap();
        dialog.set_spin("Count", 8).unwrap();

        // Assert
        assert_eq!(dialog.get_checkbox("Show"), Some(false));
        assert_eq!(dialog.get_radio("High"), Some(true));
        assert_eq!(dialog.get_radio("Low"), Some(false));
        assert_eq!(dialog.get_slider("Alpha"), Some(0.25));
        assert_eq!(dialog.get_edit("Name").as_deref(), Some("Ada"));
        assert_eq!(dialog.get_combo("Mode"), Some(Some(2)));
        assert_eq!(dialog.get_list("Pick"), Some(Some(1)));
        assert_eq!(dialog.get_spin("Count"), Some(8));
    }

    #[test]
    fn setters_update_live_controls_without_notifying() {
        let (dialog, surface) = all_kinds_dialog();
        let events = EventLog::attach(&dialog);
        dialog.open("Test").unwrap();

        dialog.set_checkbox("Show", false).unwrap();
        dialog.set_slider("Alpha", 0.3).unwrap();
        dialog.set_edit("Name", "Ada").unwrap();

        assert_eq!(surface.native_checked(ControlId::new(1000)), Some(false));
        assert_eq!(surface.native_slider_position(ControlId::new(1003)), Some(30));
        assert_eq!(surface.native_text(ControlId::new(1004)).as_deref(), Some("Ada"));
        assert_eq!(surface.echo_outcomes(), vec![RouteOutcome::Suppressed]);
        assert!(events.take().is_empty());
    }

    #[test]
    fn slider_and_spin_setters_clamp() {
        let (dialog, _surface) = all_kinds_dialog();
        dialog.set_slider("Alpha", 4.0).unwrap();
        dialog.set_spin("Count", -3).unwrap();
        assert_eq!(dialog.get_slider("Alpha"), Some(1.0));
        assert_eq!(dialog.get_spin("Count"), Some(0));
    }

    #[test]
    fn misses_and_wrong_kinds_change_nothing() {
        let (dialog, _surface) = all_kinds_dialog();

        let missing = dialog.set_checkbox("Nope", true);
        let wrong_kind = dialog.set_checkbox("Alpha", true);

        assert!(matches!(missing, Err(PlatformError::ControlNotFound(_))));
        assert!(matches!(wrong_kind, Err(PlatformError::OperationFailed(_))));
        assert_eq!(dialog.get_checkbox("Nope"), None);
        assert_eq!(dialog.get_checkbox("Alpha"), None);
        assert_eq!(dialog.get_slider("Alpha"), Some(0.5));
    }

    #[test]
    fn out_of_range_choice_index_is_ignored() {
        let (dialog, _surface) = all_kinds_dialog();
        dialog.set_combo("Mode", Some(1)).unwrap();
        dialog.set_combo("Mode", Some(9)).unwrap();
        assert_eq!(dialog.get_combo("Mode"), Some(Some(1)));
    }

    #[test]
    fn set_items_replaces_native_items_and_trims_selection() {
        let (dialog, surface) = all_kinds_dialog();
        dialog.set_list("Pick", Some(1)).unwrap();
        dialog.open("Test").unwrap();

        dialog.set_items("Pick", &["Only"]).unwrap();

        assert_eq!(dialog.get_items("Pick"), Some(vec!["Only".to_string()]));
        assert_eq!(dialog.get_list("Pick"), Some(None));
        assert_eq!(
            surface.native_items(ControlId::new(1006)),
            Some(vec!["Only".to_string()])
        );
    }

    #[test]
    fn set_text_changes_labels() {
        let (dialog, surface) = all_kinds_dialog();
        dialog.open("Test").unwrap();

        dialog.set_text("Show", "Show grid").unwrap();

        assert_eq!(
            dialog.control_payload("Show"),
            Some(ControlPayload::CheckBox {
                label: "Show grid".into(),
                checked: true
            })
        );
        assert_eq!(
            surface.native_text(ControlId::new(1000)).as_deref(),
            Some("Show grid")
        );
        assert!(dialog.set_text("Count", "x").is_err());
    }
}
