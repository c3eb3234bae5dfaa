/*
 * Moving values between the control model, the live native controls and the
 * host: `refresh` pushes the model outward, `get_controls` reports it to the
 * host, `reset` and `restore` swap in snapshot values and refresh.
 */
use crate::control::{ButtonAppearance, Control, ControlPayload};
use crate::dialog::{Dialog, DialogState};
use crate::error::Result as PlatformResult;
use crate::slider::{self, SliderScale};
use crate::surface::{ChoiceStyle, ControlSurface, OwnerDrawSpec};

/// Pushes one control's model value to its live native control, if any.
pub(crate) fn refresh_control(control: &Control, surface: &mut dyn ControlSurface) {
    let Some(handle) = control.native.handle else {
        return;
    };
    match &control.payload {
        ControlPayload::CheckBox { label, checked } => {
            surface.set_text(handle, label);
            surface.set_checked(handle, *checked);
        }
        ControlPayload::RadioButton {
            label, selected, ..
        } => {
            surface.set_text(handle, label);
            surface.set_checked(handle, *selected);
        }
        ControlPayload::Slider {
            min,
            max,
            value,
            show_value,
            ..
        } => {
            let scale = SliderScale::for_range(*min, *max);
            surface.set_slider_position(handle, scale.to_native(*value));
            if *show_value && let Some(label) = control.native.companion {
                surface.set_text(label, &slider::format_value(*value, *min, *max));
            }
        }
        ControlPayload::Edit { text, .. } => surface.set_text(handle, text),
        // Items first: replacing them clears the native selection.
        ControlPayload::ComboBox(choice) => {
            surface.set_items(handle, ChoiceStyle::Combo, &choice.items);
            surface.set_selection(handle, ChoiceStyle::Combo, choice.index);
        }
        ControlPayload::ListBox(choice) => {
            surface.set_items(handle, ChoiceStyle::List, &choice.items);
            surface.set_selection(handle, ChoiceStyle::List, choice.index);
        }
        ControlPayload::Spin { value, .. } => {
            surface.set_spin_position(handle, *value);
            if let Some(buddy) = control.native.companion {
                surface.set_text(buddy, &value.to_string());
            }
        }
        ControlPayload::Button { text, appearance } => {
            surface.set_text(handle, text);
            if appearance.is_owner_drawn() {
                surface.redraw(handle);
            }
        }
        ControlPayload::Group { text } | ControlPayload::Static { text } => {
            surface.set_text(handle, text)
        }
        ControlPayload::Hyperlink { text, .. } => {
            surface.set_text(handle, text);
            surface.redraw(handle);
        }
    }
}

/// Pushes every model value outward. No-op on the native side while closed.
pub(crate) fn refresh_all(state: &DialogState, surface: &mut dyn ControlSurface) {
    if state.window.is_none() {
        return;
    }
    for control in state.registry.current() {
        refresh_control(control, surface);
    }
}

/// How an owner-drawn control should be painted.
pub(crate) fn owner_draw_spec(control: &Control) -> Option<OwnerDrawSpec> {
    match &control.payload {
        ControlPayload::Hyperlink { text, .. } => Some(OwnerDrawSpec::Hyperlink { text: text.clone() }),
        ControlPayload::Button { text, appearance } => match appearance {
            ButtonAppearance::Standard => None,
            ButtonAppearance::Colored {
                background,
                text: text_color,
            } => Some(OwnerDrawSpec::ColoredButton {
                text: text.clone(),
                background: *background,
                text_color: *text_color,
            }),
            ButtonAppearance::Picture { .. } => Some(OwnerDrawSpec::PictureButton {
                text: text.clone(),
                bitmap: control.native.bitmap,
            }),
        },
        _ => None,
    }
}

impl Dialog {
    /*
     * Notifies the host once per stateful control with its current value, in
     * insertion order. Cosmetic controls (buttons, labels, groups, links) are
     * skipped.
     */
    pub fn get_controls(&self) {
        let events = self
            .with_state(|state| {
                state
                    .registry
                    .current()
                    .iter()
                    .filter(|c| !c.kind().is_cosmetic())
                    .map(Control::current_event)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        log::debug!("Dialog: get_controls reporting {} controls", events.len());
        self.emit(events);
    }

    /// Pushes every in-memory value to the live controls.
    pub fn refresh(&self) -> PlatformResult<()> {
        let (state, mut surface) = self.lock()?;
        refresh_all(&state, surface.as_mut());
        Ok(())
    }

    /// Returns every control to the values it had when the dialog was first opened.
    pub fn reset(&self) -> PlatformResult<()> {
        let (mut state, mut surface) = self.lock()?;
        if !state.registry.reset() {
            log::debug!("Dialog: reset before first open; nothing to do");
            return Ok(());
        }
        refresh_all(&state, surface.as_mut());
        Ok(())
    }

    /// Returns every control to the values it had when the dialog was last opened.
    pub fn restore(&self) -> PlatformResult<()> {
        let (mut state, mut surface) = self.lock()?;
        if !state.registry.restore() {
            log::debug!("Dialog: restore before first open; nothing to do");
            return Ok(());
        }
        refresh_all(&state, surface.as_mut());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styling_primitives::Color;
    use crate::test_support::{EventLog, RecordingSurface};
    use crate::types::{ControlEvent, ControlId, Frame, Notification};

    fn settings_dialog() -> (Dialog, RecordingSurface, EventLog) {
        let surface = RecordingSurface::new();
        let dialog = Dialog::with_surface(Box::new(surface.clone()));
        let events = EventLog::attach(&dialog);
        dialog
            .add_checkbox("Show", Frame::default(), "Show", true)
            .unwrap();
        dialog
            .add_slider("Alpha", Frame::default(), 0.0, 1.0, 0.5, true, 0.1)
            .unwrap();
        dialog.add_text("Caption", Frame::default(), "Settings").unwrap();
        dialog
            .add_combo("Mode", Frame::default(), &["Low", "High"], Some(1))
            .unwrap();
        dialog.add_spin("Count", Frame::default(), 0, 10, 3).unwrap();
        (dialog, surface, events)
    }

    #[test]
    fn get_controls_skips_cosmetic_kinds() {
        let (dialog, _surface, events) = settings_dialog();

        dialog.get_controls();

        assert_eq!(
            events.take(),
            vec![
                ControlEvent::new("Show", "", 1),
                ControlEvent::new("Alpha", "", 50),
                ControlEvent::new("Mode", "High", 1),
                ControlEvent::new("Count", "", 3),
            ]
        );
    }

    #[test]
    fn refresh_pushes_model_values_to_native_controls() {
        // Arrange
        let (dialog, surface, _events) = settings_dialog();
        dialog.open("Settings").unwrap();
        surface.set_native_checked(ControlId::new(1000), false);
        surface.set_native_slider_position(ControlId::new(1001), 10);

        // Act
        dialog.refresh().unwrap();

        // Assert
        assert_eq!(surface.native_checked(ControlId::new(1000)), Some(true));
        assert_eq!(surface.native_slider_position(ControlId::new(1001)), Some(50));
        assert_eq!(
            surface.companion_text(ControlId::new(1001)).as_deref(),
            Some("0.50")
        );
        assert_eq!(surface.native_selection(ControlId::new(1003)), Some(Some(1)));
        assert_eq!(surface.native_spin_position(ControlId::new(1004)), Some(3));
    }

    #[test]
    fn refresh_while_closed_touches_nothing() {
        let (dialog, surface, _events) = settings_dialog();
        dialog.refresh().unwrap();
        assert_eq!(surface.call_count(), 0);
    }

    #[test]
    fn reset_returns_to_first_open_values() {
        // Arrange
        let (dialog, surface, _events) = settings_dialog();
        dialog.open("Settings").unwrap();
        dialog.set_checkbox("Show", false).unwrap();
        dialog.close().unwrap();
        dialog.open("Settings").unwrap();
        surface.set_native_checked(ControlId::new(1000), true);
        surface.simulate(Notification::Clicked {
            id: ControlId::new(1000),
        });
        dialog.set_slider("Alpha", 0.9).unwrap();

        // Act
        dialog.reset().unwrap();

        // Assert
        assert_eq!(dialog.get_checkbox("Show"), Some(true));
        assert_eq!(dialog.get_slider("Alpha"), Some(0.5));
        assert_eq!(surface.native_slider_position(ControlId::new(1001)), Some(50));
    }

    #[test]
    fn restore_returns_to_latest_open_values() {
        let (dialog, _surface, _events) = settings_dialog();
        dialog.open("Settings").unwrap();
        dialog.set_checkbox("Show", false).unwrap();
        dialog.close().unwrap();
        dialog.open("Settings").unwrap();
        dialog.set_checkbox("Show", true).unwrap();
        dialog.set_spin("Count", 7).unwrap();

        dialog.restore().unwrap();

        assert_eq!(dialog.get_checkbox("Show"), Some(false));
        assert_eq!(dialog.get_spin("Count"), Some(3));
    }

    #[test]
    fn reset_brings_back_replaced_items_and_labels() {
        // Arrange
        let (dialog, surface, _events) = settings_dialog();
        dialog.open("Settings").unwrap();
        dialog.set_items("Mode", &["Only"]).unwrap();
        dialog.set_text("Show", "Renamed").unwrap();

        // Act
        dialog.reset().unwrap();

        // Assert
        let mode = ControlId::new(1003);
        assert_eq!(dialog.get_items("Mode"), surface.native_items(mode));
        assert_eq!(
            surface.native_items(mode),
            Some(vec!["Low".to_string(), "High".to_string()])
        );
        assert_eq!(surface.native_selection(mode), Some(Some(1)));
        assert_eq!(surface.native_text(ControlId::new(1000)).as_deref(), Some("Show"));
    }

    #[test]
    fn restore_brings_back_list_items_from_the_latest_open() {
        let surface = RecordingSurface::new();
        let dialog = Dialog::with_surface(Box::new(surface.clone()));
        dialog
            .add_list("Files", Frame::default(), &["a.txt", "b.txt"], Some(0))
            .unwrap();
        dialog.open("Files").unwrap();
        dialog.set_items("Files", &["c.txt"]).unwrap();

        dialog.restore().unwrap();

        let files = ControlId::new(1000);
        assert_eq!(
            surface.native_items(files),
            Some(vec!["a.txt".to_string(), "b.txt".to_string()])
        );
        assert_eq!(surface.native_selection(files), Some(Some(0)));
    }

    #[test]
    fn reset_before_open_is_a_no_op() {
        let (dialog, _surface, _events) = settings_dialog();
        dialog.set_checkbox("Show", false).unwrap();
        dialog.reset().unwrap();
        assert_eq!(dialog.get_checkbox("Show"), Some(false));
    }

    #[test]
    fn owner_draw_specs_follow_button_appearance() {
        let surface = RecordingSurface::new();
        let dialog = Dialog::with_surface(Box::new(surface.clone()));
        dialog
            .add_colored_button("Go", Frame::default(), "Go", Color::new(0, 128, 0), Color::WHITE)
            .unwrap();
        dialog.add_button("Plain", Frame::default(), "Plain").unwrap();
        dialog.open("Buttons").unwrap();
        let router = dialog.router();

        assert_eq!(
            router.owner_draw_spec(ControlId::new(1000)),
            Some(OwnerDrawSpec::ColoredButton {
                text: "Go".into(),
                background: Color::new(0, 128, 0),
                text_color: Color::WHITE,
            })
        );
        assert_eq!(router.owner_draw_spec(ControlId::new(1001)), None);
    }
}
