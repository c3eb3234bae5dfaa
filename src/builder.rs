/*
 * The `add_*` builder calls. Each appends one fully specified control record
 * in call order; nothing is validated or created natively until `open`.
 * Controls added while the dialog is open are materialized at the next open.
 */
use crate::control::{ButtonAppearance, Choice, Control, ControlPayload};
use crate::dialog::Dialog;
use crate::error::Result as PlatformResult;
use crate::styling_primitives::Color;
use crate::types::Frame;

use std::path::PathBuf;

impl Dialog {
    fn push_control(&self, control: Control) -> PlatformResult<()> {
        log::trace!(
            "Dialog: adding {:?} '{}' at {:?}",
            control.kind(),
            control.title,
            control.frame
        );
        self.with_state_mut(|state| state.registry.push(control))
    }

    pub fn add_checkbox(
        &self,
        title: &str,
        frame: Frame,
        label: &str,
        checked: bool,
    ) -> PlatformResult<()> {
        self.push_control(Control::new(
            title,
            frame,
            ControlPayload::CheckBox {
                label: label.to_string(),
                checked,
            },
        ))
    }

    /// Starts a new radio group; the next `add_radio_button` begins it.
    pub fn add_radio_group(&self) -> PlatformResult<()> {
        self.with_state_mut(|state| {
            let group = state.registry.begin_radio_group();
            log::trace!("Dialog: starting radio group {group}");
        })
    }

    pub fn add_radio_button(
        &self,
        title: &str,
        frame: Frame,
        label: &str,
        selected: bool,
    ) -> PlatformResult<()> {
        self.with_state_mut(|state| {
            let (group, first) = state.registry.take_radio_slot();
            state.registry.push(Control::new(
                title,
                frame,
                ControlPayload::RadioButton {
                    label: label.to_string(),
                    group,
                    first,
                    selected,
                },
            ));
        })
    }

    /*
     * `show_value` adds a value label to the right of the trackbar. `tick` is
     * the tick-mark spacing in value units; zero or negative means no ticks.
     */
    #[allow(clippy::too_many_arguments)]
    pub fn add_slider(
        &self,
        title: &str,
        frame: Frame,
        min: f32,
        max: f32,
        value: f32,
        show_value: bool,
        tick: f32,
    ) -> PlatformResult<()> {
        self.push_control(Control::new(
            title,
            frame,
            ControlPayload::Slider {
                min,
                max,
                value,
                tick,
                show_value,
            },
        ))
    }

    pub fn add_edit(
        &self,
        title: &str,
        frame: Frame,
        text: &str,
        multiline: bool,
    ) -> PlatformResult<()> {
        self.push_control(Control::new(
            title,
            frame,
            ControlPayload::Edit {
                text: text.to_string(),
                multiline,
            },
        ))
    }

    pub fn add_combo(
        &self,
        title: &str,
        frame: Frame,
        items: &[&str],
        index: Option<usize>,
    ) -> PlatformResult<()> {
        self.push_control(Control::new(
            title,
            frame,
            ControlPayload::ComboBox(choice(items, index)),
        ))
    }

    pub fn add_list(
        &self,
        title: &str,
        frame: Frame,
        items: &[&str],
        index: Option<usize>,
    ) -> PlatformResult<()> {
        self.push_control(Control::new(
            title,
            frame,
            ControlPayload::ListBox(choice(items, index)),
        ))
    }

    pub fn add_spin(
        &self,
        title: &str,
        frame: Frame,
        min: i32,
        max: i32,
        value: i32,
    ) -> PlatformResult<()> {
        self.push_control(Control::new(
            title,
            frame,
            ControlPayload::Spin { min, max, value },
        ))
    }

    pub fn add_button(&self, title: &str, frame: Frame, text: &str) -> PlatformResult<()> {
        self.push_button(title, frame, text, ButtonAppearance::Standard)
    }

    pub fn add_colored_button(
        &self,
        title: &str,
        frame: Frame,
        text: &str,
        background: Color,
        text_color: Color,
    ) -> PlatformResult<()> {
        self.push_button(
            title,
            frame,
            text,
            ButtonAppearance::Colored {
                background,
                text: text_color,
            },
        )
    }

    /// A button painted with a bitmap loaded from `bitmap_path` when the dialog opens.
    pub fn add_picture_button(
        &self,
        title: &str,
        frame: Frame,
        text: &str,
        bitmap_path: impl Into<PathBuf>,
    ) -> PlatformResult<()> {
        self.push_button(
            title,
            frame,
            text,
            ButtonAppearance::Picture {
                bitmap_path: bitmap_path.into(),
            },
        )
    }

    fn push_button(
        &self,
        title: &str,
        frame: Frame,
        text: &str,
        appearance: ButtonAppearance,
    ) -> PlatformResult<()> {
        self.push_control(Control::new(
            title,
            frame,
            ControlPayload::Button {
                text: text.to_string(),
                appearance,
            },
        ))
    }

    pub fn add_group(&self, title: &str, frame: Frame, text: &str) -> PlatformResult<()> {
        self.push_control(Control::new(
            title,
            frame,
            ControlPayload::Group {
                text: text.to_string(),
            },
        ))
    }

    pub fn add_text(&self, title: &str, frame: Frame, text: &str) -> PlatformResult<()> {
        self.push_control(Control::new(
            title,
            frame,
            ControlPayload::Static {
                text: text.to_string(),
            },
        ))
    }

    /// `action` is handed to the shell on click when it looks like a URL, and always reported.
    pub fn add_hyperlink(
        &self,
        title: &str,
        frame: Frame,
        text: &str,
        action: &str,
    ) -> PlatformResult<()> {
        self.push_control(Control::new(
            title,
            frame,
            ControlPayload::Hyperlink {
                text: text.to_string(),
                action: action.to_string(),
            },
        ))
    }
}

fn choice(items: &[&str], index: Option<usize>) -> Choice {
    Choice {
        items: items.iter().map(|s| s.to_string()).collect(),
        index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlKind;
    use crate::test_support::RecordingSurface;

    fn new_dialog() -> Dialog {
        Dialog::with_surface(Box::new(RecordingSurface::new()))
    }

    #[test]
    fn controls_are_kept_in_call_order() {
        // Arrange
        let dialog = new_dialog();

        // Act
        dialog.add_group("Box", Frame::new(5, 5, 200, 100), "Options").unwrap();
        dialog.add_checkbox("Show", Frame::new(10, 20, 80, 20), "Show", false).unwrap();
        dialog.add_hyperlink("Site", Frame::new(10, 50, 80, 20), "Site", "https://example.org").unwrap();

        // Assert
        assert_eq!(dialog.control_titles(), vec!["Box", "Show", "Site"]);
        let kinds = dialog.with_state(|s| {
            s.registry.current().iter().map(|c| c.kind()).collect::<Vec<_>>()
        });
        assert_eq!(
            kinds,
            Some(vec![ControlKind::Group, ControlKind::CheckBox, ControlKind::Hyperlink])
        );
    }

    #[test]
    fn radio_group_marks_only_its_first_button() {
        let dialog = new_dialog();
        dialog.add_radio_group().unwrap();
        dialog.add_radio_button("A", Frame::default(), "A", true).unwrap();
        dialog.add_radio_button("B", Frame::default(), "B", false).unwrap();
        dialog.add_radio_group().unwrap();
        dialog.add_radio_button("C", Frame::default(), "C", true).unwrap();

        let slots: Vec<_> = ["A", "B", "C"]
            .iter()
            .map(|title| match dialog.control_payload(title) {
                Some(ControlPayload::RadioButton { group, first, .. }) => (group, first),
                other => panic!("unexpected payload {other:?}"),
            })
            .collect();

        assert_eq!(slots, vec![(1, true), (1, false), (2, true)]);
    }

    #[test]
    fn picture_buttons_remember_their_bitmap_path() {
        let dialog = new_dialog();
        dialog
            .add_picture_button("Logo", Frame::default(), "", "images/logo.bmp")
            .unwrap();

        assert_eq!(
            dialog.control_payload("Logo"),
            Some(ControlPayload::Button {
                text: String::new(),
                appearance: ButtonAppearance::Picture {
                    bitmap_path: PathBuf::from("images/logo.bmp"),
                },
            })
        );
    }

    #[test]
    fn controls_added_after_open_appear_at_next_open() {
        let surface = RecordingSurface::new();
        let dialog = Dialog::with_surface(Box::new(surface.clone()));
        dialog.add_checkbox("A", Frame::default(), "A", true).unwrap();
        dialog.open("Test").unwrap();

        dialog.add_spin("B", Frame::default(), 0, 5, 1).unwrap();
        dialog.close().unwrap();
        dialog.open("Test").unwrap();

        assert_eq!(surface.created_ids().len(), 3);
        assert_eq!(dialog.get_spin("B"), Some(1));
    }
}
