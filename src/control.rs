/*
 * The control record model. Each dialog element is a `Control`: the fields
 * every kind shares (title, section, geometry, flags, native binding) plus a
 * `ControlPayload` variant holding only the data that kind needs. The payload
 * is also the unit captured by snapshots, persisted to INI files and pushed to
 * live controls on refresh.
 */
use crate::slider;
use crate::styling_primitives::Color;
use crate::types::{ControlEvent, ControlId, Frame, NativeHandle};

use std::path::PathBuf;

/// Discriminant of a control, used for dispatch and as the default persistence section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    CheckBox,
    RadioButton,
    Slider,
    Edit,
    ComboBox,
    ListBox,
    Spin,
    Button,
    Group,
    Static,
    Hyperlink,
}

impl ControlKind {
    /// Section name used in profile files when the control has no explicit section.
    pub fn section_name(self) -> &'static str {
        match self {
            ControlKind::CheckBox => "Checkbox",
            ControlKind::RadioButton => "Radio",
            ControlKind::Slider => "Slider",
            ControlKind::Edit => "Edit",
            ControlKind::ComboBox => "Combo",
            ControlKind::ListBox => "List",
            ControlKind::Spin => "Spin",
            ControlKind::Button => "Button",
            ControlKind::Group => "Group",
            ControlKind::Static => "Static",
            ControlKind::Hyperlink => "Hyperlink",
        }
    }

    /// Cosmetic kinds carry no user state: they are never persisted or reported by `get_controls`.
    pub fn is_cosmetic(self) -> bool {
        matches!(
            self,
            ControlKind::Button | ControlKind::Group | ControlKind::Static | ControlKind::Hyperlink
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Choice {
    pub items: Vec<String>,
    pub index: Option<usize>,
}

impl Choice {
    pub fn selected_text(&self) -> &str {
        self.index
            .and_then(|i| self.items.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub(crate) fn reported_index(&self) -> i32 {
        self.index.map(|i| i as i32).unwrap_or(-1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonAppearance {
    Standard,
    Colored { background: Color, text: Color },
    Picture { bitmap_path: PathBuf },
}

impl ButtonAppearance {
    pub fn is_owner_drawn(&self) -> bool {
        !matches!(self, ButtonAppearance::Standard)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlPayload {
    CheckBox {
        label: String,
        checked: bool,
    },
    RadioButton {
        label: String,
        group: u32,
        first: bool,
        selected: bool,
    },
    Slider {
        min: f32,
        max: f32,
        value: f32,
        tick: f32,
        show_value: bool,
    },
    Edit {
        text: String,
        multiline: bool,
    },
    ComboBox(Choice),
    ListBox(Choice),
    Spin {
        min: i32,
        max: i32,
        value: i32,
    },
    Button {
        text: String,
        appearance: ButtonAppearance,
    },
    Group {
        text: String,
    },
    Static {
        text: String,
    },
    Hyperlink {
        text: String,
        action: String,
    },
}

impl ControlPayload {
    pub fn kind(&self) -> ControlKind {
        match self {
            ControlPayload::CheckBox { .. } => ControlKind::CheckBox,
            ControlPayload::RadioButton { .. } => ControlKind::RadioButton,
            ControlPayload::Slider { .. } => ControlKind::Slider,
            ControlPayload::Edit { .. } => ControlKind::Edit,
            ControlPayload::ComboBox(_) => ControlKind::ComboBox,
            ControlPayload::ListBox(_) => ControlKind::ListBox,
            ControlPayload::Spin { .. } => ControlKind::Spin,
            ControlPayload::Button { .. } => ControlKind::Button,
            ControlPayload::Group { .. } => ControlKind::Group,
            ControlPayload::Static { .. } => ControlKind::Static,
            ControlPayload::Hyperlink { .. } => ControlKind::Hyperlink,
        }
    }
}

/// Native objects backing a control while the dialog window exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NativeBinding {
    pub id: Option<ControlId>,
    pub handle: Option<NativeHandle>,
    // Slider value label or spin buddy.
    pub companion: Option<NativeHandle>,
    // Picture button image.
    pub bitmap: Option<NativeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub(crate) title: String,
    pub(crate) section: Option<String>,
    pub(crate) frame: Frame,
    pub(crate) enabled: bool,
    pub(crate) themed: bool,
    pub(crate) extra_style: u32,
    pub(crate) payload: ControlPayload,
    pub(crate) native: NativeBinding,
}

impl Control {
    pub(crate) fn new(title: impl Into<String>, frame: Frame, payload: ControlPayload) -> Self {
        Self {
            title: title.into(),
            section: None,
            frame,
            enabled: true,
            themed: true,
            extra_style: 0,
            payload,
            native: NativeBinding::default(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> ControlKind {
        self.payload.kind()
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_themed(&self) -> bool {
        self.themed
    }

    pub fn extra_style(&self) -> u32 {
        self.extra_style
    }

    pub fn payload(&self) -> &ControlPayload {
        &self.payload
    }

    pub fn native(&self) -> NativeBinding {
        self.native
    }

    /// Persistence section: the explicit one, or the kind's default name.
    pub fn section(&self) -> &str {
        self.section
            .as_deref()
            .unwrap_or_else(|| self.kind().section_name())
    }

    pub(crate) fn clear_native(&mut self) {
        self.native = NativeBinding::default();
    }

    /*
     * The `(title, text, value)` notification describing the control's current
     * state. Cosmetic kinds still produce an event (buttons and links report
     * clicks this way) even though `get_controls` skips them.
     */
    pub(crate) fn current_event(&self) -> ControlEvent {
        let (text, value) = match &self.payload {
            ControlPayload::CheckBox { checked, .. } => (String::new(), *checked as i32),
            ControlPayload::RadioButton { selected, .. } => (String::new(), *selected as i32),
            ControlPayload::Slider { value, .. } => (String::new(), slider::reported_value(*value)),
            ControlPayload::Edit { text, .. } => (text.clone(), 0),
            ControlPayload::ComboBox(choice) | ControlPayload::ListBox(choice) => {
                (choice.selected_text().to_string(), choice.reported_index())
            }
            ControlPayload::Spin { value, .. } => (String::new(), *value),
            ControlPayload::Button { text, .. } => (text.clone(), 1),
            ControlPayload::Hyperlink { action, .. } => (action.clone(), 1),
            ControlPayload::Group { text } | ControlPayload::Static { text } => (text.clone(), 0),
        };
        ControlEvent {
            title: self.title.clone(),
            text,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider(value: f32) -> Control {
        Control::new(
            "Alpha",
            Frame::new(0, 0, 100, 20),
            ControlPayload::Slider {
                min: 0.0,
                max: 1.0,
                value,
                tick: 0.1,
                show_value: true,
            },
        )
    }

    #[test]
    fn section_defaults_to_kind_name() {
        let mut control = slider(0.5);
        assert_eq!(control.section(), "Slider");
        control.section = Some("Render".to_string());
        assert_eq!(control.section(), "Render");
    }

    #[test]
    fn slider_event_reports_value_times_one_hundred() {
        let event = slider(0.75).current_event();
        assert_eq!(event, ControlEvent::new("Alpha", "", 75));
    }

    #[test]
    fn choice_event_carries_selected_text_and_index() {
        let control = Control::new(
            "Mode",
            Frame::default(),
            ControlPayload::ComboBox(Choice {
                items: vec!["Low".into(), "High".into()],
                index: Some(1),
            }),
        );
        assert_eq!(control.current_event(), ControlEvent::new("Mode", "High", 1));
    }

    #[test]
    fn empty_choice_reports_minus_one() {
        let choice = Choice::default();
        assert_eq!(choice.selected_text(), "");
        assert_eq!(choice.reported_index(), -1);
    }

    #[test]
    fn cosmetic_kinds() {
        assert!(ControlKind::Button.is_cosmetic());
        assert!(ControlKind::Hyperlink.is_cosmetic());
        assert!(!ControlKind::Spin.is_cosmetic());
        assert!(!ControlKind::ListBox.is_cosmetic());
    }
}
