use crate::control::ControlKind;
use log::trace;
use windows::Win32::UI::WindowsAndMessaging::{WM_CTLCOLORBTN, WM_CTLCOLORDLG, WM_CTLCOLORSTATIC};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PaintRoute {
    Dialog,
    LabelStatic,
    Button,
    Default,
}

/*
 * Decides which WM_CTLCOLOR* requests take the dialog colors. Input
 * controls keep their system colors so text stays readable; `kind` is `None`
 * for the dialog itself and for companions (value labels, spin buddies).
 */
pub(crate) fn resolve_paint_route(kind: Option<ControlKind>, msg: u32) -> PaintRoute {
    match (kind, msg) {
        (_, WM_CTLCOLORDLG) => PaintRoute::Dialog,
        (Some(ControlKind::Edit | ControlKind::ComboBox | ControlKind::ListBox), _) => {
            trace!("[Paint] {kind:?} keeps system colors");
            PaintRoute::Default
        }
        (_, WM_CTLCOLORSTATIC) => PaintRoute::LabelStatic,
        (_, WM_CTLCOLORBTN) => PaintRoute::Button,
        _ => PaintRoute::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_background_uses_dialog_route() {
        assert_eq!(resolve_paint_route(None, WM_CTLCOLORDLG), PaintRoute::Dialog);
    }

    #[test]
    fn labels_checkboxes_and_companions_route_to_label() {
        assert_eq!(
            resolve_paint_route(Some(ControlKind::Static), WM_CTLCOLORSTATIC),
            PaintRoute::LabelStatic
        );
        assert_eq!(
            resolve_paint_route(Some(ControlKind::CheckBox), WM_CTLCOLORSTATIC),
            PaintRoute::LabelStatic
        );
        assert_eq!(
            resolve_paint_route(None, WM_CTLCOLORSTATIC),
            PaintRoute::LabelStatic
        );
    }

    #[test]
    fn input_controls_keep_default_colors() {
        // A read-only or disabled edit asks with WM_CTLCOLORSTATIC.
        assert_eq!(
            resolve_paint_route(Some(ControlKind::Edit), WM_CTLCOLORSTATIC),
            PaintRoute::Default
        );
        assert_eq!(
            resolve_paint_route(Some(ControlKind::ListBox), WM_CTLCOLORSTATIC),
            PaintRoute::Default
        );
    }

    #[test]
    fn push_buttons_route_to_button() {
        assert_eq!(
            resolve_paint_route(Some(ControlKind::Button), WM_CTLCOLORBTN),
            PaintRoute::Button
        );
    }
}
