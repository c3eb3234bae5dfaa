/*
 * Control registry with explicit snapshots.
 *
 * `current` is the live list of controls, in insertion order (which is also
 * creation and z-order). `pristine` holds the values captured when the dialog
 * was first opened (target of Reset) and `previous` the values captured at the
 * most recent open (target of Restore). Snapshots hold payloads only, stored
 * positionally, so native handles are never copied between versions.
 */
use crate::control::{Control, ControlPayload};
use crate::types::ControlId;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    values: Vec<ControlPayload>,
}

impl Snapshot {
    fn capture(controls: &[Control]) -> Self {
        Self {
            values: controls.iter().map(|c| c.payload.clone()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ControlPayload> {
        self.values.get(position)
    }

    fn apply_to(&self, controls: &mut [Control]) {
        for (control, value) in controls.iter_mut().zip(&self.values) {
            control.payload = value.clone();
        }
    }
}

#[derive(Debug, Default)]
pub struct ControlRegistry {
    current: Vec<Control>,
    pristine: Option<Snapshot>,
    previous: Option<Snapshot>,
    radio_group: u32,
    next_radio_is_first: bool,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &[Control] {
        &self.current
    }

    pub fn pristine(&self) -> Option<&Snapshot> {
        self.pristine.as_ref()
    }

    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    pub(crate) fn controls_mut(&mut self) -> &mut [Control] {
        &mut self.current
    }

    pub(crate) fn push(&mut self, control: Control) {
        self.current.push(control);
    }

    pub(crate) fn begin_radio_group(&mut self) -> u32 {
        self.radio_group += 1;
        self.next_radio_is_first = true;
        self.radio_group
    }

    /// Returns the group for the next radio button and whether it starts that group.
    pub(crate) fn take_radio_slot(&mut self) -> (u32, bool) {
        let first = std::mem::take(&mut self.next_radio_is_first);
        (self.radio_group, first)
    }

    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.current.iter().position(|c| c.title == title)
    }

    pub fn find(&self, title: &str) -> Option<&Control> {
        self.current.iter().find(|c| c.title == title)
    }

    pub(crate) fn find_mut(&mut self, title: &str) -> Option<&mut Control> {
        self.current.iter_mut().find(|c| c.title == title)
    }

    pub(crate) fn position_of_id(&self, id: ControlId) -> Option<usize> {
        let position = id.position()?;
        let control = self.current.get(position)?;
        (control.native.id == Some(id)).then_some(position)
    }

    pub(crate) fn get(&self, position: usize) -> Option<&Control> {
        self.current.get(position)
    }

    pub(crate) fn get_mut(&mut self, position: usize) -> Option<&mut Control> {
        self.current.get_mut(position)
    }

    /// Positions of every radio button in `group`, in insertion order.
    pub(crate) fn radio_group_members(&self, group: u32) -> Vec<usize> {
        self.current
            .iter()
            .enumerate()
            .filter_map(|(i, c)| match c.payload {
                ControlPayload::RadioButton { group: g, .. } if g == group => Some(i),
                _ => None,
            })
            .collect()
    }

    /*
     * Called at the start of every open. `previous` always becomes the current
     * values; `pristine` is captured once and later only extended with the
     * values of controls added since, keeping all three positionally aligned.
     */
    pub(crate) fn capture_on_open(&mut self) {
        self.previous = Some(Snapshot::capture(&self.current));
        match &mut self.pristine {
            None => self.pristine = Some(Snapshot::capture(&self.current)),
            Some(pristine) => {
                let known = pristine.values.len();
                pristine.values.extend(
                    self.current
                        .iter()
                        .skip(known)
                        .map(|c| c.payload.clone()),
                );
            }
        }
    }

    /// Copies the pristine values into the current controls. Returns false if never opened.
    pub(crate) fn reset(&mut self) -> bool {
        match &self.pristine {
            Some(snapshot) => {
                snapshot.apply_to(&mut self.current);
                true
            }
            None => false,
        }
    }

    /// Copies the values captured at the most recent open. Returns false if never opened.
    pub(crate) fn restore(&mut self) -> bool {
        match &self.previous {
            Some(snapshot) => {
                snapshot.apply_to(&mut self.current);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear_native(&mut self) {
        for control in &mut self.current {
            control.clear_native();
        }
    }
}
