/*
 * Saving and loading control values as profile (INI) files. One key per
 * stateful control, named by its title, under its section. Cosmetic controls
 * are never written. Loading is a partial update: keys missing from the file
 * leave their controls untouched, and no host events are raised.
 */
use crate::control::{Control, ControlPayload};
use crate::dialog::Dialog;
use crate::dispatch;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::profile::{self, IniDocument};
use crate::slider;
use crate::state_transfer;

use std::fs;
use std::path::Path;

const SAVE_CAPTION: &str = "Save settings";
const LOAD_CAPTION: &str = "Load settings";

/// Profile text for a control's value, or `None` for controls that are not persisted.
pub(crate) fn persisted_value(control: &Control) -> Option<String> {
    match &control.payload {
        ControlPayload::CheckBox { checked, .. } => Some((*checked as i32).to_string()),
        ControlPayload::RadioButton { selected, .. } => Some((*selected as i32).to_string()),
        ControlPayload::Slider { value, .. } => Some(format!("{value:.2}")),
        ControlPayload::Edit { text, .. } => Some(profile::escape_value(text)),
        ControlPayload::ComboBox(choice) | ControlPayload::ListBox(choice) => {
            Some(choice.reported_index().to_string())
        }
        ControlPayload::Spin { value, .. } => Some(value.to_string()),
        ControlPayload::Button { .. }
        | ControlPayload::Group { .. }
        | ControlPayload::Static { .. }
        | ControlPayload::Hyperlink { .. } => None,
    }
}

/*
 * Parses `raw` into the payload. Returns false (leaving the payload as it was)
 * when the text is not a valid value for this kind of control.
 */
pub(crate) fn apply_persisted_value(payload: &mut ControlPayload, raw: &str) -> bool {
    let raw = raw.trim();
    match payload {
        ControlPayload::CheckBox { checked, .. } => match raw.parse::<i32>() {
            Ok(v) => {
                *checked = v != 0;
                true
            }
            Err(_) => false,
        },
        ControlPayload::RadioButton { selected, .. } => match raw.parse::<i32>() {
            Ok(v) => {
                *selected = v != 0;
                true
            }
            Err(_) => false,
        },
        ControlPayload::Slider {
            min, max, value, ..
        } => match raw.parse::<f32>() {
            Ok(v) if v.is_finite() => {
                *value = slider::clamp_value(v, *min, *max);
                true
            }
            _ => false,
        },
        ControlPayload::Edit { text, .. } => {
            *text = profile::unescape_value(raw);
            true
        }
        ControlPayload::ComboBox(choice) | ControlPayload::ListBox(choice) => {
            match raw.parse::<i64>() {
                Ok(v) if v < 0 => {
                    choice.index = None;
                    true
                }
                Ok(v) if (v as usize) < choice.items.len() => {
                    choice.index = Some(v as usize);
                    true
                }
                _ => false,
            }
        }
        ControlPayload::Spin { min, max, value } => match raw.parse::<i32>() {
            Ok(v) => {
                let (lo, hi) = if *min <= *max { (*min, *max) } else { (*max, *min) };
                *value = v.clamp(lo, hi);
                true
            }
            Err(_) => false,
        },
        ControlPayload::Button { .. }
        | ControlPayload::Group { .. }
        | ControlPayload::Static { .. }
        | ControlPayload::Hyperlink { .. } => false,
    }
}

fn read_document(path: &Path) -> PlatformResult<IniDocument> {
    let bytes = fs::read(path).map_err(|err| {
        log::error!("Persistence: reading {} failed: {err}", path.display());
        PlatformError::Io(err)
    })?;
    Ok(IniDocument::parse(&String::from_utf8_lossy(&bytes)))
}

impl Dialog {
    /*
     * Writes every stateful control to `name` (extension forced to `.ini`,
     * relative names placed in the data folder). Existing files are merged,
     * keeping keys that belong to no control. When the file exists and
     * `overwrite` is false the user is asked first; declining returns
     * `Ok(false)` and writes nothing.
     */
    pub fn save(&self, name: impl AsRef<Path>, overwrite: bool) -> PlatformResult<bool> {
        let (state, mut surface) = self.lock()?;
        let folder = state.config.resolved_data_folder();
        let path = profile::save_path(name.as_ref(), &folder);
        let exists = path.is_file();

        if exists && !overwrite {
            let question = format!("{} already exists.\nReplace it?", path.display());
            if !surface.confirm(state.window, SAVE_CAPTION, &question) {
                log::debug!("Persistence: overwrite of {} declined", path.display());
                return Ok(false);
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                log::error!("Persistence: creating {} failed: {err}", parent.display());
                PlatformError::Io(err)
            })?;
        }

        let mut document = if exists {
            read_document(&path)?
        } else {
            IniDocument::new()
        };
        let mut written = 0usize;
        for control in state.registry.current() {
            if let Some(value) = persisted_value(control) {
                document.set(control.section(), &control.title, &value);
                written += 1;
            }
        }

        fs::write(&path, document.to_string()).map_err(|err| {
            log::error!("Persistence: writing {} failed: {err}", path.display());
            PlatformError::Io(err)
        })?;
        log::debug!("Persistence: saved {written} values to {}", path.display());
        Ok(true)
    }

    /*
     * Reads values from `name` into the matching controls, limited to
     * `section` when given, then refreshes the live controls. The host is not
     * notified; call `get_controls` afterwards to learn the new values.
     */
    pub fn load(&self, name: impl AsRef<Path>, section: Option<&str>) -> PlatformResult<()> {
        let (mut state, mut surface) = self.lock()?;
        let folder = state.config.resolved_data_folder();
        let path = profile::load_path(name.as_ref(), &folder);

        if !profile::has_profile_extension(&path) {
            log::warn!("Persistence: refusing to load non-profile file {}", path.display());
            let message = format!("{} is not an .ini file.", path.display());
            surface.report_error(state.window, LOAD_CAPTION, &message);
            return Err(PlatformError::InvalidProfileExtension(path));
        }
        if !path.is_file() {
            log::warn!("Persistence: {} does not exist", path.display());
            let message = format!("{} was not found.", path.display());
            surface.report_error(state.window, LOAD_CAPTION, &message);
            return Err(PlatformError::ProfileNotFound(path));
        }

        let document = read_document(&path)?;
        let mut applied = 0usize;
        // (group, position) of every radio button loaded as selected, in order.
        let mut loaded_radios: Vec<(u32, usize)> = Vec::new();
        for (position, control) in state.registry.controls_mut().iter_mut().enumerate() {
            if control.kind().is_cosmetic() {
                continue;
            }
            let control_section = control.section().to_string();
            if let Some(filter) = section
                && !control_section.eq_ignore_ascii_case(filter)
            {
                continue;
            }
            let Some(raw) = document.get(&control_section, &control.title) else {
                continue;
            };
            if apply_persisted_value(&mut control.payload, raw) {
                applied += 1;
                if let ControlPayload::RadioButton {
                    group,
                    selected: true,
                    ..
                } = &control.payload
                {
                    loaded_radios.push((*group, position));
                }
            } else {
                log::warn!(
                    "Persistence: skipping unparsable value '{raw}' for '{}' in [{control_section}]",
                    control.title
                );
            }
        }
        log::debug!("Persistence: loaded {applied} values from {}", path.display());

        // At most one selected radio per group; the last one loaded wins.
        let mut settled_groups: Vec<u32> = Vec::new();
        for &(group, position) in loaded_radios.iter().rev() {
            if settled_groups.contains(&group) {
                continue;
            }
            settled_groups.push(group);
            dispatch::select_radio(&mut state, surface.as_mut(), position, group, None);
        }

        state_transfer::refresh_all(&state, surface.as_mut());
        Ok(())
    }
}
