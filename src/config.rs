/*
 * Dialog-wide configuration collected by the `set_*` calls before `open`.
 * The surface reads it when creating the window; the persistence layer reads
 * the data folder when resolving relative profile names.
 */
use crate::styling_primitives::{DialogColors, FontDescription};
use crate::types::{Frame, SliderMode};

use std::path::PathBuf;

const DEFAULT_FRAME: Frame = Frame::new(100, 100, 400, 300);
const DATA_FOLDER_NAME: &str = "data";

#[derive(Debug, Clone, PartialEq)]
pub struct DialogConfig {
    pub title: String,
    pub frame: Frame,
    pub font: Option<FontDescription>,
    pub slider_mode: SliderMode,
    pub theme_enabled: bool,
    pub colors: Option<DialogColors>,
    pub icon_path: Option<PathBuf>,
    pub data_folder: Option<PathBuf>,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            frame: DEFAULT_FRAME,
            font: None,
            slider_mode: SliderMode::default(),
            theme_enabled: true,
            colors: None,
            icon_path: None,
            data_folder: None,
        }
    }
}

impl DialogConfig {
    /*
     * Folder used for relative profile names: the configured one, or a `data`
     * folder next to the running executable. Falls back to `./data` when the
     * executable path cannot be determined.
     */
    pub fn resolved_data_folder(&self) -> PathBuf {
        if let Some(folder) = &self.data_folder {
            return folder.clone();
        }
        match std::env::current_exe() {
            Ok(exe) => exe
                .parent()
                .map(|dir| dir.join(DATA_FOLDER_NAME))
                .unwrap_or_else(|| PathBuf::from(DATA_FOLDER_NAME)),
            Err(err) => {
                log::warn!("DialogConfig: current_exe unavailable ({err}); using ./{DATA_FOLDER_NAME}");
                PathBuf::from(DATA_FOLDER_NAME)
            }
        }
    }
}
