use crate::app_config::KeyBindings;
use crate::common::timestamp_utils;
use crate::core::events::UiEvent;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

pub const ESC_KEY: i32 = 27;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Capture,
    Quit,
    SelectCamera(i32),
    NewFolder,
}

/// Maps raw key codes from the window toolkit to actions.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: KeyBindings,
}

impl KeyMap {
    pub fn new(bindings: KeyBindings) -> Self {
        KeyMap { bindings }
    }

    /// `key_code` is what `wait_key_ex` returns: -1 for no key, otherwise the
    /// toolkit key code in the low 16 bits with modifier flags above them.
    /// Non-ASCII keys (arrows, function keys) map to nothing.
    pub fn action_for(&self, key_code: i32) -> Option<KeyAction> {
        if key_code < 0 {
            return None;
        }
        let code = key_code & 0xFFFF;
        if code > 0x7F {
            return None;
        }
        if code == ESC_KEY {
            return Some(KeyAction::Quit);
        }
        let ch = char::from(code as u8);
        if let Some(digit) = ch.to_digit(10) {
            return Some(KeyAction::SelectCamera(digit as i32));
        }
        let matches = |bound: char| bound.eq_ignore_ascii_case(&ch);
        if matches(self.bindings.capture) {
            Some(KeyAction::Capture)
        } else if matches(self.bindings.quit) {
            Some(KeyAction::Quit)
        } else if matches(self.bindings.new_folder) {
            Some(KeyAction::NewFolder)
        } else {
            None
        }
    }
}

/// Fresh per-session folder under `base`, named after the local time.
pub fn new_folder_path(base: &Path, at: &DateTime<Local>) -> PathBuf {
    base.join(format!("session_{}", timestamp_utils::format_timestamp(at, "%Y%m%d_%H%M%S")))
}

/// Turns a key action into the session event it stands for.
pub fn to_event(action: KeyAction, folder_base: &Path, at: &DateTime<Local>) -> UiEvent {
    match action {
        KeyAction::Capture => UiEvent::Capture,
        KeyAction::Quit => UiEvent::Quit,
        KeyAction::SelectCamera(index) => UiEvent::SelectCamera(index),
        KeyAction::NewFolder => UiEvent::ChangeOutputDir(new_folder_path(folder_base, at)),
    }
}
