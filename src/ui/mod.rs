pub mod i18n;
pub mod keymap;
pub mod preview_window;

use crate::camera::frame::FrameBuffer;
use crate::core::events::{StatusMessage, UiEvent};
use crate::errors::AppError;
use i18n::{with_index, Language};

/// Rendering surface for the preview.
pub trait DisplaySink {
    /// Shows `frame`, or clears the preview when there is none.
    fn present(&mut self, frame: Option<&FrameBuffer>) -> Result<(), AppError>;

    fn show_status(&mut self, status: &str) -> Result<(), AppError>;
}

/// Source of user input, polled once per tick.
pub trait EventSource {
    /// Waits up to `tick_ms` for input and returns the resulting events.
    fn next_events(&mut self, tick_ms: u64) -> Result<Vec<UiEvent>, AppError>;
}

pub fn status_text(message: &StatusMessage, language: Language) -> String {
    let strings = language.strings();
    match message {
        StatusMessage::Waiting => strings.status_waiting.to_string(),
        StatusMessage::CameraOpened(index) => format!("{} {}", strings.status_camera_opened, index),
        StatusMessage::CameraOpenFailed(index) => with_index(strings.status_camera_failed, *index),
        StatusMessage::FrameReadFailed(index) => with_index(strings.status_frame_failed, *index),
        StatusMessage::PhotoSaved(path) => format!("{} {}", strings.status_saved, path.display()),
        StatusMessage::CaptureFailed => strings.status_error_capture.to_string(),
        StatusMessage::FolderSet(path) => format!("{} {}", strings.status_folder_set, path.display()),
        StatusMessage::FolderFailed(path) => format!("{} {}", strings.status_folder_failed, path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn renders_saved_path() {
        let msg = StatusMessage::PhotoSaved(PathBuf::from("out/photo_1.jpg"));
        let text = status_text(&msg, Language::English);
        assert!(text.starts_with("Photo captured and saved to:"));
        assert!(text.ends_with("photo_1.jpg"));
    }

    #[test]
    fn renders_folder_failure() {
        let msg = StatusMessage::FolderFailed(PathBuf::from("out/blocked"));
        let text = status_text(&msg, Language::English);
        assert!(text.starts_with("Error: Could not use folder:"));
        assert!(text.ends_with("blocked"));
    }

    #[test]
    fn renders_in_chinese() {
        let text = status_text(&StatusMessage::CaptureFailed, Language::Chinese);
        assert_eq!(text, "錯誤: 無法擷取影像。");
    }
}
