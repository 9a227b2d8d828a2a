use crate::camera::frame::{ChannelOrder, DisplayBounds, FrameBuffer};
use crate::core::events::UiEvent;
use crate::errors::AppError;
use crate::ui::keymap::{self, KeyMap};
use crate::ui::{DisplaySink, EventSource};
use chrono::Local;
use log::{debug, warn};
use opencv::{
    core::{self as opencv_core, Point, Scalar},
    highgui, imgproc,
    prelude::*,
};
use std::path::PathBuf;

const WINDOW_NAME: &str = "camsnap-preview";

/// OpenCV highgui window showing the preview, the status in its title and a
/// one-line key help overlay.
pub struct PreviewWindow {
    bounds: DisplayBounds,
    keymap: KeyMap,
    folder_base: PathBuf,
    app_title: String,
    overlay: String,
    current_title: String,
    shown: bool,
}

impl PreviewWindow {
    pub fn create(
        app_title: &str,
        overlay: &str,
        bounds: DisplayBounds,
        keymap: KeyMap,
        folder_base: PathBuf,
    ) -> Result<Self, AppError> {
        highgui::named_window(WINDOW_NAME, highgui::WINDOW_AUTOSIZE)
            .map_err(|e| AppError::Display(format!("cannot create preview window: {}", e)))?;
        highgui::set_window_title(WINDOW_NAME, app_title)?;
        debug!("🪟 Preview window created ({}x{})", bounds.max_width, bounds.max_height);
        Ok(PreviewWindow {
            bounds,
            keymap,
            folder_base,
            app_title: app_title.to_string(),
            overlay: overlay.to_string(),
            current_title: app_title.to_string(),
            shown: false,
        })
    }

    /// Waits up to `delay_ms` for a key; this wait is the loop's tick timer.
    pub fn wait_key(&self, delay_ms: u64) -> Result<i32, AppError> {
        Ok(highgui::wait_key_ex(delay_ms.min(i32::MAX as u64) as i32)?)
    }

    /// True once the user closed the window with the title bar button.
    pub fn is_closed(&self) -> Result<bool, AppError> {
        if !self.shown {
            return Ok(false);
        }
        let visible = highgui::get_window_property(WINDOW_NAME, highgui::WND_PROP_VISIBLE)?;
        Ok(visible < 1.0)
    }

    fn blank_canvas(&self) -> Result<opencv_core::Mat, AppError> {
        Ok(opencv_core::Mat::new_rows_cols_with_default(
            self.bounds.max_height as i32,
            self.bounds.max_width as i32,
            opencv_core::CV_8UC3,
            Scalar::all(0.0),
        )?)
    }

    fn draw_overlay(&self, canvas: &mut opencv_core::Mat) -> Result<(), AppError> {
        if self.overlay.is_empty() {
            return Ok(());
        }
        let origin = Point::new(8, canvas.rows() - 10);
        imgproc::put_text(
            canvas,
            &self.overlay,
            origin,
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.45,
            Scalar::new(255.0, 255.0, 255.0, 0.0),
            1,
            imgproc::LINE_AA,
            false,
        )?;
        Ok(())
    }
}

/// Copies a frame buffer into a BGR matrix for highgui.
pub fn frame_to_mat(frame: &FrameBuffer) -> Result<opencv_core::Mat, AppError> {
    let mut mat = opencv_core::Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        opencv_core::CV_8UC3,
        Scalar::all(0.0),
    )?;
    let bgr = frame.pixels_in(ChannelOrder::Bgr);
    mat.data_bytes_mut()?.copy_from_slice(&bgr);
    Ok(mat)
}

impl DisplaySink for PreviewWindow {
    fn present(&mut self, frame: Option<&FrameBuffer>) -> Result<(), AppError> {
        let mut canvas = match frame {
            Some(frame) => frame_to_mat(frame)?,
            None => self.blank_canvas()?,
        };
        self.draw_overlay(&mut canvas)?;
        highgui::imshow(WINDOW_NAME, &canvas)?;
        self.shown = true;
        Ok(())
    }

    fn show_status(&mut self, status: &str) -> Result<(), AppError> {
        let title = format!("{} - {}", self.app_title, status);
        if title != self.current_title {
            highgui::set_window_title(WINDOW_NAME, &title)?;
            self.current_title = title;
        }
        Ok(())
    }
}

impl EventSource for PreviewWindow {
    fn next_events(&mut self, tick_ms: u64) -> Result<Vec<UiEvent>, AppError> {
        let key = self.wait_key(tick_ms)?;
        let mut events = Vec::new();
        if let Some(action) = self.keymap.action_for(key) {
            debug!("⌨️ Key {} -> {:?}", key, action);
            events.push(keymap::to_event(action, &self.folder_base, &Local::now()));
        }
        if self.is_closed()? {
            events.push(UiEvent::Quit);
        }
        Ok(events)
    }
}

impl Drop for PreviewWindow {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_window(WINDOW_NAME) {
            warn!("⚠️ Failed to destroy preview window: {}", e);
        }
    }
}
