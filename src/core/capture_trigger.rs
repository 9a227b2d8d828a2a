use crate::app_config::ApplicationConfig;
use crate::camera::frame::{ChannelOrder, FrameBuffer};
use crate::common::file_utils;
use crate::errors::{AppError, CaptureError};
use chrono::{DateTime, Local};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Channel order the JPEG encoder consumes.
pub const STORAGE_ORDER: ChannelOrder = ChannelOrder::Rgb;

/// Output directory plus the photo counter scoped to it.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    dir: PathBuf,
    counter: u32,
}

impl OutputConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        OutputConfig { dir: dir.into(), counter: 0 }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Points at a new directory and restarts numbering at 1.
    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dir = dir.into();
        self.counter = 0;
    }

    fn next_sequence(&mut self) -> u32 {
        self.counter += 1;
        self.counter
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPhoto {
    pub path: PathBuf,
    pub sequence: u32,
    pub width: u32,
    pub height: u32,
}

/// Naming and encoding settings for saved photos.
#[derive(Debug, Clone)]
pub struct PhotoWriter {
    pub prefix: String,
    pub timestamp_format: String,
    pub jpeg_quality: u8,
}

impl Default for PhotoWriter {
    fn default() -> Self {
        PhotoWriter::from_config(&ApplicationConfig::default())
    }
}

impl PhotoWriter {
    pub fn from_config(app: &ApplicationConfig) -> Self {
        PhotoWriter {
            prefix: app.filename_prefix.clone(),
            timestamp_format: app.filename_timestamp_format.clone(),
            jpeg_quality: app.jpeg_quality,
        }
    }

    pub fn write_jpeg(&self, frame: &FrameBuffer, path: &Path) -> Result<(), AppError> {
        let write_err = |details: String| AppError::FileWrite { path: path.to_path_buf(), details };

        let pixels = frame.pixels_in(STORAGE_ORDER);
        let file = File::create(path).map_err(|e| write_err(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        let encoded = {
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality);
            encoder
                .encode(&pixels, frame.width(), frame.height(), ExtendedColorType::Rgb8)
                .map_err(|e| write_err(format!("JPEG encoding failed: {}", e)))
        };
        let encoded = encoded.and_then(|()| writer.flush().map_err(|e| write_err(e.to_string())));
        drop(writer);

        if encoded.is_err() {
            // Leave no truncated JPEG behind.
            if let Err(e) = std::fs::remove_file(path) {
                debug!("Could not remove partial file '{}': {}", path.display(), e);
            }
        }
        encoded
    }
}

/// Saves `frame` into the output directory.
///
/// The counter is advanced before the write and is not rolled back when the
/// write fails, so a retry never reuses the failed attempt's file name.
pub fn capture_frame(
    output: &mut OutputConfig,
    writer: &PhotoWriter,
    frame: Option<&FrameBuffer>,
    at: DateTime<Local>,
) -> Result<SavedPhoto, CaptureError> {
    let frame = frame.ok_or_else(|| AppError::NoFrameAvailable("no frame has been captured yet".to_string()))?;
    let save_start = Instant::now();

    let sequence = output.next_sequence();
    let filename = file_utils::generate_photo_filename(&writer.prefix, &writer.timestamp_format, &at, sequence);
    let dir = file_utils::ensure_output_directory(output.dir())?;
    let path = dir.join(filename);

    if path.exists() {
        warn!("⚠️ Overwriting existing file {}", path.display());
    }
    writer.write_jpeg(frame, &path)?;

    info!("✅ Photo #{} saved to {} in {:?}", sequence, path.display(), save_start.elapsed());
    Ok(SavedPhoto {
        path,
        sequence,
        width: frame.width(),
        height: frame.height(),
    })
}
