use crate::common::timestamp_utils;
use crate::errors::AppError;
use chrono::{DateTime, Local};
use log::debug;
use std::path::{Path, PathBuf};

/// Builds `<prefix>_<timestamp>_<NNNN>.jpg`, with the sequence zero-padded to four digits.
pub fn generate_photo_filename(
    prefix: &str,           // e.g., "photo"
    timestamp_format: &str, // from config, e.g., "%Y%m%d_%H%M%S"
    at: &DateTime<Local>,
    sequence: u32,
) -> String {
    let timestamp = timestamp_utils::format_timestamp(at, timestamp_format);
    format!("{}_{}_{:04}.jpg", prefix, timestamp, sequence)
}

pub fn ensure_output_directory(dir_path: &Path) -> Result<PathBuf, AppError> {
    if !dir_path.exists() {
        debug!("Output directory '{}' does not exist, attempting to create it.", dir_path.display());
        std::fs::create_dir_all(dir_path).map_err(|e| AppError::FileWrite {
            path: dir_path.to_path_buf(),
            details: format!("failed to create output directory: {}", e),
        })?;
    } else if !dir_path.is_dir() {
        return Err(AppError::FileWrite {
            path: dir_path.to_path_buf(),
            details: "output path exists but is not a directory".to_string(),
        });
    }
    Ok(dir_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn filename_pads_sequence_to_four_digits() {
        let at = Local.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(
            generate_photo_filename("photo", "%Y%m%d_%H%M%S", &at, 7),
            "photo_20240305_070809_0007.jpg"
        );
        assert_eq!(
            generate_photo_filename("photo", "%Y%m%d_%H%M%S", &at, 12345),
            "photo_20240305_070809_12345.jpg"
        );
    }

    #[test]
    fn creates_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        let created = ensure_output_directory(&nested).unwrap();
        assert!(created.is_dir());
        // Second call is a no-op.
        ensure_output_directory(&nested).unwrap();
    }

    #[test]
    fn rejects_file_in_place_of_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("not_a_dir");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(ensure_output_directory(&file), Err(AppError::FileWrite { .. })));
    }
}
