use crate::ui::i18n::Language;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApplicationConfig {
    pub output_directory: String,
    pub camera_index: i32,
    pub tick_interval_ms: u64,
    pub display_max_width: u32,
    pub display_max_height: u32,
    pub jpeg_quality: u8, // 1-100
    pub filename_prefix: String,
    pub filename_timestamp_format: String, // strftime format string
    pub log_level: Option<String>, // CLI --debug takes precedence
    pub language: Language,
    pub capture_width: Option<u32>, // Requested from the device, not guaranteed
    pub capture_height: Option<u32>,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        ApplicationConfig {
            output_directory: "./captured_photos".to_string(),
            camera_index: 0,
            tick_interval_ms: 10,
            display_max_width: 640,
            display_max_height: 480,
            jpeg_quality: 95,
            filename_prefix: "photo".to_string(),
            filename_timestamp_format: "%Y%m%d_%H%M%S".to_string(),
            log_level: Some("info".to_string()),
            language: Language::English,
            capture_width: None,
            capture_height: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    pub capture: char,
    pub quit: char,
    pub new_folder: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            capture: ' ',
            quit: 'q',
            new_folder: 'n',
        }
    }
}
