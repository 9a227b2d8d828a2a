use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en", alias = "english")]
    English,
    #[serde(rename = "zh", alias = "chinese")]
    Chinese,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "zh" | "chinese" => Ok(Language::Chinese),
            other => Err(format!("Unsupported language '{}', expected 'en' or 'zh'", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "en"),
            Language::Chinese => write!(f, "zh"),
        }
    }
}

/// Every user-facing string shown by the preview window.
#[derive(Debug)]
pub struct Strings {
    pub app_title: &'static str,
    pub instructions: &'static str,
    pub status_waiting: &'static str,
    pub status_saved: &'static str,
    pub status_error_capture: &'static str,
    pub status_folder_set: &'static str,
    pub status_folder_failed: &'static str,
    pub status_camera_opened: &'static str,
    pub status_camera_failed: &'static str,
    pub status_frame_failed: &'static str,
}

static EN: Strings = Strings {
    app_title: "Single-Key Quick Photo Tool",
    instructions: "SPACE: capture  0-9: camera  N: new folder  ESC: exit",
    status_waiting: "Waiting for Spacebar...",
    status_saved: "Photo captured and saved to:",
    status_error_capture: "Error: Could not capture image.",
    status_folder_set: "Photos will be saved to:",
    status_folder_failed: "Error: Could not use folder:",
    status_camera_opened: "Camera opened:",
    status_camera_failed: "Could not open camera (index {index}). Please ensure it's connected and not in use by another application.",
    status_frame_failed: "Could not read a frame from camera {index}, please check it.",
};

static ZH: Strings = Strings {
    app_title: "單鍵快速拍照工具",
    // Overlay text is drawn with a Latin-only font, so it stays in English.
    instructions: "SPACE: capture  0-9: camera  N: new folder  ESC: exit",
    status_waiting: "等待按下空白鍵...",
    status_saved: "已拍照並儲存到:",
    status_error_capture: "錯誤: 無法擷取影像。",
    status_folder_set: "照片將儲存到:",
    status_folder_failed: "錯誤: 無法使用資料夾:",
    status_camera_opened: "攝影機已開啟:",
    status_camera_failed: "無法開啟攝影機 (編號 {index})。請確認攝影機已連接且未被其他程式佔用。",
    status_frame_failed: "無法從攝影機 {index} 讀取幀，請檢查。",
};

impl Language {
    pub fn strings(self) -> &'static Strings {
        match self {
            Language::English => &EN,
            Language::Chinese => &ZH,
        }
    }
}

/// Fills the `{index}` placeholder used by the camera messages.
pub fn with_index(template: &str, index: i32) -> String {
    template.replace("{index}", &index.to_string())
}
