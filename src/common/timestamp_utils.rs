use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};

// Format a local timestamp with a strftime pattern
pub fn format_timestamp(at: &DateTime<Local>, format_str: &str) -> String {
    at.format(format_str).to_string()
}

/// False when chrono cannot render `format_str`; formatting such a pattern panics.
pub fn is_valid_format(format_str: &str) -> bool {
    !StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error))
}
