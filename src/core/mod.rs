pub mod capture_trigger;
pub mod events;
pub mod frame_pump;
pub mod session;

pub use capture_trigger::{OutputConfig, PhotoWriter, SavedPhoto};
pub use events::{EventOutcome, StatusMessage, UiEvent};
pub use session::{Session, SessionSettings, SessionStatus};
