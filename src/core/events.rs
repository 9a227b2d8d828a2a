use std::path::PathBuf;

/// Typed events emitted by the UI layer and consumed by `Session::handle_event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// One timer tick: pump a frame.
    Tick,
    /// Save the current frame.
    Capture,
    /// Switch to another camera index.
    SelectCamera(i32),
    /// Switch the output directory; restarts photo numbering.
    ChangeOutputDir(PathBuf),
    /// Window closed or quit key pressed.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Continue,
    Exit,
}

/// Language-neutral status line; the UI renders it with its string table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Waiting,
    CameraOpened(i32),
    CameraOpenFailed(i32),
    FrameReadFailed(i32),
    PhotoSaved(PathBuf),
    CaptureFailed,
    FolderSet(PathBuf),
    FolderFailed(PathBuf),
}
