// Shared fakes for the integration tests: a capture backend that counts
// opens and releases, and a scripted window.
#![allow(dead_code)]

use camsnap::camera::{CaptureBackend, CaptureDevice, ChannelOrder, DisplayBounds, FrameBuffer, RawFrame};
use camsnap::core::{PhotoWriter, Session, SessionSettings, UiEvent};
use camsnap::errors::AppError;
use camsnap::ui::{DisplaySink, EventSource};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct Counts {
    pub open_attempts: Vec<i32>,
    pub opens: HashMap<i32, u32>,
    pub releases: HashMap<i32, u32>,
    pub reads: u32,
    pub fail_reads: bool,
}

impl Counts {
    pub fn total_opens(&self) -> u32 {
        self.opens.values().sum()
    }

    pub fn total_releases(&self) -> u32 {
        self.releases.values().sum()
    }
}

pub type SharedCounts = Rc<RefCell<Counts>>;

/// Devices exist at `available` indices and deliver a solid BGR frame.
pub struct FakeBackend {
    pub counts: SharedCounts,
    pub available: Vec<i32>,
    pub frame_size: (u32, u32),
    pub bgr: [u8; 3],
}

impl FakeBackend {
    pub fn new(available: &[i32], frame_size: (u32, u32)) -> (Self, SharedCounts) {
        let counts = SharedCounts::default();
        let backend = FakeBackend {
            counts: counts.clone(),
            available: available.to_vec(),
            frame_size,
            bgr: [0, 0, 255],
        };
        (backend, counts)
    }
}

impl CaptureBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn open(&mut self, index: i32) -> Result<Box<dyn CaptureDevice>, AppError> {
        let mut counts = self.counts.borrow_mut();
        counts.open_attempts.push(index);
        if !self.available.contains(&index) {
            return Err(AppError::CameraOpen { index, details: "no such fake device".to_string() });
        }
        *counts.opens.entry(index).or_default() += 1;
        Ok(Box::new(FakeDevice {
            index,
            counts: self.counts.clone(),
            frame_size: self.frame_size,
            bgr: self.bgr,
        }))
    }
}

pub struct FakeDevice {
    index: i32,
    counts: SharedCounts,
    frame_size: (u32, u32),
    bgr: [u8; 3],
}

impl CaptureDevice for FakeDevice {
    fn read_frame(&mut self) -> Result<RawFrame, AppError> {
        let mut counts = self.counts.borrow_mut();
        counts.reads += 1;
        if counts.fail_reads {
            return Err(AppError::FrameRead(format!("fake camera {} hiccup", self.index)));
        }
        let (w, h) = self.frame_size;
        let data = self.bgr.iter().copied().cycle().take((w * h * 3) as usize).collect();
        RawFrame::new(w, h, ChannelOrder::Bgr, data)
    }

    fn release(&mut self) -> Result<(), AppError> {
        *self.counts.borrow_mut().releases.entry(self.index).or_default() += 1;
        Ok(())
    }
}

pub fn session_with(backend: FakeBackend, output_dir: &Path) -> Session {
    let settings = SessionSettings {
        bounds: DisplayBounds::default(),
        output_dir: output_dir.to_path_buf(),
        writer: PhotoWriter::default(),
    };
    Session::new(Box::new(backend), settings)
}

pub fn jpeg_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".jpg"))
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

/// Replays one batch of events per tick, then quits.
pub struct ScriptedWindow {
    pub script: VecDeque<Vec<UiEvent>>,
    pub presented: Vec<Option<(u32, u32)>>,
    pub statuses: Vec<String>,
}

impl ScriptedWindow {
    pub fn new(script: Vec<Vec<UiEvent>>) -> Self {
        ScriptedWindow {
            script: script.into(),
            presented: Vec::new(),
            statuses: Vec::new(),
        }
    }
}

impl DisplaySink for ScriptedWindow {
    fn present(&mut self, frame: Option<&FrameBuffer>) -> Result<(), AppError> {
        self.presented.push(frame.map(|f| (f.width(), f.height())));
        Ok(())
    }

    fn show_status(&mut self, status: &str) -> Result<(), AppError> {
        self.statuses.push(status.to_string());
        Ok(())
    }
}

impl EventSource for ScriptedWindow {
    fn next_events(&mut self, _tick_ms: u64) -> Result<Vec<UiEvent>, AppError> {
        Ok(self.script.pop_front().unwrap_or_else(|| vec![UiEvent::Quit]))
    }
}
