use crate::camera::capture_device::{CaptureBackend, DeviceHandle};
use crate::camera::opencv_device::OpenCvBackend;
use crate::config_loader::MasterConfig;
use anyhow::Result;
use clap::ArgMatches;
use log::{info, warn};
use std::time::Instant;

pub const DEFAULT_MAX_INDEX: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub index: i32,
    pub opened: bool,
    pub frame_size: Option<(u32, u32)>,
    pub details: String,
}

/// Tries every index in `0..=max_index` once. Each device is released
/// before the next one is opened.
pub fn probe_indices(backend: &mut dyn CaptureBackend, max_index: i32) -> Vec<ProbeResult> {
    let mut results = Vec::new();
    for index in 0..=max_index {
        let probe_start = Instant::now();
        let result = match backend.open(index) {
            Ok(device) => {
                let mut handle = DeviceHandle::new(index, device);
                let read = handle.read_frame();
                if let Err(e) = handle.release() {
                    warn!("⚠️ Probe could not release camera {}: {}", index, e);
                }
                match read {
                    Ok(frame) => ProbeResult {
                        index,
                        opened: true,
                        frame_size: Some((frame.width, frame.height)),
                        details: format!("{}x{} frame in {:?}", frame.width, frame.height, probe_start.elapsed()),
                    },
                    Err(e) => ProbeResult { index, opened: true, frame_size: None, details: e.to_string() },
                }
            }
            Err(e) => ProbeResult { index, opened: false, frame_size: None, details: e.to_string() },
        };
        results.push(result);
    }
    results
}

pub fn handle_probe_cli(master_config: &MasterConfig, args: &ArgMatches) -> Result<()> {
    let op_start_time = Instant::now();
    let app = &master_config.app_settings;
    let max_index = args.get_one::<i32>("max-index").copied().unwrap_or(DEFAULT_MAX_INDEX);
    let mut backend = OpenCvBackend::new(app.capture_width, app.capture_height);

    info!("🩺 Probing camera indices 0..={}", max_index);
    let results = probe_indices(&mut backend, max_index);

    let mut usable = 0;
    for result in &results {
        let marker = match (result.opened, result.frame_size) {
            (true, Some(_)) => {
                usable += 1;
                "✅ OK"
            }
            (true, None) => "⚠️ NO FRAME",
            (false, _) => "❌ UNAVAILABLE",
        };
        info!("  [{}] camera {}: {}", marker, result.index, result.details);
    }
    info!("🏁 Probe finished in {:?}: {} usable camera(s)", op_start_time.elapsed(), usable);
    Ok(())
}
