use crate::camera::opencv_device::OpenCvBackend;
use crate::config_loader::MasterConfig;
use crate::core::capture_trigger::SavedPhoto;
use crate::core::session::{Session, SessionSettings};
use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{debug, info};
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_WARMUP_FRAMES: u32 = 30;

/// Pumps up to `max_ticks` ticks, then saves the newest frame.
///
/// Cameras often hand out dark frames right after opening, so every tick up
/// to the limit is pumped when frames keep arriving.
pub fn snap_once(session: &mut Session, max_ticks: u32, tick: Duration) -> Result<SavedPhoto> {
    for tick_no in 1..=max_ticks {
        let got_frame = session.poll().is_some();
        debug!("Warm-up tick {}/{}: frame={}", tick_no, max_ticks, got_frame);
        if tick_no < max_ticks && !tick.is_zero() {
            thread::sleep(tick);
        }
    }
    Ok(session.capture()?)
}

pub fn handle_snap_cli(master_config: &MasterConfig, args: &ArgMatches) -> Result<()> {
    let op_start_time = Instant::now();
    let app = &master_config.app_settings;
    let frames = args.get_one::<u32>("frames").copied().unwrap_or(DEFAULT_WARMUP_FRAMES).max(1);

    let backend = OpenCvBackend::new(app.capture_width, app.capture_height);
    let mut session = Session::new(Box::new(backend), SessionSettings::from_config(app));
    session
        .set_output_dir(&app.output_directory)
        .with_context(|| format!("Failed to prepare output directory '{}'", app.output_directory))?;
    session
        .open_camera(app.camera_index)
        .with_context(|| format!("Cannot snap without camera {}", app.camera_index))?;

    info!("📸 Snapping from camera {} after up to {} frame(s)...", app.camera_index, frames);
    let saved = snap_once(&mut session, frames, Duration::from_millis(app.tick_interval_ms))?;
    session.shutdown();

    info!("✅ Snap finished in {:?}", op_start_time.elapsed());
    println!("{}", saved.path.display());
    Ok(())
}
