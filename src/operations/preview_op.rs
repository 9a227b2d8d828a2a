use crate::camera::opencv_device::OpenCvBackend;
use crate::config_loader::MasterConfig;
use crate::core::events::EventOutcome;
use crate::core::session::{Session, SessionSettings};
use crate::errors::AppError;
use crate::ui::i18n::Language;
use crate::ui::keymap::KeyMap;
use crate::ui::preview_window::PreviewWindow;
use crate::ui::{status_text, DisplaySink, EventSource};
use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Drives the session until a quit event: every iteration pumps one frame,
/// presents it, then waits one tick for input. The tick is re-armed whatever
/// the poll outcome was.
pub fn run_event_loop<W>(
    session: &mut Session,
    window: &mut W,
    language: Language,
    tick_ms: u64,
) -> Result<u64, AppError>
where
    W: DisplaySink + EventSource,
{
    let mut ticks: u64 = 0;
    loop {
        ticks += 1;
        let frame = session.poll();
        window.present(frame)?;
        window.show_status(&status_text(&session.status().message, language))?;

        for event in window.next_events(tick_ms)? {
            debug!("Handling {:?}", event);
            if session.handle_event(event) == EventOutcome::Exit {
                return Ok(ticks);
            }
        }
    }
}

pub fn handle_preview_cli(master_config: &MasterConfig, _args: &ArgMatches) -> Result<()> {
    let op_start_time = Instant::now();
    let app = &master_config.app_settings;
    let language = app.language;
    let strings = language.strings();

    let backend = OpenCvBackend::new(app.capture_width, app.capture_height);
    let settings = SessionSettings::from_config(app);
    let bounds = settings.bounds;
    let mut session = Session::new(Box::new(backend), settings);

    let output_dir = PathBuf::from(&app.output_directory);
    session
        .set_output_dir(output_dir.clone())
        .with_context(|| format!("Failed to prepare default output directory '{}'", output_dir.display()))?;
    info!("📁 Default photo save folder: {}", session.output_dir().display());

    // An unavailable camera is reported in the window, not fatal.
    if let Err(e) = session.open_camera(app.camera_index) {
        warn!("⚠️ Starting without a camera: {}", e);
    }

    let mut window = PreviewWindow::create(
        strings.app_title,
        strings.instructions,
        bounds,
        KeyMap::new(master_config.keys.clone()),
        output_dir,
    )
    .context("Failed to open the preview window")?;

    info!("🎬 Preview running. Press '{}' to capture, Esc to exit.", master_config.keys.capture.escape_default());
    let ticks = run_event_loop(&mut session, &mut window, language, app.tick_interval_ms)
        .context("Preview loop aborted")?;
    session.shutdown();

    info!(
        "🏁 Preview closed after {} tick(s) in {:?}; {} photo(s) in the last folder.",
        ticks,
        op_start_time.elapsed(),
        session.photo_count()
    );
    Ok(())
}
