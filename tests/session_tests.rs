mod common;

use camsnap::camera::DeviceState;
use camsnap::core::{EventOutcome, StatusMessage, UiEvent};
use camsnap::errors::AppError;
use chrono::{Local, TimeZone};
use common::{jpeg_files, session_with, FakeBackend};

#[test]
fn polled_frames_fit_the_display_box_and_keep_aspect() {
    let sizes = [(1280, 720), (480, 1280), (640, 480), (1920, 1080), (320, 240), (1000, 1000), (3, 7)];
    for (sw, sh) in sizes {
        let tmp = tempfile::tempdir().unwrap();
        let (backend, _) = FakeBackend::new(&[0], (sw, sh));
        let mut session = session_with(backend, tmp.path());
        session.open_camera(0).unwrap();

        let frame = session.poll().expect("fake device always delivers");
        let (w, h) = (frame.width(), frame.height());
        assert!(w <= 640 && h <= 480, "{}x{} -> {}x{}", sw, sh, w, h);
        // Truncating the derived side costs less than one pixel.
        let skew = (w as i64 * sh as i64 - h as i64 * sw as i64).abs();
        assert!(skew < sw.max(sh) as i64, "{}x{} -> {}x{}", sw, sh, w, h);
        assert_eq!(frame.source_size(), (sw, sh));
    }
}

#[test]
fn known_display_sizes() {
    let tmp = tempfile::tempdir().unwrap();
    for ((sw, sh), expected) in [((1280, 720), (640, 360)), ((480, 1280), (180, 480))] {
        let (backend, _) = FakeBackend::new(&[0], (sw, sh));
        let mut session = session_with(backend, tmp.path());
        session.open_camera(0).unwrap();
        let frame = session.poll().unwrap();
        assert_eq!((frame.width(), frame.height()), expected);
    }
}

#[test]
fn consecutive_captures_are_numbered_one_apart() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, _) = FakeBackend::new(&[0], (64, 48));
    let mut session = session_with(backend, tmp.path());
    session.open_camera(0).unwrap();
    session.poll().unwrap();

    let at = Local.with_ymd_and_hms(2024, 6, 1, 12, 30, 45).unwrap();
    let first = session.capture_at(at).unwrap();
    let second = session.capture_at(at).unwrap();

    assert_eq!(second.sequence, first.sequence + 1);
    assert_ne!(first.path, second.path);
    assert_eq!(first.path.file_name().unwrap(), "photo_20240601_123045_0001.jpg");
    assert_eq!(second.path.file_name().unwrap(), "photo_20240601_123045_0002.jpg");
    assert_eq!(jpeg_files(tmp.path()).len(), 2);
    assert_eq!(session.status().last_saved.as_ref(), Some(&second.path));
}

#[test]
fn changing_output_directory_restarts_numbering() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, _) = FakeBackend::new(&[0], (64, 48));
    let mut session = session_with(backend, &tmp.path().join("first"));
    session.open_camera(0).unwrap();
    session.poll().unwrap();
    for _ in 0..3 {
        session.capture().unwrap();
    }
    assert_eq!(session.photo_count(), 3);

    let second_dir = tmp.path().join("second");
    session.set_output_dir(&second_dir).unwrap();
    assert!(second_dir.is_dir());
    assert_eq!(session.status().message, StatusMessage::FolderSet(second_dir.clone()));

    let saved = session.capture().unwrap();
    assert_eq!(saved.sequence, 1);
    assert!(saved.path.starts_with(&second_dir));
    assert!(saved.path.to_string_lossy().ends_with("_0001.jpg"));
}

#[test]
fn capture_without_device_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("photos");
    let (backend, _) = FakeBackend::new(&[0], (64, 48));
    let mut session = session_with(backend, &out);

    let err = session.capture().unwrap_err();
    assert!(matches!(err, AppError::NoFrameAvailable(_)));
    assert!(jpeg_files(&out).is_empty());
    assert_eq!(session.photo_count(), 0);
    assert_eq!(session.status().message, StatusMessage::CaptureFailed);
}

#[test]
fn capture_before_first_frame_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, _) = FakeBackend::new(&[0], (64, 48));
    let mut session = session_with(backend, tmp.path());
    session.open_camera(0).unwrap();

    assert!(matches!(session.capture(), Err(AppError::NoFrameAvailable(_))));
    assert!(jpeg_files(tmp.path()).is_empty());
}

#[test]
fn capture_after_close_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, _) = FakeBackend::new(&[0], (64, 48));
    let mut session = session_with(backend, tmp.path());
    session.open_camera(0).unwrap();
    session.poll().unwrap();
    session.close_camera();

    assert!(matches!(session.capture(), Err(AppError::NoFrameAvailable(_))));
    assert!(jpeg_files(tmp.path()).is_empty());
}

#[test]
fn reopening_releases_each_previous_handle_once() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, counts) = FakeBackend::new(&[0, 1, 2], (32, 24));
    let mut session = session_with(backend, tmp.path());

    let order = [0, 1, 2, 0, 2, 1, 1, 0];
    for (n, index) in order.iter().enumerate() {
        session.open_camera(*index).unwrap();
        let c = counts.borrow();
        // Every handle but the current one has been released.
        assert_eq!(c.total_opens(), n as u32 + 1);
        assert_eq!(c.total_releases(), n as u32);
    }

    session.shutdown();
    session.shutdown();
    let c = counts.borrow();
    assert_eq!(c.total_releases(), order.len() as u32);
    assert_eq!(c.opens, c.releases);
}

#[test]
fn failed_open_leaves_camera_closed_without_probing() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, counts) = FakeBackend::new(&[0], (32, 24));
    let mut session = session_with(backend, tmp.path());
    session.open_camera(0).unwrap();

    let err = session.open_camera(5).unwrap_err();
    assert!(matches!(err, AppError::CameraOpen { index: 5, .. }));
    assert!(!session.is_camera_open());
    assert_eq!(session.status().device_state, DeviceState::Failed(5));
    assert_eq!(session.status().message, StatusMessage::CameraOpenFailed(5));
    assert!(session.status().last_error.is_some());
    assert!(session.poll().is_none());

    let c = counts.borrow();
    assert_eq!(c.open_attempts, vec![0, 5]);
    // The previous camera was released before the failing attempt.
    assert_eq!(c.releases.get(&0), Some(&1));
}

#[test]
fn negative_index_is_an_open_error() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, counts) = FakeBackend::new(&[0], (32, 24));
    let mut session = session_with(backend, tmp.path());
    assert!(matches!(session.open_camera(-1), Err(AppError::CameraOpen { index: -1, .. })));
    assert!(counts.borrow().open_attempts.is_empty());
}

#[test]
fn read_failures_keep_polling_alive() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, counts) = FakeBackend::new(&[3], (64, 48));
    let mut session = session_with(backend, tmp.path());
    session.open_camera(3).unwrap();
    assert!(session.poll().is_some());

    counts.borrow_mut().fail_reads = true;
    assert!(session.poll().is_none());
    assert!(session.poll().is_none());
    assert!(session.is_camera_open());
    assert_eq!(session.status().message, StatusMessage::FrameReadFailed(3));

    // The last good frame is still there to be saved.
    let saved = session.capture().unwrap();
    assert_eq!(saved.sequence, 1);

    counts.borrow_mut().fail_reads = false;
    assert!(session.poll().is_some());
    assert_eq!(counts.borrow().reads, 4);
}

#[test]
fn failed_write_still_consumes_the_sequence_number() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("occupied");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let (backend, _) = FakeBackend::new(&[0], (64, 48));
    let mut session = session_with(backend, &blocker);
    session.open_camera(0).unwrap();
    session.poll().unwrap();

    let err = session.capture().unwrap_err();
    assert!(matches!(err, AppError::FileWrite { .. }));
    assert_eq!(session.photo_count(), 1);

    let err = session.capture().unwrap_err();
    assert!(matches!(err, AppError::FileWrite { .. }));
    assert_eq!(session.photo_count(), 2);

    let good_dir = tmp.path().join("good");
    session.set_output_dir(&good_dir).unwrap();
    assert_eq!(session.capture().unwrap().sequence, 1);
}

#[test]
fn set_output_dir_failure_keeps_previous_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("file");
    std::fs::write(&blocker, b"x").unwrap();

    let (backend, _) = FakeBackend::new(&[0], (64, 48));
    let mut session = session_with(backend, tmp.path());
    session.open_camera(0).unwrap();
    session.poll().unwrap();
    session.capture().unwrap();

    assert!(session.set_output_dir(&blocker).is_err());
    assert_eq!(session.output_dir(), tmp.path());
    assert_eq!(session.photo_count(), 1);
    assert_eq!(session.status().message, StatusMessage::FolderFailed(blocker.clone()));
    assert!(session.status().last_error.is_some());
}

#[test]
fn selecting_the_open_camera_is_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, counts) = FakeBackend::new(&[0, 1], (32, 24));
    let mut session = session_with(backend, tmp.path());
    session.open_camera(0).unwrap();

    assert!(session.select_camera(0).is_none());
    assert_eq!(session.select_camera(1).unwrap().unwrap(), 1);
    assert_eq!(session.status().device_index(), Some(1));
    assert_eq!(counts.borrow().open_attempts, vec![0, 1]);
}

#[test]
fn saved_photo_is_a_decodable_jpeg_in_display_colors() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, _) = FakeBackend::new(&[0], (160, 120));
    let mut session = session_with(backend, tmp.path());
    session.open_camera(0).unwrap();
    session.poll().unwrap();

    let saved = session.capture().unwrap();
    let decoded = image::open(&saved.path).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (640, 480));
    assert_eq!((saved.width, saved.height), (640, 480));

    // The fake delivers pure red in BGR order.
    let [r, g, b] = decoded.get_pixel(320, 240).0;
    assert!(r > 200 && g < 60 && b < 60, "unexpected pixel {:?}", [r, g, b]);
}

#[test]
fn dropping_the_session_releases_the_camera() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, counts) = FakeBackend::new(&[0], (32, 24));
    {
        let mut session = session_with(backend, tmp.path());
        session.open_camera(0).unwrap();
    }
    assert_eq!(counts.borrow().releases.get(&0), Some(&1));
}

#[test]
fn shutdown_without_camera_is_a_no_op() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, counts) = FakeBackend::new(&[0], (32, 24));
    let mut session = session_with(backend, tmp.path());
    assert_eq!(session.handle_event(UiEvent::Quit), EventOutcome::Exit);
    assert_eq!(counts.borrow().total_releases(), 0);
    assert_eq!(session.status().device_state, DeviceState::Closed);
}
