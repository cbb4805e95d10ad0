use std::{fs, thread::sleep, time::Duration};

use serial_test::serial;
use tempfile::tempdir;

// The global subscriber can only be installed once per process, so file
// output is checked in a single test.
#[test]
#[serial]
fn writes_log_file_and_tolerates_second_init() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("overlay.log");

    overlay_timer::logging::init(false, Some(path.clone()));
    tracing::info!("countdown test line");

    overlay_timer::logging::init(true, None);
    tracing::info!("after second init");

    sleep(Duration::from_millis(100));

    assert!(path.exists(), "log file was not created");
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("countdown test line"));
    assert!(contents.contains("after second init"));
}
