use overlay_timer::geometry::Coordinate;
use overlay_timer::location_store::{location_path_in, JsonLocationStore, LocationStore};
use std::fs;
use tempfile::tempdir;

#[test]
fn fresh_store_loads_nothing() {
    let dir = tempdir().unwrap();
    let store = JsonLocationStore::new(location_path_in(dir.path()));
    assert_eq!(store.load(), None);
}

#[test]
fn saved_location_round_trips() {
    let dir = tempdir().unwrap();
    let path = location_path_in(dir.path());

    JsonLocationStore::new(&path).save(Coordinate::new(42, 58));
    let reopened = JsonLocationStore::new(&path);
    assert_eq!(reopened.load(), Some(Coordinate::new(42, 58)));
}

#[test]
fn later_saves_overwrite_earlier_ones() {
    let dir = tempdir().unwrap();
    let mut store = JsonLocationStore::new(location_path_in(dir.path()));

    store.save(Coordinate::new(1, 2));
    store.save(Coordinate::new(-30, 400));
    assert_eq!(store.load(), Some(Coordinate::new(-30, 400)));
}

#[test]
fn file_written_by_other_tools_is_accepted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("overlay-location.json");
    fs::write(&path, r#"{ "X": 640, "Y": 12 }"#).unwrap();

    assert_eq!(
        JsonLocationStore::new(&path).load(),
        Some(Coordinate::new(640, 12))
    );
}

#[test]
fn unusable_content_loads_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("overlay-location.json");

    for content in ["", "[]", r#"{ "X": 1 }"#, r#"{ "X": "a", "Y": 2 }"#] {
        fs::write(&path, content).unwrap();
        assert_eq!(JsonLocationStore::new(&path).load(), None, "{content:?}");
    }
}

#[test]
fn unwritable_target_is_swallowed() {
    let dir = tempdir().unwrap();
    // parent "directory" is a regular file
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    let mut store = JsonLocationStore::new(blocker.join("overlay-location.json"));

    store.save(Coordinate::new(5, 5));
    assert_eq!(store.load(), None);
}

#[test]
fn position_saved_under_timer_app_folder_is_loaded() {
    let dir = tempdir().unwrap();
    let folder = dir.path().join("TimerApp");
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join("overlay-location.json"), r#"{"X":640,"Y":12}"#).unwrap();

    let store = JsonLocationStore::new(location_path_in(dir.path()));
    assert_eq!(store.load(), Some(Coordinate::new(640, 12)));
}
