use crate::geometry::Coordinate;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const LOCATION_FILE_NAME: &str = "overlay-location.json";
pub const APP_DIR_NAME: &str = "TimerApp";

/// Best-effort persistence of the overlay's top-left corner.
pub trait LocationStore {
    /// `None` when nothing usable is stored. Never fails.
    fn load(&self) -> Option<Coordinate>;
    /// Failures are swallowed.
    fn save(&mut self, location: Coordinate);
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct LocationFile {
    #[serde(rename = "X")]
    x: i32,
    #[serde(rename = "Y")]
    y: i32,
}

/// `<config dir>/TimerApp/overlay-location.json`
pub fn location_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join(APP_DIR_NAME).join(LOCATION_FILE_NAME)
}

pub fn resolve_location_path() -> Result<PathBuf> {
    let config_dir =
        dirs_next::config_dir().ok_or_else(|| anyhow!("no per-user config directory"))?;
    Ok(location_path_in(&config_dir))
}

#[derive(Debug, Clone)]
pub struct JsonLocationStore {
    path: PathBuf,
}

impl JsonLocationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LocationStore for JsonLocationStore {
    fn load(&self) -> Option<Coordinate> {
        match load_from_path(&self.path) {
            Ok(location) => location,
            Err(err) => {
                tracing::warn!(?err, path = %self.path.display(), "ignoring stored overlay location");
                None
            }
        }
    }

    fn save(&mut self, location: Coordinate) {
        match save_to_path(&self.path, location) {
            Ok(()) => tracing::debug!(?location, "overlay location saved"),
            Err(err) => {
                tracing::warn!(?err, path = %self.path.display(), "failed to save overlay location")
            }
        }
    }
}

fn load_from_path(path: &Path) -> Result<Option<Coordinate>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read location file {}", path.display()))?;
    let stored: LocationFile = serde_json::from_str(&content)
        .with_context(|| format!("deserialize location file {}", path.display()))?;
    Ok(Some(Coordinate::new(stored.x, stored.y)))
}

fn save_to_path(path: &Path, location: Coordinate) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| anyhow!("location path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create location folder {}", dir.display()))?;

    let json = serde_json::to_string(&LocationFile {
        x: location.x,
        y: location.y,
    })
    .context("serialize overlay location")?;

    let mut tmp = NamedTempFile::new_in(dir).context("create temporary location file")?;
    tmp.write_all(json.as_bytes())?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("replace location file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_path_is_under_app_folder() {
        let path = location_path_in(Path::new("/home/user/.config"));
        assert_eq!(
            path,
            Path::new("/home/user/.config")
                .join(APP_DIR_NAME)
                .join(LOCATION_FILE_NAME)
        );
    }

    #[test]
    fn missing_file_loads_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loaded = load_from_path(&dir.path().join(LOCATION_FILE_NAME)).expect("load");
        assert_eq!(loaded, None);
    }

    #[test]
    fn file_uses_capitalised_keys() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(LOCATION_FILE_NAME);
        save_to_path(&path, Coordinate::new(-12, 340)).expect("save");

        let raw = std::fs::read_to_string(&path).expect("read back");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value, serde_json::json!({ "X": -12, "Y": 340 }));
    }

    #[test]
    fn malformed_content_is_an_error_internally_and_none_publicly() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(LOCATION_FILE_NAME);
        std::fs::write(&path, "{ not json").expect("write");

        assert!(load_from_path(&path).is_err());
        assert_eq!(JsonLocationStore::new(&path).load(), None);
    }

    #[test]
    fn save_creates_missing_parent_folders() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = location_path_in(dir.path());
        let mut store = JsonLocationStore::new(&path);

        store.save(Coordinate::new(5, 6));
        assert!(path.exists());
        assert_eq!(store.load(), Some(Coordinate::new(5, 6)));
    }
}
