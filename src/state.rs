//! Restore state kept across process restarts.
//!
//! A preview session remembers two things between runs: which camera was in
//! use and which target size the user asked for. Both are written to a small
//! JSON file and read back before the camera is opened.
//!
//! ## Storage
//!
//! ```json
//! {
//!   "version": 1,
//!   "camera_index": 1,
//!   "target": { "width": 1280, "height": 720 }
//! }
//! ```
//!
//! A missing, unreadable or outdated file is not an error: it loads as the
//! defaults (camera 0, no explicit target), the same as a first run.

use crate::types::Size;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// Version of the state file format. Bump this to discard saved state when
/// the format changes.
const STATE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    pub version: u32,
    /// Camera to reopen on the next resume.
    pub camera_index: usize,
    /// Last requested target size. `None` means "let the session choose".
    #[serde(default)]
    pub target: Option<Size>,
}

impl Default for SavedState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            camera_index: 0,
            target: None,
        }
    }
}

impl SavedState {
    pub fn new(camera_index: usize, target: Option<Size>) -> Self {
        Self {
            version: STATE_VERSION,
            camera_index,
            target,
        }
    }

    /// Load from `path`. Returns the defaults if the file doesn't exist or
    /// can't be parsed (version mismatch, corruption).
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        let state: Self = match serde_json::from_str(&content) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Ignoring unreadable state file {}: {}", path.display(), e);
                return Self::default();
            }
        };
        if state.version != STATE_VERSION {
            log::warn!(
                "Ignoring state file {} with version {} (expected {})",
                path.display(),
                state.version,
                STATE_VERSION
            );
            return Self::default();
        }
        state
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let tmp = TempDir::new().unwrap();
        let state = SavedState::load(&tmp.path().join("state.json"));
        assert_eq!(state, SavedState::default());
        assert_eq!(state.camera_index, 0);
        assert_eq!(state.target, None);
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/state.json");
        let state = SavedState::new(1, Some(Size::new(1280, 720).unwrap()));
        state.save(&path).unwrap();
        assert_eq!(SavedState::load(&path), state);
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(SavedState::load(&path), SavedState::default());
    }

    #[test]
    fn zero_sized_target_is_rejected_as_corrupt() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"version":1,"camera_index":2,"target":{"width":0,"height":720}}"#,
        )
        .unwrap();
        assert_eq!(SavedState::load(&path), SavedState::default());
    }

    #[test]
    fn version_mismatch_loads_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        std::fs::write(&path, r#"{"version":99,"camera_index":3,"target":null}"#).unwrap();
        assert_eq!(SavedState::load(&path), SavedState::default());
    }

    #[test]
    fn target_is_optional_in_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        std::fs::write(&path, r#"{"version":1,"camera_index":1}"#).unwrap();
        assert_eq!(SavedState::load(&path), SavedState::new(1, None));
    }
}
