//! Camera hardware seam.
//!
//! The [`CameraHost`] trait is everything the [session](crate::session) needs
//! from the platform: how many cameras exist, which way each one faces and how
//! its sensor is mounted, the sizes it can stream, and the calls that open,
//! configure, start, stop and release it.
//!
//! [`ProfileHost`] implements the trait over a [`DeviceProfile`], a TOML
//! description of a device's cameras. It is what the CLI runs against, and it
//! keeps the one-open-camera rule that real hardware enforces.
//!
//! ```toml
//! display_rotation = 0
//!
//! [[camera]]
//! facing = "back"
//! orientation = 90
//! sizes = ["1920x1080", "1280x720", "640x480"]
//!
//! [[camera]]
//! facing = "front"
//! orientation = 270
//! sizes = ["1280x720", "640x480"]
//! ```

use crate::types::{Facing, Rotation, Size};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Profile parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("No camera with index {0}")]
    NoSuchCamera(usize),
    #[error("Camera busy: {0}")]
    Busy(String),
    #[error("Invalid device profile: {0}")]
    InvalidProfile(String),
}

/// Static facts about one camera, as reported by device enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraInfo {
    pub facing: Facing,
    /// Clockwise mounting angle of the sensor relative to the device's
    /// natural orientation.
    pub orientation: Rotation,
}

/// The platform side of a preview session.
///
/// At most one camera may be open at a time. Callers must [`release`]
/// before opening another.
///
/// [`release`]: CameraHost::release
pub trait CameraHost {
    fn camera_count(&self) -> usize;

    fn camera_info(&self, index: usize) -> Result<CameraInfo, HostError>;

    /// Acquire the camera and return the preview sizes it supports.
    fn open(&mut self, index: usize) -> Result<Vec<Size>, HostError>;

    /// Apply capture size and stream rotation to the open camera.
    fn configure(&mut self, capture: Size, rotation: Rotation) -> Result<(), HostError>;

    fn start_preview(&mut self) -> Result<(), HostError>;

    fn stop_preview(&mut self);

    fn release(&mut self);
}

/// One camera entry of a [`DeviceProfile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraProfile {
    pub facing: Facing,
    pub orientation: Rotation,
    /// Supported preview sizes as `"WxH"` strings, in the order the hardware lists them.
    #[serde(with = "size_strings")]
    pub sizes: Vec<Size>,
}

/// Declarative description of a device's cameras and screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceProfile {
    /// Current rotation of the screen, if the profile pins one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_rotation: Option<Rotation>,
    #[serde(rename = "camera", default)]
    pub cameras: Vec<CameraProfile>,
}

impl DeviceProfile {
    pub fn load(path: &Path) -> Result<Self, HostError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, HostError> {
        let profile: Self = toml::from_str(content)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Every camera must report at least one size.
    pub fn validate(&self) -> Result<(), HostError> {
        for (index, camera) in self.cameras.iter().enumerate() {
            if camera.sizes.is_empty() {
                return Err(HostError::InvalidProfile(format!(
                    "camera {} lists no sizes",
                    index
                )));
            }
        }
        Ok(())
    }
}

mod size_strings {
    use crate::types::Size;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(sizes: &[Size], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(sizes.iter().map(|s| s.to_string()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Size>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| s.parse::<Size>().map_err(D::Error::custom))
            .collect()
    }
}

/// The configuration last applied through [`CameraHost::configure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedConfig {
    pub index: usize,
    pub capture: Size,
    pub rotation: Rotation,
    pub previewing: bool,
}

/// A [`CameraHost`] backed by a [`DeviceProfile`].
#[derive(Debug)]
pub struct ProfileHost {
    profile: DeviceProfile,
    open: Option<usize>,
    applied: Option<AppliedConfig>,
}

impl ProfileHost {
    pub fn new(profile: DeviceProfile) -> Self {
        Self {
            profile,
            open: None,
            applied: None,
        }
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Index of the currently open camera.
    pub fn open_camera(&self) -> Option<usize> {
        self.open
    }

    pub fn applied(&self) -> Option<AppliedConfig> {
        self.applied
    }

    fn camera(&self, index: usize) -> Result<&CameraProfile, HostError> {
        self.profile
            .cameras
            .get(index)
            .ok_or(HostError::NoSuchCamera(index))
    }
}

impl CameraHost for ProfileHost {
    fn camera_count(&self) -> usize {
        self.profile.cameras.len()
    }

    fn camera_info(&self, index: usize) -> Result<CameraInfo, HostError> {
        let camera = self.camera(index)?;
        Ok(CameraInfo {
            facing: camera.facing,
            orientation: camera.orientation,
        })
    }

    fn open(&mut self, index: usize) -> Result<Vec<Size>, HostError> {
        if let Some(current) = self.open {
            return Err(HostError::Busy(format!(
                "camera {} is still open, release it before opening camera {}",
                current, index
            )));
        }
        let sizes = self.camera(index)?.sizes.clone();
        self.open = Some(index);
        self.applied = None;
        Ok(sizes)
    }

    fn configure(&mut self, capture: Size, rotation: Rotation) -> Result<(), HostError> {
        let index = self
            .open
            .ok_or_else(|| HostError::Busy("no camera is open".to_string()))?;
        if !self.camera(index)?.sizes.contains(&capture) {
            return Err(HostError::InvalidProfile(format!(
                "camera {} does not support {}",
                index, capture
            )));
        }
        self.applied = Some(AppliedConfig {
            index,
            capture,
            rotation,
            previewing: false,
        });
        Ok(())
    }

    fn start_preview(&mut self) -> Result<(), HostError> {
        match self.applied.as_mut() {
            Some(applied) => {
                applied.previewing = true;
                Ok(())
            }
            None => Err(HostError::Busy(
                "camera must be configured before previewing".to_string(),
            )),
        }
    }

    fn stop_preview(&mut self) {
        if let Some(applied) = self.applied.as_mut() {
            applied.previewing = false;
        }
    }

    fn release(&mut self) {
        self.open = None;
        self.applied = None;
    }
}
