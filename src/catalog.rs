//! Canonical resolutions offered as selectable preview targets.
//!
//! The catalog is a menu, not a capability list: picking an entry only sets
//! the *target* for [`closest_preview_size`](crate::geometry::closest_preview_size).
//! The size actually applied to the camera is always one of the sizes the
//! hardware reports.

use crate::types::Size;
use std::fmt;

/// A named resolution from the fixed catalog, ordered from 1920x1080 down to 176x144.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    R1920x1080,
    R1440x1080,
    R1088x1088,
    R1280x720,
    R1056x704,
    R1024x768,
    R960x720,
    R800x450,
    R720x720,
    R720x480,
    R640x480,
    R352x288,
    R320x240,
    R256x144,
    R176x144,
}

impl Resolution {
    pub const ALL: [Resolution; 15] = [
        Resolution::R1920x1080,
        Resolution::R1440x1080,
        Resolution::R1088x1088,
        Resolution::R1280x720,
        Resolution::R1056x704,
        Resolution::R1024x768,
        Resolution::R960x720,
        Resolution::R800x450,
        Resolution::R720x720,
        Resolution::R720x480,
        Resolution::R640x480,
        Resolution::R352x288,
        Resolution::R320x240,
        Resolution::R256x144,
        Resolution::R176x144,
    ];

    pub const fn size(self) -> Size {
        let (width, height) = match self {
            Resolution::R1920x1080 => (1920, 1080),
            Resolution::R1440x1080 => (1440, 1080),
            Resolution::R1088x1088 => (1088, 1088),
            Resolution::R1280x720 => (1280, 720),
            Resolution::R1056x704 => (1056, 704),
            Resolution::R1024x768 => (1024, 768),
            Resolution::R960x720 => (960, 720),
            Resolution::R800x450 => (800, 450),
            Resolution::R720x720 => (720, 720),
            Resolution::R720x480 => (720, 480),
            Resolution::R640x480 => (640, 480),
            Resolution::R352x288 => (352, 288),
            Resolution::R320x240 => (320, 240),
            Resolution::R256x144 => (256, 144),
            Resolution::R176x144 => (176, 144),
        };
        Size::from_static(width, height)
    }

    pub fn ratio(self) -> f64 {
        self.size().ratio()
    }

    /// The catalog entry with exactly this size, if there is one.
    pub fn find(size: Size) -> Option<Resolution> {
        Self::ALL.into_iter().find(|r| r.size() == size)
    }
}

/// Menu label: `"1920x1080 r:1.78"`.
impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} r:{:.2}", self.size(), self.ratio())
    }
}
