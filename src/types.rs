//! Value types shared by the engine, the session facade and the CLI.
//!
//! Everything here is `Copy` and validated on construction, so the geometry
//! functions never see a zero-sized preview or a rotation that is not a
//! quarter turn.
//!
//! - [`Size`]: a `width x height` pair, both non-zero. Parses from `"1280x720"`.
//! - [`Rect`]: a placement rectangle in viewport coordinates.
//! - [`Rotation`]: one of the four clockwise quarter turns.
//! - [`Facing`]: whether a camera looks at the user or away from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("size must have a non-zero width and height, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
    #[error("malformed size {0:?}, expected WIDTHxHEIGHT (e.g. 1280x720)")]
    MalformedSize(String),
    #[error("invalid rotation {0}, expected one of 0, 90, 180, 270")]
    InvalidRotation(i32),
}

/// A capture, preview or viewport size in pixels.
///
/// Both dimensions are guaranteed non-zero, which keeps every ratio and
/// scaling computation in [`crate::geometry`] well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSize", into = "RawSize")]
pub struct Size {
    width: u32,
    height: u32,
}

#[derive(Serialize, Deserialize)]
struct RawSize {
    width: u32,
    height: u32,
}

impl TryFrom<RawSize> for Size {
    type Error = ValueError;

    fn try_from(raw: RawSize) -> Result<Self, Self::Error> {
        Size::new(raw.width, raw.height)
    }
}

impl From<Size> for RawSize {
    fn from(size: Size) -> Self {
        RawSize {
            width: size.width,
            height: size.height,
        }
    }
}

impl Size {
    pub fn new(width: u32, height: u32) -> Result<Self, ValueError> {
        if width == 0 || height == 0 {
            return Err(ValueError::ZeroDimension { width, height });
        }
        Ok(Self { width, height })
    }

    /// Build a size from literals known to be non-zero (catalog entries).
    pub(crate) const fn from_static(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0);
        Self { width, height }
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    /// Aspect ratio as `width / height`.
    pub fn ratio(self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// The same size rotated by a quarter turn.
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Exact aspect comparison by cross-multiplication (no float rounding).
    pub fn same_aspect(self, other: Size) -> bool {
        self.width as u64 * other.height as u64 == self.height as u64 * other.width as u64
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValueError::MalformedSize(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(malformed)?;
        let width = w.trim().parse::<u32>().map_err(|_| malformed())?;
        let height = h.trim().parse::<u32>().map_err(|_| malformed())?;
        Size::new(width, height)
    }
}

/// Placement rectangle in viewport coordinates.
///
/// Invariant: `left <= right` and `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Rect {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        debug_assert!(left <= right && top <= bottom);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// A clockwise rotation by a whole quarter turn.
///
/// Used both for the display rotation (relative to the device's natural
/// orientation) and for the correction applied to the capture stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Strict conversion: anything other than 0, 90, 180 or 270 is rejected.
    pub fn from_degrees(degrees: i32) -> Result<Self, ValueError> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(ValueError::InvalidRotation(other)),
        }
    }

    /// Snap an arbitrary angle to the nearest quarter turn.
    ///
    /// Negative and out-of-range angles wrap first, so `-90` is `Deg270` and
    /// `359` is `Deg0`. Exact halfway angles (45, 135, ...) round up.
    pub fn nearest(degrees: i32) -> Self {
        let wrapped = degrees.rem_euclid(360);
        Self::from_quarters((wrapped + 45) / 90)
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// True for 90 and 270: the rotated image has width and height swapped.
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    pub(crate) fn from_quarters(quarters: i32) -> Self {
        match quarters.rem_euclid(4) {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }
}

impl TryFrom<i32> for Rotation {
    type Error = ValueError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// Which way a camera points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Points toward the user; its image is mirrored on screen.
    Front,
    /// Points away from the user.
    Back,
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facing::Front => write!(f, "front"),
            Facing::Back => write!(f, "back"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Size
    // =========================================================================

    #[test]
    fn size_rejects_zero_dimensions() {
        assert_eq!(
            Size::new(0, 720),
            Err(ValueError::ZeroDimension {
                width: 0,
                height: 720
            })
        );
        assert!(Size::new(1280, 0).is_err());
        assert!(Size::new(1, 1).is_ok());
    }

    #[test]
    fn size_parses_width_x_height() {
        let size: Size = "1280x720".parse().unwrap();
        assert_eq!((size.width(), size.height()), (1280, 720));

        let upper: Size = " 640X480 ".parse().unwrap();
        assert_eq!(upper, Size::new(640, 480).unwrap());
    }

    #[test]
    fn size_parse_errors() {
        assert!(matches!(
            "1280".parse::<Size>(),
            Err(ValueError::MalformedSize(_))
        ));
        assert!(matches!(
            "axb".parse::<Size>(),
            Err(ValueError::MalformedSize(_))
        ));
        assert!(matches!(
            "0x720".parse::<Size>(),
            Err(ValueError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn size_display_round_trips_through_parse() {
        let size = Size::new(1920, 1080).unwrap();
        assert_eq!(size.to_string(), "1920x1080");
        assert_eq!(size.to_string().parse::<Size>().unwrap(), size);
    }

    #[test]
    fn size_same_aspect_is_exact() {
        let hd = Size::new(1280, 720).unwrap();
        assert!(hd.same_aspect(Size::new(1920, 1080).unwrap()));
        assert!(!hd.same_aspect(Size::new(800, 450).unwrap().swapped()));
        // 854x480 is close to 16:9 but not equal
        assert!(!hd.same_aspect(Size::new(854, 480).unwrap()));
    }

    #[test]
    fn size_deserialize_validates() {
        let ok: Size = serde_json::from_str(r#"{"width":640,"height":480}"#).unwrap();
        assert_eq!(ok, Size::new(640, 480).unwrap());

        let zero = serde_json::from_str::<Size>(r#"{"width":0,"height":480}"#);
        assert!(zero.is_err());
    }

    // =========================================================================
    // Rotation
    // =========================================================================

    #[test]
    fn rotation_from_degrees_accepts_quarter_turns_only() {
        for rotation in Rotation::ALL {
            assert_eq!(Rotation::from_degrees(rotation.degrees()), Ok(rotation));
        }
        assert_eq!(
            Rotation::from_degrees(45),
            Err(ValueError::InvalidRotation(45))
        );
        assert_eq!(
            Rotation::from_degrees(360),
            Err(ValueError::InvalidRotation(360))
        );
        assert_eq!(
            Rotation::from_degrees(-90),
            Err(ValueError::InvalidRotation(-90))
        );
    }

    #[test]
    fn rotation_nearest_wraps_and_rounds() {
        assert_eq!(Rotation::nearest(0), Rotation::Deg0);
        assert_eq!(Rotation::nearest(44), Rotation::Deg0);
        assert_eq!(Rotation::nearest(45), Rotation::Deg90);
        assert_eq!(Rotation::nearest(359), Rotation::Deg0);
        assert_eq!(Rotation::nearest(-90), Rotation::Deg270);
        assert_eq!(Rotation::nearest(450), Rotation::Deg90);
        assert_eq!(Rotation::nearest(200), Rotation::Deg180);
    }

    #[test]
    fn rotation_quarter_turns() {
        assert!(!Rotation::Deg0.is_quarter_turn());
        assert!(Rotation::Deg90.is_quarter_turn());
        assert!(!Rotation::Deg180.is_quarter_turn());
        assert!(Rotation::Deg270.is_quarter_turn());
    }

    #[test]
    fn rotation_serializes_as_degrees() {
        assert_eq!(serde_json::to_string(&Rotation::Deg270).unwrap(), "270");
        let parsed: Rotation = serde_json::from_str("90").unwrap();
        assert_eq!(parsed, Rotation::Deg90);
        assert!(serde_json::from_str::<Rotation>("30").is_err());
    }

    // =========================================================================
    // Rect / Facing
    // =========================================================================

    #[test]
    fn rect_dimensions() {
        let rect = Rect::new(0, 75, 800, 525);
        assert_eq!(rect.width(), 800);
        assert_eq!(rect.height(), 450);
        assert_eq!(rect.to_string(), "(0,75)-(800,525)");
    }

    #[test]
    fn facing_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Facing::Front).unwrap(), "\"front\"");
        let back: Facing = serde_json::from_str("\"back\"").unwrap();
        assert_eq!(back, Facing::Back);
    }
}
