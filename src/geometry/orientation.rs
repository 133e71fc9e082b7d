//! Stream rotation that makes the sensor image upright on screen.

use crate::types::{Facing, Rotation, ValueError};

/// Clockwise rotation to apply to the capture stream.
///
/// `display` is the current rotation of the screen relative to the device's
/// natural orientation; `sensor` is the fixed mounting angle of the camera.
/// Front cameras are mirrored, so their rotation is counter-compensated.
///
/// # Examples
/// ```
/// # use previewfit::geometry::display_orientation;
/// # use previewfit::types::{Facing, Rotation};
/// // Typical phone back camera held upright
/// let r = display_orientation(Rotation::Deg0, Rotation::Deg90, Facing::Back);
/// assert_eq!(r, Rotation::Deg90);
/// ```
pub fn display_orientation(display: Rotation, sensor: Rotation, facing: Facing) -> Rotation {
    match facing {
        Facing::Front => {
            let turned = (sensor.degrees() + display.degrees()) % 360;
            // compensate the mirror
            Rotation::from_quarters((360 - turned) % 360 / 90)
        }
        Facing::Back => {
            Rotation::from_quarters((sensor.degrees() - display.degrees() + 360) % 360 / 90)
        }
    }
}

/// [`display_orientation`] over raw degrees, as reported by a windowing
/// system or device enumeration.
///
/// Fails with [`ValueError::InvalidRotation`] if either angle is not one of
/// 0, 90, 180 or 270. Callers holding arbitrary angles can snap them first
/// with [`Rotation::nearest`].
pub fn display_orientation_degrees(
    display: i32,
    sensor: i32,
    facing: Facing,
) -> Result<Rotation, ValueError> {
    let display = Rotation::from_degrees(display)?;
    let sensor = Rotation::from_degrees(sensor)?;
    Ok(display_orientation(display, sensor, facing))
}
