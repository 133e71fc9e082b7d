//! Preview session facade.
//!
//! [`PreviewSession`] owns the camera lifecycle and consults the
//! [geometry](crate::geometry) engine whenever one of its inputs changes. The
//! engine itself never holds state; everything mutable lives here, in an
//! explicit [`SessionState`] value instead of nullable fields.
//!
//! # Lifecycle
//!
//! ```text
//!            resume                 surface_changed
//! Closed ───────────────▶ Open ─────────────────────▶ Previewing
//!   ▲                      ▲ ◀───── surface_destroyed ─────┤
//!   │                      │ │                            │
//!   │                      │ └──── pause ───┐   ┌─ pause ─┘
//!   │                      │                ▼   ▼
//!   └──────────────────────┴──── resume ── Paused
//! ```
//!
//! - **switch_camera** (from `Open` or `Previewing`): release, open the next
//!   camera, reselect size, recompute orientation, lay out again.
//! - **set_target_size** (any active state): stop the stream, reselect size,
//!   restart. The device handle is kept.
//! - **display_rotated**: recompute orientation for the open camera.
//! - **surface_destroyed** (from `Previewing`): stop the stream, keep the
//!   device, forget the viewport.
//!
//! # Size selection
//!
//! | Situation | Policy |
//! |---|---|
//! | Explicit target set | configured policy (default [`Closest`](SelectionPolicy::Closest)) |
//! | No target, viewport known | [`Optimal`](SelectionPolicy::Optimal) against the viewport in sensor orientation |
//! | No target, no viewport yet | first size the camera lists |
//!
//! Without a target, a viewport arriving after `resume` reselects the size,
//! so the call order of `resume` and `surface_changed` does not matter.
//! When a step fails after the device was acquired, the device is released
//! and the session is left `Paused`, ready for another `resume`.

use crate::config::SelectionConfig;
use crate::device::{CameraHost, CameraInfo, HostError};
use crate::geometry::{
    SelectionError, display_orientation, effective_preview, layout_preview, needs_relayout,
    optimal_preview_size_with_tolerance,
};
use crate::state::SavedState;
use crate::types::{Rect, Rotation, Size};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Current device has no camera")]
    NoCamera,
    #[error("No camera is open, resume the session first")]
    NotOpened,
    #[error("Camera host error: {0}")]
    Host(#[from] HostError),
    #[error("Size selection failed: {0}")]
    Selection(#[from] SelectionError),
}

/// The open camera and the parameters applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveCamera {
    pub index: usize,
    pub info: CameraInfo,
    /// Sizes reported by the camera, in its order.
    pub supported: Vec<Size>,
    pub capture: Size,
    pub rotation: Rotation,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Closed,
    /// Camera acquired and configured, no surface to draw on yet.
    Open(ActiveCamera),
    /// Streaming into `viewport` at `placement`.
    Previewing {
        camera: ActiveCamera,
        viewport: Size,
        placement: Rect,
    },
    /// Camera released; preferences kept for the next resume.
    Paused,
}

impl SessionState {
    pub fn camera(&self) -> Option<&ActiveCamera> {
        match self {
            SessionState::Open(camera) | SessionState::Previewing { camera, .. } => Some(camera),
            SessionState::Closed | SessionState::Paused => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.camera().is_some()
    }

    pub fn placement(&self) -> Option<Rect> {
        match self {
            SessionState::Previewing { placement, .. } => Some(*placement),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Closed => "closed",
            SessionState::Open(_) => "open",
            SessionState::Previewing { .. } => "previewing",
            SessionState::Paused => "paused",
        }
    }
}

/// Inputs and result of the last layout computation.
#[derive(Debug, Clone, Copy)]
struct Layout {
    viewport: Size,
    effective: Size,
    placement: Rect,
}

pub struct PreviewSession<H: CameraHost> {
    host: H,
    state: SessionState,
    preferred_camera: usize,
    target: Option<Size>,
    viewport: Option<Size>,
    display_rotation: Rotation,
    selection: SelectionConfig,
    layout: Option<Layout>,
}

impl<H: CameraHost> PreviewSession<H> {
    pub fn new(host: H, display_rotation: Rotation, selection: SelectionConfig) -> Self {
        Self {
            host,
            state: SessionState::Closed,
            preferred_camera: 0,
            target: None,
            viewport: None,
            display_rotation,
            selection,
            layout: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn target(&self) -> Option<Size> {
        self.target
    }

    pub fn viewport(&self) -> Option<Size> {
        self.viewport
    }

    pub fn display_rotation(&self) -> Rotation {
        self.display_rotation
    }

    /// Apply saved preferences. Takes effect on the next camera open.
    pub fn restore(&mut self, saved: &SavedState) {
        self.preferred_camera = saved.camera_index;
        self.target = saved.target;
    }

    /// Preferences to persist: the camera in use and the explicit target,
    /// or the current capture size when no target was requested.
    pub fn saved_state(&self) -> SavedState {
        let target = self
            .target
            .or_else(|| self.state.camera().map(|camera| camera.capture));
        SavedState::new(self.preferred_camera, target)
    }

    /// Open the preferred camera. The only way to acquire a camera from
    /// `Closed` or `Paused`.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        let count = self.host.camera_count();
        if count == 0 {
            log::error!("Current device has no camera.");
            return Err(SessionError::NoCamera);
        }
        if self.state.is_active() {
            log::warn!("resume called while a camera is already open, ignoring.");
            return Ok(());
        }
        let index = if self.preferred_camera < count {
            self.preferred_camera
        } else {
            log::warn!(
                "Saved camera {} not present ({} cameras), using camera 0.",
                self.preferred_camera,
                count
            );
            0
        };

        let camera = self.open_camera(index)?;
        self.preferred_camera = index;
        self.attach(camera)?;
        Ok(())
    }

    /// Stop streaming and release the camera.
    pub fn pause(&mut self) {
        match std::mem::replace(&mut self.state, SessionState::Paused) {
            SessionState::Previewing { .. } => {
                self.host.stop_preview();
                self.host.release();
            }
            SessionState::Open(_) => self.host.release(),
            previous @ (SessionState::Closed | SessionState::Paused) => self.state = previous,
        }
    }

    /// Move to the next camera. Returns `false` when the device has fewer
    /// than two cameras.
    pub fn switch_camera(&mut self) -> Result<bool, SessionError> {
        let count = self.host.camera_count();
        if count <= 1 {
            return Ok(false);
        }
        let current = self
            .state
            .camera()
            .map(|camera| camera.index)
            .ok_or(SessionError::NotOpened)?;
        log::debug!("Switch camera.");

        self.pause();
        let next = (current + 1) % count;
        let camera = self.open_camera(next)?;
        self.preferred_camera = next;
        self.attach(camera)?;
        Ok(true)
    }

    /// Request a capture size. An identical request is ignored; otherwise the
    /// stream is stopped, the size reselected and the stream restarted.
    pub fn set_target_size(&mut self, target: Size) -> Result<Option<Rect>, SessionError> {
        log::debug!(
            "set_target_size({}), current target: {:?}, state: {}",
            target,
            self.target,
            self.state.name()
        );
        if self.target == Some(target) {
            return Ok(None);
        }
        self.target = Some(target);

        match self.detach() {
            Some(camera) => self.reconfigure(camera),
            None => Ok(None),
        }
    }

    /// The rendering surface now has size `viewport`. Lays the preview out
    /// again when needed and starts streaming.
    ///
    /// Without an explicit target the capture size follows the viewport, so
    /// it is selected again and the camera reconfigured if the choice moved.
    ///
    /// Returns the new placement when it was recomputed.
    pub fn surface_changed(&mut self, viewport: Size) -> Result<Option<Rect>, SessionError> {
        self.viewport = Some(viewport);
        let reselect = self.target.is_none()
            && self.state.camera().is_some_and(|camera| {
                self.select_capture(&camera.supported, camera.rotation).ok()
                    != Some(camera.capture)
            });
        if reselect {
            return match self.detach() {
                Some(camera) => self.reconfigure(camera),
                None => Ok(None),
            };
        }
        match std::mem::take(&mut self.state) {
            SessionState::Open(camera) | SessionState::Previewing { camera, .. } => {
                self.attach(camera)
            }
            previous => {
                self.state = previous;
                Ok(None)
            }
        }
    }

    /// The rendering surface is gone. Stops streaming but keeps the device,
    /// so `Previewing` drops back to `Open` until the next
    /// [`surface_changed`](Self::surface_changed).
    pub fn surface_destroyed(&mut self) {
        self.viewport = None;
        self.layout = None;
        if let Some(camera) = self.detach() {
            self.state = SessionState::Open(camera);
        }
    }

    /// The screen turned. Recomputes the stream rotation for the open camera.
    pub fn display_rotated(&mut self, rotation: Rotation) -> Result<Option<Rect>, SessionError> {
        if rotation == self.display_rotation {
            return Ok(None);
        }
        self.display_rotation = rotation;
        match self.detach() {
            Some(camera) => self.reconfigure(camera),
            None => Ok(None),
        }
    }

    fn open_camera(&mut self, index: usize) -> Result<ActiveCamera, SessionError> {
        let info = self.host.camera_info(index)?;
        let supported = self.host.open(index)?;
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("Supported preview sizes of camera {}:", index);
            for size in &supported {
                log::debug!("- {}, r: {:.2}", size, size.ratio());
            }
        }
        self.configure(index, info, supported)
            .inspect_err(|_| self.host.release())
    }

    /// Select the capture size and rotation for a camera and apply them.
    fn configure(
        &mut self,
        index: usize,
        info: CameraInfo,
        supported: Vec<Size>,
    ) -> Result<ActiveCamera, SessionError> {
        let rotation = display_orientation(self.display_rotation, info.orientation, info.facing);
        let capture = self.select_capture(&supported, rotation)?;
        self.host.configure(capture, rotation)?;
        log::debug!(
            "Camera {} ({}) configured at {} rotated {}",
            index,
            info.facing,
            capture,
            rotation
        );
        Ok(ActiveCamera {
            index,
            info,
            supported,
            capture,
            rotation,
        })
    }

    fn select_capture(&self, supported: &[Size], rotation: Rotation) -> Result<Size, SelectionError> {
        let tolerance = self.selection.aspect_tolerance;
        match (self.target, self.viewport) {
            (Some(target), _) => self.selection.policy.select(supported, target, tolerance),
            (None, Some(viewport)) => {
                // sensor sizes are landscape; compare against the viewport as the sensor sees it
                let sensor_view = if rotation.is_quarter_turn() {
                    viewport.swapped()
                } else {
                    viewport
                };
                optimal_preview_size_with_tolerance(supported, sensor_view, tolerance)
            }
            (None, None) => supported
                .first()
                .copied()
                .ok_or(SelectionError::EmptyCandidateList),
        }
    }

    /// Reapply size and rotation to an already open camera.
    fn reconfigure(&mut self, camera: ActiveCamera) -> Result<Option<Rect>, SessionError> {
        let ActiveCamera {
            index,
            info,
            supported,
            ..
        } = camera;
        match self.configure(index, info, supported) {
            Ok(camera) => self.attach(camera),
            Err(e) => {
                self.host.release();
                self.state = SessionState::Paused;
                Err(e)
            }
        }
    }

    /// Take the open camera out of the state, stopping its stream.
    ///
    /// Leaves `Closed` as a placeholder; callers must store a new state.
    fn detach(&mut self) -> Option<ActiveCamera> {
        match std::mem::take(&mut self.state) {
            SessionState::Open(camera) => Some(camera),
            SessionState::Previewing { camera, .. } => {
                self.host.stop_preview();
                Some(camera)
            }
            previous => {
                self.state = previous;
                None
            }
        }
    }

    /// Lay out and start streaming if a surface exists, otherwise park in `Open`.
    fn attach(&mut self, camera: ActiveCamera) -> Result<Option<Rect>, SessionError> {
        let Some(viewport) = self.viewport else {
            self.state = SessionState::Open(camera);
            return Ok(None);
        };

        let effective = effective_preview(camera.capture, camera.rotation);
        let previous = self.layout.map(|l| (l.viewport, l.effective));
        let (placement, relaid) = match self.layout {
            Some(last) if !needs_relayout(previous, viewport, effective) => (last.placement, false),
            _ => {
                let placement =
                    layout_preview(viewport, camera.capture, camera.rotation.is_quarter_turn());
                log::debug!("Layout {} in {} at {}", effective, viewport, placement);
                (placement, true)
            }
        };
        if let Err(e) = self.host.start_preview() {
            self.host.release();
            self.state = SessionState::Paused;
            return Err(e.into());
        }
        self.layout = Some(Layout {
            viewport,
            effective,
            placement,
        });
        self.state = SessionState::Previewing {
            camera,
            viewport,
            placement,
        };
        Ok(relaid.then_some(placement))
    }
}
