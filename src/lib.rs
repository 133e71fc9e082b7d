//! # previewfit
//!
//! Decides how a live camera preview is shown: which capture size to ask the
//! camera for, how far to rotate its stream so the picture is upright, and
//! where to place the frame inside the available viewport so it is centered
//! and undistorted.
//!
//! # Architecture: Engine and Facade
//!
//! ```text
//! CameraHost ──sizes, facing, sensor──▶ ┌─────────────────┐
//! display rotation ───────────────────▶ │ PreviewSession  │ ──capture size, rotation──▶ CameraHost
//! viewport size ──────────────────────▶ │  (state owner)  │ ──placement rect──────────▶ caller
//!                                       └───────┬─────────┘
//!                                               │ consults
//!                         ┌─────────────────────┼─────────────────────┐
//!                         ▼                     ▼                     ▼
//!                   size selection         orientation              layout
//! ```
//!
//! The three engine parts in [`geometry`] are pure functions over small
//! `Copy` values. They never call each other and never touch a device, so
//! every rule can be unit tested with plain numbers. The
//! [`session::PreviewSession`] facade holds the only mutable state and
//! talks to the platform through the [`device::CameraHost`] trait.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Size`, `Rect`, `Rotation`, `Facing` value types |
//! | [`catalog`] | Fixed menu of 15 canonical resolutions |
//! | [`geometry`] | Size selection, stream orientation, centered layout |
//! | [`device`] | `CameraHost` trait and the profile-backed host used by the CLI |
//! | [`session`] | Camera lifecycle state machine driving the engine |
//! | [`state`] | Camera index and target size persisted across restarts |
//! | [`config`] | `previewfit.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | Stderr logger for `log` diagnostics |
//!
//! # Design Decisions
//!
//! ## Two Selection Policies
//!
//! With no explicit request the session keeps the viewport's shape and gets
//! as close as possible to its height ([`geometry::optimal_preview_size`]).
//! Once the user picks a resolution from the [`catalog`], an exact match is
//! honored and otherwise the nearest size by area and ratio is used
//! ([`geometry::closest_preview_size`]). Both only ever return sizes the
//! camera reported.
//!
//! ## Rotation as a Closed Enum
//!
//! Screens and sensors only turn in quarter turns, so [`types::Rotation`]
//! has exactly four variants. An invalid angle can only appear where raw
//! integers enter the crate, and is rejected there.
//!
//! ## Layout Only When the Shape Changes
//!
//! The placement depends on the viewport size and the preview's aspect ratio,
//! not its resolution. The session recomputes it only when one of those
//! changes ([`geometry::needs_relayout`]).

pub mod catalog;
pub mod config;
pub mod device;
pub mod geometry;
pub mod logging;
pub mod output;
pub mod session;
pub mod state;
pub mod types;
