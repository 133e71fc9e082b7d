//! The preview decision engine: pure functions, no device access.
//!
//! | Question | Function |
//! |---|---|
//! | **Which capture size?** | [`optimal_preview_size`], [`closest_preview_size`] |
//! | **How far must the stream turn?** | [`display_orientation`] |
//! | **Where does the frame go?** | [`layout_preview`] |
//!
//! None of these call each other. The [session](crate::session) facade
//! consults each one when its inputs change: size selection on open or
//! target change, orientation on open or display rotation, layout on
//! viewport or preview-shape change.

mod layout;
mod orientation;
mod selection;

pub use layout::{effective_preview, layout_preview, needs_relayout};
pub use orientation::{display_orientation, display_orientation_degrees};
pub use selection::{
    ASPECT_TOLERANCE, SelectionError, SelectionPolicy, closest_preview_size, optimal_preview_size,
    optimal_preview_size_with_tolerance, rank_by_closeness, target_distance,
};
