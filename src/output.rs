//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Catalog
//!
//! ```text
//! 001 1920x1080 r:1.78
//! 002 1440x1080 r:1.33
//! ...
//! ```
//!
//! ## Select
//!
//! ```text
//! Target 1280x720 (closest), ranked by closeness
//!     001 1280x720, r: 1.78  <- selected
//!     002 640x480, r: 1.33
//! ```
//!
//! ## Plan
//!
//! ```text
//! Camera 0 (back, sensor 90)
//!     Supported: 1920x1080, 1280x720, 640x480
//!     Capture: 1920x1080 r:1.78
//!     Rotation: 90
//!     Viewport: 1080x1920
//!     Placement: (0,0)-(1080,1920) 1080x1920
//! State: previewing
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.

use crate::catalog::Resolution;
use crate::geometry::SelectionPolicy;
use crate::session::SessionState;
use crate::types::{Facing, Rect, Rotation, Size};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn size_with_ratio(size: Size) -> String {
    format!("{}, r: {:.2}", size, size.ratio())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Format the resolution catalog as a numbered menu, marking `current`.
pub fn format_catalog(current: Option<Size>) -> Vec<String> {
    Resolution::ALL
        .iter()
        .enumerate()
        .map(|(i, resolution)| {
            let marker = if current == Some(resolution.size()) {
                "  (current)"
            } else {
                ""
            };
            format!("{} {}{}", format_index(i + 1), resolution, marker)
        })
        .collect()
}

pub fn print_catalog(current: Option<Size>) {
    print_lines(format_catalog(current));
}

// ============================================================================
// Select
// ============================================================================

/// Format a selection result.
///
/// With `ranked`, `candidates` are expected in closeness order and the header
/// says so, whatever policy made the choice. The chosen size is marked either way.
pub fn format_selection(
    target: Size,
    policy: SelectionPolicy,
    candidates: &[Size],
    chosen: Size,
    ranked: bool,
) -> Vec<String> {
    let policy_name = match policy {
        SelectionPolicy::Optimal => "optimal",
        SelectionPolicy::Closest => "closest",
    };
    let mut header = format!("Target {} ({})", target, policy_name);
    if ranked {
        header.push_str(", ranked by closeness");
    }
    let mut lines = vec![header];
    let mut marked = false;
    for (i, size) in candidates.iter().enumerate() {
        let marker = if *size == chosen && !marked {
            marked = true;
            "  <- selected"
        } else {
            ""
        };
        lines.push(format!(
            "{}{} {}{}",
            indent(1),
            format_index(i + 1),
            size_with_ratio(*size),
            marker
        ));
    }
    lines
}

pub fn print_selection(
    target: Size,
    policy: SelectionPolicy,
    candidates: &[Size],
    chosen: Size,
    ranked: bool,
) {
    print_lines(format_selection(target, policy, candidates, chosen, ranked));
}

// ============================================================================
// Orient / Layout
// ============================================================================

pub fn format_orientation(
    display: Rotation,
    sensor: Rotation,
    facing: Facing,
    result: Rotation,
) -> Vec<String> {
    vec![
        format!("Display {}, sensor {} ({})", display, sensor, facing),
        format!("{}Rotate stream: {}", indent(1), result),
    ]
}

pub fn print_orientation(display: Rotation, sensor: Rotation, facing: Facing, result: Rotation) {
    print_lines(format_orientation(display, sensor, facing, result));
}

fn placement_line(rect: Rect) -> String {
    format!("{} {}x{}", rect, rect.width(), rect.height())
}

pub fn format_layout(viewport: Size, preview: Size, rotated: bool, rect: Rect) -> Vec<String> {
    let shown = if rotated { preview.swapped() } else { preview };
    vec![
        format!("Preview {} in viewport {}", shown, viewport),
        format!("{}Placement: {}", indent(1), placement_line(rect)),
    ]
}

pub fn print_layout(viewport: Size, preview: Size, rotated: bool, rect: Rect) {
    print_lines(format_layout(viewport, preview, rotated, rect));
}

// ============================================================================
// Plan
// ============================================================================

/// Format a session after it has been driven through a plan.
pub fn format_session(state: &SessionState, target: Option<Size>) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(camera) = state.camera() {
        lines.push(format!(
            "Camera {} ({}, sensor {})",
            camera.index, camera.info.facing, camera.info.orientation
        ));
        let supported: Vec<String> = camera.supported.iter().map(|s| s.to_string()).collect();
        lines.push(format!("{}Supported: {}", indent(1), supported.join(", ")));
        if let Some(target) = target {
            lines.push(format!("{}Target: {}", indent(1), target));
        }
        lines.push(format!(
            "{}Capture: {} r:{:.2}",
            indent(1),
            camera.capture,
            camera.capture.ratio()
        ));
        lines.push(format!("{}Rotation: {}", indent(1), camera.rotation));
    }
    if let SessionState::Previewing {
        viewport,
        placement,
        ..
    } = state
    {
        lines.push(format!("{}Viewport: {}", indent(1), viewport));
        lines.push(format!("{}Placement: {}", indent(1), placement_line(*placement)));
    }
    lines.push(format!("State: {}", state.name()));
    lines
}

pub fn print_session(state: &SessionState, target: Option<Size>) {
    print_lines(format_session(state, target));
}
