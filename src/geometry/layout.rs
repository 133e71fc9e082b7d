//! Centered, aspect-preserving placement of the preview inside a viewport.

use crate::types::{Rect, Rotation, Size};

/// Place a preview of size `preview` inside `viewport`, centered and as
/// large as possible without distorting it.
///
/// Sensors stream in their own orientation; pass `rotated = true` when the
/// stream is turned by 90 or 270 degrees so the width and height are swapped
/// before fitting.
///
/// Exactly one axis fills the viewport. Halving uses truncating division, so
/// an odd leftover leaves a one-pixel asymmetry.
///
/// # Examples
/// ```
/// # use previewfit::geometry::layout_preview;
/// # use previewfit::types::{Rect, Size};
/// let viewport = Size::new(800, 600).unwrap();
/// let preview = Size::new(1920, 1080).unwrap();
/// // 16:9 in a 4:3 viewport: full width, letterboxed top and bottom
/// assert_eq!(layout_preview(viewport, preview, false), Rect::new(0, 75, 800, 525));
/// ```
pub fn layout_preview(viewport: Size, preview: Size, rotated: bool) -> Rect {
    let preview = if rotated { preview.swapped() } else { preview };

    let (vw, vh) = (viewport.width() as u64, viewport.height() as u64);
    let (pw, ph) = (preview.width() as u64, preview.height() as u64);

    if vw * ph > vh * pw {
        // Viewport is wider than the preview: fill the height
        let scaled_width = pw * vh / ph;
        log::debug!(
            "Height-constrained layout: preview {} (r{:.2}) inside {} (r{:.2})",
            preview,
            preview.ratio(),
            viewport,
            viewport.ratio()
        );
        Rect::new(
            ((vw - scaled_width) / 2) as u32,
            0,
            ((vw + scaled_width) / 2) as u32,
            vh as u32,
        )
    } else {
        // Viewport is taller than (or same shape as) the preview: fill the width
        let scaled_height = ph * vw / pw;
        log::debug!(
            "Width-constrained layout: preview {} (r{:.2}) inside {} (r{:.2})",
            preview,
            preview.ratio(),
            viewport,
            viewport.ratio()
        );
        Rect::new(
            0,
            ((vh - scaled_height) / 2) as u32,
            vw as u32,
            ((vh + scaled_height) / 2) as u32,
        )
    }
}

/// Preview dimensions as they appear after the stream rotation is applied.
pub fn effective_preview(preview: Size, rotation: Rotation) -> Size {
    if rotation.is_quarter_turn() {
        preview.swapped()
    } else {
        preview
    }
}

/// Whether a new layout is required.
///
/// `previous` is the `(viewport, effective_preview)` pair the last layout
/// was computed for. A new layout is needed when there was none, when the
/// viewport changed size, or when the preview changed shape. A preview that
/// only changed resolution at the same aspect ratio keeps its placement.
pub fn needs_relayout(previous: Option<(Size, Size)>, viewport: Size, effective: Size) -> bool {
    match previous {
        None => true,
        Some((last_viewport, last_effective)) => {
            last_viewport != viewport || !last_effective.same_aspect(effective)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(w: u32, h: u32) -> Size {
        Size::new(w, h).unwrap()
    }

    // =========================================================================
    // layout_preview tests
    // =========================================================================

    #[test]
    fn wide_preview_in_4_3_viewport_is_letterboxed() {
        // 800*1080 = 864000 <= 600*1920 = 1152000 -> width-constrained
        // scaled height = 1080*800/1920 = 450
        assert_eq!(
            layout_preview(size(800, 600), size(1920, 1080), false),
            Rect::new(0, 75, 800, 525)
        );
    }

    #[test]
    fn narrow_preview_in_wide_viewport_is_pillarboxed() {
        // 1000*720 = 720000 > 500*960 = 480000 -> height-constrained
        // scaled width = 960*500/720 = 666
        assert_eq!(
            layout_preview(size(1000, 500), size(960, 720), false),
            Rect::new(167, 0, 833, 500)
        );
    }

    #[test]
    fn rotated_preview_is_swapped_before_fitting() {
        // 1920x1080 rotated -> 1080x1920 in a 1080x1920 portrait screen: exact fill
        assert_eq!(
            layout_preview(size(1080, 1920), size(1920, 1080), true),
            Rect::new(0, 0, 1080, 1920)
        );
        // Same preview unrotated in the portrait screen: letterboxed
        // scaled height = 1080*1080/1920 = 607, top = (1920-607)/2 = 656
        assert_eq!(
            layout_preview(size(1080, 1920), size(1920, 1080), false),
            Rect::new(0, 656, 1080, 1263)
        );
    }

    #[test]
    fn same_aspect_fills_viewport() {
        assert_eq!(
            layout_preview(size(640, 360), size(1280, 720), false),
            Rect::new(0, 0, 640, 360)
        );
    }

    #[test]
    fn odd_leftover_truncates() {
        // scaled width = 100*101/100 = 101, leftover 200-101 = 99
        // left = 99/2 = 49, right = 301/2 = 150 -> width 101
        let rect = layout_preview(size(200, 101), size(100, 100), false);
        assert_eq!(rect, Rect::new(49, 0, 150, 101));
    }

    #[test]
    fn large_dimensions_do_not_overflow() {
        let rect = layout_preview(size(100_000, 100_000), size(80_000, 60_000), false);
        assert_eq!(rect, Rect::new(0, 12_500, 100_000, 87_500));
    }

    #[test]
    fn layout_is_contained_and_fills_one_axis() {
        let viewports = [size(800, 600), size(600, 800), size(1, 1), size(1366, 768), size(333, 777)];
        let previews = [size(1920, 1080), size(640, 480), size(176, 144), size(1088, 1088), size(1, 3)];
        for viewport in viewports {
            for preview in previews {
                for rotated in [false, true] {
                    let r = layout_preview(viewport, preview, rotated);
                    assert!(r.left <= r.right && r.top <= r.bottom);
                    assert!(r.right <= viewport.width() && r.bottom <= viewport.height());
                    assert!(
                        r.width() == viewport.width() || r.height() == viewport.height(),
                        "{viewport} / {preview} rotated={rotated}: {r}"
                    );
                }
            }
        }
    }

    #[test]
    fn layout_is_idempotent() {
        let a = layout_preview(size(1366, 768), size(640, 480), true);
        let b = layout_preview(size(1366, 768), size(640, 480), true);
        assert_eq!(a, b);
    }

    // =========================================================================
    // effective_preview / needs_relayout tests
    // =========================================================================

    #[test]
    fn effective_preview_swaps_on_quarter_turns() {
        let hd = size(1280, 720);
        assert_eq!(effective_preview(hd, Rotation::Deg0), hd);
        assert_eq!(effective_preview(hd, Rotation::Deg90), size(720, 1280));
        assert_eq!(effective_preview(hd, Rotation::Deg180), hd);
        assert_eq!(effective_preview(hd, Rotation::Deg270), size(720, 1280));
    }

    #[test]
    fn relayout_needed_first_time() {
        assert!(needs_relayout(None, size(800, 600), size(1280, 720)));
    }

    #[test]
    fn relayout_skipped_for_same_aspect_resolution_change() {
        let previous = Some((size(800, 600), size(1280, 720)));
        assert!(!needs_relayout(previous, size(800, 600), size(1920, 1080)));
    }

    #[test]
    fn relayout_on_viewport_or_shape_change() {
        let previous = Some((size(800, 600), size(1280, 720)));
        assert!(needs_relayout(previous, size(600, 800), size(1280, 720)));
        assert!(needs_relayout(previous, size(800, 600), size(640, 480)));
        assert!(needs_relayout(previous, size(800, 600), size(720, 1280)));
    }
}
