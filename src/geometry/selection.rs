//! Preview size selection against the sizes a camera reports.
//!
//! Two policies, for two situations:
//!
//! - [`optimal_preview_size`]: **aspect first**. Used when nobody asked for a
//!   particular resolution: keep the viewport's shape, then get as close as
//!   possible to its height.
//! - [`closest_preview_size`]: **combined distance**. Used after the user
//!   picked a target from the [catalog](crate::catalog): an exact match wins
//!   outright, otherwise area and ratio drift are averaged.
//!
//! Both return one of the given sizes, never a computed one.

use crate::types::Size;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Maximum `|ratio - target_ratio|` for a size to count as "same aspect".
pub const ASPECT_TOLERANCE: f64 = 0.1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no supported preview sizes to choose from")]
    EmptyCandidateList,
}

/// Which selection policy to apply.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Aspect ratio first, then nearest height.
    Optimal,
    /// Smallest combined area/ratio distance; exact match always wins.
    #[default]
    Closest,
}

impl SelectionPolicy {
    /// Run this policy. `tolerance` only affects [`SelectionPolicy::Optimal`].
    pub fn select(
        self,
        sizes: &[Size],
        target: Size,
        tolerance: f64,
    ) -> Result<Size, SelectionError> {
        match self {
            SelectionPolicy::Optimal => optimal_preview_size_with_tolerance(sizes, target, tolerance),
            SelectionPolicy::Closest => closest_preview_size(sizes, target),
        }
    }
}

/// Aspect-first selection with the default [`ASPECT_TOLERANCE`].
///
/// # Examples
/// ```
/// # use previewfit::geometry::optimal_preview_size;
/// # use previewfit::types::Size;
/// let supported: Vec<Size> = ["640x480", "1280x720", "1920x1080"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// // 16:9 target of height 800: both 16:9 sizes match the ratio, 720 is nearer
/// let best = optimal_preview_size(&supported, "1422x800".parse().unwrap()).unwrap();
/// assert_eq!(best.to_string(), "1280x720");
/// ```
pub fn optimal_preview_size(sizes: &[Size], target: Size) -> Result<Size, SelectionError> {
    optimal_preview_size_with_tolerance(sizes, target, ASPECT_TOLERANCE)
}

/// Aspect-first selection.
///
/// 1. Keep sizes whose ratio is within `tolerance` of the target's ratio.
/// 2. Among those, take the one with the nearest height.
/// 3. If none kept, take the nearest height over all sizes.
///
/// Height ties go to the size listed first.
pub fn optimal_preview_size_with_tolerance(
    sizes: &[Size],
    target: Size,
    tolerance: f64,
) -> Result<Size, SelectionError> {
    if sizes.is_empty() {
        return Err(SelectionError::EmptyCandidateList);
    }
    let target_ratio = target.ratio();
    let height_gap = |s: &&Size| s.height().abs_diff(target.height());

    let optimal = sizes
        .iter()
        .filter(|s| (s.ratio() - target_ratio).abs() <= tolerance)
        .min_by_key(height_gap)
        .or_else(|| sizes.iter().min_by_key(height_gap))
        .copied()
        .ok_or(SelectionError::EmptyCandidateList)?;

    log::debug!("Optimal preview size for {} is: {}", target, optimal);
    Ok(optimal)
}

/// How far `size` is from `target`: mean of the area drift and ratio drift.
///
/// `0.0` means same area and same ratio. Scale invariant: multiplying every
/// dimension by the same factor leaves the distance unchanged.
pub fn target_distance(size: Size, target: Size) -> f64 {
    let area_score = size.area() as f64 / target.area() as f64;
    let ratio_score = size.ratio() / target.ratio();
    ((1.0 - area_score).abs() + (1.0 - ratio_score).abs()) * 0.5
}

/// Order two candidates by closeness to `target`, best first.
fn compare_closeness(lhs: Size, rhs: Size, target: Size) -> Ordering {
    match (lhs == target, rhs == target) {
        (true, true) | (false, false) => {}
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
    }
    target_distance(lhs, target).total_cmp(&target_distance(rhs, target))
}

/// All sizes ranked by closeness to `target`, best first.
///
/// The sort is stable: sizes at equal distance keep their input order.
pub fn rank_by_closeness(sizes: &[Size], target: Size) -> Vec<Size> {
    let mut ranked = sizes.to_vec();
    ranked.sort_by(|a, b| compare_closeness(*a, *b, target));
    ranked
}

/// Combined-distance selection: the head of [`rank_by_closeness`].
pub fn closest_preview_size(sizes: &[Size], target: Size) -> Result<Size, SelectionError> {
    let ranked = rank_by_closeness(sizes, target);
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("Sorted to closest of {}:", target);
        for size in &ranked {
            log::debug!("- {}, r: {:.2}", size, size.ratio());
        }
    }
    let closest = ranked
        .first()
        .copied()
        .ok_or(SelectionError::EmptyCandidateList)?;
    log::debug!("Closest preview size of {} is: {}", target, closest);
    Ok(closest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(w: u32, h: u32) -> Size {
        Size::new(w, h).unwrap()
    }

    fn sizes(list: &[(u32, u32)]) -> Vec<Size> {
        list.iter().map(|&(w, h)| size(w, h)).collect()
    }

    // =========================================================================
    // optimal_preview_size tests
    // =========================================================================

    #[test]
    fn optimal_empty_list_fails() {
        assert_eq!(
            optimal_preview_size(&[], size(1280, 720)),
            Err(SelectionError::EmptyCandidateList)
        );
    }

    #[test]
    fn optimal_single_candidate_is_returned() {
        let only = sizes(&[(176, 144)]);
        assert_eq!(optimal_preview_size(&only, size(1920, 1080)), Ok(size(176, 144)));
    }

    #[test]
    fn optimal_prefers_matching_aspect_over_nearer_height() {
        // 4:3 at height 720 is nearer in height, but 16:9 wins the ratio filter
        let list = sizes(&[(960, 720), (1920, 1080)]);
        assert_eq!(optimal_preview_size(&list, size(1280, 720)), Ok(size(1920, 1080)));
    }

    #[test]
    fn optimal_picks_nearest_height_within_ratio() {
        let list = sizes(&[(1920, 1080), (640, 360), (1280, 720)]);
        assert_eq!(optimal_preview_size(&list, size(1024, 576)), Ok(size(1280, 720)));
    }

    #[test]
    fn optimal_falls_back_to_height_when_no_ratio_matches() {
        // Square target, no square-ish candidates
        let list = sizes(&[(1920, 1080), (640, 480), (1280, 720)]);
        assert_eq!(optimal_preview_size(&list, size(500, 500)), Ok(size(640, 480)));
    }

    #[test]
    fn optimal_height_ties_go_to_first_listed() {
        // Both 4:3 and 16:9 at height 480 pass a wide tolerance
        let list = sizes(&[(854, 480), (640, 480)]);
        assert_eq!(
            optimal_preview_size_with_tolerance(&list, size(700, 480), 1.0),
            Ok(size(854, 480))
        );
        let reversed = sizes(&[(640, 480), (854, 480)]);
        assert_eq!(
            optimal_preview_size_with_tolerance(&reversed, size(700, 480), 1.0),
            Ok(size(640, 480))
        );
    }

    #[test]
    fn optimal_tolerance_is_inclusive() {
        // 170x80 is 2.125, exactly 0.125 away from 2.0. If it were filtered
        // out, the height fallback would pick 100x100 instead.
        let list = sizes(&[(170, 80), (100, 100)]);
        assert_eq!(
            optimal_preview_size_with_tolerance(&list, size(200, 100), 0.125),
            Ok(size(170, 80))
        );
        assert_eq!(
            optimal_preview_size_with_tolerance(&list, size(200, 100), 0.1),
            Ok(size(100, 100))
        );
    }

    // =========================================================================
    // closest_preview_size tests
    // =========================================================================

    #[test]
    fn closest_empty_list_fails() {
        assert_eq!(
            closest_preview_size(&[], size(640, 480)),
            Err(SelectionError::EmptyCandidateList)
        );
    }

    #[test]
    fn closest_exact_match_wins() {
        let list = sizes(&[(1920, 1080), (1280, 720), (640, 480)]);
        assert_eq!(closest_preview_size(&list, size(640, 480)), Ok(size(640, 480)));
    }

    #[test]
    fn closest_by_combined_distance() {
        // 1280x720 target: 1440x810 is a closer area than 1920x1080,
        // 960x720 has the wrong ratio.
        let list = sizes(&[(1920, 1080), (960, 720), (1440, 810)]);
        assert_eq!(closest_preview_size(&list, size(1280, 720)), Ok(size(1440, 810)));
    }

    #[test]
    fn distance_is_zero_for_target() {
        assert_eq!(target_distance(size(1280, 720), size(1280, 720)), 0.0);
    }

    #[test]
    fn distance_of_same_ratio_half_area() {
        // 1280x720 vs 1920x1080: area 921600/2073600 = 0.444.., ratio 1
        let d = target_distance(size(1280, 720), size(1920, 1080));
        assert!((d - (1.0 - 921_600.0 / 2_073_600.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn rank_orders_best_first_and_keeps_all() {
        let list = sizes(&[(176, 144), (1920, 1080), (1280, 720), (640, 480)]);
        let ranked = rank_by_closeness(&list, size(1280, 720));
        assert_eq!(ranked.len(), list.len());
        assert_eq!(ranked[0], size(1280, 720));
        assert_eq!(ranked[3], size(176, 144));
    }

    #[test]
    fn rank_equal_distance_different_sizes_is_stable() {
        // Against 100x100: 150x100 -> area 1.5, ratio 1.5 -> d = 0.5
        //                  100x150 -> area 1.5, ratio 0.667 -> d = 0.4166
        //                  50x100  -> area 0.5, ratio 0.5 -> d = 0.5
        let target = size(100, 100);
        let list = sizes(&[(150, 100), (50, 100), (100, 150)]);
        assert_eq!(target_distance(list[0], target), target_distance(list[1], target));
        let ranked = rank_by_closeness(&list, target);
        assert_eq!(ranked, sizes(&[(100, 150), (150, 100), (50, 100)]));

        let flipped = sizes(&[(50, 100), (150, 100), (100, 150)]);
        let ranked = rank_by_closeness(&flipped, target);
        assert_eq!(ranked, sizes(&[(100, 150), (50, 100), (150, 100)]));
    }

    #[test]
    fn policy_dispatch() {
        let list = sizes(&[(960, 720), (1920, 1080)]);
        let target = size(1280, 720);
        assert_eq!(
            SelectionPolicy::Optimal.select(&list, target, ASPECT_TOLERANCE),
            Ok(size(1920, 1080))
        );
        // closest: 960x720 d = (|1-0.75| + |1-0.75|)/2 = 0.25
        //          1920x1080 d = (|1-2.25| + 0)/2 = 0.625
        assert_eq!(
            SelectionPolicy::Closest.select(&list, target, ASPECT_TOLERANCE),
            Ok(size(960, 720))
        );
    }

    #[test]
    fn policy_serde_lowercase() {
        let policy: SelectionPolicy = serde_json::from_str("\"optimal\"").unwrap();
        assert_eq!(policy, SelectionPolicy::Optimal);
        assert_eq!(SelectionPolicy::default(), SelectionPolicy::Closest);
    }
}
