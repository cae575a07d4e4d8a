use crate::diff::AlignmentPoint;

/// Map a scroll offset in one pane to the matching offset in the other.
///
/// The source offset is converted to a fractional line, located between two
/// consecutive alignment points, and linearly interpolated onto the target
/// side. Offsets outside every segment fall back to a proportional mapping.
/// The result is always finite and non-negative; callers clamp it to the
/// target pane's range.
pub fn calculate_target_scroll(
    source_scroll_top: f64,
    source_scrollable_height: f64,
    target_scrollable_height: f64,
    alignment: &[AlignmentPoint],
    line_height: f64,
    source_is_left: bool,
) -> f64 {
    let interpolated = if line_height > 0.0 && source_scroll_top.is_finite() {
        interpolate(source_scroll_top / line_height, alignment, source_is_left)
            .map(|target_line| target_line * line_height)
    } else {
        None
    };

    let target = interpolated.unwrap_or_else(|| {
        proportional(
            source_scroll_top,
            source_scrollable_height,
            target_scrollable_height,
        )
    });

    if target.is_finite() {
        target.max(0.0)
    } else {
        0.0
    }
}

fn interpolate(source_line: f64, alignment: &[AlignmentPoint], source_is_left: bool) -> Option<f64> {
    alignment.windows(2).find_map(|pair| {
        let (prev, next) = (pair[0], pair[1]);
        let prev_src = prev.coord(source_is_left) as f64;
        let next_src = next.coord(source_is_left) as f64;
        if source_line < prev_src || source_line >= next_src {
            return None;
        }

        let prev_tgt = prev.coord(!source_is_left) as f64;
        let next_tgt = next.coord(!source_is_left) as f64;
        let span = next_src - prev_src;
        if span <= 0.0 {
            return Some(prev_tgt);
        }
        let t = (source_line - prev_src) / span;
        Some(prev_tgt + t * (next_tgt - prev_tgt))
    })
}

fn proportional(source_scroll_top: f64, source_scrollable: f64, target_scrollable: f64) -> f64 {
    let ratio = source_scroll_top / (source_scrollable - 1.0).max(1.0);
    ratio * target_scrollable
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn points(raw: &[(usize, usize)]) -> Vec<AlignmentPoint> {
        raw.iter().map(|&(l, r)| AlignmentPoint::new(l, r)).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_interpolates_inside_change() {
        // Left lines 1..3 replaced by right lines 1..7.
        let alignment = points(&[(0, 0), (1, 1), (3, 7), (5, 9)]);
        // Halfway through the left change lands halfway through the right one.
        let target = calculate_target_scroll(2.0, 100.0, 100.0, &alignment, 1.0, true);
        assert!(approx(target, 4.0));
        // And back.
        let back = calculate_target_scroll(4.0, 100.0, 100.0, &alignment, 1.0, false);
        assert!(approx(back, 2.0));
    }

    #[test]
    fn test_line_height_scales() {
        let alignment = points(&[(0, 0), (2, 4)]);
        let target = calculate_target_scroll(20.0, 100.0, 100.0, &alignment, 20.0, true);
        assert!(approx(target, 40.0));
    }

    #[test]
    fn test_zero_width_source_segment_snaps() {
        // Pure insertion on the right: the left coordinate does not advance.
        let alignment = points(&[(0, 0), (0, 5), (3, 8)]);
        let target = calculate_target_scroll(0.0, 10.0, 10.0, &alignment, 1.0, true);
        // The first matching segment is (0,5)->(3,8) because (0,0)->(0,5)
        // has no left width to contain the line.
        assert!(approx(target, 5.0));
    }

    #[test]
    fn test_out_of_range_is_proportional() {
        let alignment = points(&[(0, 0), (10, 20)]);
        let target = calculate_target_scroll(10.0, 11.0, 40.0, &alignment, 1.0, true);
        assert!(approx(target, 40.0));
    }

    #[test]
    fn test_empty_alignment_is_proportional() {
        let target = calculate_target_scroll(5.0, 11.0, 20.0, &[], 1.0, false);
        assert!(approx(target, 10.0));
    }

    #[test]
    fn test_degenerate_inputs_never_panic() {
        let alignment = points(&[(0, 0), (4, 4)]);
        for (top, lh, src, tgt) in [
            (f64::NAN, 1.0, 10.0, 10.0),
            (f64::INFINITY, 1.0, 10.0, 10.0),
            (3.0, 0.0, 10.0, 10.0),
            (3.0, -1.0, 0.0, 10.0),
            (-5.0, 1.0, 0.0, 0.0),
        ] {
            let v = calculate_target_scroll(top, src, tgt, &alignment, lh, true);
            assert!(v.is_finite());
            assert!(v >= 0.0);
        }
    }

    proptest! {
        /// Without changes every alignment segment is diagonal, so mapping a
        /// position across and back lands where it started.
        #[test]
        fn prop_identity_round_trip(
            len in 1usize..200,
            frac in 0.0f64..1.0,
            lh in 1.0f64..40.0,
            source_is_left in any::<bool>(),
        ) {
            let alignment: Vec<_> = (0..=len).map(|i| AlignmentPoint::new(i, i)).collect();
            let scrollable = len as f64 * lh;
            let top = frac * len as f64 * lh;

            let target = calculate_target_scroll(top, scrollable, scrollable, &alignment, lh, source_is_left);
            prop_assert!((target - top).abs() < 1e-6);
            let back = calculate_target_scroll(target, scrollable, scrollable, &alignment, lh, !source_is_left);
            prop_assert!((back - top).abs() < 1e-6);
        }

        #[test]
        fn prop_result_is_finite_and_non_negative(
            top in any::<f64>(),
            src in any::<f64>(),
            tgt in -1e6f64..1e6,
            lh in any::<f64>(),
        ) {
            let alignment = points(&[(0, 0), (3, 7), (9, 9)]);
            let v = calculate_target_scroll(top, src, tgt, &alignment, lh, true);
            prop_assert!(v.is_finite());
            prop_assert!(v >= 0.0);
        }
    }
}
