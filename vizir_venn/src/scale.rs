// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting a solution into a pixel box.

use kurbo::{Circle, Point};

use crate::solution::Solution;
use crate::trace::debug;

/// Scales and translates `solution` so its bounding box fits, centered, inside the
/// `width` × `height` box shrunk by `padding` on every side.
///
/// The scale is uniform, so overlap proportions are preserved. A bounding box with zero width
/// or height cannot be scaled; it is only moved to the center of the box. Applying the
/// function twice with the same arguments gives the same result as applying it once.
pub fn scale_solution(solution: &Solution, width: f64, height: f64, padding: f64) -> Solution {
    let Some(bounds) = solution.bounding_box() else {
        return Solution::new();
    };
    let inner_width = (width - 2.0 * padding).max(0.0);
    let inner_height = (height - 2.0 * padding).max(0.0);

    if bounds.width() == 0.0 || bounds.height() == 0.0 {
        debug!("not scaling solution: zero size bounding box {bounds:?}");
        let target = Point::new(padding + inner_width / 2.0, padding + inner_height / 2.0);
        let shift = target - bounds.center();
        return solution.map_circles(|c| Circle::new(c.center + shift, c.radius));
    }

    let scaling = (inner_width / bounds.width()).min(inner_height / bounds.height());
    let x_offset = padding + (inner_width - bounds.width() * scaling) / 2.0;
    let y_offset = padding + (inner_height - bounds.height() * scaling) / 2.0;
    solution.map_circles(|c| {
        Circle::new(
            (
                x_offset + (c.center.x - bounds.x0) * scaling,
                y_offset + (c.center.y - bounds.y0) * scaling,
            ),
            c.radius * scaling,
        )
    })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::Rect;

    use super::*;
    use crate::solution::VennCircle;

    fn sample() -> Solution {
        [
            VennCircle::new("A", (0.0, 0.0), 2.0),
            VennCircle::new("B", (2.5, 0.5), 1.0),
            VennCircle::new("C", (1.0, -1.5), 1.5),
        ]
        .into_iter()
        .collect()
    }

    fn assert_rect_close(a: Rect, b: Rect) {
        for (x, y) in [(a.x0, b.x0), (a.y0, b.y0), (a.x1, b.x1), (a.y1, b.y1)] {
            assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn fits_and_centers_in_the_padded_box() {
        let scaled = scale_solution(&sample(), 600.0, 350.0, 15.0);
        let bounds = scaled.bounding_box().unwrap();
        assert!(bounds.x0 >= 15.0 - 1e-9 && bounds.x1 <= 585.0 + 1e-9, "{bounds:?}");
        assert!(bounds.y0 >= 15.0 - 1e-9 && bounds.y1 <= 335.0 + 1e-9, "{bounds:?}");
        // The limiting dimension is filled exactly.
        assert!((bounds.height() - 320.0).abs() < 1e-9 || (bounds.width() - 570.0).abs() < 1e-9);
        let center = bounds.center();
        assert!((center.x - 300.0).abs() < 1e-9 && (center.y - 175.0).abs() < 1e-9);
    }

    #[test]
    fn scaling_is_uniform() {
        let original = sample();
        let scaled = scale_solution(&original, 400.0, 400.0, 10.0);
        let factor = scaled.get("A").unwrap().radius / original.get("A").unwrap().radius;
        for (a, b) in [("A", "B"), ("A", "C"), ("B", "C")] {
            let before = original.get(a).unwrap().center.distance(original.get(b).unwrap().center);
            let after = scaled.get(a).unwrap().center.distance(scaled.get(b).unwrap().center);
            assert!((after - before * factor).abs() < 1e-9);
        }
        for id in ["B", "C"] {
            let ratio = scaled.get(id).unwrap().radius / original.get(id).unwrap().radius;
            assert!((ratio - factor).abs() < 1e-12);
        }
    }

    #[test]
    fn scaling_twice_changes_nothing() {
        let once = scale_solution(&sample(), 300.0, 200.0, 5.0);
        let twice = scale_solution(&once, 300.0, 200.0, 5.0);
        assert_rect_close(once.bounding_box().unwrap(), twice.bounding_box().unwrap());
        for (a, b) in once.iter().zip(&twice) {
            assert!(a.circle.center.distance(b.circle.center) < 1e-9);
            assert!((a.circle.radius - b.circle.radius).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_extent_is_centered_without_scaling() {
        let point: Solution = [VennCircle::new("A", (3.0, 4.0), 0.0)].into_iter().collect();
        let scaled = scale_solution(&point, 600.0, 350.0, 15.0);
        assert_eq!(*scaled.get("A").unwrap(), Circle::new((300.0, 175.0), 0.0));
        assert!(scale_solution(&Solution::new(), 10.0, 10.0, 1.0).is_empty());
    }
}
