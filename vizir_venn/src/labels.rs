// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label anchor placement.
//!
//! The anchor of a region is the point that maximises the distance to the region's border:
//! inside every circle of the combination and outside every other circle. Circles that
//! enclose one of the combination's sets are ignored, since a label for a subset has to sit
//! inside its superset anyway.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Circle, Point};

use crate::data::{SetDatum, set_key};
use crate::geometry::{Boundary, SMALL, centroid, intersection_stats};
use crate::nelder_mead::NelderMead;
use crate::solution::Solution;
use crate::trace::{debug, warn};

/// Anchor used for regions that have no area on screen.
pub const DISJOINT_ANCHOR: Point = Point::new(0.0, -1000.0);

/// A label anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextCentre {
    /// Anchor position, in the coordinate space of the solution it was computed from.
    pub point: Point,
    /// `true` when the region does not exist in the layout; `point` is then
    /// [`DISJOINT_ANCHOR`].
    pub disjoint: bool,
}

impl TextCentre {
    fn at(point: Point) -> Self {
        Self {
            point,
            disjoint: false,
        }
    }
}

/// Label anchors keyed by set combination.
///
/// Keys are the set lists themselves, so a set whose id contains
/// [`SET_ID_DELIMITER`](crate::SET_ID_DELIMITER) never shares an anchor with an intersection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextCentres {
    centres: HashMap<Vec<String>, TextCentre>,
}

impl TextCentres {
    /// Looks up the anchor for a set combination.
    pub fn get<S: AsRef<str>>(&self, sets: &[S]) -> Option<&TextCentre> {
        let key: Vec<String> = sets.iter().map(|s| String::from(s.as_ref())).collect();
        self.centres.get(&key)
    }

    /// Returns the anchor for a set combination.
    ///
    /// # Panics
    ///
    /// Panics if no anchor was computed for `sets`. Anchors exist for exactly the records
    /// passed to [`compute_text_centres`], so a miss is a bug in the caller.
    pub fn centre<S: AsRef<str>>(&self, sets: &[S]) -> TextCentre {
        match self.get(sets) {
            Some(centre) => *centre,
            None => panic!("no text centre for {}", set_key(sets)),
        }
    }

    /// Number of anchors.
    pub fn len(&self) -> usize {
        self.centres.len()
    }

    /// Returns `true` when there are no anchors.
    pub fn is_empty(&self) -> bool {
        self.centres.is_empty()
    }

    /// Iterates `(sets, anchor)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&[String], &TextCentre)> {
        self.centres.iter().map(|(k, v)| (k.as_slice(), v))
    }
}

/// Computes an anchor for every record in `data`.
///
/// Records naming a set that is not in `solution` are skipped.
pub fn compute_text_centres(solution: &Solution, data: &[SetDatum]) -> TextCentres {
    let circles = solution.circles();
    let enclosing = overlapping_circles(solution);
    let mut centres = HashMap::new();

    for datum in data {
        let members: Option<Vec<usize>> = datum
            .sets
            .iter()
            .map(|id| circles.iter().position(|c| &c.id == id))
            .collect();
        let Some(members) = members else {
            debug!("no circles for {:?}, skipping its label", datum.sets);
            continue;
        };

        let interior: Vec<Circle> = members.iter().map(|&i| circles[i].circle).collect();
        let exterior: Vec<Circle> = (0..circles.len())
            .filter(|i| !members.contains(i))
            .filter(|i| !members.iter().any(|&m| enclosing[m].contains(i)))
            .map(|i| circles[i].circle)
            .collect();

        let centre = compute_text_centre(&interior, &exterior);
        if centre.disjoint && datum.size > 0.0 {
            warn!("area {} not represented on screen", datum.set_id());
        }
        centres.insert(datum.sets.clone(), centre);
    }
    TextCentres { centres }
}

/// For every circle of `solution` (by index), the indices of the circles that enclose it.
pub fn overlapping_circles(solution: &Solution) -> Vec<Vec<usize>> {
    let circles = solution.circles();
    let mut enclosing = alloc::vec![Vec::new(); circles.len()];
    for i in 0..circles.len() {
        let a = circles[i].circle;
        for j in i + 1..circles.len() {
            let b = circles[j].circle;
            let d = a.center.distance(b.center);
            if d + b.radius <= a.radius + SMALL {
                enclosing[j].push(i);
            } else if d + a.radius <= b.radius + SMALL {
                enclosing[i].push(j);
            }
        }
    }
    enclosing
}

/// Distance from `point` to the border of the region inside every `interior` circle and
/// outside every `exterior` circle; negative when `point` is not in the region.
pub fn circle_margin(point: Point, interior: &[Circle], exterior: &[Circle]) -> f64 {
    let inside = interior
        .iter()
        .map(|c| c.radius - point.distance(c.center));
    let outside = exterior
        .iter()
        .map(|c| point.distance(c.center) - c.radius);
    inside.chain(outside).fold(f64::INFINITY, f64::min)
}

/// Finds the anchor of the region inside every `interior` circle and outside every
/// `exterior` circle.
///
/// The best of a few sample points is refined by maximising [`circle_margin`]. If the result
/// is not in the region the fallbacks are, in order: the circle center (one interior circle),
/// [`DISJOINT_ANCHOR`] (no common region), the center of the circle forming the whole region,
/// the anchor ignoring `exterior`, and the centroid of the region's arc endpoints.
pub fn compute_text_centre(interior: &[Circle], exterior: &[Circle]) -> TextCentre {
    let samples = interior.iter().flat_map(|c| {
        let (p, h) = (c.center, c.radius / 2.0);
        [
            p,
            Point::new(p.x + h, p.y),
            Point::new(p.x - h, p.y),
            Point::new(p.x, p.y + h),
            Point::new(p.x, p.y - h),
        ]
    });
    let mut initial: Option<(Point, f64)> = None;
    for sample in samples {
        let margin = circle_margin(sample, interior, exterior);
        if initial.is_none_or(|(_, best)| margin >= best) {
            initial = Some((sample, margin));
        }
    }
    let Some((initial, _)) = initial else {
        return TextCentre {
            point: DISJOINT_ANCHOR,
            disjoint: true,
        };
    };

    let fit = NelderMead::new()
        .with_max_iterations(500)
        .with_tolerances(1e-10, 1e-10)
        .minimize(
            |p: &[f64]| -circle_margin(Point::new(p[0], p[1]), interior, exterior),
            &[initial.x, initial.y],
        );
    let point = Point::new(fit.x[0], fit.x[1]);

    let valid = interior.iter().all(|c| point.distance(c.center) <= c.radius)
        && exterior.iter().all(|c| point.distance(c.center) >= c.radius);
    if valid {
        return TextCentre::at(point);
    }

    if let [only] = interior {
        return TextCentre::at(only.center);
    }
    match intersection_stats(interior).boundary {
        Boundary::Empty => TextCentre {
            point: DISJOINT_ANCHOR,
            disjoint: true,
        },
        Boundary::Disc(index) => TextCentre::at(interior[index].center),
        Boundary::Arcs(_) if !exterior.is_empty() => compute_text_centre(interior, &[]),
        Boundary::Arcs(arcs) => TextCentre::at(centroid(arcs.iter().map(|a| a.start))),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::solution::VennCircle;

    fn solution(circles: &[(&str, f64, f64, f64)]) -> Solution {
        circles
            .iter()
            .map(|&(id, x, y, r)| VennCircle::new(id, (x, y), r))
            .collect()
    }

    fn inside(p: Point, c: &Circle) -> bool {
        p.distance(c.center) < c.radius
    }

    #[test]
    fn single_circle_anchor_is_its_center() {
        let centre = compute_text_centre(&[Circle::new((3.0, 4.0), 2.0)], &[]);
        assert!(!centre.disjoint);
        assert!(centre.point.distance(Point::new(3.0, 4.0)) < 1e-4, "{centre:?}");
    }

    #[test]
    fn crescent_and_lens_anchors_stay_in_their_regions() {
        let s = solution(&[("A", 0.0, 0.0, 2.0), ("B", 1.5, 0.0, 2.0)]);
        let data = [
            SetDatum::new(["A"], 1.0),
            SetDatum::new(["B"], 1.0),
            SetDatum::new(["A", "B"], 1.0),
        ];
        let centres = compute_text_centres(&s, &data);
        assert_eq!(centres.len(), 3);
        let (a, b) = (*s.get("A").unwrap(), *s.get("B").unwrap());

        let only_a = centres.centre(&["A"]).point;
        assert!(inside(only_a, &a) && !inside(only_a, &b), "{only_a:?}");
        let only_b = centres.centre(&["B"]).point;
        assert!(inside(only_b, &b) && !inside(only_b, &a), "{only_b:?}");
        let both = centres.centre(&["A", "B"]).point;
        assert!(inside(both, &a) && inside(both, &b), "{both:?}");
    }

    #[test]
    fn subset_label_ignores_its_superset() {
        let s = solution(&[("A", 0.0, 0.0, 5.0), ("B", 1.0, 0.0, 1.0)]);
        assert_eq!(overlapping_circles(&s), [vec![], vec![0]]);
        let data = [SetDatum::new(["A"], 1.0), SetDatum::new(["B"], 1.0)];
        let centres = compute_text_centres(&s, &data);
        let b = centres.centre(&["B"]).point;
        assert!(b.distance(Point::new(1.0, 0.0)) < 1e-3, "{b:?}");
        let a = centres.centre(&["A"]).point;
        assert!(inside(a, s.get("A").unwrap()) && !inside(a, s.get("B").unwrap()));
    }

    #[test]
    fn missing_region_is_flagged() {
        let s = solution(&[("A", 0.0, 0.0, 1.0), ("B", 10.0, 0.0, 1.0)]);
        let centres = compute_text_centres(&s, &[SetDatum::new(["A", "B"], 2.0)]);
        let centre = centres.centre(&["A", "B"]);
        assert!(centre.disjoint);
        assert_eq!(centre.point, DISJOINT_ANCHOR);
    }

    #[test]
    fn margin_is_signed_distance_to_the_border() {
        let interior = [Circle::new((0.0, 0.0), 2.0)];
        let exterior = [Circle::new((3.0, 0.0), 2.0)];
        assert_eq!(circle_margin(Point::ZERO, &interior, &[]), 2.0);
        assert_eq!(circle_margin(Point::ZERO, &interior, &exterior), 1.0);
        assert!(circle_margin(Point::new(2.0, 0.0), &interior, &exterior) < 0.0);
    }

    #[test]
    fn unknown_sets_are_skipped() {
        let s = solution(&[("A", 0.0, 0.0, 1.0)]);
        let centres = compute_text_centres(&s, &[SetDatum::new(["Z"], 1.0)]);
        assert!(centres.is_empty());
        assert!(centres.get(&["Z"]).is_none());
    }

    #[test]
    fn delimiter_in_a_set_id_does_not_share_the_intersection_anchor() {
        let s = solution(&[
            ("A", 0.0, 0.0, 2.0),
            ("B", 1.5, 0.0, 2.0),
            ("A∩B", 20.0, 0.0, 2.0),
        ]);
        let data = [
            SetDatum::new(["A"], 1.0),
            SetDatum::new(["B"], 1.0),
            SetDatum::new(["A∩B"], 1.0),
            SetDatum::new(["A", "B"], 1.0),
        ];
        let centres = compute_text_centres(&s, &data);
        assert_eq!(centres.len(), 4);
        let joined = centres.centre(&["A∩B"]).point;
        assert!(inside(joined, s.get("A∩B").unwrap()), "{joined:?}");
        let lens = centres.centre(&["A", "B"]).point;
        assert!(inside(lens, s.get("A").unwrap()) && inside(lens, s.get("B").unwrap()));
        assert_ne!(joined, lens);
    }

    #[test]
    #[should_panic(expected = "no text centre for A∩B")]
    fn missing_centre_is_a_bug() {
        TextCentres::default().centre(&["A", "B"]);
    }
}
