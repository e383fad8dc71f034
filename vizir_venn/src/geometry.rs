// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circle/circle intersection geometry.
//!
//! The mutual intersection of `n` circles is measured as a polygon through the intersection
//! points that lie inside every circle, plus one circular segment per boundary arc. Each
//! polygon edge is classified by which circle (if any) contributes the arc bounding it; the
//! innermost candidate wins.

extern crate alloc;

use alloc::vec::Vec;
use core::f64::consts::{PI, TAU};

use kurbo::{Circle, Point, Rect};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Slack used for containment and tangency tests.
pub(crate) const SMALL: f64 = 1e-10;

/// Area of the circular segment of width `width` cut off a circle of radius `radius`.
pub fn circle_segment_area(radius: f64, width: f64) -> f64 {
    let cos = (1.0 - width / radius).clamp(-1.0, 1.0);
    let half_chord = (width * (2.0 * radius - width)).max(0.0).sqrt();
    radius * radius * cos.acos() - (radius - width) * half_chord
}

/// Overlap area of two circles with radii `r1`, `r2` whose centers are `distance` apart.
pub fn circle_overlap(r1: f64, r2: f64, distance: f64) -> f64 {
    if distance >= r1 + r2 {
        return 0.0;
    }
    if distance <= (r1 - r2).abs() {
        let r = r1.min(r2);
        return PI * r * r;
    }
    let w1 = r1 - (distance * distance - r2 * r2 + r1 * r1) / (2.0 * distance);
    let w2 = r2 - (distance * distance - r1 * r1 + r2 * r2) / (2.0 * distance);
    circle_segment_area(r1, w1) + circle_segment_area(r2, w2)
}

/// Returns the two crossing points of the circles' outlines.
///
/// Returns `None` for disjoint, contained, tangent or concentric circles.
pub fn circle_circle_intersection(a: &Circle, b: &Circle) -> Option<[Point; 2]> {
    let d = a.center.distance(b.center);
    let (r1, r2) = (a.radius, b.radius);
    if d >= r1 + r2 || d <= (r1 - r2).abs() {
        return None;
    }
    let along = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h = (r1 * r1 - along * along).max(0.0).sqrt();
    let delta = b.center - a.center;
    let base = a.center + delta * (along / d);
    let rx = -delta.y * (h / d);
    let ry = -delta.x * (h / d);
    Some([
        Point::new(base.x + rx, base.y - ry),
        Point::new(base.x - rx, base.y + ry),
    ])
}

/// A crossing point of two circle outlines, tagged with the indices of both circles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionPoint {
    /// Location.
    pub point: Point,
    /// Indices of the two circles whose outlines cross here.
    pub parents: [usize; 2],
}

/// Returns every pairwise outline crossing among `circles`.
pub fn intersection_points(circles: &[Circle]) -> Vec<IntersectionPoint> {
    let mut out = Vec::new();
    for i in 0..circles.len() {
        for j in i + 1..circles.len() {
            if let Some(points) = circle_circle_intersection(&circles[i], &circles[j]) {
                out.extend(points.into_iter().map(|point| IntersectionPoint {
                    point,
                    parents: [i, j],
                }));
            }
        }
    }
    out
}

/// Returns `true` if `point` lies inside (or on) every circle.
pub fn contained_in_circles(point: Point, circles: &[Circle]) -> bool {
    circles
        .iter()
        .all(|c| point.distance(c.center) <= c.radius + SMALL)
}

/// Average of `points`; the origin when there are none.
pub fn centroid(points: impl IntoIterator<Item = Point>) -> Point {
    let mut sum = Point::ZERO;
    let mut n = 0_usize;
    for p in points {
        sum.x += p.x;
        sum.y += p.y;
        n += 1;
    }
    if n == 0 {
        return Point::ZERO;
    }
    Point::new(sum.x / n as f64, sum.y / n as f64)
}

/// Bounding box of a set of circles, or `None` when there are none.
pub fn bounding_box(circles: impl IntoIterator<Item = Circle>) -> Option<Rect> {
    circles
        .into_iter()
        .map(|c| {
            Rect::new(
                c.center.x - c.radius,
                c.center.y - c.radius,
                c.center.x + c.radius,
                c.center.y + c.radius,
            )
        })
        .reduce(|a, b| a.union(b))
}

/// Which circle bounds the region along one polygon edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeSource {
    /// The edge is spanned by an arc of circle `index`; `width` is the arc's sagitta.
    Circle {
        /// Index of the circle.
        index: usize,
        /// Distance from the chord midpoint to the arc midpoint.
        width: f64,
    },
    /// The two points share no circle; the edge is skipped.
    None,
}

/// Classifies the polygon edge running from `from` to `to`.
///
/// Among the circles both points lie on, the one whose arc stays closest to the chord is the
/// one actually bounding the intersection.
pub fn classify_edge(
    circles: &[Circle],
    from: &IntersectionPoint,
    to: &IntersectionPoint,
) -> EdgeSource {
    let chord_mid = from.point.midpoint(to.point);
    let mut best = EdgeSource::None;
    for &index in &to.parents {
        if !from.parents.contains(&index) {
            continue;
        }
        let circle = circles[index];
        let c = circle.center;
        let a1 = (to.point.x - c.x).atan2(to.point.y - c.y);
        let a2 = (from.point.x - c.x).atan2(from.point.y - c.y);
        let mut sweep = a2 - a1;
        if sweep < 0.0 {
            sweep += TAU;
        }
        let mid_angle = a2 - sweep / 2.0;
        let arc_mid = Point::new(
            c.x + circle.radius * mid_angle.sin(),
            c.y + circle.radius * mid_angle.cos(),
        );
        let width = chord_mid.distance(arc_mid).min(circle.radius * 2.0);
        let better = match best {
            EdgeSource::None => true,
            EdgeSource::Circle { width: current, .. } => current > width,
        };
        if better {
            best = EdgeSource::Circle { index, width };
        }
    }
    best
}

/// One arc of an intersection region's outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryArc {
    /// Index of the circle the arc belongs to.
    pub circle: usize,
    /// Sagitta of the arc (larger than the radius for a major arc).
    pub width: f64,
    /// Arc start point.
    pub start: Point,
    /// Arc end point.
    pub end: Point,
}

/// Outline of the region common to a group of circles.
#[derive(Clone, Debug, PartialEq)]
pub enum Boundary {
    /// The circles have no common region.
    Empty,
    /// The region is the whole disc of circle `index`.
    Disc(usize),
    /// The region is bounded by a closed chain of arcs.
    Arcs(Vec<BoundaryArc>),
}

/// Detailed measurements of an intersection region.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionStats {
    /// Total area (`arc_area + polygon_area`).
    pub area: f64,
    /// Sum of the circular segment areas.
    pub arc_area: f64,
    /// Area of the polygon through the inner points.
    pub polygon_area: f64,
    /// Region outline.
    pub boundary: Boundary,
    /// Crossing points inside every circle, in boundary order.
    pub inner_points: Vec<IntersectionPoint>,
    /// All pairwise crossing points.
    pub intersection_points: Vec<IntersectionPoint>,
}

/// Area of the region common to every circle in `circles`.
pub fn intersection_area(circles: &[Circle]) -> f64 {
    intersection_stats(circles).area
}

/// Measures the region common to every circle in `circles`.
pub fn intersection_stats(circles: &[Circle]) -> IntersectionStats {
    let intersection_points = intersection_points(circles);
    let mut inner_points: Vec<IntersectionPoint> = intersection_points
        .iter()
        .copied()
        .filter(|p| contained_in_circles(p.point, circles))
        .collect();

    let mut arc_area = 0.0;
    let mut polygon_area = 0.0;
    let boundary;

    if inner_points.len() > 1 {
        let center = centroid(inner_points.iter().map(|p| p.point));
        let angle = |p: &IntersectionPoint| (p.point.x - center.x).atan2(p.point.y - center.y);
        inner_points.sort_by(|a, b| angle(b).total_cmp(&angle(a)));

        let mut arcs = Vec::new();
        let mut from = &inner_points[inner_points.len() - 1];
        for to in &inner_points {
            polygon_area += (from.point.x + to.point.x) * (to.point.y - from.point.y);
            if let EdgeSource::Circle { index, width } = classify_edge(circles, from, to) {
                arc_area += circle_segment_area(circles[index].radius, width);
                arcs.push(BoundaryArc {
                    circle: index,
                    width,
                    start: from.point,
                    end: to.point,
                });
                from = to;
            }
        }
        boundary = match arcs.len() {
            0 => Boundary::Empty,
            1 => Boundary::Disc(arcs[0].circle),
            _ => Boundary::Arcs(arcs),
        };
    } else if let Some(smallest) = smallest_circle(circles) {
        let inner = circles[smallest];
        let disjoint = circles
            .iter()
            .any(|c| c.center.distance(inner.center) > (inner.radius - c.radius).abs());
        if disjoint {
            boundary = Boundary::Empty;
        } else {
            arc_area = PI * inner.radius * inner.radius;
            boundary = Boundary::Disc(smallest);
        }
    } else {
        boundary = Boundary::Empty;
    }

    polygon_area /= 2.0;
    IntersectionStats {
        area: arc_area + polygon_area,
        arc_area,
        polygon_area,
        boundary,
        inner_points,
        intersection_points,
    }
}

fn smallest_circle(circles: &[Circle]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, c) in circles.iter().enumerate() {
        match best {
            Some(b) if circles[b].radius <= c.radius => {}
            _ => best = Some(i),
        }
    }
    best
}
