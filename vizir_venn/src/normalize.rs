//! Canonical orientation of solver output.
//!
//! The loss is invariant under rotation, reflection and translation, so two runs on similar
//! data can return visually unrelated layouts. [`normalize_solution`] fixes those degrees of
//! freedom with one rigid motion of the whole solution. [`pack_clusters`] goes further: it
//! orients every cluster of overlapping circles on its own and packs the clusters next to each
//! other, which changes distances between clusters.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::f64::consts::{PI, TAU};

use kurbo::{Point, Rect, Vec2};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::geometry::{SMALL, bounding_box};
use crate::solution::{Solution, VennCircle};

/// Normalises `solution`, anchoring on the largest circles.
///
/// See [`normalize_solution_by`].
pub fn normalize_solution(solution: &Solution, orientation: f64) -> Solution {
    normalize_solution_by(solution, orientation, larger_first)
}

/// Rotates and reflects `solution` into a canonical placement.
///
/// The first circle in `compare` order moves to the origin, the solution is rotated so that the
/// second circle lies at angle `orientation` (measured as `atan2(x, y)`), and mirrored across
/// that direction if needed so that the third circle lies within half a turn of it. The whole
/// solution moves as one rigid body: every radius and every pairwise center distance is
/// unchanged. Output circles keep the order of `solution`.
pub fn normalize_solution_by(
    solution: &Solution,
    orientation: f64,
    mut compare: impl FnMut(&VennCircle, &VennCircle) -> Ordering,
) -> Solution {
    let mut members: Members = solution.iter().cloned().enumerate().collect();
    anchor(&mut members, &mut compare);
    rotate_and_mirror(&mut members, orientation);
    in_input_order(members)
}

/// Orients each cluster of overlapping circles separately and packs the clusters together.
///
/// Each cluster is normalised as in [`normalize_solution`]. A two-circle cluster where one
/// circle sits strictly inside the other is first snapped to internal tangency. Clusters are
/// then packed by decreasing bounding-box area: the largest stays in place and the rest are
/// added in groups of three to the right of, below, and diagonally from the accumulated
/// bounds, separated by 1/50 of the largest cluster's width.
///
/// Distances inside a cluster are kept (apart from the snapped pair); distances between
/// clusters are not. Output circles keep the order of `solution`.
pub fn pack_clusters(solution: &Solution, orientation: f64) -> Solution {
    let mut compare = larger_first;
    let mut clusters: Vec<Cluster> = disjoint_clusters(solution)
        .into_iter()
        .filter_map(|mut members| {
            anchor(&mut members, &mut compare);
            snap_contained_pair(&mut members);
            rotate_and_mirror(&mut members, orientation);
            Cluster::new(members)
        })
        .collect();
    clusters.sort_by(|a, b| b.area().total_cmp(&a.area()));

    let Some((first, rest)) = clusters.split_first() else {
        return Solution::new();
    };
    let spacing = first.bounds.width() / 50.0;
    let mut placed = first.members.clone();
    let mut bounds = first.bounds;
    for group in rest.chunks(3) {
        for (cluster, (right, bottom)) in group.iter().zip([(true, false), (false, true), (true, true)])
        {
            let offset = cluster_offset(bounds, cluster.bounds, spacing, right, bottom);
            placed.extend(cluster.members.iter().map(|(index, c)| {
                let mut c = c.clone();
                c.circle.center += offset;
                (*index, c)
            }));
        }
        bounds = bounding_box(placed.iter().map(|(_, c)| c.circle)).unwrap_or(bounds);
    }

    in_input_order(placed)
}

fn larger_first(a: &VennCircle, b: &VennCircle) -> Ordering {
    b.circle.radius.total_cmp(&a.circle.radius)
}

/// Circles tagged with their position in the input solution.
type Members = Vec<(usize, VennCircle)>;

struct Cluster {
    members: Members,
    bounds: Rect,
}

impl Cluster {
    fn new(members: Members) -> Option<Self> {
        let bounds = bounding_box(members.iter().map(|(_, c)| c.circle))?;
        Some(Self { members, bounds })
    }

    fn area(&self) -> f64 {
        self.bounds.width() * self.bounds.height()
    }
}

/// Groups circles into connected components of the "overlaps" relation.
///
/// Components are listed in order of their first member; members keep input order.
fn disjoint_clusters(solution: &Solution) -> Vec<Members> {
    let circles = solution.circles();
    let mut parent: Vec<usize> = (0..circles.len()).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        let mut root = i;
        while parent[root] != root {
            root = parent[root];
        }
        while parent[i] != root {
            let next = parent[i];
            parent[i] = root;
            i = next;
        }
        root
    }

    for i in 0..circles.len() {
        for j in i + 1..circles.len() {
            let (a, b) = (circles[i].circle, circles[j].circle);
            if a.center.distance(b.center) + SMALL < a.radius + b.radius {
                let (from, to) = (find(&mut parent, j), find(&mut parent, i));
                parent[from] = to;
            }
        }
    }

    let mut roots: Vec<usize> = Vec::new();
    let mut clusters: Vec<Members> = Vec::new();
    for (i, circle) in circles.iter().enumerate() {
        let root = find(&mut parent, i);
        let entry = (i, circle.clone());
        match roots.iter().position(|&r| r == root) {
            Some(k) => clusters[k].push(entry),
            None => {
                roots.push(root);
                clusters.push(vec![entry]);
            }
        }
    }
    clusters
}

fn in_input_order(mut members: Members) -> Solution {
    members.sort_by_key(|(index, _)| *index);
    members.into_iter().map(|(_, c)| c).collect()
}

/// Sorts `members` by `compare` and translates the first one to the origin.
fn anchor(members: &mut Members, compare: &mut impl FnMut(&VennCircle, &VennCircle) -> Ordering) {
    members.sort_by(|a, b| compare(&a.1, &b.1));
    let Some((_, first)) = members.first() else {
        return;
    };
    let origin = first.circle.center.to_vec2();
    for (_, c) in members.iter_mut() {
        c.circle.center -= origin;
    }
}

/// Moves the inner circle of a contained pair to internal tangency with the outer one.
fn snap_contained_pair(members: &mut Members) {
    if let [(_, outer), (_, inner)] = &mut members[..] {
        let (o, i) = (outer.circle, inner.circle);
        if o.center.distance(i.center) < (i.radius - o.radius).abs() {
            inner.circle.center = Point::new(o.center.x + o.radius - i.radius - SMALL, o.center.y);
        }
    }
}

/// Rotates about the origin so the second member lies at `orientation`, then mirrors across
/// that direction if the third member lies more than half a turn past it.
fn rotate_and_mirror(members: &mut Members, orientation: f64) {
    if members.len() > 1 {
        let second = members[1].1.circle.center;
        let rotation = second.x.atan2(second.y) - orientation;
        let (s, c) = (rotation.sin(), rotation.cos());
        for (_, circle) in members.iter_mut() {
            let p = circle.circle.center;
            circle.circle.center = Point::new(c * p.x - s * p.y, s * p.x + c * p.y);
        }
    }

    if members.len() > 2 {
        let third = members[2].1.circle.center;
        let mut angle = (third.x.atan2(third.y) - orientation) % TAU;
        if angle < 0.0 {
            angle += TAU;
        }
        if angle > PI {
            let axis = Vec2::new(orientation.sin(), orientation.cos());
            for (_, circle) in members.iter_mut() {
                let p = circle.circle.center.to_vec2();
                circle.circle.center = (axis * (2.0 * p.dot(axis)) - p).to_point();
            }
        }
    }
}

/// Translation that places a cluster with bounds `cluster` next to `into`.
fn cluster_offset(into: Rect, cluster: Rect, spacing: f64, right: bool, bottom: bool) -> Vec2 {
    let x = if right {
        into.x1 - cluster.x0 + spacing
    } else {
        let centring = cluster.width() / 2.0 - into.width() / 2.0;
        into.x1 - cluster.x1 + centring.min(0.0)
    };
    let y = if bottom {
        into.y1 - cluster.y0 + spacing
    } else {
        let centring = cluster.height() / 2.0 - into.height() / 2.0;
        into.y1 - cluster.y1 + centring.min(0.0)
    };
    Vec2::new(x, y)
}
