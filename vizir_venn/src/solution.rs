// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circle layouts keyed by set identifier.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Circle, Point, Rect};

use crate::geometry;

/// A circle standing for one set.
#[derive(Clone, Debug, PartialEq)]
pub struct VennCircle {
    /// Set identifier.
    pub id: String,
    /// Circle geometry in the coordinate space of the owning [`Solution`].
    pub circle: Circle,
}

impl VennCircle {
    /// Creates a circle for set `id`.
    pub fn new(id: impl Into<String>, center: impl Into<Point>, radius: f64) -> Self {
        Self {
            id: id.into(),
            circle: Circle::new(center, radius),
        }
    }
}

/// A mapping from set identifier to circle.
///
/// A solution is only meaningful in the space it was computed in: solver space (area equals
/// set size), normalized space, or pixel space after [`scale_solution`](crate::scale_solution).
/// Each pipeline stage returns a new value; entries keep their insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Solution {
    circles: Vec<VennCircle>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a circle, replacing an existing entry with the same id.
    pub fn insert(&mut self, circle: VennCircle) {
        if let Some(existing) = self.circles.iter_mut().find(|c| c.id == circle.id) {
            *existing = circle;
        } else {
            self.circles.push(circle);
        }
    }

    /// Number of circles.
    pub fn len(&self) -> usize {
        self.circles.len()
    }

    /// Returns `true` when there are no circles.
    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    /// Looks up the circle for set `id`.
    pub fn get(&self, id: &str) -> Option<&Circle> {
        self.circles.iter().find(|c| c.id == id).map(|c| &c.circle)
    }

    /// Iterates circles in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, VennCircle> {
        self.circles.iter()
    }

    /// Returns the circles as a slice.
    pub fn circles(&self) -> &[VennCircle] {
        &self.circles
    }

    /// Returns the bounding box of all circles, or `None` when empty.
    pub fn bounding_box(&self) -> Option<Rect> {
        geometry::bounding_box(self.circles.iter().map(|c| c.circle))
    }

    /// Returns a new solution with `f` applied to every circle.
    pub fn map_circles(&self, mut f: impl FnMut(Circle) -> Circle) -> Self {
        Self {
            circles: self
                .circles
                .iter()
                .map(|c| VennCircle {
                    id: c.id.clone(),
                    circle: f(c.circle),
                })
                .collect(),
        }
    }
}

impl FromIterator<VennCircle> for Solution {
    fn from_iter<T: IntoIterator<Item = VennCircle>>(iter: T) -> Self {
        let mut solution = Self::new();
        for circle in iter {
            solution.insert(circle);
        }
        solution
    }
}

impl<'a> IntoIterator for &'a Solution {
    type Item = &'a VennCircle;
    type IntoIter = core::slice::Iter<'a, VennCircle>;

    fn into_iter(self) -> Self::IntoIter {
        self.circles.iter()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn insert_replaces_by_id_and_keeps_order() {
        let mut s = Solution::new();
        s.insert(VennCircle::new("A", (0.0, 0.0), 1.0));
        s.insert(VennCircle::new("B", (1.0, 0.0), 1.0));
        s.insert(VennCircle::new("A", (5.0, 5.0), 2.0));
        assert_eq!(s.len(), 2);
        assert_eq!(s.circles()[0].id, "A");
        assert_eq!(s.get("A"), Some(&Circle::new((5.0, 5.0), 2.0)));
        assert!(s.get("C").is_none());
    }

    #[test]
    fn bounding_box_covers_all_circles() {
        let s: Solution = [
            VennCircle::new("A", (0.0, 0.0), 1.0),
            VennCircle::new("B", (3.0, 1.0), 2.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(s.bounding_box(), Some(Rect::new(-1.0, -1.0, 5.0, 3.0)));
        assert_eq!(Solution::new().bounding_box(), None);
    }
}
