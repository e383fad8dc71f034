// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end layout: from set records to drawable circle and intersection records.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::PI;
use core::fmt;

use kurbo::Circle;

use crate::data::{SetDatum, filter_solvable};
#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::labels::{DISJOINT_ANCHOR, TextCentres, compute_text_centres};
use crate::normalize::{normalize_solution, pack_clusters};
use crate::path::intersection_area_path;
use crate::scale::scale_solution;
use crate::solution::Solution;
use crate::solver::{SolverParams, solve};

/// Errors returned for an unusable [`VennSpec`].
#[derive(Debug, Clone, PartialEq)]
pub enum VennSpecError {
    /// The orientation angle is NaN or infinite.
    NonFiniteOrientation(f64),
    /// The output box is not a positive, finite size.
    InvalidSize {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },
    /// The padding is negative, non-finite, or leaves no room inside the box.
    InvalidPadding(f64),
}

impl fmt::Display for VennSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteOrientation(angle) => write!(f, "orientation {angle} is not finite"),
            Self::InvalidSize { width, height } => {
                write!(f, "layout size {width}x{height} is not positive and finite")
            }
            Self::InvalidPadding(padding) => {
                write!(f, "padding {padding} leaves no drawable area")
            }
        }
    }
}

impl core::error::Error for VennSpecError {}

/// Configuration of a Venn layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VennSpec {
    /// Angle (radians, `atan2(x, y)` convention) at which the second circle of each cluster
    /// is placed when normalising.
    pub orientation: f64,
    /// Whether to normalise the solver output before scaling.
    pub normalize: bool,
    /// When normalising, orient each cluster of overlapping circles separately and pack the
    /// clusters together (see [`pack_clusters`](crate::pack_clusters)).
    pub pack_clusters: bool,
    /// Output width in pixels.
    pub width: f64,
    /// Output height in pixels.
    pub height: f64,
    /// Padding kept free on every side.
    pub padding: f64,
    /// Solver parameters.
    pub solver: SolverParams,
}

impl Default for VennSpec {
    fn default() -> Self {
        Self {
            orientation: PI,
            normalize: false,
            pack_clusters: false,
            width: 600.0,
            height: 350.0,
            padding: 15.0,
            solver: SolverParams::default(),
        }
    }
}

impl VennSpec {
    /// Creates a spec with the default 600 × 350 box and 15 px padding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the normalisation orientation.
    pub fn with_orientation(mut self, orientation: f64) -> Self {
        self.orientation = orientation;
        self
    }

    /// Enables or disables normalisation.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Enables or disables cluster packing during normalisation.
    pub fn with_pack_clusters(mut self, pack_clusters: bool) -> Self {
        self.pack_clusters = pack_clusters;
        self
    }

    /// Sets the output box size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the padding.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the solver parameters.
    pub fn with_solver(mut self, solver: SolverParams) -> Self {
        self.solver = solver;
        self
    }

    /// Checks that this spec can produce a layout.
    pub fn validate(&self) -> Result<(), VennSpecError> {
        if !self.orientation.is_finite() {
            return Err(VennSpecError::NonFiniteOrientation(self.orientation));
        }
        let size_ok = |v: f64| v.is_finite() && v > 0.0;
        if !size_ok(self.width) || !size_ok(self.height) {
            return Err(VennSpecError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        let room = self.width.min(self.height);
        if !self.padding.is_finite() || self.padding < 0.0 || 2.0 * self.padding >= room {
            return Err(VennSpecError::InvalidPadding(self.padding));
        }
        Ok(())
    }

    /// Runs the full pipeline on `data`.
    ///
    /// Records that cannot be drawn (empty `sets`, zero or invalid `size`, intersections of
    /// unknown sets) are dropped; if nothing is left the layout is empty. Only an invalid spec
    /// is an error.
    pub fn layout(&self, data: &[SetDatum]) -> Result<VennLayout, VennSpecError> {
        self.validate()?;
        let data = filter_solvable(data);
        if data.is_empty() {
            return Ok(VennLayout::default());
        }

        let mut solution = solve(&data, &self.solver);
        if self.normalize {
            solution = if self.pack_clusters {
                pack_clusters(&solution, self.orientation)
            } else {
                normalize_solution(&solution, self.orientation)
            };
        }
        let solution = scale_solution(&solution, self.width, self.height, self.padding);
        let centres = compute_text_centres(&solution, &data);

        let circles = solution
            .iter()
            .map(|c| {
                let datum = data.iter().find(|d| d.is_single() && d.sets[0] == c.id);
                CircleRecord::new(&c.id, c.circle, datum, &centres)
            })
            .collect();
        let intersections = data
            .iter()
            .filter(|d| d.sets.len() > 1)
            .map(|d| IntersectionRecord::new(d, &solution, &centres))
            .collect();

        Ok(VennLayout {
            solution,
            circles,
            intersections,
        })
    }
}

/// Output of [`VennSpec::layout`], in pixel space.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VennLayout {
    /// The scaled circles.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub solution: Solution,
    /// One record per set, in input order.
    pub circles: Vec<CircleRecord>,
    /// One record per intersection, in input order.
    pub intersections: Vec<IntersectionRecord>,
}

/// A drawable set circle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CircleRecord {
    /// Set identifier.
    pub set_id: String,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Symbol size, `(2 * radius)^2`.
    pub size: f64,
    /// Display label.
    #[cfg_attr(feature = "serde", serde(rename = "text"))]
    pub label: String,
    /// Label anchor x.
    #[cfg_attr(feature = "serde", serde(rename = "textX"))]
    pub text_x: f64,
    /// Label anchor y.
    #[cfg_attr(feature = "serde", serde(rename = "textY"))]
    pub text_y: f64,
}

impl CircleRecord {
    fn new(id: &str, circle: Circle, datum: Option<&SetDatum>, centres: &TextCentres) -> Self {
        let anchor = centres
            .get(&[id])
            .map(|c| c.point)
            .unwrap_or(circle.center);
        let diameter = 2.0 * circle.radius;
        Self {
            set_id: String::from(id),
            x: circle.center.x,
            y: circle.center.y,
            size: diameter * diameter,
            label: datum.map_or_else(|| String::from(id), SetDatum::display_label),
            text_x: anchor.x,
            text_y: anchor.y,
        }
    }

    /// Radius of the circle.
    pub fn radius(&self) -> f64 {
        self.size.sqrt() / 2.0
    }
}

/// A drawable intersection region.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IntersectionRecord {
    /// Participating sets joined with [`SET_ID_DELIMITER`](crate::SET_ID_DELIMITER).
    pub set_id: String,
    /// Participating sets.
    pub sets: Vec<String>,
    /// SVG path data of the region; `"M 0 0"` when it is empty.
    pub path: String,
    /// Display label.
    #[cfg_attr(feature = "serde", serde(rename = "text"))]
    pub label: String,
    /// Label anchor x.
    #[cfg_attr(feature = "serde", serde(rename = "textX"))]
    pub text_x: f64,
    /// Label anchor y.
    #[cfg_attr(feature = "serde", serde(rename = "textY"))]
    pub text_y: f64,
    /// Requested size of the intersection.
    pub size: f64,
}

impl IntersectionRecord {
    fn new(datum: &SetDatum, solution: &Solution, centres: &TextCentres) -> Self {
        let circles: Vec<Circle> = datum
            .sets
            .iter()
            .filter_map(|id| solution.get(id).copied())
            .collect();
        let anchor = centres
            .get(&datum.sets)
            .map_or(DISJOINT_ANCHOR, |c| c.point);
        Self {
            set_id: datum.set_id(),
            sets: datum.sets.clone(),
            path: intersection_area_path(&circles),
            label: datum.display_label(),
            text_x: anchor.x,
            text_y: anchor.y,
            size: datum.size,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use kurbo::Point;

    use super::*;
    use crate::path::EMPTY_PATH;

    fn abc() -> Vec<SetDatum> {
        vec![
            SetDatum::new(["A"], 12.0),
            SetDatum::new(["B"], 12.0),
            SetDatum::new(["C"], 12.0),
            SetDatum::new(["A", "B"], 2.0),
            SetDatum::new(["A", "C"], 2.0),
            SetDatum::new(["B", "C"], 2.0),
            SetDatum::new(["A", "B", "C"], 1.0),
        ]
    }

    fn inside(p: Point, c: &CircleRecord) -> bool {
        p.distance(Point::new(c.x, c.y)) <= c.radius()
    }

    #[test]
    fn three_sets_give_three_circles_and_four_regions() {
        let layout = VennSpec::new().layout(&abc()).unwrap();
        assert_eq!(layout.circles.len(), 3);
        assert_eq!(layout.intersections.len(), 4);
        let ids: Vec<&str> = layout.intersections.iter().map(|r| r.set_id.as_str()).collect();
        assert_eq!(ids, ["A∩B", "A∩C", "B∩C", "A∩B∩C"]);

        let radii: Vec<f64> = layout.circles.iter().map(CircleRecord::radius).collect();
        assert!(radii.iter().all(|r| (r - radii[0]).abs() < 1e-9), "{radii:?}");

        for record in &layout.intersections {
            assert_ne!(record.path, EMPTY_PATH, "{}", record.set_id);
            assert_eq!(record.label, record.set_id);
            let anchor = Point::new(record.text_x, record.text_y);
            for set in &record.sets {
                let circle = layout.circles.iter().find(|c| &c.set_id == set).unwrap();
                assert!(inside(anchor, circle), "{} anchor outside {set}", record.set_id);
            }
        }

        let bounds = layout.solution.bounding_box().unwrap();
        assert!(bounds.x0 >= 15.0 - 1e-6 && bounds.x1 <= 585.0 + 1e-6);
        assert!(bounds.y0 >= 15.0 - 1e-6 && bounds.y1 <= 335.0 + 1e-6);
    }

    #[test]
    fn single_record_is_centered() {
        let layout = VennSpec::new()
            .layout(&[SetDatum::new(["A"], 6.0)])
            .unwrap();
        assert_eq!(layout.circles.len(), 1);
        assert!(layout.intersections.is_empty());
        let c = &layout.circles[0];
        assert!(c.x.is_finite() && c.y.is_finite());
        assert!((c.x - 300.0).abs() < 1e-9 && (c.y - 175.0).abs() < 1e-9, "{c:?}");
        assert!((c.text_x - 300.0).abs() < 1e-3 && (c.text_y - 175.0).abs() < 1e-3);
        assert!((c.radius() - 160.0).abs() < 1e-9);
    }

    #[test]
    fn zero_sized_sets_are_excluded() {
        let layout = VennSpec::new()
            .layout(&[SetDatum::new(["A"], 6.0), SetDatum::new(["B"], 0.0)])
            .unwrap();
        assert_eq!(layout.circles.len(), 1);
        assert_eq!(layout.circles[0].set_id, "A");
    }

    #[test]
    fn unusable_data_gives_an_empty_layout() {
        let spec = VennSpec::new();
        assert_eq!(spec.layout(&[]).unwrap(), VennLayout::default());
        let junk = [
            SetDatum::new(["A"], 0.0),
            SetDatum::new(Vec::<String>::new(), 4.0),
            SetDatum::new(["A", "B"], 1.0),
        ];
        assert_eq!(spec.layout(&junk).unwrap(), VennLayout::default());
    }

    #[test]
    fn labels_come_from_the_records() {
        let data = [
            SetDatum::new(["A"], 10.0).with_label("Apples"),
            SetDatum::new(["B"], 10.0),
            SetDatum::new(["A", "B"], 3.0).with_label("both"),
        ];
        let layout = VennSpec::new().layout(&data).unwrap();
        assert_eq!(layout.circles[0].label, "Apples");
        assert_eq!(layout.circles[1].label, "B");
        assert_eq!(layout.intersections[0].label, "both");
        assert_eq!(layout.intersections[0].size, 3.0);
    }

    #[test]
    fn set_ids_containing_the_delimiter_keep_their_own_anchor() {
        let data = [
            SetDatum::new(["A"], 10.0),
            SetDatum::new(["A∩B"], 10.0),
            SetDatum::new(["B"], 10.0),
            SetDatum::new(["A", "B"], 3.0),
        ];
        let layout = VennSpec::new().layout(&data).unwrap();
        assert_eq!(layout.circles.len(), 3);
        for circle in &layout.circles {
            let anchor = Point::new(circle.text_x, circle.text_y);
            assert!(inside(anchor, circle), "{} anchor {anchor:?}", circle.set_id);
        }
        let joined = layout.circles.iter().find(|c| c.set_id == "A∩B").unwrap();
        let lens = &layout.intersections[0];
        assert_ne!((joined.text_x, joined.text_y), (lens.text_x, lens.text_y));
    }

    #[test]
    fn normalized_layout_is_still_valid() {
        let layout = VennSpec::new()
            .with_normalize(true)
            .with_orientation(PI / 2.0)
            .layout(&abc())
            .unwrap();
        assert_eq!(layout.circles.len(), 3);
        assert!(layout.circles.iter().all(|c| c.x.is_finite() && c.y.is_finite()));

        let packed = VennSpec::new()
            .with_normalize(true)
            .with_pack_clusters(true)
            .layout(&abc())
            .unwrap();
        assert_eq!(packed.circles.len(), 3);
        assert_eq!(packed.intersections.len(), 4);
    }

    #[test]
    fn invalid_specs_are_rejected() {
        assert!(matches!(
            VennSpec::new().with_orientation(f64::NAN).validate(),
            Err(VennSpecError::NonFiniteOrientation(_))
        ));
        assert!(matches!(
            VennSpec::new().with_orientation(f64::INFINITY).layout(&abc()),
            Err(VennSpecError::NonFiniteOrientation(_))
        ));
        assert!(matches!(
            VennSpec::new().with_size(0.0, 100.0).validate(),
            Err(VennSpecError::InvalidSize { .. })
        ));
        assert_eq!(
            VennSpec::new().with_padding(200.0).validate(),
            Err(VennSpecError::InvalidPadding(200.0))
        );
        assert_eq!(
            VennSpec::new().with_padding(-1.0).validate(),
            Err(VennSpecError::InvalidPadding(-1.0))
        );
        assert_eq!(VennSpec::default().validate(), Ok(()));
    }

    #[test]
    fn errors_render_readably() {
        let err = VennSpecError::InvalidPadding(200.0);
        assert_eq!(std::format!("{err}"), "padding 200 leaves no drawable area");
    }
}
