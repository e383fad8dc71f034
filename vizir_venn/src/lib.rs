// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Area-proportional Venn/Euler diagram layout for VizIR.
//!
//! Given set sizes and (some) intersection sizes, this crate finds one circle per set whose
//! overlaps approximate the requested sizes, outlines every intersection region, and picks a
//! label anchor inside each region. Drawing is left to the caller: the outputs are plain
//! records with coordinates and SVG path data, plus `kurbo` geometry.
//!
//! The pipeline, as run by [`VennSpec::layout`]:
//! - [`filter_solvable`] drops records that cannot be drawn,
//! - [`venn`] fits circles in solver space (circle area = set size),
//! - [`normalize_solution`] optionally fixes rotation/reflection (or [`pack_clusters`] also
//!   packs disjoint clusters together),
//! - [`scale_solution`] fits the result into the output box,
//! - [`compute_text_centres`] places labels,
//! - [`intersection_area_path`] outlines each intersection.
//!
//! ```
//! use vizir_venn::{SetDatum, VennSpec};
//!
//! let data = [
//!     SetDatum::new(["A"], 12.0),
//!     SetDatum::new(["B"], 12.0),
//!     SetDatum::new(["A", "B"], 2.0),
//! ];
//! let layout = VennSpec::new().layout(&data).unwrap();
//! assert_eq!(layout.circles.len(), 2);
//! assert_eq!(layout.intersections[0].set_id, "A∩B");
//! ```
//!
//! ## Features
//!
//! - `std` / `libm`: float math backend (one of them is required; `libm` is the default).
//! - `tracing`: emit solver and pipeline events through `tracing`.
//! - `serde`: `Serialize` for output records and [`FieldMapping`] for JSON input rows.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod conjugate_gradient;
mod data;
#[cfg(not(feature = "std"))]
mod float;
mod geometry;
#[cfg(feature = "serde")]
mod json;
mod labels;
mod layout;
mod nelder_mead;
mod normalize;
mod optimize;
mod path;
mod scale;
mod solution;
mod solver;
mod trace;

pub use conjugate_gradient::ConjugateGradient;
pub use data::{SET_ID_DELIMITER, SetDatum, filter_solvable, set_key};
pub use geometry::{
    Boundary, BoundaryArc, EdgeSource, IntersectionPoint, IntersectionStats, bounding_box,
    centroid, circle_circle_intersection, circle_overlap, circle_segment_area, classify_edge,
    contained_in_circles, intersection_area, intersection_points, intersection_stats,
};
#[cfg(feature = "serde")]
pub use json::FieldMapping;
pub use labels::{
    DISJOINT_ANCHOR, TextCentre, TextCentres, circle_margin, compute_text_centre,
    compute_text_centres, overlapping_circles,
};
pub use layout::{CircleRecord, IntersectionRecord, VennLayout, VennSpec, VennSpecError};
pub use nelder_mead::NelderMead;
pub use normalize::{normalize_solution, normalize_solution_by, pack_clusters};
pub use optimize::{Minimum, bisect};
pub use path::{
    EMPTY_PATH, PathCommand, boundary_commands, commands_to_bez_path, intersection_area_path,
    intersection_bez_path, svg_path_data,
};
pub use scale::scale_solution;
pub use solution::{Solution, VennCircle};
pub use solver::{
    InitialLayout, SolverParams, distance_from_intersect_area, layout_loss, venn,
};
