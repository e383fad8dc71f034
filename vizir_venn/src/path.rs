// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersection region outlines as path data.
//!
//! Regions are emitted as absolute `M`/`A` commands so a Vega-style `path` mark can draw
//! them exactly; [`intersection_bez_path`] flattens the same commands into a `kurbo::BezPath`
//! for renderers that consume kurbo geometry.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Arc, BezPath, Circle, Point, SvgArc, Vec2};

use crate::geometry::{Boundary, intersection_stats};

/// Path data for a region with no area.
pub const EMPTY_PATH: &str = "M 0 0";

/// One path command with absolute coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath.
    MoveTo(Point),
    /// Circular arc to `to`.
    ArcTo {
        /// Arc radius.
        radius: f64,
        /// Take the longer of the two possible arcs.
        large_arc: bool,
        /// Sweep in the positive-angle direction.
        sweep: bool,
        /// End point.
        to: Point,
    },
}

/// Converts a region outline into path commands.
///
/// `circles` must be the slice the boundary was computed from.
pub fn boundary_commands(circles: &[Circle], boundary: &Boundary) -> Vec<PathCommand> {
    match boundary {
        Boundary::Empty => Vec::new(),
        Boundary::Disc(index) => {
            let c = circles[*index];
            let left = Point::new(c.center.x - c.radius, c.center.y);
            let right = Point::new(c.center.x + c.radius, c.center.y);
            let half = |to| PathCommand::ArcTo {
                radius: c.radius,
                large_arc: true,
                sweep: false,
                to,
            };
            alloc::vec![PathCommand::MoveTo(left), half(right), half(left)]
        }
        Boundary::Arcs(arcs) => {
            let mut out = Vec::with_capacity(arcs.len() + 1);
            if let Some(first) = arcs.first() {
                out.push(PathCommand::MoveTo(first.start));
            }
            for arc in arcs {
                let radius = circles[arc.circle].radius;
                out.push(PathCommand::ArcTo {
                    radius,
                    large_arc: arc.width > radius,
                    sweep: true,
                    to: arc.end,
                });
            }
            out
        }
    }
}

/// Serializes path commands as SVG path data.
pub fn svg_path_data(commands: &[PathCommand]) -> String {
    if commands.is_empty() {
        return String::from(EMPTY_PATH);
    }
    let mut out = String::new();
    for command in commands {
        if !out.is_empty() {
            out.push(' ');
        }
        match *command {
            PathCommand::MoveTo(p) => out.push_str(&format!("M {} {}", p.x, p.y)),
            PathCommand::ArcTo {
                radius,
                large_arc,
                sweep,
                to,
            } => out.push_str(&format!(
                "A {radius} {radius} 0 {} {} {} {}",
                u8::from(large_arc),
                u8::from(sweep),
                to.x,
                to.y
            )),
        }
    }
    out
}

/// Returns SVG path data outlining the region common to every circle in `circles`.
///
/// Disjoint circles give [`EMPTY_PATH`]; when one circle lies inside all others the result is
/// that circle's full outline.
pub fn intersection_area_path(circles: &[Circle]) -> String {
    let stats = intersection_stats(circles);
    svg_path_data(&boundary_commands(circles, &stats.boundary))
}

/// Returns the region common to every circle in `circles` as a closed `BezPath`.
///
/// Arcs are approximated with cubic Béziers within `tolerance`.
pub fn intersection_bez_path(circles: &[Circle], tolerance: f64) -> BezPath {
    let stats = intersection_stats(circles);
    commands_to_bez_path(&boundary_commands(circles, &stats.boundary), tolerance)
}

/// Flattens path commands into a `BezPath`, closing every subpath.
pub fn commands_to_bez_path(commands: &[PathCommand], tolerance: f64) -> BezPath {
    let mut path = BezPath::new();
    let mut current: Option<Point> = None;
    for command in commands {
        match *command {
            PathCommand::MoveTo(p) => {
                if current.is_some() {
                    path.close_path();
                }
                path.move_to(p);
                current = Some(p);
            }
            PathCommand::ArcTo {
                radius,
                large_arc,
                sweep,
                to,
            } => {
                let from = current.unwrap_or(to);
                let svg_arc = SvgArc {
                    from,
                    to,
                    radii: Vec2::new(radius, radius),
                    x_rotation: 0.0,
                    large_arc,
                    sweep,
                };
                match Arc::from_svg_arc(&svg_arc) {
                    Some(arc) => path.extend(arc.append_iter(tolerance)),
                    None => path.line_to(to),
                }
                current = Some(to);
            }
        }
    }
    if current.is_some() {
        path.close_path();
    }
    path
}
