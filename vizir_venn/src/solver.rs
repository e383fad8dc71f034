// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circle layout solver.
//!
//! Every set becomes a circle whose area equals its size. Circle centers are then chosen to
//! minimise the weighted squared error between the requested intersection sizes and the
//! actual overlap areas. The search starts from a constructive layout ([`InitialLayout`]) and
//! is refined with Nelder–Mead over all centers.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::PI;

use hashbrown::{HashMap, HashSet};
use kurbo::{Circle, Point};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use smallvec::{SmallVec, smallvec};

use crate::conjugate_gradient::ConjugateGradient;
use crate::data::{SetDatum, filter_solvable};
#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::geometry::{SMALL, circle_circle_intersection, circle_overlap, intersection_area};
use crate::nelder_mead::NelderMead;
use crate::optimize::{Minimum, bisect, norm2};
use crate::solution::{Solution, VennCircle};
use crate::trace::debug;

/// Where sets not yet placed by the greedy layout are parked.
const UNPLACED: Point = Point::new(1e10, 1e10);

/// Strategy for the starting point of the final optimisation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InitialLayout {
    /// Greedy placement, replaced by constrained MDS for larger problems when that is better.
    #[default]
    Best,
    /// Place sets one at a time at the candidate point with the lowest loss.
    Greedy,
    /// Multidimensional scaling on target center distances with subset/disjoint constraints.
    ConstrainedMds,
}

/// Solver parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverParams {
    /// Iteration cap of the final Nelder–Mead fit and of each MDS restart.
    pub max_iterations: usize,
    /// Number of random restarts of the constrained MDS layout.
    pub restarts: usize,
    /// Seed for the MDS starting positions.
    pub seed: u64,
    /// Initial layout strategy.
    pub initial_layout: InitialLayout,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            restarts: 10,
            seed: 0,
            initial_layout: InitialLayout::Best,
        }
    }
}

impl SolverParams {
    /// Creates default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the number of MDS restarts.
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the initial layout strategy.
    pub fn with_initial_layout(mut self, initial_layout: InitialLayout) -> Self {
        self.initial_layout = initial_layout;
        self
    }
}

/// Lays out one circle per set so that overlaps approximate the requested sizes.
///
/// Records that [`filter_solvable`] rejects are ignored. Pairs of sets without an explicit
/// intersection record are constrained to not overlap. The result is in solver space: circle
/// areas equal set sizes. No input yields an error; inconsistent constraints produce the best
/// local optimum found.
pub fn venn(data: &[SetDatum], params: &SolverParams) -> Solution {
    solve(&filter_solvable(data), params)
}

/// Same as [`venn`] for records already passed through [`filter_solvable`].
pub(crate) fn solve(data: &[SetDatum], params: &SolverParams) -> Solution {
    let problem = Problem::new(data);
    match problem.len() {
        0 => return Solution::new(),
        1 => return problem.solution(&[Point::ZERO]),
        _ => {}
    }

    let initial = match params.initial_layout {
        InitialLayout::Best => problem.best_initial_layout(params),
        InitialLayout::Greedy => problem.greedy_layout(),
        InitialLayout::ConstrainedMds => problem.constrained_mds_layout(params),
    };

    let x0: Vec<f64> = initial.iter().flat_map(|c| [c.center.x, c.center.y]).collect();
    let mut scratch = initial.clone();
    let fit = NelderMead::new()
        .with_max_iterations(params.max_iterations)
        .minimize(
            |x: &[f64]| {
                for (circle, xy) in scratch.iter_mut().zip(x.chunks_exact(2)) {
                    circle.center = Point::new(xy[0], xy[1]);
                }
                problem.loss(&scratch)
            },
            &x0,
        );

    debug!(
        "venn: {} sets, {} intersections, loss {:.3e} after {} iterations",
        problem.len(),
        problem.areas.len(),
        fit.fx,
        fit.iterations
    );

    let centers: Vec<Point> = fit
        .x
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect();
    problem.solution(&centers)
}

/// Weighted squared overlap error of `solution` against `data`.
///
/// Sets of `data` missing from `solution` count as placed far away from everything else.
pub fn layout_loss(solution: &Solution, data: &[SetDatum]) -> f64 {
    let problem = Problem::new(&filter_solvable(data));
    let circles: Vec<Circle> = problem
        .ids
        .iter()
        .zip(&problem.radii)
        .map(|(id, &r)| {
            solution
                .get(id)
                .copied()
                .unwrap_or(Circle::new(UNPLACED, r))
        })
        .collect();
    problem.loss(&circles)
}

/// Center distance at which circles of radii `r1` and `r2` overlap by `overlap`.
///
/// Returns `|r1 - r2|` when the smaller circle cannot be covered more than that, and
/// `r1 + r2` when `overlap` is zero.
pub fn distance_from_intersect_area(r1: f64, r2: f64, overlap: f64) -> f64 {
    let r = r1.min(r2);
    if r * r * PI <= overlap + SMALL {
        return (r1 - r2).abs();
    }
    bisect(
        |d| circle_overlap(r1, r2, d) - overlap,
        0.0,
        r1 + r2,
        100,
        1e-10,
    )
    .unwrap_or(r1 + r2)
}

/// An intersection constraint over set indices.
#[derive(Clone, Debug)]
struct Area {
    sets: SmallVec<[usize; 4]>,
    size: f64,
    weight: f64,
}

/// Indexed form of the solver input.
#[derive(Clone, Debug)]
struct Problem {
    ids: Vec<String>,
    sizes: Vec<f64>,
    radii: Vec<f64>,
    /// Intersections (2+ sets), explicit ones first, then the implied empty pairs.
    areas: Vec<Area>,
}

/// A positioned neighbour as seen from one set during greedy placement.
#[derive(Clone, Copy, Debug)]
struct Neighbour {
    set: usize,
    size: f64,
    weight: f64,
}

impl Problem {
    fn new(data: &[SetDatum]) -> Self {
        let mut ids = Vec::new();
        let mut sizes = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for datum in data.iter().filter(|d| d.is_single()) {
            let id = datum.sets[0].as_str();
            if index.contains_key(id) {
                continue;
            }
            index.insert(id, ids.len());
            ids.push(String::from(id));
            sizes.push(datum.size);
        }
        let radii = sizes.iter().map(|s| (s / PI).sqrt()).collect();

        let mut areas = Vec::new();
        let mut pairs: HashSet<(usize, usize)> = HashSet::new();
        for datum in data.iter().filter(|d| d.sets.len() > 1) {
            let sets: Option<SmallVec<[usize; 4]>> = datum
                .sets
                .iter()
                .map(|s| index.get(s.as_str()).copied())
                .collect();
            let Some(sets) = sets else {
                continue;
            };
            if let [a, b] = sets[..] {
                pairs.insert((a.min(b), a.max(b)));
            }
            areas.push(Area {
                sets,
                size: datum.size,
                weight: datum.weight(),
            });
        }

        let mut by_name: Vec<usize> = (0..ids.len()).collect();
        by_name.sort_by(|&a, &b| ids[a].cmp(&ids[b]));
        for (k, &a) in by_name.iter().enumerate() {
            for &b in &by_name[k + 1..] {
                if !pairs.contains(&(a.min(b), a.max(b))) {
                    areas.push(Area {
                        sets: smallvec![a, b],
                        size: 0.0,
                        weight: 1.0,
                    });
                }
            }
        }

        Self {
            ids,
            sizes,
            radii,
            areas,
        }
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn circles_at(&self, centers: &[Point]) -> Vec<Circle> {
        centers
            .iter()
            .zip(&self.radii)
            .map(|(&c, &r)| Circle::new(c, r))
            .collect()
    }

    fn solution(&self, centers: &[Point]) -> Solution {
        self.ids
            .iter()
            .zip(self.circles_at(centers))
            .map(|(id, circle)| VennCircle {
                id: id.clone(),
                circle,
            })
            .collect()
    }

    fn area_error(area: &Area, circles: &[Circle]) -> f64 {
        let overlap = if let [a, b] = area.sets[..] {
            let (a, b) = (circles[a], circles[b]);
            circle_overlap(a.radius, b.radius, a.center.distance(b.center))
        } else {
            let members: SmallVec<[Circle; 4]> = area.sets.iter().map(|&i| circles[i]).collect();
            intersection_area(&members)
        };
        area.weight * (overlap - area.size) * (overlap - area.size)
    }

    fn loss(&self, circles: &[Circle]) -> f64 {
        self.areas
            .iter()
            .map(|area| Self::area_error(area, circles))
            .sum()
    }

    fn pair_loss(&self, circles: &[Circle]) -> f64 {
        self.areas
            .iter()
            .filter(|area| area.sets.len() == 2)
            .map(|area| Self::area_error(area, circles))
            .sum()
    }

    fn best_initial_layout(&self, params: &SolverParams) -> Vec<Circle> {
        let greedy = self.greedy_layout();
        // Single-set records count towards the problem size.
        if self.len() + self.areas.len() < 8 {
            return greedy;
        }
        let mds = self.constrained_mds_layout(params);
        let (mds_loss, greedy_loss) = (self.loss(&mds), self.loss(&greedy));
        debug!("initial layout loss: greedy {greedy_loss:.3e}, constrained MDS {mds_loss:.3e}");
        if mds_loss + 1e-8 < greedy_loss {
            mds
        } else {
            greedy
        }
    }

    /// Places the most overlapped set at the origin, then each further set at the best of a
    /// few candidate points derived from its already placed neighbours.
    fn greedy_layout(&self) -> Vec<Circle> {
        let n = self.len();
        let mut circles = self.circles_at(&vec![UNPLACED; n]);
        let mut neighbours: Vec<Vec<Neighbour>> = vec![Vec::new(); n];
        for area in self.areas.iter().filter(|a| a.sets.len() == 2) {
            let (left, right) = (area.sets[0], area.sets[1]);
            // Full containment says nothing about where to put the smaller set.
            let weight = if area.size + SMALL >= self.sizes[left].min(self.sizes[right]) {
                0.0
            } else {
                area.weight
            };
            neighbours[left].push(Neighbour {
                set: right,
                size: area.size,
                weight,
            });
            neighbours[right].push(Neighbour {
                set: left,
                size: area.size,
                weight,
            });
        }

        let mut order: Vec<(usize, f64)> = neighbours
            .iter()
            .enumerate()
            .map(|(set, list)| (set, list.iter().map(|o| o.size * o.weight).sum()))
            .collect();
        order.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut positioned = vec![false; n];
        for (rank, &(set, _)) in order.iter().enumerate() {
            if rank == 0 {
                circles[set].center = Point::ZERO;
                positioned[set] = true;
                continue;
            }
            let mut placed: Vec<Neighbour> = neighbours[set]
                .iter()
                .copied()
                .filter(|o| positioned[o.set])
                .collect();
            placed.sort_by(|a, b| b.size.total_cmp(&a.size));

            let radius = self.radii[set];
            let rings: Vec<Circle> = placed
                .iter()
                .map(|o| {
                    let d = distance_from_intersect_area(radius, self.radii[o.set], o.size);
                    Circle::new(circles[o.set].center, d)
                })
                .collect();
            let mut candidates: Vec<Point> = Vec::new();
            for (j, ring) in rings.iter().enumerate() {
                let (c, d) = (ring.center, ring.radius);
                candidates.extend([
                    Point::new(c.x + d, c.y),
                    Point::new(c.x - d, c.y),
                    Point::new(c.x, c.y + d),
                    Point::new(c.x, c.y - d),
                ]);
                for other in &rings[j + 1..] {
                    if let Some(points) = circle_circle_intersection(ring, other) {
                        candidates.extend(points);
                    }
                }
            }

            let mut best = (f64::INFINITY, candidates.first().copied().unwrap_or(Point::ZERO));
            for &candidate in &candidates {
                circles[set].center = candidate;
                let loss = self.pair_loss(&circles);
                if loss < best.0 {
                    best = (loss, candidate);
                }
            }
            circles[set].center = best.1;
            positioned[set] = true;
        }
        circles
    }

    /// Target center distances and constraints for every set pair.
    ///
    /// A constraint of `1` marks a subset (any distance up to the target is fine), `-1` marks a
    /// disjoint pair (any distance beyond the target is fine), `0` asks for the exact distance.
    fn distance_matrices(&self) -> (Vec<Vec<f64>>, Vec<Vec<i8>>) {
        let n = self.len();
        let mut distances = vec![vec![0.0; n]; n];
        let mut constraints = vec![vec![0_i8; n]; n];
        for area in self.areas.iter().filter(|a| a.sets.len() == 2) {
            let (left, right) = (area.sets[0], area.sets[1]);
            let distance =
                distance_from_intersect_area(self.radii[left], self.radii[right], area.size);
            distances[left][right] = distance;
            distances[right][left] = distance;
            let constraint = if area.size + SMALL >= self.sizes[left].min(self.sizes[right]) {
                1
            } else if area.size <= SMALL {
                -1
            } else {
                0
            };
            constraints[left][right] = constraint;
            constraints[right][left] = constraint;
        }
        (distances, constraints)
    }

    fn constrained_mds_layout(&self, params: &SolverParams) -> Vec<Circle> {
        let n = self.len();
        let (mut distances, constraints) = self.distance_matrices();
        let row_norms: Vec<f64> = distances.iter().map(|row| norm2(row)).collect();
        let mut norm = norm2(&row_norms) / n as f64;
        if norm == 0.0 {
            norm = 1.0;
        }
        for value in distances.iter_mut().flatten() {
            *value /= norm;
        }

        let optimizer = ConjugateGradient::new().with_max_iterations(params.max_iterations);
        let mut rng = SmallRng::seed_from_u64(params.seed);
        let mut best: Option<Minimum> = None;
        for _ in 0..params.restarts.max(1) {
            let start: Vec<f64> = (0..2 * n).map(|_| rng.random::<f64>()).collect();
            let current = optimizer.minimize(
                |x, grad| constrained_mds_gradient(x, grad, &distances, &constraints),
                &start,
            );
            if best.as_ref().is_none_or(|b| current.fx < b.fx) {
                best = Some(current);
            }
        }

        let positions = best.map(|b| b.x).unwrap_or_else(|| vec![0.0; 2 * n]);
        let centers: Vec<Point> = positions
            .chunks_exact(2)
            .map(|xy| Point::new(xy[0] * norm, xy[1] * norm))
            .collect();
        self.circles_at(&centers)
    }
}

/// Stress of the flattened positions `x` against the target `distances`, with its gradient.
fn constrained_mds_gradient(
    x: &[f64],
    grad: &mut [f64],
    distances: &[Vec<f64>],
    constraints: &[Vec<i8>],
) -> f64 {
    grad.fill(0.0);
    let mut loss = 0.0;
    for i in 0..distances.len() {
        let (xi, yi) = (x[2 * i], x[2 * i + 1]);
        for j in i + 1..distances.len() {
            let (xj, yj) = (x[2 * j], x[2 * j + 1]);
            let target = distances[i][j];
            let squared = (xj - xi) * (xj - xi) + (yj - yi) * (yj - yi);
            let distance = squared.sqrt();
            let satisfied = match constraints[i][j] {
                1 => distance <= target,
                -1 => distance >= target,
                _ => false,
            };
            if satisfied {
                continue;
            }
            let delta = squared - target * target;
            loss += delta * delta;
            grad[2 * i] += 4.0 * delta * (xi - xj);
            grad[2 * i + 1] += 4.0 * delta * (yi - yj);
            grad[2 * j] += 4.0 * delta * (xj - xi);
            grad[2 * j + 1] += 4.0 * delta * (yj - yi);
        }
    }
    loss
}
