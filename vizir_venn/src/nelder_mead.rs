// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nelder–Mead simplex minimisation.
//!
//! The search is a fold over simplex states: every [`Simplex::step`] consumes the current
//! simplex and returns the next one, until [`Simplex::converged`] holds or the iteration cap
//! is reached.

extern crate alloc;

use alloc::vec::Vec;

use crate::optimize::Minimum;

/// Nelder–Mead parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NelderMead {
    /// Iteration cap; `None` means `200 * dimension`.
    pub max_iterations: Option<usize>,
    /// Scale applied to non-zero coordinates when building the initial simplex.
    pub non_zero_delta: f64,
    /// Offset used for zero coordinates when building the initial simplex.
    pub zero_delta: f64,
    /// Stop once best and worst values differ by less than this...
    pub min_error_delta: f64,
    /// ...and the two best vertices differ by less than this in every coordinate.
    pub min_tolerance: f64,
    /// Reflection coefficient.
    pub rho: f64,
    /// Expansion coefficient.
    pub chi: f64,
    /// Contraction coefficient.
    pub psi: f64,
    /// Shrink coefficient, in `(0, 1)`.
    pub sigma: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: None,
            non_zero_delta: 1.05,
            zero_delta: 0.001,
            min_error_delta: 1e-6,
            min_tolerance: 1e-5,
            rho: 1.0,
            chi: 2.0,
            psi: -0.5,
            sigma: 0.5,
        }
    }
}

impl NelderMead {
    /// Creates a minimiser with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Sets both convergence tolerances.
    pub fn with_tolerances(mut self, min_error_delta: f64, min_tolerance: f64) -> Self {
        self.min_error_delta = min_error_delta;
        self.min_tolerance = min_tolerance;
        self
    }

    /// Minimises `f` starting from `x0`.
    pub fn minimize(&self, mut f: impl FnMut(&[f64]) -> f64, x0: &[f64]) -> Minimum {
        let max_iterations = self.max_iterations.unwrap_or(x0.len() * 200);
        let mut simplex = Simplex::new(&mut f, x0, self);
        let mut iterations = 0;
        while iterations < max_iterations && !simplex.converged(self) {
            simplex = simplex.step(&mut f, self);
            iterations += 1;
        }
        let best = simplex.into_best();
        Minimum {
            x: best.x,
            fx: best.fx,
            iterations,
        }
    }
}

#[derive(Clone, Debug)]
struct Vertex {
    x: Vec<f64>,
    fx: f64,
}

impl Vertex {
    fn eval(f: &mut impl FnMut(&[f64]) -> f64, x: Vec<f64>) -> Self {
        let fx = f(&x);
        Self { x, fx }
    }
}

/// `n + 1` vertices sorted by ascending objective value.
#[derive(Clone, Debug)]
struct Simplex {
    vertices: Vec<Vertex>,
}

impl Simplex {
    fn new(f: &mut impl FnMut(&[f64]) -> f64, x0: &[f64], params: &NelderMead) -> Self {
        let mut vertices = Vec::with_capacity(x0.len() + 1);
        vertices.push(Vertex::eval(f, x0.to_vec()));
        for i in 0..x0.len() {
            let mut point = x0.to_vec();
            point[i] = if point[i] != 0.0 {
                point[i] * params.non_zero_delta
            } else {
                params.zero_delta
            };
            vertices.push(Vertex::eval(f, point));
        }
        Self::sorted(vertices)
    }

    fn sorted(mut vertices: Vec<Vertex>) -> Self {
        vertices.sort_by(|a, b| a.fx.total_cmp(&b.fx));
        Self { vertices }
    }

    fn dimension(&self) -> usize {
        self.vertices.len() - 1
    }

    fn converged(&self, params: &NelderMead) -> bool {
        let n = self.dimension();
        if n == 0 {
            return true;
        }
        let (best, second, worst) = (&self.vertices[0], &self.vertices[1], &self.vertices[n]);
        let max_diff = best
            .x
            .iter()
            .zip(&second.x)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        (best.fx - worst.fx).abs() < params.min_error_delta && max_diff < params.min_tolerance
    }

    fn step(self, f: &mut impl FnMut(&[f64]) -> f64, params: &NelderMead) -> Self {
        let n = self.dimension();
        let mut vertices = self.vertices;

        let centroid: Vec<f64> = (0..n)
            .map(|i| vertices[..n].iter().map(|v| v.x[i]).sum::<f64>() / n as f64)
            .collect();
        let worst = vertices[n].x.clone();
        // (1 + w) * centroid - w * worst
        let along = |w: f64| -> Vec<f64> {
            centroid
                .iter()
                .zip(&worst)
                .map(|(c, x)| (1.0 + w) * c - w * x)
                .collect()
        };

        let best_fx = vertices[0].fx;
        let second_worst_fx = vertices[n - 1].fx;
        let worst_fx = vertices[n].fx;

        let reflected = Vertex::eval(f, along(params.rho));
        if reflected.fx < best_fx {
            let expanded = Vertex::eval(f, along(params.chi));
            vertices[n] = if expanded.fx < reflected.fx {
                expanded
            } else {
                reflected
            };
        } else if reflected.fx >= second_worst_fx {
            let (contracted, accept) = if reflected.fx > worst_fx {
                let inside = Vertex::eval(f, along(params.psi));
                let accept = inside.fx < worst_fx;
                (inside, accept)
            } else {
                let outside = Vertex::eval(f, along(-params.psi * params.rho));
                let accept = outside.fx < reflected.fx;
                (outside, accept)
            };
            if accept {
                vertices[n] = contracted;
            } else {
                let best = vertices[0].x.clone();
                for vertex in &mut vertices[1..] {
                    let x = best
                        .iter()
                        .zip(&vertex.x)
                        .map(|(b, v)| (1.0 - params.sigma) * b + params.sigma * v)
                        .collect();
                    *vertex = Vertex::eval(f, x);
                }
            }
        } else {
            vertices[n] = reflected;
        }

        Self::sorted(vertices)
    }

    fn into_best(self) -> Vertex {
        let mut vertices = self.vertices;
        vertices.swap_remove(0)
    }
}
