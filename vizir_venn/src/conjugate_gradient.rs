// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Non-linear conjugate gradient minimisation (Polak–Ribière with restarts).

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::optimize::{Minimum, dot, norm2, weighted_sum};

/// Sufficient-decrease constant of the Wolfe conditions.
const C1: f64 = 1e-6;
/// Curvature constant of the Wolfe conditions.
const C2: f64 = 0.1;
/// Gradient norm below which the search stops.
const GRADIENT_TOLERANCE: f64 = 1e-5;

/// Conjugate gradient parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConjugateGradient {
    /// Iteration cap; `None` means `20 * dimension`.
    pub max_iterations: Option<usize>,
}

impl ConjugateGradient {
    /// Creates a minimiser with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Minimises `f` starting from `x0`.
    ///
    /// `f(x, gradient)` returns the objective at `x` and writes its gradient.
    pub fn minimize(&self, mut f: impl FnMut(&[f64], &mut [f64]) -> f64, x0: &[f64]) -> Minimum {
        let n = x0.len();
        let max_iterations = self.max_iterations.unwrap_or(n * 20);

        let mut current = Probe::new(n);
        current.x.copy_from_slice(x0);
        current.fx = f(&current.x, &mut current.grad);
        let mut next = Probe::new(n);

        let mut direction: Vec<f64> = current.grad.iter().map(|g| -g).collect();
        let mut yk = vec![0.0; n];
        let mut step = 1.0;
        let mut iterations = 0;

        while iterations < max_iterations {
            iterations += 1;
            step = LineSearch::new(&current, &direction).run(&mut f, &mut next, step);
            if step == 0.0 {
                // No acceptable step: restart along steepest descent.
                for (d, g) in direction.iter_mut().zip(&current.grad) {
                    *d = -g;
                }
            } else {
                weighted_sum(&mut yk, 1.0, &next.grad, -1.0, &current.grad);
                let delta = dot(&current.grad, &current.grad);
                let beta = (dot(&yk, &next.grad) / delta).max(0.0);
                for (d, g) in direction.iter_mut().zip(&next.grad) {
                    *d = beta * *d - g;
                }
                core::mem::swap(&mut current, &mut next);
            }
            if norm2(&current.grad) <= GRADIENT_TOLERANCE {
                break;
            }
        }

        Minimum {
            x: current.x,
            fx: current.fx,
            iterations,
        }
    }
}

/// A point with its objective value and gradient.
#[derive(Clone, Debug)]
struct Probe {
    x: Vec<f64>,
    fx: f64,
    grad: Vec<f64>,
}

impl Probe {
    fn new(n: usize) -> Self {
        Self {
            x: vec![0.0; n],
            fx: 0.0,
            grad: vec![0.0; n],
        }
    }

    /// Evaluates `f` at `origin + a * direction`.
    fn evaluate_along(
        &mut self,
        f: &mut impl FnMut(&[f64], &mut [f64]) -> f64,
        origin: &[f64],
        a: f64,
        direction: &[f64],
    ) {
        weighted_sum(&mut self.x, 1.0, origin, a, direction);
        self.fx = f(&self.x, &mut self.grad);
    }
}

/// Strong-Wolfe line search along `direction` from `current`.
struct LineSearch<'a> {
    current: &'a Probe,
    direction: &'a [f64],
    phi0: f64,
    phi_prime0: f64,
}

impl<'a> LineSearch<'a> {
    fn new(current: &'a Probe, direction: &'a [f64]) -> Self {
        Self {
            current,
            direction,
            phi0: current.fx,
            phi_prime0: dot(&current.grad, direction),
        }
    }

    fn sufficient_decrease(&self, a: f64, phi: f64) -> bool {
        phi <= self.phi0 + C1 * a * self.phi_prime0
    }

    fn curvature(&self, phi_prime: f64) -> bool {
        phi_prime.abs() <= -C2 * self.phi_prime0
    }

    /// Returns the accepted step length (leaving its evaluation in `next`), or `0.0`.
    fn run(
        &self,
        f: &mut impl FnMut(&[f64], &mut [f64]) -> f64,
        next: &mut Probe,
        initial: f64,
    ) -> f64 {
        let mut a = if initial == 0.0 { 1.0 } else { initial };
        let mut a0 = 0.0;
        let mut phi_old = self.phi0;

        for iteration in 0..10 {
            next.evaluate_along(f, &self.current.x, a, self.direction);
            let phi = next.fx;
            let phi_prime = dot(&next.grad, self.direction);

            if !self.sufficient_decrease(a, phi) || (iteration > 0 && phi >= phi_old) {
                return self.zoom(f, next, a0, a, phi_old);
            }
            if self.curvature(phi_prime) {
                return a;
            }
            if phi_prime >= 0.0 {
                return self.zoom(f, next, a, a0, phi);
            }

            phi_old = phi;
            a0 = a;
            a *= 2.0;
        }
        a
    }

    fn zoom(
        &self,
        f: &mut impl FnMut(&[f64], &mut [f64]) -> f64,
        next: &mut Probe,
        mut a_lo: f64,
        mut a_high: f64,
        mut phi_lo: f64,
    ) -> f64 {
        for _ in 0..16 {
            let a = (a_lo + a_high) / 2.0;
            next.evaluate_along(f, &self.current.x, a, self.direction);
            let phi = next.fx;
            let phi_prime = dot(&next.grad, self.direction);

            if !self.sufficient_decrease(a, phi) || phi >= phi_lo {
                a_high = a;
            } else {
                if self.curvature(phi_prime) {
                    return a;
                }
                if phi_prime * (a_high - a_lo) >= 0.0 {
                    a_high = a_lo;
                }
                a_lo = a;
                phi_lo = phi;
            }
        }
        0.0
    }
}
