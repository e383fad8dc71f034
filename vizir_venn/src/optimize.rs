// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small numeric helpers shared by the minimisers.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Result of a minimisation.
#[derive(Clone, Debug, PartialEq)]
pub struct Minimum {
    /// Best argument found.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub fx: f64,
    /// Number of iterations performed.
    pub iterations: usize,
}

/// Finds a root of `f` in `[a, b]` by bisection.
///
/// Returns `None` when `f(a)` and `f(b)` have the same (non-zero) sign.
pub fn bisect(
    mut f: impl FnMut(f64) -> f64,
    mut a: f64,
    b: f64,
    max_iterations: usize,
    tolerance: f64,
) -> Option<f64> {
    let f_a = f(a);
    let f_b = f(b);
    if f_a * f_b > 0.0 {
        return None;
    }
    if f_a == 0.0 {
        return Some(a);
    }
    if f_b == 0.0 {
        return Some(b);
    }

    let mut delta = b - a;
    for _ in 0..max_iterations {
        delta /= 2.0;
        let mid = a + delta;
        let f_mid = f(mid);
        if f_mid * f_a >= 0.0 {
            a = mid;
        }
        if delta.abs() < tolerance || f_mid == 0.0 {
            return Some(mid);
        }
    }
    Some(a + delta)
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub(crate) fn norm2(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// `out = w1 * v1 + w2 * v2`, element-wise.
pub(crate) fn weighted_sum(out: &mut [f64], w1: f64, v1: &[f64], w2: f64, v2: &[f64]) {
    for ((o, a), b) in out.iter_mut().zip(v1).zip(v2) {
        *o = w1 * a + w2 * b;
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn bisect_finds_square_root() {
        let root = bisect(|x| x * x - 2.0, 0.0, 2.0, 100, 1e-10).expect("sign change");
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-9, "{root}");
    }

    #[test]
    fn bisect_rejects_same_sign_endpoints() {
        assert_eq!(bisect(|x| x * x + 1.0, -1.0, 1.0, 100, 1e-10), None);
        assert_eq!(bisect(|x| x - 1.0, 1.0, 3.0, 100, 1e-10), Some(1.0));
    }

    #[test]
    fn vector_helpers() {
        assert_eq!(dot(&[1.0, 2.0], &[3.0, 4.0]), 11.0);
        assert_eq!(norm2(&[3.0, 4.0]), 5.0);
        let mut out = [0.0; 2];
        weighted_sum(&mut out, 2.0, &[1.0, 1.0], -1.0, &[0.5, 3.0]);
        assert_eq!(out, [1.5, -1.0]);
    }
}
