// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the geometry kernel and the post-processing stages.
//!
//! 1. **Overlap bounds**: the area common to several circles never exceeds the smallest
//!    circle and does not depend on the order the circles are given in.
//! 2. **Lens area**: for two circles the general intersection area agrees with the closed
//!    form overlap.
//! 3. **Normalisation is rigid**: radii and every pairwise centre distance survive
//!    normalisation, for overlapping, disjoint and nested circles alike. Cluster packing keeps
//!    them within a single overlapping cluster.
//! 4. **Scaling fits**: scaled circles stay inside the padded box and keep radius ratios.
//! 5. **Scaling is idempotent**.
//! 6. **Layouts stay in the box** for arbitrary three set inputs.

use core::f64::consts::{PI, TAU};

use kurbo::{Circle, Vec2};
use proptest::prelude::*;
use vizir_venn::{
    SetDatum, Solution, VennCircle, VennSpec, circle_overlap, intersection_area,
    normalize_solution, pack_clusters, scale_solution,
};

// ── Strategies ──────────────────────────────────────────────────────────

fn circle() -> impl Strategy<Value = Circle> {
    (-10.0..10.0f64, -10.0..10.0f64, 0.5..8.0f64).prop_map(|(x, y, r)| Circle::new((x, y), r))
}

/// Three to six circles whose centres are close enough that they all overlap.
fn cluster() -> impl Strategy<Value = Solution> {
    prop::collection::vec((-1.0..1.0f64, -1.0..1.0f64, 3.0..5.0f64), 3..=6).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, r))| VennCircle::new(format!("s{i}"), (x, y), r))
            .collect()
    })
}

fn scattered() -> impl Strategy<Value = Solution> {
    prop::collection::vec(circle(), 1..=6).prop_map(|circles| {
        circles
            .into_iter()
            .enumerate()
            .map(|(i, c)| VennCircle::new(format!("s{i}"), c.center, c.radius))
            .collect()
    })
}

/// A large circle with a small one strictly inside it, anywhere in the plane.
fn nested_pair() -> impl Strategy<Value = Solution> {
    (circle(), 0.0..1.0f64, 0.0..TAU, 0.1..0.9f64).prop_map(|(outer, depth, angle, ratio)| {
        let inner_radius = outer.radius * ratio;
        let offset = (outer.radius - inner_radius) * depth * 0.99;
        let center = outer.center + Vec2::new(angle.cos(), angle.sin()) * offset;
        [
            VennCircle::new("outer", outer.center, outer.radius),
            VennCircle::new("inner", center, inner_radius),
        ]
        .into_iter()
        .collect()
    })
}

fn assert_rigid(before: &Solution, after: &Solution) -> Result<(), TestCaseError> {
    prop_assert_eq!(after.len(), before.len());
    for (b, a) in before.iter().zip(after.iter()) {
        prop_assert_eq!(&b.id, &a.id);
        prop_assert!((b.circle.radius - a.circle.radius).abs() < 1e-12);
    }
    for i in 0..before.len() {
        for j in (i + 1)..before.len() {
            let d0 = distance(&before.circles()[i], &before.circles()[j]);
            let d1 = distance(&after.circles()[i], &after.circles()[j]);
            prop_assert!((d0 - d1).abs() < 1e-9, "{i}-{j}: {d0} vs {d1}");
        }
    }
    Ok(())
}

fn distance(a: &VennCircle, b: &VennCircle) -> f64 {
    (a.circle.center - b.circle.center).hypot()
}

// ── Geometry ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn overlap_is_bounded_and_order_independent(
        circles in prop::collection::vec(circle(), 1..=3)
    ) {
        let area = intersection_area(&circles);
        let smallest = circles
            .iter()
            .map(|c| PI * c.radius * c.radius)
            .fold(f64::INFINITY, f64::min);
        prop_assert!(area >= 0.0, "negative area {area}");
        prop_assert!(area <= smallest * (1.0 + 1e-9) + 1e-9, "{area} > {smallest}");

        let mut reversed = circles.clone();
        reversed.reverse();
        let other = intersection_area(&reversed);
        prop_assert!((area - other).abs() <= 1e-6 * smallest.max(1.0), "{area} vs {other}");
    }

    #[test]
    fn two_circle_area_matches_the_lens_formula(a in circle(), b in circle()) {
        let d = (a.center - b.center).hypot();
        let general = intersection_area(&[a, b]);
        let lens = circle_overlap(a.radius, b.radius, d);
        prop_assert!(
            (general - lens).abs() <= 1e-6 * lens.max(1.0),
            "general {general}, lens {lens}, d {d}"
        );
    }
}

// ── Post-processing ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn normalisation_is_rigid(
        solution in prop_oneof![cluster(), scattered(), nested_pair()],
        orientation in -PI..PI,
    ) {
        let normalized = normalize_solution(&solution, orientation);
        assert_rigid(&solution, &normalized)?;
    }

    #[test]
    fn packing_is_rigid_within_a_cluster(
        solution in cluster(),
        orientation in -PI..PI,
    ) {
        let packed = pack_clusters(&solution, orientation);
        assert_rigid(&solution, &packed)?;
    }

    #[test]
    fn scaling_fits_the_padded_box(
        solution in scattered(),
        width in 100.0..1000.0f64,
        height in 100.0..1000.0f64,
        padding in 0.0..40.0f64,
    ) {
        let scaled = scale_solution(&solution, width, height, padding);
        let bounds = scaled.bounding_box().unwrap();
        let eps = 1e-6;
        prop_assert!(bounds.x0 >= padding - eps && bounds.x1 <= width - padding + eps, "{bounds:?}");
        prop_assert!(bounds.y0 >= padding - eps && bounds.y1 <= height - padding + eps, "{bounds:?}");
        let fills_width = (bounds.width() - (width - 2.0 * padding)).abs() < eps;
        let fills_height = (bounds.height() - (height - 2.0 * padding)).abs() < eps;
        prop_assert!(fills_width || fills_height, "{bounds:?}");

        let first = &solution.circles()[0];
        let scaled_first = &scaled.circles()[0];
        let factor = scaled_first.circle.radius / first.circle.radius;
        for (before, after) in solution.iter().zip(scaled.iter()) {
            let ratio = after.circle.radius / before.circle.radius;
            prop_assert!((ratio - factor).abs() <= 1e-9 * factor, "{ratio} vs {factor}");
        }
    }

    #[test]
    fn scaling_twice_changes_nothing(
        solution in scattered(),
        width in 100.0..1000.0f64,
        height in 100.0..1000.0f64,
    ) {
        let once = scale_solution(&solution, width, height, 10.0);
        let twice = scale_solution(&once, width, height, 10.0);
        for (a, b) in once.iter().zip(twice.iter()) {
            prop_assert!((a.circle.center - b.circle.center).hypot() < 1e-6);
            prop_assert!((a.circle.radius - b.circle.radius).abs() < 1e-6);
        }
    }
}

// ── Pipeline ────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn layouts_stay_inside_the_box(
        sizes in prop::array::uniform3(1.0..50.0f64),
        overlaps in prop::array::uniform3(0.0..1.0f64),
        normalize in any::<bool>(),
    ) {
        let [a, b, c] = sizes;
        let data = [
            SetDatum::new(["A"], a),
            SetDatum::new(["B"], b),
            SetDatum::new(["C"], c),
            SetDatum::new(["A", "B"], overlaps[0] * a.min(b)),
            SetDatum::new(["A", "C"], overlaps[1] * a.min(c)),
            SetDatum::new(["B", "C"], overlaps[2] * b.min(c)),
        ];
        let layout = VennSpec::new().with_normalize(normalize).layout(&data).unwrap();
        prop_assert_eq!(layout.circles.len(), 3);
        for record in &layout.circles {
            let r = record.radius();
            prop_assert!(record.x - r >= 15.0 - 1e-6 && record.x + r <= 585.0 + 1e-6, "{record:?}");
            prop_assert!(record.y - r >= 15.0 - 1e-6 && record.y + r <= 335.0 + 1e-6, "{record:?}");
        }
    }
}
