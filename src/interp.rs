use crate::types::{Point, Value};

/// Estimates where the field crosses zero along the edge `pos_a → pos_b`.
///
/// `pos_a` and `pos_b` must differ along exactly one axis. The fraction is
/// `numerator / (|value_a| + |value_b|)` where the numerator is `value_a` when
/// it is non-negative and `value_b` otherwise, and the corner it is measured
/// from flips with the sign of `value_a`:
///
/// ```text
/// value_a >= 0:  a + (b - a) * fraction      (measured from a)
/// value_a <  0:  b + (a - b) * fraction      (measured from b)
/// ```
///
/// This is not the textbook crossing `value_a / (value_a - value_b)`, see
/// [`zero_crossing`]. When both values are exactly zero the result is NaN.
pub fn interpolate(value_a: Value, value_b: Value, pos_a: Point, pos_b: Point) -> Point {
    debug_assert_ne!(pos_a, pos_b, "edge endpoints coincide");
    let Some(axis) = (0..3).find(|&axis| pos_a[axis] != pos_b[axis]) else {
        return pos_a;
    };
    let (a, b) = (pos_a[axis], pos_b[axis]);

    let numerator = if value_a >= 0. { value_a } else { value_b };
    let fraction = numerator / (value_a.abs() + value_b.abs());

    // The complement is taken in double precision before narrowing.
    let weighted = |from: Value, to: Value| {
        (from as f64 * (1. - fraction as f64)) as Value + to * fraction
    };
    let along = if value_a >= 0. {
        weighted(a, b)
    } else {
        weighted(b, a)
    };

    let mut out = pos_a;
    out[axis] = along;
    out
}

/// Standard linear zero crossing between two corners.
pub fn zero_crossing(value_a: Value, value_b: Value, pos_a: Point, pos_b: Point) -> Point {
    let t = find_t(value_a, value_b, 0.);
    interpolate_points(pos_a, pos_b, t)
}

// Return the interpolation factor t corresponding to iso_val
pub fn find_t(v0: Value, v1: Value, iso_val: Value) -> Value {
    (iso_val - v0) / (v1 - v0)
}

// Linear interpolation
pub fn lerp(a: Value, b: Value, t: Value) -> Value {
    a + (b - a) * t
}

// Linearly interpolate between two points by factor t
pub fn interpolate_points(p0: Point, p1: Point, t: Value) -> Point {
    Point::new(
        lerp(p0.x, p1.x, t),
        lerp(p0.y, p1.y, t),
        lerp(p0.z, p1.z, t),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_edge() -> (Point, Point) {
        (Point::new(3., 1., 2.), Point::new(4., 1., 2.))
    }

    #[test]
    fn zero_value_lands_on_its_corner() {
        let (pa, pb) = x_edge();
        assert_eq!(interpolate(0., 5., pa, pb), pa);
        assert_eq!(interpolate(0., -5., pa, pb), pa);
        assert_eq!(interpolate(5., 0., pa, pb), pb);
        assert_eq!(interpolate(-5., 0., pa, pb), pb);
    }

    #[test]
    fn only_the_varying_axis_moves() {
        let pa = Point::new(7., 2., 5.);
        let pb = Point::new(7., 2., 6.);
        let out = interpolate(1., -3., pa, pb);
        assert_eq!((out.x, out.y), (7., 2.));
        assert!(out.z > 5. && out.z < 6.);
    }

    #[test]
    fn edges_may_run_in_the_negative_direction() {
        let pa = Point::new(1., 1., 0.);
        let pb = Point::new(1., 0., 0.);
        let out = interpolate(1., -1., pa, pb);
        assert_eq!(out, Point::new(1., 0.5, 0.));
    }

    #[test]
    fn sign_weighted_rule_differs_from_textbook() {
        let (pa, pb) = x_edge();
        // Positive first: fraction = 1 / 4, measured from a.
        assert_eq!(interpolate(1., -3., pa, pb).x, 3.25);
        assert_eq!(zero_crossing(1., -3., pa, pb).x, 3.25);
        // Negative first: fraction = 3 / 4, measured from b.
        assert_eq!(interpolate(-1., 3., pa, pb).x, 3.25);
        assert_eq!(zero_crossing(-1., 3., pa, pb).x, 3.25);
        // Non-negative pair: fraction = 1 / 4, measured from a.
        assert_eq!(interpolate(1., 3., pa, pb).x, 3.25);
        assert_eq!(zero_crossing(1., 3., pa, pb).x, 2.5);
    }

    #[test]
    fn opposite_signs_stay_on_the_segment() {
        let (pa, pb) = x_edge();
        for (va, vb) in [(0.1, -9.), (9., -0.1), (-0.1, 9.), (-9., 0.1), (2., -2.)] {
            let x = interpolate(va, vb, pa, pb).x;
            assert!((3. ..=4.).contains(&x), "{va} {vb} -> {x}");
        }
    }

    #[test]
    fn non_negative_pairs_stay_on_the_segment() {
        let (pa, pb) = x_edge();
        for (va, vb) in [(0.5, 2.), (7., 0.25), (1., 1.)] {
            let x = interpolate(va, vb, pa, pb).x;
            assert!((3. ..=4.).contains(&x), "{va} {vb} -> {x}");
        }
    }

    #[test]
    fn negative_pairs_leave_the_segment() {
        let (pa, pb) = x_edge();
        // fraction = -1 / 2, measured from b.
        assert_eq!(interpolate(-1., -1., pa, pb).x, 4.5);
    }

    #[test]
    fn double_zero_is_nan() {
        let (pa, pb) = x_edge();
        let out = interpolate(0., 0., pa, pb);
        assert!(out.x.is_nan());
        assert_eq!((out.y, out.z), (1., 2.));
    }
}
