//! Numerically total geometric predicates for the sweepline.
//!
//! None of these functions panic. Degenerate input (coincident sites,
//! collinear triples, a vanishing discriminant) is handled by falling back
//! to a documented sentinel rather than by rejecting the input: the caller
//! relies on that totality to keep the sweep itself from ever faulting.

use cgmath::Point2;

pub type Point = Point2<f64>;

/// Tolerance used everywhere a predicate below would otherwise divide by a
/// quantity that should be exactly zero but isn't, due to round-off.
pub(crate) const EPSILON: f64 = 1e-10;

/// X coordinate where the parabola anchored at `a` gives way to the one
/// anchored at `b`, both traced from sites below a horizontal directrix at
/// `sweep_y`.
///
/// Precondition: `a.x <= b.x`. `positive_big` selects which signed infinity
/// is returned in the fully degenerate case (two sites level with each
/// other and with the sweepline moving away from both); it lets the caller
/// pick a breakpoint ordering that is consistent with which side of the
/// pair is being queried.
pub(crate) fn breakpoint_x(a: Point, b: Point, sweep_y: f64, positive_big: bool) -> f64 {
    if a.y > sweep_y - EPSILON {
        return a.x;
    }
    if b.y > sweep_y - EPSILON {
        return b.x;
    }

    let u = b.x - a.x;
    let v = b.y - a.y;
    let h = sweep_y - a.y;

    if v.abs() < EPSILON {
        return if u > -EPSILON {
            0.5 * (a.x + b.x)
        } else if positive_big {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        };
    }

    // Translate so `a` sits at the origin and solve the parabola-intersection
    // quadratic in the translated x. A = v, B = -2hu, C = h(u^2 + v^2 - vh).
    let aa = v;
    let bb = -2.0 * h * u;
    let cc = h * (u * u + v * v - v * h);

    let discriminant = (bb * bb - 4.0 * aa * cc).max(0.0);
    let sqrt_disc = discriminant.sqrt();

    // Pick whichever root of the quadratic formula avoids subtracting two
    // nearly-equal numbers (Muller's method), the other root follows from
    // product-of-roots = C/A.
    let x = if bb > 0.0 {
        (-bb - sqrt_disc) / (2.0 * aa)
    } else {
        2.0 * cc / (-bb + sqrt_disc)
    };

    a.x + x
}

/// Circumcenter of the triangle `a`, `b`, `c`, or `(inf, inf)` if the three
/// points are collinear.
pub(crate) fn circumcenter(a: Point, b: Point, c: Point) -> Point {
    let x1 = b.x - a.x;
    let y1 = b.y - a.y;
    let x2 = c.x - a.x;
    let y2 = c.y - a.y;

    let d = 2.0 * (x1 * y2 - y1 * x2);
    if d == 0.0 {
        return Point::new(f64::INFINITY, f64::INFINITY);
    }

    let len1 = x1 * x1 + y1 * y1;
    let len2 = x2 * x2 + y2 * y2;
    let ux = (y2 * len1 - y1 * len2) / d;
    let uy = (x1 * len2 - x2 * len1) / d;

    Point::new(a.x + ux, a.y + uy)
}

/// Y coordinate of the topmost point of the circle through `a`, `b`, `c` —
/// the moment the sweepline becomes tangent to it. Collinear triples yield
/// `+inf`, consistent with a circle event that can never fire.
pub(crate) fn circumcircle_top_y(a: Point, b: Point, c: Point) -> f64 {
    let center = circumcenter(a, b, c);
    let dx = center.x - a.x;
    let dy = center.y - a.y;
    let y = center.y + (dx * dx + dy * dy).sqrt();
    if y.is_nan() {
        f64::INFINITY
    } else {
        y
    }
}

/// True if `a`, `b`, `c` turn counterclockwise, i.e. `b` converges with `c`
/// as the sweepline advances rather than diverging from it.
pub(crate) fn is_ccw(a: Point, b: Point, c: Point) -> bool {
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    cross > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_midpoint_for_level_sites() {
        let a = Point::new(0.0, 1.0);
        let b = Point::new(2.0, 1.0);
        let x = breakpoint_x(a, b, 2.0, true);
        assert!((x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn breakpoint_pins_to_site_reaching_the_sweepline() {
        let a = Point::new(0.0, 3.0);
        let b = Point::new(2.0, 1.0);
        assert_eq!(breakpoint_x(a, b, 3.0, true), 0.0);
    }

    #[test]
    fn circumcenter_of_right_triangle() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 0.0);
        let c = Point::new(0.0, 2.0);
        let center = circumcenter(a, b, c);
        assert!((center.x - 1.0).abs() < 1e-9);
        assert!((center.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn circumcenter_collinear_is_sentinel() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let c = Point::new(2.0, 0.0);
        let center = circumcenter(a, b, c);
        assert!(center.x.is_infinite());
    }

    #[test]
    fn ccw_sign() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let c = Point::new(0.0, 1.0);
        assert!(is_ccw(a, b, c));
        assert!(!is_ccw(a, c, b));
    }
}
