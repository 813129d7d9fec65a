//! Control-point curves: `Linear`, `StepBefore`, `StepAfter`, `MonotoneCubic`.
//!
//! Unlike [`crate::transform::Transform`], a spline precomputes state once at
//! construction (sorting, and for `MonotoneCubic` its per-segment
//! coefficients) so that every later call to [`Spline::evaluate`] is
//! `O(log n)` in the number of control points.

/// A single `(x, y)` control point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
}

impl ControlPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for ControlPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Interpolation rule applied within a segment `[points[i], points[i+1])`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interpolation {
    Linear,
    StepBefore,
    StepAfter,
}

fn evaluate_piecewise(points: &[ControlPoint], mode: Interpolation, x: f64) -> f64 {
    debug_assert!(!points.is_empty(), "spline must have at least one control point");
    let last = points.len() - 1;
    if points.len() == 1 || x <= points[0].x {
        return points[0].y;
    }
    if x >= points[last].x {
        return points[last].y;
    }
    match points.binary_search_by(|p| p.x.partial_cmp(&x).expect("control point x is NaN")) {
        Ok(i) => points[i].y,
        Err(next) => {
            let i = next - 1;
            let (p0, p1) = (points[i], points[i + 1]);
            match mode {
                Interpolation::Linear => {
                    let t = (x - p0.x) / (p1.x - p0.x);
                    (1.0 - t) * p0.y + t * p1.y
                }
                Interpolation::StepBefore => p1.y,
                Interpolation::StepAfter => p0.y,
            }
        }
    }
}

/// Fritsch-Carlson monotone cubic Hermite spline: tangents chosen per
/// control point so the curve never overshoots between monotone data, then
/// a cubic `y = y_i + c1*d + c2*d^2 + c3*d^3` per segment (`d = x - x_i`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonotoneCubic {
    points: Vec<ControlPoint>,
    /// Tangent at each control point, length `points.len()`.
    tangents: Vec<f64>,
    /// Per-segment quadratic coefficient, length `points.len() - 1`.
    c2: Vec<f64>,
    /// Per-segment cubic coefficient, length `points.len() - 1`.
    c3: Vec<f64>,
}

impl MonotoneCubic {
    fn new(mut points: Vec<ControlPoint>) -> Self {
        points.sort_by(|a, b| a.x.partial_cmp(&b.x).expect("control point x is NaN"));
        let n = points.len();
        if n < 2 {
            return Self {
                points,
                tangents: vec![0.0; n],
                c2: Vec::new(),
                c3: Vec::new(),
            };
        }

        let mut dx = vec![0.0; n - 1];
        let mut slope = vec![0.0; n - 1];
        for i in 0..n - 1 {
            dx[i] = points[i + 1].x - points[i].x;
            slope[i] = (points[i + 1].y - points[i].y) / dx[i];
        }

        let mut tangents = vec![0.0; n];
        tangents[0] = slope[0];
        tangents[n - 1] = slope[n - 2];
        for i in 1..n - 1 {
            if slope[i - 1] * slope[i] <= 0.0 {
                tangents[i] = 0.0;
            } else {
                let common = dx[i - 1] + dx[i];
                tangents[i] =
                    3.0 * common / ((common + dx[i]) / slope[i - 1] + (common + dx[i - 1]) / slope[i]);
            }
        }

        let mut c2 = vec![0.0; n - 1];
        let mut c3 = vec![0.0; n - 1];
        for i in 0..n - 1 {
            let common = tangents[i] + tangents[i + 1] - 2.0 * slope[i];
            let inv_dx = 1.0 / dx[i];
            c2[i] = (slope[i] - tangents[i] - common) * inv_dx;
            c3[i] = common * inv_dx * inv_dx;
        }

        Self {
            points,
            tangents,
            c2,
            c3,
        }
    }

    fn evaluate(&self, x: f64) -> f64 {
        let last = self.points.len() - 1;
        if self.points.len() == 1 || x <= self.points[0].x {
            return self.points[0].y;
        }
        if x >= self.points[last].x {
            return self.points[last].y;
        }
        match self
            .points
            .binary_search_by(|p| p.x.partial_cmp(&x).expect("control point x is NaN"))
        {
            Ok(i) => self.points[i].y,
            Err(next) => {
                let i = next - 1;
                let d = x - self.points[i].x;
                self.points[i].y + self.tangents[i] * d + self.c2[i] * d * d + self.c3[i] * d * d * d
            }
        }
    }
}

/// A 1-D curve built from control points, shaping a scaled `[0,1]` input.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Spline {
    Linear(Vec<ControlPoint>),
    StepBefore(Vec<ControlPoint>),
    StepAfter(Vec<ControlPoint>),
    MonotoneCubic(MonotoneCubic),
}

impl Spline {
    /// Builds a linearly-interpolated spline. Input need not be pre-sorted;
    /// construction stably sorts by `x`.
    #[must_use]
    pub fn linear(points: impl Into<Vec<ControlPoint>>) -> Self {
        let mut points = points.into();
        points.sort_by(|a, b| a.x.partial_cmp(&b.x).expect("control point x is NaN"));
        assert!(!points.is_empty(), "spline requires at least one control point");
        Spline::Linear(points)
    }

    /// Builds a spline that within segment `i` takes on `y[i+1]` (the "next" value).
    #[must_use]
    pub fn step_before(points: impl Into<Vec<ControlPoint>>) -> Self {
        let mut points = points.into();
        points.sort_by(|a, b| a.x.partial_cmp(&b.x).expect("control point x is NaN"));
        assert!(!points.is_empty(), "spline requires at least one control point");
        Spline::StepBefore(points)
    }

    /// Builds a spline that within segment `i` takes on `y[i]` (the "previous" value).
    #[must_use]
    pub fn step_after(points: impl Into<Vec<ControlPoint>>) -> Self {
        let mut points = points.into();
        points.sort_by(|a, b| a.x.partial_cmp(&b.x).expect("control point x is NaN"));
        assert!(!points.is_empty(), "spline requires at least one control point");
        Spline::StepAfter(points)
    }

    /// Builds a Fritsch-Carlson monotone cubic spline, precomputing its
    /// per-segment coefficients.
    #[must_use]
    pub fn monotone_cubic(points: impl Into<Vec<ControlPoint>>) -> Self {
        let points = points.into();
        assert!(!points.is_empty(), "spline requires at least one control point");
        Spline::MonotoneCubic(MonotoneCubic::new(points))
    }

    /// Evaluates the curve at `x`. Below the first control point's `x`, or
    /// above the last, the curve flat-clamps to that endpoint's `y`.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Spline::Linear(points) => evaluate_piecewise(points, Interpolation::Linear, x),
            Spline::StepBefore(points) => evaluate_piecewise(points, Interpolation::StepBefore, x),
            Spline::StepAfter(points) => evaluate_piecewise(points, Interpolation::StepAfter, x),
            Spline::MonotoneCubic(mc) => mc.evaluate(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn points(pairs: &[(f64, f64)]) -> Vec<ControlPoint> {
        pairs.iter().copied().map(ControlPoint::from).collect()
    }

    #[test]
    fn linear_hits_control_points_exactly() {
        let spline = Spline::linear(points(&[(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)]));
        assert_eq!(spline.evaluate(0.0), 0.0);
        assert_eq!(spline.evaluate(1.0), 10.0);
        assert_eq!(spline.evaluate(2.0), 0.0);
        assert_eq!(spline.evaluate(0.5), 5.0);
    }

    #[test]
    fn linear_clamps_outside_range() {
        let spline = Spline::linear(points(&[(0.0, 2.0), (1.0, 8.0)]));
        assert_eq!(spline.evaluate(-5.0), 2.0);
        assert_eq!(spline.evaluate(50.0), 8.0);
    }

    #[test]
    fn step_before_and_step_after() {
        let before = Spline::step_before(points(&[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]));
        let after = Spline::step_after(points(&[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]));
        assert_eq!(before.evaluate(0.5), 2.0);
        assert_eq!(after.evaluate(0.5), 1.0);
        // Exact control points are unaffected by the step direction.
        assert_eq!(before.evaluate(1.0), 2.0);
        assert_eq!(after.evaluate(1.0), 2.0);
    }

    #[test]
    fn unsorted_input_is_sorted_at_construction() {
        let spline = Spline::linear(points(&[(2.0, 0.0), (0.0, 0.0), (1.0, 10.0)]));
        assert_eq!(spline.evaluate(1.0), 10.0);
    }

    #[test]
    fn monotone_cubic_hits_control_points() {
        let spline = Spline::monotone_cubic(points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 0.0)]));
        assert_eq!(spline.evaluate(0.0), 0.0);
        assert_eq!(spline.evaluate(1.0), 1.0);
        assert_eq!(spline.evaluate(2.0), 1.0);
        assert_eq!(spline.evaluate(3.0), 0.0);
    }

    #[test]
    fn monotone_cubic_preserves_shape() {
        // Non-decreasing on [0,1], flat on [1,2], non-increasing on [2,3].
        let spline = Spline::monotone_cubic(points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 0.0)]));
        let mut prev = spline.evaluate(0.0);
        for i in 1..=10 {
            let x = i as f64 / 10.0;
            let y = spline.evaluate(x);
            assert!(y + 1e-9 >= prev, "should be non-decreasing on [0,1]: {prev} -> {y}");
            prev = y;
        }
        for i in 10..=20 {
            let x = i as f64 / 10.0;
            assert!(
                (spline.evaluate(x) - 1.0).abs() < 0.05,
                "should stay near 1.0 on [1,2], got {}",
                spline.evaluate(x)
            );
        }
        let mut prev = spline.evaluate(2.0);
        for i in 21..=30 {
            let x = i as f64 / 10.0;
            let y = spline.evaluate(x);
            assert!(y <= prev + 1e-9, "should be non-increasing on [2,3]: {prev} -> {y}");
            prev = y;
        }
        let mid = spline.evaluate(1.5);
        assert!((0.95..=1.0).contains(&mid), "midpoint should be near saturation, got {mid}");
    }

    #[test]
    fn monotone_cubic_clamps_outside_range() {
        let spline = Spline::monotone_cubic(points(&[(0.0, 0.0), (1.0, 1.0)]));
        assert_eq!(spline.evaluate(-1.0), 0.0);
        assert_eq!(spline.evaluate(2.0), 1.0);
    }

    #[test]
    fn single_control_point_is_flat() {
        let spline = Spline::linear(points(&[(5.0, 3.0)]));
        assert_eq!(spline.evaluate(-100.0), 3.0);
        assert_eq!(spline.evaluate(100.0), 3.0);
    }
}
