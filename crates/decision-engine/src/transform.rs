//! Parameterized response curves: `f(value, min, max) -> [0,1]`.
//!
//! Each variant is a closed-form shaping function. Unlike [`crate::spline`],
//! a `Transform` needs no precomputation and is cheap to copy.

/// Maps a raw reading into `[0,1]` given its declared input range.
///
/// `min == max` is treated as `0.0` rather than propagating a `0/0` division;
/// a host that configures a degenerate range gets a flat, always-zero curve
/// instead of `NaN` poisoning the composite score.
fn scale(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    (value - min) / (max - min)
}

fn clip(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// A closed set of pure shaping functions over `(value, min, max)`.
///
/// Kept as a tagged enum rather than a boxed closure: no allocation per
/// [`crate::Consideration`], and the full variant set is exhaustively
/// testable.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transform {
    /// `scale(v, min, max)`, unclipped.
    Identity,
    /// `1 - scale(v, min, max)`, unclipped.
    Inverted,
    /// `clip(slope * scale(v, min, max) + intercept)`.
    Linear { slope: f64, intercept: f64 },
    /// `1.0` if `v >= threshold`, else `0.0`.
    Binary { threshold: f64 },
    /// `scale(base^v, base^min, base^max)`.
    Exponential { base: f64 },
    /// `scale(v^exponent, min^exponent, max^exponent)`.
    Power { exponent: f64 },
}

impl Transform {
    /// Evaluates the curve. The result is not separately clipped here for
    /// `Identity`/`Inverted`/`Exponential`/`Power`, matching the table in the
    /// specification; [`crate::Consideration::compute_score`] applies the
    /// final `[0,1]` clip that its own invariant requires.
    ///
    /// Negative bases with non-integer exponents, or negative values raised
    /// to non-integer powers, are undefined behavior of the host's sensor
    /// design (they produce `NaN` from `f64::powf`) and are not this
    /// function's concern; callers that clamp non-finite scores (as
    /// `Consideration` does) absorb it safely.
    #[must_use]
    pub fn evaluate(&self, value: f64, min: f64, max: f64) -> f64 {
        match *self {
            Transform::Identity => scale(value, min, max),
            Transform::Inverted => 1.0 - scale(value, min, max),
            Transform::Linear { slope, intercept } => {
                clip(slope * scale(value, min, max) + intercept)
            }
            Transform::Binary { threshold } => {
                if value >= threshold {
                    1.0
                } else {
                    0.0
                }
            }
            Transform::Exponential { base } => {
                scale(base.powf(value), base.powf(min), base.powf(max))
            }
            Transform::Power { exponent } => {
                scale(value.powf(exponent), min.powf(exponent), max.powf(exponent))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn identity_scales_linearly() {
        let t = Transform::Identity;
        assert_eq!(t.evaluate(5.0, 0.0, 10.0), 0.5);
        assert_eq!(t.evaluate(0.0, 0.0, 10.0), 0.0);
        assert_eq!(t.evaluate(10.0, 0.0, 10.0), 1.0);
    }

    #[test]
    fn inverted_is_one_minus_identity() {
        let t = Transform::Inverted;
        assert_eq!(t.evaluate(5.0, 0.0, 10.0), 0.5);
        assert_eq!(t.evaluate(0.0, 0.0, 10.0), 1.0);
    }

    #[test]
    fn degenerate_range_returns_zero_instead_of_nan() {
        assert_eq!(Transform::Identity.evaluate(5.0, 3.0, 3.0), 0.0);
    }

    #[test]
    fn linear_clips_to_unit_interval() {
        let t = Transform::Linear {
            slope: 2.0,
            intercept: 0.0,
        };
        assert_eq!(t.evaluate(10.0, 0.0, 10.0), 1.0);
        assert_eq!(t.evaluate(0.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn binary_at_threshold_returns_one() {
        let t = Transform::Binary { threshold: 10.0 };
        assert_eq!(t.evaluate(10.0, 0.0, 20.0), 1.0);
        assert_eq!(t.evaluate(9.999, 0.0, 20.0), 0.0);
        assert_eq!(t.evaluate(5.0, 0.0, 20.0), 0.0);
    }

    #[test]
    fn exponential_is_monotone_for_base_above_one() {
        let t = Transform::Exponential { base: 2.0 };
        let low = t.evaluate(0.0, 0.0, 10.0);
        let mid = t.evaluate(5.0, 0.0, 10.0);
        let high = t.evaluate(10.0, 0.0, 10.0);
        assert_eq!(low, 0.0);
        assert_eq!(high, 1.0);
        assert!(mid > low && mid < high);
    }

    #[test]
    fn power_matches_identity_at_exponent_one() {
        let power = Transform::Power { exponent: 1.0 };
        let identity = Transform::Identity;
        for v in [0.0, 2.5, 7.0, 10.0] {
            assert!((power.evaluate(v, 0.0, 10.0) - identity.evaluate(v, 0.0, 10.0)).abs() < 1e-12);
        }
    }
}
