//! One axis of utility: a sensor reading shaped into `[0,1]`.

use crate::spline::Spline;
use crate::transform::Transform;

fn scale(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    (value - min) / (max - min)
}

/// Either shape of response curve a [`Consideration`] can use. The
/// specification's two historical shapes (`Transform`-backed and
/// `Spline`-backed considerations) are unified behind this single
/// `evaluate` entry point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Curve {
    Transform(Transform),
    Spline(Spline),
}

impl Curve {
    fn evaluate(&self, raw: f64, min: f64, max: f64) -> f64 {
        match self {
            Curve::Transform(t) => t.evaluate(raw, min, max),
            Curve::Spline(s) => s.evaluate(scale(raw, min, max)),
        }
    }
}

impl From<Transform> for Curve {
    fn from(t: Transform) -> Self {
        Curve::Transform(t)
    }
}

impl From<Spline> for Curve {
    fn from(s: Spline) -> Self {
        Curve::Spline(s)
    }
}

/// One input to a [`crate::Decision`]'s composite score: a sensor callback,
/// the input range it's declared over, and the curve that shapes it.
///
/// Immutable after construction. The sensor callback may read and write
/// host state through shared captures (e.g. an `Rc<RefCell<_>>>`); such
/// writes are visible to any consideration or action evaluated later in the
/// same tick, since the engine evaluates considerations in declaration
/// order within a single thread.
pub struct Consideration<'a> {
    description: String,
    min: f64,
    max: f64,
    curve: Curve,
    sensor: Box<dyn Fn() -> f64 + 'a>,
}

impl<'a> Consideration<'a> {
    /// Builds a consideration over `[min, max]` shaped by `curve`, reading
    /// raw values from `sensor`.
    pub fn new(
        description: impl Into<String>,
        min: f64,
        max: f64,
        curve: impl Into<Curve>,
        sensor: impl Fn() -> f64 + 'a,
    ) -> Self {
        Self {
            description: description.into(),
            min,
            max,
            curve: curve.into(),
            sensor: Box::new(sensor),
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Reads the sensor and shapes it into `[0,1]`.
    ///
    /// Non-finite readings (`NaN`, `+-inf`) are clamped to `0.0` before
    /// shaping rather than propagated, per the engine's defensive-clamp
    /// policy for undefined sensor behavior.
    #[must_use]
    pub fn compute_score(&self) -> f64 {
        let raw = (self.sensor)();
        let raw = if raw.is_finite() { raw } else { 0.0 };
        self.curve.evaluate(raw, self.min, self.max).clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for Consideration<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Consideration")
            .field("description", &self.description)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}
