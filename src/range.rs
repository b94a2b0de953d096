//! Numeric helpers shared by dispatch and the range combiner.
//!
//! Axis readings arrive normalised to `[-1, 1]`; every ranged action declares its own
//! closed output interval. These helpers convert between the two and keep values inside it.

/// Closed numeric interval `[min, max]` declared by a ranged action.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Midpoint of the interval.
    pub fn mid(&self) -> f64 {
        mid_range(self.min, self.max)
    }

    /// Clamp `value` into the interval.
    pub fn clamp(&self, value: f64) -> f64 {
        cap_to_range(self.min, self.max, value)
    }

    /// Map a normalised axis reading onto this interval.
    pub fn lerp_axis(&self, axis_value: f64) -> f64 {
        lerp_axis_to_range(*self, axis_value)
    }
}

impl From<(f64, f64)> for Span {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

/// Clamp `value` into `[from, to]`.
pub fn cap_to_range(from: f64, to: f64, value: f64) -> f64 {
    if value > to {
        to
    } else if value < from {
        from
    } else {
        value
    }
}

/// Midpoint of `[from, to]`.
pub fn mid_range(from: f64, to: f64) -> f64 {
    (from + to) / 2.0
}

/// True when `value` lies strictly inside the open interval `(from, to)`.
pub fn is_in_range(from: f64, to: f64, value: f64) -> bool {
    value < to && value > from
}

/// Linear interpolation of an axis reading in `[-1, 1]` into `range`.
///
/// `-1` maps to `range.min`, `1` to `range.max`, `0` to the midpoint. Values outside
/// `[-1, 1]` extrapolate; callers clamp when they need to.
pub fn lerp_axis_to_range(range: Span, axis_value: f64) -> f64 {
    let t = (axis_value + 1.0) / 2.0;
    (1.0 - t) * range.min + t * range.max
}
