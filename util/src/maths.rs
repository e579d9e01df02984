//! Utility maths functions
//!
//! Headings throughout the software are in degrees, measured anticlockwise from the field's
//! positive X axis, so that turning left increases the heading.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Apply polynomial coefficients to a value.
///
/// Coefficients are given highest order first, so `[a, b, c]` evaluates `a*x^2 + b*x + c`.
pub fn poly_val<T>(value: T, coeffs: &[T]) -> T
where
    T: Float,
{
    // Horner's method
    coeffs
        .iter()
        .fold(T::zero(), |acc, &coeff| acc * value + coeff)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Wrap a heading in degrees into the range (-180, 180].
pub fn normalise_heading_deg(heading_deg: f64) -> f64 {
    let wrapped = rem_euclid(heading_deg, 360.0);

    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Returns true if the heading is inside the valid range (-180, 180].
pub fn is_valid_heading_deg(heading_deg: f64) -> bool {
    heading_deg > -180.0 && heading_deg <= 180.0
}

/// Heading in degrees of the line from `(x, y)` to `(target_x, target_y)`.
pub fn target_heading_deg(x: f64, y: f64, target_x: f64, target_y: f64) -> f64 {
    normalise_heading_deg((target_y - y).atan2(target_x - x).to_degrees())
}

/// Number of degrees the robot must turn left (anticlockwise) to go from `heading_deg` to
/// `target_heading_deg`, in [0, 360).
pub fn left_turn_delta_deg(heading_deg: f64, target_heading_deg: f64) -> f64 {
    wrap_delta(target_heading_deg - heading_deg)
}

/// Number of degrees the robot must turn right (clockwise) to go from `heading_deg` to
/// `target_heading_deg`, in [0, 360).
pub fn right_turn_delta_deg(heading_deg: f64, target_heading_deg: f64) -> f64 {
    wrap_delta(heading_deg - target_heading_deg)
}

/// Euclidean distance between two points.
pub fn distance(x: f64, y: f64, x2: f64, y2: f64) -> f64 {
    (x2 - x).hypot(y2 - y)
}

fn wrap_delta(delta: f64) -> f64 {
    let d = rem_euclid(delta, 360.0);

    // Round-off can leave exactly 360
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}
