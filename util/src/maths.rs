//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where 
    T: Float 
{
    target_range.0 
        + ((value - source_range.0) 
        * (target_range.1 - target_range.0) 
        / (source_range.1 - source_range.0))
}

/// Saturate a value to the symmetric range `[-limit, limit]`.
///
/// `limit` is expected to be positive. NaN values are passed through
/// unchanged.
pub fn saturate<T>(value: T, limit: T) -> T
where
    T: Float
{
    if value > limit {
        limit
    }
    else if value < -limit {
        -limit
    }
    else {
        value
    }
}

/// Saturate a value to `[-limit, limit]` and then map it into `[-1, 1]`.
pub fn normalise<T>(value: T, limit: T) -> T
where
    T: Float
{
    lin_map(
        (-limit, limit),
        (-T::one(), T::one()),
        saturate(value, limit)
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0f64, 10f64), (0f64, 1f64), 5f64), 0.5);
        assert_eq!(lin_map((-2f64, 2f64), (-1f64, 1f64), -2f64), -1.0);
        assert_eq!(lin_map((0f64, 1f64), (10f64, 20f64), 0.25f64), 12.5);
    }

    #[test]
    fn test_saturate() {
        assert_eq!(saturate(0.3f64, 0.5), 0.3);
        assert_eq!(saturate(0.7f64, 0.5), 0.5);
        assert_eq!(saturate(-0.7f64, 0.5), -0.5);
        assert_eq!(saturate(f64::INFINITY, 0.5), 0.5);
        assert_eq!(saturate(f64::NEG_INFINITY, 0.5), -0.5);
        assert!(saturate(f64::NAN, 0.5).is_nan());
    }

    #[test]
    fn test_normalise() {
        let limit = 25f64.to_radians();

        assert_eq!(normalise(limit, limit), 1.0);
        assert_eq!(normalise(-limit, limit), -1.0);
        assert_eq!(normalise(10.0 * limit, limit), 1.0);
        assert_eq!(normalise(-1e300, limit), -1.0);
        assert!((normalise(0.5 * limit, limit) - 0.5).abs() < 1e-12);
        assert!(normalise(0f64, limit).abs() < 1e-12);
    }
}
