//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    target_range.0
        + ((value - source_range.0) * (target_range.1 - target_range.0)
            / (source_range.1 - source_range.0))
}

/// Clamp a value into `[min, max]`.
///
/// Unlike `f64::clamp` this does not panic if `min > max`, the upper bound
/// wins.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float,
{
    let mut ret = *value;

    if ret < *min {
        ret = *min
    }
    if ret > *max {
        ret = *max
    }

    ret
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// The return value `r` satisfies `0.0 <= r < rhs.abs()` in most cases, but
/// floating point round-off can give `r == rhs.abs()` when `lhs` is a tiny
/// negative number. Callers that need a half-open range must check for it.
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

/// Wrap a value into the half-open range `[low, low + period)`.
pub fn wrap<T>(value: T, low: T, period: T) -> T
where
    T: Float,
{
    let wrapped = rem_euclid(value - low, period) + low;

    // Round-off in rem_euclid can land exactly on the open end
    if wrapped >= low + period {
        wrapped - period
    } else {
        wrapped
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0.0, 1.0), (0.0, 0.3), 0.5), 0.15);
        assert_eq!(lin_map((0.0, 1.0), (-0.2, 0.2), 0.0), -0.2);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&2.0, &-1.0, &1.0), 1.0);
        assert_eq!(clamp(&-2.0, &-1.0, &1.0), -1.0);
        assert_eq!(clamp(&0.5, &-1.0, &1.0), 0.5);
    }

    #[test]
    fn test_rem_euclid() {
        assert_eq!(rem_euclid(5.0, 3.0), 2.0);
        assert_eq!(rem_euclid(-1.0, 3.0), 2.0);
    }

    #[test]
    fn test_wrap() {
        for &v in &[-10.0, -PI, -FRAC_PI_2, 0.0, 1.0, FRAC_PI_2, PI, 7.5] {
            let w = wrap(v, -FRAC_PI_2, PI);
            assert!(w >= -FRAC_PI_2 && w < FRAC_PI_2, "{} wrapped to {}", v, w);
        }
        assert!((wrap(FRAC_PI_2, -FRAC_PI_2, PI) + FRAC_PI_2).abs() < 1e-12);
    }
}
