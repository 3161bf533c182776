use std::fmt::Debug;

use crate::{BigGuy, BigGuyError, CompactGuy};

/// Operations shared by the four-limb [`BigGuy`] and the single-word
/// [`CompactGuy`]. Code generic over this trait behaves identically on
/// either, apart from range and resolution.
pub trait FixedPoint: Copy + Ord + Debug {
    const ZERO: Self;
    const ONE: Self;
    const MIN: Self;
    const MAX: Self;

    fn from_f64(d: f64) -> Result<Self, BigGuyError>;
    fn from_int(i: i64) -> Result<Self, BigGuyError>;
    fn to_f64(self) -> f64;
    fn to_int(self) -> i64;

    /// `self += y * m`; `self` is unchanged on error. Both backends reject
    /// the same multipliers: those whose product with the sign of `y` has no
    /// split into signed 32-bit halves.
    fn add_mult(&mut self, y: Self, m: i64) -> Result<(), BigGuyError>;
    fn ceil(self) -> Result<Self, BigGuyError>;
    fn checked_neg(self) -> Result<Self, BigGuyError>;

    fn add(&mut self, y: Self) -> Result<(), BigGuyError> {
        self.add_mult(y, 1)
    }

    fn sub(&mut self, y: Self) -> Result<(), BigGuyError> {
        self.add_mult(y.checked_neg()?, 1)
    }
}

macro_rules! impl_fixed_point {
    ($ty:ty) => {
        impl FixedPoint for $ty {
            const ZERO: Self = <$ty>::ZERO;
            const ONE: Self = <$ty>::ONE;
            const MIN: Self = <$ty>::MIN;
            const MAX: Self = <$ty>::MAX;

            fn from_f64(d: f64) -> Result<Self, BigGuyError> {
                <$ty>::from_f64(d)
            }

            fn from_int(i: i64) -> Result<Self, BigGuyError> {
                <$ty>::from_int(i)
            }

            fn to_f64(self) -> f64 {
                <$ty>::to_f64(self)
            }

            fn to_int(self) -> i64 {
                <$ty>::to_int(self)
            }

            fn add_mult(&mut self, y: Self, m: i64) -> Result<(), BigGuyError> {
                <$ty>::add_mult(self, y, m)
            }

            fn ceil(self) -> Result<Self, BigGuyError> {
                <$ty>::ceil(self)
            }

            fn checked_neg(self) -> Result<Self, BigGuyError> {
                <$ty>::checked_neg(self)
            }
        }
    };
}

impl_fixed_point!(BigGuy);
impl_fixed_point!(CompactGuy);

/// Sum of `terms` accumulated from zero, the typical use: adding up many
/// small contributions without drift.
pub fn sum<T: FixedPoint>(terms: impl IntoIterator<Item = T>) -> Result<T, BigGuyError> {
    terms.into_iter().try_fold(T::ZERO, |mut acc, term| {
        acc.add(term)?;
        Ok(acc)
    })
}

/// `sum(y_i * m_i)`, e.g. a row of integer coefficients against a vector of
/// bounds.
pub fn dot<T: FixedPoint>(pairs: impl IntoIterator<Item = (T, i64)>) -> Result<T, BigGuyError> {
    pairs.into_iter().try_fold(T::ZERO, |mut acc, (y, m)| {
        acc.add_mult(y, m)?;
        Ok(acc)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenths<T: FixedPoint>() -> T {
        sum(std::iter::repeat(T::from_f64(0.1).unwrap()).take(10)).unwrap()
    }

    #[test]
    fn test_sum_matches_scaled_accumulate() {
        let tenth = BigGuy::from_f64(0.1).unwrap();
        let mut scaled = BigGuy::ZERO;
        scaled.add_mult(tenth, 10).unwrap();
        assert_eq!(tenths::<BigGuy>(), scaled);

        // 0.1 truncated to 32 fractional bits sits below 0.1
        assert!(tenths::<CompactGuy>() < CompactGuy::ONE);
    }

    #[test]
    fn test_dot() {
        let row = [(1.5, 2), (-0.25, 4), (3.0, -1)];
        let wide = dot(row.iter().map(|&(d, m)| (BigGuy::from_f64(d).unwrap(), m))).unwrap();
        let compact = dot(row.iter().map(|&(d, m)| (CompactGuy::from_f64(d).unwrap(), m))).unwrap();
        assert_eq!(wide.to_f64(), -1.0);
        assert_eq!(compact.to_f64(), -1.0);
    }

    fn multiplier_accepted<T: FixedPoint>(y: f64, m: i64) -> bool {
        let mut x = T::ZERO;
        !matches!(
            x.add_mult(T::from_f64(y).unwrap(), m),
            Err(BigGuyError::MultiplierOutOfRange(_))
        )
    }

    #[test]
    fn test_backends_accept_same_multipliers() {
        let multipliers = [
            0,
            1,
            -1,
            1 << 31,
            1 << 40,
            -(1 << 40),
            i64::MAX,
            i64::MIN,
            i64::MIN + 1,
        ];
        for y in [0.0, 1.0, -1.0] {
            for m in multipliers {
                assert_eq!(
                    multiplier_accepted::<BigGuy>(y, m),
                    multiplier_accepted::<CompactGuy>(y, m),
                    "{} * {}",
                    y,
                    m
                );
            }
        }
        assert!(!multiplier_accepted::<CompactGuy>(2f64.powi(-32), i64::MAX));
    }

    #[test]
    fn test_sum_reports_overflow() {
        let err = sum([CompactGuy::MAX, CompactGuy::ONE]).unwrap_err();
        assert!(matches!(err, BigGuyError::AddMultOverflow { .. }));
    }
}
