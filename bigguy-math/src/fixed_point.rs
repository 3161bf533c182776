use std::cmp::Ordering;
use std::fmt;

use crate::error::BigGuyError;

/// 2^32 as a float, the weight of one limb relative to the next.
pub(crate) const LIMB_RADIX: f64 = 4_294_967_296.0;
/// 2^31, the magnitude bound of the top limb.
const SIGN_RADIX: f64 = 2_147_483_648.0;

pub(crate) const SIGN_BIT: u32 = 0x8000_0000;
pub(crate) const I32_MAX_BITS: u32 = 0x7fff_ffff;

/// 64.64 signed fixed-point number
/// Layout: `ihi . ilo | fhi . flo`, two's complement over all 128 bits
/// Value: `ihi·2^32 + ilo + fhi·2^-32 + flo·2^-64`
/// Range: [`BigGuy::MIN`, `BigGuy::MAX`], one ulp narrower than the bit pattern allows
/// Overflow behavior: reported as [`BigGuyError`], never wrapped
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BigGuy {
    pub(crate) ihi: u32,
    pub(crate) ilo: u32,
    pub(crate) fhi: u32,
    pub(crate) flo: u32,
}

impl BigGuy {
    /// Smallest representable value. The pattern one below it,
    /// `0x80000000_00000000.00000000_00000000`, is reserved: it has no
    /// negation.
    pub const MIN: Self = Self::from_limbs(SIGN_BIT, 0, 0, 1);
    pub const MAX: Self = Self::from_limbs(I32_MAX_BITS, u32::MAX, u32::MAX, u32::MAX);
    pub const ZERO: Self = Self::from_limbs(0, 0, 0, 0);
    pub const ONE: Self = Self::from_limbs(0, 1, 0, 0);
    /// 2^-64
    pub const EPSILON: Self = Self::from_limbs(0, 0, 0, 1);

    pub(crate) const RESERVED: Self = Self::from_limbs(SIGN_BIT, 0, 0, 0);

    /// Builds a value from raw limbs, most significant first.
    pub const fn from_limbs(ihi: u32, ilo: u32, fhi: u32, flo: u32) -> Self {
        Self { ihi, ilo, fhi, flo }
    }

    /// Raw limbs, most significant first: `[ihi, ilo, fhi, flo]`.
    pub const fn limbs(&self) -> [u32; 4] {
        [self.ihi, self.ilo, self.fhi, self.flo]
    }

    /// Limbs least significant first, the order carries travel in.
    pub(crate) const fn le_limbs(&self) -> [u32; 4] {
        [self.flo, self.fhi, self.ilo, self.ihi]
    }

    pub(crate) const fn from_le_limbs(limbs: [u32; 4]) -> Self {
        Self::from_limbs(limbs[3], limbs[2], limbs[1], limbs[0])
    }

    pub fn is_negative(&self) -> bool {
        self.ihi & SIGN_BIT != 0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn is_integer(&self) -> bool {
        self.fhi == 0 && self.flo == 0
    }

    /// False only for the reserved pattern below [`BigGuy::MIN`].
    pub fn is_representable(&self) -> bool {
        *self != Self::RESERVED
    }

    /// Two's-complement negation: complement every limb, then add one from
    /// `flo` upward. The flag is set when the carry lands on an `ihi` of
    /// `0x7fffffff`, which only happens for the reserved pattern; the
    /// returned value is then the reserved pattern again.
    pub fn overflowing_neg(self) -> (Self, bool) {
        let mut limbs = self.le_limbs().map(|limb| u32::MAX - limb);
        for i in 0..3 {
            if limbs[i] < u32::MAX {
                limbs[i] += 1;
                return (Self::from_le_limbs(limbs), false);
            }
            limbs[i] = 0;
        }
        let overflowed = limbs[3] == I32_MAX_BITS;
        limbs[3] = limbs[3].wrapping_add(1);
        (Self::from_le_limbs(limbs), overflowed)
    }

    pub fn checked_neg(self) -> Result<Self, BigGuyError> {
        match self.overflowing_neg() {
            (negated, false) => Ok(negated),
            (_, true) => Err(BigGuyError::negate(self)),
        }
    }

    /// Negates in place. On error `self` is unchanged.
    pub fn negate(&mut self) -> Result<(), BigGuyError> {
        *self = self.checked_neg()?;
        Ok(())
    }

    /// Convert from f64 by truncating decomposition, limb by limb
    ///
    /// Bits below 2^-64 are dropped; every other bit of `d` is kept exactly.
    pub fn from_f64(d: f64) -> Result<Self, BigGuyError> {
        if d.is_nan() {
            return Err(BigGuyError::NotFinite(d).logged());
        }
        let negative = d < 0.0;
        let mut rem = d.abs();

        if rem / LIMB_RADIX >= SIGN_RADIX {
            return Err(BigGuyError::FloatOutOfRange(d).logged());
        }

        let ihi = (rem / LIMB_RADIX) as u32;
        rem -= f64::from(ihi) * LIMB_RADIX;
        let ilo = rem as u32;
        rem -= f64::from(ilo);
        let fhi = (rem * LIMB_RADIX) as u32;
        rem -= f64::from(fhi) / LIMB_RADIX;
        let flo = (rem * LIMB_RADIX * LIMB_RADIX) as u32;

        let magnitude = Self::from_limbs(ihi, ilo, fhi, flo);
        if negative {
            magnitude.checked_neg()
        } else {
            Ok(magnitude)
        }
    }

    /// Convert from an integer in `(-2^31, 2^31)`
    pub fn from_int(i: i64) -> Result<Self, BigGuyError> {
        let magnitude = i
            .checked_abs()
            .filter(|m| *m <= i64::from(i32::MAX))
            .ok_or_else(|| BigGuyError::IntOutOfRange(i).logged())?;

        let x = Self::from_limbs(0, magnitude as u32, 0, 0);
        if i < 0 {
            x.checked_neg()
        } else {
            Ok(x)
        }
    }

    /// Convert back to f64 (rounds to nearest once the value needs more than
    /// 53 significant bits)
    pub fn to_f64(self) -> f64 {
        let (magnitude, sign) = if self.is_negative() {
            (self.overflowing_neg().0, -1.0)
        } else {
            (self, 1.0)
        };

        sign * (f64::from(magnitude.ihi) * LIMB_RADIX
            + f64::from(magnitude.ilo)
            + f64::from(magnitude.fhi) / LIMB_RADIX
            + f64::from(magnitude.flo) / (LIMB_RADIX * LIMB_RADIX))
    }

    /// Integer part, truncated toward zero. Every value fits in an `i64`.
    pub fn to_int(self) -> i64 {
        let negative = self.is_negative();
        let magnitude = if negative {
            self.overflowing_neg().0
        } else {
            self
        };
        let int = ((u64::from(magnitude.ihi) << 32) | u64::from(magnitude.ilo)) as i64;
        // The reserved pattern has magnitude 2^63, which wraps to i64::MIN
        // and stays there.
        if negative {
            int.wrapping_neg()
        } else {
            int
        }
    }

    /// Smallest integer not below `self`.
    pub fn ceil(self) -> Result<Self, BigGuyError> {
        if self.is_integer() {
            return Ok(self);
        }

        let mut x = Self::from_limbs(self.ihi, self.ilo.wrapping_add(1), 0, 0);
        if x.ilo == 0 {
            if x.ihi == I32_MAX_BITS {
                return Err(BigGuyError::ceil(self));
            }
            x.ihi = x.ihi.wrapping_add(1);
        }
        Ok(x)
    }

    /// Largest integer not above `self`. Only fails for values below
    /// `MIN + 1`, whose floor is the reserved pattern.
    pub fn floor(self) -> Result<Self, BigGuyError> {
        let x = Self::from_limbs(self.ihi, self.ilo, 0, 0);
        if x.is_representable() {
            Ok(x)
        } else {
            Err(BigGuyError::floor(self))
        }
    }
}

impl Ord for BigGuy {
    fn cmp(&self, other: &Self) -> Ordering {
        // Negative values have the top bit set, so put sign first; within
        // one sign the limbs compare as plain unsigned integers.
        other
            .is_negative()
            .cmp(&self.is_negative())
            .then_with(|| self.limbs().cmp(&other.limbs()))
    }
}

impl PartialOrd for BigGuy {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for BigGuy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BigGuy({:08x}_{:08x}.{:08x}_{:08x})",
            self.ihi, self.ilo, self.fhi, self.flo
        )
    }
}

impl fmt::Display for BigGuy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

impl TryFrom<f64> for BigGuy {
    type Error = BigGuyError;

    fn try_from(d: f64) -> Result<Self, Self::Error> {
        Self::from_f64(d)
    }
}

impl TryFrom<i64> for BigGuy {
    type Error = BigGuyError;

    fn try_from(i: i64) -> Result<Self, Self::Error> {
        Self::from_int(i)
    }
}

impl From<BigGuy> for f64 {
    fn from(x: BigGuy) -> f64 {
        x.to_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_roundtrip() {
        let input = [0.0, 1.0, -1.0, 0.5, -0.5, 127.0, -128.0, 65535.75, -119.46484375];
        for &val in &input {
            let x = BigGuy::from_f64(val).unwrap();
            assert_eq!(x.to_f64(), val, "Mismatch for {}", val);
        }
    }

    #[test]
    fn test_limb_layout() {
        let x = BigGuy::from_f64(7.0 + 0.5 + 0.25 / 4294967296.0).unwrap();
        assert_eq!(x.limbs(), [0, 7, 0x8000_0000, 0x4000_0000]);
        let x = BigGuy::from_f64(4294967296.0 * 3.0 + 7.0).unwrap();
        assert_eq!(x.limbs(), [3, 7, 0, 0]);

        assert_eq!(BigGuy::from_f64(-1.0).unwrap().limbs(), [u32::MAX, u32::MAX, 0, 0]);
        assert_eq!(
            BigGuy::from_f64(-0.5).unwrap().limbs(),
            [u32::MAX, u32::MAX, 0x8000_0000, 0]
        );
    }

    #[test]
    fn test_from_f64_range_gate() {
        // 2^63 - 2^10 is the largest double below 2^63
        assert!(BigGuy::from_f64(9223372036854774784.0).is_ok());
        assert!(BigGuy::from_f64(-9223372036854774784.0).is_ok());
        assert!(matches!(
            BigGuy::from_f64(9223372036854775808.0),
            Err(BigGuyError::FloatOutOfRange(_))
        ));
        assert!(matches!(
            BigGuy::from_f64(f64::NEG_INFINITY),
            Err(BigGuyError::FloatOutOfRange(_))
        ));
        assert!(matches!(BigGuy::from_f64(f64::NAN), Err(BigGuyError::NotFinite(_))));
    }

    #[test]
    fn test_from_f64_drops_bits_below_epsilon() {
        let tiny = 2f64.powi(-70);
        assert_eq!(BigGuy::from_f64(tiny).unwrap(), BigGuy::ZERO);
        assert_eq!(BigGuy::from_f64(2f64.powi(-64)).unwrap(), BigGuy::EPSILON);
    }

    #[test]
    fn test_from_int() {
        assert_eq!(BigGuy::from_int(0).unwrap(), BigGuy::ZERO);
        assert_eq!(BigGuy::from_int(1).unwrap(), BigGuy::ONE);
        assert_eq!(BigGuy::from_int(-7).unwrap(), BigGuy::from_f64(-7.0).unwrap());
        let max = i64::from(i32::MAX);
        assert_eq!(BigGuy::from_int(max).unwrap().to_int(), max);
        assert_eq!(BigGuy::from_int(-max).unwrap().to_int(), -max);

        for bad in [i64::from(i32::MIN), 1 << 31, i64::MAX, i64::MIN] {
            assert_eq!(BigGuy::from_int(bad), Err(BigGuyError::IntOutOfRange(bad)));
        }
    }

    #[test]
    fn test_to_int_truncates_toward_zero() {
        assert_eq!(BigGuy::from_f64(2.75).unwrap().to_int(), 2);
        assert_eq!(BigGuy::from_f64(-2.75).unwrap().to_int(), -2);
        assert_eq!(BigGuy::from_f64(-0.5).unwrap().to_int(), 0);
        assert_eq!(BigGuy::MAX.to_int(), i64::MAX);
        assert_eq!(BigGuy::MIN.to_int(), -i64::MAX);
    }

    #[test]
    fn test_negate() {
        let mut x = BigGuy::from_f64(3.25).unwrap();
        x.negate().unwrap();
        assert_eq!(x, BigGuy::from_f64(-3.25).unwrap());
        x.negate().unwrap();
        assert_eq!(x, BigGuy::from_f64(3.25).unwrap());

        assert_eq!(BigGuy::ZERO.checked_neg().unwrap(), BigGuy::ZERO);
        assert_eq!(BigGuy::MIN.checked_neg().unwrap(), BigGuy::MAX);
        assert_eq!(BigGuy::MAX.checked_neg().unwrap(), BigGuy::MIN);
    }

    #[test]
    fn test_negate_reserved_pattern_fails() {
        let mut x = BigGuy::RESERVED;
        assert!(matches!(x.negate(), Err(BigGuyError::NegateOverflow(_))));
        assert_eq!(x, BigGuy::RESERVED, "failed negation must not modify");
        assert_eq!(x.overflowing_neg(), (BigGuy::RESERVED, true));
    }

    #[test]
    fn test_ordering() {
        let tiny = 2f64.powi(-64);
        let values: Vec<BigGuy> = [-65536.5, -1.0, -tiny, 0.0, tiny, 0.5, 1.0, 4294967296.0]
            .iter()
            .map(|&d| BigGuy::from_f64(d).unwrap())
            .collect();
        for w in values.windows(2) {
            assert!(w[0] < w[1], "{:?} should be below {:?}", w[0], w[1]);
        }
        assert!(BigGuy::MIN < BigGuy::from_int(-(1 << 30)).unwrap());
        assert!(BigGuy::MAX > BigGuy::from_int(1 << 30).unwrap());
        assert_eq!(BigGuy::ONE.cmp(&BigGuy::ONE), Ordering::Equal);
    }

    #[test]
    fn test_ceil() {
        let c = |d: f64| BigGuy::from_f64(d).unwrap().ceil().unwrap().to_f64();
        assert_eq!(c(1.25), 2.0);
        assert_eq!(c(-1.25), -1.0);
        assert_eq!(c(-0.5), 0.0);
        assert_eq!(c(3.0), 3.0);
        assert_eq!(c(4294967295.5), 4294967296.0);
        assert_eq!(BigGuy::EPSILON.ceil().unwrap(), BigGuy::ONE);

        assert!(matches!(BigGuy::MAX.ceil(), Err(BigGuyError::CeilOverflow(_))));
    }

    #[test]
    fn test_floor() {
        let f = |d: f64| BigGuy::from_f64(d).unwrap().floor().unwrap().to_f64();
        assert_eq!(f(1.25), 1.0);
        assert_eq!(f(-1.25), -2.0);
        assert_eq!(f(-3.0), -3.0);
        assert!(matches!(BigGuy::MIN.floor(), Err(BigGuyError::FloorOverflow(_))));
    }

    #[test]
    fn test_debug_shows_limbs() {
        assert_eq!(
            format!("{:?}", BigGuy::from_f64(-0.5).unwrap()),
            "BigGuy(ffffffff_ffffffff.80000000_00000000)"
        );
    }
}
