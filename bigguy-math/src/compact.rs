use std::fmt;

use crate::error::BigGuyError;
use crate::fixed_point::LIMB_RADIX;
use crate::ops::SplitMultiplier;

const FRACTIONAL_BITS: u32 = 32;
const FRACTION_MASK: i64 = (1 << FRACTIONAL_BITS) - 1;

/// 32.32 signed fixed-point number backed by a single `i64`
/// Value: `raw / 2^32`
/// Range: `[i64::MIN + 1, i64::MAX] / 2^32`; `i64::MIN` is reserved the same
/// way the four-limb [`BigGuy`](crate::BigGuy) reserves its bottom pattern
/// Overflow behavior: reported as [`BigGuyError`], never wrapped
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CompactGuy(i64);

impl CompactGuy {
    pub const MIN: Self = Self(i64::MIN + 1);
    pub const MAX: Self = Self(i64::MAX);
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << FRACTIONAL_BITS);
    /// 2^-32
    pub const EPSILON: Self = Self(1);

    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn is_representable(&self) -> bool {
        self.0 != i64::MIN
    }

    pub fn checked_neg(self) -> Result<Self, BigGuyError> {
        if self.is_representable() {
            Ok(Self(-self.0))
        } else {
            Err(BigGuyError::negate(self))
        }
    }

    /// Same truncating decomposition as [`BigGuy::from_f64`](crate::BigGuy::from_f64),
    /// stopping after the first fractional limb.
    pub fn from_f64(d: f64) -> Result<Self, BigGuyError> {
        if d.is_nan() {
            return Err(BigGuyError::NotFinite(d).logged());
        }
        let mut rem = d.abs();
        if rem >= LIMB_RADIX / 2.0 {
            return Err(BigGuyError::FloatOutOfRange(d).logged());
        }

        let int = rem as u32;
        rem -= f64::from(int);
        let frac = (rem * LIMB_RADIX) as u32;

        let magnitude = (i64::from(int) << FRACTIONAL_BITS) | i64::from(frac);
        Ok(Self(if d < 0.0 { -magnitude } else { magnitude }))
    }

    pub fn from_int(i: i64) -> Result<Self, BigGuyError> {
        match i32::try_from(i) {
            Ok(v) if v != i32::MIN => Ok(Self(i << FRACTIONAL_BITS)),
            _ => Err(BigGuyError::IntOutOfRange(i).logged()),
        }
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / LIMB_RADIX
    }

    /// Integer part, truncated toward zero.
    pub fn to_int(self) -> i64 {
        self.0 / (1 << FRACTIONAL_BITS)
    }

    /// `self += y * m`, computed exactly in `i128`. Accepts the same
    /// multipliers as [`BigGuy::add_mult`](crate::BigGuy::add_mult).
    pub fn add_mult(&mut self, y: CompactGuy, m: i64) -> Result<(), BigGuyError> {
        *self = self.checked_add_mult(y, m)?;
        Ok(())
    }

    pub fn checked_add_mult(self, y: CompactGuy, m: i64) -> Result<Self, BigGuyError> {
        SplitMultiplier::for_operand(m, y.is_negative())?;
        if !y.is_representable() {
            return Err(BigGuyError::negate(y));
        }

        let exact = i128::from(self.0) + i128::from(y.0) * i128::from(m);
        i64::try_from(exact)
            .ok()
            .map(Self)
            .filter(Self::is_representable)
            .ok_or_else(|| BigGuyError::add_mult(self, y, m))
    }

    pub fn add(&mut self, y: CompactGuy) -> Result<(), BigGuyError> {
        self.add_mult(y, 1)
    }

    pub fn sub(&mut self, y: CompactGuy) -> Result<(), BigGuyError> {
        self.add(y.checked_neg()?)
    }

    pub fn ceil(self) -> Result<Self, BigGuyError> {
        if self.0 & FRACTION_MASK == 0 {
            return Ok(self);
        }
        (self.0 & !FRACTION_MASK)
            .checked_add(1 << FRACTIONAL_BITS)
            .map(Self)
            .ok_or_else(|| BigGuyError::ceil(self))
    }
}

impl fmt::Debug for CompactGuy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = self.0 as u64;
        write!(f, "CompactGuy({:08x}.{:08x})", bits >> 32, bits & 0xffff_ffff)
    }
}

impl fmt::Display for CompactGuy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}
