use super::{BigGuy, BigGuyError};

/// Signed 32-bit halves of a multiplier, `m = hi·2^32 + lo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SplitMultiplier {
    hi: i64,
    lo: i64,
}

impl SplitMultiplier {
    const RADIX: i64 = 1 << 32;

    fn new(m: i64) -> Option<Self> {
        let mut hi = m / Self::RADIX;
        let mut lo = m - hi * Self::RADIX;
        if lo < i64::from(i32::MIN) {
            lo += Self::RADIX;
            hi -= 1;
        }
        if lo > i64::from(i32::MAX) {
            lo -= Self::RADIX;
            hi += 1;
        }
        let fits = |v: i64| i32::try_from(v).is_ok();
        (fits(lo) && fits(hi)).then_some(Self { hi, lo })
    }

    /// Halves of the multiplier applied to `|y|`: `m`, or `-m` when `y` is
    /// negative. Both backends gate `m` here; `i64::MIN` is always rejected.
    pub(crate) fn for_operand(m: i64, y_negative: bool) -> Result<Self, BigGuyError> {
        let effective = if y_negative { m.checked_neg() } else { Some(m) };
        effective
            .filter(|&e| e != i64::MIN)
            .and_then(Self::new)
            .ok_or_else(|| BigGuyError::MultiplierOutOfRange(m).logged())
    }
}

/// One multiply-accumulate step on a limb: returns the stored low 32 bits
/// and the signed carry into the next limb.
///
/// With `|mult| <= 2^31` and a carry in `[-2^31, 2^31)` the sum stays
/// within `i64`.
#[inline]
fn mac(limb: u32, mult: i64, operand: u32, carry: i64) -> (u32, i64) {
    let acc = i64::from(limb) + mult * i64::from(operand) + carry;
    let low = acc as u32;
    (low, (acc - i64::from(low)) >> 32)
}

/// A pass is valid when the carry out of `ihi` is exactly what the sign
/// change of the accumulator implies: -1 for non-negative to negative, +1
/// for negative to non-negative, 0 otherwise.
fn carry_matches_sign(carry: i64, was_negative: bool, is_negative: bool) -> bool {
    carry == i64::from(was_negative) - i64::from(is_negative)
}

impl BigGuy {
    /// `self += y * m`
    ///
    /// The multiplier is split into signed 32-bit halves so every product
    /// is 32x32 bits. The low half is accumulated limb by limb from `flo`,
    /// then the high half one limb further up, each pass checked for
    /// overflow through its final carry. `self` is only written when both
    /// passes succeed.
    pub fn add_mult(&mut self, y: BigGuy, m: i64) -> Result<(), BigGuyError> {
        *self = self.checked_add_mult(y, m)?;
        Ok(())
    }

    /// Value-returning form of [`BigGuy::add_mult`].
    pub fn checked_add_mult(self, y: BigGuy, m: i64) -> Result<Self, BigGuyError> {
        let split = SplitMultiplier::for_operand(m, y.is_negative())?;
        let y_mag = if y.is_negative() { y.checked_neg()? } else { y };

        let mut x = self.le_limbs();
        let ys = y_mag.le_limbs();

        // Low pass: x[i] += lo * y[i]
        let was_negative = self.is_negative();
        let mut carry = 0i64;
        for (limb, &operand) in x.iter_mut().zip(ys.iter()) {
            let (low, next) = mac(*limb, split.lo, operand, carry);
            *limb = low;
            carry = next;
        }
        let mid_negative = BigGuy::from_le_limbs(x).is_negative();
        if !carry_matches_sign(carry, was_negative, mid_negative) {
            return Err(BigGuyError::add_mult(self, y, m));
        }

        // High pass: x[i + 1] += hi * y[i], y.ihi lands past the top limb
        let mut carry = 0i64;
        for (limb, &operand) in x[1..].iter_mut().zip(ys.iter()) {
            let (low, next) = mac(*limb, split.hi, operand, carry);
            *limb = low;
            carry = next;
        }
        carry += split.hi * i64::from(ys[3]);
        let result = BigGuy::from_le_limbs(x);
        if !carry_matches_sign(carry, mid_negative, result.is_negative()) {
            return Err(BigGuyError::add_mult(self, y, m));
        }

        if !result.is_representable() {
            return Err(BigGuyError::add_mult(self, y, m));
        }
        Ok(result)
    }

    /// `self += y`
    pub fn add(&mut self, y: BigGuy) -> Result<(), BigGuyError> {
        self.add_mult(y, 1)
    }

    /// `self -= y`
    pub fn sub(&mut self, y: BigGuy) -> Result<(), BigGuyError> {
        self.add(y.checked_neg()?)
    }

    pub fn checked_add(self, y: BigGuy) -> Result<Self, BigGuyError> {
        self.checked_add_mult(y, 1)
    }

    pub fn checked_sub(self, y: BigGuy) -> Result<Self, BigGuyError> {
        self.checked_add(y.checked_neg()?)
    }
}
