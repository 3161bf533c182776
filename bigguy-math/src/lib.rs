//! # bigguy-math
//!
//! Deterministic 64.64 fixed-point arithmetic for accumulating long sums of
//! small quantities (LP bounds, cut coefficients) without floating-point drift.
//!
//! This crate provides [`BigGuy`], a 128-bit two's-complement value stored as
//! four `u32` limbs with the radix point between the second and third limb,
//! and [`CompactGuy`], a 32.32 value held in a single `i64` that offers the
//! same operations over a smaller range. Both implement [`FixedPoint`].
//!
//! Overflow is never silent: every operation that can leave the representable
//! range returns a [`BigGuyError`] and leaves its operands untouched.

pub mod backend;
pub mod compact;
pub mod error;
pub mod fixed_point;
pub mod ops;

pub use backend::FixedPoint;
pub use compact::CompactGuy;
pub use error::{BigGuyError, Operand};
pub use fixed_point::BigGuy;
