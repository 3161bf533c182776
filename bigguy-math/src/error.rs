use std::fmt;

use thiserror::Error;

use crate::{BigGuy, CompactGuy};

/// The value an overflowing operation was applied to, kept for diagnostics.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Wide(BigGuy),
    Compact(CompactGuy),
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Wide(v) => fmt::Debug::fmt(v, f),
            Operand::Compact(v) => fmt::Debug::fmt(v, f),
        }
    }
}

impl From<BigGuy> for Operand {
    fn from(v: BigGuy) -> Self {
        Operand::Wide(v)
    }
}

impl From<CompactGuy> for Operand {
    fn from(v: CompactGuy) -> Self {
        Operand::Compact(v)
    }
}

/// Range violations. None of these are transient: retrying the same call
/// with the same inputs fails the same way.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum BigGuyError {
    #[error("overflow negating {0:?}")]
    NegateOverflow(Operand),
    #[error("cannot convert non-finite value {0} to fixed point")]
    NotFinite(f64),
    #[error("overflow converting {0} to fixed point")]
    FloatOutOfRange(f64),
    #[error("overflow converting integer {0} to fixed point")]
    IntOutOfRange(i64),
    #[error("overflow taking the ceiling of {0:?}")]
    CeilOverflow(Operand),
    #[error("overflow taking the floor of {0:?}")]
    FloorOverflow(Operand),
    #[error("multiplier {0} cannot be split into signed 32-bit halves")]
    MultiplierOutOfRange(i64),
    #[error("overflow computing {x:?} + {y:?} * {m}")]
    AddMultOverflow { x: Operand, y: Operand, m: i64 },
}

impl BigGuyError {
    /// Emits the overflow event every failing operation reports, then hands
    /// the error back for returning.
    pub(crate) fn logged(self) -> Self {
        tracing::debug!(err = %self, "fixed-point overflow");
        self
    }

    pub(crate) fn add_mult(x: impl Into<Operand>, y: impl Into<Operand>, m: i64) -> Self {
        BigGuyError::AddMultOverflow {
            x: x.into(),
            y: y.into(),
            m,
        }
        .logged()
    }

    pub(crate) fn negate(x: impl Into<Operand>) -> Self {
        BigGuyError::NegateOverflow(x.into()).logged()
    }

    pub(crate) fn ceil(x: impl Into<Operand>) -> Self {
        BigGuyError::CeilOverflow(x.into()).logged()
    }

    pub(crate) fn floor(x: impl Into<Operand>) -> Self {
        BigGuyError::FloorOverflow(x.into()).logged()
    }
}
