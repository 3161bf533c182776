//! # bigguy-io
//!
//! Persistence for bigguy values.
//!
//! - [`Codec`]: fixed-width big-endian encoding. [`BigGuy`](bigguy_math::BigGuy)
//!   is written as four `u32` limbs (16 bytes), [`CompactGuy`](bigguy_math::CompactGuy)
//!   as four `u16` slices of its word (8 bytes). No tag, no padding.
//! - [`SFile`]: a file opened for reading or writing that exposes the
//!   unsigned-integer primitives the codecs are built from.

pub mod codec;
pub mod stream;

pub use codec::Codec;
pub use stream::{read_values, write_values, SFile};

use bigguy_math::Operand;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decoded the reserved bit pattern {0:?}")]
    Reserved(Operand),
    #[error("{0} trailing bytes after the last whole value")]
    TrailingBytes(u64),
    #[error("stream opened for {opened} cannot be used to {attempted}")]
    WrongMode {
        opened: &'static str,
        attempted: &'static str,
    },
}
