use std::io::{Read, Write};

use bigguy_math::{BigGuy, CompactGuy};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::CodecError;

/// Fixed-width, byte-order independent encoding of a value.
pub trait Codec: Sized {
    /// Bytes per encoded value.
    const ENCODED_LEN: usize;

    fn write_to<W: Write>(&self, w: &mut W) -> Result<(), CodecError>;

    /// Reads one value. Short input surfaces as an `UnexpectedEof` I/O error.
    fn read_from<R: Read>(r: &mut R) -> Result<Self, CodecError>;
}

impl Codec for BigGuy {
    const ENCODED_LEN: usize = 16;

    fn write_to<W: Write>(&self, w: &mut W) -> Result<(), CodecError> {
        for limb in self.limbs() {
            w.write_u32::<BigEndian>(limb)?;
        }
        Ok(())
    }

    fn read_from<R: Read>(r: &mut R) -> Result<Self, CodecError> {
        let ihi = r.read_u32::<BigEndian>()?;
        let ilo = r.read_u32::<BigEndian>()?;
        let fhi = r.read_u32::<BigEndian>()?;
        let flo = r.read_u32::<BigEndian>()?;

        let x = BigGuy::from_limbs(ihi, ilo, fhi, flo);
        if !x.is_representable() {
            return Err(CodecError::Reserved(x.into()));
        }
        Ok(x)
    }
}

impl Codec for CompactGuy {
    const ENCODED_LEN: usize = 8;

    fn write_to<W: Write>(&self, w: &mut W) -> Result<(), CodecError> {
        let bits = self.raw() as u64;
        for shift in [48, 32, 16, 0] {
            w.write_u16::<BigEndian>((bits >> shift) as u16)?;
        }
        Ok(())
    }

    fn read_from<R: Read>(r: &mut R) -> Result<Self, CodecError> {
        let mut bits = 0u64;
        for _ in 0..4 {
            bits = (bits << 16) | u64::from(r.read_u16::<BigEndian>()?);
        }

        let x = CompactGuy::from_raw(bits as i64);
        if !x.is_representable() {
            return Err(CodecError::Reserved(x.into()));
        }
        Ok(x)
    }
}
