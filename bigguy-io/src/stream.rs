use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::{Codec, CodecError};

enum Handle {
    Reader(BufReader<File>),
    Writer(BufWriter<File>),
}

/// A buffered file opened either for reading or for writing. Every integer
/// is big-endian on disk.
pub struct SFile {
    path: PathBuf,
    handle: Handle,
}

impl SFile {
    pub fn open_read(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        tracing::trace!(path = %path.display(), "opened for read");
        Ok(Self {
            path,
            handle: Handle::Reader(BufReader::new(file)),
        })
    }

    /// Creates or truncates `path`.
    pub fn open_write(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        tracing::trace!(path = %path.display(), "opened for write");
        Ok(Self {
            path,
            handle: Handle::Writer(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reader(&mut self, attempted: &'static str) -> Result<&mut BufReader<File>, CodecError> {
        match &mut self.handle {
            Handle::Reader(r) => Ok(r),
            Handle::Writer(_) => Err(CodecError::WrongMode {
                opened: "writing",
                attempted,
            }),
        }
    }

    fn writer(&mut self, attempted: &'static str) -> Result<&mut BufWriter<File>, CodecError> {
        match &mut self.handle {
            Handle::Writer(w) => Ok(w),
            Handle::Reader(_) => Err(CodecError::WrongMode {
                opened: "reading",
                attempted,
            }),
        }
    }

    pub fn read_uint(&mut self) -> Result<u32, CodecError> {
        Ok(self.reader("read_uint")?.read_u32::<BigEndian>()?)
    }

    pub fn read_ushort(&mut self) -> Result<u16, CodecError> {
        Ok(self.reader("read_ushort")?.read_u16::<BigEndian>()?)
    }

    pub fn write_uint(&mut self, v: u32) -> Result<(), CodecError> {
        Ok(self.writer("write_uint")?.write_u32::<BigEndian>(v)?)
    }

    pub fn write_ushort(&mut self, v: u16) -> Result<(), CodecError> {
        Ok(self.writer("write_ushort")?.write_u16::<BigEndian>(v)?)
    }

    pub fn read_value<T: Codec>(&mut self) -> Result<T, CodecError> {
        T::read_from(self.reader("read_value")?)
    }

    pub fn write_value<T: Codec>(&mut self, x: &T) -> Result<(), CodecError> {
        x.write_to(self.writer("write_value")?)
    }

    /// Flushes pending writes and releases the file. Dropping without
    /// `close` discards flush errors.
    pub fn close(self) -> Result<(), CodecError> {
        if let Handle::Writer(mut w) = self.handle {
            w.flush()?;
        }
        tracing::trace!(path = %self.path.display(), "closed");
        Ok(())
    }
}

/// Writes `values` back to back into a fresh file at `path`.
pub fn write_values<T: Codec>(path: impl AsRef<Path>, values: &[T]) -> Result<(), CodecError> {
    let mut f = SFile::open_write(path)?;
    for x in values {
        f.write_value(x)?;
    }
    f.close()
}

/// Reads every value from a file written by [`write_values`].
pub fn read_values<T: Codec>(path: impl AsRef<Path>) -> Result<Vec<T>, CodecError> {
    let len = std::fs::metadata(path.as_ref())?.len();
    let width = T::ENCODED_LEN as u64;
    if len % width != 0 {
        return Err(CodecError::TrailingBytes(len % width));
    }

    let mut f = SFile::open_read(path)?;
    let values = (0..len / width)
        .map(|_| f.read_value())
        .collect::<Result<Vec<T>, _>>()?;
    f.close()?;
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigguy_math::BigGuy;

    #[test]
    fn test_primitives_roundtrip() {
        let tmp = tempfile::NamedTempFile::new().unwrap();

        let mut f = SFile::open_write(tmp.path()).unwrap();
        f.write_uint(0xdead_beef).unwrap();
        f.write_ushort(0x1234).unwrap();
        f.close().unwrap();

        assert_eq!(std::fs::read(tmp.path()).unwrap(), [0xde, 0xad, 0xbe, 0xef, 0x12, 0x34]);

        let mut f = SFile::open_read(tmp.path()).unwrap();
        assert_eq!(f.read_uint().unwrap(), 0xdead_beef);
        assert_eq!(f.read_ushort().unwrap(), 0x1234);
        assert!(matches!(f.read_ushort(), Err(CodecError::Io(_))));
        f.close().unwrap();
    }

    #[test]
    fn test_wrong_mode() {
        let tmp = tempfile::NamedTempFile::new().unwrap();

        let mut w = SFile::open_write(tmp.path()).unwrap();
        assert!(matches!(
            w.read_uint(),
            Err(CodecError::WrongMode { opened: "writing", .. })
        ));
        w.close().unwrap();

        let mut r = SFile::open_read(tmp.path()).unwrap();
        assert!(matches!(
            r.write_value(&BigGuy::ONE),
            Err(CodecError::WrongMode { opened: "reading", .. })
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(SFile::open_read(dir.path().join("absent")), Err(CodecError::Io(_))));
    }
}
