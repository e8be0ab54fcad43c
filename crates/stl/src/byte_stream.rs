use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use stlcodec_mesh::Vector3;

pub const HEADER_SIZE: usize = 80;

/// Reader that keeps track of how many bytes have been consumed so far.
pub struct ByteReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Number of bytes consumed from the underlying reader.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn read_header(&mut self) -> io::Result<[u8; HEADER_SIZE]> {
        let mut header = [0u8; HEADER_SIZE];
        self.read_exact(&mut header)?;
        Ok(header)
    }

    pub fn read_u32(&mut self) -> io::Result<u32> {
        ReadBytesExt::read_u32::<LittleEndian>(self)
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        ReadBytesExt::read_u16::<LittleEndian>(self)
    }

    pub fn read_vector(&mut self) -> io::Result<Vector3> {
        Ok(Vector3 {
            x: self.read_f32::<LittleEndian>()?,
            y: self.read_f32::<LittleEndian>()?,
            z: self.read_f32::<LittleEndian>()?,
        })
    }
}

impl<R: Read> Read for ByteReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.offset += n as u64;
        Ok(n)
    }
}

pub struct ByteWriter<W> {
    inner: W,
}

impl<W: Write> ByteWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Writes `text` right-aligned in an 80-byte, space-filled header. Longer text is cut at 80
    /// bytes.
    pub fn write_header(&mut self, text: &str) -> io::Result<()> {
        let text = text.as_bytes();
        let text = &text[..text.len().min(HEADER_SIZE)];
        let mut header = [b' '; HEADER_SIZE];
        header[HEADER_SIZE - text.len()..].copy_from_slice(text);
        self.inner.write_all(&header)
    }

    pub fn write_u32(&mut self, value: u32) -> io::Result<()> {
        self.inner.write_u32::<LittleEndian>(value)
    }

    pub fn write_u16(&mut self, value: u16) -> io::Result<()> {
        self.inner.write_u16::<LittleEndian>(value)
    }

    pub fn write_vector(&mut self, v: &Vector3) -> io::Result<()> {
        self.inner.write_f32::<LittleEndian>(v.x)?;
        self.inner.write_f32::<LittleEndian>(v.y)?;
        self.inner.write_f32::<LittleEndian>(v.z)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
