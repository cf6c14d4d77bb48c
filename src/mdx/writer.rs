//! Little-endian writer for MDX output.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::util::{Error, Result, Tag, Vec2, Vec3};

/// Output stream for MDX data, tracking the number of bytes written.
pub struct BinaryWriter<W: Write> {
    inner: W,
    pos: u64,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, pos: 0 }
    }

    /// Get the current write position.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Write bytes and advance position.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.inner.write_all(data)?;
        self.pos += data.len() as u64;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.inner.write_u8(value)?;
        self.pos += 1;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.inner.write_u16::<LittleEndian>(value)?;
        self.pos += 2;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.inner.write_u32::<LittleEndian>(value)?;
        self.pos += 4;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.inner.write_i32::<LittleEndian>(value)?;
        self.pos += 4;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.inner.write_f32::<LittleEndian>(value)?;
        self.pos += 4;
        Ok(())
    }

    /// Write a `usize` count or size as u32.
    pub fn write_len(&mut self, value: usize) -> Result<()> {
        let value = u32::try_from(value)
            .map_err(|_| Error::invalid_state(format!("length {} does not fit in 32 bits", value)))?;
        self.write_u32(value)
    }

    pub fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.write_bytes(tag.as_bytes())
    }

    /// Write `value` into a zero-padded field of `len` bytes.
    pub fn write_fixed_string(&mut self, value: impl AsRef<[u8]>, len: usize) -> Result<()> {
        let bytes = value.as_ref();
        if bytes.len() > len {
            return Err(Error::invalid_state(format!(
                "string {:?} is {} bytes, field holds {}",
                String::from_utf8_lossy(bytes),
                bytes.len(),
                len
            )));
        }
        self.write_bytes(bytes)?;
        self.write_bytes(&vec![0u8; len - bytes.len()])
    }

    pub fn write_f32_slice(&mut self, values: &[f32]) -> Result<()> {
        for &value in values {
            self.write_f32(value)?;
        }
        Ok(())
    }

    pub fn write_u16_slice(&mut self, values: &[u16]) -> Result<()> {
        for &value in values {
            self.write_u16(value)?;
        }
        Ok(())
    }

    pub fn write_u32_slice(&mut self, values: &[u32]) -> Result<()> {
        for &value in values {
            self.write_u32(value)?;
        }
        Ok(())
    }

    pub fn write_vec2(&mut self, value: Vec2) -> Result<()> {
        self.write_f32_slice(&value.to_array())
    }

    pub fn write_vec3(&mut self, value: Vec3) -> Result<()> {
        self.write_f32_slice(&value.to_array())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}
