//! Bounded little-endian reader over a borrowed byte slice.

use byteorder::{ByteOrder, LittleEndian};

use crate::util::{ByteString, Error, Result, Tag, Vec2, Vec3};

/// Cursor over MDX bytes.
///
/// Every read is bounds-checked and fails with [`Error::UnexpectedEof`]
/// carrying the absolute file offset. [`BinaryReader::take`] hands out a
/// sub-reader limited to one chunk or record, so a record can never read
/// past the size its container declared.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
    /// Absolute offset of `data[0]` in the original buffer
    base: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, base: 0 }
    }

    /// Position relative to the start of this reader.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Absolute offset in the buffer the outermost reader was created from.
    #[inline]
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `len` bytes and advance.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::UnexpectedEof(self.base + self.data.len()));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Split off a reader over the next `len` bytes.
    pub fn take(&mut self, len: usize) -> Result<BinaryReader<'a>> {
        let base = self.offset();
        let data = self.read_bytes(len)?;
        Ok(BinaryReader { data, pos: 0, base })
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    /// Read a u32 count or size field as `usize`.
    pub fn read_len(&mut self) -> Result<usize> {
        Ok(self.read_u32()? as usize)
    }

    pub fn read_tag(&mut self) -> Result<Tag> {
        let bytes = self.read_bytes(4)?;
        Ok(Tag([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a tag and fail unless it is `expected`.
    pub fn expect_tag(&mut self, expected: Tag) -> Result<()> {
        let offset = self.offset();
        let tag = self.read_tag()?;
        if tag != expected {
            return Err(Error::invalid(format!(
                "expected {} at offset {}, found {}",
                expected, offset, tag
            )));
        }
        Ok(())
    }

    /// Read a zero-padded string field of `len` bytes.
    ///
    /// Everything from the first NUL onward is padding. The bytes before it
    /// are kept as they are, whatever their encoding.
    pub fn read_fixed_string(&mut self, len: usize) -> Result<ByteString> {
        let offset = self.offset();
        let bytes = self.read_bytes(len)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(len);
        let value = ByteString::from(&bytes[..end]);
        if value.to_str().is_none() {
            tracing::debug!(offset, "string field is not UTF-8");
        }
        Ok(value)
    }

    pub fn read_f32_array<const N: usize>(&mut self) -> Result<[f32; N]> {
        let bytes = self.read_bytes(N * 4)?;
        let mut out = [0.0; N];
        LittleEndian::read_f32_into(bytes, &mut out);
        Ok(out)
    }

    pub fn read_u32_array<const N: usize>(&mut self) -> Result<[u32; N]> {
        let bytes = self.read_bytes(N * 4)?;
        let mut out = [0; N];
        LittleEndian::read_u32_into(bytes, &mut out);
        Ok(out)
    }

    pub fn read_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::from_array(self.read_f32_array::<2>()?))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::from_array(self.read_f32_array::<3>()?))
    }

    /// Read `count` elements of `width` bytes each, checking the total up front
    /// so a corrupt count fails before any allocation.
    fn read_elements(&mut self, count: usize, width: usize) -> Result<&'a [u8]> {
        let len = count
            .checked_mul(width)
            .filter(|&len| len <= self.remaining())
            .ok_or(Error::UnexpectedEof(self.base + self.data.len()))?;
        self.read_bytes(len)
    }

    pub fn read_u8_vec(&mut self, count: usize) -> Result<Vec<u8>> {
        Ok(self.read_elements(count, 1)?.to_vec())
    }

    pub fn read_u16_vec(&mut self, count: usize) -> Result<Vec<u16>> {
        let bytes = self.read_elements(count, 2)?;
        let mut out = vec![0; count];
        LittleEndian::read_u16_into(bytes, &mut out);
        Ok(out)
    }

    pub fn read_u32_vec(&mut self, count: usize) -> Result<Vec<u32>> {
        let bytes = self.read_elements(count, 4)?;
        let mut out = vec![0; count];
        LittleEndian::read_u32_into(bytes, &mut out);
        Ok(out)
    }

    pub fn read_vec2_vec(&mut self, count: usize) -> Result<Vec<Vec2>> {
        let bytes = self.read_elements(count, 8)?;
        Ok(bytes
            .chunks_exact(8)
            .map(|b| Vec2::new(LittleEndian::read_f32(&b[0..4]), LittleEndian::read_f32(&b[4..8])))
            .collect())
    }

    pub fn read_vec3_vec(&mut self, count: usize) -> Result<Vec<Vec3>> {
        let bytes = self.read_elements(count, 12)?;
        Ok(bytes
            .chunks_exact(12)
            .map(|b| {
                Vec3::new(
                    LittleEndian::read_f32(&b[0..4]),
                    LittleEndian::read_f32(&b[4..8]),
                    LittleEndian::read_f32(&b[8..12]),
                )
            })
            .collect())
    }
}
