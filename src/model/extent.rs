//! Bounding volume.

use std::io::Write;

use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter, EXTENT_SIZE};
use crate::util::{Result, Vec3};

/// Axis-aligned box plus bounding sphere radius.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extent {
    pub bounds_radius: f32,
    pub min: Vec3,
    pub max: Vec3,
}

impl Extent {
    pub const BYTE_LENGTH: usize = EXTENT_SIZE;

    pub fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            bounds_radius: reader.read_f32()?,
            min: reader.read_vec3()?,
            max: reader.read_vec3()?,
        })
    }

    pub fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_f32(self.bounds_radius)?;
        writer.write_vec3(self.min)?;
        writer.write_vec3(self.max)
    }

    /// Handle an extent keyword inside an enclosing block.
    ///
    /// Returns `false` if `token` is not one of the extent keywords.
    pub fn read_mdl_token(&mut self, stream: &mut TokenStream<'_>, token: &str) -> Result<bool> {
        match token {
            "MinimumExtent" => self.min = stream.read_vec3()?,
            "MaximumExtent" => self.max = stream.read_vec3()?,
            "BoundsRadius" => self.bounds_radius = stream.read_float()?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Write the non-zero parts.
    pub fn write_mdl(&self, writer: &mut TokenWriter) {
        if self.min != Vec3::ZERO || self.max != Vec3::ZERO {
            writer.write_float_array_attrib("MinimumExtent", &self.min.to_array());
            writer.write_float_array_attrib("MaximumExtent", &self.max.to_array());
        }
        if self.bounds_radius != 0.0 {
            writer.write_float_attrib("BoundsRadius", self.bounds_radius);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecSettings;

    fn sample() -> Extent {
        Extent {
            bounds_radius: 2.5,
            min: Vec3::new(-1.0, -2.0, 0.0),
            max: Vec3::new(1.0, 2.0, 3.0),
        }
    }

    #[test]
    fn test_binary_layout() {
        let mut writer = BinaryWriter::new(Vec::new());
        sample().write_mdx(&mut writer).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), Extent::BYTE_LENGTH);
        assert_eq!(&bytes[..4], &2.5f32.to_le_bytes());
        assert_eq!(Extent::read_mdx(&mut BinaryReader::new(&bytes)).unwrap(), sample());
    }

    #[test]
    fn test_zero_extent_writes_nothing() {
        let mut writer = TokenWriter::new(&CodecSettings::default());
        Extent::default().write_mdl(&mut writer);
        assert_eq!(writer.finish(), "");
    }

    #[test]
    fn test_text_round_trip() {
        let mut writer = TokenWriter::new(&CodecSettings::default());
        sample().write_mdl(&mut writer);
        let text = writer.finish();
        let mut stream = TokenStream::new(&text);
        let mut extent = Extent::default();
        while let Some(token) = stream.read().unwrap() {
            assert!(extent.read_mdl_token(&mut stream, token).unwrap());
        }
        assert_eq!(extent, sample());
    }
}
