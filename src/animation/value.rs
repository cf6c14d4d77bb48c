//! Keyframe value shapes.

use std::fmt::Debug;
use std::io::Write;

use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter};
use crate::util::Result;

/// A value that can be stored in a keyframe.
///
/// `WIDTH` is the number of 32-bit words one value occupies in binary.
pub trait KeyframeValue: Copy + Default + PartialEq + Debug {
    const WIDTH: usize;

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self>;
    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()>;
    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self>;
    fn write_mdl(&self, writer: &mut TokenWriter, prefix: &str);
}

impl KeyframeValue for f32 {
    const WIDTH: usize = 1;

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.read_f32()
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_f32(*self)
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        stream.read_float()
    }

    fn write_mdl(&self, writer: &mut TokenWriter, prefix: &str) {
        writer.write_keyframe(prefix, &[*self]);
    }
}

impl<const N: usize> KeyframeValue for [f32; N]
where
    [f32; N]: Default,
{
    const WIDTH: usize = N;

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.read_f32_array::<N>()
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_f32_slice(self)
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut value = [0.0; N];
        stream.read_keyframe(&mut value)?;
        Ok(value)
    }

    fn write_mdl(&self, writer: &mut TokenWriter, prefix: &str) {
        writer.write_keyframe(prefix, self);
    }
}

impl KeyframeValue for u32 {
    const WIDTH: usize = 1;

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.read_u32()
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_u32(*self)
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        stream.read_u32()
    }

    fn write_mdl(&self, writer: &mut TokenWriter, prefix: &str) {
        writer.write_keyframe_u32(prefix, *self);
    }
}
