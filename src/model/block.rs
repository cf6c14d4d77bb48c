//! Contract shared by every record kind.

use std::io::Write;

use crate::animation::{AnimationTag, Timeline};
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter};
use crate::util::{ByteString, Result};

/// A record stored in a chunk list of the model.
pub trait Block: Sized + Default {
    /// Keyword that introduces one record in text.
    const KEYWORD: &'static str;

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self>;
    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()>;

    /// Read from text; the stream is positioned right after [`Block::KEYWORD`].
    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self>;
    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()>;
}

/// A record with a fixed binary width.
pub trait StaticRecord: Block {
    const BYTE_LENGTH: usize;
}

/// A record whose binary width depends on its contents.
pub trait DynamicRecord: Block {
    fn byte_length(&self) -> usize;
}

pub(crate) fn find_timeline(timelines: &[Timeline], tag: AnimationTag) -> Option<&Timeline> {
    timelines.iter().find(|t| t.tag == tag)
}

/// Write the timeline for `tag` if there is one, else `static Keyword value`.
pub(crate) fn write_animated_float(
    writer: &mut TokenWriter,
    timelines: &[Timeline],
    tag: AnimationTag,
    value: f32,
) -> Result<()> {
    match find_timeline(timelines, tag) {
        Some(timeline) => timeline.write_mdl(writer),
        None => {
            writer.write_float_attrib(&format!("static {}", tag.keyword()), value);
            Ok(())
        }
    }
}

/// Color counterpart of [`write_animated_float`].
pub(crate) fn write_animated_color(
    writer: &mut TokenWriter,
    timelines: &[Timeline],
    tag: AnimationTag,
    color: [f32; 3],
) -> Result<()> {
    match find_timeline(timelines, tag) {
        Some(timeline) => timeline.write_mdl(writer),
        None => {
            writer.write_color(&format!("static {}", tag.keyword()), color);
            Ok(())
        }
    }
}

/// Write the timeline for `tag` if the record has one.
pub(crate) fn write_timeline(
    writer: &mut TokenWriter,
    timelines: &[Timeline],
    tag: AnimationTag,
) -> Result<()> {
    match find_timeline(timelines, tag) {
        Some(timeline) => timeline.write_mdl(writer),
        None => Ok(()),
    }
}

/// Set the flag named by `token`, if it is one of `table`.
pub(crate) fn read_flag(table: &[(u32, &str)], flags: &mut u32, token: &str) -> bool {
    match table.iter().find(|(_, name)| *name == token) {
        Some((bit, _)) => {
            *flags |= bit;
            true
        }
        None => false,
    }
}

pub(crate) fn write_flags(table: &[(u32, &str)], flags: u32, writer: &mut TokenWriter) {
    for (bit, name) in table {
        if flags & bit != 0 {
            writer.write_flag(name);
        }
    }
}

/// Read `"name" {` and return the name.
pub(crate) fn read_object_name(stream: &mut TokenStream<'_>) -> Result<ByteString> {
    let name = ByteString::from(stream.read_token()?);
    stream.enter_block()?;
    Ok(name)
}
