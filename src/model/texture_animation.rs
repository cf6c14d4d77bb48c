//! UV animations referenced by layers.

use std::io::Write;

use super::{write_timeline, Block, DynamicRecord};
use crate::animation::{read_timelines, timelines_byte_length, AnimationTag, Timeline};
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter};
use crate::util::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureAnimation {
    pub timelines: Vec<Timeline>,
}

impl Block for TextureAnimation {
    const KEYWORD: &'static str = "TVertexAnim";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let size = reader.read_len()?;
        if size < 4 {
            return Err(Error::invalid(format!("texture animation size {}", size)));
        }
        let mut body = reader.take(size - 4)?;
        Ok(Self {
            timelines: read_timelines(&mut body)?,
        })
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_len(self.byte_length())?;
        for timeline in &self.timelines {
            timeline.write_mdx(writer)?;
        }
        Ok(())
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut animation = Self::default();
        stream.enter_block()?;
        while let Some(token) = stream.next_in_block()? {
            let tag = match token {
                "Translation" => AnimationTag::TextureTranslation,
                "Rotation" => AnimationTag::TextureRotation,
                "Scaling" => AnimationTag::TextureScaling,
                _ => return Err(Error::unknown_token(Self::KEYWORD, token)),
            };
            animation.timelines.push(Timeline::read_mdl(stream, tag)?);
        }
        Ok(animation)
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        writer.start_block(Self::KEYWORD);
        write_timeline(writer, &self.timelines, AnimationTag::TextureTranslation)?;
        write_timeline(writer, &self.timelines, AnimationTag::TextureRotation)?;
        write_timeline(writer, &self.timelines, AnimationTag::TextureScaling)?;
        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for TextureAnimation {
    fn byte_length(&self) -> usize {
        4 + timelines_byte_length(&self.timelines)
    }
}
