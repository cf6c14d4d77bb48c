//! Event objects: named nodes that fire sounds, splats and spawns at
//! fixed frames.

use std::io::Write;

use super::{Block, DynamicRecord, GenericObject, NODE_EVENT_OBJECT};
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter, KEVT};
use crate::util::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct EventObject {
    pub object: GenericObject,
    pub global_sequence_id: i32,
    pub frames: Vec<u32>,
}

/// A new event fires once, on frame 1. Text without an `EventTrack` keeps
/// that frame.
impl Default for EventObject {
    fn default() -> Self {
        Self {
            object: GenericObject::new(NODE_EVENT_OBJECT),
            global_sequence_id: -1,
            frames: vec![1],
        }
    }
}

impl EventObject {
    /// Read `EventTrack n { GlobalSeqId g, f, f, ... }`; the count is advisory.
    fn read_mdl_track(&mut self, stream: &mut TokenStream<'_>) -> Result<()> {
        let _count = stream.read_u32()?;
        stream.enter_block()?;
        self.frames.clear();
        loop {
            match stream.next_in_block()? {
                Some("GlobalSeqId") => self.global_sequence_id = stream.read_int()?,
                Some(token) => self.frames.push(token.parse().map_err(|_| Error::InvalidNumber {
                    token: token.to_string(),
                    line: stream.token_line(),
                })?),
                None => return Ok(()),
            }
        }
    }
}

impl Block for EventObject {
    const KEYWORD: &'static str = "EventObject";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let object = GenericObject::read_mdx(reader)?;
        reader.expect_tag(KEVT)?;
        let count = reader.read_len()?;
        let global_sequence_id = reader.read_i32()?;
        Ok(Self {
            object,
            global_sequence_id,
            frames: reader.read_u32_vec(count)?,
        })
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        self.object.write_mdx_all(writer)?;
        writer.write_tag(KEVT)?;
        writer.write_len(self.frames.len())?;
        writer.write_i32(self.global_sequence_id)?;
        writer.write_u32_slice(&self.frames)
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut event = Self {
            object: GenericObject::read_mdl_start(stream, NODE_EVENT_OBJECT)?,
            ..Self::default()
        };
        while let Some(token) = stream.next_in_block()? {
            match token {
                "EventTrack" => event.read_mdl_track(stream)?,
                _ if event.object.read_mdl_token(stream, token)? => {}
                _ => {
                    return Err(Error::unknown_token(
                        format!("EventObject {:?}", event.object.name),
                        token,
                    ))
                }
            }
        }
        Ok(event)
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        writer.start_object_block(Self::KEYWORD, &self.object.name.to_str_lossy())?;
        self.object.write_mdl_header(writer);
        writer.start_block_count("EventTrack", self.frames.len());
        if self.global_sequence_id != -1 {
            writer.write_attrib("GlobalSeqId", self.global_sequence_id);
        }
        for frame in &self.frames {
            writer.write_value(frame);
        }
        writer.end_block();
        self.object.write_mdl_timelines(writer)?;
        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for EventObject {
    fn byte_length(&self) -> usize {
        self.object.byte_length() + 12 + 4 * self.frames.len()
    }
}
