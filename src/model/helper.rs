//! Helper nodes: pure transforms with nothing attached.

use std::io::Write;

use super::{Block, DynamicRecord, GenericObject, NODE_HELPER};
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter};
use crate::util::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Helper {
    pub object: GenericObject,
}

impl Default for Helper {
    fn default() -> Self {
        Self {
            object: GenericObject::new(NODE_HELPER),
        }
    }
}

impl Block for Helper {
    const KEYWORD: &'static str = "Helper";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            object: GenericObject::read_mdx(reader)?,
        })
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        self.object.write_mdx_all(writer)
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut object = GenericObject::read_mdl_start(stream, NODE_HELPER)?;
        while let Some(token) = stream.next_in_block()? {
            if !object.read_mdl_token(stream, token)? {
                return Err(Error::unknown_token(format!("Helper {:?}", object.name), token));
            }
        }
        Ok(Self { object })
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        writer.start_object_block(Self::KEYWORD, &self.object.name.to_str_lossy())?;
        self.object.write_mdl_header(writer);
        self.object.write_mdl_timelines(writer)?;
        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for Helper {
    fn byte_length(&self) -> usize {
        self.object.byte_length()
    }
}
