//! Attachment points such as weapon slots and overhead markers.

use std::io::Write;

use super::{write_timeline, Block, DynamicRecord, GenericObject, NODE_ATTACHMENT};
use crate::animation::AnimationTag;
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter, FILE_NAME_LENGTH};
use crate::util::{ByteString, Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub object: GenericObject,
    /// Model spawned at the point, usually empty
    pub path: ByteString,
    pub attachment_id: i32,
}

impl Default for Attachment {
    fn default() -> Self {
        Self {
            object: GenericObject::new(NODE_ATTACHMENT),
            path: ByteString::new(),
            attachment_id: 0,
        }
    }
}

impl Block for Attachment {
    const KEYWORD: &'static str = "Attachment";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let (object, mut body) = GenericObject::read_mdx_wrapped(reader, "attachment")?;
        let mut attachment = Self {
            object,
            path: body.read_fixed_string(FILE_NAME_LENGTH)?,
            attachment_id: body.read_i32()?,
        };
        attachment.object.read_object_timelines(&mut body)?;
        Ok(attachment)
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_len(self.byte_length())?;
        self.object.write_mdx(writer)?;
        writer.write_fixed_string(&self.path, FILE_NAME_LENGTH)?;
        writer.write_i32(self.attachment_id)?;
        self.object.write_object_timelines(writer)
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut attachment = Self {
            object: GenericObject::read_mdl_start(stream, NODE_ATTACHMENT)?,
            ..Self::default()
        };
        while let Some(token) = stream.next_in_block()? {
            match token {
                "AttachmentID" => attachment.attachment_id = stream.read_int()?,
                "Path" => attachment.path = stream.read_token()?.into(),
                "Visibility" => attachment
                    .object
                    .read_timeline(stream, AnimationTag::AttachmentVisibility)?,
                _ if attachment.object.read_mdl_token(stream, token)? => {}
                _ => {
                    return Err(Error::unknown_token(
                        format!("Attachment {:?}", attachment.object.name),
                        token,
                    ))
                }
            }
        }
        Ok(attachment)
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        writer.start_object_block(Self::KEYWORD, &self.object.name.to_str_lossy())?;
        self.object.write_mdl_header(writer);
        writer.write_attrib("AttachmentID", self.attachment_id);
        if !self.path.is_empty() {
            writer.write_string_attrib("Path", &self.path.to_str_lossy())?;
        }
        write_timeline(writer, &self.object.timelines, AnimationTag::AttachmentVisibility)?;
        self.object.write_mdl_timelines(writer)?;
        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for Attachment {
    fn byte_length(&self) -> usize {
        4 + FILE_NAME_LENGTH + 4 + self.object.byte_length()
    }
}
