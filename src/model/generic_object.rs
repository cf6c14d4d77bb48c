//! Node header shared by bones, helpers, lights, emitters and the other
//! scene objects.
//!
//! ```text
//! inclusiveSize   u32    covers everything up to the end of the timelines
//! name            80 bytes
//! objectId        i32
//! parentId        i32    -1 for a root node
//! flags           u32    node type bit plus billboard / inherit bits
//! timelines       KGTR, KGRT, KGSC
//! ```

use std::io::Write;

use super::{read_flag, read_object_name, write_flags, write_timeline};
use crate::animation::{read_timelines, timelines_byte_length, AnimationTag, Timeline};
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter, NAME_LENGTH};
use crate::util::{ByteString, Error, Result};

pub const NODE_DONT_INHERIT_TRANSLATION: u32 = 0x1;
pub const NODE_DONT_INHERIT_ROTATION: u32 = 0x2;
pub const NODE_DONT_INHERIT_SCALING: u32 = 0x4;
pub const NODE_BILLBOARDED: u32 = 0x8;
pub const NODE_BILLBOARDED_LOCK_X: u32 = 0x10;
pub const NODE_BILLBOARDED_LOCK_Y: u32 = 0x20;
pub const NODE_BILLBOARDED_LOCK_Z: u32 = 0x40;
pub const NODE_CAMERA_ANCHORED: u32 = 0x80;

// Node type bits.
pub const NODE_HELPER: u32 = 0;
pub const NODE_BONE: u32 = 0x100;
pub const NODE_LIGHT: u32 = 0x200;
pub const NODE_EVENT_OBJECT: u32 = 0x400;
pub const NODE_ATTACHMENT: u32 = 0x800;
pub const NODE_PARTICLE_EMITTER: u32 = 0x1000;
pub const NODE_COLLISION_SHAPE: u32 = 0x2000;
pub const NODE_RIBBON_EMITTER: u32 = 0x4000;

const NODE_FLAGS: [(u32, &str); 5] = [
    (NODE_BILLBOARDED, "Billboarded"),
    (NODE_BILLBOARDED_LOCK_X, "BillboardedLockX"),
    (NODE_BILLBOARDED_LOCK_Y, "BillboardedLockY"),
    (NODE_BILLBOARDED_LOCK_Z, "BillboardedLockZ"),
    (NODE_CAMERA_ANCHORED, "CameraAnchored"),
];

const INHERIT_FLAGS: [(u32, &str); 3] = [
    (NODE_DONT_INHERIT_TRANSLATION, "Translation"),
    (NODE_DONT_INHERIT_ROTATION, "Rotation"),
    (NODE_DONT_INHERIT_SCALING, "Scaling"),
];

/// Header bytes before the timelines.
pub const GENERIC_OBJECT_HEADER_SIZE: usize = 4 + NAME_LENGTH + 12;

/// Name, hierarchy and animation common to every scene node.
///
/// `timelines` holds every track of the node: the transform tracks stored
/// inside this header and the tracks the owning kind stores after its own
/// fields.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericObject {
    pub name: ByteString,
    pub object_id: i32,
    pub parent_id: i32,
    pub flags: u32,
    pub timelines: Vec<Timeline>,
}

impl GenericObject {
    /// An unnamed root node with the given type bit.
    pub fn new(flags: u32) -> Self {
        Self {
            name: ByteString::new(),
            object_id: -1,
            parent_id: -1,
            flags,
            timelines: Vec::new(),
        }
    }

    /// Header plus every timeline.
    pub fn byte_length(&self) -> usize {
        GENERIC_OBJECT_HEADER_SIZE + timelines_byte_length(&self.timelines)
    }

    fn generic_timelines(&self) -> impl Iterator<Item = &Timeline> + Clone {
        self.timelines.iter().filter(|t| t.tag.is_generic())
    }

    fn object_timelines(&self) -> impl Iterator<Item = &Timeline> {
        self.timelines.iter().filter(|t| !t.tag.is_generic())
    }

    pub fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let size = reader.read_len()?;
        if size < GENERIC_OBJECT_HEADER_SIZE {
            return Err(Error::invalid(format!("node size {} is below its header", size)));
        }
        let mut body = reader.take(size - 4)?;
        let object = Self {
            name: body.read_fixed_string(NAME_LENGTH)?,
            object_id: body.read_i32()?,
            parent_id: body.read_i32()?,
            flags: body.read_u32()?,
            timelines: read_timelines(&mut body)?,
        };
        tracing::trace!(name = %object.name, id = object.object_id, "node");
        Ok(object)
    }

    /// Open a record that wraps the node in its own inclusive size.
    ///
    /// Returns the node and a reader over the rest of the record, holding the
    /// kind's fields followed by its own tracks.
    pub fn read_mdx_wrapped<'a>(
        reader: &mut BinaryReader<'a>,
        kind: &str,
    ) -> Result<(Self, BinaryReader<'a>)> {
        let size = reader.read_len()?;
        if size < 4 + GENERIC_OBJECT_HEADER_SIZE {
            return Err(Error::invalid(format!("{} size {} is below its header", kind, size)));
        }
        let mut body = reader.take(size - 4)?;
        let object = Self::read_mdx(&mut body)?;
        Ok((object, body))
    }

    /// Read the tracks a kind stores after its own fields.
    pub fn read_object_timelines(&mut self, reader: &mut BinaryReader<'_>) -> Result<()> {
        self.timelines.extend(read_timelines(reader)?);
        Ok(())
    }

    fn write_mdx_with<'a, W: Write>(
        &'a self,
        writer: &mut BinaryWriter<W>,
        timelines: impl Iterator<Item = &'a Timeline> + Clone,
    ) -> Result<()> {
        let size = GENERIC_OBJECT_HEADER_SIZE + timelines_byte_length(timelines.clone());
        writer.write_len(size)?;
        writer.write_fixed_string(&self.name, NAME_LENGTH)?;
        writer.write_i32(self.object_id)?;
        writer.write_i32(self.parent_id)?;
        writer.write_u32(self.flags)?;
        for timeline in timelines {
            timeline.write_mdx(writer)?;
        }
        Ok(())
    }

    /// Write the header with the transform tracks only; the owning kind
    /// writes the rest with [`GenericObject::write_object_timelines`].
    pub fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        self.write_mdx_with(writer, self.generic_timelines())
    }

    /// Write the header with every track inside it, for kinds that store no
    /// tracks of their own.
    pub fn write_mdx_all<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        self.write_mdx_with(writer, self.timelines.iter())
    }

    pub fn write_object_timelines<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        for timeline in self.object_timelines() {
            timeline.write_mdx(writer)?;
        }
        Ok(())
    }

    /// Read `"name" {` of a text node.
    pub fn read_mdl_start(stream: &mut TokenStream<'_>, flags: u32) -> Result<Self> {
        let mut object = Self::new(flags);
        object.name = read_object_name(stream)?;
        Ok(object)
    }

    /// Handle a header keyword inside a node block.
    ///
    /// Returns `false` for keywords that belong to the owning kind.
    pub fn read_mdl_token(&mut self, stream: &mut TokenStream<'_>, token: &str) -> Result<bool> {
        match token {
            "ObjectId" => self.object_id = stream.read_int()?,
            "Parent" => self.parent_id = stream.read_int()?,
            "DontInherit" => {
                stream.enter_block()?;
                while let Some(token) = stream.next_in_block()? {
                    if !read_flag(&INHERIT_FLAGS, &mut self.flags, token) {
                        return Err(Error::unknown_token("DontInherit", token));
                    }
                }
            }
            "Translation" => self.read_timeline(stream, AnimationTag::Translation)?,
            "Rotation" => self.read_timeline(stream, AnimationTag::Rotation)?,
            "Scaling" => self.read_timeline(stream, AnimationTag::Scaling)?,
            _ => return Ok(read_flag(&NODE_FLAGS, &mut self.flags, token)),
        }
        Ok(true)
    }

    /// Read a text timeline for `tag` and keep it on the node.
    pub fn read_timeline(&mut self, stream: &mut TokenStream<'_>, tag: AnimationTag) -> Result<()> {
        self.timelines.push(Timeline::read_mdl(stream, tag)?);
        Ok(())
    }

    pub fn write_mdl_header(&self, writer: &mut TokenWriter) {
        writer.write_attrib("ObjectId", self.object_id);
        if self.parent_id != -1 {
            writer.write_attrib("Parent", self.parent_id);
        }
        write_flags(&NODE_FLAGS, self.flags, writer);
        let inherit = NODE_DONT_INHERIT_TRANSLATION | NODE_DONT_INHERIT_ROTATION | NODE_DONT_INHERIT_SCALING;
        if self.flags & inherit != 0 {
            writer.start_block("DontInherit");
            write_flags(&INHERIT_FLAGS, self.flags, writer);
            writer.end_block();
        }
    }

    pub fn write_mdl_timelines(&self, writer: &mut TokenWriter) -> Result<()> {
        write_timeline(writer, &self.timelines, AnimationTag::Translation)?;
        write_timeline(writer, &self.timelines, AnimationTag::Rotation)?;
        write_timeline(writer, &self.timelines, AnimationTag::Scaling)
    }
}
