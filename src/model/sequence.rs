//! Animation sequences.

use std::io::Write;

use super::{read_object_name, Block, Extent, StaticRecord};
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter, NAME_LENGTH};
use crate::util::{ByteString, Error, Result};

/// Sequence flag: the animation plays once.
pub const SEQUENCE_NON_LOOPING: u32 = 1;

/// A named frame interval such as "Stand" or "Attack".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    pub name: ByteString,
    /// Start and end frame
    pub interval: [u32; 2],
    pub move_speed: f32,
    pub flags: u32,
    pub rarity: f32,
    pub sync_point: u32,
    pub extent: Extent,
}

impl Sequence {
    pub fn is_non_looping(&self) -> bool {
        self.flags == SEQUENCE_NON_LOOPING
    }
}

impl Block for Sequence {
    const KEYWORD: &'static str = "Anim";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            name: reader.read_fixed_string(NAME_LENGTH)?,
            interval: reader.read_u32_array::<2>()?,
            move_speed: reader.read_f32()?,
            flags: reader.read_u32()?,
            rarity: reader.read_f32()?,
            sync_point: reader.read_u32()?,
            extent: Extent::read_mdx(reader)?,
        })
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_fixed_string(&self.name, NAME_LENGTH)?;
        writer.write_u32_slice(&self.interval)?;
        writer.write_f32(self.move_speed)?;
        writer.write_u32(self.flags)?;
        writer.write_f32(self.rarity)?;
        writer.write_u32(self.sync_point)?;
        self.extent.write_mdx(writer)
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut sequence = Self {
            name: read_object_name(stream)?,
            ..Self::default()
        };
        while let Some(token) = stream.next_in_block()? {
            match token {
                "Interval" => {
                    let values = stream.read_number_list::<u32>()?;
                    sequence.interval = values.try_into().map_err(|values: Vec<u32>| {
                        Error::invalid(format!("Interval needs 2 values, got {}", values.len()))
                    })?;
                }
                "NonLooping" => sequence.flags = SEQUENCE_NON_LOOPING,
                "MoveSpeed" => sequence.move_speed = stream.read_float()?,
                "Rarity" => sequence.rarity = stream.read_float()?,
                _ if sequence.extent.read_mdl_token(stream, token)? => {}
                _ => return Err(Error::unknown_token(format!("Anim {:?}", sequence.name), token)),
            }
        }
        Ok(sequence)
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        writer.start_object_block(Self::KEYWORD, &self.name.to_str_lossy())?;
        writer.write_array_attrib("Interval", &self.interval);
        if self.is_non_looping() {
            writer.write_flag("NonLooping");
        }
        if self.move_speed != 0.0 {
            writer.write_float_attrib("MoveSpeed", self.move_speed);
        }
        if self.rarity != 0.0 {
            writer.write_float_attrib("Rarity", self.rarity);
        }
        self.extent.write_mdl(writer);
        writer.end_block();
        Ok(())
    }
}

impl StaticRecord for Sequence {
    const BYTE_LENGTH: usize = 132;
}
