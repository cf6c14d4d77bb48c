//! Ribbon trails.

use std::io::Write;

use super::{find_timeline, write_animated_color, write_animated_float, write_timeline};
use super::{Block, DynamicRecord, GenericObject, NODE_RIBBON_EMITTER};
use crate::animation::AnimationTag;
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter};
use crate::util::{Error, Result};

/// Fields after the node header, including the outer size.
const RIBBON_FIELDS_SIZE: usize = 56;

#[derive(Debug, Clone, PartialEq)]
pub struct RibbonEmitter {
    pub object: GenericObject,
    pub height_above: f32,
    pub height_below: f32,
    pub alpha: f32,
    pub color: [f32; 3],
    pub life_span: f32,
    pub texture_slot: u32,
    pub emission_rate: u32,
    pub rows: u32,
    pub columns: u32,
    pub material_id: i32,
    pub gravity: f32,
}

impl Default for RibbonEmitter {
    fn default() -> Self {
        Self {
            object: GenericObject::new(NODE_RIBBON_EMITTER),
            height_above: 0.0,
            height_below: 0.0,
            alpha: 1.0,
            color: [1.0; 3],
            life_span: 0.0,
            texture_slot: 0,
            emission_rate: 0,
            rows: 1,
            columns: 1,
            material_id: 0,
            gravity: 0.0,
        }
    }
}

impl Block for RibbonEmitter {
    const KEYWORD: &'static str = "RibbonEmitter";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let (object, mut body) = GenericObject::read_mdx_wrapped(reader, "ribbon emitter")?;
        let mut emitter = Self {
            object,
            height_above: body.read_f32()?,
            height_below: body.read_f32()?,
            alpha: body.read_f32()?,
            color: body.read_f32_array::<3>()?,
            life_span: body.read_f32()?,
            texture_slot: body.read_u32()?,
            emission_rate: body.read_u32()?,
            rows: body.read_u32()?,
            columns: body.read_u32()?,
            material_id: body.read_i32()?,
            gravity: body.read_f32()?,
        };
        emitter.object.read_object_timelines(&mut body)?;
        Ok(emitter)
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_len(self.byte_length())?;
        self.object.write_mdx(writer)?;
        writer.write_f32(self.height_above)?;
        writer.write_f32(self.height_below)?;
        writer.write_f32(self.alpha)?;
        writer.write_f32_slice(&self.color)?;
        writer.write_f32(self.life_span)?;
        writer.write_u32(self.texture_slot)?;
        writer.write_u32(self.emission_rate)?;
        writer.write_u32(self.rows)?;
        writer.write_u32(self.columns)?;
        writer.write_i32(self.material_id)?;
        writer.write_f32(self.gravity)?;
        self.object.write_object_timelines(writer)
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut emitter = Self {
            object: GenericObject::read_mdl_start(stream, NODE_RIBBON_EMITTER)?,
            ..Self::default()
        };
        while let Some(token) = stream.next_in_block()? {
            match token {
                "static" => match stream.read_token()? {
                    "HeightAbove" => emitter.height_above = stream.read_float()?,
                    "HeightBelow" => emitter.height_below = stream.read_float()?,
                    "Alpha" => emitter.alpha = stream.read_float()?,
                    "Color" => emitter.color = stream.read_color()?,
                    "TextureSlot" => emitter.texture_slot = stream.read_u32()?,
                    other => return Err(Error::unknown_token("RibbonEmitter static", other)),
                },
                "HeightAbove" => emitter.object.read_timeline(stream, AnimationTag::RibbonHeightAbove)?,
                "HeightBelow" => emitter.object.read_timeline(stream, AnimationTag::RibbonHeightBelow)?,
                "Alpha" => emitter.object.read_timeline(stream, AnimationTag::RibbonAlpha)?,
                "Color" => emitter.object.read_timeline(stream, AnimationTag::RibbonColor)?,
                "TextureSlot" => emitter.object.read_timeline(stream, AnimationTag::RibbonTextureSlot)?,
                "Visibility" => emitter.object.read_timeline(stream, AnimationTag::RibbonVisibility)?,
                "EmissionRate" => emitter.emission_rate = stream.read_u32()?,
                "LifeSpan" => emitter.life_span = stream.read_float()?,
                "Gravity" => emitter.gravity = stream.read_float()?,
                "Rows" => emitter.rows = stream.read_u32()?,
                "Columns" => emitter.columns = stream.read_u32()?,
                "MaterialID" => emitter.material_id = stream.read_int()?,
                _ if emitter.object.read_mdl_token(stream, token)? => {}
                _ => {
                    return Err(Error::unknown_token(
                        format!("RibbonEmitter {:?}", emitter.object.name),
                        token,
                    ))
                }
            }
        }
        Ok(emitter)
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        let timelines = &self.object.timelines;
        writer.start_object_block(Self::KEYWORD, &self.object.name.to_str_lossy())?;
        self.object.write_mdl_header(writer);
        write_animated_float(writer, timelines, AnimationTag::RibbonHeightAbove, self.height_above)?;
        write_animated_float(writer, timelines, AnimationTag::RibbonHeightBelow, self.height_below)?;
        write_animated_float(writer, timelines, AnimationTag::RibbonAlpha, self.alpha)?;
        write_animated_color(writer, timelines, AnimationTag::RibbonColor, self.color)?;
        match find_timeline(timelines, AnimationTag::RibbonTextureSlot) {
            Some(timeline) => timeline.write_mdl(writer)?,
            None => writer.write_attrib("static TextureSlot", self.texture_slot),
        }
        write_timeline(writer, timelines, AnimationTag::RibbonVisibility)?;
        writer.write_attrib("EmissionRate", self.emission_rate);
        writer.write_float_attrib("LifeSpan", self.life_span);
        if self.gravity != 0.0 {
            writer.write_float_attrib("Gravity", self.gravity);
        }
        writer.write_attrib("Rows", self.rows);
        writer.write_attrib("Columns", self.columns);
        writer.write_attrib("MaterialID", self.material_id);
        self.object.write_mdl_timelines(writer)?;
        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for RibbonEmitter {
    fn byte_length(&self) -> usize {
        RIBBON_FIELDS_SIZE + self.object.byte_length()
    }
}
