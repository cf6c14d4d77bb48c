//! Sprite particle emitters with segment colors and UV animation.

use std::io::Write;

use super::{read_flag, write_animated_float, write_flags, write_timeline};
use super::{Block, DynamicRecord, GenericObject, NODE_PARTICLE_EMITTER};
use crate::animation::AnimationTag;
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter};
use crate::util::{Error, Result};

pub const EMITTER2_UNSHADED: u32 = 0x8000;
pub const EMITTER2_SORT_PRIMS_FAR_Z: u32 = 0x10000;
pub const EMITTER2_LINE_EMITTER: u32 = 0x20000;
pub const EMITTER2_UNFOGGED: u32 = 0x40000;
pub const EMITTER2_MODEL_SPACE: u32 = 0x80000;
pub const EMITTER2_XY_QUAD: u32 = 0x100000;

const EMITTER2_FLAGS: [(u32, &str); 6] = [
    (EMITTER2_SORT_PRIMS_FAR_Z, "SortPrimsFarZ"),
    (EMITTER2_UNSHADED, "Unshaded"),
    (EMITTER2_LINE_EMITTER, "LineEmitter"),
    (EMITTER2_UNFOGGED, "Unfogged"),
    (EMITTER2_MODEL_SPACE, "ModelSpace"),
    (EMITTER2_XY_QUAD, "XYQuad"),
];

/// Fields after the node header, including the outer size.
const EMITTER2_FIELDS_SIZE: usize = 175;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticleFilterMode {
    #[default]
    Blend,
    Additive,
    Modulate,
    Modulate2x,
    AlphaKey,
}

impl ParticleFilterMode {
    const ALL: [ParticleFilterMode; 5] = [
        ParticleFilterMode::Blend,
        ParticleFilterMode::Additive,
        ParticleFilterMode::Modulate,
        ParticleFilterMode::Modulate2x,
        ParticleFilterMode::AlphaKey,
    ];

    pub fn from_index(index: u32) -> Result<Self> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| Error::invalid(format!("particle filter mode {} out of range", index)))
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ParticleFilterMode::Blend => "Blend",
            ParticleFilterMode::Additive => "Additive",
            ParticleFilterMode::Modulate => "Modulate",
            ParticleFilterMode::Modulate2x => "Modulate2x",
            ParticleFilterMode::AlphaKey => "AlphaKey",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.keyword() == keyword)
    }
}

/// Which end of a particle is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadOrTail {
    #[default]
    Head,
    Tail,
    Both,
}

impl HeadOrTail {
    pub fn from_index(index: u32) -> Result<Self> {
        match index {
            0 => Ok(HeadOrTail::Head),
            1 => Ok(HeadOrTail::Tail),
            2 => Ok(HeadOrTail::Both),
            _ => Err(Error::invalid(format!("head or tail value {} out of range", index))),
        }
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn keyword(self) -> &'static str {
        match self {
            HeadOrTail::Head => "Head",
            HeadOrTail::Tail => "Tail",
            HeadOrTail::Both => "Both",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "Head" => Some(HeadOrTail::Head),
            "Tail" => Some(HeadOrTail::Tail),
            "Both" => Some(HeadOrTail::Both),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleEmitter2 {
    pub object: GenericObject,
    pub speed: f32,
    pub variation: f32,
    pub latitude: f32,
    pub gravity: f32,
    pub life_span: f32,
    pub emission_rate: f32,
    pub width: f32,
    pub length: f32,
    pub filter_mode: ParticleFilterMode,
    pub rows: u32,
    pub columns: u32,
    pub head_or_tail: HeadOrTail,
    pub tail_length: f32,
    /// Fraction of the life span spent in the first segment
    pub time: f32,
    /// Start, middle and end color, red-green-blue
    pub segment_colors: [[f32; 3]; 3],
    pub segment_alphas: [u8; 3],
    pub segment_scaling: [f32; 3],
    pub head_intervals: [u32; 3],
    pub head_decay_intervals: [u32; 3],
    pub tail_intervals: [u32; 3],
    pub tail_decay_intervals: [u32; 3],
    pub texture_id: i32,
    pub squirt: u32,
    pub priority_plane: i32,
    pub replaceable_id: u32,
}

impl Default for ParticleEmitter2 {
    fn default() -> Self {
        Self {
            object: GenericObject::new(NODE_PARTICLE_EMITTER),
            speed: 0.0,
            variation: 0.0,
            latitude: 0.0,
            gravity: 0.0,
            life_span: 0.0,
            emission_rate: 0.0,
            width: 0.0,
            length: 0.0,
            filter_mode: ParticleFilterMode::default(),
            rows: 1,
            columns: 1,
            head_or_tail: HeadOrTail::default(),
            tail_length: 0.0,
            time: 0.5,
            segment_colors: [[1.0; 3]; 3],
            segment_alphas: [255; 3],
            segment_scaling: [1.0; 3],
            head_intervals: [0; 3],
            head_decay_intervals: [0; 3],
            tail_intervals: [0; 3],
            tail_decay_intervals: [0; 3],
            texture_id: -1,
            squirt: 0,
            priority_plane: 0,
            replaceable_id: 0,
        }
    }
}

fn read_u32_triple(stream: &mut TokenStream<'_>, keyword: &str) -> Result<[u32; 3]> {
    let values = stream.read_number_list::<u32>()?;
    values
        .try_into()
        .map_err(|values: Vec<u32>| Error::invalid(format!("{} needs 3 values, got {}", keyword, values.len())))
}

impl ParticleEmitter2 {
    fn read_mdl_segment_colors(&mut self, stream: &mut TokenStream<'_>) -> Result<()> {
        stream.enter_block()?;
        let mut index = 0;
        while let Some(token) = stream.next_in_block()? {
            if token != "Color" {
                return Err(Error::unknown_token("SegmentColor", token));
            }
            let Some(slot) = self.segment_colors.get_mut(index) else {
                return Err(Error::invalid("SegmentColor holds more than 3 colors"));
            };
            *slot = stream.read_color()?;
            index += 1;
        }
        Ok(())
    }
}

impl Block for ParticleEmitter2 {
    const KEYWORD: &'static str = "ParticleEmitter2";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let (object, mut body) = GenericObject::read_mdx_wrapped(reader, "particle emitter 2")?;
        let mut emitter = Self {
            object,
            speed: body.read_f32()?,
            variation: body.read_f32()?,
            latitude: body.read_f32()?,
            gravity: body.read_f32()?,
            life_span: body.read_f32()?,
            emission_rate: body.read_f32()?,
            width: body.read_f32()?,
            length: body.read_f32()?,
            filter_mode: ParticleFilterMode::from_index(body.read_u32()?)?,
            rows: body.read_u32()?,
            columns: body.read_u32()?,
            head_or_tail: HeadOrTail::from_index(body.read_u32()?)?,
            tail_length: body.read_f32()?,
            time: body.read_f32()?,
            segment_colors: [
                body.read_f32_array::<3>()?,
                body.read_f32_array::<3>()?,
                body.read_f32_array::<3>()?,
            ],
            segment_alphas: [body.read_u8()?, body.read_u8()?, body.read_u8()?],
            segment_scaling: body.read_f32_array::<3>()?,
            head_intervals: body.read_u32_array::<3>()?,
            head_decay_intervals: body.read_u32_array::<3>()?,
            tail_intervals: body.read_u32_array::<3>()?,
            tail_decay_intervals: body.read_u32_array::<3>()?,
            texture_id: body.read_i32()?,
            squirt: body.read_u32()?,
            priority_plane: body.read_i32()?,
            replaceable_id: body.read_u32()?,
        };
        emitter.object.read_object_timelines(&mut body)?;
        Ok(emitter)
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_len(self.byte_length())?;
        self.object.write_mdx(writer)?;
        writer.write_f32(self.speed)?;
        writer.write_f32(self.variation)?;
        writer.write_f32(self.latitude)?;
        writer.write_f32(self.gravity)?;
        writer.write_f32(self.life_span)?;
        writer.write_f32(self.emission_rate)?;
        writer.write_f32(self.width)?;
        writer.write_f32(self.length)?;
        writer.write_u32(self.filter_mode.index())?;
        writer.write_u32(self.rows)?;
        writer.write_u32(self.columns)?;
        writer.write_u32(self.head_or_tail.index())?;
        writer.write_f32(self.tail_length)?;
        writer.write_f32(self.time)?;
        for color in &self.segment_colors {
            writer.write_f32_slice(color)?;
        }
        writer.write_bytes(&self.segment_alphas)?;
        writer.write_f32_slice(&self.segment_scaling)?;
        writer.write_u32_slice(&self.head_intervals)?;
        writer.write_u32_slice(&self.head_decay_intervals)?;
        writer.write_u32_slice(&self.tail_intervals)?;
        writer.write_u32_slice(&self.tail_decay_intervals)?;
        writer.write_i32(self.texture_id)?;
        writer.write_u32(self.squirt)?;
        writer.write_i32(self.priority_plane)?;
        writer.write_u32(self.replaceable_id)?;
        self.object.write_object_timelines(writer)
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut emitter = Self {
            object: GenericObject::read_mdl_start(stream, NODE_PARTICLE_EMITTER)?,
            ..Self::default()
        };
        while let Some(token) = stream.next_in_block()? {
            if emitter.object.read_mdl_token(stream, token)?
                || read_flag(&EMITTER2_FLAGS, &mut emitter.object.flags, token)
            {
                continue;
            }
            if let Some(mode) = ParticleFilterMode::from_keyword(token) {
                emitter.filter_mode = mode;
                continue;
            }
            if let Some(head_or_tail) = HeadOrTail::from_keyword(token) {
                emitter.head_or_tail = head_or_tail;
                continue;
            }
            match token {
                "static" => match stream.read_token()? {
                    "Speed" => emitter.speed = stream.read_float()?,
                    "Variation" => emitter.variation = stream.read_float()?,
                    "Latitude" => emitter.latitude = stream.read_float()?,
                    "Gravity" => emitter.gravity = stream.read_float()?,
                    "EmissionRate" => emitter.emission_rate = stream.read_float()?,
                    "Width" => emitter.width = stream.read_float()?,
                    "Length" => emitter.length = stream.read_float()?,
                    other => return Err(Error::unknown_token("ParticleEmitter2 static", other)),
                },
                "Speed" => emitter.object.read_timeline(stream, AnimationTag::Emitter2Speed)?,
                "Variation" => emitter.object.read_timeline(stream, AnimationTag::Emitter2Variation)?,
                "Latitude" => emitter.object.read_timeline(stream, AnimationTag::Emitter2Latitude)?,
                "Gravity" => emitter.object.read_timeline(stream, AnimationTag::Emitter2Gravity)?,
                "EmissionRate" => emitter.object.read_timeline(stream, AnimationTag::Emitter2EmissionRate)?,
                "Width" => emitter.object.read_timeline(stream, AnimationTag::Emitter2Width)?,
                "Length" => emitter.object.read_timeline(stream, AnimationTag::Emitter2Length)?,
                "Visibility" => emitter.object.read_timeline(stream, AnimationTag::Emitter2Visibility)?,
                "Squirt" => emitter.squirt = 1,
                "LifeSpan" => emitter.life_span = stream.read_float()?,
                "Rows" => emitter.rows = stream.read_u32()?,
                "Columns" => emitter.columns = stream.read_u32()?,
                "TailLength" => emitter.tail_length = stream.read_float()?,
                "Time" => emitter.time = stream.read_float()?,
                "SegmentColor" => emitter.read_mdl_segment_colors(stream)?,
                "Alpha" => {
                    let values = stream.read_number_list::<u8>()?;
                    emitter.segment_alphas = values.try_into().map_err(|values: Vec<u8>| {
                        Error::invalid(format!("Alpha needs 3 values, got {}", values.len()))
                    })?;
                }
                "ParticleScaling" => emitter.segment_scaling = stream.read_float_array::<3>()?,
                "LifeSpanUVAnim" => emitter.head_intervals = read_u32_triple(stream, token)?,
                "DecayUVAnim" => emitter.head_decay_intervals = read_u32_triple(stream, token)?,
                "TailUVAnim" => emitter.tail_intervals = read_u32_triple(stream, token)?,
                "TailDecayUVAnim" => emitter.tail_decay_intervals = read_u32_triple(stream, token)?,
                "TextureID" => emitter.texture_id = stream.read_int()?,
                "ReplaceableId" => emitter.replaceable_id = stream.read_u32()?,
                "PriorityPlane" => emitter.priority_plane = stream.read_int()?,
                _ => {
                    return Err(Error::unknown_token(
                        format!("ParticleEmitter2 {:?}", emitter.object.name),
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
        write_flags(&EMITTER2_FLAGS, self.object.flags, writer);
        write_animated_float(writer, timelines, AnimationTag::Emitter2Speed, self.speed)?;
        write_animated_float(writer, timelines, AnimationTag::Emitter2Variation, self.variation)?;
        write_animated_float(writer, timelines, AnimationTag::Emitter2Latitude, self.latitude)?;
        write_animated_float(writer, timelines, AnimationTag::Emitter2Gravity, self.gravity)?;
        write_timeline(writer, timelines, AnimationTag::Emitter2Visibility)?;
        if self.squirt != 0 {
            writer.write_flag("Squirt");
        }
        writer.write_float_attrib("LifeSpan", self.life_span);
        write_animated_float(writer, timelines, AnimationTag::Emitter2EmissionRate, self.emission_rate)?;
        write_animated_float(writer, timelines, AnimationTag::Emitter2Width, self.width)?;
        write_animated_float(writer, timelines, AnimationTag::Emitter2Length, self.length)?;
        writer.write_flag(self.filter_mode.keyword());
        writer.write_attrib("Rows", self.rows);
        writer.write_attrib("Columns", self.columns);
        writer.write_flag(self.head_or_tail.keyword());
        writer.write_float_attrib("TailLength", self.tail_length);
        writer.write_float_attrib("Time", self.time);

        writer.start_block("SegmentColor");
        for color in self.segment_colors {
            writer.write_color("Color", color);
        }
        writer.end_block_comma();

        writer.write_array_attrib("Alpha", &self.segment_alphas);
        writer.write_float_array_attrib("ParticleScaling", &self.segment_scaling);
        writer.write_array_attrib("LifeSpanUVAnim", &self.head_intervals);
        writer.write_array_attrib("DecayUVAnim", &self.head_decay_intervals);
        writer.write_array_attrib("TailUVAnim", &self.tail_intervals);
        writer.write_array_attrib("TailDecayUVAnim", &self.tail_decay_intervals);
        writer.write_attrib("TextureID", self.texture_id);
        if self.replaceable_id != 0 {
            writer.write_attrib("ReplaceableId", self.replaceable_id);
        }
        if self.priority_plane != 0 {
            writer.write_attrib("PriorityPlane", self.priority_plane);
        }
        self.object.write_mdl_timelines(writer)?;
        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for ParticleEmitter2 {
    fn byte_length(&self) -> usize {
        EMITTER2_FIELDS_SIZE + self.object.byte_length()
    }
}
