//! Materials and their layers.

use std::io::Write;

use super::{find_timeline, read_flag, write_animated_float, write_flags, Block, DynamicRecord};
use crate::animation::{read_timelines, timelines_byte_length, AnimationTag, Timeline};
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter, LAYS};
use crate::util::{Error, Result};

pub const MATERIAL_CONSTANT_COLOR: u32 = 0x1;
pub const MATERIAL_TWO_SIDED: u32 = 0x2;
pub const MATERIAL_SORT_PRIMS_NEAR_Z: u32 = 0x8;
pub const MATERIAL_SORT_PRIMS_FAR_Z: u32 = 0x10;
pub const MATERIAL_FULL_RESOLUTION: u32 = 0x20;

const MATERIAL_FLAGS: [(u32, &str); 5] = [
    (MATERIAL_CONSTANT_COLOR, "ConstantColor"),
    (MATERIAL_TWO_SIDED, "TwoSided"),
    (MATERIAL_SORT_PRIMS_NEAR_Z, "SortPrimsNearZ"),
    (MATERIAL_SORT_PRIMS_FAR_Z, "SortPrimsFarZ"),
    (MATERIAL_FULL_RESOLUTION, "FullResolution"),
];

pub const LAYER_UNSHADED: u32 = 0x1;
pub const LAYER_SPHERE_ENV_MAP: u32 = 0x2;
pub const LAYER_TWO_SIDED: u32 = 0x10;
pub const LAYER_UNFOGGED: u32 = 0x20;
pub const LAYER_NO_DEPTH_TEST: u32 = 0x40;
pub const LAYER_NO_DEPTH_SET: u32 = 0x80;

const LAYER_FLAGS: [(u32, &str); 6] = [
    (LAYER_UNSHADED, "Unshaded"),
    (LAYER_SPHERE_ENV_MAP, "SphereEnvMap"),
    (LAYER_TWO_SIDED, "TwoSided"),
    (LAYER_UNFOGGED, "Unfogged"),
    (LAYER_NO_DEPTH_TEST, "NoDepthTest"),
    (LAYER_NO_DEPTH_SET, "NoDepthSet"),
];

/// How a layer blends with what is behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    None,
    Transparent,
    Blend,
    Additive,
    AddAlpha,
    Modulate,
    Modulate2x,
}

impl FilterMode {
    const ALL: [FilterMode; 7] = [
        FilterMode::None,
        FilterMode::Transparent,
        FilterMode::Blend,
        FilterMode::Additive,
        FilterMode::AddAlpha,
        FilterMode::Modulate,
        FilterMode::Modulate2x,
    ];

    pub fn from_index(index: u32) -> Result<Self> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| Error::invalid(format!("layer filter mode {} out of range", index)))
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn keyword(self) -> &'static str {
        match self {
            FilterMode::None => "None",
            FilterMode::Transparent => "Transparent",
            FilterMode::Blend => "Blend",
            FilterMode::Additive => "Additive",
            FilterMode::AddAlpha => "AddAlpha",
            FilterMode::Modulate => "Modulate",
            FilterMode::Modulate2x => "Modulate2x",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.keyword() == keyword)
    }
}

/// One texture pass of a material.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub filter_mode: FilterMode,
    pub flags: u32,
    pub texture_id: i32,
    pub texture_animation_id: i32,
    pub coord_id: u32,
    pub alpha: f32,
    pub timelines: Vec<Timeline>,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            filter_mode: FilterMode::None,
            flags: 0,
            texture_id: 0,
            texture_animation_id: -1,
            coord_id: 0,
            alpha: 1.0,
            timelines: Vec::new(),
        }
    }
}

impl Block for Layer {
    const KEYWORD: &'static str = "Layer";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let size = reader.read_len()?;
        if size < 28 {
            return Err(Error::invalid(format!("layer size {} is below its header", size)));
        }
        let mut body = reader.take(size - 4)?;
        Ok(Self {
            filter_mode: FilterMode::from_index(body.read_u32()?)?,
            flags: body.read_u32()?,
            texture_id: body.read_i32()?,
            texture_animation_id: body.read_i32()?,
            coord_id: body.read_u32()?,
            alpha: body.read_f32()?,
            timelines: read_timelines(&mut body)?,
        })
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_len(self.byte_length())?;
        writer.write_u32(self.filter_mode.index())?;
        writer.write_u32(self.flags)?;
        writer.write_i32(self.texture_id)?;
        writer.write_i32(self.texture_animation_id)?;
        writer.write_u32(self.coord_id)?;
        writer.write_f32(self.alpha)?;
        for timeline in &self.timelines {
            timeline.write_mdx(writer)?;
        }
        Ok(())
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut layer = Self::default();
        stream.enter_block()?;
        while let Some(token) = stream.next_in_block()? {
            match token {
                "FilterMode" => {
                    let keyword = stream.read_token()?;
                    layer.filter_mode = FilterMode::from_keyword(keyword)
                        .ok_or_else(|| Error::unknown_token("Layer FilterMode", keyword))?;
                }
                "static" => match stream.read_token()? {
                    "TextureID" => layer.texture_id = stream.read_int()?,
                    "Alpha" => layer.alpha = stream.read_float()?,
                    other => return Err(Error::unknown_token("Layer static", other)),
                },
                "TextureID" => layer
                    .timelines
                    .push(Timeline::read_mdl(stream, AnimationTag::LayerTextureId)?),
                "Alpha" => layer
                    .timelines
                    .push(Timeline::read_mdl(stream, AnimationTag::LayerAlpha)?),
                "TVertexAnimId" => layer.texture_animation_id = stream.read_int()?,
                "CoordId" => layer.coord_id = stream.read_u32()?,
                _ if read_flag(&LAYER_FLAGS, &mut layer.flags, token) => {}
                _ => return Err(Error::unknown_token(Self::KEYWORD, token)),
            }
        }
        Ok(layer)
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        writer.start_block(Self::KEYWORD);
        writer.write_attrib("FilterMode", self.filter_mode.keyword());
        write_flags(&LAYER_FLAGS, self.flags, writer);
        match find_timeline(&self.timelines, AnimationTag::LayerTextureId) {
            Some(timeline) => timeline.write_mdl(writer)?,
            None => writer.write_attrib("static TextureID", self.texture_id),
        }
        if self.texture_animation_id != -1 {
            writer.write_attrib("TVertexAnimId", self.texture_animation_id);
        }
        if self.coord_id != 0 {
            writer.write_attrib("CoordId", self.coord_id);
        }
        if self.alpha != 1.0 || find_timeline(&self.timelines, AnimationTag::LayerAlpha).is_some() {
            write_animated_float(writer, &self.timelines, AnimationTag::LayerAlpha, self.alpha)?;
        }
        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for Layer {
    fn byte_length(&self) -> usize {
        28 + timelines_byte_length(&self.timelines)
    }
}

/// An ordered stack of layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    pub priority_plane: i32,
    pub flags: u32,
    pub layers: Vec<Layer>,
}

impl Block for Material {
    const KEYWORD: &'static str = "Material";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let size = reader.read_len()?;
        if size < 20 {
            return Err(Error::invalid(format!("material size {} is below its header", size)));
        }
        let mut body = reader.take(size - 4)?;
        let priority_plane = body.read_i32()?;
        let flags = body.read_u32()?;
        body.expect_tag(LAYS)?;
        let count = body.read_len()?;
        let mut layers = Vec::new();
        for _ in 0..count {
            layers.push(Layer::read_mdx(&mut body)?);
        }
        if !body.is_empty() {
            return Err(Error::invalid(format!(
                "{} bytes left over after material layers",
                body.remaining()
            )));
        }
        Ok(Self {
            priority_plane,
            flags,
            layers,
        })
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_len(self.byte_length())?;
        writer.write_i32(self.priority_plane)?;
        writer.write_u32(self.flags)?;
        writer.write_tag(LAYS)?;
        writer.write_len(self.layers.len())?;
        for layer in &self.layers {
            layer.write_mdx(writer)?;
        }
        Ok(())
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut material = Self::default();
        stream.enter_block()?;
        while let Some(token) = stream.next_in_block()? {
            match token {
                "Layer" => material.layers.push(Layer::read_mdl(stream)?),
                "PriorityPlane" => material.priority_plane = stream.read_int()?,
                _ if read_flag(&MATERIAL_FLAGS, &mut material.flags, token) => {}
                _ => return Err(Error::unknown_token(Self::KEYWORD, token)),
            }
        }
        Ok(material)
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        writer.start_block(Self::KEYWORD);
        write_flags(&MATERIAL_FLAGS, self.flags, writer);
        if self.priority_plane != 0 {
            writer.write_attrib("PriorityPlane", self.priority_plane);
        }
        for layer in &self.layers {
            layer.write_mdl(writer)?;
        }
        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for Material {
    fn byte_length(&self) -> usize {
        20 + self.layers.iter().map(Layer::byte_length).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Interpolation, Track, TimelineTrack};
    use crate::config::CodecSettings;

    fn material() -> Material {
        let mut alpha = Track::new(Interpolation::Linear);
        alpha.push(0, 1.0f32);
        alpha.push(500, 0.0);
        let mut textures = Track::new(Interpolation::DontInterp);
        textures.push(0, 0u32);
        textures.push(100, 1);
        Material {
            priority_plane: 2,
            flags: MATERIAL_CONSTANT_COLOR | MATERIAL_FULL_RESOLUTION,
            layers: vec![
                Layer {
                    filter_mode: FilterMode::Blend,
                    flags: LAYER_UNSHADED | LAYER_NO_DEPTH_SET,
                    texture_id: 3,
                    ..Layer::default()
                },
                Layer {
                    filter_mode: FilterMode::Additive,
                    texture_animation_id: 0,
                    coord_id: 1,
                    timelines: vec![
                        Timeline::from_track(AnimationTag::LayerTextureId, TimelineTrack::UInt32(textures))
                            .unwrap(),
                        Timeline::from_track(AnimationTag::LayerAlpha, TimelineTrack::Float(alpha))
                            .unwrap(),
                    ],
                    ..Layer::default()
                },
            ],
        }
    }

    #[test]
    fn test_binary_round_trip() {
        let material = material();
        let mut writer = BinaryWriter::new(Vec::new());
        material.write_mdx(&mut writer).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), material.byte_length());
        assert_eq!(&bytes[12..16], b"LAYS");
        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(Material::read_mdx(&mut reader).unwrap(), material);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_text_round_trip() {
        let material = material();
        let mut writer = TokenWriter::new(&CodecSettings::default());
        material.write_mdl(&mut writer).unwrap();
        let text = writer.finish();
        assert!(text.contains("\t\tFilterMode Blend,\n\t\tUnshaded,\n\t\tNoDepthSet,\n\t\tstatic TextureID 3,\n"));
        assert!(text.contains("TextureID 2 {"));

        let mut stream = TokenStream::new(&text);
        stream.expect("Material").unwrap();
        let parsed = Material::read_mdl(&mut stream).unwrap();
        assert_eq!(parsed.layers[0], material.layers[0]);
        assert_eq!(parsed.layers[1].timelines, material.layers[1].timelines);
        assert_eq!(parsed, material);
    }

    #[test]
    fn test_bad_filter_mode() {
        let mut stream = TokenStream::new("{ FilterMode Glow, }");
        assert!(Layer::read_mdl(&mut stream).is_err());
    }

    #[test]
    fn test_layer_size_too_small() {
        let bytes = 8u32.to_le_bytes();
        assert!(Layer::read_mdx(&mut BinaryReader::new(&bytes)).is_err());
    }
}
