//! Light sources.

use std::io::Write;

use super::{find_timeline, write_animated_color, write_animated_float, write_timeline};
use super::{Block, DynamicRecord, GenericObject, NODE_LIGHT};
use crate::animation::AnimationTag;
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter};
use crate::util::{Error, Result};

/// Fields after the node header, including the outer size.
const LIGHT_FIELDS_SIZE: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightType {
    #[default]
    Omnidirectional,
    Directional,
    Ambient,
}

impl LightType {
    pub fn from_index(index: u32) -> Result<Self> {
        match index {
            0 => Ok(LightType::Omnidirectional),
            1 => Ok(LightType::Directional),
            2 => Ok(LightType::Ambient),
            _ => Err(Error::invalid(format!("light type {} out of range", index))),
        }
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn keyword(self) -> &'static str {
        match self {
            LightType::Omnidirectional => "Omnidirectional",
            LightType::Directional => "Directional",
            LightType::Ambient => "Ambient",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "Omnidirectional" => Some(LightType::Omnidirectional),
            "Directional" => Some(LightType::Directional),
            "Ambient" => Some(LightType::Ambient),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub object: GenericObject,
    pub light_type: LightType,
    /// Start and end distance
    pub attenuation: [f32; 2],
    pub color: [f32; 3],
    pub intensity: f32,
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            object: GenericObject::new(NODE_LIGHT),
            light_type: LightType::default(),
            attenuation: [0.0; 2],
            color: [1.0; 3],
            intensity: 0.0,
            ambient_color: [1.0; 3],
            ambient_intensity: 0.0,
        }
    }
}

impl Block for Light {
    const KEYWORD: &'static str = "Light";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let (object, mut body) = GenericObject::read_mdx_wrapped(reader, "light")?;
        let mut light = Self {
            object,
            light_type: LightType::from_index(body.read_u32()?)?,
            attenuation: body.read_f32_array::<2>()?,
            color: body.read_f32_array::<3>()?,
            intensity: body.read_f32()?,
            ambient_color: body.read_f32_array::<3>()?,
            ambient_intensity: body.read_f32()?,
        };
        light.object.read_object_timelines(&mut body)?;
        Ok(light)
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_len(self.byte_length())?;
        self.object.write_mdx(writer)?;
        writer.write_u32(self.light_type.index())?;
        writer.write_f32_slice(&self.attenuation)?;
        writer.write_f32_slice(&self.color)?;
        writer.write_f32(self.intensity)?;
        writer.write_f32_slice(&self.ambient_color)?;
        writer.write_f32(self.ambient_intensity)?;
        self.object.write_object_timelines(writer)
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut light = Self {
            object: GenericObject::read_mdl_start(stream, NODE_LIGHT)?,
            ..Self::default()
        };
        while let Some(token) = stream.next_in_block()? {
            if light.object.read_mdl_token(stream, token)? {
                continue;
            }
            if let Some(light_type) = LightType::from_keyword(token) {
                light.light_type = light_type;
                continue;
            }
            match token {
                "static" => match stream.read_token()? {
                    "AttenuationStart" => light.attenuation[0] = stream.read_float()?,
                    "AttenuationEnd" => light.attenuation[1] = stream.read_float()?,
                    "Intensity" => light.intensity = stream.read_float()?,
                    "Color" => light.color = stream.read_color()?,
                    "AmbIntensity" => light.ambient_intensity = stream.read_float()?,
                    "AmbColor" => light.ambient_color = stream.read_color()?,
                    other => return Err(Error::unknown_token("Light static", other)),
                },
                "AttenuationStart" => light.object.read_timeline(stream, AnimationTag::LightAttenuationStart)?,
                "AttenuationEnd" => light.object.read_timeline(stream, AnimationTag::LightAttenuationEnd)?,
                "Intensity" => light.object.read_timeline(stream, AnimationTag::LightIntensity)?,
                "Color" => light.object.read_timeline(stream, AnimationTag::LightColor)?,
                "AmbIntensity" => light.object.read_timeline(stream, AnimationTag::LightAmbientIntensity)?,
                "AmbColor" => light.object.read_timeline(stream, AnimationTag::LightAmbientColor)?,
                "Visibility" => light.object.read_timeline(stream, AnimationTag::LightVisibility)?,
                _ => return Err(Error::unknown_token(format!("Light {:?}", light.object.name), token)),
            }
        }
        Ok(light)
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        let timelines = &self.object.timelines;
        writer.start_object_block(Self::KEYWORD, &self.object.name.to_str_lossy())?;
        self.object.write_mdl_header(writer);
        writer.write_flag(self.light_type.keyword());
        write_animated_float(writer, timelines, AnimationTag::LightAttenuationStart, self.attenuation[0])?;
        write_animated_float(writer, timelines, AnimationTag::LightAttenuationEnd, self.attenuation[1])?;
        write_animated_color(writer, timelines, AnimationTag::LightColor, self.color)?;
        write_animated_float(writer, timelines, AnimationTag::LightIntensity, self.intensity)?;
        write_animated_color(writer, timelines, AnimationTag::LightAmbientColor, self.ambient_color)?;
        write_animated_float(writer, timelines, AnimationTag::LightAmbientIntensity, self.ambient_intensity)?;
        write_timeline(writer, timelines, AnimationTag::LightVisibility)?;
        self.object.write_mdl_timelines(writer)?;
        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for Light {
    fn byte_length(&self) -> usize {
        LIGHT_FIELDS_SIZE + self.object.byte_length()
    }
}

impl Light {
    /// Visibility track, if the light is ever switched off.
    pub fn visibility(&self) -> Option<&crate::animation::Timeline> {
        find_timeline(&self.object.timelines, AnimationTag::LightVisibility)
    }
}
