//! Emitters that spawn whole models or simple textured particles.

use std::io::Write;

use super::{read_flag, write_animated_float, write_flags, write_timeline};
use super::{Block, DynamicRecord, GenericObject, NODE_PARTICLE_EMITTER};
use crate::animation::AnimationTag;
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter, FILE_NAME_LENGTH};
use crate::util::{ByteString, Error, Result};

pub const EMITTER_USES_MDL: u32 = 0x8000;
pub const EMITTER_USES_TGA: u32 = 0x10000;

const EMITTER_FLAGS: [(u32, &str); 2] = [
    (EMITTER_USES_MDL, "EmitterUsesMDL"),
    (EMITTER_USES_TGA, "EmitterUsesTGA"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleEmitter {
    pub object: GenericObject,
    pub emission_rate: f32,
    pub gravity: f32,
    pub longitude: f32,
    pub latitude: f32,
    /// Spawned model or texture
    pub path: ByteString,
    pub life_span: f32,
    pub speed: f32,
}

impl Default for ParticleEmitter {
    fn default() -> Self {
        Self {
            object: GenericObject::new(NODE_PARTICLE_EMITTER),
            emission_rate: 0.0,
            gravity: 0.0,
            longitude: 0.0,
            latitude: 0.0,
            path: ByteString::new(),
            life_span: 0.0,
            speed: 0.0,
        }
    }
}

impl ParticleEmitter {
    fn read_mdl_particle(&mut self, stream: &mut TokenStream<'_>) -> Result<()> {
        stream.enter_block()?;
        while let Some(token) = stream.next_in_block()? {
            match token {
                "static" => match stream.read_token()? {
                    "LifeSpan" => self.life_span = stream.read_float()?,
                    "InitVelocity" => self.speed = stream.read_float()?,
                    other => return Err(Error::unknown_token("Particle static", other)),
                },
                "LifeSpan" => self.object.read_timeline(stream, AnimationTag::EmitterLifeSpan)?,
                "InitVelocity" => self.object.read_timeline(stream, AnimationTag::EmitterSpeed)?,
                "Path" => self.path = stream.read_token()?.into(),
                _ => return Err(Error::unknown_token("Particle", token)),
            }
        }
        Ok(())
    }
}

impl Block for ParticleEmitter {
    const KEYWORD: &'static str = "ParticleEmitter";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let (object, mut body) = GenericObject::read_mdx_wrapped(reader, "particle emitter")?;
        let mut emitter = Self {
            object,
            emission_rate: body.read_f32()?,
            gravity: body.read_f32()?,
            longitude: body.read_f32()?,
            latitude: body.read_f32()?,
            path: body.read_fixed_string(FILE_NAME_LENGTH)?,
            life_span: body.read_f32()?,
            speed: body.read_f32()?,
        };
        emitter.object.read_object_timelines(&mut body)?;
        Ok(emitter)
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_len(self.byte_length())?;
        self.object.write_mdx(writer)?;
        writer.write_f32(self.emission_rate)?;
        writer.write_f32(self.gravity)?;
        writer.write_f32(self.longitude)?;
        writer.write_f32(self.latitude)?;
        writer.write_fixed_string(&self.path, FILE_NAME_LENGTH)?;
        writer.write_f32(self.life_span)?;
        writer.write_f32(self.speed)?;
        self.object.write_object_timelines(writer)
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut emitter = Self {
            object: GenericObject::read_mdl_start(stream, NODE_PARTICLE_EMITTER)?,
            ..Self::default()
        };
        while let Some(token) = stream.next_in_block()? {
            if emitter.object.read_mdl_token(stream, token)?
                || read_flag(&EMITTER_FLAGS, &mut emitter.object.flags, token)
            {
                continue;
            }
            match token {
                "static" => match stream.read_token()? {
                    "EmissionRate" => emitter.emission_rate = stream.read_float()?,
                    "Gravity" => emitter.gravity = stream.read_float()?,
                    "Longitude" => emitter.longitude = stream.read_float()?,
                    "Latitude" => emitter.latitude = stream.read_float()?,
                    other => return Err(Error::unknown_token("ParticleEmitter static", other)),
                },
                "EmissionRate" => emitter.object.read_timeline(stream, AnimationTag::EmitterEmissionRate)?,
                "Gravity" => emitter.object.read_timeline(stream, AnimationTag::EmitterGravity)?,
                "Longitude" => emitter.object.read_timeline(stream, AnimationTag::EmitterLongitude)?,
                "Latitude" => emitter.object.read_timeline(stream, AnimationTag::EmitterLatitude)?,
                "Visibility" => emitter.object.read_timeline(stream, AnimationTag::EmitterVisibility)?,
                "Particle" => emitter.read_mdl_particle(stream)?,
                _ => {
                    return Err(Error::unknown_token(
                        format!("ParticleEmitter {:?}", emitter.object.name),
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
        write_flags(&EMITTER_FLAGS, self.object.flags, writer);
        write_animated_float(writer, timelines, AnimationTag::EmitterEmissionRate, self.emission_rate)?;
        write_animated_float(writer, timelines, AnimationTag::EmitterGravity, self.gravity)?;
        write_animated_float(writer, timelines, AnimationTag::EmitterLongitude, self.longitude)?;
        write_animated_float(writer, timelines, AnimationTag::EmitterLatitude, self.latitude)?;
        write_timeline(writer, timelines, AnimationTag::EmitterVisibility)?;

        writer.start_block("Particle");
        write_animated_float(writer, timelines, AnimationTag::EmitterLifeSpan, self.life_span)?;
        write_animated_float(writer, timelines, AnimationTag::EmitterSpeed, self.speed)?;
        writer.write_string_attrib("Path", &self.path.to_str_lossy())?;
        writer.end_block();

        self.object.write_mdl_timelines(writer)?;
        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for ParticleEmitter {
    fn byte_length(&self) -> usize {
        4 + 16 + FILE_NAME_LENGTH + 8 + self.object.byte_length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Interpolation, Timeline, TimelineTrack, Track};
    use crate::config::CodecSettings;

    fn blood() -> ParticleEmitter {
        let mut speed = Track::new(Interpolation::Linear);
        speed.push(0, 10.0f32);
        speed.push(100, 20.0);
        let mut emitter = ParticleEmitter {
            emission_rate: 5.0,
            gravity: 9.5,
            path: "Objects\\Spawnmodels\\Blood.mdl".into(),
            life_span: 1.5,
            ..ParticleEmitter::default()
        };
        emitter.object.name = "Blood".into();
        emitter.object.object_id = 9;
        emitter.object.flags |= EMITTER_USES_MDL;
        emitter.object.timelines =
            vec![Timeline::from_track(AnimationTag::EmitterSpeed, TimelineTrack::Float(speed)).unwrap()];
        emitter
    }

    #[test]
    fn test_binary_round_trip() {
        let emitter = blood();
        let mut writer = BinaryWriter::new(Vec::new());
        emitter.write_mdx(&mut writer).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), emitter.byte_length());
        assert_eq!(ParticleEmitter::default().byte_length(), 288 + 96);
        assert_eq!(ParticleEmitter::read_mdx(&mut BinaryReader::new(&bytes)).unwrap(), emitter);
    }

    #[test]
    fn test_text_round_trip() {
        let emitter = blood();
        let mut writer = TokenWriter::new(&CodecSettings::default());
        emitter.write_mdl(&mut writer).unwrap();
        let text = writer.finish();
        assert!(text.contains("\tEmitterUsesMDL,\n\tstatic EmissionRate 5,\n"));
        assert!(text.contains("\tParticle {\n\t\tstatic LifeSpan 1.5,\n\t\tInitVelocity 2 {\n"));

        let mut stream = TokenStream::new(&text);
        stream.expect("ParticleEmitter").unwrap();
        assert_eq!(ParticleEmitter::read_mdl(&mut stream).unwrap(), emitter);
    }
}
