//! Portrait and cinematic cameras.

use std::io::Write;

use glam::Vec3;

use super::{read_object_name, write_timeline, Block, DynamicRecord};
use crate::animation::{read_timelines, timelines_byte_length, AnimationTag, Timeline};
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter, NAME_LENGTH};
use crate::util::{ByteString, Error, Result};

/// Size, name, position, clip planes, field of view and target.
const CAMERA_FIELDS_SIZE: usize = 4 + NAME_LENGTH + 12 + 12 + 12;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Camera {
    pub name: ByteString,
    pub position: Vec3,
    pub field_of_view: f32,
    pub far_clipping_plane: f32,
    pub near_clipping_plane: f32,
    pub target_position: Vec3,
    pub timelines: Vec<Timeline>,
}

impl Camera {
    fn read_mdl_target(&mut self, stream: &mut TokenStream<'_>) -> Result<()> {
        stream.enter_block()?;
        while let Some(token) = stream.next_in_block()? {
            match token {
                "Position" => self.target_position = stream.read_vec3()?,
                "Translation" => self
                    .timelines
                    .push(Timeline::read_mdl(stream, AnimationTag::CameraTargetTranslation)?),
                _ => return Err(Error::unknown_token("Camera Target", token)),
            }
        }
        Ok(())
    }
}

impl Block for Camera {
    const KEYWORD: &'static str = "Camera";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let size = reader.read_len()?;
        if size < CAMERA_FIELDS_SIZE {
            return Err(Error::invalid(format!("camera size {} is below its header", size)));
        }
        let mut body = reader.take(size - 4)?;
        Ok(Self {
            name: body.read_fixed_string(NAME_LENGTH)?,
            position: body.read_vec3()?,
            field_of_view: body.read_f32()?,
            far_clipping_plane: body.read_f32()?,
            near_clipping_plane: body.read_f32()?,
            target_position: body.read_vec3()?,
            timelines: read_timelines(&mut body)?,
        })
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_len(self.byte_length())?;
        writer.write_fixed_string(&self.name, NAME_LENGTH)?;
        writer.write_vec3(self.position)?;
        writer.write_f32(self.field_of_view)?;
        writer.write_f32(self.far_clipping_plane)?;
        writer.write_f32(self.near_clipping_plane)?;
        writer.write_vec3(self.target_position)?;
        for timeline in &self.timelines {
            timeline.write_mdx(writer)?;
        }
        Ok(())
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut camera = Self {
            name: read_object_name(stream)?,
            ..Self::default()
        };
        while let Some(token) = stream.next_in_block()? {
            match token {
                "Position" => camera.position = stream.read_vec3()?,
                "Translation" => camera
                    .timelines
                    .push(Timeline::read_mdl(stream, AnimationTag::CameraTranslation)?),
                "Rotation" => camera
                    .timelines
                    .push(Timeline::read_mdl(stream, AnimationTag::CameraRotation)?),
                "FieldOfView" => camera.field_of_view = stream.read_float()?,
                "FarClip" => camera.far_clipping_plane = stream.read_float()?,
                "NearClip" => camera.near_clipping_plane = stream.read_float()?,
                "Target" => camera.read_mdl_target(stream)?,
                _ => return Err(Error::unknown_token(format!("Camera {:?}", camera.name), token)),
            }
        }
        Ok(camera)
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        writer.start_object_block(Self::KEYWORD, &self.name.to_str_lossy())?;
        writer.write_float_array_attrib("Position", &self.position.to_array());
        write_timeline(writer, &self.timelines, AnimationTag::CameraTranslation)?;
        write_timeline(writer, &self.timelines, AnimationTag::CameraRotation)?;
        writer.write_float_attrib("FieldOfView", self.field_of_view);
        writer.write_float_attrib("FarClip", self.far_clipping_plane);
        writer.write_float_attrib("NearClip", self.near_clipping_plane);

        writer.start_block("Target");
        writer.write_float_array_attrib("Position", &self.target_position.to_array());
        write_timeline(writer, &self.timelines, AnimationTag::CameraTargetTranslation)?;
        writer.end_block();

        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for Camera {
    fn byte_length(&self) -> usize {
        CAMERA_FIELDS_SIZE + timelines_byte_length(&self.timelines)
    }
}
