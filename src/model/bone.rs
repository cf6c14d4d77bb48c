//! Skeleton bones.

use std::io::Write;

use super::{Block, DynamicRecord, GenericObject, NODE_BONE};
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter};
use crate::util::{Error, Result};

/// A node geometry can be skinned to.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub object: GenericObject,
    /// -1 when the bone drives several geosets
    pub geoset_id: i32,
    pub geoset_animation_id: i32,
}

impl Default for Bone {
    fn default() -> Self {
        Self {
            object: GenericObject::new(NODE_BONE),
            geoset_id: -1,
            geoset_animation_id: -1,
        }
    }
}

impl Block for Bone {
    const KEYWORD: &'static str = "Bone";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            object: GenericObject::read_mdx(reader)?,
            geoset_id: reader.read_i32()?,
            geoset_animation_id: reader.read_i32()?,
        })
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        self.object.write_mdx_all(writer)?;
        writer.write_i32(self.geoset_id)?;
        writer.write_i32(self.geoset_animation_id)
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut bone = Self {
            object: GenericObject::read_mdl_start(stream, NODE_BONE)?,
            ..Self::default()
        };
        while let Some(token) = stream.next_in_block()? {
            match token {
                "GeosetId" => bone.geoset_id = stream.read_int_or("Multiple", -1)?,
                "GeosetAnimId" => bone.geoset_animation_id = stream.read_int_or("None", -1)?,
                _ if bone.object.read_mdl_token(stream, token)? => {}
                _ => return Err(Error::unknown_token(format!("Bone {:?}", bone.object.name), token)),
            }
        }
        Ok(bone)
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        writer.start_object_block(Self::KEYWORD, &self.object.name.to_str_lossy())?;
        self.object.write_mdl_header(writer);
        match self.geoset_id {
            -1 => writer.write_attrib("GeosetId", "Multiple"),
            id => writer.write_attrib("GeosetId", id),
        }
        match self.geoset_animation_id {
            -1 => writer.write_attrib("GeosetAnimId", "None"),
            id => writer.write_attrib("GeosetAnimId", id),
        }
        self.object.write_mdl_timelines(writer)?;
        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for Bone {
    fn byte_length(&self) -> usize {
        self.object.byte_length() + 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationTag, Interpolation, Timeline, TimelineTrack, Track};
    use crate::config::CodecSettings;

    fn arm() -> Bone {
        let mut translation = Track::new(Interpolation::Linear);
        translation.push(0, [0.0, 0.0, 0.0]);
        translation.push(100, [0.0, 0.0, 5.0]);
        let mut bone = Bone {
            geoset_id: 0,
            ..Bone::default()
        };
        bone.object.name = "Arm".into();
        bone.object.object_id = 1;
        bone.object.parent_id = 0;
        bone.object.timelines.push(
            Timeline::from_track(AnimationTag::Translation, TimelineTrack::Vector3(translation)).unwrap(),
        );
        bone
    }

    #[test]
    fn test_binary_round_trip() {
        let bone = arm();
        let mut writer = BinaryWriter::new(Vec::new());
        bone.write_mdx(&mut writer).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), bone.byte_length());
        assert_eq!(&bytes[bytes.len() - 8..bytes.len() - 4], &0i32.to_le_bytes());
        assert_eq!(Bone::read_mdx(&mut BinaryReader::new(&bytes)).unwrap(), bone);
    }

    #[test]
    fn test_text_round_trip() {
        let bone = arm();
        let mut writer = TokenWriter::new(&CodecSettings::default());
        bone.write_mdl(&mut writer).unwrap();
        let text = writer.finish();
        assert!(text.starts_with("Bone \"Arm\" {\n\tObjectId 1,\n\tParent 0,\n\tGeosetId 0,\n\tGeosetAnimId None,\n"));

        let mut stream = TokenStream::new(&text);
        stream.expect("Bone").unwrap();
        assert_eq!(Bone::read_mdl(&mut stream).unwrap(), bone);
    }

    #[test]
    fn test_multiple_geosets() {
        let mut stream = TokenStream::new("\"Root\" { ObjectId 0, GeosetId Multiple, GeosetAnimId 3, }");
        let bone = Bone::read_mdl(&mut stream).unwrap();
        assert_eq!(bone.geoset_id, -1);
        assert_eq!(bone.geoset_animation_id, 3);
        assert_eq!(bone.object.flags, NODE_BONE);
    }

    #[test]
    fn test_unknown_keyword() {
        let mut stream = TokenStream::new("\"Root\" { Wobble 1, }");
        let err = Bone::read_mdl(&mut stream).unwrap_err();
        assert!(matches!(err, Error::UnknownToken { .. }));
    }
}
