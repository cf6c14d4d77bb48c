//! Per-geoset alpha and color animation.

use std::io::Write;

use super::{find_timeline, write_animated_color, write_animated_float, Block, DynamicRecord};
use crate::animation::{read_timelines, timelines_byte_length, AnimationTag, Timeline};
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter};
use crate::util::{Error, Result};

pub const GEOSET_ANIMATION_DROP_SHADOW: u32 = 0x1;
/// The color fields are meaningful.
pub const GEOSET_ANIMATION_USE_COLOR: u32 = 0x2;

#[derive(Debug, Clone, PartialEq)]
pub struct GeosetAnimation {
    pub alpha: f32,
    pub flags: u32,
    /// Red, green, blue
    pub color: [f32; 3],
    pub geoset_id: i32,
    pub timelines: Vec<Timeline>,
}

impl Default for GeosetAnimation {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            flags: 0,
            color: [1.0; 3],
            geoset_id: -1,
            timelines: Vec::new(),
        }
    }
}

impl Block for GeosetAnimation {
    const KEYWORD: &'static str = "GeosetAnim";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let size = reader.read_len()?;
        if size < 28 {
            return Err(Error::invalid(format!("geoset animation size {} is below its header", size)));
        }
        let mut body = reader.take(size - 4)?;
        Ok(Self {
            alpha: body.read_f32()?,
            flags: body.read_u32()?,
            color: body.read_f32_array::<3>()?,
            geoset_id: body.read_i32()?,
            timelines: read_timelines(&mut body)?,
        })
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_len(self.byte_length())?;
        writer.write_f32(self.alpha)?;
        writer.write_u32(self.flags)?;
        writer.write_f32_slice(&self.color)?;
        writer.write_i32(self.geoset_id)?;
        for timeline in &self.timelines {
            timeline.write_mdx(writer)?;
        }
        Ok(())
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut animation = Self::default();
        stream.enter_block()?;
        while let Some(token) = stream.next_in_block()? {
            match token {
                "DropShadow" => animation.flags |= GEOSET_ANIMATION_DROP_SHADOW,
                "static" => match stream.read_token()? {
                    "Alpha" => animation.alpha = stream.read_float()?,
                    "Color" => {
                        animation.color = stream.read_color()?;
                        animation.flags |= GEOSET_ANIMATION_USE_COLOR;
                    }
                    other => return Err(Error::unknown_token("GeosetAnim static", other)),
                },
                "Alpha" => animation
                    .timelines
                    .push(Timeline::read_mdl(stream, AnimationTag::GeosetAlpha)?),
                "Color" => {
                    animation
                        .timelines
                        .push(Timeline::read_mdl(stream, AnimationTag::GeosetColor)?);
                    animation.flags |= GEOSET_ANIMATION_USE_COLOR;
                }
                "GeosetId" => animation.geoset_id = stream.read_int()?,
                _ => return Err(Error::unknown_token(Self::KEYWORD, token)),
            }
        }
        Ok(animation)
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        writer.start_block(Self::KEYWORD);
        if self.flags & GEOSET_ANIMATION_DROP_SHADOW != 0 {
            writer.write_flag("DropShadow");
        }
        if self.alpha != 1.0 || find_timeline(&self.timelines, AnimationTag::GeosetAlpha).is_some() {
            write_animated_float(writer, &self.timelines, AnimationTag::GeosetAlpha, self.alpha)?;
        }
        if self.flags & GEOSET_ANIMATION_USE_COLOR != 0 {
            write_animated_color(writer, &self.timelines, AnimationTag::GeosetColor, self.color)?;
        }
        writer.write_attrib("GeosetId", self.geoset_id);
        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for GeosetAnimation {
    fn byte_length(&self) -> usize {
        28 + timelines_byte_length(&self.timelines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Interpolation, Track, TimelineTrack};
    use crate::config::CodecSettings;

    fn fading() -> GeosetAnimation {
        let mut alpha = Track::new(Interpolation::DontInterp);
        alpha.push(0, 1.0f32);
        alpha.push(200, 0.0);
        GeosetAnimation {
            alpha: 1.0,
            flags: GEOSET_ANIMATION_USE_COLOR,
            color: [1.0, 0.5, 0.25],
            geoset_id: 2,
            timelines: vec![
                Timeline::from_track(AnimationTag::GeosetAlpha, TimelineTrack::Float(alpha)).unwrap(),
            ],
        }
    }

    #[test]
    fn test_binary_round_trip() {
        let animation = fading();
        let mut writer = BinaryWriter::new(Vec::new());
        animation.write_mdx(&mut writer).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), animation.byte_length());
        assert_eq!(GeosetAnimation::read_mdx(&mut BinaryReader::new(&bytes)).unwrap(), animation);
    }

    #[test]
    fn test_text_color_is_bgr() {
        let mut writer = TokenWriter::new(&CodecSettings::default());
        fading().write_mdl(&mut writer).unwrap();
        let text = writer.finish();
        assert!(text.contains("\tstatic Color { 0.25, 0.5, 1 },\n"));
        assert!(text.contains("\tGeosetId 2,\n"));

        let mut stream = TokenStream::new(&text);
        stream.expect("GeosetAnim").unwrap();
        assert_eq!(GeosetAnimation::read_mdl(&mut stream).unwrap(), fading());
    }

    #[test]
    fn test_color_skipped_without_flag() {
        let animation = GeosetAnimation {
            color: [0.0; 3],
            ..GeosetAnimation::default()
        };
        let mut writer = TokenWriter::new(&CodecSettings::default());
        animation.write_mdl(&mut writer).unwrap();
        assert_eq!(writer.finish(), "GeosetAnim {\n\tGeosetId -1,\n}\n");
    }
}
