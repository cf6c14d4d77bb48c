//! Keyframed animation tracks.
//!
//! Binary layout of one timeline:
//!
//! ```text
//! +---------------------+
//! | tag                 |  4 bytes, e.g. "KGTR"
//! | keyframe count      |  u32
//! | interpolation       |  u32 index
//! | global sequence id  |  i32, -1 for none
//! +---------------------+
//! | frame               |  i32        \
//! | value               |  WIDTH * 4   } per keyframe
//! | in / out tangent    |  2 * WIDTH*4 / (bezier and hermite only)
//! +---------------------+
//! ```

use std::io::Write;

use super::{AnimationTag, Interpolation, KeyframeValue, ValueShape};
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter};
use crate::util::{Error, Result};

/// Timeline header size: tag, count, interpolation, global sequence id.
pub const TIMELINE_HEADER_SIZE: usize = 16;

/// Per-keyframe tangents of a bezier or hermite track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tangents<T> {
    pub in_tans: Vec<T>,
    pub out_tans: Vec<T>,
}

/// Keyframes of one value shape.
///
/// `frames` and `values` are parallel. `tangents` is present exactly when
/// the interpolation is tangential, with one in and one out tangent per
/// keyframe. Writers check this and fail with [`Error::InvalidState`].
#[derive(Debug, Clone, PartialEq)]
pub struct Track<T> {
    pub interpolation: Interpolation,
    pub global_sequence_id: i32,
    pub frames: Vec<i32>,
    pub values: Vec<T>,
    pub tangents: Option<Tangents<T>>,
}

impl<T> Default for Track<T> {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::DontInterp,
            global_sequence_id: -1,
            frames: Vec::new(),
            values: Vec::new(),
            tangents: None,
        }
    }
}

impl<T: KeyframeValue> Track<T> {
    pub fn new(interpolation: Interpolation) -> Self {
        Self {
            interpolation,
            tangents: interpolation.is_tangential().then(Tangents::default),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Append a keyframe to a non-tangential track.
    pub fn push(&mut self, frame: i32, value: T) {
        self.frames.push(frame);
        self.values.push(value);
    }

    /// Append a keyframe with tangents.
    pub fn push_tangential(&mut self, frame: i32, value: T, in_tan: T, out_tan: T) {
        self.push(frame, value);
        let tangents = self.tangents.get_or_insert_with(Tangents::default);
        tangents.in_tans.push(in_tan);
        tangents.out_tans.push(out_tan);
    }

    /// Check the parallel-array invariant.
    pub fn validate(&self) -> Result<()> {
        let n = self.frames.len();
        if self.values.len() != n {
            return Err(Error::invalid_state(format!(
                "{} frames but {} values",
                n,
                self.values.len()
            )));
        }
        match (&self.tangents, self.interpolation.is_tangential()) {
            (Some(t), true) if t.in_tans.len() == n && t.out_tans.len() == n => Ok(()),
            (None, false) => Ok(()),
            (Some(_), true) => Err(Error::invalid_state(format!(
                "{} keyframes need {} in and out tangents",
                self.interpolation.keyword(),
                n
            ))),
            (None, true) => Err(Error::invalid_state(format!(
                "{} track without tangents",
                self.interpolation.keyword()
            ))),
            (Some(_), false) => Err(Error::invalid_state(format!(
                "{} track carries tangents",
                self.interpolation.keyword()
            ))),
        }
    }

    /// Encoded size including the 16-byte header.
    pub fn byte_length(&self) -> usize {
        let per_value = T::WIDTH * 4;
        let values_per_key = if self.interpolation.is_tangential() { 3 } else { 1 };
        TIMELINE_HEADER_SIZE + self.len() * (4 + values_per_key * per_value)
    }

    /// Read the body that follows the tag.
    pub fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let count = reader.read_len()?;
        let interpolation = Interpolation::from_index(reader.read_u32()?)?;
        let global_sequence_id = reader.read_i32()?;

        let key_size = (4 + T::WIDTH * 4) * if interpolation.is_tangential() { 3 } else { 1 };
        if count.checked_mul(key_size).map_or(true, |len| len > reader.remaining()) {
            return Err(Error::UnexpectedEof(reader.offset() + reader.remaining()));
        }

        let mut track = Self {
            global_sequence_id,
            frames: Vec::with_capacity(count),
            values: Vec::with_capacity(count),
            ..Self::new(interpolation)
        };
        for _ in 0..count {
            let frame = reader.read_i32()?;
            let value = T::read_mdx(reader)?;
            if interpolation.is_tangential() {
                let in_tan = T::read_mdx(reader)?;
                let out_tan = T::read_mdx(reader)?;
                track.push_tangential(frame, value, in_tan, out_tan);
            } else {
                track.push(frame, value);
            }
        }
        Ok(track)
    }

    /// Write the body that follows the tag.
    pub fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        self.validate()?;
        writer.write_len(self.len())?;
        writer.write_u32(self.interpolation.index())?;
        writer.write_i32(self.global_sequence_id)?;
        for (i, (&frame, value)) in self.frames.iter().zip(&self.values).enumerate() {
            writer.write_i32(frame)?;
            value.write_mdx(writer)?;
            if let Some(tangents) = &self.tangents {
                tangents.in_tans[i].write_mdx(writer)?;
                tangents.out_tans[i].write_mdx(writer)?;
            }
        }
        Ok(())
    }

    /// Read a text track positioned after its keyword.
    pub fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let count = stream.read_u32()? as usize;
        stream.enter_block()?;

        let keyword = stream.read_token()?;
        let interpolation = Interpolation::from_keyword(keyword).unwrap_or_else(|| {
            let line = stream.token_line();
            tracing::warn!(keyword, line, "unknown interpolation, using DontInterp");
            Interpolation::DontInterp
        });

        let mut track = Self::new(interpolation);
        if stream.peek()? == Some("GlobalSeqId") {
            stream.read()?;
            track.global_sequence_id = stream.read_int()?;
        }

        for _ in 0..count {
            let frame = stream.read_int()?;
            let value = T::read_mdl(stream)?;
            if interpolation.is_tangential() {
                stream.expect("InTan")?;
                let in_tan = T::read_mdl(stream)?;
                stream.expect("OutTan")?;
                let out_tan = T::read_mdl(stream)?;
                track.push_tangential(frame, value, in_tan, out_tan);
            } else {
                track.push(frame, value);
            }
        }

        stream.expect("}")?;
        Ok(track)
    }

    pub fn write_mdl(&self, writer: &mut TokenWriter, keyword: &str) -> Result<()> {
        self.validate()?;
        writer.start_block_count(keyword, self.len());
        writer.write_flag(self.interpolation.keyword());
        if self.global_sequence_id != -1 {
            writer.write_attrib("GlobalSeqId", self.global_sequence_id);
        }
        for (i, (frame, value)) in self.frames.iter().zip(&self.values).enumerate() {
            value.write_mdl(writer, &format!("{}:", frame));
            if let Some(tangents) = &self.tangents {
                writer.indent();
                tangents.in_tans[i].write_mdl(writer, "InTan");
                tangents.out_tans[i].write_mdl(writer, "OutTan");
                writer.unindent();
            }
        }
        writer.end_block();
        Ok(())
    }
}

/// A track of one of the four value shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineTrack {
    Float(Track<f32>),
    Vector3(Track<[f32; 3]>),
    Vector4(Track<[f32; 4]>),
    UInt32(Track<u32>),
}

macro_rules! each_track {
    ($track:expr, $t:ident => $body:expr) => {
        match $track {
            TimelineTrack::Float($t) => $body,
            TimelineTrack::Vector3($t) => $body,
            TimelineTrack::Vector4($t) => $body,
            TimelineTrack::UInt32($t) => $body,
        }
    };
}

/// An animated property: a registry tag plus a track of the matching shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub tag: AnimationTag,
    pub track: TimelineTrack,
}

impl Timeline {
    /// Empty timeline for `tag` with the shape the registry assigns to it.
    pub fn new(tag: AnimationTag, interpolation: Interpolation) -> Self {
        let track = match tag.shape() {
            ValueShape::Float => TimelineTrack::Float(Track::new(interpolation)),
            ValueShape::Vector3 => TimelineTrack::Vector3(Track::new(interpolation)),
            ValueShape::Vector4 => TimelineTrack::Vector4(Track::new(interpolation)),
            ValueShape::UInt32 => TimelineTrack::UInt32(Track::new(interpolation)),
        };
        Self { tag, track }
    }

    /// Build a timeline from a typed track, checking its shape against the tag.
    pub fn from_track(tag: AnimationTag, track: TimelineTrack) -> Result<Self> {
        let shape = match &track {
            TimelineTrack::Float(_) => ValueShape::Float,
            TimelineTrack::Vector3(_) => ValueShape::Vector3,
            TimelineTrack::Vector4(_) => ValueShape::Vector4,
            TimelineTrack::UInt32(_) => ValueShape::UInt32,
        };
        if shape != tag.shape() {
            return Err(Error::invalid_state(format!(
                "{} holds {:?} values, not {:?}",
                tag.tag(),
                tag.shape(),
                shape
            )));
        }
        Ok(Self { tag, track })
    }

    pub fn keyword(&self) -> &'static str {
        self.tag.keyword()
    }

    pub fn interpolation(&self) -> Interpolation {
        each_track!(&self.track, t => t.interpolation)
    }

    pub fn global_sequence_id(&self) -> i32 {
        each_track!(&self.track, t => t.global_sequence_id)
    }

    pub fn len(&self) -> usize {
        each_track!(&self.track, t => t.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> Result<()> {
        each_track!(&self.track, t => t.validate())
    }

    /// Encoded size including the tag.
    pub fn byte_length(&self) -> usize {
        each_track!(&self.track, t => t.byte_length())
    }

    /// Read a tagged timeline; tags missing from the registry are rejected.
    pub fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let raw = reader.read_tag()?;
        let tag = AnimationTag::from_tag(raw).ok_or(Error::UnknownAnimation(raw))?;
        let track = match tag.shape() {
            ValueShape::Float => TimelineTrack::Float(Track::read_mdx(reader)?),
            ValueShape::Vector3 => TimelineTrack::Vector3(Track::read_mdx(reader)?),
            ValueShape::Vector4 => TimelineTrack::Vector4(Track::read_mdx(reader)?),
            ValueShape::UInt32 => TimelineTrack::UInt32(Track::read_mdx(reader)?),
        };
        tracing::trace!(tag = %raw, keys = track_len(&track), "timeline");
        Ok(Self { tag, track })
    }

    pub fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_tag(self.tag.tag())?;
        each_track!(&self.track, t => t.write_mdx(writer))
    }

    /// Read a text timeline for `tag`, positioned after its keyword.
    pub fn read_mdl(stream: &mut TokenStream<'_>, tag: AnimationTag) -> Result<Self> {
        let track = match tag.shape() {
            ValueShape::Float => TimelineTrack::Float(Track::read_mdl(stream)?),
            ValueShape::Vector3 => TimelineTrack::Vector3(Track::read_mdl(stream)?),
            ValueShape::Vector4 => TimelineTrack::Vector4(Track::read_mdl(stream)?),
            ValueShape::UInt32 => TimelineTrack::UInt32(Track::read_mdl(stream)?),
        };
        Ok(Self { tag, track })
    }

    /// Write under the registry keyword of the tag.
    pub fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        let keyword = self.keyword();
        each_track!(&self.track, t => t.write_mdl(writer, keyword))
    }
}

fn track_len(track: &TimelineTrack) -> usize {
    each_track!(track, t => t.len())
}

/// Read timelines until `reader` is exhausted.
///
/// Callers hand in a reader bounded to the timeline area, so a timeline
/// running past the end of its record fails instead of spilling into the next.
pub fn read_timelines(reader: &mut BinaryReader<'_>) -> Result<Vec<Timeline>> {
    let mut timelines = Vec::new();
    while !reader.is_empty() {
        timelines.push(Timeline::read_mdx(reader)?);
    }
    Ok(timelines)
}

/// Total encoded size of `timelines`.
pub fn timelines_byte_length<'a>(timelines: impl IntoIterator<Item = &'a Timeline>) -> usize {
    timelines.into_iter().map(Timeline::byte_length).sum()
}
