//! Chunk-level MDX load and save.

use std::io::Write;

use super::*;
use crate::model::{DynamicRecord, Extent, Model, StaticRecord, UnknownChunk};
use crate::util::{Error, Result, Tag};

/// Parse a complete MDX file image.
pub fn read_model(data: &[u8]) -> Result<Model> {
    let mut reader = BinaryReader::new(data);
    let magic = reader.read_tag()?;
    if magic != MDLX_MAGIC {
        return Err(Error::WrongMagic(magic));
    }

    let mut model = Model::default();
    while !reader.is_empty() {
        let tag = reader.read_tag()?;
        let size = reader.read_len()?;
        let offset = reader.offset();
        let mut chunk = reader.take(size)?;
        tracing::debug!(%tag, size, offset, "chunk");

        match tag {
            VERS => model.version = chunk.read_u32()?,
            MODL => {
                model.name = chunk.read_fixed_string(NAME_LENGTH)?;
                model.animation_file = chunk.read_fixed_string(FILE_NAME_LENGTH)?;
                model.extent = Extent::read_mdx(&mut chunk)?;
                model.blend_time = chunk.read_u32()?;
            }
            SEQS => model.sequences.extend(read_static_chunk(&mut chunk, tag)?),
            GLBS => {
                let count = record_count(&chunk, tag, GLOBAL_SEQUENCE_SIZE)?;
                model.global_sequences.extend(chunk.read_u32_vec(count)?);
            }
            MTLS => model.materials.extend(read_dynamic_chunk(&mut chunk, tag)?),
            TEXS => model.textures.extend(read_static_chunk(&mut chunk, tag)?),
            TXAN => model.texture_animations.extend(read_dynamic_chunk(&mut chunk, tag)?),
            GEOS => model.geosets.extend(read_dynamic_chunk(&mut chunk, tag)?),
            GEOA => model.geoset_animations.extend(read_dynamic_chunk(&mut chunk, tag)?),
            BONE => model.bones.extend(read_dynamic_chunk(&mut chunk, tag)?),
            LITE => model.lights.extend(read_dynamic_chunk(&mut chunk, tag)?),
            HELP => model.helpers.extend(read_dynamic_chunk(&mut chunk, tag)?),
            ATCH => model.attachments.extend(read_dynamic_chunk(&mut chunk, tag)?),
            PIVT => {
                let count = record_count(&chunk, tag, PIVOT_POINT_SIZE)?;
                model.pivot_points.extend(chunk.read_vec3_vec(count)?);
            }
            PREM => model.particle_emitters.extend(read_dynamic_chunk(&mut chunk, tag)?),
            PRE2 => model.particle_emitters2.extend(read_dynamic_chunk(&mut chunk, tag)?),
            RIBB => model.ribbon_emitters.extend(read_dynamic_chunk(&mut chunk, tag)?),
            CAMS => model.cameras.extend(read_dynamic_chunk(&mut chunk, tag)?),
            EVTS => model.event_objects.extend(read_dynamic_chunk(&mut chunk, tag)?),
            CLID => model.collision_shapes.extend(read_dynamic_chunk(&mut chunk, tag)?),
            _ => {
                tracing::warn!(%tag, size, offset, "keeping unknown chunk as raw bytes");
                let data = chunk.read_bytes(size)?.to_vec();
                model.unknown_chunks.push(UnknownChunk::new(tag, data));
            }
        }

        if !chunk.is_empty() {
            return Err(Error::invalid(format!(
                "{} chunk at offset {} has {} trailing bytes",
                tag,
                offset,
                chunk.remaining()
            )));
        }
    }

    Ok(model)
}

/// Records in a chunk of fixed-width records; the size must divide evenly.
fn record_count(chunk: &BinaryReader<'_>, tag: Tag, width: usize) -> Result<usize> {
    let size = chunk.remaining();
    if size % width != 0 {
        return Err(Error::invalid(format!(
            "{} chunk size {} is not a multiple of {}",
            tag, size, width
        )));
    }
    Ok(size / width)
}

fn read_static_chunk<T: StaticRecord>(chunk: &mut BinaryReader<'_>, tag: Tag) -> Result<Vec<T>> {
    let count = record_count(chunk, tag, T::BYTE_LENGTH)?;
    (0..count).map(|_| T::read_mdx(chunk)).collect()
}

/// Read self-sized records until the chunk is used up.
///
/// Each record must consume exactly the length it reports, and never zero.
fn read_dynamic_chunk<T: DynamicRecord>(chunk: &mut BinaryReader<'_>, tag: Tag) -> Result<Vec<T>> {
    let mut records = Vec::new();
    while !chunk.is_empty() {
        let start = chunk.position();
        let offset = chunk.offset();
        let record = T::read_mdx(chunk)?;
        let consumed = chunk.position() - start;
        let reported = record.byte_length();
        if consumed == 0 || reported == 0 {
            return Err(Error::invalid(format!("empty {} record at offset {}", tag, offset)));
        }
        if consumed != reported {
            return Err(Error::invalid(format!(
                "{} record at offset {} read {} bytes but reports {}",
                tag, offset, consumed, reported
            )));
        }
        tracing::trace!(%tag, offset, bytes = consumed, "record");
        records.push(record);
    }
    Ok(records)
}

fn write_chunk_header<W: Write>(writer: &mut BinaryWriter<W>, tag: Tag, size: usize) -> Result<()> {
    tracing::debug!(%tag, size, "writing chunk");
    writer.write_tag(tag)?;
    writer.write_len(size)
}

fn write_static_chunk<T: StaticRecord, W: Write>(
    writer: &mut BinaryWriter<W>,
    tag: Tag,
    records: &[T],
) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    write_chunk_header(writer, tag, records.len() * T::BYTE_LENGTH)?;
    for record in records {
        record.write_mdx(writer)?;
    }
    Ok(())
}

fn write_dynamic_chunk<T: DynamicRecord, W: Write>(
    writer: &mut BinaryWriter<W>,
    tag: Tag,
    records: &[T],
) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    let size = records.iter().map(DynamicRecord::byte_length).sum();
    write_chunk_header(writer, tag, size)?;
    for record in records {
        let start = writer.pos();
        record.write_mdx(writer)?;
        let written = (writer.pos() - start) as usize;
        if written != record.byte_length() {
            return Err(Error::invalid_state(format!(
                "{} record wrote {} bytes but reports {}",
                tag,
                written,
                record.byte_length()
            )));
        }
    }
    Ok(())
}

/// Encode a model as a complete MDX file image.
///
/// Chunks are written in canonical order, empty lists are left out and
/// unknown chunks follow at the end in the order they were read.
pub fn write_model(model: &Model) -> Result<Vec<u8>> {
    let mut writer = BinaryWriter::new(Vec::new());
    writer.write_tag(MDLX_MAGIC)?;

    write_chunk_header(&mut writer, VERS, VERSION_CHUNK_SIZE)?;
    writer.write_u32(model.version)?;

    write_chunk_header(&mut writer, MODL, MODEL_CHUNK_SIZE)?;
    writer.write_fixed_string(&model.name, NAME_LENGTH)?;
    writer.write_fixed_string(&model.animation_file, FILE_NAME_LENGTH)?;
    model.extent.write_mdx(&mut writer)?;
    writer.write_u32(model.blend_time)?;

    write_static_chunk(&mut writer, SEQS, &model.sequences)?;
    if !model.global_sequences.is_empty() {
        write_chunk_header(&mut writer, GLBS, model.global_sequences.len() * GLOBAL_SEQUENCE_SIZE)?;
        writer.write_u32_slice(&model.global_sequences)?;
    }
    write_dynamic_chunk(&mut writer, MTLS, &model.materials)?;
    write_static_chunk(&mut writer, TEXS, &model.textures)?;
    write_dynamic_chunk(&mut writer, TXAN, &model.texture_animations)?;
    write_dynamic_chunk(&mut writer, GEOS, &model.geosets)?;
    write_dynamic_chunk(&mut writer, GEOA, &model.geoset_animations)?;
    write_dynamic_chunk(&mut writer, BONE, &model.bones)?;
    write_dynamic_chunk(&mut writer, LITE, &model.lights)?;
    write_dynamic_chunk(&mut writer, HELP, &model.helpers)?;
    write_dynamic_chunk(&mut writer, ATCH, &model.attachments)?;
    if !model.pivot_points.is_empty() {
        write_chunk_header(&mut writer, PIVT, model.pivot_points.len() * PIVOT_POINT_SIZE)?;
        for &point in &model.pivot_points {
            writer.write_vec3(point)?;
        }
    }
    write_dynamic_chunk(&mut writer, PREM, &model.particle_emitters)?;
    write_dynamic_chunk(&mut writer, PRE2, &model.particle_emitters2)?;
    write_dynamic_chunk(&mut writer, RIBB, &model.ribbon_emitters)?;
    write_dynamic_chunk(&mut writer, CAMS, &model.cameras)?;
    write_dynamic_chunk(&mut writer, EVTS, &model.event_objects)?;
    write_dynamic_chunk(&mut writer, CLID, &model.collision_shapes)?;

    for chunk in &model.unknown_chunks {
        tracing::debug!(tag = %chunk.tag, size = chunk.data.len(), "writing unknown chunk");
        chunk.write_mdx(&mut writer)?;
    }

    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bone, Sequence};

    fn header_only() -> Vec<u8> {
        write_model(&Model::default()).unwrap()
    }

    #[test]
    fn test_minimal_model() {
        let bytes = header_only();
        assert_eq!(bytes.len(), 4 + 8 + 4 + 8 + 372);
        assert_eq!(&bytes[..8], b"MDLXVERS");
        let model = read_model(&bytes).unwrap();
        assert_eq!(model, Model::default());
    }

    #[test]
    fn test_wrong_magic() {
        let mut bytes = header_only();
        bytes[..4].copy_from_slice(b"MDLY");
        let err = read_model(&bytes).unwrap_err();
        assert!(matches!(err, Error::WrongMagic(tag) if tag == Tag::new(b"MDLY")));
    }

    #[test]
    fn test_empty_lists_omitted() {
        let bytes = header_only();
        let has = |tag: &[u8; 4]| bytes.windows(4).any(|w| w == tag);
        assert!(!has(b"SEQS"));
        assert!(!has(b"BONE"));
        assert!(!has(b"PIVT"));
    }

    #[test]
    fn test_static_chunk_remainder() {
        let mut model = Model::default();
        model.sequences.push(Sequence::default());
        let mut bytes = write_model(&model).unwrap();
        // Grow the SEQS chunk by one byte.
        let at = bytes.windows(4).position(|w| w == b"SEQS").unwrap();
        bytes[at + 4..at + 8].copy_from_slice(&133u32.to_le_bytes());
        bytes.push(0);
        let err = read_model(&bytes).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_dynamic_chunk_mismatch() {
        let mut model = Model::default();
        model.bones.push(Bone::default());
        let mut bytes = write_model(&model).unwrap();
        // Declare the chunk four bytes longer than the bone it holds.
        let at = bytes.windows(4).position(|w| w == b"BONE").unwrap();
        bytes[at + 4..at + 8].copy_from_slice(&108u32.to_le_bytes());
        bytes.extend_from_slice(&[0; 4]);
        let err = read_model(&bytes).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_unknown_chunk_kept() {
        let mut bytes = header_only();
        bytes.extend_from_slice(b"ZZZZ");
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&[7, 8, 9]);
        let model = read_model(&bytes).unwrap();
        assert_eq!(model.unknown_chunks, vec![UnknownChunk::new(Tag::new(b"ZZZZ"), vec![7, 8, 9])]);
        assert_eq!(write_model(&model).unwrap(), bytes);
    }

    #[test]
    fn test_truncated_chunk() {
        let mut bytes = header_only();
        bytes.truncate(bytes.len() - 10);
        assert!(matches!(read_model(&bytes).unwrap_err(), Error::UnexpectedEof(_)));
    }
}
