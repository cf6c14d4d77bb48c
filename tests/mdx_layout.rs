//! Chunk-level behavior of the MDX reader and writer.

mod common;

use common::{header_bytes, push_chunk};
use mdlx::prelude::*;

/// One texture animation record with no timelines.
const EMPTY_TXAN_RECORD: [u8; 4] = 4u32.to_le_bytes();

#[test]
fn test_header_layout() {
    let bytes = header_bytes();
    assert_eq!(&bytes[0..4], b"MDLX");
    assert_eq!(&bytes[4..8], b"VERS");
    assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()), 4);
    assert_eq!(u32::from_le_bytes(bytes[12..16].try_into().unwrap()), 800);
    assert_eq!(&bytes[16..20], b"MODL");
    assert_eq!(u32::from_le_bytes(bytes[20..24].try_into().unwrap()), 372);
    assert_eq!(bytes.len(), 24 + 372);
}

#[test]
fn test_wrong_magic() {
    let mut bytes = header_bytes();
    bytes[..4].copy_from_slice(b"MDLQ");
    let err = Model::from_mdx(&bytes).unwrap_err();
    assert!(matches!(err, Error::WrongMagic(tag) if tag == Tag::new(b"MDLQ")));
}

#[test]
fn test_dynamic_chunk_exact_fit() {
    let mut bytes = header_bytes();
    let mut payload = Vec::new();
    payload.extend_from_slice(&EMPTY_TXAN_RECORD);
    payload.extend_from_slice(&EMPTY_TXAN_RECORD);
    push_chunk(&mut bytes, b"TXAN", &payload);

    let model = Model::from_mdx(&bytes).unwrap();
    assert_eq!(model.texture_animations.len(), 2);
    assert!(model.texture_animations.iter().all(|a| a.timelines.is_empty()));
    assert_eq!(model.to_mdx().unwrap(), bytes);
}

#[test]
fn test_dynamic_record_overruns_chunk() {
    let mut bytes = header_bytes();
    // The record claims 8 bytes but the chunk holds 4.
    push_chunk(&mut bytes, b"TXAN", &8u32.to_le_bytes());
    let err = Model::from_mdx(&bytes).unwrap_err();
    assert!(err.is_format_error());
}

#[test]
fn test_dynamic_chunk_with_trailing_bytes() {
    let mut bytes = header_bytes();
    let mut payload = EMPTY_TXAN_RECORD.to_vec();
    payload.extend_from_slice(&[0, 0]);
    push_chunk(&mut bytes, b"TXAN", &payload);
    assert!(Model::from_mdx(&bytes).unwrap_err().is_format_error());
}

#[test]
fn test_static_chunk_width() {
    let mut bytes = header_bytes();
    push_chunk(&mut bytes, b"GLBS", &[0; 10]);
    assert!(Model::from_mdx(&bytes).unwrap_err().is_format_error());

    let mut bytes = header_bytes();
    let mut payload = 100u32.to_le_bytes().to_vec();
    payload.extend_from_slice(&250u32.to_le_bytes());
    push_chunk(&mut bytes, b"GLBS", &payload);
    assert_eq!(Model::from_mdx(&bytes).unwrap().global_sequences, vec![100, 250]);
}

#[test]
fn test_unknown_chunks_kept_in_order() {
    let mut bytes = header_bytes();
    push_chunk(&mut bytes, b"FAFX", &[1, 2, 3, 4, 5]);
    push_chunk(&mut bytes, b"BPOS", &[]);

    let model = Model::from_mdx(&bytes).unwrap();
    assert_eq!(
        model.unknown_chunks,
        vec![
            UnknownChunk::new(Tag::new(b"FAFX"), vec![1, 2, 3, 4, 5]),
            UnknownChunk::new(Tag::new(b"BPOS"), Vec::new()),
        ]
    );
    assert_eq!(model.to_mdx().unwrap(), bytes);
}

#[test]
fn test_unknown_chunks_written_last() {
    let mut bytes = header_bytes();
    push_chunk(&mut bytes, b"FAFX", &[9]);
    let mut payload = Vec::new();
    payload.extend_from_slice(&0f32.to_le_bytes());
    payload.extend_from_slice(&0f32.to_le_bytes());
    payload.extend_from_slice(&1f32.to_le_bytes());
    push_chunk(&mut bytes, b"PIVT", &payload);

    let model = Model::from_mdx(&bytes).unwrap();
    assert_eq!(model.pivot_points, vec![Vec3::Z]);
    let written = model.to_mdx().unwrap();
    assert_eq!(written.len(), bytes.len());
    assert_eq!(&written[written.len() - 9..written.len() - 5], b"FAFX");
}

#[test]
fn test_truncated_file() {
    let bytes = common::rich_model().to_mdx().unwrap();
    for cut in [3, 10, 100, bytes.len() - 1] {
        let err = Model::from_mdx(&bytes[..cut]).unwrap_err();
        assert!(err.is_format_error(), "cut at {}: {}", cut, err);
    }
}

#[test]
fn test_collision_shape_without_type() {
    let mut model = Model::new();
    model.collision_shapes.push(CollisionShape::default());
    assert!(matches!(model.to_mdx().unwrap_err(), Error::InvalidState(_)));
    assert!(matches!(model.to_mdl().unwrap_err(), Error::InvalidState(_)));
}

#[test]
fn test_inconsistent_track() {
    let mut track = Track::new(Interpolation::Linear);
    track.push(0, 1.0f32);
    track.values.push(2.0);
    let mut layer = Layer::default();
    layer.timelines.push(Timeline::from_track(AnimationTag::LayerAlpha, TimelineTrack::Float(track)).unwrap());
    let mut model = Model::new();
    model.materials.push(Material {
        layers: vec![layer],
        ..Material::default()
    });
    assert!(matches!(model.to_mdx().unwrap_err(), Error::InvalidState(_)));
}

#[test]
fn test_unknown_animation_tag() {
    let mut bytes = header_bytes();
    let mut record = Vec::new();
    record.extend_from_slice(&(4u32 + 16).to_le_bytes());
    record.extend_from_slice(b"KXYZ");
    record.extend_from_slice(&0u32.to_le_bytes());
    record.extend_from_slice(&0u32.to_le_bytes());
    record.extend_from_slice(&(-1i32).to_le_bytes());
    push_chunk(&mut bytes, b"TXAN", &record);
    let err = Model::from_mdx(&bytes).unwrap_err();
    assert!(matches!(err, Error::UnknownAnimation(tag) if tag == Tag::new(b"KXYZ")));
}

#[test]
fn test_code_page_model_name_kept() {
    let mut bytes = header_bytes();
    // MODL payload starts at 24 with the 80-byte name.
    bytes[24..26].copy_from_slice(&[0xC7, 0xD1]);

    let model = Model::from_mdx(&bytes).unwrap();
    assert_eq!(model.name.as_bytes(), &[0xC7, 0xD1]);
    assert_eq!(model.to_mdx().unwrap(), bytes);
}

#[test]
fn test_code_page_node_name_kept() {
    let mut model = common::rich_model();
    model.bones[0].object.name = ByteString::from(vec![0xCA, 0xEE, 0xF1, 0xF2, 0xFC]);
    let bytes = model.to_mdx().unwrap();

    let reread = Model::from_mdx(&bytes).unwrap();
    assert_eq!(reread.bones[0].object.name, model.bones[0].object.name);
    assert_eq!(reread.to_mdx().unwrap(), bytes);

    // Text output can only carry the lossy form.
    let text = reread.to_mdl().unwrap();
    assert!(text.contains("Bone \"\u{fffd}\u{fffd}\u{fffd}\u{fffd}\u{fffd}\" {"));
}
