//! Shared test fixtures.
#![allow(dead_code)]

use mdlx::prelude::*;

pub fn vector_track(interpolation: Interpolation, keys: &[(i32, [f32; 3])]) -> TimelineTrack {
    let mut track = Track::new(interpolation);
    for &(frame, value) in keys {
        track.push(frame, value);
    }
    TimelineTrack::Vector3(track)
}

pub fn float_track(interpolation: Interpolation, keys: &[(i32, f32)]) -> TimelineTrack {
    let mut track = Track::new(interpolation);
    for &(frame, value) in keys {
        track.push(frame, value);
    }
    TimelineTrack::Float(track)
}

fn timeline(tag: AnimationTag, track: TimelineTrack) -> Timeline {
    Timeline::from_track(tag, track).unwrap()
}

fn node(name: &str, object_id: i32, parent_id: i32, flags: u32) -> GenericObject {
    GenericObject {
        name: name.into(),
        object_id,
        parent_id,
        ..GenericObject::new(flags)
    }
}

/// A model with at least one record of every kind.
///
/// Node timelines list translation, rotation and scaling first, which is the
/// order they come back in from MDX.
pub fn rich_model() -> Model {
    let mut model = Model::new();
    model.name = "Footman".into();
    model.blend_time = 150;
    model.extent = Extent {
        bounds_radius: 50.0,
        min: Vec3::new(-20.0, -20.0, 0.0),
        max: Vec3::new(20.0, 20.0, 80.0),
    };

    model.sequences.push(Sequence {
        name: "Stand".into(),
        interval: [0, 1000],
        rarity: 0.0,
        extent: model.extent,
        ..Sequence::default()
    });
    model.sequences.push(Sequence {
        name: "Death".into(),
        interval: [1000, 2500],
        flags: SEQUENCE_NON_LOOPING,
        move_speed: 0.0,
        ..Sequence::default()
    });
    model.global_sequences = vec![1000, 3000];

    model.textures.push(Texture {
        path: "Textures\\Footman.blp".into(),
        ..Texture::default()
    });
    model.textures.push(Texture {
        replaceable_id: 1,
        flags: TEXTURE_WRAP_WIDTH | TEXTURE_WRAP_HEIGHT,
        ..Texture::default()
    });

    let mut layer = Layer {
        filter_mode: FilterMode::Blend,
        flags: LAYER_UNSHADED | LAYER_TWO_SIDED,
        texture_id: 0,
        ..Layer::default()
    };
    let mut alpha = Track::new(Interpolation::Hermite);
    alpha.push_tangential(0, 1.0f32, 0.0, 0.0);
    alpha.push_tangential(500, 0.5, 0.25, 0.75);
    layer.timelines.push(timeline(AnimationTag::LayerAlpha, TimelineTrack::Float(alpha)));
    model.materials.push(Material {
        priority_plane: 1,
        flags: MATERIAL_TWO_SIDED,
        layers: vec![layer, Layer::default()],
    });

    model.texture_animations.push(TextureAnimation {
        timelines: vec![timeline(
            AnimationTag::TextureTranslation,
            vector_track(Interpolation::Linear, &[(0, [0.0, 0.0, 0.0]), (1000, [1.0, 0.0, 0.0])]),
        )],
    });

    model.geosets.push(Geoset {
        vertices: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 10.0, 5.0),
        ],
        normals: vec![Vec3::Z; 3],
        face_types: vec![FACE_TYPE_TRIANGLES],
        face_groups: vec![3],
        faces: vec![0, 1, 2],
        vertex_groups: vec![0, 0, 0],
        matrix_group_sizes: vec![1],
        matrix_indices: vec![0],
        material_id: 0,
        selection_group: 0,
        selection_flags: 0,
        extent: model.extent,
        sequence_extents: vec![model.extent, model.extent],
        uv_sets: vec![vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]],
    });

    model.geoset_animations.push(GeosetAnimation {
        flags: GEOSET_ANIMATION_USE_COLOR,
        color: [1.0, 0.5, 0.25],
        geoset_id: 0,
        timelines: vec![timeline(
            AnimationTag::GeosetAlpha,
            float_track(Interpolation::DontInterp, &[(1000, 1.0), (2000, 0.0)]),
        )],
        ..GeosetAnimation::default()
    });

    let mut root = node("Root", 0, -1, NODE_BONE);
    root.timelines.push(timeline(
        AnimationTag::Translation,
        vector_track(Interpolation::Linear, &[(0, [0.0, 0.0, 0.0]), (500, [0.0, 0.0, 10.0])]),
    ));
    let mut rotation = Track::new(Interpolation::Linear);
    rotation.push(0, [0.0, 0.0, 0.0, 1.0f32]);
    rotation.global_sequence_id = 0;
    root.timelines.push(timeline(AnimationTag::Rotation, TimelineTrack::Vector4(rotation)));
    model.bones.push(Bone {
        object: root,
        geoset_id: 0,
        geoset_animation_id: -1,
    });

    let mut light = Light {
        object: node("Torch", 1, 0, NODE_LIGHT),
        light_type: LightType::Omnidirectional,
        attenuation: [80.0, 200.0],
        color: [1.0, 0.75, 0.5],
        intensity: 2.0,
        ..Light::default()
    };
    light.object.timelines.push(timeline(
        AnimationTag::LightVisibility,
        float_track(Interpolation::DontInterp, &[(0, 1.0), (1500, 0.0)]),
    ));
    model.lights.push(light);

    model.helpers.push(Helper {
        object: node("Origin Ref", 2, -1, NODE_HELPER | NODE_BILLBOARDED),
    });

    model.attachments.push(Attachment {
        object: node("Head Ref", 3, 0, NODE_ATTACHMENT),
        path: String::new().into(),
        attachment_id: 0,
    });

    model.particle_emitters.push(ParticleEmitter {
        object: node("Dust", 4, 0, NODE_PARTICLE_EMITTER | EMITTER_USES_MDL),
        emission_rate: 10.0,
        gravity: 1.0,
        path: "Abilities\\Dust.mdl".into(),
        life_span: 1.5,
        speed: 20.0,
        ..ParticleEmitter::default()
    });

    model.particle_emitters2.push(ParticleEmitter2 {
        object: node("Sparks", 5, 0, NODE_PARTICLE_EMITTER | EMITTER2_UNSHADED),
        speed: 100.0,
        latitude: 15.0,
        life_span: 0.5,
        emission_rate: 40.0,
        width: 10.0,
        length: 10.0,
        filter_mode: ParticleFilterMode::Additive,
        head_or_tail: HeadOrTail::Both,
        segment_alphas: [255, 128, 0],
        texture_id: 1,
        ..ParticleEmitter2::default()
    });

    model.ribbon_emitters.push(RibbonEmitter {
        object: node("Trail", 6, 0, NODE_RIBBON_EMITTER),
        height_above: 5.0,
        height_below: 5.0,
        life_span: 0.25,
        emission_rate: 30,
        material_id: 0,
        ..RibbonEmitter::default()
    });

    model.cameras.push(Camera {
        name: "Portrait".into(),
        position: Vec3::new(100.0, 0.0, 60.0),
        field_of_view: 0.75,
        far_clipping_plane: 1000.0,
        near_clipping_plane: 8.0,
        target_position: Vec3::new(0.0, 0.0, 60.0),
        timelines: Vec::new(),
    });

    model.event_objects.push(EventObject {
        object: node("SNDxDeath", 7, 0, NODE_EVENT_OBJECT),
        global_sequence_id: -1,
        frames: vec![1200, 1800],
    });

    model.collision_shapes.push(CollisionShape {
        object: node("Collision Box", 8, -1, NODE_COLLISION_SHAPE),
        shape_type: Some(CollisionShapeType::Box),
        vertices: [Vec3::new(-10.0, -10.0, 0.0), Vec3::new(10.0, 10.0, 40.0)],
        bounds_radius: 0.0,
    });
    model.collision_shapes.push(CollisionShape {
        object: node("Collision Sphere", 9, -1, NODE_COLLISION_SHAPE),
        shape_type: Some(CollisionShapeType::Sphere),
        vertices: [Vec3::new(0.0, 0.0, 30.0), Vec3::ZERO],
        bounds_radius: 35.0,
    });

    model.pivot_points = (0..10).map(|i| Vec3::new(0.0, 0.0, i as f32)).collect();
    model
}

/// `MDLX`, `VERS` and `MODL` for an empty model.
pub fn header_bytes() -> Vec<u8> {
    Model::new().to_mdx().unwrap()
}

/// Append one raw chunk.
pub fn push_chunk(bytes: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
    bytes.extend_from_slice(tag);
    bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    bytes.extend_from_slice(payload);
}
