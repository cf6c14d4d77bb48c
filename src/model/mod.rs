//! The model and every record kind it holds.
//!
//! - [`Model`] - root aggregate with one list per record kind
//! - [`Block`] - read/write contract shared by all records
//! - [`GenericObject`] - node header of bones, helpers, lights, emitters, ...
//! - [`UnknownChunk`] - binary chunks kept verbatim

mod attachment;
mod block;
mod bone;
mod camera;
mod collision_shape;
mod event_object;
mod extent;
mod generic_object;
mod geoset;
mod geoset_animation;
mod helper;
mod light;
mod material;
mod particle_emitter;
mod particle_emitter2;
mod ribbon_emitter;
mod root;
mod sequence;
mod texture;
mod texture_animation;
mod unknown_chunk;

pub use attachment::Attachment;
pub use block::{Block, DynamicRecord, StaticRecord};
pub(crate) use block::{
    find_timeline, read_flag, read_object_name, write_animated_color, write_animated_float, write_flags,
    write_timeline,
};
pub use bone::Bone;
pub use camera::Camera;
pub use collision_shape::{CollisionShape, CollisionShapeType};
pub use event_object::EventObject;
pub use extent::Extent;
pub use generic_object::*;
pub use geoset::*;
pub use geoset_animation::*;
pub use helper::Helper;
pub use light::{Light, LightType};
pub use material::*;
pub use particle_emitter::*;
pub use particle_emitter2::*;
pub use ribbon_emitter::RibbonEmitter;
pub use root::{Model, ModelFormat, ObjectCounts};
pub use sequence::*;
pub use texture::*;
pub use texture_animation::TextureAnimation;
pub use unknown_chunk::UnknownChunk;
