//! # mdlx
//!
//! Reader and writer for Warcraft III models in both of their on-disk forms:
//! MDX, a little-endian chunked binary format, and MDL, its brace-delimited
//! text equivalent. Either form loads into the same [`Model`] and can be
//! saved as the other.
//!
//! ## Modules
//!
//! - [`util`] - Tags, errors, vector re-exports
//! - [`mdx`] - Binary reader/writer and chunk container
//! - [`mdl`] - Tokenizer, text writer and section driver
//! - [`animation`] - Keyframe tracks and the animated property table
//! - [`model`] - The model and every record kind
//! - [`config`] - Text writer settings
//!
//! ## Example
//!
//! ```ignore
//! use mdlx::Model;
//!
//! let model = Model::open("Footman.mdx")?;
//! println!("{} bones", model.bones.len());
//! model.save("Footman.mdl")?;
//! ```

pub mod animation;
pub mod config;
pub mod mdl;
pub mod mdx;
pub mod model;
pub mod util;

// Re-export commonly used types
pub use config::CodecSettings;
pub use model::{Model, ModelFormat};
pub use util::{ByteString, Error, Result, Tag};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::animation::{AnimationTag, Interpolation, Timeline, TimelineTrack, Track};
    pub use crate::config::CodecSettings;
    pub use crate::model::*;
    pub use crate::util::{ByteString, Error, Result, Tag, Vec2, Vec3};
}
