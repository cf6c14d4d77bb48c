//! Utility types shared by both file formats.
//!
//! - [`Tag`] - Four-byte chunk/animation identifiers
//! - [`ByteString`] - Raw bytes of name and path fields
//! - [`Error`] / [`Result`] - Error handling
//! - Vector type re-exports from glam

mod byte_string;
mod error;
mod tag;

pub use byte_string::ByteString;
pub use error::*;
pub use tag::*;

pub use glam::{Vec2, Vec3};
