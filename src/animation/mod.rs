//! Animation timelines.
//!
//! A [`Timeline`] pairs a property from the closed [`AnimationTag`] table
//! with a [`Track`] of keyframes whose value shape the table fixes.

mod interpolation;
mod registry;
mod timeline;
mod value;

pub use interpolation::*;
pub use registry::*;
pub use timeline::*;
pub use value::*;
