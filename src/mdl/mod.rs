//! MDL text format.
//!
//! A model is a sequence of top-level blocks:
//!
//! ```text
//! Version { FormatVersion 800, }
//! Model "Footman" { NumBones 12, BlendTime 150, ... }
//! Sequences 2 { Anim "Stand" { Interval { 0, 1000 }, } ... }
//! Bone "Root" { ObjectId 0, GeosetId Multiple, ... }
//! PivotPoints 12 { { 0, 0, 0 }, ... }
//! ```
//!
//! `//` starts a line comment, strings are double-quoted, and spaces,
//! commas, colons and line breaks all separate tokens.

mod driver;
mod token_stream;
mod token_writer;

pub use driver::*;
pub use token_stream::*;
pub use token_writer::*;
