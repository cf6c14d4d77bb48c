//! MDX binary format.
//!
//! ## File Structure
//!
//! ```text
//! +------------------+
//! | Magic: "MDLX"    |  4 bytes
//! +------------------+
//! | Tag              |  4 bytes, e.g. "VERS"
//! | Size             |  u32 LE, payload bytes
//! | Payload          |  Size bytes
//! +------------------+
//! | ... chunks ...   |
//! +------------------+
//! ```
//!
//! Chunks of fixed-width records hold `size / width` records. Chunks of
//! variable-width records hold records whose encoded lengths add up to the
//! chunk size exactly. Chunks with unrecognized tags are kept as raw bytes.

mod container;
mod format;
mod reader;
mod writer;

pub use container::*;
pub use format::*;
pub use reader::*;
pub use writer::*;
