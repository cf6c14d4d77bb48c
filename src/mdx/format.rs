//! MDX format constants.

use crate::util::Tag;

/// Magic tag at the start of every MDX file.
pub const MDLX_MAGIC: Tag = Tag::new(b"MDLX");

/// Size of a chunk header (tag + u32 size).
pub const CHUNK_HEADER_SIZE: usize = 8;

// Top-level chunk tags, in canonical write order.
pub const VERS: Tag = Tag::new(b"VERS");
pub const MODL: Tag = Tag::new(b"MODL");
pub const SEQS: Tag = Tag::new(b"SEQS");
pub const GLBS: Tag = Tag::new(b"GLBS");
pub const MTLS: Tag = Tag::new(b"MTLS");
pub const TEXS: Tag = Tag::new(b"TEXS");
pub const TXAN: Tag = Tag::new(b"TXAN");
pub const GEOS: Tag = Tag::new(b"GEOS");
pub const GEOA: Tag = Tag::new(b"GEOA");
pub const BONE: Tag = Tag::new(b"BONE");
pub const LITE: Tag = Tag::new(b"LITE");
pub const HELP: Tag = Tag::new(b"HELP");
pub const ATCH: Tag = Tag::new(b"ATCH");
pub const PIVT: Tag = Tag::new(b"PIVT");
pub const PREM: Tag = Tag::new(b"PREM");
pub const PRE2: Tag = Tag::new(b"PRE2");
pub const RIBB: Tag = Tag::new(b"RIBB");
pub const CAMS: Tag = Tag::new(b"CAMS");
pub const EVTS: Tag = Tag::new(b"EVTS");
pub const CLID: Tag = Tag::new(b"CLID");

// Tags nested inside records.
pub const LAYS: Tag = Tag::new(b"LAYS");
pub const VRTX: Tag = Tag::new(b"VRTX");
pub const NRMS: Tag = Tag::new(b"NRMS");
pub const PTYP: Tag = Tag::new(b"PTYP");
pub const PCNT: Tag = Tag::new(b"PCNT");
pub const PVTX: Tag = Tag::new(b"PVTX");
pub const GNDX: Tag = Tag::new(b"GNDX");
pub const MTGC: Tag = Tag::new(b"MTGC");
pub const MATS: Tag = Tag::new(b"MATS");
pub const UVAS: Tag = Tag::new(b"UVAS");
pub const UVBS: Tag = Tag::new(b"UVBS");
pub const KEVT: Tag = Tag::new(b"KEVT");

/// Fixed-width string field for object names.
pub const NAME_LENGTH: usize = 80;

/// Fixed-width string field for file paths.
pub const FILE_NAME_LENGTH: usize = 260;

/// Payload of the VERS chunk.
pub const VERSION_CHUNK_SIZE: usize = 4;

/// Payload of the MODL chunk: name, animation file, extent, blend time.
pub const MODEL_CHUNK_SIZE: usize = NAME_LENGTH + FILE_NAME_LENGTH + EXTENT_SIZE + 4;

/// Bounds radius + min + max.
pub const EXTENT_SIZE: usize = 28;

/// One global sequence duration.
pub const GLOBAL_SEQUENCE_SIZE: usize = 4;

/// One pivot point.
pub const PIVOT_POINT_SIZE: usize = 12;

/// Format version written by default.
pub const DEFAULT_VERSION: u32 = 800;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic() {
        assert_eq!(MDLX_MAGIC.as_bytes(), b"MDLX");
    }

    #[test]
    fn test_model_chunk_size() {
        assert_eq!(MODEL_CHUNK_SIZE, 372);
    }
}
