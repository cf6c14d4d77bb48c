//! Chunks the codec does not understand, kept for byte-exact write-back.

use std::io::Write;

use crate::mdx::{BinaryWriter, CHUNK_HEADER_SIZE};
use crate::util::{Result, Tag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChunk {
    pub tag: Tag,
    pub data: Vec<u8>,
}

impl UnknownChunk {
    pub fn new(tag: Tag, data: Vec<u8>) -> Self {
        Self { tag, data }
    }

    /// Size on disk, header included.
    pub fn byte_length(&self) -> usize {
        CHUNK_HEADER_SIZE + self.data.len()
    }

    pub fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_tag(self.tag)?;
        writer.write_len(self.data.len())?;
        writer.write_bytes(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_verbatim() {
        let chunk = UnknownChunk::new(Tag::new(b"FAFX"), vec![1, 2, 3, 4, 5]);
        let mut writer = BinaryWriter::new(Vec::new());
        chunk.write_mdx(&mut writer).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), chunk.byte_length());
        assert_eq!(&bytes[..4], b"FAFX");
        assert_eq!(&bytes[4..8], &5u32.to_le_bytes());
        assert_eq!(&bytes[8..], &[1, 2, 3, 4, 5]);
    }
}
