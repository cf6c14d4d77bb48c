//! Texture references.

use std::io::Write;

use super::{Block, StaticRecord};
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter, FILE_NAME_LENGTH};
use crate::util::{ByteString, Error, Result};

pub const TEXTURE_WRAP_WIDTH: u32 = 0x1;
pub const TEXTURE_WRAP_HEIGHT: u32 = 0x2;

/// An image path or a replaceable texture slot (team color, glow, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Texture {
    pub replaceable_id: u32,
    pub path: ByteString,
    pub flags: u32,
}

impl Block for Texture {
    const KEYWORD: &'static str = "Bitmap";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            replaceable_id: reader.read_u32()?,
            path: reader.read_fixed_string(FILE_NAME_LENGTH)?,
            flags: reader.read_u32()?,
        })
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_u32(self.replaceable_id)?;
        writer.write_fixed_string(&self.path, FILE_NAME_LENGTH)?;
        writer.write_u32(self.flags)
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut texture = Self::default();
        stream.enter_block()?;
        while let Some(token) = stream.next_in_block()? {
            match token {
                "Image" => texture.path = stream.read_token()?.into(),
                "ReplaceableId" => texture.replaceable_id = stream.read_u32()?,
                "WrapWidth" => texture.flags |= TEXTURE_WRAP_WIDTH,
                "WrapHeight" => texture.flags |= TEXTURE_WRAP_HEIGHT,
                _ => return Err(Error::unknown_token(Self::KEYWORD, token)),
            }
        }
        Ok(texture)
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        writer.start_block(Self::KEYWORD);
        writer.write_string_attrib("Image", &self.path.to_str_lossy())?;
        if self.replaceable_id != 0 {
            writer.write_attrib("ReplaceableId", self.replaceable_id);
        }
        if self.flags & TEXTURE_WRAP_WIDTH != 0 {
            writer.write_flag("WrapWidth");
        }
        if self.flags & TEXTURE_WRAP_HEIGHT != 0 {
            writer.write_flag("WrapHeight");
        }
        writer.end_block();
        Ok(())
    }
}

impl StaticRecord for Texture {
    const BYTE_LENGTH: usize = 268;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecSettings;

    #[test]
    fn test_binary_width() {
        let texture = Texture {
            replaceable_id: 1,
            path: ByteString::new(),
            flags: TEXTURE_WRAP_WIDTH | TEXTURE_WRAP_HEIGHT,
        };
        let mut writer = BinaryWriter::new(Vec::new());
        texture.write_mdx(&mut writer).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), Texture::BYTE_LENGTH);
        assert_eq!(Texture::read_mdx(&mut BinaryReader::new(&bytes)).unwrap(), texture);
    }

    #[test]
    fn test_text_round_trip() {
        let texture = Texture {
            replaceable_id: 0,
            path: "Textures\\Footman.blp".into(),
            flags: TEXTURE_WRAP_HEIGHT,
        };
        let mut writer = TokenWriter::new(&CodecSettings::default());
        texture.write_mdl(&mut writer).unwrap();
        let text = writer.finish();
        assert_eq!(text, "Bitmap {\n\tImage \"Textures\\Footman.blp\",\n\tWrapHeight,\n}\n");

        let mut stream = TokenStream::new(&text);
        stream.expect("Bitmap").unwrap();
        assert_eq!(Texture::read_mdl(&mut stream).unwrap(), texture);
    }

    #[test]
    fn test_path_too_long() {
        let texture = Texture {
            path: "x".repeat(FILE_NAME_LENGTH + 1).into(),
            ..Texture::default()
        };
        let mut writer = BinaryWriter::new(Vec::new());
        assert!(matches!(texture.write_mdx(&mut writer), Err(Error::InvalidState(_))));
    }
}
