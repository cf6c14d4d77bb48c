//! Root model aggregate and file-level entry points.

use std::borrow::Cow;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::*;
use crate::config::CodecSettings;
use crate::mdx::{DEFAULT_VERSION, MDLX_MAGIC};
use crate::util::{ByteString, Error, Result, Vec3};

/// On-disk representation of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// Binary chunks
    Mdx,
    /// Text blocks
    Mdl,
}

impl ModelFormat {
    /// Format named by the file extension, if it is `.mdx` or `.mdl`.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("mdx") {
            Some(ModelFormat::Mdx)
        } else if extension.eq_ignore_ascii_case("mdl") {
            Some(ModelFormat::Mdl)
        } else {
            None
        }
    }

    /// Binary if the data starts with the `MDLX` magic, text otherwise.
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(MDLX_MAGIC.as_bytes()) {
            ModelFormat::Mdx
        } else {
            ModelFormat::Mdl
        }
    }
}

/// Record counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectCounts {
    pub sequences: usize,
    pub global_sequences: usize,
    pub materials: usize,
    pub textures: usize,
    pub texture_animations: usize,
    pub geosets: usize,
    pub geoset_animations: usize,
    pub bones: usize,
    pub lights: usize,
    pub helpers: usize,
    pub attachments: usize,
    pub pivot_points: usize,
    pub particle_emitters: usize,
    pub particle_emitters2: usize,
    pub ribbon_emitters: usize,
    pub cameras: usize,
    pub event_objects: usize,
    pub collision_shapes: usize,
}

/// A Warcraft III model.
///
/// Holds one list per record kind plus any binary chunks the codec did not
/// recognize. Nodes refer to each other by object id, never by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub version: u32,
    pub name: ByteString,
    /// Reserved, empty in shipped models
    pub animation_file: ByteString,
    pub extent: Extent,
    pub blend_time: u32,
    pub sequences: Vec<Sequence>,
    /// Durations in frames
    pub global_sequences: Vec<u32>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub texture_animations: Vec<TextureAnimation>,
    pub geosets: Vec<Geoset>,
    pub geoset_animations: Vec<GeosetAnimation>,
    pub bones: Vec<Bone>,
    pub lights: Vec<Light>,
    pub helpers: Vec<Helper>,
    pub attachments: Vec<Attachment>,
    pub pivot_points: Vec<Vec3>,
    pub particle_emitters: Vec<ParticleEmitter>,
    pub particle_emitters2: Vec<ParticleEmitter2>,
    pub ribbon_emitters: Vec<RibbonEmitter>,
    pub cameras: Vec<Camera>,
    pub event_objects: Vec<EventObject>,
    pub collision_shapes: Vec<CollisionShape>,
    pub unknown_chunks: Vec<UnknownChunk>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
            name: ByteString::new(),
            animation_file: ByteString::new(),
            extent: Extent::default(),
            blend_time: 0,
            sequences: Vec::new(),
            global_sequences: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            texture_animations: Vec::new(),
            geosets: Vec::new(),
            geoset_animations: Vec::new(),
            bones: Vec::new(),
            lights: Vec::new(),
            helpers: Vec::new(),
            attachments: Vec::new(),
            pivot_points: Vec::new(),
            particle_emitters: Vec::new(),
            particle_emitters2: Vec::new(),
            ribbon_emitters: Vec::new(),
            cameras: Vec::new(),
            event_objects: Vec::new(),
            collision_shapes: Vec::new(),
            unknown_chunks: Vec::new(),
        }
    }
}

/// Decode MDL text; invalid UTF-8 is replaced rather than rejected.
fn decode_text(data: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(data) {
        Ok(text) => Cow::Borrowed(text),
        Err(err) => {
            tracing::warn!(offset = err.valid_up_to(), "MDL text is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(data)
        }
    }
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an MDX file image.
    pub fn from_mdx(data: &[u8]) -> Result<Self> {
        crate::mdx::read_model(data)
    }

    /// Encode as MDX. The whole file is built in memory, so a failure leaves
    /// nothing half-written.
    pub fn to_mdx(&self) -> Result<Vec<u8>> {
        crate::mdx::write_model(self)
    }

    /// Parse MDL text.
    pub fn from_mdl(text: &str) -> Result<Self> {
        crate::mdl::read_model(text)
    }

    /// Encode as MDL with default settings.
    pub fn to_mdl(&self) -> Result<String> {
        self.to_mdl_with(&CodecSettings::default())
    }

    pub fn to_mdl_with(&self, settings: &CodecSettings) -> Result<String> {
        crate::mdl::write_model(self, settings)
    }

    /// Parse a model from raw bytes in the given format.
    pub fn from_bytes(data: &[u8], format: ModelFormat) -> Result<Self> {
        match format {
            ModelFormat::Mdx => Self::from_mdx(data),
            ModelFormat::Mdl => Self::from_mdl(&decode_text(data)),
        }
    }

    /// Read a whole model from `reader`.
    pub fn read<R: Read>(mut reader: R, format: ModelFormat) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data, format)
    }

    /// Encode and write the model to `writer`.
    pub fn write<W: Write>(&self, writer: W, format: ModelFormat) -> Result<()> {
        self.write_with(writer, format, &CodecSettings::default())
    }

    pub fn write_with<W: Write>(&self, mut writer: W, format: ModelFormat, settings: &CodecSettings) -> Result<()> {
        match format {
            ModelFormat::Mdx => writer.write_all(&self.to_mdx()?)?,
            ModelFormat::Mdl => writer.write_all(self.to_mdl_with(settings)?.as_bytes())?,
        }
        writer.flush()?;
        Ok(())
    }

    /// Load a model file.
    ///
    /// The format comes from the extension, or from the magic bytes when the
    /// extension is neither `.mdx` nor `.mdl`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        let data = FileData::load(file)?;
        let format = ModelFormat::from_path(path).unwrap_or_else(|| ModelFormat::detect(&data));
        tracing::debug!(path = %path.display(), ?format, bytes = data.len(), "opening model");
        Self::from_bytes(&data, format)
    }

    /// Save to `path`, choosing the format from its extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_with(path, &CodecSettings::default())
    }

    pub fn save_with(&self, path: impl AsRef<Path>, settings: &CodecSettings) -> Result<()> {
        let path = path.as_ref();
        let format = ModelFormat::from_path(path).ok_or_else(|| {
            Error::invalid_state(format!("cannot tell the model format of {}", path.display()))
        })?;
        let data = match format {
            ModelFormat::Mdx => self.to_mdx()?,
            ModelFormat::Mdl => self.to_mdl_with(settings)?.into_bytes(),
        };
        std::fs::write(path, data)?;
        tracing::debug!(path = %path.display(), ?format, "saved model");
        Ok(())
    }

    pub fn object_counts(&self) -> ObjectCounts {
        ObjectCounts {
            sequences: self.sequences.len(),
            global_sequences: self.global_sequences.len(),
            materials: self.materials.len(),
            textures: self.textures.len(),
            texture_animations: self.texture_animations.len(),
            geosets: self.geosets.len(),
            geoset_animations: self.geoset_animations.len(),
            bones: self.bones.len(),
            lights: self.lights.len(),
            helpers: self.helpers.len(),
            attachments: self.attachments.len(),
            pivot_points: self.pivot_points.len(),
            particle_emitters: self.particle_emitters.len(),
            particle_emitters2: self.particle_emitters2.len(),
            ribbon_emitters: self.ribbon_emitters.len(),
            cameras: self.cameras.len(),
            event_objects: self.event_objects.len(),
            collision_shapes: self.collision_shapes.len(),
        }
    }
}

/// File contents, memory-mapped when the `mmap` feature is on.
enum FileData {
    #[cfg(feature = "mmap")]
    Mapped(memmap2::Mmap),
    Owned(Vec<u8>),
}

impl FileData {
    fn load(mut file: File) -> Result<Self> {
        #[cfg(feature = "mmap")]
        {
            if file.metadata()?.len() > 0 {
                // Safety: the map is read-only and lives only as long as `Model::open`.
                let mmap = unsafe { memmap2::Mmap::map(&file) }
                    .map_err(|e| Error::MmapFailed(e.to_string()))?;
                return Ok(FileData::Mapped(mmap));
            }
        }
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(FileData::Owned(data))
    }
}

impl std::ops::Deref for FileData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            #[cfg(feature = "mmap")]
            FileData::Mapped(mmap) => mmap,
            FileData::Owned(data) => data,
        }
    }
}
