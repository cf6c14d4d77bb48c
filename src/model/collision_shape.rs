//! Collision volumes used for selection and hit tests.

use std::io::Write;

use glam::Vec3;

use super::{Block, DynamicRecord, GenericObject, NODE_COLLISION_SHAPE};
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter};
use crate::util::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionShapeType {
    Box,
    Plane,
    Sphere,
    Cylinder,
}

impl CollisionShapeType {
    pub fn from_index(index: u32) -> Result<Self> {
        match index {
            0 => Ok(CollisionShapeType::Box),
            1 => Ok(CollisionShapeType::Plane),
            2 => Ok(CollisionShapeType::Sphere),
            3 => Ok(CollisionShapeType::Cylinder),
            _ => Err(Error::invalid(format!("collision shape type {} out of range", index))),
        }
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn keyword(self) -> &'static str {
        match self {
            CollisionShapeType::Box => "Box",
            CollisionShapeType::Plane => "Plane",
            CollisionShapeType::Sphere => "Sphere",
            CollisionShapeType::Cylinder => "Cylinder",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "Box" => Some(CollisionShapeType::Box),
            "Plane" => Some(CollisionShapeType::Plane),
            "Sphere" => Some(CollisionShapeType::Sphere),
            "Cylinder" => Some(CollisionShapeType::Cylinder),
            _ => None,
        }
    }

    /// Number of stored vertices.
    pub fn vertex_count(self) -> usize {
        match self {
            CollisionShapeType::Sphere => 1,
            _ => 2,
        }
    }

    pub fn has_radius(self) -> bool {
        matches!(self, CollisionShapeType::Sphere | CollisionShapeType::Cylinder)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollisionShape {
    pub object: GenericObject,
    /// `None` only for a shape still being built; it cannot be written.
    pub shape_type: Option<CollisionShapeType>,
    pub vertices: [Vec3; 2],
    pub bounds_radius: f32,
}

impl Default for CollisionShape {
    fn default() -> Self {
        Self {
            object: GenericObject::new(NODE_COLLISION_SHAPE),
            shape_type: None,
            vertices: [Vec3::ZERO; 2],
            bounds_radius: 0.0,
        }
    }
}

impl CollisionShape {
    fn shape_type(&self) -> Result<CollisionShapeType> {
        self.shape_type.ok_or_else(|| {
            Error::invalid_state(format!("collision shape {:?} has no type", self.object.name))
        })
    }

    /// The vertices the type actually uses.
    pub fn used_vertices(&self) -> &[Vec3] {
        let count = self.shape_type.map_or(0, CollisionShapeType::vertex_count);
        &self.vertices[..count]
    }
}

impl Block for CollisionShape {
    const KEYWORD: &'static str = "CollisionShape";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let object = GenericObject::read_mdx(reader)?;
        let shape_type = CollisionShapeType::from_index(reader.read_u32()?)?;
        let mut shape = Self {
            object,
            shape_type: Some(shape_type),
            ..Self::default()
        };
        for vertex in shape.vertices.iter_mut().take(shape_type.vertex_count()) {
            *vertex = reader.read_vec3()?;
        }
        if shape_type.has_radius() {
            shape.bounds_radius = reader.read_f32()?;
        }
        Ok(shape)
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        let shape_type = self.shape_type()?;
        self.object.write_mdx_all(writer)?;
        writer.write_u32(shape_type.index())?;
        for vertex in self.used_vertices() {
            writer.write_vec3(*vertex)?;
        }
        if shape_type.has_radius() {
            writer.write_f32(self.bounds_radius)?;
        }
        Ok(())
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut shape = Self {
            object: GenericObject::read_mdl_start(stream, NODE_COLLISION_SHAPE)?,
            ..Self::default()
        };
        while let Some(token) = stream.next_in_block()? {
            if let Some(shape_type) = CollisionShapeType::from_keyword(token) {
                shape.shape_type = Some(shape_type);
                continue;
            }
            match token {
                "Vertices" => {
                    let _count = stream.read_u32()?;
                    let vertices = stream.read_vector_list::<3>()?;
                    if vertices.len() > 2 {
                        return Err(Error::invalid(format!(
                            "collision shape {:?} lists {} vertices",
                            shape.object.name,
                            vertices.len()
                        )));
                    }
                    for (slot, vertex) in shape.vertices.iter_mut().zip(vertices) {
                        *slot = Vec3::from_array(vertex);
                    }
                }
                "BoundsRadius" => shape.bounds_radius = stream.read_float()?,
                _ if shape.object.read_mdl_token(stream, token)? => {}
                _ => {
                    return Err(Error::unknown_token(
                        format!("CollisionShape {:?}", shape.object.name),
                        token,
                    ))
                }
            }
        }
        Ok(shape)
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        let shape_type = self.shape_type()?;
        writer.start_object_block(Self::KEYWORD, &self.object.name.to_str_lossy())?;
        self.object.write_mdl_header(writer);
        writer.write_flag(shape_type.keyword());
        writer.start_block_count("Vertices", shape_type.vertex_count());
        for vertex in self.used_vertices() {
            writer.write_float_array(&vertex.to_array());
        }
        writer.end_block();
        if shape_type.has_radius() {
            writer.write_float_attrib("BoundsRadius", self.bounds_radius);
        }
        self.object.write_mdl_timelines(writer)?;
        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for CollisionShape {
    fn byte_length(&self) -> usize {
        let fields = match self.shape_type {
            Some(shape_type) => {
                4 + 12 * shape_type.vertex_count() + if shape_type.has_radius() { 4 } else { 0 }
            }
            None => 4,
        };
        self.object.byte_length() + fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecSettings;

    fn sphere() -> CollisionShape {
        let mut shape = CollisionShape {
            shape_type: Some(CollisionShapeType::Sphere),
            vertices: [Vec3::new(0.0, 0.0, 40.0), Vec3::ZERO],
            bounds_radius: 55.0,
            ..CollisionShape::default()
        };
        shape.object.name = "Collision Sphere01".into();
        shape.object.object_id = 30;
        shape
    }

    #[test]
    fn test_binary_sizes() {
        let shape = sphere();
        let mut writer = BinaryWriter::new(Vec::new());
        shape.write_mdx(&mut writer).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), 96 + 4 + 12 + 4);
        assert_eq!(bytes.len(), shape.byte_length());
        assert_eq!(CollisionShape::read_mdx(&mut BinaryReader::new(&bytes)).unwrap(), shape);

        let boxed = CollisionShape {
            shape_type: Some(CollisionShapeType::Box),
            vertices: [Vec3::splat(-1.0), Vec3::splat(1.0)],
            ..CollisionShape::default()
        };
        assert_eq!(boxed.byte_length(), 96 + 4 + 24);
    }

    #[test]
    fn test_text_round_trip() {
        let shape = sphere();
        let mut writer = TokenWriter::new(&CodecSettings::default());
        shape.write_mdl(&mut writer).unwrap();
        let text = writer.finish();
        assert!(text.contains("\tSphere,\n\tVertices 1 {\n\t\t{ 0, 0, 40 },\n\t}\n\tBoundsRadius 55,\n"));

        let mut stream = TokenStream::new(&text);
        stream.expect("CollisionShape").unwrap();
        assert_eq!(CollisionShape::read_mdl(&mut stream).unwrap(), shape);
    }

    #[test]
    fn test_untyped_shape_rejected() {
        let shape = CollisionShape::default();
        let mut writer = BinaryWriter::new(Vec::new());
        let err = shape.write_mdx(&mut writer).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert!(writer.into_inner().is_empty());

        let mut writer = TokenWriter::new(&CodecSettings::default());
        assert!(matches!(shape.write_mdl(&mut writer).unwrap_err(), Error::InvalidState(_)));
        assert_eq!(shape.byte_length(), 100);
    }

    #[test]
    fn test_bad_type_index() {
        let mut writer = BinaryWriter::new(Vec::new());
        GenericObject::new(NODE_COLLISION_SHAPE).write_mdx(&mut writer).unwrap();
        writer.write_u32(7).unwrap();
        let bytes = writer.into_inner();
        let err = CollisionShape::read_mdx(&mut BinaryReader::new(&bytes)).unwrap_err();
        assert!(err.is_format_error());
    }
}
