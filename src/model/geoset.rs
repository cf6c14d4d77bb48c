//! Triangle meshes.
//!
//! ```text
//! inclusiveSize         u32
//! VRTX count vertices   Vec3 each
//! NRMS count normals    Vec3 each
//! PTYP count faceTypes  u32 each
//! PCNT count groups     u32 each
//! PVTX count faces      u16 each
//! GNDX count groups     u8 each
//! MTGC count sizes      u32 each
//! MATS count indices    u32 each
//! materialId, selectionGroup, selectionFlags
//! extent
//! count, sequence extents
//! UVAS count, then per set: UVBS count uvs
//! ```

use std::io::Write;

use super::{Block, DynamicRecord, Extent};
use crate::mdl::{TokenStream, TokenWriter};
use crate::mdx::{BinaryReader, BinaryWriter, GNDX, MATS, MTGC, NRMS, PCNT, PTYP, PVTX, UVAS, UVBS, VRTX};
use crate::util::{Error, Result, Tag, Vec2, Vec3};

/// Face type of a plain triangle list.
pub const FACE_TYPE_TRIANGLES: u32 = 4;

/// Selection flag written as `Unselectable` in text.
pub const GEOSET_UNSELECTABLE: u32 = 4;

/// Bytes of a geoset with every array empty.
const GEOSET_BASE_SIZE: usize = 120;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geoset {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub face_types: Vec<u32>,
    pub face_groups: Vec<u32>,
    /// Vertex indices, three per triangle
    pub faces: Vec<u16>,
    /// Matrix group of each vertex
    pub vertex_groups: Vec<u8>,
    pub matrix_group_sizes: Vec<u32>,
    pub matrix_indices: Vec<u32>,
    pub material_id: u32,
    pub selection_group: u32,
    pub selection_flags: u32,
    pub extent: Extent,
    pub sequence_extents: Vec<Extent>,
    pub uv_sets: Vec<Vec<Vec2>>,
}

fn read_array_header(reader: &mut BinaryReader<'_>, tag: Tag) -> Result<usize> {
    reader.expect_tag(tag)?;
    reader.read_len()
}

fn write_array_header<W: Write>(writer: &mut BinaryWriter<W>, tag: Tag, count: usize) -> Result<()> {
    writer.write_tag(tag)?;
    writer.write_len(count)
}

impl Geoset {
    /// Split `matrix_indices` into one slice per matrix group.
    pub fn matrix_groups(&self) -> Result<Vec<&[u32]>> {
        let mut groups = Vec::with_capacity(self.matrix_group_sizes.len());
        let mut rest = self.matrix_indices.as_slice();
        for &size in &self.matrix_group_sizes {
            let size = size as usize;
            if size > rest.len() {
                return Err(Error::invalid_state(format!(
                    "matrix groups need {} more indices than the geoset has",
                    size - rest.len()
                )));
            }
            let (group, tail) = rest.split_at(size);
            groups.push(group);
            rest = tail;
        }
        Ok(groups)
    }

    fn read_faces(&mut self, stream: &mut TokenStream<'_>) -> Result<()> {
        stream.read_u32()?;
        stream.read_u32()?;
        stream.enter_block()?;
        while let Some(token) = stream.next_in_block()? {
            match token {
                "Triangles" => {
                    stream.enter_block()?;
                    while stream.peek()? != Some("}") {
                        self.faces.extend(stream.read_number_list::<u16>()?);
                    }
                    stream.expect("}")?;
                }
                _ => return Err(Error::unknown_token("Geoset Faces", token)),
            }
        }
        self.face_types = vec![FACE_TYPE_TRIANGLES];
        self.face_groups = vec![self.faces.len() as u32];
        Ok(())
    }

    fn read_groups(&mut self, stream: &mut TokenStream<'_>) -> Result<()> {
        stream.read_u32()?;
        stream.read_u32()?;
        stream.enter_block()?;
        while let Some(token) = stream.next_in_block()? {
            match token {
                "Matrices" => {
                    let group = stream.read_number_list::<u32>()?;
                    self.matrix_group_sizes.push(group.len() as u32);
                    self.matrix_indices.extend(group);
                }
                _ => return Err(Error::unknown_token("Geoset Groups", token)),
            }
        }
        Ok(())
    }

    fn read_sequence_extent(&mut self, stream: &mut TokenStream<'_>) -> Result<()> {
        let mut extent = Extent::default();
        stream.enter_block()?;
        while let Some(token) = stream.next_in_block()? {
            if !extent.read_mdl_token(stream, token)? {
                return Err(Error::unknown_token("Geoset Anim", token));
            }
        }
        self.sequence_extents.push(extent);
        Ok(())
    }
}

impl Block for Geoset {
    const KEYWORD: &'static str = "Geoset";

    fn read_mdx(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let size = reader.read_len()?;
        if size < GEOSET_BASE_SIZE {
            return Err(Error::invalid(format!("geoset size {} is below its header", size)));
        }
        let mut body = reader.take(size - 4)?;

        let mut geoset = Self::default();
        let count = read_array_header(&mut body, VRTX)?;
        geoset.vertices = body.read_vec3_vec(count)?;
        let count = read_array_header(&mut body, NRMS)?;
        geoset.normals = body.read_vec3_vec(count)?;
        let count = read_array_header(&mut body, PTYP)?;
        geoset.face_types = body.read_u32_vec(count)?;
        let count = read_array_header(&mut body, PCNT)?;
        geoset.face_groups = body.read_u32_vec(count)?;
        let count = read_array_header(&mut body, PVTX)?;
        geoset.faces = body.read_u16_vec(count)?;
        let count = read_array_header(&mut body, GNDX)?;
        geoset.vertex_groups = body.read_u8_vec(count)?;
        let count = read_array_header(&mut body, MTGC)?;
        geoset.matrix_group_sizes = body.read_u32_vec(count)?;
        let count = read_array_header(&mut body, MATS)?;
        geoset.matrix_indices = body.read_u32_vec(count)?;

        geoset.material_id = body.read_u32()?;
        geoset.selection_group = body.read_u32()?;
        geoset.selection_flags = body.read_u32()?;
        geoset.extent = Extent::read_mdx(&mut body)?;

        let count = body.read_len()?;
        for _ in 0..count {
            geoset.sequence_extents.push(Extent::read_mdx(&mut body)?);
        }

        let sets = read_array_header(&mut body, UVAS)?;
        for _ in 0..sets {
            let count = read_array_header(&mut body, UVBS)?;
            geoset.uv_sets.push(body.read_vec2_vec(count)?);
        }

        if !body.is_empty() {
            return Err(Error::invalid(format!(
                "{} bytes left over at the end of a geoset",
                body.remaining()
            )));
        }
        Ok(geoset)
    }

    fn write_mdx<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.write_len(self.byte_length())?;
        write_array_header(writer, VRTX, self.vertices.len())?;
        for &vertex in &self.vertices {
            writer.write_vec3(vertex)?;
        }
        write_array_header(writer, NRMS, self.normals.len())?;
        for &normal in &self.normals {
            writer.write_vec3(normal)?;
        }
        write_array_header(writer, PTYP, self.face_types.len())?;
        writer.write_u32_slice(&self.face_types)?;
        write_array_header(writer, PCNT, self.face_groups.len())?;
        writer.write_u32_slice(&self.face_groups)?;
        write_array_header(writer, PVTX, self.faces.len())?;
        writer.write_u16_slice(&self.faces)?;
        write_array_header(writer, GNDX, self.vertex_groups.len())?;
        writer.write_bytes(&self.vertex_groups)?;
        write_array_header(writer, MTGC, self.matrix_group_sizes.len())?;
        writer.write_u32_slice(&self.matrix_group_sizes)?;
        write_array_header(writer, MATS, self.matrix_indices.len())?;
        writer.write_u32_slice(&self.matrix_indices)?;

        writer.write_u32(self.material_id)?;
        writer.write_u32(self.selection_group)?;
        writer.write_u32(self.selection_flags)?;
        self.extent.write_mdx(writer)?;

        writer.write_len(self.sequence_extents.len())?;
        for extent in &self.sequence_extents {
            extent.write_mdx(writer)?;
        }

        write_array_header(writer, UVAS, self.uv_sets.len())?;
        for set in &self.uv_sets {
            write_array_header(writer, UVBS, set.len())?;
            for &uv in set {
                writer.write_vec2(uv)?;
            }
        }
        Ok(())
    }

    fn read_mdl(stream: &mut TokenStream<'_>) -> Result<Self> {
        let mut geoset = Self::default();
        stream.enter_block()?;
        while let Some(token) = stream.next_in_block()? {
            match token {
                "Vertices" => {
                    stream.read_u32()?;
                    geoset.vertices = stream
                        .read_vector_list::<3>()?
                        .into_iter()
                        .map(Vec3::from_array)
                        .collect();
                }
                "Normals" => {
                    stream.read_u32()?;
                    geoset.normals = stream
                        .read_vector_list::<3>()?
                        .into_iter()
                        .map(Vec3::from_array)
                        .collect();
                }
                "TVertices" => {
                    stream.read_u32()?;
                    let set = stream.read_vector_list::<2>()?;
                    geoset.uv_sets.push(set.into_iter().map(Vec2::from_array).collect());
                }
                "VertexGroup" => geoset.vertex_groups = stream.read_number_list::<u8>()?,
                "Faces" => geoset.read_faces(stream)?,
                "Groups" => geoset.read_groups(stream)?,
                "Anim" => geoset.read_sequence_extent(stream)?,
                "MaterialID" => geoset.material_id = stream.read_u32()?,
                "SelectionGroup" => geoset.selection_group = stream.read_u32()?,
                "Unselectable" => geoset.selection_flags = GEOSET_UNSELECTABLE,
                _ if geoset.extent.read_mdl_token(stream, token)? => {}
                _ => return Err(Error::unknown_token(Self::KEYWORD, token)),
            }
        }
        Ok(geoset)
    }

    fn write_mdl(&self, writer: &mut TokenWriter) -> Result<()> {
        writer.start_block(Self::KEYWORD);

        writer.start_block_count("Vertices", self.vertices.len());
        for vertex in &self.vertices {
            writer.write_float_array(&vertex.to_array());
        }
        writer.end_block();

        writer.start_block_count("Normals", self.normals.len());
        for normal in &self.normals {
            writer.write_float_array(&normal.to_array());
        }
        writer.end_block();

        for set in &self.uv_sets {
            writer.start_block_count("TVertices", set.len());
            for uv in set {
                writer.write_float_array(&uv.to_array());
            }
            writer.end_block();
        }

        writer.start_block("VertexGroup");
        for group in &self.vertex_groups {
            writer.write_value(group);
        }
        writer.end_block();

        if !self.faces.is_empty() {
            writer.start_block_counts("Faces", 1, self.faces.len());
            writer.start_block("Triangles");
            writer.write_array(&self.faces);
            writer.end_block();
            writer.end_block();
        }

        writer.start_block_counts("Groups", self.matrix_group_sizes.len(), self.matrix_indices.len());
        for group in self.matrix_groups()? {
            writer.write_array_attrib("Matrices", group);
        }
        writer.end_block();

        self.extent.write_mdl(writer);
        for extent in &self.sequence_extents {
            writer.start_block("Anim");
            extent.write_mdl(writer);
            writer.end_block();
        }

        writer.write_attrib("MaterialID", self.material_id);
        writer.write_attrib("SelectionGroup", self.selection_group);
        if self.selection_flags == GEOSET_UNSELECTABLE {
            writer.write_flag("Unselectable");
        }
        writer.end_block();
        Ok(())
    }
}

impl DynamicRecord for Geoset {
    fn byte_length(&self) -> usize {
        GEOSET_BASE_SIZE
            + self.vertices.len() * 12
            + self.normals.len() * 12
            + self.face_types.len() * 4
            + self.face_groups.len() * 4
            + self.faces.len() * 2
            + self.vertex_groups.len()
            + self.matrix_group_sizes.len() * 4
            + self.matrix_indices.len() * 4
            + self.sequence_extents.len() * Extent::BYTE_LENGTH
            + self.uv_sets.iter().map(|set| 8 + set.len() * 8).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecSettings;

    fn triangle() -> Geoset {
        Geoset {
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.5),
            ],
            normals: vec![Vec3::Z; 3],
            face_types: vec![FACE_TYPE_TRIANGLES],
            face_groups: vec![3],
            faces: vec![0, 1, 2],
            vertex_groups: vec![0, 0, 1],
            matrix_group_sizes: vec![1, 2],
            matrix_indices: vec![0, 0, 1],
            material_id: 0,
            selection_group: 0,
            selection_flags: 0,
            extent: Extent {
                bounds_radius: 1.5,
                min: Vec3::ZERO,
                max: Vec3::new(1.0, 1.0, 0.5),
            },
            sequence_extents: vec![Extent::default(), Extent {
                bounds_radius: 2.0,
                ..Extent::default()
            }],
            uv_sets: vec![vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]],
        }
    }

    #[test]
    fn test_empty_size() {
        let geoset = Geoset::default();
        let mut writer = BinaryWriter::new(Vec::new());
        geoset.write_mdx(&mut writer).unwrap();
        assert_eq!(writer.into_inner().len(), GEOSET_BASE_SIZE);
    }

    #[test]
    fn test_binary_round_trip() {
        let geoset = triangle();
        let mut writer = BinaryWriter::new(Vec::new());
        geoset.write_mdx(&mut writer).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), geoset.byte_length());
        assert_eq!(&bytes[4..8], b"VRTX");
        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(Geoset::read_mdx(&mut reader).unwrap(), geoset);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_text_round_trip() {
        let geoset = triangle();
        let mut writer = TokenWriter::new(&CodecSettings::default());
        geoset.write_mdl(&mut writer).unwrap();
        let text = writer.finish();
        assert!(text.contains("\tFaces 1 3 {\n\t\tTriangles {\n\t\t\t{ 0, 1, 2 },\n\t\t}\n\t}\n"));
        assert!(text.contains("\tGroups 2 3 {\n\t\tMatrices { 0 },\n\t\tMatrices { 0, 1 },\n\t}\n"));

        let mut stream = TokenStream::new(&text);
        stream.expect("Geoset").unwrap();
        assert_eq!(Geoset::read_mdl(&mut stream).unwrap(), geoset);
    }

    #[test]
    fn test_wrong_sub_tag() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(GEOSET_BASE_SIZE as u32).to_le_bytes());
        bytes.extend_from_slice(b"NRMS");
        bytes.resize(GEOSET_BASE_SIZE, 0);
        assert!(Geoset::read_mdx(&mut BinaryReader::new(&bytes)).is_err());
    }

    #[test]
    fn test_matrix_groups_overflow() {
        let geoset = Geoset {
            matrix_group_sizes: vec![3],
            matrix_indices: vec![0],
            ..Geoset::default()
        };
        assert!(geoset.matrix_groups().is_err());
    }
}
