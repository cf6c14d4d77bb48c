//! Top-level MDL sections.

use super::{TokenStream, TokenWriter};
use crate::config::CodecSettings;
use crate::model::*;
use crate::util::{Error, Result, Vec3};

/// Header counts that only document the file; the reader skips them.
const OBJECT_COUNT_KEYWORDS: [&str; 10] = [
    "NumGeosets",
    "NumGeosetAnims",
    "NumHelpers",
    "NumLights",
    "NumBones",
    "NumAttachments",
    "NumParticleEmitters",
    "NumParticleEmitters2",
    "NumRibbonEmitters",
    "NumEvents",
];

/// Parse a complete MDL document.
pub fn read_model(text: &str) -> Result<Model> {
    let mut stream = TokenStream::new(text);
    let mut model = Model::default();

    while let Some(token) = stream.read()? {
        tracing::debug!(block = token, line = stream.line(), "section");
        match token {
            "Version" => read_version(&mut stream, &mut model)?,
            "Model" => read_header(&mut stream, &mut model)?,
            "Sequences" => read_numbered(&mut stream, token, &mut model.sequences)?,
            "GlobalSequences" => read_global_sequences(&mut stream, &mut model)?,
            "Textures" => read_numbered(&mut stream, token, &mut model.textures)?,
            "Materials" => read_numbered(&mut stream, token, &mut model.materials)?,
            "TextureAnims" => read_numbered(&mut stream, token, &mut model.texture_animations)?,
            "Geoset" => model.geosets.push(Geoset::read_mdl(&mut stream)?),
            "GeosetAnim" => model.geoset_animations.push(GeosetAnimation::read_mdl(&mut stream)?),
            "Bone" => model.bones.push(Bone::read_mdl(&mut stream)?),
            "Light" => model.lights.push(Light::read_mdl(&mut stream)?),
            "Helper" => model.helpers.push(Helper::read_mdl(&mut stream)?),
            "Attachment" => model.attachments.push(Attachment::read_mdl(&mut stream)?),
            "PivotPoints" => {
                let _count = stream.read_u32()?;
                let points = stream.read_vector_list::<3>()?;
                model.pivot_points.extend(points.into_iter().map(Vec3::from_array));
            }
            "ParticleEmitter" => model.particle_emitters.push(ParticleEmitter::read_mdl(&mut stream)?),
            "ParticleEmitter2" => model.particle_emitters2.push(ParticleEmitter2::read_mdl(&mut stream)?),
            "RibbonEmitter" => model.ribbon_emitters.push(RibbonEmitter::read_mdl(&mut stream)?),
            "Camera" => model.cameras.push(Camera::read_mdl(&mut stream)?),
            "EventObject" => model.event_objects.push(EventObject::read_mdl(&mut stream)?),
            "CollisionShape" => model.collision_shapes.push(CollisionShape::read_mdl(&mut stream)?),
            _ => return Err(Error::UnsupportedBlock(token.to_string())),
        }
    }

    Ok(model)
}

fn read_version(stream: &mut TokenStream<'_>, model: &mut Model) -> Result<()> {
    stream.enter_block()?;
    while let Some(token) = stream.next_in_block()? {
        match token {
            "FormatVersion" => model.version = stream.read_u32()?,
            _ => return Err(Error::unknown_token("Version", token)),
        }
    }
    Ok(())
}

fn read_header(stream: &mut TokenStream<'_>, model: &mut Model) -> Result<()> {
    model.name = read_object_name(stream)?;
    while let Some(token) = stream.next_in_block()? {
        match token {
            _ if OBJECT_COUNT_KEYWORDS.contains(&token) => {
                stream.read_u32()?;
            }
            "BlendTime" => model.blend_time = stream.read_u32()?,
            _ if model.extent.read_mdl_token(stream, token)? => {}
            _ => return Err(Error::unknown_token("Model", token)),
        }
    }
    Ok(())
}

/// `Keyword count { Inner .. Inner .. }`; the count is not trusted.
fn read_numbered<T: Block>(stream: &mut TokenStream<'_>, keyword: &str, records: &mut Vec<T>) -> Result<()> {
    let _count = stream.read_u32()?;
    stream.enter_block()?;
    while let Some(token) = stream.next_in_block()? {
        if token != T::KEYWORD {
            return Err(Error::unknown_token(keyword, token));
        }
        records.push(T::read_mdl(stream)?);
    }
    Ok(())
}

fn read_global_sequences(stream: &mut TokenStream<'_>, model: &mut Model) -> Result<()> {
    let _count = stream.read_u32()?;
    stream.enter_block()?;
    while let Some(token) = stream.next_in_block()? {
        match token {
            "Duration" => model.global_sequences.push(stream.read_u32()?),
            _ => return Err(Error::unknown_token("GlobalSequences", token)),
        }
    }
    Ok(())
}

fn write_header(writer: &mut TokenWriter, model: &Model) -> Result<()> {
    writer.start_block("Version");
    writer.write_attrib("FormatVersion", model.version);
    writer.end_block();

    writer.start_object_block("Model", &model.name.to_str_lossy())?;
    if writer.settings().write_object_counts {
        let counts = model.object_counts();
        let values = [
            counts.geosets,
            counts.geoset_animations,
            counts.helpers,
            counts.lights,
            counts.bones,
            counts.attachments,
            counts.particle_emitters,
            counts.particle_emitters2,
            counts.ribbon_emitters,
            counts.event_objects,
        ];
        for (keyword, count) in OBJECT_COUNT_KEYWORDS.iter().zip(values) {
            if count > 0 {
                writer.write_attrib(keyword, count);
            }
        }
    }
    writer.write_attrib("BlendTime", model.blend_time);
    model.extent.write_mdl(writer);
    writer.end_block();
    Ok(())
}

fn write_numbered<T: Block>(writer: &mut TokenWriter, keyword: &str, records: &[T]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    writer.start_block_count(keyword, records.len());
    for record in records {
        record.write_mdl(writer)?;
    }
    writer.end_block();
    Ok(())
}

fn write_objects<T: Block>(writer: &mut TokenWriter, records: &[T]) -> Result<()> {
    for record in records {
        record.write_mdl(writer)?;
    }
    Ok(())
}

/// Encode a model as an MDL document.
///
/// Unknown binary chunks have no text form and are left out.
pub fn write_model(model: &Model, settings: &CodecSettings) -> Result<String> {
    let mut writer = TokenWriter::new(settings);
    writer.write_line(&format!("// Saved by mdlx {}", env!("CARGO_PKG_VERSION")));
    write_header(&mut writer, model)?;

    write_numbered(&mut writer, "Sequences", &model.sequences)?;
    if !model.global_sequences.is_empty() {
        writer.start_block_count("GlobalSequences", model.global_sequences.len());
        for duration in &model.global_sequences {
            writer.write_attrib("Duration", duration);
        }
        writer.end_block();
    }
    write_numbered(&mut writer, "Textures", &model.textures)?;
    write_numbered(&mut writer, "Materials", &model.materials)?;
    write_numbered(&mut writer, "TextureAnims", &model.texture_animations)?;
    write_objects(&mut writer, &model.geosets)?;
    write_objects(&mut writer, &model.geoset_animations)?;
    write_objects(&mut writer, &model.bones)?;
    write_objects(&mut writer, &model.lights)?;
    write_objects(&mut writer, &model.helpers)?;
    write_objects(&mut writer, &model.attachments)?;
    if !model.pivot_points.is_empty() {
        writer.start_block_count("PivotPoints", model.pivot_points.len());
        for point in &model.pivot_points {
            writer.write_float_array(&point.to_array());
        }
        writer.end_block();
    }
    write_objects(&mut writer, &model.particle_emitters)?;
    write_objects(&mut writer, &model.particle_emitters2)?;
    write_objects(&mut writer, &model.ribbon_emitters)?;
    write_objects(&mut writer, &model.cameras)?;
    write_objects(&mut writer, &model.event_objects)?;
    write_objects(&mut writer, &model.collision_shapes)?;

    if !model.unknown_chunks.is_empty() {
        let tags: Vec<String> = model.unknown_chunks.iter().map(|c| c.tag.to_string()).collect();
        tracing::warn!(tags = %tags.join(","), "unknown chunks have no MDL form and are dropped");
    }

    Ok(writer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
// Exported by hand
Version {
	FormatVersion 800,
}
Model "Crate" {
	NumBones 1,
	NumAttachments 5,
	BlendTime 150,
	MinimumExtent { -10, -10, 0 },
	MaximumExtent { 10, 10, 20 },
	BoundsRadius 15,
}
Sequences 3 {
	Anim "Stand" {
		Interval { 0, 1000 },
	}
}
GlobalSequences 1 {
	Duration 2000,
}
Bone "Root" {
	ObjectId 0,
	GeosetId Multiple,
	GeosetAnimId None,
}
PivotPoints 1 {
	{ 0, 0, 5 },
}
"#;

    #[test]
    fn test_read_sample() {
        let model = read_model(SAMPLE).unwrap();
        assert_eq!(model.version, 800);
        assert_eq!(model.name, "Crate");
        assert_eq!(model.blend_time, 150);
        assert_eq!(model.extent.bounds_radius, 15.0);
        assert_eq!(model.sequences.len(), 1);
        assert_eq!(model.sequences[0].interval, [0, 1000]);
        assert_eq!(model.global_sequences, vec![2000]);
        assert_eq!(model.bones.len(), 1);
        assert_eq!(model.pivot_points, vec![Vec3::new(0.0, 0.0, 5.0)]);
        // Declared counts are ignored.
        assert!(model.attachments.is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let model = read_model(SAMPLE).unwrap();
        let text = write_model(&model, &CodecSettings::default()).unwrap();
        assert!(text.contains("Model \"Crate\" {\n\tNumBones 1,\n\tBlendTime 150,\n"));
        assert!(text.contains("Sequences 1 {\n\tAnim \"Stand\" {\n"));
        assert_eq!(read_model(&text).unwrap(), model);
    }

    #[test]
    fn test_counts_can_be_disabled() {
        let model = read_model(SAMPLE).unwrap();
        let settings = CodecSettings {
            write_object_counts: false,
            ..CodecSettings::default()
        };
        let text = write_model(&model, &settings).unwrap();
        assert!(!text.contains("NumBones"));
    }

    #[test]
    fn test_unsupported_block() {
        let err = read_model("Version { FormatVersion 800, }\nTeapot { }").unwrap_err();
        assert!(matches!(err, Error::UnsupportedBlock(ref name) if name == "Teapot"));
    }

    #[test]
    fn test_wrong_inner_keyword() {
        let err = read_model("Textures 1 { Anim \"x\" { } }").unwrap_err();
        assert!(matches!(err, Error::UnknownToken { ref block, .. } if block == "Textures"));
    }

    #[test]
    fn test_unknown_chunks_dropped() {
        let mut model = Model::default();
        model
            .unknown_chunks
            .push(UnknownChunk::new(crate::util::Tag::new(b"FAFX"), vec![1, 2, 3]));
        let text = write_model(&model, &CodecSettings::default()).unwrap();
        assert!(read_model(&text).unwrap().unknown_chunks.is_empty());
    }
}
