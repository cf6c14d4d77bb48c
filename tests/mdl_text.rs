//! MDL parsing and writing through the public API.

use mdlx::mdl::TokenStream;
use mdlx::prelude::*;

fn tokens(source: &str) -> Vec<String> {
    let mut stream = TokenStream::new(source);
    let mut out = Vec::new();
    while let Some(token) = stream.read().unwrap() {
        out.push(token.to_string());
    }
    out
}

const FOOTMAN: &str = r#"// Hand-written model
Version {
	FormatVersion 800,
}
Model "Footman" {
	NumGeosets 9,
	NumBones 1,
	BlendTime 150,
	MinimumExtent { -20, -20, 0 },
	MaximumExtent { 20, 20, 80 },
	BoundsRadius 50,
}
Sequences 7 {
	Anim "Stand" {
		Interval { 0, 1000 },
	}
	Anim "Death" {
		Interval { 1000, 2500 },
		NonLooping,
		MoveSpeed 0,
	}
}
Textures 1 {
	Bitmap {
		Image "Textures\Footman.blp",
	}
}
Bone "Root" {
	ObjectId 0,
	GeosetId Multiple,
	GeosetAnimId None,
	Translation 2 {
		Linear,
		0: { 0, 0, 0 },
		500: { 0, 0, 10 },
	}
}
PivotPoints 1 {
	{ 0, 0, 5 },
}
"#;

#[test]
fn test_tokenizer_examples() {
    assert_eq!(tokens("This { Is A Test }"), ["This", "{", "Is", "A", "Test", "}"]);
    assert_eq!(tokens("This { Is A \"Test\" }"), ["This", "{", "Is", "A", "Test", "}"]);
}

#[test]
fn test_read_document() {
    let model = Model::from_mdl(FOOTMAN).unwrap();
    assert_eq!(model.version, 800);
    assert_eq!(model.name, "Footman");
    assert_eq!(model.blend_time, 150);
    assert_eq!(model.extent.max, Vec3::new(20.0, 20.0, 80.0));
    assert_eq!(model.extent.bounds_radius, 50.0);

    // Declared counts are not trusted.
    assert_eq!(model.sequences.len(), 2);
    assert!(model.sequences[1].is_non_looping());
    assert_eq!(model.textures[0].path, "Textures\\Footman.blp");

    let bone = &model.bones[0];
    assert_eq!(bone.object.name, "Root");
    assert_eq!(bone.geoset_id, -1);
    assert_eq!(bone.geoset_animation_id, -1);
    assert_eq!(bone.object.timelines.len(), 1);
    assert_eq!(bone.object.timelines[0].tag, AnimationTag::Translation);
    assert_eq!(bone.object.timelines[0].len(), 2);

    assert_eq!(model.pivot_points, vec![Vec3::new(0.0, 0.0, 5.0)]);
}

#[test]
fn test_object_counts_rewritten() {
    let text = Model::from_mdl(FOOTMAN).unwrap().to_mdl().unwrap();
    assert!(text.contains("\tNumBones 1,\n"));
    assert!(!text.contains("NumGeosets"));
    assert!(text.contains("Sequences 2 {\n"));
}

#[test]
fn test_byte_order_mark_skipped() {
    let text = format!("\u{feff}{}", FOOTMAN);
    assert_eq!(Model::from_mdl(&text).unwrap().name, "Footman");
}

#[test]
fn test_unknown_interpolation_falls_back() {
    let text = r#"
Bone "Root" {
	ObjectId 0,
	Translation 1 {
		Smoothstep,
		0: { 1, 2, 3 },
	}
}
"#;
    let model = Model::from_mdl(text).unwrap();
    let timeline = &model.bones[0].object.timelines[0];
    assert_eq!(timeline.interpolation(), Interpolation::DontInterp);
    assert_eq!(timeline.len(), 1);
}

#[test]
fn test_tangents_required_for_hermite() {
    let text = r#"
Bone "Root" {
	ObjectId 0,
	Translation 1 {
		Hermite,
		0: { 1, 2, 3 },
	}
}
"#;
    let err = Model::from_mdl(text).unwrap_err();
    assert!(matches!(err, Error::UnexpectedToken { ref expected, .. } if expected == "InTan"));
}

#[test]
fn test_unsupported_top_level_block() {
    let err = Model::from_mdl("Version { FormatVersion 800, }\nFaceFX \"x\" { }").unwrap_err();
    assert!(matches!(err, Error::UnsupportedBlock(ref name) if name == "FaceFX"));
}

#[test]
fn test_unknown_token_names_block() {
    let err = Model::from_mdl("Bone \"Root\" { ObjectId 0, Wobble 3, }").unwrap_err();
    assert!(matches!(err, Error::UnknownToken { ref token, .. } if token == "Wobble"));
}

#[test]
fn test_invalid_number() {
    let err = Model::from_mdl("Version {\n\tFormatVersion eight,\n}").unwrap_err();
    assert!(matches!(err, Error::InvalidNumber { ref token, line: 2 } if token == "eight"));
}

#[test]
fn test_unterminated_block() {
    let err = Model::from_mdl("Model \"Footman\" {\n\tBlendTime 150,\n").unwrap_err();
    assert!(matches!(err, Error::UnexpectedEnd(_)));
}

#[test]
fn test_unknown_chunks_dropped_from_text() {
    let mut model = Model::from_mdl(FOOTMAN).unwrap();
    model.unknown_chunks.push(UnknownChunk::new(Tag::new(b"FAFX"), vec![1, 2, 3]));
    let text = model.to_mdl().unwrap();
    assert!(!text.contains("FAFX"));
    assert!(Model::from_mdl(&text).unwrap().unknown_chunks.is_empty());
}

#[test]
fn test_settings_shape_output() {
    let mut model = Model::from_mdl(FOOTMAN).unwrap();
    model.extent.bounds_radius = 1.0 / 3.0;
    let settings = CodecSettings {
        fraction_digits: 2,
        indent: "  ".to_string(),
        write_object_counts: false,
    };
    let text = model.to_mdl_with(&settings).unwrap();
    assert!(text.contains("\n  BoundsRadius 0.33,\n"));
    assert!(!text.contains("NumBones"));
}

#[test]
fn test_large_geoset_parses_quickly() {
    let count = 60_000usize;
    let mut text = String::from("Version {\n\tFormatVersion 800,\n}\nGeoset {\n");
    for (keyword, stride) in [("Vertices", 3), ("Normals", 3), ("TVertices", 2)] {
        text.push_str(&format!("\t{} {} {{\n", keyword, count));
        for i in 0..count {
            let row = if stride == 3 { format!("{}, 1, 2", i) } else { format!("{}, 0.5", i) };
            text.push_str(&format!("\t\t{{ {} }},\n", row));
        }
        text.push_str("\t}\n");
    }
    text.push_str("\tVertexGroup {\n");
    for _ in 0..count {
        text.push_str("\t\t0,\n");
    }
    text.push_str("\t}\n\tFaces 1 3 {\n\t\tTriangles {\n\t\t\t{ 0, 1, 2 },\n\t\t}\n\t}\n");
    text.push_str("\tGroups 1 1 {\n\t\tMatrices { 0 },\n\t}\n\tMaterialID 0,\n\tSelectionGroup 0,\n}\n");

    let started = std::time::Instant::now();
    let model = Model::from_mdl(&text).unwrap();
    assert!(started.elapsed() < std::time::Duration::from_secs(10));

    let geoset = &model.geosets[0];
    assert_eq!(geoset.vertices.len(), count);
    assert_eq!(geoset.normals.len(), count);
    assert_eq!(geoset.uv_sets[0].len(), count);
    assert_eq!(geoset.vertex_groups.len(), count);
    assert_eq!(geoset.vertices[count - 1].x, (count - 1) as f32);
}

#[test]
fn test_error_line_after_large_list() {
    let mut text = String::from("Geoset {\n\tVertices 3 {\n");
    for _ in 0..3 {
        text.push_str("\t\t{ 0, 0, 0 },\n");
    }
    text.push_str("\t}\n\tMaterialID x,\n}\n");
    let err = Model::from_mdl(&text).unwrap_err();
    assert!(matches!(err, Error::InvalidNumber { ref token, line: 7 } if token == "x"));
}

#[test]
fn test_quote_in_name_fails_to_write() {
    let mut model = Model::from_mdl(FOOTMAN).unwrap();
    model.bones[0].object.name = "Bone \"Left\" Arm".into();
    let err = model.to_mdl().unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));
    // Binary fields have no quoting, so the same model still saves as MDX.
    assert!(model.to_mdx().is_ok());
}

#[test]
fn test_quote_in_path_fails_to_write() {
    let mut model = Model::from_mdl(FOOTMAN).unwrap();
    model.textures[0].path = "Textures\\\"odd\".blp".into();
    assert!(matches!(model.to_mdl(), Err(Error::InvalidState(_))));
}
