//! Animated property table.
//!
//! Every animatable property is identified by a four-byte tag in binary and
//! a keyword in text. The table is closed: a tag that is not listed here
//! cannot be loaded.

use crate::util::Tag;

/// Value shape stored by a property's keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueShape {
    Float,
    Vector3,
    Vector4,
    UInt32,
}

impl ValueShape {
    /// 32-bit words per value.
    pub fn width(self) -> usize {
        match self {
            ValueShape::Float | ValueShape::UInt32 => 1,
            ValueShape::Vector3 => 3,
            ValueShape::Vector4 => 4,
        }
    }
}

macro_rules! animation_tags {
    ($( $(#[$doc:meta])* $variant:ident = $tag:literal, $keyword:literal, $shape:ident; )*) => {
        /// Every known animated property.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum AnimationTag {
            $( $(#[$doc])* $variant, )*
        }

        impl AnimationTag {
            pub const ALL: &'static [AnimationTag] = &[$( AnimationTag::$variant, )*];

            /// Binary tag.
            pub const fn tag(self) -> Tag {
                match self {
                    $( AnimationTag::$variant => Tag::new($tag), )*
                }
            }

            /// Text keyword the property is written under.
            pub const fn keyword(self) -> &'static str {
                match self {
                    $( AnimationTag::$variant => $keyword, )*
                }
            }

            pub const fn shape(self) -> ValueShape {
                match self {
                    $( AnimationTag::$variant => ValueShape::$shape, )*
                }
            }

            /// Look up a binary tag.
            pub fn from_tag(tag: Tag) -> Option<Self> {
                match tag.as_bytes() {
                    $( $tag => Some(AnimationTag::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

animation_tags! {
    // Layer
    LayerTextureId = b"KMTF", "TextureID", UInt32;
    LayerAlpha = b"KMTA", "Alpha", Float;
    // Texture animation
    TextureTranslation = b"KTAT", "Translation", Vector3;
    TextureRotation = b"KTAR", "Rotation", Vector4;
    TextureScaling = b"KTAS", "Scaling", Vector3;
    // Geoset animation
    GeosetAlpha = b"KGAO", "Alpha", Float;
    GeosetColor = b"KGAC", "Color", Vector3;
    // Light
    LightAttenuationStart = b"KLAS", "AttenuationStart", Float;
    LightAttenuationEnd = b"KLAE", "AttenuationEnd", Float;
    LightColor = b"KLAC", "Color", Vector3;
    LightIntensity = b"KLAI", "Intensity", Float;
    LightAmbientIntensity = b"KLBI", "AmbIntensity", Float;
    LightAmbientColor = b"KLBC", "AmbColor", Vector3;
    LightVisibility = b"KLAV", "Visibility", Float;
    // Attachment
    AttachmentVisibility = b"KATV", "Visibility", Float;
    // Particle emitter
    EmitterEmissionRate = b"KPEE", "EmissionRate", Float;
    EmitterGravity = b"KPEG", "Gravity", Float;
    EmitterLongitude = b"KPLN", "Longitude", Float;
    EmitterLatitude = b"KPLT", "Latitude", Float;
    EmitterLifeSpan = b"KPEL", "LifeSpan", Float;
    EmitterSpeed = b"KPES", "InitVelocity", Float;
    EmitterVisibility = b"KPEV", "Visibility", Float;
    // Particle emitter 2
    Emitter2Speed = b"KP2S", "Speed", Float;
    Emitter2Variation = b"KP2R", "Variation", Float;
    Emitter2Latitude = b"KP2L", "Latitude", Float;
    Emitter2Gravity = b"KP2G", "Gravity", Float;
    Emitter2EmissionRate = b"KP2E", "EmissionRate", Float;
    Emitter2Length = b"KP2N", "Length", Float;
    Emitter2Width = b"KP2W", "Width", Float;
    Emitter2Visibility = b"KP2V", "Visibility", Float;
    // Ribbon emitter
    RibbonHeightAbove = b"KRHA", "HeightAbove", Float;
    RibbonHeightBelow = b"KRHB", "HeightBelow", Float;
    RibbonAlpha = b"KRAL", "Alpha", Float;
    RibbonColor = b"KRCO", "Color", Vector3;
    RibbonTextureSlot = b"KRTX", "TextureSlot", UInt32;
    RibbonVisibility = b"KRVS", "Visibility", Float;
    // Camera
    CameraTranslation = b"KCTR", "Translation", Vector3;
    CameraTargetTranslation = b"KTTR", "Translation", Vector3;
    CameraRotation = b"KCRL", "Rotation", UInt32;
    // Generic object
    Translation = b"KGTR", "Translation", Vector3;
    Rotation = b"KGRT", "Rotation", Vector4;
    Scaling = b"KGSC", "Scaling", Vector3;
}

impl AnimationTag {
    /// Translation, rotation and scaling, shared by every node type.
    pub fn is_generic(self) -> bool {
        matches!(
            self,
            AnimationTag::Translation | AnimationTag::Rotation | AnimationTag::Scaling
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lookup_every_entry() {
        for &entry in AnimationTag::ALL {
            assert_eq!(AnimationTag::from_tag(entry.tag()), Some(entry));
        }
    }

    #[test]
    fn test_tags_unique() {
        let tags: HashSet<Tag> = AnimationTag::ALL.iter().map(|t| t.tag()).collect();
        assert_eq!(tags.len(), AnimationTag::ALL.len());
        assert_eq!(AnimationTag::ALL.len(), 42);
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(AnimationTag::from_tag(Tag::new(b"KXXX")), None);
        assert_eq!(AnimationTag::from_tag(Tag::new(b"kgtr")), None);
    }

    #[test]
    fn test_shapes() {
        assert_eq!(AnimationTag::LayerTextureId.shape(), ValueShape::UInt32);
        assert_eq!(AnimationTag::Rotation.shape(), ValueShape::Vector4);
        assert_eq!(AnimationTag::CameraRotation.shape(), ValueShape::UInt32);
        assert_eq!(AnimationTag::LightAmbientColor.shape(), ValueShape::Vector3);
        assert_eq!(AnimationTag::Emitter2Width.shape(), ValueShape::Float);
    }

    #[test]
    fn test_keyword_shared_across_owners() {
        assert_eq!(AnimationTag::LightVisibility.keyword(), "Visibility");
        assert_eq!(AnimationTag::AttachmentVisibility.keyword(), "Visibility");
        assert_eq!(AnimationTag::CameraTargetTranslation.keyword(), "Translation");
        assert_eq!(AnimationTag::EmitterSpeed.keyword(), "InitVelocity");
    }

    #[test]
    fn test_generic_tags() {
        let generic: Vec<_> = AnimationTag::ALL.iter().filter(|t| t.is_generic()).collect();
        assert_eq!(generic.len(), 3);
        assert_eq!(AnimationTag::Translation.tag(), Tag::new(b"KGTR"));
    }
}
