//! Codec settings that affect how MDL text is written.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::util::Result;

/// Settings for the MDL writer.
///
/// Reading never depends on these; they only change the shape of emitted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    /// Digits after the decimal point for floats (trailing zeros are trimmed)
    pub fraction_digits: usize,
    /// One level of indentation
    pub indent: String,
    /// Emit `NumGeosets`, `NumBones`, ... in the `Model` block
    pub write_object_counts: bool,
}

/// Upper bound for `fraction_digits`; f32 carries no more than this.
const MAX_FRACTION_DIGITS: usize = 9;

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            fraction_digits: 6,
            indent: "\t".to_string(),
            write_object_counts: true,
        }
    }
}

impl CodecSettings {
    /// Parse settings from a JSON string, clamping out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.fraction_digits = settings.fraction_digits.min(MAX_FRACTION_DIGITS);
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
