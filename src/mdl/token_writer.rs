//! MDL text writer.

use std::fmt::Display;

use crate::config::CodecSettings;
use crate::util::{Error, Result};

/// Format a float with at most `digits` fraction digits, trimming trailing
/// zeros and the decimal point.
pub fn format_float(value: f32, digits: usize) -> String {
    let mut text = format!("{:.*}", digits, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// Quoted MDL strings have no escape sequence, so a `"` inside one cannot
/// be written.
fn quotable<'v>(keyword: &str, value: &'v str) -> Result<&'v str> {
    if value.contains('"') {
        return Err(Error::invalid_state(format!(
            "{} string {:?} contains a double quote",
            keyword, value
        )));
    }
    Ok(value)
}

/// Indenting line writer for MDL blocks.
///
/// Every method appends complete lines to an in-memory buffer. Only the
/// quoted-string writers can fail; [`TokenWriter::finish`] hands back the text.
#[derive(Debug)]
pub struct TokenWriter {
    out: String,
    depth: usize,
    settings: CodecSettings,
}

impl TokenWriter {
    pub fn new(settings: &CodecSettings) -> Self {
        Self {
            out: String::new(),
            depth: 0,
            settings: settings.clone(),
        }
    }

    pub fn settings(&self) -> &CodecSettings {
        &self.settings
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn unindent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Render a float with the configured precision.
    pub fn float(&self, value: f32) -> String {
        format_float(value, self.settings.fraction_digits)
    }

    fn floats(&self, values: &[f32]) -> String {
        let parts: Vec<String> = values.iter().map(|&v| self.float(v)).collect();
        format!("{{ {} }}", parts.join(", "))
    }

    fn list<T: Display>(values: &[T]) -> String {
        let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        format!("{{ {} }}", parts.join(", "))
    }

    /// Append one indented line.
    pub fn write_line(&mut self, line: &str) {
        for _ in 0..self.depth {
            self.out.push_str(&self.settings.indent);
        }
        self.out.push_str(line);
        self.out.push('\n');
    }

    /// `Keyword {`
    pub fn start_block(&mut self, keyword: &str) {
        self.write_line(&format!("{} {{", keyword));
        self.indent();
    }

    /// `Keyword count {`
    pub fn start_block_count(&mut self, keyword: &str, count: usize) {
        self.write_line(&format!("{} {} {{", keyword, count));
        self.indent();
    }

    /// `Keyword a b {`
    pub fn start_block_counts(&mut self, keyword: &str, first: usize, second: usize) {
        self.write_line(&format!("{} {} {} {{", keyword, first, second));
        self.indent();
    }

    /// `Keyword "name" {`
    pub fn start_object_block(&mut self, keyword: &str, name: &str) -> Result<()> {
        let name = quotable(keyword, name)?;
        self.write_line(&format!("{} \"{}\" {{", keyword, name));
        self.indent();
        Ok(())
    }

    /// `}`
    pub fn end_block(&mut self) {
        self.unindent();
        self.write_line("}");
    }

    /// `},`
    pub fn end_block_comma(&mut self) {
        self.unindent();
        self.write_line("},");
    }

    /// `Keyword,`
    pub fn write_flag(&mut self, keyword: &str) {
        self.write_line(&format!("{},", keyword));
    }

    /// `Keyword value,`
    pub fn write_attrib(&mut self, keyword: &str, value: impl Display) {
        self.write_line(&format!("{} {},", keyword, value));
    }

    pub fn write_float_attrib(&mut self, keyword: &str, value: f32) {
        let value = self.float(value);
        self.write_attrib(keyword, value);
    }

    /// `Keyword "value",`
    pub fn write_string_attrib(&mut self, keyword: &str, value: &str) -> Result<()> {
        let value = quotable(keyword, value)?;
        self.write_line(&format!("{} \"{}\",", keyword, value));
        Ok(())
    }

    /// `Keyword { a, b, c },`
    pub fn write_float_array_attrib(&mut self, keyword: &str, values: &[f32]) {
        let values = self.floats(values);
        self.write_line(&format!("{} {},", keyword, values));
    }

    /// `{ a, b, c },`
    pub fn write_float_array(&mut self, values: &[f32]) {
        let values = self.floats(values);
        self.write_line(&format!("{},", values));
    }

    pub fn write_array_attrib<T: Display>(&mut self, keyword: &str, values: &[T]) {
        self.write_line(&format!("{} {},", keyword, Self::list(values)));
    }

    pub fn write_array<T: Display>(&mut self, values: &[T]) {
        self.write_line(&format!("{},", Self::list(values)));
    }

    /// `Keyword { b, g, r },` from a red-green-blue color.
    pub fn write_color(&mut self, keyword: &str, color: [f32; 3]) {
        self.write_float_array_attrib(keyword, &[color[2], color[1], color[0]]);
    }

    /// `prefix value,` where a single element is written bare and anything
    /// longer as a braced array.
    pub fn write_keyframe(&mut self, prefix: &str, values: &[f32]) {
        let value = match values {
            [single] => self.float(*single),
            _ => self.floats(values),
        };
        self.write_line(&format!("{} {},", prefix, value));
    }

    pub fn write_keyframe_u32(&mut self, prefix: &str, value: u32) {
        self.write_line(&format!("{} {},", prefix, value));
    }

    /// A bare `value,` line.
    pub fn write_value(&mut self, value: impl Display) {
        self.write_line(&format!("{},", value));
    }
}
