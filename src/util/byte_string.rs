//! Names and paths stored as raw bytes.

use std::borrow::Cow;
use std::fmt;

/// Contents of a fixed-width MDX string field, without its NUL padding.
///
/// Community models often carry names in a legacy code page (CP949, GBK,
/// CP1251). The bytes are kept untouched so a binary load and save returns
/// the same file; text output decodes them lossily as UTF-8.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteString(Vec<u8>);

impl ByteString {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Some` when the bytes are valid UTF-8.
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// UTF-8 view with invalid sequences replaced by U+FFFD.
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ByteString {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for ByteString {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for ByteString {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl PartialEq<str> for ByteString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for ByteString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<[u8]> for ByteString {
    fn eq(&self, other: &[u8]) -> bool {
        self.0 == other
    }
}

impl fmt::Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_str_lossy())
    }
}

impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_str() {
            Some(s) => fmt::Debug::fmt(s, f),
            None => write!(f, "ByteString({:02X?})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_with_str() {
        let name = ByteString::from("Root");
        assert_eq!(name, "Root");
        assert!(name != "Bone");
        assert_eq!(name.len(), 4);
        assert!(ByteString::new().is_empty());
    }

    #[test]
    fn test_invalid_utf8_kept() {
        let name = ByteString::from(vec![0xC7, 0xD1]);
        assert_eq!(name.as_bytes(), &[0xC7, 0xD1]);
        assert_eq!(name.to_str(), None);
        assert_eq!(name.to_string(), "\u{fffd}\u{fffd}");
        assert_eq!(format!("{:?}", name), "ByteString([C7, D1])");
    }

    #[test]
    fn test_debug_utf8() {
        assert_eq!(format!("{:?}", ByteString::from("Épée")), "\"Épée\"");
    }
}
