//! Keyframe interpolation modes.

use crate::util::{Error, Result};

/// How values between keyframes are computed.
///
/// The binary index follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interpolation {
    #[default]
    DontInterp,
    Linear,
    Bezier,
    Hermite,
}

impl Interpolation {
    pub const ALL: [Interpolation; 4] = [
        Interpolation::DontInterp,
        Interpolation::Linear,
        Interpolation::Bezier,
        Interpolation::Hermite,
    ];

    /// Binary index of this mode.
    #[inline]
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Mode for a binary index; indices past `Hermite` are a format error.
    pub fn from_index(index: u32) -> Result<Self> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| Error::invalid(format!("interpolation index {} out of range", index)))
    }

    /// Bezier and hermite keyframes carry in and out tangents.
    #[inline]
    pub fn is_tangential(self) -> bool {
        self.index() > 1
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Interpolation::DontInterp => "DontInterp",
            Interpolation::Linear => "Linear",
            Interpolation::Bezier => "Bezier",
            Interpolation::Hermite => "Hermite",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.keyword() == keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_order() {
        for (i, mode) in Interpolation::ALL.iter().enumerate() {
            assert_eq!(mode.index() as usize, i);
            assert_eq!(Interpolation::from_index(i as u32).unwrap(), *mode);
        }
        assert!(Interpolation::from_index(4).unwrap_err().is_format_error());
    }

    #[test]
    fn test_tangential() {
        assert!(!Interpolation::DontInterp.is_tangential());
        assert!(!Interpolation::Linear.is_tangential());
        assert!(Interpolation::Bezier.is_tangential());
        assert!(Interpolation::Hermite.is_tangential());
    }

    #[test]
    fn test_keywords() {
        assert_eq!(Interpolation::from_keyword("Hermite"), Some(Interpolation::Hermite));
        assert_eq!(Interpolation::from_keyword("hermite"), None);
        assert_eq!(Interpolation::Bezier.keyword(), "Bezier");
    }
}
