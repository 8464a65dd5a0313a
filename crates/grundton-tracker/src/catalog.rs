//! Catalog of string frequency bands.
//!
//! Every tracked string is described by the band its fundamental can fall in:
//! the open-string pitch at the bottom and roughly the 24th fret at the top.
//! The catalog is fixed at startup; a profile's identity is its position.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use thiserror::Error;

/// Errors building a catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// A pair of channels needs at least two profiles.
    #[error("catalog needs at least 2 string profiles, got {0}")]
    TooFewProfiles(usize),

    /// Band bounds must be finite with `0 < low < high`.
    #[error("string '{name}': invalid band {low_hz} Hz .. {high_hz} Hz")]
    InvalidBand {
        /// Profile name.
        name: String,
        /// Requested lower bound.
        low_hz: f32,
        /// Requested upper bound.
        high_hz: f32,
    },
}

/// Catalog index out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("string index {index} out of range for a catalog of {len}")]
pub struct IndexError {
    /// Requested index.
    pub index: usize,
    /// Catalog length.
    pub len: usize,
}

/// A named band of expected fundamentals.
#[derive(Debug, Clone, PartialEq)]
pub struct StringProfile {
    name: Cow<'static, str>,
    low_hz: f32,
    high_hz: f32,
}

impl StringProfile {
    /// Compile-time profile. Bounds are not checked.
    pub const fn new_static(name: &'static str, low_hz: f32, high_hz: f32) -> Self {
        Self {
            name: Cow::Borrowed(name),
            low_hz,
            high_hz,
        }
    }

    /// Checked profile.
    pub fn new(name: impl Into<Cow<'static, str>>, low_hz: f32, high_hz: f32) -> Result<Self, CatalogError> {
        let name = name.into();
        let valid = low_hz.is_finite() && high_hz.is_finite() && low_hz > 0.0 && low_hz < high_hz;
        if !valid {
            return Err(CatalogError::InvalidBand {
                name: name.into_owned(),
                low_hz,
                high_hz,
            });
        }
        Ok(Self { name, low_hz, high_hz })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowest expected fundamental (Hz).
    pub fn low_hz(&self) -> f32 {
        self.low_hz
    }

    /// Highest expected fundamental (Hz).
    pub fn high_hz(&self) -> f32 {
        self.high_hz
    }
}

/// Six-string guitar in standard tuning plus two full-range slots.
pub const GUITAR: [StringProfile; 8] = [
    StringProfile::new_static("e", 73.4, 329.6),
    StringProfile::new_static("A", 98.0, 493.9),
    StringProfile::new_static("D", 146.8, 659.3),
    StringProfile::new_static("G", 185.0, 880.9),
    StringProfile::new_static("B", 246.9, 1108.7),
    StringProfile::new_static("E", 293.7, 1318.5),
    StringProfile::new_static("*", 73.4, 1318.5),
    StringProfile::new_static("*", 73.4, 1318.5),
];

/// Ordered, immutable list of at least two string profiles.
///
/// ```rust
/// use grundton_tracker::StringCatalog;
///
/// let catalog = StringCatalog::guitar();
/// assert_eq!(catalog.len(), 8);
/// assert_eq!(catalog.profile_at(1).unwrap().name(), "A");
/// assert!(catalog.profile_at(8).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StringCatalog {
    profiles: Vec<StringProfile>,
}

impl StringCatalog {
    /// The compiled-in guitar catalog.
    pub fn guitar() -> Self {
        Self {
            profiles: GUITAR.to_vec(),
        }
    }

    /// Catalog from `profiles`, re-checking every band.
    pub fn new(profiles: Vec<StringProfile>) -> Result<Self, CatalogError> {
        if profiles.len() < 2 {
            return Err(CatalogError::TooFewProfiles(profiles.len()));
        }
        for p in &profiles {
            StringProfile::new(p.name.clone(), p.low_hz, p.high_hz)?;
        }
        Ok(Self { profiles })
    }

    /// Number of profiles (always at least 2).
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Largest valid base index of a channel pair (`len - 2`).
    pub fn last_base_index(&self) -> usize {
        self.profiles.len().saturating_sub(2)
    }

    /// Profile at `index`.
    pub fn profile_at(&self, index: usize) -> Result<&StringProfile, IndexError> {
        self.profiles.get(index).ok_or(IndexError {
            index,
            len: self.profiles.len(),
        })
    }

    /// Profiles in order.
    pub fn iter(&self) -> core::slice::Iter<'_, StringProfile> {
        self.profiles.iter()
    }
}

impl Default for StringCatalog {
    fn default() -> Self {
        Self::guitar()
    }
}

impl<'a> IntoIterator for &'a StringCatalog {
    type Item = &'a StringProfile;
    type IntoIter = core::slice::Iter<'a, StringProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn guitar_catalog_is_valid() {
        let catalog = StringCatalog::new(GUITAR.to_vec()).unwrap();
        assert_eq!(catalog, StringCatalog::guitar());
        assert_eq!(catalog.last_base_index(), 6);
        for p in &catalog {
            assert!(p.low_hz() < p.high_hz());
        }
    }

    #[test]
    fn rejects_short_catalogs() {
        let one = vec![StringProfile::new("x", 100.0, 200.0).unwrap()];
        assert_eq!(StringCatalog::new(one), Err(CatalogError::TooFewProfiles(1)));
        assert_eq!(StringCatalog::new(Vec::new()), Err(CatalogError::TooFewProfiles(0)));
    }

    #[test]
    fn rejects_bad_bands() {
        for (low, high) in [(0.0, 100.0), (200.0, 100.0), (100.0, 100.0), (f32::NAN, 100.0), (50.0, f32::INFINITY)] {
            assert!(StringProfile::new("bad", low, high).is_err(), "{low}..{high}");
        }
        let unchecked = vec![
            StringProfile::new_static("ok", 80.0, 300.0),
            StringProfile::new_static("bad", 300.0, 80.0),
        ];
        assert!(matches!(StringCatalog::new(unchecked), Err(CatalogError::InvalidBand { .. })));
    }

    #[test]
    fn index_error_reports_bounds() {
        let catalog = StringCatalog::guitar();
        assert_eq!(catalog.profile_at(11), Err(IndexError { index: 11, len: 8 }));
    }

    #[cfg(feature = "std")]
    #[test]
    fn errors_display() {
        let err = StringProfile::new("low", 300.0, 80.0).unwrap_err();
        assert_eq!(err.to_string(), "string 'low': invalid band 300 Hz .. 80 Hz");
        let err = IndexError { index: 9, len: 8 };
        assert_eq!(err.to_string(), "string index 9 out of range for a catalog of 8");
    }
}
