//! Frequency catalog: the tones a round can draw from.
//!
//! Catalogs are ordered lowest frequency first. The built-in catalog pairs
//! each frequency with the age group that can usually still hear it; custom
//! catalogs can be loaded from TOML files.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A single test tone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tone {
    /// Frequency in hertz.
    pub frequency_hz: u32,
    /// Age group expected to hear this tone (e.g. "< 30").
    pub age_label: String,
}

impl Tone {
    pub fn new(frequency_hz: u32, age_label: impl Into<String>) -> Self {
        Self {
            frequency_hz,
            age_label: age_label.into(),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz ({})", self.frequency_hz, self.age_label)
    }
}

/// An ordered, validated list of tones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    tones: Vec<Tone>,
}

const STANDARD_TONES: &[(u32, &str)] = &[
    (440, "0+"),
    (8000, "0+"),
    (12000, "< 50"),
    (15000, "< 40"),
    (16000, "< 30"),
    (17000, "< 24"),
    (17400, "< 18"),
];

impl Catalog {
    /// Build a catalog, rejecting empty, zero-frequency, duplicate, or
    /// unordered entries.
    pub fn new(tones: Vec<Tone>) -> Result<Self, CatalogError> {
        if tones.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, tone) in tones.iter().enumerate() {
            if tone.frequency_hz == 0 {
                return Err(CatalogError::InvalidFrequency { index });
            }
        }
        for pair in tones.windows(2) {
            let (previous, next) = (pair[0].frequency_hz, pair[1].frequency_hz);
            if previous == next {
                return Err(CatalogError::DuplicateFrequency(next));
            }
            if previous > next {
                return Err(CatalogError::Unordered { previous, next });
            }
        }
        Ok(Self { tones })
    }

    /// The built-in seven-tone catalog, 440 Hz to 17.4 kHz.
    pub fn standard() -> Self {
        Self {
            tones: STANDARD_TONES
                .iter()
                .map(|&(hz, age)| Tone::new(hz, age))
                .collect(),
        }
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    pub fn contains(&self, tone: &Tone) -> bool {
        self.tones.iter().any(|t| t.frequency_hz == tone.frequency_hz)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// On-disk catalog layout.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    #[serde(default)]
    tones: Vec<Tone>,
}

/// Load and validate a catalog from a TOML file.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a catalog from a TOML string (useful for testing).
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    Catalog::new(parsed.tones)
        .with_context(|| format!("invalid catalog: {}", source_path.display()))
}
