use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

const BUILTIN_LEXICON: &str = include_str!("../../assets/lexicon.json");

fn unit_intensity() -> f64 {
    1.0
}

/// Scores attached to a single lexicon word.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LexiconEntry {
    pub polarity: f64,
    pub subjectivity: f64,
    /// Multiplier applied to the following word; `1.0` for ordinary words.
    #[serde(default = "unit_intensity")]
    pub intensity: f64,
}

impl LexiconEntry {
    pub fn is_intensifier(&self) -> bool {
        (self.intensity - 1.0).abs() > f64::EPSILON
    }
}

/// Word → scores map, keyed by lowercase word.
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: HashMap<String, LexiconEntry>,
}

impl Lexicon {
    /// The lexicon shipped in `assets/lexicon.json`.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_LEXICON).context("Built-in lexicon is malformed")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon {:?}", path))?;
        Self::from_json(&json).with_context(|| format!("Failed to parse lexicon {:?}", path))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, LexiconEntry> = serde_json::from_str(json)?;
        let entries = raw
            .into_iter()
            .map(|(word, entry)| (word.to_lowercase(), entry))
            .collect();
        Ok(Lexicon { entries })
    }

    pub fn get(&self, word: &str) -> Option<&LexiconEntry> {
        self.entries.get(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
