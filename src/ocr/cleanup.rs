//! Cleanup of recognized text before it reaches the diagram.

use crate::model::TextRegion;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPreset {
    /// Unicode NFC normalization and whitespace only
    Minimal,
    /// NFC + control character removal + noise filtering
    #[default]
    Standard,
    /// Standard plus ligature folding, PUA removal and single-character drop
    Aggressive,
}

/// Options for text cleanup.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Remove control characters and U+FFFD
    pub remove_control_chars: bool,

    /// Remove Private Use Area characters
    pub remove_pua: bool,

    /// Fold typographic ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Drop text made only of punctuation or symbols
    pub drop_symbol_noise: bool,

    /// Drop text shorter than this many characters after cleanup
    pub min_chars: usize,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Minimal => Self {
                normalize_unicode: true,
                remove_control_chars: false,
                remove_pua: false,
                fix_ligatures: false,
                drop_symbol_noise: false,
                min_chars: 1,
            },
            CleanupPreset::Standard => Self {
                normalize_unicode: true,
                remove_control_chars: true,
                remove_pua: false,
                fix_ligatures: false,
                drop_symbol_noise: true,
                min_chars: 1,
            },
            CleanupPreset::Aggressive => Self {
                normalize_unicode: true,
                remove_control_chars: true,
                remove_pua: true,
                fix_ligatures: true,
                drop_symbol_noise: true,
                min_chars: 2,
            },
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::from_preset(CleanupPreset::Standard)
    }
}

/// Text cleanup applied to OCR output.
pub struct TextCleanup {
    options: CleanupOptions,
    whitespace_regex: Regex,
    symbol_noise_regex: Regex,
    ligature_map: Vec<(&'static str, &'static str)>,
}

impl TextCleanup {
    /// Create a new cleanup with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self {
            options,
            whitespace_regex: Regex::new(r"\s+").unwrap(),
            symbol_noise_regex: Regex::new(r"^[\p{P}\p{S}\s]+$").unwrap(),
            ligature_map: vec![
                ("\u{FB00}", "ff"),
                ("\u{FB01}", "fi"),
                ("\u{FB02}", "fl"),
                ("\u{FB03}", "ffi"),
                ("\u{FB04}", "ffl"),
            ],
        }
    }

    /// Create a cleanup from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Clean one piece of text. Returns `None` when nothing useful is left.
    pub fn clean(&self, text: &str) -> Option<String> {
        let mut result: String = if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        if self.options.fix_ligatures {
            for (ligature, replacement) in &self.ligature_map {
                result = result.replace(ligature, replacement);
            }
        }

        if self.options.remove_control_chars {
            result = result
                .chars()
                .filter(|c| *c != '\u{FFFD}' && (!c.is_control() || c.is_whitespace()))
                .collect();
        }

        if self.options.remove_pua {
            result = result
                .chars()
                .filter(|c| {
                    let code = *c as u32;
                    !(0xE000..=0xF8FF).contains(&code)
                        && !(0xF0000..=0xFFFFD).contains(&code)
                        && !(0x100000..=0x10FFFD).contains(&code)
                })
                .collect();
        }

        let result = self
            .whitespace_regex
            .replace_all(&result, " ")
            .trim()
            .to_string();

        if result.is_empty() || result.chars().count() < self.options.min_chars {
            return None;
        }
        if self.options.drop_symbol_noise && self.symbol_noise_regex.is_match(&result) {
            return None;
        }
        Some(result)
    }

    /// Clean every region, dropping those with no text left.
    pub fn apply(&self, regions: Vec<TextRegion>) -> Vec<TextRegion> {
        let before = regions.len();
        let cleaned: Vec<TextRegion> = regions
            .into_iter()
            .filter_map(|mut region| {
                let text = self.clean(&region.text)?;
                region.text = text;
                Some(region)
            })
            .collect();
        if cleaned.len() < before {
            log::debug!("Text cleanup dropped {} regions", before - cleaned.len());
        }
        cleaned
    }
}

impl Default for TextCleanup {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}
