//! Parser for Tesseract's TSV output.

use crate::model::{Rect, TextRegion};
use std::collections::BTreeMap;

/// Tesseract hierarchy level of a single word.
const WORD_LEVEL: u32 = 5;

/// Key that identifies one text line: (page, block, paragraph, line).
type LineKey = (u32, u32, u32, u32);

#[derive(Debug)]
struct Word {
    key: LineKey,
    word_num: u32,
    rect: Rect,
    conf: f32,
    text: String,
}

#[derive(Default)]
struct LineAccumulator {
    words: Vec<Word>,
}

impl LineAccumulator {
    fn into_region(mut self) -> Option<TextRegion> {
        if self.words.is_empty() {
            return None;
        }
        self.words.sort_by_key(|w| w.word_num);

        let mut bounds = self.words[0].rect;
        let mut conf_sum = 0.0;
        for word in &self.words {
            bounds = bounds.union(&word.rect);
            conf_sum += word.conf;
        }
        let confidence = (conf_sum / self.words.len() as f32 / 100.0).clamp(0.0, 1.0);
        let text = self
            .words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Some(TextRegion::from_rect(text, bounds, confidence))
    }
}

/// Parse Tesseract TSV into one region per text line.
///
/// Rows other than recognized words are ignored, as are words with negative
/// confidence or blank text. Malformed rows are skipped.
pub fn parse_tsv(tsv: &str) -> Vec<TextRegion> {
    let mut lines: BTreeMap<LineKey, LineAccumulator> = BTreeMap::new();

    for (line_no, row) in tsv.lines().enumerate() {
        if row.trim().is_empty() || row.starts_with("level") {
            continue;
        }
        match parse_row(row) {
            Some(Some(word)) => lines.entry(word.key).or_default().words.push(word),
            Some(None) => {}
            None => log::warn!("Skipping malformed TSV row {}: {:?}", line_no + 1, row),
        }
    }

    lines
        .into_values()
        .filter_map(LineAccumulator::into_region)
        .collect()
}

/// `None` for a malformed row, `Some(None)` for a valid row that is not a word.
fn parse_row(row: &str) -> Option<Option<Word>> {
    let fields: Vec<&str> = row.splitn(12, '\t').collect();
    if fields.len() < 11 {
        return None;
    }

    let num = |idx: usize| fields[idx].trim().parse::<u32>().ok();
    let int = |idx: usize| fields[idx].trim().parse::<i32>().ok();

    let level = num(0)?;
    let key = (num(1)?, num(2)?, num(3)?, num(4)?);
    let word_num = num(5)?;
    let (left, top) = (int(6)?, int(7)?);
    let (width, height) = (num(8)?, num(9)?);
    let conf: f32 = fields[10].trim().parse().ok()?;
    let text = fields.get(11).map(|t| t.trim()).unwrap_or("");

    if level != WORD_LEVEL || conf < 0.0 || text.is_empty() {
        return Some(None);
    }

    Some(Some(Word {
        key,
        word_num,
        rect: Rect::new(left, top, width, height),
        conf,
        text: text.to_string(),
    }))
}
