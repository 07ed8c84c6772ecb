//! Reader for the CMU pronouncing dictionary text format.
//!
//! ```text
//! ;;; comment line
//! aluminium AH0 L UW1 M IH0 N AH0 M
//! aluminium(2) AE2 L Y UW1 M IH0 N AH0 M
//! achill AE1 K IH0 L # place, irish
//! ```
//!
//! Vowel phonemes carry a stress digit (`0` none, `1` primary, `2`
//! secondary). Scoring ignores stress, so [`PhonemeDictionary::lookup`]
//! strips it.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    // Matches the "(N)" suffix marking an alternate pronunciation, e.g. "aluminium(2)".
    static ref VARIANT_RE: Regex = Regex::new(r"^(.+)\((\d+)\)$").unwrap();
}

/// One pronunciation: phoneme symbols as listed, stress digits included.
pub type Pronunciation = Vec<String>;

/// Word → pronunciation variants, keyed by lower-cased term.
#[derive(Debug, Clone, Default)]
pub struct PhonemeDictionary {
    entries: HashMap<String, Vec<Pronunciation>>,
}

impl PhonemeDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a dictionary file in cmudict format.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io("opening phonetic dictionary", e))?;
        let dict = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "loaded {} dictionary words from {}",
            dict.len(),
            path.display()
        );
        Ok(dict)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut dict = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::io("reading phonetic dictionary", e))?;
            if let Some((term, phonemes)) = parse_line(&line, idx + 1)? {
                dict.entries.entry(term).or_default().push(phonemes);
            }
        }
        Ok(dict)
    }

    /// Builds a dictionary from `(word, phonemes)` pairs; repeated words add variants.
    pub fn from_entries<I, W, P, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (W, P)>,
        W: AsRef<str>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dict = Self::new();
        for (word, phonemes) in entries {
            dict.insert(word.as_ref(), phonemes);
        }
        dict
    }

    /// Appends a pronunciation variant for `word`.
    pub fn insert<S: Into<String>>(&mut self, word: &str, phonemes: impl IntoIterator<Item = S>) {
        let phonemes: Pronunciation = phonemes.into_iter().map(Into::into).collect();
        self.entries
            .entry(word.to_lowercase())
            .or_default()
            .push(phonemes);
    }

    /// First pronunciation of an already-normalized word with stress removed.
    ///
    /// Unknown words yield an empty sequence. The argument is not normalized
    /// here; callers run [`normalize_word`](crate::text::normalize_word) first.
    pub fn lookup(&self, normalized_word: &str) -> Vec<String> {
        self.entries
            .get(normalized_word)
            .and_then(|variants| variants.first())
            .map(|phonemes| {
                phonemes
                    .iter()
                    .map(|symbol| strip_stress(symbol).to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All variants for a word, in dictionary order, stress digits intact.
    pub fn variants(&self, normalized_word: &str) -> &[Pronunciation] {
        self.entries
            .get(normalized_word)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, normalized_word: &str) -> bool {
        self.entries.contains_key(normalized_word)
    }

    /// Number of distinct words (not variants).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Removes trailing stress digits: `"AH1"` → `"AH"`, `"N"` → `"N"`.
pub fn strip_stress(symbol: &str) -> &str {
    symbol.trim_end_matches(|c: char| c.is_ascii_digit())
}

fn parse_line(line: &str, line_no: usize) -> Result<Option<(String, Pronunciation)>> {
    if line.starts_with(";;;") {
        return Ok(None);
    }
    // Strip inline comments ('#' through the end of line).
    let content = match line.find('#') {
        Some(start) => &line[..start],
        None => line,
    };

    let mut tokens = content.split_whitespace();
    let Some(raw_term) = tokens.next() else {
        return Ok(None);
    };
    let term = match VARIANT_RE.captures(raw_term) {
        Some(caps) => caps[1].to_lowercase(),
        None => raw_term.to_lowercase(),
    };

    let phonemes: Pronunciation = tokens.map(str::to_string).collect();
    if phonemes.is_empty() {
        return Err(Error::parse(
            line_no,
            format!("entry '{raw_term}' has no phonemes"),
        ));
    }
    Ok(Some((term, phonemes)))
}
