use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assess::align::align_words;
use crate::error::Error;
use crate::phonemes::{PhonemeEntry, TranscriptPhonemes};

/// Verdict for one reference word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PronunciationStatus {
    #[serde(rename = "CORRECT")]
    Correct,
    #[serde(rename = "MISPRONOUNCED")]
    Mispronounced,
    #[serde(rename = "NOT SPOKEN")]
    NotSpoken,
}

impl PronunciationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "CORRECT",
            Self::Mispronounced => "MISPRONOUNCED",
            Self::NotSpoken => "NOT SPOKEN",
        }
    }
}

impl fmt::Display for PronunciationStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How reference words are paired with recognized words before judging them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentStrategy {
    /// Reference word `i` is compared with recognized word `i`.
    #[default]
    Positional,
    /// Words are first aligned by word-level edit distance, so a single
    /// dropped or inserted word does not shift every later verdict.
    WordEdit,
}

impl FromStr for AlignmentStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positional" => Ok(Self::Positional),
            "word-edit" | "word_edit" | "wordedit" => Ok(Self::WordEdit),
            other => Err(Error::invalid_input(format!(
                "unknown alignment strategy '{other}' (expected positional or word-edit)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordVerdict {
    /// Index of the word in the reference sentence.
    pub position: usize,
    /// Normalized reference word.
    pub word: String,
    pub status: PronunciationStatus,
    /// Edit distance between the joined phoneme strings, when they were compared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phoneme_distance: Option<usize>,
}

impl WordVerdict {
    pub fn new(position: usize, word: impl Into<String>, status: PronunciationStatus) -> Self {
        Self {
            position,
            word: word.into(),
            status,
            phoneme_distance: None,
        }
    }

    pub fn not_spoken(position: usize, word: impl Into<String>) -> Self {
        Self::new(position, word, PronunciationStatus::NotSpoken)
    }
}

/// Per-occurrence verdicts in reference order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Classification(Vec<WordVerdict>);

impl Classification {
    pub fn verdicts(&self) -> &[WordVerdict] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WordVerdict> {
        self.0.iter()
    }

    pub fn status_at(&self, position: usize) -> Option<PronunciationStatus> {
        self.0.get(position).map(|v| v.status)
    }

    /// Word-keyed view. A repeated word keeps the status of its last occurrence.
    pub fn to_map(&self) -> HashMap<String, PronunciationStatus> {
        self.0
            .iter()
            .map(|v| (v.word.clone(), v.status))
            .collect()
    }
}

impl FromIterator<WordVerdict> for Classification {
    fn from_iter<I: IntoIterator<Item = WordVerdict>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Classification {
    type Item = &'a WordVerdict;
    type IntoIter = std::slice::Iter<'a, WordVerdict>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Positional classification of every reference word.
pub fn classify(reference: &TranscriptPhonemes, recognized: &TranscriptPhonemes) -> Classification {
    classify_with(AlignmentStrategy::Positional, reference, recognized)
}

pub fn classify_with(
    strategy: AlignmentStrategy,
    reference: &TranscriptPhonemes,
    recognized: &TranscriptPhonemes,
) -> Classification {
    match strategy {
        AlignmentStrategy::Positional => reference
            .iter()
            .enumerate()
            .map(|(i, expected)| judge(i, expected, recognized.get(i)))
            .collect(),
        AlignmentStrategy::WordEdit => {
            let pairing = align_words(&reference.words(), &recognized.words());
            reference
                .iter()
                .zip(pairing)
                .enumerate()
                .map(|(i, (expected, paired))| {
                    judge(i, expected, paired.and_then(|j| recognized.get(j)))
                })
                .collect()
        }
    }
}

// Gates, in order: nothing heard, different word, missing phonemes, phoneme distance.
fn judge(position: usize, expected: &PhonemeEntry, heard: Option<&PhonemeEntry>) -> WordVerdict {
    let Some(heard) = heard else {
        return WordVerdict::not_spoken(position, &expected.word);
    };
    if heard.word != expected.word {
        return WordVerdict::new(position, &expected.word, PronunciationStatus::Mispronounced);
    }
    if expected.is_out_of_vocabulary() || heard.is_out_of_vocabulary() {
        return WordVerdict::new(position, &expected.word, PronunciationStatus::Mispronounced);
    }

    let distance = strsim::levenshtein(&expected.joined(), &heard.joined());
    let status = if distance == 0 {
        PronunciationStatus::Correct
    } else {
        PronunciationStatus::Mispronounced
    };
    WordVerdict {
        phoneme_distance: Some(distance),
        ..WordVerdict::new(position, &expected.word, status)
    }
}
