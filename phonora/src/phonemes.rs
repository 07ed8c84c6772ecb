use std::sync::Arc;

use serde::Serialize;

use crate::dict::PhonemeSource;
use crate::text::{normalize_word, tokenize};

/// A normalized word and its stress-free phonemes; empty phonemes mean out-of-vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhonemeEntry {
    pub word: String,
    pub phonemes: Vec<String>,
}

impl PhonemeEntry {
    pub fn new(word: impl Into<String>, phonemes: Vec<String>) -> Self {
        Self {
            word: word.into(),
            phonemes,
        }
    }

    pub fn is_out_of_vocabulary(&self) -> bool {
        self.phonemes.is_empty()
    }

    /// Phonemes joined with single spaces, order preserved.
    pub fn joined(&self) -> String {
        self.phonemes.join(" ")
    }
}

/// One [`PhonemeEntry`] per whitespace token of a sentence, in sentence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TranscriptPhonemes(Vec<PhonemeEntry>);

impl TranscriptPhonemes {
    pub fn new(entries: Vec<PhonemeEntry>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PhonemeEntry> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhonemeEntry> {
        self.0.iter()
    }

    pub fn words(&self) -> Vec<&str> {
        self.0.iter().map(|entry| entry.word.as_str()).collect()
    }

    pub fn into_inner(self) -> Vec<PhonemeEntry> {
        self.0
    }
}

impl From<Vec<PhonemeEntry>> for TranscriptPhonemes {
    fn from(entries: Vec<PhonemeEntry>) -> Self {
        Self(entries)
    }
}

impl FromIterator<PhonemeEntry> for TranscriptPhonemes {
    fn from_iter<I: IntoIterator<Item = PhonemeEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TranscriptPhonemes {
    type Item = &'a PhonemeEntry;
    type IntoIter = std::slice::Iter<'a, PhonemeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Sentence → phonemes. The reference sentence and the recognized transcript
/// both go through [`Transcriber::transcribe`] so that stress removal and
/// lookup policy are identical on both sides.
#[derive(Clone)]
pub struct Transcriber {
    source: Arc<dyn PhonemeSource>,
}

impl Transcriber {
    pub fn new(source: Arc<dyn PhonemeSource>) -> Self {
        Self { source }
    }

    pub fn transcribe(&self, sentence: &str) -> TranscriptPhonemes {
        let transcript: TranscriptPhonemes = tokenize(sentence)
            .into_iter()
            .map(|token| {
                let word = normalize_word(token);
                let phonemes = self.source.lookup(&word);
                PhonemeEntry { word, phonemes }
            })
            .collect();

        let oov = transcript.iter().filter(|e| e.is_out_of_vocabulary()).count();
        if oov > 0 {
            log::debug!(
                "{oov} of {} words out of vocabulary in {sentence:?}",
                transcript.len()
            );
        }
        transcript
    }
}
