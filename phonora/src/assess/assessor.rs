use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::assess::classify::{
    classify_with, AlignmentStrategy, Classification, PronunciationStatus, WordVerdict,
};
use crate::dict::PhonemeSource;
use crate::error::{Error, Result};
use crate::phonemes::Transcriber;
use crate::text::{display_word, normalize_word, tokenize};

/// A reference word as shown to the learner, with its verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayResult {
    pub word: String,
    pub status: PronunciationStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    /// Transcript the verdicts were computed from; empty when nothing was understood.
    pub recognized: String,
    /// One entry per reference token, in sentence order.
    pub results: Vec<DisplayResult>,
    #[serde(skip)]
    pub verdicts: Classification,
}

impl Assessment {
    /// Normalized word → status, last occurrence winning for repeated words.
    pub fn keyed(&self) -> HashMap<String, PronunciationStatus> {
        self.verdicts.to_map()
    }
}

pub struct AssessorBuilder {
    source: Arc<dyn PhonemeSource>,
    strategy: AlignmentStrategy,
}

impl AssessorBuilder {
    pub fn strategy(mut self, strategy: AlignmentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn build(self) -> PronunciationAssessor {
        PronunciationAssessor {
            transcriber: Transcriber::new(self.source),
            strategy: self.strategy,
        }
    }
}

/// Scores a recognized transcript against a reference sentence.
///
/// Cheap to clone; the phoneme source is shared behind an `Arc` and never
/// mutated, so one assessor serves any number of concurrent requests.
#[derive(Clone)]
pub struct PronunciationAssessor {
    transcriber: Transcriber,
    strategy: AlignmentStrategy,
}

impl PronunciationAssessor {
    pub fn new(source: Arc<dyn PhonemeSource>) -> Self {
        Self::builder(source).build()
    }

    pub fn builder(source: Arc<dyn PhonemeSource>) -> AssessorBuilder {
        AssessorBuilder {
            source,
            strategy: AlignmentStrategy::default(),
        }
    }

    pub fn strategy(&self) -> AlignmentStrategy {
        self.strategy
    }

    pub fn transcriber(&self) -> &Transcriber {
        &self.transcriber
    }

    pub fn assess(&self, reference_sentence: &str, recognized_text: &str) -> Result<Assessment> {
        let tokens = tokenize(reference_sentence);
        if tokens.is_empty() {
            return Err(Error::invalid_input("reference sentence has no words"));
        }

        // Nothing was understood: skip transcription entirely.
        if recognized_text.trim().is_empty() {
            log::debug!("empty transcript, {} words not spoken", tokens.len());
            let verdicts = tokens
                .iter()
                .enumerate()
                .map(|(position, token)| WordVerdict::not_spoken(position, normalize_word(token)))
                .collect();
            let results = tokens
                .iter()
                .map(|token| DisplayResult {
                    word: display_word(token),
                    status: PronunciationStatus::NotSpoken,
                })
                .collect();
            return Ok(Assessment {
                recognized: String::new(),
                results,
                verdicts,
            });
        }

        let reference = self.transcriber.transcribe(reference_sentence);
        let recognized = self.transcriber.transcribe(recognized_text);
        let verdicts = classify_with(self.strategy, &reference, &recognized);
        log::debug!(
            "assessed {} reference words against {} recognized ({:?})",
            reference.len(),
            recognized.len(),
            self.strategy
        );

        let keyed = verdicts.to_map();
        let results = tokens
            .iter()
            .map(|token| DisplayResult {
                word: display_word(token),
                status: keyed
                    .get(&normalize_word(token))
                    .copied()
                    .unwrap_or(PronunciationStatus::NotSpoken),
            })
            .collect();

        Ok(Assessment {
            recognized: recognized_text.to_string(),
            results,
            verdicts,
        })
    }
}
