pub mod assess;
pub mod dict;
pub mod error;
pub mod phonemes;
pub mod sentences;
pub mod text;

// Re-export key functionality for easy access
pub use assess::assessor::{Assessment, AssessorBuilder, DisplayResult, PronunciationAssessor};
pub use assess::classify::{
    classify, classify_with, AlignmentStrategy, Classification, PronunciationStatus, WordVerdict,
};
pub use dict::store::DictionaryStore;
pub use dict::{PhonemeDictionary, PhonemeSource};
pub use error::{Error, Result};
pub use phonemes::{PhonemeEntry, Transcriber, TranscriptPhonemes};
pub use sentences::{Sentence, SentenceBank};
