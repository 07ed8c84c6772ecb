//! Phonetic dictionary: word → pronunciation variants.
//!
//! The dictionary is built once, wrapped in an `Arc` and handed to every
//! [`Transcriber`](crate::phonemes::Transcriber) that needs it. It is never
//! mutated after construction, so concurrent requests share it freely.

pub mod cmudict;
pub mod store;

pub use cmudict::{strip_stress, PhonemeDictionary, Pronunciation};

/// Anything that can map a normalized word to a stress-free phoneme sequence.
///
/// Implementations must return an empty sequence for unknown words rather
/// than failing, so that one out-of-vocabulary word never aborts scoring of
/// the rest of a sentence.
pub trait PhonemeSource: Send + Sync {
    fn lookup(&self, normalized_word: &str) -> Vec<String>;
}

impl PhonemeSource for PhonemeDictionary {
    fn lookup(&self, normalized_word: &str) -> Vec<String> {
        PhonemeDictionary::lookup(self, normalized_word)
    }
}
