//! Practice sentences grouped by difficulty level.
//!
//! The resource is a JSON object mapping a level name to its sentences.
//! A sentence is either a record with a `text` field (any other fields are
//! kept and served back untouched) or a bare string:
//!
//! ```json
//! {
//!   "beginner": [{ "text": "The cat sat on the mat.", "topic": "animals" }],
//!   "advanced": ["..."]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// One practice sentence. Serializes as `{"text": ..., <extra fields>}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "SentenceRecord")]
pub struct Sentence {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sentence {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SentenceRecord {
    Plain(String),
    Record {
        text: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl From<SentenceRecord> for Sentence {
    fn from(record: SentenceRecord) -> Self {
        match record {
            SentenceRecord::Plain(text) => Sentence::new(text),
            SentenceRecord::Record { text, extra } => Sentence { text, extra },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SentenceBank {
    levels: BTreeMap<String, Vec<Sentence>>,
}

impl SentenceBank {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data =
            std::fs::read_to_string(path).map_err(|e| Error::io("reading sentence bank", e))?;
        let bank = Self::from_json_str(&data)?;
        log::info!(
            "loaded {} sentence levels from {}",
            bank.levels.len(),
            path.display()
        );
        Ok(bank)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|e| Error::json("parsing sentence bank", e))
    }

    pub fn levels(&self) -> Vec<&str> {
        self.levels.keys().map(String::as_str).collect()
    }

    pub fn sentences(&self, level: &str) -> Option<&[Sentence]> {
        self.levels.get(level).map(Vec::as_slice)
    }

    /// Picks `count` distinct sentences from `level` (matched lower-cased).
    pub fn sample<R: Rng + ?Sized>(
        &self,
        level: &str,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Sentence>> {
        let level = level.to_lowercase();
        let pool = self
            .sentences(&level)
            .ok_or_else(|| Error::UnknownLevel(level.clone()))?;
        if count > pool.len() {
            return Err(Error::SampleTooLarge {
                level,
                requested: count,
                available: pool.len(),
            });
        }
        Ok(pool.choose_multiple(rng, count).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const BANK: &str = r#"{
        "beginner": ["I like tea.", "The cat sat.", "It is hot.", "We can go."],
        "advanced": ["Thoroughly rehearsed pronunciation rarely falters."]
    }"#;

    #[test]
    fn parses_levels() {
        let bank = SentenceBank::from_json_str(BANK).unwrap();
        assert_eq!(bank.levels(), vec!["advanced", "beginner"]);
        assert_eq!(bank.sentences("beginner").unwrap().len(), 4);
        assert!(bank.sentences("expert").is_none());
    }

    #[test]
    fn sample_returns_distinct_sentences_from_the_level() {
        let bank = SentenceBank::from_json_str(BANK).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let picked = bank.sample("Beginner", 3, &mut rng).unwrap();
        assert_eq!(picked.len(), 3);
        let unique: HashSet<_> = picked.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(unique.len(), 3);
        let pool = bank.sentences("beginner").unwrap();
        assert!(picked.iter().all(|s| pool.contains(s)));
    }

    #[test]
    fn sample_rejects_unknown_level_and_oversized_requests() {
        let bank = SentenceBank::from_json_str(BANK).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            bank.sample("expert", 1, &mut rng),
            Err(Error::UnknownLevel(level)) if level == "expert"
        ));
        assert!(matches!(
            bank.sample("advanced", 2, &mut rng),
            Err(Error::SampleTooLarge { available: 1, .. })
        ));
    }

    #[test]
    fn accepts_sentence_records_and_keeps_their_fields() {
        let bank = SentenceBank::from_json_str(
            r#"{"beginner": [{"text": "The cat sat.", "topic": "animals"}, "We can go."]}"#,
        )
        .unwrap();
        let pool = bank.sentences("beginner").unwrap();
        assert_eq!(pool[0].text, "The cat sat.");
        assert_eq!(pool[0].extra["topic"], "animals");
        assert_eq!(pool[1], Sentence::new("We can go."));

        let json = serde_json::to_value(&pool[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text": "The cat sat.", "topic": "animals"})
        );
        assert_eq!(
            serde_json::to_value(&pool[1]).unwrap(),
            serde_json::json!({"text": "We can go."})
        );
    }

    #[test]
    fn record_without_text_is_an_error() {
        assert!(matches!(
            SentenceBank::from_json_str(r#"{"beginner": [{"topic": "animals"}]}"#),
            Err(Error::Json { .. })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            SentenceBank::from_json_str("[1, 2]"),
            Err(Error::Json { .. })
        ));
    }

    #[test]
    fn loads_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), BANK).unwrap();
        let bank = SentenceBank::from_path(file.path()).unwrap();
        assert_eq!(bank.sentences("advanced").unwrap().len(), 1);
    }
}
