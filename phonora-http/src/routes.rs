use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::Json;
use log::{debug, info};
use phonora::{Assessment, Sentence};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::AppState;

const DEFAULT_LEVEL: &str = "beginner";
const DEFAULT_COUNT: usize = 10;

pub async fn ping() -> &'static str {
    "Backend running"
}

#[derive(Debug, Deserialize)]
pub struct SentenceQuery {
    level: Option<String>,
    count: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SentenceBatch {
    level: String,
    sentences: Vec<Sentence>,
}

pub async fn get_sentences(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SentenceQuery>,
) -> Result<Json<SentenceBatch>, ApiError> {
    let level = query
        .level
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
        .to_lowercase();
    let count = match query.count.as_deref() {
        None => DEFAULT_COUNT,
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ApiError::bad_request("Invalid count"))?,
    };

    let sentences = state
        .sentences
        .sample(&level, count, &mut rand::thread_rng())?;
    debug!("serving {} {level} sentences", sentences.len());
    Ok(Json(SentenceBatch { level, sentences }))
}

/// Accepts multipart `sentence` plus either `audio` (sent to the recognizer)
/// or an already recognized `recognized` transcript.
pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Assessment>, ApiError> {
    let mut sentence = None;
    let mut audio = None;
    let mut recognized = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "sentence" => {
                sentence = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?,
                )
            }
            "audio" => {
                audio = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?,
                )
            }
            "recognized" => {
                recognized = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?,
                )
            }
            other => debug!("ignoring multipart field {other:?}"),
        }
    }

    let sentence = sentence
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing sentence or audio"))?;

    let recognized = match (recognized, audio) {
        (Some(text), _) => text.trim().to_lowercase(),
        (None, Some(audio)) => {
            debug!(
                "transcribing {} bytes with {}",
                audio.len(),
                state.recognizer.name()
            );
            state.recognizer.recognize(audio.to_vec()).await
        }
        (None, None) => return Err(ApiError::bad_request("Missing sentence or audio")),
    };

    info!("[EVALUATE] {sentence:?} <- {recognized:?}");
    let assessment = state.assessor.assess(&sentence, &recognized)?;
    Ok(Json(assessment))
}
