use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use phonora::{PhonemeDictionary, PronunciationAssessor, SentenceBank};
use phonora_http::{create_server, AppState, NoRecognizer, SpeechRecognizer};
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "----phonora-test-boundary";

/// Hears the same thing regardless of the audio it is given.
struct FixedRecognizer(&'static str);

impl SpeechRecognizer for FixedRecognizer {
    fn recognize(&self, _audio: Vec<u8>) -> Pin<Box<dyn Future<Output = String> + Send + '_>> {
        Box::pin(async move { self.0.to_string() })
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

fn app(recognizer: Arc<dyn SpeechRecognizer>) -> Router {
    let dict = PhonemeDictionary::from_entries(vec![
        ("the", vec!["DH", "AH0"]),
        ("cat", vec!["K", "AE1", "T"]),
        ("sat", vec!["S", "AE1", "T"]),
        ("on", vec!["AA1", "N"]),
        ("mat", vec!["M", "AE1", "T"]),
        ("hat", vec!["HH", "AE1", "T"]),
    ]);
    let sentences = SentenceBank::from_json_str(
        r#"{"beginner": [
            {"text": "The cat sat.", "topic": "animals"},
            {"text": "The cat sat on the mat."},
            "I see you."
        ]}"#,
    )
    .expect("sentence bank");
    let state = AppState {
        assessor: PronunciationAssessor::new(Arc::new(dict)),
        sentences,
        recognizer,
    };
    create_server(state, None)
}

fn multipart(fields: &[(&str, Option<&str>, &str)]) -> Body {
    let mut body = Vec::new();
    for (name, filename, data) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: audio/wav\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(data.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

fn evaluate_request(fields: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/evaluate")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart(fields))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn statuses(body: &Value) -> Vec<(String, String)> {
    body["results"]
        .as_array()
        .expect("results array")
        .iter()
        .map(|r| {
            (
                r["word"].as_str().unwrap().to_string(),
                r["status"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn ping_reports_running() {
    let request = Request::builder().uri("/ping").body(Body::empty()).unwrap();
    let response = app(Arc::new(NoRecognizer)).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Backend running");
}

#[tokio::test]
async fn get_sentences_samples_requested_level() {
    let request = Request::builder()
        .uri("/get-sentences?level=Beginner&count=2")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(Arc::new(NoRecognizer)), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["level"], "beginner");
    let sentences = body["sentences"].as_array().unwrap();
    assert_eq!(sentences.len(), 2);
    let known = ["The cat sat.", "The cat sat on the mat.", "I see you."];
    for sentence in sentences {
        let text = sentence["text"].as_str().expect("sentence text");
        assert!(known.contains(&text), "{text}");
    }
}

#[tokio::test]
async fn get_sentences_serves_records_with_their_extra_fields() {
    let request = Request::builder()
        .uri("/get-sentences?level=beginner&count=3")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(Arc::new(NoRecognizer)), request).await;
    assert_eq!(status, StatusCode::OK);
    let tagged: Vec<&Value> = body["sentences"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["text"] == "The cat sat.")
        .collect();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0]["topic"], "animals");
}

#[tokio::test]
async fn get_sentences_rejects_unknown_level() {
    let request = Request::builder()
        .uri("/get-sentences?level=expert")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(Arc::new(NoRecognizer)), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid level");
}

#[tokio::test]
async fn get_sentences_rejects_bad_counts() {
    for uri in [
        "/get-sentences?level=beginner&count=lots",
        "/get-sentences?level=beginner&count=50",
    ] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(app(Arc::new(NoRecognizer)), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn evaluate_scores_recognized_audio() {
    let app = app(Arc::new(FixedRecognizer("the hat sat")));
    let request = evaluate_request(&[
        ("sentence", None, "The cat sat on my mat."),
        ("audio", Some("audio.wav"), "RIFF....WAVE"),
    ]);
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recognized"], "the hat sat");
    assert_eq!(
        statuses(&body),
        vec![
            ("the".to_string(), "CORRECT".to_string()),
            ("cat".to_string(), "MISPRONOUNCED".to_string()),
            ("sat".to_string(), "CORRECT".to_string()),
            ("on".to_string(), "NOT SPOKEN".to_string()),
            ("my".to_string(), "NOT SPOKEN".to_string()),
            ("mat".to_string(), "NOT SPOKEN".to_string()),
        ]
    );
}

#[tokio::test]
async fn evaluate_accepts_client_side_transcript() {
    let app = app(Arc::new(NoRecognizer));
    let request = evaluate_request(&[
        ("sentence", None, "The cat sat."),
        ("recognized", None, "The cat sat"),
    ]);
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(statuses(&body).iter().all(|(_, s)| s == "CORRECT"));
}

#[tokio::test]
async fn evaluate_requires_sentence_and_audio() {
    let missing_audio = evaluate_request(&[("sentence", None, "The cat sat.")]);
    let (status, body) = send(app(Arc::new(NoRecognizer)), missing_audio).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing sentence or audio");

    let missing_sentence = evaluate_request(&[("audio", Some("audio.wav"), "RIFF")]);
    let (status, body) = send(app(Arc::new(NoRecognizer)), missing_sentence).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing sentence or audio");
}

#[tokio::test]
async fn evaluate_marks_everything_unspoken_when_nothing_is_heard() {
    let app = app(Arc::new(NoRecognizer));
    let request = evaluate_request(&[
        ("sentence", None, "The cat sat!"),
        ("audio", Some("audio.wav"), "RIFF"),
    ]);
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recognized"], "");
    assert_eq!(
        statuses(&body),
        vec![
            ("the".to_string(), "NOT SPOKEN".to_string()),
            ("cat".to_string(), "NOT SPOKEN".to_string()),
            ("sat".to_string(), "NOT SPOKEN".to_string()),
        ]
    );
}
