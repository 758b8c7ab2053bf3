// Speech clients against local axum servers: request shape, bearer header,
// option encoding and error propagation.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Form, Query};
use axum::routing::post;
use axum::{Json, Router};
use http::{HeaderMap, StatusCode};
use serde_json::json;

use crate::cache::{RefreshPolicy, TokenCache};
use crate::error::Error;
use crate::speech::{
    AudioFormat, Emotion, Language, SampleRate, SpeechToText, TextToSpeech, Topic, Voice,
};
use crate::tests::common::{build_reqwest_client, spawn_axum, unavailable, ScriptedSource};

#[derive(Debug, Clone)]
struct Captured {
    authorization: Option<String>,
    params: HashMap<String, String>,
    body: Vec<u8>,
}

type Log = Arc<Mutex<Vec<Captured>>>;

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

async fn tts_server(log: Log) -> String {
    let router = Router::new().route(
        "/speech/v1/tts:synthesize",
        post(move |headers: HeaderMap, Form(form): Form<HashMap<String, String>>| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push(Captured {
                    authorization: authorization(&headers),
                    params: form,
                    body: Vec::new(),
                });
                (StatusCode::OK, b"OggS-audio".to_vec())
            }
        }),
    );
    let (_, addr) = spawn_axum(router).await;
    format!("http://{}/speech/v1/tts:synthesize", addr)
}

async fn stt_server(log: Log) -> String {
    let router = Router::new().route(
        "/speech/v1/stt:recognize",
        post(
            move |headers: HeaderMap, Query(query): Query<HashMap<String, String>>, body: Bytes| {
                let log = log.clone();
                async move {
                    log.lock().unwrap().push(Captured {
                        authorization: authorization(&headers),
                        params: query,
                        body: body.to_vec(),
                    });
                    Json(json!({"result": "hello world"}))
                }
            },
        ),
    );
    let (_, addr) = spawn_axum(router).await;
    format!("http://{}/speech/v1/stt:recognize", addr)
}

fn cache(source: &ScriptedSource) -> TokenCache {
    TokenCache::new(source.clone(), RefreshPolicy::default())
}

#[tokio::test]
async fn synthesize_posts_form_with_bearer_token() {
    let log: Log = Arc::default();
    let url = tts_server(log.clone()).await;
    let source = ScriptedSource::new("tok-1");

    let mut tts = TextToSpeech::new("b1g-folder", cache(&source))
        .with_client(build_reqwest_client())
        .with_endpoint(&url);
    tts.options.voice = Voice::Zahar;
    tts.options.emotion = Emotion::Good;
    tts.options.format = AudioFormat::Lpcm;
    tts.options.lang = Language::English;
    tts.options.sample_rate = SampleRate::Hz16000;
    tts.options.speed = 1.5;

    let audio = tts.synthesize("Hello there").await.unwrap();
    assert_eq!(&audio[..], b"OggS-audio");

    let captured = log.lock().unwrap().clone();
    assert_eq!(captured.len(), 1);
    let request = &captured[0];
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok-1"));
    let params = &request.params;
    assert_eq!(params["text"], "Hello there");
    assert_eq!(params["voice"], "zahar");
    assert_eq!(params["emotion"], "good");
    assert_eq!(params["folderId"], "b1g-folder");
    assert_eq!(params["format"], "lpcm");
    assert_eq!(params["speed"], "1.5");
    assert_eq!(params["lang"], "en-US");
    assert_eq!(params["sampleRateHertz"], "16000");
}

#[tokio::test]
async fn synthesize_clamps_speed() {
    let log: Log = Arc::default();
    let url = tts_server(log.clone()).await;
    let source = ScriptedSource::new("tok-1");
    let mut tts = TextToSpeech::new("b1g", cache(&source)).with_endpoint(&url);

    tts.options.speed = -5.0;
    tts.synthesize("slow").await.unwrap();
    tts.options.speed = 100.0;
    tts.synthesize("fast").await.unwrap();

    let captured = log.lock().unwrap().clone();
    assert_eq!(captured[0].params["speed"], "0.1");
    assert_eq!(captured[1].params["speed"], "3.0");
    // second call reuses the cached token
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn blank_text_is_rejected_before_any_network_call() {
    let source = ScriptedSource::new("tok-1");
    let tts = TextToSpeech::new("b1g", cache(&source)).with_endpoint("http://127.0.0.1:9/never");

    for text in ["", "   ", "\n\t "] {
        let err = tts.synthesize(text).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "{err:?}");
    }
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn token_error_is_returned_without_calling_speech_service() {
    let log: Log = Arc::default();
    let url = tts_server(log.clone()).await;
    let source = ScriptedSource::failing(unavailable());
    let tts = TextToSpeech::new("b1g", cache(&source)).with_endpoint(&url);

    assert_eq!(tts.synthesize("text").await.unwrap_err(), unavailable());
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn speech_service_error_carries_code_and_message() {
    let router = Router::new().route(
        "/speech/v1/tts:synthesize",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error_code": "BAD_REQUEST", "error_message": "Unknown voice"})),
            )
        }),
    );
    let (_, addr) = spawn_axum(router).await;
    let source = ScriptedSource::new("tok-1");
    let tts = TextToSpeech::new("b1g", cache(&source))
        .with_endpoint(&format!("http://{}/speech/v1/tts:synthesize", addr));

    match tts.synthesize("text").await.unwrap_err() {
        Error::Status { status, code, message } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(code.as_deref(), Some("BAD_REQUEST"));
            assert_eq!(message.as_deref(), Some("Unknown voice"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn recognize_sends_audio_with_query_options() {
    let log: Log = Arc::default();
    let url = stt_server(log.clone()).await;
    let source = ScriptedSource::new("tok-1");

    let mut stt = SpeechToText::new("b1g-folder", cache(&source))
        .with_client(build_reqwest_client())
        .with_endpoint(&url);
    stt.options.topic = Topic::Maps;
    stt.options.profanity_filter = true;
    stt.options.speed = 9.0;

    let text = stt.recognize(b"OggS-input".to_vec()).await.unwrap();
    assert_eq!(text, "hello world");

    let captured = log.lock().unwrap().clone();
    let request = &captured[0];
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok-1"));
    assert_eq!(request.body, b"OggS-input");
    let params = &request.params;
    assert_eq!(params["topic"], "maps");
    assert_eq!(params["profanityFilter"], "true");
    assert_eq!(params["folderId"], "b1g-folder");
    assert_eq!(params["format"], "oggopus");
    assert_eq!(params["speed"], "3.0");
    assert_eq!(params["lang"], "ru-RU");
    assert_eq!(params["sampleRateHertz"], "48000");
}

#[tokio::test]
async fn recognize_file_reads_audio_from_disk() {
    let log: Log = Arc::default();
    let url = stt_server(log.clone()).await;
    let source = ScriptedSource::new("tok-1");
    let stt = SpeechToText::new("b1g", cache(&source)).with_endpoint(&url);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"file-audio").unwrap();

    assert_eq!(stt.recognize_file(file.path()).await.unwrap(), "hello world");
    assert_eq!(log.lock().unwrap()[0].body, b"file-audio");
}

#[tokio::test]
async fn missing_audio_file_fails_before_token_fetch() {
    let source = ScriptedSource::new("tok-1");
    let stt = SpeechToText::new("b1g", cache(&source));

    let err = stt.recognize_file("/nonexistent/audio.ogg").await.unwrap_err();
    assert!(matches!(err, Error::Io(_)), "{err:?}");
    assert_eq!(source.calls(), 0);
}
