//! Speech clients. Each one asks its token cache for a bearer token right
//! before every request and treats a token error as fatal for that request.

pub mod options;
pub mod stt;
pub mod tts;

pub use options::{
    clamp_speed, AudioFormat, Emotion, Language, RecognitionOptions, SampleRate, SynthesisOptions,
    Topic, Voice,
};
pub use stt::SpeechToText;
pub use tts::TextToSpeech;
