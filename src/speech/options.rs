//! Request options shared by the speech clients, with their wire values.

use serde::{Deserialize, Serialize};

/// Voice of the synthesized speech.
///
/// Female voices: alyss, jane, oksana, omazh. Male voices: zahar, ermil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Alyss,
    Jane,
    Oksana,
    Omazh,
    Zahar,
    Ermil,
}

impl Voice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Alyss => "alyss",
            Voice::Jane => "jane",
            Voice::Oksana => "oksana",
            Voice::Omazh => "omazh",
            Voice::Zahar => "zahar",
            Voice::Ermil => "ermil",
        }
    }
}

/// Emotional tone of the voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Cheerful and friendly.
    Good,
    /// Irritated.
    Evil,
    #[default]
    Neutral,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Good => "good",
            Emotion::Evil => "evil",
            Emotion::Neutral => "neutral",
        }
    }
}

/// Audio encoding.
///
/// `Lpcm` is raw 16-bit little-endian signed PCM without a WAV header, at the
/// configured sample rate. `OggOpus` is Opus in an OGG container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Lpcm,
    #[default]
    OggOpus,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Lpcm => "lpcm",
            AudioFormat::OggOpus => "oggopus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "ru-RU")]
    Russian,
    #[serde(rename = "en-US")]
    English,
    #[serde(rename = "tr-TR")]
    Turkish,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Russian => "ru-RU",
            Language::English => "en-US",
            Language::Turkish => "tr-TR",
        }
    }
}

/// Sampling frequency, used with `AudioFormat::Lpcm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SampleRate {
    #[default]
    Hz48000,
    Hz16000,
    Hz8000,
}

impl SampleRate {
    pub fn hertz(&self) -> u32 {
        match self {
            SampleRate::Hz48000 => 48_000,
            SampleRate::Hz16000 => 16_000,
            SampleRate::Hz8000 => 8_000,
        }
    }
}

impl TryFrom<u32> for SampleRate {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            48_000 => Ok(SampleRate::Hz48000),
            16_000 => Ok(SampleRate::Hz16000),
            8_000 => Ok(SampleRate::Hz8000),
            other => Err(format!("unsupported sample rate {other}, expected 48000, 16000 or 8000")),
        }
    }
}

impl From<SampleRate> for u32 {
    fn from(rate: SampleRate) -> Self {
        rate.hertz()
    }
}

/// Language model used for recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    /// Short phrases of 3-5 words on various topics.
    #[default]
    General,
    /// Addresses and names of companies or places.
    Maps,
    /// Month names, ordinal and cardinal numbers.
    Dates,
    /// First and last names, phone call requests.
    Names,
    /// Cardinal numbers from 1 to 999 and delimiters.
    Numbers,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::General => "general",
            Topic::Maps => "maps",
            Topic::Dates => "dates",
            Topic::Names => "names",
            Topic::Numbers => "numbers",
        }
    }
}

pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 3.0;
pub const DEFAULT_SPEED: f32 = 1.0;

/// Clamp a speech rate into the range the service accepts. NaN falls back to
/// the default rate.
pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_nan() {
        return DEFAULT_SPEED;
    }
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

/// Wire form of a speech rate: clamped, one decimal place.
pub fn format_speed(speed: f32) -> String {
    format!("{:.1}", clamp_speed(speed))
}

/// Options of a synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    pub voice: Voice,
    pub emotion: Emotion,
    pub format: AudioFormat,
    pub lang: Language,
    pub sample_rate: SampleRate,
    pub speed: f32,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            voice: Voice::default(),
            emotion: Emotion::default(),
            format: AudioFormat::default(),
            lang: Language::default(),
            sample_rate: SampleRate::default(),
            speed: DEFAULT_SPEED,
        }
    }
}

/// Options of a recognition request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionOptions {
    pub topic: Topic,
    pub profanity_filter: bool,
    pub format: AudioFormat,
    pub lang: Language,
    pub sample_rate: SampleRate,
    pub speed: f32,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            topic: Topic::default(),
            profanity_filter: false,
            format: AudioFormat::default(),
            lang: Language::default(),
            sample_rate: SampleRate::default(),
            speed: DEFAULT_SPEED,
        }
    }
}
