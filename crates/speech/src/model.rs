//! Seams for the generative speech path.

use async_trait::async_trait;
use parley_core::error::SpeechError;
use std::sync::Arc;

use crate::synthesizer::SpeechOptions;
use crate::wav::{RawAudio, WavBuffer};

/// Loads a speech model. Called at most once per synthesizer.
#[async_trait]
pub trait SpeechModelLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn SpeechModel>, SpeechError>;
}

/// A loaded text-to-speech model.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    /// The sample rate this model generates at.
    fn sample_rate(&self) -> u32;

    /// Generate `text` in the language and speed given by `options`.
    async fn generate(&self, text: &str, options: &SpeechOptions) -> Result<RawAudio, SpeechError>;
}

/// Plays a WAV buffer to completion.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, audio: &WavBuffer) -> Result<(), SpeechError>;
}
