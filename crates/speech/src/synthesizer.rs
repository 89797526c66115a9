//! SpeechSynthesizer — model load state machine with platform-voice fallback.
//!
//! `Uninitialized -> Loading -> Ready | FallbackOnly`. The load runs at most
//! once; concurrent `initialize` callers await the same attempt. Both
//! terminal states accept `speak` indefinitely.

use parley_config::SpeechConfig;
use parley_core::error::SpeechError;
use parley_core::outcome::Outcome;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::command::{CommandPlayer, CommandVoice};
use crate::http_model::{HttpSpeechModelLoader, NoModelLoader};
use crate::model::{AudioSink, SpeechModel, SpeechModelLoader};
use crate::voice::{PlatformVoice, Utterance, speak_and_wait};
use crate::wav::WavBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechState {
    Uninitialized,
    Loading,
    Ready,
    FallbackOnly,
}

impl std::fmt::Display for SpeechState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::FallbackOnly => "fallback-only",
        };
        f.write_str(s)
    }
}

/// Voice parameters for one `speak` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechOptions {
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            lang: "en-US".into(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

impl From<&SpeechConfig> for SpeechOptions {
    fn from(config: &SpeechConfig) -> Self {
        Self {
            lang: config.lang.clone(),
            rate: config.rate,
            pitch: config.pitch,
            volume: config.volume,
        }
    }
}

/// Holds `loading` up for the duration of one load attempt.
struct LoadingFlag<'a>(&'a AtomicBool);

impl<'a> LoadingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct SpeechSynthesizer {
    loader: Arc<dyn SpeechModelLoader>,
    sink: Arc<dyn AudioSink>,
    voice: Arc<dyn PlatformVoice>,
    model: OnceCell<Option<Arc<dyn SpeechModel>>>,
    loading: AtomicBool,
}

impl SpeechSynthesizer {
    pub fn new(
        loader: Arc<dyn SpeechModelLoader>,
        sink: Arc<dyn AudioSink>,
        voice: Arc<dyn PlatformVoice>,
    ) -> Self {
        Self {
            loader,
            sink,
            voice,
            model: OnceCell::new(),
            loading: AtomicBool::new(false),
        }
    }

    /// Command-backed synthesizer described by `[speech]`. Without a
    /// `model_url` it settles in `FallbackOnly` on initialize.
    pub fn from_config(config: &SpeechConfig) -> Self {
        let loader: Arc<dyn SpeechModelLoader> = match &config.model_url {
            Some(url) => Arc::new(
                HttpSpeechModelLoader::new(url)
                    .with_timeout(Duration::from_secs(config.model_timeout_secs)),
            ),
            None => Arc::new(NoModelLoader),
        };
        Self::new(
            loader,
            Arc::new(CommandPlayer::new(&config.player_command)),
            Arc::new(CommandVoice::new(&config.voice_command)),
        )
    }

    pub fn state(&self) -> SpeechState {
        match self.model.get() {
            Some(Some(_)) => SpeechState::Ready,
            Some(None) => SpeechState::FallbackOnly,
            None if self.loading.load(Ordering::SeqCst) => SpeechState::Loading,
            None => SpeechState::Uninitialized,
        }
    }

    /// Load the model once. Never fails: a load error leaves the
    /// synthesizer in `FallbackOnly`. A cancelled load leaves it
    /// `Uninitialized`, and the next call tries again.
    pub async fn initialize(&self) -> SpeechState {
        self.model
            .get_or_init(|| async {
                let _loading = LoadingFlag::raise(&self.loading);
                info!("Loading speech model");
                match self.loader.load().await {
                    Ok(model) => {
                        info!(sample_rate = model.sample_rate(), "Speech model ready");
                        Some(model)
                    }
                    Err(e) => {
                        warn!(error = %e, "Speech model unavailable, using platform voice");
                        None
                    }
                }
            })
            .await;
        self.state()
    }

    /// Generate audio for `text`. `Degraded` means "use the platform voice":
    /// the model is not ready, or generation failed.
    pub async fn synthesize(
        &self,
        text: &str,
        options: &SpeechOptions,
    ) -> Outcome<WavBuffer, SpeechError> {
        let model = match self.model.get() {
            Some(Some(model)) => model,
            Some(None) => return Outcome::Degraded("speech model failed to load".into()),
            None => return Outcome::Degraded(format!("speech model is {}", self.state())),
        };

        let generated = match model.generate(text, options).await {
            Ok(audio) => {
                debug!(samples = audio.samples.len(), "Generated speech");
                Outcome::Ok(audio)
            }
            Err(e) => {
                warn!(error = %e, "Speech generation failed");
                Outcome::Degraded(e.to_string())
            }
        };
        generated.map(|audio| WavBuffer::from_raw(&audio))
    }

    /// Play a buffer to completion. `None` is a no-op.
    pub async fn play(&self, audio: Option<&WavBuffer>) -> Result<(), SpeechError> {
        match audio {
            Some(audio) => self.sink.play(audio).await,
            None => Ok(()),
        }
    }

    /// Speak `text`: generated voice when possible, platform voice otherwise.
    ///
    /// `Ok` means the model's audio played, `Degraded` means the platform
    /// voice spoke instead, and `Fail` means the platform voice failed too.
    pub async fn speak(&self, text: &str, options: &SpeechOptions) -> Outcome<(), SpeechError> {
        let reason = match self.synthesize(text, options).await {
            Outcome::Ok(audio) => match self.play(Some(&audio)).await {
                Ok(()) => return Outcome::Ok(()),
                Err(e) => {
                    warn!(error = %e, "Playback failed, using platform voice");
                    e.to_string()
                }
            },
            Outcome::Degraded(reason) => reason,
            Outcome::Fail(e) => e.to_string(),
        };

        let utterance = Utterance {
            text: text.to_string(),
            lang: options.lang.clone(),
            voice: None,
            rate: options.rate,
            pitch: options.pitch,
            volume: options.volume,
        };

        match speak_and_wait(self.voice.as_ref(), utterance).await {
            Ok(()) => Outcome::Degraded(reason),
            Err(e) => {
                warn!(error = %e, "Platform voice failed");
                Outcome::Fail(e)
            }
        }
    }
}
