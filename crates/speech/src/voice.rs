//! Platform voice adapter.
//!
//! Platform speech APIs report completion through callbacks. [`VoiceEvents`]
//! turns those callbacks into a future that settles exactly once: the first
//! of `end` or `error` wins and later calls are ignored. If every handle is
//! dropped without settling, the waiter gets [`SpeechError::Unsettled`]
//! instead of hanging.

use parley_core::error::SpeechError;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::debug;

/// A voice offered by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 tag, e.g. `en-US`.
    pub lang: String,
}

/// One request to the platform voice.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub voice: Option<Voice>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: "en-US".into(),
            voice: None,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

type Settlement = Result<(), SpeechError>;

/// Terminal callbacks for one utterance.
#[derive(Clone)]
pub struct VoiceEvents {
    slot: Arc<Mutex<Option<oneshot::Sender<Settlement>>>>,
}

impl VoiceEvents {
    /// Create the callback handle and the future that observes it.
    pub fn pair() -> (Self, VoiceCompletion) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                slot: Arc::new(Mutex::new(Some(tx))),
            },
            VoiceCompletion { rx },
        )
    }

    /// The utterance finished speaking.
    pub fn end(&self) {
        self.settle(Ok(()));
    }

    /// The platform reported an error.
    pub fn error(&self, error: SpeechError) {
        self.settle(Err(error));
    }

    pub fn is_settled(&self) -> bool {
        match self.slot.lock() {
            Ok(slot) => slot.is_none(),
            Err(_) => true,
        }
    }

    fn settle(&self, outcome: Settlement) {
        let sender = match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        match sender {
            Some(tx) => {
                let _ = tx.send(outcome);
            }
            None => debug!("Ignoring voice event after settlement"),
        }
    }
}

/// Resolves once the utterance settles.
pub struct VoiceCompletion {
    rx: oneshot::Receiver<Settlement>,
}

impl VoiceCompletion {
    pub async fn wait(self) -> Result<(), SpeechError> {
        self.rx.await.unwrap_or(Err(SpeechError::Unsettled))
    }
}

/// A platform text-to-speech facility with callback-style completion.
pub trait PlatformVoice: Send + Sync {
    /// Installed voices.
    fn voices(&self) -> Vec<Voice>;

    /// Start speaking. Completion is reported through `events`. An `Err`
    /// return means the utterance was never started.
    fn speak(&self, utterance: Utterance, events: VoiceEvents) -> Result<(), SpeechError>;
}

/// Pick a voice for `lang`: an exact tag match first, then any English voice.
pub fn select_voice(voices: &[Voice], lang: &str) -> Option<Voice> {
    voices
        .iter()
        .find(|v| v.lang.eq_ignore_ascii_case(lang))
        .or_else(|| voices.iter().find(|v| v.lang.to_ascii_lowercase().starts_with("en")))
        .cloned()
}

/// Speak through the platform voice and wait for it to settle.
pub async fn speak_and_wait(
    voice: &dyn PlatformVoice,
    mut utterance: Utterance,
) -> Result<(), SpeechError> {
    if utterance.voice.is_none() {
        utterance.voice = select_voice(&voice.voices(), &utterance.lang);
    }

    let (events, completion) = VoiceEvents::pair();
    if let Err(e) = voice.speak(utterance, events.clone()) {
        if events.is_settled() {
            debug!(error = %e, "Voice refused after settling; keeping the first result");
        } else {
            events.error(e);
        }
    }
    drop(events);
    completion.wait().await
}
