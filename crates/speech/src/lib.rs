//! Text-to-speech for Parley.
//!
//! A generative speech model is loaded once in the background. Until it is
//! ready, or if it fails to load or to generate, speech falls back to the
//! platform voice. Nothing in here fails the conversation.

pub mod command;
pub mod http_model;
pub mod model;
pub mod synthesizer;
pub mod voice;
pub mod wav;

pub use command::{CommandPlayer, CommandVoice};
pub use http_model::{HttpSpeechModelLoader, NoModelLoader};
pub use model::{AudioSink, SpeechModel, SpeechModelLoader};
pub use synthesizer::{SpeechOptions, SpeechState, SpeechSynthesizer};
pub use voice::{PlatformVoice, Utterance, Voice, VoiceCompletion, VoiceEvents};
pub use wav::{RawAudio, WavBuffer};
