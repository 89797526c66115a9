//! Speech backed by external programs: `espeak-ng` as the platform voice
//! and `aplay` (or any player taking a WAV path) as the audio sink.

use async_trait::async_trait;
use parley_core::error::SpeechError;
use std::io::Write;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::model::AudioSink;
use crate::voice::{PlatformVoice, Utterance, Voice, VoiceEvents};
use crate::wav::WavBuffer;

/// A command-line speech synthesizer in the `espeak-ng` argument style.
pub struct CommandVoice {
    program: String,
}

impl CommandVoice {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Map rate/pitch/volume (1.0 = normal) onto espeak's scales:
    /// 175 words per minute, pitch 0-99 around 50, amplitude 0-200 around 100.
    /// The text always follows `--` so a leading dash is never read as a flag.
    pub fn args(utterance: &Utterance) -> Vec<String> {
        let lang = utterance
            .voice
            .as_ref()
            .map(|v| v.lang.as_str())
            .unwrap_or(&utterance.lang)
            .to_ascii_lowercase();
        let speed = (175.0 * utterance.rate).round().max(80.0) as u32;
        let pitch = (50.0 * utterance.pitch).round().clamp(0.0, 99.0) as u32;
        let amplitude = (100.0 * utterance.volume).round().clamp(0.0, 200.0) as u32;

        vec![
            "-v".into(),
            lang,
            "-s".into(),
            speed.to_string(),
            "-p".into(),
            pitch.to_string(),
            "-a".into(),
            amplitude.to_string(),
            "--".into(),
            utterance.text.clone(),
        ]
    }
}

impl PlatformVoice for CommandVoice {
    fn voices(&self) -> Vec<Voice> {
        ["en-US", "en-GB"]
            .into_iter()
            .map(|lang| Voice {
                name: format!("{} {lang}", self.program),
                lang: lang.into(),
            })
            .collect()
    }

    fn speak(&self, utterance: Utterance, events: VoiceEvents) -> Result<(), SpeechError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| SpeechError::VoiceUnsupported(e.to_string()))?;

        let program = self.program.clone();
        let args = Self::args(&utterance);
        handle.spawn(async move {
            debug!(program = %program, "Speaking with platform voice");
            let status = Command::new(&program)
                .args(&args)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await;

            match status {
                Ok(s) if s.success() => events.end(),
                Ok(s) => {
                    events.error(SpeechError::VoiceFailed(format!("{program} exited with {s}")))
                }
                Err(e) => events.error(SpeechError::VoiceUnsupported(format!("{program}: {e}"))),
            }
        });
        Ok(())
    }
}

/// Plays WAV audio by handing a temporary file to a player program.
pub struct CommandPlayer {
    program: String,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl AudioSink for CommandPlayer {
    async fn play(&self, audio: &WavBuffer) -> Result<(), SpeechError> {
        let mut file = tempfile::Builder::new()
            .prefix("parley-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| SpeechError::Playback(e.to_string()))?;
        file.write_all(audio.as_bytes())
            .map_err(|e| SpeechError::Playback(e.to_string()))?;

        debug!(
            program = %self.program,
            secs = audio.duration_secs(),
            "Playing generated speech"
        );
        let status = Command::new(&self.program)
            .arg(file.path())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| SpeechError::Playback(format!("{}: {e}", self.program)))?;

        if !status.success() {
            return Err(SpeechError::Playback(format!(
                "{} exited with {status}",
                self.program
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::speak_and_wait;

    #[test]
    fn default_utterance_args() {
        let args = CommandVoice::args(&Utterance::new("hello"));
        assert_eq!(args, vec!["-v", "en-us", "-s", "175", "-p", "50", "-a", "100", "--", "hello"]);
    }

    #[test]
    fn scaled_args_are_clamped() {
        let mut u = Utterance::new("slow");
        u.rate = 0.1;
        u.pitch = 5.0;
        u.volume = 0.5;
        u.voice = Some(Voice {
            name: "gb".into(),
            lang: "en-GB".into(),
        });
        let args = CommandVoice::args(&u);
        assert_eq!(args, vec!["-v", "en-gb", "-s", "80", "-p", "99", "-a", "50", "--", "slow"]);
    }

    #[test]
    fn leading_dash_text_is_not_an_option() {
        for text in ["-ing words are gerunds", "- apples\n- pears", "--help"] {
            let args = CommandVoice::args(&Utterance::new(text));
            let n = args.len();
            assert_eq!(args[n - 2], "--");
            assert_eq!(args[n - 1], text);
            assert!(args[..n - 2].iter().all(|a| a != text));
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn leading_dash_text_is_spoken() {
        let voice = CommandVoice::new("true");
        let result = speak_and_wait(&voice, Utterance::new("-ing words are gerunds")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn missing_program_rejects() {
        let voice = CommandVoice::new("parley-no-such-voice-program");
        let err = speak_and_wait(&voice, Utterance::new("hi")).await.unwrap_err();
        assert!(matches!(err, SpeechError::VoiceUnsupported(_)));
    }

    #[tokio::test]
    async fn missing_player_is_playback_error() {
        let player = CommandPlayer::new("parley-no-such-player");
        let err = player.play(&WavBuffer::encode(&[0.0; 8], 8_000)).await.unwrap_err();
        assert!(matches!(err, SpeechError::Playback(_)));
    }
}
