//! Shared test helpers for orchestrator and session tests.

use async_trait::async_trait;
use parley_core::error::{ProviderError, SpeechError};
use parley_core::message::{Message, ToolCallDirective};
use parley_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use parley_speech::model::{AudioSink, SpeechModel, SpeechModelLoader};
use parley_speech::voice::{PlatformVoice, Utterance, Voice, VoiceEvents};
use parley_speech::wav::WavBuffer;
use std::sync::{Arc, Mutex};

/// A mock provider that returns a sequence of scripted replies.
///
/// Each call to `complete` returns the next reply in the queue and records
/// the request. Panics if more calls are made than replies provided.
pub struct ScriptedProvider {
    replies: Mutex<Vec<Result<Message, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<Message, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn text(text: &str) -> Arc<Self> {
        Self::new(vec![Ok(Message::assistant(text))])
    }

    pub fn tool_then_answer(calls: Vec<ToolCallDirective>, answer: &str) -> Arc<Self> {
        Self::new(vec![
            Ok(Message::assistant_tool_calls(calls)),
            Ok(Message::assistant(answer)),
        ])
    }

    pub fn failing(error: ProviderError) -> Arc<Self> {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            panic!("ScriptedProvider: no reply scripted for call #{call}");
        }
        replies.remove(0).map(|message| ProviderResponse {
            message,
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
        })
    }
}

/// Helper to create a tool call directive.
pub fn tool_call(name: &str, args: serde_json::Value) -> ToolCallDirective {
    ToolCallDirective::new(format!("call_{name}"), name, args.to_string())
}

/// A speech model loader that always fails.
pub struct FailingLoader;

#[async_trait]
impl SpeechModelLoader for FailingLoader {
    async fn load(&self) -> Result<Arc<dyn SpeechModel>, SpeechError> {
        Err(SpeechError::ModelLoad("model unavailable".into()))
    }
}

pub struct SilentSink;

#[async_trait]
impl AudioSink for SilentSink {
    async fn play(&self, _audio: &WavBuffer) -> Result<(), SpeechError> {
        Ok(())
    }
}

/// A platform voice that records what it was asked to say.
#[derive(Default)]
pub struct RecordingVoice {
    pub spoken: Mutex<Vec<Utterance>>,
}

impl RecordingVoice {
    pub fn texts(&self) -> Vec<String> {
        self.spoken.lock().unwrap().iter().map(|u| u.text.clone()).collect()
    }
}

impl PlatformVoice for RecordingVoice {
    fn voices(&self) -> Vec<Voice> {
        vec![Voice {
            name: "Test".into(),
            lang: "en-US".into(),
        }]
    }

    fn speak(&self, utterance: Utterance, events: VoiceEvents) -> Result<(), SpeechError> {
        self.spoken.lock().unwrap().push(utterance);
        events.end();
        Ok(())
    }
}
