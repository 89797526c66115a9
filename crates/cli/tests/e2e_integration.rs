//! End-to-end integration tests for the Parley tutor.
//!
//! These tests exercise the full pipeline from learner input to reply,
//! including tool execution, memory recall, speech fallback and history
//! persistence.

use std::sync::{Arc, Mutex};

use parley_agent::{ChatSession, ConversationOrchestrator, HISTORY_KEY, ReplySource, SendOutcome};
use parley_config::AppConfig;
use parley_core::error::{ProviderError, SpeechError};
use parley_core::message::{ChatEntry, Message, Role, Sender, ToolCallDirective};
use parley_core::outcome::Outcome;
use parley_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use parley_core::store::KeyValueStore;
use parley_memory::{FileKvStore, InMemoryKvStore, InMemoryStore};
use parley_providers::CompletionClient;
use parley_speech::{
    AudioSink, PlatformVoice, SpeechModel, SpeechModelLoader, SpeechState, SpeechSynthesizer,
    Utterance, Voice, VoiceEvents, WavBuffer,
};
use parley_tools::default_registry;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted messages in sequence.
struct ScriptedProvider {
    replies: Mutex<Vec<Message>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<Message>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> ProviderRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(ProviderError::Network("script exhausted".into()));
        }
        Ok(ProviderResponse {
            message: replies.remove(0),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock".into(),
        })
    }
}

fn make_tool_call(name: &str, args: serde_json::Value) -> ToolCallDirective {
    ToolCallDirective::new(format!("call_{name}"), name, args.to_string())
}

// ── Mock speech ──────────────────────────────────────────────────────────

struct BrokenLoader {
    attempts: Mutex<usize>,
}

#[async_trait::async_trait]
impl SpeechModelLoader for BrokenLoader {
    async fn load(&self) -> Result<Arc<dyn SpeechModel>, SpeechError> {
        *self.attempts.lock().unwrap() += 1;
        tokio::task::yield_now().await;
        Err(SpeechError::ModelLoad("weights missing".into()))
    }
}

struct NullSink;

#[async_trait::async_trait]
impl AudioSink for NullSink {
    async fn play(&self, _audio: &WavBuffer) -> Result<(), SpeechError> {
        Ok(())
    }
}

#[derive(Default)]
struct TranscriptVoice {
    said: Mutex<Vec<String>>,
}

impl PlatformVoice for TranscriptVoice {
    fn voices(&self) -> Vec<Voice> {
        vec![Voice {
            name: "English".into(),
            lang: "en-US".into(),
        }]
    }

    fn speak(&self, utterance: Utterance, events: VoiceEvents) -> Result<(), SpeechError> {
        self.said.lock().unwrap().push(utterance.text);
        events.end();
        Ok(())
    }
}

fn orchestrator(provider: Arc<ScriptedProvider>) -> ConversationOrchestrator {
    ConversationOrchestrator::new(
        CompletionClient::new(provider, "mock"),
        Arc::new(default_registry()),
    )
}

// ── Scenario A: plain model reply ────────────────────────────────────────

#[tokio::test]
async fn e2e_plain_reply_is_returned_verbatim() {
    let raw =
        "Almost! Say \"Yesterday I went to the park.\" The verb 'go' becomes 'went' in the past.";
    let provider = ScriptedProvider::new(vec![Message::assistant(raw)]);
    let orch = orchestrator(provider.clone());

    let history = vec![ChatEntry::welcome(parley_core::message::DEFAULT_WELCOME_MESSAGE)];
    let reply = orch.respond(&history, "Yesterday I go to the park.").await;

    assert_eq!(reply.text, raw);
    assert_eq!(reply.source, ReplySource::Model);
    assert_eq!(provider.calls(), 1);

    let request = provider.request(0);
    assert_eq!(request.temperature, 0.3);
    assert_eq!(request.max_tokens, Some(500));
    assert_eq!(request.tool_choice.as_deref(), Some("auto"));
    assert_eq!(request.tools.len(), 6);
    // System prompt + user message; the welcome entry is dropped.
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.messages[1].text(), "Yesterday I go to the park.");
}

// ── Scenario B: one tool call, then the final answer ─────────────────────

#[tokio::test]
async fn e2e_pronunciation_tool_round_trip() {
    let provider = ScriptedProvider::new(vec![
        Message::assistant_tool_calls(vec![make_tool_call(
            "get_pronunciation_guide",
            serde_json::json!({"word": "tomato"}),
        )]),
        Message::assistant("In American English, say tuh-MAY-toh."),
    ]);
    let orch = orchestrator(provider.clone());

    let reply = orch.respond(&[], "How do I pronounce tomato?").await;

    assert_eq!(reply.text, "In American English, say tuh-MAY-toh.");
    assert_eq!(
        reply.source,
        ReplySource::Tool {
            name: "get_pronunciation_guide".into()
        }
    );
    assert_eq!(provider.calls(), 2);

    let follow_up = provider.request(1);
    let n = follow_up.messages.len();
    let echo = &follow_up.messages[n - 2];
    assert_eq!(echo.role, Role::Assistant);
    assert!(echo.content.is_none());
    assert_eq!(echo.tool_calls[0].function_name, "get_pronunciation_guide");

    let result = &follow_up.messages[n - 1];
    assert_eq!(result.role, Role::Tool);
    assert_eq!(result.tool_call_id.as_deref(), Some("call_get_pronunciation_guide"));
    assert!(result.text().contains("tuh-MAY-toh"));
}

// ── Scenario C: memory answers without a model call ──────────────────────

#[tokio::test]
async fn e2e_memory_short_circuit() {
    let provider = ScriptedProvider::new(vec![]);
    let memory = Arc::new(InMemoryStore::with_texts(["User: hi\nAssistant: Hello!"]));
    let orch = orchestrator(provider.clone()).with_memory(memory.clone());

    let reply = orch.respond(&[], "hi").await;

    assert_eq!(reply.text, "Hello!");
    assert_eq!(reply.source, ReplySource::Memory);
    assert_eq!(provider.calls(), 0);
    assert_eq!(memory.query_count(), 1);
}

#[tokio::test]
async fn e2e_model_replies_are_remembered() {
    let provider = ScriptedProvider::new(vec![Message::assistant("A happy accident.")]);
    let memory = Arc::new(InMemoryStore::new());
    let orch = orchestrator(provider.clone()).with_memory(memory.clone());

    orch.respond(&[], "What is serendipity?").await;
    // The second ask is answered from the stored turn.
    let again = orch.respond(&[], "What is serendipity?").await;

    assert_eq!(again.text, "A happy accident.");
    assert_eq!(again.source, ReplySource::Memory);
    assert_eq!(provider.calls(), 1);
    assert_eq!(memory.documents().await.len(), 1);
}

// ── Scenario D: model load fails, platform voice speaks ──────────────────

#[tokio::test]
async fn e2e_speech_falls_back_to_platform_voice() {
    let loader = Arc::new(BrokenLoader {
        attempts: Mutex::new(0),
    });
    let voice = Arc::new(TranscriptVoice::default());
    let speech = Arc::new(SpeechSynthesizer::new(
        loader.clone(),
        Arc::new(NullSink),
        voice.clone(),
    ));

    let (a, b) = tokio::join!(speech.initialize(), speech.initialize());
    assert_eq!(a, SpeechState::FallbackOnly);
    assert_eq!(b, SpeechState::FallbackOnly);
    assert_eq!(*loader.attempts.lock().unwrap(), 1);

    let provider = ScriptedProvider::new(vec![Message::assistant("Nice to meet you!")]);
    let orch = orchestrator(provider).with_speech(speech.clone());
    let reply = orch.respond(&[], "hi").await;

    assert_eq!(reply.text, "Nice to meet you!");
    assert_eq!(*voice.said.lock().unwrap(), vec!["Nice to meet you!".to_string()]);

    let outcome = speech.speak("hi", &Default::default()).await;
    assert!(matches!(outcome, Outcome::Degraded(_)));
}

// ── Failure path ─────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_provider_failure_becomes_apology() {
    let provider = ScriptedProvider::new(vec![]);
    let orch = orchestrator(provider);

    let reply = orch.respond(&[], "hello?").await;
    assert_eq!(reply.source, ReplySource::Apology);
    assert_eq!(reply.text, orch.chatbot().apology);
}

// ── Sessions and persistence ─────────────────────────────────────────────

#[tokio::test]
async fn e2e_session_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");

    let provider = ScriptedProvider::new(vec![Message::assistant("Good morning!")]);
    let mut session = ChatSession::load(
        Arc::new(orchestrator(provider)),
        Arc::new(FileKvStore::new(&path)),
    )
    .await;
    assert!(matches!(session.send("Good morning").await, SendOutcome::Replied(_)));
    let before = session.entries().to_vec();

    let restored = ChatSession::load(
        Arc::new(orchestrator(ScriptedProvider::new(vec![]))),
        Arc::new(FileKvStore::new(&path)),
    )
    .await;

    assert_eq!(restored.entries(), before.as_slice());
    let ids: Vec<u64> = restored.entries().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(restored.entries()[1].sender, Sender::User);
    assert_eq!(restored.entries()[2].timestamp, before[2].timestamp);
}

#[tokio::test]
async fn e2e_clear_forgets_history() {
    let store = Arc::new(InMemoryKvStore::new());
    let provider = ScriptedProvider::new(vec![Message::assistant("ok")]);
    let mut session = ChatSession::load(Arc::new(orchestrator(provider)), store.clone()).await;

    session.send("remember me").await;
    session.clear().await;

    assert_eq!(session.entries().len(), 1);
    assert!(store.get(HISTORY_KEY).await.unwrap().is_none());
}

// ── Over HTTP ────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_configured_client_talks_http() {
    use httpmock::prelude::*;

    let server = MockServer::start_async().await;
    let completion = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer sk-test");
            then.status(200).json_body(serde_json::json!({
                "model": "gpt-4o-mini",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Hi there, learner!"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 20, "completion_tokens": 4, "total_tokens": 24}
            }));
        })
        .await;

    let mut config = AppConfig::default();
    config.api_key = Some("sk-test".into());
    config.completion.base_url = server.base_url();
    config.memory.enabled = false;

    let client = CompletionClient::from_config(&config).unwrap();
    let orch = ConversationOrchestrator::from_config(
        &config,
        client,
        Arc::new(default_registry()),
        None,
        None,
    );

    let reply = orch.respond(&[], "hello").await;
    assert_eq!(reply.text, "Hi there, learner!");
    completion.assert_async().await;
}
