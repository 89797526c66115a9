//! A speech model served over HTTP.
//!
//! - `GET  {url}/info` -> `{"sample_rate": 24000}` (checked once at load)
//! - `POST {url}/generate` `{"text", "lang", "speed"}`
//!   -> `{"samples": [...], "sample_rate": 24000}`

use async_trait::async_trait;
use parley_core::error::SpeechError;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::model::{SpeechModel, SpeechModelLoader};
use crate::synthesizer::SpeechOptions;
use crate::wav::RawAudio;

#[derive(Debug, Deserialize)]
struct ModelInfo {
    sample_rate: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    samples: Vec<f32>,
    #[serde(default)]
    sample_rate: Option<u32>,
}

pub struct HttpSpeechModelLoader {
    base_url: String,
    timeout: Duration,
}

impl HttpSpeechModelLoader {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl SpeechModelLoader for HttpSpeechModelLoader {
    async fn load(&self) -> Result<Arc<dyn SpeechModel>, SpeechError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| SpeechError::ModelLoad(e.to_string()))?;

        let resp = client
            .get(format!("{}/info", self.base_url))
            .send()
            .await
            .map_err(|e| SpeechError::ModelLoad(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(SpeechError::ModelLoad(format!(
                "model server returned {}",
                resp.status()
            )));
        }
        let info: ModelInfo = resp
            .json()
            .await
            .map_err(|e| SpeechError::ModelLoad(format!("bad model info: {e}")))?;

        Ok(Arc::new(HttpSpeechModel {
            base_url: self.base_url.clone(),
            sample_rate: info.sample_rate,
            client,
        }))
    }
}

struct HttpSpeechModel {
    base_url: String,
    sample_rate: u32,
    client: reqwest::Client,
}

#[async_trait]
impl SpeechModel for HttpSpeechModel {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    async fn generate(&self, text: &str, options: &SpeechOptions) -> Result<RawAudio, SpeechError> {
        let body = serde_json::json!({
            "text": text,
            "lang": options.lang,
            "speed": options.rate,
        });
        let resp = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Generation(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(SpeechError::Generation(format!(
                "model server returned {}",
                resp.status()
            )));
        }
        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| SpeechError::Generation(e.to_string()))?;

        Ok(RawAudio {
            samples: body.samples,
            sample_rate: body.sample_rate.unwrap_or(self.sample_rate),
        })
    }
}

/// Used when no model is configured: every load fails, so the synthesizer
/// settles in `FallbackOnly`.
pub struct NoModelLoader;

#[async_trait]
impl SpeechModelLoader for NoModelLoader {
    async fn load(&self) -> Result<Arc<dyn SpeechModel>, SpeechError> {
        Err(SpeechError::ModelLoad("no speech model configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn loads_and_generates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/info");
                then.status(200).json_body(json!({"sample_rate": 22050}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/generate")
                    .json_body(json!({"text": "hi", "lang": "en-GB", "speed": 1.5}));
                then.status(200).json_body(json!({"samples": [0.0, 0.5, -0.5]}));
            })
            .await;

        let model = HttpSpeechModelLoader::new(server.base_url()).load().await.unwrap();
        assert_eq!(model.sample_rate(), 22050);
        let options = SpeechOptions {
            lang: "en-GB".into(),
            rate: 1.5,
            ..SpeechOptions::default()
        };
        let audio = model.generate("hi", &options).await.unwrap();
        assert_eq!(audio.samples, vec![0.0, 0.5, -0.5]);
        assert_eq!(audio.sample_rate, 22050);
    }

    #[tokio::test]
    async fn unreachable_server_fails_load() {
        let err = HttpSpeechModelLoader::new("http://127.0.0.1:1")
            .with_timeout(Duration::from_secs(2))
            .load()
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SpeechError::ModelLoad(_)));
    }

    #[tokio::test]
    async fn generation_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/info");
                then.status(200).json_body(json!({"sample_rate": 24000}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/generate");
                then.status(503);
            })
            .await;

        let model = HttpSpeechModelLoader::new(server.base_url()).load().await.unwrap();
        let result = model.generate("hi", &SpeechOptions::default()).await;
        assert!(matches!(result, Err(SpeechError::Generation(_))));
    }

    #[tokio::test]
    async fn no_model_loader_always_fails() {
        assert!(NoModelLoader.load().await.is_err());
    }
}
