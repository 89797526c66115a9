//! `parley doctor` — Diagnose system health.

use parley_config::AppConfig;
use parley_core::memory::MemoryStore;
use parley_core::provider::Provider;
use parley_providers::CompletionClient;
use parley_speech::{SpeechState, SpeechSynthesizer};

use crate::runtime;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Parley Doctor — System Diagnostics");
    println!("=====================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file, using defaults (run `parley init`)");
    }
    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            return Ok(());
        }
    };

    match CompletionClient::from_config(&config) {
        Ok(client) => {
            println!(
                "  ✅ API key configured ({} via {})",
                client.model(),
                client.provider().name()
            );
            match client.provider().health_check().await {
                Ok(true) => {
                    println!("  ✅ Completion endpoint reachable ({})", config.completion.base_url)
                }
                Ok(false) => {
                    println!(
                        "  ❌ Completion endpoint rejected the request ({})",
                        config.completion.base_url
                    );
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Completion endpoint unreachable: {e}");
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    if config.memory.enabled {
        let available = match runtime::memory_store(&config) {
            Some(memory) => memory.check_availability().await,
            None => false,
        };
        if available {
            println!("  ✅ Memory backend reachable ({})", config.memory.url);
        } else {
            println!(
                "  ⚠️  Memory backend unavailable ({}); chat works without it",
                config.memory.url
            );
            issues += 1;
        }
    } else {
        println!("  ➖ Memory disabled");
    }

    let speech = SpeechSynthesizer::from_config(&config.speech);
    match speech.initialize().await {
        SpeechState::Ready => println!("  ✅ Speech model ready"),
        state => println!(
            "  ➖ Speech model {state}; replies use `{}`",
            config.speech.voice_command
        ),
    }

    let history = config.history.resolved_path();
    println!("  ➖ History file: {}", history.display());

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
