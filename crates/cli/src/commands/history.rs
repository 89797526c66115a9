//! `parley history` and `parley clear` — inspect or reset the saved chat log.

use parley_agent::HISTORY_KEY;
use parley_core::message::{ChatEntry, Sender};

use crate::runtime::{self, CliResult};

pub async fn run(json: bool) -> CliResult<()> {
    let config = runtime::load_config()?;
    let store = runtime::history_store(&config);

    let Some(raw) = store.get(HISTORY_KEY).await? else {
        println!("  No saved history at {}", config.history.resolved_path().display());
        return Ok(());
    };
    let entries: Vec<ChatEntry> =
        serde_json::from_str(&raw).map_err(|e| format!("Saved history is unreadable: {e}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        let who = match entry.sender {
            Sender::User => "You",
            Sender::Bot => "Tutor",
        };
        let when = entry.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M");
        println!("  [{when}] {who} > {}", entry.text);
    }
    println!();
    println!("  {} message(s)", entries.len());
    Ok(())
}

pub async fn clear() -> CliResult<()> {
    let config = runtime::load_config()?;
    runtime::history_store(&config).remove(HISTORY_KEY).await?;
    println!("✅ Chat history cleared");
    Ok(())
}
