//! `parley chat` and `parley ask` — interactive and single-message modes.

use std::io::Write;

use parley_agent::{ChatSession, ReplySource, SendOutcome};
use parley_core::outcome::Outcome;
use tokio::io::{self, AsyncBufReadExt, BufReader};

use crate::runtime::{self, CliResult};

pub async fn ask(message: String) -> CliResult<()> {
    let config = runtime::load_config()?;
    runtime::require_api_key(&config)?;

    let mut session = runtime::open_session(&config).await?;
    session.orchestrator().initialize().await;

    eprint!("  Thinking...");
    let outcome = session.send(&message).await;
    eprint!("\r              \r");
    match outcome {
        SendOutcome::Replied(reply) => println!("{}", reply.text),
        SendOutcome::Ignored => return Err("Message is empty".into()),
        SendOutcome::TooLong { length, max } => {
            return Err(format!("Message is too long ({length} characters, max {max})").into());
        }
    }
    Ok(())
}

pub async fn run(speak: bool, no_memory: bool) -> CliResult<()> {
    let config = runtime::load_config()?;
    runtime::require_api_key(&config)?;

    let mut session = runtime::open_session(&config).await?;
    let orchestrator = session.orchestrator().clone();
    if speak {
        orchestrator.set_speech_enabled(true);
    }
    if no_memory {
        orchestrator.set_memory_enabled(false);
    }
    let report = orchestrator.initialize().await;

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║          Parley — English Tutor Chat         ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:     {}", config.completion.model);
    println!("  Tools:     {}", orchestrator.tools().names().join(", "));
    println!(
        "  Memory:    {}",
        if report.memory_ready { "connected" } else { "off" }
    );
    println!(
        "  Speech:    {} ({})",
        on_off(orchestrator.speech_enabled()),
        report.speech.map(|s| s.to_string()).unwrap_or_else(|| "none".into())
    );
    println!();
    println!("  Commands:  /memory  /speech  /say  /clear  /exit");
    println!();

    for entry in session.entries() {
        print_entry(entry.sender == parley_core::message::Sender::User, &entry.text);
    }

    let mut lines = BufReader::new(io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => {}
            "/exit" | "/quit" | "exit" | "quit" => break,
            "/memory" => {
                let enabled = !orchestrator.memory_enabled();
                orchestrator.set_memory_enabled(enabled);
                println!("  [memory {}]", on_off(enabled));
            }
            "/speech" => {
                let enabled = !orchestrator.speech_enabled();
                orchestrator.set_speech_enabled(enabled);
                println!("  [speech {}]", on_off(enabled));
            }
            "/clear" => {
                session.clear().await;
                println!("  [history cleared]");
                print_entry(false, &session.entries()[0].text);
            }
            "/say" => say(&session).await,
            text => send(&mut session, text).await,
        }
        prompt()?;
    }

    println!();
    println!("  Goodbye! 👋");
    println!();
    Ok(())
}

async fn send(session: &mut ChatSession, text: &str) {
    eprint!("  ...");
    let outcome = session.send(text).await;
    eprint!("\r     \r");
    match outcome {
        SendOutcome::Replied(reply) => {
            println!();
            print_entry(false, &reply.text);
            match reply.source {
                ReplySource::Memory => println!("  (from memory)"),
                ReplySource::Tool { name } => println!("  (used {name})"),
                ReplySource::Model | ReplySource::Apology => {}
            }
            println!();
        }
        SendOutcome::TooLong { length, max } => {
            eprintln!("  [Message too long: {length} characters, max {max}]");
        }
        SendOutcome::Ignored => {}
    }
}

async fn say(session: &ChatSession) {
    match session.pronounce_last_word().await {
        Some(p) => match p.outcome {
            Outcome::Ok(()) => println!("  [spoke \"{}\"]", p.phrase),
            Outcome::Degraded(reason) => {
                println!("  [spoke \"{}\" with the system voice: {reason}]", p.phrase)
            }
            Outcome::Fail(e) => eprintln!("  [Could not speak \"{}\": {e}]", p.phrase),
        },
        None => println!("  [nothing to pronounce]"),
    }
}

fn print_entry(from_user: bool, text: &str) {
    let prefix = if from_user { "You" } else { "Tutor" };
    for line in text.lines() {
        println!("  {prefix} > {line}");
    }
}

fn prompt() -> CliResult<()> {
    print!("  You > ");
    std::io::stdout().flush()?;
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
