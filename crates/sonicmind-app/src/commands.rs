use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use sonicmind_ai::{Assistant, AssistantEvent, CommandProcessor};
use sonicmind_core::config::AppConfig;
use sonicmind_core::interfaces::NotificationSink;
use sonicmind_core::{ActionResult, ActionStatus, CommandSource, Intent};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::setup::{build_assistant, build_processor};

pub const BANNER: &str = "\
Try commands like:
  - 'Play Despacito'
  - 'Tell me a joke'
  - 'Search Python tutorials'
Type a command, /speak to use the microphone, /quit to exit.";

/// Prints assistant feedback to stdout. In quiet mode nothing is printed and
/// the caller reports the final result itself.
pub struct TerminalSink {
    quiet: bool,
}

impl TerminalSink {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl NotificationSink for TerminalSink {
    fn notify(&self, event: &AssistantEvent) {
        if self.quiet {
            return;
        }
        println!("{}", render_event(event));
    }
}

pub fn render_event(event: &AssistantEvent) -> String {
    match event {
        AssistantEvent::Listening => "Listening... Speak now!".to_string(),
        AssistantEvent::Heard {
            source: CommandSource::Typed,
            text,
        } => format!("You typed: {text}"),
        AssistantEvent::Heard {
            source: CommandSource::Voice,
            text,
        } => format!("You said: {text}"),
        AssistantEvent::IntentDetected(intent) => format!("Detected Intent: {intent}"),
        AssistantEvent::Completed(result) => render_result(result),
    }
}

fn render_result(result: &ActionResult) -> String {
    let prefix = match result.status {
        ActionStatus::Success => "[ok]",
        ActionStatus::Warning => "[warning]",
        ActionStatus::Error => "[error]",
    };
    format!("{prefix} {}", result.message)
}

fn print_json(result: &ActionResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

fn assistant_for(config: &AppConfig, json: bool) -> Result<Assistant> {
    build_assistant(config, Arc::new(TerminalSink::new(json)))
}

pub async fn run_typed(config: &AppConfig, text: String, json: bool) -> Result<()> {
    let assistant = assistant_for(config, json)?;
    let result = assistant.run_typed(&text).await;
    if json {
        print_json(&result)?;
    }
    assistant.shutdown();
    Ok(())
}

pub async fn speak(config: &AppConfig, json: bool) -> Result<()> {
    let assistant = assistant_for(config, json)?;
    let result = assistant.run_spoken().await;
    if json {
        print_json(&result)?;
    }
    assistant.shutdown();
    Ok(())
}

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
pub enum LineInput {
    Speak,
    Quit,
    Typed(String),
}

pub fn parse_line(line: &str) -> LineInput {
    match line.trim() {
        "/speak" => LineInput::Speak,
        "/quit" | "/exit" => LineInput::Quit,
        other => LineInput::Typed(other.to_string()),
    }
}

pub async fn interactive(config: &AppConfig) -> Result<()> {
    let assistant = assistant_for(config, false)?;
    println!("{BANNER}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_line(&line) {
            LineInput::Quit => break,
            LineInput::Speak => {
                assistant.run_spoken().await;
            }
            LineInput::Typed(text) => {
                assistant.run_typed(&text).await;
            }
        }
    }

    assistant.shutdown();
    Ok(())
}

pub async fn classify(config: &AppConfig, text: String) -> Result<()> {
    let processor = build_processor(config)?;
    for line in classification_report(&processor, &text).await {
        println!("{line}");
    }
    Ok(())
}

/// Ranked labels followed by the resolved intent. Calls the classifier once.
pub async fn classification_report(processor: &CommandProcessor, text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let classified = if text.trim().is_empty() {
        Intent::Unknown
    } else {
        match processor.rank_labels(text).await {
            Ok(ranked) => {
                lines.extend(
                    ranked
                        .iter()
                        .map(|entry| format!("{}\t{:.4}", entry.label, entry.score)),
                );
                processor.top_intent(&ranked)
            }
            Err(e) => {
                lines.push(format!("Classifier error: {e}"));
                Intent::Unknown
            }
        }
    };
    let intent = processor.registry().apply_override(classified, text);
    lines.push(format!("Intent: {intent}"));
    lines
}
