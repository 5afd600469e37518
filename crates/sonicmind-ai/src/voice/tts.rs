use std::io::Write;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};
use async_trait::async_trait;
use sonicmind_core::config::VoiceConfig;
use sonicmind_core::interfaces::SpeechSynthesizer;
use sonicmind_core::{AssistantError, AssistantResult};

/// How `ProcessTts` turns text into sound.
#[derive(Debug, Clone)]
enum Engine {
    /// Text on piper's stdin, raw PCM from piper's stdout into `player`.
    Piper { synth: Vec<String>, player: Vec<String> },
    /// One program that takes the text as its last argument.
    Argument { argv: Vec<String> },
}

/// Speech output through external programs, selected by `voice.tts_engine`.
///
/// Every spawned program must exit successfully, otherwise the utterance
/// counts as failed.
#[derive(Debug, Clone)]
pub struct ProcessTts {
    engine: Engine,
}

impl ProcessTts {
    /// Build the engine named in config. Returns `None` for `"none"` or an
    /// engine name this build does not know.
    pub fn from_config(config: &VoiceConfig) -> Option<Self> {
        let engine = match config.tts_engine.as_str() {
            "piper" => Engine::Piper {
                synth: vec![
                    config.piper_binary.clone(),
                    "--model".into(),
                    config.piper_model.clone(),
                    "--config".into(),
                    config.piper_config.clone(),
                    "--output-raw".into(),
                ],
                player: split_command_line(&config.piper_player),
            },
            "command" => Engine::Argument {
                argv: split_command_line(&config.tts_command),
            },
            _ => return None,
        };
        Some(Self { engine })
    }

    /// Speak `text`, blocking until playback finishes.
    pub fn speak_blocking(&self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        match &self.engine {
            Engine::Piper { synth, player } => {
                tracing::debug!("Piper speaking: {text}");
                let mut synth_child = program(synth)?
                    .stdin(Stdio::piped())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::null())
                    .spawn()
                    .with_context(|| format!("Failed to spawn {}", synth[0]))?;
                let pcm = synth_child
                    .stdout
                    .take()
                    .context("Piper stdout not captured")?;

                let mut player_child = match program(player).and_then(|mut cmd| {
                    cmd.stdin(pcm)
                        .stdout(Stdio::null())
                        .stderr(Stdio::null())
                        .spawn()
                        .with_context(|| format!("Failed to spawn {}", player[0]))
                }) {
                    Ok(child) => child,
                    Err(e) => {
                        let _ = synth_child.kill();
                        let _ = synth_child.wait();
                        return Err(e);
                    }
                };

                // stdin is closed when the handle drops, which lets piper finish.
                let written = match synth_child.stdin.take() {
                    Some(mut stdin) => stdin.write_all(text.as_bytes()),
                    None => Ok(()),
                };

                let synth_status = synth_child.wait().context("Failed to wait for piper")?;
                let player_status = player_child.wait().context("Failed to wait for player")?;
                check_exit(&synth[0], synth_status)?;
                check_exit(&player[0], player_status)?;
                written.context("Failed to write text to piper")
            }
            Engine::Argument { argv } => {
                tracing::debug!("TTS speaking via {}: {text}", argv.first().map_or("", String::as_str));
                let status = program(argv)?
                    .arg(text)
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .with_context(|| format!("Failed to run {}", argv[0]))?;
                check_exit(&argv[0], status)
            }
        }
    }
}

fn split_command_line(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

fn program(argv: &[String]) -> Result<Command> {
    let (name, args) = argv
        .split_first()
        .filter(|(name, _)| !name.is_empty())
        .context("No TTS program configured")?;
    let mut cmd = Command::new(name);
    cmd.args(args);
    Ok(cmd)
}

fn check_exit(name: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        anyhow::bail!("{name} exited with {status}")
    }
}

#[async_trait]
impl SpeechSynthesizer for ProcessTts {
    async fn speak(&self, text: &str) -> AssistantResult<()> {
        let engine = self.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || engine.speak_blocking(&text))
            .await
            .map_err(|e| AssistantError::Synthesis(format!("TTS task panicked: {e}")))?
            .map_err(|e| AssistantError::Synthesis(format!("{e:#}")))
    }
}

/// Discards everything. Used when speech output is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentTts;

#[async_trait]
impl SpeechSynthesizer for SilentTts {
    async fn speak(&self, text: &str) -> AssistantResult<()> {
        tracing::debug!("TTS disabled, not speaking: {text}");
        Ok(())
    }
}
