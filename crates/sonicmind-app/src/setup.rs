use std::sync::Arc;

use anyhow::Result;
use sonicmind_ai::actions::{GoogleSearch, YouTubePlayer};
use sonicmind_ai::intent::{KeywordClassifier, ZeroShotClassifier};
use sonicmind_ai::voice::{ProcessTts, SilentTts, UnavailableListener};
use sonicmind_ai::{Assistant, CommandProcessor};
use sonicmind_core::config::{AppConfig, ClassifierConfig, VoiceConfig};
use sonicmind_core::interfaces::{
    IntentClassifier, NotificationSink, SpeechCapture, SpeechSynthesizer,
};

/// Pick the classifier backend. Falls back to the keyword classifier if the
/// remote one cannot be built or the backend name is unknown.
pub fn build_classifier(config: &ClassifierConfig) -> Arc<dyn IntentClassifier> {
    match config.backend.as_str() {
        "keyword" => Arc::new(KeywordClassifier::new()),
        "huggingface" => match ZeroShotClassifier::new(config) {
            Ok(c) => Arc::new(c),
            Err(e) => {
                tracing::warn!("Zero-shot classifier unavailable: {e}, using keyword classifier");
                Arc::new(KeywordClassifier::new())
            }
        },
        other => {
            tracing::warn!("Unknown classifier backend '{other}', using keyword classifier");
            Arc::new(KeywordClassifier::new())
        }
    }
}

pub fn build_synthesizer(config: &VoiceConfig) -> Arc<dyn SpeechSynthesizer> {
    match ProcessTts::from_config(config) {
        Some(tts) => Arc::new(tts),
        None => {
            if config.tts_engine != "none" {
                tracing::warn!(
                    "Unknown TTS engine '{}', speech output disabled",
                    config.tts_engine
                );
            }
            Arc::new(SilentTts)
        }
    }
}

#[cfg(feature = "voice-stt")]
pub fn build_listener(config: &VoiceConfig) -> Arc<dyn SpeechCapture> {
    if !config.listen_enabled {
        return Arc::new(UnavailableListener::new("listening disabled in config"));
    }
    match sonicmind_ai::voice::MicrophoneListener::new(config) {
        Ok(listener) => Arc::new(listener),
        Err(e) => {
            tracing::warn!("Microphone listener unavailable: {e}");
            Arc::new(UnavailableListener::new(e.to_string()))
        }
    }
}

#[cfg(not(feature = "voice-stt"))]
pub fn build_listener(config: &VoiceConfig) -> Arc<dyn SpeechCapture> {
    if !config.listen_enabled {
        return Arc::new(UnavailableListener::new("listening disabled in config"));
    }
    Arc::new(UnavailableListener::new("built without the voice-stt feature"))
}

pub fn build_processor(config: &AppConfig) -> Result<CommandProcessor> {
    let processor = CommandProcessor::new(
        build_classifier(&config.classifier),
        Arc::new(YouTubePlayer::new(&config.actions)?),
        Arc::new(GoogleSearch::new(&config.actions)),
        build_synthesizer(&config.voice),
    )
    .with_min_confidence(config.classifier.min_confidence);
    Ok(processor)
}

pub fn build_assistant(config: &AppConfig, sink: Arc<dyn NotificationSink>) -> Result<Assistant> {
    let processor = build_processor(config)?;
    Ok(Assistant::new(processor, build_listener(&config.voice), sink))
}
