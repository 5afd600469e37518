use async_trait::async_trait;
use sonicmind_core::interfaces::SpeechCapture;
use sonicmind_core::{AssistantError, AssistantResult};

/// Speech capture that is never available: the listener was disabled in
/// config or the binary was built without the `voice-stt` feature.
#[derive(Debug, Clone)]
pub struct UnavailableListener {
    reason: String,
}

impl UnavailableListener {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SpeechCapture for UnavailableListener {
    async fn listen(&self) -> AssistantResult<String> {
        tracing::warn!("Speech capture unavailable: {}", self.reason);
        Err(AssistantError::service_unavailable(self.reason.clone()))
    }
}

#[cfg(feature = "voice-stt")]
pub use mic::MicrophoneListener;

#[cfg(feature = "voice-stt")]
mod mic {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use async_trait::async_trait;
    use sonicmind_core::config::VoiceConfig;
    use sonicmind_core::interfaces::SpeechCapture;
    use sonicmind_core::{AssistantError, AssistantResult};

    use crate::voice::capture::MicStream;
    use crate::voice::stt::Transcriber;
    use crate::voice::utterance::{Step, UtteranceDetector};

    const POLL_INTERVAL: Duration = Duration::from_millis(30);

    /// Push-to-talk listener: opens the default microphone, records one
    /// utterance ended by trailing silence, and transcribes it with whisper.
    pub struct MicrophoneListener {
        transcriber: Arc<Transcriber>,
        voice: VoiceConfig,
    }

    /// Why a recording produced no audio to transcribe.
    enum RecordError {
        NoSpeech,
        Device(anyhow::Error),
    }

    impl MicrophoneListener {
        /// Load the whisper model. Fails if the model file is missing.
        pub fn new(config: &VoiceConfig) -> AssistantResult<Self> {
            let transcriber =
                Transcriber::load(config).map_err(|e| AssistantError::Config(format!("{e:#}")))?;
            Ok(Self {
                transcriber: Arc::new(transcriber),
                voice: config.clone(),
            })
        }

        fn record_utterance(voice: &VoiceConfig) -> Result<(Vec<f32>, u32), RecordError> {
            let mut mic = MicStream::open(voice).map_err(RecordError::Device)?;
            let mut detector = UtteranceDetector::new(voice, mic.sample_rate(), Instant::now());
            let mut frame = vec![0.0f32; detector.frame_size()];

            loop {
                if mic.has_failed() {
                    if detector.is_recording() {
                        tracing::warn!("Microphone failed mid-utterance, keeping what was heard");
                        break;
                    }
                    return Err(RecordError::Device(anyhow::anyhow!("Microphone stream failed")));
                }

                let step = if mic.read_frame(&mut frame) {
                    detector.push_frame(&frame, Instant::now())
                } else {
                    std::thread::sleep(POLL_INTERVAL);
                    detector.tick(Instant::now())
                };

                match step {
                    Step::Complete => break,
                    Step::NoSpeech => return Err(RecordError::NoSpeech),
                    Step::Waiting | Step::Recording => {}
                }
            }

            let rate = mic.sample_rate();
            let samples = detector.into_samples();
            tracing::info!(
                "Recorded {} samples ({:.1}s)",
                samples.len(),
                samples.len() as f32 / rate as f32
            );
            Ok((samples, rate))
        }
    }

    #[async_trait]
    impl SpeechCapture for MicrophoneListener {
        async fn listen(&self) -> AssistantResult<String> {
            let transcriber = self.transcriber.clone();
            let voice = self.voice.clone();

            tokio::task::spawn_blocking(move || {
                let (samples, rate) = match Self::record_utterance(&voice) {
                    Ok(recorded) => recorded,
                    Err(RecordError::NoSpeech) => return Err(AssistantError::SpeechUnrecognized),
                    Err(RecordError::Device(e)) => {
                        tracing::error!("Audio capture failed: {e:#}");
                        return Err(AssistantError::service_unavailable(e.to_string()));
                    }
                };

                match transcriber.transcribe(&samples, rate) {
                    Ok(text) if !text.is_empty() => {
                        tracing::info!("Heard: {text}");
                        Ok(text)
                    }
                    Ok(_) => Err(AssistantError::SpeechUnrecognized),
                    Err(e) => {
                        tracing::error!("Transcription error: {e:#}");
                        Err(AssistantError::service_unavailable(e.to_string()))
                    }
                }
            })
            .await
            .map_err(|e| AssistantError::service_unavailable(format!("Listener task failed: {e}")))?
        }
    }

}
