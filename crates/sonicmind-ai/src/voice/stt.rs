use std::path::Path;

use anyhow::Result;
use sonicmind_core::config::VoiceConfig;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::utterance::resample;

/// Whisper expects mono audio at this rate.
pub const WHISPER_SAMPLE_RATE: u32 = 16000;
/// Clips shorter than this are not worth a whisper pass.
const MIN_SAMPLES: usize = WHISPER_SAMPLE_RATE as usize / 10;

/// Turns one recorded command into lowercase text with whisper.cpp.
pub struct Transcriber {
    ctx: WhisperContext,
}

impl Transcriber {
    /// Load the GGML model named by `voice.whisper_model`.
    pub fn load(config: &VoiceConfig) -> Result<Self> {
        let model = &config.whisper_model;
        if !Path::new(model).exists() {
            anyhow::bail!("Whisper model not found: {model}");
        }
        let ctx = WhisperContext::new_with_params(model, WhisperContextParameters::default())
            .map_err(|e| anyhow::anyhow!("Failed to load whisper model {model}: {e:?}"))?;
        tracing::info!("Whisper model loaded from {model}");
        Ok(Self { ctx })
    }

    /// Transcribe mono samples recorded at `sample_rate`. Returns an empty
    /// string when nothing intelligible was said.
    pub fn transcribe(&self, samples: &[f32], sample_rate: u32) -> Result<String> {
        let audio = resample(samples, sample_rate, WHISPER_SAMPLE_RATE);
        if audio.len() < MIN_SAMPLES {
            return Ok(String::new());
        }

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| anyhow::anyhow!("Failed to create whisper state: {e:?}"))?;

        // Commands are a single short sentence.
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some("en"));
        params.set_single_segment(true);
        params.set_no_timestamps(true);
        params.set_suppress_blank(true);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_special(false);

        state
            .full(params, &audio)
            .map_err(|e| anyhow::anyhow!("Whisper transcription failed: {e:?}"))?;

        let segments: Vec<String> = (0..state.full_n_segments())
            .filter_map(|i| state.get_segment(i))
            .map(|segment| segment.to_string())
            .collect();

        Ok(clean_transcript(&segments.join(" ")).to_lowercase())
    }
}

/// Drop whisper's non-speech markers such as `[BLANK_AUDIO]` or `(music)`
/// and collapse whitespace.
pub fn clean_transcript(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut depth = 0usize;
    for c in raw.chars() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
