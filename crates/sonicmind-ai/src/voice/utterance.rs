//! Cutting one spoken command out of a live sample stream.
//!
//! The detector is fed ~100ms frames (or told that none arrived) and decides
//! when the utterance has started and ended. It owns no audio device, so the
//! timing rules are testable with synthetic frames and instants.

use std::time::{Duration, Instant};

use sonicmind_core::config::VoiceConfig;

/// Mean-square energy below which a frame counts as silence.
pub const SILENCE_ENERGY: f32 = 0.001;
/// How long to wait for the user to start talking.
pub const SPEECH_START_TIMEOUT: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// No speech yet.
    Waiting,
    /// Speech in progress.
    Recording,
    /// Utterance finished; take it with `into_samples`.
    Complete,
    /// Nobody spoke before the start timeout.
    NoSpeech,
}

#[derive(Debug)]
pub struct UtteranceDetector {
    frame_size: usize,
    silence_limit: u32,
    max_samples: usize,
    max_duration: Duration,
    opened_at: Instant,
    speech_started: Option<Instant>,
    silence_frames: u32,
    samples: Vec<f32>,
}

impl UtteranceDetector {
    pub fn new(config: &VoiceConfig, sample_rate: u32, opened_at: Instant) -> Self {
        let frame_size = (sample_rate as usize / 10).max(1);
        let max_record_secs = config.max_record_secs.max(1);
        let silence_limit =
            ((config.silence_secs.max(0.1) * sample_rate as f32) / frame_size as f32).ceil() as u32;

        Self {
            frame_size,
            silence_limit: silence_limit.max(1),
            max_samples: sample_rate as usize * max_record_secs as usize,
            max_duration: Duration::from_secs(max_record_secs as u64),
            opened_at,
            speech_started: None,
            silence_frames: 0,
            samples: Vec::new(),
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn is_recording(&self) -> bool {
        self.speech_started.is_some()
    }

    /// Feed one full frame captured at `now`.
    pub fn push_frame(&mut self, frame: &[f32], now: Instant) -> Step {
        let energy = frame_energy(frame);

        if self.speech_started.is_none() {
            if energy < SILENCE_ENERGY {
                return self.tick(now);
            }
            tracing::debug!("Speech started");
            self.speech_started = Some(now);
        }

        self.samples.extend_from_slice(frame);
        if energy < SILENCE_ENERGY {
            self.silence_frames += 1;
        } else {
            self.silence_frames = 0;
        }

        if self.silence_frames >= self.silence_limit || self.samples.len() >= self.max_samples {
            return Step::Complete;
        }
        self.tick(now)
    }

    /// Account for time passing without a full frame. Recording is capped by
    /// wall-clock time as well, so a stalled stream cannot keep it open.
    pub fn tick(&mut self, now: Instant) -> Step {
        match self.speech_started {
            Some(started) if now.saturating_duration_since(started) >= self.max_duration => {
                tracing::debug!("Recording hit the {:?} limit", self.max_duration);
                Step::Complete
            }
            Some(_) => Step::Recording,
            None if now.saturating_duration_since(self.opened_at) >= SPEECH_START_TIMEOUT => {
                Step::NoSpeech
            }
            None => Step::Waiting,
        }
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

fn frame_energy(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32
}

/// Linear-interpolation resampling. Returns the input unchanged when rates match.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }
    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((samples.len() as f64) / ratio).floor() as usize;
    (0..out_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let idx = pos as usize;
            let frac = (pos - idx as f64) as f32;
            let a = samples[idx];
            let b = samples.get(idx + 1).copied().unwrap_or(a);
            a + (b - a) * frac
        })
        .collect()
}
