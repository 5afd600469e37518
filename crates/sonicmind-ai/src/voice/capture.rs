use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::{traits::*, HeapCons, HeapRb};
use sonicmind_core::config::VoiceConfig;

/// Extra buffer beyond the longest allowed utterance.
const BUFFER_HEADROOM_SECS: u32 = 2;

/// Live mono microphone stream for one listen.
///
/// Samples are downmixed in the cpal callback and queued in a lock-free ring
/// buffer. Dropping the stream closes the device.
pub struct MicStream {
    _stream: cpal::Stream,
    samples: HeapCons<f32>,
    sample_rate: u32,
    failed: Arc<AtomicBool>,
}

impl MicStream {
    /// Open the default input device as close to `config.sample_rate` as it
    /// allows. The ring buffer holds `max_record_secs` plus headroom at the
    /// rate the device actually delivers.
    pub fn open(config: &VoiceConfig) -> Result<Self> {
        let device = cpal::default_host()
            .default_input_device()
            .context("No audio input device available")?;
        if let Ok(desc) = device.description() {
            tracing::info!("Listening on {:?}", desc);
        }

        let stream_config = input_config(&device, config.sample_rate)?;
        let sample_rate = stream_config.sample_rate();
        let channels = (stream_config.channels() as usize).max(1);
        tracing::debug!("Microphone: {sample_rate}Hz, {channels} channel(s)");

        let capacity = sample_rate as usize * (config.max_record_secs + BUFFER_HEADROOM_SECS) as usize;
        let (mut producer, samples) = HeapRb::<f32>::new(capacity.max(1)).split();

        let failed = Arc::new(AtomicBool::new(false));
        let failed_flag = failed.clone();

        let stream = device
            .build_input_stream(
                &stream_config.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    for frame in data.chunks(channels) {
                        let mono = frame.iter().sum::<f32>() / frame.len() as f32;
                        let _ = producer.try_push(mono);
                    }
                },
                move |err| {
                    tracing::error!("Microphone stream error: {err}");
                    failed_flag.store(true, Ordering::Relaxed);
                },
                None,
            )
            .context("Failed to open microphone stream")?;
        stream.play().context("Failed to start microphone")?;

        Ok(Self {
            _stream: stream,
            samples,
            sample_rate,
            failed,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// True once the device reported an error. No further samples will arrive.
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    /// Fill `frame` if a whole frame is queued. Partial frames stay queued.
    pub fn read_frame(&mut self, frame: &mut [f32]) -> bool {
        if self.samples.occupied_len() < frame.len() {
            return false;
        }
        self.samples.pop_slice(frame) == frame.len()
    }
}

/// Prefer a mono f32 range containing `target`, then any f32 range containing
/// it, then the device default.
fn input_config(device: &cpal::Device, target: u32) -> Result<cpal::SupportedStreamConfig> {
    let ranges: Vec<cpal::SupportedStreamConfigRange> = device
        .supported_input_configs()
        .context("Failed to query microphone formats")?
        .filter(|range| {
            range.sample_format() == cpal::SampleFormat::F32
                && range.min_sample_rate() <= target
                && range.max_sample_rate() >= target
        })
        .collect();

    let preferred = ranges
        .iter()
        .find(|range| range.channels() == 1)
        .or_else(|| ranges.first())
        .cloned();

    match preferred {
        Some(range) => Ok(range.with_sample_rate(target)),
        None => device
            .default_input_config()
            .context("No supported microphone format"),
    }
}
