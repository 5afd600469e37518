#[cfg(feature = "voice-stt")]
pub mod capture;
pub mod listener;
#[cfg(feature = "voice-stt")]
pub mod stt;
pub mod tts;
pub mod utterance;

#[cfg(feature = "voice-stt")]
pub use listener::MicrophoneListener;
pub use listener::UnavailableListener;
pub use tts::{ProcessTts, SilentTts};
