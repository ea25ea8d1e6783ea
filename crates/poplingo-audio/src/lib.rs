pub mod output;
pub mod pcm;

pub use output::{AudioSink, LogSink, open_default_output};
pub use pcm::{CHANNELS, PcmBuffer, SAMPLE_RATE, decode_base64_pcm, decode_pcm};

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Invalid audio payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),

    #[error("Audio device error: {0}")]
    DeviceError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
