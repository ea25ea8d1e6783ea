//! Raw PCM decoding.
//!
//! Speech payloads are base64 text carrying signed 16-bit little-endian
//! samples, mono, 24 kHz. Decoding is a pure transform; resampling to the
//! device rate is left to the output sink.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::AudioError;

pub const SAMPLE_RATE: u32 = 24_000;
pub const CHANNELS: u16 = 1;

const I16_SCALE: f32 = 32768.0;

/// Channel-organized float samples at a fixed rate
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    pub sample_rate: u32,
    /// One `Vec` per channel, each `frame_count` long
    pub channels: Vec<Vec<f32>>,
}

impl PcmBuffer {
    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    pub fn frame_count(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    pub fn duration_secs(&self) -> f32 {
        self.frame_count() as f32 / self.sample_rate as f32
    }

    /// Frame-interleaved samples, as output streams expect them
    pub fn interleaved(&self) -> Vec<f32> {
        let frames = self.frame_count();
        let mut out = Vec::with_capacity(frames * self.channels.len());
        for i in 0..frames {
            for channel in &self.channels {
                out.push(channel[i]);
            }
        }
        out
    }
}

/// Standard alphabet, trailing `=` optional
const PAYLOAD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a base64 speech payload.
///
/// Only an invalid base64 alphabet is an error; truncated sample data is not.
pub fn decode_base64_pcm(payload: &str) -> Result<PcmBuffer, AudioError> {
    let bytes = PAYLOAD.decode(payload.trim())?;
    Ok(decode_pcm(&bytes))
}

/// Decode raw 16-bit LE bytes; a trailing odd byte is dropped
pub fn decode_pcm(bytes: &[u8]) -> PcmBuffer {
    let channel_count = CHANNELS as usize;
    let samples: Vec<f32> = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / I16_SCALE)
        .collect();

    let frame_count = samples.len() / channel_count;
    let mut channels = vec![Vec::with_capacity(frame_count); channel_count];
    for frame in 0..frame_count {
        for (c, channel) in channels.iter_mut().enumerate() {
            channel.push(samples[frame * channel_count + c]);
        }
    }

    PcmBuffer {
        sample_rate: SAMPLE_RATE,
        channels,
    }
}
