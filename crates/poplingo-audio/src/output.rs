use std::sync::Arc;

use crate::AudioError;
use crate::pcm::PcmBuffer;

/// Somewhere decoded audio can be sent.
///
/// `play` starts playback and returns without waiting for it to finish;
/// buffers sent back to back may overlap.
pub trait AudioSink: Send + Sync {
    fn play(&self, buffer: PcmBuffer) -> Result<(), AudioError>;
}

/// Sink that only logs. Used when the crate is built without `audio-io`.
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&self, buffer: PcmBuffer) -> Result<(), AudioError> {
        tracing::info!(
            "Audio output disabled, dropping {:.2}s clip ({} frames @ {} Hz)",
            buffer.duration_secs(),
            buffer.frame_count(),
            buffer.sample_rate
        );
        Ok(())
    }
}

/// Open the default output for this build
pub fn open_default_output() -> Result<Arc<dyn AudioSink>, AudioError> {
    #[cfg(feature = "audio-io")]
    {
        Ok(Arc::new(device::DeviceOutput::open()?))
    }

    #[cfg(not(feature = "audio-io"))]
    {
        Ok(Arc::new(LogSink))
    }
}

#[cfg(feature = "audio-io")]
pub mod device {
    use kanal::Sender;
    use rodio::buffer::SamplesBuffer;
    use rodio::OutputStream;

    use super::AudioSink;
    use crate::AudioError;
    use crate::pcm::PcmBuffer;

    /// Default output device.
    ///
    /// The output stream is not `Send`, so it lives on its own thread and
    /// receives buffers over a channel. Each buffer becomes an independent
    /// source mixed by rodio; the device rate conversion happens there.
    pub struct DeviceOutput {
        tx: Sender<PcmBuffer>,
    }

    impl DeviceOutput {
        pub fn open() -> Result<Self, AudioError> {
            let (tx, rx) = kanal::unbounded::<PcmBuffer>();
            let (ready_tx, ready_rx) = kanal::bounded::<Result<(), String>>(1);

            std::thread::Builder::new()
                .name("poplingo-audio".to_string())
                .spawn(move || {
                    let (_stream, handle) = match OutputStream::try_default() {
                        Ok(pair) => {
                            let _ = ready_tx.send(Ok(()));
                            pair
                        }
                        Err(e) => {
                            let _ = ready_tx.send(Err(e.to_string()));
                            return;
                        }
                    };

                    tracing::info!("Audio output stream opened");

                    while let Ok(buffer) = rx.recv() {
                        let source = SamplesBuffer::new(
                            buffer.channel_count(),
                            buffer.sample_rate,
                            buffer.interleaved(),
                        );
                        if let Err(e) = handle.play_raw(source) {
                            tracing::error!("Audio playback failed: {}", e);
                        }
                    }

                    tracing::info!("Audio output thread stopping");
                })?;

            match ready_rx.recv() {
                Ok(Ok(())) => Ok(Self { tx }),
                Ok(Err(e)) => Err(AudioError::DeviceError(e)),
                Err(_) => Err(AudioError::DeviceError(
                    "audio thread exited before opening the device".to_string(),
                )),
            }
        }
    }

    impl AudioSink for DeviceOutput {
        fn play(&self, buffer: PcmBuffer) -> Result<(), AudioError> {
            self.tx
                .send(buffer)
                .map_err(|_| AudioError::DeviceError("audio thread is gone".to_string()))
        }
    }
}
