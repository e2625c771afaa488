// Audio capture, block queue, and spectrum analysis for specSCII.

pub mod capture;
pub mod error;
pub mod fft;
pub mod queue;

pub use capture::{AudioCapture, CaptureConfig};
pub use error::AudioError;
pub use fft::SpectrumAnalyzer;
pub use queue::{BlockConsumer, BlockProducer, block_queue};
