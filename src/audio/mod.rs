//! Audio Data Module
//!
//! Decoded PCM storage and the decode boundary:
//! - `PcmBuffer`: per-channel f32 sample data with a known sample rate
//! - WAV import (the upstream decode collaborator)

pub mod buffer;
pub mod io;

pub use buffer::PcmBuffer;
pub use io::import_wav;

#[cfg(feature = "async-decode")]
pub use io::import_wav_async;
