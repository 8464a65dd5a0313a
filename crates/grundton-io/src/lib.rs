//! Audio file I/O for the grundton host tools.
//!
//! The tracker has two input channels (one per tracked string) and two
//! oscillator outputs, so everything here is stereo: [`read_wav_stereo`]
//! loads a recording as `[channel A, channel B]` and [`write_wav_stereo`]
//! saves the oscillator pair.
//!
//! ```rust,ignore
//! use grundton_io::{read_wav_stereo, write_wav_stereo};
//!
//! let (input, spec) = read_wav_stereo("strings.wav")?;
//! // ... run the tracker ...
//! write_wav_stereo("oscillators.wav", &output, spec)?;
//! ```

mod wav;

pub use wav::{StereoSamples, WavFormat, WavInfo, WavSpec, read_wav_info, read_wav_stereo, write_wav_stereo};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file uses a sample format this crate does not handle.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
