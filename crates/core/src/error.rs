use crate::{FrameBuffer, PixelFormat, Texture};
use thiserror::Error;

/// Errors returned by the resource management side of a [`Context`](crate::Context).
///
/// Drawing itself never fails: out of range writes are dropped and out of range reads return a sentinel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid {format:?} image data length: {actual} != {expected} ({width} x {height} x {})", .format.bytes_per_pixel())]
    InvalidImageData {
        format: PixelFormat,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("unknown frame buffer {0:?}")]
    UnknownFrameBuffer(FrameBuffer),

    #[error("unknown texture {0:?}")]
    UnknownTexture(Texture),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
