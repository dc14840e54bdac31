//! A small CPU 2D rasterizer.
//!
//! Draws are recorded through a [`Painter`] into a [`DrawQueue`] and only touch pixels when the queue is
//! flushed into a [`Context`]. The `software` feature provides the CPU [`Context`] implementation.

pub use softdraw_core::*;

#[cfg(feature = "software")]
pub mod software {
    pub use softdraw_software::*;
}
