mod backend;
mod blend;
mod buffer;
mod dispatch;
mod raster;

pub use backend::*;
pub use blend::{Compositor, blend, modulate};
pub use buffer::{Buffer, BufferMut, BufferRef, decode, encode};
pub use dispatch::*;
pub use raster::{PixelRect, rasterize};
