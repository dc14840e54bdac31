mod command;
mod data;
mod error;
mod font;
mod painter;
mod surface;

pub use command::{Command, Context, DrawQueue, DrawWriter, FrameBuffer, Texture};
pub use data::*;
pub use error::{Error, Result};
pub use font::{Font, Glyph};
pub use painter::Painter;
pub use surface::Surface;
