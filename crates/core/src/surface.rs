use crate::Size;

/// The visible end of the pipeline, usually a window.
///
/// A surface receives finished frames and reports when it was resized, it is implemented outside of this crate.
pub trait Surface {
    /// Current size of the visible area in physical pixels.
    fn size(&self) -> Size;

    /// Whether the surface was resized since the last presented frame.
    fn resized(&self) -> bool;

    /// Transfer a tightly packed, row-major frame to the screen.
    fn present(&mut self, pixels: &[u8], width: u32, height: u32, bytes_per_pixel: usize);
}
