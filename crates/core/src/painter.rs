use crate::{
    Aabb, Color, Context, DrawFlags, DrawQueue, DrawWriter, Font, FrameBuffer, Result, Surface, Texture, Vec2, Vertex,
};
use log::debug;

/// Immediate mode drawing state.
///
/// A painter records draws into its own [`DrawQueue`], stamping each one with the target and scissor
/// that are active at the time of the call. Nothing touches pixels until [`Painter::flush`].
///
/// One painter is meant to be driven from a single thread; use separate painters for separate displays.
#[derive(Debug)]
pub struct Painter {
    queue: DrawQueue,
    target: FrameBuffer,
    scissor: Option<Aabb>,
    blending: bool,
}

impl Painter {
    /// Create a painter drawing into `target`, with no scissor and blending enabled.
    pub fn new(target: FrameBuffer) -> Self {
        Self {
            queue: DrawQueue::new(),
            target,
            scissor: None,
            blending: true,
        }
    }

    /// Change the target of every draw recorded from now on.
    pub fn bind_target(&mut self, target: FrameBuffer) {
        self.target = target;
    }

    pub fn target(&self) -> FrameBuffer {
        self.target
    }

    /// Restrict every draw recorded from now on to `scissor`.
    pub fn set_scissor(&mut self, scissor: impl Into<Aabb>) {
        self.scissor = Some(scissor.into());
    }

    pub fn clear_scissor(&mut self) {
        self.scissor = None;
    }

    pub fn scissor(&self) -> Option<Aabb> {
        self.scissor
    }

    /// Whether the quad and text helpers alpha blend over the target.
    pub fn set_blending(&mut self, blending: bool) {
        self.blending = blending;
    }

    pub fn blending(&self) -> bool {
        self.blending
    }

    /// Commands recorded since the last flush.
    pub fn queue(&self) -> &DrawQueue {
        &self.queue
    }

    fn captured_scissor(&self) -> Aabb {
        self.scissor.unwrap_or(Aabb::EVERYTHING)
    }

    fn helper_flags(&self, flags: DrawFlags) -> DrawFlags {
        if self.blending {
            flags | DrawFlags::BLENDING
        } else {
            flags
        }
    }

    /// Record a clear of the scissored target to exactly `color`.
    pub fn clear(&mut self, color: Color) {
        let scissor = self.captured_scissor();
        self.queue.begin_clear(self.target, scissor, color);
    }

    /// Record a raw triangle list draw, the caller fills in vertices and options through the writer.
    pub fn begin_draw(&mut self, vertex_count: usize) -> DrawWriter<'_> {
        let scissor = self.captured_scissor();
        self.queue.begin_draw(self.target, scissor, vertex_count)
    }

    /// Record a triangle list draw with explicit options.
    pub fn draw_triangles(&mut self, vertices: &[Vertex], flags: DrawFlags, texture: Option<Texture>) {
        let mut writer = self.begin_draw(vertices.len());
        writer.flags(flags).write_vertices(vertices);
        if let Some(texture) = texture {
            writer.texture(texture);
        }
    }

    /// Record a solid colored rectangle.
    pub fn draw_quad(&mut self, rect: impl Into<Aabb>, color: Color) {
        let vertices = quad_vertices(rect.into(), Aabb::new([0.0, 0.0], [1.0, 1.0]), color);
        let flags = self.helper_flags(DrawFlags::COLORED);
        self.draw_triangles(&vertices, flags, None);
    }

    /// Record a textured rectangle showing the `uv` region of `texture`, multiplied by `tint`.
    pub fn draw_textured_quad(&mut self, rect: impl Into<Aabb>, texture: Texture, uv: impl Into<Aabb>, tint: Color) {
        let vertices = quad_vertices(rect.into(), uv.into(), tint);
        let flags = self.helper_flags(DrawFlags::TEXTURED | DrawFlags::COLORED);
        self.draw_triangles(&vertices, flags, Some(texture));
    }

    /// Record a line of text with its first glyph pen position at `origin`.
    ///
    /// `'\n'` starts a new line; characters the font has no glyph for are skipped.
    /// Returns the pen position after the last character.
    pub fn draw_text(&mut self, font: &Font, origin: impl Into<Vec2>, text: &str, color: Color) -> Vec2 {
        let origin = origin.into();
        let mut pen = origin;
        let mut vertices = Vec::with_capacity(text.len() * 6);

        for c in text.chars() {
            if c == '\n' {
                pen = Vec2::new(origin.x, pen.y + font.line_height);
                continue;
            }

            let Some(glyph) = font.glyph(c) else {
                continue;
            };

            let rect = Aabb::from_rect(
                pen.x + glyph.offset.x,
                pen.y + glyph.offset.y,
                glyph.source.width(),
                glyph.source.height(),
            );
            vertices.extend_from_slice(&quad_vertices(rect, font.uv(glyph), color));
            pen.x += glyph.advance;
        }

        if !vertices.is_empty() {
            let flags = self.helper_flags(DrawFlags::TEXTURED | DrawFlags::COLORED);
            self.draw_triangles(&vertices, flags, Some(font.texture));
        }

        pen
    }

    /// Execute every recorded command and empty the queue.
    pub fn flush(&mut self, context: &mut impl Context) {
        context.execute(&self.queue);
        self.queue.reset_commands();
    }

    /// Flush, present the bound target and follow a pending surface resize.
    pub fn swap(&mut self, context: &mut impl Context, surface: &mut impl Surface) -> Result<()> {
        self.flush(context);

        let image = context.frame_buffer_image(self.target)?;
        surface.present(image.data, image.width, image.height, image.format.bytes_per_pixel());

        if surface.resized() {
            let size = surface.size();
            debug!("surface resized to {}x{}, reallocating {:?}", size.width, size.height, self.target);
            context.resize_frame_buffer(self.target, size)?;
        }

        Ok(())
    }
}

/// Two triangles covering `rect`, sharing the top right to bottom left diagonal.
fn quad_vertices(rect: Aabb, uv: Aabb, color: Color) -> [Vertex; 6] {
    let tl = Vertex::new(rect.min, uv.min, color);
    let tr = Vertex::new([rect.max.x, rect.min.y], [uv.max.x, uv.min.y], color);
    let br = Vertex::new(rect.max, uv.max, color);
    let bl = Vertex::new([rect.min.x, rect.max.y], [uv.min.x, uv.max.y], color);
    [tl, tr, bl, tr, br, bl]
}
