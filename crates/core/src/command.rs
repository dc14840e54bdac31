use crate::{Aabb, Color, DrawFlags, ImageData, PixelFormat, Result, Size, Vertex};
use log::warn;
use std::ops::Range;

/// The heart of `softdraw`.
///
/// Context is used to interact with the rendering backend: it owns every frame buffer and texture
/// and executes recorded [`DrawQueue`]s against them.
pub trait Context {
    /// Create a zero-initialized frame buffer and return its ID. See [`FrameBuffer`] for more info.
    ///
    /// If you want to delete the frame buffer, you should call [`Context::delete_frame_buffer`] with the returned ID.
    fn create_frame_buffer(&mut self, size: Size, format: PixelFormat) -> FrameBuffer;

    /// Reallocate a frame buffer at a new size. Previous contents are discarded.
    fn resize_frame_buffer(&mut self, id: FrameBuffer, size: Size) -> Result<()>;

    /// Delete a frame buffer by its ID.
    fn delete_frame_buffer(&mut self, id: FrameBuffer) -> bool;

    /// Create a texture from already decoded image data and return its ID. See [`Texture`] for more info.
    ///
    /// Fails if the data length does not match `width * height * channels(format)`.
    fn create_texture(&mut self, data: ImageData) -> Result<Texture>;

    /// Delete a texture by its ID.
    fn delete_texture(&mut self, id: Texture) -> bool;

    /// Copy the overlapping region of `src` into `dst`, converting between pixel formats.
    fn blit(&mut self, dst: FrameBuffer, src: FrameBuffer) -> Result<()>;

    /// Copy the overlapping region of a texture into `dst`, converting between pixel formats.
    fn blit_texture(&mut self, dst: FrameBuffer, src: Texture) -> Result<()>;

    /// Read a single pixel as canonical RGBA. Out of range coordinates read as opaque white.
    fn read_pixel(&self, id: FrameBuffer, x: i32, y: i32) -> Result<Color>;

    /// Borrow the raw pixels of a frame buffer, e.g. for presentation.
    fn frame_buffer_image(&self, id: FrameBuffer) -> Result<ImageData<'_>>;

    /// Execute every command of the queue in submission order.
    fn execute(&mut self, queue: &DrawQueue);
}

/// Frame buffer.
///
/// A writable image owned by the backend, the only thing commands can draw into.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct FrameBuffer(pub u64);

/// Texture.
///
/// A read-only image that can be sampled by textured draws.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Texture(pub u64);

/// A single recorded draw command.
///
/// Every command captures the target and scissor that were active when it was submitted.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Clear {
        target: FrameBuffer,
        scissor: Aabb,
        color: Color,
    },
    Draw {
        target: FrameBuffer,
        scissor: Aabb,
        flags: DrawFlags,
        /// Range into [`DrawQueue::vertices`], always a multiple of 3 long.
        vertices: Range<usize>,
        texture: Option<Texture>,
    },
}

impl Command {
    pub fn target(&self) -> FrameBuffer {
        match self {
            Command::Clear { target, .. } | Command::Draw { target, .. } => *target,
        }
    }

    pub fn scissor(&self) -> Aabb {
        match self {
            Command::Clear { scissor, .. } | Command::Draw { scissor, .. } => *scissor,
        }
    }
}

/// Draw command queue.
///
/// Used to store a list of draw commands to be executed on the backend.
/// The commands are executed in order they are added to the queue.
///
/// Vertices of every draw live in one shared pool that is released in bulk by [`DrawQueue::reset_commands`].
#[derive(Clone, Debug, Default)]
pub struct DrawQueue {
    commands: Vec<Command>,
    vertices: Vec<Vertex>,
}

/// A writer for a single draw command.
///
/// Used to fill in the vertices and options of a draw. The command is appended to the queue when the writer is dropped.
pub struct DrawWriter<'a> {
    owner: &'a mut DrawQueue,
    target: FrameBuffer,
    scissor: Aabb,
    flags: DrawFlags,
    texture: Option<Texture>,
    vertices: Range<usize>,
}

impl DrawQueue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the queue and release every vertex, keeping the allocated capacity
    pub fn reset_commands(&mut self) {
        self.commands.clear();
        self.vertices.clear();
    }

    /// List the commands currently stored in the queue
    pub fn list_commands(&self) -> &[Command] {
        &self.commands
    }

    /// The vertex pool referenced by [`Command::Draw`]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Record a command that sets every pixel of `target` inside `scissor` to `color`
    pub fn begin_clear(&mut self, target: FrameBuffer, scissor: Aabb, color: Color) {
        self.commands.push(Command::Clear { target, scissor, color });
    }

    /// Record a triangle list draw with room for `vertex_count` vertices.
    ///
    /// `vertex_count` is rounded down to a multiple of 3. The vertices start out zeroed (transparent black at the origin).
    pub fn begin_draw(&mut self, target: FrameBuffer, scissor: Aabb, vertex_count: usize) -> DrawWriter<'_> {
        let count = vertex_count - vertex_count % 3;
        if count != vertex_count {
            warn!("draw with {vertex_count} vertices is not a triangle list, only {count} are used");
        }

        let start = self.vertices.len();
        self.vertices.resize(start + count, Vertex::default());

        DrawWriter {
            owner: self,
            target,
            scissor,
            flags: DrawFlags::empty(),
            texture: None,
            vertices: start..start + count,
        }
    }
}

impl<'a> DrawWriter<'a> {
    /// Replace the draw options
    pub fn flags(&mut self, flags: DrawFlags) -> &mut Self {
        self.flags = flags;
        self
    }

    /// Set the texture sampled when [`DrawFlags::TEXTURED`] is set
    pub fn texture(&mut self, texture: Texture) -> &mut Self {
        self.texture = Some(texture);
        self
    }

    /// Mutable access to the vertices of this draw
    pub fn vertices(&mut self) -> &mut [Vertex] {
        &mut self.owner.vertices[self.vertices.clone()]
    }

    /// Copy vertices in, starting at the first one. Extra vertices are ignored.
    pub fn write_vertices(&mut self, vertices: &[Vertex]) -> &mut Self {
        let dst = self.vertices();
        let len = dst.len().min(vertices.len());
        dst[..len].copy_from_slice(&vertices[..len]);
        self
    }
}

impl<'a> Drop for DrawWriter<'a> {
    fn drop(&mut self) {
        self.owner.commands.push(Command::Draw {
            target: self.target,
            scissor: self.scissor,
            flags: self.flags,
            vertices: self.vertices.clone(),
            texture: self.texture,
        });
    }
}
