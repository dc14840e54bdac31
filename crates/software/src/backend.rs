use crate::{Dispatcher, buffer::Buffer};
use bumpalo::Bump;
use log::{debug, trace, warn};
use softdraw_core::{
    Color, Command, Context, DrawQueue, Error, FrameBuffer, ImageData, PixelFormat, Result, Size, Texture,
};
use slotmap::{DefaultKey, Key, KeyData, SlotMap};

/// Construction options of a [`SoftwareBackend`].
#[derive(Clone, Debug)]
pub struct SoftwareConfig {
    /// Pixel format of frame buffers created with [`SoftwareBackend::create_screen`].
    pub screen_format: PixelFormat,
    /// Initial size of the per flush arena in bytes.
    pub arena_capacity: usize,
}

impl Default for SoftwareConfig {
    fn default() -> Self {
        Self {
            screen_format: PixelFormat::RGBA8,
            arena_capacity: 64 * 1024,
        }
    }
}

/// A CPU implementation of [`Context`].
///
/// Owns every frame buffer and texture. Not meant to be shared between threads.
pub struct SoftwareBackend {
    config: SoftwareConfig,
    textures: SlotMap<DefaultKey, Buffer>,
    buffers: SlotMap<DefaultKey, Buffer>,

    arena: Bump,
}

impl SoftwareBackend {
    pub fn new() -> Self {
        Self::with_config(SoftwareConfig::default())
    }

    pub fn with_config(config: SoftwareConfig) -> Self {
        Self {
            arena: Bump::with_capacity(config.arena_capacity),
            textures: SlotMap::new(),
            buffers: SlotMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &SoftwareConfig {
        &self.config
    }

    /// Create a frame buffer in the configured screen format.
    pub fn create_screen(&mut self, size: impl Into<Size>) -> FrameBuffer {
        let format = self.config.screen_format;
        self.create_frame_buffer(size.into(), format)
    }

    /// Direct access to the storage of a frame buffer.
    pub fn frame_buffer(&self, id: FrameBuffer) -> Option<&Buffer> {
        self.buffers.get(frame_buffer_key(id))
    }

    /// Direct access to the storage of a texture.
    pub fn texture(&self, id: Texture) -> Option<&Buffer> {
        self.textures.get(texture_key(id))
    }
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn frame_buffer_key(id: FrameBuffer) -> DefaultKey {
    KeyData::from_ffi(id.0).into()
}

fn texture_key(id: Texture) -> DefaultKey {
    KeyData::from_ffi(id.0).into()
}

impl Context for SoftwareBackend {
    fn create_frame_buffer(&mut self, size: Size, format: PixelFormat) -> FrameBuffer {
        let id = self.buffers.insert(Buffer::new(size.width, size.height, format));
        FrameBuffer(id.data().as_ffi())
    }

    fn resize_frame_buffer(&mut self, id: FrameBuffer, size: Size) -> Result<()> {
        let buffer = self
            .buffers
            .get_mut(frame_buffer_key(id))
            .ok_or(Error::UnknownFrameBuffer(id))?;

        buffer.resize(size.width, size.height);
        Ok(())
    }

    fn delete_frame_buffer(&mut self, id: FrameBuffer) -> bool {
        self.buffers.remove(frame_buffer_key(id)).is_some()
    }

    fn create_texture(&mut self, data: ImageData) -> Result<Texture> {
        let buffer = Buffer::try_from(data)?;
        let id = self.textures.insert(buffer);
        Ok(Texture(id.data().as_ffi()))
    }

    fn delete_texture(&mut self, id: Texture) -> bool {
        self.textures.remove(texture_key(id)).is_some()
    }

    fn blit(&mut self, dst: FrameBuffer, src: FrameBuffer) -> Result<()> {
        let dst_key = frame_buffer_key(dst);
        let src_key = frame_buffer_key(src);

        if dst_key == src_key {
            if self.buffers.contains_key(dst_key) {
                return Ok(());
            }
            return Err(Error::UnknownFrameBuffer(dst));
        }

        if !self.buffers.contains_key(dst_key) {
            return Err(Error::UnknownFrameBuffer(dst));
        }

        let [dst, src] = self
            .buffers
            .get_disjoint_mut([dst_key, src_key])
            .ok_or(Error::UnknownFrameBuffer(src))?;

        dst.as_mut().blit_from(src.as_ref());
        Ok(())
    }

    fn blit_texture(&mut self, dst: FrameBuffer, src: Texture) -> Result<()> {
        let texture = self.textures.get(texture_key(src)).ok_or(Error::UnknownTexture(src))?;
        let target = self
            .buffers
            .get_mut(frame_buffer_key(dst))
            .ok_or(Error::UnknownFrameBuffer(dst))?;

        target.as_mut().blit_from(texture.as_ref());
        Ok(())
    }

    fn read_pixel(&self, id: FrameBuffer, x: i32, y: i32) -> Result<Color> {
        let buffer = self.frame_buffer(id).ok_or(Error::UnknownFrameBuffer(id))?;
        Ok(buffer.as_ref().get(x, y))
    }

    fn frame_buffer_image(&self, id: FrameBuffer) -> Result<ImageData<'_>> {
        let buffer = self.frame_buffer(id).ok_or(Error::UnknownFrameBuffer(id))?;
        Ok(buffer.as_image())
    }

    fn execute(&mut self, queue: &DrawQueue) {
        debug!(
            "flushing {} commands ({} vertices)",
            queue.len(),
            queue.vertices().len()
        );

        // consecutive commands with the same target form one dispatch group
        let mut commands = queue.list_commands().iter().peekable();
        while let Some(first) = commands.peek() {
            let target = first.target();
            let mut dispatcher = Dispatcher::new(&self.arena);

            while let Some(command) = commands.next_if(|command| command.target() == target) {
                match command {
                    Command::Clear { scissor, color, .. } => {
                        dispatcher.write_clear(*scissor, *color);
                    }
                    Command::Draw {
                        scissor,
                        flags,
                        vertices,
                        texture,
                        ..
                    } => {
                        let texture = match texture {
                            Some(id) => match self.textures.get(texture_key(*id)) {
                                Some(texture) => Some(texture.as_ref()),
                                None => {
                                    warn!("draw references unknown texture {id:?}, sampling as opaque white");
                                    None
                                }
                            },
                            None => None,
                        };

                        dispatcher.write_draw(*scissor, *flags, &queue.vertices()[vertices.clone()], texture);
                    }
                }
            }

            match self.buffers.get_mut(frame_buffer_key(target)) {
                Some(buffer) => {
                    let objects = dispatcher.len();
                    let written = dispatcher.dispatch(buffer.as_mut());
                    trace!("dispatched {objects} commands to {target:?}, {written} pixels written");
                }
                None => {
                    warn!("skipping {} commands for unknown frame buffer {target:?}", dispatcher.len());
                    drop(dispatcher);
                }
            }

            self.arena.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use softdraw_core::{Aabb, DrawFlags, Vertex};

    #[test]
    fn handles_do_not_outlive_their_buffers() {
        let mut backend = SoftwareBackend::new();
        let a = backend.create_frame_buffer(Size::new(2, 2), PixelFormat::RGBA8);
        assert!(backend.delete_frame_buffer(a));
        assert!(!backend.delete_frame_buffer(a));

        let b = backend.create_frame_buffer(Size::new(2, 2), PixelFormat::RGBA8);
        assert_ne!(a, b);
        assert_eq!(backend.read_pixel(a, 0, 0), Err(Error::UnknownFrameBuffer(a)));
        assert_eq!(backend.read_pixel(b, 0, 0), Ok(Color::TRANSPARENT));
    }

    #[test]
    fn screen_uses_configured_format() {
        let mut backend = SoftwareBackend::with_config(SoftwareConfig {
            screen_format: PixelFormat::BGRA8,
            ..Default::default()
        });

        let screen = backend.create_screen([3, 2]);
        let image = backend.frame_buffer_image(screen).unwrap();
        assert_eq!(image.format, PixelFormat::BGRA8);
        assert_eq!(image.data.len(), 24);
    }

    #[test]
    fn resize_reallocates() {
        let mut backend = SoftwareBackend::new();
        let screen = backend.create_screen([2, 2]);

        let mut queue = DrawQueue::new();
        queue.begin_clear(screen, Aabb::EVERYTHING, Color::RED);
        backend.execute(&queue);

        backend.resize_frame_buffer(screen, Size::new(3, 1)).unwrap();
        let buffer = backend.frame_buffer(screen).unwrap();
        assert_eq!(buffer.size(), Size::new(3, 1));
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn blit_reports_unknown_buffers() {
        let mut backend = SoftwareBackend::new();
        let a = backend.create_screen([2, 2]);
        let b = backend.create_screen([2, 2]);
        backend.delete_frame_buffer(b);

        assert_eq!(backend.blit(a, a), Ok(()));
        assert_eq!(backend.blit(a, b), Err(Error::UnknownFrameBuffer(b)));
        assert_eq!(backend.blit(b, a), Err(Error::UnknownFrameBuffer(b)));
        assert_eq!(backend.blit(b, b), Err(Error::UnknownFrameBuffer(b)));
    }

    #[test]
    fn blit_copies_between_buffers() {
        let mut backend = SoftwareBackend::new();
        let src = backend.create_screen([2, 2]);
        let dst = backend.create_frame_buffer(Size::new(2, 2), PixelFormat::BGRA8);

        let mut queue = DrawQueue::new();
        queue.begin_clear(src, Aabb::EVERYTHING, Color::new(1, 2, 3, 4));
        backend.execute(&queue);

        assert_eq!(backend.blit(dst, src), Ok(()));
        assert_eq!(backend.read_pixel(dst, 1, 1), Ok(Color::new(1, 2, 3, 4)));
        assert_eq!(backend.frame_buffer_image(dst).unwrap().data[..4], [3, 2, 1, 4]);
    }

    #[test_log::test]
    fn draws_to_deleted_targets_are_skipped() {
        let mut backend = SoftwareBackend::new();
        let gone = backend.create_screen([2, 2]);
        let alive = backend.create_screen([2, 2]);
        backend.delete_frame_buffer(gone);

        let mut queue = DrawQueue::new();
        queue.begin_clear(gone, Aabb::EVERYTHING, Color::RED);
        queue.begin_clear(alive, Aabb::EVERYTHING, Color::GREEN);
        backend.execute(&queue);

        assert_eq!(backend.read_pixel(alive, 1, 1), Ok(Color::GREEN));
    }

    #[test_log::test]
    fn deleted_textures_sample_white() {
        let mut backend = SoftwareBackend::new();
        let screen = backend.create_screen([2, 2]);
        let texture = backend
            .create_texture(ImageData {
                width: 1,
                height: 1,
                format: PixelFormat::RGBA8,
                data: &[1, 2, 3, 255],
            })
            .unwrap();
        assert!(backend.delete_texture(texture));

        let mut queue = DrawQueue::new();
        queue
            .begin_draw(screen, Aabb::EVERYTHING, 3)
            .flags(DrawFlags::TEXTURED)
            .texture(texture)
            .write_vertices(&[
                Vertex::new([0.0, 0.0], [0.0, 0.0], Color::BLACK),
                Vertex::new([4.0, 0.0], [0.0, 0.0], Color::BLACK),
                Vertex::new([0.0, 4.0], [0.0, 0.0], Color::BLACK),
            ]);
        backend.execute(&queue);

        assert_eq!(backend.read_pixel(screen, 0, 0), Ok(Color::WHITE));
    }
}
