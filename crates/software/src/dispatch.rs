use crate::{
    blend::Compositor,
    buffer::{BufferMut, BufferRef},
    raster::{PixelRect, rasterize},
};
use bumpalo::{Bump, collections::Vec};
use softdraw_core::{Aabb, Color, DrawFlags, Vertex};

enum DispatchObject<'a> {
    Draw {
        scissor: Aabb,
        flags: DrawFlags,
        vertices: &'a [Vertex],
        texture: Option<BufferRef<'a>>,
    },

    Clear {
        scissor: Aabb,
        color: Color,
    },
}

/// A list of draws and clears bound for a single target.
///
/// Objects are stored in the arena and executed strictly in the order they were written.
pub struct Dispatcher<'a> {
    objects: Vec<'a, DispatchObject<'a>>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(arena: &'a Bump) -> Self {
        Self {
            objects: Vec::new_in(arena),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn write_clear(&mut self, scissor: impl Into<Aabb>, color: Color) {
        self.objects.push(DispatchObject::Clear {
            scissor: scissor.into(),
            color,
        });
    }

    /// `vertices` is a triangle list; a trailing partial triangle is ignored.
    pub fn write_draw(
        &mut self,
        scissor: impl Into<Aabb>,
        flags: DrawFlags,
        vertices: &'a [Vertex],
        texture: Option<BufferRef<'a>>,
    ) {
        self.objects.push(DispatchObject::Draw {
            scissor: scissor.into(),
            flags,
            vertices,
            texture,
        });
    }

    /// Execute every object against `target`. Returns the number of pixels written.
    pub fn dispatch(self, mut target: BufferMut) -> usize {
        let mut written = 0;

        for object in self.objects.iter() {
            match object {
                DispatchObject::Clear { scissor, color } => {
                    written += clear(target.reborrow(), *scissor, *color);
                }

                DispatchObject::Draw {
                    scissor,
                    flags,
                    vertices,
                    texture,
                } => {
                    let compositor = Compositor::new(*flags, *texture);
                    let clip = PixelRect::covered(*scissor, target.size());
                    if clip.is_empty() {
                        continue;
                    }

                    for triangle in vertices.chunks_exact(3) {
                        let positions = [triangle[0].pos, triangle[1].pos, triangle[2].pos];
                        rasterize(positions, clip, |x, y, weights| {
                            let src = compositor.shade(triangle, weights);
                            let color = compositor.composite(src, || target.get(x, y));
                            target.set(x, y, color);
                            written += 1;
                        });
                    }
                }
            }
        }

        written
    }
}

fn clear(mut target: BufferMut, scissor: Aabb, color: Color) -> usize {
    let rect = PixelRect::covered(scissor, target.size());

    for y in rect.y0..rect.y1 {
        for x in rect.x0..rect.x1 {
            target.set(x, y, color);
        }
    }

    rect.width() as usize * rect.height() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use softdraw_core::PixelFormat;

    fn quad(x0: f32, y0: f32, x1: f32, y1: f32, color: Color) -> [Vertex; 6] {
        let tl = Vertex::new([x0, y0], [0.0, 0.0], color);
        let tr = Vertex::new([x1, y0], [1.0, 0.0], color);
        let br = Vertex::new([x1, y1], [1.0, 1.0], color);
        let bl = Vertex::new([x0, y1], [0.0, 1.0], color);
        [tl, tr, bl, tr, br, bl]
    }

    #[test]
    fn objects_execute_in_order() {
        let arena = Bump::new();
        let mut target = Buffer::new(4, 4, PixelFormat::RGBA8);
        let red = quad(0.0, 0.0, 4.0, 4.0, Color::RED);
        let blue = quad(1.0, 1.0, 3.0, 3.0, Color::BLUE);

        let mut dispatcher = Dispatcher::new(&arena);
        dispatcher.write_clear(Aabb::EVERYTHING, Color::BLACK);
        dispatcher.write_draw(Aabb::EVERYTHING, DrawFlags::COLORED, &red, None);
        dispatcher.write_draw(Aabb::EVERYTHING, DrawFlags::COLORED, &blue, None);
        dispatcher.write_clear([3.0, 3.0, 4.0, 4.0], Color::GREEN);
        assert_eq!(dispatcher.len(), 4);

        let written = dispatcher.dispatch(target.as_mut());
        assert_eq!(written, 16 + 16 + 4 + 1);

        let view = target.as_ref();
        assert_eq!(view.get(0, 0), Color::RED);
        assert_eq!(view.get(1, 1), Color::BLUE);
        assert_eq!(view.get(2, 2), Color::BLUE);
        assert_eq!(view.get(3, 3), Color::GREEN);
    }

    #[test]
    fn scissor_and_target_bounds_clip_draws() {
        let arena = Bump::new();
        let mut target = Buffer::new(3, 3, PixelFormat::RGB8);
        let big = quad(-10.0, -10.0, 10.0, 10.0, Color::RED);

        let mut dispatcher = Dispatcher::new(&arena);
        dispatcher.write_draw([1.0, 0.0, 2.0, 9.0], DrawFlags::COLORED, &big, None);
        dispatcher.write_draw([5.0, 5.0, 9.0, 9.0], DrawFlags::COLORED, &big, None);

        assert_eq!(dispatcher.dispatch(target.as_mut()), 3);
        for y in 0..3 {
            for x in 0..3 {
                let expected = if x == 1 { Color::RED } else { Color::BLACK };
                assert_eq!(target.as_ref().get(x, y), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn partial_triangles_are_ignored() {
        let arena = Bump::new();
        let mut target = Buffer::new(2, 2, PixelFormat::RGBA8);
        let vertices = quad(0.0, 0.0, 2.0, 2.0, Color::RED);

        let mut dispatcher = Dispatcher::new(&arena);
        dispatcher.write_draw(Aabb::EVERYTHING, DrawFlags::COLORED, &vertices[..5], None);

        // only the top left triangle, which does not own the diagonal
        assert_eq!(dispatcher.dispatch(target.as_mut()), 1);
        assert_eq!(target.as_ref().get(0, 0), Color::RED);
    }
}
