use crate::buffer::BufferRef;
use softdraw_core::{Color, DrawFlags, Vertex};

/// Per draw pixel pipeline: texture sample, vertex color modulation and blending.
#[derive(Clone, Copy, Debug)]
pub struct Compositor<'a> {
    flags: DrawFlags,
    texture: Option<BufferRef<'a>>,
}

impl<'a> Compositor<'a> {
    /// `texture` is only consulted with [`DrawFlags::TEXTURED`]; a missing texture samples as opaque white.
    pub fn new(flags: DrawFlags, texture: Option<BufferRef<'a>>) -> Self {
        Self { flags, texture }
    }

    pub fn flags(&self) -> DrawFlags {
        self.flags
    }

    /// Whether the destination pixel has to be read before writing.
    pub fn reads_destination(&self) -> bool {
        self.flags.contains(DrawFlags::BLENDING)
    }

    /// Source color of a pixel with barycentric `weights` inside `triangle`.
    #[inline]
    pub fn shade(&self, triangle: &[Vertex], weights: [f32; 3]) -> Color {
        let mut color = Color::WHITE;

        if self.flags.contains(DrawFlags::TEXTURED) {
            let u = interpolate(weights, [triangle[0].uv.x, triangle[1].uv.x, triangle[2].uv.x]);
            let v = interpolate(weights, [triangle[0].uv.y, triangle[1].uv.y, triangle[2].uv.y]);
            color = match self.texture {
                Some(texture) => texture.sample_nearest(u, v),
                None => Color::WHITE,
            };
        }

        if self.flags.contains(DrawFlags::COLORED) {
            let [c0, c1, c2] = [triangle[0].color, triangle[1].color, triangle[2].color];
            let vertex = Color {
                r: to_u8(interpolate(weights, [c0.r, c1.r, c2.r].map(f32::from))),
                g: to_u8(interpolate(weights, [c0.g, c1.g, c2.g].map(f32::from))),
                b: to_u8(interpolate(weights, [c0.b, c1.b, c2.b].map(f32::from))),
                a: to_u8(interpolate(weights, [c0.a, c1.a, c2.a].map(f32::from))),
            };
            color = modulate(color, vertex);
        }

        color
    }

    /// Final color to store given the shaded source. `dst` is only read when blending.
    #[inline]
    pub fn composite(&self, src: Color, dst: impl FnOnce() -> Color) -> Color {
        if self.reads_destination() { blend(src, dst()) } else { src }
    }
}

#[inline(always)]
fn interpolate(weights: [f32; 3], values: [f32; 3]) -> f32 {
    weights[0] * values[0] + weights[1] * values[1] + weights[2] * values[2]
}

#[inline(always)]
fn to_u8(x: f32) -> u8 {
    // NaN maps to 0
    x.round().clamp(0.0, 255.0) as u8
}

/// `a * b / 255`, rounded to nearest.
#[inline(always)]
fn mul_u8(a: u8, b: u8) -> u8 {
    let x = a as u32 * b as u32 + 128;
    ((x + (x >> 8)) >> 8) as u8
}

/// Per channel product of two colors normalized to `[0, 1]`.
#[inline]
pub fn modulate(a: Color, b: Color) -> Color {
    Color {
        r: mul_u8(a.r, b.r),
        g: mul_u8(a.g, b.g),
        b: mul_u8(a.b, b.b),
        a: mul_u8(a.a, b.a),
    }
}

/// Straight alpha "over": `src * src.a + dst * (1 - src.a)` on every channel, alpha included.
#[inline]
pub fn blend(src: Color, dst: Color) -> Color {
    let a = src.a;
    let inv = 255 - a;
    let mix = |s: u8, d: u8| mul_u8(s, a) + mul_u8(d, inv);

    Color {
        r: mix(src.r, dst.r),
        g: mix(src.g, dst.g),
        b: mix(src.b, dst.b),
        a: mix(src.a, dst.a),
    }
}
