use bitflags::bitflags;

/// Pixel format of an image or a frame buffer.
///
/// Every format stores 8 bits per channel, tightly packed, row-major with no padding.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum PixelFormat {
    /// Alpha only. Reads back as white tinted by the stored alpha.
    A8,
    R8,
    RG8,
    RGB8,
    RGBA8,
    BGRA8,
    /// A format with no channels; buffers of this format hold no bytes.
    Unknown,
}

impl PixelFormat {
    /// Number of 8-bit channels stored per pixel.
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::A8 | PixelFormat::R8 => 1,
            PixelFormat::RG8 => 2,
            PixelFormat::RGB8 => 3,
            PixelFormat::RGBA8 | PixelFormat::BGRA8 => 4,
            PixelFormat::Unknown => 0,
        }
    }

    pub const fn bytes_per_pixel(self) -> usize {
        self.channels()
    }

    /// Byte offset of the `[r, g, b, a]` channels inside a single pixel, `None` if the format does not store it.
    pub const fn offsets(self) -> [Option<usize>; 4] {
        match self {
            PixelFormat::A8 => [None, None, None, Some(0)],
            PixelFormat::R8 => [Some(0), None, None, None],
            PixelFormat::RG8 => [Some(0), Some(1), None, None],
            PixelFormat::RGB8 => [Some(0), Some(1), Some(2), None],
            PixelFormat::RGBA8 => [Some(0), Some(1), Some(2), Some(3)],
            PixelFormat::BGRA8 => [Some(2), Some(1), Some(0), Some(3)],
            PixelFormat::Unknown => [None; 4],
        }
    }

    /// Size in bytes of a `width x height` image in this format.
    pub const fn image_len(self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.bytes_per_pixel()
    }
}

/// Image/texture data. Used for uploading textures to the backend and for handing finished frames to a [`Surface`](crate::Surface).
#[derive(Clone, Copy, Debug)]
pub struct ImageData<'a> {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: &'a [u8],
}

#[cfg(feature = "image")]
impl<'a> From<&'a image::RgbaImage> for ImageData<'a> {
    fn from(image: &'a image::RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            format: PixelFormat::RGBA8,
            data: image.as_raw(),
        }
    }
}

#[cfg(feature = "image")]
impl<'a> From<&'a image::RgbImage> for ImageData<'a> {
    fn from(image: &'a image::RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            format: PixelFormat::RGB8,
            data: image.as_raw(),
        }
    }
}

#[cfg(feature = "image")]
impl<'a> From<&'a image::GrayImage> for ImageData<'a> {
    fn from(image: &'a image::GrayImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            format: PixelFormat::R8,
            data: image.as_raw(),
        }
    }
}

/// Canonical 8-bit straight alpha RGBA color.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0, 255);
    pub const GREEN: Color = Color::new(0, 255, 0, 255);
    pub const BLUE: Color = Color::new(0, 0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<[u8; 4]> for Color {
    fn from(value: [u8; 4]) -> Self {
        Self::from_array(value)
    }
}

/// A plain 2D vector in physical pixels (or texture space for UVs).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(value: [f32; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

/// A single triangle corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec2,
    pub uv: Vec2,
    pub color: Color,
}

impl Vertex {
    pub fn new(pos: impl Into<Vec2>, uv: impl Into<Vec2>, color: Color) -> Self {
        Self {
            pos: pos.into(),
            uv: uv.into(),
            color,
        }
    }
}

/// A struct representing a size in physical pixels.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<[u32; 2]> for Size {
    fn from(value: [u32; 2]) -> Self {
        Self {
            width: value[0],
            height: value[1],
        }
    }
}

/// An axis aligned box with floating point extents and origin in the top left corner.
///
/// Used both for scissoring and for triangle bounding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// A box that contains every point, used when no scissor is set.
    pub const EVERYTHING: Aabb = Aabb {
        min: Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        max: Vec2::new(f32::INFINITY, f32::INFINITY),
    };

    pub fn new(min: impl Into<Vec2>, max: impl Into<Vec2>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Create a box from its top left corner and size.
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new([x, y], [x + width, y + height])
    }

    /// The box covering a whole `size` image.
    pub fn from_size(size: Size) -> Self {
        Self::new([0.0, 0.0], [size.width as f32, size.height as f32])
    }

    /// Smallest box containing every given point.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut result = Aabb {
            min: Vec2::new(f32::INFINITY, f32::INFINITY),
            max: Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        };

        for p in points {
            result.min.x = result.min.x.min(p.x);
            result.min.y = result.min.y.min(p.y);
            result.max.x = result.max.x.max(p.x);
            result.max.y = result.max.y.max(p.y);
        }

        result
    }

    pub fn width(&self) -> f32 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.max.y - self.min.y).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        !(self.min.x < self.max.x && self.min.y < self.max.y)
    }

    pub fn intersect(&self, other: Self) -> Self {
        Self {
            min: Vec2::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Vec2::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        }
    }
}

impl From<[f32; 4]> for Aabb {
    fn from(value: [f32; 4]) -> Self {
        Self::new([value[0], value[1]], [value[2], value[3]])
    }
}

bitflags! {
    /// Per draw options, independently combinable.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DrawFlags: u8 {
        /// Multiply the interpolated vertex color into the result.
        const COLORED = 0b001;
        /// Sample the bound texture at the interpolated UV.
        const TEXTURED = 0b010;
        /// Alpha blend the result over the destination instead of overwriting it.
        const BLENDING = 0b100;
    }
}
