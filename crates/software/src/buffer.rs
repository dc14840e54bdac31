use softdraw_core::{Color, Error, ImageData, PixelFormat, Size};

/// Owned pixel storage, used both for frame buffers and textures.
///
/// The byte length is always exactly `width * height * channels(format)`.
#[derive(Clone, Debug)]
pub struct Buffer {
    data: Box<[u8]>,
    width: u32,
    height: u32,
    format: PixelFormat,
}

/// A borrowed read-only view of a [`Buffer`].
#[derive(Clone, Copy, Debug)]
pub struct BufferRef<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    format: PixelFormat,
}

/// A borrowed writable view of a [`Buffer`].
#[derive(Debug)]
pub struct BufferMut<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl Buffer {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            data: vec![0; format.image_len(width, height)].into_boxed_slice(),
            width,
            height,
            format,
        }
    }

    /// Reallocate the storage at a new size. The old contents are discarded, not scaled or preserved.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height, self.format);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_image(&self) -> ImageData<'_> {
        ImageData {
            width: self.width,
            height: self.height,
            format: self.format,
            data: &self.data,
        }
    }

    pub fn as_ref(&self) -> BufferRef<'_> {
        BufferRef {
            data: &self.data,
            width: self.width,
            height: self.height,
            format: self.format,
        }
    }

    pub fn as_mut(&mut self) -> BufferMut<'_> {
        BufferMut {
            data: &mut self.data,
            width: self.width,
            height: self.height,
            format: self.format,
        }
    }
}

impl<'a> TryFrom<ImageData<'a>> for Buffer {
    type Error = Error;

    fn try_from(image: ImageData<'a>) -> Result<Self, Self::Error> {
        let expected = image.format.image_len(image.width, image.height);
        if image.data.len() != expected {
            return Err(Error::InvalidImageData {
                format: image.format,
                width: image.width,
                height: image.height,
                expected,
                actual: image.data.len(),
            });
        }

        Ok(Self {
            data: image.data.into(),
            width: image.width,
            height: image.height,
            format: image.format,
        })
    }
}

#[inline]
fn pixel_offset(width: u32, height: u32, format: PixelFormat, x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
        return None;
    }

    Some((y as usize * width as usize + x as usize) * format.bytes_per_pixel())
}

impl<'a> BufferRef<'a> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Read a pixel as canonical RGBA. Out of range reads return opaque white.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Color {
        match pixel_offset(self.width, self.height, self.format, x, y) {
            Some(offset) => decode(self.format, &self.data[offset..]),
            None => Color::WHITE,
        }
    }

    /// Nearest neighbor sample at normalized texture coordinates.
    ///
    /// The texel whose center is closest to `(u * width, v * height)` is read, so samples outside
    /// of `[0, 1)` and samples of an empty buffer return opaque white.
    #[inline]
    pub fn sample_nearest(&self, u: f32, v: f32) -> Color {
        let x = (u * self.width as f32).floor();
        let y = (v * self.height as f32).floor();

        // NaN casts to 0, huge coordinates saturate and fall out of range
        self.get(x as i32, y as i32)
    }
}

impl<'a> BufferMut<'a> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn as_ref(&self) -> BufferRef<'_> {
        BufferRef {
            data: &*self.data,
            width: self.width,
            height: self.height,
            format: self.format,
        }
    }

    pub fn reborrow(&mut self) -> BufferMut<'_> {
        BufferMut {
            data: &mut *self.data,
            width: self.width,
            height: self.height,
            format: self.format,
        }
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Color {
        self.as_ref().get(x, y)
    }

    /// Write a pixel. Out of range writes are dropped.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if let Some(offset) = pixel_offset(self.width, self.height, self.format, x, y) {
            encode(self.format, color, &mut self.data[offset..]);
        }
    }

    /// Copy the overlapping top left region of `src`, converting pixel by pixel through canonical RGBA.
    pub fn blit_from(&mut self, src: BufferRef) {
        let width = self.width.min(src.width) as i32;
        let height = self.height.min(src.height) as i32;

        for y in 0..height {
            for x in 0..width {
                self.set(x, y, src.get(x, y));
            }
        }
    }
}

/// Decode the first pixel of `bytes`. Channels the format does not store read as 255.
#[inline]
pub fn decode(format: PixelFormat, bytes: &[u8]) -> Color {
    let [r, g, b, a] = format.offsets().map(|offset| match offset {
        Some(offset) => bytes[offset],
        None => 255,
    });

    Color { r, g, b, a }
}

/// Encode `color` into the first pixel of `bytes`, dropping channels the format does not store.
#[inline]
pub fn encode(format: PixelFormat, color: Color, bytes: &mut [u8]) {
    for (offset, value) in format.offsets().into_iter().zip(color.to_array()) {
        if let Some(offset) = offset {
            bytes[offset] = value;
        }
    }
}
