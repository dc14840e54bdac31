use crate::{Aabb, Size, Texture, Vec2};
use std::collections::HashMap;

/// Placement of a single character inside a font atlas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    /// Source rectangle in atlas texels.
    pub source: Aabb,
    /// Offset of the glyph's top left corner from the pen position.
    pub offset: Vec2,
    /// Horizontal pen advance after drawing the glyph.
    pub advance: f32,
}

/// A bitmap font backed by an already uploaded atlas texture.
///
/// Decoding font files into an atlas happens outside of this crate.
#[derive(Clone, Debug)]
pub struct Font {
    pub texture: Texture,
    pub atlas: Size,
    pub line_height: f32,
    pub glyphs: HashMap<char, Glyph>,
}

impl Font {
    pub fn new(texture: Texture, atlas: Size, line_height: f32) -> Self {
        Self {
            texture,
            atlas,
            line_height,
            glyphs: HashMap::new(),
        }
    }

    pub fn with_glyph(mut self, c: char, glyph: Glyph) -> Self {
        self.glyphs.insert(c, glyph);
        self
    }

    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    /// Source rectangle of a glyph in normalized texture coordinates.
    pub fn uv(&self, glyph: &Glyph) -> Aabb {
        let w = self.atlas.width.max(1) as f32;
        let h = self.atlas.height.max(1) as f32;
        Aabb::new(
            [glyph.source.min.x / w, glyph.source.min.y / h],
            [glyph.source.max.x / w, glyph.source.max.y / h],
        )
    }
}
