use softdraw_core::{Aabb, Size, Vec2};

/// A half-open rectangle of whole pixels, `x0..x1` by `y0..y1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    /// Pixels of a `size` image whose centers lie inside `aabb`.
    ///
    /// A pixel center exactly on the min edge is inside, one on the max edge is outside.
    pub fn covered(aabb: Aabb, size: Size) -> Self {
        let aabb = aabb.intersect(Aabb::from_size(size));

        // float to int casts saturate, so an empty or inverted box stays empty
        Self {
            x0: (aabb.min.x - 0.5).ceil() as i32,
            y0: (aabb.min.y - 0.5).ceil() as i32,
            x1: (aabb.max.x - 0.5).ceil() as i32,
            y1: (aabb.max.y - 0.5).ceil() as i32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn width(&self) -> u32 {
        (self.x1 - self.x0).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y1 - self.y0).max(0) as u32
    }
}

/// Twice the signed area of `(a, b, p)`.
///
/// The endpoints are always evaluated in the same order, so an edge shared by two triangles
/// yields exactly negated values for both and no pixel can fall through the crack between them.
#[inline(always)]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    #[inline(always)]
    fn orient(a: Vec2, b: Vec2, p: Vec2) -> f32 {
        (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
    }

    if (a.x, a.y) <= (b.x, b.y) {
        orient(a, b, p)
    } else {
        -orient(b, a, p)
    }
}

/// Whether the edge `a -> b` of a triangle with area sign `sign` owns the pixels lying exactly on it.
///
/// Top edges are horizontal with the triangle below them, left edges have the triangle to their right.
#[inline(always)]
fn is_top_left(a: Vec2, b: Vec2, sign: f32) -> bool {
    let dx = (b.x - a.x) * sign;
    let dy = (b.y - a.y) * sign;
    (dy == 0.0 && dx > 0.0) || dy < 0.0
}

/// Scan convert a single triangle.
///
/// `visit` is called once per covered pixel inside `clip` with the barycentric weights of the pixel
/// center relative to `p0`, `p1` and `p2`. The weights sum to 1. Degenerate triangles cover nothing.
///
/// Two triangles sharing an edge never both cover a pixel on that edge and never both skip it.
pub fn rasterize(triangle: [Vec2; 3], clip: PixelRect, mut visit: impl FnMut(i32, i32, [f32; 3])) {
    let [p0, p1, p2] = triangle;

    let area = edge(p0, p1, p2);
    if area == 0.0 || !area.is_finite() {
        return;
    }

    let sign = area.signum();
    let inclusive = [is_top_left(p1, p2, sign), is_top_left(p2, p0, sign), is_top_left(p0, p1, sign)];

    let bounds = Aabb::from_points(triangle);
    let x0 = clip.x0.max((bounds.min.x - 0.5).ceil() as i32);
    let y0 = clip.y0.max((bounds.min.y - 0.5).ceil() as i32);
    let x1 = clip.x1.min(((bounds.max.x - 0.5).floor() as i32).saturating_add(1));
    let y1 = clip.y1.min(((bounds.max.y - 0.5).floor() as i32).saturating_add(1));

    for y in y0..y1 {
        for x in x0..x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let e = [edge(p1, p2, p), edge(p2, p0, p), edge(p0, p1, p)];

            let inside = (0..3).all(|i| {
                let e = e[i] * sign;
                e > 0.0 || (e == 0.0 && inclusive[i])
            });

            if inside {
                visit(x, y, [e[0] / area, e[1] / area, e[2] / area]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    const CLIP: PixelRect = PixelRect {
        x0: 0,
        y0: 0,
        x1: 32,
        y1: 32,
    };

    fn coverage(triangles: &[[Vec2; 3]], clip: PixelRect) -> Vec<u32> {
        let mut hits = vec![0; 32 * 32];
        for triangle in triangles {
            rasterize(*triangle, clip, |x, y, _| hits[y as usize * 32 + x as usize] += 1);
        }
        hits
    }

    /// The four ways of splitting a quad into two triangles (both diagonals, both windings).
    fn quad_splits(x0: f32, y0: f32, x1: f32, y1: f32) -> [[[Vec2; 3]; 2]; 4] {
        let (tl, tr, br, bl) = (v(x0, y0), v(x1, y0), v(x1, y1), v(x0, y1));
        [
            [[tl, tr, bl], [tr, br, bl]],
            [[tl, bl, tr], [tr, bl, br]],
            [[tl, tr, br], [tl, br, bl]],
            [[br, tr, tl], [bl, br, tl]],
        ]
    }

    #[test]
    fn quads_partition_their_pixels() {
        let quads = [
            (0.0, 0.0, 2.0, 2.0),
            (1.0, 3.0, 9.0, 4.0),
            (0.25, 0.5, 7.5, 13.75),
            (3.5, 2.5, 20.5, 30.5),
            (-4.0, -4.0, 40.0, 40.0),
        ];

        for (x0, y0, x1, y1) in quads {
            for split in quad_splits(x0, y0, x1, y1) {
                let hits = coverage(&split, CLIP);

                for y in 0..32 {
                    for x in 0..32 {
                        let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);
                        let expected = (cx >= x0 && cx < x1 && cy >= y0 && cy < y1) as u32;
                        assert_eq!(
                            hits[y * 32 + x],
                            expected,
                            "pixel ({x}, {y}) of quad {:?} split {:?}",
                            (x0, y0, x1, y1),
                            split
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn fan_around_a_shared_vertex_has_no_gaps_or_overlaps() {
        let center = v(9.5, 10.5);
        let ring = [v(2.0, 2.0), v(17.0, 3.5), v(19.0, 18.0), v(5.5, 20.0), v(1.0, 11.0)];
        let triangles: Vec<_> = (0..ring.len()).map(|i| [center, ring[i], ring[(i + 1) % ring.len()]]).collect();

        let hits = coverage(&triangles, CLIP);
        assert!(hits.iter().all(|&h| h <= 1), "overlapping coverage");
        assert_eq!(hits[10 * 32 + 9], 1, "the shared vertex pixel is covered exactly once");
    }

    #[test]
    fn degenerate_triangles_cover_nothing() {
        let triangles = [
            [v(0.0, 0.0), v(5.0, 5.0), v(10.0, 10.0)],
            [v(3.0, 3.0), v(3.0, 3.0), v(3.0, 3.0)],
            [v(0.5, 0.5), v(8.5, 0.5), v(4.5, 0.5)],
            [v(0.0, 0.0), v(f32::NAN, 1.0), v(5.0, 5.0)],
        ];

        assert!(coverage(&triangles, CLIP).iter().all(|&h| h == 0));
    }

    #[test]
    fn clip_limits_coverage() {
        let clip = PixelRect::covered(Aabb::from_rect(2.0, 2.0, 3.0, 3.0), Size::new(32, 32));
        assert_eq!(clip, PixelRect { x0: 2, y0: 2, x1: 5, y1: 5 });

        let hits = coverage(&quad_splits(0.0, 0.0, 32.0, 32.0)[0], clip);
        assert_eq!(hits.iter().sum::<u32>(), 9);
        assert_eq!(hits[2 * 32 + 2], 1);
        assert_eq!(hits[5 * 32 + 5], 0);
    }

    #[test]
    fn covered_rect_respects_target_bounds() {
        let size = Size::new(4, 3);
        assert_eq!(PixelRect::covered(Aabb::EVERYTHING, size), PixelRect { x0: 0, y0: 0, x1: 4, y1: 3 });
        assert!(PixelRect::covered(Aabb::from_rect(10.0, 0.0, 2.0, 2.0), size).is_empty());
        assert!(PixelRect::covered(Aabb::EVERYTHING, Size::new(0, 0)).is_empty());
        assert_eq!(PixelRect::covered(Aabb::from_rect(0.6, 0.0, 0.8, 1.0), size).width(), 0);
    }

    #[test]
    fn weights_interpolate_vertices() {
        let triangle = [v(0.0, 0.0), v(8.0, 0.0), v(0.0, 8.0)];
        let mut visited = 0;

        rasterize(triangle, CLIP, |x, y, w| {
            visited += 1;
            assert!((w[0] + w[1] + w[2] - 1.0).abs() < 1e-5);
            assert!(w.iter().all(|&w| w >= 0.0));

            let px = w[1] * 8.0;
            let py = w[2] * 8.0;
            assert!((px - (x as f32 + 0.5)).abs() < 1e-4);
            assert!((py - (y as f32 + 0.5)).abs() < 1e-4);
        });

        // centers on the hypotenuse belong to the neighbor
        assert_eq!(visited, 28);
    }
}
