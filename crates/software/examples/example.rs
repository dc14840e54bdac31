use softdraw_core::{Aabb, Color, Context, DrawFlags, Font, Glyph, ImageData, Painter, PixelFormat, Size, Vec2, Vertex};
use softdraw_software::SoftwareBackend;

fn main() {
    env_logger::init();

    let mut backend = SoftwareBackend::new();
    let screen = backend.create_screen([512, 512]);

    let checker = image::RgbaImage::from_fn(8, 8, |x, y| {
        if (x + y) % 2 == 0 {
            image::Rgba([255, 255, 255, 255])
        } else {
            image::Rgba([40, 40, 40, 255])
        }
    });
    let texture = backend.create_texture(ImageData::from(&checker)).unwrap();

    // a one glyph "font": a filled block
    let block = vec![255u8; 8 * 8];
    let atlas = backend
        .create_texture(ImageData {
            width: 8,
            height: 8,
            format: PixelFormat::A8,
            data: &block,
        })
        .unwrap();
    let font = Font::new(atlas, Size::new(8, 8), 12.0).with_glyph(
        '#',
        Glyph {
            source: Aabb::from_rect(0.0, 0.0, 8.0, 8.0),
            offset: Vec2::ZERO,
            advance: 10.0,
        },
    );

    let mut painter = Painter::new(screen);
    let start = std::time::Instant::now();

    const ITERS: usize = 100;
    for _ in 0..ITERS {
        painter.clear(Color::rgb(20, 24, 32));
        painter.draw_textured_quad([64.0, 64.0, 448.0, 448.0], texture, [0.0, 0.0, 1.0, 1.0], Color::WHITE);

        painter.set_scissor([0.0, 0.0, 512.0, 256.0]);
        painter.draw_triangles(
            &[
                Vertex::new([256.0, 32.0], [0.0, 0.0], Color::new(255, 0, 0, 200)),
                Vertex::new([480.0, 480.0], [0.0, 0.0], Color::new(0, 255, 0, 200)),
                Vertex::new([32.0, 480.0], [0.0, 0.0], Color::new(0, 0, 255, 200)),
            ],
            DrawFlags::COLORED | DrawFlags::BLENDING,
            None,
        );
        painter.clear_scissor();

        painter.draw_quad([300.0, 300.0, 500.0, 500.0], Color::new(255, 255, 0, 96));
        painter.draw_text(&font, [16.0, 16.0], "###\n##", Color::new(255, 128, 0, 255));

        painter.flush(&mut backend);
    }
    println!("time per frame: {:?}", start.elapsed() / ITERS as u32);

    let frame = backend.frame_buffer_image(screen).unwrap();
    image::RgbaImage::from_raw(frame.width, frame.height, frame.data.to_vec())
        .unwrap()
        .save("test.png")
        .unwrap();
}
