use trend_rs::core::{PixelRect, ScreenPoint, SurfaceSize};
use trend_rs::render::{Color, CurveRasterizer, PixelBuffer, draw_dot};

fn white_buffer(width: u32, height: u32) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(width, height);
    buffer.clear(Color::WHITE);
    buffer
}

#[test]
fn horizontal_line_has_solid_center_and_blended_edges() {
    let mut buffer = white_buffer(20, 20);
    let mut rasterizer = CurveRasterizer::new();
    let bounds = buffer.bounds();

    rasterizer.draw_curve(
        &mut buffer,
        &[ScreenPoint::new(2.0, 10.0), ScreenPoint::new(17.0, 10.0)],
        3.0,
        Color::RED,
        bounds,
    );

    for x in 3..=16 {
        assert_eq!(buffer.pixel(x, 10), Some(Color::RED), "center at x = {x}");
        for y in [9, 11] {
            let pixel = buffer.pixel(x, y).expect("in bounds");
            assert_ne!(pixel, Color::WHITE, "edge at ({x}, {y}) untouched");
            assert_ne!(pixel, Color::RED, "edge at ({x}, {y}) fully covered");
            assert_eq!(pixel.red(), 255);
        }
        assert_eq!(buffer.pixel(x, 8), Some(Color::WHITE));
        assert_eq!(buffer.pixel(x, 12), Some(Color::WHITE));
    }
}

#[test]
fn coverage_saturates_where_segments_overlap() {
    let mut rasterizer = CurveRasterizer::new();
    let size = SurfaceSize::new(40, 40);
    let points = [
        ScreenPoint::new(5.0, 5.0),
        ScreenPoint::new(35.0, 35.0),
        ScreenPoint::new(5.0, 35.0),
        ScreenPoint::new(35.0, 5.0),
    ];

    rasterizer.accumulate(size, &points, 5.0, size.bounds());

    let coverage = rasterizer.coverage().values();
    assert_eq!(coverage.len(), 40 * 40);
    assert_eq!(rasterizer.coverage().get(20, 20), Some(255));
    assert!(coverage.iter().any(|&c| c > 0 && c < 255));
}

#[test]
fn nothing_is_drawn_outside_the_clip_rect() {
    let mut buffer = white_buffer(30, 30);
    let mut rasterizer = CurveRasterizer::new();
    let clip = PixelRect::new(10, 10, 10, 10);

    rasterizer.draw_curve(
        &mut buffer,
        &[ScreenPoint::new(0.0, 0.0), ScreenPoint::new(29.0, 29.0)],
        4.0,
        Color::BLUE,
        clip,
    );

    for y in 0..30 {
        for x in 0..30 {
            let inside = (10..20).contains(&x) && (10..20).contains(&y);
            if !inside {
                assert_eq!(buffer.pixel(x, y), Some(Color::WHITE), "({x}, {y})");
            }
        }
    }
    assert_eq!(buffer.pixel(15, 15), Some(Color::BLUE));
}

#[test]
fn degenerate_input_leaves_buffer_unchanged() {
    let mut buffer = white_buffer(10, 10);
    let before = buffer.clone();
    let mut rasterizer = CurveRasterizer::new();
    let bounds = buffer.bounds();

    rasterizer.draw_curve(&mut buffer, &[], 2.0, Color::RED, bounds);
    rasterizer.draw_curve(
        &mut buffer,
        &[ScreenPoint::new(5.0, 5.0)],
        2.0,
        Color::RED,
        bounds,
    );
    rasterizer.draw_curve(
        &mut buffer,
        &[ScreenPoint::new(1.0, 5.0), ScreenPoint::new(8.0, 5.0)],
        0.0,
        Color::RED,
        bounds,
    );
    assert_eq!(buffer, before);
}

#[test]
fn zero_length_polyline_stamps_a_single_dot() {
    let mut buffer = white_buffer(10, 10);
    let mut rasterizer = CurveRasterizer::new();
    let bounds = buffer.bounds();
    rasterizer.draw_curve(
        &mut buffer,
        &[ScreenPoint::new(5.0, 5.0), ScreenPoint::new(5.0, 5.0)],
        4.0,
        Color::GREEN,
        bounds,
    );
    assert_eq!(buffer.pixel(5, 5), Some(Color::GREEN));
    assert_eq!(buffer.pixel(0, 0), Some(Color::WHITE));
}

#[test]
fn later_curve_paints_over_earlier_one() {
    let mut buffer = white_buffer(20, 20);
    let mut rasterizer = CurveRasterizer::new();
    let bounds = buffer.bounds();
    let line = [ScreenPoint::new(0.0, 10.0), ScreenPoint::new(19.0, 10.0)];

    rasterizer.draw_curve(&mut buffer, &line, 3.0, Color::RED, bounds);
    rasterizer.draw_curve(&mut buffer, &line, 3.0, Color::BLUE, bounds);
    assert_eq!(buffer.pixel(10, 10), Some(Color::BLUE));
}

#[test]
fn dot_is_clipped_to_buffer_and_solid_in_the_middle() {
    let mut buffer = white_buffer(10, 10);
    draw_dot(&mut buffer, ScreenPoint::new(9.0, 9.0), 12.0, Color::BLACK);
    assert_eq!(buffer.pixel(9, 9), Some(Color::BLACK));
    assert_eq!(buffer.pixel(5, 9), Some(Color::BLACK));
    assert_eq!(buffer.pixel(0, 0), Some(Color::WHITE));
}
