use super::*;
use crate::{foundation::core::Canvas, raster::buffer::PixelBuffer};

#[test]
fn clears_a_square_and_commits_on_end() {
    let mut ctx = EditorContext::new(Canvas::new(10, 10).unwrap());
    let id = ctx
        .layers
        .add_layer("bg", Some(PixelBuffer::filled(10, 10, Rgba8::WHITE).unwrap()))
        .unwrap();
    let mut eraser = EraserTool;
    ctx.install_tool(&eraser).unwrap();
    ctx.options.set(ERASER_SIZE, 4.0).unwrap();

    ctx.dispatch(&mut eraser, StrokeEvent::Begin(Point::new(5.0, 5.0)))
        .unwrap();
    let raster = ctx.layers.layer(id).unwrap().raster().unwrap();
    assert_eq!(raster.get_pixel(5, 5).unwrap(), Rgba8::WHITE);

    ctx.dispatch(&mut eraser, StrokeEvent::End(Point::new(5.0, 5.0)))
        .unwrap();
    let raster = ctx.layers.layer(id).unwrap().raster().unwrap();
    for (x, y, expected) in [
        (3, 3, Rgba8::TRANSPARENT),
        (6, 6, Rgba8::TRANSPARENT),
        (7, 7, Rgba8::WHITE),
        (2, 5, Rgba8::WHITE),
    ] {
        assert_eq!(raster.get_pixel(x, y).unwrap(), expected, "({x}, {y})");
    }
}

#[test]
fn squares_past_the_edge_are_clipped() {
    let mut ctx = EditorContext::new(Canvas::new(4, 4).unwrap());
    ctx.layers
        .add_layer("bg", Some(PixelBuffer::filled(4, 4, Rgba8::WHITE).unwrap()))
        .unwrap();
    ctx.options
        .insert(NumericOption::new(ERASER_SIZE, 4.0, 1.0, 35.0, 0.5).unwrap());
    ctx.dispatch(&mut EraserTool, StrokeEvent::End(Point::new(0.0, 0.0)))
        .unwrap();
    let surface = ctx.layers.active_surface().unwrap();
    assert_eq!(surface.get_pixel(1, 1).unwrap(), Rgba8::TRANSPARENT);
    assert_eq!(surface.get_pixel(2, 2).unwrap(), Rgba8::WHITE);
}
