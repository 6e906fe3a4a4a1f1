use super::*;
use crate::foundation::core::Canvas;

fn context(size: f64) -> (EditorContext, BrushTool) {
    let mut ctx = EditorContext::new(Canvas::new(20, 20).unwrap());
    ctx.layers.add_layer("paint", None).unwrap();
    let brush = BrushTool::default();
    ctx.install_tool(&brush).unwrap();
    ctx.options.set(BRUSH_SIZE, size).unwrap();
    (ctx, brush)
}

fn stroke(ctx: &mut EditorContext, brush: &mut BrushTool, points: &[(f64, f64)]) {
    let last = points.len() - 1;
    for (i, &(x, y)) in points.iter().enumerate() {
        let p = Point::new(x, y);
        let event = match i {
            0 => StrokeEvent::Begin(p),
            i if i == last => StrokeEvent::End(p),
            _ => StrokeEvent::Move(p),
        };
        ctx.dispatch(brush, event).unwrap();
    }
}

#[test]
fn stroke_paints_a_ribbon_of_the_brush_size() {
    let (mut ctx, mut brush) = context(4.0);
    stroke(&mut ctx, &mut brush, &[(5.0, 10.0), (15.0, 10.0), (15.0, 10.0)]);

    let id = ctx.layers.active_layer_id().unwrap();
    let raster = ctx.layers.layer(id).unwrap().raster().unwrap();
    assert_eq!(raster.get_pixel(10, 10).unwrap(), Rgba8::WHITE);
    assert_eq!(raster.get_pixel(5, 8).unwrap(), Rgba8::WHITE);
    assert_eq!(raster.get_pixel(14, 11).unwrap(), Rgba8::WHITE);
    assert_eq!(raster.get_pixel(10, 12).unwrap(), Rgba8::TRANSPARENT);
    assert_eq!(raster.get_pixel(10, 7).unwrap(), Rgba8::TRANSPARENT);
    assert_eq!(raster.get_pixel(4, 10).unwrap(), Rgba8::TRANSPARENT);
    assert_eq!(raster.get_pixel(15, 10).unwrap(), Rgba8::TRANSPARENT);
}

#[test]
fn paint_is_only_committed_on_end() {
    let (mut ctx, mut brush) = context(4.0);
    ctx.dispatch(&mut brush, StrokeEvent::Begin(Point::new(5.0, 10.0)))
        .unwrap();
    ctx.dispatch(&mut brush, StrokeEvent::Move(Point::new(15.0, 10.0)))
        .unwrap();

    let id = ctx.layers.active_layer_id().unwrap();
    assert!(ctx.layers.layer(id).unwrap().raster().is_none());
    assert_eq!(
        ctx.layers.active_surface().unwrap().get_pixel(10, 10).unwrap(),
        Rgba8::WHITE
    );
}

#[test]
fn samples_closer_than_the_spacing_are_dropped() {
    let (mut ctx, mut brush) = context(20.0);
    stroke(&mut ctx, &mut brush, &[(5.0, 5.0), (5.5, 5.0), (5.5, 5.0)]);
    let surface = ctx.layers.active_surface().unwrap();
    assert!(surface.as_raw().iter().all(|&c| c == 0));
}

#[test]
fn opacity_and_layer_offset_are_honoured() {
    let (mut ctx, mut brush) = context(4.0);
    let id = ctx.layers.active_layer_id().unwrap();
    ctx.layers.layer_mut(id).unwrap().x = 3;
    ctx.options.set(BRUSH_OPACITY, 0.5).unwrap();
    stroke(&mut ctx, &mut brush, &[(8.0, 10.0), (18.0, 10.0), (18.0, 10.0)]);

    let raster = ctx.layers.layer(id).unwrap().raster().unwrap();
    assert_eq!(
        raster.get_pixel(10, 10).unwrap(),
        Rgba8::new(255, 255, 255, 128)
    );
    assert_eq!(raster.get_pixel(16, 10).unwrap(), Rgba8::TRANSPARENT);
}
