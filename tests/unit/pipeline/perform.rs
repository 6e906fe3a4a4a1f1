use super::*;
use crate::{
    filter::point::PointFilter,
    foundation::core::{Canvas, Rgba8},
    raster::buffer::PixelBuffer,
};

struct Failing;

impl Filter for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn process(&self, _src: &PixelBuffer) -> StrataResult<PixelBuffer> {
        Err(StrataError::validation("boom"))
    }
}

fn document() -> (LayerStack, LayerId, LayerId) {
    let mut stack = LayerStack::new(Canvas::new(2, 2).unwrap());
    let bg = stack
        .add_layer("bg", Some(PixelBuffer::filled(2, 2, Rgba8::WHITE).unwrap()))
        .unwrap();
    let photo = stack
        .add_layer(
            "photo",
            Some(PixelBuffer::filled(2, 2, Rgba8::new(30, 60, 90, 255)).unwrap()),
        )
        .unwrap();
    (stack, bg, photo)
}

#[test]
fn in_place_replaces_target_and_restores_active() {
    let (mut stack, bg, photo) = document();
    let out = perform(&mut stack, photo, false, &PointFilter::grayscale()).unwrap();
    assert_eq!(out, photo);
    assert_eq!(stack.active_layer_id(), Some(bg));
    assert_eq!(stack.history_depth(), 0);
    assert_eq!(stack.len(), 2);
    let px = stack.layer(photo).unwrap().raster().unwrap().get_pixel(1, 1).unwrap();
    assert_eq!(px, Rgba8::new(60, 60, 60, 255));
}

#[test]
fn to_new_layer_leaves_target_untouched() {
    let (mut stack, bg, photo) = document();
    stack.layer_mut(photo).unwrap().x = 1;
    let out = perform(&mut stack, photo, true, &PointFilter::grayscale()).unwrap();

    assert_ne!(out, photo);
    assert_eq!(stack.index_of(out), Some(2));
    let layer = stack.layer(out).unwrap();
    assert_eq!(layer.name, "photo (Grayscale filter)");
    assert_eq!(layer.x, 1);
    assert_eq!(
        stack.layer(photo).unwrap().raster().unwrap().get_pixel(0, 0).unwrap(),
        Rgba8::new(30, 60, 90, 255)
    );
    assert_eq!(stack.active_layer_id(), Some(bg));
}

#[test]
fn failing_filter_writes_nothing_and_still_pops() {
    let (mut stack, bg, photo) = document();
    let before = stack.layer(photo).unwrap().raster().cloned();
    let err = perform(&mut stack, photo, false, &Failing).unwrap_err();
    assert!(matches!(err, StrataError::Validation(_)));
    assert_eq!(stack.layer(photo).unwrap().raster().cloned(), before);
    assert_eq!(stack.active_layer_id(), Some(bg));
    assert_eq!(stack.history_depth(), 0);
    assert_eq!(stack.len(), 2);
}

#[test]
fn unknown_target_is_not_found() {
    let (mut stack, bg, _) = document();
    let err = perform(&mut stack, LayerId(7), false, &PointFilter::grayscale()).unwrap_err();
    assert!(matches!(err, StrataError::NotFound(_)));
    assert_eq!(stack.active_layer_id(), Some(bg));
    assert_eq!(stack.history_depth(), 0);
}

#[test]
fn filter_sees_unsaved_edits_of_the_previous_active_layer() {
    let (mut stack, bg, _) = document();
    stack
        .active_surface_mut()
        .unwrap()
        .set_pixel(0, 0, Rgba8::BLACK)
        .unwrap();
    perform(&mut stack, bg, false, &PointFilter::grayscale()).unwrap();
    assert_eq!(
        stack.layer(bg).unwrap().raster().unwrap().get_pixel(0, 0).unwrap(),
        Rgba8::BLACK
    );
    assert_eq!(stack.active_surface().unwrap().get_pixel(0, 0).unwrap(), Rgba8::BLACK);
}
