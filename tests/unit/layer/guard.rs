use super::*;
use crate::{
    foundation::{
        core::{Canvas, Rgba8},
        error::StrataError,
    },
    raster::buffer::PixelBuffer,
};

fn two_layers() -> (LayerStack, LayerId, LayerId) {
    let mut stack = LayerStack::new(Canvas::new(2, 2).unwrap());
    let a = stack.add_layer("a", None).unwrap();
    let b = stack
        .add_layer("b", Some(PixelBuffer::filled(2, 2, Rgba8::WHITE).unwrap()))
        .unwrap();
    (stack, a, b)
}

#[test]
fn guard_switches_and_restores_on_finish() {
    let (mut stack, a, b) = two_layers();
    let guard = stack.scoped_active(b).unwrap();
    assert_eq!(guard.active_layer_id(), Some(b));
    assert_eq!(guard.history_depth(), 1);
    guard.finish().unwrap();
    assert_eq!(stack.active_layer_id(), Some(a));
    assert_eq!(stack.history_depth(), 0);
}

#[test]
fn dropping_the_guard_restores_too() {
    let (mut stack, a, b) = two_layers();
    {
        let mut guard = stack.scoped_active(b).unwrap();
        guard
            .active_surface_mut()
            .unwrap()
            .set_pixel(0, 0, Rgba8::BLACK)
            .unwrap();
    }
    assert_eq!(stack.active_layer_id(), Some(a));
    assert_eq!(
        stack.layer(b).unwrap().raster().unwrap().get_pixel(0, 0).unwrap(),
        Rgba8::BLACK
    );
}

#[test]
fn unknown_target_unwinds_the_push() {
    let (mut stack, a, _) = two_layers();
    assert!(matches!(
        stack.scoped_active(LayerId(42)),
        Err(StrataError::NotFound(_))
    ));
    assert_eq!(stack.active_layer_id(), Some(a));
    assert_eq!(stack.history_depth(), 0);
}

#[test]
fn finish_reports_a_removed_previous_layer() {
    let (mut stack, a, b) = two_layers();
    let mut guard = stack.scoped_active(b).unwrap();
    guard.remove_layer(a).unwrap();
    assert!(matches!(guard.finish(), Err(StrataError::NotFound(_))));
    assert_eq!(stack.active_layer_id(), Some(b));
}
