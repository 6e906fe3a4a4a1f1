use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = Rgba8::new(1, 2, 3, 4);
    let src = Rgba8::new(200, 200, 200, 200);
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = Rgba8::new(10, 20, 30, 40);
    let src = Rgba8::new(255, 255, 255, 0);
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = Rgba8::new(0, 0, 0, 255);
    let src = Rgba8::new(255, 0, 0, 255);
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_keeps_straight_src() {
    let dst = Rgba8::TRANSPARENT;
    let src = Rgba8::new(100, 110, 120, 200);
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_half_opacity_mixes_channels() {
    let dst = Rgba8::opaque(0, 0, 0);
    let src = Rgba8::opaque(200, 100, 0);
    let out = over(dst, src, 0.5);
    assert_eq!(out.a, 255);
    assert!((i32::from(out.r) - 100).abs() <= 1, "r = {}", out.r);
    assert!((i32::from(out.g) - 50).abs() <= 1, "g = {}", out.g);
    assert_eq!(out.b, 0);
}

#[test]
fn draw_over_places_and_clips() {
    let mut dst = PixelBuffer::filled(4, 4, Rgba8::BLACK).unwrap();
    let src = PixelBuffer::filled(2, 2, Rgba8::WHITE).unwrap();

    draw_over(&mut dst, &src, 3, -1, 1.0);
    assert_eq!(dst.get_pixel(3, 0).unwrap(), Rgba8::WHITE);
    assert_eq!(dst.get_pixel(3, 1).unwrap(), Rgba8::BLACK);
    assert_eq!(dst.get_pixel(2, 0).unwrap(), Rgba8::BLACK);

    draw_over(&mut dst, &src, 10, 10, 1.0);
    let whites = dst
        .as_raw()
        .chunks_exact(4)
        .filter(|px| px == &[255, 255, 255, 255])
        .count();
    assert_eq!(whites, 1);
}
