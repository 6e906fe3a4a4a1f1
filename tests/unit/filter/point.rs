use super::*;

fn sample() -> PixelBuffer {
    let mut buf = PixelBuffer::new(4, 2).unwrap();
    let pixels = [
        Rgba8::new(0, 0, 0, 0),
        Rgba8::new(255, 255, 255, 255),
        Rgba8::new(10, 20, 31, 7),
        Rgba8::new(255, 0, 1, 128),
        Rgba8::new(1, 1, 2, 200),
        Rgba8::new(90, 180, 45, 255),
        Rgba8::new(254, 254, 253, 3),
        Rgba8::new(17, 0, 0, 64),
    ];
    for (i, px) in pixels.into_iter().enumerate() {
        buf.set_pixel((i % 4) as i64, (i / 4) as i64, px).unwrap();
    }
    buf
}

#[test]
fn grayscale_averages_rgb_and_preserves_alpha() {
    let src = sample();
    let out = PointFilter::grayscale().process(&src).unwrap();
    for y in 0..2 {
        for x in 0..4 {
            let s = src.get_pixel(x, y).unwrap();
            let d = out.get_pixel(x, y).unwrap();
            let avg = ((u32::from(s.r) + u32::from(s.g) + u32::from(s.b)) / 3) as u8;
            assert_eq!(d, Rgba8::new(avg, avg, avg, s.a));
        }
    }
}

#[test]
fn grayscale_opaque_variant_forces_alpha() {
    let out = PointFilter::new("gray", PointOp::Grayscale(AlphaMode::Opaque))
        .process(&sample())
        .unwrap();
    assert!(out.as_raw().chunks_exact(4).all(|px| px[3] == 255));
    assert_eq!(out.get_pixel(2, 0).unwrap(), Rgba8::new(20, 20, 20, 255));
}

#[test]
fn grayscale_is_idempotent() {
    for op in [
        PointOp::Grayscale(AlphaMode::Preserve),
        PointOp::Grayscale(AlphaMode::Opaque),
    ] {
        let f = PointFilter::new("gray", op);
        let once = f.process(&sample()).unwrap();
        let twice = f.process(&once).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn invert_twice_is_identity_on_rgb() {
    let f = PointFilter::new("invert", PointOp::Invert(AlphaMode::Preserve));
    let src = sample();
    let back = f.process(&f.process(&src).unwrap()).unwrap();
    assert_eq!(back, src);
    assert_eq!(
        f.process(&src).unwrap().get_pixel(3, 0).unwrap(),
        Rgba8::new(0, 255, 254, 128)
    );
}
