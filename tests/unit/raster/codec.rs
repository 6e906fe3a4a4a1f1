use super::*;
use crate::foundation::core::Rgba8;

#[test]
fn png_encode_then_decode_preserves_pixels() {
    let mut buf = PixelBuffer::filled(3, 2, Rgba8::new(10, 20, 30, 255)).unwrap();
    buf.set_pixel(1, 1, Rgba8::new(200, 100, 50, 128)).unwrap();

    let png = encode_png(&buf).unwrap();
    assert_eq!(&png[1..4], b"PNG");

    let back = decode_image(&png).unwrap();
    assert_eq!(back, buf);
}

#[test]
fn decode_rejects_garbage() {
    assert!(matches!(
        decode_image(b"definitely not an image"),
        Err(crate::foundation::error::StrataError::Other(_))
    ));
}
