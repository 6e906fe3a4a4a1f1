use super::*;
use crate::filter::convolution::{ConvolutionFilter, KernelAnchor};
use crate::foundation::core::Rgba8;
use crate::kernel::presets;

fn noise(w: u32, h: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::new(w, h).unwrap();
    let mut state = 0x2545_f491_u32;
    for byte in buf.as_raw_mut() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        *byte = (state >> 24) as u8;
    }
    buf
}

#[test]
fn two_identical_kernels_match_the_single_kernel_filter() {
    let src = noise(9, 7);
    for kernel in [
        presets::soft_blur().unwrap(),
        presets::prewitt_horizontal().unwrap(),
        presets::gaussian_blur(5, 1.2).unwrap(),
    ] {
        for anchor in [KernelAnchor::Legacy, KernelAnchor::Center] {
            let settings = ConvolutionSettings {
                anchor,
                ..ConvolutionSettings::default()
            };
            let single = ConvolutionFilter::with_settings("one", kernel.clone(), settings.clone())
                .process(&src)
                .unwrap();
            let multi = MultiKernelConvolutionFilter::with_settings(
                "two",
                vec![kernel.clone(), kernel.clone()],
                settings,
            )
            .unwrap()
            .process(&src)
            .unwrap();
            assert_eq!(multi, single);
        }
    }
}

#[test]
fn edge_pair_is_flat_on_uniform_interior() {
    let src = PixelBuffer::filled(6, 6, Rgba8::opaque(200, 90, 10)).unwrap();
    let edge = MultiKernelConvolutionFilter::with_settings(
        "Edge filter",
        vec![
            presets::prewitt_horizontal().unwrap(),
            presets::prewitt_vertical().unwrap(),
        ],
        ConvolutionSettings {
            anchor: KernelAnchor::Center,
            ..ConvolutionSettings::default()
        },
    )
    .unwrap();
    let out = edge.process(&src).unwrap();
    for y in 1..5 {
        for x in 1..5 {
            assert_eq!(out.get_pixel(x, y).unwrap(), Rgba8::BLACK, "({x}, {y})");
        }
    }
}

#[test]
fn edge_pair_responds_to_a_vertical_step() {
    let mut src = PixelBuffer::filled(6, 4, Rgba8::BLACK).unwrap();
    src.fill_rect(3, 0, 6, 4, Rgba8::WHITE);
    let edge = MultiKernelConvolutionFilter::with_settings(
        "Edge filter",
        vec![
            presets::prewitt_horizontal().unwrap(),
            presets::prewitt_vertical().unwrap(),
        ],
        ConvolutionSettings {
            anchor: KernelAnchor::Center,
            ..ConvolutionSettings::default()
        },
    )
    .unwrap();
    let out = edge.process(&src).unwrap();
    assert!(out.get_pixel(2, 1).unwrap().r > 0);
    assert_eq!(out.get_pixel(0, 1).unwrap().r, 0);
    assert_eq!(out.get_pixel(5, 1).unwrap().r, 0);
}

#[test]
fn construction_rejects_empty_or_mismatched_kernels() {
    assert!(matches!(
        MultiKernelConvolutionFilter::new("none", Vec::new()),
        Err(StrataError::Validation(_))
    ));
    assert!(matches!(
        MultiKernelConvolutionFilter::new(
            "mixed",
            vec![presets::box_blur(3).unwrap(), presets::box_blur(5).unwrap()]
        ),
        Err(StrataError::InvalidKernelData { .. })
    ));
}

#[test]
fn gain_is_the_only_parameter() {
    let mut f =
        MultiKernelConvolutionFilter::new("edge", vec![presets::prewitt_horizontal().unwrap()])
            .unwrap();
    assert_eq!(f.params().len(), 1);
    f.set_param("gain", 2.6).unwrap();
    assert!((f.settings().gain - 2.6).abs() < 1e-6);
    assert!(f.set_param("radius", 5.0).is_err());
}
