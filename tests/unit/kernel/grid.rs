use super::*;

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-6, "{a} != {b}");
}

#[test]
fn default_kernel_is_unweighted_3x3() {
    let k = Kernel::default();
    assert_eq!(k.radius(), 3);
    assert_eq!(k.mode(), KernelMode::Equation);
    assert_eq!(k.coefficients(), &[1.0; 9]);
}

#[test]
fn equation_sampling_uses_normalized_grid_with_origin_nudge() {
    let k = Kernel::from_equation(4, Arc::new(|u, v| u * 10.0 + v)).unwrap();
    assert_eq!(k.coefficients().len(), 16);
    // (0, 0) is nudged on both axes.
    assert_close(k.at(0, 0).unwrap(), (ORIGIN_NUDGE * 10.0 + ORIGIN_NUDGE) as f32);
    // u = 2/4, v nudged.
    assert_close(k.at(2, 0).unwrap(), (0.5 * 10.0 + ORIGIN_NUDGE) as f32);
    // u = 3/4, v = 1/4.
    assert_close(k.at(3, 1).unwrap(), 7.75);
    assert_eq!(k.at(4, 0), None);
}

#[test]
fn set_radius_resamples_equation_kernels() {
    let mut k = Kernel::new(3).unwrap();
    k.set_radius(5).unwrap();
    assert_eq!(k.width(), 5);
    assert_eq!(k.height(), 5);
    assert_eq!(k.coefficients().len(), 25);
    assert!(k.set_radius(0).is_err());
    assert_eq!(k.radius(), 5);
}

#[test]
fn set_radius_on_raw_kernel_is_rejected_and_keeps_data() {
    let mut k = Kernel::from_raw(3, vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
    assert!(k.set_radius(3).is_ok());
    let err = k.set_radius(5).unwrap_err();
    assert!(matches!(
        err,
        StrataError::InvalidKernelData {
            expected: 25,
            actual: 9
        }
    ));
    assert_eq!(k.radius(), 3);
    assert_eq!(k.coefficients().len(), 9);

    k.use_raw_sized(1, vec![2.0]).unwrap();
    assert_eq!(k.radius(), 1);
    assert_eq!(k.coefficients(), &[2.0]);
}

#[test]
fn use_raw_validates_length() {
    let mut k = Kernel::new(3).unwrap();
    assert!(matches!(
        k.use_raw(vec![1.0; 4]),
        Err(StrataError::InvalidKernelData {
            expected: 9,
            actual: 4
        })
    ));
    assert_eq!(k.mode(), KernelMode::Equation);

    k.use_raw(vec![-1.0, 0.0, 1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0])
        .unwrap();
    assert_eq!(k.mode(), KernelMode::Raw);
    assert_eq!(k.at(2, 1), Some(1.0));
}

#[test]
fn use_equation_does_not_recompute_until_resampled() {
    let mut k = Kernel::from_raw(2, vec![4.0, 4.0, 4.0, 4.0]).unwrap();
    k.use_equation(Arc::new(|_, _| 2.0));
    assert_eq!(k.mode(), KernelMode::Equation);
    assert_eq!(k.coefficients(), &[4.0; 4]);
    k.resample().unwrap();
    assert_eq!(k.coefficients(), &[2.0; 4]);
}

#[test]
fn normalized_equation_kernels_stay_normalized_after_resampling() {
    let mut k = Kernel::from_equation(3, Arc::new(|u, v| 4.0 * (u + v))).unwrap();
    assert!(!k.is_normalized());
    k.normalize().unwrap();
    assert!(k.is_normalized());

    k.set_radius(5).unwrap();
    assert_close(k.max_abs(), 1.0);
    // u = v = 0.8 is the largest sample; the origin is nudged to 0.01.
    assert_close(k.at(4, 4).unwrap(), 1.0);
    assert_close(k.at(0, 0).unwrap(), 0.02 / 1.6);

    k.resample().unwrap();
    assert_close(k.max_abs(), 1.0);

    k.use_equation(Arc::new(|_, _| 3.0));
    assert!(!k.is_normalized());
    k.resample().unwrap();
    assert_eq!(k.coefficients(), &[3.0; 25]);
}

#[test]
fn failed_renormalization_leaves_kernel_unchanged() {
    let mut k = Kernel::new(3).unwrap();
    k.normalize().unwrap();
    k.use_equation(Arc::new(|_, _| 0.0));
    k.normalize().unwrap();
    assert!(k.is_normalized());

    assert!(matches!(
        k.set_radius(5),
        Err(StrataError::DegenerateKernel(_))
    ));
    assert_eq!(k.radius(), 3);
    assert_eq!(k.coefficients(), &[1.0; 9]);
}

#[test]
fn normalize_scales_max_abs_to_one() {
    let cases: Vec<Vec<f32>> = vec![
        vec![1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0],
        vec![-8.0, 0.0, 2.0, 0.5, 0.0, 0.0, 0.0, 0.0, 0.25],
        vec![0.0, 0.0, 0.0, 0.0, 0.001, 0.0, 0.0, 0.0, 0.0],
    ];
    for data in cases {
        let mut k = Kernel::from_raw(3, data).unwrap();
        k.normalize().unwrap();
        assert_close(k.max_abs(), 1.0);
    }

    let mut k = Kernel::from_raw(3, vec![-8.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
    k.normalize().unwrap();
    assert_close(k.at(0, 0).unwrap(), -1.0);
    assert_close(k.at(2, 0).unwrap(), 0.25);
}

#[test]
fn normalize_rejects_degenerate_kernels() {
    let mut zero = Kernel::from_raw(3, vec![0.0; 9]).unwrap();
    assert!(matches!(
        zero.normalize(),
        Err(StrataError::DegenerateKernel(_))
    ));
    assert_eq!(zero.coefficients(), &[0.0; 9]);

    let mut nan = Kernel::from_equation(2, Arc::new(|_, _| f64::NAN)).unwrap();
    assert!(nan.normalize().is_err());
}
