//! Проверки на реальном OpenCL устройстве: `cargo test --features opencl -- --ignored`
#![cfg(feature = "opencl")]

use opencl_blas_check::backend::OpenClBackend;
use opencl_blas_check::{run_syrk_check, Arguments, BlasBackend, BlasStatus};

#[test]
#[ignore = "requires an OpenCL device"]
fn opencl_matches_reference() {
    for (uplo, trans_a) in [('U', 'N'), ('L', 'N'), ('U', 'T'), ('L', 'C')] {
        let mut args = Arguments::square(33, 17, uplo, trans_a);
        args.alpha = 0.1;
        args.beta = 0.3;
        let report = run_syrk_check::<f32, _, _>(&args, OpenClBackend::new).unwrap();
        assert!(report.unit_checked);
    }
}

#[test]
#[ignore = "requires an OpenCL device"]
fn opencl_double_is_checked_or_unsupported() {
    let args = Arguments::square(16, 8, 'U', 'N');
    match run_syrk_check::<f64, _, _>(&args, OpenClBackend::new) {
        Ok(report) => assert!(report.unit_checked),
        Err(err) => assert_eq!(err.status(), Some(BlasStatus::NotSupported)),
    }
}

#[test]
#[ignore = "requires an OpenCL device"]
fn opencl_rejects_invalid_sizes() {
    let backend = OpenClBackend::new().unwrap();
    assert!(!backend.device_name().is_empty());
    let a = backend.alloc::<f32>(8).unwrap();
    let mut c = backend.alloc::<f32>(16).unwrap();
    let status = backend.syrk(
        opencl_blas_check::Fill::Upper,
        opencl_blas_check::Operation::None,
        4,
        2,
        &1.0,
        &a,
        2,
        &0.0,
        &mut c,
        4,
    );
    assert_eq!(status, Err(BlasStatus::InvalidValue));
}
