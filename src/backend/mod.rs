//! Ускорители, на которых выполняется проверяемый SYRK
//!
//! Ускоритель владеет своим контекстом (хэндлом) и освобождает его в `Drop`.
//! Буферы ускорителя живут в его памяти, обмен с хостом только через
//! явные `upload`/`download`.

pub mod host;
#[cfg(feature = "opencl")]
pub mod opencl;

pub use host::{HostBackend, HostBuffer, HostStats};
#[cfg(feature = "opencl")]
pub use opencl::{ClBuffer, OpenClBackend};

use crate::arguments::Arguments;
use crate::matrix::{Fill, Operation};
use crate::scalar::Scalar;
use crate::status::{BlasStatus, SyrkError};
use crate::syrk_check::{run_syrk_check_with_precision, SyrkReport};

/// BLAS-интерфейс ускорителя
pub trait BlasBackend {
    /// Буфер в памяти ускорителя
    type Buffer<T: Scalar>;

    fn name(&self) -> &str;

    fn alloc<T: Scalar>(&self, len: usize) -> Result<Self::Buffer<T>, BlasStatus>;

    /// Копирование хост -> ускоритель, длины должны совпадать
    fn upload<T: Scalar>(&self, dst: &mut Self::Buffer<T>, src: &[T]) -> Result<(), BlasStatus>;

    /// Копирование ускоритель -> хост, длины должны совпадать
    fn download<T: Scalar>(&self, src: &Self::Buffer<T>, dst: &mut [T]) -> Result<(), BlasStatus>;

    /// `C := alpha * op(A) * op(A)^T + beta * C` над буферами ускорителя.
    ///
    /// Возвращает `InvalidValue` на неверных размерах независимо от вызывающего.
    #[allow(clippy::too_many_arguments)]
    fn syrk<T: Scalar>(
        &self,
        uplo: Fill,
        trans: Operation,
        n: i32,
        k: i32,
        alpha: &T,
        a: &Self::Buffer<T>,
        lda: i32,
        beta: &T,
        c: &mut Self::Buffer<T>,
        ldc: i32,
    ) -> Result<(), BlasStatus>;

    /// Fortran-совместимая точка входа: флаги символами, все скаляры по ссылке
    #[allow(clippy::too_many_arguments)]
    fn syrk_fortran<T: Scalar>(
        &self,
        uplo: &u8,
        trans: &u8,
        n: &i32,
        k: &i32,
        alpha: &T,
        a: &Self::Buffer<T>,
        lda: &i32,
        beta: &T,
        c: &mut Self::Buffer<T>,
        ldc: &i32,
    ) -> Result<(), BlasStatus> {
        let uplo = Fill::from_char(*uplo as char)?;
        let trans = Operation::from_char(*trans as char)?;
        self.syrk(uplo, trans, *n, *k, alpha, a, *lda, beta, c, *ldc)
    }
}

/// Сигнатура выбранной точки входа SYRK
pub type SyrkFn<B, T> = fn(
    &B,
    Fill,
    Operation,
    i32,
    i32,
    &T,
    &<B as BlasBackend>::Buffer<T>,
    i32,
    &T,
    &mut <B as BlasBackend>::Buffer<T>,
    i32,
) -> Result<(), BlasStatus>;

/// Соглашение о вызове SYRK, выбирается один раз при настройке прогона
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyrkAbi {
    C,
    Fortran,
}

impl SyrkAbi {
    pub fn from_flag(fortran: bool) -> Self {
        if fortran {
            SyrkAbi::Fortran
        } else {
            SyrkAbi::C
        }
    }

    pub fn resolve<B: BlasBackend, T: Scalar>(self) -> SyrkFn<B, T> {
        match self {
            SyrkAbi::C => syrk_c::<B, T>,
            SyrkAbi::Fortran => syrk_fortran_bridge::<B, T>,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn syrk_c<B: BlasBackend, T: Scalar>(
    backend: &B,
    uplo: Fill,
    trans: Operation,
    n: i32,
    k: i32,
    alpha: &T,
    a: &B::Buffer<T>,
    lda: i32,
    beta: &T,
    c: &mut B::Buffer<T>,
    ldc: i32,
) -> Result<(), BlasStatus> {
    backend.syrk(uplo, trans, n, k, alpha, a, lda, beta, c, ldc)
}

#[allow(clippy::too_many_arguments)]
fn syrk_fortran_bridge<B: BlasBackend, T: Scalar>(
    backend: &B,
    uplo: Fill,
    trans: Operation,
    n: i32,
    k: i32,
    alpha: &T,
    a: &B::Buffer<T>,
    lda: i32,
    beta: &T,
    c: &mut B::Buffer<T>,
    ldc: i32,
) -> Result<(), BlasStatus> {
    let uplo = uplo.as_char() as u8;
    let trans = trans.as_char() as u8;
    backend.syrk_fortran(&uplo, &trans, &n, &k, alpha, a, &lda, beta, c, &ldc)
}

/// Ускоритель, выбираемый в командной строке
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BackendKind {
    /// Эмуляция на хосте
    #[default]
    Host,
    /// OpenCL устройство (нужна сборка с feature `opencl`)
    Opencl,
}

/// Прогон проверки на выбранном ускорителе
pub fn run_on_backend(
    kind: BackendKind,
    args: &Arguments,
) -> Result<SyrkReport, SyrkError> {
    match kind {
        BackendKind::Host => run_syrk_check_with_precision(args, || Ok(HostBackend::new())),
        #[cfg(feature = "opencl")]
        BackendKind::Opencl => run_syrk_check_with_precision(args, OpenClBackend::new),
        #[cfg(not(feature = "opencl"))]
        BackendKind::Opencl => {
            log::error!("Сборка без поддержки OpenCL, включите feature `opencl`");
            Err(BlasStatus::NotSupported.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_kind_runs_check() {
        let args = Arguments::square(5, 2, 'L', 'C');
        let report = run_on_backend(BackendKind::Host, &args).unwrap();
        assert_eq!(report.backend, "host");
        assert!(report.unit_checked);
    }

    #[cfg(not(feature = "opencl"))]
    #[test]
    fn opencl_kind_without_feature_is_not_supported() {
        let args = Arguments::square(2, 2, 'U', 'N');
        let err = run_on_backend(BackendKind::Opencl, &args).unwrap_err();
        assert_eq!(err.status(), Some(BlasStatus::NotSupported));
    }

    #[test]
    fn abi_follows_flag() {
        assert_eq!(SyrkAbi::from_flag(false), SyrkAbi::C);
        assert_eq!(SyrkAbi::from_flag(true), SyrkAbi::Fortran);
    }

    #[test]
    fn both_entry_points_agree() {
        let backend = HostBackend::new();
        let host_a: Vec<f64> = (1..=6).map(f64::from).collect();
        let mut a = backend.alloc::<f64>(6).unwrap();
        backend.upload(&mut a, &host_a).unwrap();

        let mut results = Vec::new();
        for abi in [SyrkAbi::C, SyrkAbi::Fortran] {
            let syrk = abi.resolve::<HostBackend, f64>();
            let mut c = backend.alloc::<f64>(9).unwrap();
            backend.upload(&mut c, &[1.0; 9]).unwrap();
            syrk(&backend, Fill::Lower, Operation::None, 3, 2, &1.0, &a, 3, &2.0, &mut c, 3)
                .unwrap();
            let mut out = vec![0.0; 9];
            backend.download(&c, &mut out).unwrap();
            results.push(out);
        }
        assert_eq!(results[0], results[1]);
        assert_eq!(backend.stats().syrk_calls(), 2);
    }

    #[test]
    fn fortran_entry_rejects_bad_flag() {
        let backend = HostBackend::new();
        let a = backend.alloc::<f32>(1).unwrap();
        let mut c = backend.alloc::<f32>(1).unwrap();
        let status =
            backend.syrk_fortran(&b'X', &b'N', &1, &1, &1.0, &a, &1, &0.0, &mut c, &1);
        assert_eq!(status, Err(BlasStatus::InvalidValue));
    }
}
