//! Прогон проверки SYRK: ускоритель против эталона на CPU
//!
//! Последовательность: валидация, подготовка данных на хосте, копирование
//! на ускоритель, вызов SYRK, копирование результата обратно, эталон на
//! исходных данных хоста и сравнение.

use crate::arguments::{Arguments, Precision};
use crate::backend::{BlasBackend, SyrkAbi};
use crate::flops::{gflops, syrk_gflop_count};
use crate::matrix::{
    cpu_syrk, init_matrix, norm_check_general, seeded_rng, syrk_args_valid, unit_check_general,
};
use crate::scalar::Scalar;
use crate::status::{BlasStatus, SyrkError};
use crate::utils::{log_matrix_head, measure_us};
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;

/// Итог успешного прогона
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyrkReport {
    pub precision: &'static str,
    pub backend: String,
    pub n: i32,
    pub k: i32,
    pub uplo: char,
    pub trans_a: char,
    pub gpu_time_us: Option<f64>,
    pub cpu_time_us: Option<f64>,
    pub gpu_gflops: Option<f64>,
    pub cpu_gflops: Option<f64>,
    /// Относительная ошибка по норме Фробениуса, если она запрашивалась
    pub norm_error: Option<f64>,
    /// Была ли выполнена точная поэлементная проверка
    pub unit_checked: bool,
}

impl fmt::Display for SyrkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}syrk[{}] N={} K={} uplo={} transA={}",
            self.precision, self.backend, self.n, self.k, self.uplo, self.trans_a
        )?;
        if let Some(t) = self.gpu_time_us {
            write!(f, " gpu={:.1}us", t)?;
        }
        if let Some(g) = self.gpu_gflops {
            write!(f, " ({:.3} GFLOP/s)", g)?;
        }
        if let Some(t) = self.cpu_time_us {
            write!(f, " cpu={:.1}us", t)?;
        }
        if let Some(e) = self.norm_error {
            write!(f, " norm_error={:e}", e)?;
        }
        if self.unit_checked {
            write!(f, " unit_check=PASS")?;
        }
        Ok(())
    }
}

/// Проверяет SYRK ускорителя для типа `T`.
///
/// `open_backend` вызывается только после успешной валидации аргументов,
/// поэтому на неверном входе ускоритель не создается и память не выделяется.
/// Ускоритель освобождается при любом выходе из функции.
pub fn run_syrk_check<T, B, F>(args: &Arguments, open_backend: F) -> Result<SyrkReport, SyrkError>
where
    T: Scalar,
    B: BlasBackend,
    F: FnOnce() -> Result<B, BlasStatus>,
{
    let uplo = args.fill()?;
    let trans = args.operation()?;
    let (n, k, lda, ldc) = (args.n, args.k, args.lda, args.ldc);

    // Быстрый выход до выделения памяти
    if !syrk_args_valid(trans, n, k, lda, ldc) {
        debug!("Неверные аргументы: N={} K={} lda={} ldc={} transA={}", n, k, lda, ldc, args.trans_a);
        return Err(BlasStatus::InvalidValue.into());
    }

    let (n_u, k_u, lda_u, ldc_u) = (n as usize, k as usize, lda as usize, ldc as usize);
    let k1 = if trans.is_transposed() { n_u } else { k_u };
    let a_rows = if trans.is_transposed() { k_u } else { n_u };
    let a_size = lda_u * k1;
    let c_size = ldc_u * n_u;

    let alpha: T = args.alpha();
    let beta: T = args.beta();
    let syrk = SyrkAbi::from_flag(args.fortran).resolve::<B, T>();

    let backend = open_backend()?;

    // hX на хосте, dX на ускорителе
    let mut h_a = vec![T::zero(); a_size];
    let mut h_c = vec![T::zero(); c_size];
    let mut h_c2 = vec![T::zero(); c_size];

    let mut rng = seeded_rng(args.seed);
    init_matrix(&mut rng, &mut h_a, a_rows, k1, lda_u);
    init_matrix(&mut rng, &mut h_c, n_u, n_u, ldc_u);
    log_matrix_head("A", &h_a, a_rows, k1, lda_u);
    log_matrix_head("C", &h_c, n_u, n_u, ldc_u);

    let mut d_a = backend.alloc::<T>(a_size)?;
    let mut d_c = backend.alloc::<T>(c_size)?;
    backend.upload(&mut d_a, &h_a)?;
    backend.upload(&mut d_c, &h_c)?;

    let (status, gpu_time_us) = measure_us(|| {
        syrk(&backend, uplo, trans, n, k, &alpha, &d_a, lda, &beta, &mut d_c, ldc)
    });
    if let Err(status) = status {
        warn!("{} syrk завершился со статусом: {}", backend.name(), status);
        return Err(status.into());
    }

    backend.download(&d_c, &mut h_c2)?;
    log_matrix_head("C (ускоритель)", &h_c2, n_u, n_u, ldc_u);

    let gflop_count = syrk_gflop_count(n_u, k_u);
    let mut report = SyrkReport {
        precision: T::PRECISION,
        backend: backend.name().to_string(),
        n,
        k,
        uplo: uplo.as_char(),
        trans_a: trans.as_char(),
        gpu_time_us: None,
        cpu_time_us: None,
        gpu_gflops: None,
        cpu_gflops: None,
        norm_error: None,
        unit_checked: false,
    };
    if args.timing {
        report.gpu_time_us = Some(gpu_time_us);
        report.gpu_gflops = gflops(gflop_count, gpu_time_us);
    }

    if args.unit_check || args.norm_check {
        let ((), cpu_time_us) = measure_us(|| {
            cpu_syrk(uplo, trans, n_u, k_u, alpha, &h_a, lda_u, beta, &mut h_c, ldc_u)
        });
        if args.timing {
            report.cpu_time_us = Some(cpu_time_us);
            report.cpu_gflops = gflops(gflop_count, cpu_time_us);
        }

        // Норма только считается и попадает в отчет, решение принимает unit-проверка
        if args.norm_check {
            report.norm_error = Some(norm_check_general(n_u, n_u, ldc_u, &h_c, &h_c2));
        }
        if args.unit_check {
            unit_check_general(n_u, n_u, ldc_u, &h_c, &h_c2)?;
            report.unit_checked = true;
        }
    }

    info!("{}", report);
    Ok(report)
}

/// То же, что [`run_syrk_check`], с типом из `args.precision`
pub fn run_syrk_check_with_precision<B, F>(
    args: &Arguments,
    open_backend: F,
) -> Result<SyrkReport, SyrkError>
where
    B: BlasBackend,
    F: FnOnce() -> Result<B, BlasStatus>,
{
    match args.precision {
        Precision::Single => run_syrk_check::<f32, B, F>(args, open_backend),
        Precision::Double => run_syrk_check::<f64, B, F>(args, open_backend),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{HostBackend, HostStats};
    use std::rc::Rc;

    fn open_with(stats: &Rc<HostStats>) -> impl FnOnce() -> Result<HostBackend, BlasStatus> {
        let stats = Rc::clone(stats);
        move || Ok(HostBackend::with_stats(stats))
    }

    #[test]
    fn small_upper_case_passes() {
        let stats = Rc::new(HostStats::default());
        let args = Arguments::square(4, 4, 'U', 'N');
        let report = run_syrk_check::<f32, _, _>(&args, open_with(&stats)).unwrap();
        assert!(report.unit_checked);
        assert_eq!(report.precision, "s");
        assert_eq!(stats.syrk_calls(), 1);
        assert_eq!(stats.releases(), 1);
    }

    #[test]
    fn unknown_flag_is_invalid_value() {
        let stats = Rc::new(HostStats::default());
        let mut args = Arguments::square(4, 4, 'U', 'N');
        args.uplo = 'X';
        let err = run_syrk_check::<f64, _, _>(&args, open_with(&stats)).unwrap_err();
        assert_eq!(err.status(), Some(BlasStatus::InvalidValue));
        assert_eq!(stats.allocations(), 0);
        assert_eq!(stats.releases(), 0);
    }

    #[test]
    fn timing_fills_report() {
        let mut args = Arguments::square(8, 3, 'L', 'T');
        args.timing = true;
        args.norm_check = true;
        let report =
            run_syrk_check_with_precision(&args, || Ok(HostBackend::new())).unwrap();
        assert_eq!(report.precision, "d");
        assert!(report.gpu_time_us.is_some());
        assert!(report.cpu_time_us.is_some());
        assert_eq!(report.norm_error, Some(0.0));
        assert!(report.to_string().contains("unit_check=PASS"));
    }

    #[test]
    fn no_checks_skips_reference() {
        let mut args = Arguments::square(4, 2, 'U', 'N');
        args.unit_check = false;
        let report = run_syrk_check::<f64, _, _>(&args, || Ok(HostBackend::new())).unwrap();
        assert!(!report.unit_checked);
        assert_eq!(report.norm_error, None);
        assert_eq!(report.cpu_time_us, None);
    }
}
