//! Ускоритель, эмулируемый на хосте.
//!
//! Память "устройства" это отдельные `Vec`, копирование явное, а SYRK
//! считается через `ndarray::linalg::general_mat_mul`, независимо от
//! эталонной реализации. Счетчики в [`HostStats`] позволяют проверить,
//! что прогон не трогал ускоритель и освободил хэндл.

use super::BlasBackend;
use crate::matrix::{col_major, syrk_args_valid, Fill, Operation};
use crate::scalar::Scalar;
use crate::status::BlasStatus;
use log::debug;
use ndarray::linalg::general_mat_mul;
use ndarray::{Array2, ArrayView2, ShapeBuilder};
use std::cell::Cell;
use std::rc::Rc;

/// Счетчики обращений к эмулятору
#[derive(Debug, Default)]
pub struct HostStats {
    allocations: Cell<usize>,
    uploads: Cell<usize>,
    downloads: Cell<usize>,
    syrk_calls: Cell<usize>,
    releases: Cell<usize>,
}

impl HostStats {
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    pub fn uploads(&self) -> usize {
        self.uploads.get()
    }

    pub fn downloads(&self) -> usize {
        self.downloads.get()
    }

    pub fn syrk_calls(&self) -> usize {
        self.syrk_calls.get()
    }

    pub fn releases(&self) -> usize {
        self.releases.get()
    }

    fn bump(counter: &Cell<usize>) {
        counter.set(counter.get() + 1);
    }
}

/// Буфер "устройства"
#[derive(Debug, Clone)]
pub struct HostBuffer<T> {
    data: Vec<T>,
}

impl<T> HostBuffer<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug)]
pub struct HostBackend {
    stats: Rc<HostStats>,
    fail_with: Option<BlasStatus>,
}

impl Default for HostBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBackend {
    pub fn new() -> Self {
        Self::with_stats(Rc::new(HostStats::default()))
    }

    /// Эмулятор, пишущий счетчики в общий `stats`
    pub fn with_stats(stats: Rc<HostStats>) -> Self {
        debug!("Создание эмулируемого ускорителя");
        Self {
            stats,
            fail_with: None,
        }
    }

    /// Каждый вызов SYRK завершится статусом `status`
    pub fn failing(mut self, status: BlasStatus) -> Self {
        self.fail_with = Some(status);
        self
    }

    pub fn stats(&self) -> Rc<HostStats> {
        Rc::clone(&self.stats)
    }
}

impl Drop for HostBackend {
    fn drop(&mut self) {
        debug!("Освобождение эмулируемого ускорителя");
        HostStats::bump(&self.stats.releases);
    }
}

impl BlasBackend for HostBackend {
    type Buffer<T: Scalar> = HostBuffer<T>;

    fn name(&self) -> &str {
        "host"
    }

    fn alloc<T: Scalar>(&self, len: usize) -> Result<HostBuffer<T>, BlasStatus> {
        HostStats::bump(&self.stats.allocations);
        Ok(HostBuffer {
            data: vec![T::zero(); len],
        })
    }

    fn upload<T: Scalar>(&self, dst: &mut HostBuffer<T>, src: &[T]) -> Result<(), BlasStatus> {
        if dst.data.len() != src.len() {
            return Err(BlasStatus::InvalidValue);
        }
        HostStats::bump(&self.stats.uploads);
        dst.data.copy_from_slice(src);
        Ok(())
    }

    fn download<T: Scalar>(&self, src: &HostBuffer<T>, dst: &mut [T]) -> Result<(), BlasStatus> {
        if src.data.len() != dst.len() {
            return Err(BlasStatus::InvalidValue);
        }
        HostStats::bump(&self.stats.downloads);
        dst.copy_from_slice(&src.data);
        Ok(())
    }

    fn syrk<T: Scalar>(
        &self,
        uplo: Fill,
        trans: Operation,
        n: i32,
        k: i32,
        alpha: &T,
        a: &HostBuffer<T>,
        lda: i32,
        beta: &T,
        c: &mut HostBuffer<T>,
        ldc: i32,
    ) -> Result<(), BlasStatus> {
        HostStats::bump(&self.stats.syrk_calls);
        if let Some(status) = self.fail_with {
            return Err(status);
        }
        if !syrk_args_valid(trans, n, k, lda, ldc) {
            return Err(BlasStatus::InvalidValue);
        }

        let (n, k, lda, ldc) = (n as usize, k as usize, lda as usize, ldc as usize);
        let (alpha, beta) = (*alpha, *beta);
        let (zero, one) = (T::zero(), T::one());

        if n == 0 || ((alpha == zero || k == 0) && beta == one) {
            return Ok(());
        }
        if c.data.len() < ldc * n {
            return Err(BlasStatus::InvalidValue);
        }

        let mut product = Array2::<T>::zeros((n, n));
        if k > 0 && alpha != zero {
            let (rows, cols) = if trans.is_transposed() { (k, n) } else { (n, k) };
            let stored = ArrayView2::from_shape((rows, cols).strides((1, lda)), &a.data[..])
                .map_err(|_| BlasStatus::InvalidValue)?;
            let op_a = if trans.is_transposed() {
                stored.reversed_axes()
            } else {
                stored
            };
            general_mat_mul(alpha, &op_a, &op_a.t(), zero, &mut product);
        }

        for j in 0..n {
            for i in 0..n {
                if !uplo.contains(i, j) {
                    continue;
                }
                let idx = col_major(i, j, ldc);
                c.data[idx] = if beta == zero {
                    product[[i, j]]
                } else {
                    product[[i, j]] + beta * c.data[idx]
                };
            }
        }
        Ok(())
    }
}
