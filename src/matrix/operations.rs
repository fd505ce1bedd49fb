//! Операции над матрицами на CPU: инициализация и эталонный SYRK

use super::types::{col_major, Fill, Operation};
use crate::scalar::Scalar;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Генератор с фиксированным зерном, чтобы входные данные повторялись между запусками
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Заполняет логическую область `rows x cols` матрицы с ведущей размерностью `ld`.
///
/// Значения целые из `1..=10`: любые произведения и суммы в тестовых размерах
/// представимы точно, поэтому порядок суммирования не влияет на результат.
/// Элементы за пределами `rows` (хвост столбца) не трогаются.
pub fn init_matrix<T: Scalar, R: Rng + ?Sized>(
    rng: &mut R,
    buf: &mut [T],
    rows: usize,
    cols: usize,
    ld: usize,
) {
    debug_assert!(ld >= rows);
    for j in 0..cols {
        for i in 0..rows {
            let value: u32 = rng.gen_range(1..=10);
            buf[col_major(i, j, ld)] = T::from_f64(value as f64);
        }
    }
}

/// Элемент op(A)[i, p]
#[inline(always)]
fn op_a<T: Scalar>(a: &[T], trans: Operation, i: usize, p: usize, lda: usize) -> T {
    if trans.is_transposed() {
        a[col_major(p, i, lda)]
    } else {
        a[col_major(i, p, lda)]
    }
}

/// Эталонный SYRK: `C := alpha * op(A) * op(A)^T + beta * C`.
///
/// Матрицы хранятся по столбцам. Читается и пишется только треугольник `uplo`.
/// При `beta == 0` старое содержимое C не читается.
#[allow(clippy::too_many_arguments)]
pub fn cpu_syrk<T: Scalar>(
    uplo: Fill,
    trans: Operation,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    let zero = T::zero();
    let one = T::one();

    if n == 0 || ((alpha == zero || k == 0) && beta == one) {
        return;
    }

    debug!("CPU syrk: n={} k={} uplo={:?} trans={:?}", n, k, uplo, trans);

    for j in 0..n {
        let rows = match uplo {
            Fill::Upper => 0..j + 1,
            Fill::Lower => j..n,
        };
        for i in rows {
            let idx = col_major(i, j, ldc);
            let scaled = if beta == zero { zero } else { beta * c[idx] };
            if alpha == zero {
                c[idx] = scaled;
                continue;
            }
            let mut sum = zero;
            for p in 0..k {
                sum = sum + op_a(a, trans, i, p, lda) * op_a(a, trans, j, p, lda);
            }
            c[idx] = alpha * sum + scaled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_deterministic_and_leaves_padding() {
        let mut first = vec![0.0f64; 6 * 3];
        let mut second = vec![0.0f64; 6 * 3];
        init_matrix(&mut seeded_rng(1), &mut first, 4, 3, 6);
        init_matrix(&mut seeded_rng(1), &mut second, 4, 3, 6);
        assert_eq!(first, second);

        for j in 0..3 {
            for i in 0..6 {
                let v = first[col_major(i, j, 6)];
                if i < 4 {
                    assert!((1.0..=10.0).contains(&v) && v.fract() == 0.0);
                } else {
                    assert_eq!(v, 0.0);
                }
            }
        }

        let mut other = vec![0.0f64; 6 * 3];
        init_matrix(&mut seeded_rng(2), &mut other, 4, 3, 6);
        assert_ne!(first, other);
    }

    #[test]
    fn syrk_upper_no_transpose() {
        // A = [[1, 2], [3, 4]] по столбцам, A * A^T = [[5, 11], [11, 25]]
        let a = [1.0f32, 3.0, 2.0, 4.0];
        let mut c = [-1.0f32; 4];
        cpu_syrk(Fill::Upper, Operation::None, 2, 2, 1.0, &a, 2, 0.0, &mut c, 2);
        assert_eq!(c, [5.0, -1.0, 11.0, 25.0]);
    }

    #[test]
    fn syrk_lower_transpose_with_beta() {
        // A хранится как K x N = 2 x 2, op(A) = A^T
        // A^T * A = [[10, 14], [14, 20]]
        let a = [1.0f64, 3.0, 2.0, 4.0];
        let mut c = [1.0f64, 1.0, 7.0, 1.0];
        cpu_syrk(Fill::Lower, Operation::Transpose, 2, 2, 2.0, &a, 2, 3.0, &mut c, 2);
        assert_eq!(c, [23.0, 31.0, 7.0, 43.0]);
    }

    #[test]
    fn syrk_respects_leading_dimension() {
        let a = [1.0f64, 2.0, 99.0];
        let mut c = [0.0f64, 0.0, 42.0, 0.0, 0.0, 42.0];
        cpu_syrk(Fill::Upper, Operation::None, 2, 1, 1.0, &a, 3, 0.0, &mut c, 3);
        assert_eq!(c, [1.0, 0.0, 42.0, 2.0, 4.0, 42.0]);
    }

    #[test]
    fn zero_beta_discards_nan() {
        let a = [2.0f64];
        let mut c = [f64::NAN];
        cpu_syrk(Fill::Upper, Operation::None, 1, 1, 1.0, &a, 1, 0.0, &mut c, 1);
        assert_eq!(c, [4.0]);
    }

    #[test]
    fn quick_return_keeps_c() {
        let a: [f64; 0] = [];
        let mut c = [f64::NAN, 3.0, 4.0, 5.0];
        cpu_syrk(Fill::Lower, Operation::None, 2, 0, 1.0, &a, 2, 1.0, &mut c, 2);
        assert!(c[0].is_nan());
        assert_eq!(&c[1..], &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn zero_alpha_only_scales() {
        let a = [5.0f32, 5.0];
        let mut c = [1.0f32, 2.0, 3.0, 4.0];
        cpu_syrk(Fill::Upper, Operation::None, 2, 1, 0.0, &a, 2, 2.0, &mut c, 2);
        assert_eq!(c, [2.0, 2.0, 6.0, 8.0]);
    }
}
