//! Сравнение результатов ускорителя с эталоном

use super::types::col_major;
use crate::scalar::Scalar;
use crate::status::UnitCheckFailure;
use log::warn;

/// Поэлементное точное сравнение логической области `rows x cols`.
///
/// Хвосты столбцов за пределами `rows` не сравниваются. В ошибке
/// возвращается первое расхождение и общее их число.
pub fn unit_check_general<T: Scalar>(
    rows: usize,
    cols: usize,
    ld: usize,
    expected: &[T],
    actual: &[T],
) -> Result<(), UnitCheckFailure> {
    let mut first: Option<(usize, usize, T, T)> = None;
    let mut count = 0usize;

    for j in 0..cols {
        for i in 0..rows {
            let idx = col_major(i, j, ld);
            let (e, a) = (expected[idx], actual[idx]);
            if !e.unit_eq(a) {
                count += 1;
                if first.is_none() {
                    first = Some((i, j, e, a));
                }
            }
        }
    }

    match first {
        None => Ok(()),
        Some((row, col, e, a)) => {
            warn!("Обнаружены расхождения: {} элементов, первое в ({}, {})", count, row, col);
            Err(UnitCheckFailure {
                matrix: "C",
                row,
                col,
                expected: e.to_string(),
                actual: a.to_string(),
                count,
                checked: rows * cols,
            })
        }
    }
}

/// Относительная ошибка по норме Фробениуса: `|E - A|_F / |E|_F`
pub fn norm_check_general<T: Scalar>(
    rows: usize,
    cols: usize,
    ld: usize,
    expected: &[T],
    actual: &[T],
) -> f64 {
    let mut diff = 0.0f64;
    let mut reference = 0.0f64;

    for j in 0..cols {
        for i in 0..rows {
            let idx = col_major(i, j, ld);
            let e = expected[idx].to_f64();
            let d = e - actual[idx].to_f64();
            diff += d * d;
            reference += e * e;
        }
    }

    if reference == 0.0 {
        diff.sqrt()
    } else {
        (diff / reference).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_matrices_pass() {
        let c = [1.0f64, 2.0, 3.0, 4.0];
        assert!(unit_check_general(2, 2, 2, &c, &c).is_ok());
        assert_eq!(norm_check_general(2, 2, 2, &c, &c), 0.0);
    }

    #[test]
    fn padding_is_ignored() {
        let expected = [1.0f32, 2.0, 100.0, 3.0, 4.0, 200.0];
        let actual = [1.0f32, 2.0, -1.0, 3.0, 4.0, -2.0];
        assert!(unit_check_general(2, 2, 3, &expected, &actual).is_ok());
    }

    #[test]
    fn reports_first_mismatch_and_count() {
        let expected = [1.0f64, 2.0, 3.0, 4.0];
        let actual = [1.0f64, 2.5, 3.0, 5.0];
        let failure = unit_check_general(2, 2, 2, &expected, &actual).unwrap_err();
        assert_eq!((failure.row, failure.col), (1, 0));
        assert_eq!(failure.expected, "2");
        assert_eq!(failure.actual, "2.5");
        assert_eq!(failure.count, 2);
        assert_eq!(failure.checked, 4);
    }

    #[test]
    fn empty_region_passes() {
        let empty: [f64; 0] = [];
        assert!(unit_check_general(0, 0, 0, &empty, &empty).is_ok());
        assert_eq!(norm_check_general(0, 0, 0, &empty, &empty), 0.0);
    }

    #[test]
    fn norm_error_is_relative() {
        let expected = [3.0f64, 4.0];
        let actual = [3.0f64, 4.5];
        let err = norm_check_general(2, 1, 2, &expected, &actual);
        assert!((err - 0.1).abs() < 1e-12);
    }
}
