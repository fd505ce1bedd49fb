//! Флаги BLAS для матриц

use crate::status::BlasStatus;

/// Какой треугольник симметричной матрицы читается и пишется
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fill {
    Upper,
    Lower,
}

/// Операция над матрицей A
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// A используется как есть
    None,
    Transpose,
    /// Для вещественных типов совпадает с `Transpose`
    ConjugateTranspose,
}

impl Fill {
    /// Разбирает символ BLAS (`U`/`L`, регистр не важен)
    pub fn from_char(c: char) -> Result<Self, BlasStatus> {
        match c.to_ascii_uppercase() {
            'U' => Ok(Fill::Upper),
            'L' => Ok(Fill::Lower),
            _ => Err(BlasStatus::InvalidValue),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Fill::Upper => 'U',
            Fill::Lower => 'L',
        }
    }

    /// Входит ли элемент (i, j) в выбранный треугольник
    #[inline]
    pub fn contains(self, i: usize, j: usize) -> bool {
        match self {
            Fill::Upper => i <= j,
            Fill::Lower => i >= j,
        }
    }
}

impl Operation {
    /// Разбирает символ BLAS (`N`/`T`/`C`, регистр не важен)
    pub fn from_char(c: char) -> Result<Self, BlasStatus> {
        match c.to_ascii_uppercase() {
            'N' => Ok(Operation::None),
            'T' => Ok(Operation::Transpose),
            'C' => Ok(Operation::ConjugateTranspose),
            _ => Err(BlasStatus::InvalidValue),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Operation::None => 'N',
            Operation::Transpose => 'T',
            Operation::ConjugateTranspose => 'C',
        }
    }

    pub fn is_transposed(self) -> bool {
        self != Operation::None
    }
}

/// Проверка аргументов SYRK в том виде, в каком ее делает BLAS
pub fn syrk_args_valid(trans: Operation, n: i32, k: i32, lda: i32, ldc: i32) -> bool {
    if n < 0 || k < 0 || ldc < n {
        return false;
    }
    if trans.is_transposed() {
        lda >= k
    } else {
        lda >= n
    }
}

/// Индекс элемента (i, j) в матрице, хранящейся по столбцам
#[inline(always)]
pub fn col_major(i: usize, j: usize, ld: usize) -> usize {
    i + j * ld
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chars_round_trip_case_insensitively() {
        assert_eq!(Fill::from_char('u'), Ok(Fill::Upper));
        assert_eq!(Fill::from_char('L'), Ok(Fill::Lower));
        assert_eq!(Fill::from_char('X'), Err(BlasStatus::InvalidValue));
        assert_eq!(Operation::from_char('c'), Ok(Operation::ConjugateTranspose));
        assert_eq!(Operation::from_char('Q'), Err(BlasStatus::InvalidValue));
        assert_eq!(Operation::Transpose.as_char(), 'T');
    }

    #[test]
    fn lda_bound_depends_on_transpose() {
        assert!(syrk_args_valid(Operation::None, 4, 2, 4, 4));
        assert!(!syrk_args_valid(Operation::None, 4, 2, 2, 4));
        assert!(syrk_args_valid(Operation::Transpose, 4, 2, 2, 4));
        assert!(!syrk_args_valid(Operation::Transpose, 4, 8, 4, 4));
        assert!(!syrk_args_valid(Operation::None, 4, 4, 4, 3));
        assert!(!syrk_args_valid(Operation::None, -1, 4, 4, 4));
        assert!(!syrk_args_valid(Operation::None, 4, -1, 4, 4));
        assert!(syrk_args_valid(Operation::None, 0, 0, 0, 0));
    }
}
