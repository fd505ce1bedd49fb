//! Скалярные типы, над которыми работают проверки

use ndarray::LinalgScalar;
use std::fmt;

/// Тип элемента матрицы.
///
/// Помимо арифметики (через [`LinalgScalar`]) задает имя типа в OpenCL C
/// и правило сравнения для unit-проверки.
pub trait Scalar: LinalgScalar + PartialOrd + fmt::Debug + fmt::Display + Send + Sync {
    /// Имя типа в исходниках OpenCL ядер
    const CL_TYPE: &'static str;
    /// Короткое имя точности в стиле BLAS (`s`, `d`)
    const PRECISION: &'static str;

    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;

    /// Правило равенства для unit-проверки: точное совпадение значений
    #[inline]
    fn unit_eq(self, other: Self) -> bool {
        self == other
    }
}

impl Scalar for f32 {
    const CL_TYPE: &'static str = "float";
    const PRECISION: &'static str = "s";

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Scalar for f64 {
    const CL_TYPE: &'static str = "double";
    const PRECISION: &'static str = "d";

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_eq_is_exact() {
        assert!(1.0f32.unit_eq(1.0));
        assert!(!1.0f32.unit_eq(1.0 + f32::EPSILON));
        assert!(0.0f64.unit_eq(-0.0));
        assert!(!f64::NAN.unit_eq(f64::NAN));
    }

    #[test]
    fn cl_type_names() {
        assert_eq!(<f32 as Scalar>::CL_TYPE, "float");
        assert_eq!(<f64 as Scalar>::CL_TYPE, "double");
    }
}
