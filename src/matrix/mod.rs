//! Модуль для работы с матрицами
//!
//! Предоставляет:
//! - Флаги BLAS (треугольник, транспонирование)
//! - Инициализацию и эталонный SYRK на CPU
//! - Сравнение результатов
//! - Исходники OpenCL ядер

mod types;
pub mod operations;
pub mod check;
pub mod kernels;

pub use types::{col_major, syrk_args_valid, Fill, Operation};
pub use operations::{cpu_syrk, init_matrix, seeded_rng};
pub use check::{norm_check_general, unit_check_general};
pub use kernels::{syrk_kernel_source, SYRK_KERNEL_NAME};
