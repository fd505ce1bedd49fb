//! Вспомогательные функции и утилиты

use crate::matrix::col_major;
use crate::scalar::Scalar;
use log::{debug, log_enabled, Level};
use std::fmt::Write;
use std::time::Instant;

/// Измеряет время выполнения функции в микросекундах
pub fn measure_us<F, T>(f: F) -> (T, f64)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed().as_secs_f64() * 1e6;
    (result, elapsed)
}

/// Выводит в debug-лог левый верхний угол матрицы (до 4x4)
pub fn log_matrix_head<T: Scalar>(label: &str, buf: &[T], rows: usize, cols: usize, ld: usize) {
    if !log_enabled!(Level::Debug) {
        return;
    }
    let mut text = String::new();
    for i in 0..rows.min(4) {
        for j in 0..cols.min(4) {
            let _ = write!(text, "{:.1} ", buf[col_major(i, j, ld)].to_f64());
        }
        text.push_str("...\n");
    }
    debug!("Матрица {} ({}x{}):\n{}", label, rows, cols, text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_and_returns_result() {
        let (value, elapsed) = measure_us(|| 21 * 2);
        assert_eq!(value, 42);
        assert!(elapsed >= 0.0);
    }
}
