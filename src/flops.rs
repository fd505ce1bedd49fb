//! Модель числа операций для отчетов о скорости

/// Гигафлопы вещественного SYRK: `n * (n + 1) * k` операций
pub fn syrk_gflop_count(n: usize, k: usize) -> f64 {
    (n as f64) * (n as f64 + 1.0) * (k as f64) / 1e9
}

/// Скорость в GFLOP/s по времени в микросекундах
pub fn gflops(gflop_count: f64, time_us: f64) -> Option<f64> {
    if time_us > 0.0 {
        Some(gflop_count * 1e6 / time_us)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_syrk_flops() {
        assert_eq!(syrk_gflop_count(0, 10), 0.0);
        assert!((syrk_gflop_count(1000, 1000) - 1.001).abs() < 1e-12);
    }

    #[test]
    fn rate_needs_positive_time() {
        assert_eq!(gflops(1.0, 0.0), None);
        assert_eq!(gflops(2.0, 1e6), Some(2.0));
    }
}
