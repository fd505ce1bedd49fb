//! Статусы BLAS-вызовов и ошибки проверки

use thiserror::Error;

/// Статус, возвращаемый ускорителем.
///
/// `Success` никогда не используется как ошибка: успешный вызов это `Ok(())`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum BlasStatus {
    #[error("success")]
    Success,
    #[error("library not initialized")]
    NotInitialized,
    #[error("resource allocation failed")]
    AllocFailed,
    #[error("invalid value")]
    InvalidValue,
    #[error("device memory mapping failed")]
    MappingError,
    #[error("kernel execution failed")]
    ExecutionFailed,
    #[error("internal library error")]
    InternalError,
    #[error("operation not supported")]
    NotSupported,
    #[error("unknown status")]
    Unknown,
}

/// Расхождение результатов ускорителя и эталона
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "{matrix}: mismatch at ({row}, {col}): expected {expected}, got {actual} \
     ({count} of {checked} elements differ)"
)]
pub struct UnitCheckFailure {
    pub matrix: &'static str,
    pub row: usize,
    pub col: usize,
    pub expected: String,
    pub actual: String,
    pub count: usize,
    pub checked: usize,
}

/// Ошибка прогона проверки SYRK
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyrkError {
    /// Неверные аргументы или сбой ускорителя
    #[error("syrk returned status: {0}")]
    Status(#[from] BlasStatus),
    /// Результат ускорителя не совпал с эталоном
    #[error(transparent)]
    UnitCheck(#[from] UnitCheckFailure),
}

impl SyrkError {
    /// Статус ускорителя, если ошибка не связана со сравнением
    pub fn status(&self) -> Option<BlasStatus> {
        match self {
            SyrkError::Status(status) => Some(*status),
            SyrkError::UnitCheck(_) => None,
        }
    }
}
