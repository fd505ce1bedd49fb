//! Параметры одного прогона проверки

use crate::matrix::{Fill, Operation};
use crate::status::BlasStatus;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Точность элементов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum Precision {
    /// f32
    #[serde(rename = "s")]
    #[value(name = "s")]
    Single,
    /// f64
    #[default]
    #[serde(rename = "d")]
    #[value(name = "d")]
    Double,
}

/// Входная конфигурация проверки.
///
/// Размеры знаковые: отрицательные значения допустимы на входе и
/// отвергаются при валидации.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arguments {
    #[serde(rename = "N")]
    pub n: i32,
    #[serde(rename = "K")]
    pub k: i32,
    pub lda: i32,
    pub ldc: i32,
    /// `U` или `L`
    pub uplo: char,
    /// `N`, `T` или `C`
    #[serde(rename = "transA")]
    pub trans_a: char,
    pub alpha: f64,
    pub beta: f64,
    /// Вызывать SYRK через Fortran-совместимую точку входа
    pub fortran: bool,
    pub timing: bool,
    pub unit_check: bool,
    pub norm_check: bool,
    pub seed: u64,
    pub precision: Precision,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            n: 128,
            k: 128,
            lda: 128,
            ldc: 128,
            uplo: 'U',
            trans_a: 'N',
            alpha: 1.0,
            beta: 0.0,
            fortran: false,
            timing: false,
            unit_check: true,
            norm_check: false,
            seed: 1,
            precision: Precision::Double,
        }
    }
}

impl Arguments {
    /// Квадратная задача `n x n` с минимальными ведущими размерностями
    pub fn square(n: i32, k: i32, uplo: char, trans_a: char) -> Self {
        let lda = if trans_a.eq_ignore_ascii_case(&'N') { n } else { k };
        Self {
            n,
            k,
            lda,
            ldc: n,
            uplo,
            trans_a,
            ..Self::default()
        }
    }

    /// Загружает параметры из JSON, недостающие поля берутся по умолчанию
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Не удалось прочитать файл параметров {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Не удалось разобрать параметры из {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn fill(&self) -> Result<Fill, BlasStatus> {
        Fill::from_char(self.uplo)
    }

    pub fn operation(&self) -> Result<Operation, BlasStatus> {
        Operation::from_char(self.trans_a)
    }

    pub fn alpha<T: crate::Scalar>(&self) -> T {
        T::from_f64(self.alpha)
    }

    pub fn beta<T: crate::Scalar>(&self) -> T {
        T::from_f64(self.beta)
    }
}
