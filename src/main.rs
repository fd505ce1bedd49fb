//! Проверка SYRK для одного набора параметров

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use opencl_blas_check::{run_on_backend, Arguments, BackendKind, Precision};
use std::path::PathBuf;

/// Сравнивает SYRK ускорителя с эталоном на CPU
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON с параметрами, флаги ниже его перекрывают
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(short = 'n', long = "n")]
    n: Option<i32>,
    #[arg(short = 'k', long = "k")]
    k: Option<i32>,
    #[arg(long)]
    lda: Option<i32>,
    #[arg(long)]
    ldc: Option<i32>,
    /// U или L
    #[arg(long)]
    uplo: Option<char>,
    /// N, T или C
    #[arg(long = "transA")]
    trans_a: Option<char>,
    #[arg(long)]
    alpha: Option<f64>,
    #[arg(long)]
    beta: Option<f64>,
    #[arg(short = 'r', long, value_enum)]
    precision: Option<Precision>,
    #[arg(long)]
    seed: Option<u64>,
    /// Вызывать через Fortran-совместимую точку входа
    #[arg(long)]
    fortran: bool,
    /// Замерять время ускорителя и эталона
    #[arg(long)]
    timing: bool,
    /// Считать относительную ошибку по норме
    #[arg(long)]
    norm_check: bool,
    /// Не выполнять поэлементную проверку
    #[arg(long)]
    no_unit_check: bool,
    #[arg(long, value_enum, default_value_t = BackendKind::Host)]
    backend: BackendKind,
    /// Печатать отчет в JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn arguments(&self) -> Result<Arguments> {
        let mut args = match &self.config {
            Some(path) => Arguments::from_json_file(path)?,
            None => Arguments::default(),
        };
        if let Some(n) = self.n {
            args.n = n;
            // По умолчанию ведущие размерности минимальные
            if self.ldc.is_none() && self.config.is_none() {
                args.ldc = n;
            }
        }
        if let Some(k) = self.k {
            args.k = k;
        }
        if let Some(v) = self.lda {
            args.lda = v;
        }
        if let Some(v) = self.ldc {
            args.ldc = v;
        }
        if let Some(v) = self.uplo {
            args.uplo = v;
        }
        if let Some(v) = self.trans_a {
            args.trans_a = v;
        }
        if self.lda.is_none() && self.config.is_none() {
            args.lda = if args.trans_a.eq_ignore_ascii_case(&'N') { args.n } else { args.k };
        }
        if let Some(v) = self.alpha {
            args.alpha = v;
        }
        if let Some(v) = self.beta {
            args.beta = v;
        }
        if let Some(v) = self.precision {
            args.precision = v;
        }
        if let Some(v) = self.seed {
            args.seed = v;
        }
        args.fortran |= self.fortran;
        args.timing |= self.timing;
        args.norm_check |= self.norm_check;
        if self.no_unit_check {
            args.unit_check = false;
        }
        Ok(args)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let args = cli.arguments()?;
    info!("Параметры: {:?}", args);

    match run_on_backend(cli.backend, &args) {
        Ok(report) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("Не удалось сериализовать отчет")?
                );
            }
            Ok(())
        }
        Err(err) => {
            error!("Проверка не пройдена: {}", err);
            Err(err.into())
        }
    }
}
