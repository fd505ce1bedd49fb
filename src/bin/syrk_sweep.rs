//! Прогон проверки SYRK по сетке размеров и флагов
use anyhow::{bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use opencl_blas_check::{run_on_backend, Arguments, BackendKind, Precision, SyrkError};
use prettytable::{row, Table};

const SIZES_N: [i32; 5] = [0, 1, 4, 17, 64];
const SIZES_K: [i32; 3] = [0, 3, 16];
const UPLO: [char; 2] = ['U', 'L'];
const TRANS: [char; 3] = ['N', 'T', 'C'];

/// Проверяет SYRK на сетке параметров
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[arg(long, value_enum, default_value_t = BackendKind::Host)]
    backend: BackendKind,
    /// Добавка к минимальным ведущим размерностям
    #[arg(long, default_value_t = 0)]
    pad: i32,
    #[arg(long, default_value_t = 1)]
    seed: u64,
    #[arg(long)]
    fortran: bool,
    #[arg(long, default_value_t = 1.0)]
    alpha: f64,
    #[arg(long, default_value_t = 0.0)]
    beta: f64,
}

fn grid(cli: &Cli) -> Vec<Arguments> {
    let mut cases = Vec::new();
    for precision in [Precision::Single, Precision::Double] {
        for &n in &SIZES_N {
            for &k in &SIZES_K {
                for &uplo in &UPLO {
                    for &trans_a in &TRANS {
                        let mut args = Arguments::square(n, k, uplo, trans_a);
                        args.lda += cli.pad;
                        args.ldc += cli.pad;
                        args.alpha = cli.alpha;
                        args.beta = cli.beta;
                        args.seed = cli.seed;
                        args.fortran = cli.fortran;
                        args.timing = true;
                        args.precision = precision;
                        cases.push(args);
                    }
                }
            }
        }
    }
    cases
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let cases = grid(&cli);

    let progress = ProgressBar::new(cases.len() as u64);
    progress.set_style(ProgressStyle::with_template(
        "{spinner} [{bar:40}] {pos}/{len} {msg}",
    )?);

    let mut table = Table::new();
    table.set_titles(row!["prec", "N", "K", "uplo", "transA", "lda", "ldc", "result", "gpu us"]);
    let mut failures = 0usize;

    for args in &cases {
        progress.set_message(format!("N={} K={}", args.n, args.k));
        let precision = match args.precision {
            Precision::Single => "s",
            Precision::Double => "d",
        };
        let (result, time) = match run_on_backend(cli.backend, args) {
            Ok(report) => (
                "PASS".to_string(),
                report.gpu_time_us.map(|t| format!("{:.1}", t)).unwrap_or_default(),
            ),
            Err(SyrkError::Status(status)) => {
                failures += 1;
                (format!("status: {}", status), String::new())
            }
            Err(SyrkError::UnitCheck(failure)) => {
                failures += 1;
                (format!("FAIL ({} diff)", failure.count), String::new())
            }
        };
        table.add_row(row![
            precision,
            args.n,
            args.k,
            args.uplo,
            args.trans_a,
            args.lda,
            args.ldc,
            result,
            time
        ]);
        progress.inc(1);
    }
    progress.finish_and_clear();

    table.printstd();
    info!("Прогонов: {}, ошибок: {}", cases.len(), failures);
    if failures > 0 {
        bail!("{} из {} прогонов не прошли", failures, cases.len());
    }
    println!("Все {} прогонов прошли", cases.len());
    Ok(())
}
