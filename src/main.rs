use std::path::{Path, PathBuf};
use std::process::ExitCode;

use leash::query::Engine;
use leash::settings::Settings;

fn main() -> ExitCode {
    env_logger::init();

    let mut dataset = None;
    let mut queries = None;
    let mut settings = Settings::default();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--workers" {
            match args.next().and_then(|v| v.parse().ok()) {
                Some(workers) => settings.workers = workers,
                None => return usage("--workers needs a number"),
            }
        } else if arg == "--dir" {
            match args.next() {
                Some(dir) => settings.trajectory_dir = PathBuf::from(dir),
                None => return usage("--dir needs a path"),
            }
        } else if arg == "--out" {
            match args.next() {
                Some(dir) => settings.output_dir = PathBuf::from(dir),
                None => return usage("--out needs a path"),
            }
        } else if dataset.is_none() {
            dataset = Some(arg);
        } else if queries.is_none() {
            queries = Some(arg);
        } else {
            return usage(&format!("unexpected argument {arg:?}"));
        }
    }

    let (Some(dataset), Some(queries)) = (dataset, queries) else {
        return usage("missing the dataset or query file");
    };

    match Engine::run(Path::new(&dataset), Path::new(&queries), settings) {
        Ok(stats) => {
            let matches: usize = stats.iter().map(|s| s.matches).sum();
            log::info!("{} queries solved, {matches} matches", stats.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("leash: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn usage(message: &str) -> ExitCode {
    eprintln!("leash: {message}");
    eprintln!("usage: leash <dataset> <queries> [--workers N] [--dir TRAJECTORY_DIR] [--out RESULT_DIR]");
    ExitCode::FAILURE
}
