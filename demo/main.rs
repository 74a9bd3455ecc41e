use std::process::ExitCode;

use clap::Parser;
use log::error;

use binarytrees::bench::{self, BenchConfig, Strategy};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Depth of the long-lived tree; the stretch tree is one deeper.
    #[arg(default_value_t = bench::DEFAULT_MAX_DEPTH,
          value_parser = clap::value_parser!(u32).range(0..=bench::MAX_DEPTH as i64))]
    max_depth: u32,

    /// Run a single strategy instead of all of them.
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Workers per round for the parallel strategy.
    #[arg(long, default_value_t = bench::DEFAULT_TASKS)]
    tasks: usize,

    /// Print reports as JSON.
    #[arg(long)]
    json: bool,

    /// Show a progress bar over depth rounds.
    #[arg(long)]
    progress: bool,
}

fn main() -> ExitCode {
    color_backtrace::install();
    pretty_env_logger::init();

    let args = Args::parse();
    let config = BenchConfig::new()
        .max_depth(args.max_depth)
        .tasks(args.tasks)
        .progress(args.progress);

    let strategies = match args.strategy {
        Some(strategy) => vec![strategy],
        None => Strategy::ALL.to_vec(),
    };

    let mut status = ExitCode::SUCCESS;
    for strategy in strategies {
        let report = match bench::run(strategy, &config) {
            Ok(report) => report,
            Err(err) => {
                error!("{strategy}: {err}");
                return ExitCode::FAILURE;
            }
        };

        for line in report.mismatches() {
            error!("{strategy}: expected check {} for `{line}`", line.expected());
            status = ExitCode::FAILURE;
        }

        if args.json {
            match serde_json::to_string(&report) {
                Ok(json) => println!("{json}"),
                Err(err) => {
                    error!("{strategy}: {err}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("\n{strategy}");
            println!("--------------------------");
            print!("{report}");
            println!("Time = {:?}", report.elapsed);
        }
    }
    status
}
