//! Accuracy check against precomputed expectations.
//!
//! Usage:
//!   gauss-max-accuracy <epsilon> < cases.jsonl
//!
//! Reads one case per line (see `gauss_max::accuracy`), evaluates every
//! case at `epsilon`, prints per-size error statistics (average, mean + 3σ,
//! max for mu, sigma and odds) and exits non-zero if
//! `min(worst m3s, worst max)` exceeds `epsilon`.

use std::io::{self, BufReader};
use std::process::ExitCode;

use gauss_max::accuracy::{read_cases, AccuracyReport, ErrorSummary};
use gauss_max::{logging, MaxError};

fn print_divider() {
    print!("---");
    for _ in 0..3 {
        print!(" {} {} {}", "-".repeat(14), "-".repeat(14), "-".repeat(14));
    }
    println!(" {}", "-".repeat(12));
}

fn print_summary(s: &ErrorSummary) {
    print!(" {:.12} {:.12} {:.12}", s.average, s.mean_plus_3_sigma, s.max);
}

fn run(epsilon: f64) -> Result<bool, MaxError> {
    let cases = read_cases(BufReader::new(io::stdin().lock()))?;
    tracing::info!(cases = cases.len(), epsilon, "loaded accuracy cases");

    let mut report = AccuracyReport::new(epsilon);
    for case in &cases {
        report.record(case)?;
    }

    print!("  n");
    for label in ["Mu", "Sigma", "Odds"] {
        print!(
            " {:<14} {:<14} {:<14}",
            format!("{label} err avg"),
            format!("{label} err m3s"),
            format!("{label} err max")
        );
    }
    println!(" counts");
    print_divider();

    let (mut count_lists, mut count_odds) = (0, 0);
    for group in report.groups() {
        print!(" {:2}", group.n);
        for summary in [&group.mu, &group.sigma, &group.odds] {
            print_summary(summary);
        }
        println!(" {} {}", group.mu.count, group.odds.count);
        count_lists += group.mu.count;
        count_odds += group.odds.count;
    }
    print_divider();
    println!("total {count_lists} {count_odds}");

    let achieved = report.achieved().unwrap_or(f64::NAN);
    println!("Needed epsilon: {epsilon:.2e}");
    println!("Result epsilon: {achieved:.2e}");
    let ok = report.passed();
    println!("Test result: {}", if ok { "OK" } else { "FAILED" });
    Ok(ok)
}

fn main() -> ExitCode {
    logging::init_tracing();

    let epsilon = match std::env::args().nth(1).map(|s| s.parse::<f64>()) {
        Some(Ok(eps)) => eps,
        _ => {
            eprintln!("usage: gauss-max-accuracy <epsilon> < cases.jsonl");
            return ExitCode::from(2);
        }
    };

    match run(epsilon) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
