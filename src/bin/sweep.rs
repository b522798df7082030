//! Epsilon sweep driver.
//!
//! Usage:
//!   gauss-max-sweep                      # the three built-in scenarios
//!   gauss-max-sweep 1.0:1.0 0.75:0.25    # one list of mu:sigma pairs
//!   gauss-max-sweep --json ...           # one JSON object per row
//!
//! Each list is evaluated at epsilon = 10^0 ... 10^-10 and compared with a
//! reference at 1e-12. Lists of one or two Gaussians are exact and print a
//! single row.

use std::process::ExitCode;

use gauss_max::accuracy::{self, SweepRow};
use gauss_max::{logging, Gaussian, MaxError};

const SCENARIOS: &[&[(f64, f64)]] = &[
    &[(0.123, 0.456)],
    &[(1.0, 1.0), (0.75, 0.25)],
    &[
        (0.6412027167691333, 0.03163264836021567),
        (0.6281166488299745, 0.013541425967055945),
        (0.6072673296242264, 0.03225156507575445),
    ],
];

fn parse_pair(token: &str) -> Result<(f64, f64), String> {
    let (mu, sigma) = token
        .split_once(':')
        .ok_or_else(|| format!("expected mu:sigma, got {token:?}"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad number {s:?} in {token:?}: {e}"))
    };
    Ok((parse(mu)?, parse(sigma)?))
}

fn print_row(gaussians: &[Gaussian], row: &SweepRow) {
    let odds = row.result.odds();
    for (i, g) in gaussians.iter().enumerate() {
        println!(
            "pdfList[{i}] = {{ {:.17}, {:.17} }}, odds[{i}] = {:.17} +/- {:.17}",
            g.mean(),
            g.std_dev(),
            odds[i],
            row.odds_errors[i]
        );
    }
    println!("epsilon     = {:.17}", row.epsilon);
    println!("mu          = {:.17} +/- {:.17}", row.result.mean(), row.mean_error);
    println!("sigma       = {:.17} +/- {:.17}", row.result.std_dev(), row.std_dev_error);
    println!("sumOdds     = {:.17}", row.result.odds_total());
    println!("segments    = {}", row.result.segments());
    println!();
}

fn run(lists: &[Vec<Gaussian>], json: bool) -> Result<(), MaxError> {
    for gaussians in lists {
        for row in accuracy::sweep(gaussians, accuracy::DEFAULT_EXPONENTS)? {
            if json {
                match serde_json::to_string(&row) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::error!(error = %e, "failed to encode row"),
                }
            } else {
                print_row(gaussians, &row);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    logging::init_tracing();

    let mut json = false;
    let mut pairs = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
            continue;
        }
        match parse_pair(&arg) {
            Ok(pair) => pairs.push(pair),
            Err(msg) => {
                eprintln!("{msg}");
                return ExitCode::from(2);
            }
        }
    }

    let raw: Vec<&[(f64, f64)]> = if pairs.is_empty() {
        SCENARIOS.to_vec()
    } else {
        vec![&pairs[..]]
    };
    let lists: Result<Vec<Vec<Gaussian>>, MaxError> =
        raw.iter().map(|p| Gaussian::from_pairs(p)).collect();

    match lists.and_then(|lists| run(&lists, json)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
