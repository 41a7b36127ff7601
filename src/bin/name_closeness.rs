// src/bin/name_closeness.rs
//
// Scores representative name pairs the way the resolver does and reports
// whether each pair would be accepted. Useful when checking a threshold
// against spellings pulled from the VoteView and FEC exports.

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use fusion_lib::matching::similarity::{closeness_detail, normalize_representative, partial_ratio};
use fusion_lib::utils::constants::MATCH_ACCEPTANCE_THRESHOLD;
use fusion_lib::utils::env::load_env;

#[derive(Parser)]
#[command(author, version, about = "Score representative name pairs", long_about = None)]
struct Args {
    /// Names to compare, as alternating source/candidate values
    #[arg(required = true, num_args = 2..)]
    names: Vec<String>,

    /// Acceptance threshold (0-100)
    #[arg(long, default_value_t = MATCH_ACCEPTANCE_THRESHOLD)]
    threshold: f64,
}

fn main() -> Result<()> {
    load_env();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.names.len() % 2 != 0 {
        bail!("expected source/candidate pairs, got {} names", args.names.len());
    }
    if !(0.0..=100.0).contains(&args.threshold) {
        bail!("threshold must be within 0-100, got {}", args.threshold);
    }

    let mut accepted = 0;
    for pair in args.names.chunks(2) {
        let (source, candidate) = (&pair[0], &pair[1]);
        let a = normalize_representative(source);
        let b = normalize_representative(candidate);
        let detail = closeness_detail(source, Some(candidate));
        let verdict = if detail.score >= args.threshold {
            accepted += 1;
            "accepted"
        } else {
            "rejected"
        };

        println!("{:?} vs {:?}", source, candidate);
        println!("  normalized:    {:?} / {:?}", a, b);
        println!("  partial ratio: {:.2}", partial_ratio(&a, &b));
        println!("  score:         {:.3} ({:?})", detail.score, detail.method);
        println!("  verdict:       {} at {:.1}", verdict, args.threshold);
    }

    info!("{}/{} pairs accepted", accepted, args.names.len() / 2);
    Ok(())
}
