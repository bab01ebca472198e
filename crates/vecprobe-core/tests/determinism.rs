//! Determinism Tests
//!
//! A seed must replay the same corpus, the same trials and therefore the
//! same diagnostics byte for byte, on any thread.

use vecprobe_core::case::{binary, Case};
use vecprobe_core::corpus::{self, CorpusProfile};
use vecprobe_core::driver::run_case;
use vecprobe_core::oracle::arith;
use vecprobe_core::{run_config, Mwc, RunConfig, RunSummary};

fn run(config: &RunConfig) -> (RunSummary, Vec<u8>) {
    let mut out = Vec::new();
    let summary = run_config(config, &mut out).unwrap();
    (summary, out)
}

fn config(case: u32, vector: &str, seed: i64, indexes: &str) -> RunConfig {
    RunConfig {
        case,
        vector: vector.parse().unwrap(),
        seed,
        indexes: indexes.parse().unwrap(),
        ..RunConfig::default()
    }
}

#[test]
fn test_same_seed_same_bytes() {
    let configs = [
        config(700, "i32x4", 42, "0,1,2,5"),
        config(702, "u16x8", 7, ""),
        config(550, "f32x4", -3, ""),
        config(1, "f64x2", 1, ""),
    ];
    for config in &configs {
        let (first, first_out) = run(config);
        let (second, second_out) = run(config);
        assert_eq!(first, second, "case {}", config.case);
        assert_eq!(first_out, second_out, "case {}", config.case);
        assert_eq!(first.exit_code(), second.exit_code());
    }
}

#[test]
fn test_runs_are_independent_of_threads() {
    let config = config(700, "i32x4", 9, "5,0,1,2");
    let (summary, out) = run(&config);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let config = config.clone();
            std::thread::spawn(move || run(&config))
        })
        .collect();
    for handle in handles {
        let (other, other_out) = handle.join().unwrap();
        assert_eq!(other, summary);
        assert_eq!(other_out, out);
    }
}

/// Float addition checked against the product, so most lanes diverge.
fn wrong_reference() -> Case<f32> {
    binary::<f32, f32, 4>(1, "add", |a, b| a + b, arith::mul)
}

fn run_wrong(seed: i64) -> (RunSummary, Vec<u8>) {
    let config = RunConfig {
        max_errors: Some(40),
        ..config(1, "f32x4", seed, "")
    };
    let mut out = Vec::new();
    let summary = run_case(&wrong_reference(), &config, &mut out).unwrap();
    (summary, out)
}

#[test]
fn test_divergence_reports_replay_byte_for_byte() {
    let (summary, out) = run_wrong(11);
    assert!(summary.aborted);
    let text = String::from_utf8(out.clone()).unwrap();
    assert!(text.starts_with("test case 1 (add):\nError at 0, 0:\n"));
    assert!(text.matches("Error at").count() > 1);
    assert!(text.ends_with(&format!("too many errors, stopped after {}\n", summary.errors)));

    assert_eq!(run_wrong(11), (summary.clone(), out.clone()));
    let handles: Vec<_> = (0..4).map(|_| std::thread::spawn(|| run_wrong(11))).collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), (summary.clone(), out.clone()));
    }
}

#[test]
fn test_corpus_depends_only_on_seed() {
    let profile = CorpusProfile::default();
    let a: Vec<f32> = corpus::build(&profile, &mut Mwc::new(5));
    let b: Vec<f32> = corpus::build(&profile, &mut Mwc::new(5));
    let c: Vec<f32> = corpus::build(&profile, &mut Mwc::new(6));
    let bits = |v: &[f32]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&a), bits(&b));
    assert_ne!(bits(&a), bits(&c));
}
