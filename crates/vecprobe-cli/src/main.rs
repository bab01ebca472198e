//! vecprobe CLI - SIMD vector library correctness runner
//!
//! # Usage
//!
//! ```bash
//! # Run one case; the exit code is the error count
//! vecprobe run 104 Vec4i --seed 7
//!
//! # Fixed index list for a permute case
//! vecprobe run 700 i32x4 --indexes 3,dc,1,0
//!
//! # Cases defined for a vector type
//! vecprobe list f16x8
//!
//! # Many runs from a JSON plan
//! vecprobe sweep plan.json --output report.json
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tabled::{Table, Tabled};
use tracing::{debug, info, warn};
use vecprobe_core::{
    describe, list, run_config, CaseInfo, CaseOptions, IndexList, RunConfig, RunSummary, SweepPlan,
    VectorType,
};
use vecprobe_simd::{compiled_instruction_set, instruction_set, CpuFeatures};

/// vecprobe - SIMD vector library correctness harness
#[derive(Parser)]
#[command(name = "vecprobe")]
#[command(about = "Check SIMD vector operations against scalar references")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one test case
    Run {
        /// Test case id
        case: u32,

        /// Vector type, e.g. i32x4 or Vec4i
        vector: VectorType,

        /// PRNG seed
        #[arg(short, long, default_value = "1", allow_hyphen_values = true)]
        seed: i64,

        /// Index or template parameter list, e.g. 3,dc,1,0
        #[arg(short, long, allow_hyphen_values = true)]
        indexes: Option<IndexList>,

        /// Error cap (defaults to the case's own cap)
        #[arg(long)]
        max_errors: Option<usize>,

        /// Enumerate every bit pattern of 8 and 16 bit lanes
        #[arg(long)]
        exhaustive: bool,
    },

    /// List the cases defined for a vector type
    List {
        /// Vector type, e.g. f32x8 or Vec8f
        vector: VectorType,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the detected instruction set level
    Instrset {
        /// Also print the individual CPU features
        #[arg(long)]
        features: bool,
    },

    /// Run a JSON plan of many runs
    Sweep {
        /// Plan file: {"runs": [{"case": 104, "vector": "Vec4i", "seed": 1}, ...]}
        plan: PathBuf,

        /// Write a JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of worker threads (0 uses every core)
        #[arg(short = 'j', long, default_value = "0")]
        jobs: usize,

        /// Only print the summary table
        #[arg(short, long)]
        quiet: bool,
    },
}

/// Summary table row of a sweep
#[derive(Debug, Clone, Tabled)]
struct SweepRow {
    #[tabled(rename = "Case")]
    case: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Vector")]
    vector: String,
    #[tabled(rename = "Seed")]
    seed: i64,
    #[tabled(rename = "Vectors")]
    vectors: usize,
    #[tabled(rename = "Errors")]
    errors: usize,
    #[tabled(rename = "Ignored")]
    ignored: usize,
    #[tabled(rename = "Max ULP")]
    max_ulps: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Catalog table row
#[derive(Debug, Clone, Tabled)]
struct CaseRow {
    #[tabled(rename = "Id")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Plan")]
    plan: String,
    #[tabled(rename = "Shape")]
    shape: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Flags")]
    flags: String,
    #[tabled(rename = "Cap")]
    max_errors: usize,
}

impl From<CaseInfo> for CaseRow {
    fn from(info: CaseInfo) -> Self {
        Self {
            id: info.id,
            name: info.name.to_string(),
            plan: info.plan,
            shape: format!("{:?}", info.shape).to_lowercase(),
            budget: info.budget,
            flags: info.flags,
            max_errors: info.max_errors,
        }
    }
}

/// One entry of the sweep report
#[derive(Debug, Serialize)]
struct SweepEntry {
    config: RunConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Full sweep report
#[derive(Debug, Serialize)]
struct SweepReport {
    instruction_set: u32,
    runs: Vec<SweepEntry>,
    failed: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics own stdout, so logs go to stderr.
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            case,
            vector,
            seed,
            indexes,
            max_errors,
            exhaustive,
        } => {
            let config = RunConfig {
                case,
                vector,
                seed,
                indexes: indexes.unwrap_or_default(),
                max_errors,
                exhaustive,
            };
            let mut stdout = io::stdout().lock();
            let summary = run_config(&config, &mut stdout)
                .with_context(|| format!("test case {case} on {vector}"))?;
            stdout.flush()?;
            drop(stdout);
            std::process::exit(summary.exit_code());
        }

        Commands::List { vector, json } => {
            let cases = list(vector)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cases)?);
            } else {
                println!(
                    "{} {} cases for {} ({})",
                    ">>>".green(),
                    cases.len(),
                    vector.to_string().cyan(),
                    vector.classic_name()
                );
                let rows: Vec<CaseRow> = cases.into_iter().map(CaseRow::from).collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Instrset { features } => {
            let detected = instruction_set();
            info!(detected = %detected, compiled = %compiled_instruction_set(), "instruction set");
            println!("{}", detected.level());
            if features {
                print_features(&CpuFeatures::detect());
            }
        }

        Commands::Sweep {
            plan,
            output,
            jobs,
            quiet,
        } => {
            let plan = SweepPlan::from_file(&plan)
                .with_context(|| format!("Failed to load sweep plan {}", plan.display()))?;
            let report = sweep(&plan, jobs, quiet)?;

            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&report)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write report {}", path.display()))?;
                println!("\nReport saved to {}", path.display());
            }

            if report.failed > 0 {
                std::process::exit(i32::try_from(report.failed.min(255)).unwrap_or(255));
            }
        }
    }

    Ok(())
}

/// Run every plan entry on the rayon pool, then print the diagnostics in
/// plan order followed by a summary table.
fn sweep(plan: &SweepPlan, jobs: usize, quiet: bool) -> Result<SweepReport> {
    // Reject configurations the catalog cannot build before any work starts.
    for (n, config) in plan.runs.iter().enumerate() {
        let options = CaseOptions::from(config);
        let defined = describe(config.vector, config.case, &options)
            .with_context(|| format!("run {n}: test case {} on {}", config.case, config.vector))?;
        if defined.is_none() {
            bail!("run {n}: test case {} is not defined for {}", config.case, config.vector);
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to start worker pool")?;

    let pb = ProgressBar::new(plan.runs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let results: Vec<(SweepEntry, Vec<u8>)> = pool.install(|| {
        plan.runs
            .par_iter()
            .map(|config| {
                let mut out = Vec::new();
                let entry = match run_config(config, &mut out) {
                    Ok(summary) => SweepEntry {
                        config: config.clone(),
                        summary: Some(summary),
                        error: None,
                    },
                    Err(e) => {
                        warn!(case = config.case, vector = %config.vector, error = %e, "run failed");
                        SweepEntry {
                            config: config.clone(),
                            summary: None,
                            error: Some(e.to_string()),
                        }
                    }
                };
                pb.inc(1);
                (entry, out)
            })
            .collect()
    });
    pb.finish_and_clear();

    let mut stdout = io::stdout().lock();
    let mut rows = Vec::with_capacity(results.len());
    let mut runs = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (entry, out) in results {
        let config = &entry.config;
        if !quiet {
            writeln!(stdout, "== {} {} seed {} ==", config.case, config.vector, config.seed)?;
            stdout.write_all(&out)?;
        }
        let row = match (&entry.summary, &entry.error) {
            (Some(summary), _) => {
                if !summary.passed() {
                    failed += 1;
                }
                sweep_row(config, summary)
            }
            (None, error) => {
                failed += 1;
                let error = error.as_deref().unwrap_or_default();
                if !quiet {
                    writeln!(stdout, "{} {error}", "error:".red())?;
                }
                SweepRow {
                    case: config.case,
                    name: "-".to_string(),
                    vector: config.vector.to_string(),
                    seed: config.seed,
                    vectors: 0,
                    errors: 0,
                    ignored: 0,
                    max_ulps: "-".to_string(),
                    status: "ERROR".red().to_string(),
                }
            }
        };
        rows.push(row);
        runs.push(entry);
    }

    writeln!(stdout, "\n{}", Table::new(rows))?;
    let passed = runs.len() - failed;
    if failed == 0 {
        writeln!(stdout, "{} {} runs passed", "OK".green().bold(), passed)?;
    } else {
        writeln!(
            stdout,
            "{} {} of {} runs failed",
            "FAIL".red().bold(),
            failed,
            runs.len()
        )?;
    }
    stdout.flush()?;
    debug!(runs = runs.len(), failed, "sweep finished");

    Ok(SweepReport {
        instruction_set: instruction_set().level(),
        runs,
        failed,
    })
}

fn sweep_row(config: &RunConfig, summary: &RunSummary) -> SweepRow {
    let status = if summary.passed() {
        "PASS".green().to_string()
    } else if summary.aborted {
        "ABORTED".red().to_string()
    } else {
        "FAIL".red().to_string()
    };
    SweepRow {
        case: summary.case,
        name: summary.name.clone(),
        vector: config.vector.to_string(),
        seed: summary.seed,
        vectors: summary.vectors,
        errors: summary.errors,
        ignored: summary.ignored,
        max_ulps: summary
            .max_ulps
            .map_or_else(|| "-".to_string(), |u| format!("{u:.2}")),
        status,
    }
}

fn print_features(features: &CpuFeatures) {
    let flags = [
        ("SSE", features.sse),
        ("SSE2", features.sse2),
        ("SSE3", features.sse3),
        ("SSSE3", features.ssse3),
        ("SSE4.1", features.sse41),
        ("SSE4.2", features.sse42),
        ("AVX", features.avx),
        ("AVX2", features.avx2),
        ("FMA", features.fma),
        ("BMI1", features.bmi1),
        ("BMI2", features.bmi2),
        ("F16C", features.f16c),
        ("AVX512F", features.avx512f),
        ("AVX512VL", features.avx512vl),
        ("AVX512BW", features.avx512bw),
        ("AVX512DQ", features.avx512dq),
        ("AVX512VBMI", features.avx512vbmi),
        ("AVX512VBMI2", features.avx512vbmi2),
    ];
    for (name, present) in flags {
        let mark = if present { "yes".green() } else { "no".red() };
        println!("  {name:<12} {mark}");
    }
}
