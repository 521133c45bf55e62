use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cxcheck::{
    Circuit, KronOracle, Render, StateVectorOracle, TextDiagram, Tolerance, UnitaryOracle,
    UnitaryTerms, VerifyReport, compare_results, permutation_unitary,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

/// Verify row-permutation CNOT unitaries against a reference simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of qubits
    #[arg(short = 'n', long, default_value_t = 5)]
    qubits: usize,

    /// Reference oracle
    #[arg(long, value_enum, default_value_t = Oracle::Statevector)]
    oracle: Oracle,

    /// Relative tolerance for the element-wise comparison
    #[arg(long, default_value_t = 1e-5)]
    rtol: f64,

    /// Absolute tolerance for the element-wise comparison
    #[arg(long, default_value_t = 1e-8)]
    atol: f64,

    /// Verify every qubit count from 1 up to --qubits
    #[arg(long)]
    sweep: bool,

    /// Also verify a circuit of this many randomly placed CNOTs
    #[arg(long)]
    random_gates: Option<usize>,

    /// Seed for --random-gates
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Skip the circuit diagram
    #[arg(long)]
    no_diagram: bool,

    /// Print where each basis state is sent by the permutation unitary
    #[arg(long)]
    print_unitary: bool,

    /// Tracing directives (falls back to RUST_LOG, then "warn")
    #[arg(long)]
    log: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Oracle {
    Kron,
    Statevector,
}

impl Oracle {
    fn get(self) -> &'static dyn UnitaryOracle {
        match self {
            Oracle::Kron => &KronOracle,
            Oracle::Statevector => &StateVectorOracle,
        }
    }
}

fn init_tracing(directives: Option<&str>) -> Result<()> {
    let filter = match directives {
        Some(d) => EnvFilter::try_new(d).with_context(|| format!("invalid --log directive {d:?}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install tracing subscriber")
}

fn show(circuit: &Circuit, args: &Args) -> Result<()> {
    let mut out = io::stdout().lock();
    if !args.no_diagram {
        writeln!(out, "Quantum Circuit:")?;
        TextDiagram::default().render(circuit, &mut out)?;
        writeln!(out)?;
    }
    if args.print_unitary {
        let u = permutation_unitary(circuit)?;
        write!(out, "{}", UnitaryTerms { u: &u, n: circuit.n() })?;
        writeln!(out)?;
    }
    Ok(())
}

fn run(args: &Args, oracle: &dyn UnitaryOracle) -> Result<Vec<VerifyReport>> {
    let tol = Tolerance::new(args.rtol, args.atol)?;

    let circuit = Circuit::fully_connected(args.qubits)
        .with_context(|| format!("cannot build a {}-qubit circuit", args.qubits))?;
    show(&circuit, args)?;

    let mut reports: Vec<VerifyReport> = Vec::new();
    if args.sweep {
        for n in 1..args.qubits {
            reports.push(compare_results(&Circuit::fully_connected(n)?, oracle, tol)?);
        }
    }
    reports.push(compare_results(&circuit, oracle, tol)?);

    if let Some(len) = args.random_gates {
        let mut rng = StdRng::seed_from_u64(args.seed);
        let random = Circuit::random(args.qubits, len, &mut rng)?;
        println!("Random circuit (seed {}):", args.seed);
        for gate in &random {
            println!("  {gate}");
        }
        println!();
        reports.push(compare_results(&random, oracle, tol)?);
    }

    for report in &reports {
        println!("{report}");
    }
    Ok(reports)
}

/// 0 when every report passed, 1 otherwise.
fn exit_status(reports: &[VerifyReport]) -> u8 {
    let all_passed = reports.iter().all(VerifyReport::passed);
    println!(
        "\nResult: {}",
        if all_passed {
            "permutation unitary matches the reference"
        } else {
            "permutation unitary does NOT match the reference"
        }
    );
    if all_passed { 0 } else { 1 }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;

    let reports = run(&args, args.oracle.get())?;
    Ok(ExitCode::from(exit_status(&reports)))
}
