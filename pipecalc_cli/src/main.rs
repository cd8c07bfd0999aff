//! # Pipecalc CLI Application
//!
//! Terminal front end for the calculation catalog: browse modules, inspect
//! their input forms, run a calculation and run the module self-tests.
//!
//! ```text
//! pipecalc list
//! pipecalc describe wall_thickness_internal_pressure
//! pipecalc calc pipe_flow_resistance --set flowRate=100 --set diameter=0.1 --set length=100
//! pipecalc calc pipe_mass --input order.json --json
//! pipecalc test --parallel
//! ```
//!
//! Exit status is 0 on success, 1 when a calculation is rejected or a test
//! fails, and 2 on any other error.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pipecalc_core::harness::{ExecutionMode, HarnessConfig, TestHarness, TestReport};
use pipecalc_core::result::OutputValue;
use pipecalc_core::{
    CalcError, CalcResult, CalculationConfig, CalculationModule, Inputs, Manifest, Registry, ResultSet,
};

#[derive(Parser)]
#[command(name = "pipecalc")]
#[command(about = "Pipecalc CLI - Piping and process engineering calculations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available calculations by category
    List {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the input form and outputs of a calculation
    Describe {
        /// Calculation id (see `pipecalc list`)
        id: String,
    },
    /// Run a calculation
    Calc {
        /// Calculation id (see `pipecalc list`)
        id: String,
        /// JSON file with an object of input values
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Input value as key=value; overrides the input file
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Print the result set as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run module self-tests
    Test {
        /// Manifest JSON file; defaults to every registered calculation
        #[arg(short, long)]
        manifest: Option<PathBuf>,
        /// Run modules in parallel
        #[arg(long)]
        parallel: bool,
        /// Leave out each module's smoke test
        #[arg(long)]
        no_smoke: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let registry = Registry::global();

    let outcome = match cli.command {
        Commands::List { json } => cmd_list(&registry, json),
        Commands::Describe { id } => cmd_describe(&registry, &id),
        Commands::Calc {
            id,
            input,
            set,
            json,
        } => cmd_calc(&registry, &id, input.as_deref(), &set, json),
        Commands::Test {
            manifest,
            parallel,
            no_smoke,
            json,
        } => {
            let config = HarnessConfig {
                mode: if parallel {
                    ExecutionMode::Parallel
                } else {
                    ExecutionMode::Sequential
                },
                include_smoke: !no_smoke,
            };
            cmd_test(TestHarness::new(registry, config), manifest.as_deref(), json)
        }
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_list(registry: &Registry, json: bool) -> CalcResult<bool> {
    let catalog = registry.catalog()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(true);
    }
    for category in &catalog {
        println!("{}", category.title);
        for calc in &category.calculations {
            println!("  {:<36} {}", calc.id, calc.title);
        }
        println!();
    }
    Ok(true)
}

fn cmd_describe(registry: &Registry, id: &str) -> CalcResult<bool> {
    let module = registry.get(id)?;
    println!("{}", serde_json::to_string_pretty(module.config())?);
    Ok(true)
}

fn cmd_calc(
    registry: &Registry,
    id: &str,
    input: Option<&Path>,
    assignments: &[String],
    json: bool,
) -> CalcResult<bool> {
    let module = registry.get(id)?;
    let inputs = collect_inputs(input, assignments)?;
    debug!(calculation = id, fields = inputs.len(), "running calculation");

    let result = module.calculate(&inputs)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(module.config(), &result);
    }
    Ok(result.is_success())
}

fn cmd_test(harness: TestHarness, manifest: Option<&Path>, json: bool) -> CalcResult<bool> {
    let report = match manifest {
        Some(path) => harness.run_manifest(&Manifest::from_json(&read_file(path)?)?),
        None => harness.run_all(),
    };
    if json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }
    Ok(report.is_success())
}

// ============================================================================
// Helpers
// ============================================================================

fn read_file(path: &Path) -> CalcResult<String> {
    fs::read_to_string(path)
        .map_err(|e| CalcError::internal(format!("cannot read {}: {}", path.display(), e)))
}

/// Merge an optional JSON input file with `key=value` overrides.
fn collect_inputs(input: Option<&Path>, assignments: &[String]) -> CalcResult<Inputs> {
    let mut inputs = match input {
        Some(path) => serde_json::from_str::<Inputs>(&read_file(path)?)?,
        None => Inputs::new(),
    };
    for pair in assignments {
        let (key, value) = Inputs::parse_assignment(pair)
            .ok_or_else(|| CalcError::invalid_input("--set", pair.as_str(), "expected KEY=VALUE"))?;
        inputs.set(key, value);
    }
    Ok(inputs)
}

fn print_result(config: &CalculationConfig, result: &ResultSet) {
    println!("═══════════════════════════════════════");
    println!("  {}", config.name.to_uppercase());
    println!("═══════════════════════════════════════");
    println!();

    if let Some(error) = &result.error {
        println!("  REJECTED: {}", error);
        return;
    }

    for output in &config.outputs {
        let unit = result.unit(&output.id).unwrap_or("");
        let precision = usize::from(output.precision);
        match result.results.as_ref().and_then(|r| r.get(&output.id)) {
            Some(OutputValue::Scalar(v)) => {
                println!("  {:<24} {:>14.*} {}", output.label, precision, v, unit);
            }
            Some(OutputValue::Table(rows)) => {
                println!("  {}", output.label);
                println!("  {:>10}  {:>12}  {}", "D (mm)", format!("v ({})", unit), "band");
                for row in rows {
                    println!(
                        "  {:>10.0}  {:>12.*}  {}",
                        row.diameter, precision, row.velocity, row.band
                    );
                }
            }
            None => {}
        }
    }
}

fn print_report(report: &TestReport) {
    for entry in &report.entries {
        match (&entry.results, &entry.error) {
            (Some(results), _) => {
                let status = if entry.passed() { "PASS" } else { "FAIL" };
                println!("{}  {}", status, entry.calculation_id);
                for case in results {
                    println!("        [{}] {}", if case.pass { "✓" } else { "✗" }, case.name);
                }
            }
            (None, Some(error)) => println!("ERROR {}: {}", entry.calculation_id, error),
            (None, None) => println!("ERROR {}: no result", entry.calculation_id),
        }
    }
    println!();
    println!(
        "{} passed, {} failed ({} mode, run {})",
        report.passed, report.failed, report.mode, report.run_id
    );
}
