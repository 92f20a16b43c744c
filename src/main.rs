//! Synaptic Membrane Sim - Entry point
//!
//! CLI Usage:
//!   cargo run                              # Reference relaxation run (-63 mV -> -65 mV)
//!   cargo run -- --demo                    # Excitatory + inhibitory synaptic input
//!   cargo run -- --config run.json --csv   # Run a JSON config, export the trace
//!   cargo run -- --reversal                # Print Nernst/GHK potentials

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use synaptic_membrane_sim::{config::SimulationConfig, export, ReversalPotential, SimError};

struct CliOptions {
    config_path: Option<PathBuf>,
    demo: bool,
    export_csv: bool,
    export_json: bool,
    reversal_only: bool,
    output_dir: PathBuf,
}

/// Reversal potentials of every ion in the config, plus the resting GHK value
fn reversal_potentials(config: &SimulationConfig) -> Result<Vec<(String, f64)>> {
    let calculator = ReversalPotential::new(config.constants)?;
    let mut potentials = Vec::new();

    for ion in config.ions.ions() {
        let e = calculator.nernst_for_ion(&ion.name, &config.ions)?;
        potentials.push((format!("E_{}", ion.name), e));
    }

    // Resting permeability ratios K : Na : Cl = 1 : 0.05 : 0.45
    // Reference: Hodgkin & Katz 1949
    let resting: Vec<(&str, f64)> = [("K+", 1.0), ("Na+", 0.05), ("Cl-", 0.45)]
        .into_iter()
        .filter(|(name, _)| config.ions.get(name).is_ok())
        .collect();
    if !resting.is_empty() {
        match calculator.ghk_for_ions(&config.ions, &resting) {
            Ok(v) => potentials.push(("V_GHK".to_string(), v)),
            Err(e @ SimError::UnsupportedValence { .. }) => {
                log::warn!("Skipping resting GHK potential: {}", e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(potentials)
}

fn run(options: &CliOptions) -> Result<()> {
    let config = match (&options.config_path, options.demo) {
        (Some(path), _) => SimulationConfig::load(path)?,
        (None, true) => SimulationConfig::synaptic_demo(),
        (None, false) => SimulationConfig::default(),
    };

    let potentials = reversal_potentials(&config)?;
    println!("=== Reversal Potentials (T = {:.2} K) ===", config.constants.temperature_K);
    for (name, value) in &potentials {
        println!("  {:<8} {:>9.3} mV", name, value);
    }
    if options.reversal_only {
        return Ok(());
    }

    println!();
    println!(
        "Membrane: V_rest = {:.2} mV, tau_m = {:.2} ms, {} synapses, {} injections",
        config.membrane.resting_potential_mV,
        config.membrane.time_constant_ms(),
        config.synapses.len(),
        config.injections.len()
    );
    println!(
        "Grid: {} steps of {} ms, V(0) = {:.2} mV\n",
        config.time_grid.iteration_count(),
        config.time_grid.dt_ms(),
        config.initial_voltage_mV
    );

    let mut integrator = config.build()?;
    let start = Instant::now();
    let result = integrator.run_to_completion().cloned();
    let elapsed = start.elapsed();

    let trace = match result {
        Ok(trace) => trace,
        Err(e) => {
            eprintln!(
                "Run failed at step {} (t = {:.2} ms, V = {:.3} mV): {}",
                integrator.step_index(),
                integrator.time_ms(),
                integrator.voltage(),
                e
            );
            return Err(e.into());
        }
    };

    println!("Integrated in {:.2} ms\n", elapsed.as_secs_f64() * 1000.0);

    let summary = match trace.summary() {
        Some(summary) => summary,
        None => {
            println!("Empty trace (zero steps), nothing to report");
            return Ok(());
        }
    };
    summary.print_summary();

    if options.export_csv {
        let mut exporter = export::CsvTraceExporter::new(&options.output_dir)?;
        exporter.write_trace(&trace)?;
        let path = exporter.finish()?;
        println!("\nTrace written to {}", path.display());
    }

    if options.export_json {
        let path = export::export_summary_json(&summary, potentials, &options.output_dir)?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}

fn parse_args() -> CliOptions {
    let args: Vec<String> = std::env::args().collect();
    let mut options = CliOptions {
        config_path: None,
        demo: false,
        export_csv: false,
        export_json: false,
        reversal_only: false,
        output_dir: PathBuf::from("exports"),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i < args.len() {
                    options.config_path = Some(PathBuf::from(&args[i]));
                }
            }
            "--out" | "-o" => {
                i += 1;
                if i < args.len() {
                    options.output_dir = PathBuf::from(&args[i]);
                }
            }
            "--demo" | "-d" => options.demo = true,
            "--csv" => options.export_csv = true,
            "--json" => options.export_json = true,
            "--reversal" | "-r" => options.reversal_only = true,
            "--help" | "-h" => {
                println!("Synaptic Membrane Sim");
                println!();
                println!("Usage: synaptic-membrane-sim [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --config, -c PATH  Load a JSON simulation config");
                println!("  --demo, -d         Run the built-in synaptic input demo");
                println!("  --csv              Export the voltage trace as CSV");
                println!("  --json             Export the run summary as JSON");
                println!("  --out, -o DIR      Export directory (default: exports)");
                println!("  --reversal, -r     Only print reversal potentials");
                println!("  --help, -h         Show this help");
                std::process::exit(0);
            }
            other => {
                log::warn!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    options
}

fn main() -> Result<()> {
    env_logger::init();

    let options = parse_args();
    run(&options)
}
