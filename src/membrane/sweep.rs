//! Parallel parameter sweeps.
//!
//! Runs are independent: each gets its own integrator, state and grid, so
//! they can be spread over the rayon pool without any locking.

use rayon::prelude::*;

use super::VoltageTrace;
use crate::config::SimulationConfig;
use crate::error::SimResult;

/// Build and run every config in parallel; results keep input order
pub fn run_parallel(configs: &[SimulationConfig]) -> Vec<SimResult<VoltageTrace>> {
    log::info!("Starting sweep of {} simulations", configs.len());

    let results: Vec<SimResult<VoltageTrace>> = configs
        .par_iter()
        .map(|config| {
            let mut integrator = config.build()?;
            integrator.run_to_completion()?;
            Ok(integrator.into_trace())
        })
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        log::warn!("Sweep finished with {} failed runs", failed);
    } else {
        log::info!("Sweep finished");
    }
    results
}
