use lending_math::{signed_ray_mul, RAY};
use soroban_sdk::{Env, Vec};

use crate::errors::Error;
use crate::storage::Phase;

pub const PHASES_LENGTH: u32 = 4;

/// Phases must tile `[0, RAY]` in order with no gaps or overlaps.
pub fn validate_phases(phases: &Vec<Phase>) -> Result<(), Error> {
    if phases.len() != PHASES_LENGTH {
        return Err(Error::InvalidPhasesLength);
    }
    let mut expected_start = 0u128;
    for phase in phases.iter() {
        if phase.start != expected_start || phase.end <= phase.start {
            return Err(Error::PercentageNotMatch);
        }
        expected_start = phase.end;
    }
    if expected_start != RAY {
        return Err(Error::PercentageNotMatch);
    }
    Ok(())
}

/// Borrow-side share of emissions at `utilization`, clamped to
/// `[0, RAY]`. The last phase includes its upper bound.
pub fn evaluate(env: &Env, phases: &Vec<Phase>, utilization: u128) -> Result<u128, Error> {
    let last = phases.len().saturating_sub(1);
    for (i, phase) in phases.iter().enumerate() {
        let inside = utilization >= phase.start
            && (utilization < phase.end || (i as u32 == last && utilization <= phase.end));
        if inside {
            let value = signed_ray_mul(env, phase.k, utilization)?
                .checked_add(phase.b)
                .ok_or(Error::Overflow)?;
            return Ok(if value <= 0 {
                0
            } else {
                (value as u128).min(RAY)
            });
        }
    }
    Ok(0)
}
