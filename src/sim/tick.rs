//! Fixed timestep simulation tick
//!
//! Collect input, update kinematics, check the candidate pose, then commit or
//! terminate. The committed position is never touched before the candidate
//! has been checked.

use super::collision::{self, Collision, Verdict};
use super::state::{SimPhase, SimulationState};
use super::vehicle::ControlInput;

/// Advance the simulation by one tick
pub fn step(state: &mut SimulationState, input: ControlInput) -> Verdict {
    if let SimPhase::Terminated(collision) = state.phase {
        return Verdict::Collided(collision);
    }

    state.tick += 1;
    let candidate = state.vehicle.update(input);

    let verdict = if !state.vehicle.in_bounds(candidate) {
        Verdict::Collided(Collision::OutOfBounds)
    } else {
        collision::check(
            candidate,
            state.vehicle.heading,
            &state.footprint,
            &state.track,
        )
    };

    match verdict {
        Verdict::Clear => state.vehicle.commit(candidate),
        Verdict::Collided(collision) => {
            log::info!(
                "Collision detected at tick {}: {:?} (candidate {}, heading {:.1})",
                state.tick,
                collision,
                candidate,
                state.vehicle.heading
            );
            state.phase = SimPhase::Terminated(collision);
        }
    }
    verdict
}
