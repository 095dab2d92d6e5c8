use std::sync::Arc;

use rand::{SeedableRng, rngs::SmallRng, seq::IndexedRandom};

use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{insertion::InsertionStrategyKind, solution::planned_trip::PlannedTrip},
};

use super::{Crosser, CrosserState, compute_all_candidates};

/// Picks uniformly among every feasible candidate.
pub struct RandomizedCrosser {
    state: CrosserState,
    strategy: InsertionStrategyKind,
    rng: SmallRng,
}

impl RandomizedCrosser {
    pub fn new(
        problem: Arc<VehicleRoutingProblem>,
        strategy: InsertionStrategyKind,
        seed: u64,
    ) -> Self {
        RandomizedCrosser {
            state: CrosserState::new(problem),
            strategy,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Crosser for RandomizedCrosser {
    fn state(&self) -> &CrosserState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut CrosserState {
        &mut self.state
    }

    fn into_state(self) -> CrosserState {
        self.state
    }

    fn get_planned_trip(&mut self) -> Option<PlannedTrip> {
        let candidates = compute_all_candidates(&self.state, &self.strategy);

        candidates
            .choose(&mut self.rng)
            .and_then(|candidate| candidate.most_recent_planned_trip())
    }
}
