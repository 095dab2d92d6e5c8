use std::sync::Arc;

use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        criterion::Criterion, insertion::TailInsertionStrategy,
        solution::planned_trip::PlannedTrip,
    },
};

use super::{Crosser, CrosserState, compute_all_candidates};

/// Appends each pending trip at the end of each route and keeps the best
/// conjecture. Nothing is cached between proposals.
pub struct StatelessCrosser {
    state: CrosserState,
    criterion: Criterion,
}

impl StatelessCrosser {
    pub fn new(problem: Arc<VehicleRoutingProblem>, criterion: Criterion) -> Self {
        StatelessCrosser {
            state: CrosserState::new(problem),
            criterion,
        }
    }
}

impl Crosser for StatelessCrosser {
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
        let candidates = compute_all_candidates(&self.state, &TailInsertionStrategy);

        candidates
            .iter()
            .reduce(|best, candidate| self.criterion.best(best, candidate))
            .and_then(|best| best.most_recent_planned_trip())
    }
}
