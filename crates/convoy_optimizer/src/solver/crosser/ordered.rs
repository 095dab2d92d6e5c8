use std::sync::Arc;

use crate::{
    problem::{trip::TripIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        insertion::{InsertionStrategy, InsertionStrategyKind},
        solution::planned_trip::PlannedTrip,
    },
};

use super::{Crosser, CrosserState};

/// Serves pending trips by earliest pickup time and takes the first feasible
/// candidate, vehicles in order.
pub struct OrderedCrosser {
    state: CrosserState,
    strategy: InsertionStrategyKind,
}

impl OrderedCrosser {
    pub fn new(problem: Arc<VehicleRoutingProblem>, strategy: InsertionStrategyKind) -> Self {
        OrderedCrosser {
            state: CrosserState::new(problem),
            strategy,
        }
    }

    fn ordered_pending_trips(&self) -> Vec<TripIdx> {
        let problem = self.state.problem();
        let mut pending_trips = self.state.pending_trips();
        pending_trips.sort_by_key(|&trip_id| {
            (
                problem.trip(trip_id).origin().time_window().start(),
                trip_id,
            )
        });
        pending_trips
    }
}

impl Crosser for OrderedCrosser {
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
        let problem = self.state.problem();

        for trip_id in self.ordered_pending_trips() {
            for route in self.state.routes() {
                if let Some(candidate) = self
                    .strategy
                    .compute_one(problem, route, trip_id)
                    .into_iter()
                    .next()
                {
                    return candidate.most_recent_planned_trip();
                }
            }
        }

        None
    }
}
