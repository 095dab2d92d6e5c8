use std::sync::Arc;

use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        criterion::Criterion, insertion::InsertionStrategyKind,
        solution::planned_trip::PlannedTrip,
    },
};

use super::{Crosser, CrosserState, compute_all_candidates};

/// Greedy crosser: always proposes the best candidate over every route,
/// pending trip and position.
pub struct BestStatelessCrosser {
    state: CrosserState,
    strategy: InsertionStrategyKind,
    criterion: Criterion,
}

impl BestStatelessCrosser {
    pub fn new(
        problem: Arc<VehicleRoutingProblem>,
        strategy: InsertionStrategyKind,
        criterion: Criterion,
    ) -> Self {
        BestStatelessCrosser {
            state: CrosserState::new(problem),
            strategy,
            criterion,
        }
    }
}

impl Crosser for BestStatelessCrosser {
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
            .iter()
            .reduce(|best, candidate| self.criterion.best(best, candidate))
            .and_then(|best| best.most_recent_planned_trip())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{trip::TripIdx, vehicle::VehicleIdx},
        test_utils::{self, TestTrip},
    };

    use super::*;

    #[test]
    fn test_inserts_inside_route() {
        let problem = Arc::new(test_utils::create_line_problem(
            10,
            vec![test_utils::create_vehicle(0, 2.0)],
            vec![TestTrip::new(1, 8), TestTrip::new(3, 5)],
        ));
        let mut crosser = BestStatelessCrosser::new(
            problem,
            InsertionStrategyKind::Intensive,
            Criterion::ShortestDistance,
        );

        crosser.complete().unwrap();

        // The short trip rides along inside the long one
        let route = &crosser.routes()[0];
        assert_eq!(route.distance(), 8.0);
        assert_eq!(
            route.trip_ids().collect::<Vec<_>>(),
            vec![TripIdx::new(0), TripIdx::new(1)]
        );
        assert_eq!(route.vehicle_id(), VehicleIdx::new(0));
    }

    #[test]
    fn test_deterministic() {
        let problem = test_utils::create_random_problem(5, 5, 3, 10, 4);

        let run = || {
            let mut crosser = BestStatelessCrosser::new(
                problem.clone(),
                InsertionStrategyKind::Intensive,
                Criterion::ShortestTime,
            );
            crosser.complete().unwrap();
            crosser.into_planning()
        };

        assert!(run().is_identical(&run()));
    }
}
