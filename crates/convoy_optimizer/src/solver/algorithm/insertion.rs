use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        criterion::Criterion,
        crosser::{Crosser, ranking::RankingInsertionIterator},
        solution::planning::Planning,
        solver_error::SolverError,
        solver_params::{InsertionParams, RankingParams},
        statistics::RankingStatistics,
    },
};

use super::{Algorithm, AlgorithmStatus};

/// One randomized greedy construction with the ranking insertion iterator.
pub struct InsertionAlgorithm {
    problem: Arc<VehicleRoutingProblem>,
    params: InsertionParams,
    ranking: RankingParams,
    status: AlgorithmStatus,
    statistics: Option<RankingStatistics>,
}

impl InsertionAlgorithm {
    pub fn new(
        problem: Arc<VehicleRoutingProblem>,
        params: InsertionParams,
        ranking: RankingParams,
    ) -> Self {
        InsertionAlgorithm {
            problem,
            params,
            ranking,
            status: AlgorithmStatus::Pending,
            statistics: None,
        }
    }

    /// Counters of the last construction.
    pub fn statistics(&self) -> Option<&RankingStatistics> {
        self.statistics.as_ref()
    }
}

impl Algorithm for InsertionAlgorithm {
    fn name(&self) -> &'static str {
        "insertion"
    }

    fn problem(&self) -> &VehicleRoutingProblem {
        &self.problem
    }

    fn criterion(&self) -> Criterion {
        self.params.criterion(&self.problem)
    }

    fn status(&self) -> AlgorithmStatus {
        self.status
    }

    fn set_status(&mut self, status: AlgorithmStatus) {
        self.status = status;
    }

    #[instrument(skip_all, level = "debug", fields(seed = self.ranking.seed))]
    fn optimize(&mut self) -> Result<Planning, SolverError> {
        let mut iterator = RankingInsertionIterator::new(
            Arc::clone(&self.problem),
            self.params.strategy,
            self.criterion(),
            self.ranking,
        )?;

        let outcome = iterator.complete();
        self.statistics = Some(iterator.statistics().clone());
        outcome?;

        debug!(statistics = ?self.statistics, "insertion finished");

        Ok(iterator.into_planning())
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use crate::{
        problem::{trip::TripIdx, vehicle::VehicleIdx},
        solver::criterion::Criterion,
        test_utils::{self, TestTrip},
    };

    use super::*;

    #[test]
    fn test_two_trips_on_one_vehicle() {
        let problem = Arc::new(test_utils::create_line_problem(
            20,
            vec![test_utils::create_vehicle(0, 1.0)],
            vec![
                TestTrip::new(2, 4)
                    .with_origin(test_utils::create_service(2, test_utils::window(Some(0), Some(10)))),
                TestTrip::new(6, 9)
                    .with_origin(test_utils::create_service(6, test_utils::window(Some(20), Some(30)))),
            ],
        ));
        let mut algorithm =
            InsertionAlgorithm::new(problem, InsertionParams::default(), RankingParams::default());

        let result = algorithm.run().unwrap();

        assert_eq!(result.planning.loaded_routes().count(), 1);
        assert_eq!(result.planning.trips().len(), 2);
        let route = result.planning.route(VehicleIdx::new(0));
        assert_eq!(route.planned_trips().len(), 2);
        assert_eq!(
            route.trip_ids().collect::<Vec<_>>(),
            vec![TripIdx::new(0), TripIdx::new(1)]
        );
        assert_eq!(algorithm.statistics().map(|s| s.commits), Some(2));
    }

    #[test]
    fn test_trip_outside_vehicle_availability() {
        // Must be back at the depot by 100
        let vehicle = test_utils::create_vehicle_available_until(0, 1.0, 100);

        let problem = Arc::new(test_utils::create_line_problem(
            10,
            vec![vehicle],
            vec![TestTrip::new(3, 5)
                .with_origin(test_utils::create_service(3, test_utils::window(Some(200), Some(300))))],
        ));
        let mut algorithm =
            InsertionAlgorithm::new(problem, InsertionParams::default(), RankingParams::default());

        assert_eq!(
            algorithm.run().unwrap_err(),
            SolverError::NonFeasibleAssignment { pending_trips: 1 }
        );
        assert_eq!(algorithm.statistics().map(|s| s.commits), Some(0));
    }

    #[test]
    fn test_vehicle_timeout_splits_trips() {
        let problem = Arc::new(test_utils::create_line_problem(
            20,
            vec![
                test_utils::create_vehicle_with_timeout(0, 2.0, SignedDuration::from_secs(10)),
                test_utils::create_vehicle_with_timeout(0, 2.0, SignedDuration::from_secs(10)),
            ],
            vec![TestTrip::new(1, 8), TestTrip::new(3, 1)],
        ));
        let mut algorithm = InsertionAlgorithm::new(
            problem.clone(),
            InsertionParams {
                criterion: Some(Criterion::ShortestDistance),
                ..InsertionParams::default()
            },
            RankingParams::default(),
        );

        let planning = algorithm.optimize().unwrap();

        assert!(planning.is_complete(&problem));
        assert_eq!(planning.loaded_routes().count(), 2);
    }
}
