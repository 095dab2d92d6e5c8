use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    problem::{trip::TripIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        criterion::Criterion,
        insertion::InsertionStrategy,
        score::Score,
        solution::{planning::Planning, route::Route},
        solver_error::SolverError,
        solver_params::{InsertionParams, LocalSearchParams},
    },
};

use super::{Algorithm, AlgorithmStatus};

/// Moving one trip from `source` to `target`; both indices may be equal.
struct Relocation {
    source: usize,
    reduced: Route,
    target: usize,
    candidate: Route,
    score: Score,
}

/// Improves a planning by relocating trips: each trip is removed and
/// re-inserted at its best position over all routes, as long as the
/// planning score strictly decreases.
pub struct LocalSearchAlgorithm {
    problem: Arc<VehicleRoutingProblem>,
    initial: Planning,
    params: InsertionParams,
    local_search: LocalSearchParams,
    status: AlgorithmStatus,
    applied_moves: usize,
}

impl LocalSearchAlgorithm {
    pub fn new(
        problem: Arc<VehicleRoutingProblem>,
        initial: Planning,
        params: InsertionParams,
        local_search: LocalSearchParams,
    ) -> Self {
        LocalSearchAlgorithm {
            problem,
            initial,
            params,
            local_search,
            status: AlgorithmStatus::Pending,
            applied_moves: 0,
        }
    }

    pub fn applied_moves(&self) -> usize {
        self.applied_moves
    }

    fn find_best_relocation(
        &self,
        criterion: Criterion,
        routes: &[Route],
        trip_id: TripIdx,
    ) -> Option<Relocation> {
        let source = routes.iter().position(|route| route.contains_trip(trip_id))?;
        let reduced = routes[source].try_remove_trip(&self.problem, trip_id)?;

        let mut best: Option<(usize, Route, Score)> = None;
        for (target, route) in routes.iter().enumerate() {
            let base = if target == source { &reduced } else { route };

            for candidate in self.params.strategy.compute_one(&self.problem, base, trip_id) {
                let score =
                    relocation_score(criterion, routes, source, &reduced, target, &candidate);
                if best.as_ref().is_none_or(|(_, _, best_score)| score < *best_score) {
                    best = Some((target, candidate, score));
                }
            }
        }

        let (target, candidate, score) = best?;
        if !score.improves_on(&criterion.routes_score(routes)) {
            return None;
        }

        Some(Relocation {
            source,
            reduced,
            target,
            candidate,
            score,
        })
    }
}

fn relocation_score(
    criterion: Criterion,
    routes: &[Route],
    source: usize,
    reduced: &Route,
    target: usize,
    candidate: &Route,
) -> Score {
    criterion.routes_score(routes.iter().enumerate().map(|(index, route)| {
        if index == target {
            candidate
        } else if index == source {
            reduced
        } else {
            route
        }
    }))
}

impl Algorithm for LocalSearchAlgorithm {
    fn name(&self) -> &'static str {
        "local_search"
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

    #[instrument(skip_all, level = "debug")]
    fn optimize(&mut self) -> Result<Planning, SolverError> {
        let criterion = self.criterion();
        let mut routes = self.initial.routes().to_vec();

        for pass in 0..self.local_search.max_passes {
            let mut improved = false;
            let trips: Vec<TripIdx> = routes.iter().flat_map(Route::trip_ids).collect();

            for trip_id in trips {
                let Some(relocation) = self.find_best_relocation(criterion, &routes, trip_id)
                else {
                    continue;
                };

                debug!(
                    pass,
                    trip = %trip_id,
                    from = relocation.source,
                    to = relocation.target,
                    score = %relocation.score,
                    "relocated trip"
                );

                routes[relocation.source] = relocation.reduced;
                routes[relocation.target] = relocation.candidate;
                self.applied_moves += 1;
                improved = true;
            }

            if !improved {
                debug!(pass, "no improving relocation");
                break;
            }
        }

        Ok(Planning::new(routes))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::vehicle::VehicleIdx,
        solver::{crosser::{Crosser, ordered::OrderedCrosser}, insertion::InsertionStrategyKind},
        test_utils::{self, TestTrip},
    };

    use super::*;

    fn distance_params() -> InsertionParams {
        InsertionParams {
            strategy: InsertionStrategyKind::Intensive,
            criterion: Some(Criterion::ShortestDistance),
        }
    }

    #[test]
    fn test_relocates_trip_to_closer_vehicle() {
        let problem = Arc::new(test_utils::create_line_problem(
            10,
            vec![
                test_utils::create_vehicle(0, 2.0),
                test_utils::create_vehicle(9, 2.0),
            ],
            vec![TestTrip::new(1, 2), TestTrip::new(8, 9)],
        ));

        let first = Route::empty(&problem, VehicleIdx::new(0))
            .try_insert_trip(&problem, TripIdx::new(0), 0, 1)
            .unwrap()
            .try_insert_trip(&problem, TripIdx::new(1), 2, 3)
            .unwrap();
        let second = Route::empty(&problem, VehicleIdx::new(1));
        let initial = Planning::new(vec![first, second]);

        let mut algorithm = LocalSearchAlgorithm::new(
            problem.clone(),
            initial.clone(),
            distance_params(),
            LocalSearchParams::default(),
        );
        let planning = algorithm.optimize().unwrap();

        assert_eq!(planning.vehicle_of(TripIdx::new(1)), Some(VehicleIdx::new(1)));
        assert!(Criterion::ShortestDistance.is_improvement(&planning, &initial));
        assert!(planning.is_complete(&problem));
        assert_eq!(algorithm.applied_moves(), 1);
    }

    #[test]
    fn test_earliest_last_departure_with_real_timestamps() {
        // 2025-06-15T12:26:40Z
        let start = 1_750_000_000;
        let problem = Arc::new(test_utils::create_line_problem(
            10,
            vec![
                test_utils::create_vehicle_starting_at(0, 1.0, start),
                test_utils::create_vehicle_starting_at(1, 1.0, start),
            ],
            vec![TestTrip::new(1, 2)],
        ));

        let first = Route::empty(&problem, VehicleIdx::new(0))
            .try_insert_trip(&problem, TripIdx::new(0), 0, 1)
            .unwrap();
        let second = Route::empty(&problem, VehicleIdx::new(1));
        let initial = Planning::new(vec![first, second]);

        let mut algorithm = LocalSearchAlgorithm::new(
            problem.clone(),
            initial.clone(),
            InsertionParams {
                strategy: InsertionStrategyKind::Intensive,
                criterion: Some(Criterion::EarliestLastDeparture),
            },
            LocalSearchParams::default(),
        );
        let planning = algorithm.optimize().unwrap();

        let criterion = Criterion::EarliestLastDeparture;
        assert_eq!(algorithm.applied_moves(), 1);
        assert_eq!(planning.vehicle_of(TripIdx::new(0)), Some(VehicleIdx::new(1)));
        assert_eq!(criterion.planning_score(&initial), Score((start + 2) as f64));
        assert_eq!(criterion.planning_score(&planning), Score((start + 1) as f64));
        assert!(criterion.is_improvement(&planning, &initial));
    }

    #[test]
    fn test_never_worsens() {
        let problem = test_utils::create_random_problem(6, 6, 3, 12, 13);

        let mut crosser = OrderedCrosser::new(problem.clone(), InsertionStrategyKind::Tail);
        crosser.complete().unwrap();
        let initial = crosser.into_planning();

        let mut algorithm = LocalSearchAlgorithm::new(
            problem.clone(),
            initial.clone(),
            distance_params(),
            LocalSearchParams::default(),
        );
        let planning = algorithm.optimize().unwrap();

        let criterion = Criterion::ShortestDistance;
        assert!(criterion.planning_score(&planning) <= criterion.planning_score(&initial));
        assert!(planning.is_complete(&problem));
    }

    #[test]
    fn test_zero_passes_keeps_planning() {
        let problem = test_utils::create_random_problem(4, 4, 2, 5, 2);

        let mut crosser = OrderedCrosser::new(problem.clone(), InsertionStrategyKind::Tail);
        crosser.complete().unwrap();
        let initial = crosser.into_planning();

        let mut algorithm = LocalSearchAlgorithm::new(
            problem,
            initial.clone(),
            distance_params(),
            LocalSearchParams { max_passes: 0 },
        );
        let planning = algorithm.optimize().unwrap();

        assert!(planning.is_identical(&initial));
        assert_ne!(planning.uuid(), initial.uuid());
    }
}
