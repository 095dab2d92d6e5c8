use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{debug, info, instrument, warn};

use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        criterion::Criterion,
        score::Score,
        solution::planning::Planning,
        solver_error::SolverError,
        solver_params::{IterativeParams, validate_terminations},
        statistics::SearchStatistics,
    },
};

use super::{Algorithm, AlgorithmStatus, grasp::EpisodeCounter};

/// Runs a fresh sub-algorithm per episode, each built from its own seed,
/// and keeps the best planning.
pub struct IterativeAlgorithm<F>
where
    F: FnMut(u64) -> Box<dyn Algorithm>,
{
    problem: Arc<VehicleRoutingProblem>,
    factory: F,
    params: IterativeParams,
    status: AlgorithmStatus,
    statistics: SearchStatistics,
}

impl<F> IterativeAlgorithm<F>
where
    F: FnMut(u64) -> Box<dyn Algorithm>,
{
    pub fn new(problem: Arc<VehicleRoutingProblem>, params: IterativeParams, factory: F) -> Self {
        IterativeAlgorithm {
            problem,
            factory,
            params,
            status: AlgorithmStatus::Pending,
            statistics: SearchStatistics::default(),
        }
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }
}

impl<F> Algorithm for IterativeAlgorithm<F>
where
    F: FnMut(u64) -> Box<dyn Algorithm>,
{
    fn name(&self) -> &'static str {
        "iterative"
    }

    fn problem(&self) -> &VehicleRoutingProblem {
        &self.problem
    }

    fn criterion(&self) -> Criterion {
        self.params
            .criterion
            .unwrap_or_else(|| self.problem.objective())
    }

    fn status(&self) -> AlgorithmStatus {
        self.status
    }

    fn set_status(&mut self, status: AlgorithmStatus) {
        self.status = status;
    }

    #[instrument(skip_all, level = "debug")]
    fn optimize(&mut self) -> Result<Planning, SolverError> {
        validate_terminations(&self.params.terminations)?;

        let criterion = self.criterion();
        let mut rng = SmallRng::seed_from_u64(self.params.seed);
        let mut counter = EpisodeCounter::new();
        let mut best: Option<(Planning, Score)> = None;

        while !counter.should_terminate(&self.params.terminations) {
            let mut algorithm = (self.factory)(rng.random());

            match algorithm.run() {
                Ok(result) => {
                    let score = criterion.planning_score(&result.planning);
                    let improved = best
                        .as_ref()
                        .is_none_or(|(_, best_score)| score.improves_on(best_score));

                    if improved {
                        info!(
                            episode = counter.episodes,
                            algorithm = result.algorithm,
                            score = %score,
                            "new best planning"
                        );
                        best = Some((result.planning, score));
                    }

                    self.statistics
                        .add_completed_episode(score, improved, result.computation_time);
                    counter.record(improved);
                }
                Err(SolverError::NonFeasibleAssignment { pending_trips }) => {
                    debug!(episode = counter.episodes, pending_trips, "episode skipped");
                    self.statistics.add_skipped_episode(pending_trips);
                    counter.record(false);
                }
                Err(error) => return Err(error),
            }

            if let Some((_, score)) = &best {
                self.statistics.add_incumbent_score(*score);
            }
        }

        match best {
            Some((planning, _)) => Ok(planning),
            None => {
                warn!(episodes = counter.episodes, "no episode produced a planning");
                Err(SolverError::NonFeasibleAssignment {
                    pending_trips: self.problem.trips().len(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        solver::{
            algorithm::{insertion::InsertionAlgorithm, naive::NaiveAlgorithm},
            crosser::CrosserKind,
            solver_params::{InsertionParams, RankingParams, Termination},
        },
        test_utils::{self, TestTrip},
    };

    use super::*;

    #[test]
    fn test_keeps_best_of_insertion_runs() {
        let problem = test_utils::create_random_problem(6, 6, 4, 12, 3);
        let mut seeds = Vec::new();

        let factory_problem = problem.clone();
        let mut algorithm = IterativeAlgorithm::new(
            problem.clone(),
            IterativeParams {
                terminations: vec![Termination::Episodes(5)],
                ..IterativeParams::default()
            },
            |seed: u64| {
                seeds.push(seed);
                Box::new(InsertionAlgorithm::new(
                    factory_problem.clone(),
                    InsertionParams::default(),
                    RankingParams {
                        seed,
                        ..RankingParams::default()
                    },
                )) as Box<dyn Algorithm>
            },
        );

        let result = algorithm.run().unwrap();
        let statistics = algorithm.statistics().clone();
        drop(algorithm);

        assert_eq!(seeds.len(), 5);
        assert!(result.planning.is_complete(&problem));
        for row in statistics.score_evolution() {
            assert!(result.score <= row.score);
        }
    }

    #[test]
    fn test_failures_are_skipped() {
        let problem = Arc::new(test_utils::create_line_problem(
            10,
            vec![test_utils::create_vehicle(0, 1.0)],
            vec![TestTrip::new(1, 2)],
        ));
        let infeasible = Arc::new(test_utils::create_line_problem(
            10,
            vec![test_utils::create_vehicle(0, 1.0)],
            vec![TestTrip::new(1, 2).with_load(2.0)],
        ));

        let mut episode = 0;
        let mut algorithm = IterativeAlgorithm::new(
            problem.clone(),
            IterativeParams {
                terminations: vec![Termination::Episodes(4)],
                ..IterativeParams::default()
            },
            |_: u64| {
                episode += 1;
                let target = if episode % 2 == 0 {
                    problem.clone()
                } else {
                    infeasible.clone()
                };
                Box::new(NaiveAlgorithm::new(
                    target,
                    CrosserKind::Stateless,
                    InsertionParams::default(),
                )) as Box<dyn Algorithm>
            },
        );

        let planning = algorithm.optimize().unwrap();

        assert_eq!(algorithm.statistics().skipped_episodes(), 2);
        assert_eq!(planning.trips().len(), 1);
    }
}
