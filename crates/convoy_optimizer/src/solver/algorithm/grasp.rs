use std::sync::Arc;

use jiff::Timestamp;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{debug, info, instrument, warn};

use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        criterion::Criterion,
        score::Score,
        solution::planning::Planning,
        solver_error::SolverError,
        solver_params::{GraspParams, RankingParams, Termination, validate_terminations},
        statistics::SearchStatistics,
    },
};

use super::{
    Algorithm, AlgorithmStatus, insertion::InsertionAlgorithm, local_search::LocalSearchAlgorithm,
};

/// Keeps track of the episodes run so far against the terminations.
pub(crate) struct EpisodeCounter {
    started_at: Timestamp,
    pub(crate) episodes: usize,
    pub(crate) episodes_without_improvement: usize,
}

impl EpisodeCounter {
    pub(crate) fn new() -> Self {
        EpisodeCounter {
            started_at: Timestamp::now(),
            episodes: 0,
            episodes_without_improvement: 0,
        }
    }

    pub(crate) fn record(&mut self, improved: bool) {
        self.episodes += 1;
        if improved {
            self.episodes_without_improvement = 0;
        } else {
            self.episodes_without_improvement += 1;
        }
    }

    pub(crate) fn should_terminate(&self, terminations: &[Termination]) -> bool {
        terminations.iter().any(|termination| match termination {
            Termination::Episodes(max) => self.episodes >= *max,
            Termination::EpisodesWithoutImprovement(max) => {
                self.episodes_without_improvement >= *max
            }
            Termination::Duration(duration) => {
                Timestamp::now().duration_since(self.started_at) >= *duration
            }
        })
    }
}

/// Greedy randomized adaptive search: repeated randomized insertion passes,
/// each refined by local search, keeping the best planning.
pub struct GraspAlgorithm {
    problem: Arc<VehicleRoutingProblem>,
    params: GraspParams,
    status: AlgorithmStatus,
    statistics: SearchStatistics,
}

impl GraspAlgorithm {
    pub fn new(problem: Arc<VehicleRoutingProblem>, params: GraspParams) -> Self {
        GraspAlgorithm {
            problem,
            params,
            status: AlgorithmStatus::Pending,
            statistics: SearchStatistics::default(),
        }
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    #[instrument(skip_all, level = "debug", fields(seed = seed))]
    fn run_episode(&self, seed: u64) -> Result<Planning, SolverError> {
        let mut insertion = InsertionAlgorithm::new(
            Arc::clone(&self.problem),
            self.params.insertion,
            RankingParams {
                seed,
                ..self.params.ranking
            },
        );
        let planning = insertion.optimize()?;

        if !self.params.run_local_search {
            return Ok(planning);
        }

        LocalSearchAlgorithm::new(
            Arc::clone(&self.problem),
            planning,
            self.params.insertion,
            self.params.local_search,
        )
        .optimize()
    }
}

impl Algorithm for GraspAlgorithm {
    fn name(&self) -> &'static str {
        "grasp"
    }

    fn problem(&self) -> &VehicleRoutingProblem {
        &self.problem
    }

    fn criterion(&self) -> Criterion {
        self.params.insertion.criterion(&self.problem)
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
        self.params.ranking.validate()?;

        let criterion = self.criterion();
        let mut rng = SmallRng::seed_from_u64(self.params.seed);
        let mut counter = EpisodeCounter::new();
        let mut best: Option<(Planning, Score)> = None;

        while !counter.should_terminate(&self.params.terminations) {
            let seed: u64 = rng.random();
            let started_at = Timestamp::now();

            match self.run_episode(seed) {
                Ok(planning) => {
                    let score = criterion.planning_score(&planning);
                    let improved = best
                        .as_ref()
                        .is_none_or(|(_, best_score)| score.improves_on(best_score));

                    if improved {
                        info!(episode = counter.episodes, score = %score, "new best planning");
                        best = Some((planning, score));
                    }

                    self.statistics.add_completed_episode(
                        score,
                        improved,
                        Timestamp::now().duration_since(started_at),
                    );
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
