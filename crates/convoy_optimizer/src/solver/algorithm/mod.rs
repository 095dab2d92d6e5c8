pub mod grasp;
pub mod insertion;
pub mod iterative;
pub mod local_search;
pub mod naive;

use jiff::{SignedDuration, Timestamp};
use serde::Serialize;
use tracing::info;

use crate::problem::vehicle_routing_problem::VehicleRoutingProblem;

use super::{criterion::Criterion, score::Score, solution::planning::Planning, solver_error::SolverError};

#[derive(Copy, Clone, Debug, Serialize, PartialEq, Eq)]
pub enum AlgorithmStatus {
    Pending,
    Running,
    Finished,
}

#[derive(Serialize, Debug, Clone)]
pub struct AlgorithmResult {
    pub algorithm: &'static str,
    pub planning: Planning,
    pub score: Score,
    pub computation_time: SignedDuration,
}

pub trait Algorithm {
    fn name(&self) -> &'static str;

    fn problem(&self) -> &VehicleRoutingProblem;

    fn criterion(&self) -> Criterion;

    fn status(&self) -> AlgorithmStatus;

    fn set_status(&mut self, status: AlgorithmStatus);

    /// Builds a planning serving every trip.
    fn optimize(&mut self) -> Result<Planning, SolverError>;

    /// Runs the algorithm once, an algorithm cannot be run twice.
    fn run(&mut self) -> Result<AlgorithmResult, SolverError> {
        let status = self.status();
        if status != AlgorithmStatus::Pending {
            return Err(SolverError::AlgorithmAlreadyRun(status));
        }

        let started_at = Timestamp::now();
        self.set_status(AlgorithmStatus::Running);
        let outcome = self.optimize();
        self.set_status(AlgorithmStatus::Finished);

        let planning = outcome?;
        let score = self.criterion().planning_score(&planning);
        let computation_time = Timestamp::now().duration_since(started_at);

        info!(
            algorithm = self.name(),
            score = %score,
            routes = planning.loaded_routes().count(),
            ?computation_time,
            "algorithm finished"
        );

        Ok(AlgorithmResult {
            algorithm: self.name(),
            planning,
            score,
            computation_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        solver::{crosser::CrosserKind, solver_params::InsertionParams},
        test_utils,
    };

    use super::{naive::NaiveAlgorithm, *};

    #[test]
    fn test_run_moves_through_statuses() {
        let problem = test_utils::create_random_problem(3, 3, 2, 4, 8);
        let mut algorithm =
            NaiveAlgorithm::new(problem.clone(), CrosserKind::BestStateless, InsertionParams::default());

        assert_eq!(algorithm.status(), AlgorithmStatus::Pending);

        let result = algorithm.run().unwrap();

        assert_eq!(algorithm.status(), AlgorithmStatus::Finished);
        assert_eq!(result.algorithm, "naive");
        assert_eq!(result.score, algorithm.criterion().planning_score(&result.planning));
        assert!(!result.computation_time.is_negative());
        assert!(result.planning.is_complete(&problem));

        assert_eq!(
            algorithm.run().unwrap_err(),
            SolverError::AlgorithmAlreadyRun(AlgorithmStatus::Finished)
        );
    }

    #[test]
    fn test_result_serializes() {
        let problem = test_utils::create_random_problem(3, 3, 1, 2, 8);
        let mut algorithm = NaiveAlgorithm::new(
            Arc::clone(&problem),
            CrosserKind::Ordered,
            InsertionParams::default(),
        );

        let result = algorithm.run().unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["algorithm"], "naive");
        assert!(json["planning"]["routes"].is_array());
    }
}
