use std::sync::Arc;

use tracing::instrument;

use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        criterion::Criterion, crosser::CrosserKind, solution::planning::Planning,
        solver_error::SolverError, solver_params::InsertionParams,
    },
};

use super::{Algorithm, AlgorithmStatus};

/// Runs a single crosser until every trip is planned.
pub struct NaiveAlgorithm {
    problem: Arc<VehicleRoutingProblem>,
    crosser: CrosserKind,
    params: InsertionParams,
    status: AlgorithmStatus,
}

impl NaiveAlgorithm {
    pub fn new(
        problem: Arc<VehicleRoutingProblem>,
        crosser: CrosserKind,
        params: InsertionParams,
    ) -> Self {
        NaiveAlgorithm {
            problem,
            crosser,
            params,
            status: AlgorithmStatus::Pending,
        }
    }
}

impl Algorithm for NaiveAlgorithm {
    fn name(&self) -> &'static str {
        "naive"
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

    #[instrument(skip_all, level = "debug", fields(crosser = %self.crosser))]
    fn optimize(&mut self) -> Result<Planning, SolverError> {
        let mut crosser = self.crosser.build(
            Arc::clone(&self.problem),
            self.params.strategy,
            self.criterion(),
        )?;

        crosser.complete()?;

        Ok(crosser.planning())
    }
}
