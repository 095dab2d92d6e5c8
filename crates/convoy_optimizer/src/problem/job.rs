use crate::{
    problem::trip::{Trip, TripIdx},
    solver::criterion::Criterion,
};

/// The trips to serve during a run and the objective they should be planned for.
#[derive(Debug, Clone, Default)]
pub struct Job {
    trips: Vec<Trip>,
    objective: Criterion,
}

impl Job {
    pub fn new(trips: Vec<Trip>) -> Self {
        Job {
            trips,
            objective: Criterion::default(),
        }
    }

    pub fn with_objective(mut self, objective: Criterion) -> Self {
        self.objective = objective;
        self
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn trip(&self, trip_id: TripIdx) -> &Trip {
        &self.trips[trip_id]
    }

    pub fn trip_ids(&self) -> impl Iterator<Item = TripIdx> + use<> {
        (0..self.trips.len()).map(TripIdx::new)
    }

    pub fn objective(&self) -> Criterion {
        self.objective
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}
