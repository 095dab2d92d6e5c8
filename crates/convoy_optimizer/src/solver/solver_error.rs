use thiserror::Error;

use crate::problem::{trip::TripIdx, vehicle::VehicleIdx};

use super::algorithm::AlgorithmStatus;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    /// The crosser still has pending trips but no feasible candidate for any of them.
    #[error("No feasible assignment left for {pending_trips} pending trips")]
    NonFeasibleAssignment { pending_trips: usize },

    #[error("Trip {trip} cannot be planned on vehicle {vehicle} at the requested positions")]
    InvalidPlannedTrip { trip: TripIdx, vehicle: VehicleIdx },

    #[error("Trip {0} is already done")]
    TripAlreadyDone(TripIdx),

    #[error("Trip {0} is not done")]
    TripNotDone(TripIdx),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Algorithm cannot run from status {0:?}")]
    AlgorithmAlreadyRun(AlgorithmStatus),
}
