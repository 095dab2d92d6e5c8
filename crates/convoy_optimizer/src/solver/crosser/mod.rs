//! Pull-based construction of plannings.
//!
//! A crosser proposes one [`PlannedTrip`] at a time and the caller commits it
//! with [`Crosser::mark_planned_trip_as_done`]. Proposal and commit are split
//! so a caller can inspect, reject or later undo a placement.

pub mod best_stateless;
pub mod ordered;
pub mod randomized;
pub mod ranking;
pub mod stateless;

use std::sync::Arc;

use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    problem::{
        trip::TripIdx,
        vehicle::VehicleIdx,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    utils::enumerate_idx::EnumerateIdx,
};

use super::{
    criterion::Criterion,
    insertion::{InsertionStrategy, InsertionStrategyKind},
    solution::{planned_trip::PlannedTrip, planning::Planning, route::Route},
    solver_error::SolverError,
    solver_params::RankingParams,
};

use self::{
    best_stateless::BestStatelessCrosser, ordered::OrderedCrosser,
    randomized::RandomizedCrosser, ranking::RankingInsertionIterator,
    stateless::StatelessCrosser,
};

/// Routes and done trips shared by every crosser.
#[derive(Debug, Clone)]
pub struct CrosserState {
    problem: Arc<VehicleRoutingProblem>,
    routes: Vec<Route>,
    done_trips: FxHashSet<TripIdx>,
}

impl CrosserState {
    pub fn new(problem: Arc<VehicleRoutingProblem>) -> Self {
        let routes = problem
            .vehicles()
            .iter()
            .enumerate_idx()
            .map(|(vehicle_id, _)| Route::empty(&problem, vehicle_id))
            .collect();

        CrosserState {
            problem,
            routes,
            done_trips: FxHashSet::default(),
        }
    }

    pub fn problem(&self) -> &VehicleRoutingProblem {
        &self.problem
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, vehicle_id: VehicleIdx) -> &Route {
        &self.routes[vehicle_id.get()]
    }

    pub fn done_trips(&self) -> &FxHashSet<TripIdx> {
        &self.done_trips
    }

    pub fn is_done(&self, trip_id: TripIdx) -> bool {
        self.done_trips.contains(&trip_id)
    }

    /// Trips not done yet, in trip order.
    pub fn pending_trips(&self) -> Vec<TripIdx> {
        self.problem
            .job()
            .trip_ids()
            .filter(|trip_id| !self.done_trips.contains(trip_id))
            .collect()
    }

    pub fn pending_trips_count(&self) -> usize {
        self.problem.trips().len() - self.done_trips.len()
    }

    pub fn completed(&self) -> bool {
        self.pending_trips_count() == 0
    }

    /// Applies the placement to the route of its vehicle.
    pub fn commit(&mut self, planned_trip: &PlannedTrip) -> Result<(), SolverError> {
        let trip_id = planned_trip.trip_id;
        let vehicle_id = planned_trip.vehicle_id;

        if self.is_done(trip_id) {
            return Err(SolverError::TripAlreadyDone(trip_id));
        }

        let invalid = SolverError::InvalidPlannedTrip {
            trip: trip_id,
            vehicle: vehicle_id,
        };

        let route = self.routes.get(vehicle_id.get()).ok_or(invalid.clone())?;
        let updated = route
            .try_insert_trip(
                &self.problem,
                trip_id,
                planned_trip.pickup_position,
                planned_trip.delivery_position,
            )
            .ok_or(invalid)?;

        self.routes[vehicle_id.get()] = updated;
        self.done_trips.insert(trip_id);

        debug!(
            trip = %trip_id,
            vehicle = %vehicle_id,
            pending = self.pending_trips_count(),
            "committed planned trip"
        );

        Ok(())
    }

    /// Removes the trip from its route.
    pub fn undo(&mut self, planned_trip: &PlannedTrip) -> Result<(), SolverError> {
        let trip_id = planned_trip.trip_id;
        let vehicle_id = planned_trip.vehicle_id;

        if !self.is_done(trip_id) {
            return Err(SolverError::TripNotDone(trip_id));
        }

        let invalid = SolverError::InvalidPlannedTrip {
            trip: trip_id,
            vehicle: vehicle_id,
        };

        let route = self.routes.get(vehicle_id.get()).ok_or(invalid.clone())?;
        let updated = route
            .try_remove_trip(&self.problem, trip_id)
            .ok_or(invalid)?;

        self.routes[vehicle_id.get()] = updated;
        self.done_trips.remove(&trip_id);

        debug!(trip = %trip_id, vehicle = %vehicle_id, "undid planned trip");

        Ok(())
    }

    pub fn into_planning(self) -> Planning {
        Planning::new(self.routes)
    }
}

pub trait Crosser {
    fn state(&self) -> &CrosserState;

    fn state_mut(&mut self) -> &mut CrosserState;

    fn into_state(self) -> CrosserState
    where
        Self: Sized;

    /// Proposes the next placement, `None` when no feasible candidate exists.
    fn get_planned_trip(&mut self) -> Option<PlannedTrip>;

    /// Called once a placement has been applied to the routes.
    fn on_planned_trip_done(&mut self, _planned_trip: &PlannedTrip) {}

    /// Called once a placement has been removed from the routes.
    fn on_planned_trip_undone(&mut self, _planned_trip: &PlannedTrip) {}

    fn mark_planned_trip_as_done(&mut self, planned_trip: &PlannedTrip) -> Result<(), SolverError> {
        self.state_mut().commit(planned_trip)?;
        self.on_planned_trip_done(planned_trip);
        Ok(())
    }

    fn mark_planned_trip_as_undone(
        &mut self,
        planned_trip: &PlannedTrip,
    ) -> Result<(), SolverError> {
        self.state_mut().undo(planned_trip)?;
        self.on_planned_trip_undone(planned_trip);
        Ok(())
    }

    /// `Ok(None)` once every trip is done, an error when trips remain but
    /// nothing can be proposed.
    fn next_planned_trip(&mut self) -> Result<Option<PlannedTrip>, SolverError> {
        if self.completed() {
            return Ok(None);
        }

        match self.get_planned_trip() {
            Some(planned_trip) => Ok(Some(planned_trip)),
            None => Err(SolverError::NonFeasibleAssignment {
                pending_trips: self.state().pending_trips_count(),
            }),
        }
    }

    /// Commits every proposal until all trips are done.
    fn complete(&mut self) -> Result<(), SolverError> {
        while let Some(planned_trip) = self.next_planned_trip()? {
            self.mark_planned_trip_as_done(&planned_trip)?;
        }
        Ok(())
    }

    fn pending_trips(&self) -> Vec<TripIdx> {
        self.state().pending_trips()
    }

    fn done_trips(&self) -> &FxHashSet<TripIdx> {
        self.state().done_trips()
    }

    fn completed(&self) -> bool {
        self.state().completed()
    }

    fn routes(&self) -> &[Route] {
        self.state().routes()
    }

    /// Snapshot of the current routes.
    fn planning(&self) -> Planning {
        Planning::new(self.routes().to_vec())
    }

    fn into_planning(self) -> Planning
    where
        Self: Sized,
    {
        self.into_state().into_planning()
    }
}

/// Every feasible candidate for every (route, pending trip) pair, routes in vehicle order.
pub(crate) fn compute_all_candidates(
    state: &CrosserState,
    strategy: &impl InsertionStrategy,
) -> Vec<Route> {
    let pending_trips = state.pending_trips();
    state
        .routes()
        .iter()
        .flat_map(|route| strategy.compute(state.problem(), route, &pending_trips))
        .collect()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CrosserKind {
    /// Always appends at the tail; the insertion strategy passed to `build` is ignored.
    Stateless,
    BestStateless,
    Ordered,
    Randomized { seed: u64 },
    Ranking(RankingParams),
}

impl Default for CrosserKind {
    fn default() -> Self {
        CrosserKind::Ranking(RankingParams::default())
    }
}

impl CrosserKind {
    pub fn build(
        &self,
        problem: Arc<VehicleRoutingProblem>,
        strategy: InsertionStrategyKind,
        criterion: Criterion,
    ) -> Result<Box<dyn Crosser>, SolverError> {
        Ok(match self {
            CrosserKind::Stateless => Box::new(StatelessCrosser::new(problem, criterion)),
            CrosserKind::BestStateless => {
                Box::new(BestStatelessCrosser::new(problem, strategy, criterion))
            }
            CrosserKind::Ordered => Box::new(OrderedCrosser::new(problem, strategy)),
            CrosserKind::Randomized { seed } => {
                Box::new(RandomizedCrosser::new(problem, strategy, *seed))
            }
            CrosserKind::Ranking(params) => Box::new(RankingInsertionIterator::new(
                problem, strategy, criterion, *params,
            )?),
        })
    }
}

impl std::fmt::Display for CrosserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrosserKind::Stateless => write!(f, "stateless"),
            CrosserKind::BestStateless => write!(f, "best_stateless"),
            CrosserKind::Ordered => write!(f, "ordered"),
            CrosserKind::Randomized { .. } => write!(f, "randomized"),
            CrosserKind::Ranking(_) => write!(f, "ranking"),
        }
    }
}
