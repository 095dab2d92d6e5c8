use std::sync::Arc;

use fxhash::FxHashMap;
use rand::{SeedableRng, rngs::SmallRng, seq::IndexedRandom};
use tracing::{debug, instrument};

use crate::{
    problem::{vehicle::VehicleIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        criterion::Criterion,
        insertion::{InsertionStrategy, InsertionStrategyKind},
        solution::{planned_trip::PlannedTrip, route::Route},
        solver_error::SolverError,
        solver_params::RankingParams,
        statistics::RankingStatistics,
    },
    utils::enumerate_idx::EnumerateIdx,
};

use super::{Crosser, CrosserState};

/// Keeps, for every attractive vehicle, the candidate routes obtained by
/// inserting one pending trip in its current route, sorted by criterion.
///
/// A commit only rebuilds the sub-ranking of the receiving vehicle (and of
/// vehicles becoming attractive); the other sub-rankings are purged of the
/// candidates serving the committed trip.
pub struct RankingInsertionIterator {
    state: CrosserState,
    strategy: InsertionStrategyKind,
    criterion: Criterion,
    neighborhood_size: usize,
    randomized_size: usize,
    rng: SmallRng,
    ranking: FxHashMap<VehicleIdx, Vec<Route>>,
    statistics: RankingStatistics,
}

impl RankingInsertionIterator {
    pub fn new(
        problem: Arc<VehicleRoutingProblem>,
        strategy: InsertionStrategyKind,
        criterion: Criterion,
        params: RankingParams,
    ) -> Result<Self, SolverError> {
        params.validate()?;

        let neighborhood_size = params.neighborhood_size(problem.trips().len());
        let mut iterator = RankingInsertionIterator {
            state: CrosserState::new(problem),
            strategy,
            criterion,
            neighborhood_size,
            randomized_size: params.randomized_size,
            rng: SmallRng::seed_from_u64(params.seed),
            ranking: FxHashMap::default(),
            statistics: RankingStatistics::default(),
        };

        iterator.initialize_ranking();

        Ok(iterator)
    }

    pub fn statistics(&self) -> &RankingStatistics {
        &self.statistics
    }

    pub fn sub_ranking(&self, vehicle_id: VehicleIdx) -> Option<&[Route]> {
        self.ranking.get(&vehicle_id).map(Vec::as_slice)
    }

    pub fn ranked_vehicles(&self) -> Vec<VehicleIdx> {
        let mut vehicles: Vec<VehicleIdx> = self.ranking.keys().copied().collect();
        vehicles.sort();
        vehicles
    }

    /// Vehicles with a loaded route, plus the first empty vehicle of every
    /// group of interchangeable vehicles, in vehicle order.
    pub fn attractive_vehicles(&self) -> Vec<VehicleIdx> {
        let problem = self.state.problem();
        let mut attractive = Vec::new();
        let mut empty_representatives: Vec<VehicleIdx> = Vec::new();

        for (vehicle_id, route) in self.state.routes().iter().enumerate_idx() {
            if route.is_loaded() {
                attractive.push(vehicle_id);
                continue;
            }

            let vehicle = problem.vehicle(vehicle_id);
            if !empty_representatives
                .iter()
                .any(|&other| problem.vehicle(other).is_interchangeable_with(vehicle))
            {
                empty_representatives.push(vehicle_id);
                attractive.push(vehicle_id);
            }
        }

        attractive
    }

    fn initialize_ranking(&mut self) {
        for vehicle_id in self.attractive_vehicles() {
            let sub_ranking = self.create_sub_ranking(vehicle_id);
            self.ranking.insert(vehicle_id, sub_ranking);
        }
    }

    #[instrument(skip_all, level = "debug", fields(vehicle = %vehicle_id))]
    fn create_sub_ranking(&mut self, vehicle_id: VehicleIdx) -> Vec<Route> {
        let pending_trips: Vec<_> = self
            .state
            .pending_trips()
            .into_iter()
            .take(self.neighborhood_size)
            .collect();

        let mut sub_ranking = self.strategy.compute(
            self.state.problem(),
            self.state.route(vehicle_id),
            &pending_trips,
        );
        self.criterion.sort(&mut sub_ranking);

        self.statistics.rebuilds += 1;
        self.statistics.candidates_computed += sub_ranking.len();

        debug!(
            trips = pending_trips.len(),
            candidates = sub_ranking.len(),
            "rebuilt sub-ranking"
        );

        sub_ranking
    }

    #[instrument(skip_all, level = "debug", fields(trip = %planned_trip.trip_id, vehicle = %planned_trip.vehicle_id))]
    fn update_ranking(&mut self, planned_trip: &PlannedTrip) {
        let attractive = self.attractive_vehicles();
        self.ranking
            .retain(|vehicle_id, _| attractive.contains(vehicle_id));

        for vehicle_id in attractive {
            let needs_rebuild = vehicle_id == planned_trip.vehicle_id
                || !self.ranking.contains_key(&vehicle_id);

            if !needs_rebuild && let Some(sub_ranking) = self.ranking.get_mut(&vehicle_id) {
                let before = sub_ranking.len();
                sub_ranking.retain(|route| !route.contains_trip(planned_trip.trip_id));

                self.statistics.filters += 1;
                self.statistics.candidates_purged += before - sub_ranking.len();

                // The neighborhood may hide pending trips the vehicle could still serve
                if !sub_ranking.is_empty() || self.neighborhood_size >= self.state.problem().trips().len() {
                    continue;
                }
            }

            let sub_ranking = self.create_sub_ranking(vehicle_id);
            self.ranking.insert(vehicle_id, sub_ranking);
        }
    }
}

impl Crosser for RankingInsertionIterator {
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
        if self.ranking.values().all(Vec::is_empty) {
            return None;
        }

        let attractive = self.attractive_vehicles();
        let mut short_list: Vec<&Route> = Vec::with_capacity(self.randomized_size);

        for vehicle_id in &attractive {
            let Some(sub_ranking) = self.ranking.get(vehicle_id) else {
                continue;
            };

            for candidate in sub_ranking {
                if let Some(last) = short_list.last()
                    && !self.criterion.is_better(candidate, last)
                {
                    break;
                }

                if short_list.len() >= self.randomized_size {
                    short_list.pop();
                }
                short_list.push(candidate);
            }

            self.criterion.sort(&mut short_list);
        }

        short_list
            .choose(&mut self.rng)
            .and_then(|route| route.most_recent_planned_trip())
    }

    fn on_planned_trip_done(&mut self, planned_trip: &PlannedTrip) {
        self.statistics.commits += 1;
        self.update_ranking(planned_trip);
    }

    /// The released trip re-enters every neighborhood.
    fn on_planned_trip_undone(&mut self, _planned_trip: &PlannedTrip) {
        self.statistics.undos += 1;
        self.ranking.clear();
        self.initialize_ranking();
    }
}
