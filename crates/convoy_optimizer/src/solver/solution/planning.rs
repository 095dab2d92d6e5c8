use serde::Serialize;
use uuid::Uuid;

use crate::{
    problem::{
        trip::TripIdx,
        vehicle::VehicleIdx,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    utils::enumerate_idx::EnumerateIdx,
};

use super::{planned_trip::PlannedTrip, route::Route};

/// One route per vehicle of the fleet, indexed by vehicle.
///
/// Every planning carries its own identity: cloning yields a new planning
/// with the same routes and a fresh uuid.
#[derive(Serialize, Debug)]
pub struct Planning {
    uuid: Uuid,
    routes: Vec<Route>,
}

impl Planning {
    pub fn new(routes: Vec<Route>) -> Self {
        Planning {
            uuid: Uuid::new_v4(),
            routes,
        }
    }

    pub fn empty(problem: &VehicleRoutingProblem) -> Self {
        Planning::new(
            problem
                .vehicles()
                .iter()
                .enumerate_idx()
                .map(|(vehicle_id, _)| Route::empty(problem, vehicle_id))
                .collect(),
        )
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, vehicle_id: VehicleIdx) -> &Route {
        &self.routes[vehicle_id.get()]
    }

    pub fn into_routes(self) -> Vec<Route> {
        self.routes
    }

    pub fn loaded_routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(|route| route.is_loaded())
    }

    pub fn planned_trips(&self) -> Vec<PlannedTrip> {
        self.routes
            .iter()
            .flat_map(|route| route.planned_trips())
            .collect()
    }

    /// Served trips, route by route in pickup order.
    pub fn trips(&self) -> Vec<TripIdx> {
        self.routes.iter().flat_map(Route::trip_ids).collect()
    }

    pub fn trips_count(&self) -> usize {
        self.routes.iter().map(Route::trips_count).sum()
    }

    /// Trip set of every loaded route, sorted, paired with its vehicle.
    pub fn assignments(&self) -> Vec<(VehicleIdx, Vec<TripIdx>)> {
        let mut assignments: Vec<(VehicleIdx, Vec<TripIdx>)> = self
            .loaded_routes()
            .map(|route| {
                let mut trips: Vec<TripIdx> = route.trip_ids().collect();
                trips.sort_unstable();
                (route.vehicle_id(), trips)
            })
            .collect();
        assignments.sort_unstable();
        assignments
    }

    pub fn vehicle_of(&self, trip_id: TripIdx) -> Option<VehicleIdx> {
        self.routes
            .iter()
            .find(|route| route.contains_trip(trip_id))
            .map(Route::vehicle_id)
    }

    /// Every trip of the problem is served exactly once.
    pub fn is_complete(&self, problem: &VehicleRoutingProblem) -> bool {
        let mut trips = self.trips();
        trips.sort();
        trips.dedup();
        trips.len() == self.trips_count() && trips.len() == problem.trips().len()
    }

    /// Same routes, regardless of identity.
    pub fn is_identical(&self, other: &Planning) -> bool {
        self.routes.len() == other.routes.len()
            && self
                .routes
                .iter()
                .zip(other.routes.iter())
                .all(|(a, b)| a.is_identical(b))
    }
}

impl Clone for Planning {
    fn clone(&self) -> Self {
        Planning::new(self.routes.clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{trip::TripIdx, vehicle::VehicleIdx},
        solver::solution::route::Route,
        test_utils::{self, TestTrip},
    };

    use super::*;

    fn create_planning() -> (VehicleRoutingProblem, Planning) {
        let problem = test_utils::create_line_problem(
            10,
            vec![
                test_utils::create_vehicle(0, 2.0),
                test_utils::create_vehicle(9, 2.0),
            ],
            vec![TestTrip::new(1, 2), TestTrip::new(8, 7)],
        );

        let first = Route::empty(&problem, VehicleIdx::new(0))
            .try_insert_trip(&problem, TripIdx::new(0), 0, 1)
            .unwrap();
        let second = Route::empty(&problem, VehicleIdx::new(1));

        let planning = Planning::new(vec![first, second]);
        (problem, planning)
    }

    #[test]
    fn test_clone_has_new_identity() {
        let (_, planning) = create_planning();
        let cloned = planning.clone();

        assert_ne!(planning.uuid(), cloned.uuid());
        assert!(planning.is_identical(&cloned));
        assert_eq!(planning.assignments(), cloned.assignments());
        assert_eq!(
            cloned.assignments(),
            vec![(VehicleIdx::new(0), vec![TripIdx::new(0)])]
        );
    }

    #[test]
    fn test_clone_routes_are_disjoint() {
        let (problem, planning) = create_planning();
        let mut routes = planning.clone().into_routes();

        routes[1] = routes[1]
            .try_insert_trip(&problem, TripIdx::new(1), 0, 1)
            .unwrap();
        let modified = Planning::new(routes);

        assert!(planning.route(VehicleIdx::new(1)).is_empty());
        assert!(modified.route(VehicleIdx::new(1)).is_loaded());
        assert!(!planning.is_identical(&modified));
    }

    #[test]
    fn test_views() {
        let (problem, planning) = create_planning();

        assert_eq!(planning.loaded_routes().count(), 1);
        assert_eq!(planning.trips(), vec![TripIdx::new(0)]);
        assert_eq!(planning.planned_trips().len(), 1);
        assert_eq!(planning.vehicle_of(TripIdx::new(0)), Some(VehicleIdx::new(0)));
        assert_eq!(planning.vehicle_of(TripIdx::new(1)), None);
        assert!(!planning.is_complete(&problem));
    }

    #[test]
    fn test_empty_planning() {
        let (problem, _) = create_planning();
        let planning = Planning::empty(&problem);

        assert_eq!(planning.routes().len(), 2);
        assert_eq!(planning.loaded_routes().count(), 0);
        assert_eq!(planning.trips_count(), 0);
    }
}
