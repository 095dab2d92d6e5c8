use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::problem::{trip::TripIdx, vehicle_routing_problem::VehicleRoutingProblem};

use super::solution::route::Route;

/// Positions at which a trip is inserted in a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripInsertion {
    pub trip_id: TripIdx,

    /// Position of the pickup
    pub pickup_position: usize,

    /// Position of the delivery, once the pickup has been inserted
    pub delivery_position: usize,
}

/// Every pair of positions with the pickup before the delivery.
pub fn for_each_trip_insertion(route: &Route, trip_id: TripIdx, mut f: impl FnMut(TripInsertion)) {
    let len = route.len();
    for pickup_position in 0..=len {
        for delivery_position in pickup_position + 1..=len + 1 {
            f(TripInsertion {
                trip_id,
                pickup_position,
                delivery_position,
            });
        }
    }
}

/// Produces candidate routes, each one the given route plus one trip.
pub trait InsertionStrategy {
    fn compute_one(&self, problem: &VehicleRoutingProblem, route: &Route, trip_id: TripIdx)
    -> Vec<Route>;

    fn compute(
        &self,
        problem: &VehicleRoutingProblem,
        route: &Route,
        trips: &[TripIdx],
    ) -> Vec<Route> {
        trips
            .iter()
            .flat_map(|&trip_id| self.compute_one(problem, route, trip_id))
            .collect()
    }
}

/// Tries every pickup and delivery position.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntensiveInsertionStrategy;

impl InsertionStrategy for IntensiveInsertionStrategy {
    fn compute_one(
        &self,
        problem: &VehicleRoutingProblem,
        route: &Route,
        trip_id: TripIdx,
    ) -> Vec<Route> {
        let mut routes = Vec::new();

        if !problem
            .vehicle(route.vehicle_id())
            .can_carry(problem.trip(trip_id).load())
        {
            return routes;
        }

        for_each_trip_insertion(route, trip_id, |insertion| {
            if let Some(candidate) = route.try_insert_trip(
                problem,
                insertion.trip_id,
                insertion.pickup_position,
                insertion.delivery_position,
            ) {
                routes.push(candidate);
            }
        });

        routes
    }
}

/// Appends the pickup and the delivery at the end of the route.
#[derive(Debug, Default, Clone, Copy)]
pub struct TailInsertionStrategy;

impl InsertionStrategy for TailInsertionStrategy {
    fn compute_one(
        &self,
        problem: &VehicleRoutingProblem,
        route: &Route,
        trip_id: TripIdx,
    ) -> Vec<Route> {
        let len = route.len();
        route
            .try_insert_trip(problem, trip_id, len, len + 1)
            .into_iter()
            .collect()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InsertionStrategyKind {
    #[default]
    Intensive,
    Tail,
}

impl Display for InsertionStrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsertionStrategyKind::Intensive => write!(f, "intensive"),
            InsertionStrategyKind::Tail => write!(f, "tail"),
        }
    }
}

impl InsertionStrategy for InsertionStrategyKind {
    fn compute_one(
        &self,
        problem: &VehicleRoutingProblem,
        route: &Route,
        trip_id: TripIdx,
    ) -> Vec<Route> {
        match self {
            InsertionStrategyKind::Intensive => {
                IntensiveInsertionStrategy.compute_one(problem, route, trip_id)
            }
            InsertionStrategyKind::Tail => TailInsertionStrategy.compute_one(problem, route, trip_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::vehicle::VehicleIdx,
        solver::solution::activity::Activity,
        test_utils::{self, TestTrip},
    };

    use super::*;

    #[test]
    fn test_for_each_trip_insertion_count() {
        let problem = test_utils::create_line_problem(
            10,
            vec![test_utils::create_vehicle(0, 5.0)],
            vec![TestTrip::new(1, 2), TestTrip::new(3, 4), TestTrip::new(5, 6)],
        );
        let route = Route::empty(&problem, VehicleIdx::new(0))
            .try_insert_trip(&problem, TripIdx::new(0), 0, 1)
            .unwrap()
            .try_insert_trip(&problem, TripIdx::new(1), 2, 3)
            .unwrap();

        let mut count = 0;
        for_each_trip_insertion(&route, TripIdx::new(2), |insertion| {
            assert!(insertion.pickup_position < insertion.delivery_position);
            count += 1;
        });

        // (n + 1)(n + 2) / 2 with n = 4
        assert_eq!(count, 15);
    }

    #[test]
    fn test_intensive_on_empty_route() {
        let problem = test_utils::create_line_problem(
            10,
            vec![test_utils::create_vehicle(0, 5.0)],
            vec![TestTrip::new(1, 2)],
        );
        let route = Route::empty(&problem, VehicleIdx::new(0));

        let routes = IntensiveInsertionStrategy.compute_one(&problem, &route, TripIdx::new(0));

        assert_eq!(routes.len(), 1);
        assert_eq!(
            routes[0].activities(),
            &[
                Activity::Pickup(TripIdx::new(0)),
                Activity::Delivery(TripIdx::new(0))
            ]
        );
    }

    #[test]
    fn test_intensive_keeps_only_feasible_candidates() {
        let problem = test_utils::create_line_problem(
            10,
            vec![test_utils::create_vehicle(0, 1.0)],
            vec![TestTrip::new(1, 2), TestTrip::new(3, 4)],
        );
        let route = Route::empty(&problem, VehicleIdx::new(0))
            .try_insert_trip(&problem, TripIdx::new(0), 0, 1)
            .unwrap();

        // With a capacity of one, the trips cannot overlap
        let routes = IntensiveInsertionStrategy.compute_one(&problem, &route, TripIdx::new(1));

        assert_eq!(routes.len(), 2);
        for candidate in &routes {
            assert!(candidate.max_load() <= 1.0);
            assert_eq!(candidate.most_recent_trip(), Some(TripIdx::new(1)));
        }
    }

    #[test]
    fn test_tail() {
        let problem = test_utils::create_line_problem(
            10,
            vec![test_utils::create_vehicle(0, 5.0)],
            vec![TestTrip::new(1, 2), TestTrip::new(3, 4)],
        );
        let route = Route::empty(&problem, VehicleIdx::new(0))
            .try_insert_trip(&problem, TripIdx::new(0), 0, 1)
            .unwrap();

        let routes = InsertionStrategyKind::Tail.compute(
            &problem,
            &route,
            &[TripIdx::new(0), TripIdx::new(1)],
        );

        assert_eq!(routes.len(), 1);
        assert_eq!(
            routes[0].activities(),
            &[
                Activity::Pickup(TripIdx::new(0)),
                Activity::Delivery(TripIdx::new(0)),
                Activity::Pickup(TripIdx::new(1)),
                Activity::Delivery(TripIdx::new(1)),
            ]
        );
    }

    #[test]
    fn test_compute_over_several_trips() {
        let problem = test_utils::create_line_problem(
            10,
            vec![test_utils::create_vehicle(0, 5.0)],
            vec![TestTrip::new(1, 2), TestTrip::new(3, 4)],
        );
        let route = Route::empty(&problem, VehicleIdx::new(0));

        let routes = InsertionStrategyKind::Intensive.compute(
            &problem,
            &route,
            &[TripIdx::new(0), TripIdx::new(1)],
        );

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].most_recent_trip(), Some(TripIdx::new(0)));
        assert_eq!(routes[1].most_recent_trip(), Some(TripIdx::new(1)));
    }
}
