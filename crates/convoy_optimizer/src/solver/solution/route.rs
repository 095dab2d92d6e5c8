use fxhash::{FxHashMap, FxHashSet};
use jiff::{SignedDuration, Timestamp};
use serde::Serialize;

use crate::problem::{
    travel_cost_matrix::Distance, trip::TripIdx, vehicle::VehicleIdx,
    vehicle_routing_problem::VehicleRoutingProblem,
};

use super::{
    activity::{Activity, ActivitySchedule},
    planned_trip::PlannedTrip,
    utils::{
        RouteSchedule, compute_schedule, compute_vehicle_end, compute_vehicle_start,
        compute_waiting_duration,
    },
};

/// Ordered activities of one vehicle together with their schedule.
///
/// A route is only ever built from a feasible sequence, so every route held by
/// a planning satisfies precedence, capacity, time windows and timeouts.
#[derive(Serialize, Debug, Clone)]
pub struct Route {
    vehicle_id: VehicleIdx,
    activities: Vec<Activity>,
    schedule: Vec<ActivitySchedule>,

    #[serde(skip)]
    trips: FxHashSet<TripIdx>,

    start_time: Timestamp,
    end_time: Timestamp,
    distance: Distance,

    /// Trip inserted last to produce this route
    most_recent: Option<TripIdx>,
}

impl Route {
    pub fn empty(problem: &VehicleRoutingProblem, vehicle_id: VehicleIdx) -> Self {
        let vehicle = problem.vehicle(vehicle_id);
        let start_time = compute_vehicle_start(problem, vehicle_id);
        let (end_time, distance) = compute_vehicle_end(
            problem,
            vehicle_id,
            vehicle.origin().location_id(),
            start_time,
        )
        .unwrap_or((start_time, 0.0));

        Route {
            vehicle_id,
            activities: Vec::new(),
            schedule: Vec::new(),
            trips: FxHashSet::default(),
            start_time,
            end_time,
            distance,
            most_recent: None,
        }
    }

    fn from_schedule(
        vehicle_id: VehicleIdx,
        activities: Vec<Activity>,
        schedule: RouteSchedule,
        most_recent: Option<TripIdx>,
    ) -> Self {
        let trips = activities.iter().map(Activity::trip_id).collect();
        Route {
            vehicle_id,
            activities,
            schedule: schedule.activities,
            trips,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            distance: schedule.distance,
            most_recent,
        }
    }

    pub fn vehicle_id(&self) -> VehicleIdx {
        self.vehicle_id
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn schedule(&self) -> &[ActivitySchedule] {
        &self.schedule
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn is_loaded(&self) -> bool {
        !self.is_empty()
    }

    pub fn contains_trip(&self, trip_id: TripIdx) -> bool {
        self.trips.contains(&trip_id)
    }

    /// Trips served by the route, in pickup order.
    pub fn trip_ids(&self) -> impl Iterator<Item = TripIdx> + '_ {
        self.activities
            .iter()
            .filter(|activity| activity.is_pickup())
            .map(Activity::trip_id)
    }

    pub fn trips_count(&self) -> usize {
        self.trips.len()
    }

    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    pub fn end_time(&self) -> Timestamp {
        self.end_time
    }

    /// Departure of the last activity, the vehicle start when the route is empty.
    pub fn last_departure_time(&self) -> Timestamp {
        self.schedule
            .last()
            .map(|schedule| schedule.departure_time)
            .unwrap_or(self.start_time)
    }

    pub fn duration(&self) -> SignedDuration {
        if self.is_empty() {
            return SignedDuration::ZERO;
        }

        self.end_time.duration_since(self.start_time)
    }

    pub fn distance(&self) -> Distance {
        if self.is_empty() {
            return 0.0;
        }

        self.distance
    }

    /// Time spent waiting for time windows to open.
    pub fn waiting_duration(&self) -> SignedDuration {
        self.schedule
            .iter()
            .map(compute_waiting_duration)
            .fold(SignedDuration::ZERO, |total, waiting| total + waiting)
    }

    pub fn max_load(&self) -> f64 {
        self.schedule
            .iter()
            .map(|schedule| schedule.load)
            .fold(0.0, f64::max)
    }

    pub fn most_recent_trip(&self) -> Option<TripIdx> {
        self.most_recent
    }

    pub fn most_recent_planned_trip(&self) -> Option<PlannedTrip> {
        self.most_recent
            .and_then(|trip_id| self.planned_trip(trip_id))
    }

    pub fn planned_trip(&self, trip_id: TripIdx) -> Option<PlannedTrip> {
        if !self.contains_trip(trip_id) {
            return None;
        }

        let pickup_position = self
            .activities
            .iter()
            .position(|activity| *activity == Activity::Pickup(trip_id))?;
        let delivery_position = self
            .activities
            .iter()
            .position(|activity| *activity == Activity::Delivery(trip_id))?;

        Some(self.create_planned_trip(trip_id, pickup_position, delivery_position))
    }

    /// Planned trips of the route, in pickup order.
    pub fn planned_trips(&self) -> Vec<PlannedTrip> {
        let mut delivery_positions = FxHashMap::default();
        for (position, activity) in self.activities.iter().enumerate() {
            if let Activity::Delivery(trip_id) = activity {
                delivery_positions.insert(*trip_id, position);
            }
        }

        self.activities
            .iter()
            .enumerate()
            .filter_map(|(position, activity)| match activity {
                Activity::Pickup(trip_id) => delivery_positions
                    .get(trip_id)
                    .map(|&delivery| self.create_planned_trip(*trip_id, position, delivery)),
                Activity::Delivery(_) => None,
            })
            .collect()
    }

    fn create_planned_trip(
        &self,
        trip_id: TripIdx,
        pickup_position: usize,
        delivery_position: usize,
    ) -> PlannedTrip {
        let pickup = &self.schedule[pickup_position];
        let delivery = &self.schedule[delivery_position];

        PlannedTrip {
            trip_id,
            vehicle_id: self.vehicle_id,
            pickup_position,
            delivery_position,
            pickup_arrival: pickup.arrival_time,
            pickup_departure: pickup.departure_time,
            delivery_arrival: delivery.arrival_time,
            delivery_start: delivery.service_start,
            delivery_departure: delivery.departure_time,
        }
    }

    /// Returns a new route with the trip inserted, the pickup at `pickup_position`
    /// and the delivery at `delivery_position` of the resulting sequence, or `None`
    /// when the positions are invalid or the resulting route is infeasible.
    pub fn try_insert_trip(
        &self,
        problem: &VehicleRoutingProblem,
        trip_id: TripIdx,
        pickup_position: usize,
        delivery_position: usize,
    ) -> Option<Route> {
        if self.contains_trip(trip_id)
            || pickup_position > self.len()
            || delivery_position <= pickup_position
            || delivery_position > self.len() + 1
        {
            return None;
        }

        if !problem
            .vehicle(self.vehicle_id)
            .can_carry(problem.trip(trip_id).load())
        {
            return None;
        }

        let mut activities = Vec::with_capacity(self.activities.len() + 2);
        activities.extend_from_slice(&self.activities);
        activities.insert(pickup_position, Activity::Pickup(trip_id));
        activities.insert(delivery_position, Activity::Delivery(trip_id));

        let schedule = compute_schedule(problem, self.vehicle_id, &activities)?;

        Some(Route::from_schedule(
            self.vehicle_id,
            activities,
            schedule,
            Some(trip_id),
        ))
    }

    /// Returns a new route without the trip, or `None` when the trip is not
    /// served by this route or the remaining sequence is infeasible.
    pub fn try_remove_trip(&self, problem: &VehicleRoutingProblem, trip_id: TripIdx) -> Option<Route> {
        if !self.contains_trip(trip_id) {
            return None;
        }

        let activities: Vec<Activity> = self
            .activities
            .iter()
            .filter(|activity| activity.trip_id() != trip_id)
            .copied()
            .collect();

        if activities.is_empty() {
            return Some(Route::empty(problem, self.vehicle_id));
        }

        let schedule = compute_schedule(problem, self.vehicle_id, &activities)?;
        let most_recent = self.most_recent.filter(|&recent| recent != trip_id);

        Some(Route::from_schedule(
            self.vehicle_id,
            activities,
            schedule,
            most_recent,
        ))
    }

    /// Same vehicle and same sequence of activities.
    pub fn is_identical(&self, other: &Route) -> bool {
        self.vehicle_id == other.vehicle_id && self.activities == other.activities
    }
}
