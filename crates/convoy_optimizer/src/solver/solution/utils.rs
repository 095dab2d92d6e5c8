use fxhash::FxHashMap;
use jiff::{SignedDuration, Timestamp};

use crate::problem::{
    location::LocationIdx,
    service::Service,
    travel_cost_matrix::Distance,
    trip::TripIdx,
    vehicle::VehicleIdx,
    vehicle_routing_problem::VehicleRoutingProblem,
};

use super::activity::{Activity, ActivitySchedule};

/// Timing and cost of a feasible sequence of activities.
#[derive(Debug, Clone)]
pub(crate) struct RouteSchedule {
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub distance: Distance,
    pub activities: Vec<ActivitySchedule>,
}

/// Departure from the vehicle origin, the vehicle leaves as soon as it is available.
pub(crate) fn compute_vehicle_start(
    problem: &VehicleRoutingProblem,
    vehicle_id: VehicleIdx,
) -> Timestamp {
    let vehicle = problem.vehicle(vehicle_id);
    vehicle.earliest_start_time() + vehicle.origin().duration()
}

pub(crate) fn compute_activity_arrival_time(
    problem: &VehicleRoutingProblem,
    previous_location_id: LocationIdx,
    previous_departure_time: Timestamp,
    location_id: LocationIdx,
) -> Timestamp {
    previous_departure_time + problem.travel_time(previous_location_id, location_id)
}

/// Service start at `service`, `None` when the arrival is past the end of its window.
pub(crate) fn compute_service_start(service: &Service, arrival_time: Timestamp) -> Option<Timestamp> {
    let service_start = service.time_window().service_start(arrival_time);
    service
        .time_window()
        .is_satisfied(service_start)
        .then_some(service_start)
}

pub(crate) fn compute_departure_time(service: &Service, service_start: Timestamp) -> Timestamp {
    service_start + service.duration()
}

/// End of the route: after serving the vehicle destination when it has one,
/// otherwise at the last departure.
pub(crate) fn compute_vehicle_end(
    problem: &VehicleRoutingProblem,
    vehicle_id: VehicleIdx,
    last_location_id: LocationIdx,
    last_departure_time: Timestamp,
) -> Option<(Timestamp, Distance)> {
    match problem.vehicle(vehicle_id).destination() {
        Some(destination) => {
            let arrival_time = compute_activity_arrival_time(
                problem,
                last_location_id,
                last_departure_time,
                destination.location_id(),
            );
            let service_start = compute_service_start(destination, arrival_time)?;
            Some((
                compute_departure_time(destination, service_start),
                problem.travel_distance(last_location_id, destination.location_id()),
            ))
        }
        None => Some((last_departure_time, 0.0)),
    }
}

/// Simulates `activities` on the vehicle and returns the schedule, or `None`
/// as soon as a time window, the capacity, a ride timeout or the vehicle
/// timeout is violated, or a delivery precedes its pickup.
pub(crate) fn compute_schedule(
    problem: &VehicleRoutingProblem,
    vehicle_id: VehicleIdx,
    activities: &[Activity],
) -> Option<RouteSchedule> {
    let vehicle = problem.vehicle(vehicle_id);
    let start_time = compute_vehicle_start(problem, vehicle_id);

    let mut schedules = Vec::with_capacity(activities.len());
    let mut pickup_departures: FxHashMap<TripIdx, Timestamp> = FxHashMap::default();
    let mut location_id = vehicle.origin().location_id();
    let mut departure_time = start_time;
    let mut distance = 0.0;
    let mut load = 0.0;

    for activity in activities {
        let trip = problem.trip(activity.trip_id());
        let service = activity.service(trip);

        let arrival_time = compute_activity_arrival_time(
            problem,
            location_id,
            departure_time,
            service.location_id(),
        );
        let service_start = compute_service_start(service, arrival_time)?;

        match activity {
            Activity::Pickup(trip_id) => {
                load += trip.load();
                if !vehicle.can_carry(load) {
                    return None;
                }
                pickup_departures.insert(*trip_id, compute_departure_time(service, service_start));
            }
            Activity::Delivery(trip_id) => {
                let pickup_departure = pickup_departures.remove(trip_id)?;
                if !trip.is_ride_satisfied(service_start.duration_since(pickup_departure)) {
                    return None;
                }
                load -= trip.load();
            }
        }

        distance += problem.travel_distance(location_id, service.location_id());
        departure_time = compute_departure_time(service, service_start);
        location_id = service.location_id();

        schedules.push(ActivitySchedule {
            arrival_time,
            service_start,
            departure_time,
            load,
        });
    }

    // A pickup without its delivery
    if !pickup_departures.is_empty() {
        return None;
    }

    let (end_time, return_distance) =
        compute_vehicle_end(problem, vehicle_id, location_id, departure_time)?;

    if let Some(timeout) = vehicle.timeout()
        && !activities.is_empty()
        && end_time.duration_since(start_time) > timeout
    {
        return None;
    }

    Some(RouteSchedule {
        start_time,
        end_time,
        distance: distance + return_distance,
        activities: schedules,
    })
}

pub(crate) fn compute_waiting_duration(schedule: &ActivitySchedule) -> SignedDuration {
    schedule.service_start.duration_since(schedule.arrival_time)
}
