use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};

use crate::problem::{
    location::Location,
    service::{Service, ServiceBuilder},
    time_window::TimeWindow,
    trip::{Trip, TripBuilder},
    vehicle::{Vehicle, VehicleBuilder},
    vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
};

pub fn create_location_grid(rows: usize, cols: usize) -> Vec<Location> {
    let mut locations = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            locations.push(Location::from_cartesian(j as f64, i as f64));
        }
    }
    locations
}

/// Seconds since the epoch.
pub fn at(seconds: i64) -> Timestamp {
    Timestamp::from_second(seconds).unwrap()
}

pub fn window(start: Option<i64>, end: Option<i64>) -> TimeWindow {
    TimeWindow::new(start.map(at), end.map(at))
}

pub fn create_service(location_id: usize, time_window: TimeWindow) -> Service {
    let mut builder = ServiceBuilder::default();
    builder
        .set_location_id(location_id)
        .set_time_window(time_window);
    builder.build()
}

pub fn create_vehicle(location_id: usize, capacity: f64) -> Vehicle {
    let mut builder = VehicleBuilder::default();
    builder
        .set_capacity(capacity)
        .set_origin(create_service(location_id, TimeWindow::UNBOUNDED));
    builder.build()
}

pub fn create_vehicle_with_destination(
    location_id: usize,
    capacity: f64,
    destination_id: usize,
) -> Vehicle {
    let mut builder = VehicleBuilder::default();
    builder
        .set_capacity(capacity)
        .set_origin(create_service(location_id, TimeWindow::UNBOUNDED))
        .set_destination(create_service(destination_id, TimeWindow::UNBOUNDED));
    builder.build()
}

pub fn create_vehicle_available_until(location_id: usize, capacity: f64, end: i64) -> Vehicle {
    let mut builder = VehicleBuilder::default();
    builder
        .set_capacity(capacity)
        .set_origin(create_service(location_id, TimeWindow::UNBOUNDED))
        .set_destination(create_service(location_id, window(None, Some(end))));
    builder.build()
}

pub fn create_vehicle_starting_at(location_id: usize, capacity: f64, start: i64) -> Vehicle {
    let mut builder = VehicleBuilder::default();
    builder
        .set_capacity(capacity)
        .set_origin(create_service(location_id, window(Some(start), None)));
    builder.build()
}

pub fn create_vehicle_with_timeout(
    location_id: usize,
    capacity: f64,
    timeout: SignedDuration,
) -> Vehicle {
    let mut builder = VehicleBuilder::default();
    builder
        .set_capacity(capacity)
        .set_origin(create_service(location_id, TimeWindow::UNBOUNDED))
        .set_timeout(timeout);
    builder.build()
}

/// Trip description used by tests, loads one unit by default.
pub struct TestTrip {
    origin: Service,
    destination: Service,
    load: f64,
    timeout: Option<SignedDuration>,
}

impl TestTrip {
    pub fn new(origin_id: usize, destination_id: usize) -> Self {
        TestTrip {
            origin: create_service(origin_id, TimeWindow::UNBOUNDED),
            destination: create_service(destination_id, TimeWindow::UNBOUNDED),
            load: 1.0,
            timeout: None,
        }
    }

    pub fn with_origin(mut self, origin: Service) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_destination(mut self, destination: Service) -> Self {
        self.destination = destination;
        self
    }

    pub fn with_load(mut self, load: f64) -> Self {
        self.load = load;
        self
    }

    pub fn with_timeout(mut self, timeout: SignedDuration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self, index: usize) -> Trip {
        let mut builder = TripBuilder::default();
        builder
            .set_external_id(format!("trip-{index}"))
            .set_origin(self.origin)
            .set_destination(self.destination)
            .set_load(self.load);
        if let Some(timeout) = self.timeout {
            builder.set_timeout(timeout);
        }
        builder.build()
    }
}

/// Locations on a line, one unit apart; travelling one unit takes one second.
pub fn create_line_problem(
    size: usize,
    vehicles: Vec<Vehicle>,
    trips: Vec<TestTrip>,
) -> VehicleRoutingProblem {
    create_problem(create_location_grid(1, size), vehicles, trips)
}

pub fn create_problem(
    locations: Vec<Location>,
    vehicles: Vec<Vehicle>,
    trips: Vec<TestTrip>,
) -> VehicleRoutingProblem {
    let trips = trips
        .into_iter()
        .enumerate()
        .map(|(index, trip)| trip.build(index))
        .collect();

    let mut builder = VehicleRoutingProblemBuilder::default();
    builder
        .set_locations(locations)
        .set_vehicles(vehicles)
        .set_trips(trips);
    builder.build().unwrap()
}

/// Random trips on a grid, with a homogeneous fleet at the first location.
pub fn create_random_problem(
    rows: usize,
    cols: usize,
    num_vehicles: usize,
    num_trips: usize,
    seed: u64,
) -> Arc<VehicleRoutingProblem> {
    use rand::{Rng, SeedableRng, rngs::SmallRng};

    let mut rng = SmallRng::seed_from_u64(seed);
    let num_locations = rows * cols;

    let vehicles = (0..num_vehicles)
        .map(|_| create_vehicle(0, 3.0))
        .collect();
    let trips = (0..num_trips)
        .map(|_| {
            let origin = rng.random_range(0..num_locations);
            let destination = rng.random_range(0..num_locations);
            TestTrip::new(origin, destination)
        })
        .collect();

    Arc::new(create_problem(
        create_location_grid(rows, cols),
        vehicles,
        trips,
    ))
}
