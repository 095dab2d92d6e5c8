use jiff::SignedDuration;
use thiserror::Error;

use crate::solver::criterion::Criterion;

use super::{
    fleet::Fleet,
    job::Job,
    location::{Location, LocationIdx},
    service::Service,
    travel_cost_matrix::{Distance, TravelMatrices},
    trip::{Trip, TripIdx},
    vehicle::{Vehicle, VehicleIdx},
};

#[derive(Debug, Error, PartialEq)]
pub enum ProblemError {
    #[error("The fleet has no vehicle")]
    EmptyFleet,

    #[error("The job has no trip")]
    EmptyJob,

    #[error("No location was provided")]
    MissingLocations,

    #[error("Location {location} is referenced by {owner} but only {count} locations exist")]
    UnknownLocation {
        owner: String,
        location: LocationIdx,
        count: usize,
    },

    #[error("Travel matrices must be square with {expected} rows")]
    TravelMatricesSizeMismatch { expected: usize },
}

/// Everything a run needs: where things are, how long it takes to move
/// between them, which vehicles are available and which trips to serve.
#[derive(Debug, Clone)]
pub struct VehicleRoutingProblem {
    locations: Vec<Location>,
    fleet: Fleet,
    job: Job,
    travel_matrices: TravelMatrices,
}

impl VehicleRoutingProblem {
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        self.fleet.vehicles()
    }

    #[inline]
    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        self.fleet.vehicle(vehicle_id)
    }

    pub fn trips(&self) -> &[Trip] {
        self.job.trips()
    }

    #[inline]
    pub fn trip(&self, trip_id: TripIdx) -> &Trip {
        self.job.trip(trip_id)
    }

    pub fn objective(&self) -> Criterion {
        self.job.objective()
    }

    #[inline]
    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> SignedDuration {
        self.travel_matrices.travel_time(from, to)
    }

    #[inline]
    pub fn travel_distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        self.travel_matrices.travel_distance(from, to)
    }

    pub fn travel_matrices(&self) -> &TravelMatrices {
        &self.travel_matrices
    }
}

#[derive(Default)]
pub struct VehicleRoutingProblemBuilder {
    locations: Option<Vec<Location>>,
    vehicles: Option<Vec<Vehicle>>,
    trips: Option<Vec<Trip>>,
    objective: Option<Criterion>,
    travel_matrices: Option<TravelMatrices>,
}

impl VehicleRoutingProblemBuilder {
    pub fn set_locations(&mut self, locations: Vec<Location>) -> &mut VehicleRoutingProblemBuilder {
        self.locations = Some(locations);
        self
    }

    pub fn add_location(&mut self, location: Location) -> &mut VehicleRoutingProblemBuilder {
        self.locations.get_or_insert_with(Vec::new).push(location);
        self
    }

    pub fn set_vehicles(&mut self, vehicles: Vec<Vehicle>) -> &mut VehicleRoutingProblemBuilder {
        self.vehicles = Some(vehicles);
        self
    }

    pub fn set_trips(&mut self, trips: Vec<Trip>) -> &mut VehicleRoutingProblemBuilder {
        self.trips = Some(trips);
        self
    }

    pub fn set_objective(&mut self, objective: Criterion) -> &mut VehicleRoutingProblemBuilder {
        self.objective = Some(objective);
        self
    }

    /// Defaults to Euclidean matrices computed from the locations.
    pub fn set_travel_matrices(
        &mut self,
        travel_matrices: TravelMatrices,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.travel_matrices = Some(travel_matrices);
        self
    }

    pub fn build(self) -> Result<VehicleRoutingProblem, ProblemError> {
        let locations = self.locations.unwrap_or_default();
        let vehicles = self.vehicles.unwrap_or_default();
        let trips = self.trips.unwrap_or_default();

        if locations.is_empty() {
            return Err(ProblemError::MissingLocations);
        }

        if vehicles.is_empty() {
            return Err(ProblemError::EmptyFleet);
        }

        if trips.is_empty() {
            return Err(ProblemError::EmptyJob);
        }

        let count = locations.len();
        let check = |owner: String, service: &Service| {
            if service.location_id().get() >= count {
                Err(ProblemError::UnknownLocation {
                    owner,
                    location: service.location_id(),
                    count,
                })
            } else {
                Ok(())
            }
        };

        for vehicle in &vehicles {
            check(format!("vehicle {}", vehicle.external_id()), vehicle.origin())?;
            if let Some(destination) = vehicle.destination() {
                check(format!("vehicle {}", vehicle.external_id()), destination)?;
            }
        }

        for trip in &trips {
            check(format!("trip {}", trip.external_id()), trip.origin())?;
            check(format!("trip {}", trip.external_id()), trip.destination())?;
        }

        let travel_matrices = match self.travel_matrices {
            Some(travel_matrices) => {
                if travel_matrices.num_locations() != count {
                    return Err(ProblemError::TravelMatricesSizeMismatch { expected: count });
                }
                travel_matrices
            }
            None => TravelMatrices::from_euclidean(&locations),
        };

        Ok(VehicleRoutingProblem {
            locations,
            fleet: Fleet::new(vehicles),
            job: Job::new(trips).with_objective(self.objective.unwrap_or_default()),
            travel_matrices,
        })
    }
}
