use jiff::SignedDuration;

use crate::problem::location::LocationIdx;

use super::{location::Location, vehicle_routing_problem::ProblemError};

pub type Distance = f64;
pub type Time = f64;

const DEFAULT_SPEED_METERS_PER_SECOND: f64 = 50.0 / 3.6;

/// Flat distance and travel-time matrices between locations.
/// The value for a pair is stored at `from * num_locations + to`.
#[derive(Debug, Clone)]
pub struct TravelMatrices {
    distances: Vec<Distance>,
    times: Vec<Time>,
    num_locations: usize,
    is_symmetric: bool,
}

fn is_flat_matrix_symmetric(matrix: &[f64], num_locations: usize) -> bool {
    (0..num_locations).all(|i| {
        (i + 1..num_locations)
            .all(|j| matrix[i * num_locations + j] == matrix[j * num_locations + i])
    })
}

impl TravelMatrices {
    /// Times are expressed in seconds.
    pub fn new(distances: Vec<Vec<Distance>>, times: Vec<Vec<Time>>) -> Result<Self, ProblemError> {
        let num_locations = distances.len();

        let is_square = |matrix: &Vec<Vec<f64>>| {
            matrix.len() == num_locations && matrix.iter().all(|row| row.len() == num_locations)
        };

        if !is_square(&distances) || !is_square(&times) {
            return Err(ProblemError::TravelMatricesSizeMismatch {
                expected: num_locations,
            });
        }

        let distances: Vec<Distance> = distances.into_iter().flatten().collect();
        let times: Vec<Time> = times.into_iter().flatten().collect();
        let is_symmetric = is_flat_matrix_symmetric(&distances, num_locations);

        Ok(TravelMatrices {
            distances,
            times,
            num_locations,
            is_symmetric,
        })
    }

    /// Straight-line distances, travelled at one distance unit per second.
    pub fn from_euclidean(locations: &[Location]) -> Self {
        let num_locations = locations.len();
        let mut distances: Vec<Distance> = vec![0.0; num_locations * num_locations];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                distances[i * num_locations + j] = from.euclidean_distance(to);
            }
        }

        TravelMatrices {
            times: distances.clone(),
            distances,
            num_locations,
            is_symmetric: true,
        }
    }

    /// Great-circle distances in meters, travelled at 50 km/h.
    pub fn from_haversine(locations: &[Location]) -> Self {
        let num_locations = locations.len();
        let mut distances: Vec<Distance> = vec![0.0; num_locations * num_locations];
        let mut times: Vec<Time> = vec![0.0; num_locations * num_locations];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                let index = i * num_locations + j;
                distances[index] = from.haversine_distance(to);
                times[index] = distances[index] / DEFAULT_SPEED_METERS_PER_SECOND;
            }
        }

        TravelMatrices {
            distances,
            times,
            num_locations,
            is_symmetric: true,
        }
    }

    #[cfg(test)]
    pub fn from_constant(num_locations: usize, time: Time, distance: Distance) -> Self {
        TravelMatrices {
            distances: vec![distance; num_locations * num_locations],
            times: vec![time; num_locations * num_locations],
            num_locations,
            is_symmetric: true,
        }
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    #[inline(always)]
    pub fn travel_distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        if from == to {
            return 0.0;
        }

        self.distances[self.index(from, to)]
    }

    #[inline(always)]
    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> SignedDuration {
        if from == to {
            return SignedDuration::ZERO;
        }

        SignedDuration::from_secs_f64(self.times[self.index(from, to)])
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }
}
