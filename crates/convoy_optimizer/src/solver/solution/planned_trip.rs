use jiff::{SignedDuration, Timestamp};
use serde::Serialize;

use crate::problem::{trip::TripIdx, vehicle::VehicleIdx};

/// Where and when a trip is served inside a route.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PlannedTrip {
    pub trip_id: TripIdx,
    pub vehicle_id: VehicleIdx,

    /// Position of the pickup in the route activities
    pub pickup_position: usize,

    /// Position of the delivery in the route activities, always after the pickup
    pub delivery_position: usize,

    pub pickup_arrival: Timestamp,
    pub pickup_departure: Timestamp,
    pub delivery_arrival: Timestamp,
    pub delivery_start: Timestamp,
    pub delivery_departure: Timestamp,
}

impl PlannedTrip {
    /// Time spent on board, from leaving the origin to the start of the drop-off.
    pub fn ride_duration(&self) -> SignedDuration {
        self.delivery_start.duration_since(self.pickup_departure)
    }

    pub fn duration(&self) -> SignedDuration {
        self.delivery_departure.duration_since(self.pickup_arrival)
    }
}
