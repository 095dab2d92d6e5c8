use jiff::Timestamp;
use serde::Serialize;

use crate::problem::{service::Service, trip::Trip, trip::TripIdx};

/// A stop of a route: picking up or dropping off the load of a trip.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Activity {
    Pickup(TripIdx),
    Delivery(TripIdx),
}

impl Activity {
    pub fn trip_id(&self) -> TripIdx {
        match self {
            Activity::Pickup(trip_id) | Activity::Delivery(trip_id) => *trip_id,
        }
    }

    pub fn is_pickup(&self) -> bool {
        matches!(self, Activity::Pickup(_))
    }

    pub fn service<'a>(&self, trip: &'a Trip) -> &'a Service {
        match self {
            Activity::Pickup(_) => trip.origin(),
            Activity::Delivery(_) => trip.destination(),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ActivitySchedule {
    pub arrival_time: Timestamp,
    pub service_start: Timestamp,
    pub departure_time: Timestamp,

    /// Load on board after the activity
    pub load: f64,
}
