use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::define_index_newtype;

use super::service::{Service, ServiceBuilder};

define_index_newtype!(TripIdx, Trip);

/// A request to carry `load` from `origin` to `destination`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Trip {
    external_id: String,
    origin: Service,
    destination: Service,
    load: f64,

    /// Maximum ride duration between the end of the pickup and the start of the delivery
    timeout: Option<SignedDuration>,
}

impl Trip {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn origin(&self) -> &Service {
        &self.origin
    }

    pub fn destination(&self) -> &Service {
        &self.destination
    }

    pub fn load(&self) -> f64 {
        self.load
    }

    pub fn timeout(&self) -> Option<SignedDuration> {
        self.timeout
    }

    pub fn is_ride_satisfied(&self, ride_duration: SignedDuration) -> bool {
        match self.timeout {
            Some(timeout) => ride_duration <= timeout,
            None => true,
        }
    }
}

#[derive(Default)]
pub struct TripBuilder {
    external_id: Option<String>,
    origin: Option<Service>,
    destination: Option<Service>,
    load: Option<f64>,
    timeout: Option<SignedDuration>,
}

impl TripBuilder {
    pub fn set_external_id(&mut self, external_id: String) -> &mut TripBuilder {
        self.external_id = Some(external_id);
        self
    }

    pub fn set_origin(&mut self, origin: Service) -> &mut TripBuilder {
        self.origin = Some(origin);
        self
    }

    pub fn set_destination(&mut self, destination: Service) -> &mut TripBuilder {
        self.destination = Some(destination);
        self
    }

    pub fn set_load(&mut self, load: f64) -> &mut TripBuilder {
        self.load = Some(load);
        self
    }

    pub fn set_timeout(&mut self, timeout: SignedDuration) -> &mut TripBuilder {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Trip {
        Trip {
            external_id: self.external_id.unwrap_or_default(),
            origin: self.origin.unwrap_or_else(|| ServiceBuilder::default().build()),
            destination: self.destination.unwrap_or_else(|| ServiceBuilder::default().build()),
            load: self.load.unwrap_or(0.0),
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let mut origin = ServiceBuilder::default();
        origin.set_location_id(1);
        let mut destination = ServiceBuilder::default();
        destination.set_location_id(2);

        let mut builder = TripBuilder::default();
        builder
            .set_external_id(String::from("trip"))
            .set_origin(origin.build())
            .set_destination(destination.build())
            .set_load(2.0)
            .set_timeout(SignedDuration::from_mins(45));
        let trip = builder.build();

        assert_eq!(trip.external_id(), "trip");
        assert_eq!(trip.origin().location_id().get(), 1);
        assert_eq!(trip.destination().location_id().get(), 2);
        assert_eq!(trip.load(), 2.0);
        assert!(trip.is_ride_satisfied(SignedDuration::from_mins(45)));
        assert!(!trip.is_ride_satisfied(SignedDuration::from_mins(46)));
    }
}
