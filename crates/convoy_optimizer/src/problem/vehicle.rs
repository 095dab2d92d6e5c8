use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::define_index_newtype;

use super::service::{Service, ServiceBuilder};

define_index_newtype!(VehicleIdx, Vehicle);

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Vehicle {
    external_id: String,
    capacity: f64,

    /// Where the vehicle starts; its time window is the availability start
    origin: Service,

    /// Where the vehicle must end; `None` means the route ends at the last delivery
    destination: Option<Service>,

    /// Maximum duration between leaving the origin and finishing the route
    timeout: Option<SignedDuration>,
}

impl Vehicle {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn origin(&self) -> &Service {
        &self.origin
    }

    pub fn destination(&self) -> Option<&Service> {
        self.destination.as_ref()
    }

    pub fn timeout(&self) -> Option<SignedDuration> {
        self.timeout
    }

    pub fn earliest_start_time(&self) -> Timestamp {
        self.origin
            .time_window()
            .start()
            .unwrap_or(Timestamp::UNIX_EPOCH)
    }

    pub fn can_carry(&self, load: f64) -> bool {
        load <= self.capacity
    }

    /// Two vehicles are interchangeable when an empty route on one is
    /// equivalent to an empty route on the other.
    pub fn is_interchangeable_with(&self, other: &Vehicle) -> bool {
        self.capacity == other.capacity
            && self.origin == other.origin
            && self.destination == other.destination
            && self.timeout == other.timeout
    }
}

#[derive(Default)]
pub struct VehicleBuilder {
    external_id: Option<String>,
    capacity: Option<f64>,
    origin: Option<Service>,
    destination: Option<Service>,
    timeout: Option<SignedDuration>,
}

impl VehicleBuilder {
    pub fn set_vehicle_id(&mut self, external_id: String) -> &mut VehicleBuilder {
        self.external_id = Some(external_id);
        self
    }

    pub fn set_capacity(&mut self, capacity: f64) -> &mut VehicleBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_origin(&mut self, origin: Service) -> &mut VehicleBuilder {
        self.origin = Some(origin);
        self
    }

    pub fn set_destination(&mut self, destination: Service) -> &mut VehicleBuilder {
        self.destination = Some(destination);
        self
    }

    pub fn set_timeout(&mut self, timeout: SignedDuration) -> &mut VehicleBuilder {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Vehicle {
        Vehicle {
            external_id: self.external_id.unwrap_or_default(),
            capacity: self.capacity.unwrap_or(1.0),
            origin: self
                .origin
                .unwrap_or_else(|| ServiceBuilder::default().build()),
            destination: self.destination,
            timeout: self.timeout,
        }
    }
}
