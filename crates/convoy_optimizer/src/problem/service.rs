use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use super::{location::LocationIdx, time_window::TimeWindow};

/// A visit at a location: when it may start and how long it takes.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Service {
    location_id: LocationIdx,
    time_window: TimeWindow,
    duration: SignedDuration,
}

impl Service {
    pub fn new(location_id: LocationIdx, time_window: TimeWindow, duration: SignedDuration) -> Self {
        Service {
            location_id,
            time_window,
            duration,
        }
    }

    pub fn location_id(&self) -> LocationIdx {
        self.location_id
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    pub fn duration(&self) -> SignedDuration {
        self.duration
    }

    pub fn has_time_window(&self) -> bool {
        !self.time_window.is_empty()
    }
}

#[derive(Default)]
pub struct ServiceBuilder {
    location_id: Option<LocationIdx>,
    time_window: Option<TimeWindow>,
    duration: Option<SignedDuration>,
}

impl ServiceBuilder {
    pub fn set_location_id(&mut self, location_id: usize) -> &mut ServiceBuilder {
        self.location_id = Some(LocationIdx::new(location_id));
        self
    }

    pub fn set_time_window(&mut self, time_window: TimeWindow) -> &mut ServiceBuilder {
        self.time_window = Some(time_window);
        self
    }

    pub fn set_duration(&mut self, duration: SignedDuration) -> &mut ServiceBuilder {
        self.duration = Some(duration);
        self
    }

    /// A service without location defaults to the first location.
    pub fn build(self) -> Service {
        Service {
            location_id: self.location_id.unwrap_or_default(),
            time_window: self.time_window.unwrap_or_default(),
            duration: self.duration.unwrap_or(SignedDuration::ZERO),
        }
    }
}
