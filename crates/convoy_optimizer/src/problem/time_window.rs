use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Interval in which a service is allowed to start. An open bound is unconstrained.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    start: Option<Timestamp>,
    end: Option<Timestamp>,
}

impl TimeWindow {
    pub const UNBOUNDED: TimeWindow = TimeWindow {
        start: None,
        end: None,
    };

    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        TimeWindow { start, end }
    }

    pub fn from_iso(start: Option<&str>, end: Option<&str>) -> Result<Self, jiff::Error> {
        let start = start.map(str::parse::<Timestamp>).transpose()?;
        let end = end.map(str::parse::<Timestamp>).transpose()?;
        Ok(TimeWindow { start, end })
    }

    pub fn start(&self) -> Option<Timestamp> {
        self.start
    }

    pub fn end(&self) -> Option<Timestamp> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn is_satisfied(&self, service_start: Timestamp) -> bool {
        match self.end {
            Some(end) => service_start <= end,
            None => true,
        }
    }

    /// Earliest moment service can begin when arriving at `arrival`.
    pub fn service_start(&self, arrival: Timestamp) -> Timestamp {
        match self.start {
            Some(start) => arrival.max(start),
            None => arrival,
        }
    }

    pub fn waiting_duration(&self, arrival: Timestamp) -> SignedDuration {
        self.service_start(arrival).duration_since(arrival)
    }
}

#[derive(Default)]
pub struct TimeWindowBuilder {
    start: Option<Timestamp>,
    end: Option<Timestamp>,
}

impl TimeWindowBuilder {
    pub fn with_start(mut self, start: Timestamp) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: Timestamp) -> Self {
        self.end = Some(end);
        self
    }

    pub fn build(self) -> TimeWindow {
        TimeWindow {
            start: self.start,
            end: self.end,
        }
    }
}
