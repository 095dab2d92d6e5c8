use std::{borrow::Borrow, cmp::Ordering};

use serde::{Deserialize, Serialize};

use super::{
    score::Score,
    solution::{planning::Planning, route::Route},
};

/// Objective used to rank candidate routes and compare plannings; lower scores are better.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// Total time the vehicles spend on their routes
    #[default]
    ShortestTime,

    /// Total travelled distance
    ShortestDistance,

    /// Time at which the last vehicle finishes its route
    EarliestLastDeparture,
}

impl Criterion {
    pub fn route_score(&self, route: &Route) -> Score {
        match self {
            Criterion::ShortestTime => Score::new(route.duration().as_secs_f64()),
            Criterion::ShortestDistance => Score::new(route.distance()),
            Criterion::EarliestLastDeparture => {
                Score::new(route.end_time().as_millisecond() as f64 / 1000.0)
            }
        }
    }

    /// Aggregates the scores of loaded routes.
    pub fn routes_score<'a>(&self, routes: impl IntoIterator<Item = &'a Route>) -> Score {
        let scores = routes
            .into_iter()
            .filter(|route| route.is_loaded())
            .map(|route| self.route_score(route));

        match self {
            Criterion::ShortestTime | Criterion::ShortestDistance => scores.sum(),
            Criterion::EarliestLastDeparture => scores.fold(Score::ZERO, Score::max),
        }
    }

    pub fn planning_score(&self, planning: &Planning) -> Score {
        self.routes_score(planning.routes())
    }

    /// Total order on routes: score, then vehicle, then activity sequence.
    pub fn compare(&self, a: &Route, b: &Route) -> Ordering {
        self.route_score(a)
            .cmp(&self.route_score(b))
            .then_with(|| a.vehicle_id().cmp(&b.vehicle_id()))
            .then_with(|| a.activities().cmp(b.activities()))
    }

    pub fn best<'a>(&self, a: &'a Route, b: &'a Route) -> &'a Route {
        match self.compare(a, b) {
            Ordering::Greater => b,
            Ordering::Less | Ordering::Equal => a,
        }
    }

    pub fn is_better(&self, candidate: &Route, reference: &Route) -> bool {
        self.compare(candidate, reference) == Ordering::Less
    }

    /// Sorts routes from best to worst.
    pub fn sort<R: Borrow<Route>>(&self, routes: &mut [R]) {
        routes.sort_by(|a, b| self.compare(a.borrow(), b.borrow()));
    }

    /// `candidate` is strictly better than `incumbent`.
    pub fn is_improvement(&self, candidate: &Planning, incumbent: &Planning) -> bool {
        self.planning_score(candidate)
            .improves_on(&self.planning_score(incumbent))
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Criterion::ShortestTime => write!(f, "shortest_time"),
            Criterion::ShortestDistance => write!(f, "shortest_distance"),
            Criterion::EarliestLastDeparture => write!(f, "earliest_last_departure"),
        }
    }
}
