use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::problem::vehicle_routing_problem::VehicleRoutingProblem;

use super::{criterion::Criterion, insertion::InsertionStrategyKind, solver_error::SolverError};

/// How candidate routes are produced and ranked.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(default)]
pub struct InsertionParams {
    pub strategy: InsertionStrategyKind,

    /// Falls back to the objective of the problem
    pub criterion: Option<Criterion>,
}

impl InsertionParams {
    pub fn criterion(&self, problem: &VehicleRoutingProblem) -> Criterion {
        self.criterion.unwrap_or_else(|| problem.objective())
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct RankingParams {
    /// Maximum number of pending trips considered per route, `None` for all of them
    pub neighborhood_max_size: Option<usize>,

    /// Size of the short-list the next planned trip is drawn from
    pub randomized_size: usize,

    pub seed: u64,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self {
            neighborhood_max_size: Some(250),
            randomized_size: 3,
            seed: 56,
        }
    }
}

impl RankingParams {
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.randomized_size == 0 {
            return Err(SolverError::InvalidParams(String::from(
                "randomized_size must be at least 1",
            )));
        }

        if self.neighborhood_max_size == Some(0) {
            return Err(SolverError::InvalidParams(String::from(
                "neighborhood_max_size must be at least 1",
            )));
        }

        Ok(())
    }

    /// Neighborhood size clamped to the number of trips.
    pub fn neighborhood_size(&self, num_trips: usize) -> usize {
        self.neighborhood_max_size
            .map_or(num_trips, |size| size.min(num_trips))
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct LocalSearchParams {
    /// Upper bound on the number of improving passes over the trips
    pub max_passes: usize,
}

impl Default for LocalSearchParams {
    fn default() -> Self {
        Self { max_passes: 100 }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Episodes(usize),
    EpisodesWithoutImprovement(usize),
    Duration(SignedDuration),
}

impl Termination {
    pub fn validate(&self) -> Result<(), SolverError> {
        match self {
            Termination::Episodes(0) => Err(SolverError::InvalidParams(String::from(
                "episodes must be at least 1",
            ))),
            Termination::EpisodesWithoutImprovement(0) => Err(SolverError::InvalidParams(
                String::from("episodes without improvement must be at least 1"),
            )),
            Termination::Duration(duration) if duration.is_negative() => Err(
                SolverError::InvalidParams(String::from("duration must not be negative")),
            ),
            _ => Ok(()),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GraspParams {
    pub terminations: Vec<Termination>,
    pub seed: u64,
    pub insertion: InsertionParams,
    pub ranking: RankingParams,
    pub local_search: LocalSearchParams,
    pub run_local_search: bool,
}

impl Default for GraspParams {
    fn default() -> Self {
        Self {
            terminations: vec![
                Termination::Episodes(10),
                Termination::EpisodesWithoutImprovement(5),
            ],
            seed: 56,
            insertion: InsertionParams::default(),
            ranking: RankingParams::default(),
            local_search: LocalSearchParams::default(),
            run_local_search: true,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct IterativeParams {
    pub terminations: Vec<Termination>,
    pub seed: u64,

    /// Criterion used to keep the best planning, falls back to the objective of the problem
    pub criterion: Option<Criterion>,
}

impl Default for IterativeParams {
    fn default() -> Self {
        Self {
            terminations: vec![Termination::Episodes(3)],
            seed: 56,
            criterion: None,
        }
    }
}

/// Fails when no termination bounds the number of episodes or the time spent.
pub(crate) fn validate_terminations(terminations: &[Termination]) -> Result<(), SolverError> {
    for termination in terminations {
        termination.validate()?;
    }

    if terminations.is_empty() {
        return Err(SolverError::InvalidParams(String::from(
            "at least one termination is required",
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_defaults() {
        let params = RankingParams::default();

        assert_eq!(params.neighborhood_max_size, Some(250));
        assert_eq!(params.randomized_size, 3);
        assert_eq!(params.seed, 56);
        assert_eq!(params.neighborhood_size(10), 10);
        assert_eq!(params.neighborhood_size(1000), 250);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_ranking_invalid() {
        let params = RankingParams {
            randomized_size: 0,
            ..RankingParams::default()
        };
        assert!(matches!(params.validate(), Err(SolverError::InvalidParams(_))));

        let params = RankingParams {
            neighborhood_max_size: Some(0),
            ..RankingParams::default()
        };
        assert!(matches!(params.validate(), Err(SolverError::InvalidParams(_))));
    }

    #[test]
    fn test_deserialize_partial_params() {
        let params: GraspParams = serde_json::from_str(
            r#"{ "seed": 3, "ranking": { "randomized_size": 5 }, "terminations": [{ "episodes": 4 }] }"#,
        )
        .unwrap();

        assert_eq!(params.seed, 3);
        assert_eq!(params.ranking.randomized_size, 5);
        assert_eq!(params.ranking.neighborhood_max_size, Some(250));
        assert_eq!(params.terminations, vec![Termination::Episodes(4)]);
        assert!(params.run_local_search);
    }

    #[test]
    fn test_validate_terminations() {
        assert!(validate_terminations(&[]).is_err());
        assert!(validate_terminations(&[Termination::Episodes(0)]).is_err());
        assert!(
            validate_terminations(&[
                Termination::Episodes(2),
                Termination::Duration(SignedDuration::from_secs(1))
            ])
            .is_ok()
        );
    }
}
