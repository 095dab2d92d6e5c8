use jiff::{SignedDuration, Timestamp};
use serde::Serialize;

use super::score::Score;

/// Counters of the ranking insertion iterator.
#[derive(Default, Serialize, Debug, Clone, PartialEq)]
pub struct RankingStatistics {
    pub commits: usize,
    pub undos: usize,

    /// Sub-rankings computed from scratch
    pub rebuilds: usize,

    /// Sub-rankings purged of the candidates of a committed trip
    pub filters: usize,

    pub candidates_computed: usize,
    pub candidates_purged: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScoreEvolutionRow {
    pub timestamp: Timestamp,
    pub episode: usize,
    pub score: Score,
}

#[derive(Serialize, Debug, Clone)]
pub enum SearchStatisticsEpisode {
    Completed {
        timestamp: Timestamp,
        score: Score,
        improved: bool,
        duration: SignedDuration,
    },
    Skipped {
        timestamp: Timestamp,
        pending_trips: usize,
    },
}

/// What happened during each episode of a multi-start search.
#[derive(Default, Serialize, Debug, Clone)]
pub struct SearchStatistics {
    episodes: Vec<SearchStatisticsEpisode>,

    /// Incumbent score after every episode that produced a planning
    score_evolution: Vec<ScoreEvolutionRow>,
}

impl SearchStatistics {
    pub fn add_completed_episode(&mut self, score: Score, improved: bool, duration: SignedDuration) {
        self.episodes.push(SearchStatisticsEpisode::Completed {
            timestamp: Timestamp::now(),
            score,
            improved,
            duration,
        });
    }

    pub fn add_skipped_episode(&mut self, pending_trips: usize) {
        self.episodes.push(SearchStatisticsEpisode::Skipped {
            timestamp: Timestamp::now(),
            pending_trips,
        });
    }

    pub fn add_incumbent_score(&mut self, score: Score) {
        self.score_evolution.push(ScoreEvolutionRow {
            timestamp: Timestamp::now(),
            episode: self.episodes.len(),
            score,
        });
    }

    pub fn episodes(&self) -> &[SearchStatisticsEpisode] {
        &self.episodes
    }

    pub fn score_evolution(&self) -> &[ScoreEvolutionRow] {
        &self.score_evolution
    }

    pub fn skipped_episodes(&self) -> usize {
        self.episodes
            .iter()
            .filter(|episode| matches!(episode, SearchStatisticsEpisode::Skipped { .. }))
            .count()
    }

    pub fn improvements(&self) -> usize {
        self.episodes
            .iter()
            .filter(|episode| {
                matches!(
                    episode,
                    SearchStatisticsEpisode::Completed { improved: true, .. }
                )
            })
            .count()
    }
}
