//! Per-sport default metric selections.

use serde::{Deserialize, Serialize};

use crate::profile::Sport;

/// Body metrics every sport starts with switched on.
pub const DEFAULT_BODY_METRICS: &[&str] = &[
    "hydration",
    "sleep-time",
    "sleep-efficiency",
    "mood",
    "fatigue",
    "availability",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportDefaults {
    pub sport: Sport,
    pub default_body_metrics: Vec<String>,
    pub default_training_metrics: Vec<String>,
    pub default_outcome_metrics: Vec<String>,
}

fn owned(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Default metric selections for a sport.
pub fn sport_defaults(sport: Sport) -> SportDefaults {
    let (training, outcome): (&[&str], &[&str]) = match sport {
        Sport::Baseball => (
            &["throwing-velocity"],
            &["wins", "losses", "hits", "at-bats", "rbis", "runs", "errors"],
        ),
        Sport::Basketball => (
            &["vertical-jump"],
            &["wins", "losses", "points", "rebounds", "assists", "blocks", "steals"],
        ),
        Sport::Football => (
            &["deadlift", "bench-press", "squat"],
            &["wins", "losses", "yards", "tackles", "touchdowns", "sacks"],
        ),
        Sport::Lacrosse => (
            &["sprint-time"],
            &["wins", "losses", "goals", "assists", "ground-balls", "caused-turnovers"],
        ),
        Sport::TrackAndField => (
            &["reps"],
            &["times-result", "distance-result", "height-result"],
        ),
        Sport::Tennis => (
            &["sprint-time"],
            &["wins", "losses", "aces", "double-faults", "break-points-won"],
        ),
    };

    SportDefaults {
        sport,
        default_body_metrics: owned(DEFAULT_BODY_METRICS),
        default_training_metrics: owned(training),
        default_outcome_metrics: owned(outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{default_metrics, metric_by_id};

    #[test]
    fn every_default_resolves_to_a_metric() {
        let metrics = default_metrics();
        for sport in Sport::ALL {
            let defaults = sport_defaults(sport);
            for id in defaults
                .default_body_metrics
                .iter()
                .chain(&defaults.default_training_metrics)
                .chain(&defaults.default_outcome_metrics)
            {
                assert!(metric_by_id(&metrics, id).is_some(), "{id} for {sport:?}");
            }
        }
    }

    #[test]
    fn body_defaults_are_shared() {
        assert_eq!(
            sport_defaults(Sport::Tennis).default_body_metrics,
            sport_defaults(Sport::Football).default_body_metrics
        );
    }
}
