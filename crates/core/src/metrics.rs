//! Metric definitions and per-user metric selection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputType {
    #[serde(rename = "numeric")]
    Numeric,
    #[serde(rename = "color-scale")]
    ColorScale,
    #[serde(rename = "scale-1-5")]
    Scale1To5,
    #[serde(rename = "scale-1-10")]
    Scale1To10,
    #[serde(rename = "binary")]
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricCategory {
    Body,
    Training,
    Outcome,
}

/// A named, typed measurement with optional bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDefinition {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub input_type: InputType,
    pub category: MetricCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub description: String,
}

impl MetricDefinition {
    /// Check a logged value against this metric's bounds.
    pub fn check_value(&self, value: f64) -> Result<(), CoreError> {
        let below = self.min.is_some_and(|min| value < min);
        let above = self.max.is_some_and(|max| value > max);
        if below || above {
            return Err(CoreError::Validation(format!(
                "{} must be between {} and {}, got {value}",
                self.id,
                self.min.map_or("-inf".to_string(), |v| v.to_string()),
                self.max.map_or("inf".to_string(), |v| v.to_string()),
            )));
        }
        if self.input_type == InputType::Binary && value != 0.0 && value != 1.0 {
            return Err(CoreError::Validation(format!(
                "{} is a yes/no metric, got {value}",
                self.id
            )));
        }
        Ok(())
    }
}

/// The metrics a user chose to track for one entry kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetricConfig {
    pub selected_metric_ids: Vec<String>,
}

impl UserMetricConfig {
    /// Build a config, dropping blanks and repeated ids while keeping order.
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        let mut seen = HashSet::new();
        let selected_metric_ids = ids
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();
        Self {
            selected_metric_ids,
        }
    }

    /// Number of metrics a complete day must contain.
    pub fn tracked_metric_count(&self) -> usize {
        self.selected_metric_ids.len()
    }
}

#[allow(clippy::too_many_arguments)]
fn metric(
    id: &str,
    name: &str,
    unit: &str,
    input_type: InputType,
    category: MetricCategory,
    min: Option<f64>,
    max: Option<f64>,
    description: &str,
) -> MetricDefinition {
    MetricDefinition {
        id: id.to_string(),
        name: name.to_string(),
        unit: unit.to_string(),
        input_type,
        category,
        min,
        max,
        description: description.to_string(),
    }
}

fn training(id: &str, name: &str, unit: &str) -> MetricDefinition {
    metric(
        id,
        name,
        unit,
        InputType::Numeric,
        MetricCategory::Training,
        Some(0.0),
        None,
        name,
    )
}

fn outcome(id: &str, name: &str) -> MetricDefinition {
    metric(
        id,
        name,
        "count",
        InputType::Numeric,
        MetricCategory::Outcome,
        Some(0.0),
        None,
        name,
    )
}

/// Built-in metric definitions.
pub fn default_metrics() -> Vec<MetricDefinition> {
    use InputType::*;
    use MetricCategory::Body;

    vec![
        metric("hydration", "Hydration", "level", ColorScale, Body, Some(1.0), Some(8.0),
            "Urine colour level; 1 is well hydrated, 8 severely dehydrated"),
        metric("sleep-time", "Sleep Time", "hours", Numeric, Body, Some(0.0), Some(24.0),
            "Hours slept last night"),
        metric("sleep-efficiency", "Sleep Efficiency", "%", Numeric, Body, Some(0.0), Some(100.0),
            "Share of time in bed spent asleep"),
        metric("mood", "Mood", "score", Scale1To5, Body, Some(1.0), Some(5.0),
            "Overall mood today"),
        metric("fatigue", "Fatigue", "score", Scale1To10, Body, Some(1.0), Some(10.0),
            "How tired you feel; 10 is exhausted"),
        metric("availability", "Availability", "yes/no", Binary, Body, Some(0.0), Some(1.0),
            "Able to train or compete today"),
        metric("protein", "Protein", "g", Numeric, Body, Some(0.0), None,
            "Grams of protein eaten today"),
        training("throwing-velocity", "Throwing Velocity", "mph"),
        training("vertical-jump", "Vertical Jump", "in"),
        training("deadlift", "Deadlift", "lb"),
        training("bench-press", "Bench Press", "lb"),
        training("squat", "Squat", "lb"),
        training("sprint-time", "Sprint Time", "s"),
        training("reps", "Reps", "count"),
        outcome("wins", "Wins"),
        outcome("losses", "Losses"),
        outcome("hits", "Hits"),
        outcome("at-bats", "At Bats"),
        outcome("rbis", "RBIs"),
        outcome("runs", "Runs"),
        outcome("errors", "Errors"),
        outcome("points", "Points"),
        outcome("rebounds", "Rebounds"),
        outcome("assists", "Assists"),
        outcome("blocks", "Blocks"),
        outcome("steals", "Steals"),
        outcome("yards", "Yards"),
        outcome("tackles", "Tackles"),
        outcome("touchdowns", "Touchdowns"),
        outcome("sacks", "Sacks"),
        outcome("goals", "Goals"),
        outcome("ground-balls", "Ground Balls"),
        outcome("caused-turnovers", "Caused Turnovers"),
        metric("times-result", "Time", "s", Numeric, MetricCategory::Outcome, Some(0.0), None,
            "Race time"),
        metric("distance-result", "Distance", "m", Numeric, MetricCategory::Outcome, Some(0.0), None,
            "Throw or jump distance"),
        metric("height-result", "Height", "m", Numeric, MetricCategory::Outcome, Some(0.0), None,
            "Jump height"),
        outcome("aces", "Aces"),
        outcome("double-faults", "Double Faults"),
        outcome("break-points-won", "Break Points Won"),
    ]
}

pub fn metric_by_id<'a>(metrics: &'a [MetricDefinition], id: &str) -> Option<&'a MetricDefinition> {
    metrics.iter().find(|m| m.id == id)
}
