//! Daily entry model.
//!
//! An entry is one user's set of logged metric values for one calendar day.
//! Body entries (sleep, hydration, mood, ...) and outcome entries (wins,
//! goals, ...) share the same shape and differ only in where they are stored.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::migration::DocType;
use crate::types::Timestamp;

pub const KIND_BODY: &str = "body";
pub const KIND_OUTCOME: &str = "outcome";

/// All valid entry kind path segments.
pub const VALID_ENTRY_KINDS: &[&str] = &[KIND_BODY, KIND_OUTCOME];

/// Which entry collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Body,
    Outcome,
}

impl EntryKind {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            KIND_BODY => Ok(Self::Body),
            KIND_OUTCOME => Ok(Self::Outcome),
            _ => Err(format!(
                "Invalid entry kind '{s}'. Must be one of: {}",
                VALID_ENTRY_KINDS.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Body => KIND_BODY,
            Self::Outcome => KIND_OUTCOME,
        }
    }

    /// Document type the entries of this kind are stored under.
    pub fn doc_type(&self) -> DocType {
        match self {
            Self::Body => DocType::BodyEntry,
            Self::Outcome => DocType::OutcomeEntry,
        }
    }
}

/// One logged value for one metric on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub updated_at: Timestamp,
}

/// A single day's logged metrics. `date` is unique per user per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub date: NaiveDate,
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricValue>,
}

impl Entry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            metrics: BTreeMap::new(),
        }
    }

    /// An entry with no metrics counts as "nothing logged" for streaks.
    pub fn has_data(&self) -> bool {
        !self.metrics.is_empty()
    }

    pub fn logged_metric_count(&self) -> usize {
        self.metrics.len()
    }

    pub fn value(&self, metric_id: &str) -> Option<f64> {
        self.metrics.get(metric_id).map(|m| m.value)
    }

    /// Log `value` for `metric_id`, replacing any earlier value for the day.
    pub fn set_metric(&mut self, metric_id: &str, value: f64, tags: Vec<String>, now: Timestamp) {
        self.metrics.insert(
            metric_id.to_string(),
            MetricValue {
                value,
                tags,
                updated_at: now,
            },
        );
    }

    /// Remove the value for `metric_id`. Returns `true` if one was present.
    pub fn remove_metric(&mut self, metric_id: &str) -> bool {
        self.metrics.remove(metric_id).is_some()
    }
}

/// Sum of a metric across entries; days without a value contribute nothing.
pub fn compute_totals(entries: &[Entry], metric_id: &str) -> f64 {
    entries.iter().filter_map(|e| e.value(metric_id)).sum()
}

/// Mean of the logged values of a metric, or `None` if nothing was logged.
pub fn metric_average(entries: &[Entry], metric_id: &str) -> Option<f64> {
    let values: Vec<f64> = entries.iter().filter_map(|e| e.value(metric_id)).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
