//! Badge definitions, the default catalog, and the rule evaluator.
//!
//! Evaluation is pure: entries and rules go in, qualifying rule ids come out.
//! Deciding which of those are *new* is the job of [`crate::awards`].

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entries::Entry;
use crate::error::CoreError;
use crate::streaks::{calculate_streak, today_utc};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Placeholder replaced with the athlete's name when a badge is shown.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Hydration is logged on a colour scale where 1 is best.
pub const METRIC_HYDRATION: &str = "hydration";
/// Binary availability flag: 1 means available to play.
pub const METRIC_AVAILABILITY: &str = "availability";
/// Daily protein in grams; targets scale with body weight.
pub const METRIC_PROTEIN: &str = "protein";

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeKind {
    Streak,
    Threshold,
    CompleteEntry,
}

/// A badge and the rule that unlocks it, in its stored shape. Which optional
/// fields matter depends on `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BadgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak_days: Option<u32>,
    pub message_template: String,
}

/// Typed view of a definition's qualification rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BadgeRule<'a> {
    Streak {
        days: u32,
    },
    CompleteEntry,
    Threshold {
        metric: &'a str,
        threshold: f64,
        window: usize,
    },
    /// Required fields are missing; the rule can never qualify.
    Misconfigured,
}

impl BadgeDefinition {
    pub fn rule(&self) -> BadgeRule<'_> {
        match self.kind {
            BadgeKind::Streak => match self.streak_days {
                Some(days) if days > 0 => BadgeRule::Streak { days },
                _ => BadgeRule::Misconfigured,
            },
            BadgeKind::CompleteEntry => BadgeRule::CompleteEntry,
            BadgeKind::Threshold => match (self.metric.as_deref(), self.threshold, self.window) {
                (Some(metric), Some(threshold), Some(window))
                    if !metric.is_empty() && window > 0 =>
                {
                    BadgeRule::Threshold {
                        metric,
                        threshold,
                        window: window as usize,
                    }
                }
                _ => BadgeRule::Misconfigured,
            },
        }
    }

    /// The notification text for this badge, addressed to `name`.
    pub fn render_message(&self, name: &str) -> String {
        self.message_template.replacen(NAME_PLACEHOLDER, name, 1)
    }
}

/// How a threshold rule compares a window of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdPolicy {
    /// Every day's value must be at or below the threshold.
    LowerIsBetter,
    /// Every day's value must be exactly 1.
    AllAvailable,
    /// Window mean must reach `threshold * scaling_factor`.
    ScaledAverage,
    /// Window mean must reach the threshold.
    Average,
}

impl ThresholdPolicy {
    pub fn for_metric(metric: &str) -> Self {
        match metric {
            METRIC_HYDRATION => Self::LowerIsBetter,
            METRIC_AVAILABILITY => Self::AllAvailable,
            METRIC_PROTEIN => Self::ScaledAverage,
            _ => Self::Average,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// An ordered set of badge definitions with unique ids.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct BadgeCatalog {
    badges: Vec<BadgeDefinition>,
}

impl BadgeCatalog {
    pub fn new(badges: Vec<BadgeDefinition>) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        for badge in &badges {
            if !seen.insert(badge.id.as_str()) {
                return Err(CoreError::Conflict(format!(
                    "Duplicate badge id '{}' in catalog",
                    badge.id
                )));
            }
        }
        Ok(Self { badges })
    }

    pub fn get(&self, id: &str) -> Option<&BadgeDefinition> {
        self.badges.iter().find(|b| b.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BadgeDefinition> {
        self.badges.iter()
    }

    pub fn as_slice(&self) -> &[BadgeDefinition] {
        &self.badges
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }

    /// Goal value for a metric: the threshold of the first threshold badge
    /// targeting it. Charts draw this as a goal line.
    pub fn goal_for_metric(&self, metric: &str) -> Option<f64> {
        self.badges
            .iter()
            .find(|b| b.kind == BadgeKind::Threshold && b.metric.as_deref() == Some(metric))
            .and_then(|b| b.threshold)
    }
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        Self {
            badges: default_badges(),
        }
    }
}

fn streak_badge(id: &str, name: &str, days: u32, message: &str) -> BadgeDefinition {
    BadgeDefinition {
        id: id.to_string(),
        name: name.to_string(),
        kind: BadgeKind::Streak,
        metric: None,
        threshold: None,
        window: None,
        streak_days: Some(days),
        message_template: message.to_string(),
    }
}

fn threshold_badge(
    id: &str,
    name: &str,
    metric: &str,
    threshold: f64,
    window: u32,
    message: &str,
) -> BadgeDefinition {
    BadgeDefinition {
        id: id.to_string(),
        name: name.to_string(),
        kind: BadgeKind::Threshold,
        metric: Some(metric.to_string()),
        threshold: Some(threshold),
        window: Some(window),
        streak_days: None,
        message_template: message.to_string(),
    }
}

/// The built-in badge catalog.
pub fn default_badges() -> Vec<BadgeDefinition> {
    vec![
        streak_badge(
            "streak-3",
            "Three-Day Streak",
            3,
            "Three days in a row, {name}. Keep it rolling!",
        ),
        streak_badge(
            "streak-7",
            "Week Warrior",
            7,
            "A full week of check-ins. Great discipline, {name}!",
        ),
        streak_badge(
            "streak-30",
            "Monthly Machine",
            30,
            "Thirty straight days, {name}. That's a habit!",
        ),
        BadgeDefinition {
            id: "complete-day".to_string(),
            name: "Full Check-In".to_string(),
            kind: BadgeKind::CompleteEntry,
            metric: None,
            threshold: None,
            window: None,
            streak_days: None,
            message_template: "Every metric logged today. Nice work, {name}!".to_string(),
        },
        threshold_badge(
            "hydration-week",
            "Hydration Hero",
            METRIC_HYDRATION,
            3.0,
            7,
            "Well hydrated all week, {name}!",
        ),
        threshold_badge(
            "available-week",
            "Ready to Roll",
            METRIC_AVAILABILITY,
            1.0,
            7,
            "Available every day this week, {name}!",
        ),
        threshold_badge(
            "sleep-week",
            "Sleep Champion",
            "sleep-time",
            8.0,
            7,
            "Averaging eight hours of sleep, {name}. Recovery mode on!",
        ),
        threshold_badge(
            "protein-week",
            "Fuel Up",
            METRIC_PROTEIN,
            1.6,
            7,
            "Protein target hit for the week, {name}!",
        ),
    ]
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Return the ids of `rules` that `entries` currently satisfy, in rule order.
///
/// `scaling_factor` is the per-user input for scaled targets (body weight in
/// kg for protein). "Today" is the current UTC date.
pub fn evaluate_badges(
    entries: &[Entry],
    rules: &[BadgeDefinition],
    tracked_metric_count: usize,
    scaling_factor: Option<f64>,
) -> Vec<String> {
    evaluate_badges_on(entries, rules, tracked_metric_count, scaling_factor, today_utc())
}

/// [`evaluate_badges`] with an explicit "today".
pub fn evaluate_badges_on(
    entries: &[Entry],
    rules: &[BadgeDefinition],
    tracked_metric_count: usize,
    scaling_factor: Option<f64>,
    today: NaiveDate,
) -> Vec<String> {
    let streak = calculate_streak(entries);

    let mut newest_first: Vec<&Entry> = entries.iter().collect();
    newest_first.sort_by(|a, b| b.date.cmp(&a.date));

    rules
        .iter()
        .filter(|rule| match rule.rule() {
            BadgeRule::Streak { days } => streak >= days,
            BadgeRule::CompleteEntry => {
                complete_entry_qualifies(entries, tracked_metric_count, today)
            }
            BadgeRule::Threshold {
                metric,
                threshold,
                window,
            } => {
                // Never judge a partial window.
                newest_first.len() >= window
                    && threshold_qualifies(
                        &newest_first[..window],
                        metric,
                        threshold,
                        scaling_factor,
                    )
            }
            BadgeRule::Misconfigured => false,
        })
        .map(|rule| rule.id.clone())
        .collect()
}

fn complete_entry_qualifies(entries: &[Entry], tracked_metric_count: usize, today: NaiveDate) -> bool {
    if tracked_metric_count == 0 {
        return false;
    }
    entries
        .iter()
        .find(|e| e.date == today)
        .is_some_and(|e| e.logged_metric_count() >= tracked_metric_count)
}

fn threshold_qualifies(
    window: &[&Entry],
    metric: &str,
    threshold: f64,
    scaling_factor: Option<f64>,
) -> bool {
    match ThresholdPolicy::for_metric(metric) {
        ThresholdPolicy::LowerIsBetter => window
            .iter()
            .all(|e| e.value(metric).is_some_and(|v| v <= threshold)),
        ThresholdPolicy::AllAvailable => window.iter().all(|e| e.value(metric) == Some(1.0)),
        ThresholdPolicy::ScaledAverage => match scaling_factor.filter(|f| *f > 0.0) {
            Some(factor) => full_window_mean(window, metric).is_some_and(|m| m >= threshold * factor),
            None => full_window_mean(window, metric).is_some_and(|m| m >= threshold),
        },
        ThresholdPolicy::Average => full_window_mean(window, metric).is_some_and(|m| m >= threshold),
    }
}

/// Mean of the metric over the window, or `None` if any day lacks a value.
fn full_window_mean(window: &[&Entry], metric: &str) -> Option<f64> {
    let values: Option<Vec<f64>> = window.iter().map(|e| e.value(metric)).collect();
    let values = values?;
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;
    use crate::streaks::{add_days, parse_date};

    fn today() -> NaiveDate {
        parse_date("2024-06-10").unwrap()
    }

    /// Entries for the last `values.len()` days ending today, newest last.
    /// `None` leaves the metric unlogged that day (another metric is logged
    /// so the entry still exists).
    fn series(metric: &str, values: &[Option<f64>]) -> Vec<Entry> {
        let n = values.len() as i64;
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let date = add_days(today(), i as i64 - (n - 1)).unwrap();
                let mut e = Entry::new(date);
                match v {
                    Some(v) => e.set_metric(metric, *v, Vec::new(), Utc::now()),
                    None => e.set_metric("mood", 3.0, Vec::new(), Utc::now()),
                }
                e
            })
            .collect()
    }

    fn threshold(metric: &str, threshold: f64, window: u32) -> BadgeDefinition {
        threshold_badge("t", "T", metric, threshold, window, "")
    }

    fn eval(entries: &[Entry], rule: BadgeDefinition) -> bool {
        eval_with(entries, rule, 0, None)
    }

    fn eval_with(
        entries: &[Entry],
        rule: BadgeDefinition,
        tracked: usize,
        scaling: Option<f64>,
    ) -> bool {
        !evaluate_badges_on(entries, &[rule], tracked, scaling, today()).is_empty()
    }

    // -- streak --------------------------------------------------------------

    #[test]
    fn streak_rule_qualifies_at_exact_length() {
        let entries = series("mood", &[Some(1.0); 3]);
        assert!(eval(&entries, streak_badge("s", "S", 3, "")));
        assert!(!eval(&entries, streak_badge("s", "S", 4, "")));
    }

    #[test]
    fn streak_rule_without_days_never_qualifies() {
        let mut rule = streak_badge("s", "S", 1, "");
        rule.streak_days = None;
        assert_eq!(rule.rule(), BadgeRule::Misconfigured);
        assert!(!eval(&series("mood", &[Some(1.0)]), rule));
    }

    // -- complete entry --------------------------------------------------------

    #[test]
    fn complete_entry_requires_all_tracked_metrics_today() {
        let mut e = Entry::new(today());
        e.set_metric("mood", 4.0, Vec::new(), Utc::now());
        e.set_metric("hydration", 2.0, Vec::new(), Utc::now());
        let rule = default_badges().into_iter().find(|b| b.id == "complete-day").unwrap();

        assert!(eval_with(&[e.clone()], rule.clone(), 2, None));
        assert!(!eval_with(&[e.clone()], rule.clone(), 3, None));
        assert!(!eval_with(&[e], rule, 0, None));
    }

    #[test]
    fn complete_entry_ignores_other_days() {
        let mut e = Entry::new(add_days(today(), -1).unwrap());
        e.set_metric("mood", 4.0, Vec::new(), Utc::now());
        let rule = default_badges().into_iter().find(|b| b.id == "complete-day").unwrap();
        assert!(!eval_with(&[e], rule, 1, None));
    }

    // -- threshold: configuration and window -----------------------------------

    #[test]
    fn threshold_missing_fields_is_misconfigured() {
        let mut rule = threshold("sleep-time", 8.0, 3);
        rule.window = None;
        assert_matches!(rule.rule(), BadgeRule::Misconfigured);

        let mut rule = threshold("sleep-time", 8.0, 3);
        rule.threshold = None;
        assert_matches!(rule.rule(), BadgeRule::Misconfigured);

        let mut rule = threshold("sleep-time", 8.0, 3);
        rule.metric = None;
        assert!(!eval(&series("sleep-time", &[Some(9.0); 3]), rule));

        assert_matches!(threshold("sleep-time", 8.0, 0).rule(), BadgeRule::Misconfigured);
    }

    #[test]
    fn short_history_never_qualifies() {
        let entries = series("sleep-time", &[Some(10.0); 2]);
        assert!(!eval(&entries, threshold("sleep-time", 8.0, 3)));
    }

    #[test]
    fn incomplete_window_never_qualifies() {
        // 7 days of history, only 5 with a value for the metric.
        let entries = series(
            "sleep-time",
            &[Some(12.0), None, Some(12.0), Some(12.0), None, Some(12.0), Some(12.0)],
        );
        assert!(!eval(&entries, threshold("sleep-time", 1.0, 7)));
    }

    #[test]
    fn window_uses_most_recent_entries_only() {
        // Oldest day is poor, but it falls outside the 3-day window.
        let entries = series("sleep-time", &[Some(2.0), Some(8.0), Some(8.0), Some(8.0)]);
        assert!(eval(&entries, threshold("sleep-time", 8.0, 3)));
        assert!(!eval(&entries, threshold("sleep-time", 8.0, 4)));
    }

    // -- threshold: policies ---------------------------------------------------

    #[test]
    fn hydration_requires_every_day_at_or_below_threshold() {
        let good = series(METRIC_HYDRATION, &[Some(2.0), Some(3.0), Some(1.0)]);
        let bad = series(METRIC_HYDRATION, &[Some(2.0), Some(4.0), Some(1.0)]);
        assert!(eval(&good, threshold(METRIC_HYDRATION, 3.0, 3)));
        assert!(!eval(&bad, threshold(METRIC_HYDRATION, 3.0, 3)));
    }

    #[test]
    fn hydration_missing_day_fails() {
        let entries = series(METRIC_HYDRATION, &[Some(1.0), None, Some(1.0)]);
        assert!(!eval(&entries, threshold(METRIC_HYDRATION, 3.0, 3)));
    }

    #[test]
    fn availability_requires_every_day_available() {
        let all = series(METRIC_AVAILABILITY, &[Some(1.0); 3]);
        let one_off = series(METRIC_AVAILABILITY, &[Some(1.0), Some(0.0), Some(1.0)]);
        assert!(eval(&all, threshold(METRIC_AVAILABILITY, 1.0, 3)));
        assert!(!eval(&one_off, threshold(METRIC_AVAILABILITY, 1.0, 3)));
    }

    #[test]
    fn generic_average_is_inclusive() {
        let entries = series("sleep-time", &[Some(10.0), Some(12.0), Some(14.0)]);
        assert!(eval(&entries, threshold("sleep-time", 12.0, 3)));
        assert!(!eval(&entries, threshold("sleep-time", 12.01, 3)));
    }

    #[test]
    fn protein_target_scales_with_factor() {
        // Mean 120 g; 2 g/kg * 60 kg = 120 g.
        let entries = series(METRIC_PROTEIN, &[Some(110.0), Some(120.0), Some(130.0)]);
        assert!(eval_with(&entries, threshold(METRIC_PROTEIN, 2.0, 3), 0, Some(60.0)));
        assert!(!eval_with(&entries, threshold(METRIC_PROTEIN, 2.0, 3), 0, Some(61.0)));
    }

    #[test]
    fn protein_without_factor_uses_plain_average() {
        let entries = series(METRIC_PROTEIN, &[Some(1.0), Some(2.0), Some(3.0)]);
        assert!(eval_with(&entries, threshold(METRIC_PROTEIN, 2.0, 3), 0, None));
        assert!(eval_with(&entries, threshold(METRIC_PROTEIN, 2.0, 3), 0, Some(0.0)));
    }

    #[test]
    fn protein_missing_day_fails_even_when_scaled() {
        let entries = series(METRIC_PROTEIN, &[Some(500.0), None, Some(500.0)]);
        assert!(!eval_with(&entries, threshold(METRIC_PROTEIN, 1.6, 3), 0, Some(70.0)));
    }

    // -- evaluation as a whole ---------------------------------------------------

    #[test]
    fn results_follow_rule_order() {
        let entries = series("sleep-time", &[Some(9.0); 3]);
        let rules = vec![
            threshold_badge("b", "B", "sleep-time", 8.0, 3, ""),
            streak_badge("a", "A", 2, ""),
            streak_badge("c", "C", 10, ""),
        ];
        let ids = evaluate_badges_on(&entries, &rules, 0, None, today());
        assert_eq!(ids, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn evaluation_does_not_mutate_inputs() {
        let entries = series("mood", &[Some(3.0), Some(4.0)]);
        let before = entries.clone();
        let _ = evaluate_badges_on(&entries, &default_badges(), 1, Some(70.0), today());
        assert_eq!(entries, before);
    }

    // -- catalog and definitions -------------------------------------------------

    #[test]
    fn default_catalog_has_unique_ids_and_valid_rules() {
        let catalog = BadgeCatalog::new(default_badges()).unwrap();
        assert_eq!(catalog.len(), default_badges().len());
        assert!(catalog
            .iter()
            .all(|b| !matches!(b.rule(), BadgeRule::Misconfigured)));
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let badges = vec![streak_badge("x", "X", 1, ""), streak_badge("x", "Y", 2, "")];
        assert_matches!(BadgeCatalog::new(badges), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn goal_for_metric_reads_threshold_badge() {
        let catalog = BadgeCatalog::default();
        assert_eq!(catalog.goal_for_metric(METRIC_HYDRATION), Some(3.0));
        assert_eq!(catalog.goal_for_metric("wins"), None);
    }

    #[test]
    fn render_message_substitutes_name_once() {
        let badge = streak_badge("s", "S", 1, "Go {name}, go {name}!");
        assert_eq!(badge.render_message("Sam"), "Go Sam, go {name}!");
    }

    #[test]
    fn definition_uses_stored_field_names() {
        let json = serde_json::to_value(threshold_badge("h", "H", "hydration", 3.0, 7, "m")).unwrap();
        assert_eq!(json["type"], "threshold");
        assert_eq!(json["messageTemplate"], "m");
        assert!(json.get("streakDays").is_none());

        let parsed: BadgeDefinition = serde_json::from_value(serde_json::json!({
            "id": "c", "name": "C", "type": "complete-entry", "messageTemplate": "hi"
        }))
        .unwrap();
        assert_eq!(parsed.kind, BadgeKind::CompleteEntry);
    }
}
