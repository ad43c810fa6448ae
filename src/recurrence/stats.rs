use super::facts::occurrences_in_next_12_months;
use super::rule::{parse_rule, Recurrence};
use crate::models::CalendarEvent;
use chrono::NaiveDateTime;

/// Summary counts over a collection of events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarStats {
    pub total_recurring_events: usize,
    pub total_instances_per_year: usize,
}

/// Reduce a collection of events into summary counts.
///
/// An event counts as recurring when it parses to a rule (including a
/// custom one) or is a series exception carrying `recurringEventId`.
/// Order-independent, pure in `now`.
pub fn compute_stats(events: &[CalendarEvent], now: NaiveDateTime) -> CalendarStats {
    let recurring: Vec<&CalendarEvent> = events
        .iter()
        .filter(|event| {
            !matches!(parse_rule(event), Recurrence::None) || event.recurring_event_id.is_some()
        })
        .collect();

    let total_instances_per_year = recurring
        .iter()
        .map(|event| occurrences_in_next_12_months(event, now))
        .sum();

    CalendarStats {
        total_recurring_events: recurring.len(),
        total_instances_per_year,
    }
}
