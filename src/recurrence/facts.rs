use super::generator::{last_occurrence_at_or_before, next_occurrence_at_or_after, occurrences_between};
use super::rule::{parse_rule, Frequency, Recurrence};
use crate::models::CalendarEvent;
use chrono::{Months, NaiveDateTime, Weekday};

/// Derived temporal facts for one event, recomputed on every call
#[derive(Debug, Clone, PartialEq)]
pub struct EventFacts {
    pub frequency: String,
    pub spacing: String,
    pub next_instance: Option<NaiveDateTime>,
    pub last_instance: Option<NaiveDateTime>,
    pub occurrences_in_next_12_months: usize,
}

/// Derive all temporal facts for an event at the given time
pub fn derive_facts(event: &CalendarEvent, now: NaiveDateTime) -> EventFacts {
    let recurrence = parse_rule(event);
    EventFacts {
        frequency: frequency_description(&recurrence),
        spacing: time_between_instances(&recurrence),
        next_instance: next_instance_date(event, now),
        last_instance: last_instance_date(event, now),
        occurrences_in_next_12_months: occurrences_in_next_12_months(event, now),
    }
}

/// Plain-English description of a recurrence
pub fn frequency_description(recurrence: &Recurrence) -> String {
    let rule = match recurrence {
        Recurrence::None => return "No recurrence".to_string(),
        Recurrence::Custom => return "Custom frequency".to_string(),
        Recurrence::Rule(rule) => rule,
    };

    let mut description = match (rule.frequency, rule.interval) {
        (Frequency::Daily, 1) => "Every day".to_string(),
        (Frequency::Daily, n) => format!("Every {} days", n),
        (Frequency::Weekly, 1) => "Every week".to_string(),
        (Frequency::Weekly, n) => format!("Every {} weeks", n),
        (Frequency::Monthly, 1) => "Every month".to_string(),
        (Frequency::Monthly, n) => format!("Every {} months", n),
        (Frequency::Yearly, 1) => "Every year".to_string(),
        (Frequency::Yearly, n) => format!("Every {} years", n),
    };

    if rule.frequency == Frequency::Monthly {
        if let Some(position) = rule.by_set_pos {
            description.push_str(" on the ");
            description.push_str(position_name(position));
        }
    }

    if !rule.by_weekday.is_empty() {
        let names: Vec<&str> = rule.by_weekday.iter().map(|w| day_name(*w)).collect();
        description.push_str(" on ");
        description.push_str(&names.join(", "));
    }

    description
}

/// Canonical gap between consecutive occurrences
pub fn time_between_instances(recurrence: &Recurrence) -> String {
    let rule = match recurrence {
        Recurrence::None => return "N/A".to_string(),
        Recurrence::Custom => return "Custom".to_string(),
        Recurrence::Rule(rule) => rule,
    };

    match (rule.frequency, rule.interval) {
        (Frequency::Daily, 1) => "1 day".to_string(),
        (Frequency::Daily, n) => format!("{} days", n),
        (Frequency::Weekly, n) => format!("{} days", n * 7),
        (Frequency::Monthly, 1) => "1 month".to_string(),
        (Frequency::Monthly, n) => format!("{} months", n),
        (Frequency::Yearly, 1) => "1 year".to_string(),
        (Frequency::Yearly, n) => format!("{} years", n),
    }
}

/// Next instance of the event at or after `now`.
/// A future anchor is its own next instance; rule-less events report their
/// start when it is still ahead.
pub fn next_instance_date(event: &CalendarEvent, now: NaiveDateTime) -> Option<NaiveDateTime> {
    match parse_rule(event) {
        Recurrence::Rule(rule) => {
            if rule.anchor > now {
                Some(rule.anchor)
            } else {
                next_occurrence_at_or_after(&rule, now)
            }
        }
        // Custom rules have no computable occurrences, fall back to the start
        _ => {
            let start = event.start_instant()?;
            if start >= now {
                Some(start)
            } else {
                None
            }
        }
    }
}

/// Latest instance of the event at or before `now`.
/// Rule-less events report their own end; absent before anything happened.
pub fn last_instance_date(event: &CalendarEvent, now: NaiveDateTime) -> Option<NaiveDateTime> {
    match parse_rule(event) {
        Recurrence::Rule(rule) => {
            if rule.anchor > now {
                None
            } else {
                last_occurrence_at_or_before(&rule, now)
            }
        }
        _ => {
            let end = event.end_instant().or_else(|| event.start_instant())?;
            if end <= now {
                Some(end)
            } else {
                None
            }
        }
    }
}

/// Number of occurrences within `[now, now + 12 calendar months)`.
/// Rule-less events contribute 1 when their start lies in the window.
pub fn occurrences_in_next_12_months(event: &CalendarEvent, now: NaiveDateTime) -> usize {
    let Some(window_end) = now.checked_add_months(Months::new(12)) else {
        return 0;
    };
    match parse_rule(event) {
        Recurrence::Rule(rule) => occurrences_between(&rule, now, window_end).count(),
        _ => match event.start_instant() {
            Some(start) if start >= now && start < window_end => 1,
            _ => 0,
        },
    }
}

fn position_name(position: i32) -> &'static str {
    match position {
        1 => "first",
        2 => "second",
        3 => "third",
        4 => "fourth",
        _ => "last",
    }
}

fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
