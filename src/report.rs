use crate::models::CalendarEvent;
use crate::recurrence::{derive_facts, parse_rule, CalendarStats, EventFacts, Recurrence};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Sort order for the event report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Soonest upcoming instance first, events without one last
    #[default]
    NextInstance,
    /// By event summary
    Alphabetical,
}

impl SortOrder {
    /// Parse a sort order name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next_instance" => Some(Self::NextInstance),
            "alphabetical" => Some(Self::Alphabetical),
            _ => None,
        }
    }
}

/// One report row: an event with its derived facts
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub event: CalendarEvent,
    pub facts: EventFacts,
}

/// Derive facts for every event and order the rows per the requested sort
pub fn sort_events(
    events: Vec<CalendarEvent>,
    now: NaiveDateTime,
    sort_order: SortOrder,
) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = events
        .into_iter()
        .map(|event| {
            let facts = derive_facts(&event, now);
            ReportRow { event, facts }
        })
        .collect();

    match sort_order {
        SortOrder::NextInstance => {
            rows.sort_by_key(|row| (row.facts.next_instance.is_none(), row.facts.next_instance));
        }
        SortOrder::Alphabetical => {
            rows.sort_by(|a, b| {
                summary_of(&a.event)
                    .to_lowercase()
                    .cmp(&summary_of(&b.event).to_lowercase())
            });
        }
    }

    rows
}

/// Render the stats header and one line per event
pub fn render_report(rows: &[ReportRow], stats: &CalendarStats) -> String {
    let mut report = String::new();
    report.push_str(&format!(
        "Recurring events: {}\n",
        stats.total_recurring_events
    ));
    report.push_str(&format!(
        "Recurring event instances per year: {}\n\n",
        stats.total_instances_per_year
    ));

    for row in rows {
        report.push_str(&format!(
            "• {} ({}) | last: {} | next: {} | every: {} | next 12 months: {}\n",
            summary_of(&row.event),
            frequency_label(&row.event, &row.facts),
            format_instant(row.facts.last_instance),
            format_instant(row.facts.next_instance),
            row.facts.spacing,
            row.facts.occurrences_in_next_12_months,
        ));
    }

    report
}

/// Label shown in the frequency column. A record with no rule of its own
/// that points back to a master series is a modified single occurrence.
fn frequency_label(event: &CalendarEvent, facts: &EventFacts) -> String {
    if event.recurring_event_id.is_some() && matches!(parse_rule(event), Recurrence::None) {
        return "Recurring instance".to_string();
    }
    facts.frequency.clone()
}

fn summary_of(event: &CalendarEvent) -> &str {
    event.summary.as_deref().unwrap_or("Unnamed event")
}

fn format_instant(instant: Option<NaiveDateTime>) -> String {
    match instant {
        Some(instant) => instant.format("%Y-%m-%d %H:%M").to_string(),
        None => "N/A".to_string(),
    }
}
