use chrono::{NaiveDate, NaiveDateTime};
use toisto::models::{CalendarEvent, EventTime};
use toisto::recurrence::{
    compute_stats, derive_facts, frequency_description, next_instance_date, parse_rule,
};
use toisto::report::{render_report, sort_events, SortOrder};
use toisto::startup::read_events;

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn all_day_event(id: &str, summary: &str, start: &str, end: &str) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: Some(summary.to_string()),
        start: Some(EventTime {
            date: Some(start.to_string()),
            ..Default::default()
        }),
        end: Some(EventTime {
            date: Some(end.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn recurring_event(id: &str, summary: &str, start: &str, rule: &str) -> CalendarEvent {
    CalendarEvent {
        recurrence: Some(vec![rule.to_string()]),
        ..all_day_event(id, summary, start, start)
    }
}

/// Biweekly series anchored on a Monday: the first occurrence at or after
/// Feb 1 steps 14 days at a time from Jan 1
#[test]
fn test_biweekly_next_instance() {
    let event = recurring_event("e1", "Payday", "2024-01-01", "RRULE:FREQ=WEEKLY;INTERVAL=2");
    assert_eq!(
        next_instance_date(&event, at(2024, 2, 1)),
        Some(at(2024, 2, 12))
    );
}

/// A one-time event in the past has no next instance, reports its own day
/// as the last one and contributes nothing to the next 12 months
#[test]
fn test_one_time_event_in_the_past() {
    let event = all_day_event("e1", "Moving day", "2024-07-24", "2024-07-25");
    let facts = derive_facts(&event, at(2024, 8, 1));

    assert_eq!(facts.next_instance, None);
    assert_eq!(facts.last_instance, Some(at(2024, 7, 24)));
    assert_eq!(facts.occurrences_in_next_12_months, 0);
    assert_eq!(facts.frequency, "No recurrence");
    assert_eq!(facts.spacing, "N/A");
}

#[test]
fn test_third_tuesday_description() {
    let event = recurring_event(
        "e1",
        "Board meeting",
        "2024-01-16",
        "RRULE:FREQ=MONTHLY;BYDAY=TU;BYSETPOS=3",
    );
    assert_eq!(
        frequency_description(&parse_rule(&event)),
        "Every month on the third on Tuesday"
    );
}

#[test]
fn test_stats_over_mixed_collection() {
    let now = at(2024, 1, 1);
    let recurring = vec![
        recurring_event("r1", "Standup", "2024-01-01", "RRULE:FREQ=WEEKLY"),
        recurring_event("r2", "Rent", "2024-01-31", "RRULE:FREQ=MONTHLY"),
        recurring_event("r3", "Review", "2024-01-02", "RRULE:FREQ=DAILY;INTERVAL=7"),
    ];
    let mut events = recurring.clone();
    events.push(all_day_event("o1", "Dentist", "2024-06-01", "2024-06-02"));
    events.push(all_day_event("o2", "Party", "2020-01-01", "2020-01-02"));

    let stats = compute_stats(&events, now);
    assert_eq!(stats.total_recurring_events, 3);

    let per_event_sum: usize = recurring
        .iter()
        .map(|event| derive_facts(event, now).occurrences_in_next_12_months)
        .sum();
    assert_eq!(stats.total_instances_per_year, per_event_sum);
}

/// End to end: a captured provider payload through file reading, fact
/// derivation, sorting and rendering
#[test]
fn test_report_from_provider_payload() {
    let payload = r#"{
        "kind": "calendar#events",
        "items": [
            {
                "id": "one-time",
                "summary": "Dentist",
                "start": { "dateTime": "2024-03-10T09:00:00+02:00" },
                "end": { "dateTime": "2024-03-10T10:00:00+02:00" }
            },
            {
                "id": "master",
                "summary": "Standup",
                "start": { "date": "2024-01-01" },
                "end": { "date": "2024-01-02" },
                "recurrence": ["RRULE:FREQ=WEEKLY;BYDAY=MO,WE"]
            },
            {
                "id": "exception",
                "summary": "Standup (moved)",
                "start": { "date": "2024-02-07" },
                "end": { "date": "2024-02-08" },
                "recurringEventId": "master"
            }
        ]
    }"#;

    let path = std::env::temp_dir().join("toisto_smoke_events.json");
    std::fs::write(&path, payload).unwrap();
    let events = read_events(path.to_str().unwrap()).unwrap();
    assert_eq!(events.len(), 3);

    let now = at(2024, 2, 1);
    let stats = compute_stats(&events, now);
    // The master and the exception count as recurring, the dentist does not
    assert_eq!(stats.total_recurring_events, 2);

    let rows = sort_events(events, now, SortOrder::NextInstance);
    // Next instances: Standup Mon Feb 5, exception Feb 7, dentist Mar 10
    let ids: Vec<&str> = rows.iter().map(|row| row.event.id.as_str()).collect();
    assert_eq!(ids, vec!["master", "exception", "one-time"]);

    let report = render_report(&rows, &stats);
    assert!(report.contains("Recurring events: 2"));
    assert!(report.contains("Standup (Every week on Monday, Wednesday)"));
    assert!(report.contains("Standup (moved) (Recurring instance)"));

    std::fs::remove_file(&path).ok();
}

/// A bare JSON array is accepted as well
#[test]
fn test_read_events_from_bare_array() {
    let path = std::env::temp_dir().join("toisto_smoke_array.json");
    std::fs::write(&path, r#"[{ "id": "a", "start": { "date": "2024-01-01" } }]"#).unwrap();

    let events = read_events(path.to_str().unwrap()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "a");

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_read_events_rejects_unexpected_shape() {
    let path = std::env::temp_dir().join("toisto_smoke_bad.json");
    std::fs::write(&path, r#"{"kind": "calendar#events"}"#).unwrap();

    assert!(read_events(path.to_str().unwrap()).is_err());

    std::fs::remove_file(&path).ok();
}
