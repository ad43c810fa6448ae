use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Start or end of an event as delivered by the calendar provider.
/// Whole-day events carry `date`, timed events carry `dateTime`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
    pub time_zone: Option<String>,
}

impl EventTime {
    /// Resolve to a wall-clock instant. Timed values keep their local wall
    /// time, whole-day dates become midnight. Malformed values resolve to
    /// `None` rather than an error.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        if let Some(date_time) = &self.date_time {
            return DateTime::parse_from_rfc3339(date_time)
                .ok()
                .map(|dt| dt.naive_local());
        }
        let date = self.date.as_ref()?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        date.and_hms_opt(0, 0, 0)
    }
}

/// Simplified calendar event representation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub created: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    /// RRULE (and further EXDATE/RDATE) lines for master events
    pub recurrence: Option<Vec<String>>,
    /// Back-reference from a series exception to its master event
    pub recurring_event_id: Option<String>,
}

impl CalendarEvent {
    /// Event start as a wall-clock instant, if present and well-formed
    pub fn start_instant(&self) -> Option<NaiveDateTime> {
        self.start.as_ref().and_then(EventTime::instant)
    }

    /// Event end as a wall-clock instant. Whole-day end dates are exclusive
    /// in the provider's payload and are mapped back to the last covered day.
    pub fn end_instant(&self) -> Option<NaiveDateTime> {
        let end = self.end.as_ref()?;
        if end.date_time.is_some() {
            return end.instant();
        }
        end.instant()?.checked_sub_signed(Duration::days(1))
    }
}

/// Paged event list payload from the provider
#[derive(Debug, Clone, Deserialize)]
pub struct EventListResponse {
    pub items: Vec<CalendarEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_event_instant() {
        let event = CalendarEvent {
            start: Some(EventTime {
                date_time: Some("2024-03-05T14:30:00+02:00".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let start = event.start_instant().unwrap();
        assert_eq!(start.format("%Y-%m-%d %H:%M").to_string(), "2024-03-05 14:30");
    }

    #[test]
    fn test_whole_day_event_instant() {
        let event = CalendarEvent {
            start: Some(EventTime {
                date: Some("2024-07-24".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let start = event.start_instant().unwrap();
        assert_eq!(start.format("%Y-%m-%d %H:%M").to_string(), "2024-07-24 00:00");
    }

    #[test]
    fn test_whole_day_end_is_exclusive() {
        // A one-day all-day event ends on its own day, not the provider's
        // exclusive end date
        let event = CalendarEvent {
            start: Some(EventTime {
                date: Some("2024-07-24".to_string()),
                ..Default::default()
            }),
            end: Some(EventTime {
                date: Some("2024-07-25".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let end = event.end_instant().unwrap();
        assert_eq!(end.format("%Y-%m-%d").to_string(), "2024-07-24");
    }

    #[test]
    fn test_missing_or_malformed_anchor() {
        let event = CalendarEvent::default();
        assert_eq!(event.start_instant(), None);
        assert_eq!(event.end_instant(), None);

        let event = CalendarEvent {
            start: Some(EventTime {
                date: Some("not-a-date".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(event.start_instant(), None);
    }

    #[test]
    fn test_deserialize_provider_payload() {
        let json = r#"{
            "kind": "calendar#event",
            "id": "78nb67tb7q7bjljpi44ov615v0_20240701",
            "status": "confirmed",
            "summary": "random event",
            "start": { "date": "2024-07-01" },
            "end": { "date": "2024-07-04" },
            "recurringEventId": "78nb67tb7q7bjljpi44ov615v0",
            "sequence": 0
        }"#;

        let event: CalendarEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, "78nb67tb7q7bjljpi44ov615v0_20240701");
        assert_eq!(event.summary.as_deref(), Some("random event"));
        assert!(event.recurrence.is_none());
        assert_eq!(
            event.recurring_event_id.as_deref(),
            Some("78nb67tb7q7bjljpi44ov615v0")
        );
        assert_eq!(
            event.start_instant().unwrap().format("%Y-%m-%d").to_string(),
            "2024-07-01"
        );
    }
}
