use crate::models::CalendarEvent;
use chrono::{NaiveDateTime, Weekday};
use tracing::debug;

/// Recurrence frequency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Parse a FREQ token (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// A parsed recurrence rule with its start anchor
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    /// Every N frequency units, always >= 1
    pub interval: u32,
    /// Weekday filter, sorted Monday-first, deduplicated
    pub by_weekday: Vec<Weekday>,
    /// Nth matching weekday within the period, negative counts from the end
    pub by_set_pos: Option<i32>,
    /// First occurrence of the series, from the event start
    pub anchor: NaiveDateTime,
}

/// Outcome of parsing an event's recurrence
#[derive(Debug, Clone, PartialEq)]
pub enum Recurrence {
    /// Event has no recurrence rule
    None,
    /// Rule text is present but outside the supported frequency set
    Custom,
    /// Fully parsed recurrence rule
    Rule(RecurrenceRule),
}

/// Parse the recurrence rule of an event.
///
/// Only the first `recurrence` entry is consulted; further EXDATE/RDATE
/// lines are ignored. Malformed rule text degrades to
/// [`Recurrence::Custom`], an event without a usable start anchor to
/// [`Recurrence::None`]. Never fails.
pub fn parse_rule(event: &CalendarEvent) -> Recurrence {
    let Some(rule_text) = event.recurrence.as_ref().and_then(|lines| lines.first()) else {
        return Recurrence::None;
    };
    let Some(anchor) = event.start_instant() else {
        return Recurrence::None;
    };
    parse_rule_text(rule_text, anchor)
}

/// Parse RRULE text against a known anchor
pub fn parse_rule_text(text: &str, anchor: NaiveDateTime) -> Recurrence {
    let body = text.trim();
    let body = body.strip_prefix("RRULE:").unwrap_or(body);

    let mut frequency = None;
    let mut interval = 1u32;
    let mut by_weekday: Vec<Weekday> = Vec::new();
    let mut by_set_pos = None;
    let mut byday_ordinal = None;

    for part in body.split(';') {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_uppercase().as_str() {
            "FREQ" => frequency = Frequency::parse(value),
            "INTERVAL" => {
                // Zero or garbage collapses to the default of 1
                interval = value
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|i| *i >= 1)
                    .unwrap_or(1);
            }
            "BYDAY" => {
                for token in value.split(',') {
                    if let Some((ordinal, weekday)) = parse_weekday_token(token) {
                        by_weekday.push(weekday);
                        if ordinal.is_some() {
                            byday_ordinal = ordinal;
                        }
                    }
                }
            }
            "BYSETPOS" => {
                by_set_pos = value
                    .split(',')
                    .next()
                    .and_then(|v| v.trim().parse::<i32>().ok())
                    .filter(|p| *p != 0);
            }
            _ => {}
        }
    }

    let Some(frequency) = frequency else {
        debug!(rule = %text, "unsupported or missing FREQ, treating as custom recurrence");
        return Recurrence::Custom;
    };

    // Google emits monthly ordinals as a BYDAY prefix (BYDAY=3TU) rather
    // than a separate BYSETPOS part
    if frequency == Frequency::Monthly && by_set_pos.is_none() {
        by_set_pos = byday_ordinal;
    }

    by_weekday.sort_by_key(|weekday| weekday.num_days_from_monday());
    by_weekday.dedup();

    Recurrence::Rule(RecurrenceRule {
        frequency,
        interval,
        by_weekday,
        by_set_pos,
        anchor,
    })
}

/// Parse a BYDAY token such as `TU`, `3TU` or `-1FR`
fn parse_weekday_token(token: &str) -> Option<(Option<i32>, Weekday)> {
    let token = token.trim();
    if !token.is_ascii() {
        return None;
    }
    let split_at = token.len().checked_sub(2)?;
    let (ordinal_part, code) = token.split_at(split_at);

    let weekday = match code.to_ascii_uppercase().as_str() {
        "MO" => Weekday::Mon,
        "TU" => Weekday::Tue,
        "WE" => Weekday::Wed,
        "TH" => Weekday::Thu,
        "FR" => Weekday::Fri,
        "SA" => Weekday::Sat,
        "SU" => Weekday::Sun,
        _ => return None,
    };
    let ordinal = if ordinal_part.is_empty() {
        None
    } else {
        ordinal_part.parse::<i32>().ok().filter(|o| *o != 0)
    };

    Some((ordinal, weekday))
}
