use super::rule::{Frequency, RecurrenceRule};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Weekday};

/// Weekly BYDAY and monthly BYSETPOS expansions reach at most this far
/// back before their period start instant
const EXPANSION_MARGIN_DAYS: i64 = 31;

/// Periods re-scanned before an estimated window start, so expansions that
/// precede their period start are not missed
const SCAN_LOOKBACK_PERIODS: i64 = 2;

/// Lazy, finite iterator over the occurrences of a rule within `[from, to)`
pub struct Occurrences<'a> {
    rule: &'a RecurrenceRule,
    from: NaiveDateTime,
    to: NaiveDateTime,
    period: u32,
    buffered: std::vec::IntoIter<NaiveDateTime>,
    done: bool,
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<NaiveDateTime> {
        loop {
            if self.done {
                return None;
            }
            if let Some(candidate) = self.buffered.next() {
                if candidate < self.from {
                    continue;
                }
                if candidate >= self.to {
                    self.done = true;
                    return None;
                }
                return Some(candidate);
            }
            let Some(start) = period_start(self.rule, self.period) else {
                self.done = true;
                return None;
            };
            if let Some(limit) = self.to.checked_add_signed(Duration::days(EXPANSION_MARGIN_DAYS))
            {
                if start > limit {
                    self.done = true;
                    return None;
                }
            }
            self.buffered = expand_period(self.rule, start).into_iter();
            self.period += 1;
        }
    }
}

/// Occurrences of `rule` within the window `[from, to)`, ascending.
/// The anchor itself is included when it lands in the window.
pub fn occurrences_between<'a>(
    rule: &'a RecurrenceRule,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Occurrences<'a> {
    Occurrences {
        rule,
        from,
        to,
        period: scan_start_period(rule, from),
        buffered: Vec::new().into_iter(),
        done: false,
    }
}

/// First occurrence at or after `t`, if one exists within the search horizon
pub fn next_occurrence_at_or_after(rule: &RecurrenceRule, t: NaiveDateTime) -> Option<NaiveDateTime> {
    // For a query before the series even starts, the horizon has to clear
    // the anchor period
    let base = if rule.anchor > t { rule.anchor } else { t };
    let horizon = search_horizon(rule, base)?;
    occurrences_between(rule, t, horizon).next()
}

/// Latest occurrence at or before `t`, if any has happened yet
pub fn last_occurrence_at_or_before(
    rule: &RecurrenceRule,
    t: NaiveDateTime,
) -> Option<NaiveDateTime> {
    if rule.anchor > t {
        return None;
    }
    // Occurrence instants have second granularity, so one second past `t`
    // makes the window upper bound inclusive of `t` itself
    let to = t.checked_add_signed(Duration::seconds(1))?;
    occurrences_between(rule, rule.anchor, to).last()
}

/// Start of period `n`: the anchor advanced by `n * interval` frequency
/// units. Always derived fresh from the anchor, so monthly clamping (day 31
/// in a shorter month) never accumulates across steps.
fn period_start(rule: &RecurrenceRule, n: u32) -> Option<NaiveDateTime> {
    let steps = u64::from(rule.interval.max(1)) * u64::from(n);
    match rule.frequency {
        Frequency::Daily => rule
            .anchor
            .checked_add_signed(Duration::days(i64::try_from(steps).ok()?)),
        Frequency::Weekly => rule
            .anchor
            .checked_add_signed(Duration::days(i64::try_from(steps).ok()?.checked_mul(7)?)),
        Frequency::Monthly => rule
            .anchor
            .checked_add_months(Months::new(u32::try_from(steps).ok()?)),
        Frequency::Yearly => rule
            .anchor
            .checked_add_months(Months::new(u32::try_from(steps.checked_mul(12)?).ok()?)),
    }
}

/// All candidate instants of the period starting at `start`, ascending,
/// never earlier than the anchor
fn expand_period(rule: &RecurrenceRule, start: NaiveDateTime) -> Vec<NaiveDateTime> {
    let time = rule.anchor.time();
    let mut candidates = Vec::new();

    match rule.frequency {
        Frequency::Weekly if !rule.by_weekday.is_empty() => {
            // Expand the Monday-based week containing the period start
            let monday = start.date()
                - Duration::days(i64::from(start.date().weekday().num_days_from_monday()));
            for weekday in &rule.by_weekday {
                let date = monday + Duration::days(i64::from(weekday.num_days_from_monday()));
                candidates.push(NaiveDateTime::new(date, time));
            }
        }
        Frequency::Monthly if !rule.by_weekday.is_empty() && rule.by_set_pos.is_some() => {
            if let Some(position) = rule.by_set_pos {
                // Months without an Nth matching weekday yield nothing
                if let Some(date) = nth_weekday_in_month(start.date(), &rule.by_weekday, position)
                {
                    candidates.push(NaiveDateTime::new(date, time));
                }
            }
        }
        _ => candidates.push(start),
    }

    candidates.retain(|candidate| *candidate >= rule.anchor);
    candidates
}

/// The Nth (negative: from the end) day matching `weekdays` within the
/// month containing `day_in_month`
fn nth_weekday_in_month(
    day_in_month: NaiveDate,
    weekdays: &[Weekday],
    position: i32,
) -> Option<NaiveDate> {
    let first = day_in_month.with_day(1)?;
    let next_month = first.checked_add_months(Months::new(1))?;

    let mut matching = Vec::new();
    let mut day = first;
    while day < next_month {
        if weekdays.contains(&day.weekday()) {
            matching.push(day);
        }
        day = day.succ_opt()?;
    }

    if position > 0 {
        matching.get(position as usize - 1).copied()
    } else if position < 0 {
        let index = matching.len().checked_sub(position.unsigned_abs() as usize)?;
        matching.get(index).copied()
    } else {
        None
    }
}

/// Period index to start scanning from for a window opening at `t`
fn scan_start_period(rule: &RecurrenceRule, t: NaiveDateTime) -> u32 {
    if t <= rule.anchor {
        return 0;
    }
    let interval = i64::from(rule.interval.max(1));
    let elapsed = match rule.frequency {
        Frequency::Daily => (t - rule.anchor).num_days() / interval,
        Frequency::Weekly => (t - rule.anchor).num_days() / (7 * interval),
        Frequency::Monthly => months_between(rule.anchor.date(), t.date()) / interval,
        Frequency::Yearly => months_between(rule.anchor.date(), t.date()) / (12 * interval),
    };
    u32::try_from((elapsed - SCAN_LOOKBACK_PERIODS).max(0)).unwrap_or(0)
}

/// Upper bound for the forward point query: two full rule periods plus
/// enough slack to cross BYSETPOS months without a matching day
fn search_horizon(rule: &RecurrenceRule, t: NaiveDateTime) -> Option<NaiveDateTime> {
    let interval = i64::from(rule.interval.max(1));
    let unit_days = match rule.frequency {
        Frequency::Daily => 1,
        Frequency::Weekly => 7,
        Frequency::Monthly => 31,
        Frequency::Yearly => 366,
    };
    t.checked_add_signed(Duration::days(interval.checked_mul(unit_days * 2)?.checked_add(400)?))
}

fn months_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month() as i32 - earlier.month() as i32)
}
