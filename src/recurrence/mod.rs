mod facts;
mod generator;
mod rule;
mod stats;

pub use facts::{
    derive_facts, frequency_description, last_instance_date, next_instance_date,
    occurrences_in_next_12_months, time_between_instances, EventFacts,
};
pub use generator::{
    last_occurrence_at_or_before, next_occurrence_at_or_after, occurrences_between, Occurrences,
};
pub use rule::{parse_rule, parse_rule_text, Frequency, Recurrence, RecurrenceRule};
pub use stats::{compute_stats, CalendarStats};
