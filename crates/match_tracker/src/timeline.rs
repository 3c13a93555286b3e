use chrono::{DateTime, Utc};
use fifa_feed::RawEvent;
use notifier::{Icon, Notification};
use tracing::trace;

use crate::record::MatchRecord;
use crate::vocabulary::{classify, classify_period, EventCategory, Period};

pub fn is_new(record: &MatchRecord, event: &RawEvent) -> bool {
    event.timestamp > record.watermark
}

/// Messages for the new, classifiable events of one match, in timeline order.
///
/// Pure: no I/O, never fails, never touches the watermark.
pub fn process_timeline(record: &MatchRecord, events: &[RawEvent]) -> Vec<Notification> {
    events
        .iter()
        .filter(|e| is_new(record, e))
        .filter_map(|e| format_event(record, e))
        .collect()
}

/// Newest timestamp among the new events (classified or not).
pub fn next_watermark(record: &MatchRecord, events: &[RawEvent]) -> Option<DateTime<Utc>> {
    events
        .iter()
        .filter(|e| is_new(record, e))
        .map(|e| e.timestamp)
        .max()
}

pub fn format_event(record: &MatchRecord, event: &RawEvent) -> Option<Notification> {
    let fixture = record.fixture();
    let minute = event.match_minute.as_deref().unwrap_or("");
    let period = event.period_code.and_then(classify_period);

    let (icon, text) = match classify(event.type_code) {
        EventCategory::Unclassified => {
            trace!(match_id = %record.id, code = event.type_code, "skip");
            return None;
        }
        // start a konec se nesmí slévat dohromady
        EventCategory::PeriodStart => match period? {
            Period::FirstHalf => (Icon::Zap, format!("Match Starting - {fixture}")),
            _ => (Icon::Runner, format!("Period Starting - {minute} - {fixture}")),
        },
        EventCategory::PeriodEnd => match period? {
            Period::PenaltyShootout => (Icon::Runner, format!("End of Penalty Kicks - {minute} - {fixture}")),
            p => (Icon::Zap, format!("End of {} - {fixture}", p.label())),
        },
        EventCategory::Goal           => (Icon::Soccer, format!("Goal - {minute} - {fixture}")),
        EventCategory::OwnGoal        => (Icon::Soccer, format!("Own Goal - {minute} - {fixture}")),
        EventCategory::YellowCard     => (Icon::Soccer, format!("Yellow Card - {minute} - {fixture}")),
        EventCategory::RedCard        => (Icon::Soccer, format!("Red Card - {minute} - {fixture}")),
        EventCategory::PenaltyOutcome => (Icon::Soccer, format!("Penalty - {minute} - {fixture}")),
    };

    Some(Notification::new(icon, text).for_match(&record.id))
}
