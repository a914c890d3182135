use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};

use crate::models::{Bucket, ChatRecord, HistoryEntry, HistoryGroup, HistoryView, Timestamp};

// ============================================================================
// DISPLAY CONSTANTS
// ============================================================================

/// History titles longer than this many characters are cut.
pub const HISTORY_TITLE_MAX_LEN: usize = 50;

pub const ELLIPSIS: &str = "...";

pub const NO_HISTORY_TEXT: &str = "No chat history yet.";

pub const HISTORY_LOAD_FAILED_TEXT: &str = "Could not load your chats. Try again in a moment.";

const TIME_OF_DAY_FORMAT: &str = "%I:%M %p";
const DATE_FORMAT: &str = "%-m/%-d/%Y";
const DATE_TIME_FORMAT: &str = "%-m/%-d/%Y, %I:%M:%S %p";

// ============================================================================
// TRUNCATION
// ============================================================================

/// Cut `message` to `max_len` characters and append an ellipsis. Messages at or
/// under the limit come back unchanged.
pub fn truncate_message(message: &str, max_len: usize) -> String {
    match message.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}{}", &message[..cut], ELLIPSIS),
        None => message.to_string(),
    }
}

// ============================================================================
// BUCKETING
// ============================================================================

/// Calendar day of `timestamp` in the time zone of `now`.
fn calendar_day<Tz: TimeZone>(timestamp: &DateTime<Utc>, now: &DateTime<Tz>) -> NaiveDate {
    timestamp.with_timezone(&now.timezone()).date_naive()
}

/// Place a chat into its bucket. Checks run Today, Yesterday, Past 7 Days and
/// the Past 7 Days test relies on Yesterday having matched first.
/// Unparseable timestamps land in `Older`.
pub fn classify<Tz: TimeZone>(timestamp: Option<&DateTime<Utc>>, now: &DateTime<Tz>) -> Bucket {
    let Some(timestamp) = timestamp else {
        return Bucket::Older;
    };

    let today = now.date_naive();
    let chat_day = calendar_day(timestamp, now);

    if chat_day == today {
        Bucket::Today
    } else if today.pred_opt() == Some(chat_day) {
        Bucket::Yesterday
    } else if today
        .checked_sub_days(Days::new(7))
        .is_some_and(|seven_days_ago| chat_day >= seven_days_ago)
    {
        Bucket::Past7Days
    } else {
        Bucket::Older
    }
}

/// Partition `chats` into non-empty buckets, in display order. Input order is
/// kept inside each bucket.
pub fn group_by_bucket<'a, Tz: TimeZone>(
    chats: &'a [ChatRecord],
    now: &DateTime<Tz>,
) -> Vec<(Bucket, Vec<&'a ChatRecord>)> {
    let mut buckets: BTreeMap<Bucket, Vec<&'a ChatRecord>> = BTreeMap::new();

    for chat in chats {
        let timestamp = chat.timestamp.to_utc();
        buckets.entry(classify(timestamp.as_ref(), now)).or_default().push(chat);
    }

    buckets.into_iter().collect()
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Time of day for chats from today, the date otherwise. Unparseable
/// timestamps are shown as received.
pub fn format_chat_time<Tz>(timestamp: &Timestamp, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match timestamp.to_utc() {
        Some(parsed) => {
            let local = parsed.with_timezone(&now.timezone());
            if local.date_naive() == now.date_naive() {
                local.format(TIME_OF_DAY_FORMAT).to_string()
            } else {
                local.format(DATE_FORMAT).to_string()
            }
        }
        None => timestamp.raw(),
    }
}

/// Date only, in the viewer's zone.
pub fn format_date<Tz>(timestamp: &Timestamp, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp
        .to_utc()
        .map(|parsed| parsed.with_timezone(zone).format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| timestamp.raw())
}

/// Date and time, used for messages in the open conversation.
pub fn format_date_time<Tz>(timestamp: &Timestamp, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp
        .to_utc()
        .map(|parsed| parsed.with_timezone(zone).format(DATE_TIME_FORMAT).to_string())
        .unwrap_or_else(|| timestamp.raw())
}

// ============================================================================
// VIEW SHAPING
// ============================================================================

/// Shape a freshly fetched chat list into what the history sidebar shows.
pub fn build_history_view<Tz>(chats: &[ChatRecord], now: &DateTime<Tz>, title_max_len: usize) -> HistoryView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if chats.is_empty() {
        return HistoryView::Placeholder { text: NO_HISTORY_TEXT };
    }

    let groups = group_by_bucket(chats, now)
        .into_iter()
        .map(|(bucket, records)| HistoryGroup {
            bucket,
            label: bucket.label(),
            entries: records
                .into_iter()
                .map(|record| HistoryEntry {
                    id: record.id.clone(),
                    title: truncate_message(record.title_text(), title_max_len),
                    display_time: format_chat_time(&record.timestamp, now),
                    timestamp: record.timestamp.clone(),
                })
                .collect(),
        })
        .collect();

    HistoryView::Groups { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn zone() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let message = "é".repeat(55);
        let cut = truncate_message(&message, 50);
        assert_eq!(cut.chars().count(), 53);
        assert!(cut.ends_with(ELLIPSIS));
    }

    #[test]
    fn exact_length_is_left_alone() {
        let message = "b".repeat(50);
        assert_eq!(truncate_message(&message, 50), message);
    }

    #[test]
    fn today_shows_time_and_older_shows_date() {
        let now = zone().with_ymd_and_hms(2024, 5, 10, 15, 0, 0).unwrap();
        let this_morning = Timestamp::Text("2024-05-10T07:05:00Z".into());
        let last_week = Timestamp::Text("2024-05-03T07:05:00Z".into());

        assert_eq!(format_chat_time(&this_morning, &now), "09:05 AM");
        assert_eq!(format_chat_time(&last_week, &now), "5/3/2024");
    }

    #[test]
    fn day_boundaries_follow_the_viewer_zone() {
        // 23:30 UTC on the 9th is already the 10th at UTC+2.
        let now = zone().with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 5, 9, 23, 30, 0).unwrap();
        assert_eq!(classify(Some(&late), &now), Bucket::Today);
    }

    #[test]
    fn unparseable_timestamp_is_older_and_shown_raw() {
        let now = zone().with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap();
        assert_eq!(classify(None, &now), Bucket::Older);
        assert_eq!(format_chat_time(&Timestamp::Text("soon".into()), &now), "soon");
    }

    #[test]
    fn full_timestamp_format_matches_conversation_view() {
        let ts = Timestamp::Text("2024-05-10T13:04:05Z".into());
        assert_eq!(format_date_time(&ts, &Utc), "5/10/2024, 01:04:05 PM");
    }
}
