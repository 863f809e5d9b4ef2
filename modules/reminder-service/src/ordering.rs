//! Reminder classification and ordering.
//!
//! The list and month-search endpoints share one pipeline:
//!
//! 1. Bucket every reminder into Today / Future / Past relative to `now`.
//!    Reminders whose due date does not parse are dropped.
//! 2. Sort Today and Future ascending by due date, Past descending.
//! 3. Concatenate Today ++ Future ++ Past.
//! 4. Stable-sort the result so unchecked reminders come before checked ones.
//!
//! All sorts are stable; step 4 relies on it to keep the bucket order inside
//! each checked/unchecked run.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use reminder_types::Reminder;
use std::cmp::Ordering;

/// Layout used to match a due date against a `YYYY-MM` search month.
const MONTH_FORMAT: &str = "%Y-%m";

/// Where a reminder lands relative to the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Same calendar year and day-of-year as `now`.
    Today,
    /// Strictly after `now`, on a different day.
    Future,
    /// On or before `now`, on a different day.
    Past,
}

/// Three-way due-date comparison.
///
/// `GreaterOrUnknown` covers both "a is later than b" and "one of the dates
/// does not parse". Callers that only ask "is a before b?" treat both the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueOrder {
    Less,
    Equal,
    GreaterOrUnknown,
}

/// A stored reminder whose due date is not RFC3339.
#[derive(Debug, thiserror::Error)]
#[error("reminder #{id} has an unparsable due date {due_date:?}")]
pub struct InvalidDueDate {
    pub id: i64,
    pub due_date: String,
}

/// Parse a strict RFC3339 timestamp: `YYYY-MM-DDThh:mm:ss[.frac]` followed by
/// `Z` or `±hh:mm`. A space or lowercase `t`/`z` and leap seconds are
/// rejected, even though chrono's RFC3339 parser alone would accept them.
pub fn parse_due_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    if !has_strict_layout(raw.as_bytes()) {
        return None;
    }
    let due = DateTime::parse_from_rfc3339(raw).ok()?;
    // chrono encodes `:60` as a nanosecond count past one second
    (due.nanosecond() < 1_000_000_000).then_some(due)
}

fn has_strict_layout(raw: &[u8]) -> bool {
    fn digits(bytes: &[u8]) -> bool {
        !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit)
    }

    if raw.len() < 20 {
        return false;
    }
    let (stamp, rest) = raw.split_at(19);
    let stamp_ok = digits(&stamp[0..4])
        && stamp[4] == b'-'
        && digits(&stamp[5..7])
        && stamp[7] == b'-'
        && digits(&stamp[8..10])
        && stamp[10] == b'T'
        && digits(&stamp[11..13])
        && stamp[13] == b':'
        && digits(&stamp[14..16])
        && stamp[16] == b':'
        && digits(&stamp[17..19]);
    if !stamp_ok {
        return false;
    }

    let zone = match rest.strip_prefix(b".") {
        Some(frac) => {
            let end = frac.iter().position(|b| !b.is_ascii_digit()).unwrap_or(frac.len());
            if end == 0 {
                return false;
            }
            &frac[end..]
        }
        None => rest,
    };
    match zone {
        b"Z" => true,
        [b'+' | b'-', h1, h2, b':', m1, m2] => digits(&[*h1, *h2, *m1, *m2]),
        _ => false,
    }
}

/// Bucket a reminder, or `None` if its due date does not parse.
///
/// The calendar day of the due date is taken in the due date's own offset,
/// the calendar day of `now` in `now`'s offset.
pub fn classify(reminder: &Reminder, now: &DateTime<FixedOffset>) -> Option<Bucket> {
    let due = parse_due_date(&reminder.due_date)?;

    let bucket = if due.year() == now.year() && due.ordinal() == now.ordinal() {
        Bucket::Today
    } else if due > *now {
        Bucket::Future
    } else {
        Bucket::Past
    };
    Some(bucket)
}

/// Compare two reminders by due date, re-parsing both.
pub fn compare_due(a: &Reminder, b: &Reminder) -> DueOrder {
    match (parse_due_date(&a.due_date), parse_due_date(&b.due_date)) {
        (Some(a), Some(b)) if a < b => DueOrder::Less,
        (Some(a), Some(b)) if a == b => DueOrder::Equal,
        _ => DueOrder::GreaterOrUnknown,
    }
}

/// Earlier due date first. Pairs with an unparsable side compare equal and
/// keep their input order.
fn earliest_first(a: &Reminder, b: &Reminder) -> Ordering {
    if compare_due(a, b) == DueOrder::Less {
        Ordering::Less
    } else if compare_due(b, a) == DueOrder::Less {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

fn latest_first(a: &Reminder, b: &Reminder) -> Ordering {
    earliest_first(b, a)
}

/// Unchecked before checked; equal checked state compares equal.
fn unchecked_first(a: &Reminder, b: &Reminder) -> Ordering {
    a.is_checked.cmp(&b.is_checked)
}

/// Run the full bucket / sort / concatenate / partition pipeline.
///
/// The output is a subset of the input: reminders with an unparsable due
/// date are silently left out.
pub fn classify_and_order(reminders: Vec<Reminder>, now: DateTime<FixedOffset>) -> Vec<Reminder> {
    let mut today = Vec::new();
    let mut future = Vec::new();
    let mut past = Vec::new();

    for reminder in reminders {
        match classify(&reminder, &now) {
            Some(Bucket::Today) => today.push(reminder),
            Some(Bucket::Future) => future.push(reminder),
            Some(Bucket::Past) => past.push(reminder),
            None => {}
        }
    }

    today.sort_by(earliest_first);
    future.sort_by(earliest_first);
    past.sort_by(latest_first);

    let mut ordered = today;
    ordered.extend(future);
    ordered.extend(past);

    ordered.sort_by(unchecked_first);
    ordered
}

/// Keep the reminders due in `month` (`YYYY-MM`), in input order.
///
/// Unlike [`classify_and_order`], a single unparsable due date anywhere in the
/// list fails the whole filter, even if that reminder is in another month.
pub fn filter_by_month(reminders: Vec<Reminder>, month: &str) -> Result<Vec<Reminder>, InvalidDueDate> {
    let mut matched = Vec::new();
    for reminder in reminders {
        let Some(due) = parse_due_date(&reminder.due_date) else {
            return Err(InvalidDueDate {
                id: reminder.id,
                due_date: reminder.due_date,
            });
        };
        if due.format(MONTH_FORMAT).to_string() == month {
            matched.push(reminder);
        }
    }
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2025-06-01T00:00:00Z").unwrap()
    }

    fn reminder(id: i64, due_date: &str, is_checked: bool) -> Reminder {
        Reminder {
            id,
            title: format!("reminder {}", id),
            due_date: due_date.to_string(),
            is_checked,
            ..Default::default()
        }
    }

    fn ids(reminders: &[Reminder]) -> Vec<i64> {
        reminders.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_classify_buckets() {
        let now = now();
        assert_eq!(classify(&reminder(1, "2025-06-01T08:00:00Z", false), &now), Some(Bucket::Today));
        assert_eq!(classify(&reminder(2, "2025-06-01T00:00:00Z", false), &now), Some(Bucket::Today));
        assert_eq!(classify(&reminder(3, "2025-12-25T00:00:00Z", false), &now), Some(Bucket::Future));
        assert_eq!(classify(&reminder(4, "2025-01-10T00:00:00Z", false), &now), Some(Bucket::Past));
        assert_eq!(classify(&reminder(5, "not a date", false), &now), None);
        assert_eq!(classify(&reminder(6, "", false), &now), None);
    }

    #[test]
    fn test_classify_same_day_other_year_is_not_today() {
        let now = now();
        assert_eq!(classify(&reminder(1, "2024-06-01T08:00:00Z", false), &now), Some(Bucket::Past));
        assert_eq!(classify(&reminder(2, "2026-06-01T08:00:00Z", false), &now), Some(Bucket::Future));
    }

    #[test]
    fn test_classify_uses_due_date_offset_for_day() {
        // 23:30 on May 31 at -05:00 is 04:30 on June 1 UTC, but its own
        // calendar day is May 31, and the instant is after `now`.
        let now = now();
        assert_eq!(
            classify(&reminder(1, "2025-05-31T23:30:00-05:00", false), &now),
            Some(Bucket::Future)
        );
    }

    #[test]
    fn test_compare_due() {
        let early = reminder(1, "2025-01-01T00:00:00Z", false);
        let late = reminder(2, "2025-02-01T00:00:00Z", false);
        let late_offset = reminder(3, "2025-02-01T01:00:00+01:00", false);
        let broken = reminder(4, "yesterday", false);

        assert_eq!(compare_due(&early, &late), DueOrder::Less);
        assert_eq!(compare_due(&late, &early), DueOrder::GreaterOrUnknown);
        assert_eq!(compare_due(&late, &late_offset), DueOrder::Equal);
        assert_eq!(compare_due(&early, &broken), DueOrder::GreaterOrUnknown);
        assert_eq!(compare_due(&broken, &early), DueOrder::GreaterOrUnknown);
    }

    #[test]
    fn test_unknown_dates_keep_input_order() {
        let mut bucket = vec![reminder(3, "x", false), reminder(1, "y", false), reminder(2, "z", false)];
        bucket.sort_by(earliest_first);
        assert_eq!(ids(&bucket), vec![3, 1, 2]);
        bucket.sort_by(latest_first);
        assert_eq!(ids(&bucket), vec![3, 1, 2]);
    }

    #[test]
    fn test_today_future_past_order() {
        let input = vec![
            reminder(1, "2025-01-10T00:00:00Z", false),
            reminder(2, "2025-06-01T08:00:00Z", false),
            reminder(3, "2025-12-25T00:00:00Z", false),
        ];
        let ordered = classify_and_order(input, now());
        assert_eq!(ids(&ordered), vec![2, 3, 1]);
    }

    #[test]
    fn test_bucket_sort_directions() {
        let input = vec![
            reminder(1, "2025-03-01T00:00:00Z", false),
            reminder(2, "2025-09-01T00:00:00Z", false),
            reminder(3, "2025-06-01T18:00:00Z", false),
            reminder(4, "2025-04-01T00:00:00Z", false),
            reminder(5, "2025-07-01T00:00:00Z", false),
            reminder(6, "2025-06-01T06:00:00Z", false),
        ];
        let ordered = classify_and_order(input, now());
        // today ascending, future ascending, past descending
        assert_eq!(ids(&ordered), vec![6, 3, 5, 2, 4, 1]);
    }

    #[test]
    fn test_unchecked_today_comes_first() {
        let checked_first = vec![
            reminder(1, "2025-06-01T08:00:00Z", true),
            reminder(2, "2025-06-01T09:00:00Z", false),
        ];
        assert_eq!(ids(&classify_and_order(checked_first, now())), vec![2, 1]);

        let unchecked_first = vec![
            reminder(2, "2025-06-01T09:00:00Z", false),
            reminder(1, "2025-06-01T08:00:00Z", true),
        ];
        assert_eq!(ids(&classify_and_order(unchecked_first, now())), vec![2, 1]);
    }

    #[test]
    fn test_checked_partition_keeps_bucket_order() {
        let input = vec![
            reminder(1, "2025-01-10T00:00:00Z", true),  // past
            reminder(2, "2025-02-10T00:00:00Z", false), // past
            reminder(3, "2025-06-01T08:00:00Z", true),  // today
            reminder(4, "2025-06-01T10:00:00Z", false), // today
            reminder(5, "2025-08-01T00:00:00Z", true),  // future
            reminder(6, "2025-07-01T00:00:00Z", false), // future
        ];
        let ordered = classify_and_order(input, now());
        // bucket order: 3, 4, 6, 5, 2, 1
        assert_eq!(ids(&ordered), vec![4, 6, 2, 3, 5, 1]);
    }

    #[test]
    fn test_unparsable_reminders_are_dropped() {
        let input = vec![
            reminder(1, "2025-06-01T08:00:00Z", false),
            reminder(2, "01/06/2025", false),
            reminder(3, "", true),
        ];
        let ordered = classify_and_order(input, now());
        assert_eq!(ids(&ordered), vec![1]);
    }

    #[test]
    fn test_equal_due_dates_keep_input_order() {
        let input = vec![
            reminder(9, "2025-12-25T00:00:00Z", false),
            reminder(4, "2025-12-25T00:00:00Z", false),
            reminder(7, "2025-12-25T00:00:00Z", false),
        ];
        assert_eq!(ids(&classify_and_order(input, now())), vec![9, 4, 7]);
    }

    #[test]
    fn test_empty_input() {
        assert!(classify_and_order(Vec::new(), now()).is_empty());
    }

    #[test]
    fn test_filter_by_month() {
        let input = vec![
            reminder(1, "2025-06-30T23:00:00Z", false),
            reminder(2, "2025-07-01T00:00:00Z", false),
            reminder(3, "2025-06-01T00:00:00Z", false),
            reminder(4, "2024-06-15T00:00:00Z", false),
        ];
        let matched = filter_by_month(input, "2025-06").unwrap();
        assert_eq!(ids(&matched), vec![1, 3]);
    }

    #[test]
    fn test_filter_by_month_uses_due_date_offset() {
        // 2025-07-01T01:00+02:00 is still June in UTC, but July in its own offset.
        let input = vec![reminder(1, "2025-07-01T01:00:00+02:00", false)];
        assert!(filter_by_month(input.clone(), "2025-06").unwrap().is_empty());
        assert_eq!(ids(&filter_by_month(input, "2025-07").unwrap()), vec![1]);
    }

    #[test]
    fn test_filter_by_month_fails_on_any_bad_date() {
        let input = vec![
            reminder(1, "2025-06-10T00:00:00Z", false),
            reminder(2, "garbage", false),
        ];
        let err = filter_by_month(input, "2025-06").unwrap_err();
        assert_eq!(err.id, 2);
        assert_eq!(err.due_date, "garbage");
    }

    #[test]
    fn test_parse_due_date_strict_layout() {
        assert!(parse_due_date("2025-06-01T08:00:00Z").is_some());
        assert!(parse_due_date("2025-06-01T08:00:00.125Z").is_some());
        assert!(parse_due_date("2025-06-01T08:00:00+09:30").is_some());
        assert!(parse_due_date("2025-06-01T08:00:00-05:00").is_some());

        for raw in [
            "2025-06-01 08:00:00Z",
            "2025-06-01t08:00:00Z",
            "2025-06-01T08:00:00z",
            "2025-06-01t08:00:00z",
            "2025-06-30T23:59:60Z",
            "2025-06-01T08:00:00",
            "2025-06-01T08:00:00.Z",
            "2025-06-01T08:00:00+0900",
            "2025-6-01T08:00:00Z",
            "2025-06-01T08:00Z",
        ] {
            assert!(parse_due_date(raw).is_none(), "{} should not parse", raw);
        }
    }

    #[test]
    fn test_loose_rfc3339_forms_are_dropped_and_fail_search() {
        for raw in ["2025-06-01 08:00:00Z", "2025-06-01t08:00:00z", "2025-06-30T23:59:60Z"] {
            let input = vec![reminder(1, raw, false)];
            assert!(classify_and_order(input.clone(), now()).is_empty(), "{}", raw);

            let err = filter_by_month(input, "2025-06").unwrap_err();
            assert_eq!(err.due_date, raw);
        }
    }

    #[test]
    fn test_filter_by_month_no_match() {
        let input = vec![reminder(1, "2025-06-10T00:00:00Z", false)];
        assert!(filter_by_month(input, "June").unwrap().is_empty());
    }
}
