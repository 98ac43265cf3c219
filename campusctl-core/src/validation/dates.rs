//! Date parsing shared by the date rules
//!
//! Every parsed value is an absolute instant. Inputs that carry an offset
//! keep it; naive dates and keywords are read as wall-clock time in the
//! zone of the reference `now`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d"];

/// Parse `value` into a point in time in the zone of `now`.
///
/// Relative keywords (`now`, `today`, `tomorrow`, `yesterday`) resolve
/// against `now`. A wall-clock time skipped by a DST transition is `None`.
pub fn parse_date<Tz: TimeZone>(value: &str, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let zone = now.timezone();
    let localize = |naive: NaiveDateTime| zone.from_local_datetime(&naive).earliest();
    let midnight = |date: NaiveDate| date.and_time(NaiveTime::MIN);
    let today = midnight(now.date_naive());

    match value.to_ascii_lowercase().as_str() {
        "now" => return Some(now.clone()),
        "today" => return localize(today),
        "tomorrow" => return localize(today + Duration::days(1)),
        "yesterday" => return localize(today - Duration::days(1)),
        _ => {}
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&zone));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .map(midnight)
        })
        .and_then(localize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn tokyo() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn at(s: &str) -> DateTime<FixedOffset> {
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
        tokyo().from_local_datetime(&naive).unwrap()
    }

    #[test]
    fn plain_dates_read_in_reference_zone() {
        let now = at("2024-03-10 12:00:00");
        assert_eq!(parse_date("2024-06-01", &now), Some(at("2024-06-01 00:00:00")));
        assert_eq!(parse_date("01.06.2024", &now), Some(at("2024-06-01 00:00:00")));
        assert_eq!(
            parse_date("2024-06-01 08:30", &now),
            Some(at("2024-06-01 08:30:00"))
        );
    }

    #[test]
    fn offsets_keep_their_instant() {
        let now = at("2024-03-10 12:00:00");
        let parsed = parse_date("2024-06-01T10:00:00+03:00", &now).unwrap();
        assert_eq!(parsed, at("2024-06-01 16:00:00"));
        assert_eq!(parsed.with_timezone(&Utc).to_rfc3339(), "2024-06-01T07:00:00+00:00");
    }

    #[test]
    fn offset_value_orders_against_keyword() {
        let now = at("2024-03-10 12:00:00");
        // 03:30 UTC is 12:30 in the reference zone, half an hour after `now`.
        let later = parse_date("2024-03-10T03:30:00Z", &now).unwrap();
        let earlier = parse_date("2024-03-10T02:30:00Z", &now).unwrap();
        let reference = parse_date("now", &now).unwrap();
        assert!(later > reference);
        assert!(earlier < reference);
    }

    #[test]
    fn keywords_resolve_against_reference() {
        let now = at("2024-03-10 12:00:00");
        assert_eq!(parse_date("now", &now), Some(now));
        assert_eq!(parse_date("Today", &now), Some(at("2024-03-10 00:00:00")));
        assert_eq!(parse_date("tomorrow", &now), Some(at("2024-03-11 00:00:00")));
        assert_eq!(parse_date("yesterday", &now), Some(at("2024-03-09 00:00:00")));
    }

    #[test]
    fn garbage_is_none() {
        let now = at("2024-03-10 12:00:00");
        assert_eq!(parse_date("", &now), None);
        assert_eq!(parse_date("not a date", &now), None);
        assert_eq!(parse_date("2024-13-01", &now), None);
        assert_eq!(parse_date("31.02.2024", &now), None);
    }
}
