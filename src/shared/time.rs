use chrono::{DateTime, Duration, SecondsFormat, Utc};

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

pub fn to_iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Converts a caller-supplied age into a chrono span, saturating instead of
/// overflowing for absurdly large values.
pub fn age_from_std(max_age: std::time::Duration) -> Duration {
    Duration::from_std(max_age).unwrap_or(Duration::MAX)
}

/// True when `created_at` is at least `max_age` before `now`.
pub fn is_older_than(created_at: DateTime<Utc>, now: DateTime<Utc>, max_age: Duration) -> bool {
    now.signed_duration_since(created_at) >= max_age
}
