use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC), or a
/// plain `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(s: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    let utc = FixedOffset::east_opt(0).ok_or_else(|| anyhow::anyhow!("invalid offset"))?;
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc().with_timezone(&utc));
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("invalid date {}", s))?;
    Ok(midnight.and_utc().with_timezone(&utc))
}

/// Parses an optional source field, logging and dropping values that do not
/// parse.
pub fn parse_field(field: &str, raw: Option<&str>) -> Option<DateTime<Utc>> {
    parse_field_with_offset(field, raw).map(|dt| dt.with_timezone(&Utc))
}

fn parse_field_with_offset(field: &str, raw: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match parse_timestamp(raw) {
        Ok(dt) => Some(dt),
        Err(e) => {
            tracing::warn!(field, value = raw, error = %e, "Unparseable timestamp ignored");
            None
        }
    }
}

/// Splits an interview start into the stored instant and its `HH:MM` wall
/// clock time in the source's own offset.
pub fn start_fields(field: &str, raw: Option<&str>) -> (Option<DateTime<Utc>>, Option<String>) {
    match parse_field_with_offset(field, raw) {
        Some(dt) => (
            Some(dt.with_timezone(&Utc)),
            Some(dt.format("%H:%M").to_string()),
        ),
        None => (None, None),
    }
}
