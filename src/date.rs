//! `/Date(ms[±HHMM])/` literal recognition and conversion.

use chrono::{DateTime, FixedOffset, Local, Utc};

use crate::error::{ReaderError, ReaderErrorKind};
use crate::mode::ReadMode;

/// The materialized value of a `Date` token.
///
/// Three variants rather than one because the wall-clock representation
/// genuinely differs depending on how the literal was written and which
/// read-mode asked for it — see the "Unspecified" design note this crate
/// inherits from the original format.
#[derive(Debug, Clone, PartialEq)]
pub enum DateValue {
    /// No offset suffix in the literal; read via the default read mode.
    Utc(DateTime<Utc>),
    /// An offset suffix was present but the default read mode discards its
    /// numeric value, converting to the host's local time zone instead.
    Local(DateTime<Local>),
    /// Read via `read_as_date_time_offset`; carries the literal's own offset
    /// (or `+00:00` if the literal had none).
    Offset(DateTime<FixedOffset>),
}

impl DateValue {
    /// Normalize to a `DateTime<FixedOffset>`, used by `read_as_date_time_offset`
    /// regardless of which variant a plain `read` call would have produced.
    pub fn to_fixed_offset(&self) -> DateTime<FixedOffset> {
        match self {
            DateValue::Utc(dt) => dt.fixed_offset(),
            DateValue::Local(dt) => dt.fixed_offset(),
            DateValue::Offset(dt) => *dt,
        }
    }
}

const PREFIX: &str = "/Date(";
const SUFFIX: &str = ")/";

/// If `s` matches the `/Date(<ms>[±HHMM])/` pattern, parse and return the
/// corresponding [`DateValue`]. Returns `Ok(None)` for any string that isn't
/// shaped like a date literal at all; returns `Err` only once the prefix and
/// suffix have matched but the body is malformed.
pub(crate) fn parse_date_literal(
    s: &str,
    mode: ReadMode,
    err_site: impl Fn(ReaderErrorKind) -> ReaderError,
) -> crate::error::Result<Option<DateValue>> {
    let Some(body) = s.strip_prefix(PREFIX).and_then(|r| r.strip_suffix(SUFFIX)) else {
        return Ok(None);
    };
    if body.is_empty() {
        return Err(err_site(ReaderErrorKind::InvalidValue(
            "empty /Date(...)/ body".into(),
        )));
    }

    let bytes = body.as_bytes();
    let mut sign_idx = None;
    for (i, &b) in bytes.iter().enumerate().skip(1) {
        if b == b'+' || b == b'-' {
            sign_idx = Some(i);
            break;
        }
    }

    let (ms_text, offset_text) = match sign_idx {
        Some(idx) => (&body[..idx], Some(&body[idx..])),
        None => (body, None),
    };

    let ms: i64 = ms_text.parse().map_err(|_| {
        err_site(ReaderErrorKind::InvalidValue(format!(
            "'{ms_text}' is not a valid millisecond count"
        )))
    })?;

    let utc = DateTime::<Utc>::from_timestamp_millis(ms).ok_or_else(|| {
        err_site(ReaderErrorKind::InvalidValue(format!(
            "'{ms}' is out of range for a UTC instant"
        )))
    })?;

    let offset_seconds = match offset_text {
        Some(text) => Some(parse_offset_seconds(text, &err_site)?),
        None => None,
    };

    match mode {
        ReadMode::ReadAsDateTimeOffset => {
            let seconds = offset_seconds.unwrap_or(0);
            let fixed = FixedOffset::east_opt(seconds).ok_or_else(|| {
                err_site(ReaderErrorKind::InvalidValue(format!(
                    "offset of {seconds}s is out of range"
                )))
            })?;
            Ok(Some(DateValue::Offset(utc.with_timezone(&fixed))))
        }
        _ => {
            if offset_seconds.is_some() {
                // Inherited quirk: an embedded offset only flags "this was not a
                // bare UTC instant" for the default read path; it does not get
                // applied numerically. The instant is re-presented in the host's
                // local time zone instead.
                Ok(Some(DateValue::Local(utc.with_timezone(&Local))))
            } else {
                Ok(Some(DateValue::Utc(utc)))
            }
        }
    }
}

fn parse_offset_seconds(
    text: &str,
    err_site: &impl Fn(ReaderErrorKind) -> ReaderError,
) -> crate::error::Result<i32> {
    let bytes = text.as_bytes();
    let sign: i32 = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => {
            return Err(err_site(ReaderErrorKind::InvalidValue(format!(
                "'{text}' is not a valid offset"
            ))));
        }
    };
    let digits = &text[1..];
    if digits.len() < 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err_site(ReaderErrorKind::InvalidValue(format!(
            "'{text}' is not a valid offset"
        ))));
    }
    let hh: i32 = digits[..2].parse().unwrap();
    let mm: i32 = if digits.len() >= 4 {
        digits[2..4].parse().unwrap_or(0)
    } else {
        0
    };
    Ok(sign * (hh * 3600 + mm * 60))
}
