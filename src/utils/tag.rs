// src/utils/tag.rs

//! Playlist tag encoding.
//!
//! A tag is a bracketed token at the start of a playlist title made of a
//! series prefix and a formatted point in time:
//!
//! ```text
//! [DAILY:Wed 16.11.2016] anything after the tag is free text
//! ```
//!
//! The time format decides the bucket size: `%b %Y` yields one playlist per
//! month, `%A %d.%m.%Y` one per day.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Joins prefix and formatted time inside a tag.
pub const SEPARATOR: char = ':';
/// Opening tag delimiter.
pub const OPEN: char = '[';
/// Closing tag delimiter.
pub const CLOSE: char = ']';

/// Reasons a tag cannot be built or read back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("no bracketed tag in {0:?}")]
    Unbracketed(String),

    #[error("expected exactly one '{SEPARATOR}' in tag {0:?}")]
    Separator(String),

    #[error("date {date:?} does not match format {format:?}")]
    Date { date: String, format: String },

    #[error("invalid time format {0:?}")]
    Format(String),

    #[error("invalid tag prefix {0:?}")]
    Prefix(String),
}

/// Render `time` through `time_format` and wrap it with `prefix` into a tag.
pub fn encode_tag(
    prefix: &str,
    time: NaiveDateTime,
    time_format: &str,
) -> Result<String, TagError> {
    let mut rendered = String::new();
    write!(rendered, "{}", time.format(time_format))
        .map_err(|_| TagError::Format(time_format.to_string()))?;
    Ok(format!("{OPEN}{prefix}{SEPARATOR}{rendered}{CLOSE}"))
}

/// Split a tag back into its prefix and the time it encodes.
///
/// The time is only as precise as the format: a day format comes back at
/// midnight, a month format on the first of the month.
pub fn decode_tag(tag: &str, time_format: &str) -> Result<(String, NaiveDateTime), TagError> {
    let inner = tag
        .strip_prefix(OPEN)
        .and_then(|rest| rest.strip_suffix(CLOSE))
        .ok_or_else(|| TagError::Unbracketed(tag.to_string()))?;

    let mut parts = inner.split(SEPARATOR);
    let (Some(prefix), Some(date), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(TagError::Separator(tag.to_string()));
    };

    let time = parse_time(date, time_format)?;
    Ok((prefix.to_string(), time))
}

/// Return the leading `[...]` token of a playlist title, if any.
pub fn leading_tag(title: &str) -> Option<&str> {
    let title = title.trim_start();
    if !title.starts_with(OPEN) {
        return None;
    }
    let end = title.find(CLOSE)?;
    Some(&title[..=end])
}

/// Parse a formatted date, filling in whatever the format leaves out.
fn parse_time(date: &str, time_format: &str) -> Result<NaiveDateTime, TagError> {
    if let Ok(time) = NaiveDateTime::parse_from_str(date, time_format) {
        return Ok(time);
    }
    if let Ok(day) = NaiveDate::parse_from_str(date, time_format) {
        return Ok(day.and_time(NaiveTime::MIN));
    }
    // Month granularity: pin the day.
    if let Ok(day) =
        NaiveDate::parse_from_str(&format!("{date} 01"), &format!("{time_format} %d"))
    {
        return Ok(day.and_time(NaiveTime::MIN));
    }
    // Year granularity: pin month and day.
    if let Ok(day) =
        NaiveDate::parse_from_str(&format!("{date} 01 01"), &format!("{time_format} %m %d"))
    {
        return Ok(day.and_time(NaiveTime::MIN));
    }
    Err(TagError::Date {
        date: date.to_string(),
        format: time_format.to_string(),
    })
}

/// A prefix and time format pair identifying one playlist series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFormat {
    prefix: String,
    time_format: String,
}

impl TagFormat {
    /// Build a tag format, rejecting combinations that cannot round-trip.
    pub fn new(
        prefix: impl Into<String>,
        time_format: impl Into<String>,
    ) -> Result<Self, TagError> {
        let format = Self {
            prefix: prefix.into(),
            time_format: time_format.into(),
        };
        format.check()?;
        Ok(format)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn time_format(&self) -> &str {
        &self.time_format
    }

    /// Tag for the bucket containing `time`.
    pub fn encode(&self, time: NaiveDateTime) -> Result<String, TagError> {
        encode_tag(&self.prefix, time, &self.time_format)
    }

    /// Decode `tag`, requiring it to belong to this series.
    pub fn decode(&self, tag: &str) -> Result<NaiveDateTime, TagError> {
        let (prefix, time) = decode_tag(tag, &self.time_format)?;
        if prefix != self.prefix {
            return Err(TagError::Prefix(prefix));
        }
        Ok(time)
    }

    /// Canonical tag of a playlist title in this series.
    pub fn tag_of_title(&self, title: &str) -> Option<String> {
        let tag = leading_tag(title)?;
        let time = self.decode(tag).ok()?;
        self.encode(time).ok()
    }

    fn check(&self) -> Result<(), TagError> {
        if self.prefix.is_empty() || self.prefix.contains([SEPARATOR, OPEN, CLOSE]) {
            return Err(TagError::Prefix(self.prefix.clone()));
        }
        let bad_items =
            StrftimeItems::new(&self.time_format).any(|item| matches!(item, Item::Error));
        if self.time_format.trim().is_empty() || bad_items {
            return Err(TagError::Format(self.time_format.clone()));
        }

        // Probe with a date whose fields are all distinct.
        let sample = NaiveDate::from_ymd_opt(2016, 11, 16)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| TagError::Format(self.time_format.clone()))?;
        let tag = self.encode(sample)?;
        let inner = &tag[1..tag.len() - 1];
        if inner.matches(SEPARATOR).count() != 1 || inner.contains([OPEN, CLOSE]) {
            return Err(TagError::Separator(tag));
        }
        let decoded = self.decode(&tag)?;
        if self.encode(decoded)? != tag {
            return Err(TagError::Format(self.time_format.clone()));
        }
        Ok(())
    }
}
