//! Recency scoring for catalog entities.
//!
//! Two strategies coexist and produce different numbers for the same
//! real-world recency ("1 day ago" is 97 as a descriptor but 80 as a delta).
//! Callers choose one with [`FreshnessMode`].

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::clock::Clock;
use crate::domain::ColorKey;

static DAYS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*days?\s+ago").expect("valid days-ago pattern"));

const MILLIS_PER_DAY: i64 = 86_400_000;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Coarse recency bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FreshnessTier {
    /// Updated continuously or today.
    RealTime,
    /// Updated daily or yesterday.
    Daily,
    /// Updated weekly.
    Weekly,
    /// Updated monthly.
    Monthly,
    /// Updated quarterly.
    Quarterly,
    /// Updated yearly.
    Yearly,
    /// Updated a known number of days ago.
    NDaysAgo,
    /// Recency could not be determined.
    Unknown,
}

/// Which freshness strategy to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessMode {
    /// Match a free-text descriptor such as `"daily"` or `"3 days ago"`.
    Descriptor,
    /// Measure whole days elapsed since a last-updated timestamp.
    Delta,
}

/// A descriptor, a timestamp string, or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FreshnessInput {
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    /// A descriptor or a timestamp string.
    Text(String),
}

impl FreshnessInput {
    /// The input as text.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::EpochMillis(millis) => Cow::Owned(millis.to_string()),
            Self::Text(text) => Cow::Borrowed(text),
        }
    }

    /// The input as an instant, if it can be read as one.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::EpochMillis(millis) => DateTime::from_timestamp_millis(*millis),
            Self::Text(text) => parse_timestamp(text),
        }
    }
}

impl From<&str> for FreshnessInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FreshnessInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for FreshnessInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::EpochMillis(value.timestamp_millis())
    }
}

/// Recency reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FreshnessReading {
    /// Recency percentage, 0-100.
    pub percent: u8,
    /// Color bucket.
    pub color_key: ColorKey,
    /// Recency bucket.
    pub tier: FreshnessTier,
    /// Whole days elapsed, when known.
    pub days_ago: Option<i64>,
}

impl FreshnessReading {
    fn unknown(percent: u8) -> Self {
        Self {
            percent,
            color_key: ColorKey::Gray,
            tier: FreshnessTier::Unknown,
            days_ago: None,
        }
    }
}

/// Parse an RFC 3339 timestamp, a naive `YYYY-MM-DD[ T]HH:MM:SS` timestamp or
/// a bare date. Naive values are taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Score a free-text freshness descriptor.
///
/// Keywords are matched case-insensitively in priority order; `"<n> days ago"`
/// scores `max(80, 100 - 3n)`; anything else falls back to 50.
pub fn map_freshness_descriptor(text: &str) -> FreshnessReading {
    let text = text.to_lowercase();
    let keyword = |needles: &[&str]| needles.iter().any(|needle| text.contains(needle));

    let (percent, tier, days_ago) = if keyword(&["real-time", "realtime", "today"]) {
        (100, FreshnessTier::RealTime, None)
    } else if keyword(&["daily", "yesterday"]) {
        (95, FreshnessTier::Daily, None)
    } else if keyword(&["week"]) {
        (75, FreshnessTier::Weekly, None)
    } else if keyword(&["month"]) {
        (50, FreshnessTier::Monthly, None)
    } else if keyword(&["quarter"]) {
        (25, FreshnessTier::Quarterly, None)
    } else if keyword(&["year"]) {
        (10, FreshnessTier::Yearly, None)
    } else if let Some(days) = days_in_descriptor(&text) {
        let percent = 100_i64.saturating_sub(days.saturating_mul(3)).max(80);
        (percent as u8, FreshnessTier::NDaysAgo, Some(days))
    } else {
        return FreshnessReading::unknown(50);
    };

    FreshnessReading {
        percent,
        color_key: ColorKey::for_health(percent),
        tier,
        days_ago,
    }
}

fn days_in_descriptor(text: &str) -> Option<i64> {
    let digits = DAYS_AGO.captures(text)?.get(1)?;
    Some(digits.as_str().parse().unwrap_or(i64::MAX))
}

/// Score how recently `last_updated` happened relative to `now`.
///
/// Whole days elapsed: 0 scores 100, 1 scores 80, 2 scores 60, 3 scores 40 and
/// anything older 20. Days are floored, so a timestamp even slightly in the
/// future is day -1 and scores 20 while keeping the green color.
pub fn map_freshness_from_datetime(
    last_updated: DateTime<Utc>,
    now: DateTime<Utc>,
) -> FreshnessReading {
    let days = (now - last_updated)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_DAY);
    let percent = match days {
        0 => 100,
        1 => 80,
        2 => 60,
        3 => 40,
        _ => 20,
    };
    let color_key = match days {
        ..=1 => ColorKey::Green,
        2..=3 => ColorKey::Orange,
        _ => ColorKey::Red,
    };
    FreshnessReading {
        percent,
        color_key,
        tier: FreshnessTier::NDaysAgo,
        days_ago: Some(days),
    }
}

/// Delta strategy over caller input; unparsable input scores 0.
pub fn map_freshness_from_timestamp(
    last_updated: &FreshnessInput,
    now: DateTime<Utc>,
) -> FreshnessReading {
    match last_updated.to_datetime() {
        Some(instant) => map_freshness_from_datetime(instant, now),
        None => {
            warn!("unparsable last-updated timestamp {:?}", last_updated.as_text());
            FreshnessReading::unknown(0)
        }
    }
}

/// Score `input` with the chosen strategy.
pub fn map_freshness(
    input: &FreshnessInput,
    mode: FreshnessMode,
    clock: &dyn Clock,
) -> FreshnessReading {
    match mode {
        FreshnessMode::Descriptor => map_freshness_descriptor(&input.as_text()),
        FreshnessMode::Delta => map_freshness_from_timestamp(input, clock.now()),
    }
}

/// Relative age label such as `"3 days ago"` or `"Just now"`.
///
/// Unparsable input is returned as-is.
pub fn describe_age(last_updated: &FreshnessInput, now: DateTime<Utc>) -> String {
    let Some(instant) = last_updated.to_datetime() else {
        return last_updated.as_text().into_owned();
    };
    let elapsed = now - instant;
    let units = [
        (elapsed.num_days(), "day"),
        (elapsed.num_hours(), "hour"),
        (elapsed.num_minutes(), "minute"),
    ];
    units
        .into_iter()
        .find(|(count, _)| *count > 0)
        .map(|(count, unit)| {
            let plural = if count == 1 { "" } else { "s" };
            format!("{count} {unit}{plural} ago")
        })
        .unwrap_or_else(|| "Just now".to_string())
}
