use std::collections::HashMap;

use chrono::{DateTime, Local, LocalResult, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

pub const MILLIS_PER_MINUTE: i64 = 60 * 1000;

/// Apps used for less than this are left out of the chart.
pub const CHART_MIN_MILLIS: i64 = MILLIS_PER_MINUTE;

/// Number of bars in the chart.
pub const CHART_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageEventKind {
    /// App came to the foreground
    Resumed,
    /// App left the foreground
    Paused,
    /// Any other platform event, ignored by aggregation
    Other,
}

impl UsageEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageEventKind::Resumed => "resumed",
            UsageEventKind::Paused => "paused",
            UsageEventKind::Other => "other",
        }
    }

    /// Unknown names map to `Other` so new platform events never fail a read.
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "resumed" | "activity_resumed" => UsageEventKind::Resumed,
            "paused" | "activity_paused" => UsageEventKind::Paused,
            _ => UsageEventKind::Other,
        }
    }
}

/// One time-stamped foreground/background event for an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEvent {
    /// Opaque app identifier, e.g. a package name. Events without one are skipped.
    pub package: Option<String>,
    pub kind: UsageEventKind,
    pub timestamp_ms: EpochMillis,
}

impl UsageEvent {
    pub fn new(package: impl Into<String>, kind: UsageEventKind, timestamp_ms: EpochMillis) -> Self {
        Self {
            package: Some(package.into()),
            kind,
            timestamp_ms,
        }
    }
}

/// Read-only source of usage events, queried once per report.
pub trait UsageSource {
    type Error;

    /// Events between `start_ms` and `end_ms`, in time order.
    fn query_events(
        &self,
        start_ms: EpochMillis,
        end_ms: EpochMillis,
    ) -> Result<Vec<UsageEvent>, Self::Error>;
}

/// Window from local midnight of `now`'s day up to `now`.
pub fn day_window(now: DateTime<Local>) -> (EpochMillis, EpochMillis) {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    let start = match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Midnight skipped by a DST change; the day starts at `now`'s offset.
        LocalResult::None => now - (now.naive_local() - midnight),
    };
    (start.timestamp_millis(), now.timestamp_millis())
}

/// Per-app foreground time in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageReport {
    totals: HashMap<String, i64>,
}

/// A single row of the usage list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageEntry {
    pub package: String,
    pub millis: i64,
}

impl UsageEntry {
    pub fn bucket(&self) -> UsageBucket {
        UsageBucket::from_millis(self.millis)
    }

    pub fn minutes(&self) -> f32 {
        self.millis as f32 / MILLIS_PER_MINUTE as f32
    }
}

/// How a duration is described in the usage list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageBucket {
    Minutes(i64),
    UnderAMinute,
    Zero,
}

impl UsageBucket {
    pub fn from_millis(millis: i64) -> Self {
        let seconds = millis / 1000;
        let minutes = seconds / 60;
        if minutes > 0 {
            UsageBucket::Minutes(minutes)
        } else if seconds > 0 {
            UsageBucket::UnderAMinute
        } else {
            UsageBucket::Zero
        }
    }
}

impl std::fmt::Display for UsageBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageBucket::Minutes(1) => write!(f, "1 minute"),
            UsageBucket::Minutes(n) => write!(f, "{} minutes", n),
            UsageBucket::UnderAMinute => write!(f, "Less than a minute"),
            UsageBucket::Zero => write!(f, "0 minutes"),
        }
    }
}

/// A chart bar: position and height in minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartEntry {
    pub index: usize,
    pub minutes: f32,
}

impl UsageReport {
    pub fn get(&self, package: &str) -> i64 {
        self.totals.get(package).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn total_millis(&self) -> i64 {
        self.totals.values().fold(0, |acc, millis| acc.saturating_add(*millis))
    }

    /// Every app with a closed span, longest first. Ties sort by package.
    /// Apps whose spans add up to nothing are kept and show as `Zero`.
    pub fn ranked(&self) -> Vec<UsageEntry> {
        let mut entries: Vec<UsageEntry> = self
            .totals
            .iter()
            .map(|(package, millis)| UsageEntry {
                package: package.clone(),
                millis: *millis,
            })
            .collect();
        entries.sort_by(|a, b| b.millis.cmp(&a.millis).then_with(|| a.package.cmp(&b.package)));
        entries
    }

    /// The top `limit` apps used for longer than `min_millis`.
    pub fn chart_entries(&self, limit: usize, min_millis: i64) -> Vec<ChartEntry> {
        self.ranked()
            .iter()
            .filter(|e| e.millis > min_millis)
            .take(limit)
            .enumerate()
            .map(|(index, e)| ChartEntry {
                index,
                minutes: e.minutes(),
            })
            .collect()
    }
}

/// Sum foreground spans per app.
///
/// A `Resumed` opens a span for its app and the next `Paused` closes it.
/// Pauses with no open span are ignored, and a second `Resumed` restarts
/// the span. Spans with a negative length, or one too long for `i64`, are
/// dropped, and per-app totals saturate at `i64::MAX`.
pub fn aggregate<'a>(events: impl IntoIterator<Item = &'a UsageEvent>) -> UsageReport {
    let mut totals: HashMap<String, i64> = HashMap::new();
    let mut open: HashMap<&'a str, EpochMillis> = HashMap::new();

    for event in events {
        let Some(package) = event.package.as_deref() else {
            continue;
        };
        match event.kind {
            UsageEventKind::Resumed => {
                open.insert(package, event.timestamp_ms);
            }
            UsageEventKind::Paused => {
                let span = open
                    .remove(package)
                    .and_then(|start| event.timestamp_ms.checked_sub(start))
                    .filter(|span| *span >= 0);
                if let Some(span) = span {
                    let total = totals.entry(package.to_string()).or_insert(0);
                    *total = total.saturating_add(span);
                }
            }
            UsageEventKind::Other => {}
        }
    }

    UsageReport { totals }
}

/// Query today's events from `source` and aggregate them.
pub fn today_usage<S: UsageSource>(source: &S, now: DateTime<Local>) -> Result<UsageReport, S::Error> {
    let (start, end) = day_window(now);
    let events = source.query_events(start, end)?;
    Ok(aggregate(&events))
}
