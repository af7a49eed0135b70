//! Core domain types for daygrid
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Session** | One scheduled training event with a start and end wall-clock time |
//! | **Span** | A session's interval in minutes since midnight, after normalization |
//! | **Cluster** | A maximal set of sessions whose intervals transitively overlap |
//! | **Offset** | A session's column index within its cluster |
//! | **Group size** | The number of sessions in a session's cluster |
//!
//! Display fields (title, participant labels, anything else the schedule
//! backend sends) travel in [`SessionDisplay`]. The layout engine never reads
//! them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::time::to_minutes;

// ============================================
// Session
// ============================================

/// Identifier of a session, unique within one rendered set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        SessionId(value.to_string())
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        SessionId(value)
    }
}

/// Opaque display payload carried alongside a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDisplay {
    /// Session title (e.g., "Track intervals")
    #[serde(default)]
    pub title: String,
    /// Athlete or coach names shown on the card
    #[serde(default)]
    pub participants: Vec<String>,
    /// Any other fields from the schedule backend
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A scheduled training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: SessionId,
    /// Calendar date the session belongs to
    pub date: NaiveDate,
    /// Start time, `HH:MM`
    pub start_time: String,
    /// End time, `HH:MM`
    pub end_time: String,
    /// Display payload
    #[serde(flatten)]
    pub display: SessionDisplay,
}

impl Session {
    /// Create a session with an empty display payload.
    pub fn new(
        id: impl Into<SessionId>,
        date: NaiveDate,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            start_time: start_time.into(),
            end_time: end_time.into(),
            display: SessionDisplay::default(),
        }
    }

    /// Attach a title to the display payload.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.display.title = title.into();
        self
    }

    /// Start time in minutes since midnight.
    pub fn start_minutes(&self) -> Result<u32> {
        to_minutes(&self.start_time)
    }

    /// End time in minutes since midnight, as written.
    pub fn end_minutes(&self) -> Result<u32> {
        to_minutes(&self.end_time)
    }

    /// The interval used for grouping.
    ///
    /// A session whose end is not after its start is stretched to one
    /// minute so it still occupies a slot. The raw strings are untouched.
    pub fn span(&self) -> Result<TimeSpan> {
        let start = self.start_minutes()?;
        let end = self.end_minutes()?;

        if end <= start {
            tracing::debug!(
                session_id = %self.id,
                start_time = %self.start_time,
                end_time = %self.end_time,
                "Non-positive session duration, treating as one minute"
            );
            return Ok(TimeSpan {
                start,
                end: start + 1,
                normalized: true,
            });
        }

        Ok(TimeSpan {
            start,
            end,
            normalized: false,
        })
    }
}

// ============================================
// Time span
// ============================================

/// A half-open interval `[start, end)` in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: u32,
    pub end: u32,
    /// True when the session's raw end was not after its start
    pub normalized: bool,
}

impl TimeSpan {
    /// Whether two spans share any minute. Touching spans do not overlap.
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_span() {
        let session = Session::new("a", date(), "08:00", "09:30");
        let span = session.span().unwrap();
        assert_eq!(span.start, 480);
        assert_eq!(span.end, 570);
        assert!(!span.normalized);
    }

    #[test]
    fn test_span_normalizes_zero_and_negative_durations() {
        let zero = Session::new("z", date(), "10:00", "10:00").span().unwrap();
        assert_eq!((zero.start, zero.end, zero.normalized), (600, 601, true));

        // Crossing midnight, e.g. 23:30-00:30
        let wrapped = Session::new("w", date(), "23:30", "00:30").span().unwrap();
        assert_eq!((wrapped.start, wrapped.end, wrapped.normalized), (1410, 1411, true));
    }

    #[test]
    fn test_span_rejects_bad_times() {
        let session = Session::new("bad", date(), "8am", "09:00");
        assert!(session.span().is_err());
    }

    #[test]
    fn test_overlaps_is_strict() {
        let a = TimeSpan { start: 480, end: 540, normalized: false };
        let b = TimeSpan { start: 540, end: 600, normalized: false };
        let c = TimeSpan { start: 510, end: 570, normalized: false };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_session_json_shape() {
        let json = r#"{
            "id": "s-1",
            "date": "2025-03-10",
            "start_time": "06:00",
            "end_time": "07:15",
            "title": "Track intervals",
            "participants": ["Ana", "Ben"],
            "coach": "Kim"
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.id.as_str(), "s-1");
        assert_eq!(session.display.title, "Track intervals");
        assert_eq!(session.display.participants, vec!["Ana", "Ben"]);
        assert_eq!(session.display.extra["coach"], "Kim");
    }
}
