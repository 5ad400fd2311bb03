use super::serde_time::hhmm;
use crate::error::ValidationError;
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::fmt;

pub const MIN_REJECTION_REASON_CHARS: usize = 10;

/// Identifier assigned by the backend. Accepts JSON numbers as well as strings.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => EntityId(s),
            Raw::Number(n) => EntityId(n.to_string()),
        })
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        EntityId(value)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        EntityId(value.to_string())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TutoringStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

impl TutoringStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TutoringStatus::Rejected | TutoringStatus::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TutoringStatus::Pending => "pending",
            TutoringStatus::Accepted => "accepted",
            TutoringStatus::Rejected => "rejected",
            TutoringStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TutoringStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meeting link with a guaranteed `http://` or `https://` scheme.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct MeetingUrl(String);

impl MeetingUrl {
    /// Returns `None` for blank input. Prepends `https://` when no scheme is present.
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Some(MeetingUrl(trimmed.to_string()))
        } else {
            Some(MeetingUrl(format!("https://{}", trimmed)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for MeetingUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MeetingUrl::normalize(&raw).ok_or_else(|| D::Error::custom("meeting_url is blank"))
    }
}

/// A blank `meeting_url` from the backend means no link.
fn optional_meeting_url<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<MeetingUrl>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(MeetingUrl::normalize))
}

impl fmt::Display for MeetingUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trimmed rejection message of at least [`MIN_REJECTION_REASON_CHARS`] characters.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct RejectionReason(String);

impl RejectionReason {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let actual = trimmed.chars().count();
        if actual < MIN_REJECTION_REASON_CHARS {
            return Err(ValidationError::ReasonTooShort {
                min: MIN_REJECTION_REASON_CHARS,
                actual,
            });
        }
        Ok(RejectionReason(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RejectionReason {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RejectionReason::parse(&raw).map_err(D::Error::custom)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TutoringRequest {
    pub id: EntityId,
    pub student_id: EntityId,
    pub teacher_id: EntityId,
    pub requested_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub requested_time: NaiveTime,
    pub status: TutoringStatus,
    #[serde(
        default,
        deserialize_with = "optional_meeting_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub meeting_url: Option<MeetingUrl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<RejectionReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attended: Option<bool>,
}

impl TutoringRequest {
    /// Instant the session begins, reading date and time as wall clock in `tz`.
    ///
    /// A time repeated by a backward shift resolves to its first occurrence.
    /// A time skipped by a forward shift resolves to the instant it would have
    /// had under the earlier offset.
    pub fn session_start(&self, tz: Tz) -> DateTime<Utc> {
        let local = self.requested_date.and_time(self.requested_time);
        match tz.from_local_datetime(&local) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
            LocalResult::None => tz
                .from_local_datetime(&(local + Duration::hours(1)))
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| Utc.from_utc_datetime(&local)),
        }
    }
}
