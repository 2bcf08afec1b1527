//! Walk schedules and the per-dog walk diary.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

const MAX_MEMO_CHARS: usize = 1_000;
const MAX_HASHTAGS: usize = 20;
const MAX_IMAGES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Scheduled,
    Done,
}

impl ScheduleStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScheduleStatus::Scheduled => "scheduled",
            ScheduleStatus::Done => "done",
        }
    }

    /// Status as seen at `now`: a scheduled walk whose time has passed is done.
    #[must_use]
    pub fn as_of(self, scheduled_at: DateTime<Utc>, now: DateTime<Utc>) -> ScheduleStatus {
        match self {
            ScheduleStatus::Scheduled if scheduled_at <= now => ScheduleStatus::Done,
            other => other,
        }
    }
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(ScheduleStatus::Scheduled),
            "done" => Ok(ScheduleStatus::Done),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

/// Input for creating or editing a walk schedule.
///
/// `dog_id` is the user's own dog; `target_dog_id` is the dog they plan to
/// walk with, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWalkSchedule {
    #[serde(default)]
    pub dog_id: Option<Uuid>,
    #[serde(default)]
    pub target_dog_id: Option<Uuid>,
    #[serde(default)]
    pub memo: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default = "default_schedule_status")]
    pub status: ScheduleStatus,
}

fn default_schedule_status() -> ScheduleStatus {
    ScheduleStatus::Scheduled
}

impl NewWalkSchedule {
    /// Check the schedule against the clock before it is written.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if a still-scheduled walk is not in
    /// the future, the memo is too long, or the dog walks with itself.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), CoreError> {
        if self.status == ScheduleStatus::Scheduled && self.scheduled_at <= now {
            return Err(CoreError::Validation(
                "scheduled_at must be in the future for a scheduled walk".to_string(),
            ));
        }
        if self.dog_id.is_some() && self.dog_id == self.target_dog_id {
            return Err(CoreError::Validation(
                "target_dog_id must differ from dog_id".to_string(),
            ));
        }
        validate_memo(self.memo.as_deref())
    }

    /// Memo with surrounding whitespace removed; blank becomes `None`.
    #[must_use]
    pub fn memo(&self) -> Option<&str> {
        non_blank(self.memo.as_deref())
    }
}

/// Input for a diary entry about one dog's walk.
///
/// Image URLs are stored as given; nothing here fetches or uploads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDogHistory {
    pub entry_date: NaiveDate,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl NewDogHistory {
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for an oversized memo, too many tags
    /// or images, or a blank image URL.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_memo(self.memo.as_deref())?;

        if self.hashtags.len() > MAX_HASHTAGS {
            return Err(CoreError::Validation(format!(
                "at most {MAX_HASHTAGS} hashtags allowed"
            )));
        }
        if self.image_urls.len() > MAX_IMAGES {
            return Err(CoreError::Validation(format!(
                "at most {MAX_IMAGES} images allowed"
            )));
        }
        if self.image_urls.iter().any(|url| url.trim().is_empty()) {
            return Err(CoreError::Validation(
                "image_urls must not contain blank entries".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn memo(&self) -> Option<&str> {
        non_blank(self.memo.as_deref())
    }

    /// Tags without a leading `#`, blank ones dropped, first spelling kept
    /// when the same tag repeats.
    #[must_use]
    pub fn normalized_hashtags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::with_capacity(self.hashtags.len());
        for raw in &self.hashtags {
            let tag = raw.trim().trim_start_matches('#').trim();
            if tag.is_empty() || tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                continue;
            }
            tags.push(tag.to_string());
        }
        tags
    }

    #[must_use]
    pub fn trimmed_image_urls(&self) -> Vec<String> {
        self.image_urls
            .iter()
            .map(|url| url.trim().to_string())
            .collect()
    }
}

fn validate_memo(memo: Option<&str>) -> Result<(), CoreError> {
    match memo {
        Some(text) if text.chars().count() > MAX_MEMO_CHARS => Err(CoreError::Validation(
            format!("memo exceeds {MAX_MEMO_CHARS} characters"),
        )),
        _ => Ok(()),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
