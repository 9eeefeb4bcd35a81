//! 반복 운동 모델.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::require_field;
use crate::error::CoreError;

/// 반복 운동 일정 (`GET/POST /recurring`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringWorkout {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    /// 서버가 저장한 일정 문자열 그대로
    pub schedule: String,
    pub created_at: NaiveDateTime,
}

/// 반복 주기
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringSchedule {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

impl RecurringSchedule {
    pub const ALL: [RecurringSchedule; 4] = [
        RecurringSchedule::Daily,
        RecurringSchedule::Weekly,
        RecurringSchedule::Biweekly,
        RecurringSchedule::Monthly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringSchedule::Daily => "daily",
            RecurringSchedule::Weekly => "weekly",
            RecurringSchedule::Biweekly => "biweekly",
            RecurringSchedule::Monthly => "monthly",
        }
    }
}

impl fmt::Display for RecurringSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurringSchedule {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|sch| sch.as_str() == normalized)
            .ok_or_else(|| {
                CoreError::validation(
                    "schedule",
                    format!("알 수 없는 주기: {s} (daily|weekly|biweekly|monthly)"),
                )
            })
    }
}

/// 반복 운동 생성 요청
#[derive(Debug, Clone, Serialize)]
pub struct CreateRecurringRequest {
    pub title: String,
    pub schedule: RecurringSchedule,
}

impl CreateRecurringRequest {
    pub fn new(title: impl Into<String>, schedule: RecurringSchedule) -> Self {
        Self {
            title: title.into(),
            schedule,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        require_field("title", &self.title)
    }
}
