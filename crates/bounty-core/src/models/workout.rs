//! 운동 기록 모델.
//!
//! 서버 타임스탬프는 타임존 없는 ISO-8601 (UTC 기준)로 내려온다.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::require_field;
use crate::error::CoreError;

/// 기록된 운동 (`GET/POST /workouts`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: String,
    #[serde(default)]
    pub data: Option<WorkoutData>,
    pub timestamp: NaiveDateTime,
}

impl Workout {
    /// 메모 (없으면 None)
    pub fn notes(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.notes.as_deref())
    }
}

/// 운동 부가 데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// 운동 기록 요청
#[derive(Debug, Clone, Serialize)]
pub struct LogWorkoutRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: String,
    pub data: WorkoutData,
}

impl LogWorkoutRequest {
    pub fn new(
        title: impl Into<String>,
        kind: impl Into<String>,
        duration: impl Into<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            kind: kind.into(),
            duration: duration.into(),
            // 빈 메모는 보내지 않는다
            data: WorkoutData {
                notes: notes.filter(|n| !n.trim().is_empty()),
            },
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        require_field("title", &self.title)?;
        require_field("type", &self.kind)?;
        require_field("duration", &self.duration)
    }
}
