//! 운동 제안 모델.

use serde::{Deserialize, Serialize};

/// 서버가 사용자 활동 유형에 맞춰 내려주는 운동 제안
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: i64,
    pub title: String,
    /// 활동 유형 (예: "gym", "group")
    #[serde(rename = "type")]
    pub kind: String,
    /// 표시용 소요 시간 (예: "30 mins")
    pub duration: String,
}
