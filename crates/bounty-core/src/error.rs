//! Bounty Hunter 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 이 타입을 그대로 반환한다.
//! 사용자 액션 하나의 실패는 해당 호출 지점에서 복구 가능하며,
//! 프로세스 전체를 중단시키는 에러는 없다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 인증이 필요한 요청인데 토큰이 없음 (요청은 전송되지 않음)
    #[error("로그인이 필요합니다")]
    Unauthenticated,

    /// 전송 계층 실패 (타임아웃, DNS, 연결 거부)
    #[error("네트워크 연결 실패: {0}")]
    NetworkUnavailable(String),

    /// 서버가 2xx 이외의 상태 코드로 응답
    #[error("서버 거부 ({status}): {message}")]
    ServerRejected {
        /// HTTP 상태 코드
        status: u16,
        /// 응답 본문의 `error` 필드, 없으면 상태 텍스트
        message: String,
    },

    /// 2xx 응답이지만 본문을 해석할 수 없음
    #[error("잘못된 서버 응답: {0}")]
    MalformedResponse(String),

    /// 입력 필드 유효성 검증 실패 (요청 전송 전)
    #[error("유효성 검증 실패 ({field}): {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 로컬 키-값 저장소 에러
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 유효성 검증 에러 생성 헬퍼
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 서버 거부 상태 코드 (ServerRejected가 아니면 None)
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerRejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 호출 지점에서 사용자에게 보여주고 계속 진행할 수 있는 에러인지
    ///
    /// API 실패와 입력 검증 실패는 해당 액션에만 국한된다.
    /// 저장소/설정/내부 에러는 재시도해도 같은 결과일 가능성이 높다.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated
                | Self::NetworkUnavailable(_)
                | Self::ServerRejected { .. }
                | Self::MalformedResponse(_)
                | Self::Validation { .. }
        )
    }
}
