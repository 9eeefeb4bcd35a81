//! Bounty Hunter 도메인 모델.
//!
//! 백엔드와 주고받는 DTO와 클라이언트 세션 모델을 정의한다.
//! 와이어 필드명은 snake_case를 그대로 유지한다.

pub mod recurring;
pub mod session;
pub mod suggestion;
pub mod user;
pub mod workout;

use crate::error::CoreError;

/// 필수 문자열 필드 검증 (공백만 있는 값도 거부)
pub(crate) fn require_field(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, "필수 입력 항목입니다"));
    }
    Ok(())
}
