//! 사용자 및 인증 모델.
//!
//! 회원가입/로그인 요청과 응답, 활동 유형을 정의한다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::require_field;
use crate::error::CoreError;

/// 서버가 반환하는 사용자 식별 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// 로그인 요청 (`POST /login`)
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// 자격증명 누락 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        require_field("username", &self.username)?;
        if self.password.is_empty() {
            return Err(CoreError::validation("password", "필수 입력 항목입니다"));
        }
        Ok(())
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 로그인 응답: 토큰과 사용자 정보
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"***")
            .field("user", &self.user)
            .finish()
    }
}

/// 회원가입 요청 (`POST /register`)
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    pub activity_types: Vec<ActivityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_info: Option<String>,
}

impl RegisterRequest {
    /// 필수 필드만 채운 요청 생성
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            full_name: None,
            location: None,
            age: None,
            weight: None,
            activity_types: Vec::new(),
            payment_info: None,
        }
    }

    /// 가입 폼 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        require_field("username", &self.username)?;
        require_field("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(CoreError::validation("email", "이메일 형식이 아닙니다"));
        }
        if self.password.is_empty() {
            return Err(CoreError::validation("password", "필수 입력 항목입니다"));
        }
        if self.age == Some(0) {
            return Err(CoreError::validation("age", "0보다 커야 합니다"));
        }
        if self.weight == Some(0) {
            return Err(CoreError::validation("weight", "0보다 커야 합니다"));
        }
        Ok(())
    }

    /// 가입 직후 로그인에 쓸 자격증명
    pub fn credentials(&self) -> LoginRequest {
        LoginRequest::new(self.username.clone(), self.password.clone())
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .field("full_name", &self.full_name)
            .field("location", &self.location)
            .field("age", &self.age)
            .field("weight", &self.weight)
            .field("activity_types", &self.activity_types)
            .field("payment_info", &self.payment_info.as_ref().map(|_| "***"))
            .finish()
    }
}

/// 선호 활동 유형 (서버가 제안 필터링에 사용)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Individual,
    Group,
    Gym,
    Sports,
    Free,
}

impl ActivityType {
    /// 전체 유형 목록
    pub const ALL: [ActivityType; 5] = [
        ActivityType::Individual,
        ActivityType::Group,
        ActivityType::Gym,
        ActivityType::Sports,
        ActivityType::Free,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Individual => "individual",
            ActivityType::Group => "group",
            ActivityType::Gym => "gym",
            ActivityType::Sports => "sports",
            ActivityType::Free => "free",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                CoreError::validation(
                    "activity_types",
                    format!("알 수 없는 활동 유형: {s} (individual|group|gym|sports|free)"),
                )
            })
    }
}
