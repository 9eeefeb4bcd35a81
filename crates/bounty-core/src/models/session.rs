//! 클라이언트 세션 모델.
//!
//! 토큰과 사용자 정보는 항상 함께 존재하거나 함께 없다.
//! 이 불변식은 열거형 구조로 강제된다.

use std::fmt;

use super::user::User;

/// 현재 인증 상태에 대한 클라이언트의 판단
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// 토큰 없음
    #[default]
    Unauthenticated,
    /// 토큰 + 캐시된 사용자
    Authenticated { token: String, user: User },
}

impl Session {
    pub fn authenticated(token: String, user: User) -> Self {
        Session::Authenticated { token, user }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            Session::Unauthenticated => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            Session::Unauthenticated => None,
        }
    }

    /// `Authorization` 헤더 값. None이면 헤더를 붙이지 않는다 (빈 문자열 아님).
    pub fn bearer_header_value(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {t}"))
    }

    /// 관찰자용 요약 상태
    pub fn status(&self) -> AuthStatus {
        if self.is_authenticated() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }
}

// 토큰은 로그에 남기지 않는다
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Unauthenticated => f.write_str("Unauthenticated"),
            Session::Authenticated { user, .. } => f
                .debug_struct("Authenticated")
                .field("token", &"***")
                .field("user", user)
                .finish(),
        }
    }
}

/// 인증 상태 요약
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Unauthenticated,
    Authenticated,
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStatus::Unauthenticated => write!(f, "Unauthenticated"),
            AuthStatus::Authenticated => write!(f, "Authenticated"),
        }
    }
}
