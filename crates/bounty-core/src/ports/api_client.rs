//! 백엔드 API 포트.
//!
//! 구현: `bounty-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::recurring::{CreateRecurringRequest, RecurringWorkout};
use crate::models::suggestion::Suggestion;
use crate::models::user::{LoginRequest, LoginResponse, RegisterRequest, User};
use crate::models::workout::{LogWorkoutRequest, Workout};

/// Bounty Hunter REST API (`/api` 하위)
///
/// 인증이 필요한 호출은 토큰이 없으면 요청 없이 `CoreError::Unauthenticated`를 반환한다.
#[async_trait]
pub trait BountyApi: Send + Sync {
    /// 회원가입 (`POST /register`, 인증 불필요)
    async fn register(&self, request: &RegisterRequest) -> Result<User, CoreError>;

    /// 로그인 (`POST /login`, 인증 불필요)
    ///
    /// 세션 저장은 호출자 책임이다.
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, CoreError>;

    /// 운동 제안 목록 (`GET /suggestions`)
    async fn suggestions(&self) -> Result<Vec<Suggestion>, CoreError>;

    /// 운동 기록 (`POST /workouts`)
    async fn log_workout(&self, request: &LogWorkoutRequest) -> Result<Workout, CoreError>;

    /// 운동 이력 (`GET /workouts`)
    async fn workouts(&self) -> Result<Vec<Workout>, CoreError>;

    /// 반복 운동 목록 (`GET /recurring`)
    async fn recurring_workouts(&self) -> Result<Vec<RecurringWorkout>, CoreError>;

    /// 반복 운동 생성 (`POST /recurring`)
    async fn create_recurring(
        &self,
        request: &CreateRecurringRequest,
    ) -> Result<RecurringWorkout, CoreError>;
}
