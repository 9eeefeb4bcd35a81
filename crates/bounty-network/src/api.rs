//! Bounty Hunter REST API: `BountyApi` 포트 구현.

use async_trait::async_trait;
use bounty_core::error::CoreError;
use bounty_core::models::recurring::{CreateRecurringRequest, RecurringWorkout};
use bounty_core::models::suggestion::Suggestion;
use bounty_core::models::user::{LoginRequest, LoginResponse, RegisterRequest, User};
use bounty_core::models::workout::{LogWorkoutRequest, Workout};
use bounty_core::ports::api_client::BountyApi;
use tracing::debug;

use crate::http_client::{ApiRequest, RequestClient};

/// REST API 클라이언트
///
/// 요청 DTO는 전송 전에 검증하며, 검증 실패 시 요청을 보내지 않는다.
pub struct HttpBountyApi {
    client: RequestClient,
}

impl HttpBountyApi {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BountyApi for HttpBountyApi {
    async fn register(&self, request: &RegisterRequest) -> Result<User, CoreError> {
        request.validate()?;
        debug!("회원가입 요청: username={}", request.username);
        let user: User = self
            .client
            .send(ApiRequest::post("/register", request)?.public())
            .await?;
        debug!("회원가입 성공: user_id={}", user.id);
        Ok(user)
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, CoreError> {
        request.validate()?;
        debug!("로그인 요청: username={}", request.username);
        self.client
            .send(ApiRequest::post("/login", request)?.public())
            .await
    }

    async fn suggestions(&self) -> Result<Vec<Suggestion>, CoreError> {
        let suggestions: Vec<Suggestion> =
            self.client.send(ApiRequest::get("/suggestions")).await?;
        debug!("운동 제안 {}건 수신", suggestions.len());
        Ok(suggestions)
    }

    async fn log_workout(&self, request: &LogWorkoutRequest) -> Result<Workout, CoreError> {
        request.validate()?;
        let workout: Workout = self
            .client
            .send(ApiRequest::post("/workouts", request)?)
            .await?;
        debug!("운동 기록 완료: workout_id={}", workout.id);
        Ok(workout)
    }

    async fn workouts(&self) -> Result<Vec<Workout>, CoreError> {
        let workouts: Vec<Workout> = self.client.send(ApiRequest::get("/workouts")).await?;
        debug!("운동 이력 {}건 수신", workouts.len());
        Ok(workouts)
    }

    async fn recurring_workouts(&self) -> Result<Vec<RecurringWorkout>, CoreError> {
        self.client.send(ApiRequest::get("/recurring")).await
    }

    async fn create_recurring(
        &self,
        request: &CreateRecurringRequest,
    ) -> Result<RecurringWorkout, CoreError> {
        request.validate()?;
        let recurring: RecurringWorkout = self
            .client
            .send(ApiRequest::post("/recurring", request)?)
            .await?;
        debug!("반복 운동 생성: id={}", recurring.id);
        Ok(recurring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use bounty_core::models::recurring::RecurringSchedule;
    use bounty_core::models::user::ActivityType;
    use bounty_session::SessionStore;
    use bounty_storage::memory::MemoryKeyValueStore;
    use mockito::Matcher;
    use serde_json::json;
    use std::sync::Arc;

    /// 토큰 "abc"로 로그인된 세션을 가진 API 클라이언트
    fn authed_api(server: &mockito::ServerGuard) -> HttpBountyApi {
        let session = Arc::new(SessionStore::load(Arc::new(MemoryKeyValueStore::new())));
        session
            .save(
                "abc".to_string(),
                User {
                    id: 1,
                    username: "alice".to_string(),
                    email: "a@x.com".to_string(),
                },
            )
            .unwrap();
        let client = RequestClient::new(&format!("{}/api", server.url()), session, None).unwrap();
        HttpBountyApi::new(client)
    }

    #[tokio::test]
    async fn register_sends_full_form() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/register")
            .match_body(Matcher::Json(json!({
                "username": "bob",
                "email": "bob@x.com",
                "password": "pw",
                "age": 30,
                "activity_types": ["gym", "sports"]
            })))
            .with_status(201)
            .with_body(r#"{"id":2,"username":"bob","email":"bob@x.com"}"#)
            .create_async()
            .await;

        let api = authed_api(&server);
        let mut request = RegisterRequest::new("bob", "bob@x.com", "pw");
        request.age = Some(30);
        request.activity_types = vec![ActivityType::Gym, ActivityType::Sports];

        let user = api.register(&request).await.unwrap();
        assert_eq!(user.id, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn invalid_register_form_is_not_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/register")
            .expect(0)
            .create_async()
            .await;

        let api = authed_api(&server);
        let err = api
            .register(&RegisterRequest::new("bob", "not-an-email", "pw"))
            .await
            .unwrap_err();

        assert_matches!(err, CoreError::Validation { ref field, .. } if field == "email");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn suggestions_decoded() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/suggestions")
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .with_body(
                r#"[{"id":1,"title":"Morning Run","type":"individual","duration":"30 min"},
                    {"id":4,"title":"Pickup Basketball","type":"sports","duration":"60 min"}]"#,
            )
            .create_async()
            .await;

        let suggestions = authed_api(&server).suggestions().await.unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[1].kind, "sports");
    }

    #[tokio::test]
    async fn log_workout_posts_type_and_notes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/workouts")
            .match_body(Matcher::Json(json!({
                "title": "Morning Run",
                "type": "individual",
                "duration": "30 min",
                "data": {"notes": "felt good"}
            })))
            .with_status(201)
            .with_body(
                r#"{"id":9,"user_id":1,"title":"Morning Run","type":"individual",
                    "duration":"30 min","data":{"notes":"felt good"},
                    "timestamp":"2024-03-01T07:30:00.123456"}"#,
            )
            .create_async()
            .await;

        let request = LogWorkoutRequest::new(
            "Morning Run",
            "individual",
            "30 min",
            Some("felt good".to_string()),
        );
        let workout = authed_api(&server).log_workout(&request).await.unwrap();

        assert_eq!(workout.id, 9);
        assert_eq!(workout.notes(), Some("felt good"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn workouts_and_recurring_lists() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/workouts")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        server
            .mock("GET", "/api/recurring")
            .with_status(200)
            .with_body(
                r#"[{"id":3,"user_id":1,"title":"Yoga","schedule":"weekly",
                    "created_at":"2024-02-10T12:00:00"}]"#,
            )
            .create_async()
            .await;

        let api = authed_api(&server);
        assert!(api.workouts().await.unwrap().is_empty());
        let recurring = api.recurring_workouts().await.unwrap();
        assert_eq!(recurring[0].schedule, "weekly");
    }

    #[tokio::test]
    async fn create_recurring_sends_schedule() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/recurring")
            .match_body(Matcher::Json(json!({"title": "Yoga", "schedule": "biweekly"})))
            .with_status(201)
            .with_body(
                r#"{"id":5,"user_id":1,"title":"Yoga","schedule":"biweekly",
                    "created_at":"2024-02-10T12:00:00"}"#,
            )
            .create_async()
            .await;

        let request = CreateRecurringRequest::new("Yoga", RecurringSchedule::Biweekly);
        let recurring = authed_api(&server).create_recurring(&request).await.unwrap();
        assert_eq!(recurring.id, 5);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn blank_workout_title_rejected_before_send() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/workouts")
            .expect(0)
            .create_async()
            .await;

        let request = LogWorkoutRequest::new(" ", "gym", "45 min", None);
        let err = authed_api(&server).log_workout(&request).await.unwrap_err();

        assert_matches!(err, CoreError::Validation { .. });
        mock.assert_async().await;
    }
}
