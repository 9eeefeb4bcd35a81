//! 로그인/회원가입/로그아웃 흐름.
//!
//! 서버 호출 결과를 `SessionStore`에 반영하는 유일한 경로.
//! 실패한 로그인이나 회원가입은 세션을 건드리지 않는다.

use bounty_core::error::CoreError;
use bounty_core::models::user::{LoginRequest, RegisterRequest, User};
use bounty_core::ports::api_client::BountyApi;
use bounty_session::SessionStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 인증 서비스
pub struct AuthService {
    api: Arc<dyn BountyApi>,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: Arc<dyn BountyApi>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// 로그인 후 세션 저장
    pub async fn login(&self, username: &str, password: &str) -> Result<User, CoreError> {
        self.login_with(&LoginRequest::new(username, password)).await
    }

    async fn login_with(&self, request: &LoginRequest) -> Result<User, CoreError> {
        request.validate()?;

        let response = self
            .api
            .login(request)
            .await
            .inspect_err(|e| warn!("로그인 실패: {e}"))?;

        if response.token.trim().is_empty() {
            return Err(CoreError::MalformedResponse(
                "로그인 응답에 토큰이 없습니다".to_string(),
            ));
        }

        let user = response.user.clone();
        self.session.save(response.token, response.user)?;
        info!("로그인 성공: user_id={}", user.id);
        Ok(user)
    }

    /// 회원가입만 수행 (세션은 그대로)
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, CoreError> {
        request.validate()?;
        let user = self.api.register(request).await?;
        info!("회원가입 완료: user_id={}", user.id);
        Ok(user)
    }

    /// 회원가입 직후 같은 자격증명으로 로그인
    pub async fn register_and_login(&self, request: &RegisterRequest) -> Result<User, CoreError> {
        self.register(request).await?;
        debug!("가입 직후 자동 로그인: username={}", request.username);
        self.login_with(&request.credentials()).await
    }

    /// 로그아웃 (서버 호출 없음)
    pub fn logout(&self) -> Result<(), CoreError> {
        self.session.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpBountyApi;
    use crate::http_client::RequestClient;
    use assert_matches::assert_matches;
    use bounty_storage::memory::MemoryKeyValueStore;
    use mockito::Matcher;

    fn setup(server: &mockito::ServerGuard) -> (AuthService, Arc<SessionStore>, Arc<HttpBountyApi>) {
        let session = Arc::new(SessionStore::load(Arc::new(MemoryKeyValueStore::new())));
        let client =
            RequestClient::new(&format!("{}/api", server.url()), session.clone(), None).unwrap();
        let api = Arc::new(HttpBountyApi::new(client));
        let auth = AuthService::new(api.clone(), session.clone());
        (auth, session, api)
    }

    #[tokio::test]
    async fn login_saves_session_and_later_calls_carry_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/login")
            .match_body(Matcher::Json(
                serde_json::json!({"username": "alice", "password": "secret"}),
            ))
            .with_status(200)
            .with_body(r#"{"token":"abc","user":{"id":1,"username":"alice","email":"a@x.com"}}"#)
            .create_async()
            .await;
        let suggestions = server
            .mock("GET", "/api/suggestions")
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let (auth, session, api) = setup(&server);
        let user = auth.login("alice", "secret").await.unwrap();

        assert_eq!(user.username, "alice");
        assert!(session.is_authenticated());
        assert_eq!(session.bearer_header_value().as_deref(), Some("Bearer abc"));

        api.suggestions().await.unwrap();
        suggestions.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_login_leaves_session_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/login")
            .with_status(401)
            .with_body(r#"{"error":"bad password"}"#)
            .create_async()
            .await;

        let (auth, session, _) = setup(&server);
        let err = auth.login("alice", "wrong").await.unwrap_err();

        assert_matches!(
            err,
            CoreError::ServerRejected { status: 401, ref message } if message == "bad password"
        );
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn rejected_relogin_keeps_existing_session() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/login")
            .match_body(Matcher::PartialJson(serde_json::json!({"username": "alice"})))
            .with_status(200)
            .with_body(r#"{"token":"abc","user":{"id":1,"username":"alice","email":"a@x.com"}}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/api/login")
            .match_body(Matcher::PartialJson(serde_json::json!({"username": "bob"})))
            .with_status(401)
            .with_body(r#"{"error":"Invalid credentials"}"#)
            .create_async()
            .await;

        let (auth, session, _) = setup(&server);
        auth.login("alice", "secret").await.unwrap();
        assert!(auth.login("bob", "nope").await.is_err());

        assert_eq!(session.current_user().map(|u| u.username), Some("alice".to_string()));
    }

    #[tokio::test]
    async fn blank_credentials_never_reach_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/login")
            .expect(0)
            .create_async()
            .await;

        let (auth, _, _) = setup(&server);
        let err = auth.login("   ", "secret").await.unwrap_err();
        assert_matches!(err, CoreError::Validation { ref field, .. } if field == "username");
        assert_matches!(
            auth.login("alice", "").await,
            Err(CoreError::Validation { .. })
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_token_in_response_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/login")
            .with_status(200)
            .with_body(r#"{"token":"","user":{"id":1,"username":"alice","email":"a@x.com"}}"#)
            .create_async()
            .await;

        let (auth, session, _) = setup(&server);
        assert_matches!(
            auth.login("alice", "secret").await,
            Err(CoreError::MalformedResponse(_))
        );
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn register_does_not_touch_session() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/register")
            .with_status(201)
            .with_body(r#"{"id":2,"username":"bob","email":"bob@x.com"}"#)
            .create_async()
            .await;

        let (auth, session, _) = setup(&server);
        let user = auth
            .register(&RegisterRequest::new("bob", "bob@x.com", "pw"))
            .await
            .unwrap();

        assert_eq!(user.id, 2);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn register_and_login_flow() {
        let mut server = mockito::Server::new_async().await;
        let register = server
            .mock("POST", "/api/register")
            .with_status(201)
            .with_body(r#"{"id":2,"username":"bob","email":"bob@x.com"}"#)
            .create_async()
            .await;
        let login = server
            .mock("POST", "/api/login")
            .match_body(Matcher::Json(
                serde_json::json!({"username": "bob", "password": "pw"}),
            ))
            .with_status(200)
            .with_body(r#"{"token":"tok-bob","user":{"id":2,"username":"bob","email":"bob@x.com"}}"#)
            .create_async()
            .await;

        let (auth, session, _) = setup(&server);
        let user = auth
            .register_and_login(&RegisterRequest::new("bob", "bob@x.com", "pw"))
            .await
            .unwrap();

        assert_eq!(user.id, 2);
        assert_eq!(session.bearer_header_value().as_deref(), Some("Bearer tok-bob"));
        register.assert_async().await;
        login.assert_async().await;
    }

    #[tokio::test]
    async fn duplicate_registration_skips_login() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/register")
            .with_status(400)
            .with_body(r#"{"error":"Username already exists"}"#)
            .create_async()
            .await;
        let login = server
            .mock("POST", "/api/login")
            .expect(0)
            .create_async()
            .await;

        let (auth, session, _) = setup(&server);
        let err = auth
            .register_and_login(&RegisterRequest::new("bob", "bob@x.com", "pw"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert!(!session.is_authenticated());
        login.assert_async().await;
    }

    #[tokio::test]
    async fn logout_then_authenticated_call_is_blocked_locally() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/login")
            .with_status(200)
            .with_body(r#"{"token":"abc","user":{"id":1,"username":"alice","email":"a@x.com"}}"#)
            .create_async()
            .await;
        let workouts = server
            .mock("GET", "/api/workouts")
            .expect(0)
            .create_async()
            .await;

        let (auth, session, api) = setup(&server);
        auth.login("alice", "secret").await.unwrap();
        auth.logout().unwrap();

        assert!(!session.is_authenticated());
        assert_matches!(api.workouts().await, Err(CoreError::Unauthenticated));
        workouts.assert_async().await;

        // 두 번째 로그아웃도 에러 없음
        auth.logout().unwrap();
    }
}
