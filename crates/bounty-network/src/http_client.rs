//! 인증 요청 클라이언트.
//!
//! 모든 API 호출이 지나가는 단일 경로. `SessionStore`에서 토큰을 읽어
//! `Authorization` 헤더를 붙이고, 응답 상태 코드를 `CoreError`로 매핑한다.
//! 자동 재시도는 하지 않는다.

use bounty_core::error::CoreError;
use bounty_session::SessionStore;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// 한 번의 API 호출 설명
///
/// 기본값은 인증 필요. 로그인/회원가입만 [`ApiRequest::public`]으로 표시한다.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// base URL 뒤에 붙는 경로 (예: "/workouts")
    pub path: String,
    pub body: Option<Value>,
    pub requires_auth: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self {
            method,
            path,
            body: None,
            requires_auth: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// JSON 본문을 가진 POST 요청
    pub fn post<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, CoreError> {
        let mut request = Self::new(Method::POST, path);
        request.body = Some(serde_json::to_value(body)?);
        Ok(request)
    }

    /// 토큰 없이 보내는 요청
    pub fn public(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    pub fn authenticated(mut self) -> Self {
        self.requires_auth = true;
        self
    }
}

/// 세션 인지 HTTP 클라이언트
pub struct RequestClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl RequestClient {
    /// 새 클라이언트 생성
    ///
    /// `timeout`이 None이면 reqwest 기본 설정을 따른다.
    pub fn new(
        base_url: &str,
        session: Arc<SessionStore>,
        timeout: Option<Duration>,
    ) -> Result<Self, CoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CoreError::Internal(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 요청 전송 후 성공 본문을 `T`로 디코딩
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, CoreError> {
        let ApiRequest {
            method,
            path,
            body,
            requires_auth,
        } = request;

        // 토큰은 요청 시점에 한 번만 읽는다 (잠금을 await 너머로 들고 가지 않음)
        let bearer = self.session.bearer_header_value();
        if requires_auth && bearer.is_none() {
            debug!("토큰 없음, 요청 생략: {method} {path}");
            return Err(CoreError::Unauthenticated);
        }

        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(value) = bearer {
            builder = builder.header(AUTHORIZATION, value);
        }
        if let Some(body) = &body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        debug!("API 요청: {method} {path}");
        let resp = builder.send().await.map_err(|e| {
            if e.is_builder() {
                CoreError::Internal(format!("요청 생성 실패 ({method} {path}): {e}"))
            } else {
                CoreError::NetworkUnavailable(format!("{method} {path}: {e}"))
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            // 상태 코드는 이미 받았으므로 본문 수신 실패는 사유 문구로 대신한다
            let bytes = resp.bytes().await.unwrap_or_else(|e| {
                debug!("에러 응답 본문 수신 실패: {e}");
                Default::default()
            });
            let message = error_message(status, &bytes);
            warn!("API 거부: {method} {path} → {status}: {message}");
            return Err(CoreError::ServerRejected {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| CoreError::NetworkUnavailable(format!("응답 본문 수신 실패: {e}")))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            CoreError::MalformedResponse(format!("{method} {path} 응답 파싱 실패: {e}"))
        })
    }
}

/// 에러 응답에서 사용자 메시지 추출
///
/// 본문의 `error` 필드를 우선하고, 없으면 상태 코드의 표준 사유 문구를 쓴다.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    let from_body = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| match v.get("error") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        });

    from_body.unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string())
    })
}
