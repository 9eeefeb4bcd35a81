//! # bounty-network
//!
//! Bounty Hunter 백엔드 HTTP 어댑터.
//!
//! - [`http_client`]: 세션 토큰을 붙여 JSON 요청을 보내는 `RequestClient`
//! - [`api`]: `BountyApi` 포트 구현 (`/api` 하위 REST 엔드포인트)
//! - [`auth`]: 로그인/회원가입/로그아웃 흐름 (`SessionStore` 연동)
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use bounty_network::api::HttpBountyApi;
//! use bounty_network::auth::AuthService;
//! use bounty_network::http_client::RequestClient;
//!
//! let client = RequestClient::new("http://localhost:5000/api", session.clone(), None)?;
//! let api = Arc::new(HttpBountyApi::new(client));
//! let auth = AuthService::new(api.clone(), session.clone());
//! auth.login("alice", "secret").await?;
//! ```

pub mod api;
pub mod auth;
pub mod http_client;
