//! # bounty-session
//!
//! 클라이언트 세션 상태 관리.
//! 인증 토큰과 사용자 정보의 단일 출처인 [`store::SessionStore`],
//! 로그인/로그아웃 전이를 UI에 알리는 [`observer::SessionObservers`],
//! 새로고침 실패 시 이전 목록을 유지하는 [`collection::RemoteCollection`]을 제공한다.

pub mod collection;
pub mod observer;
pub mod store;

pub use observer::SubscriptionId;
pub use store::SessionStore;
