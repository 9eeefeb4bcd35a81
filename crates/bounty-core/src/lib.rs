//! # bounty-core
//!
//! Bounty Hunter 클라이언트 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 서버 DTO와 세션 모델 (serde Serialize/Deserialize)
//! - [`ports`]: 포트 인터페이스 (키-값 저장소, 백엔드 API)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
