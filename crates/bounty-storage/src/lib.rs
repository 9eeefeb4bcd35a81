//! # bounty-storage
//!
//! 로컬 키-값 저장소 어댑터.
//! 세션 토큰과 사용자 레코드를 프로세스 재시작 후에도 보존한다.
//!
//! ## 모듈
//! - `sqlite`: 네임스페이스 단위 SQLite 저장소 (KeyValueStore 구현)
//! - `memory`: 인메모리 저장소 (테스트, 임시 실행용)
//! - `migration`: 스키마 마이그레이션

pub mod memory;
pub mod migration;
pub mod sqlite;
