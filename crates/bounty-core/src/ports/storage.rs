//! 로컬 키-값 저장소 포트.
//!
//! 구현: `bounty-storage` crate (rusqlite, 인메모리)
//!
//! 프로세스 재시작 후에도 유지되는 문자열 저장소.
//! 로컬에서 빠르게 끝나는 작업이므로 동기 인터페이스로 둔다.

use crate::error::CoreError;

/// 네임스페이스 하나에 한정된 키-값 저장소
///
/// 구현체는 자신의 네임스페이스 밖의 키를 읽거나 지우지 않는다.
pub trait KeyValueStore: Send + Sync {
    /// 값 조회 (없으면 None)
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// 값 저장 (있으면 덮어씀)
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// 값 삭제 (없어도 성공)
    fn delete(&self, key: &str) -> Result<(), CoreError>;

    /// 네임스페이스에 있는 모든 키
    fn keys(&self) -> Result<Vec<String>, CoreError>;

    /// 여러 값을 한 번에 저장
    ///
    /// 기본 구현은 순차 저장이며, 트랜잭션을 지원하는 구현체는
    /// 전부 성공 또는 전부 실패가 되도록 재정의한다.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), CoreError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// 여러 키를 한 번에 삭제
    fn delete_many(&self, keys: &[&str]) -> Result<(), CoreError> {
        for key in keys {
            self.delete(key)?;
        }
        Ok(())
    }
}
