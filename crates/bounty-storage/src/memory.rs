//! 인메모리 키-값 저장소.
//!
//! 프로세스 종료 시 사라진다. 테스트와 `--ephemeral` 실행에 사용.

use bounty_core::error::CoreError;
use bounty_core::ports::storage::KeyValueStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// 인메모리 저장소: `KeyValueStore` 포트 구현
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 항목 수
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CoreError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    // 한 번의 쓰기 잠금으로 처리해서 중간 상태가 보이지 않게 한다
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), CoreError> {
        let mut map = self.entries.write();
        for (key, value) in entries {
            map.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn delete_many(&self, keys: &[&str]) -> Result<(), CoreError> {
        let mut map = self.entries.write();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}
