//! SQLite 키-값 저장소 어댑터.
//!
//! `KeyValueStore` 포트 구현. 모든 행은 `(namespace, key)`로 식별되며
//! 한 인스턴스는 자신의 네임스페이스 행만 읽고 쓴다.

use bounty_core::error::CoreError;
use bounty_core::ports::storage::KeyValueStore;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::migration;

/// SQLite 저장소: `KeyValueStore` 포트 구현
pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
    namespace: String,
}

impl SqliteKeyValueStore {
    /// 파일 기반 SQLite 저장소 생성
    pub fn open(path: &Path, namespace: &str) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| CoreError::Storage(format!("SQLite 열기 실패: {e}")))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            ",
        )
        .map_err(|e| CoreError::Storage(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        info!("SQLite 저장소 초기화: {} (ns={namespace})", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            namespace: namespace.to_string(),
        })
    }

    /// 인메모리 SQLite 저장소 생성 (테스트용)
    pub fn open_in_memory(namespace: &str) -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Storage(format!("인메모리 SQLite 생성 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
            namespace: namespace.to_string(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.conn
            .lock()
            .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM kv_entries WHERE namespace = ?1 AND key = ?2",
            params![self.namespace, key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| CoreError::Storage(format!("값 조회 실패 ({key}): {e}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.set_many(&[(key, value)])
    }

    fn delete(&self, key: &str) -> Result<(), CoreError> {
        self.delete_many(&[key])
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT key FROM kv_entries WHERE namespace = ?1 ORDER BY key")
            .map_err(|e| CoreError::Storage(format!("키 조회 준비 실패: {e}")))?;
        let rows = stmt
            .query_map(params![self.namespace], |row| row.get::<_, String>(0))
            .map_err(|e| CoreError::Storage(format!("키 조회 실패: {e}")))?;

        let keys = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CoreError::Storage(format!("키 읽기 실패: {e}")))?;
        Ok(keys)
    }

    /// 한 트랜잭션으로 저장: 전부 성공하거나 전부 롤백
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), CoreError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| CoreError::Storage(format!("트랜잭션 시작 실패: {e}")))?;

        let now = Utc::now().to_rfc3339();
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO kv_entries (namespace, key, value, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(namespace, key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                params![self.namespace, key, value, now],
            )
            .map_err(|e| CoreError::Storage(format!("값 저장 실패 ({key}): {e}")))?;
        }

        tx.commit()
            .map_err(|e| CoreError::Storage(format!("트랜잭션 커밋 실패: {e}")))
    }

    fn delete_many(&self, keys: &[&str]) -> Result<(), CoreError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| CoreError::Storage(format!("트랜잭션 시작 실패: {e}")))?;

        for key in keys {
            tx.execute(
                "DELETE FROM kv_entries WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
            )
            .map_err(|e| CoreError::Storage(format!("값 삭제 실패 ({key}): {e}")))?;
        }

        tx.commit()
            .map_err(|e| CoreError::Storage(format!("트랜잭션 커밋 실패: {e}")))
    }
}
