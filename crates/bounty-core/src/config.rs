//! 애플리케이션 설정 구조체.
//!
//! 서버 URL, 전송 타임아웃, 세션 저장소 위치를 정의한다.
//! [`crate::config_manager::ConfigManager`]를 통해 JSON 파일에서 로드.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 연결 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// 기본 설정
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        let url = url::Url::parse(&self.server.base_url)
            .map_err(|e| CoreError::Config(format!("잘못된 서버 URL '{}': {e}", self.server.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::Config(format!(
                "지원하지 않는 URL 스킴: {}",
                url.scheme()
            )));
        }
        if self.server.request_timeout_ms == Some(0) {
            return Err(CoreError::Config(
                "request_timeout_ms는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.storage.namespace.trim().is_empty() {
            return Err(CoreError::Config("저장소 네임스페이스가 비어 있습니다".to_string()));
        }
        Ok(())
    }
}

/// 서버 연결 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// API 기본 URL (`/api` 포함, 예: "http://localhost:5000/api")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 요청 타임아웃 (밀리초). None이면 전송 계층 기본값 사용
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: None,
        }
    }
}

/// 세션 저장소 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite 파일 경로 (None이면 플랫폼 데이터 디렉토리)
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    /// 세션 저장소가 독점하는 네임스페이스
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            namespace: default_namespace(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_namespace() -> String {
    "session".to_string()
}
