//! 의존성 와이어링.
//!
//! 설정 → 저장소 → 세션 → HTTP 클라이언트 → 서비스 순서로 조립한다.
//! 전역 싱글턴 없이 진입점에서 한 번 만들어 명령 실행에 넘긴다.

use bounty_core::config::AppConfig;
use bounty_core::config_manager::ConfigManager;
use bounty_core::error::CoreError;
use bounty_core::models::recurring::RecurringWorkout;
use bounty_core::models::session::Session;
use bounty_core::models::suggestion::Suggestion;
use bounty_core::models::workout::Workout;
use bounty_core::ports::api_client::BountyApi;
use bounty_core::ports::storage::KeyValueStore;
use bounty_network::api::HttpBountyApi;
use bounty_network::auth::AuthService;
use bounty_network::http_client::RequestClient;
use bounty_session::collection::RemoteCollection;
use bounty_session::SessionStore;
use bounty_storage::memory::MemoryKeyValueStore;
use bounty_storage::sqlite::SqliteKeyValueStore;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, info};

/// 목록 캐시 공유 핸들
pub type SharedCollection<T> = Arc<Mutex<RemoteCollection<T>>>;

/// 실행 중 공유되는 구성 요소 묶음
pub struct AppContext {
    pub session: Arc<SessionStore>,
    pub api: Arc<dyn BountyApi>,
    pub auth: AuthService,
    pub suggestions: SharedCollection<Suggestion>,
    pub workouts: SharedCollection<Workout>,
    pub recurring: SharedCollection<RecurringWorkout>,
}

impl AppContext {
    /// 주어진 저장소로 세션을 복원하고 나머지를 조립
    pub fn build(config: &AppConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self, CoreError> {
        config.validate()?;

        let session = Arc::new(SessionStore::load(storage));
        let client = RequestClient::new(
            &config.server.base_url,
            session.clone(),
            config.server.request_timeout(),
        )?;
        let api: Arc<dyn BountyApi> = Arc::new(HttpBountyApi::new(client));
        let auth = AuthService::new(api.clone(), session.clone());

        let context = Self {
            session,
            api,
            auth,
            suggestions: Arc::new(Mutex::new(RemoteCollection::new())),
            workouts: Arc::new(Mutex::new(RemoteCollection::new())),
            recurring: Arc::new(Mutex::new(RemoteCollection::new())),
        };
        context.clear_lists_on_logout();

        info!("서버: {}", config.server.base_url);
        Ok(context)
    }

    /// 로그아웃되면 이전 사용자의 목록을 비운다
    fn clear_lists_on_logout(&self) {
        let suggestions: Weak<_> = Arc::downgrade(&self.suggestions);
        let workouts: Weak<_> = Arc::downgrade(&self.workouts);
        let recurring: Weak<_> = Arc::downgrade(&self.recurring);

        self.session.subscribe(move |session: &Session| {
            if session.is_authenticated() {
                return Ok(());
            }
            if let Some(list) = suggestions.upgrade() {
                list.lock().clear();
            }
            if let Some(list) = workouts.upgrade() {
                list.lock().clear();
            }
            if let Some(list) = recurring.upgrade() {
                list.lock().clear();
            }
            debug!("로그아웃, 목록 캐시 비움");
            Ok(())
        });
    }
}

/// 세션 저장소 선택
///
/// `ephemeral`이면 인메모리, 아니면 설정의 DB 경로(없으면 플랫폼 데이터 디렉토리)에 SQLite.
pub fn open_storage(config: &AppConfig, ephemeral: bool) -> Result<Arc<dyn KeyValueStore>, CoreError> {
    if ephemeral {
        debug!("인메모리 세션 저장소 사용");
        return Ok(Arc::new(MemoryKeyValueStore::new()));
    }

    let path = ConfigManager::resolve_db_path(config)?;
    let store = SqliteKeyValueStore::open(&path, &config.storage.namespace)?;
    Ok(Arc::new(store))
}
