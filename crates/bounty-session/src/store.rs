//! 세션 저장소.
//!
//! 인증 토큰과 캐시된 사용자 정보를 `KeyValueStore`에 영속화하고
//! 메모리 상태와 함께 원자적으로 전이시킨다.
//!
//! 상태 전이: `Unauthenticated --save--> Authenticated --clear--> Unauthenticated`.
//! 재로그인은 기존 세션을 통째로 덮어쓴다.

use bounty_core::error::CoreError;
use bounty_core::models::session::{AuthStatus, Session};
use bounty_core::models::user::User;
use bounty_core::ports::storage::KeyValueStore;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::observer::{NotifyReport, SessionObservers, SubscriptionId};

/// 토큰 키
const TOKEN_KEY: &str = "auth_token";

/// 사용자 레코드 키 (JSON)
const USER_KEY: &str = "current_user";

/// 세션 저장소가 소유하는 키 전체. `clear()`는 정확히 이 키들만 지운다.
const OWNED_KEYS: [&str; 2] = [TOKEN_KEY, USER_KEY];

/// 관찰자 알림 디스패치 상태
#[derive(Debug, Default)]
struct Dispatch {
    /// 어떤 스레드가 알림을 전달하는 중
    running: bool,
    /// 마지막 전달 이후 새 전이가 커밋됨
    pending: bool,
}

/// 세션 상태의 단일 출처
///
/// 애플리케이션 진입점에서 한 번 생성해 `Arc`로 공유한다.
/// `save`/`clear`는 쓰기 게이트로 직렬화되며, 동시에 실행되면
/// 마지막으로 완료된 호출이 저장소와 메모리 모두에서 이긴다.
///
/// 관찰자는 항상 전달 시점의 현재 세션을 받는다. 전달 중에 커밋된 전이는
/// 진행 중인 디스패처가 이어서 전달하므로, 관찰자가 마지막으로 본 세션은
/// 저장소 상태와 같다. 빠르게 연속된 전이는 하나로 합쳐질 수 있다.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<Session>,
    write_gate: Mutex<()>,
    dispatch: Mutex<Dispatch>,
    observers: SessionObservers,
    status_tx: watch::Sender<AuthStatus>,
}

impl SessionStore {
    /// 영속 저장소에서 세션 복원 (네트워크 호출 없음)
    ///
    /// 토큰이나 사용자 레코드 중 하나라도 없거나 사용자 레코드를 해석할 수 없으면
    /// 빈 세션으로 시작하고, 절반만 남은 키는 정리한다.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let session = Self::read_persisted(storage.as_ref());
        let status = session.status();
        info!("세션 복원: {status}");

        let (status_tx, _) = watch::channel(status);
        Self {
            storage,
            state: RwLock::new(session),
            write_gate: Mutex::new(()),
            dispatch: Mutex::new(Dispatch::default()),
            observers: SessionObservers::new(),
            status_tx,
        }
    }

    fn read_persisted(storage: &dyn KeyValueStore) -> Session {
        let token = storage.get(TOKEN_KEY);
        let user_json = storage.get(USER_KEY);

        let (token, user_json) = match (token, user_json) {
            (Ok(token), Ok(user_json)) => (token, user_json),
            (Err(e), _) | (_, Err(e)) => {
                // 일시적 읽기 실패일 수 있으므로 키는 건드리지 않는다
                warn!("세션 읽기 실패, 빈 세션으로 시작: {e}");
                return Session::Unauthenticated;
            }
        };

        match (token, user_json) {
            (None, None) => Session::Unauthenticated,
            (Some(token), Some(user_json)) if !token.is_empty() => {
                match serde_json::from_str::<User>(&user_json) {
                    Ok(user) => Session::authenticated(token, user),
                    Err(e) => {
                        warn!("저장된 사용자 레코드 파싱 실패, 세션 폐기: {e}");
                        Self::discard_persisted(storage);
                        Session::Unauthenticated
                    }
                }
            }
            _ => {
                warn!("불완전한 저장 세션 발견, 세션 폐기");
                Self::discard_persisted(storage);
                Session::Unauthenticated
            }
        }
    }

    fn discard_persisted(storage: &dyn KeyValueStore) {
        if let Err(e) = storage.delete_many(&OWNED_KEYS) {
            warn!("불완전한 세션 정리 실패: {e}");
        }
    }

    /// 로그인 성공 결과 저장
    ///
    /// 토큰과 사용자 레코드를 함께 영속화한 뒤 메모리 상태를 교체하고
    /// 관찰자에게 알린다. 영속화에 실패하면 이전 세션을 복구하고
    /// 메모리 상태와 관찰자는 건드리지 않는다.
    pub fn save(&self, token: String, user: User) -> Result<(), CoreError> {
        if token.trim().is_empty() {
            return Err(CoreError::validation("token", "빈 토큰은 저장할 수 없습니다"));
        }
        let user_json = serde_json::to_string(&user)?;

        let user_id = user.id;
        {
            let _gate = self.write_gate.lock();

            if let Err(e) = self
                .storage
                .set_many(&[(TOKEN_KEY, token.as_str()), (USER_KEY, user_json.as_str())])
            {
                warn!("세션 저장 실패, 이전 세션 복구: {e}");
                self.restore_persisted();
                return Err(e);
            }

            *self.state.write() = Session::authenticated(token, user);
            self.status_tx.send_replace(AuthStatus::Authenticated);
        }

        info!("세션 저장: user_id={user_id}");
        self.notify_latest();
        Ok(())
    }

    /// 로그아웃. 소유한 키를 모두 지우고 메모리 상태를 비운다
    ///
    /// 이미 비어 있으면 에러 없이 끝나며 관찰자에게 알리지 않는다.
    /// 저장소 삭제가 실패해도 메모리 상태는 비우고 에러를 반환한다.
    pub fn clear(&self) -> Result<(), CoreError> {
        let (was_authenticated, result) = {
            let _gate = self.write_gate.lock();
            let result = self.storage.delete_many(&OWNED_KEYS);
            let previous = std::mem::take(&mut *self.state.write());
            self.status_tx.send_replace(AuthStatus::Unauthenticated);
            (previous.is_authenticated(), result)
        };

        if let Err(e) = &result {
            warn!("저장된 세션 삭제 실패: {e}");
        }

        if was_authenticated {
            info!("세션 삭제 (로그아웃)");
            self.notify_latest();
        } else {
            debug!("이미 로그아웃 상태, 알림 생략");
        }

        result
    }

    /// 영속 상태를 현재 메모리 상태로 되돌린다 (쓰기 게이트 안에서만 호출)
    fn restore_persisted(&self) {
        let current = self.state.read().clone();
        let restored = match &current {
            Session::Authenticated { token, user } => serde_json::to_string(user)
                .map_err(CoreError::from)
                .and_then(|json| {
                    self.storage
                        .set_many(&[(TOKEN_KEY, token.as_str()), (USER_KEY, json.as_str())])
                }),
            Session::Unauthenticated => self.storage.delete_many(&OWNED_KEYS),
        };
        if let Err(e) = restored {
            warn!("이전 세션 복구 실패: {e}");
        }
    }

    /// 현재 세션을 관찰자에게 전달
    ///
    /// 이미 다른 호출이 전달 중이면 표시만 남기고 바로 반환하며,
    /// 전달 중인 쪽이 최신 세션으로 한 번 더 돈다. 콜백 실행 중에는
    /// 어떤 잠금도 잡지 않으므로 콜백 안에서 `save`/`clear`를 불러도 된다.
    fn notify_latest(&self) {
        {
            let mut dispatch = self.dispatch.lock();
            dispatch.pending = true;
            if dispatch.running {
                debug!("알림 전달 중, 최신 세션으로 이어서 전달 예약");
                return;
            }
            dispatch.running = true;
        }

        loop {
            {
                let mut dispatch = self.dispatch.lock();
                if !dispatch.pending {
                    dispatch.running = false;
                    return;
                }
                dispatch.pending = false;
            }

            let session = self.snapshot();
            let report: NotifyReport = self.observers.notify(&session);
            if report.failed > 0 {
                debug!(
                    "세션 알림: {}건 성공, {}건 실패",
                    report.delivered, report.failed
                );
            }
        }
    }

    /// 토큰 보유 여부
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    /// `"Bearer <token>"` 또는 None (헤더를 붙이지 않음)
    pub fn bearer_header_value(&self) -> Option<String> {
        self.state.read().bearer_header_value()
    }

    /// 현재 세션 스냅샷
    pub fn snapshot(&self) -> Session {
        self.state.read().clone()
    }

    /// 캐시된 사용자
    pub fn current_user(&self) -> Option<User> {
        self.state.read().user().cloned()
    }

    /// 세션 변경 콜백 등록
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Session) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    /// 세션 변경 콜백 해제 (콜백 안에서 호출해도 안전)
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// 비동기 소비자를 위한 인증 상태 채널
    pub fn watch_status(&self) -> watch::Receiver<AuthStatus> {
        self.status_tx.subscribe()
    }
}
