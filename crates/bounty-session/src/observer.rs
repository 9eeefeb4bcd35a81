//! 세션 관찰자 레지스트리.
//!
//! `SessionStore`의 `save()`/`clear()`가 끝난 직후 구독 순서대로
//! 콜백을 동기 호출한다. 콜백 안에서 구독 해제해도 안전하며,
//! 한 콜백의 실패(에러 반환 또는 panic)는 다음 콜백 호출을 막지 않는다.

use bounty_core::models::session::Session;
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// 세션 변경 콜백
pub type SessionCallback = dyn Fn(&Session) -> anyhow::Result<()> + Send + Sync;

/// 구독 핸들
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// 알림 결과
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyReport {
    /// 정상 완료된 콜백 수
    pub delivered: usize,
    /// 에러/panic으로 실패한 콜백 수
    pub failed: usize,
}

/// 구독 순서를 보존하는 관찰자 목록
pub struct SessionObservers {
    subscribers: Mutex<Vec<(SubscriptionId, Arc<SessionCallback>)>>,
    next_id: AtomicU64,
}

impl SessionObservers {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// 콜백 등록
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Session) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, Arc::new(callback)));
        debug!("세션 관찰자 등록: {id:?}");
        id
    }

    /// 콜백 해제. 등록되어 있었으면 true
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        let removed = subscribers.len() != before;
        if removed {
            debug!("세션 관찰자 해제: {id:?}");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.lock().is_empty()
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscribers.lock().iter().any(|(sid, _)| *sid == id)
    }

    /// 등록 순서대로 콜백 호출
    ///
    /// 호출 시점의 목록을 복사해서 순회하므로 잠금을 쥔 채 콜백을 부르지 않는다.
    /// 순회 도중 해제된 콜백은 건너뛰고, 도중에 등록된 콜백은 다음 알림부터 받는다.
    pub fn notify(&self, session: &Session) -> NotifyReport {
        let snapshot: Vec<_> = self.subscribers.lock().clone();
        let mut report = NotifyReport::default();

        for (id, callback) in snapshot {
            if !self.is_subscribed(id) {
                continue;
            }

            match catch_unwind(AssertUnwindSafe(|| callback(session))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    warn!("세션 관찰자 {id:?} 실패: {e:#}");
                    report.failed += 1;
                }
                Err(_) => {
                    warn!("세션 관찰자 {id:?} panic, 다음 관찰자로 계속");
                    report.failed += 1;
                }
            }
        }

        report
    }
}

impl Default for SessionObservers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounty_core::models::user::User;
    use parking_lot::Mutex as PlMutex;

    fn alice_session() -> Session {
        Session::authenticated(
            "abc".to_string(),
            User {
                id: 1,
                username: "alice".to_string(),
                email: "a@x.com".to_string(),
            },
        )
    }

    #[test]
    fn callbacks_fire_in_subscription_order() {
        let observers = SessionObservers::new();
        let calls = Arc::new(PlMutex::new(Vec::new()));

        for name in ["first", "second"] {
            let calls = calls.clone();
            observers.subscribe(move |s: &Session| {
                calls.lock().push((name, s.clone()));
                Ok(())
            });
        }

        let session = alice_session();
        let report = observers.notify(&session);

        assert_eq!(report, NotifyReport { delivered: 2, failed: 0 });
        let calls = calls.lock();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "first");
        assert_eq!(calls[1].0, "second");
        assert_eq!(calls[0].1, session);
        assert_eq!(calls[1].1, session);
    }

    #[test]
    fn failing_callbacks_are_isolated() {
        let observers = SessionObservers::new();
        let reached = Arc::new(PlMutex::new(0));

        observers.subscribe(|_: &Session| anyhow::bail!("렌더링 실패"));
        observers.subscribe(|_: &Session| panic!("view torn down"));
        {
            let reached = reached.clone();
            observers.subscribe(move |_: &Session| {
                *reached.lock() += 1;
                Ok(())
            });
        }

        let report = observers.notify(&Session::Unauthenticated);
        assert_eq!(report, NotifyReport { delivered: 1, failed: 2 });
        assert_eq!(*reached.lock(), 1);
    }

    #[test]
    fn unsubscribe_from_inside_callback() {
        let observers = Arc::new(SessionObservers::new());
        let own_id: Arc<PlMutex<Option<SubscriptionId>>> = Arc::new(PlMutex::new(None));
        let hits = Arc::new(PlMutex::new(0));

        let id = {
            let observers_ref = Arc::downgrade(&observers);
            let own_id = own_id.clone();
            let hits = hits.clone();
            observers.subscribe(move |_: &Session| {
                *hits.lock() += 1;
                if let (Some(observers), Some(id)) = (observers_ref.upgrade(), *own_id.lock()) {
                    observers.unsubscribe(id);
                }
                Ok(())
            })
        };
        *own_id.lock() = Some(id);

        observers.notify(&Session::Unauthenticated);
        observers.notify(&Session::Unauthenticated);

        assert_eq!(*hits.lock(), 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn callback_removed_mid_dispatch_is_skipped() {
        let observers = Arc::new(SessionObservers::new());
        let victim: Arc<PlMutex<Option<SubscriptionId>>> = Arc::new(PlMutex::new(None));
        let victim_calls = Arc::new(PlMutex::new(0));

        {
            let observers_ref = Arc::downgrade(&observers);
            let victim = victim.clone();
            observers.subscribe(move |_: &Session| {
                if let (Some(observers), Some(id)) = (observers_ref.upgrade(), *victim.lock()) {
                    observers.unsubscribe(id);
                }
                Ok(())
            });
        }
        let victim_id = {
            let victim_calls = victim_calls.clone();
            observers.subscribe(move |_: &Session| {
                *victim_calls.lock() += 1;
                Ok(())
            })
        };
        *victim.lock() = Some(victim_id);

        let report = observers.notify(&Session::Unauthenticated);
        assert_eq!(report.delivered, 1);
        assert_eq!(*victim_calls.lock(), 0);
        assert_eq!(observers.len(), 1);
    }

    #[test]
    fn unsubscribe_unknown_id() {
        let observers = SessionObservers::new();
        let id = observers.subscribe(|_: &Session| Ok(()));
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
    }
}
