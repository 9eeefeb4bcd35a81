//! 서버 목록 캐시.
//!
//! 제안/운동 이력/반복 운동 목록처럼 서버에서 가져와 화면에 보여주는 목록의
//! 마지막 정상 상태를 보관한다. 새로고침이 실패하면 이전 목록을 그대로 둔다.

use bounty_core::error::CoreError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Weak;
use tracing::{debug, warn};

/// 마지막으로 성공한 목록 + 최근 실패 메시지
#[derive(Debug, Clone)]
pub struct RemoteCollection<T> {
    items: Vec<T>,
    last_error: Option<String>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl<T> RemoteCollection<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            last_error: None,
            refreshed_at: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// 최근 새로고침 실패 메시지 (성공하면 지워짐)
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// 한 번이라도 성공적으로 가져왔는지
    pub fn is_loaded(&self) -> bool {
        self.refreshed_at.is_some()
    }

    /// 새로고침 결과 반영
    ///
    /// 성공이면 목록을 통째로 교체하고 항목 수를 돌려준다.
    /// 실패면 목록은 유지하고 에러 메시지만 기록한 뒤 에러를 그대로 돌려준다.
    pub fn apply(&mut self, result: Result<Vec<T>, CoreError>) -> Result<usize, CoreError> {
        match result {
            Ok(items) => {
                self.items = items;
                self.last_error = None;
                self.refreshed_at = Some(Utc::now());
                Ok(self.items.len())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// 로그아웃 시 비우기
    pub fn clear(&mut self) {
        self.items.clear();
        self.last_error = None;
        self.refreshed_at = None;
    }
}

impl<T> Default for RemoteCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// `refresh_into` 결과
#[derive(Debug)]
pub enum RefreshOutcome {
    /// 목록 교체됨 (항목 수)
    Applied(usize),
    /// 요청 실패, 이전 목록 유지
    Failed(CoreError),
    /// 결과를 받을 대상이 이미 사라짐 (응답 폐기)
    Discarded,
}

/// 요청을 끝까지 기다린 뒤 대상 목록이 아직 살아 있을 때만 결과를 반영
///
/// 대상은 `Weak`로만 잡으므로 화면이 먼저 닫혀도 요청 자체는 정상 완료되고
/// 결과 전달만 무시된다. 잠금은 요청이 끝난 뒤에만 잡는다.
pub async fn refresh_into<T, F>(
    target: Weak<Mutex<RemoteCollection<T>>>,
    request: F,
) -> RefreshOutcome
where
    F: Future<Output = Result<Vec<T>, CoreError>>,
{
    let result = request.await;

    let Some(target) = target.upgrade() else {
        debug!("목록 대상이 해제됨, 응답 폐기");
        return RefreshOutcome::Discarded;
    };

    let applied = target.lock().apply(result);
    match applied {
        Ok(count) => RefreshOutcome::Applied(count),
        Err(e) => {
            warn!("목록 새로고침 실패, 이전 목록 유지: {e}");
            RefreshOutcome::Failed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    #[test]
    fn failure_keeps_previous_items() {
        let mut list = RemoteCollection::new();
        assert!(!list.is_loaded());

        assert_eq!(list.apply(Ok(vec![1, 2, 3])).unwrap(), 3);
        assert!(list.is_loaded());

        let err = list
            .apply(Err(CoreError::NetworkUnavailable("connection refused".into())))
            .unwrap_err();
        assert_matches!(err, CoreError::NetworkUnavailable(_));
        assert_eq!(list.items(), &[1, 2, 3]);
        assert!(list.last_error().unwrap().contains("connection refused"));

        list.apply(Ok(vec![4])).unwrap();
        assert_eq!(list.items(), &[4]);
        assert!(list.last_error().is_none());
    }

    #[test]
    fn clear_resets_everything() {
        let mut list = RemoteCollection::new();
        list.apply(Ok(vec!["a"])).unwrap();
        list.clear();
        assert!(list.items().is_empty());
        assert!(!list.is_loaded());
    }

    #[tokio::test]
    async fn refresh_applies_to_live_target() {
        let list = Arc::new(Mutex::new(RemoteCollection::new()));
        let outcome = refresh_into(Arc::downgrade(&list), async { Ok(vec![10, 20]) }).await;

        assert_matches!(outcome, RefreshOutcome::Applied(2));
        assert_eq!(list.lock().items(), &[10, 20]);
    }

    #[tokio::test]
    async fn refresh_failure_reports_error() {
        let list = Arc::new(Mutex::new(RemoteCollection::new()));
        list.lock().apply(Ok(vec![1])).unwrap();

        let outcome = refresh_into(Arc::downgrade(&list), async {
            Err::<Vec<i32>, _>(CoreError::ServerRejected {
                status: 500,
                message: "Internal Server Error".into(),
            })
        })
        .await;

        assert_matches!(outcome, RefreshOutcome::Failed(CoreError::ServerRejected { status: 500, .. }));
        assert_eq!(list.lock().items(), &[1]);
    }

    #[tokio::test]
    async fn dropped_target_discards_result() {
        let list: Arc<Mutex<RemoteCollection<i32>>> = Arc::new(Mutex::new(RemoteCollection::new()));
        let weak = Arc::downgrade(&list);
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let pending = tokio::spawn(refresh_into(weak, async move {
            let _ = rx.await;
            Ok(vec![1, 2, 3])
        }));

        // 요청이 진행 중인 동안 화면이 닫힌다
        drop(list);
        tx.send(()).unwrap();

        let outcome = pending.await.unwrap();
        assert_matches!(outcome, RefreshOutcome::Discarded);
    }

    #[tokio::test]
    async fn concurrent_refreshes_do_not_interfere() {
        let a = Arc::new(Mutex::new(RemoteCollection::new()));
        let b = Arc::new(Mutex::new(RemoteCollection::new()));

        let (ra, rb) = futures::join!(
            refresh_into(Arc::downgrade(&a), async { Ok(vec!["suggestion"]) }),
            refresh_into(Arc::downgrade(&b), async {
                Err::<Vec<&str>, _>(CoreError::Unauthenticated)
            }),
        );

        assert_matches!(ra, RefreshOutcome::Applied(1));
        assert_matches!(rb, RefreshOutcome::Failed(CoreError::Unauthenticated));
        assert_eq!(a.lock().items(), &["suggestion"]);
        assert!(b.lock().items().is_empty());
    }
}
