use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

// ─── Request scope ───────────────────────────────────────────────

static NEXT_SCOPE: AtomicU64 = AtomicU64::new(1);

tokio::task_local! {
    static REQUEST_SCOPE: ScopeId;
}

/// Identifies one request's aggregation window.
///
/// Notifications published while a scope is active are tagged with it, and
/// a scoped subscription only hears notifications carrying its own tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);

impl ScopeId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        Self(NEXT_SCOPE.fetch_add(1, Ordering::Relaxed))
    }

    /// The scope of the task currently running, if any.
    pub fn current() -> Option<Self> {
        REQUEST_SCOPE.try_with(|id| *id).ok()
    }

    /// Run `fut` with this scope active.
    pub async fn enter<F: Future>(self, fut: F) -> F::Output {
        REQUEST_SCOPE.scope(self, fut).await
    }

    /// Run a closure with this scope active (for synchronous producers).
    pub fn enter_sync<R>(self, f: impl FnOnce() -> R) -> R {
        REQUEST_SCOPE.sync_scope(self, f)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope-{}", self.0)
    }
}

/// Carry the caller's scope into a future that will run on another task.
///
/// Task-locals do not follow `tokio::spawn`; wrap the spawned future with
/// this so its notifications still land in the originating request.
pub fn propagate<F>(fut: F) -> impl Future<Output = F::Output>
where
    F: Future,
{
    let scope = ScopeId::current();
    async move {
        match scope {
            Some(id) => id.enter(fut).await,
            None => fut.await,
        }
    }
}
