use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Category, CategorySet, Event, Payload};
use crate::scope::ScopeId;

type Callback = Arc<dyn Fn(Event) + Send + Sync>;

/// Opaque handle returned by [`Notifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Process-wide notification bus, passed around explicitly.
///
/// Cloning is cheap; every clone shares the same subscriber registry.
#[derive(Clone, Default)]
pub struct Notifier {
    inner: Arc<Registry>,
}

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    subscribers: RwLock<Vec<Subscriber>>,
}

struct Subscriber {
    id: SubscriptionId,
    categories: CategorySet,
    /// `None` hears every scope, including notifications outside any request.
    scope: Option<ScopeId>,
    callback: Callback,
}

impl Subscriber {
    fn wants(&self, category: Category, scope: Option<ScopeId>) -> bool {
        self.categories.contains(category) && (self.scope.is_none() || self.scope == scope)
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for notifications in `categories`.
    ///
    /// With `scope` set, only notifications published inside that scope are
    /// delivered.
    pub fn subscribe<F>(
        &self,
        categories: CategorySet,
        scope: Option<ScopeId>,
        callback: F,
    ) -> SubscriptionId
    where
        F: Fn(Event) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.subscribers.write().push(Subscriber {
            id,
            categories,
            scope,
            callback: Arc::new(callback),
        });
        tracing::trace!(subscription = id.0, ?scope, "subscribed");
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.inner.subscribers.write();
        let before = subs.len();
        subs.retain(|s| s.id != id);
        let removed = subs.len() != before;
        tracing::trace!(subscription = id.0, removed, "unsubscribed");
        removed
    }

    /// Publish a notification from the current task's scope.
    ///
    /// Names outside the known categories are ignored. Callbacks run on the
    /// caller's stack, outside the registry lock.
    pub fn instrument(&self, name: &str, payload: Payload) {
        let Some(category) = Category::from_name(name) else {
            tracing::trace!(name, "ignoring notification");
            return;
        };
        self.publish(Event::new(category, payload));
    }

    /// Publish an already-typed event from the current task's scope.
    pub fn publish(&self, event: Event) {
        let scope = ScopeId::current();
        let targets: Vec<Callback> = self
            .inner
            .subscribers
            .read()
            .iter()
            .filter(|s| s.wants(event.category, scope))
            .map(|s| s.callback.clone())
            .collect();

        for callback in targets {
            callback(event.clone());
        }
    }

    /// Number of live subscriptions.
    pub fn active_subscriptions(&self) -> usize {
        self.inner.subscribers.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<Event>>>, impl Fn(Event) + Send + Sync + 'static) {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = buf.clone();
        (buf, move |e| sink.lock().push(e))
    }

    #[test]
    fn delivers_only_subscribed_categories() {
        let n = Notifier::new();
        let (buf, cb) = recorder();
        n.subscribe(CategorySet::of(&[Category::SqlQuery]), None, cb);

        n.instrument("sql.active_record", Payload::query("User Load", "SELECT 1"));
        n.instrument("process_action.action_controller", Payload::default());
        n.instrument("cache_read.active_support", Payload::default());

        let got = buf.lock();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].category, Category::SqlQuery);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let n = Notifier::new();
        let (buf, cb) = recorder();
        let id = n.subscribe(CategorySet::all(), None, cb);
        assert_eq!(n.active_subscriptions(), 1);

        assert!(n.unsubscribe(id));
        assert!(!n.unsubscribe(id));
        assert_eq!(n.active_subscriptions(), 0);

        n.instrument("sql.active_record", Payload::default());
        assert!(buf.lock().is_empty());
    }

    #[test]
    fn scoped_subscription_ignores_other_scopes() {
        let n = Notifier::new();
        let a = ScopeId::next();
        let b = ScopeId::next();
        let (buf_a, cb_a) = recorder();
        let (buf_any, cb_any) = recorder();
        n.subscribe(CategorySet::all(), Some(a), cb_a);
        n.subscribe(CategorySet::all(), None, cb_any);

        a.enter_sync(|| n.instrument("sql.active_record", Payload::default()));
        b.enter_sync(|| n.instrument("sql.active_record", Payload::default()));
        n.instrument("sql.active_record", Payload::default());

        assert_eq!(buf_a.lock().len(), 1);
        assert_eq!(buf_any.lock().len(), 3);
    }

    #[test]
    fn callback_may_subscribe_without_deadlock() {
        let n = Notifier::new();
        let inner = n.clone();
        n.subscribe(CategorySet::all(), None, move |_| {
            inner.subscribe(CategorySet::all(), None, |_| {});
        });
        n.instrument("sql.active_record", Payload::default());
        assert_eq!(n.active_subscriptions(), 2);
    }
}
