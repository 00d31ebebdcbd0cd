use std::sync::Arc;

use parking_lot::Mutex;

use crate::notifications::{CategorySet, Event, Notifier, SubscriptionId};
use crate::scope::ScopeId;

// ─── Public types ────────────────────────────────────────────────

/// Request-local event buffer bound to one notifier subscription.
///
/// The subscription lives exactly as long as this value: `finish()` ends it
/// and hands back the events, and dropping the collector on any other path
/// (error, panic, cancelled future) ends it too.
pub struct EventCollector {
    notifier: Notifier,
    subscription: Option<SubscriptionId>,
    events: Arc<Mutex<Vec<Event>>>,
}

// ─── EventCollector impl ─────────────────────────────────────────

impl EventCollector {
    /// Start listening for every aggregated category within `scope`.
    pub fn begin(notifier: &Notifier, scope: Option<ScopeId>) -> Self {
        Self::begin_filtered(notifier, CategorySet::all(), scope)
    }

    /// Start listening for a custom category set.
    pub fn begin_filtered(
        notifier: &Notifier,
        categories: CategorySet,
        scope: Option<ScopeId>,
    ) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let subscription = notifier.subscribe(categories, scope, move |event| {
            sink.lock().push(event);
        });

        Self {
            notifier: notifier.clone(),
            subscription: Some(subscription),
            events,
        }
    }

    /// Events recorded so far.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop listening and take the recorded events, in arrival order.
    pub fn finish(mut self) -> Vec<Event> {
        self.end();
        let events = std::mem::take(&mut *self.events.lock());
        events
    }

    fn end(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.notifier.unsubscribe(id);
        }
    }
}

impl Drop for EventCollector {
    fn drop(&mut self) {
        self.end();
    }
}
