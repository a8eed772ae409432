//! In-process event bus for agent lifecycle notifications
//!
//! `EventBus` decouples event producers (agents, the driving loop) from
//! consumers (typically the UI side panel). A misbehaving consumer can
//! never block or fail delivery to its peers, nor destabilize the emitter.

use crate::events::{AgentEvent, ExecutionState};
use futures::future::{join_all, BoxFuture};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Error type subscribers may return from a callback
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// A subscriber callback handle
///
/// Cheaply cloneable; the bus deduplicates registrations by handle identity
/// (`Arc` pointer equality), not by value. Keep a clone of the handle you
/// subscribed with if you intend to unsubscribe it later.
#[derive(Clone)]
pub struct EventCallback {
    inner: Arc<dyn Fn(AgentEvent) -> BoxFuture<'static, Result<(), CallbackError>> + Send + Sync>,
}

impl EventCallback {
    /// Wrap an async closure as a callback handle
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(AgentEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CallbackError>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |event| Box::pin(f(event))),
        }
    }

    /// Identity comparison — same handle, not same behavior
    fn same_handle(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    async fn invoke(&self, event: AgentEvent) -> Result<(), CallbackError> {
        (self.inner)(event).await
    }
}

impl std::fmt::Debug for EventCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EventCallback")
    }
}

/// Publish/subscribe dispatcher keyed by execution state
///
/// Lives for the lifetime of the owning session. The registry is mutated
/// only through `subscribe`/`unsubscribe`/`clear_subscribers`; `emit` takes
/// a snapshot of the callback list so delivery never holds the lock.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<HashMap<ExecutionState, Vec<EventCallback>>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `state`
    ///
    /// Idempotent: re-subscribing the identical handle for the same state
    /// is a no-op. Insertion order determines delivery order within a state.
    pub async fn subscribe(&self, state: ExecutionState, callback: EventCallback) {
        let mut subs = self.subscribers.write().await;
        let callbacks = subs.entry(state).or_default();
        if !callbacks.iter().any(|cb| cb.same_handle(&callback)) {
            callbacks.push(callback);
            tracing::debug!(state = ?state, count = callbacks.len(), "Subscriber added");
        }
    }

    /// Remove `callback` from `state`'s list if present
    ///
    /// Removing an unregistered handle, or from a state with no subscribers,
    /// is a silent no-op.
    pub async fn unsubscribe(&self, state: ExecutionState, callback: &EventCallback) {
        let mut subs = self.subscribers.write().await;
        if let Some(callbacks) = subs.get_mut(&state) {
            callbacks.retain(|cb| !cb.same_handle(callback));
        }
    }

    /// Empty the subscriber list for `state`
    pub async fn clear_subscribers(&self, state: ExecutionState) {
        let mut subs = self.subscribers.write().await;
        if let Some(callbacks) = subs.get_mut(&state) {
            callbacks.clear();
        }
    }

    /// Number of callbacks currently registered for `state`
    pub async fn subscriber_count(&self, state: ExecutionState) -> usize {
        let subs = self.subscribers.read().await;
        subs.get(&state).map_or(0, Vec::len)
    }

    /// Deliver `event` to every callback registered for its state
    ///
    /// Callbacks run concurrently (cooperative fan-out) and are all awaited.
    /// A failing callback is caught and logged; it never propagates to the
    /// emitter and never prevents its peers from running. Emission always
    /// completes from the caller's perspective.
    pub async fn emit(&self, event: AgentEvent) {
        let callbacks = {
            let subs = self.subscribers.read().await;
            match subs.get(&event.state) {
                Some(callbacks) if !callbacks.is_empty() => callbacks.clone(),
                _ => return,
            }
        };

        let state = event.state;
        let deliveries = callbacks.into_iter().map(|cb| {
            let event = event.clone();
            async move {
                if let Err(error) = cb.invoke(event).await {
                    tracing::error!(state = ?state, %error, "Event callback failed");
                }
            }
        });

        join_all(deliveries).await;
    }
}
