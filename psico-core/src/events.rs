//! Session lifecycle events.
//!
//! The request layer never navigates on its own. It emits a
//! [`SessionEvent`] and the host decides what to do (redirect, modal, exit).
//!
//! Emission snapshots the listener list first and calls listeners with no
//! lock held, so a listener may subscribe or unsubscribe re-entrantly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

static LISTENER_ID: AtomicU64 = AtomicU64::new(1);

fn next_listener_id() -> ListenerId {
    ListenerId(LISTENER_ID.fetch_add(1, Ordering::Relaxed))
}

pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The backend rejected the credential; stored credential and role are
    /// already gone.
    Expired { redirect_to: String },
    LoggedIn { role: String },
    LoggedOut { redirect_to: String },
}

impl SessionEvent {
    pub fn expired() -> Self {
        SessionEvent::Expired {
            redirect_to: LOGIN_ROUTE.to_string(),
        }
    }

    pub fn kind(&self) -> SessionEventKind {
        match self {
            SessionEvent::Expired { .. } => SessionEventKind::Expired,
            SessionEvent::LoggedIn { .. } => SessionEventKind::LoggedIn,
            SessionEvent::LoggedOut { .. } => SessionEventKind::LoggedOut,
        }
    }

    /// Where the host should navigate, for events that imply navigation.
    pub fn redirect_to(&self) -> Option<&str> {
        match self {
            SessionEvent::Expired { redirect_to } | SessionEvent::LoggedOut { redirect_to } => {
                Some(redirect_to)
            }
            SessionEvent::LoggedIn { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    Expired,
    LoggedIn,
    LoggedOut,
}

pub type SessionListener = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

#[derive(Clone)]
struct ListenerEntry {
    id: ListenerId,
    kind: Option<SessionEventKind>,
    listener: SessionListener,
    once: bool,
}

/// Shared, cloneable listener registry.
#[derive(Clone, Default)]
pub struct SessionEvents {
    listeners: Arc<RwLock<Vec<ListenerEntry>>>,
}

impl std::fmt::Debug for SessionEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEvents")
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}

impl SessionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, kind: Option<SessionEventKind>, listener: SessionListener, once: bool) -> ListenerId {
        let id = next_listener_id();
        self.listeners.write().push(ListenerEntry {
            id,
            kind,
            listener,
            once,
        });
        id
    }

    /// Listen to every event.
    pub fn on_any<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.push(None, Arc::new(f), false)
    }

    pub fn on<F>(&self, kind: SessionEventKind, f: F) -> ListenerId
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.push(Some(kind), Arc::new(f), false)
    }

    pub fn once<F>(&self, kind: SessionEventKind, f: F) -> ListenerId
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.push(Some(kind), Arc::new(f), true)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|e| e.id != id);
        before != listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Deliver `event`; returns how many listeners ran.
    pub fn emit(&self, event: &SessionEvent) -> usize {
        let kind = event.kind();
        let (to_call, once_ids): (Vec<SessionListener>, Vec<ListenerId>) = {
            let listeners = self.listeners.read();
            let matching: Vec<&ListenerEntry> = listeners
                .iter()
                .filter(|e| e.kind.map_or(true, |k| k == kind))
                .collect();
            (
                matching.iter().map(|e| e.listener.clone()).collect(),
                matching.iter().filter(|e| e.once).map(|e| e.id).collect(),
            )
        };

        if !once_ids.is_empty() {
            self.listeners.write().retain(|e| !once_ids.contains(&e.id));
        }

        for f in &to_call {
            f(event);
        }
        to_call.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn listeners_filter_by_kind() {
        let events = SessionEvents::new();
        let expired = Arc::new(AtomicUsize::new(0));
        let all = Arc::new(AtomicUsize::new(0));

        let e = expired.clone();
        events.on(SessionEventKind::Expired, move |_| {
            e.fetch_add(1, Ordering::SeqCst);
        });
        let a = all.clone();
        events.on_any(move |_| {
            a.fetch_add(1, Ordering::SeqCst);
        });

        events.emit(&SessionEvent::expired());
        events.emit(&SessionEvent::LoggedIn { role: "patient".into() });

        assert_eq!(expired.load(Ordering::SeqCst), 1);
        assert_eq!(all.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn once_listeners_fire_once_and_off_removes() {
        let events = SessionEvents::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        events.once(SessionEventKind::LoggedOut, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        let id = events.on_any(|_| {});

        let out = SessionEvent::LoggedOut { redirect_to: LOGIN_ROUTE.into() };
        assert_eq!(events.emit(&out), 2);
        assert_eq!(events.emit(&out), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(events.off(id));
        assert!(!events.off(id));
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn listeners_may_subscribe_while_handling() {
        let events = SessionEvents::new();
        let inner = events.clone();
        events.once(SessionEventKind::Expired, move |_| {
            inner.on_any(|_| {});
        });
        events.emit(&SessionEvent::expired());
        assert_eq!(events.listener_count(), 1);
        assert_eq!(SessionEvent::expired().redirect_to(), Some("/login"));
    }
}
