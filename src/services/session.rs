// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed-in state with change notifications.
//!
//! A `SessionState` is created once at the application root and handed to
//! whatever needs it; there is no process-wide instance. Listeners see the
//! current identity when they subscribe and then one call per transition.
//! A transition is a change of the signed-in user ID (sign-in, sign-out, or
//! switching accounts). Refreshing the identity of the same user is not a
//! transition and notifies no one.

use crate::models::User;
use crate::services::identity::AuthSession;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Listener = Arc<dyn Fn(Option<&User>) + Send + Sync>;

#[derive(Default)]
struct Inner {
    current: Option<AuthSession>,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

/// Explicitly constructed session state.
#[derive(Clone, Default)]
pub struct SessionState {
    inner: Arc<Mutex<Inner>>,
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes the listener"]
pub struct SessionSubscription {
    id: u64,
    inner: Weak<Mutex<Inner>>,
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut guard = inner.lock().unwrap_or_else(|e| e.into_inner());
            guard.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking listener never runs under the lock, so poisoning can
        // only come from a panic in this module; the data is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The signed-in identity, if any.
    pub fn current_user(&self) -> Option<User> {
        self.lock().current.as_ref().map(|s| s.user.clone())
    }

    /// The signed-in identity with its tokens, if any.
    pub fn current_session(&self) -> Option<AuthSession> {
        self.lock().current.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.lock().current.is_some()
    }

    /// Register a listener.
    ///
    /// It is called immediately with the current identity, then once for
    /// every later transition until the returned subscription is dropped.
    pub fn on_session_change<F>(&self, callback: F) -> SessionSubscription
    where
        F: Fn(Option<&User>) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(callback);
        let (id, current) = {
            let mut guard = self.lock();
            let id = guard.next_id;
            guard.next_id += 1;
            guard.listeners.push((id, listener.clone()));
            (id, guard.current.as_ref().map(|s| s.user.clone()))
        };

        listener(current.as_ref());

        SessionSubscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Replace the current session, notifying listeners on a transition.
    pub(crate) fn set(&self, session: Option<AuthSession>) {
        let (notify, user) = {
            let mut guard = self.lock();
            let before = guard.current.as_ref().map(|s| s.user.uid.clone());
            let after = session.as_ref().map(|s| s.user.uid.clone());
            guard.current = session;

            if before == after {
                (Vec::new(), None)
            } else {
                let listeners: Vec<Listener> =
                    guard.listeners.iter().map(|(_, l)| l.clone()).collect();
                (listeners, guard.current.as_ref().map(|s| s.user.clone()))
            }
        };

        if !notify.is_empty() {
            tracing::debug!(
                uid = user.as_ref().map(|u| u.uid.as_str()),
                listeners = notify.len(),
                "Session transition"
            );
        }
        for listener in notify {
            listener(user.as_ref());
        }
    }
}
