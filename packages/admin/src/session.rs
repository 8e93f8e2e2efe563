//! The signed-in user and the observers watching it.
//!
//! Observers are called synchronously, in subscription order, every time the
//! user changes. One failing or panicking observer is logged and skipped;
//! the rest still run.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::identity::{AdminIdentity, User};

/// Handle returned by [`Session::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Error type observers may return.
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

type Observer = Box<dyn Fn(Option<&User>) -> Result<(), ObserverError> + Send + Sync>;

/// Current user plus an observer registry.
pub struct Session {
    identity: AdminIdentity,
    user: Option<User>,
    is_admin: bool,
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("is_admin", &self.is_admin)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a signed-out session.
    #[must_use]
    pub const fn new(identity: AdminIdentity) -> Self {
        Self {
            identity,
            user: None,
            is_admin: false,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Creates a session already signed in as `user`, without notifying.
    #[must_use]
    pub fn signed_in(identity: AdminIdentity, user: User) -> Self {
        let is_admin = identity.is_admin(&user);
        Self {
            identity,
            user: Some(user),
            is_admin,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Returns `true` if someone is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Returns `true` if the signed-in user is the admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Registers an observer of user changes.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(Option<&User>) -> Result<(), ObserverError> + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Replaces the signed-in user (or signs out with `None`) and notifies
    /// every observer.
    pub fn set_user(&mut self, user: Option<User>) {
        self.is_admin = user.as_ref().is_some_and(|u| self.identity.is_admin(u));
        self.user = user;

        if let Some(user) = &self.user {
            log::debug!("Signed in as {} (admin: {})", user.label(), self.is_admin);
        } else {
            log::debug!("Signed out");
        }

        self.notify();
    }

    fn notify(&self) {
        let user = self.user.as_ref();
        for (id, observer) in &self.observers {
            match catch_unwind(AssertUnwindSafe(|| observer(user))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log::warn!("Session observer {} failed: {e}", id.0),
                Err(_) => log::warn!("Session observer {} panicked", id.0),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter(session: &mut Session) -> (SubscriptionId, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let id = session.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        (id, calls)
    }

    #[test]
    fn set_user_tracks_admin_status() {
        let mut session = Session::new(AdminIdentity::from_email("admin@example.com"));
        assert!(!session.is_authenticated());

        session.set_user(Some(User::new("user@example.com")));
        assert!(session.is_authenticated());
        assert!(!session.is_admin());

        session.set_user(Some(User::new("Admin@Example.com")));
        assert!(session.is_admin());

        session.set_user(None);
        assert!(!session.is_authenticated());
        assert!(!session.is_admin());
    }

    #[test]
    fn observers_are_notified_until_unsubscribed() {
        let mut session = Session::new(AdminIdentity::default());
        let (id, calls) = counter(&mut session);

        session.set_user(Some(User::new("a@b.c")));
        session.set_user(None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(session.unsubscribe(id));
        assert!(!session.unsubscribe(id));
        session.set_user(None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn observers_receive_the_new_user() {
        let mut session = Session::new(AdminIdentity::default());
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        session.subscribe(move |user| {
            sink.lock()
                .unwrap()
                .push(user.map(|u| u.email.clone()));
            Ok(())
        });

        session.set_user(Some(User::new("a@b.c")));
        session.set_user(None);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some("a@b.c".to_string()), None]
        );
    }

    #[test]
    fn failing_and_panicking_observers_do_not_block_others() {
        let mut session = Session::new(AdminIdentity::default());
        session.subscribe(|_| Err("boom".into()));
        session.subscribe(|_| panic!("observer panic"));
        let (_, calls) = counter(&mut session);

        session.set_user(Some(User::new("a@b.c")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn signed_in_does_not_notify() {
        let session = Session::signed_in(
            AdminIdentity::from_email("admin@example.com"),
            User::new("admin@example.com"),
        );
        assert!(session.is_admin());
        assert_eq!(session.user().map(|u| u.email.as_str()), Some("admin@example.com"));
    }
}
