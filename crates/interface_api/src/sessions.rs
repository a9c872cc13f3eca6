//! In-memory wizard sessions
//!
//! Each session is a [`WizardController`] behind its own mutex. Handlers hold
//! the mutex only for synchronous wizard calls; the submission request runs
//! with the lock released (see `handlers::quotes::advance`).
//!
//! Sessions untouched for longer than the idle TTL are evicted, either when a
//! new session opens or by the sweeper the server binary spawns.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use core_kernel::QuoteSessionId;
use domain_quote::{Notifier, QuoteSubmissionPort, WizardController};

pub type SharedWizard = Arc<Mutex<WizardController>>;

struct Session {
    wizard: SharedWizard,
    last_touched: DateTime<Utc>,
}

pub struct SessionStore {
    sessions: RwLock<HashMap<QuoteSessionId, Session>>,
    submitter: Arc<dyn QuoteSubmissionPort>,
    notifier: Arc<dyn Notifier>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(
        submitter: Arc<dyn QuoteSubmissionPort>,
        notifier: Arc<dyn Notifier>,
        idle_ttl: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            submitter,
            notifier,
            idle_ttl,
        }
    }

    /// Opens a wizard on step 1 and returns its handle
    pub async fn open(&self) -> (QuoteSessionId, SharedWizard) {
        self.evict_idle().await;

        let wizard = WizardController::new(Arc::clone(&self.submitter), Arc::clone(&self.notifier));
        let session_id = wizard.session_id();
        let shared = Arc::new(Mutex::new(wizard));

        self.sessions.write().await.insert(
            session_id,
            Session {
                wizard: Arc::clone(&shared),
                last_touched: Utc::now(),
            },
        );
        info!(session_id = %session_id, "Quote session opened");
        (session_id, shared)
    }

    /// Looks up a session and marks it as used
    pub async fn get(&self, session_id: QuoteSessionId) -> Option<SharedWizard> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id)?;
        session.last_touched = Utc::now();
        Some(Arc::clone(&session.wizard))
    }

    pub async fn contains(&self, session_id: QuoteSessionId) -> bool {
        self.sessions.read().await.contains_key(&session_id)
    }

    /// Drops a session; an in-flight submission result for it will be ignored
    pub async fn close(&self, session_id: QuoteSessionId) -> bool {
        let removed = self.sessions.write().await.remove(&session_id);
        if let Some(session) = &removed {
            // Reset abandons any pending attempt so a late outcome is stale
            session.wizard.lock().await.reset();
            info!(session_id = %session_id, "Quote session closed");
        }
        removed.is_some()
    }

    /// Evicts sessions idle for longer than the TTL, returning how many went
    pub async fn evict_idle(&self) -> usize {
        self.evict_idle_before(Utc::now() - self.idle_ttl).await
    }

    /// Evicts sessions last touched before `cutoff`
    ///
    /// A session whose wizard is locked or submitting is in use and kept.
    pub async fn evict_idle_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|session_id, session| {
            if session.last_touched >= cutoff {
                return true;
            }
            match session.wizard.try_lock() {
                Ok(wizard) if !wizard.is_submitting() => {
                    debug!(session_id = %session_id, "Evicting idle quote session");
                    false
                }
                _ => true,
            }
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Idle quote sessions evicted");
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("idle_ttl", &self.idle_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_quote::{FieldPath, MockSubmissionPort, RecordingNotifier};

    fn store_with_ttl(idle_ttl: Duration) -> SessionStore {
        SessionStore::new(
            Arc::new(MockSubmissionPort::new()),
            Arc::new(RecordingNotifier::new()),
            idle_ttl,
        )
    }

    fn store() -> SessionStore {
        store_with_ttl(Duration::minutes(30))
    }

    #[tokio::test]
    async fn test_open_get_close() {
        let store = store();
        let (id, wizard) = store.open().await;
        wizard
            .lock()
            .await
            .set_field(FieldPath::ResidenceZone, "CABA")
            .unwrap();

        let fetched = store.get(id).await.unwrap();
        assert!(fetched.lock().await.draft().residence_zone.is_some());
        assert_eq!(store.len().await, 1);

        assert!(store.close(id).await);
        assert!(!store.close(id).await);
        assert!(store.get(id).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = store();
        let (a, wizard_a) = store.open().await;
        let (b, _) = store.open().await;
        assert_ne!(a, b);

        wizard_a
            .lock()
            .await
            .set_field(FieldPath::PrimaryAge, "40")
            .unwrap();
        let other = store.get(b).await.unwrap();
        assert_eq!(other.lock().await.draft().primary_age, 18);
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted() {
        let store = store();
        let (a, _) = store.open().await;
        let (b, _) = store.open().await;

        assert_eq!(store.evict_idle_before(Utc::now() - Duration::minutes(1)).await, 0);
        assert_eq!(store.evict_idle_before(Utc::now() + Duration::seconds(1)).await, 2);
        assert!(store.get(a).await.is_none());
        assert!(store.get(b).await.is_none());
    }

    #[tokio::test]
    async fn test_opening_sweeps_expired_sessions() {
        let store = store_with_ttl(Duration::zero());
        let (stale, _) = store.open().await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let (fresh, _) = store.open().await;
        assert!(!store.contains(stale).await);
        assert!(store.contains(fresh).await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_touch_and_in_use_sessions_survive_eviction() {
        let store = store();
        let (touched, _) = store.open().await;
        let (held, wizard) = store.open().await;
        let cutoff = Utc::now() + Duration::milliseconds(20);
        tokio::time::sleep(std::time::Duration::from_millis(40)).await;

        store.get(touched).await.unwrap();
        let _guard = wizard.lock().await;

        assert_eq!(store.evict_idle_before(cutoff).await, 0);
        assert!(store.contains(touched).await);
        assert!(store.contains(held).await);
    }
}
