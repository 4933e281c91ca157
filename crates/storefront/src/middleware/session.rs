//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions over a `moka` cache.
//! Idle sessions are evicted after the same 24 hours that expire the
//! cookie, and the cache is bounded, so abandoned carts do not accumulate.
//! Sessions do not survive a restart, matching the rest of the storefront
//! state.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};
use tower_sessions::{Expiry, SessionManagerLayer};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "atelier_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: u64 = 24 * 60 * 60;

/// Most sessions held at once; the least recently used go first.
const MAX_SESSIONS: u64 = 100_000;

/// Session store backed by a bounded, idle-expiring `moka` cache.
#[derive(Clone)]
pub struct SessionCache {
    cache: Cache<Id, Record>,
}

impl SessionCache {
    /// Create a store holding at most `max_sessions`, dropping any session
    /// untouched for `idle`.
    #[must_use]
    pub fn new(max_sessions: u64, idle: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_sessions)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Number of sessions currently held (approximate until pending
    /// maintenance runs).
    #[must_use]
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Whether the store holds no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply pending evictions now.
    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCache")
            .field("sessions", &self.cache.entry_count())
            .finish()
    }
}

#[async_trait]
impl SessionStore for SessionCache {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.cache.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .cache
            .get(session_id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.cache.invalidate(session_id).await;
        Ok(())
    }
}

/// Create the session layer with an in-memory store.
///
/// The cookie is always `Secure`; browsers still send it to `localhost`
/// over plain HTTP.
#[must_use]
pub fn create_session_layer() -> SessionManagerLayer<SessionCache> {
    let store = SessionCache::new(MAX_SESSIONS, Duration::from_secs(SESSION_EXPIRY_SECONDS));

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS.cast_signed()),
        ))
        .with_secure(true)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
