use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use super::entry::Session;

/// Absolute lifetime of every session, counted from login.
pub const SESSION_TTL: Duration = Duration::from_secs(120);

/// Concurrent token -> session map with absolute expiration.
///
/// Lookups never delete. Expired entries linger until the next
/// [`SessionStore::sweep_and_count`], which is the only removal path.
pub struct SessionStore {
    map: DashMap<String, Session>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
            ttl: SESSION_TTL,
        }
    }

    #[cfg(test)]
    fn with_ttl(ttl: Duration) -> Self {
        Self {
            map: DashMap::new(),
            ttl,
        }
    }

    /// Issue a new session token for `username`.
    ///
    /// Uniqueness rests on the 122 random bits of a v4 UUID; no collision
    /// check is made.
    pub fn create(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            username: username.to_string(),
            expires_at: Instant::now() + self.ttl,
        };
        self.map.insert(token.clone(), session);
        token
    }

    pub fn is_valid(&self, token: &str) -> bool {
        let now = Instant::now();
        self.map
            .get(token)
            .map(|s| s.is_live(now))
            .unwrap_or(false)
    }

    /// Remove expired sessions and return how many are still live.
    pub fn sweep_and_count(&self) -> usize {
        let now = Instant::now();
        let mut live = 0usize;
        self.map.retain(|_, session| {
            if session.is_live(now) {
                live += 1;
                true
            } else {
                false
            }
        });
        live
    }

    /// Raw entry count, expired-but-unswept sessions included.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Periodic sweep, for deployments that don't scrape `/metrics`.
    pub async fn run_janitor(self: Arc<Self>, interval: Duration) {
        info!("Session janitor running every {:?}", interval);
        loop {
            sleep(interval).await;

            let before = self.len();
            let live = self.sweep_and_count();
            let removed = before.saturating_sub(live);
            if removed > 0 {
                debug!("Janitor evicted {} expired sessions ({} live)", removed, live);
            }
        }
    }
}
