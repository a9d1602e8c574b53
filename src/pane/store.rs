//! Session Store
//!
//! Keeps one [`SessionContext`] per session id. Sessions never share data;
//! ending a session (or letting it idle out) drops its table.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::interval;
use uuid::Uuid;

use super::session::SessionContext;

/// Unique identifier for a session
pub type SessionId = String;

/// Session store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of live sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Sessions idle longer than this are dropped
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// How often the reaper checks for idle sessions
    #[serde(default = "default_reap_interval")]
    pub reap_interval_secs: u64,
}

fn default_max_sessions() -> usize {
    1000
}

fn default_idle_timeout() -> u64 {
    3600 // 1 hour
}

fn default_reap_interval() -> u64 {
    60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_timeout_secs: default_idle_timeout(),
            reap_interval_secs: default_reap_interval(),
        }
    }
}

/// Session store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Too many sessions (max {0})")]
    TooManySessions(usize),

    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

struct SessionEntry {
    context: SessionContext,
    created_at: DateTime<Utc>,
    last_access: Instant,
}

/// In-memory map of live sessions
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Open a new, empty session
    pub async fn create(&self) -> Result<(SessionId, DateTime<Utc>), StoreError> {
        self.purge_expired().await;

        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.config.max_sessions {
            return Err(StoreError::TooManySessions(self.config.max_sessions));
        }

        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        sessions.insert(
            id.clone(),
            SessionEntry {
                context: SessionContext::new(),
                created_at,
                last_access: Instant::now(),
            },
        );

        tracing::info!(session_id = %id, "Session created");
        Ok((id, created_at))
    }

    /// Run `f` against a session's context, refreshing its idle timer
    pub async fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut SessionContext) -> R,
    ) -> Result<R, StoreError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::SessionNotFound(id.to_string()))?;

        entry.last_access = Instant::now();
        Ok(f(&mut entry.context))
    }

    /// Copy of a session's context, refreshing its idle timer.
    ///
    /// The store lock is held only for the copy, so rendering the result
    /// does not block other sessions.
    pub async fn snapshot(&self, id: &str) -> Result<SessionContext, StoreError> {
        self.with_session(id, |ctx| ctx.clone()).await
    }

    /// When a session was opened
    pub async fn created_at(&self, id: &str) -> Option<DateTime<Utc>> {
        self.sessions.read().await.get(id).map(|e| e.created_at)
    }

    /// End a session. Returns whether it existed.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Session ended");
        }
        removed
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Whether `create` would be refused right now
    pub async fn at_capacity(&self) -> bool {
        self.len().await >= self.config.max_sessions
    }

    /// Drop sessions idle past the timeout. Returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let timeout = Duration::from_secs(self.config.idle_timeout_secs);
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_access.elapsed() < timeout);
        let purged = before - sessions.len();

        if purged > 0 {
            tracing::debug!(purged, remaining = sessions.len(), "Purged idle sessions");
        }
        purged
    }

    /// Spawn the background task that purges idle sessions
    pub fn start_reaper(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        let period = Duration::from_secs(store.config.reap_interval_secs.max(1));

        tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                ticker.tick().await;
                store.purge_expired().await;
            }
        })
    }
}
