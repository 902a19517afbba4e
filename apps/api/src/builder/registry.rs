use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::builder::session::BuilderSession;
use crate::errors::AppError;

struct Slot {
    session: BuilderSession,
    last_seen: Instant,
}

/// In-memory registry of live builder sessions. Sessions die with the process
/// and are dropped once idle for longer than the TTL.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Slot>>>,
    limit: usize,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(limit: usize, ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            limit,
            ttl,
        }
    }

    pub async fn create(&self) -> Result<BuilderSession, AppError> {
        let mut sessions = self.sessions.write().await;
        evict_expired(&mut sessions, self.ttl);
        if sessions.len() >= self.limit {
            return Err(AppError::Conflict {
                code: "SESSION_LIMIT_REACHED",
                message: format!("At most {} builder sessions may be open", self.limit),
            });
        }
        let session = BuilderSession::new();
        sessions.insert(
            session.id,
            Slot {
                session: session.clone(),
                last_seen: Instant::now(),
            },
        );
        info!(session_id = %session.id, open = sessions.len(), "Builder session created");
        Ok(session)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!(session_id = %id, "Builder session closed");
                Ok(())
            }
            None => Err(not_found(id)),
        }
    }

    /// Runs `f` against the session under the registry's write lock.
    /// Touching a session resets its idle clock; an expired one is gone.
    pub async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut BuilderSession) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let expired = match sessions.get(&id) {
            Some(slot) => now.duration_since(slot.last_seen) > self.ttl,
            None => return Err(not_found(id)),
        };
        if expired {
            sessions.remove(&id);
            info!(session_id = %id, "Idle builder session expired");
            return Err(not_found(id));
        }
        let slot = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        slot.last_seen = now;
        f(&mut slot.session)
    }

    /// Drops every session idle for longer than the TTL. Returns how many went.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        evict_expired(&mut sessions, self.ttl)
    }

    /// Sweeps idle sessions every `period` for the life of the process.
    pub fn spawn_reaper(&self, period: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period.max(Duration::from_secs(1)));
            loop {
                ticker.tick().await;
                registry.evict_idle().await;
            }
        })
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn evict_expired(sessions: &mut HashMap<Uuid, Slot>, ttl: Duration) -> usize {
    let now = Instant::now();
    let before = sessions.len();
    sessions.retain(|_, slot| now.duration_since(slot.last_seen) <= ttl);
    let evicted = before - sessions.len();
    if evicted > 0 {
        info!(evicted, open = sessions.len(), "Idle builder sessions evicted");
    }
    evicted
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Builder session {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_create_and_remove() {
        let registry = SessionRegistry::new(4, TTL);
        let session = registry.create().await.unwrap();
        assert_eq!(registry.len().await, 1);
        registry.remove(session.id).await.unwrap();
        assert_eq!(registry.len().await, 0);
        assert!(matches!(
            registry.remove(session.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_limit_is_enforced() {
        let registry = SessionRegistry::new(1, TTL);
        registry.create().await.unwrap();
        assert!(matches!(
            registry.create().await,
            Err(AppError::Conflict {
                code: "SESSION_LIMIT_REACHED",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_with_session_unknown_id_is_not_found() {
        let registry = SessionRegistry::new(1, TTL);
        let result = registry.with_session(Uuid::new_v4(), |_| Ok(())).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new(4, TTL);
        let a = registry.create().await.unwrap();
        let b = registry.create().await.unwrap();
        registry
            .with_session(a.id, |s| {
                s.select_template(crate::templates::TemplateSelection::new(
                    crate::templates::TemplateKind::Creative,
                    crate::templates::DocumentType::Resume,
                ))
                .map_err(|e| AppError::Validation(e.to_string()))
            })
            .await
            .unwrap();
        let b_step = registry.with_session(b.id, |s| Ok(s.step())).await.unwrap();
        assert_eq!(b_step, crate::builder::session::BuilderStep::TemplatePicking);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_expires() {
        let registry = SessionRegistry::new(4, TTL);
        let session = registry.create().await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        let result = registry.with_session(session.id, |_| Ok(())).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_keeps_session_alive() {
        let registry = SessionRegistry::new(4, TTL);
        let session = registry.create().await.unwrap();
        for _ in 0..3 {
            tokio::time::advance(Duration::from_secs(40)).await;
            registry.with_session(session.id, |_| Ok(())).await.unwrap();
        }
        assert_eq!(registry.evict_idle().await, 0);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_reclaims_idle_slots_before_limit() {
        let registry = SessionRegistry::new(1, TTL);
        let stale = registry.create().await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        let fresh = registry.create().await.unwrap();
        assert_ne!(stale.id, fresh.id);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_idle_spares_recent_sessions() {
        let registry = SessionRegistry::new(4, TTL);
        registry.create().await.unwrap();
        tokio::time::advance(Duration::from_secs(45)).await;
        let recent = registry.create().await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(registry.evict_idle().await, 1);
        assert!(registry.with_session(recent.id, |_| Ok(())).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_sweeps_abandoned_sessions() {
        let registry = SessionRegistry::new(4, TTL);
        registry.create().await.unwrap();
        let reaper = registry.spawn_reaper(Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(75)).await;
        assert_eq!(registry.len().await, 0);
        reaper.abort();
    }
}
