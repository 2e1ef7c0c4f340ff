//! Authenticated-identity resolution with TTL-bounded caching.
//!
//! The provider is the authoritative source of the acting user's id; the
//! cache is a non-authoritative memoization with a fixed time-to-live.
//! Reads may be served stale up to the TTL, and concurrent callers racing
//! past an expiry are allowed to perform redundant provider lookups rather
//! than serialize on a lock across the fetch (re-fetching is idempotent).

use crate::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;

/// Default cache lifetime: five minutes.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(5 * 60);

/// Error from identity resolution. `NotAuthenticated` is fatal to the
/// current operation and forces re-authentication upstream.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("no authenticated session")]
    NotAuthenticated,
    #[error("identity provider error: {0}")]
    Provider(String),
}

/// Source of the acting user's identity (e.g. an auth backend session).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the current user id, or fail with
    /// [`AuthError::NotAuthenticated`] when no session exists.
    async fn resolve_user_id(&self) -> Result<UserId, AuthError>;
}

#[derive(Debug, Clone)]
struct CachedId {
    user: UserId,
    fetched_at: Instant,
}

/// TTL-memoizing wrapper around an [`IdentityProvider`].
///
/// Process-wide when shared via `Arc`; the TTL is injected so callers (and
/// tests) control staleness rather than relying on hidden module state.
pub struct UserSession {
    provider: Arc<dyn IdentityProvider>,
    ttl: Duration,
    cached: RwLock<Option<CachedId>>,
}

impl UserSession {
    pub fn new(provider: Arc<dyn IdentityProvider>, ttl: Duration) -> Self {
        UserSession {
            provider,
            ttl,
            cached: RwLock::new(None),
        }
    }

    /// Wrap a provider with the default five-minute TTL.
    pub fn with_default_ttl(provider: Arc<dyn IdentityProvider>) -> Self {
        Self::new(provider, DEFAULT_SESSION_TTL)
    }

    /// The acting user's id, served from cache when fresh.
    ///
    /// A miss or expiry triggers a provider lookup. The lock is not held
    /// across the lookup, so racing callers may each hit the provider;
    /// last write wins and both observe a valid id.
    pub async fn current_user_id(&self) -> Result<UserId, AuthError> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Ok(cached.user.clone());
            }
        }

        let user = self.provider.resolve_user_id().await?;
        *self.cached.write().await = Some(CachedId {
            user: user.clone(),
            fetched_at: Instant::now(),
        });
        Ok(user)
    }

    /// Drop the cached id (e.g. after logout).
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }
}

/// Provider that always yields the same user; useful for tests and
/// single-user deployments.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    user: UserId,
}

impl StaticIdentity {
    pub fn new(user: UserId) -> Self {
        StaticIdentity { user }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn resolve_user_id(&self) -> Result<UserId, AuthError> {
        Ok(self.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        result: Result<UserId, AuthError>,
    }

    impl CountingProvider {
        fn ok(user: &str) -> Self {
            CountingProvider {
                calls: AtomicUsize::new(0),
                result: Ok(UserId::new(user)),
            }
        }

        fn unauthenticated() -> Self {
            CountingProvider {
                calls: AtomicUsize::new(0),
                result: Err(AuthError::NotAuthenticated),
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for CountingProvider {
        async fn resolve_user_id(&self) -> Result<UserId, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn test_fresh_cache_serves_without_lookup() {
        let provider = Arc::new(CountingProvider::ok("user-1"));
        let session = UserSession::new(provider.clone(), Duration::from_secs(60));

        for _ in 0..5 {
            assert_eq!(
                session.current_user_id().await.unwrap(),
                UserId::new("user-1")
            );
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_refetches_every_time() {
        let provider = Arc::new(CountingProvider::ok("user-1"));
        let session = UserSession::new(provider.clone(), Duration::ZERO);

        session.current_user_id().await.unwrap();
        session.current_user_id().await.unwrap();
        session.current_user_id().await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_invalidate_forces_lookup() {
        let provider = Arc::new(CountingProvider::ok("user-1"));
        let session = UserSession::new(provider.clone(), Duration::from_secs(60));

        session.current_user_id().await.unwrap();
        session.invalidate().await;
        session.current_user_id().await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_not_authenticated_propagates_and_is_not_cached() {
        let provider = Arc::new(CountingProvider::unauthenticated());
        let session = UserSession::new(provider.clone(), Duration::from_secs(60));

        assert!(matches!(
            session.current_user_id().await,
            Err(AuthError::NotAuthenticated)
        ));
        assert!(matches!(
            session.current_user_id().await,
            Err(AuthError::NotAuthenticated)
        ));
        // Failures are never memoized.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_callers_tolerate_redundant_lookups() {
        let provider = Arc::new(CountingProvider::ok("user-1"));
        let session = Arc::new(UserSession::new(provider.clone(), Duration::from_secs(60)));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let session = session.clone();
            handles.push(tokio::spawn(
                async move { session.current_user_id().await },
            ));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), UserId::new("user-1"));
        }
        // At least one lookup happened; racing callers may add more.
        assert!(provider.calls.load(Ordering::SeqCst) >= 1);
    }
}
