//! Access token caching with single-flight fetches.
//!
//! [`InMemoryCredentialsCache`] keeps one token per [`CredentialsKey`] and
//! serves it until shortly before it expires. When several callers need a
//! token that is missing or stale at the same moment, exactly one fetch
//! runs and every caller receives its result.
//!
//! The fetch runs on its own Tokio task, so a caller that gives up (for
//! example by timing out) does not cancel it for the others; the token it
//! produces is still cached.

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

use super::credentials::CredentialsKey;
use super::token::AccessToken;
use crate::error::IssuanceError;
use crate::Result;

/// Margin used when none is configured.
pub const DEFAULT_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// A not-yet-started token fetch handed to a cache.
///
/// The cache decides whether to poll it; a cache hit or a join on an
/// in-flight fetch drops it unpolled.
pub type TokenFetch = BoxFuture<'static, std::result::Result<AccessToken, IssuanceError>>;

type SharedFetch = Shared<BoxFuture<'static, std::result::Result<AccessToken, IssuanceError>>>;

/// Stores access tokens between API calls.
#[async_trait]
pub trait CredentialsCache: Send + Sync {
    /// Return a valid token for `key`, running `fetch` only if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Issuance`](crate::Error::Issuance) if the fetch
    /// this call ran or joined failed. Failures are never cached.
    async fn get_token(&self, key: &CredentialsKey, fetch: TokenFetch) -> Result<AccessToken>;

    /// Forget the token stored for `key`. A fetch already in flight is
    /// left to complete.
    fn invalidate(&self, _key: &CredentialsKey) {}

    /// Forget the token stored for `key` only if it is `token`.
    ///
    /// Used when the API rejects a token: a newer token stored since the
    /// request was sent is kept.
    fn invalidate_token(&self, key: &CredentialsKey, _token: &AccessToken) {
        self.invalidate(key);
    }

    /// Forget every stored token. Fetches in flight are left to complete.
    fn clear(&self) {}
}

/// A token together with its validity window.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedCredential {
    token: AccessToken,
    issued_at: Instant,
    expires_at: Instant,
}

impl CachedCredential {
    /// Wrap `token`, counting its lifetime from `issued_at`.
    pub fn new(token: AccessToken, issued_at: Instant) -> Self {
        // An unrepresentable expiry is treated as already expired.
        let expires_at = issued_at
            .checked_add(token.lifetime())
            .unwrap_or(issued_at);
        Self {
            token,
            issued_at,
            expires_at,
        }
    }

    /// The token.
    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    /// When the token was requested.
    pub fn issued_at(&self) -> Instant {
        self.issued_at
    }

    /// When the token stops being accepted.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Returns `true` if the token may still be served at `now`, keeping
    /// `margin` in reserve.
    pub fn is_usable_at(&self, now: Instant, margin: Duration) -> bool {
        match self.expires_at.checked_sub(margin) {
            Some(limit) => now < limit,
            None => false,
        }
    }
}

enum Slot {
    Ready(CachedCredential),
    Pending { id: u64, fetch: SharedFetch },
}

type Entries = Arc<Mutex<HashMap<CredentialsKey, Slot>>>;

trait MutexExt<T> {
    fn lock_or_recover(&self) -> MutexGuard<'_, T>;
}

impl<T> MutexExt<T> for Mutex<T> {
    fn lock_or_recover(&self) -> MutexGuard<'_, T> {
        match self.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!(
                    mutex_type = std::any::type_name::<T>(),
                    "credentials cache mutex poisoned, recovering"
                );
                poisoned.into_inner()
            }
        }
    }
}

/// Process-local [`CredentialsCache`] with single-flight fetches.
///
/// Requires a Tokio runtime: fetches are spawned with [`tokio::spawn`].
///
/// # Example
///
/// ```
/// use futures_util::FutureExt;
/// use truelayer_rs::auth::{AccessToken, CredentialsCache, CredentialsKey, InMemoryCredentialsCache};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> truelayer_rs::Result<()> {
/// let cache = InMemoryCredentialsCache::new();
/// let key = CredentialsKey::new("client-id", &["payments"]);
///
/// let token = cache
///     .get_token(&key, async { Ok(AccessToken::new("t-1", 3600)) }.boxed())
///     .await?;
///
/// // Served from the cache: the second fetch is never polled.
/// let again = cache
///     .get_token(&key, async { Ok(AccessToken::new("t-2", 3600)) }.boxed())
///     .await?;
/// assert_eq!(token.secret(), again.secret());
/// # Ok(())
/// # }
/// ```
pub struct InMemoryCredentialsCache {
    entries: Entries,
    expiry_margin: Duration,
    next_fetch_id: AtomicU64,
}

impl InMemoryCredentialsCache {
    /// Create an empty cache with the default 60 second expiry margin.
    pub fn new() -> Self {
        Self::with_expiry_margin(DEFAULT_EXPIRY_MARGIN)
    }

    /// Create an empty cache that stops serving tokens `margin` before
    /// they expire.
    pub fn with_expiry_margin(margin: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            expiry_margin: margin,
            next_fetch_id: AtomicU64::new(0),
        }
    }

    /// The configured expiry margin.
    pub fn expiry_margin(&self) -> Duration {
        self.expiry_margin
    }

    /// The stored credential for `key`, if one is stored (usable or not).
    pub fn cached(&self, key: &CredentialsKey) -> Option<CachedCredential> {
        match self.entries.lock_or_recover().get(key) {
            Some(Slot::Ready(cached)) => Some(cached.clone()),
            _ => None,
        }
    }

    /// Returns `true` if a fetch for `key` is in flight.
    pub fn is_fetching(&self, key: &CredentialsKey) -> bool {
        matches!(
            self.entries.lock_or_recover().get(key),
            Some(Slot::Pending { .. })
        )
    }

    fn start_fetch(
        &self,
        key: &CredentialsKey,
        fetch: TokenFetch,
        started: Instant,
    ) -> (u64, SharedFetch) {
        let id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
        let guard = PendingGuard {
            entries: Arc::clone(&self.entries),
            key: key.clone(),
            id,
        };
        let margin = self.expiry_margin;

        let handle = tokio::spawn(async move {
            tracing::debug!(key = %guard.key, "fetching access token");
            let result = fetch.await;

            match &result {
                Ok(token) => {
                    let cached = CachedCredential::new(token.clone(), started);
                    if cached.is_usable_at(Instant::now(), margin) {
                        guard.store(cached);
                    } else {
                        tracing::warn!(
                            key = %guard.key,
                            expires_in = token.expires_in,
                            margin_secs = margin.as_secs(),
                            "access token lifetime is shorter than the expiry margin, not caching"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(key = %guard.key, error = %e, "access token fetch failed");
                }
            }
            result
        });

        let shared = async move {
            handle.await.unwrap_or_else(|e| {
                Err(IssuanceError::new(
                    None,
                    format!("token fetch task did not complete: {}", e),
                ))
            })
        }
        .boxed()
        .shared();

        (id, shared)
    }
}

impl Default for InMemoryCredentialsCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InMemoryCredentialsCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryCredentialsCache")
            .field("entries", &self.entries.lock_or_recover().len())
            .field("expiry_margin", &self.expiry_margin)
            .finish()
    }
}

#[async_trait]
impl CredentialsCache for InMemoryCredentialsCache {
    async fn get_token(&self, key: &CredentialsKey, fetch: TokenFetch) -> Result<AccessToken> {
        let pending = {
            let mut entries = self.entries.lock_or_recover();
            let now = Instant::now();
            let in_flight = match entries.get(key) {
                Some(Slot::Ready(cached)) if cached.is_usable_at(now, self.expiry_margin) => {
                    tracing::trace!(key = %key, "serving cached access token");
                    return Ok(cached.token().clone());
                }
                Some(Slot::Pending { fetch, .. }) => Some(fetch.clone()),
                _ => None,
            };

            match in_flight {
                Some(shared) => {
                    tracing::trace!(key = %key, "joining in-flight token fetch");
                    shared
                }
                None => {
                    let (id, shared) = self.start_fetch(key, fetch, now);
                    entries.insert(
                        key.clone(),
                        Slot::Pending {
                            id,
                            fetch: shared.clone(),
                        },
                    );
                    shared
                }
            }
        };

        Ok(pending.await?)
    }

    fn invalidate(&self, key: &CredentialsKey) {
        let mut entries = self.entries.lock_or_recover();
        if matches!(entries.get(key), Some(Slot::Ready(_))) {
            entries.remove(key);
        }
    }

    fn invalidate_token(&self, key: &CredentialsKey, token: &AccessToken) {
        let mut entries = self.entries.lock_or_recover();
        match entries.get(key) {
            Some(Slot::Ready(cached)) if cached.token() == token => {
                tracing::debug!(key = %key, "dropping rejected access token");
                entries.remove(key);
            }
            _ => {}
        }
    }

    fn clear(&self) {
        self.entries
            .lock_or_recover()
            .retain(|_, slot| matches!(slot, Slot::Pending { .. }));
    }
}

/// Owned by the fetch task. Leaves the slot in a settled state however the
/// task ends, including by panic.
struct PendingGuard {
    entries: Entries,
    key: CredentialsKey,
    id: u64,
}

impl PendingGuard {
    fn store(&self, cached: CachedCredential) {
        let mut entries = self.entries.lock_or_recover();
        if self.owns_slot(&entries) {
            entries.insert(self.key.clone(), Slot::Ready(cached));
        }
    }

    fn owns_slot(&self, entries: &HashMap<CredentialsKey, Slot>) -> bool {
        matches!(entries.get(&self.key), Some(Slot::Pending { id, .. }) if *id == self.id)
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let mut entries = self.entries.lock_or_recover();
        if self.owns_slot(&entries) {
            entries.remove(&self.key);
        }
    }
}

/// [`CredentialsCache`] that stores nothing: every call runs its fetch.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCredentialsCache;

#[async_trait]
impl CredentialsCache for NoopCredentialsCache {
    async fn get_token(&self, _key: &CredentialsKey, fetch: TokenFetch) -> Result<AccessToken> {
        Ok(fetch.await?)
    }
}
