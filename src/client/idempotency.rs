//! Idempotency key generation.

use uuid::Uuid;

/// Header carrying the idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Produces one key per logical API call.
///
/// The key is generated once before the first attempt and sent unchanged
/// on every retry, so the server can deduplicate.
pub trait IdempotencyKeyGenerator: Send + Sync {
    /// Generate a fresh key.
    fn generate(&self) -> String;
}

/// Generates random UUID v4 keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKeyGenerator;

impl IdempotencyKeyGenerator for UuidKeyGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F> IdempotencyKeyGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}
