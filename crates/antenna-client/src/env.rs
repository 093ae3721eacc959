//! Environment abstraction for deterministic testing.
//!
//! The session layer draws one fresh visitor id per construction. Routing that
//! randomness through [`Environment`] lets simulation seed it while production
//! uses the OS RNG.

use uuid::Uuid;

/// Source of randomness for the session layer.
///
/// # Invariants
///
/// - Given the same seed, simulation implementations produce the same
///   sequence of bytes.
/// - Production implementations use cryptographically secure entropy.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random (version 4) visitor id.
    fn visitor_id(&self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.random_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

/// Production environment using the OS RNG (getrandom).
#[derive(Debug, Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).expect("invariant: OS RNG failure is unrecoverable");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visitor_ids_are_v4_and_distinct() {
        let env = SystemEnv::new();

        let a = env.visitor_id();
        let b = env.visitor_id();

        assert_eq!(a.get_version_num(), 4);
        assert_ne!(a, b);
    }

    #[test]
    fn random_bytes_fill_buffer() {
        let env = SystemEnv::new();

        let mut bytes = [0u8; 64];
        env.random_bytes(&mut bytes);

        let non_zero_count = bytes.iter().filter(|&&b| b != 0).count();
        assert!(non_zero_count > 32, "Most bytes should be non-zero");
    }
}
