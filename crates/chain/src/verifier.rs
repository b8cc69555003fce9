//! Part authenticity verification
//!
//! Verification is a strategy behind [`AuthenticityVerifier`]. The
//! [`RandomThresholdVerifier`] reproduces the simulated production check
//! (shape checks plus a random draw); [`FixedVerifier`] always answers the same
//! way and is what tests and demos wire in.

use rand::Rng;
use tracing::debug;

use crate::token::is_well_formed_token;

/// Minimum serial number length (exclusive) accepted by the threshold check
const MIN_SERIAL_LEN: usize = 5;

/// Strategy deciding whether a part's stored token vouches for it
pub trait AuthenticityVerifier: Send + Sync {
    /// Return `true` when the part is considered authentic
    fn verify(&self, token: &str, serial_number: &str) -> bool;

    /// Label persisted as the verification method
    fn method(&self) -> &'static str {
        "blockchain"
    }
}

type Sampler = Box<dyn Fn() -> f64 + Send + Sync>;

/// Simulated verifier: well-formed token, serial longer than five characters,
/// and a uniform draw above the threshold.
///
/// Non-deterministic with the default sampler. Not suitable for real trust
/// decisions.
pub struct RandomThresholdVerifier {
    threshold: f64,
    sampler: Sampler,
}

impl RandomThresholdVerifier {
    /// Create a verifier drawing from the thread RNG
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            sampler: Box::new(|| rand::thread_rng().gen::<f64>()),
        }
    }

    /// Replace the random source
    pub fn with_sampler<F>(threshold: f64, sampler: F) -> Self
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        Self {
            threshold,
            sampler: Box::new(sampler),
        }
    }

    /// Configured threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for RandomThresholdVerifier {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl AuthenticityVerifier for RandomThresholdVerifier {
    fn verify(&self, token: &str, serial_number: &str) -> bool {
        let token_ok = is_well_formed_token(token);
        let serial_ok = serial_number.chars().count() > MIN_SERIAL_LEN;
        if !(token_ok && serial_ok) {
            debug!(token_ok, serial_ok, "Authenticity shape check failed");
            return false;
        }
        (self.sampler)() > self.threshold
    }
}

/// Deterministic verifier returning a fixed outcome
#[derive(Debug, Clone, Copy)]
pub struct FixedVerifier {
    outcome: bool,
}

impl FixedVerifier {
    /// Verifier that reports every part authentic
    pub fn authentic() -> Self {
        Self { outcome: true }
    }

    /// Verifier that reports every part counterfeit
    pub fn counterfeit() -> Self {
        Self { outcome: false }
    }
}

impl AuthenticityVerifier for FixedVerifier {
    fn verify(&self, _token: &str, _serial_number: &str) -> bool {
        self.outcome
    }

    fn method(&self) -> &'static str {
        "fixed"
    }
}
