//! The strategy capability contract.
//!
//! Concrete strategies live in the Lambda binary crate; the dispatcher only
//! ever sees them as trait objects produced by registered factories.

use async_trait::async_trait;
use serde_json::Value;

/// Why a strategy refused to run.
///
/// Carries one or more human-readable reasons; field-level validators
/// typically produce one reason per missing field. Should never be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub reasons: Vec<String>,
}

impl Rejection {
    /// Rejection with a single reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reasons: vec![reason.into()],
        }
    }

    /// Rejection carrying every collected reason.
    pub fn from_reasons(reasons: Vec<String>) -> Self {
        Self { reasons }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reasons.join("; "))
    }
}

/// A unit of business logic bound to a `request_type` token.
///
/// Two-phase contract, uniform across every implementation:
///
/// 1. [`validate`](Strategy::validate) inspects the sanitized event the
///    strategy was constructed from and either clears it for execution or
///    rejects with reasons.
/// 2. [`operate`](Strategy::operate) performs the work; its return value
///    becomes the `data` payload of the success envelope.
///
/// `operate` is never called after a rejection. Strategies read the event
/// during both phases but do not own it beyond construction; anything they
/// need later they keep themselves.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn validate(&self) -> Result<(), Rejection>;

    async fn operate(&self) -> anyhow::Result<Value>;
}
