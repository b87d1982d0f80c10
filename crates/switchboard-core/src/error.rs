//! Dispatch failure taxonomy.

use serde_json::json;
use thiserror::Error;

use crate::envelope::ResponseEnvelope;
use crate::registry::REQUEST_TYPE_FIELD;
use crate::source::InvocationSource;
use crate::strategy::Rejection;

/// Everything that can go wrong between receiving a sanitized payload and a
/// strategy finishing.
///
/// None of these propagate to the Lambda caller: each is converted to an
/// error envelope (status 400) at the dispatch boundary via
/// [`into_envelope`](DispatchError::into_envelope). Classification never
/// fails (it falls back to direct invoke), so it has no variant here.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The declared source has no registered strategies at all.
    #[error("invocation source {source} has no registered strategies")]
    UnregisteredSource { source: InvocationSource },

    /// The sanitized payload carries no strategy token.
    #[error("event is missing the required '{}' field", REQUEST_TYPE_FIELD)]
    MissingRequestType,

    /// The token is not in the declared source's registered set. Tokens are
    /// scoped per source; a token valid for another source is still unknown
    /// here.
    #[error("strategy '{token}' is not registered for source {source}")]
    UnknownStrategy {
        token: String,
        source: InvocationSource,
    },

    /// The token is listed for the source but no factory is bound to it.
    /// The registry builder binds both together, so this guards an invariant
    /// rather than an expected path.
    #[error("strategy '{token}' has no backing implementation")]
    Resolution { token: String },

    /// The factory failed to build the strategy from the event.
    #[error("failed to construct strategy '{token}': {message}")]
    Construction { token: String, message: String },

    /// The strategy's own validation rejected the event.
    #[error("strategy '{token}' rejected the event: {rejection}")]
    Rejected { token: String, rejection: Rejection },

    /// The strategy started executing and failed.
    #[error("strategy '{token}' failed: {message}")]
    Execution { token: String, message: String },
}

impl DispatchError {
    /// Render this failure as the envelope surfaced to the caller.
    ///
    /// The display text becomes the body message; a rejection with multiple
    /// reasons also carries them individually under `data.errors`.
    pub fn into_envelope(self) -> ResponseEnvelope {
        let builder = ResponseEnvelope::error().message(self.to_string());
        match self {
            DispatchError::Rejected { rejection, .. } if rejection.reasons.len() > 1 => builder
                .data(json!({ "errors": rejection.reasons }))
                .build(),
            _ => builder.build(),
        }
    }
}
