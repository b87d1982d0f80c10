//! The dispatch core: token resolution and the two-phase strategy contract.

use serde_json::Value;
use tracing::{error, info};

use crate::envelope::ResponseEnvelope;
use crate::error::DispatchError;
use crate::registry::{StrategyRegistry, REQUEST_TYPE_FIELD};
use crate::source::InvocationSource;

/// Resolve and run the strategy named by the payload's `request_type`.
///
/// The fallible steps run strictly in order: source registration check,
/// token presence, token membership for the declared source, factory
/// resolution, construction, `validate`, `operate`. The first failure wins
/// and `operate` is never reached after a rejection.
///
/// Never fails past this boundary: every failure becomes an error envelope
/// (status 400) and a successful `operate` result becomes the `data` of a
/// success envelope. The dispatcher itself has no side effects beyond
/// logging; anything else is the strategy's doing.
pub async fn dispatch(
    registry: &StrategyRegistry,
    event: &Value,
    source: InvocationSource,
) -> ResponseEnvelope {
    match try_dispatch(registry, event, source).await {
        Ok(data) => ResponseEnvelope::success()
            .message("Strategy executed successfully")
            .data(data)
            .build(),
        Err(err) => {
            error!(source = %source, error = %err, "dispatch failed");
            err.into_envelope()
        }
    }
}

async fn try_dispatch(
    registry: &StrategyRegistry,
    event: &Value,
    source: InvocationSource,
) -> Result<Value, DispatchError> {
    if !registry.has_source(source) {
        return Err(DispatchError::UnregisteredSource { source });
    }

    let raw_token = event
        .get(REQUEST_TYPE_FIELD)
        .ok_or(DispatchError::MissingRequestType)?;
    let Some(token) = raw_token.as_str() else {
        // Non-string tokens can never be registered; report them verbatim.
        return Err(DispatchError::UnknownStrategy {
            token: raw_token.to_string(),
            source,
        });
    };
    if !registry.is_registered_for(source, token) {
        return Err(DispatchError::UnknownStrategy {
            token: token.to_string(),
            source,
        });
    }

    let factory = registry
        .factory(token)
        .ok_or_else(|| DispatchError::Resolution {
            token: token.to_string(),
        })?;
    let strategy = factory(event).map_err(|err| DispatchError::Construction {
        token: token.to_string(),
        message: format!("{err:#}"),
    })?;
    info!(token, source = %source, "strategy constructed");

    strategy
        .validate()
        .map_err(|rejection| DispatchError::Rejected {
            token: token.to_string(),
            rejection,
        })?;

    let data = strategy
        .operate()
        .await
        .map_err(|err| DispatchError::Execution {
            token: token.to_string(),
            message: format!("{err:#}"),
        })?;
    info!(token, source = %source, "strategy executed");
    Ok(data)
}
