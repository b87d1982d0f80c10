//! Multi-channel AWS Lambda entry point.
//!
//! One function serves Amazon Connect contact flows, both API Gateway
//! flavors, Function URLs, and S3 notifications. Every invocation runs the
//! same pipeline from [`switchboard_core`]: classify the source, extract
//! the payload, sanitize it, and dispatch to the strategy named by
//! `request_type`. This crate contributes:
//!
//! - [`run`]: process bootstrap (tracing, AWS clients, strategy registry)
//! - [`handler`]: the per-event Lambda handler
//! - [`build_registry`]: every served strategy bound to its source
//! - [`aws`]: narrow adapter traits over Connect and DynamoDB

mod runtime;
mod trace;
mod tracing_init;

pub mod aws;
pub mod strategies;

pub use runtime::{get_registry, init_registry};
pub use strategies::{build_registry, AdapterSet};
pub use tracing_init::init_tracing;

use std::sync::Arc;

use aws_config::BehaviorVersion;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use switchboard_core::{classify, dispatch, extract, sanitize, ResponseEnvelope, StrategyRegistry};
use tracing::{info, Instrument};

use crate::aws::connect::SdkConnect;
use crate::aws::dynamo::SdkDynamo;

/// Entry point used by the Lambda runtime.
pub async fn run() -> Result<(), Error> {
    init_tracing();

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let adapters = AdapterSet {
        connect: Arc::new(SdkConnect::new(aws_sdk_connect::Client::new(&config))),
        tables: Arc::new(SdkDynamo::new(aws_sdk_dynamodb::Client::new(&config))),
    };

    // Build the registry up front (logs cold-start timing).
    let _registry = init_registry(|| build_registry(adapters));

    lambda_runtime::run(service_fn(handler)).await
}

/// Lambda handler invoked per event.
///
/// Always returns `Ok`: every failure inside the pipeline is already an
/// error envelope, and the caller-facing contract has no second error
/// channel.
pub async fn handler(event: LambdaEvent<Value>) -> Result<ResponseEnvelope, Error> {
    let trace_id = trace::for_invocation(&event.context);
    Ok(process(get_registry(), &event.payload, &trace_id).await)
}

/// The per-invocation pipeline, separated from [`handler`] so tests can
/// drive it with their own registry.
pub async fn process(
    registry: &StrategyRegistry,
    payload: &Value,
    trace_id: &str,
) -> ResponseEnvelope {
    let source = classify(payload);
    info!(trace_id = %trace_id, source = %source, "classified invocation source");

    let extracted = extract(payload, source);
    let sanitized = sanitize(&extracted, None);

    let span = tracing::info_span!("dispatch", trace_id = %trace_id, source = %source);
    let envelope = dispatch(registry, &sanitized, source).instrument(span).await;

    info!(
        trace_id = %trace_id,
        status_code = envelope.status_code,
        "invocation complete"
    );
    envelope
}
