//! Concrete strategies and their registry wiring.

mod contacts;
mod dynamo;
mod phone;
mod status;

pub use contacts::ContactCleanup;
pub use dynamo::{DynamoLookup, DynamoStoreAttributes};
pub use phone::PhoneNumberFormat;
pub use status::StatusChecker;

use std::sync::Arc;

use switchboard_core::{InvocationSource, StrategyRegistry};

use crate::aws::connect::ConnectOps;
use crate::aws::dynamo::TableStore;

/// The AWS seams strategies are built against.
#[derive(Clone)]
pub struct AdapterSet {
    pub connect: Arc<dyn ConnectOps>,
    pub tables: Arc<dyn TableStore>,
}

/// Binds every served strategy to its source and token.
///
/// EventBridge and direct invocations are deliberately absent: events
/// from those sources end in the unregistered-source error envelope.
pub fn build_registry(adapters: AdapterSet) -> StrategyRegistry {
    let sweep_connect = Arc::clone(&adapters.connect);
    let lookup_tables = Arc::clone(&adapters.tables);
    let check_tables = Arc::clone(&adapters.tables);
    let store_tables = Arc::clone(&adapters.tables);

    StrategyRegistry::builder()
        .strategy(InvocationSource::AmazonConnect, "StatusCheckerConnect", |event| {
            Ok(Box::new(StatusChecker::amazon_connect(event)))
        })
        .strategy(
            InvocationSource::AmazonConnect,
            "AutoCleanUpActiveContacts",
            move |_event| Ok(Box::new(ContactCleanup::from_env(Arc::clone(&sweep_connect)))),
        )
        .strategy(InvocationSource::AmazonConnect, "PhoneNumberFormat", |event| {
            Ok(Box::new(PhoneNumberFormat::new(event)))
        })
        .strategy(InvocationSource::AmazonConnect, "DynamodbLookup", move |event| {
            Ok(Box::new(DynamoLookup::new(event, Arc::clone(&lookup_tables))?))
        })
        .strategy(
            InvocationSource::AmazonConnect,
            "DynamoDBLookupCheck",
            move |event| Ok(Box::new(DynamoLookup::new_check(event, Arc::clone(&check_tables))?)),
        )
        .strategy(
            InvocationSource::AmazonConnect,
            "DynamoDBStoreAttributes",
            move |event| {
                Ok(Box::new(DynamoStoreAttributes::new(
                    event,
                    Arc::clone(&store_tables),
                )))
            },
        )
        .strategy(
            InvocationSource::ApiGatewayRest,
            "StatusCheckerApiGatewayRest",
            |event| Ok(Box::new(StatusChecker::api_gateway_rest(event))),
        )
        .strategy(
            InvocationSource::ApiGatewayHttp,
            "StatusCheckerApiGatewayHttp",
            |event| Ok(Box::new(StatusChecker::api_gateway_http(event))),
        )
        .strategy(InvocationSource::FunctionUrl, "StatusCheckerFunctionUrl", |event| {
            Ok(Box::new(StatusChecker::function_url(event)))
        })
        .strategy(InvocationSource::S3, "StatusCheckerS3", |event| {
            Ok(Box::new(StatusChecker::s3(event)))
        })
        .build()
}
