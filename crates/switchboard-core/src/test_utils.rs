//! Test fixtures for pipeline and handler testing.
//!
//! Provides one realistic raw event per invocation source plus scripted
//! strategy stubs. The gateway fixtures carry `request_type` inside
//! `requestContext` so the extracted payload still holds the token when it
//! reaches the dispatcher.
//!
//! Enable the `test-utils` feature to use these from dependent crates.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::strategy::{Rejection, Strategy};

/// Strategy with a scripted outcome, for exercising dispatch mechanics
/// without any business logic.
pub struct StubStrategy {
    rejection: Option<Rejection>,
    output: Value,
    failure: Option<String>,
}

impl StubStrategy {
    /// Validates clean and returns `output` from `operate`.
    pub fn succeeding(output: Value) -> Self {
        Self {
            rejection: None,
            output,
            failure: None,
        }
    }

    /// Fails validation with `rejection`.
    pub fn rejecting(rejection: Rejection) -> Self {
        Self {
            rejection: Some(rejection),
            output: Value::Null,
            failure: None,
        }
    }

    /// Validates clean but fails execution with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            rejection: None,
            output: Value::Null,
            failure: Some(message.into()),
        }
    }
}

#[async_trait]
impl Strategy for StubStrategy {
    fn validate(&self) -> Result<(), Rejection> {
        match &self.rejection {
            Some(rejection) => Err(rejection.clone()),
            None => Ok(()),
        }
    }

    async fn operate(&self) -> anyhow::Result<Value> {
        if let Some(message) = &self.failure {
            anyhow::bail!("{message}");
        }
        Ok(self.output.clone())
    }
}

/// Trace id for tests, mirroring the Lambda request id format.
pub fn mock_trace_id(suffix: &str) -> String {
    format!("test-trace-{suffix}")
}

/// Amazon Connect contact flow invocation.
pub fn connect_event() -> Value {
    json!({
        "Name": "ContactFlowEvent",
        "Details": {
            "ContactData": {
                "request_type": "StatusCheckerConnect",
                "ContactId": "12345678-1234-1234-1234-123456789012",
                "Channel": "VOICE",
                "CustomerEndpoint": {
                    "Address": "+14155552671",
                    "Type": "TELEPHONE_NUMBER"
                },
                "Attributes": {}
            },
            "Parameters": {}
        }
    })
}

/// API Gateway REST API (payload v1) invocation.
pub fn api_gateway_rest_event() -> Value {
    json!({
        "resource": "/status",
        "path": "/status",
        "httpMethod": "GET",
        "headers": {
            "Host": "a1b2c3d4e5.execute-api.eu-west-1.amazonaws.com"
        },
        "requestContext": {
            "request_type": "StatusCheckerApiGatewayRest",
            "apiId": "a1b2c3d4e5",
            "stage": "prod",
            "domainName": "a1b2c3d4e5.execute-api.eu-west-1.amazonaws.com",
            "requestId": "rest-request-1"
        },
        "body": null
    })
}

/// API Gateway HTTP API (payload v2) invocation.
pub fn api_gateway_http_event() -> Value {
    json!({
        "version": "2.0",
        "routeKey": "GET /status",
        "headers": {
            "host": "a1b2c3d4e5.execute-api.eu-west-1.amazonaws.com"
        },
        "requestContext": {
            "request_type": "StatusCheckerApiGatewayHttp",
            "apiId": "a1b2c3d4e5",
            "stage": "$default",
            "domainName": "a1b2c3d4e5.execute-api.eu-west-1.amazonaws.com",
            "http": {
                "method": "GET",
                "path": "/status"
            }
        }
    })
}

/// Lambda Function URL invocation.
pub fn function_url_event() -> Value {
    json!({
        "version": "2.0",
        "routeKey": "$default",
        "headers": {
            "host": "abc123def456.lambda-url.eu-west-1.on.aws"
        },
        "requestContext": {
            "request_type": "StatusCheckerFunctionUrl",
            "apiId": "abc123def456",
            "domainName": "abc123def456.lambda-url.eu-west-1.on.aws",
            "http": {
                "method": "GET",
                "path": "/"
            }
        }
    })
}

/// S3 bucket notification.
pub fn s3_event() -> Value {
    json!({
        "Records": [
            {
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "awsRegion": "eu-west-1",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": {"name": "inbound-recordings"},
                    "object": {"key": "calls/2026/08/recording.wav", "size": 1024}
                }
            }
        ]
    })
}

/// EventBridge rule invocation.
pub fn eventbridge_event() -> Value {
    json!({
        "version": "0",
        "id": "89041f90-a411-4971-9123-eeba285e2f4e",
        "detail-type": "Scheduled Event",
        "source": "aws.events",
        "account": "123456789012",
        "time": "2026-08-23T03:00:00Z",
        "region": "eu-west-1",
        "resources": ["arn:aws:events:eu-west-1:123456789012:rule/nightly-sweep"],
        "detail": {
            "request_type": "AutoCleanUpActiveContacts"
        }
    })
}

/// Plain SDK/CLI invocation with no recognizable trigger shape.
pub fn direct_invoke_event() -> Value {
    json!({
        "request_type": "DynamodbLookup",
        "TABLE_NAME": "contacts",
        "KEY_NAME": "pk",
        "KEY_VALUE": "customer-1"
    })
}
