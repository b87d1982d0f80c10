//! Invocation source classification and payload extraction.
//!
//! Lambda hands every trigger the same untyped JSON value; which service
//! produced it can only be inferred from its shape. [`classify`] runs an
//! ordered decision list over the raw event and always produces exactly one
//! [`InvocationSource`]. [`extract`] then pulls out the sub-structure that
//! matters for that source.

use serde_json::{json, Value};

/// The external trigger that produced a Lambda invocation.
///
/// Exactly one value is determined per invocation and never changes during
/// the invocation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationSource {
    /// Amazon Connect contact flow block.
    AmazonConnect,
    /// API Gateway REST API (payload v1).
    ApiGatewayRest,
    /// API Gateway HTTP API (payload v2).
    ApiGatewayHttp,
    /// Lambda Function URL.
    FunctionUrl,
    /// S3 bucket notification.
    S3,
    /// EventBridge rule.
    EventBridge,
    /// Anything else: SDK/CLI test invoke, unknown shapes.
    DirectInvoke,
}

impl InvocationSource {
    /// Every source, in classifier precedence order.
    pub const ALL: [InvocationSource; 7] = [
        InvocationSource::AmazonConnect,
        InvocationSource::S3,
        InvocationSource::EventBridge,
        InvocationSource::FunctionUrl,
        InvocationSource::ApiGatewayHttp,
        InvocationSource::ApiGatewayRest,
        InvocationSource::DirectInvoke,
    ];

    /// Stable tag used in logs, registry keys, and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationSource::AmazonConnect => "AMAZON_CONNECT",
            InvocationSource::ApiGatewayRest => "API_GATEWAY_REST",
            InvocationSource::ApiGatewayHttp => "API_GATEWAY_HTTP",
            InvocationSource::FunctionUrl => "FUNCTION_URL",
            InvocationSource::S3 => "S3",
            InvocationSource::EventBridge => "EVENTBRIDGE",
            InvocationSource::DirectInvoke => "DIRECT_INVOKE",
        }
    }
}

impl std::fmt::Display for InvocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw event by its trigger source.
///
/// Total function: falls back to [`InvocationSource::DirectInvoke`] when no
/// predicate matches, never fails. The predicates form an **ordered**
/// decision list; the order is load-bearing because trigger shapes overlap:
///
/// 1. Amazon Connect: `Details.ContactData` exists, or a top-level `Name`
///    string contains `contact`/`connect` (case-insensitive).
/// 2. S3: `Records` is a non-empty array whose first record carries
///    `eventSource` (or `EventSource`) equal to `aws:s3`.
/// 3. EventBridge: `detail-type` and `source` both present and `Records`
///    absent (S3/SNS deliveries through EventBridge also set `source`).
/// 4. With both `headers` and `requestContext` present: Function URL
///    (`domainName` contains `.lambda-url.`), then HTTP API
///    (`requestContext.http`), then REST API (`apiId` or `stage`).
/// 5. Otherwise direct invoke.
///
/// A REST-shaped `requestContext` whose domain is a Lambda Function URL
/// must classify as [`InvocationSource::FunctionUrl`], which is why 4a runs
/// before 4c.
pub fn classify(event: &Value) -> InvocationSource {
    if is_connect(event) {
        return InvocationSource::AmazonConnect;
    }
    if is_s3(event) {
        return InvocationSource::S3;
    }
    if is_eventbridge(event) {
        return InvocationSource::EventBridge;
    }
    if event.get("headers").is_some() {
        if let Some(request_context) = event.get("requestContext") {
            if let Some(source) = classify_gateway(request_context) {
                return source;
            }
        }
    }
    InvocationSource::DirectInvoke
}

fn is_connect(event: &Value) -> bool {
    if event
        .get("Details")
        .and_then(|details| details.get("ContactData"))
        .is_some()
    {
        return true;
    }
    event
        .get("Name")
        .and_then(Value::as_str)
        .map(|name| {
            let name = name.to_lowercase();
            name.contains("contact") || name.contains("connect")
        })
        .unwrap_or(false)
}

fn is_s3(event: &Value) -> bool {
    let Some(records) = event.get("Records").and_then(Value::as_array) else {
        return false;
    };
    let Some(first) = records.first() else {
        return false;
    };
    // Both key spellings show up in the wild depending on the delivery path.
    first
        .get("eventSource")
        .or_else(|| first.get("EventSource"))
        .and_then(Value::as_str)
        == Some("aws:s3")
}

fn is_eventbridge(event: &Value) -> bool {
    event.get("detail-type").is_some()
        && event.get("source").is_some()
        && event.get("Records").is_none()
}

fn classify_gateway(request_context: &Value) -> Option<InvocationSource> {
    let domain = request_context
        .get("domainName")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if domain.contains(".lambda-url.") {
        return Some(InvocationSource::FunctionUrl);
    }
    if request_context.get("http").is_some() {
        return Some(InvocationSource::ApiGatewayHttp);
    }
    if request_context.get("apiId").is_some() || request_context.get("stage").is_some() {
        return Some(InvocationSource::ApiGatewayRest);
    }
    None
}

/// Extract the source-specific useful payload from a raw event.
///
/// Deterministic and total: missing keys yield the documented empty shape
/// (empty object for every source except [`InvocationSource::S3`], which
/// yields an empty array). [`InvocationSource::DirectInvoke`] passes the
/// event through unchanged.
pub fn extract(event: &Value, source: InvocationSource) -> Value {
    match source {
        InvocationSource::AmazonConnect => event
            .get("Details")
            .and_then(|details| details.get("ContactData"))
            .cloned()
            .unwrap_or_else(|| json!({})),
        InvocationSource::ApiGatewayRest
        | InvocationSource::ApiGatewayHttp
        | InvocationSource::FunctionUrl => event
            .get("requestContext")
            .cloned()
            .unwrap_or_else(|| json!({})),
        InvocationSource::S3 => event.get("Records").cloned().unwrap_or_else(|| json!([])),
        InvocationSource::EventBridge => {
            event.get("detail").cloned().unwrap_or_else(|| json!({}))
        }
        InvocationSource::DirectInvoke => event.clone(),
    }
}
