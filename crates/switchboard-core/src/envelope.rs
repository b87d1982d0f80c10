//! Normalized response envelope returned to every caller.
//!
//! Callers behind API Gateway, Connect, and friends all receive the same
//! three-field structure regardless of outcome: a status code, a
//! success/error tag, and a JSON-string body holding `message`, `data`, and
//! `timestamp`. The body is a string (not a nested object) because that is
//! what proxy integrations expect to pass through verbatim.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Outcome tag carried at the top level of the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseResult {
    Success,
    Error,
}

/// Envelope body. Always serialized with exactly these three keys;
/// `message` and `data` are `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseBody {
    pub message: Option<String>,
    pub data: Option<Value>,
    /// ISO-8601 UTC with offset, microsecond precision.
    pub timestamp: String,
}

/// The normalized response returned from every invocation.
///
/// Created exactly once per invocation, at the end of the pipeline or at the
/// earliest unrecoverable failure, and immutable afterwards.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use switchboard_core::ResponseEnvelope;
///
/// let envelope = ResponseEnvelope::success()
///     .message("Strategy executed successfully")
///     .data(json!({"status": "healthy"}))
///     .build();
/// assert_eq!(envelope.status_code, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub result: ResponseResult,
    #[serde(serialize_with = "body_as_json_string")]
    pub body: ResponseBody,
}

impl ResponseEnvelope {
    /// Start building a success envelope (status code 200 unless overridden).
    pub fn success() -> EnvelopeBuilder {
        EnvelopeBuilder::new(ResponseResult::Success, 200)
    }

    /// Start building an error envelope (status code 400 unless overridden).
    pub fn error() -> EnvelopeBuilder {
        EnvelopeBuilder::new(ResponseResult::Error, 400)
    }
}

/// Builder for [`ResponseEnvelope`]. The timestamp defaults to the current
/// UTC time at [`build`](EnvelopeBuilder::build); passing one explicitly
/// makes the envelope fully deterministic.
#[derive(Debug)]
pub struct EnvelopeBuilder {
    status_code: u16,
    result: ResponseResult,
    message: Option<String>,
    data: Option<Value>,
    timestamp: Option<DateTime<Utc>>,
}

impl EnvelopeBuilder {
    fn new(result: ResponseResult, status_code: u16) -> Self {
        Self {
            status_code,
            result,
            message: None,
            data: None,
            timestamp: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Override the default status code (success 200 / error 400). A handler
    /// returning its own `statusCode` inside its data does not change the
    /// envelope's top-level code; only this setter does.
    pub fn status_code(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn build(self) -> ResponseEnvelope {
        let timestamp = self
            .timestamp
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Micros, false);
        ResponseEnvelope {
            status_code: self.status_code,
            result: self.result,
            body: ResponseBody {
                message: self.message,
                data: self.data,
                timestamp,
            },
        }
    }
}

fn body_as_json_string<S>(body: &ResponseBody, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let text = serde_json::to_string(body).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&text)
}
